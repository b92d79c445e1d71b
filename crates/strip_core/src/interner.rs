//! Global String Interner
//!
//! Converts keyword, pass and shader-family names into compact integer
//! [`Symbol`]s so that every identity comparison made while stripping is an
//! integer comparison.
//!
//! The interner is process-global and thread-safe; symbols handed out by it
//! stay valid for the lifetime of the process.

use std::sync::LazyLock;

use lasso::{Spur, ThreadedRodeo};

static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::new);

/// Symbol type alias.
///
/// A compact integer identifier that is cheap to copy, compare and hash.
pub type Symbol = Spur;

/// Interns a string and returns its symbol.
///
/// Returns the existing symbol if the string was interned before.
#[inline]
pub fn intern(s: &str) -> Symbol {
    INTERNER.get_or_intern(s)
}

/// Looks up the symbol of an already interned string without allocating.
#[inline]
pub fn get(s: &str) -> Option<Symbol> {
    INTERNER.get(s)
}

/// Resolves a symbol back to its string.
///
/// # Panics
/// Panics if the symbol was not produced by this interner.
#[inline]
pub fn resolve(sym: Symbol) -> &'static str {
    INTERNER.resolve(&sym)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_and_resolve() {
        let s1 = intern("DECALS_3RT");
        let s2 = intern("DECALS_3RT");
        let s3 = intern("DECALS_4RT");

        assert_eq!(s1, s2);
        assert_ne!(s1, s3);

        assert_eq!(resolve(s1), "DECALS_3RT");
        assert_eq!(resolve(s3), "DECALS_4RT");
    }

    #[test]
    fn test_get() {
        let _ = intern("LIGHT_LAYERS");

        assert!(get("LIGHT_LAYERS").is_some());
        assert!(get("NEVER_INTERNED_KEYWORD").is_none());
    }
}
