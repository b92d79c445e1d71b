//! Shader Keywords
//!
//! A [`Keyword`] is the identity of a single shader preprocessor symbol. It is
//! backed by an interned [`Symbol`], so two keywords are equal exactly when
//! they were created from the same name, and comparing them never touches the
//! string itself.
//!
//! A [`KeywordSet`] is the set of keywords enabled for one candidate variant.
//! Membership (`is_enabled`) is the primary operation stripping rules
//! perform.
//!
//! ```rust,ignore
//! use strip_core::{Keyword, KeywordSet};
//!
//! let transparent = Keyword::new("_SURFACE_TYPE_TRANSPARENT");
//! let set: KeywordSet = [transparent].into_iter().collect();
//!
//! assert!(set.is_enabled(transparent));
//! ```

use std::fmt;

use smallvec::SmallVec;

use crate::interner::{self, Symbol};

/// Interned identity of a shader preprocessor keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Keyword(Symbol);

impl Keyword {
    /// Interns `name` and returns its keyword identity.
    #[inline]
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self(interner::intern(name))
    }

    /// Returns the keyword for `name` only if it has been interned before.
    #[inline]
    #[must_use]
    pub fn lookup(name: &str) -> Option<Self> {
        interner::get(name).map(Self)
    }

    /// Stable identifier of this keyword for the lifetime of the process.
    #[inline]
    #[must_use]
    pub fn id(self) -> Symbol {
        self.0
    }

    #[inline]
    #[must_use]
    pub fn name(self) -> &'static str {
        interner::resolve(self.0)
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The keywords enabled for one shader variant.
///
/// Internally an ordered, deduplicated list of keywords, so that two sets with
/// the same members compare and hash identically regardless of insertion
/// order.
///
/// # Performance
///
/// - Membership: O(log n) binary search over integer symbols
/// - Typical variants enable fewer than eight keywords and never spill to the
///   heap
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct KeywordSet {
    keywords: SmallVec<[Keyword; 8]>,
}

impl KeywordSet {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            keywords: SmallVec::new(),
        }
    }

    /// Adds a keyword, keeping the set sorted. Returns `false` if it was
    /// already present.
    pub fn insert(&mut self, keyword: Keyword) -> bool {
        match self.keywords.binary_search(&keyword) {
            Ok(_) => false,
            Err(idx) => {
                self.keywords.insert(idx, keyword);
                true
            }
        }
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, keyword: Keyword) -> Self {
        self.insert(keyword);
        self
    }

    /// Whether `keyword` is enabled in this variant.
    #[inline]
    #[must_use]
    pub fn is_enabled(&self, keyword: Keyword) -> bool {
        self.keywords.binary_search(&keyword).is_ok()
    }

    /// Whether any of `keywords` is enabled in this variant.
    #[inline]
    #[must_use]
    pub fn is_any_enabled(&self, keywords: &[Keyword]) -> bool {
        keywords.iter().any(|&k| self.is_enabled(k))
    }

    /// Checks membership by name. Names that were never interned cannot be
    /// members, so this never allocates.
    #[must_use]
    pub fn contains_name(&self, name: &str) -> bool {
        Keyword::lookup(name).is_some_and(|k| self.is_enabled(k))
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = Keyword> + '_ {
        self.keywords.iter().copied()
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[Keyword] {
        &self.keywords
    }
}

impl FromIterator<Keyword> for KeywordSet {
    fn from_iter<I: IntoIterator<Item = Keyword>>(iter: I) -> Self {
        let mut set = Self::new();
        for keyword in iter {
            set.insert(keyword);
        }
        set
    }
}

/// Create a `KeywordSet` from a list of keyword names
impl From<&[&str]> for KeywordSet {
    fn from(names: &[&str]) -> Self {
        names.iter().map(|name| Keyword::new(name)).collect()
    }
}

impl fmt::Display for KeywordSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, keyword) in self.keywords.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(keyword.name())?;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_identity() {
        let a = Keyword::new("USE_FPTL_LIGHTLIST");
        let b = Keyword::new("USE_FPTL_LIGHTLIST");
        let c = Keyword::new("USE_CLUSTERED_LIGHTLIST");

        assert_eq!(a, b);
        assert_eq!(a.id(), b.id());
        assert_ne!(a, c);
        assert_eq!(a.name(), "USE_FPTL_LIGHTLIST");
    }

    #[test]
    fn test_is_enabled() {
        let set = KeywordSet::from(&["DEBUG_DISPLAY", "LIGHT_LAYERS"][..]);

        assert!(set.is_enabled(Keyword::new("DEBUG_DISPLAY")));
        assert!(set.is_enabled(Keyword::new("LIGHT_LAYERS")));
        assert!(!set.is_enabled(Keyword::new("DECALS_OFF")));
        assert!(set.contains_name("LIGHT_LAYERS"));
        assert!(!set.contains_name("NOT_A_KEYWORD_ANYWHERE"));
    }

    #[test]
    fn test_insertion_order_does_not_matter() {
        let s1 = KeywordSet::from(&["A_KW", "B_KW", "C_KW"][..]);
        let s2 = KeywordSet::from(&["C_KW", "A_KW", "B_KW", "A_KW"][..]);

        assert_eq!(s1, s2);
        assert_eq!(s2.len(), 3);

        let ids: Vec<_> = s2.iter().map(Keyword::id).collect();
        assert!(
            ids.windows(2).all(|w| w[0] < w[1]),
            "Keywords should be sorted by symbol"
        );
    }

    #[test]
    fn test_insert_reports_duplicates() {
        let mut set = KeywordSet::new();
        let kw = Keyword::new("LOD_FADE_CROSSFADE");

        assert!(set.insert(kw));
        assert!(!set.insert(kw));
        assert_eq!(set.len(), 1);
    }
}
