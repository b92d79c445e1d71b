//! Shader Variant Keys
//!
//! A [`ShaderVariantKey`] identifies one candidate compiled unit: the shader
//! family it belongs to, the pass it compiles and the keywords it enables.
//! Keys are produced by the upstream build enumeration and only ever read by
//! the stripping engine.

use std::fmt;

use serde::Deserialize;

use crate::errors::{Result, StripError};
use crate::interner::{self, Symbol};
use crate::keyword::{Keyword, KeywordSet};

/// Interned identity of a shader family (e.g. `Lit`, `Unlit`, `LayeredLit`).
///
/// Families are the unit the stripper registry attaches rule chains to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShaderFamily(Symbol);

impl ShaderFamily {
    #[inline]
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self(interner::intern(name))
    }

    #[inline]
    #[must_use]
    pub fn name(self) -> &'static str {
        interner::resolve(self.0)
    }
}

impl fmt::Display for ShaderFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Interned identity of a shader pass (e.g. `"Motion Vectors"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PassName(Symbol);

impl PassName {
    #[inline]
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self(interner::intern(name))
    }

    #[inline]
    #[must_use]
    pub fn name(self) -> &'static str {
        interner::resolve(self.0)
    }
}

impl fmt::Display for PassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One candidate shader variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShaderVariantKey {
    family: ShaderFamily,
    pass: PassName,
    keywords: KeywordSet,
}

impl ShaderVariantKey {
    #[must_use]
    pub fn new(family: ShaderFamily, pass: PassName, keywords: KeywordSet) -> Self {
        Self {
            family,
            pass,
            keywords,
        }
    }

    /// Convenience constructor interning every name.
    #[must_use]
    pub fn from_names(family: &str, pass: &str, keywords: &[&str]) -> Self {
        Self::new(
            ShaderFamily::new(family),
            PassName::new(pass),
            KeywordSet::from(keywords),
        )
    }

    #[inline]
    #[must_use]
    pub fn family(&self) -> ShaderFamily {
        self.family
    }

    #[inline]
    #[must_use]
    pub fn pass(&self) -> PassName {
        self.pass
    }

    #[inline]
    #[must_use]
    pub fn keywords(&self) -> &KeywordSet {
        &self.keywords
    }

    /// Shorthand for `self.keywords().is_enabled(keyword)`.
    #[inline]
    #[must_use]
    pub fn is_enabled(&self, keyword: Keyword) -> bool {
        self.keywords.is_enabled(keyword)
    }
}

impl fmt::Display for ShaderVariantKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} {}", self.family, self.pass, self.keywords)
    }
}

/// Serialized form of a variant as emitted by build enumeration tooling.
///
/// ```json
/// { "family": "Lit", "pass": "Forward", "keywords": ["DECALS_3RT"] }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VariantDescriptor {
    pub family: String,
    pub pass: String,
    pub keywords: Vec<String>,
}

impl TryFrom<&VariantDescriptor> for ShaderVariantKey {
    type Error = StripError;

    fn try_from(desc: &VariantDescriptor) -> Result<Self> {
        if desc.family.trim().is_empty() {
            return Err(StripError::VariantParse(format!(
                "variant in pass '{}' has no shader family",
                desc.pass
            )));
        }
        if desc.pass.trim().is_empty() {
            return Err(StripError::VariantParse(format!(
                "variant of family '{}' has no pass name",
                desc.family
            )));
        }

        Ok(Self::new(
            ShaderFamily::new(&desc.family),
            PassName::new(&desc.pass),
            desc.keywords.iter().map(|k| Keyword::new(k)).collect(),
        ))
    }
}

/// Parses a JSON array of [`VariantDescriptor`]s into variant keys.
pub fn variants_from_json(json: &str) -> Result<Vec<ShaderVariantKey>> {
    let descriptors: Vec<VariantDescriptor> =
        serde_json::from_str(json).map_err(StripError::VariantJson)?;
    descriptors.iter().map(ShaderVariantKey::try_from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_names() {
        let key = ShaderVariantKey::from_names("Lit", "Forward", &["DECALS_3RT", "LIGHT_LAYERS"]);

        assert_eq!(key.family(), ShaderFamily::new("Lit"));
        assert_eq!(key.pass().name(), "Forward");
        assert!(key.is_enabled(Keyword::new("DECALS_3RT")));
        assert_eq!(key.keywords().len(), 2);
    }

    #[test]
    fn test_variants_from_json() {
        let json = r#"[
            { "family": "Lit", "pass": "GBuffer", "keywords": ["DECALS_4RT"] },
            { "family": "Unlit", "pass": "Motion Vectors" }
        ]"#;

        let variants = variants_from_json(json).unwrap();
        assert_eq!(variants.len(), 2);
        assert!(variants[0].is_enabled(Keyword::new("DECALS_4RT")));
        assert!(variants[1].keywords().is_empty());
        assert_eq!(variants[1].pass().name(), "Motion Vectors");
    }

    #[test]
    fn test_descriptor_without_family_is_rejected() {
        let desc = VariantDescriptor {
            pass: "Forward".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            ShaderVariantKey::try_from(&desc),
            Err(StripError::VariantParse(_))
        ));
    }
}
