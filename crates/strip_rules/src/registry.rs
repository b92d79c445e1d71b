//! Stripper Registry
//!
//! Maps shader families to the rule chain applied to their variants. The
//! common chain runs first for every registered family, followed by the
//! family's own rules.
//!
//! # Init-then-freeze
//!
//! Registration happens on a [`StripperRegistryBuilder`]. Calling
//! [`build`](StripperRegistryBuilder::build) freezes it into an immutable
//! [`StripperRegistry`] that can be shared across threads by reference. The
//! frozen registry has no mutating methods, so registration can never
//! interleave with evaluation.
//!
//! ```rust,ignore
//! let registry = StripperRegistry::builder()
//!     .register(ShaderFamily::new("Unlit"), RuleChain::new())
//!     .register(ShaderFamily::new("Lit"), lit_rules)
//!     .build();
//! ```

use rustc_hash::FxHashMap;
use strip_core::{ConfigurationSnapshot, ShaderFamily, ShaderVariantKey};

use crate::common::common_chain;
use crate::rule::{RuleChain, StripRule};

/// Per-family extension point.
///
/// A shader family implements this to contribute its own stripping rules on
/// top of the common policy.
pub trait ShaderPreprocessor {
    fn family(&self) -> ShaderFamily;

    /// Rules appended after the common chain. Defaults to none.
    fn stripper_rules(&self) -> RuleChain {
        RuleChain::new()
    }
}

// ─── Builder ─────────────────────────────────────────────────────────────────

/// Mutable registration phase of the registry.
#[derive(Debug)]
pub struct StripperRegistryBuilder {
    common: RuleChain,
    families: FxHashMap<ShaderFamily, RuleChain>,
}

impl Default for StripperRegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl StripperRegistryBuilder {
    /// Starts from the standard common chain.
    #[must_use]
    pub fn new() -> Self {
        Self::with_common_chain(common_chain())
    }

    /// Starts from a custom common chain.
    #[must_use]
    pub fn with_common_chain(common: RuleChain) -> Self {
        Self {
            common,
            families: FxHashMap::default(),
        }
    }

    /// Associates `rules` with `family`, replacing any previous chain.
    pub fn insert(&mut self, family: ShaderFamily, rules: RuleChain) -> &mut Self {
        if self.families.insert(family, rules).is_some() {
            log::debug!("Replacing stripper rules for shader family '{family}'");
        }
        self
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn register(mut self, family: ShaderFamily, rules: RuleChain) -> Self {
        self.insert(family, rules);
        self
    }

    /// Registers a family that only uses the common policy.
    #[must_use]
    pub fn register_common_only(self, family: ShaderFamily) -> Self {
        self.register(family, RuleChain::new())
    }

    /// Registers the family and rules contributed by a preprocessor.
    #[must_use]
    pub fn register_preprocessor(self, preprocessor: &dyn ShaderPreprocessor) -> Self {
        self.register(preprocessor.family(), preprocessor.stripper_rules())
    }

    #[must_use]
    pub fn is_registered(&self, family: ShaderFamily) -> bool {
        self.families.contains_key(&family)
    }

    /// Freezes the registry.
    #[must_use]
    pub fn build(self) -> StripperRegistry {
        log::debug!(
            "Stripper registry frozen: {} families, {} common rules",
            self.families.len(),
            self.common.len()
        );
        StripperRegistry {
            common: self.common,
            families: self.families,
        }
    }
}

// ─── Frozen Registry ─────────────────────────────────────────────────────────

/// Immutable mapping from shader family to rule chain.
#[derive(Debug)]
pub struct StripperRegistry {
    common: RuleChain,
    families: FxHashMap<ShaderFamily, RuleChain>,
}

impl StripperRegistry {
    #[must_use]
    pub fn builder() -> StripperRegistryBuilder {
        StripperRegistryBuilder::new()
    }

    /// The chain applied to `family`, or `None` if the family was never
    /// registered.
    #[must_use]
    pub fn resolve(&self, family: ShaderFamily) -> Option<ResolvedChain<'_>> {
        self.families.get(&family).map(|specific| ResolvedChain {
            common: &self.common,
            specific,
        })
    }

    #[must_use]
    pub fn is_registered(&self, family: ShaderFamily) -> bool {
        self.families.contains_key(&family)
    }

    #[must_use]
    pub fn common(&self) -> &RuleChain {
        &self.common
    }

    #[must_use]
    pub fn family_count(&self) -> usize {
        self.families.len()
    }

    pub fn families(&self) -> impl Iterator<Item = ShaderFamily> + '_ {
        self.families.keys().copied()
    }
}

/// The common chain followed by one family's chain, viewed as one sequence.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedChain<'a> {
    common: &'a RuleChain,
    specific: &'a RuleChain,
}

impl<'a> ResolvedChain<'a> {
    /// All rules in evaluation order.
    pub fn iter(self) -> impl Iterator<Item = &'a dyn StripRule> + 'a {
        self.common.iter().chain(self.specific.iter())
    }

    #[must_use]
    pub fn len(self) -> usize {
        self.common.len() + self.specific.len()
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// The family-specific part of the chain.
    #[must_use]
    pub fn specific(self) -> &'a RuleChain {
        self.specific
    }

    /// The first rule that strips `variant`, if any.
    #[must_use]
    pub fn first_match(
        self,
        variant: &ShaderVariantKey,
        config: &ConfigurationSnapshot,
    ) -> Option<&'a dyn StripRule> {
        self.iter().find(|rule| rule.should_strip(variant, config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::CommonRule;

    struct LitPreprocessor;

    impl ShaderPreprocessor for LitPreprocessor {
        fn family(&self) -> ShaderFamily {
            ShaderFamily::new("Lit")
        }

        fn stripper_rules(&self) -> RuleChain {
            RuleChain::new().with_fn("lit-distortion", |v, _| v.pass().name() == "DistortionVectors")
        }
    }

    #[test]
    fn test_unknown_family_resolves_to_none() {
        let registry = StripperRegistry::builder().build();
        assert!(registry.resolve(ShaderFamily::new("NeverRegistered")).is_none());
    }

    #[test]
    fn test_common_rules_come_first() {
        let registry = StripperRegistry::builder()
            .register_preprocessor(&LitPreprocessor)
            .build();

        let chain = registry.resolve(ShaderFamily::new("Lit")).unwrap();
        let names: Vec<_> = chain.iter().map(|r| r.name().to_string()).collect();

        assert_eq!(chain.len(), CommonRule::ALL.len() + 1);
        assert_eq!(names[0], CommonRule::ShadowQualityMismatch.as_str());
        assert_eq!(names.last().map(String::as_str), Some("lit-distortion"));
    }

    #[test]
    fn test_reregistration_replaces() {
        let family = ShaderFamily::new("Unlit");
        let mut builder = StripperRegistry::builder();
        assert!(!builder.is_registered(family));

        builder.insert(family, RuleChain::new().with_fn("a", |_, _| false));
        assert!(builder.is_registered(family));

        let registry = builder
            .register(family, RuleChain::new().with_fn("b", |_, _| false).with_fn("c", |_, _| false))
            .build();

        let chain = registry.resolve(family).unwrap();
        assert_eq!(chain.specific().names().collect::<Vec<_>>(), vec!["b", "c"]);
        assert_eq!(registry.family_count(), 1);
        assert_eq!(registry.families().collect::<Vec<_>>(), vec![family]);
        assert!(registry.is_registered(family));
        assert!(!registry.is_registered(ShaderFamily::new("Lit")));
    }

    #[test]
    fn test_custom_common_chain() {
        let family = ShaderFamily::new("Lit");
        let registry = StripperRegistryBuilder::with_common_chain(
            RuleChain::new().with_fn("only-common", |_, _| false),
        )
        .register_common_only(family)
        .build();

        assert_eq!(registry.common().names().collect::<Vec<_>>(), vec!["only-common"]);
        assert_eq!(registry.resolve(family).unwrap().len(), 1);

        let standard = StripperRegistry::builder().build();
        assert_eq!(standard.common().len(), CommonRule::ALL.len());
    }
}
