//! Strip Rules & Rule Chains
//!
//! A [`StripRule`] is a pure decision function over a variant and a
//! configuration snapshot; `true` means "exclude this variant". A
//! [`RuleChain`] is an ordered list of rules evaluated until the first one
//! fires.
//!
//! Every rule's `true` is independently sufficient to strip, so chain order
//! only affects how early evaluation short-circuits, never the outcome.

use std::fmt;
use std::sync::Arc;

use strip_core::{ConfigurationSnapshot, ShaderVariantKey};

/// A side-effect-free stripping predicate.
///
/// Implementations must be deterministic: the same variant and configuration
/// always yield the same answer. Rules are shared across worker threads.
pub trait StripRule: Send + Sync + fmt::Debug {
    /// Stable, human-readable name used in diagnostics.
    fn name(&self) -> &str;

    /// Returns `true` if `variant` should be excluded from the build.
    fn should_strip(&self, variant: &ShaderVariantKey, config: &ConfigurationSnapshot) -> bool;
}

type RuleFn = dyn Fn(&ShaderVariantKey, &ConfigurationSnapshot) -> bool + Send + Sync;

/// A named closure rule, the usual way families add ad-hoc predicates.
///
/// ```rust,ignore
/// let rule = FnRule::new("strip-distortion", move |variant, _config| {
///     variant.pass() == distortion_pass
/// });
/// ```
pub struct FnRule {
    name: String,
    func: Box<RuleFn>,
}

impl FnRule {
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&ShaderVariantKey, &ConfigurationSnapshot) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Box::new(func),
        }
    }
}

impl fmt::Debug for FnRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnRule").field("name", &self.name).finish()
    }
}

impl StripRule for FnRule {
    fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    fn should_strip(&self, variant: &ShaderVariantKey, config: &ConfigurationSnapshot) -> bool {
        (self.func)(variant, config)
    }
}

/// Ordered sequence of rules for one shader family.
///
/// Cloning is cheap: rules are reference counted.
#[derive(Debug, Clone, Default)]
pub struct RuleChain {
    rules: Vec<Arc<dyn StripRule>>,
}

impl RuleChain {
    #[must_use]
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Appends a rule to the end of the chain.
    pub fn push(&mut self, rule: impl StripRule + 'static) {
        self.rules.push(Arc::new(rule));
    }

    /// Appends an already shared rule.
    pub fn push_shared(&mut self, rule: Arc<dyn StripRule>) {
        self.rules.push(rule);
    }

    /// Builder-style [`push`](Self::push).
    #[must_use]
    pub fn with(mut self, rule: impl StripRule + 'static) -> Self {
        self.push(rule);
        self
    }

    /// Builder-style closure rule.
    #[must_use]
    pub fn with_fn<F>(self, name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&ShaderVariantKey, &ConfigurationSnapshot) -> bool + Send + Sync + 'static,
    {
        self.with(FnRule::new(name, func))
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &dyn StripRule> + '_ {
        self.rules.iter().map(|rule| &**rule)
    }

    /// Rule names in evaluation order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.iter().map(|rule| rule.name())
    }

    /// The first rule that strips `variant`, if any.
    #[must_use]
    pub fn first_match(
        &self,
        variant: &ShaderVariantKey,
        config: &ConfigurationSnapshot,
    ) -> Option<&dyn StripRule> {
        self.iter().find(|rule| rule.should_strip(variant, config))
    }
}
