//! Variant Evaluation Pipeline
//!
//! Filters the candidate variants of a build down to the ones that must be
//! compiled. For every variant the pipeline resolves the rule chain of its
//! shader family and strips it on the first rule that fires.
//!
//! # Guarantees
//!
//! - Kept variants are returned in input order.
//! - Variants of unregistered families are always kept, with a warning. Over
//!   retention only costs build time, while an unintended strip removes a
//!   variant running content needs.
//! - When the configuration's master switch is off, nothing is stripped.
//! - Evaluation never mutates the configuration, catalog or registry, so the
//!   same pipeline can be driven from several threads.
//!
//! # Parallelism
//!
//! Decisions depend only on one variant and the shared, immutable
//! configuration. [`evaluate_parallel`](VariantEvaluationPipeline::evaluate_parallel)
//! spreads the list over the rayon pool and
//! [`evaluate_partitioned`](VariantEvaluationPipeline::evaluate_partitioned)
//! additionally stops submitting partitions once a cancellation flag is set.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;
use strip_core::{ConfigurationSnapshot, ShaderFamily, ShaderVariantKey};

use crate::registry::StripperRegistry;
use crate::rule::StripRule;

// ─── Decisions ───────────────────────────────────────────────────────────────

/// Why a variant was kept or stripped.
#[derive(Debug, Clone, Copy)]
pub enum StripDecision<'a> {
    /// No rule in the family's chain fired.
    Keep,
    /// The family has no registered chain.
    KeepUnknownFamily,
    /// Stripping is disabled by configuration.
    KeepStrippingDisabled,
    /// Stripped by the given rule.
    Strip(&'a dyn StripRule),
}

impl StripDecision<'_> {
    #[inline]
    #[must_use]
    pub fn is_strip(&self) -> bool {
        matches!(self, Self::Strip(_))
    }

    /// Name of the rule that stripped the variant.
    #[must_use]
    pub fn rule_name(&self) -> Option<&str> {
        match self {
            Self::Strip(rule) => Some(rule.name()),
            _ => None,
        }
    }
}

// ─── Report ──────────────────────────────────────────────────────────────────

/// Diagnostic tallies for one evaluation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StripReport {
    pub total: usize,
    pub stripped: usize,
    pub kept: usize,
    /// Strips per rule name, ordered by name.
    pub by_rule: BTreeMap<String, usize>,
    /// Distinct unregistered families that were retained.
    pub unknown_families: Vec<ShaderFamily>,
    /// Variants retained because their family was unregistered.
    pub unknown_family_retained: usize,
}

impl StripReport {
    fn record(&mut self, decision: &StripDecision<'_>, family: ShaderFamily) {
        self.total += 1;
        match decision {
            StripDecision::Strip(rule) => {
                self.stripped += 1;
                *self.by_rule.entry(rule.name().to_string()).or_default() += 1;
            }
            StripDecision::KeepUnknownFamily => {
                self.kept += 1;
                self.unknown_family_retained += 1;
                if !self.unknown_families.contains(&family) {
                    self.unknown_families.push(family);
                }
            }
            StripDecision::Keep | StripDecision::KeepStrippingDisabled => self.kept += 1,
        }
    }

    fn merge(&mut self, other: StripReport) {
        self.total += other.total;
        self.stripped += other.stripped;
        self.kept += other.kept;
        self.unknown_family_retained += other.unknown_family_retained;
        for (rule, count) in other.by_rule {
            *self.by_rule.entry(rule).or_default() += count;
        }
        for family in other.unknown_families {
            if !self.unknown_families.contains(&family) {
                self.unknown_families.push(family);
            }
        }
    }
}

impl fmt::Display for StripReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "variants: {} total, {} kept, {} stripped",
            self.total, self.kept, self.stripped
        )?;
        for (rule, count) in &self.by_rule {
            writeln!(f, "  {rule:<28} {count}")?;
        }
        if !self.unknown_families.is_empty() {
            write!(f, "  unregistered families kept:")?;
            for family in &self.unknown_families {
                write!(f, " {family}")?;
            }
            writeln!(f, " ({} variants)", self.unknown_family_retained)?;
        }
        Ok(())
    }
}

/// Result of one evaluation pass.
#[derive(Debug, Clone, Default)]
pub struct StripOutcome {
    /// Variants to compile, in input order.
    pub kept: Vec<ShaderVariantKey>,
    pub report: StripReport,
}

impl StripOutcome {
    #[inline]
    #[must_use]
    pub fn stripped_count(&self) -> usize {
        self.report.stripped
    }
}

/// Result of a cancellable, partitioned evaluation.
#[derive(Debug, Clone, Default)]
pub struct PartialOutcome {
    /// Outcome for every variant that was evaluated.
    pub outcome: StripOutcome,
    /// Variants from partitions that were never submitted, in input order.
    pub unevaluated: Vec<ShaderVariantKey>,
}

impl PartialOutcome {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.unevaluated.is_empty()
    }
}

// ─── Pipeline ────────────────────────────────────────────────────────────────

/// Applies a frozen [`StripperRegistry`] to lists of candidate variants.
#[derive(Debug)]
pub struct VariantEvaluationPipeline {
    registry: StripperRegistry,
}

impl VariantEvaluationPipeline {
    #[must_use]
    pub fn new(registry: StripperRegistry) -> Self {
        Self { registry }
    }

    #[must_use]
    pub fn registry(&self) -> &StripperRegistry {
        &self.registry
    }

    /// Decides the fate of a single variant.
    #[must_use]
    pub fn decide(
        &self,
        variant: &ShaderVariantKey,
        config: &ConfigurationSnapshot,
    ) -> StripDecision<'_> {
        if !config.stripping_enabled {
            return StripDecision::KeepStrippingDisabled;
        }

        match self.registry.resolve(variant.family()) {
            None => StripDecision::KeepUnknownFamily,
            Some(chain) => chain
                .first_match(variant, config)
                .map_or(StripDecision::Keep, StripDecision::Strip),
        }
    }

    /// Filters `variants` on the calling thread.
    #[must_use]
    pub fn evaluate(
        &self,
        variants: Vec<ShaderVariantKey>,
        config: &ConfigurationSnapshot,
    ) -> StripOutcome {
        let mut report = StripReport::default();
        let mut kept = Vec::with_capacity(variants.len());

        for variant in variants {
            let decision = self.decide(&variant, config);
            self.trace_decision(&variant, &decision);
            report.record(&decision, variant.family());
            if !decision.is_strip() {
                kept.push(variant);
            }
        }

        let outcome = StripOutcome { kept, report };
        Self::log_outcome(&outcome, config);
        outcome
    }

    /// Filters `variants` across the rayon thread pool.
    ///
    /// Produces exactly the same outcome as [`evaluate`](Self::evaluate).
    #[must_use]
    pub fn evaluate_parallel(
        &self,
        variants: Vec<ShaderVariantKey>,
        config: &ConfigurationSnapshot,
    ) -> StripOutcome {
        let outcome = self.evaluate_chunk(variants, config);
        Self::log_outcome(&outcome, config);
        outcome
    }

    /// Evaluates `variants` in partitions of `partition_size`, each partition
    /// in parallel, checking `cancel` before submitting the next one.
    ///
    /// Results for partitions already evaluated stay valid after
    /// cancellation; the untouched remainder is handed back unchanged.
    #[must_use]
    pub fn evaluate_partitioned(
        &self,
        variants: Vec<ShaderVariantKey>,
        config: &ConfigurationSnapshot,
        partition_size: usize,
        cancel: &AtomicBool,
    ) -> PartialOutcome {
        let partition_size = partition_size.max(1);
        let mut result = PartialOutcome::default();
        let mut remaining = variants.into_iter();

        loop {
            if cancel.load(Ordering::Relaxed) {
                result.unevaluated = remaining.collect();
                log::info!(
                    "Shader variant stripping cancelled: {} variants left unevaluated",
                    result.unevaluated.len()
                );
                break;
            }

            let partition: Vec<_> = remaining.by_ref().take(partition_size).collect();
            if partition.is_empty() {
                break;
            }

            let chunk = self.evaluate_chunk(partition, config);
            result.outcome.kept.extend(chunk.kept);
            result.outcome.report.merge(chunk.report);
        }

        Self::log_outcome(&result.outcome, config);
        result
    }

    fn evaluate_chunk(
        &self,
        variants: Vec<ShaderVariantKey>,
        config: &ConfigurationSnapshot,
    ) -> StripOutcome {
        let decided: Vec<(ShaderVariantKey, StripDecision<'_>)> = variants
            .into_par_iter()
            .map(|variant| {
                let decision = self.decide(&variant, config);
                (variant, decision)
            })
            .collect();

        let mut report = StripReport::default();
        let mut kept = Vec::with_capacity(decided.len());
        for (variant, decision) in decided {
            self.trace_decision(&variant, &decision);
            report.record(&decision, variant.family());
            if !decision.is_strip() {
                kept.push(variant);
            }
        }

        StripOutcome { kept, report }
    }

    fn trace_decision(&self, variant: &ShaderVariantKey, decision: &StripDecision<'_>) {
        match decision {
            StripDecision::Strip(rule) => {
                log::trace!("Stripped {variant} by '{}'", rule.name());
            }
            StripDecision::KeepUnknownFamily => {
                log::trace!(
                    "Kept {variant}: family has no rules ({} registered)",
                    self.registry.family_count()
                );
            }
            StripDecision::Keep | StripDecision::KeepStrippingDisabled => {}
        }
    }

    fn log_outcome(outcome: &StripOutcome, config: &ConfigurationSnapshot) {
        let report = &outcome.report;

        if !config.stripping_enabled {
            log::debug!(
                "Shader variant stripping disabled by configuration, keeping all {} variants",
                report.total
            );
        }

        for family in &report.unknown_families {
            log::warn!(
                "Shader family '{family}' has no registered stripper rules, keeping all of its variants"
            );
        }

        log::info!(
            "Shader variant stripping: kept {} of {} variants ({} stripped)",
            report.kept,
            report.total,
            report.stripped
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::RuleChain;
    use strip_core::names;

    fn pipeline() -> VariantEvaluationPipeline {
        VariantEvaluationPipeline::new(
            StripperRegistry::builder()
                .register_common_only(ShaderFamily::new("Lit"))
                .build(),
        )
    }

    #[test]
    fn test_decide_names_rule() {
        let p = pipeline();
        let v = ShaderVariantKey::from_names("Lit", names::SCENE_SELECTION_PASS, &[]);
        let decision = p.decide(&v, &ConfigurationSnapshot::default());

        assert_eq!(decision.rule_name(), Some("scene-selection-pass"));
    }

    #[test]
    fn test_master_switch_keeps_everything() {
        let p = pipeline();
        let config = ConfigurationSnapshot {
            stripping_enabled: false,
            ..Default::default()
        };
        let variants = vec![
            ShaderVariantKey::from_names("Lit", names::SCENE_SELECTION_PASS, &[]),
            ShaderVariantKey::from_names("Lit", names::MOTION_VECTORS_PASS, &[]),
        ];

        let outcome = p.evaluate(variants.clone(), &config);
        assert_eq!(outcome.kept, variants);
        assert_eq!(outcome.stripped_count(), 0);
    }

    #[test]
    fn test_unknown_family_is_retained_and_reported() {
        let p = pipeline();
        let variants = vec![
            ShaderVariantKey::from_names("Terrain", names::SCENE_SELECTION_PASS, &[]),
            ShaderVariantKey::from_names("Terrain", "Forward", &[]),
        ];

        let outcome = p.evaluate(variants, &ConfigurationSnapshot::default());
        assert_eq!(outcome.kept.len(), 2);
        assert_eq!(outcome.report.unknown_family_retained, 2);
        assert_eq!(outcome.report.unknown_families, vec![ShaderFamily::new("Terrain")]);
    }

    #[test]
    fn test_family_rule_applies_after_common() {
        let family = ShaderFamily::new("Hair");
        let p = VariantEvaluationPipeline::new(
            StripperRegistry::builder()
                .register(
                    family,
                    RuleChain::new().with_fn("hair-no-meta", |v, _| v.pass().name() == "META"),
                )
                .build(),
        );

        let outcome = p.evaluate(
            vec![
                ShaderVariantKey::from_names("Hair", "META", &[]),
                ShaderVariantKey::from_names("Hair", "Forward", &[]),
            ],
            &ConfigurationSnapshot::default(),
        );

        assert_eq!(outcome.kept.len(), 1);
        assert_eq!(outcome.report.by_rule.get("hair-no-meta"), Some(&1));
    }

    #[test]
    fn test_cancelled_before_start_evaluates_nothing() {
        let p = pipeline();
        let cancel = AtomicBool::new(true);
        let variants = vec![ShaderVariantKey::from_names("Lit", "Forward", &[]); 5];

        let partial = p.evaluate_partitioned(
            variants.clone(),
            &ConfigurationSnapshot::default(),
            2,
            &cancel,
        );
        assert!(!partial.is_complete());
        assert_eq!(partial.unevaluated, variants);
        assert_eq!(partial.outcome.report.total, 0);
    }
}
