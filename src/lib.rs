//! # Shader Strip
//!
//! Rule-based shader variant stripping. Given the candidate variants of a
//! shader build and a snapshot of the render pipeline configuration, decides
//! which variants must be compiled and which can be dropped.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use shader_strip::prelude::*;
//!
//! let config = ConfigurationSnapshot::from_json(&settings_json)?;
//! let pipeline = VariantEvaluationPipeline::new(
//!     StripperRegistry::builder()
//!         .register_common_only(ShaderFamily::new("Lit"))
//!         .build(),
//! );
//!
//! let outcome = pipeline.evaluate(variants, &config);
//! println!("{}", outcome.report);
//! ```
//!
//! # Crates
//!
//! - [`strip_core`]: keywords, variant keys, configuration snapshots
//! - [`strip_rules`]: common policy, registry, evaluation pipeline

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub use strip_core;
pub use strip_rules;

pub use strip_core::{
    ConfigurationSnapshot, DecalMode, Keyword, KeywordCatalog, KeywordSet, LightType, PassName,
    PipelineFeatures, QualityTierMap, RenderPipelineSettings, Result, ShaderFamily,
    ShaderVariantKey, ShadowQuality, StripError, names, variants_from_json,
};
pub use strip_rules::{
    CommonRule, FnRule, PartialOutcome, RuleChain, ShaderPreprocessor, StripDecision,
    StripOutcome, StripReport, StripRule, StripperRegistry, StripperRegistryBuilder,
    VariantEvaluationPipeline, common_chain, common_strip_reason,
};

/// Everything needed to configure and run a stripping pass.
pub mod prelude {
    pub use crate::{
        CommonRule, ConfigurationSnapshot, DecalMode, Keyword, KeywordSet, PipelineFeatures,
        RuleChain, ShaderFamily, ShaderPreprocessor, ShaderVariantKey, ShadowQuality,
        StripDecision, StripRule, StripperRegistry, VariantEvaluationPipeline,
    };
}

/// Builds a pipeline where every given family uses only the common policy.
#[must_use]
pub fn common_pipeline<I>(families: I) -> VariantEvaluationPipeline
where
    I: IntoIterator<Item = ShaderFamily>,
{
    let registry = families
        .into_iter()
        .fold(StripperRegistry::builder(), StripperRegistryBuilder::register_common_only)
        .build();
    log::debug!(
        "Common-only stripping pipeline with {} families",
        registry.family_count()
    );
    VariantEvaluationPipeline::new(registry)
}
