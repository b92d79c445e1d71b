//! Stripping rules and their evaluation.
//!
//! - [`rule`]: the [`StripRule`] predicate trait and ordered [`RuleChain`]s
//! - [`common`]: the policy shared by every shader family
//! - [`registry`]: per-family rule chains, frozen before evaluation
//! - [`pipeline`]: filtering candidate variant lists

pub mod common;
pub mod pipeline;
pub mod registry;
pub mod rule;

pub use common::{CommonRule, common_chain, common_strip_reason};
pub use pipeline::{PartialOutcome, StripDecision, StripOutcome, StripReport, VariantEvaluationPipeline};
pub use registry::{ResolvedChain, ShaderPreprocessor, StripperRegistry, StripperRegistryBuilder};
pub use rule::{FnRule, RuleChain, StripRule};
