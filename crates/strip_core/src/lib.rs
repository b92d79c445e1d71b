//! Core data model for shader variant stripping.
//!
//! - [`KeywordCatalog`]: the fixed keyword and pass identities the common
//!   policy inspects
//! - [`KeywordSet`] / [`ShaderVariantKey`]: one candidate variant
//! - [`ConfigurationSnapshot`]: the pipeline settings decisions depend on
//! - [`StripError`]: input validation failures

pub mod catalog;
pub mod config;
pub mod errors;
pub mod interner;
pub mod keyword;
pub mod variant;

pub use catalog::{KeywordCatalog, LightType, QualityTierMap, ShadowQuality, names};
pub use config::{ConfigurationSnapshot, DecalMode, PipelineFeatures, RenderPipelineSettings};
pub use errors::{Result, StripError};
pub use keyword::{Keyword, KeywordSet};
pub use variant::{PassName, ShaderFamily, ShaderVariantKey, VariantDescriptor, variants_from_json};
