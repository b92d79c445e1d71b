//! Error Types
//!
//! The main error type [`StripError`] covers every way input to the stripping
//! engine can be rejected:
//! - Configuration invariant violations (fatal, evaluation must not start)
//! - Malformed serialized settings or variant lists
//!
//! Evaluation itself is infallible. Rules are total functions over typed
//! inputs; a panicking rule is a defect and is never caught.

use thiserror::Error;

use crate::catalog::LightType;

/// The main error type for shader variant stripping.
#[derive(Error, Debug)]
pub enum StripError {
    // ========================================================================
    // Configuration Invariant Violations
    // ========================================================================
    /// No shadow quality tier selected for a light type.
    #[error("Configuration invariant violated: no {light} shadow quality selected")]
    MissingShadowQuality {
        /// Light type lacking a tier
        light: LightType,
    },

    /// The selected shadow quality tier is not a known tier.
    #[error("Configuration invariant violated: unrecognized {light} shadow quality '{value}'")]
    UnknownShadowQuality {
        /// Light type the tier was given for
        light: LightType,
        /// The raw value found in the settings
        value: String,
    },

    // ========================================================================
    // Parsing Errors
    // ========================================================================
    /// Serialized pipeline settings could not be parsed.
    #[error("Settings parse error: {0}")]
    SettingsParse(#[source] serde_json::Error),

    /// Serialized variant list could not be parsed.
    #[error("Variant list parse error: {0}")]
    VariantJson(#[source] serde_json::Error),

    /// A variant descriptor is structurally invalid.
    #[error("Invalid variant: {0}")]
    VariantParse(String),
}

impl StripError {
    /// Whether this error reports a configuration that encodes an impossible
    /// state. Such errors must abort the build rather than fall back to a
    /// default.
    #[must_use]
    pub fn is_configuration_violation(&self) -> bool {
        matches!(
            self,
            Self::MissingShadowQuality { .. } | Self::UnknownShadowQuality { .. }
        )
    }
}

/// Alias for `Result<T, StripError>`.
pub type Result<T> = std::result::Result<T, StripError>;
