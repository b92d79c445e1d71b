//! Configuration Snapshot
//!
//! [`ConfigurationSnapshot`] is the flattened, immutable view of the render
//! pipeline settings that stripping decisions depend on. It is a small `Copy`
//! value passed explicitly into every rule call; no rule holds a reference to
//! a live settings object.
//!
//! The snapshot is typed so that impossible states cannot be expressed: each
//! light type has exactly one [`ShadowQuality`] and the decal mode is exactly
//! one [`DecalMode`]. Serialized settings enter through
//! [`RenderPipelineSettings`], whose conversion is where invariant violations
//! are detected.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use strip_core::{ConfigurationSnapshot, DecalMode, PipelineFeatures, ShadowQuality};
//!
//! let config = ConfigurationSnapshot {
//!     features: PipelineFeatures::MOTION_VECTORS,
//!     decal_mode: DecalMode::FourRenderTargets,
//!     punctual_shadow_quality: ShadowQuality::High,
//!     ..Default::default()
//! };
//! ```

use bitflags::bitflags;
use serde::Deserialize;

use crate::catalog::{LightType, ShadowQuality};
use crate::errors::{Result, StripError};

bitflags! {
    /// Optional pipeline features that gate shader variants.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct PipelineFeatures: u32 {
        const MOTION_VECTORS         = 1 << 0;
        const RUNTIME_DEBUG_DISPLAY  = 1 << 1;
        const DITHERING_CROSS_FADE   = 1 << 2;
        const LIGHT_LAYERS           = 1 << 3;
    }
}

/// How decals are written into the GBuffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DecalMode {
    /// Decals are not supported.
    #[default]
    Off,
    /// Decals supported, three decal render targets.
    ThreeRenderTargets,
    /// Decals supported with per-channel masks, four decal render targets.
    FourRenderTargets,
}

/// Immutable per-evaluation view of the active pipeline settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConfigurationSnapshot {
    pub features: PipelineFeatures,
    pub decal_mode: DecalMode,
    pub punctual_shadow_quality: ShadowQuality,
    pub directional_shadow_quality: ShadowQuality,
    /// Master switch. When `false` no variant is stripped at all.
    pub stripping_enabled: bool,
}

impl Default for ConfigurationSnapshot {
    fn default() -> Self {
        Self {
            features: PipelineFeatures::empty(),
            decal_mode: DecalMode::Off,
            punctual_shadow_quality: ShadowQuality::default(),
            directional_shadow_quality: ShadowQuality::default(),
            stripping_enabled: true,
        }
    }
}

impl ConfigurationSnapshot {
    /// Parses serialized [`RenderPipelineSettings`] JSON and validates it.
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: RenderPipelineSettings =
            serde_json::from_str(json).map_err(StripError::SettingsParse)?;
        Self::try_from(settings)
    }

    #[inline]
    #[must_use]
    pub fn motion_vectors_enabled(&self) -> bool {
        self.features.contains(PipelineFeatures::MOTION_VECTORS)
    }

    #[inline]
    #[must_use]
    pub fn runtime_debug_display_enabled(&self) -> bool {
        self.features.contains(PipelineFeatures::RUNTIME_DEBUG_DISPLAY)
    }

    #[inline]
    #[must_use]
    pub fn dithering_cross_fade_enabled(&self) -> bool {
        self.features.contains(PipelineFeatures::DITHERING_CROSS_FADE)
    }

    #[inline]
    #[must_use]
    pub fn light_layers_enabled(&self) -> bool {
        self.features.contains(PipelineFeatures::LIGHT_LAYERS)
    }

    #[inline]
    #[must_use]
    pub fn decals_enabled(&self) -> bool {
        self.decal_mode != DecalMode::Off
    }

    /// Whether decals use per-channel masks (the 4RT layout).
    #[inline]
    #[must_use]
    pub fn decal_per_channel_mask(&self) -> bool {
        self.decal_mode == DecalMode::FourRenderTargets
    }

    /// The tier currently selected for `light`.
    #[inline]
    #[must_use]
    pub fn shadow_quality(&self, light: LightType) -> ShadowQuality {
        match light {
            LightType::Punctual => self.punctual_shadow_quality,
            LightType::Directional => self.directional_shadow_quality,
        }
    }
}

// ─── Serialized Settings ─────────────────────────────────────────────────────

/// Serialized render pipeline settings as written by the settings editor.
///
/// Field names follow the asset's camelCase layout. Shadow tiers are kept as
/// raw strings here; they are validated when converting into a
/// [`ConfigurationSnapshot`].
///
/// Every feature flag must be present and unknown keys are rejected, so a
/// misspelled flag fails to parse instead of reading as disabled.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RenderPipelineSettings {
    pub motion_vectors_enabled: bool,
    pub runtime_debug_display_enabled: bool,
    pub dithering_cross_fade_enabled: bool,
    pub decals_enabled: bool,
    pub decal_per_channel_mask: bool,
    pub light_layers_enabled: bool,
    pub punctual_shadow_quality: Option<String>,
    pub directional_shadow_quality: Option<String>,
    #[serde(default = "stripping_allowed")]
    pub allow_shader_variant_stripping: bool,
}

fn stripping_allowed() -> bool {
    true
}

impl Default for RenderPipelineSettings {
    fn default() -> Self {
        Self {
            motion_vectors_enabled: false,
            runtime_debug_display_enabled: false,
            dithering_cross_fade_enabled: false,
            decals_enabled: false,
            decal_per_channel_mask: false,
            light_layers_enabled: false,
            punctual_shadow_quality: None,
            directional_shadow_quality: None,
            allow_shader_variant_stripping: stripping_allowed(),
        }
    }
}

fn parse_tier(light: LightType, raw: Option<&str>) -> Result<ShadowQuality> {
    let raw = raw.ok_or(StripError::MissingShadowQuality { light })?;
    raw.parse()
        .map_err(|_| StripError::UnknownShadowQuality {
            light,
            value: raw.to_string(),
        })
}

impl TryFrom<RenderPipelineSettings> for ConfigurationSnapshot {
    type Error = StripError;

    fn try_from(settings: RenderPipelineSettings) -> Result<Self> {
        let punctual_shadow_quality = parse_tier(
            LightType::Punctual,
            settings.punctual_shadow_quality.as_deref(),
        )?;
        let directional_shadow_quality = parse_tier(
            LightType::Directional,
            settings.directional_shadow_quality.as_deref(),
        )?;

        let decal_mode = match (settings.decals_enabled, settings.decal_per_channel_mask) {
            (false, per_channel) => {
                if per_channel {
                    log::debug!("decalPerChannelMask is ignored while decals are disabled");
                }
                DecalMode::Off
            }
            (true, false) => DecalMode::ThreeRenderTargets,
            (true, true) => DecalMode::FourRenderTargets,
        };

        let mut features = PipelineFeatures::empty();
        features.set(
            PipelineFeatures::MOTION_VECTORS,
            settings.motion_vectors_enabled,
        );
        features.set(
            PipelineFeatures::RUNTIME_DEBUG_DISPLAY,
            settings.runtime_debug_display_enabled,
        );
        features.set(
            PipelineFeatures::DITHERING_CROSS_FADE,
            settings.dithering_cross_fade_enabled,
        );
        features.set(
            PipelineFeatures::LIGHT_LAYERS,
            settings.light_layers_enabled,
        );

        Ok(Self {
            features,
            decal_mode,
            punctual_shadow_quality,
            directional_shadow_quality,
            stripping_enabled: settings.allow_shader_variant_stripping,
        })
    }
}
