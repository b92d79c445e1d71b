//! Common Stripping Policy
//!
//! Rules shared by every shader family. They are evaluated first, in the
//! order of [`CommonRule::ALL`], and the first rule that fires strips the
//! variant:
//!
//! | # | Rule                          | Strips when                                           |
//! |---|-------------------------------|-------------------------------------------------------|
//! | 1 | `shadow-quality-mismatch`     | a shadow tier keyword other than the selected tier    |
//! | 2 | `scene-selection-pass`        | the editor-only scene selection pass, always          |
//! | 3 | `motion-vectors-pass`         | motion vector pass with motion vectors disabled       |
//! | 4 | `transparent-tile-lighting`   | transparent + tile lighting (transparents use cluster)|
//! | 5 | `debug-display`               | debug display without runtime debug display support   |
//! | 6 | `lod-cross-fade`              | LOD cross-fade without dithering cross-fade support   |
//! | 7 | `decal-mode`                  | a decal keyword not matching the decal mode           |
//! | 8 | `light-layers`                | light layers keyword without light layer support      |
//!
//! Opaque variants keep both tile and cluster lighting: which one runs depends
//! on per-view MSAA settings that are unknown at build time.

use strip_core::{ConfigurationSnapshot, KeywordCatalog, LightType, ShaderVariantKey};

use crate::rule::{RuleChain, StripRule};

/// One rule of the common policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommonRule {
    ShadowQualityMismatch,
    SceneSelectionPass,
    MotionVectorsPass,
    TransparentTileLighting,
    DebugDisplay,
    LodCrossFade,
    DecalMode,
    LightLayers,
}

impl CommonRule {
    /// Evaluation order of the common policy.
    pub const ALL: [CommonRule; 8] = [
        Self::ShadowQualityMismatch,
        Self::SceneSelectionPass,
        Self::MotionVectorsPass,
        Self::TransparentTileLighting,
        Self::DebugDisplay,
        Self::LodCrossFade,
        Self::DecalMode,
        Self::LightLayers,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ShadowQualityMismatch => "shadow-quality-mismatch",
            Self::SceneSelectionPass => "scene-selection-pass",
            Self::MotionVectorsPass => "motion-vectors-pass",
            Self::TransparentTileLighting => "transparent-tile-lighting",
            Self::DebugDisplay => "debug-display",
            Self::LodCrossFade => "lod-cross-fade",
            Self::DecalMode => "decal-mode",
            Self::LightLayers => "light-layers",
        }
    }

    /// Evaluates this single rule.
    #[must_use]
    pub fn matches(self, variant: &ShaderVariantKey, config: &ConfigurationSnapshot) -> bool {
        let kw = KeywordCatalog::get();
        let keywords = variant.keywords();

        match self {
            Self::ShadowQualityMismatch => LightType::ALL.into_iter().any(|light| {
                let selected = config.shadow_quality(light);
                kw.shadow_tiers(light)
                    .iter()
                    .any(|(tier, keyword)| tier != selected && keywords.is_enabled(keyword))
            }),

            Self::SceneSelectionPass => variant.pass() == kw.scene_selection_pass,

            Self::MotionVectorsPass => {
                variant.pass() == kw.motion_vectors_pass && !config.motion_vectors_enabled()
            }

            Self::TransparentTileLighting => {
                keywords.is_enabled(kw.transparent) && keywords.is_enabled(kw.tile_lighting)
            }

            // Driven by the configuration flag only, whatever the build type.
            Self::DebugDisplay => {
                keywords.is_enabled(kw.debug_display) && !config.runtime_debug_display_enabled()
            }

            Self::LodCrossFade => {
                keywords.is_enabled(kw.lod_fade_cross_fade)
                    && !config.dithering_cross_fade_enabled()
            }

            Self::DecalMode => {
                if config.decals_enabled() {
                    keywords.is_enabled(kw.decals_off)
                        || (keywords.is_enabled(kw.decals_3rt) && config.decal_per_channel_mask())
                        || (keywords.is_enabled(kw.decals_4rt) && !config.decal_per_channel_mask())
                } else {
                    keywords.is_any_enabled(&[kw.decals_3rt, kw.decals_4rt])
                }
            }

            Self::LightLayers => {
                keywords.is_enabled(kw.light_layers) && !config.light_layers_enabled()
            }
        }
    }
}

impl StripRule for CommonRule {
    fn name(&self) -> &str {
        self.as_str()
    }

    #[inline]
    fn should_strip(&self, variant: &ShaderVariantKey, config: &ConfigurationSnapshot) -> bool {
        self.matches(variant, config)
    }
}

/// The first common rule that strips `variant`, if any.
#[must_use]
pub fn common_strip_reason(
    variant: &ShaderVariantKey,
    config: &ConfigurationSnapshot,
) -> Option<CommonRule> {
    CommonRule::ALL
        .into_iter()
        .find(|rule| rule.matches(variant, config))
}

/// Builds the common chain, one entry per [`CommonRule`] in policy order.
#[must_use]
pub fn common_chain() -> RuleChain {
    CommonRule::ALL
        .into_iter()
        .fold(RuleChain::new(), |chain, rule| chain.with(rule))
}

#[cfg(test)]
mod tests {
    use super::*;
    use strip_core::{DecalMode, PipelineFeatures, ShadowQuality, names};

    fn key(pass: &str, keywords: &[&str]) -> ShaderVariantKey {
        ShaderVariantKey::from_names("Lit", pass, keywords)
    }

    fn permissive() -> ConfigurationSnapshot {
        ConfigurationSnapshot {
            features: PipelineFeatures::all(),
            decal_mode: DecalMode::ThreeRenderTargets,
            ..Default::default()
        }
    }

    #[test]
    fn test_plain_variant_is_kept() {
        assert_eq!(common_strip_reason(&key("Forward", &[]), &permissive()), None);
    }

    #[test]
    fn test_directional_mismatch_alone_strips() {
        let config = ConfigurationSnapshot {
            directional_shadow_quality: ShadowQuality::High,
            ..permissive()
        };
        let v = key("Forward", &[names::PUNCTUAL_SHADOW_LOW, names::DIRECTIONAL_SHADOW_MEDIUM]);

        assert_eq!(
            common_strip_reason(&v, &config),
            Some(CommonRule::ShadowQualityMismatch)
        );
    }

    #[test]
    fn test_shadow_rule_wins_over_later_rules() {
        let v = key(names::SCENE_SELECTION_PASS, &[names::PUNCTUAL_SHADOW_HIGH]);
        assert_eq!(
            common_strip_reason(&v, &permissive()),
            Some(CommonRule::ShadowQualityMismatch)
        );
    }

    #[test]
    fn test_opaque_keeps_tile_lighting() {
        let v = key("Forward", &[names::TILE_LIGHTING]);
        assert_eq!(common_strip_reason(&v, &permissive()), None);
    }

    #[test]
    fn test_decal_off_kept_only_without_decals() {
        let v = key("GBuffer", &[names::DECALS_OFF]);
        assert_eq!(
            common_strip_reason(&v, &permissive()),
            Some(CommonRule::DecalMode)
        );

        let no_decals = ConfigurationSnapshot {
            decal_mode: DecalMode::Off,
            ..permissive()
        };
        assert_eq!(common_strip_reason(&v, &no_decals), None);
    }

    #[test]
    fn test_chain_matches_policy_order() {
        let chain = common_chain();
        let expected: Vec<_> = CommonRule::ALL.iter().map(|r| r.as_str()).collect();
        assert_eq!(chain.names().collect::<Vec<_>>(), expected);
    }
}
