//! Keyword Catalog
//!
//! The fixed universe of keywords and pass names the common stripping policy
//! reasons about, built once per process.
//!
//! Shadow quality keywords are grouped into one [`QualityTierMap`] per
//! [`LightType`]. Each map is a constant table from tier to keyword; the two
//! maps never share a keyword.
//!
//! Family-specific rules may define their own keywords with [`Keyword::new`];
//! they do not need to be registered here.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::keyword::Keyword;
use crate::variant::PassName;

/// Preprocessor symbol names known to the common policy.
pub mod names {
    pub const TRANSPARENT: &str = "_SURFACE_TYPE_TRANSPARENT";
    pub const DEBUG_DISPLAY: &str = "DEBUG_DISPLAY";
    pub const TILE_LIGHTING: &str = "USE_FPTL_LIGHTLIST";
    pub const CLUSTER_LIGHTING: &str = "USE_CLUSTERED_LIGHTLIST";
    pub const LOD_FADE_CROSSFADE: &str = "LOD_FADE_CROSSFADE";
    pub const DECALS_OFF: &str = "DECALS_OFF";
    pub const DECALS_3RT: &str = "DECALS_3RT";
    pub const DECALS_4RT: &str = "DECALS_4RT";
    pub const LIGHT_LAYERS: &str = "LIGHT_LAYERS";

    pub const PUNCTUAL_SHADOW_LOW: &str = "PUNCTUAL_SHADOW_LOW";
    pub const PUNCTUAL_SHADOW_MEDIUM: &str = "PUNCTUAL_SHADOW_MEDIUM";
    pub const PUNCTUAL_SHADOW_HIGH: &str = "PUNCTUAL_SHADOW_HIGH";
    pub const DIRECTIONAL_SHADOW_LOW: &str = "DIRECTIONAL_SHADOW_LOW";
    pub const DIRECTIONAL_SHADOW_MEDIUM: &str = "DIRECTIONAL_SHADOW_MEDIUM";
    pub const DIRECTIONAL_SHADOW_HIGH: &str = "DIRECTIONAL_SHADOW_HIGH";

    pub const SCENE_SELECTION_PASS: &str = "SceneSelectionPass";
    pub const MOTION_VECTORS_PASS: &str = "Motion Vectors";
}

// ─── Shadow Quality ──────────────────────────────────────────────────────────

/// Shadow filtering quality tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum ShadowQuality {
    #[default]
    Low,
    Medium,
    High,
}

impl ShadowQuality {
    pub const ALL: [ShadowQuality; 3] = [Self::Low, Self::Medium, Self::High];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl fmt::Display for ShadowQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no shadow quality tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownShadowQuality;

impl FromStr for ShadowQuality {
    type Err = UnknownShadowQuality;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tier| tier.as_str() == s)
            .ok_or(UnknownShadowQuality)
    }
}

/// Light family a shadow quality tier applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightType {
    Punctual,
    Directional,
}

impl LightType {
    pub const ALL: [LightType; 2] = [Self::Punctual, Self::Directional];
}

impl fmt::Display for LightType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Punctual => "punctual",
            Self::Directional => "directional",
        })
    }
}

// ─── Quality Tier Map ────────────────────────────────────────────────────────

/// Constant, bijective table from [`ShadowQuality`] to the keyword compiled
/// for that tier, for one light type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualityTierMap {
    light: LightType,
    // Indexed by `ShadowQuality as usize`.
    keywords: [Keyword; 3],
}

impl QualityTierMap {
    /// Builds the table from the keywords of the Low, Medium and High tiers.
    ///
    /// # Panics
    /// Panics if two tiers share a keyword.
    #[must_use]
    pub fn new(light: LightType, low: Keyword, medium: Keyword, high: Keyword) -> Self {
        assert!(
            low != medium && medium != high && low != high,
            "{light} shadow tiers must map to distinct keywords"
        );
        Self {
            light,
            keywords: [low, medium, high],
        }
    }

    #[inline]
    #[must_use]
    pub fn light(&self) -> LightType {
        self.light
    }

    /// The keyword that marks `tier` as the compiled variant.
    #[inline]
    #[must_use]
    pub fn keyword(&self, tier: ShadowQuality) -> Keyword {
        self.keywords[tier as usize]
    }

    /// Reverse lookup: which tier a keyword selects, if it belongs here.
    #[must_use]
    pub fn tier_of(&self, keyword: Keyword) -> Option<ShadowQuality> {
        ShadowQuality::ALL
            .into_iter()
            .find(|&tier| self.keyword(tier) == keyword)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ShadowQuality, Keyword)> + '_ {
        ShadowQuality::ALL
            .into_iter()
            .map(|tier| (tier, self.keyword(tier)))
    }
}

// ─── Catalog ─────────────────────────────────────────────────────────────────

static CATALOG: LazyLock<KeywordCatalog> = LazyLock::new(KeywordCatalog::build);

/// Identities of every keyword and pass the common policy inspects.
#[derive(Debug, Clone)]
pub struct KeywordCatalog {
    pub transparent: Keyword,
    pub debug_display: Keyword,
    pub tile_lighting: Keyword,
    pub cluster_lighting: Keyword,
    pub lod_fade_cross_fade: Keyword,
    pub decals_off: Keyword,
    pub decals_3rt: Keyword,
    pub decals_4rt: Keyword,
    pub light_layers: Keyword,

    pub punctual_shadows: QualityTierMap,
    pub directional_shadows: QualityTierMap,

    pub scene_selection_pass: PassName,
    pub motion_vectors_pass: PassName,
}

impl KeywordCatalog {
    /// The process-wide catalog.
    #[inline]
    pub fn get() -> &'static KeywordCatalog {
        &CATALOG
    }

    fn build() -> Self {
        let catalog = Self {
            transparent: Keyword::new(names::TRANSPARENT),
            debug_display: Keyword::new(names::DEBUG_DISPLAY),
            tile_lighting: Keyword::new(names::TILE_LIGHTING),
            cluster_lighting: Keyword::new(names::CLUSTER_LIGHTING),
            lod_fade_cross_fade: Keyword::new(names::LOD_FADE_CROSSFADE),
            decals_off: Keyword::new(names::DECALS_OFF),
            decals_3rt: Keyword::new(names::DECALS_3RT),
            decals_4rt: Keyword::new(names::DECALS_4RT),
            light_layers: Keyword::new(names::LIGHT_LAYERS),

            punctual_shadows: QualityTierMap::new(
                LightType::Punctual,
                Keyword::new(names::PUNCTUAL_SHADOW_LOW),
                Keyword::new(names::PUNCTUAL_SHADOW_MEDIUM),
                Keyword::new(names::PUNCTUAL_SHADOW_HIGH),
            ),
            directional_shadows: QualityTierMap::new(
                LightType::Directional,
                Keyword::new(names::DIRECTIONAL_SHADOW_LOW),
                Keyword::new(names::DIRECTIONAL_SHADOW_MEDIUM),
                Keyword::new(names::DIRECTIONAL_SHADOW_HIGH),
            ),

            scene_selection_pass: PassName::new(names::SCENE_SELECTION_PASS),
            motion_vectors_pass: PassName::new(names::MOTION_VECTORS_PASS),
        };

        debug_assert!(
            catalog
                .punctual_shadows
                .iter()
                .all(|(_, kw)| catalog.directional_shadows.tier_of(kw).is_none()),
            "a shadow keyword belongs to both light types"
        );

        log::debug!("Keyword catalog initialized");
        catalog
    }

    /// Tier table for the given light type.
    #[inline]
    #[must_use]
    pub fn shadow_tiers(&self, light: LightType) -> &QualityTierMap {
        match light {
            LightType::Punctual => &self.punctual_shadows,
            LightType::Directional => &self.directional_shadows,
        }
    }
}
