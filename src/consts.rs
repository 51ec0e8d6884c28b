// ===== chromaforge/src/consts.rs =====

/// Number of hue steps on the tone circle (PCCS-style 24-hue wheel).
/// Hue distances are circular with this period.
pub const HUE_PERIOD: f64 = 24.0;

/// Degrees of LCh hue angle covered by one hue step (360 / 24).
pub const DEGREES_PER_HUE_STEP: f64 = 15.0;

/// Bounds of the coordinate box used for spatial partitioning:
/// axis 0 is CIELAB lightness, axes 1-2 are the a*/b* chroma axes.
pub const BOX_L_MIN: f64 = 0.0;
pub const BOX_L_MAX: f64 = 100.0;
pub const BOX_AB_MIN: f64 = -127.0;
pub const BOX_AB_MAX: f64 = 127.0;

/// Largest hue deviation (in hue steps) a preservation tolerance
/// ceiling may reach. A quarter of the hue circle.
pub const MAX_HUE_TOLERANCE: f64 = 6.0;

/// Largest tone-plane (lightness/chroma) deviation a preservation
/// tolerance ceiling may reach.
pub const MAX_TONE_TOLERANCE: f64 = 60.0;

/// Worst satisfaction degree above which a solution is accepted
/// without consulting the listener chain.
pub const AUTO_ACCEPT_DEGREE: f64 = 0.999;

/// Logistic steepness for the fixed-target relation.
pub const SQUASH_K_FIXED: f64 = 12.0;

/// Logistic steepness for the ratio relations.
pub const SQUASH_K_RATIO: f64 = 9.19;

/// Grid resolution (steps per axis) used for the coarse cell-size
/// estimate behind bottleneck detection.
pub const CELL_SIZE_RESOLUTION: usize = 8;

/// Slack allowed on a linear RGB channel before a color counts as
/// out of gamut.
pub const GAMUT_EPSILON: f64 = 1e-6;
