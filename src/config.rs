// ===== chromaforge/src/config.rs =====
use crate::color::Vision;
use crate::consts::{MAX_HUE_TOLERANCE, MAX_TONE_TOLERANCE};
use crate::error::{CfResult, ChromaForgeError};
use crate::solver::SearchStrategy;
use clap::Args;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Which relation/domain pairing drives a solve.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
pub enum ScoringStrategy {
    /// Independent per-vision target differences (pairs with the
    /// uniform domain factory).
    FixedTarget,
    /// Targets derived from the trichromatic separation via a shared
    /// ratio, aggregated by average (pairs with the adaptive domain
    /// factory).
    RatioAverage,
    /// Per-vision ratios, aggregated by minimum.
    RatioMinimum,
}

#[derive(Args, Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Parameters {
    #[command(flatten)]
    pub tolerances: ToleranceParams,
    #[command(flatten)]
    pub targets: TargetParams,
    #[command(flatten)]
    pub search: SearchParams,
}

#[derive(Args, Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToleranceParams {
    #[arg(long, action = clap::ArgAction::Set, default_value_t = true)]
    pub preserve_hue: bool,
    #[arg(long, action = clap::ArgAction::Set, default_value_t = true)]
    pub preserve_tone: bool,

    /// Allowed hue drift, in 24ths of the hue circle.
    #[arg(long, default_value_t = 2.0)]
    pub hue_tolerance: f64,
    /// Allowed lightness/chroma drift (Euclidean, tone plane).
    #[arg(long, default_value_t = 10.0)]
    pub tone_tolerance: f64,

    /// Per-slot tolerance shrink rate driven by normalized conspicuity
    /// (0 disables the weighting).
    #[arg(long, default_value_t = 0.0)]
    pub conspicuity_rate: f64,

    /// Global cap on a candidate's perceptual distance from the
    /// current color (uniform domain factory).
    #[arg(long, default_value_t = 30.0)]
    pub max_delta_e: f64,
}

#[derive(Args, Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TargetParams {
    #[arg(long, action = clap::ArgAction::Set, default_value_t = true)]
    pub enable_trichromacy: bool,
    #[arg(long, action = clap::ArgAction::Set, default_value_t = true)]
    pub enable_protanopia: bool,
    #[arg(long, action = clap::ArgAction::Set, default_value_t = true)]
    pub enable_deuteranopia: bool,
    #[arg(long, action = clap::ArgAction::Set, default_value_t = false)]
    pub enable_monochromacy: bool,

    /// Target pairwise differences for the fixed-target relation,
    /// one per vision (CIELAB distance).
    #[arg(long, default_value_t = 20.0)]
    pub target_trichromacy: f64,
    #[arg(long, default_value_t = 12.0)]
    pub target_protanopia: f64,
    #[arg(long, default_value_t = 12.0)]
    pub target_deuteranopia: f64,
    #[arg(long, default_value_t = 8.0)]
    pub target_monochromacy: f64,
}

#[derive(Args, Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchParams {
    #[arg(long, value_enum, default_value_t = ScoringStrategy::FixedTarget)]
    pub scoring: ScoringStrategy,
    #[arg(long, value_enum, default_value_t = SearchStrategy::ForwardChecking)]
    pub solver: SearchStrategy,

    #[arg(long, default_value_t = 8000)]
    pub time_limit_ms: u64,
    /// Worst satisfaction degree at which the solver may stop.
    #[arg(long, default_value_t = 0.8)]
    pub target_degree: f64,

    /// Grid steps per axis when sampling a slot's partition cell.
    #[arg(long, default_value_t = 6)]
    pub sample_resolution: usize,

    /// Fix every slot but the bottleneck and free the bottleneck
    /// against an unrestricted domain.
    #[arg(long, action = clap::ArgAction::Set, default_value_t = false)]
    pub bottleneck_mode: bool,

    /// Seed for the stochastic search strategies.
    #[arg(long)]
    pub seed: Option<u64>,
}

impl Default for ToleranceParams {
    fn default() -> Self {
        Self {
            preserve_hue: true,
            preserve_tone: true,
            hue_tolerance: 2.0,
            tone_tolerance: 10.0,
            conspicuity_rate: 0.0,
            max_delta_e: 30.0,
        }
    }
}

impl Default for TargetParams {
    fn default() -> Self {
        Self {
            enable_trichromacy: true,
            enable_protanopia: true,
            enable_deuteranopia: true,
            enable_monochromacy: false,
            target_trichromacy: 20.0,
            target_protanopia: 12.0,
            target_deuteranopia: 12.0,
            target_monochromacy: 8.0,
        }
    }
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            scoring: ScoringStrategy::FixedTarget,
            solver: SearchStrategy::ForwardChecking,
            time_limit_ms: 8000,
            target_degree: 0.8,
            sample_resolution: 6,
            bottleneck_mode: false,
            seed: None,
        }
    }
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            tolerances: ToleranceParams::default(),
            targets: TargetParams::default(),
            search: SearchParams::default(),
        }
    }
}

impl Parameters {
    /// Range checks for hosts that deserialize parameters from
    /// untrusted input. The adjuster itself tolerates any values the
    /// type system admits.
    pub fn validate(&self) -> CfResult<()> {
        if !(0.0..=1.0).contains(&self.search.target_degree) {
            return Err(ChromaForgeError::Config(format!(
                "target_degree {} outside [0, 1]",
                self.search.target_degree
            )));
        }
        if self.search.sample_resolution == 0 {
            return Err(ChromaForgeError::Config(
                "sample_resolution must be at least 1".into(),
            ));
        }
        if self.tolerances.hue_tolerance < 0.0
            || self.tolerances.tone_tolerance < 0.0
            || self.tolerances.max_delta_e <= 0.0
        {
            return Err(ChromaForgeError::Config(
                "tolerances must be positive".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.tolerances.conspicuity_rate) {
            return Err(ChromaForgeError::Config(format!(
                "conspicuity_rate {} outside [0, 1]",
                self.tolerances.conspicuity_rate
            )));
        }
        Ok(())
    }
}

impl TargetParams {
    pub fn enabled(&self, vision: Vision) -> bool {
        match vision {
            Vision::Trichromacy => self.enable_trichromacy,
            Vision::Protanopia => self.enable_protanopia,
            Vision::Deuteranopia => self.enable_deuteranopia,
            Vision::Monochromacy => self.enable_monochromacy,
        }
    }

    pub fn target(&self, vision: Vision) -> f64 {
        match vision {
            Vision::Trichromacy => self.target_trichromacy,
            Vision::Protanopia => self.target_protanopia,
            Vision::Deuteranopia => self.target_deuteranopia,
            Vision::Monochromacy => self.target_monochromacy,
        }
    }

    pub fn enabled_flags(&self) -> [bool; Vision::COUNT] {
        [
            self.enable_trichromacy,
            self.enable_protanopia,
            self.enable_deuteranopia,
            self.enable_monochromacy,
        ]
    }
}

impl ToleranceParams {
    /// Ceiling for the domain filter and the ratio relations:
    /// twice the tolerance, capped at the perceptual maximum.
    pub fn hue_ceiling(&self) -> f64 {
        (self.hue_tolerance * 2.0).min(MAX_HUE_TOLERANCE)
    }

    pub fn tone_ceiling(&self) -> f64 {
        (self.tone_tolerance * 2.0).min(MAX_TONE_TOLERANCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_pass_validation() {
        assert!(Parameters::default().validate().is_ok());
    }

    #[test]
    fn bad_ranges_are_rejected() {
        let mut p = Parameters::default();
        p.search.target_degree = 1.5;
        assert!(p.validate().is_err());

        let mut p = Parameters::default();
        p.search.sample_resolution = 0;
        assert!(p.validate().is_err());

        let mut p = Parameters::default();
        p.tolerances.max_delta_e = 0.0;
        assert!(p.validate().is_err());
    }

    #[test]
    fn ceilings_double_the_tolerance_up_to_the_maximum() {
        let mut t = ToleranceParams::default();
        assert_eq!(t.hue_ceiling(), 4.0);
        assert_eq!(t.tone_ceiling(), 20.0);

        t.hue_tolerance = 5.0;
        t.tone_tolerance = 40.0;
        assert_eq!(t.hue_ceiling(), MAX_HUE_TOLERANCE);
        assert_eq!(t.tone_ceiling(), MAX_TONE_TOLERANCE);
    }

    #[test]
    fn strategy_names_round_trip_through_strum() {
        use std::str::FromStr;
        assert_eq!(ScoringStrategy::FixedTarget.to_string(), "fixed_target");
        assert_eq!(
            ScoringStrategy::from_str("ratio_average").ok(),
            Some(ScoringStrategy::RatioAverage)
        );
    }
}
