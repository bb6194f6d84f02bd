//! Numerical and physical parameters for the simulation
//!
//! `SimulationConfig` holds the runtime settings the UI can change between
//! ticks:
//! - gravitational constant and friction for the integrator,
//! - trail fade for the renderer,
//! - spawn interval and particle cap for the spawner
//!
//! `CollisionParams` holds the caller-side throttle for the collision scan.

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// Distance-squared floor for the force law, keeps the force finite when a
/// particle sits on top of a well
pub const SOFTENING: f64 = 1000.0;

/// Two particles closer than this (squared) count as colliding, roughly a
/// 2px radius
pub const COLLISION_DIST_SQ: f64 = 16.0;

/// Inward speed of freshly spawned particles
pub const SPAWN_SPEED: f64 = 2.0;

/// Particle size range `[min, max)`
pub const PARTICLE_SIZE_MIN: f64 = 0.5;
pub const PARTICLE_SIZE_MAX: f64 = 2.0;

/// Mass range `[min, max)` for wells placed by a click
pub const CLICK_WELL_MASS_MIN: f64 = 1000.0;
pub const CLICK_WELL_MASS_MAX: f64 = 2000.0;
pub const CLICK_WELL_COLOR: &str = "#ffffff";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub gravity_constant: f64, // > 0
    pub friction: f64, // (0, 1], 1 = frictionless
    pub trail_fade: f64, // [0, 1], renderer only
    pub spawn_interval_ticks: u64, // >= 1
    pub max_particles: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            gravity_constant: 0.5,
            friction: 0.999,
            trail_fade: 0.05,
            spawn_interval_ticks: 5,
            max_particles: 800,
        }
    }
}

impl SimulationConfig {
    /// Check every field against its domain
    pub fn validate(&self) -> SimResult<()> {
        if !(self.gravity_constant > 0.0 && self.gravity_constant.is_finite()) {
            return Err(SimError::InvalidConfig {
                name: "gravity_constant",
                value: self.gravity_constant,
                valid_range: "(0.0, inf)",
            });
        }
        if !(self.friction > 0.0 && self.friction <= 1.0) {
            return Err(SimError::InvalidConfig {
                name: "friction",
                value: self.friction,
                valid_range: "(0.0, 1.0]",
            });
        }
        if !(0.0..=1.0).contains(&self.trail_fade) {
            return Err(SimError::InvalidConfig {
                name: "trail_fade",
                value: self.trail_fade,
                valid_range: "[0.0, 1.0]",
            });
        }
        if self.spawn_interval_ticks == 0 {
            return Err(SimError::InvalidConfig {
                name: "spawn_interval_ticks",
                value: 0.0,
                valid_range: "[1, inf)",
            });
        }
        Ok(())
    }

    /// Pull every field into its domain, for slider-style input.
    /// NaN falls back to the default value.
    pub fn clamped(&self) -> Self {
        let d = Self::default();
        let pick = |v: f64, fallback: f64| if v.is_nan() { fallback } else { v };

        Self {
            gravity_constant: pick(self.gravity_constant, d.gravity_constant).clamp(f64::MIN_POSITIVE, f64::MAX),
            friction: pick(self.friction, d.friction).clamp(f64::MIN_POSITIVE, 1.0),
            trail_fade: pick(self.trail_fade, d.trail_fade).clamp(0.0, 1.0),
            spawn_interval_ticks: self.spawn_interval_ticks.max(1),
            max_particles: self.max_particles,
        }
    }

    /// Apply a patch, returning the new config only if it validates
    pub fn patched(&self, patch: &SimulationConfigPatch) -> SimResult<Self> {
        let next = Self {
            gravity_constant: patch.gravity_constant.unwrap_or(self.gravity_constant),
            friction: patch.friction.unwrap_or(self.friction),
            trail_fade: patch.trail_fade.unwrap_or(self.trail_fade),
            spawn_interval_ticks: patch.spawn_interval_ticks.unwrap_or(self.spawn_interval_ticks),
            max_particles: patch.max_particles.unwrap_or(self.max_particles),
        };
        next.validate()?;
        Ok(next)
    }
}

/// Partial config update coming from UI controls
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct SimulationConfigPatch {
    pub gravity_constant: Option<f64>,
    pub friction: Option<f64>,
    pub trail_fade: Option<f64>,
    pub spawn_interval_ticks: Option<u64>,
    pub max_particles: Option<usize>,
}

/// A stepped UI control over one config field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slider {
    GravityConstant,
    TrailFade,
    MaxParticles,
}

impl Slider {
    /// `(min, max, step)` of the control
    pub fn range(self) -> (f64, f64, f64) {
        match self {
            Slider::GravityConstant => (0.1, 2.0, 0.1),
            Slider::TrailFade => (0.01, 0.2, 0.01),
            Slider::MaxParticles => (100.0, 3000.0, 100.0),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Slider::GravityConstant => "gravity_constant",
            Slider::TrailFade => "trail_fade",
            Slider::MaxParticles => "max_particles",
        }
    }

    pub fn value(self, config: &SimulationConfig) -> f64 {
        match self {
            Slider::GravityConstant => config.gravity_constant,
            Slider::TrailFade => config.trail_fade,
            Slider::MaxParticles => config.max_particles as f64,
        }
    }
}

impl SimulationConfig {
    /// Patch that moves `slider` by `steps` notches, snapped to the step grid
    /// and held inside the slider range
    pub fn slider_patch(&self, slider: Slider, steps: i32) -> SimulationConfigPatch {
        let (min, max, step) = slider.range();
        let raw = slider.value(self) + steps as f64 * step;
        let snapped = ((raw / step).round() * step).clamp(min, max);

        let next = match slider {
            Slider::GravityConstant => Self { gravity_constant: snapped, ..*self },
            Slider::TrailFade => Self { trail_fade: snapped, ..*self },
            Slider::MaxParticles => Self { max_particles: snapped as usize, ..*self },
        }
        .clamped();

        match slider {
            Slider::GravityConstant => SimulationConfigPatch {
                gravity_constant: Some(next.gravity_constant),
                ..Default::default()
            },
            Slider::TrailFade => SimulationConfigPatch {
                trail_fade: Some(next.trail_fade),
                ..Default::default()
            },
            Slider::MaxParticles => SimulationConfigPatch {
                max_particles: Some(next.max_particles),
                ..Default::default()
            },
        }
    }
}

/// How often the session runs the collision scan, and how often a detected
/// collision is reported as an event
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionParams {
    pub interval_ticks: u64, // 0 disables the scan
    pub burst_chance: f64, // [0, 1]
}

impl Default for CollisionParams {
    fn default() -> Self {
        Self {
            interval_ticks: 10,
            burst_chance: 0.2,
        }
    }
}

impl CollisionParams {
    pub fn validate(&self) -> SimResult<()> {
        if !(0.0..=1.0).contains(&self.burst_chance) {
            return Err(SimError::InvalidConfig {
                name: "collision.burst_chance",
                value: self.burst_chance,
                valid_range: "[0.0, 1.0]",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
        assert!(CollisionParams::default().validate().is_ok());
    }

    #[test]
    fn rejects_out_of_domain_values() {
        let bad = [
            SimulationConfig { friction: 0.0, ..Default::default() },
            SimulationConfig { friction: 1.5, ..Default::default() },
            SimulationConfig { gravity_constant: -1.0, ..Default::default() },
            SimulationConfig { trail_fade: 2.0, ..Default::default() },
            SimulationConfig { spawn_interval_ticks: 0, ..Default::default() },
        ];
        for cfg in bad {
            assert!(cfg.validate().is_err(), "{:?} should be rejected", cfg);
        }
    }

    #[test]
    fn clamped_is_always_valid() {
        let cfg = SimulationConfig {
            gravity_constant: -3.0,
            friction: f64::NAN,
            trail_fade: 7.0,
            spawn_interval_ticks: 0,
            max_particles: 10,
        }
        .clamped();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.friction, 0.999);
        assert_eq!(cfg.spawn_interval_ticks, 1);
    }

    #[test]
    fn slider_steps_snap_and_stop_at_the_range_ends() {
        let base = SimulationConfig::default();

        let up = base.slider_patch(Slider::GravityConstant, 1);
        assert!((up.gravity_constant.unwrap() - 0.6).abs() < 1e-9);
        assert!(up.friction.is_none() && up.trail_fade.is_none() && up.max_particles.is_none());

        let floor = base.slider_patch(Slider::GravityConstant, -100);
        assert!((floor.gravity_constant.unwrap() - 0.1).abs() < 1e-9);

        let trail = base.slider_patch(Slider::TrailFade, 100);
        assert!((trail.trail_fade.unwrap() - 0.2).abs() < 1e-9);

        assert_eq!(base.slider_patch(Slider::MaxParticles, 1).max_particles, Some(900));
        assert_eq!(base.slider_patch(Slider::MaxParticles, 50).max_particles, Some(3000));
        assert_eq!(base.slider_patch(Slider::MaxParticles, -50).max_particles, Some(100));
    }

    #[test]
    fn slider_snaps_off_grid_values() {
        let base = SimulationConfig { gravity_constant: 0.53, ..Default::default() };
        let patch = base.slider_patch(Slider::GravityConstant, 0);
        assert!((patch.gravity_constant.unwrap() - 0.5).abs() < 1e-9);
        assert!(base.patched(&patch).is_ok());
    }

    #[test]
    fn patch_keeps_unset_fields() {
        let base = SimulationConfig::default();
        let patch = SimulationConfigPatch { friction: Some(0.9), ..Default::default() };
        let next = base.patched(&patch).unwrap();
        assert_eq!(next.friction, 0.9);
        assert_eq!(next.gravity_constant, base.gravity_constant);

        let bad = SimulationConfigPatch { friction: Some(0.0), ..Default::default() };
        assert!(base.patched(&bad).is_err());
    }
}
