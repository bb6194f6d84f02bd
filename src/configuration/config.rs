//! Configuration types for loading scenarios from YAML.
//!
//! A scenario is a thin, `serde`-deserializable description of a session:
//!
//! - [`ViewportConfig`]  – size of the wrap-around area in pixels
//! - [`SimulationConfig`] – integrator and spawner settings
//! - [`CollisionParams`]  – how often the collision scan runs
//! - [`WellConfig`]      – initial wells, in normalized coordinates
//! - palettes and a theme library for the viewer
//!
//! # YAML format
//!
//! ```yaml
//! viewport:
//!   width: 1280
//!   height: 800
//!
//! seed: 42                   # optional, omit for a fresh layout every run
//!
//! simulation:
//!   gravity_constant: 0.5
//!   friction: 0.999          # 1.0 is frictionless
//!   trail_fade: 0.05         # lower = longer trails
//!   spawn_interval_ticks: 5
//!   max_particles: 800
//!
//! collision:
//!   interval_ticks: 10       # 0 disables the scan
//!   burst_chance: 0.2
//!
//! wells:
//!   - x: 0.5                 # 0..1 across the viewport
//!     y: 0.5
//!     mass: 3000
//!     color: "#ffffff"
//!
//! palettes:
//!   - ["#f43f5e", "#ec4899", "#d946ef"]
//!
//! themes:
//!   - themeName: "Binary Star"
//!     description: "two suns"
//!     backgroundStyle: "#000000"
//!     wells:
//!       - { x: 0.3, y: 0.5, mass: 3000, color: "#06b6d4" }
//!       - { x: 0.7, y: 0.5, mass: 3000, color: "#d946ef" }
//! ```
//!
//! Every field except `viewport` has a default, so the smallest valid file is
//! just the viewport block. The session validates all values on build.

use serde::Deserialize;

use crate::simulation::params::{CollisionParams, SimulationConfig};
use crate::simulation::states::Color;
use crate::simulation::theme::ThemeResponse;

/// Built-in palettes: neon pink/purple, cyber blue, matrix green, magma
pub const DEFAULT_PALETTES: [[&str; 5]; 4] = [
    ["#f43f5e", "#ec4899", "#d946ef", "#a855f7", "#8b5cf6"],
    ["#06b6d4", "#3b82f6", "#6366f1", "#8b5cf6", "#d946ef"],
    ["#84cc16", "#22c55e", "#10b981", "#14b8a6", "#06b6d4"],
    ["#f59e0b", "#f97316", "#ef4444", "#dc2626", "#b91c1c"],
];

pub fn default_palettes() -> Vec<Vec<Color>> {
    DEFAULT_PALETTES
        .iter()
        .map(|p| p.iter().map(|c| c.to_string()).collect())
        .collect()
}

/// Viewport size in pixels
#[derive(Deserialize, Debug, Clone, Copy)]
pub struct ViewportConfig {
    pub width: f64,
    pub height: f64,
}

/// Initial well, position normalized to the viewport
#[derive(Deserialize, Debug, Clone)]
pub struct WellConfig {
    pub id: Option<String>,
    pub x: f64, // 0..1 across
    pub y: f64, // 0..1 down
    pub mass: f64,
    #[serde(default = "default_well_color")]
    pub color: Color,
    #[serde(default)]
    pub pulsing: bool,
}

fn default_well_color() -> Color {
    "#ffffff".to_string()
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone)]
pub struct ScenarioConfig {
    pub viewport: ViewportConfig,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub collision: CollisionParams,
    #[serde(default = "default_center_well")]
    pub wells: Vec<WellConfig>,
    #[serde(default = "default_palettes")]
    pub palettes: Vec<Vec<Color>>,
    #[serde(default)]
    pub themes: Vec<ThemeResponse>,
}

/// A single heavy white well in the middle of the screen
fn default_center_well() -> Vec<WellConfig> {
    vec![WellConfig {
        id: Some("center".to_string()),
        x: 0.5,
        y: 0.5,
        mass: 3000.0,
        color: default_well_color(),
        pulsing: false,
    }]
}

impl ScenarioConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_yaml_fills_defaults() {
        let cfg = ScenarioConfig::from_yaml_str("viewport: { width: 800, height: 600 }").unwrap();
        assert_eq!(cfg.simulation, SimulationConfig::default());
        assert_eq!(cfg.wells.len(), 1);
        assert_eq!(cfg.palettes.len(), 4);
        assert!(cfg.themes.is_empty());
        assert!(cfg.seed.is_none());
    }

    #[test]
    fn partial_simulation_block_keeps_other_defaults() {
        let yaml = "
viewport: { width: 800, height: 600 }
simulation:
  friction: 0.95
wells: []
";
        let cfg = ScenarioConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(cfg.simulation.friction, 0.95);
        assert_eq!(cfg.simulation.max_particles, 800);
        assert!(cfg.wells.is_empty());
    }
}
