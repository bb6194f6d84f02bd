//! Core state types for the particle field.
//!
//! - `NVec2` is the 2D vector used for positions and velocities
//! - `GravityWell` / `WellRegistry` hold the attracting point masses
//! - `Particle` / `ParticleStore` hold the live particle set
//! - `Viewport` is the wrap-around area the particles live in
//!
//! Coordinates are screen-style: origin at the top-left corner, y grows down.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

pub type NVec2 = Vector2<f64>;

/// Display color token, a hex string such as `#f43f5e`.
/// The core never interprets it, it only carries it for renderers.
pub type Color = String;

/// Viewport size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> SimResult<Self> {
        if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
            return Err(SimError::InvalidViewport { width, height });
        }
        Ok(Self { width, height })
    }

    /// Map a normalized `[0,1]` coordinate pair to viewport pixels
    pub fn denormalize(&self, x: f64, y: f64) -> NVec2 {
        NVec2::new(x * self.width, y * self.height)
    }

    pub fn center(&self) -> NVec2 {
        self.denormalize(0.5, 0.5)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GravityWell {
    pub id: String,
    pub position: NVec2,
    pub mass: f64, // always > 0
    pub color: Color,
    pub pulsing: bool, // renderer hint only
}

impl GravityWell {
    /// Create a well, rejecting non-positive or non-finite mass
    pub fn new(id: impl Into<String>, position: NVec2, mass: f64, color: impl Into<Color>) -> SimResult<Self> {
        if !(mass > 0.0 && mass.is_finite()) {
            return Err(SimError::InvalidConfig {
                name: "well.mass",
                value: mass,
                valid_range: "(0.0, inf)",
            });
        }
        if !(position.x.is_finite() && position.y.is_finite()) {
            return Err(SimError::InvalidConfig {
                name: "well.position",
                value: if position.x.is_finite() { position.y } else { position.x },
                valid_range: "finite",
            });
        }
        Ok(Self {
            id: id.into(),
            position,
            mass,
            color: color.into(),
            pulsing: false,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub id: String,
    pub position: NVec2,
    pub velocity: NVec2,
    pub color: Color,
    pub size: f64,
    pub age: u64, // ticks lived, informational only
}

/// The current set of attracting point masses.
///
/// Only external commands mutate it; the simulation reads it as a snapshot
/// once per tick.
#[derive(Debug, Clone, Default)]
pub struct WellRegistry {
    wells: Vec<GravityWell>,
    next_id: u64,
}

impl WellRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn wells(&self) -> &[GravityWell] {
        &self.wells
    }

    pub fn len(&self) -> usize {
        self.wells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wells.is_empty()
    }

    pub fn push(&mut self, well: GravityWell) {
        self.wells.push(well);
    }

    /// Add a well with a registry-generated id
    pub fn add(&mut self, position: NVec2, mass: f64, color: impl Into<Color>) -> SimResult<&GravityWell> {
        let id = format!("w-{}", self.next_id);
        let well = GravityWell::new(id, position, mass, color)?;
        self.next_id += 1;
        self.wells.push(well);
        Ok(&self.wells[self.wells.len() - 1])
    }

    pub fn clear(&mut self) {
        self.wells.clear();
    }

    /// Swap in a whole new well set, previous wells are dropped
    pub fn replace(&mut self, wells: Vec<GravityWell>) {
        self.wells = wells;
    }
}

/// The live particle set, capped by the config's `max_particles`.
///
/// Particles only leave the store through [`ParticleStore::reset`].
#[derive(Debug, Clone, Default)]
pub struct ParticleStore {
    particles: Vec<Particle>,
    next_id: u64,
}

impl ParticleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub(crate) fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Next id unique within the live set
    pub(crate) fn next_id(&mut self) -> String {
        let id = format!("p-{:x}", self.next_id);
        self.next_id += 1;
        id
    }

    pub(crate) fn push(&mut self, particle: Particle) {
        self.particles.push(particle);
    }

    /// Remove every particle
    pub fn reset(&mut self) {
        self.particles.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_rejects_non_positive_mass() {
        assert!(GravityWell::new("w", NVec2::zeros(), 0.0, "#fff").is_err());
        assert!(GravityWell::new("w", NVec2::zeros(), -5.0, "#fff").is_err());
        assert!(GravityWell::new("w", NVec2::zeros(), f64::NAN, "#fff").is_err());
        assert!(GravityWell::new("w", NVec2::zeros(), 1.0, "#fff").is_ok());
    }

    #[test]
    fn registry_ids_are_unique() {
        let mut reg = WellRegistry::new();
        let a = reg.add(NVec2::new(1.0, 1.0), 100.0, "#fff").unwrap().id.clone();
        let b = reg.add(NVec2::new(2.0, 2.0), 100.0, "#fff").unwrap().id.clone();
        assert_ne!(a, b);
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn viewport_rejects_zero_size() {
        assert!(Viewport::new(0.0, 600.0).is_err());
        assert!(Viewport::new(800.0, -1.0).is_err());
        assert_eq!(Viewport::new(800.0, 600.0).unwrap().center(), NVec2::new(400.0, 300.0));
    }
}
