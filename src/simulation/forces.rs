//! Force / acceleration contributors for the particle field
//!
//! Particles have unit mass, so force and acceleration are the same thing.
//! Every term sees the same read-only [`Field`] snapshot for the tick and
//! the contributions are summed (superposition).

use crate::simulation::params::{SimulationConfig, SOFTENING};
use crate::simulation::states::{GravityWell, NVec2};

/// Read-only view of what drives the particles during one tick
#[derive(Debug, Clone, Copy)]
pub struct Field<'a> {
    pub wells: &'a [GravityWell],
    pub config: &'a SimulationConfig,
}

/// Collection of acceleration terms.
/// Each term implements [`Acceleration`] and their contributions are summed
/// into a single acceleration vector per particle
pub struct AccelSet {
    terms: Vec<Box<dyn Acceleration + Send + Sync>>,
}

impl AccelSet {
    /// Create an empty acceleration set
    pub fn new() -> Self {
        Self { terms: Vec::new() }
    }

    /// Add an acceleration term
    pub fn with<T>(mut self, term: T) -> Self
    where
        T: Acceleration + Send + Sync + 'static,
    {
        self.terms.push(Box::new(term));
        self
    }

    /// Net acceleration at `position` from every term
    pub fn accumulate(&self, position: &NVec2, field: &Field) -> NVec2 {
        let mut out = NVec2::zeros();
        for term in &self.terms {
            term.acceleration(position, field, &mut out);
        }
        out
    }
}

impl Default for AccelSet {
    /// Well gravity with the standard softening floor
    fn default() -> Self {
        Self::new().with(WellGravity::default())
    }
}

/// Trait for acceleration sources.
/// Implementations add their contribution into `out`
pub trait Acceleration {
    fn acceleration(&self, position: &NVec2, field: &Field, out: &mut NVec2);
}

/// Attraction toward every well, `G * m / max(r^2, softening)` along the unit
/// direction to the well.
///
/// Inside the softening radius the squared distance is floored but the
/// displacement is not, so the pull fades linearly to zero at the well
/// centre instead of diverging.
#[derive(Debug, Clone, Copy)]
pub struct WellGravity {
    pub softening: f64,
}

impl Default for WellGravity {
    fn default() -> Self {
        Self { softening: SOFTENING }
    }
}

impl Acceleration for WellGravity {
    fn acceleration(&self, position: &NVec2, field: &Field, out: &mut NVec2) {
        let g = field.config.gravity_constant;

        for well in field.wells {
            // d points from the particle to the well
            let d = well.position - position;
            let dist_sq = d.dot(&d);

            let soft_sq = dist_sq.max(self.softening);
            let inv_dist = soft_sq.sqrt().recip();

            let f = g * well.mass / soft_sq;
            *out += f * inv_dist * d;
        }
    }
}
