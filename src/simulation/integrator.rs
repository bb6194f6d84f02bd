//! Fixed-step integrator for the particle field
//!
//! Semi-implicit Euler with friction, one force evaluation per particle per
//! tick:
//! - v' = (v + a) * friction
//! - x' = x + v'
//! - wrap x' at the viewport edges, age += 1
//!
//! The order (force, damp, move) is what produces the slowly decaying orbits;
//! reordering it changes trajectories.

use super::boundary::Boundary;
use super::forces::{AccelSet, Field};
use super::states::{Particle, Viewport};

/// Advance one particle by one tick, in place
pub fn step_particle(
    p: &mut Particle,
    forces: &AccelSet,
    field: &Field,
    boundary: &dyn Boundary,
    viewport: &Viewport,
) {
    let a = forces.accumulate(&p.position, field);

    // Kick and damp
    p.velocity = (p.velocity + a) * field.config.friction;

    // Drift with the new velocity
    p.position += p.velocity;

    boundary.apply(&mut p.position, viewport);
    p.age += 1;
}

/// Advance every particle by one tick
pub fn euler_integrator(
    particles: &mut [Particle],
    forces: &AccelSet,
    field: &Field,
    boundary: &dyn Boundary,
    viewport: &Viewport,
) {
    for p in particles.iter_mut() {
        step_particle(p, forces, field, boundary, viewport);
    }
}
