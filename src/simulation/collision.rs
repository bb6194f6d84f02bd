//! Pairwise proximity scan over the live particles
//!
//! Both scans are O(n^2) over unordered pairs `(i, j)` with `i < j`, walked
//! in index order. Throttling how often they run is the caller's job.

use super::params::COLLISION_DIST_SQ;
use super::states::{NVec2, Particle};

/// A pair of particles closer than the collision threshold
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionPair {
    pub i: usize,
    pub j: usize,
    pub midpoint: NVec2,
}

fn close_pair(particles: &[Particle], i: usize, j: usize, threshold_sq: f64) -> Option<CollisionPair> {
    let a = &particles[i].position;
    let b = &particles[j].position;
    let d = a - b;
    if d.dot(&d) < threshold_sq {
        Some(CollisionPair { i, j, midpoint: (a + b) * 0.5 })
    } else {
        None
    }
}

/// Midpoint of the first pair closer than `threshold_sq`, lowest `(i, j)`
/// wins
pub fn first_collision_within(particles: &[Particle], threshold_sq: f64) -> Option<NVec2> {
    let n = particles.len();
    for i in 0..n {
        for j in (i + 1)..n {
            if let Some(pair) = close_pair(particles, i, j, threshold_sq) {
                return Some(pair.midpoint);
            }
        }
    }
    None
}

/// Midpoint of the first colliding pair, or `None`
pub fn first_collision(particles: &[Particle]) -> Option<NVec2> {
    first_collision_within(particles, COLLISION_DIST_SQ)
}

/// Every colliding pair, in scan order. Use this instead of
/// [`first_collision`] when all events are needed.
pub fn all_collisions(particles: &[Particle]) -> Vec<CollisionPair> {
    let n = particles.len();
    let mut out = Vec::new();
    for i in 0..n {
        for j in (i + 1)..n {
            if let Some(pair) = close_pair(particles, i, j, COLLISION_DIST_SQ) {
                out.push(pair);
            }
        }
    }
    out
}
