//! Particle spawning from the viewport edges
//!
//! One particle every `spawn_interval_ticks` ticks while the store is under
//! `max_particles`. Reaching the cap is not an error, spawning just pauses
//! until there is room again. The random source is passed in so tests can
//! seed it.

use log::trace;
use rand::seq::SliceRandom;
use rand::Rng;

use super::params::{SimulationConfig, PARTICLE_SIZE_MAX, PARTICLE_SIZE_MIN, SPAWN_SPEED};
use super::states::{Color, NVec2, Particle, ParticleStore, Viewport};

const FALLBACK_COLOR: &str = "#ffffff";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Right, Edge::Bottom, Edge::Left];

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

/// Build a particle on `edge`, heading inward.
///
/// Position is uniform along the edge. Velocity is `SPAWN_SPEED` straight in
/// plus a tangential component uniform in +-half that speed.
pub fn spawn_on_edge<R: Rng + ?Sized>(
    edge: Edge,
    id: String,
    viewport: &Viewport,
    palette: &[Color],
    rng: &mut R,
) -> Particle {
    let speed = SPAWN_SPEED;
    let along_x = rng.gen::<f64>() * viewport.width;
    let along_y = rng.gen::<f64>() * viewport.height;
    let drift = (rng.gen::<f64>() - 0.5) * speed;

    let (position, velocity) = match edge {
        Edge::Top => (NVec2::new(along_x, 0.0), NVec2::new(drift, speed)),
        Edge::Right => (NVec2::new(viewport.width, along_y), NVec2::new(-speed, drift)),
        Edge::Bottom => (NVec2::new(along_x, viewport.height), NVec2::new(drift, -speed)),
        Edge::Left => (NVec2::new(0.0, along_y), NVec2::new(speed, drift)),
    };

    let color = palette
        .choose(rng)
        .cloned()
        .unwrap_or_else(|| FALLBACK_COLOR.to_string());

    Particle {
        id,
        position,
        velocity,
        color,
        size: rng.gen_range(PARTICLE_SIZE_MIN..PARTICLE_SIZE_MAX),
        age: 0,
    }
}

/// Spawn decision for one tick. Returns true when a particle was added
pub fn spawn_tick<R: Rng + ?Sized>(
    store: &mut ParticleStore,
    tick_counter: u64,
    config: &SimulationConfig,
    viewport: &Viewport,
    palette: &[Color],
    rng: &mut R,
) -> bool {
    // spawn_interval_ticks is validated >= 1, max(1) keeps a stray 0 from panicking
    if tick_counter % config.spawn_interval_ticks.max(1) != 0 {
        return false;
    }
    if store.len() >= config.max_particles {
        return false;
    }

    let edge = Edge::random(rng);
    let id = store.next_id();
    let particle = spawn_on_edge(edge, id, viewport, palette, rng);
    trace!("spawned {} on {:?} at {:?}", particle.id, edge, particle.position);
    store.push(particle);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn spawned_particles_start_on_their_edge_heading_inward() {
        let vp = Viewport { width: 800.0, height: 600.0 };
        let palette = vec!["#f43f5e".to_string()];
        let mut rng = StdRng::seed_from_u64(7);

        for edge in Edge::ALL {
            for _ in 0..50 {
                let p = spawn_on_edge(edge, "p".into(), &vp, &palette, &mut rng);
                match edge {
                    Edge::Top => assert!(p.position.y == 0.0 && p.velocity.y > 0.0),
                    Edge::Right => assert!(p.position.x == 800.0 && p.velocity.x < 0.0),
                    Edge::Bottom => assert!(p.position.y == 600.0 && p.velocity.y < 0.0),
                    Edge::Left => assert!(p.position.x == 0.0 && p.velocity.x > 0.0),
                }
                assert!(p.size >= PARTICLE_SIZE_MIN && p.size < PARTICLE_SIZE_MAX);
                assert_eq!(p.age, 0);
                assert_eq!(p.color, "#f43f5e");
            }
        }
    }

    #[test]
    fn tangential_drift_is_bounded() {
        let vp = Viewport { width: 800.0, height: 600.0 };
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            let p = spawn_on_edge(Edge::Left, "p".into(), &vp, &[], &mut rng);
            assert!(p.velocity.y.abs() <= SPAWN_SPEED / 2.0);
            assert_eq!(p.color, FALLBACK_COLOR);
        }
    }
}
