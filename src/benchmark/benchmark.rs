use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::simulation::boundary::ToroidalWrap;
use crate::simulation::collision::{all_collisions, first_collision};
use crate::simulation::forces::{AccelSet, Field};
use crate::simulation::integrator::euler_integrator;
use crate::simulation::params::SimulationConfig;
use crate::simulation::states::{GravityWell, NVec2, Particle, Viewport};

const VIEWPORT: Viewport = Viewport { width: 1280.0, height: 800.0 };

/// Helper to build `n` particles scattered over the viewport
fn make_particles(n: usize, rng: &mut StdRng) -> Vec<Particle> {
    (0..n)
        .map(|i| Particle {
            id: format!("b-{}", i),
            position: NVec2::new(rng.gen::<f64>() * VIEWPORT.width, rng.gen::<f64>() * VIEWPORT.height),
            velocity: NVec2::new(rng.gen_range(-2.0..2.0), rng.gen_range(-2.0..2.0)),
            color: "#ffffff".to_string(),
            size: 1.0,
            age: 0,
        })
        .collect()
}

/// Helper to build `n` wells on a ring around the centre
fn make_wells(n: usize) -> Vec<GravityWell> {
    (0..n)
        .filter_map(|i| {
            let angle = i as f64 / n as f64 * std::f64::consts::TAU;
            let pos = VIEWPORT.center() + NVec2::new(angle.cos(), angle.sin()) * 250.0;
            GravityWell::new(format!("b-{}", i), pos, 2000.0, "#ffffff").ok()
        })
        .collect()
}

/// Time one integration pass for a range of particle and well counts.
/// Prints CSV: particles,wells,us_per_tick
pub fn bench_tick() {
    let config = SimulationConfig::default();
    let forces = AccelSet::default();
    let mut rng = StdRng::seed_from_u64(42);
    let ticks = 100;

    println!("particles,wells,us_per_tick");

    for n in [100, 200, 400, 800, 1600, 3200] {
        for w in [1, 4, 16] {
            let mut particles = make_particles(n, &mut rng);
            let wells = make_wells(w);
            let field = Field { wells: &wells, config: &config };

            // Warm up
            euler_integrator(&mut particles, &forces, &field, &ToroidalWrap, &VIEWPORT);

            let t0 = Instant::now();
            for _ in 0..ticks {
                euler_integrator(&mut particles, &forces, &field, &ToroidalWrap, &VIEWPORT);
            }
            let us = t0.elapsed().as_secs_f64() * 1e6 / ticks as f64;

            println!("{},{},{:.3}", n, w, us);
        }
    }
}

/// Time the first-match and exhaustive collision scans.
/// Prints CSV: particles,first_us,all_us,pairs
pub fn bench_collisions() {
    let mut rng = StdRng::seed_from_u64(7);

    println!("particles,first_us,all_us,pairs");

    for n in (200..=3200).step_by(200) {
        let particles = make_particles(n, &mut rng);

        let t0 = Instant::now();
        let first = first_collision(&particles);
        let first_us = t0.elapsed().as_secs_f64() * 1e6;

        let t1 = Instant::now();
        let all = all_collisions(&particles);
        let all_us = t1.elapsed().as_secs_f64() * 1e6;

        debug_assert_eq!(first.is_some(), !all.is_empty());
        println!("{},{:.3},{:.3},{}", n, first_us, all_us, all.len());
    }
}
