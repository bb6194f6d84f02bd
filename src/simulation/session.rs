//! Build and run a simulation session
//!
//! A [`Session`] owns everything that changes over time: the well registry,
//! the particle store, the tick counter and the random source. Renderers get
//! read-only slices; UI code goes through the command methods. Commands are
//! applied between ticks, never during one.
//!
//! One call to [`Session::tick`] is one frame:
//! 1. maybe spawn a particle
//! 2. integrate every particle, including one spawned this tick
//! 3. every `collision.interval_ticks` ticks, scan for a close pair

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::configuration::config::{default_palettes, ScenarioConfig, WellConfig};
use crate::error::{SimError, SimResult};
use crate::simulation::boundary::ToroidalWrap;
use crate::simulation::collision::first_collision;
use crate::simulation::forces::{AccelSet, Field};
use crate::simulation::integrator::euler_integrator;
use crate::simulation::params::{
    CollisionParams, SimulationConfig, SimulationConfigPatch, Slider, CLICK_WELL_COLOR, CLICK_WELL_MASS_MAX,
    CLICK_WELL_MASS_MIN,
};
use crate::simulation::spawner::spawn_tick;
use crate::simulation::states::{Color, GravityWell, NVec2, Particle, ParticleStore, Viewport, WellRegistry};
use crate::simulation::theme::{ThemeError, ThemeResponse};

/// A detected collision that passed the burst gate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionEvent {
    pub point: NVec2,
    pub tick: u64,
}

/// What happened during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickReport {
    pub tick: u64,
    pub spawned: bool,
    pub collision: Option<CollisionEvent>,
}

pub struct Session {
    viewport: Viewport,
    config: SimulationConfig,
    collision: CollisionParams,
    wells: WellRegistry,
    particles: ParticleStore,
    forces: AccelSet,
    boundary: ToroidalWrap,
    palettes: Vec<Vec<Color>>,
    palette_index: usize,
    background: Option<Color>,
    theme_name: Option<String>,
    tick_counter: u64,
    rng: StdRng,
}

impl Session {
    /// Empty session with default palettes and no wells
    pub fn new(viewport: Viewport, config: SimulationConfig, rng: StdRng) -> SimResult<Self> {
        let viewport = Viewport::new(viewport.width, viewport.height)?;
        config.validate()?;
        Ok(Self {
            viewport,
            config,
            collision: CollisionParams::default(),
            wells: WellRegistry::new(),
            particles: ParticleStore::new(),
            forces: AccelSet::default(),
            boundary: ToroidalWrap,
            palettes: default_palettes(),
            palette_index: 0,
            background: None,
            theme_name: None,
            tick_counter: 0,
            rng,
        })
    }

    /// Empty session seeded for repeatable runs
    pub fn seeded(viewport: Viewport, config: SimulationConfig, seed: u64) -> SimResult<Self> {
        Self::new(viewport, config, StdRng::seed_from_u64(seed))
    }

    /// Map a `ScenarioConfig` into a running session, validating every value
    pub fn build_session(cfg: ScenarioConfig) -> SimResult<Self> {
        let viewport = Viewport::new(cfg.viewport.width, cfg.viewport.height)?;

        let rng = match cfg.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut session = Self::new(viewport, cfg.simulation, rng)?;

        cfg.collision.validate()?;
        session.collision = cfg.collision;

        if cfg.palettes.is_empty() || cfg.palettes.iter().any(|p| p.is_empty()) {
            return Err(SimError::EmptyPalette);
        }
        session.palettes = cfg.palettes;

        let wells = cfg
            .wells
            .iter()
            .enumerate()
            .map(|(i, wc)| well_from_config(i, wc, &viewport))
            .collect::<SimResult<Vec<_>>>()?;
        session.wells.replace(wells);

        info!(
            "session built: {}x{} viewport, {} wells, {} palettes, seed {:?}",
            viewport.width,
            viewport.height,
            session.wells.len(),
            session.palettes.len(),
            cfg.seed
        );
        Ok(session)
    }

    /// Advance the simulation by one frame
    pub fn tick(&mut self) -> TickReport {
        self.tick_counter += 1;
        let tick = self.tick_counter;

        let palette = &self.palettes[self.palette_index];
        let spawned = spawn_tick(
            &mut self.particles,
            tick,
            &self.config,
            &self.viewport,
            palette,
            &mut self.rng,
        );

        let field = Field {
            wells: self.wells.wells(),
            config: &self.config,
        };
        euler_integrator(
            self.particles.particles_mut(),
            &self.forces,
            &field,
            &self.boundary,
            &self.viewport,
        );

        let collision = self.scan_collisions(tick);

        TickReport { tick, spawned, collision }
    }

    fn scan_collisions(&mut self, tick: u64) -> Option<CollisionEvent> {
        let every = self.collision.interval_ticks;
        if every == 0 || tick % every != 0 {
            return None;
        }

        let point = first_collision(self.particles.particles())?;
        if !self.rng.gen_bool(self.collision.burst_chance) {
            return None;
        }

        debug!("collision burst at ({:.1}, {:.1}) on tick {}", point.x, point.y, tick);
        Some(CollisionEvent { point, tick })
    }

    // ------------------------------------------------------------------
    // Read access for renderers
    // ------------------------------------------------------------------

    pub fn wells(&self) -> &[GravityWell] {
        self.wells.wells()
    }

    pub fn particles(&self) -> &[Particle] {
        self.particles.particles()
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn palette(&self) -> &[Color] {
        &self.palettes[self.palette_index]
    }

    pub fn palette_index(&self) -> usize {
        self.palette_index
    }

    pub fn palette_count(&self) -> usize {
        self.palettes.len()
    }

    pub fn background(&self) -> Option<&str> {
        self.background.as_deref()
    }

    /// Name of the last theme applied, if any
    pub fn theme_name(&self) -> Option<&str> {
        self.theme_name.as_deref()
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_counter
    }

    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

    pub fn set_config(&mut self, config: SimulationConfig) -> SimResult<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn patch_config(&mut self, patch: &SimulationConfigPatch) -> SimResult<()> {
        self.config = self.config.patched(patch)?;
        Ok(())
    }

    /// Move one slider by `steps` notches and return the resulting config
    pub fn nudge(&mut self, slider: Slider, steps: i32) -> SimResult<&SimulationConfig> {
        let patch = self.config.slider_patch(slider, steps);
        self.patch_config(&patch)?;
        Ok(&self.config)
    }

    pub fn set_collision_params(&mut self, params: CollisionParams) -> SimResult<()> {
        params.validate()?;
        self.collision = params;
        Ok(())
    }

    pub fn clear_wells(&mut self) {
        self.wells.clear();
    }

    /// Drop a well at a viewport point with a random mass in the click range
    pub fn add_well_at(&mut self, x: f64, y: f64) -> SimResult<&GravityWell> {
        let mass = self.rng.gen_range(CLICK_WELL_MASS_MIN..CLICK_WELL_MASS_MAX);
        self.wells.add(NVec2::new(x, y), mass, CLICK_WELL_COLOR)
    }

    pub fn replace_wells(&mut self, wells: Vec<GravityWell>) {
        self.wells.replace(wells);
    }

    /// Swap the whole well set for the theme's and pick a new palette.
    /// On error nothing changes.
    pub fn apply_theme(&mut self, theme: &ThemeResponse) -> Result<(), ThemeError> {
        let wells = theme.to_wells(&self.viewport)?;
        info!("applying theme '{}' with {} wells", theme.theme_name, wells.len());

        self.wells.replace(wells);
        self.background = Some(theme.background_style.clone());
        self.theme_name = Some(theme.theme_name.clone());
        self.palette_index = self.rng.gen_range(0..self.palettes.len());
        Ok(())
    }

    pub fn set_palette(&mut self, index: usize) -> SimResult<()> {
        if index >= self.palettes.len() {
            return Err(SimError::PaletteIndex {
                index,
                len: self.palettes.len(),
            });
        }
        self.palette_index = index;
        Ok(())
    }

    pub fn cycle_palette(&mut self) {
        self.palette_index = (self.palette_index + 1) % self.palettes.len();
    }

    /// Remove every live particle
    pub fn reset_particles(&mut self) {
        self.particles.reset();
    }

    /// Put a particle in directly, bypassing the spawn interval.
    /// Returns `None` when the store is at capacity.
    pub fn inject_particle(&mut self, position: NVec2, velocity: NVec2) -> Option<&Particle> {
        if self.particles.len() >= self.config.max_particles {
            return None;
        }
        let id = self.particles.next_id();
        let color = self.palette()[0].clone();
        self.particles.push(Particle {
            id,
            position,
            velocity,
            color,
            size: 1.0,
            age: 0,
        });
        self.particles.particles().last()
    }

    /// New viewport size. Particles outside it wrap on their next tick
    pub fn resize(&mut self, width: f64, height: f64) -> SimResult<()> {
        let viewport = Viewport::new(width, height)?;
        if viewport != self.viewport {
            debug!("viewport resized to {}x{}", width, height);
        }
        self.viewport = viewport;
        Ok(())
    }
}

fn well_from_config(i: usize, wc: &WellConfig, viewport: &Viewport) -> SimResult<GravityWell> {
    if !(0.0..=1.0).contains(&wc.x) || !(0.0..=1.0).contains(&wc.y) {
        warn!("well {} at ({}, {}) lies outside the viewport", i, wc.x, wc.y);
    }
    let id = wc.id.clone().unwrap_or_else(|| format!("init-{}", i));
    let mut well = GravityWell::new(id, viewport.denormalize(wc.x, wc.y), wc.mass, wc.color.clone())?;
    well.pulsing = wc.pulsing;
    Ok(well)
}
