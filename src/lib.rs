pub mod error;
pub mod simulation;
pub mod configuration;
pub mod benchmark;

#[cfg(feature = "viewer")]
pub mod visualization;

pub use error::{SimError, SimResult};

pub use simulation::states::{NVec2, GravityWell, Particle, WellRegistry, ParticleStore, Viewport};
pub use simulation::params::{SimulationConfig, SimulationConfigPatch, CollisionParams, Slider};
pub use simulation::forces::{Acceleration, AccelSet, Field, WellGravity};
pub use simulation::integrator::{step_particle, euler_integrator};
pub use simulation::boundary::{Boundary, ToroidalWrap};
pub use simulation::collision::{first_collision, all_collisions, CollisionPair};
pub use simulation::session::{Session, TickReport, CollisionEvent};
pub use simulation::theme::{ThemeResponse, ThemeWell, ThemeError, ThemeService, LibraryThemeService, ThemeRequest, ThemeStatus};

pub use configuration::config::{ScenarioConfig, ViewportConfig, WellConfig};

#[cfg(feature = "viewer")]
pub use visualization::gravfield_vis2d::run_2d;

pub use benchmark::benchmark::{bench_tick, bench_collisions};
