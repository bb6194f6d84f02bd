pub mod states;
pub mod params;
pub mod forces;
pub mod integrator;
pub mod boundary;
pub mod spawner;
pub mod collision;
pub mod theme;
pub mod session;
