pub mod clock;
pub mod economy;
pub mod market;
pub mod runner;
pub mod seed;

pub use clock::SimClock;
pub use runner::{DayReport, Simulation, SimulationConfig};
pub use seed::{seed, SeedReport, DEFAULT_SEED_DEVELOPERS, DEFAULT_SEED_USERS};
