pub mod cancel;
pub mod cell;
pub mod config;
pub mod engine;
pub mod grid;
pub mod neighborhood;
pub mod render;
pub mod rule_set;
pub mod seed;
pub mod simulation;

pub use cancel::CancelToken;
pub use cell::Cell;
pub use grid::Grid;
pub use grid::GridError;
pub use neighborhood::CountNeighbors;
pub use neighborhood::Neighborhood;
pub use rule_set::RuleSet;
pub use simulation::Simulation;
