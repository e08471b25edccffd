//! Predator-prey agent simulation on a toroidal grid with a regrowing food field.

pub mod agent;
pub mod config;
pub mod population;
pub mod resource;
pub mod rng;
pub mod spatial;
pub mod world;

pub use agent::{Agent, AgentId, Species};
pub use config::{ActivationOrder, EnergySplit, SimConfig, SimConfigError, SpeciesParams};
pub use spatial::Position;
pub use world::{ExperimentError, RunSummary, SimState, StepMetrics, World};
