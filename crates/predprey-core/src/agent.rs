use crate::config::{SimConfig, SpeciesParams};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable agent handle. Ids are allocated in increasing order and never reused,
/// so ordering by id is creation order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AgentId(pub u64);

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Species {
    Prey,
    Predator,
}

impl Species {
    /// The parameter bundle this species reads from the configuration.
    pub fn params(self, config: &SimConfig) -> &SpeciesParams {
        match self {
            Species::Prey => &config.prey,
            Species::Predator => &config.predator,
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Species::Prey => f.write_str("prey"),
            Species::Predator => f.write_str("predator"),
        }
    }
}

/// A live animal. Its position lives in the grid, keyed by `id`.
#[derive(Clone, Debug, PartialEq)]
pub struct Agent {
    pub id: AgentId,
    pub species: Species,
    pub energy: f64,
}

impl Agent {
    pub fn new(id: AgentId, species: Species, energy: f64) -> Self {
        Self {
            id,
            species,
            energy,
        }
    }

    pub fn is_prey(&self) -> bool {
        self.species == Species::Prey
    }
}
