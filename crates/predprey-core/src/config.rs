use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Order in which the agents of a tick's snapshot are activated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivationOrder {
    /// Creation order, unchanged from tick to tick.
    #[default]
    Fixed,
    /// Creation order shuffled with the simulation RNG at the start of every tick.
    Shuffled,
    /// Every prey in creation order, then every predator.
    SpeciesGrouped,
}

/// How a reproducing agent divides its energy with its offspring.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnergySplit {
    /// `energy / (n + 1)` each; parent and offspring together keep the pre-split energy.
    #[default]
    Conserving,
    /// `energy / n` each, parent included.
    PerOffspring,
}

/// Per-species constants shared by every agent of that species.
///
/// All fields are required when given in JSON; an absent species block takes
/// the defaults of [`SimConfig::default`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpeciesParams {
    pub max_energy: f64,
    pub energy_consumption: f64,
    pub reproduce_probability: f64,
    pub max_offspring: u32,
    pub reproduce_energy_threshold: f64,
    /// Prey: most food drawn from the current cell per tick.
    /// Predator: energy gained per kill.
    pub feed_amount: f64,
}

impl SpeciesParams {
    pub fn prey() -> Self {
        Self {
            max_energy: 1.0,
            energy_consumption: 0.05,
            reproduce_probability: 0.01,
            max_offspring: 5,
            reproduce_energy_threshold: 0.5,
            feed_amount: 0.1,
        }
    }

    pub fn predator() -> Self {
        Self {
            max_energy: 1.0,
            energy_consumption: 0.02,
            reproduce_probability: 0.01,
            max_offspring: 3,
            reproduce_energy_threshold: 0.5,
            feed_amount: 0.5,
        }
    }

    fn validate(&self, species: &'static str) -> Result<(), SimConfigError> {
        let finite = [
            ("max_energy", self.max_energy),
            ("energy_consumption", self.energy_consumption),
            ("reproduce_energy_threshold", self.reproduce_energy_threshold),
            ("feed_amount", self.feed_amount),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(SimConfigError::NonFinite { species, field });
            }
        }
        if self.max_energy <= 0.0 {
            return Err(SimConfigError::NonPositiveMaxEnergy { species });
        }
        if self.feed_amount < 0.0 {
            return Err(SimConfigError::NegativeFeedAmount { species });
        }
        if !(0.0..=1.0).contains(&self.reproduce_probability) {
            return Err(SimConfigError::ProbabilityOutOfRange {
                species,
                value: self.reproduce_probability,
            });
        }
        if self.max_offspring < 1 {
            return Err(SimConfigError::NoOffspring { species });
        }
        if self.max_offspring as usize > SimConfig::MAX_TOTAL_AGENTS {
            return Err(SimConfigError::TooManyOffspring {
                species,
                max: SimConfig::MAX_TOTAL_AGENTS,
                actual: self.max_offspring,
            });
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub width: usize,
    pub height: usize,
    pub nb_prey_init: usize,
    pub nb_predator_init: usize,
    pub max_steps: usize,
    pub prey: SpeciesParams,
    pub predator: SpeciesParams,
    pub cell_max_food: f64,
    /// Upper bound of the per-cell growth increment drawn at initialization.
    pub food_growth_max: f64,
    pub activation_order: ActivationOrder,
    pub energy_split: EnergySplit,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: 50,
            height: 50,
            nb_prey_init: 200,
            nb_predator_init: 20,
            max_steps: 2000,
            prey: SpeciesParams::prey(),
            predator: SpeciesParams::predator(),
            cell_max_food: 1.0,
            food_growth_max: 0.01,
            activation_order: ActivationOrder::Fixed,
            energy_split: EnergySplit::Conserving,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimConfigError {
    #[error("grid dimensions must be positive (got {width}x{height})")]
    EmptyGrid { width: usize, height: usize },
    #[error("grid of {width}x{height} cells exceeds supported maximum ({max})")]
    GridTooLarge {
        width: usize,
        height: usize,
        max: usize,
    },
    #[error("max_steps must be positive")]
    NoSteps,
    #[error("initial population ({actual}) exceeds supported maximum ({max})")]
    TooManyAgents { max: usize, actual: usize },
    #[error("{species}.{field} must be finite")]
    NonFinite {
        species: &'static str,
        field: &'static str,
    },
    #[error("{species}.max_energy must be positive")]
    NonPositiveMaxEnergy { species: &'static str },
    #[error("{species}.feed_amount must be non-negative")]
    NegativeFeedAmount { species: &'static str },
    #[error("{species}.reproduce_probability must lie in [0, 1] (got {value})")]
    ProbabilityOutOfRange { species: &'static str, value: f64 },
    #[error("{species}.max_offspring must be at least 1")]
    NoOffspring { species: &'static str },
    #[error("{species}.max_offspring ({actual}) exceeds supported maximum ({max})")]
    TooManyOffspring {
        species: &'static str,
        max: usize,
        actual: u32,
    },
    #[error("cell_max_food must be finite and non-negative")]
    InvalidCellMaxFood,
    #[error("food_growth_max must be finite and non-negative")]
    InvalidFoodGrowth,
    #[error("invalid config json: {0}")]
    Json(String),
}

impl SimConfig {
    pub const MAX_CELLS: usize = 1 << 26;
    pub const MAX_TOTAL_AGENTS: usize = 50_000_000;

    /// Parse a (possibly partial) JSON document; missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, SimConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| SimConfigError::Json(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SimConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(SimConfigError::EmptyGrid {
                width: self.width,
                height: self.height,
            });
        }
        if self
            .width
            .checked_mul(self.height)
            .map(|cells| cells > Self::MAX_CELLS)
            .unwrap_or(true)
        {
            return Err(SimConfigError::GridTooLarge {
                width: self.width,
                height: self.height,
                max: Self::MAX_CELLS,
            });
        }
        if self.max_steps == 0 {
            return Err(SimConfigError::NoSteps);
        }
        let total = self.nb_prey_init.saturating_add(self.nb_predator_init);
        if total > Self::MAX_TOTAL_AGENTS {
            return Err(SimConfigError::TooManyAgents {
                max: Self::MAX_TOTAL_AGENTS,
                actual: total,
            });
        }
        self.prey.validate("prey")?;
        self.predator.validate("predator")?;
        if !self.cell_max_food.is_finite() || self.cell_max_food < 0.0 {
            return Err(SimConfigError::InvalidCellMaxFood);
        }
        if !self.food_growth_max.is_finite() || self.food_growth_max < 0.0 {
            return Err(SimConfigError::InvalidFoodGrowth);
        }
        Ok(())
    }
}
