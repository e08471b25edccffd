use super::World;
use crate::agent::Species;
use serde::{Deserialize, Serialize};

/// Population and field state at the end of one tick.
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct StepMetrics {
    pub step: usize,
    pub prey_count: usize,
    pub predator_count: usize,
    pub prey_energy_mean: f64,
    pub predator_energy_mean: f64,
    pub resource_total: f64,
    pub resource_mean: f64,
    pub birth_count: usize,
    pub death_count: usize,
    pub kill_count: usize,
}

fn default_schema_version() -> u32 {
    1
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RunSummary {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    /// Tick budget requested for this run.
    pub steps: usize,
    pub steps_executed: usize,
    pub sample_every: usize,
    pub finished: bool,
    pub final_tick: usize,
    pub final_prey_count: usize,
    pub final_predator_count: usize,
    #[serde(default)]
    pub births: usize,
    #[serde(default)]
    pub starvation_deaths: usize,
    #[serde(default)]
    pub kills: usize,
    pub samples: Vec<StepMetrics>,
}

impl World {
    pub fn collect_step_metrics(&self) -> StepMetrics {
        let mut energy_sums = [0.0f64; 2];
        for agent in self.population.iter() {
            let slot = match agent.species {
                Species::Prey => 0,
                Species::Predator => 1,
            };
            energy_sums[slot] += agent.energy;
        }
        let (prey_count, predator_count) = self.population.counts();
        let mean = |sum: f64, n: usize| if n > 0 { sum / n as f64 } else { 0.0 };
        let n_cells = self.resource_field.data().len();
        let resource_total = self.resource_field.total();

        StepMetrics {
            step: self.tick,
            prey_count,
            predator_count,
            prey_energy_mean: mean(energy_sums[0], prey_count),
            predator_energy_mean: mean(energy_sums[1], predator_count),
            resource_total,
            resource_mean: mean(resource_total, n_cells),
            birth_count: self.births_last_step,
            death_count: self.deaths_last_step,
            kill_count: self.kills_last_step,
        }
    }
}
