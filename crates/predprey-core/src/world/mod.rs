pub mod lifecycle;
pub mod metrics;

pub use metrics::*;

use crate::agent::{Agent, AgentId, Species};
use crate::config::{SimConfig, SimConfigError};
use crate::population::Population;
use crate::resource::ResourceField;
use crate::rng::SimRng;
use crate::spatial::{Position, TorusGrid};
use thiserror::Error;
use tracing::debug;

/// Lifecycle of a simulation. `Finished` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimState {
    Running,
    Finished,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExperimentError {
    #[error("sample_every must be positive")]
    InvalidSampleEvery,
    #[error("steps ({actual}) exceed supported maximum ({max})")]
    TooManySteps { max: usize, actual: usize },
    #[error("sample count ({actual}) exceeds supported maximum ({max})")]
    TooManySamples { max: usize, actual: usize },
}

/// One predator-prey simulation: grid, food field, population and the tick clock.
pub struct World {
    pub(crate) config: SimConfig,
    pub(crate) grid: TorusGrid,
    pub(crate) resource_field: ResourceField,
    pub(crate) population: Population,
    pub(crate) rng: SimRng,
    pub(crate) state: SimState,
    pub(crate) tick: usize,
    pub(crate) births_last_step: usize,
    pub(crate) deaths_last_step: usize,
    pub(crate) kills_last_step: usize,
    pub(crate) total_births: usize,
    pub(crate) total_deaths: usize,
    pub(crate) total_kills: usize,
}

impl World {
    pub const MAX_EXPERIMENT_STEPS: usize = 10_000_000;
    pub const MAX_EXPERIMENT_SAMPLES: usize = 100_000;

    /// Validate `config` and build the initial world from `seed`.
    ///
    /// Draw order: food values, growth increments, then each prey and each
    /// predator (energy, x, y).
    pub fn try_new(config: SimConfig, seed: u64) -> Result<Self, SimConfigError> {
        config.validate()?;

        let mut rng = SimRng::seed_from_u64(seed);
        let resource_field = ResourceField::new_random(
            config.width,
            config.height,
            config.cell_max_food,
            config.food_growth_max,
            &mut rng,
        );
        let mut world = Self {
            grid: TorusGrid::new(config.width, config.height),
            resource_field,
            population: Population::new(),
            rng,
            state: SimState::Running,
            tick: 0,
            births_last_step: 0,
            deaths_last_step: 0,
            kills_last_step: 0,
            total_births: 0,
            total_deaths: 0,
            total_kills: 0,
            config,
        };

        let seeds = [
            (Species::Prey, world.config.nb_prey_init),
            (Species::Predator, world.config.nb_predator_init),
        ];
        for (species, count) in seeds {
            let max_energy = species.params(&world.config).max_energy;
            for _ in 0..count {
                let energy = world.rng.uniform() * max_energy;
                let pos = Position::new(
                    world.rng.index(world.config.width),
                    world.rng.index(world.config.height),
                );
                world.insert_agent(species, pos, energy);
            }
        }

        debug!(
            seed,
            width = world.config.width,
            height = world.config.height,
            prey = world.config.nb_prey_init,
            predators = world.config.nb_predator_init,
            "world initialized"
        );
        Ok(world)
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn state(&self) -> SimState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state == SimState::Finished
    }

    pub fn current_tick(&self) -> usize {
        self.tick
    }

    /// `(prey, predator)` live counts.
    pub fn counts(&self) -> (usize, usize) {
        self.population.counts()
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn grid(&self) -> &TorusGrid {
        &self.grid
    }

    pub fn resource_field(&self) -> &ResourceField {
        &self.resource_field
    }

    pub fn resource_field_mut(&mut self) -> &mut ResourceField {
        &mut self.resource_field
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.population.get(id)
    }

    pub fn agents(&self) -> impl Iterator<Item = &Agent> {
        self.population.iter()
    }

    pub fn position_of(&self, id: AgentId) -> Option<Position> {
        self.grid.position_of(id)
    }

    pub fn total_births(&self) -> usize {
        self.total_births
    }

    pub fn total_deaths(&self) -> usize {
        self.total_deaths
    }

    pub fn total_kills(&self) -> usize {
        self.total_kills
    }

    /// Place a new agent explicitly. Coordinates wrap onto the torus and energy
    /// is capped at the species' `max_energy`.
    pub fn spawn_agent(&mut self, species: Species, pos: Position, energy: f64) -> AgentId {
        let pos = self.grid.wrap(pos.x as isize, pos.y as isize);
        let energy = energy.min(species.params(&self.config).max_energy);
        self.insert_agent(species, pos, energy)
    }

    pub(crate) fn insert_agent(&mut self, species: Species, pos: Position, energy: f64) -> AgentId {
        let id = self.population.spawn(species, energy);
        self.grid.place_agent(id, pos);
        id
    }

    /// Unregister an agent from both the grid and the population.
    pub(crate) fn remove_agent(&mut self, id: AgentId) -> Option<Agent> {
        self.grid.remove_agent(id);
        self.population.remove(id)
    }

    /// Step until finished or `max_ticks` ticks have run; returns ticks executed.
    pub fn run(&mut self, max_ticks: usize) -> usize {
        let mut executed = 0;
        while executed < max_ticks && !self.is_finished() {
            self.step();
            executed += 1;
        }
        executed
    }

    /// Run until finished (or `steps` ticks), sampling metrics every
    /// `sample_every` ticks and after the last executed tick.
    pub fn try_run_experiment(
        &mut self,
        steps: usize,
        sample_every: usize,
    ) -> Result<RunSummary, ExperimentError> {
        if sample_every == 0 {
            return Err(ExperimentError::InvalidSampleEvery);
        }
        if steps > Self::MAX_EXPERIMENT_STEPS {
            return Err(ExperimentError::TooManySteps {
                max: Self::MAX_EXPERIMENT_STEPS,
                actual: steps,
            });
        }
        let estimated_samples = if steps == 0 {
            0
        } else {
            ((steps - 1) / sample_every) + 1
        };
        if estimated_samples > Self::MAX_EXPERIMENT_SAMPLES {
            return Err(ExperimentError::TooManySamples {
                max: Self::MAX_EXPERIMENT_SAMPLES,
                actual: estimated_samples,
            });
        }

        let births_before = self.total_births;
        let deaths_before = self.total_deaths;
        let kills_before = self.total_kills;
        let mut samples = Vec::with_capacity(estimated_samples);
        let mut executed = 0;
        let mut last_sampled = false;
        while executed < steps && !self.is_finished() {
            self.step();
            executed += 1;
            last_sampled = executed % sample_every == 0;
            if last_sampled {
                samples.push(self.collect_step_metrics());
            }
        }
        if executed > 0 && !last_sampled {
            samples.push(self.collect_step_metrics());
        }

        let (final_prey_count, final_predator_count) = self.counts();
        Ok(RunSummary {
            schema_version: 1,
            steps,
            steps_executed: executed,
            sample_every,
            finished: self.is_finished(),
            final_tick: self.tick,
            final_prey_count,
            final_predator_count,
            births: self.total_births - births_before,
            starvation_deaths: self.total_deaths - deaths_before,
            kills: self.total_kills - kills_before,
            samples,
        })
    }
}
