use super::{SimState, World};
use crate::agent::{Agent, AgentId, Species};
use crate::config::{ActivationOrder, EnergySplit, SpeciesParams};
use crate::spatial::Position;
use tracing::{debug, trace};

impl World {
    /// Advance one tick. No-op once the simulation is finished.
    pub fn step(&mut self) {
        if self.is_finished() {
            return;
        }
        self.births_last_step = 0;
        self.deaths_last_step = 0;
        self.kills_last_step = 0;

        self.resource_field.grow();

        // Offspring born during the pass are not in the snapshot and first act next tick.
        for id in self.activation_snapshot() {
            if self.population.contains(id) {
                self.step_agent(id);
            }
        }

        self.tick += 1;
        self.evaluate_termination();
        trace!(
            tick = self.tick,
            prey = self.population.count(Species::Prey),
            predators = self.population.count(Species::Predator),
            births = self.births_last_step,
            deaths = self.deaths_last_step,
            kills = self.kills_last_step,
            "tick complete"
        );
    }

    fn activation_snapshot(&mut self) -> Vec<AgentId> {
        let mut order = self.population.snapshot();
        match self.config.activation_order {
            ActivationOrder::Fixed => {}
            ActivationOrder::Shuffled => self.rng.shuffle(&mut order),
            ActivationOrder::SpeciesGrouped => {
                let population = &self.population;
                order.sort_by_key(|&id| population.species_of(id) == Some(Species::Predator));
            }
        }
        order
    }

    fn evaluate_termination(&mut self) {
        let (prey, predators) = self.population.counts();
        let extinct = prey == 0 && predators == 0;
        if self.tick >= self.config.max_steps || extinct {
            self.state = SimState::Finished;
            debug!(tick = self.tick, prey, predators, extinct, "simulation finished");
        }
    }

    /// Move, metabolize, feed, clamp, die or reproduce.
    pub(crate) fn step_agent(&mut self, id: AgentId) {
        let Some(agent) = self.population.get(id) else {
            return;
        };
        let species = agent.species;
        let mut energy = agent.energy;
        let params = *species.params(&self.config);

        let Some(pos) = self.move_randomly(id) else {
            return;
        };

        energy -= params.energy_consumption;
        energy += match species {
            Species::Prey => self.resource_field.consume(pos, params.feed_amount),
            Species::Predator => self.hunt(pos, params.feed_amount),
        };
        energy = energy.min(params.max_energy);

        if energy <= 0.0 {
            self.remove_agent(id);
            self.deaths_last_step += 1;
            self.total_deaths += 1;
            return;
        }

        let energy = self.maybe_reproduce(species, &params, pos, energy);
        debug_assert!(
            energy > 0.0 && energy <= params.max_energy,
            "energy {energy} of {id} escaped (0, {}]",
            params.max_energy
        );
        if let Some(agent) = self.population.get_mut(id) {
            agent.energy = energy;
        }
    }

    /// Hop to a uniformly chosen Moore neighbor. Returns the new cell.
    fn move_randomly(&mut self, id: AgentId) -> Option<Position> {
        let from = self.grid.position_of(id)?;
        let neighbors = self.grid.neighbors(from);
        let to = neighbors[self.rng.index(neighbors.len())];
        self.grid.move_agent(id, to);
        Some(to)
    }

    /// Kill one co-located prey, chosen uniformly. Returns the energy gained.
    fn hunt(&mut self, pos: Position, gain_per_kill: f64) -> f64 {
        let population = &self.population;
        let prey_here: Vec<AgentId> = self
            .grid
            .agents_at(pos)
            .iter()
            .copied()
            .filter(|&other| population.get(other).is_some_and(Agent::is_prey))
            .collect();
        let Some(&victim) = self.rng.choose(&prey_here) else {
            return 0.0;
        };
        self.remove_agent(victim);
        self.kills_last_step += 1;
        self.total_kills += 1;
        gain_per_kill
    }

    /// Returns the parent's energy after any split.
    fn maybe_reproduce(
        &mut self,
        species: Species,
        params: &SpeciesParams,
        pos: Position,
        energy: f64,
    ) -> f64 {
        if energy < params.reproduce_energy_threshold
            || self.rng.uniform() >= params.reproduce_probability
        {
            return energy;
        }
        let offspring = self.rng.int_inclusive(1, params.max_offspring);
        let share = match self.config.energy_split {
            EnergySplit::Conserving => energy / (f64::from(offspring) + 1.0),
            EnergySplit::PerOffspring => energy / f64::from(offspring),
        };
        for _ in 0..offspring {
            self.insert_agent(species, pos, share);
        }
        self.births_last_step += offspring as usize;
        self.total_births += offspring as usize;
        share
    }
}
