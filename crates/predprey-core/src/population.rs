use crate::agent::{Agent, AgentId, Species};
use std::collections::BTreeMap;

/// The live agents, keyed by id. Iteration is in creation order.
#[derive(Clone, Debug, Default)]
pub struct Population {
    agents: BTreeMap<AgentId, Agent>,
    next_id: u64,
    prey_count: usize,
    predator_count: usize,
}

impl Population {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an agent and return its freshly allocated id.
    pub fn spawn(&mut self, species: Species, energy: f64) -> AgentId {
        let id = AgentId(self.next_id);
        self.next_id += 1;
        self.agents.insert(id, Agent::new(id, species, energy));
        *self.count_mut(species) += 1;
        id
    }

    pub fn remove(&mut self, id: AgentId) -> Option<Agent> {
        let agent = self.agents.remove(&id)?;
        *self.count_mut(agent.species) -= 1;
        Some(agent)
    }

    pub fn contains(&self, id: AgentId) -> bool {
        self.agents.contains_key(&id)
    }

    pub fn get(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(&id)
    }

    pub fn get_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.agents.get_mut(&id)
    }

    pub fn species_of(&self, id: AgentId) -> Option<Species> {
        self.agents.get(&id).map(|a| a.species)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Agent> {
        self.agents.values()
    }

    /// Ids of every live agent, in creation order.
    pub fn snapshot(&self) -> Vec<AgentId> {
        self.agents.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn count(&self, species: Species) -> usize {
        match species {
            Species::Prey => self.prey_count,
            Species::Predator => self.predator_count,
        }
    }

    /// `(prey, predator)`.
    pub fn counts(&self) -> (usize, usize) {
        (self.prey_count, self.predator_count)
    }

    fn count_mut(&mut self, species: Species) -> &mut usize {
        match species {
            Species::Prey => &mut self.prey_count,
            Species::Predator => &mut self.predator_count,
        }
    }
}
