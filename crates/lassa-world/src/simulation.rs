//! Simulation engine for running the disease model.

use crate::agent::{Agent, StepContext, Steppable, Traits};
use crate::checkpoint::Checkpoint;
use crate::grid::Grid;
use crate::human::Human;
use crate::rodent::Rodent;
use crate::scheduler::RandomActivation;
use crate::statistics::StatisticsCollector;
use lassa_core::{
    AgentId, AgentKind, AgentSnapshot, Error, ModelConfig, Position, Result, StatisticsRecord,
    StatisticsSeries,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, instrument};

pub struct Simulation {
    config: ModelConfig,
    grid: Grid,
    // Indexed by AgentId
    agents: Vec<Agent>,
    scheduler: RandomActivation,
    rng: ChaCha8Rng,
    tick: u64,
    statistics: StatisticsCollector,
}

impl Simulation {
    /// Validate the configuration, create and place every agent, and record
    /// the tick-0 statistics
    pub fn new(config: ModelConfig) -> Result<Self> {
        config.validate()?;

        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        let capacity = config.total_population() as usize;

        let mut sim = Self {
            grid: Grid::new(config.width, config.height),
            agents: Vec::with_capacity(capacity),
            scheduler: RandomActivation::new(),
            rng,
            tick: 0,
            statistics: StatisticsCollector::new(),
            config,
        };

        let traits = Traits {
            movement_probability: sim.config.movement_probability,
            transmissibility: sim.config.transmissibility,
            mean_disease_duration: sim.config.mean_disease_duration,
        };

        for _ in 0..sim.config.human_population {
            let id = sim.next_id();
            let human = Human::new(
                id,
                sim.grid.random_unoccupied_cell(&mut sim.rng),
                traits,
                sim.config.treatment_chance,
                sim.config.treatment_length,
                sim.config.isolation_chance,
            );
            sim.add_agent(Agent::Human(human))?;
        }

        for _ in 0..sim.config.rodent_population {
            let id = sim.next_id();
            let mut rodent = Rodent::new(
                id,
                Position::new(0, 0),
                traits,
                sim.config.pesticide_kill,
                sim.config.environmental_stillness,
                sim.config.initial_infection,
                &mut sim.rng,
            )?;
            rodent.position = sim.grid.random_unoccupied_cell(&mut sim.rng);
            sim.add_agent(Agent::Rodent(rodent))?;
        }

        let initial = sim.statistics.collect(0, &sim.agents)?;

        info!(
            seed = sim.config.seed,
            humans = sim.config.human_population,
            rodents = sim.config.rodent_population,
            width = sim.config.width,
            height = sim.config.height,
            infected_rodents = initial.infected_rodents,
            "Simulation initialized"
        );

        Ok(sim)
    }

    /// Rebuild a simulation from a checkpoint so that it continues exactly
    /// where the checkpointed run stopped
    pub fn restore(checkpoint: Checkpoint) -> Result<Self> {
        checkpoint.config.validate()?;

        let expected_records = checkpoint.tick as usize + 1;
        if checkpoint.statistics.len() != expected_records {
            return Err(Error::InvalidState(format!(
                "checkpoint at tick {} carries {} statistics records, expected {}",
                checkpoint.tick,
                checkpoint.statistics.len(),
                expected_records
            )));
        }

        let expected_agents = checkpoint.config.total_population() as usize;
        if checkpoint.agents.len() != expected_agents {
            return Err(Error::InvalidState(format!(
                "checkpoint carries {} agents, configuration expects {}",
                checkpoint.agents.len(),
                expected_agents
            )));
        }

        let mut sim = Self {
            grid: Grid::new(checkpoint.config.width, checkpoint.config.height),
            agents: Vec::with_capacity(expected_agents),
            scheduler: RandomActivation::new(),
            rng: checkpoint.rng,
            tick: checkpoint.tick,
            statistics: StatisticsCollector::from_series(checkpoint.statistics),
            config: checkpoint.config,
        };

        for agent in checkpoint.agents {
            if agent.id() != sim.next_id() {
                return Err(Error::InvalidState(format!(
                    "checkpoint agent {} is out of sequence",
                    agent.id()
                )));
            }
            // Humans occupy the first human_population ids, rodents the rest
            let expected_kind = if agent.id().index() < sim.config.human_population as usize {
                AgentKind::Human
            } else {
                AgentKind::Rodent
            };
            if agent.kind() != expected_kind {
                return Err(Error::InvalidState(format!(
                    "checkpoint agent {} is a {:?}, expected a {:?}",
                    agent.id(),
                    agent.kind(),
                    expected_kind
                )));
            }
            if !sim.grid.contains(agent.position()) {
                return Err(Error::InvalidState(format!(
                    "checkpoint agent {} lies outside the grid at {}",
                    agent.id(),
                    agent.position()
                )));
            }
            sim.add_agent(agent)?;
        }

        info!(tick = sim.tick, agents = sim.agents.len(), "Simulation restored");
        Ok(sim)
    }

    /// Capture everything needed to resume this run deterministically
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint::new(
            self.config.clone(),
            self.tick,
            self.rng.clone(),
            self.agents.clone(),
            self.statistics.series().clone(),
        )
    }

    /// Run for a number of ticks, logging progress every `log_interval` ticks
    #[instrument(skip(self), fields(start_tick = self.tick))]
    pub fn run(&mut self, num_ticks: u64, log_interval: u64) -> Result<&StatisticsSeries> {
        info!("Running simulation for {} ticks", num_ticks);

        for _ in 0..num_ticks {
            let record = self.advance_tick()?;

            if log_interval > 0 && self.tick % log_interval == 0 {
                info!(
                    tick = self.tick,
                    susceptible_humans = record.susceptible_humans,
                    exposed_humans = record.exposed_humans,
                    infected_humans = record.infected_humans,
                    removed_humans = record.removed_humans,
                    infected_rodents = record.infected_rodents,
                    dead_rodents = record.dead_rodents,
                    "Tick {}/{}",
                    self.tick,
                    num_ticks
                );
            }
        }

        self.emit_summary();
        Ok(self.statistics.series())
    }

    /// Advance exactly one tick: step every agent once in a fresh random
    /// order, then record statistics
    pub fn advance_tick(&mut self) -> Result<StatisticsRecord> {
        let order = self.scheduler.activation_order(&mut self.rng);

        for id in order {
            self.step_agent(id)?;
        }

        self.tick += 1;
        self.statistics.collect(self.tick, &self.agents)
    }

    fn step_agent(&mut self, id: AgentId) -> Result<()> {
        let agent = self
            .agents
            .get_mut(id.index())
            .ok_or_else(|| Error::NotFound(format!("agent {} is scheduled but missing", id)))?;

        let mut ctx = StepContext {
            grid: &mut self.grid,
            rng: &mut self.rng,
        };
        let effects = agent.step(&mut ctx)?;

        for contact in effects.contacts {
            if let Some(Agent::Human(human)) = self.agents.get_mut(contact.index()) {
                if human.expose() {
                    debug!(
                        tick = self.tick + 1,
                        rodent = %id,
                        human = %contact,
                        position = %human.position,
                        "Human exposed"
                    );
                }
            }
        }

        Ok(())
    }

    fn next_id(&self) -> AgentId {
        AgentId(self.agents.len() as u32)
    }

    fn add_agent(&mut self, agent: Agent) -> Result<()> {
        let id = agent.id();
        self.grid.place(id, agent.position())?;
        self.scheduler.add(id);
        self.agents.push(agent);
        Ok(())
    }

    fn emit_summary(&self) {
        if let Some(latest) = self.statistics.series().latest() {
            let peak_infected = self
                .statistics
                .series()
                .iter()
                .map(|r| r.infected_humans)
                .max()
                .unwrap_or(0);

            info!(
                event = "run_summary",
                final_tick = self.tick,
                susceptible_humans = latest.susceptible_humans,
                exposed_humans = latest.exposed_humans,
                infected_humans = latest.infected_humans,
                removed_humans = latest.removed_humans,
                peak_infected_humans = peak_infected,
                susceptible_rodents = latest.susceptible_rodents,
                infected_rodents = latest.infected_rodents,
                dead_rodents = latest.dead_rodents,
                "Run complete"
            );
        }
    }

    /// Identifier, kind, position and state of every agent, ordered by id
    pub fn snapshot(&self) -> Vec<AgentSnapshot> {
        self.agents.iter().map(Agent::snapshot).collect()
    }

    pub fn statistics_series(&self) -> &StatisticsSeries {
        self.statistics.series()
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(id.index())
    }
}
