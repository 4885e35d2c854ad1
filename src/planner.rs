//! Public API for the economy agent.
//!
//! The `EconomyAgentBuilder` provides a fluent, append-only API for
//! configuring the agent. The built `EconomyAgent` is driven once per game
//! tick and returns the commands to issue for that tick.

use crate::command::*;
use crate::config::*;
use crate::cost::*;
use crate::error::PlannerError;
use crate::race::Race;
use crate::snapshot::*;
use crate::unit_type::BuildingOrUnitType;
use log::*;

// Re-export key types for convenience
pub use crate::queue::{Census, DesiredArmyQueue, FactionCensus, ProductionQueue};
pub use crate::tracker::{HarvestSurvey, HarvestTracker, TrackerPhase};

/// Production queue that never has anything to produce.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoProduction;

impl ProductionQueue for NoProduction {
    fn is_empty(&self, _snapshot: &dyn GameStateSnapshot) -> bool {
        true
    }

    fn peek(
        &self,
        _snapshot: &dyn GameStateSnapshot,
        _costs: &dyn CostLookup,
    ) -> Result<BuildingOrUnitType, PlannerError> {
        Err(PlannerError::NoDesiredUnits)
    }
}

/// Append-only builder for configuring an economy agent.
pub struct EconomyAgentBuilder<Q = NoProduction> {
    race: Race,
    config: EconomyConfig,
    auto_build_workers: bool,
    auto_build_supply: bool,
    production: Option<Q>,
}

impl EconomyAgentBuilder<NoProduction> {
    /// Start with default config, no automatic production and no queue.
    pub fn new(race: Race) -> Self {
        EconomyAgentBuilder {
            race,
            config: EconomyConfig::default(),
            auto_build_workers: false,
            auto_build_supply: false,
            production: None,
        }
    }
}

impl<Q: ProductionQueue> EconomyAgentBuilder<Q> {
    pub fn config(mut self, config: EconomyConfig) -> Self {
        self.config = config;
        self
    }

    /// Produce a worker whenever resource nodes are below capacity.
    pub fn auto_build_workers(mut self, enabled: bool) -> Self {
        self.auto_build_workers = enabled;
        self
    }

    /// Produce a supply provider whenever free supply runs low.
    pub fn auto_build_supply(mut self, enabled: bool) -> Self {
        self.auto_build_supply = enabled;
        self
    }

    /// Attach a production queue consulted after worker assignment.
    pub fn production<P: ProductionQueue>(self, queue: P) -> EconomyAgentBuilder<P> {
        EconomyAgentBuilder {
            race: self.race,
            config: self.config,
            auto_build_workers: self.auto_build_workers,
            auto_build_supply: self.auto_build_supply,
            production: Some(queue),
        }
    }

    pub fn build(self) -> EconomyAgent<Q> {
        EconomyAgent {
            race: self.race,
            tracker: HarvestTracker::new(self.config.clone()),
            config: self.config,
            auto_build_workers: self.auto_build_workers,
            auto_build_supply: self.auto_build_supply,
            production: self.production,
        }
    }
}

/// Per-tick economy driver: worker and supply production, harvest
/// assignment and production queue.
pub struct EconomyAgent<Q = NoProduction> {
    race: Race,
    config: EconomyConfig,
    auto_build_workers: bool,
    auto_build_supply: bool,
    tracker: HarvestTracker,
    production: Option<Q>,
}

impl<Q: ProductionQueue> EconomyAgent<Q> {
    pub fn race(&self) -> Race {
        self.race
    }

    pub fn tracker(&self) -> &HarvestTracker {
        &self.tracker
    }

    /// Ensures the agent realizes the worker is no longer harvesting.
    pub fn remove_worker_from_harvest_assignments(&mut self, worker: UnitTag) -> bool {
        self.tracker.remove_worker(worker)
    }

    pub fn production(&self) -> Option<&Q> {
        self.production.as_ref()
    }

    /// Access to the queue so a strategy layer can change desired counts
    /// between ticks.
    pub fn production_mut(&mut self) -> Option<&mut Q> {
        self.production.as_mut()
    }

    pub fn set_auto_build_workers(&mut self, enabled: bool) {
        self.auto_build_workers = enabled;
    }

    pub fn set_auto_build_supply(&mut self, enabled: bool) {
        self.auto_build_supply = enabled;
    }

    /// Run one tick.
    pub fn act(
        &mut self,
        snapshot: &dyn GameStateSnapshot,
        costs: &dyn CostLookup,
    ) -> Result<Vec<Command>, PlannerError> {
        let survey = self.tracker.survey(snapshot);

        if !survey.has_main_base() {
            // Total base loss is treated as terminal; the tracker logs it.
            return Ok(self.tracker.reconcile_survey(&survey));
        }

        let mut commands = Vec::new();

        if self.auto_build_workers && !self.tracker.is_fully_harvesting(&survey) {
            commands.extend(self.produce_if_affordable(self.race.worker_type(), snapshot, costs));
        }

        if self.auto_build_supply && self.needs_supply(snapshot) {
            commands.extend(self.produce_if_affordable(self.race.supply_type(), snapshot, costs));
        }

        commands.extend(self.tracker.reconcile_survey(&survey));

        if let Some(queue) = self.production.as_mut() {
            if !queue.is_empty(snapshot) {
                let next = queue.pop(snapshot, costs)?;
                match costs.cost(next) {
                    Some(cost) if cost.is_met(snapshot) => {
                        commands.push(Command::Produce { unit_type: next });
                    }
                    Some(_) => debug!("Waiting to produce {}", next),
                    None => return Err(PlannerError::MissingCost(next)),
                }
            }
        }

        Ok(commands)
    }

    fn needs_supply(&self, snapshot: &dyn GameStateSnapshot) -> bool {
        let player = snapshot.player();
        let supply_type = self.race.supply_type();

        if player.food_used + self.config.supply_headroom <= player.food_cap
            || player.food_cap >= self.config.supply_cap_limit
        {
            return false;
        }

        let already_coming = snapshot
            .units()
            .iter()
            .filter(|u| u.is_own())
            .any(|u| (u.counts_as(supply_type) && !u.is_built()) || u.is_building(supply_type));

        !already_coming
    }

    fn produce_if_affordable(
        &self,
        unit_type: BuildingOrUnitType,
        snapshot: &dyn GameStateSnapshot,
        costs: &dyn CostLookup,
    ) -> Option<Command> {
        match costs.cost(unit_type) {
            Some(cost) if cost.is_met(snapshot) => Some(Command::Produce { unit_type }),
            Some(_) => None,
            None => {
                warn!("No cost known for {}, cannot auto-build", unit_type);
                None
            }
        }
    }
}
