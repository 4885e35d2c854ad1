//! Production queue that works towards a desired army composition.
//!
//! `DesiredArmyQueue` picks whichever desired type is furthest from its
//! target and, when that type cannot be produced yet, walks its prerequisite
//! or builder chain to find the structure that should be produced first.
//! The queue never reserves anything: `pop` and `peek` return the same answer
//! for the same snapshot, and committing to production is left to the caller.

use crate::config::EconomyConfig;
use crate::constants::*;
use crate::cost::*;
use crate::error::PlannerError;
use crate::snapshot::*;
use crate::unit_type::*;
use fnv::FnvHashMap;
use itertools::Itertools;
use log::*;
use std::hash::Hash;

/// Something that decides what to produce next.
pub trait ProductionQueue {
    /// True when nothing more needs producing.
    fn is_empty(&self, snapshot: &dyn GameStateSnapshot) -> bool;

    fn peek(
        &self,
        snapshot: &dyn GameStateSnapshot,
        costs: &dyn CostLookup,
    ) -> Result<BuildingOrUnitType, PlannerError>;

    fn pop(
        &mut self,
        snapshot: &dyn GameStateSnapshot,
        costs: &dyn CostLookup,
    ) -> Result<BuildingOrUnitType, PlannerError> {
        self.peek(snapshot, costs)
    }
}

/// Per-faction count of existing units by type.
pub trait Census<T> {
    fn counts_by_type(&self, snapshot: &dyn GameStateSnapshot) -> FnvHashMap<T, u32>;
}

impl<T, F> Census<T> for F
where
    F: Fn(&dyn GameStateSnapshot) -> FnvHashMap<T, u32>,
{
    fn counts_by_type(&self, snapshot: &dyn GameStateSnapshot) -> FnvHashMap<T, u32> {
        self(snapshot)
    }
}

/// Counts own units of a faction enum, plus anything already ordered to be
/// built or trained, so in-flight production is not queued twice.
#[derive(Copy, Clone, Debug, Default)]
pub struct FactionCensus;

impl<T> Census<T> for FactionCensus
where
    T: TryFrom<BuildingOrUnitType> + Eq + Hash,
{
    fn counts_by_type(&self, snapshot: &dyn GameStateSnapshot) -> FnvHashMap<T, u32> {
        let mut counts = FnvHashMap::default();

        for unit in snapshot.units().iter().filter(|u| u.is_own()) {
            if let Ok(unit_type) = T::try_from(unit.unit_type) {
                *counts.entry(unit_type).or_insert(0) += 1;
            }

            for order in &unit.orders {
                if let UnitOrder::Build { unit_type } | UnitOrder::Train { unit_type } = order {
                    if let Ok(unit_type) = T::try_from(*unit_type) {
                        *counts.entry(unit_type).or_insert(0) += 1;
                    }
                }
            }
        }

        counts
    }
}

#[derive(Copy, Clone, Debug)]
struct DesiredCount {
    count: u32,
    /// Order in which the type was first set. Breaks priority ties so the
    /// ranking never depends on map iteration order.
    declared: u32,
}

pub struct DesiredArmyQueue<T, C = FactionCensus> {
    convert: fn(T) -> BuildingOrUnitType,
    census: C,
    desired: FnvHashMap<T, DesiredCount>,
    next_declared: u32,
    max_prerequisite_depth: usize,
}

impl<T> DesiredArmyQueue<T, FactionCensus>
where
    T: Copy + Eq + Hash + Into<BuildingOrUnitType> + TryFrom<BuildingOrUnitType>,
{
    /// Queue for a faction enum using its standard union conversion and the
    /// default census.
    pub fn for_faction() -> Self {
        DesiredArmyQueue::new(<T as Into<BuildingOrUnitType>>::into, FactionCensus)
    }
}

impl<T, C> DesiredArmyQueue<T, C>
where
    T: Copy + Eq + Hash,
    C: Census<T>,
{
    pub fn new(convert: fn(T) -> BuildingOrUnitType, census: C) -> Self {
        DesiredArmyQueue {
            convert,
            census,
            desired: FnvHashMap::default(),
            next_declared: 0,
            max_prerequisite_depth: MAX_PREREQUISITE_DEPTH,
        }
    }

    pub fn with_max_prerequisite_depth(mut self, depth: usize) -> Self {
        self.max_prerequisite_depth = depth;
        self
    }

    /// Apply the planner-related settings from an economy config.
    pub fn configure(self, config: &EconomyConfig) -> Self {
        self.with_max_prerequisite_depth(config.max_prerequisite_depth)
    }

    /// Set the desired count for a type, replacing any earlier value.
    pub fn set(&mut self, unit_type: T, desired: u32) {
        match self.desired.get_mut(&unit_type) {
            Some(entry) => entry.count = desired,
            None => {
                self.desired.insert(
                    unit_type,
                    DesiredCount {
                        count: desired,
                        declared: self.next_declared,
                    },
                );
                self.next_declared += 1;
            }
        }
    }

    pub fn desired(&self, unit_type: T) -> u32 {
        self.desired.get(&unit_type).map(|d| d.count).unwrap_or(0)
    }

    /// Stop tracking a type entirely. Returns whether it was present.
    pub fn clear(&mut self, unit_type: T) -> bool {
        self.desired.remove(&unit_type).is_some()
    }

    pub fn is_configured(&self) -> bool {
        !self.desired.is_empty()
    }

    /// Desired types ranked from least to most fulfilled.
    pub fn priorities(&self, snapshot: &dyn GameStateSnapshot) -> Vec<T> {
        let counts = self.census.counts_by_type(snapshot);

        self.desired
            .iter()
            .map(|(unit_type, desired)| {
                let current = counts.get(unit_type).copied().unwrap_or(0);
                let ratio = if desired.count == 0 {
                    f64::INFINITY
                } else {
                    current as f64 / desired.count as f64
                };
                (*unit_type, ratio, desired.declared)
            })
            .sorted_by(|a, b| a.1.total_cmp(&b.1).then(a.2.cmp(&b.2)))
            .map(|(unit_type, _, _)| unit_type)
            .collect()
    }

    /// Follow prerequisites from `start` until reaching a type whose own
    /// prerequisite is already satisfied.
    fn unit_or_prerequisite(
        &self,
        start: BuildingOrUnitType,
        snapshot: &dyn GameStateSnapshot,
        costs: &dyn CostLookup,
    ) -> Result<BuildingOrUnitType, PlannerError> {
        let mut chain = vec![start];
        let mut current = start;

        loop {
            let cost = lookup_cost(costs, current)?;

            let prerequisite = match cost.prerequisite {
                Some(prerequisite) if !cost.has_prerequisite(snapshot) => prerequisite,
                _ => {
                    debug!("Resolved {} to {}", start, current);
                    return Ok(current);
                }
            };

            if chain.contains(&prerequisite) {
                chain.push(prerequisite);
                return Err(PlannerError::PrerequisiteCycle { chain });
            }

            if chain.len() > self.max_prerequisite_depth {
                return Err(PlannerError::PrerequisiteDepthExceeded {
                    start,
                    depth: self.max_prerequisite_depth,
                });
            }

            chain.push(prerequisite);
            current = prerequisite;
        }
    }
}

impl<T, C> ProductionQueue for DesiredArmyQueue<T, C>
where
    T: Copy + Eq + Hash,
    C: Census<T>,
{
    fn is_empty(&self, snapshot: &dyn GameStateSnapshot) -> bool {
        let counts = self.census.counts_by_type(snapshot);

        self.desired
            .iter()
            .all(|(unit_type, desired)| counts.get(unit_type).copied().unwrap_or(0) >= desired.count)
    }

    fn peek(
        &self,
        snapshot: &dyn GameStateSnapshot,
        costs: &dyn CostLookup,
    ) -> Result<BuildingOrUnitType, PlannerError> {
        let next = self
            .priorities(snapshot)
            .first()
            .copied()
            .ok_or(PlannerError::NoDesiredUnits)?;
        let target = (self.convert)(next);

        let cost = lookup_cost(costs, target)?;
        let shortfall = cost.shortfall(snapshot);

        // Waiting on resources is fine; the caller holds off until they arrive.
        if shortfall.difference(Shortfall::RESOURCES).is_empty() {
            return Ok(target);
        }

        // Not buildable for some other reason, so expand production.
        if shortfall.contains(Shortfall::PREREQUISITE) {
            if let Some(prerequisite) = cost.prerequisite {
                // The prerequisite could already be on its way.
                let in_progress = snapshot
                    .units()
                    .iter()
                    .filter(|u| u.is_own())
                    .any(|u| u.counts_as(prerequisite) || u.is_building(prerequisite));

                if in_progress {
                    debug!("{} waiting on {} already in progress", target, prerequisite);
                    return Ok(target);
                }

                return self.unit_or_prerequisite(prerequisite, snapshot, costs);
            }
        }

        // Only the builder is missing. A required add-on is encoded in the
        // prerequisite slot, so the builder may exist but lack the add-on.
        if cost.requires_addon {
            let addon =
                tech_lab_for(cost.builder).ok_or(PlannerError::UnmappedAddonBuilder(cost.builder))?;
            return self.unit_or_prerequisite(addon.into(), snapshot, costs);
        }

        self.unit_or_prerequisite(cost.builder, snapshot, costs)
    }
}

fn lookup_cost(costs: &dyn CostLookup, unit_type: BuildingOrUnitType) -> Result<Cost, PlannerError> {
    costs.cost(unit_type).ok_or_else(|| {
        warn!("No cost known for {}", unit_type);
        PlannerError::MissingCost(unit_type)
    })
}
