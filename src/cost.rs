//! Production costs and the checks that decide whether a type can be
//! produced right now.

use crate::snapshot::*;
use crate::unit_type::*;
use bitflags::bitflags;
use fnv::FnvHashMap;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Reasons a cost is not currently met.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Shortfall: u8 {
        const RESOURCES = 1;
        const PREREQUISITE = 2;
        const BUILDER = 4;
    }
}

/// What producing one instance of a type requires.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cost {
    pub minerals: u32,
    pub vespene: u32,
    pub supply: u32,
    /// Structure that must exist before the type is available. When
    /// `requires_addon` is set this slot holds the add-on the builder needs.
    pub prerequisite: Option<BuildingOrUnitType>,
    /// Unit or structure that produces the type.
    pub builder: BuildingOrUnitType,
    pub requires_addon: bool,
}

impl Cost {
    pub fn new(minerals: u32, vespene: u32, supply: u32, builder: impl Into<BuildingOrUnitType>) -> Self {
        Cost {
            minerals,
            vespene,
            supply,
            prerequisite: None,
            builder: builder.into(),
            requires_addon: false,
        }
    }

    pub fn with_prerequisite(mut self, prerequisite: impl Into<BuildingOrUnitType>) -> Self {
        self.prerequisite = Some(prerequisite.into());
        self
    }

    /// Mark the prerequisite as an add-on that must be attached to the builder.
    pub fn with_required_addon(mut self, addon: impl Into<BuildingOrUnitType>) -> Self {
        self.prerequisite = Some(addon.into());
        self.requires_addon = true;
        self
    }

    /// The add-on a builder must carry, if any.
    pub fn required_addon(&self) -> Option<BuildingOrUnitType> {
        if !self.requires_addon {
            return None;
        }

        self.prerequisite
            .or_else(|| tech_lab_for(self.builder).map(Into::into))
    }

    pub fn has_resources(&self, snapshot: &dyn GameStateSnapshot) -> bool {
        let player = snapshot.player();

        player.minerals >= self.minerals
            && player.vespene >= self.vespene
            && (self.supply == 0 || player.food_used + self.supply <= player.food_cap)
    }

    pub fn has_prerequisite(&self, snapshot: &dyn GameStateSnapshot) -> bool {
        match self.prerequisite {
            None => true,
            Some(prerequisite) => snapshot
                .units()
                .iter()
                .any(|u| u.is_own() && u.is_built() && u.counts_as(prerequisite)),
        }
    }

    /// A completed builder exists, carrying the required add-on if there is one.
    pub fn has_builder(&self, snapshot: &dyn GameStateSnapshot) -> bool {
        let addon = self.required_addon();

        snapshot
            .units()
            .iter()
            .filter(|u| u.is_own() && u.is_built() && u.counts_as(self.builder))
            .any(|builder| match addon {
                None => true,
                Some(addon) => builder
                    .add_on
                    .and_then(|tag| snapshot.unit(tag))
                    .map(|attached| attached.is_built() && attached.counts_as(addon))
                    .unwrap_or(false),
            })
    }

    pub fn shortfall(&self, snapshot: &dyn GameStateSnapshot) -> Shortfall {
        let mut shortfall = Shortfall::empty();

        if !self.has_resources(snapshot) {
            shortfall |= Shortfall::RESOURCES;
        }
        if !self.has_prerequisite(snapshot) {
            shortfall |= Shortfall::PREREQUISITE;
        }
        if !self.has_builder(snapshot) {
            shortfall |= Shortfall::BUILDER;
        }

        shortfall
    }

    pub fn is_met(&self, snapshot: &dyn GameStateSnapshot) -> bool {
        self.shortfall(snapshot).is_empty()
    }
}

/// Source of production costs. Usually backed by the game's data tables.
pub trait CostLookup {
    fn cost(&self, unit_type: BuildingOrUnitType) -> Option<Cost>;
}

/// Cost lookup backed by an in-memory table.
#[derive(Clone, Debug, Default)]
pub struct CostTable {
    costs: FnvHashMap<BuildingOrUnitType, Cost>,
}

impl CostTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, unit_type: impl Into<BuildingOrUnitType>, cost: Cost) -> Option<Cost> {
        self.costs.insert(unit_type.into(), cost)
    }

    pub fn with(mut self, unit_type: impl Into<BuildingOrUnitType>, cost: Cost) -> Self {
        self.insert(unit_type, cost);
        self
    }

    pub fn len(&self) -> usize {
        self.costs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }
}

impl CostLookup for CostTable {
    fn cost(&self, unit_type: BuildingOrUnitType) -> Option<Cost> {
        self.costs.get(&unit_type).copied()
    }
}
