use crate::unit_type::*;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Race {
    Terran,
    Protoss,
    Zerg,
}

impl Race {
    pub fn worker_type(self) -> BuildingOrUnitType {
        match self {
            Race::Terran => TerranUnitType::Scv.into(),
            Race::Protoss => ProtossUnitType::Probe.into(),
            Race::Zerg => ZergUnitType::Drone.into(),
        }
    }

    /// The type produced to raise supply capacity.
    pub fn supply_type(self) -> BuildingOrUnitType {
        match self {
            Race::Terran => TerranBuildingType::SupplyDepot.into(),
            Race::Protoss => ProtossBuildingType::Pylon.into(),
            Race::Zerg => ZergUnitType::Overlord.into(),
        }
    }

    pub fn main_base_type(self) -> BuildingOrUnitType {
        match self {
            Race::Terran => TerranBuildingType::CommandCenter.into(),
            Race::Protoss => ProtossBuildingType::Nexus.into(),
            Race::Zerg => ZergBuildingType::Hatchery.into(),
        }
    }

    pub fn vespene_structure_type(self) -> BuildingOrUnitType {
        match self {
            Race::Terran => TerranBuildingType::Refinery.into(),
            Race::Protoss => ProtossBuildingType::Assimilator.into(),
            Race::Zerg => ZergBuildingType::Extractor.into(),
        }
    }
}
