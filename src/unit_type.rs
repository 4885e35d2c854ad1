//! Per-faction unit and building enumerations and the shared
//! `BuildingOrUnitType` union.
//!
//! The `From` / `TryFrom` impls generated here are the only conversion
//! surface between a faction enum and the union. Anything generic over a
//! faction enum (e.g. the production queue) is bounded on these impls so a
//! missing conversion is a compile error rather than a runtime failure.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TerranUnitType {
    Scv,
    Mule,
    Marine,
    Marauder,
    Reaper,
    Ghost,
    Hellion,
    Hellbat,
    WidowMine,
    SiegeTank,
    Cyclone,
    Thor,
    Viking,
    Medivac,
    Liberator,
    Raven,
    Banshee,
    Battlecruiser,
    AutoTurret,
    PointDefenseDrone,
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TerranBuildingType {
    CommandCenter,
    OrbitalCommand,
    PlanetaryFortress,
    SupplyDepot,
    Refinery,
    Barracks,
    EngineeringBay,
    Bunker,
    MissileTurret,
    SensorTower,
    GhostAcademy,
    Factory,
    Armory,
    Starport,
    FusionCore,
    BarracksTechLab,
    FactoryTechLab,
    StarportTechLab,
    BarracksReactor,
    FactoryReactor,
    StarportReactor,
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ProtossUnitType {
    Probe,
    Zealot,
    Stalker,
    Sentry,
    Adept,
    HighTemplar,
    DarkTemplar,
    Archon,
    Immortal,
    Colossus,
    Disruptor,
    Observer,
    WarpPrism,
    Phoenix,
    VoidRay,
    Oracle,
    Carrier,
    Interceptor,
    Tempest,
    Mothership,
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ProtossBuildingType {
    Nexus,
    Pylon,
    Assimilator,
    Gateway,
    WarpGate,
    Forge,
    CyberneticsCore,
    PhotonCannon,
    ShieldBattery,
    RoboticsFacility,
    Stargate,
    TwilightCouncil,
    RoboticsBay,
    FleetBeacon,
    TemplarArchives,
    DarkShrine,
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ZergUnitType {
    Larva,
    Egg,
    Cocoon,
    Drone,
    Queen,
    Zergling,
    Baneling,
    Roach,
    Ravager,
    Hydralisk,
    Lurker,
    Infestor,
    InfestedTerran,
    SwarmHost,
    Locust,
    Ultralisk,
    Broodling,
    Overlord,
    Overseer,
    Changeling,
    Mutalisk,
    Corruptor,
    BroodLord,
    Viper,
    // Arguably a building.
    NydusWorm,
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ZergBuildingType {
    Hatchery,
    Lair,
    Hive,
    Extractor,
    SpawningPool,
    EvolutionChamber,
    RoachWarren,
    BanelingNest,
    SpineCrawler,
    SporeCrawler,
    HydraliskDen,
    LurkerDen,
    InfestationPit,
    Spire,
    GreaterSpire,
    NydusNetwork,
    UltraliskCavern,
    CreepTumor,
}

/// Map features that are not owned by any faction.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NeutralType {
    MineralField,
    RichMineralField,
    VespeneGeyser,
    RichVespeneGeyser,
    Destructible,
}

/// Every buildable or observable type across all factions.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BuildingOrUnitType {
    TerranUnit(TerranUnitType),
    TerranBuilding(TerranBuildingType),
    ProtossUnit(ProtossUnitType),
    ProtossBuilding(ProtossBuildingType),
    ZergUnit(ZergUnitType),
    ZergBuilding(ZergBuildingType),
    Neutral(NeutralType),
}

/// Returned when a union value is converted into the wrong faction enum.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
#[error("{actual} is not a {expected}")]
pub struct UnknownFactionType {
    pub actual: BuildingOrUnitType,
    pub expected: &'static str,
}

macro_rules! faction_conversions {
    ($($faction:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$faction> for BuildingOrUnitType {
                fn from(value: $faction) -> Self {
                    BuildingOrUnitType::$variant(value)
                }
            }

            impl TryFrom<BuildingOrUnitType> for $faction {
                type Error = UnknownFactionType;

                fn try_from(value: BuildingOrUnitType) -> Result<Self, Self::Error> {
                    match value {
                        BuildingOrUnitType::$variant(inner) => Ok(inner),
                        actual => Err(UnknownFactionType {
                            actual,
                            expected: stringify!($faction),
                        }),
                    }
                }
            }
        )*
    };
}

faction_conversions! {
    TerranUnitType => TerranUnit,
    TerranBuildingType => TerranBuilding,
    ProtossUnitType => ProtossUnit,
    ProtossBuildingType => ProtossBuilding,
    ZergUnitType => ZergUnit,
    ZergBuildingType => ZergBuilding,
    NeutralType => Neutral,
}

impl BuildingOrUnitType {
    pub fn is_building(self) -> bool {
        matches!(
            self,
            BuildingOrUnitType::TerranBuilding(_)
                | BuildingOrUnitType::ProtossBuilding(_)
                | BuildingOrUnitType::ZergBuilding(_)
        )
    }

    pub fn is_worker(self) -> bool {
        matches!(
            self,
            BuildingOrUnitType::TerranUnit(TerranUnitType::Scv)
                | BuildingOrUnitType::ProtossUnit(ProtossUnitType::Probe)
                | BuildingOrUnitType::ZergUnit(ZergUnitType::Drone)
        )
    }

    /// Town halls, including their upgraded forms.
    pub fn is_main_base(self) -> bool {
        matches!(
            self,
            BuildingOrUnitType::TerranBuilding(
                TerranBuildingType::CommandCenter
                    | TerranBuildingType::OrbitalCommand
                    | TerranBuildingType::PlanetaryFortress
            ) | BuildingOrUnitType::ProtossBuilding(ProtossBuildingType::Nexus)
                | BuildingOrUnitType::ZergBuilding(
                    ZergBuildingType::Hatchery | ZergBuildingType::Lair | ZergBuildingType::Hive
                )
        )
    }

    pub fn is_vespene_structure(self) -> bool {
        matches!(
            self,
            BuildingOrUnitType::TerranBuilding(TerranBuildingType::Refinery)
                | BuildingOrUnitType::ProtossBuilding(ProtossBuildingType::Assimilator)
                | BuildingOrUnitType::ZergBuilding(ZergBuildingType::Extractor)
        )
    }

    /// Whether an existing unit of this type satisfies a requirement for
    /// `other`. Upgraded structures keep counting as what they were built from.
    pub fn counts_as(self, other: BuildingOrUnitType) -> bool {
        use BuildingOrUnitType::*;

        if self == other {
            return true;
        }

        match (self, other) {
            (
                TerranBuilding(TerranBuildingType::OrbitalCommand | TerranBuildingType::PlanetaryFortress),
                TerranBuilding(TerranBuildingType::CommandCenter),
            ) => true,
            (
                ZergBuilding(ZergBuildingType::Lair | ZergBuildingType::Hive),
                ZergBuilding(ZergBuildingType::Hatchery),
            ) => true,
            (ZergBuilding(ZergBuildingType::Hive), ZergBuilding(ZergBuildingType::Lair)) => true,
            (ZergBuilding(ZergBuildingType::GreaterSpire), ZergBuilding(ZergBuildingType::Spire)) => true,
            (ProtossBuilding(ProtossBuildingType::WarpGate), ProtossBuilding(ProtossBuildingType::Gateway)) => {
                true
            }
            _ => false,
        }
    }
}

impl fmt::Display for BuildingOrUnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildingOrUnitType::TerranUnit(t) => write!(f, "{:?}", t),
            BuildingOrUnitType::TerranBuilding(t) => write!(f, "{:?}", t),
            BuildingOrUnitType::ProtossUnit(t) => write!(f, "{:?}", t),
            BuildingOrUnitType::ProtossBuilding(t) => write!(f, "{:?}", t),
            BuildingOrUnitType::ZergUnit(t) => write!(f, "{:?}", t),
            BuildingOrUnitType::ZergBuilding(t) => write!(f, "{:?}", t),
            BuildingOrUnitType::Neutral(t) => write!(f, "{:?}", t),
        }
    }
}

/// Builder types whose advanced products are gated on an attached tech lab.
pub fn tech_lab_for(builder: BuildingOrUnitType) -> Option<TerranBuildingType> {
    match builder {
        BuildingOrUnitType::TerranBuilding(TerranBuildingType::Barracks) => {
            Some(TerranBuildingType::BarracksTechLab)
        }
        BuildingOrUnitType::TerranBuilding(TerranBuildingType::Factory) => {
            Some(TerranBuildingType::FactoryTechLab)
        }
        BuildingOrUnitType::TerranBuilding(TerranBuildingType::Starport) => {
            Some(TerranBuildingType::StarportTechLab)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn faction_round_trip_rejects_other_factions() {
        let marine: BuildingOrUnitType = TerranUnitType::Marine.into();
        assert_eq!(TerranUnitType::try_from(marine), Ok(TerranUnitType::Marine));

        let err = ZergUnitType::try_from(marine).unwrap_err();
        assert_eq!(err.actual, marine);
        assert_eq!(err.expected, "ZergUnitType");
    }

    #[test]
    fn upgraded_structures_count_as_their_base_form() {
        let hive: BuildingOrUnitType = ZergBuildingType::Hive.into();
        assert!(hive.counts_as(ZergBuildingType::Lair.into()));
        assert!(hive.counts_as(ZergBuildingType::Hatchery.into()));

        let lair: BuildingOrUnitType = ZergBuildingType::Lair.into();
        assert!(!lair.counts_as(ZergBuildingType::Hive.into()));

        let orbital: BuildingOrUnitType = TerranBuildingType::OrbitalCommand.into();
        assert!(orbital.counts_as(TerranBuildingType::CommandCenter.into()));
        assert!(orbital.is_main_base());
    }

    #[test]
    fn only_three_builders_have_tech_labs() {
        assert_eq!(
            tech_lab_for(TerranBuildingType::Factory.into()),
            Some(TerranBuildingType::FactoryTechLab)
        );
        assert_eq!(tech_lab_for(TerranBuildingType::CommandCenter.into()), None);
        assert_eq!(tech_lab_for(ProtossBuildingType::Gateway.into()), None);
    }

    #[test]
    fn classification_helpers() {
        assert!(BuildingOrUnitType::from(ProtossUnitType::Probe).is_worker());
        assert!(!BuildingOrUnitType::from(ProtossUnitType::Zealot).is_worker());
        assert!(BuildingOrUnitType::from(ZergBuildingType::Extractor).is_vespene_structure());
        assert!(BuildingOrUnitType::from(TerranBuildingType::Barracks).is_building());
        assert!(!BuildingOrUnitType::from(NeutralType::MineralField).is_building());
    }
}
