use crate::unit_type::BuildingOrUnitType;
use itertools::Itertools;
use thiserror::Error;

/// Fatal production planner failures. Expected quiet states (nothing to
/// build, waiting on resources) are never reported through this type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlannerError {
    #[error("production queue has no desired units configured")]
    NoDesiredUnits,
    #[error("no cost known for {0}")]
    MissingCost(BuildingOrUnitType),
    #[error("no add-on is known for builder {0}")]
    UnmappedAddonBuilder(BuildingOrUnitType),
    #[error("prerequisite cycle: {}", .chain.iter().join(" -> "))]
    PrerequisiteCycle { chain: Vec<BuildingOrUnitType> },
    #[error("prerequisite chain from {start} exceeds {depth} steps")]
    PrerequisiteDepthExceeded {
        start: BuildingOrUnitType,
        depth: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unit_type::*;

    #[test]
    fn cycle_message_lists_chain() {
        let err = PlannerError::PrerequisiteCycle {
            chain: vec![
                TerranBuildingType::Factory.into(),
                TerranBuildingType::Armory.into(),
                TerranBuildingType::Factory.into(),
            ],
        };
        assert_eq!(err.to_string(), "prerequisite cycle: Factory -> Armory -> Factory");
    }
}
