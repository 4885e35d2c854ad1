use crate::location::*;
use crate::snapshot::UnitTag;
use crate::unit_type::BuildingOrUnitType;
use serde::{Deserialize, Serialize};

/// An action the decision core wants the caller to perform.
///
/// Commands are pure data. The caller is responsible for translating them
/// into engine actions (or any other backend); production placement and
/// queueing are likewise left to the caller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Send a worker to gather from a mineral deposit or vespene structure.
    Harvest { worker: UnitTag, target: UnitTag },
    /// Produce one unit or structure of the given type.
    Produce { unit_type: BuildingOrUnitType },
    /// Set where newly produced workers from a base gather.
    RallyWorkers { base: UnitTag, position: Point2 },
}

impl Command {
    pub fn harvest_target(&self) -> Option<UnitTag> {
        match self {
            Command::Harvest { target, .. } => Some(*target),
            _ => None,
        }
    }

    pub fn produced_type(&self) -> Option<BuildingOrUnitType> {
        match self {
            Command::Produce { unit_type } => Some(*unit_type),
            _ => None,
        }
    }
}
