use crate::constants::*;
use serde::{Deserialize, Serialize};

/// Tunables for the economy agent. Every field falls back to the game's
/// standard value when missing from a serialized config.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    pub workers_per_mineral_deposit: usize,
    pub workers_per_vespene_structure: u32,
    pub mineral_cluster_radius: f32,
    pub vespene_base_radius: f32,
    pub supply_headroom: u32,
    pub supply_cap_limit: u32,
    pub max_prerequisite_depth: usize,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        EconomyConfig {
            workers_per_mineral_deposit: MAX_WORKERS_PER_MINERAL_DEPOSIT,
            workers_per_vespene_structure: MAX_WORKERS_PER_VESPENE_STRUCTURE,
            mineral_cluster_radius: MINERAL_CLUSTER_RADIUS,
            vespene_base_radius: VESPENE_BASE_RADIUS,
            supply_headroom: SUPPLY_HEADROOM,
            supply_cap_limit: SUPPLY_CAP_LIMIT,
            max_prerequisite_depth: MAX_PREREQUISITE_DEPTH,
        }
    }
}
