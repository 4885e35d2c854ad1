/// Simultaneous harvesters a mineral deposit supports.
pub const MAX_WORKERS_PER_MINERAL_DEPOSIT: usize = 2;

/// Simultaneous harvesters a vespene structure supports. Enforced by the
/// game itself; the tracker only respects it.
pub const MAX_WORKERS_PER_VESPENE_STRUCTURE: u32 = 3;

/// A deposit cluster belongs to a base only if the base is within this
/// edge distance of the cluster centre.
pub const MINERAL_CLUSTER_RADIUS: f32 = 10.0;

/// Vespene structures further than this from every main base are ignored.
pub const VESPENE_BASE_RADIUS: f32 = 20.0;

/// Supply providers are queued once free supply drops below this.
pub const SUPPLY_HEADROOM: u32 = 5;

/// Hard game limit on supply capacity.
pub const SUPPLY_CAP_LIMIT: u32 = 200;

/// Longest prerequisite chain the production planner will walk.
pub const MAX_PREREQUISITE_DEPTH: usize = 16;
