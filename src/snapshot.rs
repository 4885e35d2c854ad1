//! Read-only view of the game world for a single tick.
//!
//! Translating the engine's wire representation into these types happens
//! outside this crate. `GameStateSnapshot` is the seam; `WorldSnapshot` is an
//! owned implementation usable by hosts that already hold a unit list, and by
//! offline tests.

use crate::location::*;
use crate::unit_type::*;
use serde::{Deserialize, Serialize};

/// Opaque engine identity of a unit. Stable for the lifetime of the unit.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitTag(pub u64);

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub enum Alliance {
    Own,
    Ally,
    Neutral,
    Enemy,
}

/// An order currently queued on a unit.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub enum UnitOrder {
    Harvest { target: UnitTag },
    /// A worker constructing a structure.
    Build { unit_type: BuildingOrUnitType },
    /// A producer (or larva/egg) training a unit.
    Train { unit_type: BuildingOrUnitType },
    Other,
}

/// A live, visible unit.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Unit {
    pub tag: UnitTag,
    pub unit_type: BuildingOrUnitType,
    pub alliance: Alliance,
    pub position: Point2,
    pub radius: f32,
    /// 0.0 while under construction, 1.0 once complete.
    pub build_progress: f32,
    pub orders: Vec<UnitOrder>,
    pub mineral_contents: u32,
    pub vespene_contents: u32,
    /// Live harvester count reported by the engine (vespene structures only).
    pub assigned_harvesters: Option<u32>,
    /// Attached add-on (tech lab / reactor).
    pub add_on: Option<UnitTag>,
}

impl Unit {
    pub fn new(
        tag: UnitTag,
        unit_type: impl Into<BuildingOrUnitType>,
        alliance: Alliance,
        position: Point2,
    ) -> Self {
        Unit {
            tag,
            unit_type: unit_type.into(),
            alliance,
            position,
            radius: 0.0,
            build_progress: 1.0,
            orders: Vec::new(),
            mineral_contents: 0,
            vespene_contents: 0,
            assigned_harvesters: None,
            add_on: None,
        }
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_build_progress(mut self, build_progress: f32) -> Self {
        self.build_progress = build_progress;
        self
    }

    pub fn with_order(mut self, order: UnitOrder) -> Self {
        self.orders.push(order);
        self
    }

    pub fn with_minerals(mut self, contents: u32) -> Self {
        self.mineral_contents = contents;
        self
    }

    pub fn with_vespene(mut self, contents: u32, assigned_harvesters: u32) -> Self {
        self.vespene_contents = contents;
        self.assigned_harvesters = Some(assigned_harvesters);
        self
    }

    pub fn with_add_on(mut self, add_on: UnitTag) -> Self {
        self.add_on = Some(add_on);
        self
    }

    pub fn is_own(&self) -> bool {
        self.alliance == Alliance::Own
    }

    /// A unit with no outstanding orders.
    pub fn is_idle(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn is_built(&self) -> bool {
        self.build_progress >= 1.0
    }

    pub fn is_worker(&self) -> bool {
        self.unit_type.is_worker()
    }

    pub fn is_main_base(&self) -> bool {
        self.unit_type.is_main_base()
    }

    pub fn is_vespene_structure(&self) -> bool {
        self.unit_type.is_vespene_structure()
    }

    pub fn is_mineral_deposit(&self) -> bool {
        self.alliance == Alliance::Neutral && self.mineral_contents > 0
    }

    pub fn counts_as(&self, unit_type: BuildingOrUnitType) -> bool {
        self.unit_type.counts_as(unit_type)
    }

    /// Whether this unit currently has an order to build or train `unit_type`.
    pub fn is_building(&self, unit_type: BuildingOrUnitType) -> bool {
        self.orders.iter().any(|order| match order {
            UnitOrder::Build { unit_type: t } | UnitOrder::Train { unit_type: t } => *t == unit_type,
            _ => false,
        })
    }

    /// Horizontal distance between the edge of this unit and a point.
    pub fn distance_to_point(&self, point: Point2) -> f32 {
        self.position.distance_to(point) - self.radius
    }

    /// Edge-to-edge distance between two units.
    pub fn distance_to(&self, other: &Unit) -> f32 {
        self.distance_to_point(other.position) - other.radius
    }

    /// The closest of `others` by edge distance. Ties keep the earliest.
    pub fn closest<'a, I>(&self, others: I) -> Option<&'a Unit>
    where
        I: IntoIterator<Item = &'a Unit>,
    {
        let mut closest: Option<(&'a Unit, f32)> = None;

        for other in others {
            let distance = self.distance_to(other);
            match closest {
                Some((_, best)) if best <= distance => {}
                _ => closest = Some((other, distance)),
            }
        }

        closest.map(|(unit, _)| unit)
    }
}

/// Player-wide economy totals.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerCommon {
    pub minerals: u32,
    pub vespene: u32,
    pub food_used: u32,
    pub food_cap: u32,
}

/// A cluster of resource nodes that a base harvests from.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResourceDeposit {
    pub center: Point2,
    pub resources: Vec<UnitTag>,
}

/// Everything the decision core reads about the world on one tick.
pub trait GameStateSnapshot {
    fn units(&self) -> &[Unit];

    fn player(&self) -> &PlayerCommon;

    /// Deposit clusters with a centre within `radius` edge distance of any
    /// of the given bases.
    fn controlled_deposits(&self, bases: &[&Unit], radius: f32) -> Vec<ResourceDeposit>;

    fn unit(&self, tag: UnitTag) -> Option<&Unit> {
        self.units().iter().find(|u| u.tag == tag)
    }
}

/// Owned snapshot with precomputed deposit clusters.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub units: Vec<Unit>,
    pub player: PlayerCommon,
    pub deposits: Vec<ResourceDeposit>,
}

impl WorldSnapshot {
    pub fn new(player: PlayerCommon) -> Self {
        WorldSnapshot {
            units: Vec::new(),
            player,
            deposits: Vec::new(),
        }
    }

    pub fn add_unit(&mut self, unit: Unit) {
        self.units.push(unit);
    }

    pub fn add_deposit(&mut self, deposit: ResourceDeposit) {
        self.deposits.push(deposit);
    }

    /// Drop a unit, e.g. to simulate it dying between ticks.
    pub fn remove_unit(&mut self, tag: UnitTag) -> Option<Unit> {
        let index = self.units.iter().position(|u| u.tag == tag)?;
        Some(self.units.remove(index))
    }

    pub fn unit_mut(&mut self, tag: UnitTag) -> Option<&mut Unit> {
        self.units.iter_mut().find(|u| u.tag == tag)
    }
}

impl GameStateSnapshot for WorldSnapshot {
    fn units(&self) -> &[Unit] {
        &self.units
    }

    fn player(&self) -> &PlayerCommon {
        &self.player
    }

    fn controlled_deposits(&self, bases: &[&Unit], radius: f32) -> Vec<ResourceDeposit> {
        self.deposits
            .iter()
            .filter(|d| {
                bases
                    .iter()
                    .any(|b| b.distance_to_point(d.center) < radius)
            })
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MINERAL_CLUSTER_RADIUS;

    fn worker(tag: u64, x: f32, y: f32) -> Unit {
        Unit::new(UnitTag(tag), TerranUnitType::Scv, Alliance::Own, Point2::new(x, y)).with_radius(0.5)
    }

    #[test]
    fn edge_distance_subtracts_both_radii() {
        let a = worker(1, 0.0, 0.0);
        let b = worker(2, 3.0, 4.0);
        assert!((a.distance_to(&b) - 4.0).abs() < 1e-5);
        assert!((a.distance_to_point(Point2::new(3.0, 4.0)) - 4.5).abs() < 1e-5);
    }

    #[test]
    fn closest_prefers_earliest_on_tie() {
        let me = worker(1, 0.0, 0.0);
        let left = worker(2, -2.0, 0.0);
        let right = worker(3, 2.0, 0.0);
        let far = worker(4, 9.0, 0.0);
        let others = [left, right, far];
        assert_eq!(me.closest(&others).map(|u| u.tag), Some(UnitTag(2)));
        assert!(me.closest(&[] as &[Unit]).is_none());
    }

    #[test]
    fn mineral_deposit_requires_neutral_contents() {
        let field = Unit::new(UnitTag(9), NeutralType::MineralField, Alliance::Neutral, Point2::default());
        assert!(!field.is_mineral_deposit());
        assert!(field.clone().with_minerals(900).is_mineral_deposit());

        let mined_out = Unit::new(UnitTag(10), NeutralType::MineralField, Alliance::Enemy, Point2::default())
            .with_minerals(900);
        assert!(!mined_out.is_mineral_deposit());
    }

    #[test]
    fn idle_and_building_follow_orders() {
        let depot = BuildingOrUnitType::from(TerranBuildingType::SupplyDepot);
        let scv = worker(1, 0.0, 0.0);
        assert!(scv.is_idle());

        let scv = scv.with_order(UnitOrder::Build { unit_type: depot });
        assert!(!scv.is_idle());
        assert!(scv.is_building(depot));
        assert!(!scv.is_building(TerranBuildingType::Barracks.into()));
    }

    #[test]
    fn world_snapshot_filters_deposits_by_base_range() {
        let mut world = WorldSnapshot::new(PlayerCommon::default());
        world.add_deposit(ResourceDeposit {
            center: Point2::new(5.0, 0.0),
            resources: vec![UnitTag(100)],
        });
        world.add_deposit(ResourceDeposit {
            center: Point2::new(60.0, 0.0),
            resources: vec![UnitTag(200)],
        });
        let base = Unit::new(
            UnitTag(1),
            TerranBuildingType::CommandCenter,
            Alliance::Own,
            Point2::new(0.0, 0.0),
        )
        .with_radius(2.5);

        let controlled = world.controlled_deposits(&[&base], MINERAL_CLUSTER_RADIUS);
        assert_eq!(controlled.len(), 1);
        assert_eq!(controlled[0].resources, vec![UnitTag(100)]);
        assert!(world.controlled_deposits(&[], MINERAL_CLUSTER_RADIUS).is_empty());

        // A tighter radius excludes the near cluster too.
        assert!(world.controlled_deposits(&[&base], 2.0).is_empty());
    }
}
