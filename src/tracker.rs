//! Worker-to-resource assignment tracking.
//!
//! The engine's own harvesting logic piles new workers onto whichever node is
//! closest to the base, so the tracker keeps its own record of which workers
//! mine which mineral deposit and hands idle workers to nodes that are below
//! capacity. Vespene structures report their harvester count directly, so
//! they are never tracked here; the live count is used instead.

use crate::command::*;
use crate::config::*;
use crate::location::*;
use crate::snapshot::*;
use fnv::{FnvHashMap, FnvHashSet};
use itertools::Itertools;
use log::*;

/// Lifecycle of the tracker. The first reconciliation discards whatever the
/// engine told workers to do and sets worker rally points; every later one
/// only reacts to changes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TrackerPhase {
    Uninitialized,
    Steady,
}

/// A usable vespene structure and its engine-reported harvester count.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct VespeneStructure {
    pub tag: UnitTag,
    pub assigned_harvesters: u32,
}

/// Classification of the world relevant to harvesting on one tick.
#[derive(Clone, Debug, Default)]
pub struct HarvestSurvey {
    /// Main bases with their positions (used for rally points).
    pub main_bases: Vec<(UnitTag, Point2)>,
    pub vespene_structures: Vec<VespeneStructure>,
    pub workers: Vec<UnitTag>,
    /// Workers with no outstanding orders, in snapshot order.
    pub idle_workers: Vec<UnitTag>,
    /// Mineral deposits harvestable from a completed base.
    pub mineral_deposits: Vec<UnitTag>,
}

impl HarvestSurvey {
    pub fn has_main_base(&self) -> bool {
        !self.main_bases.is_empty()
    }
}

/// Tracks which workers harvest which mineral deposit.
pub struct HarvestTracker {
    config: EconomyConfig,
    phase: TrackerPhase,
    workers_by_mineral_deposit: FnvHashMap<UnitTag, Vec<UnitTag>>,
}

impl Default for HarvestTracker {
    fn default() -> Self {
        Self::new(EconomyConfig::default())
    }
}

impl HarvestTracker {
    pub fn new(config: EconomyConfig) -> Self {
        HarvestTracker {
            config,
            phase: TrackerPhase::Uninitialized,
            workers_by_mineral_deposit: FnvHashMap::default(),
        }
    }

    pub fn phase(&self) -> TrackerPhase {
        self.phase
    }

    /// Workers currently assigned to a mineral deposit.
    pub fn assigned_workers(&self, deposit: UnitTag) -> &[UnitTag] {
        self.workers_by_mineral_deposit
            .get(&deposit)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// The mineral deposit a worker is assigned to, if any.
    pub fn assignment_of(&self, worker: UnitTag) -> Option<UnitTag> {
        self.workers_by_mineral_deposit
            .iter()
            .find(|(_, workers)| workers.contains(&worker))
            .map(|(deposit, _)| *deposit)
    }

    /// All mineral deposits seen so far.
    pub fn tracked_nodes(&self) -> impl Iterator<Item = UnitTag> + '_ {
        self.workers_by_mineral_deposit.keys().copied()
    }

    /// Forget any assignment for the worker, e.g. after the caller gave it a
    /// different job. Returns whether the worker was tracked.
    pub fn remove_worker(&mut self, worker: UnitTag) -> bool {
        let mut removed = false;

        for workers in self.workers_by_mineral_deposit.values_mut() {
            let before = workers.len();
            workers.retain(|w| *w != worker);
            removed |= workers.len() != before;
        }

        removed
    }

    /// Classify the snapshot into bases, vespene structures, workers and
    /// harvestable mineral deposits.
    pub fn survey(&self, snapshot: &dyn GameStateSnapshot) -> HarvestSurvey {
        let mut main_bases: Vec<&Unit> = Vec::new();
        let mut vespene_buildings: Vec<&Unit> = Vec::new();
        let mut workers: Vec<&Unit> = Vec::new();

        for unit in snapshot.units().iter().filter(|u| u.is_own()) {
            if unit.is_main_base() {
                main_bases.push(unit);
            } else if unit.is_vespene_structure() {
                if unit.is_built() {
                    vespene_buildings.push(unit);
                }
            } else if unit.is_worker() {
                workers.push(unit);
            }
        }

        // Ignore empty vespene structures and those whose base was destroyed or relocated.
        let vespene_structures = vespene_buildings
            .iter()
            .filter(|v| v.vespene_contents > 0)
            .filter(|v| {
                main_bases
                    .iter()
                    .any(|b| b.distance_to(v) < self.config.vespene_base_radius)
            })
            .map(|v| VespeneStructure {
                tag: v.tag,
                assigned_harvesters: v.assigned_harvesters.unwrap_or(0),
            })
            .collect_vec();

        let mut mineral_deposits = Vec::new();

        let radius = self.config.mineral_cluster_radius;

        for deposit in snapshot.controlled_deposits(&main_bases, radius) {
            // An unfinished base next to the cluster must not hide a finished one.
            let harvestable = main_bases
                .iter()
                .any(|b| b.is_built() && b.distance_to_point(deposit.center) < radius);

            if harvestable {
                mineral_deposits.extend(
                    deposit
                        .resources
                        .iter()
                        .filter_map(|tag| snapshot.unit(*tag))
                        .filter(|r| r.is_mineral_deposit())
                        .map(|r| r.tag),
                );
            }
        }

        HarvestSurvey {
            main_bases: main_bases.iter().map(|b| (b.tag, b.position)).collect(),
            vespene_structures,
            idle_workers: workers.iter().filter(|w| w.is_idle()).map(|w| w.tag).collect(),
            workers: workers.iter().map(|w| w.tag).collect(),
            mineral_deposits,
        }
    }

    /// Bring tracked state in line with the snapshot and hand out work to idle
    /// workers. Returns the commands to issue this tick.
    pub fn reconcile(&mut self, snapshot: &dyn GameStateSnapshot) -> Vec<Command> {
        let survey = self.survey(snapshot);
        self.reconcile_survey(&survey)
    }

    /// Same as [`HarvestTracker::reconcile`] for a survey that was already taken.
    pub fn reconcile_survey(&mut self, survey: &HarvestSurvey) -> Vec<Command> {
        for deposit in &survey.mineral_deposits {
            self.workers_by_mineral_deposit.entry(*deposit).or_default();
        }

        self.remove_killed_workers(&survey.workers);

        if !survey.has_main_base() {
            // Accept death as inevitable.
            warn!("No main base alive, skipping worker assignment");
            return Vec::new();
        }

        // First update: ignore the default worker orders, which mass every
        // worker on the centre mineral deposit and desynchronize tracking.
        let mut idle_workers = match self.phase {
            TrackerPhase::Uninitialized => survey.workers.clone(),
            TrackerPhase::Steady => survey.idle_workers.clone(),
        };

        let mut commands = Vec::new();

        self.assign_idle_workers(survey, &mut idle_workers, &mut commands);

        if self.phase == TrackerPhase::Uninitialized {
            info!(
                "Initial worker reset: {} workers, {} mineral deposits, {} bases",
                survey.workers.len(),
                survey.mineral_deposits.len(),
                survey.main_bases.len()
            );

            // New workers must not start harvesting on their own, since
            // assignments are managed here.
            for (base, position) in &survey.main_bases {
                commands.push(Command::RallyWorkers {
                    base: *base,
                    position: *position,
                });
            }

            self.phase = TrackerPhase::Steady;
        }

        commands
    }

    /// Whether every surveyed node is at capacity.
    pub fn is_fully_harvesting(&self, survey: &HarvestSurvey) -> bool {
        self.is_fully_harvesting_minerals(survey) && self.is_fully_harvesting_vespene(survey)
    }

    pub fn is_fully_harvesting_minerals(&self, survey: &HarvestSurvey) -> bool {
        self.mineral_needing_workers(survey).is_none()
    }

    pub fn is_fully_harvesting_vespene(&self, survey: &HarvestSurvey) -> bool {
        survey
            .vespene_structures
            .iter()
            .all(|v| v.assigned_harvesters >= self.config.workers_per_vespene_structure)
    }

    fn remove_killed_workers(&mut self, live_workers: &[UnitTag]) {
        let live: FnvHashSet<UnitTag> = live_workers.iter().copied().collect();

        // This also drops workers that are currently inside a vespene
        // structure; the live harvester count covers those.
        for (deposit, workers) in self.workers_by_mineral_deposit.iter_mut() {
            let before = workers.len();
            workers.retain(|w| live.contains(w));
            if workers.len() != before {
                debug!(
                    "Pruned {} missing workers from deposit {:?}",
                    before - workers.len(),
                    deposit
                );
            }
        }
    }

    fn assign_idle_workers(
        &mut self,
        survey: &HarvestSurvey,
        idle_workers: &mut Vec<UnitTag>,
        commands: &mut Vec<Command>,
    ) {
        while !idle_workers.is_empty() {
            let Some(deposit) = self.mineral_needing_workers(survey) else {
                break;
            };
            let Some(worker) = idle_workers.pop() else {
                break;
            };

            debug!("Assigning worker {:?} to mineral deposit {:?}", worker, deposit);
            commands.push(Command::Harvest {
                worker,
                target: deposit,
            });
            self.assign_worker_to_minerals(worker, deposit);
        }

        // Live harvester counts do not change within a tick, so workers sent
        // this tick are counted separately.
        let mut sent_to_vespene: FnvHashMap<UnitTag, u32> = FnvHashMap::default();

        while !idle_workers.is_empty() {
            let Some(structure) = survey.vespene_structures.iter().find(|v| {
                v.assigned_harvesters + sent_to_vespene.get(&v.tag).copied().unwrap_or(0)
                    < self.config.workers_per_vespene_structure
            }) else {
                break;
            };
            let Some(worker) = idle_workers.pop() else {
                break;
            };

            debug!("Assigning worker {:?} to vespene structure {:?}", worker, structure.tag);
            commands.push(Command::Harvest {
                worker,
                target: structure.tag,
            });
            self.remove_worker(worker);
            *sent_to_vespene.entry(structure.tag).or_default() += 1;
        }
    }

    fn assign_worker_to_minerals(&mut self, worker: UnitTag, deposit: UnitTag) {
        self.remove_worker(worker);
        self.workers_by_mineral_deposit
            .entry(deposit)
            .or_default()
            .push(worker);
    }

    fn mineral_needing_workers(&self, survey: &HarvestSurvey) -> Option<UnitTag> {
        survey
            .mineral_deposits
            .iter()
            .copied()
            .find(|deposit| self.assigned_workers(*deposit).len() < self.config.workers_per_mineral_deposit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unit_type::*;

    const BASE: UnitTag = UnitTag(1);

    fn base_world() -> WorldSnapshot {
        let mut world = WorldSnapshot::new(PlayerCommon::default());
        world.add_unit(
            Unit::new(BASE, TerranBuildingType::CommandCenter, Alliance::Own, Point2::new(50.0, 50.0))
                .with_radius(2.5),
        );
        world
    }

    fn add_minerals(world: &mut WorldSnapshot, tags: &[u64]) {
        for (i, tag) in tags.iter().enumerate() {
            world.add_unit(
                Unit::new(
                    UnitTag(*tag),
                    NeutralType::MineralField,
                    Alliance::Neutral,
                    Point2::new(56.0, 46.0 + i as f32),
                )
                .with_minerals(1500),
            );
        }
        world.add_deposit(ResourceDeposit {
            center: Point2::new(57.0, 48.0),
            resources: tags.iter().map(|t| UnitTag(*t)).collect(),
        });
    }

    fn add_worker(world: &mut WorldSnapshot, tag: u64, idle: bool) {
        let mut worker = Unit::new(UnitTag(tag), TerranUnitType::Scv, Alliance::Own, Point2::new(52.0, 50.0));
        if !idle {
            worker = worker.with_order(UnitOrder::Other);
        }
        world.add_unit(worker);
    }

    fn harvests(commands: &[Command]) -> Vec<(UnitTag, UnitTag)> {
        commands
            .iter()
            .filter_map(|c| match c {
                Command::Harvest { worker, target } => Some((*worker, *target)),
                _ => None,
            })
            .collect()
    }

    fn assert_unique_assignments(tracker: &HarvestTracker) {
        let mut seen = FnvHashSet::default();
        for node in tracker.tracked_nodes() {
            let workers = tracker.assigned_workers(node);
            assert!(workers.len() <= 2, "deposit {:?} has {} workers", node, workers.len());
            for worker in workers {
                assert!(seen.insert(*worker), "worker {:?} assigned twice", worker);
            }
        }
    }

    #[test]
    fn single_idle_worker_goes_to_single_deposit() {
        let mut world = base_world();
        add_minerals(&mut world, &[100]);
        add_worker(&mut world, 10, true);

        let mut tracker = HarvestTracker::default();
        let commands = tracker.reconcile(&world);

        assert_eq!(harvests(&commands), vec![(UnitTag(10), UnitTag(100))]);
        assert_eq!(tracker.assigned_workers(UnitTag(100)), &[UnitTag(10)]);
    }

    #[test]
    fn first_reconcile_resets_orders_and_rallies_once() {
        let mut world = base_world();
        add_minerals(&mut world, &[100, 101]);
        for tag in 10..13 {
            add_worker(&mut world, tag, false);
        }

        let mut tracker = HarvestTracker::default();
        assert_eq!(tracker.phase(), TrackerPhase::Uninitialized);

        let commands = tracker.reconcile(&world);
        assert_eq!(harvests(&commands).len(), 3);
        assert_eq!(
            commands.last(),
            Some(&Command::RallyWorkers {
                base: BASE,
                position: Point2::new(50.0, 50.0)
            })
        );
        assert_eq!(tracker.phase(), TrackerPhase::Steady);

        // Busy workers are left alone from now on, and no second rally.
        let commands = tracker.reconcile(&world);
        assert!(commands.is_empty());
    }

    #[test]
    fn capacity_is_respected_with_many_workers() {
        let mut world = base_world();
        add_minerals(&mut world, &[100, 101, 102]);
        for tag in 10..20 {
            add_worker(&mut world, tag, true);
        }

        let mut tracker = HarvestTracker::default();
        let commands = tracker.reconcile(&world);

        assert_eq!(harvests(&commands).len(), 6);
        assert_unique_assignments(&tracker);
        for deposit in [100, 101, 102] {
            assert_eq!(tracker.assigned_workers(UnitTag(deposit)).len(), 2);
        }
    }

    #[test]
    fn vanished_workers_are_pruned() {
        let mut world = base_world();
        add_minerals(&mut world, &[100]);
        add_worker(&mut world, 10, true);
        add_worker(&mut world, 11, true);

        let mut tracker = HarvestTracker::default();
        tracker.reconcile(&world);
        assert_eq!(tracker.assigned_workers(UnitTag(100)).len(), 2);

        world.remove_unit(UnitTag(10));
        world.unit_mut(UnitTag(11)).unwrap().orders.push(UnitOrder::Other);

        let commands = tracker.reconcile(&world);
        assert!(commands.is_empty());
        assert_eq!(tracker.assigned_workers(UnitTag(100)), &[UnitTag(11)]);
        assert_eq!(tracker.assignment_of(UnitTag(10)), None);
    }

    #[test]
    fn no_base_means_no_commands() {
        let mut world = WorldSnapshot::new(PlayerCommon::default());
        add_minerals(&mut world, &[100]);
        add_worker(&mut world, 10, true);

        let mut tracker = HarvestTracker::default();
        assert!(tracker.reconcile(&world).is_empty());
        assert!(tracker.assigned_workers(UnitTag(100)).is_empty());
    }

    #[test]
    fn workers_lost_with_the_last_base_are_pruned() {
        let mut world = base_world();
        add_minerals(&mut world, &[100]);
        add_worker(&mut world, 10, true);
        add_worker(&mut world, 11, true);

        let mut tracker = HarvestTracker::default();
        tracker.reconcile(&world);
        assert_eq!(tracker.assignment_of(UnitTag(10)), Some(UnitTag(100)));

        world.remove_unit(UnitTag(10));
        world.remove_unit(BASE);

        assert!(tracker.reconcile(&world).is_empty());
        assert_eq!(tracker.assignment_of(UnitTag(10)), None);
        assert_eq!(tracker.assigned_workers(UnitTag(100)), &[UnitTag(11)]);
    }

    #[test]
    fn unfinished_base_does_not_hide_a_finished_one() {
        let mut world = base_world();
        add_minerals(&mut world, &[100]);
        world.add_unit(
            Unit::new(UnitTag(2), TerranBuildingType::CommandCenter, Alliance::Own, Point2::new(58.0, 48.0))
                .with_radius(2.5)
                .with_build_progress(0.2),
        );
        add_worker(&mut world, 10, true);

        let mut tracker = HarvestTracker::default();
        let commands = tracker.reconcile(&world);

        assert_eq!(harvests(&commands), vec![(UnitTag(10), UnitTag(100))]);
    }

    #[test]
    fn unfinished_base_does_not_claim_minerals() {
        let mut world = base_world();
        world.unit_mut(BASE).unwrap().build_progress = 0.3;
        add_minerals(&mut world, &[100]);
        add_worker(&mut world, 10, true);

        let mut tracker = HarvestTracker::default();
        let commands = tracker.reconcile(&world);
        assert!(harvests(&commands).is_empty());
    }

    #[test]
    fn vespene_uses_live_count_and_caps_within_tick() {
        let mut world = base_world();
        add_minerals(&mut world, &[100]);
        world.add_unit(
            Unit::new(UnitTag(200), TerranBuildingType::Refinery, Alliance::Own, Point2::new(44.0, 50.0))
                .with_radius(1.5)
                .with_vespene(2000, 1),
        );
        // Far from any base.
        world.add_unit(
            Unit::new(UnitTag(201), TerranBuildingType::Refinery, Alliance::Own, Point2::new(90.0, 90.0))
                .with_vespene(2000, 0),
        );
        // Mined out.
        world.add_unit(
            Unit::new(UnitTag(202), TerranBuildingType::Refinery, Alliance::Own, Point2::new(44.0, 54.0))
                .with_vespene(0, 0),
        );
        for tag in 10..16 {
            add_worker(&mut world, tag, true);
        }

        let mut tracker = HarvestTracker::default();
        let commands = tracker.reconcile(&world);
        let sent = harvests(&commands);

        assert_eq!(sent.iter().filter(|(_, t)| *t == UnitTag(100)).count(), 2);
        assert_eq!(sent.iter().filter(|(_, t)| *t == UnitTag(200)).count(), 2);
        assert_eq!(sent.len(), 4);
    }

    #[test]
    fn reassignment_never_duplicates_a_worker() {
        let mut world = base_world();
        add_minerals(&mut world, &[100, 101]);
        add_worker(&mut world, 10, true);

        let mut tracker = HarvestTracker::default();
        tracker.reconcile(&world);
        let first = tracker.assignment_of(UnitTag(10)).unwrap();

        assert!(tracker.remove_worker(UnitTag(10)));
        assert!(!tracker.remove_worker(UnitTag(10)));

        // Fill the original deposit with someone else so the worker lands elsewhere.
        add_worker(&mut world, 11, true);
        add_worker(&mut world, 12, true);
        tracker.reconcile(&world);

        assert_unique_assignments(&tracker);
        let total: usize = tracker
            .tracked_nodes()
            .map(|n| tracker.assigned_workers(n).iter().filter(|w| **w == UnitTag(10)).count())
            .sum();
        assert_eq!(total, 1);
        assert!(tracker.assigned_workers(first).len() <= 2);
    }

    #[test]
    fn fully_harvesting_once_saturated() {
        let mut world = base_world();
        add_minerals(&mut world, &[100]);
        add_worker(&mut world, 10, true);

        let mut tracker = HarvestTracker::default();
        tracker.reconcile(&world);
        let survey = tracker.survey(&world);
        assert!(!tracker.is_fully_harvesting(&survey));

        add_worker(&mut world, 11, true);
        tracker.reconcile(&world);
        let survey = tracker.survey(&world);
        assert!(tracker.is_fully_harvesting(&survey));
    }
}
