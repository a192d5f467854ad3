//! Auxiliary structure controllers: towers and links.
//!
//! Each is a simple reactive rule run once per base per tick after the base
//! controller.

use crate::components::StructureKind;
use crate::context::{Base, Tick};
use crate::memory::LinkType;

/// Towers repair only while holding more than this share of their energy.
pub const TOWER_REPAIR_RESERVE: f32 = 0.5;
/// Towers repair structures below this share of their maximum health.
pub const TOWER_REPAIR_THRESHOLD: f32 = 0.5;

pub trait StructureController {
    fn name(&self) -> &'static str;
    fn run(&self, tick: &mut Tick, base: &Base);
}

/// Attacks the closest hostile; otherwise patches badly damaged structures.
pub struct TowerController;

impl StructureController for TowerController {
    fn name(&self) -> &'static str {
        "tower"
    }

    fn run(&self, tick: &mut Tick, base: &Base) {
        let structures = tick.world.structures_in(base.room);
        let hostiles = tick.world.hostiles_in(base.room);
        let towers = structures
            .iter()
            .filter(|s| s.mine && s.kind == StructureKind::Tower);

        for tower in towers {
            let nearest = hostiles
                .iter()
                .min_by_key(|(_, pos)| tower.pos.range_to(pos));
            if let Some((hostile, _)) = nearest {
                let result = tick.tower_attack(tower.id, *hostile);
                if !result.is_ok() {
                    tick.debug(format!(
                        "{}: {} {} attack -> {:?}",
                        base.name,
                        self.name(),
                        tower.id,
                        result
                    ));
                }
                continue;
            }

            let Some(store) = tower.store else { continue };
            if (store.energy as f32) <= store.capacity as f32 * TOWER_REPAIR_RESERVE {
                continue;
            }
            let damaged = structures
                .iter()
                .filter(|s| s.mine || !s.kind.is_ownable())
                .filter_map(|s| s.hits.map(|h| (s.id, h)))
                .filter(|(_, h)| h.ratio() < TOWER_REPAIR_THRESHOLD)
                .min_by(|(_, a), (_, b)| a.ratio().total_cmp(&b.ratio()));
            if let Some((target, _)) = damaged {
                let result = tick.tower_repair(tower.id, target);
                if !result.is_ok() {
                    tick.debug(format!(
                        "{}: {} {} repair -> {:?}",
                        base.name,
                        self.name(),
                        tower.id,
                        result
                    ));
                }
            }
        }
    }
}

/// Sends energy from `source` links to the first `target` link of the room.
pub struct LinkController;

impl StructureController for LinkController {
    fn name(&self) -> &'static str {
        "link"
    }

    fn run(&self, tick: &mut Tick, base: &Base) {
        let links: Vec<_> = tick
            .world
            .structures_in(base.room)
            .into_iter()
            .filter(|s| s.mine && s.kind == StructureKind::Link)
            .collect();
        let Some(receiver) = links
            .iter()
            .find(|l| tick.memory.link_type(l.id) == Some(LinkType::Target))
            .map(|l| l.id)
        else {
            return;
        };

        for link in &links {
            if tick.memory.link_type(link.id) != Some(LinkType::Source) {
                continue;
            }
            if link.store.map_or(true, |s| s.is_empty()) {
                continue;
            }
            let result = tick.link_transfer(link.id, receiver);
            if !result.is_ok() {
                tick.debug(format!(
                    "{}: {} {} -> {:?}",
                    base.name,
                    self.name(),
                    link.id,
                    result
                ));
            }
        }
    }
}

pub fn default_controllers() -> Vec<Box<dyn StructureController>> {
    vec![Box::new(TowerController), Box::new(LinkController)]
}
