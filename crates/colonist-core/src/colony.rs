//! The colony main loop: one call per host tick.

use std::collections::{BTreeMap, HashSet};

use crate::commands::CommandBuffer;
use crate::config::ColonyConfig;
use crate::context::{Base, Tick};
use crate::diagnostics::Diagnostics;
use crate::memory::MemoryStore;
use crate::roles::RoleRegistry;
use crate::systems::{default_controllers, run_base, BaseReport, StructureController};
use crate::world::{CreepView, WorldView};

/// What the colony did in one tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    pub tick: u64,
    pub forgotten: usize,
    pub bases: Vec<BaseReport>,
    pub commands: usize,
}

impl TickReport {
    pub fn base(&self, name: &str) -> Option<&BaseReport> {
        self.bases.iter().find(|b| b.base == name)
    }

    pub fn faults(&self) -> u32 {
        self.bases.iter().map(|b| b.faults).sum()
    }
}

pub struct Colony {
    config: ColonyConfig,
    registry: RoleRegistry,
    controllers: Vec<Box<dyn StructureController>>,
    pub log: Diagnostics,
}

impl Colony {
    pub fn new(config: ColonyConfig) -> Self {
        let registry = RoleRegistry::from_config(&config);
        Self::with_registry(config, registry)
    }

    pub fn with_registry(config: ColonyConfig, registry: RoleRegistry) -> Self {
        if let Err(e) = config.validate() {
            log::warn!("colony config: {}", e);
        }
        let log = Diagnostics::with_capacity(config.diagnostics_capacity);
        Self {
            config,
            registry,
            controllers: default_controllers(),
            log,
        }
    }

    pub fn config(&self) -> &ColonyConfig {
        &self.config
    }

    pub fn registry(&self) -> &RoleRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut RoleRegistry {
        &mut self.registry
    }

    /// Run the whole colony for one tick, leaving commands in `commands`.
    pub fn run_tick(
        &mut self,
        world: &WorldView,
        memory: &mut MemoryStore,
        commands: &mut CommandBuffer,
    ) -> TickReport {
        let mut tick = Tick::new(world, memory, commands, &mut self.log, &self.config);
        let mut report = TickReport {
            tick: world.tick(),
            ..Default::default()
        };

        let creeps = world.creeps();
        let alive: HashSet<String> = creeps.iter().map(|c| c.name.clone()).collect();
        report.forgotten = tick.memory.forget_dead_creeps(&alive);
        if report.forgotten > 0 {
            tick.debug(format!("forgot {} dead creeps", report.forgotten));
        }

        adopt_spawns(&mut tick);

        let bases: Vec<Base> = tick
            .memory
            .bases
            .iter()
            .map(|(name, b)| Base::new(name, b.room))
            .filter(|b| world.is_visible(b.room))
            .collect();
        let mut routed = route_workers(&tick, &creeps);

        for base in &bases {
            let workers = routed.remove(&base.name).unwrap_or_default();
            let base_report = run_base(&mut tick, &self.registry, base, &workers);
            report.bases.push(base_report);
        }

        for base in &bases {
            for controller in &self.controllers {
                controller.run(&mut tick, base);
            }
        }

        for base in &bases {
            if let Some(memory) = tick.memory.base(&base.name) {
                let summary: Vec<String> = memory
                    .role_info
                    .iter()
                    .map(|(role, info)| {
                        format!(
                            "{}{} {}/{}",
                            info.symbol, role, info.current_number, info.required_number
                        )
                    })
                    .collect();
                let line = format!("{}: {}", base.name, summary.join(", "));
                tick.debug(line);
            }
        }

        report.commands = tick.commands.len();
        report
    }
}

/// Give every homeless spawn a home: the base of the room it stands in,
/// else the nearest base by room distance, ties by base name. With no base
/// at all, the first spawn seen founds one named after its room.
fn adopt_spawns(tick: &mut Tick) {
    for spawn in tick.world.spawns() {
        if tick.memory.spawn_home(&spawn.name).is_some() {
            continue;
        }
        if tick.memory.bases.is_empty() {
            let name = spawn.pos.room.to_string();
            tick.memory.create_base(&name, spawn.pos.room);
            tick.info(format!("founded base {} at {}", name, spawn.name));
        }
        if let Some(base) = tick.memory.base_for_room(spawn.pos.room).map(str::to_string) {
            tick.memory.set_spawn_home(&spawn.name, &base);
            tick.info(format!("{}: spawn {} joined", base, spawn.name));
            continue;
        }
        let nearest = tick
            .memory
            .bases
            .iter()
            .min_by_key(|(_, b)| b.room.distance(&spawn.pos.room))
            .map(|(name, _)| name.clone());
        let Some(base) = nearest else {
            continue;
        };
        tick.memory.set_spawn_home(&spawn.name, &base);
        tick.info(format!(
            "{}: remote spawn {} in {} joined",
            base, spawn.name, spawn.pos.room
        ));
    }
}

/// Group workers by the base that drives them: the base owning the room a
/// worker stands in, else its home base.
fn route_workers(tick: &Tick, creeps: &[CreepView]) -> BTreeMap<String, Vec<CreepView>> {
    let mut routed: BTreeMap<String, Vec<CreepView>> = BTreeMap::new();
    for creep in creeps {
        let local = tick.memory.base_for_room(creep.pos.room);
        let home = tick.memory.creep(&creep.name).map(|m| m.home.as_str());
        let Some(base) = local.or(home) else {
            continue;
        };
        routed.entry(base.to_string()).or_default().push(creep.clone());
    }
    routed
}
