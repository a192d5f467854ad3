//! Persistent memory: typed accessors over the colony's key-value store.
//!
//! The store survives between ticks as a JSON blob whose shape follows the
//! host's conventions (camelCase keys, per-base `roleConfig` / `roleInfo`,
//! per-spawn `home`, per-creep `role` / `home` plus scratch fields). Every
//! reader tolerates missing substructures: absent fields take their
//! defaults. A base, spawn or creep entry that still does not decode is
//! dropped with a warning instead of failing the whole store. Shape
//! changes between versions go through [`migrate`].

use std::collections::{BTreeMap, HashSet};

use colonist_logic::geometry::RoomName;
use colonist_logic::ids::ObjectId;
use colonist_logic::roles::RoleDefinition;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Current memory layout version.
pub const MEMORY_VERSION: u32 = 1;

pub const DEFAULT_PARTS_MIN_MULTIPLIER: u32 = 0;
pub const DEFAULT_PARTS_MAX_MULTIPLIER: u32 = 20;

#[derive(Debug, Error)]
pub enum MemoryError {
    #[error("memory is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("memory version {0} is newer than supported version {MEMORY_VERSION}")]
    UnsupportedVersion(u32),
    #[error("memory root is not an object")]
    NotAnObject,
}

/// Per-role headcount setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleSetting {
    pub required_number: u32,
}

/// Per-base role configuration, edited by the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RoleConfig {
    pub parts_min_multiplier: u32,
    pub parts_max_multiplier: u32,
    #[serde(flatten)]
    pub roles: BTreeMap<String, RoleSetting>,
}

impl Default for RoleConfig {
    fn default() -> Self {
        Self {
            parts_min_multiplier: DEFAULT_PARTS_MIN_MULTIPLIER,
            parts_max_multiplier: DEFAULT_PARTS_MAX_MULTIPLIER,
            roles: BTreeMap::new(),
        }
    }
}

/// Per-tick role diagnostics, rebuilt from scratch every tick.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleInfo {
    pub symbol: String,
    pub current_number: u32,
    pub required_number: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HarvesterSettings {
    pub use_source_as_source: bool,
    pub use_storage_as_source: bool,
}

impl Default for HarvesterSettings {
    fn default() -> Self {
        Self {
            use_source_as_source: true,
            use_storage_as_source: false,
        }
    }
}

/// Endpoints of the courier route.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CourierSettings {
    pub source: Option<ObjectId>,
    pub target: Option<ObjectId>,
}

/// A spawn scheduled ahead of the headcount check (e.g. a miner replacement).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpawnRequest {
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<ObjectId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseMemory {
    pub room: RoomName,
    #[serde(default)]
    pub role_config: RoleConfig,
    #[serde(default)]
    pub role_info: BTreeMap<String, RoleInfo>,
    #[serde(default)]
    pub outsource_spawn: bool,
    #[serde(default)]
    pub harvester: HarvesterSettings,
    #[serde(default)]
    pub courier: CourierSettings,
    #[serde(default)]
    pub spawn_queue: Vec<SpawnRequest>,
}

impl BaseMemory {
    pub fn new(room: RoomName) -> Self {
        Self {
            room,
            role_config: RoleConfig::default(),
            role_info: BTreeMap::new(),
            outsource_spawn: false,
            harvester: HarvesterSettings::default(),
            courier: CourierSettings::default(),
            spawn_queue: Vec::new(),
        }
    }

    pub fn set_required(&mut self, role: &str, required_number: u32) {
        self.role_config
            .roles
            .insert(role.to_string(), RoleSetting { required_number });
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpawnMemory {
    pub home: Option<String>,
    pub debug: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
    Source,
    Target,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StructureMemory {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub link_type: Option<LinkType>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExplorerPhase {
    GotoFlagRoom,
    ClaimFlagRoom,
}

/// Per-creep memory: identity plus role scratch fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreepMemory {
    pub role: String,
    pub home: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub selfdestruct: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub working: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<ObjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<ObjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_source: Option<ObjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<ExplorerPhase>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticks_to_source: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_ticks_to_live: Option<u32>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub trained_replacement: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl CreepMemory {
    pub fn new(role: &str, home: &str) -> Self {
        Self {
            role: role.to_string(),
            home: home.to_string(),
            selfdestruct: false,
            working: false,
            target: None,
            source: None,
            home_source: None,
            phase: None,
            flag: None,
            ticks_to_source: None,
            initial_ticks_to_live: None,
            trained_replacement: false,
        }
    }
}

/// The whole persisted store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MemoryStore {
    pub version: u32,
    pub bases: BTreeMap<String, BaseMemory>,
    pub spawns: BTreeMap<String, SpawnMemory>,
    pub creeps: BTreeMap<String, CreepMemory>,
    pub structures: BTreeMap<ObjectId, StructureMemory>,
    pub creep_counter: u64,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            version: MEMORY_VERSION,
            bases: BTreeMap::new(),
            spawns: BTreeMap::new(),
            creeps: BTreeMap::new(),
            structures: BTreeMap::new(),
            creep_counter: 0,
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a persisted blob, migrating older layouts.
    pub fn from_json(raw: &str) -> Result<Self, MemoryError> {
        if raw.trim().is_empty() {
            return Ok(Self::new());
        }
        let value: Value = serde_json::from_str(raw)?;
        let mut migrated = migrate(value)?;
        let root = migrated.as_object_mut().ok_or(MemoryError::NotAnObject)?;
        let bases = decode_entries(root, "bases");
        let spawns = decode_entries(root, "spawns");
        let creeps = decode_entries(root, "creeps");

        let mut store: MemoryStore = serde_json::from_value(migrated)?;
        store.bases = bases;
        store.spawns = spawns;
        store.creeps = creeps;
        store.version = MEMORY_VERSION;
        Ok(store)
    }

    pub fn to_json(&self) -> Result<String, MemoryError> {
        Ok(serde_json::to_string(self)?)
    }

    // ── Bases ──────────────────────────────────────────────────────────

    /// Create a base anchored at `room`; returns the existing base if the
    /// name is taken.
    pub fn create_base(&mut self, name: &str, room: RoomName) -> &mut BaseMemory {
        self.bases
            .entry(name.to_string())
            .or_insert_with(|| BaseMemory::new(room))
    }

    pub fn base(&self, name: &str) -> Option<&BaseMemory> {
        self.bases.get(name)
    }

    pub fn base_mut(&mut self, name: &str) -> Option<&mut BaseMemory> {
        self.bases.get_mut(name)
    }

    /// Name of the base anchored in `room`.
    pub fn base_for_room(&self, room: RoomName) -> Option<&str> {
        self.bases
            .iter()
            .find(|(_, base)| base.room == room)
            .map(|(name, _)| name.as_str())
    }

    /// Headcount target for `role` in `base`, falling back to the role's
    /// default when the base has no entry.
    pub fn required_number(&self, base: &str, role: &RoleDefinition) -> u32 {
        self.bases
            .get(base)
            .and_then(|b| b.role_config.roles.get(&role.name))
            .map(|setting| setting.required_number)
            .unwrap_or(role.required_number)
    }

    /// Fill missing role entries of `base` with the roles' defaults.
    pub fn ensure_role_config<'a>(
        &mut self,
        base: &str,
        roles: impl IntoIterator<Item = &'a RoleDefinition>,
    ) {
        if let Some(memory) = self.bases.get_mut(base) {
            for role in roles {
                memory
                    .role_config
                    .roles
                    .entry(role.name.clone())
                    .or_insert(RoleSetting {
                        required_number: role.required_number,
                    });
            }
        }
    }

    // ── Spawns ─────────────────────────────────────────────────────────

    pub fn spawn_home(&self, spawn: &str) -> Option<&str> {
        self.spawns.get(spawn).and_then(|s| s.home.as_deref())
    }

    pub fn set_spawn_home(&mut self, spawn: &str, home: &str) {
        self.spawns.entry(spawn.to_string()).or_default().home = Some(home.to_string());
    }

    pub fn spawn_debug(&self, spawn: &str) -> bool {
        self.spawns.get(spawn).map(|s| s.debug).unwrap_or(false)
    }

    // ── Creeps ─────────────────────────────────────────────────────────

    pub fn creep(&self, name: &str) -> Option<&CreepMemory> {
        self.creeps.get(name)
    }

    pub fn creep_mut(&mut self, name: &str) -> Option<&mut CreepMemory> {
        self.creeps.get_mut(name)
    }

    /// Next unique creep name for `role`.
    pub fn next_creep_name(&mut self, role: &str) -> String {
        self.creep_counter += 1;
        format!("{}{}", role, self.creep_counter)
    }

    /// Drop memory of creeps that are no longer alive; returns how many.
    pub fn forget_dead_creeps(&mut self, alive: &HashSet<String>) -> usize {
        let before = self.creeps.len();
        self.creeps.retain(|name, _| alive.contains(name));
        before - self.creeps.len()
    }

    // ── Structures ─────────────────────────────────────────────────────

    pub fn link_type(&self, id: ObjectId) -> Option<LinkType> {
        self.structures.get(&id).and_then(|s| s.link_type)
    }

    pub fn set_link_type(&mut self, id: ObjectId, link_type: LinkType) {
        self.structures.entry(id).or_default().link_type = Some(link_type);
    }
}

/// Upgrade a raw memory blob to [`MEMORY_VERSION`].
///
/// v0 (unversioned) stored role headcounts as bare integers:
/// `"roleConfig": { "Harvester": 2 }`. v1 wraps them as
/// `{ "requiredNumber": 2 }`.
pub fn migrate(mut value: Value) -> Result<Value, MemoryError> {
    let root = value.as_object_mut().ok_or(MemoryError::NotAnObject)?;
    let version = root
        .get("version")
        .and_then(Value::as_u64)
        .unwrap_or(0) as u32;

    if version > MEMORY_VERSION {
        return Err(MemoryError::UnsupportedVersion(version));
    }

    if version == 0 {
        migrate_v0_role_config(root);
    }

    root.insert("version".to_string(), Value::from(MEMORY_VERSION));
    Ok(value)
}

/// Take `root[key]` out and decode it entry by entry, dropping entries
/// that do not decode.
fn decode_entries<T: DeserializeOwned>(
    root: &mut serde_json::Map<String, Value>,
    key: &str,
) -> BTreeMap<String, T> {
    let entries = match root.remove(key) {
        Some(Value::Object(entries)) => entries,
        None | Some(Value::Null) => return BTreeMap::new(),
        Some(other) => {
            log::warn!("memory: ignoring {} of unexpected shape: {}", key, other);
            return BTreeMap::new();
        }
    };
    entries
        .into_iter()
        .filter_map(|(name, raw)| match serde_json::from_value(raw) {
            Ok(entry) => Some((name, entry)),
            Err(e) => {
                log::warn!("memory: dropping malformed {} entry '{}': {}", key, name, e);
                None
            }
        })
        .collect()
}

fn migrate_v0_role_config(root: &mut serde_json::Map<String, Value>) {
    let Some(bases) = root.get_mut("bases").and_then(Value::as_object_mut) else {
        return;
    };
    for base in bases.values_mut() {
        let Some(config) = base.get_mut("roleConfig").and_then(Value::as_object_mut) else {
            continue;
        };
        for (key, entry) in config.iter_mut() {
            if key == "partsMinMultiplier" || key == "partsMaxMultiplier" {
                continue;
            }
            if let Some(n) = entry.as_u64() {
                *entry = serde_json::json!({ "requiredNumber": n });
            }
        }
    }
}
