//! Role definitions and the fixed role priority order.
//!
//! A role is a named behavior policy. Its static description (display
//! symbol, path color, priority, default headcount and target resolution
//! mode) lives here; the behavior itself lives in the engine crate.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What to do when a remembered target id no longer resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResolutionMode {
    /// Transient: idle this tick. A remembered target that resolves is used
    /// even when it dropped off the candidate list.
    UseOrWait,
    /// Same lookup, but an unresolvable target is a configuration bug.
    UseOrError,
}

/// The built-in roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RoleKind {
    Harvester,
    Miner,
    Storekeeper,
    Upgrader,
    Builder,
    Handyman,
    Courier,
    Explorer,
}

impl RoleKind {
    pub const ALL: [RoleKind; 8] = [
        RoleKind::Harvester,
        RoleKind::Miner,
        RoleKind::Storekeeper,
        RoleKind::Upgrader,
        RoleKind::Builder,
        RoleKind::Handyman,
        RoleKind::Courier,
        RoleKind::Explorer,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            RoleKind::Harvester => "Harvester",
            RoleKind::Miner => "Miner",
            RoleKind::Storekeeper => "Storekeeper",
            RoleKind::Upgrader => "Upgrader",
            RoleKind::Builder => "Builder",
            RoleKind::Handyman => "Handyman",
            RoleKind::Courier => "Courier",
            RoleKind::Explorer => "Explorer",
        }
    }
}

impl fmt::Display for RoleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RoleKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RoleKind::ALL
            .iter()
            .copied()
            .find(|k| k.name() == s)
            .ok_or_else(|| format!("unknown role '{}'", s))
    }
}

/// Static description of a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDefinition {
    pub name: String,
    pub symbol: String,
    pub color: String,
    /// Higher is preferred; ties keep declaration order.
    pub priority: i32,
    /// Default headcount, overridable per base.
    pub required_number: u32,
    pub mode: Option<ResolutionMode>,
}

impl RoleDefinition {
    pub fn new(name: &str, symbol: &str, priority: i32) -> Self {
        Self {
            name: name.to_string(),
            symbol: symbol.to_string(),
            color: "#ffffff".to_string(),
            priority,
            required_number: 0,
            mode: None,
        }
    }

    pub fn with_color(mut self, color: &str) -> Self {
        self.color = color.to_string();
        self
    }

    pub fn with_required(mut self, required: u32) -> Self {
        self.required_number = required;
        self
    }

    pub fn with_mode(mut self, mode: ResolutionMode) -> Self {
        self.mode = Some(mode);
        self
    }
}

/// Built-in role catalogue in declaration order.
pub fn default_catalogue() -> Vec<RoleDefinition> {
    vec![
        RoleDefinition::new(RoleKind::Harvester.name(), "🌾", 100)
            .with_color("#ffaa00")
            .with_required(2),
        RoleDefinition::new(RoleKind::Miner.name(), "⛏", 90).with_color("#aa5500"),
        RoleDefinition::new(RoleKind::Storekeeper.name(), "📦", 80)
            .with_color("#00aaff")
            .with_mode(ResolutionMode::UseOrWait),
        RoleDefinition::new(RoleKind::Upgrader.name(), "⚡", 50)
            .with_color("#ffff00")
            .with_required(1)
            .with_mode(ResolutionMode::UseOrError),
        RoleDefinition::new(RoleKind::Builder.name(), "🔨", 40)
            .with_color("#00ff00")
            .with_required(1),
        RoleDefinition::new(RoleKind::Handyman.name(), "🔧", 30).with_color("#ff00ff"),
        RoleDefinition::new(RoleKind::Courier.name(), "🚚", 20)
            .with_color("#aaaaaa")
            .with_mode(ResolutionMode::UseOrError),
        RoleDefinition::new(RoleKind::Explorer.name(), "🚩", 10)
            .with_color("#ff0000")
            .with_mode(ResolutionMode::UseOrWait),
    ]
}

/// Indices of `definitions` sorted by descending priority.
///
/// Stable: equal priorities keep declaration order.
pub fn priority_order(definitions: &[RoleDefinition]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..definitions.len()).collect();
    order.sort_by_key(|&i| std::cmp::Reverse(definitions[i].priority));
    order
}
