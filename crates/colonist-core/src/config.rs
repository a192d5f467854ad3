//! Static colony configuration.

use std::collections::HashSet;

use colonist_logic::body::{PartCosts, MAX_BODY_SIZE, SPAWN_TIME_PER_PART};
use colonist_logic::roles::{default_catalogue, RoleDefinition, RoleKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::diagnostics::DEFAULT_CAPACITY;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("role '{0}' is declared more than once")]
    DuplicateRole(String),
    #[error("default role '{0}' is not in the role catalogue")]
    UnknownDefaultRole(String),
    #[error("max body size {0} is outside 1..=50")]
    BodySize(usize),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColonyConfig {
    /// Role catalogue in declaration order.
    pub roles: Vec<RoleDefinition>,
    /// Behavior for workers whose role name is unknown.
    pub default_role: String,
    pub part_costs: PartCosts,
    pub max_body_size: usize,
    pub diagnostics_capacity: usize,
    /// Maturation ticks per body part of a replacement.
    pub replacement_ticks_per_part: u32,
}

impl Default for ColonyConfig {
    fn default() -> Self {
        Self {
            roles: default_catalogue(),
            default_role: RoleKind::Harvester.name().to_string(),
            part_costs: PartCosts::default(),
            max_body_size: MAX_BODY_SIZE,
            diagnostics_capacity: DEFAULT_CAPACITY,
            replacement_ticks_per_part: SPAWN_TIME_PER_PART,
        }
    }
}

impl ColonyConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for role in &self.roles {
            if !seen.insert(role.name.as_str()) {
                return Err(ConfigError::DuplicateRole(role.name.clone()));
            }
        }
        if !seen.contains(self.default_role.as_str()) {
            return Err(ConfigError::UnknownDefaultRole(self.default_role.clone()));
        }
        if self.max_body_size == 0 || self.max_body_size > MAX_BODY_SIZE {
            return Err(ConfigError::BodySize(self.max_body_size));
        }
        Ok(())
    }

    pub fn role(&self, name: &str) -> Option<&RoleDefinition> {
        self.roles.iter().find(|r| r.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(ColonyConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_duplicate_role_rejected() {
        let mut config = ColonyConfig::default();
        config.roles.push(RoleDefinition::new("Builder", "b", 1));
        assert_eq!(
            config.validate(),
            Err(ConfigError::DuplicateRole("Builder".into()))
        );
    }

    #[test]
    fn test_unknown_default_role_rejected() {
        let config = ColonyConfig {
            default_role: "Farmer".into(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnknownDefaultRole(_))
        ));
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: ColonyConfig = serde_json::from_str(r#"{"max_body_size": 30}"#).unwrap();
        assert_eq!(config.max_body_size, 30);
        assert_eq!(config.roles.len(), 8);
        assert_eq!(config.part_costs.work, 100);
    }
}
