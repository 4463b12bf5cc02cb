use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Field acceleration per unit of field strength, in px/s².
    pub field_gain: f32,
    /// Distance from the field centre inside which the field does not pull.
    pub minimum_radius: f32,
    /// Fraction of velocity lost per second.
    pub linear_damping: f32,
    pub collision_stiffness: f32,
    pub restitution: f32,
    /// Scales applied drag forces into velocity change.
    pub drag_response: f32,
    pub max_speed: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            field_gain: 0.6,
            minimum_radius: 1.0,
            linear_damping: 2.4,
            collision_stiffness: 18.0,
            restitution: 0.35,
            drag_response: 0.02,
            max_speed: 1_400.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub physics: PhysicsConfig,
    pub node_radius: f32,
    pub insert_delay: f64,
    pub insert_duration: f64,
    pub remove_delay: f64,
    pub remove_duration: f64,
    pub allows_multiple_selection: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            physics: PhysicsConfig::default(),
            node_radius: 65.0,
            insert_delay: 0.2,
            insert_duration: 0.4,
            remove_delay: 0.2,
            remove_duration: 0.4,
            allows_multiple_selection: true,
        }
    }
}

impl EngineConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config = Self::from_json(&raw)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        Ok(config)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw).context("config is not valid JSON")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !(self.node_radius.is_finite() && self.node_radius > 0.0) {
            bail!("node_radius must be a positive number, got {}", self.node_radius);
        }

        for (name, value) in [
            ("insert_delay", self.insert_delay),
            ("insert_duration", self.insert_duration),
            ("remove_delay", self.remove_delay),
            ("remove_duration", self.remove_duration),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                bail!("{name} must be a non-negative number of seconds, got {value}");
            }
        }

        let physics = &self.physics;
        if physics.minimum_radius < 0.0 || physics.linear_damping < 0.0 || physics.max_speed <= 0.0
        {
            bail!("physics values must be non-negative and max_speed must be positive");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = EngineConfig::from_json(
            r#"{ "node_radius": 40.0, "physics": { "field_gain": 1.5 } }"#,
        )
        .unwrap();
        assert_eq!(config.node_radius, 40.0);
        assert_eq!(config.physics.field_gain, 1.5);
        assert_eq!(config.physics.linear_damping, PhysicsConfig::default().linear_damping);
        assert_eq!(config.insert_delay, 0.2);
        assert!(config.allows_multiple_selection);
    }

    #[test]
    fn test_rejects_negative_durations() {
        let error = EngineConfig::from_json(r#"{ "remove_duration": -1.0 }"#).unwrap_err();
        assert!(error.to_string().contains("remove_duration"));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(EngineConfig::from_json("{ not json").is_err());
    }
}
