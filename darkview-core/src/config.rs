use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Zoom settings for the viewer. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Scale a freshly loaded document opens at
    pub default_scale: f32,
    pub min_scale: f32,
    pub max_scale: f32,
    /// Scale change per zoom in/out action
    pub zoom_step: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            default_scale: 1.8,
            min_scale: 0.5,
            max_scale: 3.0,
            zoom_step: 0.2,
        }
    }
}

impl ViewerConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = |field, value: f32| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid {
                    field,
                    requirement: "a positive number",
                    value,
                })
            }
        };
        positive("min_scale", self.min_scale)?;
        positive("max_scale", self.max_scale)?;
        positive("zoom_step", self.zoom_step)?;

        if self.max_scale < self.min_scale {
            return Err(ConfigError::Invalid {
                field: "max_scale",
                requirement: "at least min_scale",
                value: self.max_scale,
            });
        }
        if !(self.min_scale..=self.max_scale).contains(&self.default_scale) {
            return Err(ConfigError::Invalid {
                field: "default_scale",
                requirement: "between min_scale and max_scale",
                value: self.default_scale,
            });
        }
        Ok(())
    }
}
