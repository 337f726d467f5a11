use serde::{Deserialize, Serialize};

use crate::effect::Effect;
use crate::error::Result;

/// Settings posted by the configuration page when the user saves.
///
/// Storing them is up to whoever consumes the request; the shell only
/// validates and acknowledges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedSettings {
    #[serde(default)]
    pub effect: Effect,
    #[serde(default)]
    pub num_columns: Option<u32>,
    #[serde(default)]
    pub fall_speed: Option<f32>,
    #[serde(default)]
    pub animation_speed: Option<f32>,
}

impl SavedSettings {
    pub fn new(effect: Effect) -> Self {
        Self {
            effect,
            num_columns: None,
            fall_speed: None,
            animation_speed: None,
        }
    }

    pub fn from_json(payload: &str) -> Result<Self> {
        Ok(serde_json::from_str(payload)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

pub const ACKNOWLEDGMENT_TITLE: &str = "Configuration Saved";
pub const ACKNOWLEDGMENT_MESSAGE: &str = "Digital rain screensaver settings have been saved.";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_parse_payload() {
        let settings =
            SavedSettings::from_json(r#"{"effect":"operator","numColumns":80,"fallSpeed":0.5}"#)
                .unwrap();
        assert_eq!(settings.effect, Effect::Operator);
        assert_eq!(settings.num_columns, Some(80));
        assert_eq!(settings.fall_speed, Some(0.5));
        assert_eq!(settings.animation_speed, None);
    }

    #[test]
    fn test_empty_payload_uses_defaults() {
        let settings = SavedSettings::from_json("{}").unwrap();
        assert_eq!(settings, SavedSettings::new(Effect::Classic));
    }

    #[test]
    fn test_rejects_unknown_effect() {
        let result = SavedSettings::from_json(r#"{"effect":"sparkles"}"#);
        assert!(matches!(result, Err(Error::InvalidSettings(_))));
    }

    #[test]
    fn test_to_json_is_parseable() {
        let json = SavedSettings::new(Effect::Twilight).to_json().unwrap();
        assert!(json.contains("\"effect\":\"twilight\""));
    }
}
