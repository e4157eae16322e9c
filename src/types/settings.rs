use serde::{Deserialize, Serialize};
use super::TimeOfDay;

/// System-wide time and capacity settings.
///
/// Loaded from the configuration store (`settings.toml`); every field has a
/// default so a missing or partial file still yields a usable grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSettings {
    /// Slot width in minutes
    #[serde(default = "default_slot_duration")]
    pub slot_duration: u16,
    #[serde(default = "default_day_start")]
    pub day_start: TimeOfDay,
    #[serde(default = "default_day_end")]
    pub day_end: TimeOfDay,
    #[serde(default = "default_lunch_start")]
    pub lunch_start: TimeOfDay,
    #[serde(default = "default_lunch_end")]
    pub lunch_end: TimeOfDay,
    #[serde(default)]
    pub capacity_margin_enabled: bool,
    #[serde(default)]
    pub capacity_margin_percent: u8,
}

fn default_slot_duration() -> u16 {
    60
}

fn default_day_start() -> TimeOfDay {
    TimeOfDay::new(8, 0).unwrap()
}

fn default_day_end() -> TimeOfDay {
    TimeOfDay::new(18, 0).unwrap()
}

fn default_lunch_start() -> TimeOfDay {
    TimeOfDay::new(12, 0).unwrap()
}

fn default_lunch_end() -> TimeOfDay {
    TimeOfDay::new(13, 0).unwrap()
}

impl Default for TimeSettings {
    fn default() -> Self {
        Self {
            slot_duration: default_slot_duration(),
            day_start: default_day_start(),
            day_end: default_day_end(),
            lunch_start: default_lunch_start(),
            lunch_end: default_lunch_end(),
            capacity_margin_enabled: false,
            capacity_margin_percent: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = TimeSettings::default();
        assert_eq!(settings.slot_duration, 60);
        assert_eq!(settings.day_start.to_string(), "08:00");
        assert_eq!(settings.day_end.to_string(), "18:00");
        assert_eq!(settings.lunch_start.to_string(), "12:00");
        assert_eq!(settings.lunch_end.to_string(), "13:00");
        assert!(!settings.capacity_margin_enabled);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let settings: TimeSettings = toml::from_str("slot_duration = 30\n").unwrap();
        assert_eq!(settings.slot_duration, 30);
        assert_eq!(settings.day_start.to_string(), "08:00");
    }

    #[test]
    fn test_full_toml() {
        let text = r#"
slot_duration = 60
day_start = "09:00"
day_end = "17:00"
lunch_start = "12:00"
lunch_end = "13:00"
capacity_margin_enabled = true
capacity_margin_percent = 10
"#;
        let settings: TimeSettings = toml::from_str(text).unwrap();
        assert_eq!(settings.day_start.to_string(), "09:00");
        assert!(settings.capacity_margin_enabled);
        assert_eq!(settings.capacity_margin_percent, 10);
    }
}
