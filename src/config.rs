//! Engine configuration.
//!
//! Institution-specific constants (working days, the searchable hour
//! window, the afternoon cutoff and its ranking penalty, default section
//! settings) are carried in [`EngineConfig`], which can be loaded from a
//! TOML file. Every field has a default, so a partial file is enough:
//!
//! ```toml
//! work_days = ["Mon", "Tue", "Wed", "Thu", "Fri"]
//! day_start_hour = 8
//! day_end_hour = 18
//!
//! [default_settings]
//! times_per_week = 2
//! hours_per_session = 2
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::models::{Hour, SectionSettings, Weekday};

/// Engine-wide scheduling constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Working days in display order.
    pub work_days: Vec<Weekday>,
    /// First hour a candidate window may start at.
    pub day_start_hour: Hour,
    /// Hour by which every candidate window must end.
    pub day_end_hour: Hour,
    /// Day whose afternoon is restricted (Thursday by default).
    pub afternoon_cutoff_day: Weekday,
    /// Hour at which that afternoon begins.
    pub afternoon_cutoff_hour: Hour,
    /// Ranking penalty for windows starting at or after the cutoff.
    pub afternoon_penalty: u32,
    /// Settings assumed for a section until changed.
    pub default_settings: SectionSettings,
    /// Display names handed to new conflict groups, cycled.
    pub group_names: Vec<String>,
    /// Hours per day that count as full classroom occupancy.
    pub full_occupancy_hours: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            work_days: vec![
                Weekday::Sun,
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
            ],
            day_start_hour: 8,
            day_end_hour: 18,
            afternoon_cutoff_day: Weekday::Thu,
            afternoon_cutoff_hour: 14,
            afternoon_penalty: 100,
            default_settings: SectionSettings::default(),
            group_names: ["Year 1", "Year 2", "Year 3", "Year 4", "Group 5", "Group 6"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            full_occupancy_hours: 8,
        }
    }
}

impl EngineConfig {
    /// Loads and validates a configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses and validates a configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the values are mutually consistent.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.work_days.is_empty() {
            return Err(ConfigError::Invalid("work_days is empty".into()));
        }
        if self.day_start_hour >= self.day_end_hour || self.day_end_hour > 24 {
            return Err(ConfigError::Invalid(format!(
                "day window {}..{} is empty or out of range",
                self.day_start_hour, self.day_end_hour
            )));
        }
        if self.afternoon_cutoff_hour < self.day_start_hour
            || self.afternoon_cutoff_hour > self.day_end_hour
        {
            return Err(ConfigError::Invalid(format!(
                "afternoon_cutoff_hour {} lies outside the day window",
                self.afternoon_cutoff_hour
            )));
        }
        if SectionSettings::new(
            self.default_settings.times_per_week,
            self.default_settings.hours_per_session,
        )
        .is_none()
        {
            return Err(ConfigError::Invalid(
                "default_settings values must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// End of the searchable window on `day`, optionally shrunk to the
    /// afternoon cutoff.
    pub fn window_end(&self, day: Weekday, restrict_afternoon: bool) -> Hour {
        if restrict_afternoon && day == self.afternoon_cutoff_day {
            self.afternoon_cutoff_hour
        } else {
            self.day_end_hour
        }
    }

    /// Whether a window starting at `start_hour` on `day` falls in the
    /// restricted afternoon.
    pub fn is_restricted_afternoon(&self, day: Weekday, start_hour: Hour) -> bool {
        day == self.afternoon_cutoff_day && start_hour >= self.afternoon_cutoff_hour
    }

    /// Default display name for the `n`-th created group (1-based).
    pub fn group_name(&self, n: u32) -> String {
        if self.group_names.is_empty() {
            return format!("Group {n}");
        }
        let idx = (n.saturating_sub(1) as usize) % self.group_names.len();
        self.group_names[idx].clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let c = EngineConfig::default();
        assert!(c.validate().is_ok());
        assert_eq!(c.work_days.len(), 5);
        assert_eq!(c.window_end(Weekday::Thu, true), 14);
        assert_eq!(c.window_end(Weekday::Thu, false), 18);
        assert_eq!(c.window_end(Weekday::Mon, true), 18);
    }

    #[test]
    fn test_parse_partial_toml() {
        let toml = r#"
work_days = ["Mon", "Tue", "Wed", "Thu", "Fri"]
day_end_hour = 17

[default_settings]
times_per_week = 3
hours_per_session = 1
"#;
        let c = EngineConfig::from_toml_str(toml).unwrap();
        assert_eq!(c.work_days[4], Weekday::Fri);
        assert_eq!(c.day_start_hour, 8);
        assert_eq!(c.day_end_hour, 17);
        assert_eq!(c.default_settings.times_per_week, 3);
        assert_eq!(c.afternoon_penalty, 100);
    }

    #[test]
    fn test_invalid_configs_rejected() {
        assert!(matches!(
            EngineConfig::from_toml_str("work_days = []"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            EngineConfig::from_toml_str("day_start_hour = 18\nday_end_hour = 8"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            EngineConfig::from_toml_str("afternoon_cutoff_hour = 20"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            EngineConfig::from_toml_str("day_start_hour = \"eight\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = EngineConfig::from_file("/nonexistent/reschedule.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_group_names_cycle() {
        let c = EngineConfig::default();
        assert_eq!(c.group_name(1), "Year 1");
        assert_eq!(c.group_name(5), "Group 5");
        assert_eq!(c.group_name(7), "Year 1");

        let bare = EngineConfig {
            group_names: Vec::new(),
            ..EngineConfig::default()
        };
        assert_eq!(bare.group_name(2), "Group 2");
    }

    #[test]
    fn test_restricted_afternoon() {
        let c = EngineConfig::default();
        assert!(c.is_restricted_afternoon(Weekday::Thu, 14));
        assert!(!c.is_restricted_afternoon(Weekday::Thu, 13));
        assert!(!c.is_restricted_afternoon(Weekday::Wed, 15));
    }
}
