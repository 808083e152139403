use serde::Deserialize;
use serde::Serialize;

use super::sensor::Sensor;

/// Whether the sensors are being watched, and in which mode.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ArmingStatus {
    #[default]
    Disarmed,
    /// Sensors are watched and the camera is trusted to spot the cat.
    ArmedHome,
    ArmedAway,
}

impl ArmingStatus {
    pub fn is_armed(self) -> bool {
        !matches!(self, ArmingStatus::Disarmed)
    }
}

/// The alarm's current threat assessment.
///
/// Ordered by severity, but transitions are driven by the engine's rules rather than only
/// ever increasing.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum AlarmStatus {
    #[default]
    NoAlarm,
    PendingAlarm,
    Alarm,
}

/// Point-in-time view of everything the engine knows about.
#[derive(Debug, Clone, Default, Serialize)]
pub struct State {
    pub arming_status: ArmingStatus,
    pub alarm_status: AlarmStatus,
    pub cat_detected: bool,
    pub sensors: Vec<Sensor>,
}

impl State {
    pub fn active_sensors(&self) -> impl Iterator<Item = &Sensor> {
        self.sensors.iter().filter(|s| s.is_active())
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(ArmingStatus::default(), ArmingStatus::Disarmed);
        assert_eq!(AlarmStatus::default(), AlarmStatus::NoAlarm);
    }

    #[test]
    fn test_is_armed() {
        assert!(!ArmingStatus::Disarmed.is_armed());
        assert!(ArmingStatus::ArmedHome.is_armed());
        assert!(ArmingStatus::ArmedAway.is_armed());
    }

    #[test]
    fn test_alarm_severity_order() {
        assert!(AlarmStatus::NoAlarm < AlarmStatus::PendingAlarm);
        assert!(AlarmStatus::PendingAlarm < AlarmStatus::Alarm);
    }

    #[test]
    fn test_status_strings() {
        assert_eq!(ArmingStatus::ArmedHome.to_string(), "armed_home");
        assert_eq!(AlarmStatus::PendingAlarm.to_string(), "pending_alarm");
        assert_eq!(
            ArmingStatus::from_str("armed_away").unwrap(),
            ArmingStatus::ArmedAway
        );
        assert_eq!(
            serde_json::to_string(&AlarmStatus::NoAlarm).unwrap(),
            "\"no_alarm\""
        );
    }
}
