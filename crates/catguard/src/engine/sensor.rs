use std::fmt;

use serde::Deserialize;
use serde::Serialize;

/// Kind of monitored point.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SensorType {
    Door,
    Window,
    Motion,
}

/// Identity of a sensor.
///
/// Two sensors are the same entity iff their name and type match, whatever their activation
/// state. Repositories index sensors by this key, so a sensor set can never hold two entries
/// for the same pair.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SensorKey {
    pub name: String,
    pub kind: SensorType,
}

impl SensorKey {
    pub fn new(name: impl Into<String>, kind: SensorType) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

impl fmt::Display for SensorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.kind)
    }
}

/// A door, window or motion sensor watched by the alarm.
///
/// `==` compares the full state, activation included. Compare [`Sensor::key`] for identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sensor {
    name: String,

    #[serde(rename = "type")]
    kind: SensorType,

    /// Whether the sensor is currently tripped (door open, motion seen, ...)
    #[serde(default)]
    active: bool,
}

impl Sensor {
    /// Create an inactive sensor.
    pub fn new(name: impl Into<String>, kind: SensorType) -> Self {
        Self {
            name: name.into(),
            kind,
            active: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> SensorType {
        self.kind
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Builder-style variant of [`Sensor::set_active`].
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn key(&self) -> SensorKey {
        SensorKey::new(self.name.clone(), self.kind)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_new_sensor_is_inactive() {
        let sensor = Sensor::new("front door", SensorType::Door);
        assert!(!sensor.is_active());
        assert_eq!(sensor.name(), "front door");
        assert_eq!(sensor.kind(), SensorType::Door);
    }

    #[test]
    fn test_key_ignores_activation() {
        let inactive = Sensor::new("hall", SensorType::Motion);
        let active = Sensor::new("hall", SensorType::Motion).with_active(true);
        assert_eq!(inactive.key(), active.key());
    }

    #[test]
    fn test_equality_includes_activation() {
        let inactive = Sensor::new("hall", SensorType::Motion);
        let active = inactive.clone().with_active(true);
        assert_ne!(inactive, active);
        assert_eq!(inactive, active.clone().with_active(false));
    }

    #[test]
    fn test_key_distinguishes_type() {
        let door = Sensor::new("kitchen", SensorType::Door);
        let window = Sensor::new("kitchen", SensorType::Window);
        assert_ne!(door.key(), window.key());

        let keys: HashSet<SensorKey> =
            [door.key(), window.key(), door.key()].into_iter().collect();
        assert_eq!(keys.len(), 2);
    }

    #[test]
    fn test_sensor_type_strings() {
        assert_eq!(SensorType::Window.to_string(), "window");
        assert_eq!(SensorType::from_str("MOTION").unwrap(), SensorType::Motion);
        assert!(SensorType::from_str("garage").is_err());
    }

    #[test]
    fn test_sensor_json() {
        let sensor = Sensor::new("back door", SensorType::Door).with_active(true);
        let json = serde_json::to_value(&sensor).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"name": "back door", "type": "door", "active": true})
        );

        let parsed: Sensor =
            serde_json::from_str(r#"{"name": "attic", "type": "window"}"#).unwrap();
        assert!(!parsed.is_active());
        assert_eq!(parsed.key(), SensorKey::new("attic", SensorType::Window));
    }

    #[test]
    fn test_key_display() {
        let key = SensorKey::new("garage", SensorType::Motion);
        assert_eq!(key.to_string(), "garage (motion)");
    }
}
