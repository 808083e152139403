use super::sensor::Sensor;
use super::sensor::SensorKey;
use super::state::AlarmStatus;
use super::state::ArmingStatus;

/// Notifications published to listeners.
///
/// Each event is emitted only after the matching repository write succeeded.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    AlarmStatusChanged {
        from: AlarmStatus,
        to: AlarmStatus,
    },
    ArmingStatusChanged {
        from: ArmingStatus,
        to: ArmingStatus,
    },
    /// A sensor was added or its activation changed.
    SensorChanged { sensor: Sensor },
    SensorRemoved { key: SensorKey },
    /// Result of the latest image classification.
    CatDetected { detected: bool },
}
