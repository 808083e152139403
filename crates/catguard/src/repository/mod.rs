//! Storage of the sensor set and the two status fields.
//!
//! The engine owns no copy of this data: it reads through a [`Repository`] before every
//! decision and writes the outcome straight back.

mod file;
mod memory;

use std::path::PathBuf;

pub use file::FileRepository;
pub use memory::InMemoryRepository;

use crate::engine::AlarmStatus;
use crate::engine::ArmingStatus;
use crate::engine::Sensor;
use crate::engine::SensorKey;

/// Store consumed by the alarm engine.
///
/// Sensor operations are keyed on identity (name and type): adding a sensor that already
/// exists replaces it, and removing an unknown sensor does nothing.
pub trait Repository {
    /// All sensors, ordered by key.
    fn sensors(&self) -> Result<Vec<Sensor>, RepositoryError>;

    /// Look up one sensor by identity.
    fn sensor(&self, key: &SensorKey) -> Result<Option<Sensor>, RepositoryError> {
        Ok(self.sensors()?.into_iter().find(|s| s.key() == *key))
    }

    fn add_sensor(&mut self, sensor: Sensor) -> Result<(), RepositoryError>;

    fn remove_sensor(&mut self, key: &SensorKey) -> Result<(), RepositoryError>;

    /// Store the new activation state of an existing sensor.
    ///
    /// Fails with [`RepositoryError::NotFound`] if no sensor with the same identity exists.
    fn update_sensor(&mut self, sensor: &Sensor) -> Result<(), RepositoryError>;

    fn alarm_status(&self) -> Result<AlarmStatus, RepositoryError>;

    fn set_alarm_status(&mut self, status: AlarmStatus) -> Result<(), RepositoryError>;

    fn arming_status(&self) -> Result<ArmingStatus, RepositoryError>;

    fn set_arming_status(&mut self, status: ArmingStatus) -> Result<(), RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Failed to access store {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Failed to (de)serialize store {0}: {1}")]
    Serialization(PathBuf, #[source] serde_json::Error),

    #[error("Sensor not found: {0}")]
    NotFound(SensorKey),
}
