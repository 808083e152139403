use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use super::Repository;
use super::RepositoryError;
use crate::engine::AlarmStatus;
use crate::engine::ArmingStatus;
use crate::engine::Sensor;
use crate::engine::SensorKey;

/// Repository that keeps everything in process memory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InMemoryRepository {
    #[serde(default)]
    arming_status: ArmingStatus,

    #[serde(default)]
    alarm_status: AlarmStatus,

    #[serde(default, with = "sensor_list")]
    sensors: BTreeMap<SensorKey, Sensor>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a set of sensors, deduplicated by identity (last one wins).
    pub fn with_sensors(sensors: impl IntoIterator<Item = Sensor>) -> Self {
        Self {
            sensors: sensors.into_iter().map(|s| (s.key(), s)).collect(),
            ..Self::default()
        }
    }
}

impl Repository for InMemoryRepository {
    fn sensors(&self) -> Result<Vec<Sensor>, RepositoryError> {
        Ok(self.sensors.values().cloned().collect())
    }

    fn sensor(&self, key: &SensorKey) -> Result<Option<Sensor>, RepositoryError> {
        Ok(self.sensors.get(key).cloned())
    }

    fn add_sensor(&mut self, sensor: Sensor) -> Result<(), RepositoryError> {
        self.sensors.insert(sensor.key(), sensor);
        Ok(())
    }

    fn remove_sensor(&mut self, key: &SensorKey) -> Result<(), RepositoryError> {
        self.sensors.remove(key);
        Ok(())
    }

    fn update_sensor(&mut self, sensor: &Sensor) -> Result<(), RepositoryError> {
        let key = sensor.key();
        match self.sensors.get_mut(&key) {
            Some(stored) => {
                *stored = sensor.clone();
                Ok(())
            }
            None => Err(RepositoryError::NotFound(key)),
        }
    }

    fn alarm_status(&self) -> Result<AlarmStatus, RepositoryError> {
        Ok(self.alarm_status)
    }

    fn set_alarm_status(&mut self, status: AlarmStatus) -> Result<(), RepositoryError> {
        self.alarm_status = status;
        Ok(())
    }

    fn arming_status(&self) -> Result<ArmingStatus, RepositoryError> {
        Ok(self.arming_status)
    }

    fn set_arming_status(&mut self, status: ArmingStatus) -> Result<(), RepositoryError> {
        self.arming_status = status;
        Ok(())
    }
}

/// Stores the keyed map as a plain list of sensors so the document stays readable.
mod sensor_list {
    use std::collections::BTreeMap;

    use serde::Deserialize;
    use serde::Deserializer;
    use serde::Serializer;

    use crate::engine::Sensor;
    use crate::engine::SensorKey;

    pub fn serialize<S>(map: &BTreeMap<SensorKey, Sensor>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(map.values())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<BTreeMap<SensorKey, Sensor>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let sensors = Vec::<Sensor>::deserialize(deserializer)?;
        Ok(sensors.into_iter().map(|s| (s.key(), s)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::SensorType;

    #[test]
    fn test_add_is_idempotent_on_identity() {
        let mut repo = InMemoryRepository::new();
        repo.add_sensor(Sensor::new("door", SensorType::Door)).unwrap();
        repo.add_sensor(Sensor::new("door", SensorType::Door).with_active(true))
            .unwrap();
        repo.add_sensor(Sensor::new("door", SensorType::Window)).unwrap();

        let sensors = repo.sensors().unwrap();
        assert_eq!(sensors.len(), 2);
        assert!(
            repo.sensor(&SensorKey::new("door", SensorType::Door))
                .unwrap()
                .unwrap()
                .is_active()
        );
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let mut repo = InMemoryRepository::with_sensors([Sensor::new("a", SensorType::Motion)]);
        repo.remove_sensor(&SensorKey::new("b", SensorType::Motion))
            .unwrap();
        assert_eq!(repo.sensors().unwrap().len(), 1);

        repo.remove_sensor(&SensorKey::new("a", SensorType::Motion))
            .unwrap();
        assert!(repo.sensors().unwrap().is_empty());
    }

    #[test]
    fn test_update_unknown_sensor_fails() {
        let mut repo = InMemoryRepository::new();
        let err = repo
            .update_sensor(&Sensor::new("ghost", SensorType::Door))
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound(key) if key.name == "ghost"));
    }

    #[test]
    fn test_status_fields() {
        let mut repo = InMemoryRepository::new();
        assert_eq!(repo.alarm_status().unwrap(), AlarmStatus::NoAlarm);
        assert_eq!(repo.arming_status().unwrap(), ArmingStatus::Disarmed);

        repo.set_alarm_status(AlarmStatus::Alarm).unwrap();
        repo.set_arming_status(ArmingStatus::ArmedAway).unwrap();
        assert_eq!(repo.alarm_status().unwrap(), AlarmStatus::Alarm);
        assert_eq!(repo.arming_status().unwrap(), ArmingStatus::ArmedAway);
    }

    #[test]
    fn test_sensors_are_ordered_by_key() {
        let repo = InMemoryRepository::with_sensors([
            Sensor::new("zeta", SensorType::Door),
            Sensor::new("alpha", SensorType::Window),
            Sensor::new("alpha", SensorType::Door),
        ]);
        let names: Vec<_> = repo
            .sensors()
            .unwrap()
            .iter()
            .map(|s| (s.name().to_string(), s.kind()))
            .collect();
        assert_eq!(
            names,
            vec![
                ("alpha".to_string(), SensorType::Door),
                ("alpha".to_string(), SensorType::Window),
                ("zeta".to_string(), SensorType::Door),
            ]
        );
    }
}
