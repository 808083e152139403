use tracing::debug;
use tracing::info;
use tracing::warn;

use super::event::Event;
use super::listener::Listener;
use super::listener::ListenerId;
use super::listener::Listeners;
use super::sensor::Sensor;
use super::sensor::SensorKey;
use super::state::AlarmStatus;
use super::state::ArmingStatus;
use super::state::State;
use crate::detector::DetectionError;
use crate::detector::Detector;
use crate::repository::Repository;
use crate::repository::RepositoryError;

/// Confidence, in percent, the detector must reach before an image counts as showing a cat.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 50.0;

/// catguard alarm engine
///
/// Reconciles arming status, sensor activation and image classification into one alarm
/// status. The engine keeps no copy of the repository's data: every operation reads the
/// current status, applies its rules in a fixed order and writes the outcome back before
/// returning. Mutators take `&mut self`, so each operation runs to completion without
/// interleaving.
pub struct Engine<R, D> {
    repository: R,
    detector: D,
    confidence_threshold: f32,

    /// Result of the most recent successful classification. Starts out as "no cat".
    cat_detected: bool,

    listeners: Listeners,
}

impl<R, D> Engine<R, D>
where
    R: Repository,
    D: Detector,
{
    pub fn new(repository: R, detector: D) -> Self {
        Self {
            repository,
            detector,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            cat_detected: false,
            listeners: Listeners::default(),
        }
    }

    pub fn with_confidence_threshold(mut self, confidence_threshold: f32) -> Self {
        self.confidence_threshold = confidence_threshold;
        self
    }

    pub fn confidence_threshold(&self) -> f32 {
        self.confidence_threshold
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn into_repository(self) -> R {
        self.repository
    }

    /// Register a listener for engine events.
    pub fn subscribe(&mut self, listener: impl Listener + 'static) -> ListenerId {
        let id = self.listeners.subscribe(Box::new(listener));
        debug!("Listener {:?} subscribed ({} total)", id, self.listeners.len());
        id
    }

    /// Remove a listener. Returns false if it was not subscribed.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    pub fn alarm_status(&self) -> Result<AlarmStatus, EngineError> {
        Ok(self.repository.alarm_status()?)
    }

    pub fn arming_status(&self) -> Result<ArmingStatus, EngineError> {
        Ok(self.repository.arming_status()?)
    }

    pub fn sensors(&self) -> Result<Vec<Sensor>, EngineError> {
        Ok(self.repository.sensors()?)
    }

    /// Whether the last processed image showed a cat.
    pub fn cat_detected(&self) -> bool {
        self.cat_detected
    }

    /// Get a snapshot of the current state.
    pub fn state(&self) -> Result<State, EngineError> {
        Ok(State {
            arming_status: self.repository.arming_status()?,
            alarm_status: self.repository.alarm_status()?,
            cat_detected: self.cat_detected,
            sensors: self.repository.sensors()?,
        })
    }

    /// Start monitoring a sensor. Adding a sensor that already exists replaces it.
    pub fn add_sensor(&mut self, sensor: Sensor) -> Result<(), EngineError> {
        info!("Adding sensor {}", sensor.key());
        self.repository.add_sensor(sensor.clone())?;
        self.listeners.publish(Event::SensorChanged { sensor });
        Ok(())
    }

    /// Stop monitoring a sensor. The alarm status is left as it is.
    pub fn remove_sensor(&mut self, key: &SensorKey) -> Result<(), EngineError> {
        if self.repository.sensor(key)?.is_none() {
            debug!("Sensor {} is not monitored, nothing to remove", key);
            return Ok(());
        }

        info!("Removing sensor {}", key);
        self.repository.remove_sensor(key)?;
        self.listeners.publish(Event::SensorRemoved { key: key.clone() });
        Ok(())
    }

    /// Record a sensor activation change and derive the new alarm status.
    ///
    /// Activation counts as a trigger whenever the system is armed, even if the sensor was
    /// already active. Deactivating a sensor that is already inactive changes nothing.
    pub fn change_sensor_activation(
        &mut self,
        key: &SensorKey,
        active: bool,
    ) -> Result<AlarmStatus, EngineError> {
        let mut sensor = self
            .repository
            .sensor(key)?
            .ok_or_else(|| EngineError::UnknownSensor(key.clone()))?;

        let was_active = sensor.is_active();
        if !active && !was_active {
            debug!("Sensor {} is already inactive, ignoring", key);
            return self.alarm_status();
        }

        if active != was_active {
            sensor.set_active(active);
            self.repository.update_sensor(&sensor)?;
            info!("Sensor {} -> active={}", key, active);
            self.listeners.publish(Event::SensorChanged { sensor });
        }

        let alarm_status = self.repository.alarm_status()?;
        if active {
            let arming_status = self.repository.arming_status()?;
            if !arming_status.is_armed() {
                debug!("System disarmed, activation of {} does not trigger", key);
                return Ok(alarm_status);
            }

            match alarm_status {
                AlarmStatus::NoAlarm => self.set_alarm_status(AlarmStatus::PendingAlarm)?,
                AlarmStatus::PendingAlarm => self.set_alarm_status(AlarmStatus::Alarm)?,
                AlarmStatus::Alarm => debug!("Alarm already triggered"),
            }
        } else {
            match alarm_status {
                AlarmStatus::PendingAlarm if !self.any_sensor_active()? => {
                    self.set_alarm_status(AlarmStatus::NoAlarm)?;
                }
                AlarmStatus::PendingAlarm => {
                    debug!("Other sensors still active, alarm stays pending")
                }
                AlarmStatus::Alarm => debug!("Deactivation does not clear a triggered alarm"),
                AlarmStatus::NoAlarm => {}
            }
        }

        self.alarm_status()
    }

    /// Change the arming status and derive the new alarm status.
    ///
    /// Disarming always clears the alarm. Arming a disarmed system first resets every sensor
    /// to inactive; if the last image showed a cat and the new mode is home, the alarm
    /// triggers straight away.
    pub fn set_arming_status(&mut self, status: ArmingStatus) -> Result<AlarmStatus, EngineError> {
        let previous = self.repository.arming_status()?;
        self.repository.set_arming_status(status)?;
        if previous != status {
            info!("Arming status: {} -> {}", previous, status);
            self.listeners.publish(Event::ArmingStatusChanged {
                from: previous,
                to: status,
            });
        }

        if !status.is_armed() {
            self.set_alarm_status(AlarmStatus::NoAlarm)?;
        } else if !previous.is_armed() {
            self.reset_sensors()?;

            if status == ArmingStatus::ArmedHome && self.cat_detected {
                info!("Armed at home while a cat is in view");
                self.set_alarm_status(AlarmStatus::Alarm)?;
            }
        }

        self.alarm_status()
    }

    /// Classify a camera image and derive the new alarm status.
    ///
    /// If the detector fails, the alarm status and the remembered detection result are left
    /// untouched and the failure is returned.
    pub fn process_image(&mut self, image: &[u8]) -> Result<AlarmStatus, EngineError> {
        let detected = self
            .detector
            .contains_target_animal(image, self.confidence_threshold)
            .map_err(|e| {
                warn!("Image classification failed: {}", e);
                EngineError::DetectionUnavailable(e)
            })?;

        info!("Image processed: cat detected={}", detected);
        self.cat_detected = detected;
        self.listeners.publish(Event::CatDetected { detected });

        if detected {
            if self.repository.arming_status()? == ArmingStatus::ArmedHome {
                self.set_alarm_status(AlarmStatus::Alarm)?;
            }
        } else if self.any_sensor_active()? {
            debug!("No cat, but sensors are active; alarm status unchanged");
        } else {
            self.set_alarm_status(AlarmStatus::NoAlarm)?;
        }

        self.alarm_status()
    }

    /// Persist a new alarm status, notifying listeners if it changed.
    fn set_alarm_status(&mut self, status: AlarmStatus) -> Result<(), EngineError> {
        let previous = self.repository.alarm_status()?;
        self.repository.set_alarm_status(status)?;

        if previous != status {
            info!("Alarm status: {} -> {}", previous, status);
            self.listeners.publish(Event::AlarmStatusChanged {
                from: previous,
                to: status,
            });
        }
        Ok(())
    }

    /// Deactivate every active sensor, one repository update each.
    ///
    /// Stops at the first failed update; sensors reset before the failure stay reset.
    fn reset_sensors(&mut self) -> Result<(), EngineError> {
        let active: Vec<Sensor> = self
            .repository
            .sensors()?
            .into_iter()
            .filter(Sensor::is_active)
            .collect();

        debug!("Resetting {} active sensor(s)", active.len());
        for mut sensor in active {
            sensor.set_active(false);
            self.repository.update_sensor(&sensor)?;
            self.listeners.publish(Event::SensorChanged { sensor });
        }
        Ok(())
    }

    fn any_sensor_active(&self) -> Result<bool, EngineError> {
        Ok(self.repository.sensors()?.iter().any(Sensor::is_active))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Unknown sensor: {0}")]
    UnknownSensor(SensorKey),

    #[error("Detection unavailable: {0}")]
    DetectionUnavailable(#[source] DetectionError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
