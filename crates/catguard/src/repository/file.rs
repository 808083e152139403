use std::path::Path;
use std::path::PathBuf;

use tracing::debug;

use super::InMemoryRepository;
use super::Repository;
use super::RepositoryError;
use crate::engine::AlarmStatus;
use crate::engine::ArmingStatus;
use crate::engine::Sensor;
use crate::engine::SensorKey;

/// Repository persisted as a JSON document.
///
/// The whole document is loaded on open and rewritten after every mutation. Reads are served
/// from memory.
#[derive(Debug)]
pub struct FileRepository {
    path: PathBuf,
    data: InMemoryRepository,
}

impl FileRepository {
    /// Open the store at `path`, starting empty if the file does not exist yet.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        let path = path.as_ref().to_path_buf();

        let data = match std::fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents)
                .map_err(|e| RepositoryError::Serialization(path.clone(), e))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Store {} does not exist yet, starting empty", path.display());
                InMemoryRepository::default()
            }
            Err(e) => return Err(RepositoryError::Io(path, e)),
        };

        Ok(Self { path, data })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply `change` to a copy of the data and adopt the copy only once it is on disk.
    fn commit<F>(&mut self, change: F) -> Result<(), RepositoryError>
    where
        F: FnOnce(&mut InMemoryRepository) -> Result<(), RepositoryError>,
    {
        let mut next = self.data.clone();
        change(&mut next)?;
        self.save(&next)?;
        self.data = next;
        Ok(())
    }

    fn save(&self, data: &InMemoryRepository) -> Result<(), RepositoryError> {
        let contents = serde_json::to_string_pretty(data)
            .map_err(|e| RepositoryError::Serialization(self.path.clone(), e))?;

        // Write a sibling file, then rename it over the target.
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, contents).map_err(|e| RepositoryError::Io(tmp.clone(), e))?;
        if let Err(e) = std::fs::rename(&tmp, &self.path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(RepositoryError::Io(self.path.clone(), e));
        }

        debug!("Saved store to {}", self.path.display());
        Ok(())
    }
}

impl Repository for FileRepository {
    fn sensors(&self) -> Result<Vec<Sensor>, RepositoryError> {
        self.data.sensors()
    }

    fn sensor(&self, key: &SensorKey) -> Result<Option<Sensor>, RepositoryError> {
        self.data.sensor(key)
    }

    fn add_sensor(&mut self, sensor: Sensor) -> Result<(), RepositoryError> {
        self.commit(|data| data.add_sensor(sensor))
    }

    fn remove_sensor(&mut self, key: &SensorKey) -> Result<(), RepositoryError> {
        self.commit(|data| data.remove_sensor(key))
    }

    fn update_sensor(&mut self, sensor: &Sensor) -> Result<(), RepositoryError> {
        self.commit(|data| data.update_sensor(sensor))
    }

    fn alarm_status(&self) -> Result<AlarmStatus, RepositoryError> {
        self.data.alarm_status()
    }

    fn set_alarm_status(&mut self, status: AlarmStatus) -> Result<(), RepositoryError> {
        self.commit(|data| data.set_alarm_status(status))
    }

    fn arming_status(&self) -> Result<ArmingStatus, RepositoryError> {
        self.data.arming_status()
    }

    fn set_arming_status(&mut self, status: ArmingStatus) -> Result<(), RepositoryError> {
        self.commit(|data| data.set_arming_status(status))
    }
}
