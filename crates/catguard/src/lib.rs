pub mod config;
pub mod detector;
mod engine;
pub mod repository;

pub use config::Config;
pub use config::ConfigError;
pub use config::LogLevel;
pub use engine::AlarmStatus;
pub use engine::ArmingStatus;
pub use engine::DEFAULT_CONFIDENCE_THRESHOLD;
pub use engine::Engine;
pub use engine::EngineError;
pub use engine::Event;
pub use engine::Listener;
pub use engine::ListenerId;
pub use engine::Sensor;
pub use engine::SensorKey;
pub use engine::SensorType;
pub use engine::State;
