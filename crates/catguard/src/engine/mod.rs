mod engine;
mod event;
mod listener;
mod sensor;
pub mod state;

pub use engine::DEFAULT_CONFIDENCE_THRESHOLD;
pub use engine::Engine;
pub use engine::EngineError;
pub use event::Event;
pub use listener::Listener;
pub use listener::ListenerId;
pub use sensor::Sensor;
pub use sensor::SensorKey;
pub use sensor::SensorType;
pub use state::AlarmStatus;
pub use state::ArmingStatus;
pub use state::State;
