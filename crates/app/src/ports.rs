//! Port definitions — traits that adapters implement.
//!
//! Ports are the boundaries between the scene core and the outside world.
//! They are defined here (in `app`) so that both the scene logic and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod device_directory;
pub mod event_source;
pub mod persistence;
pub mod send_channel;

pub use device_directory::DeviceDirectory;
pub use event_source::{EventSource, FramePublisher};
pub use persistence::PersistenceHook;
pub use send_channel::SendChannel;
