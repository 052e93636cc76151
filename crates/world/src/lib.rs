//! Host-side surface a game world exposes to policy modules.
//!
//! The traits in [`traits`] are the only thing modules link against; the
//! [`sim`] module provides in-process stand-ins that log instead of talking
//! to a real world, used by the demo host and by module tests.

pub mod sim;
pub mod traits;
pub mod types;

pub use sim::{PendingShutdown, SimEventRegistry, SimHost, SimSessions, SimWorld, WorldExit};
pub use traits::{GameEventRegistry, Host, SessionBroadcaster, WorldControl};
pub use types::{
    GameEventDescriptor, ServerMessageKind, ShutdownAction, RESTART_EXIT_CODE, SHUTDOWN_EXIT_CODE,
    SHUTDOWN_MASK_IDLE, SHUTDOWN_MASK_RESTART,
};
