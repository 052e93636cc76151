//! The seams a policy module calls through.
//!
//! Everything is expressed against these traits so the same module drives a
//! real world process, the [`crate::sim`] stand-ins, or a test double.

use crate::types::{GameEventDescriptor, ServerMessageKind, ShutdownAction};

/// Control handle over the world's shutdown state machine.
pub trait WorldControl {
    /// Abort whatever shutdown countdown is currently pending, if any.
    fn cancel_pending_shutdown(&mut self);

    /// Start a shutdown countdown of `delay_secs`. The world keeps counting
    /// on its own; the module is not involved again until re-initialized.
    fn begin_shutdown(&mut self, delay_secs: u64, action: ShutdownAction, exit_code: i32);
}

/// Delivery of one message to every connected session.
pub trait SessionBroadcaster {
    fn broadcast(&mut self, kind: ServerMessageKind, text: &str);
}

/// Lookup and activation of named in-game events.
pub trait GameEventRegistry {
    /// Metadata for a known event id, `None` for unknown ids.
    fn descriptor(&self, id: u32) -> Option<&GameEventDescriptor>;

    /// Activate the event. Unknown ids are ignored.
    fn start_event(&mut self, id: u32);
}

/// Accessor seam handing a module its host collaborators.
///
/// Modules receive `&mut impl Host` per call instead of keeping their own
/// handles, so deferred callbacks capture no borrows of host state.
pub trait Host {
    fn world(&mut self) -> &mut dyn WorldControl;
    fn sessions(&mut self) -> &mut dyn SessionBroadcaster;
    fn game_events(&mut self) -> &mut dyn GameEventRegistry;
}
