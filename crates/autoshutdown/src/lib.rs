//! Scheduled automatic restart/shutdown for a world host.
//!
//! The module reads a recurrence policy from configuration (a time of day
//! plus either "every N days" or "weekly on a weekday"), computes the next
//! firing on the host's civil calendar, and arms a one-shot pre-announcement
//! that broadcasts to sessions and starts the world's own countdown. Any
//! rejected configuration field disables the module for that pass instead
//! of firing at a wrong time.

mod events;
pub mod module;
pub mod occurrence;
pub mod policy;
pub mod settings;

pub use module::{AutoShutdown, ShutdownPlan};
pub use policy::{PolicyFault, Recurrence, RecurrencePolicy};
pub use settings::{AutoShutdownSettings, PreAnnounceSettings, DEFAULT_ANNOUNCE_TEMPLATE};
