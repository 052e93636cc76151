//! Persistent game events activated alongside scheduling.

use downtimer_world::Host;
use thiserror::Error;
use tracing::info;

/// A non-numeric token in the start-events list.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("game event id '{0}' is not a number")]
pub struct BadEventId(pub String);

/// Parse the space-separated id list and activate each event in order.
///
/// Activation stops at the first bad token; ids listed before it have
/// already been started by then.
pub(crate) fn start_persistent_events<H: Host>(
    list: &str,
    host: &mut H,
) -> Result<(), BadEventId> {
    for token in list.split_whitespace() {
        let id: u32 = token
            .parse()
            .map_err(|_| BadEventId(token.to_string()))?;
        host.game_events().start_event(id);
        let description = host
            .game_events()
            .descriptor(id)
            .map(|d| d.description.clone())
            .unwrap_or_default();
        info!(event_id = id, description = %description, "persistent game event started");
    }
    Ok(())
}
