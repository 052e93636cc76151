//! In-process stand-ins for the world surface.
//!
//! These keep the same observable behavior a real host would show (pending
//! countdowns, broadcast fan-out, event activation) but only log and record.
//! The demo host runs on them directly and module tests inspect them.

use std::collections::HashMap;
use std::time::Duration;

use tracing::{debug, info};

use crate::traits::{GameEventRegistry, Host, SessionBroadcaster, WorldControl};
use crate::types::{GameEventDescriptor, ServerMessageKind, ShutdownAction};

/// A countdown the sim world is currently running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingShutdown {
    pub remaining: Duration,
    pub action: ShutdownAction,
    pub exit_code: i32,
}

/// The world has finished its countdown and wants the process gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorldExit {
    pub action: ShutdownAction,
    pub exit_code: i32,
}

/// World stand-in: holds at most one pending countdown.
#[derive(Debug, Default)]
pub struct SimWorld {
    pending: Option<PendingShutdown>,
}

impl SimWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> Option<&PendingShutdown> {
        self.pending.as_ref()
    }

    /// Advance the countdown; returns the exit request once it expires.
    /// The exit code handed to the supervisor comes from the action, so a
    /// restart is distinguishable from a plain shutdown.
    pub fn tick(&mut self, elapsed: Duration) -> Option<WorldExit> {
        let pending = self.pending.as_mut()?;
        if pending.remaining <= elapsed {
            let done = self.pending.take()?;
            let exit_code = done.action.exit_code();
            info!(action = %done.action, exit_code, "world countdown expired");
            return Some(WorldExit {
                action: done.action,
                exit_code,
            });
        }
        pending.remaining -= elapsed;
        None
    }
}

impl WorldControl for SimWorld {
    fn cancel_pending_shutdown(&mut self) {
        if let Some(dropped) = self.pending.take() {
            info!(
                kind = %ServerMessageKind::cancelled_for(dropped.action),
                "pending world countdown cancelled"
            );
        }
    }

    fn begin_shutdown(&mut self, delay_secs: u64, action: ShutdownAction, exit_code: i32) {
        info!(
            kind = %ServerMessageKind::time_for(action),
            mask = action.mask(),
            delay_secs,
            exit_code,
            "world countdown started"
        );
        self.pending = Some(PendingShutdown {
            remaining: Duration::from_secs(delay_secs),
            action,
            exit_code,
        });
    }
}

/// Session stand-in: records every broadcast it would have delivered.
#[derive(Debug, Default)]
pub struct SimSessions {
    sent: Vec<(ServerMessageKind, String)>,
}

impl SimSessions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> &[(ServerMessageKind, String)] {
        &self.sent
    }
}

impl SessionBroadcaster for SimSessions {
    fn broadcast(&mut self, kind: ServerMessageKind, text: &str) {
        info!(kind = %kind, "broadcast: {text}");
        self.sent.push((kind, text.to_string()));
    }
}

/// Event-registry stand-in backed by a plain map.
#[derive(Debug, Default)]
pub struct SimEventRegistry {
    events: HashMap<u32, GameEventDescriptor>,
    started: Vec<u32>,
}

impl SimEventRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from `(id, description)` pairs.
    pub fn from_entries(entries: impl IntoIterator<Item = (u32, String)>) -> Self {
        let events = entries
            .into_iter()
            .map(|(id, description)| (id, GameEventDescriptor { description }))
            .collect();
        SimEventRegistry {
            events,
            started: Vec::new(),
        }
    }

    /// Ids activated so far, in activation order.
    pub fn started(&self) -> &[u32] {
        &self.started
    }
}

impl GameEventRegistry for SimEventRegistry {
    fn descriptor(&self, id: u32) -> Option<&GameEventDescriptor> {
        self.events.get(&id)
    }

    fn start_event(&mut self, id: u32) {
        debug!(event_id = id, "game event activated");
        self.started.push(id);
    }
}

/// The three sims bundled behind the [`Host`] seam.
#[derive(Debug, Default)]
pub struct SimHost {
    pub world: SimWorld,
    pub sessions: SimSessions,
    pub events: SimEventRegistry,
}

impl SimHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_events(events: SimEventRegistry) -> Self {
        SimHost {
            world: SimWorld::new(),
            sessions: SimSessions::new(),
            events,
        }
    }
}

impl Host for SimHost {
    fn world(&mut self) -> &mut dyn WorldControl {
        &mut self.world
    }

    fn sessions(&mut self) -> &mut dyn SessionBroadcaster {
        &mut self.sessions
    }

    fn game_events(&mut self) -> &mut dyn GameEventRegistry {
        &mut self.events
    }
}
