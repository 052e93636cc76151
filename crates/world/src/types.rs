//! Plain data shared between the world surface and its callers.

use std::fmt;

use serde::Serialize;

/// Process exit code for an ordinary shutdown.
pub const SHUTDOWN_EXIT_CODE: i32 = 0;
/// Process exit code a supervisor treats as "relaunch me".
pub const RESTART_EXIT_CODE: i32 = 2;

/// Shutdown-mask bit: the world is going down to come back up.
pub const SHUTDOWN_MASK_RESTART: u32 = 1;
/// Shutdown-mask bit: the world is going down for good.
pub const SHUTDOWN_MASK_IDLE: u32 = 2;

/// How the world process leaves once a countdown expires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShutdownAction {
    Restart,
    Shutdown,
}

impl ShutdownAction {
    /// The shutdown-mask bit carried alongside the countdown.
    pub fn mask(self) -> u32 {
        match self {
            ShutdownAction::Restart => SHUTDOWN_MASK_RESTART,
            ShutdownAction::Shutdown => SHUTDOWN_MASK_IDLE,
        }
    }

    /// The exit code a supervisor should observe for this action.
    pub fn exit_code(self) -> i32 {
        match self {
            ShutdownAction::Restart => RESTART_EXIT_CODE,
            ShutdownAction::Shutdown => SHUTDOWN_EXIT_CODE,
        }
    }
}

impl fmt::Display for ShutdownAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShutdownAction::Restart => f.write_str("restart"),
            ShutdownAction::Shutdown => f.write_str("shutdown"),
        }
    }
}

/// Category tag attached to every session broadcast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerMessageKind {
    ShutdownTime,
    RestartTime,
    String,
    ShutdownCancelled,
    RestartCancelled,
}

impl ServerMessageKind {
    /// The countdown-started kind for an action.
    pub fn time_for(action: ShutdownAction) -> Self {
        match action {
            ShutdownAction::Restart => ServerMessageKind::RestartTime,
            ShutdownAction::Shutdown => ServerMessageKind::ShutdownTime,
        }
    }

    /// The countdown-cancelled kind for an action.
    pub fn cancelled_for(action: ShutdownAction) -> Self {
        match action {
            ShutdownAction::Restart => ServerMessageKind::RestartCancelled,
            ShutdownAction::Shutdown => ServerMessageKind::ShutdownCancelled,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ServerMessageKind::ShutdownTime => "shutdown_time",
            ServerMessageKind::RestartTime => "restart_time",
            ServerMessageKind::String => "string",
            ServerMessageKind::ShutdownCancelled => "shutdown_cancelled",
            ServerMessageKind::RestartCancelled => "restart_cancelled",
        }
    }
}

impl fmt::Display for ServerMessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Metadata about a named in-game event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameEventDescriptor {
    pub description: String,
}
