//! Configuration section driving the auto-shutdown module.
//!
//! All fields arrive as raw values and stay raw here; interpretation and
//! range enforcement happen in [`crate::policy`] so a reload with a bad
//! value can report exactly which field was rejected.

use serde::{Deserialize, Serialize};

/// Default announcement template. `{}` receives the remaining time as a
/// full-text duration.
pub const DEFAULT_ANNOUNCE_TEMPLATE: &str = "[SERVER]: Automated server restart(shutdown) in {}";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoShutdownSettings {
    /// Master switch; everything below is ignored while this is off.
    #[serde(default)]
    pub enabled: bool,

    /// Firing time of day, `HH:MM:SS`.
    #[serde(default = "default_time")]
    pub time: String,

    /// Weekday to fire on, `0` = Sunday through `6` = Saturday. Any value
    /// outside that range selects the every-N-days mode instead.
    #[serde(default = "default_weekday")]
    pub weekday: i32,

    /// Day interval used when no weekday is selected, `1..=365`.
    #[serde(default = "default_every_days")]
    pub every_days: u32,

    /// `"shutdown"` stops the world for good; anything else restarts it.
    #[serde(default = "default_action")]
    pub action: String,

    #[serde(default)]
    pub pre_announce: PreAnnounceSettings,

    /// Space-separated game event ids to activate on every initialization.
    #[serde(default)]
    pub start_events: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreAnnounceSettings {
    /// Seconds of warning before the firing. Values over one day fall back
    /// to one hour.
    #[serde(default = "default_lead_secs")]
    pub seconds: u64,

    /// Broadcast template; the first `{}` receives the remaining time.
    #[serde(default = "default_message")]
    pub message: String,
}

fn default_time() -> String {
    "04:00:00".to_string()
}

fn default_weekday() -> i32 {
    -1
}

fn default_every_days() -> u32 {
    1
}

fn default_action() -> String {
    "restart".to_string()
}

fn default_lead_secs() -> u64 {
    3_600
}

fn default_message() -> String {
    DEFAULT_ANNOUNCE_TEMPLATE.to_string()
}

impl Default for AutoShutdownSettings {
    fn default() -> Self {
        AutoShutdownSettings {
            enabled: false,
            time: default_time(),
            weekday: default_weekday(),
            every_days: default_every_days(),
            action: default_action(),
            pre_announce: PreAnnounceSettings::default(),
            start_events: String::new(),
        }
    }
}

impl Default for PreAnnounceSettings {
    fn default() -> Self {
        PreAnnounceSettings {
            seconds: default_lead_secs(),
            message: default_message(),
        }
    }
}

impl AutoShutdownSettings {
    /// Apply `DOWNTIMER_AUTOSHUTDOWN_*` environment overrides on top of the
    /// loaded values. Unparseable numeric overrides are ignored.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("DOWNTIMER_AUTOSHUTDOWN_ENABLED") {
            self.enabled = matches!(v.as_str(), "1" | "true" | "yes");
        }
        if let Ok(v) = std::env::var("DOWNTIMER_AUTOSHUTDOWN_TIME") {
            self.time = v;
        }
        if let Ok(v) = std::env::var("DOWNTIMER_AUTOSHUTDOWN_WEEKDAY") {
            if let Ok(weekday) = v.parse() {
                self.weekday = weekday;
            }
        }
        if let Ok(v) = std::env::var("DOWNTIMER_AUTOSHUTDOWN_EVERY_DAYS") {
            if let Ok(every_days) = v.parse() {
                self.every_days = every_days;
            }
        }
        if let Ok(v) = std::env::var("DOWNTIMER_AUTOSHUTDOWN_ACTION") {
            self.action = v;
        }
        if let Ok(v) = std::env::var("DOWNTIMER_AUTOSHUTDOWN_PRE_ANNOUNCE_SECONDS") {
            if let Ok(seconds) = v.parse() {
                self.pre_announce.seconds = seconds;
            }
        }
        if let Ok(v) = std::env::var("DOWNTIMER_AUTOSHUTDOWN_PRE_ANNOUNCE_MESSAGE") {
            self.pre_announce.message = v;
        }
        if let Ok(v) = std::env::var("DOWNTIMER_AUTOSHUTDOWN_START_EVENTS") {
            self.start_events = v;
        }
    }
}
