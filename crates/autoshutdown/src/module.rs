//! The auto-shutdown module lifecycle: initialize, tick, fire.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Local, TimeZone};
use downtimer_core::timeutil::{SECS_PER_DAY, SECS_PER_HOUR};
use downtimer_core::{humanize_secs, TaskScheduler, TimeOfDay};
use downtimer_world::{Host, ServerMessageKind, ShutdownAction, SHUTDOWN_EXIT_CODE};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::events::start_persistent_events;
use crate::occurrence::next_occurrence;
use crate::policy;
use crate::settings::AutoShutdownSettings;

/// Minimum seconds between "now" and the next firing. Anything closer is
/// pushed out by one full period so the pre-announcement can be seen.
const MIN_MARGIN_SECS: i64 = 10;

/// What the module committed to at its last successful initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ShutdownPlan {
    /// Unix epoch of the next firing.
    pub shutdown_epoch: i64,
    /// Unix epoch of the pre-announcement.
    pub pre_announce_epoch: i64,
    /// Effective announcement lead after clamping and collapsing.
    pub announce_lead_secs: u64,
    pub action: ShutdownAction,
}

/// Automated restart/shutdown scheduling against a world host.
///
/// The module owns no thread and never reads the wall clock outside of
/// [`AutoShutdown::init`]; the host drives it with elapsed-time ticks.
pub struct AutoShutdown<H> {
    enabled: bool,
    scheduler: TaskScheduler<H>,
    plan: Option<ShutdownPlan>,
}

impl<H: Host> AutoShutdown<H> {
    pub fn new() -> Self {
        AutoShutdown {
            enabled: false,
            scheduler: TaskScheduler::new(),
            plan: None,
        }
    }

    /// Whether the last initialization armed a firing.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// The committed plan, while armed.
    pub fn plan(&self) -> Option<&ShutdownPlan> {
        self.plan.as_ref()
    }

    /// Deferred callbacks still waiting to fire.
    pub fn pending_tasks(&self) -> usize {
        self.scheduler.pending()
    }

    /// (Re)initialize from settings against the host's local clock.
    pub fn init(&mut self, settings: &AutoShutdownSettings, host: &mut H) {
        self.init_at(settings, host, Local::now());
    }

    /// (Re)initialize with an explicit clock.
    ///
    /// Safe to call repeatedly: each pass first drops whatever the previous
    /// pass scheduled. Any rejected setting leaves the module disabled for
    /// this pass, with every violation logged; nothing half-armed survives.
    pub fn init_at<Tz>(&mut self, settings: &AutoShutdownSettings, host: &mut H, now: DateTime<Tz>)
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        // A fresh pass never inherits deferred work from the previous one.
        self.scheduler.cancel_all();
        self.plan = None;
        self.enabled = false;

        if !settings.enabled {
            return;
        }

        let time: TimeOfDay = match settings.time.parse() {
            Ok(time) => time,
            Err(err) => {
                error!(time = %settings.time, error = %err, "rejected shutdown time, module stays disabled");
                return;
            }
        };

        let policy = match policy::validate(time, settings.weekday, settings.every_days) {
            Ok(policy) => policy,
            Err(faults) => {
                for fault in &faults {
                    error!(fault = %fault, "rejected shutdown policy field");
                }
                return;
            }
        };

        let now_epoch = now.timestamp();
        let mut next = next_occurrence(&now, &policy);
        let mut countdown = next.timestamp() - now_epoch;

        if countdown < MIN_MARGIN_SECS {
            warn!(countdown, "next firing is under the safety margin, pushing one full period");
            next = next + chrono::Duration::days(i64::from(policy.period_days()));
            countdown = next.timestamp() - now_epoch;
        }

        let mut lead = settings.pre_announce.seconds;
        if lead > SECS_PER_DAY {
            warn!(configured = lead, "pre-announce lead over one day, using one hour");
            lead = SECS_PER_HOUR;
        }

        let shutdown_epoch = next.timestamp();
        let mut pre_announce_epoch = shutdown_epoch - lead as i64;
        if countdown < lead as i64 {
            // Not enough room for the full lead: announce on the next tick
            // and hand the world only the time that actually remains.
            pre_announce_epoch = now_epoch + 1;
            lead = countdown as u64;
        }
        let announce_delay = (pre_announce_epoch - now_epoch) as u64;

        host.world().cancel_pending_shutdown();

        info!(
            at = %next.format("%Y-%m-%d %H:%M:%S"),
            remaining = %humanize_secs(countdown as u64),
            "next automated shutdown scheduled"
        );
        let pre_at = next.clone() - chrono::Duration::seconds(shutdown_epoch - pre_announce_epoch);
        info!(
            at = %pre_at.format("%Y-%m-%d %H:%M:%S"),
            remaining = %humanize_secs(announce_delay),
            "pre-announcement scheduled"
        );

        let action = resolve_action(&settings.action);

        if let Err(err) = start_persistent_events(&settings.start_events, host) {
            error!(error = %err, "rejected start-events list, module stays disabled");
            return;
        }

        let template = settings.pre_announce.message.clone();
        let announce_lead = lead;
        self.scheduler
            .schedule_once(Duration::from_secs(announce_delay), move |host: &mut H| {
                let message = render_announcement(&template, announce_lead);
                info!("{message}");
                host.sessions().broadcast(ServerMessageKind::String, &message);
                host.world()
                    .begin_shutdown(announce_lead, action, SHUTDOWN_EXIT_CODE);
            });

        self.plan = Some(ShutdownPlan {
            shutdown_epoch,
            pre_announce_epoch,
            announce_lead_secs: lead,
            action,
        });
        self.enabled = true;
    }

    /// Advance deferred work by `elapsed`. No-op while disabled.
    pub fn on_update(&mut self, elapsed: Duration, host: &mut H) {
        if !self.enabled {
            return;
        }
        self.scheduler.advance(elapsed, host);
    }
}

impl<H: Host> Default for AutoShutdown<H> {
    fn default() -> Self {
        Self::new()
    }
}

/// Only the exact value `"shutdown"` stops the world for good; every other
/// value, the default included, restarts it.
fn resolve_action(raw: &str) -> ShutdownAction {
    if raw == "shutdown" {
        ShutdownAction::Shutdown
    } else {
        ShutdownAction::Restart
    }
}

/// Fill the first `{}` of the template with the remaining time.
fn render_announcement(template: &str, lead_secs: u64) -> String {
    template.replacen("{}", &humanize_secs(lead_secs), 1)
}
