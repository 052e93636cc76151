//! End-to-end module behavior against the sim host: initialization,
//! pre-announcement firing, degradation on rejected settings, re-init.

use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use downtimer_autoshutdown::{AutoShutdown, AutoShutdownSettings};
use downtimer_world::{ServerMessageKind, ShutdownAction, SimEventRegistry, SimHost};

fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
}

fn secs(n: u64) -> Duration {
    Duration::from_secs(n)
}

fn enabled_settings() -> AutoShutdownSettings {
    AutoShutdownSettings {
        enabled: true,
        ..AutoShutdownSettings::default()
    }
}

/// Midnight on Monday 2024-01-01; the default policy then fires at 04:00.
fn monday_midnight() -> DateTime<Utc> {
    utc(2024, 1, 1, 0, 0, 0)
}

// ── arming ──────────────────────────────────────────────────────

#[test]
fn disabled_settings_arm_nothing() {
    let mut module = AutoShutdown::new();
    let mut host = SimHost::new();

    module.init_at(&AutoShutdownSettings::default(), &mut host, monday_midnight());

    assert!(!module.is_enabled());
    assert!(module.plan().is_none());
    assert_eq!(module.pending_tasks(), 0);
}

#[test]
fn defaults_arm_a_four_am_restart() {
    let mut module = AutoShutdown::new();
    let mut host = SimHost::new();

    module.init_at(&enabled_settings(), &mut host, monday_midnight());

    assert!(module.is_enabled());
    assert_eq!(module.pending_tasks(), 1);

    let plan = module.plan().unwrap();
    assert_eq!(plan.shutdown_epoch, utc(2024, 1, 1, 4, 0, 0).timestamp());
    assert_eq!(plan.pre_announce_epoch, utc(2024, 1, 1, 3, 0, 0).timestamp());
    assert_eq!(plan.shutdown_epoch - plan.pre_announce_epoch, 3_600);
    assert_eq!(plan.announce_lead_secs, 3_600);
    assert_eq!(plan.action, ShutdownAction::Restart);
}

#[test]
fn pre_announcement_fires_on_time_and_starts_the_world_countdown() {
    let mut module = AutoShutdown::new();
    let mut host = SimHost::new();
    module.init_at(&enabled_settings(), &mut host, monday_midnight());

    // One second short of the three-hour announce delay: nothing yet.
    module.on_update(secs(3 * 3_600 - 1), &mut host);
    assert!(host.sessions.sent().is_empty());
    assert!(host.world.pending().is_none());

    module.on_update(secs(1), &mut host);

    assert_eq!(
        host.sessions.sent(),
        &[(
            ServerMessageKind::String,
            "[SERVER]: Automated server restart(shutdown) in 1 Hour".to_string()
        )]
    );
    let pending = host.world.pending().unwrap();
    assert_eq!(pending.remaining, secs(3_600));
    assert_eq!(pending.action, ShutdownAction::Restart);
    assert_eq!(pending.exit_code, 0);
    assert_eq!(module.pending_tasks(), 0);
}

#[test]
fn the_announcement_fires_exactly_once() {
    let mut module = AutoShutdown::new();
    let mut host = SimHost::new();
    module.init_at(&enabled_settings(), &mut host, monday_midnight());

    module.on_update(secs(4 * 3_600), &mut host);
    module.on_update(secs(24 * 3_600), &mut host);

    assert_eq!(host.sessions.sent().len(), 1);
}

#[test]
fn update_before_init_is_a_no_op() {
    let mut module: AutoShutdown<SimHost> = AutoShutdown::new();
    let mut host = SimHost::new();

    module.on_update(secs(48 * 3_600), &mut host);

    assert!(host.sessions.sent().is_empty());
    assert!(host.world.pending().is_none());
}

// ── recurrence shapes ───────────────────────────────────────────

#[test]
fn longer_interval_always_counts_from_today() {
    let mut module = AutoShutdown::new();
    let mut host = SimHost::new();
    let settings = AutoShutdownSettings {
        every_days: 3,
        ..enabled_settings()
    };

    module.init_at(&settings, &mut host, monday_midnight());

    let plan = module.plan().unwrap();
    assert_eq!(plan.shutdown_epoch, utc(2024, 1, 4, 4, 0, 0).timestamp());
}

#[test]
fn weekly_mode_waits_a_week_once_todays_time_has_passed() {
    let mut module = AutoShutdown::new();
    let mut host = SimHost::new();
    let settings = AutoShutdownSettings {
        weekday: 1,
        ..enabled_settings()
    };

    module.init_at(&settings, &mut host, utc(2024, 1, 1, 5, 0, 0));

    let plan = module.plan().unwrap();
    assert_eq!(plan.shutdown_epoch, utc(2024, 1, 8, 4, 0, 0).timestamp());
}

#[test]
fn out_of_range_weekday_silently_selects_interval_mode() {
    let mut module = AutoShutdown::new();
    let mut host = SimHost::new();
    let settings = AutoShutdownSettings {
        weekday: 9,
        ..enabled_settings()
    };

    module.init_at(&settings, &mut host, monday_midnight());

    assert!(module.is_enabled());
    let plan = module.plan().unwrap();
    assert_eq!(plan.shutdown_epoch, utc(2024, 1, 1, 4, 0, 0).timestamp());
}

// ── safety margin ───────────────────────────────────────────────

#[test]
fn a_firing_under_ten_seconds_away_moves_one_interval_out() {
    let mut module = AutoShutdown::new();
    let mut host = SimHost::new();

    module.init_at(&enabled_settings(), &mut host, utc(2024, 1, 1, 3, 59, 55));

    let plan = module.plan().unwrap();
    assert_eq!(plan.shutdown_epoch, utc(2024, 1, 2, 4, 0, 0).timestamp());
}

#[test]
fn the_margin_push_uses_the_weekly_period_in_weekly_mode() {
    let mut module = AutoShutdown::new();
    let mut host = SimHost::new();
    let settings = AutoShutdownSettings {
        weekday: 1,
        ..enabled_settings()
    };

    module.init_at(&settings, &mut host, utc(2024, 1, 1, 3, 59, 55));

    let plan = module.plan().unwrap();
    assert_eq!(plan.shutdown_epoch, utc(2024, 1, 8, 4, 0, 0).timestamp());
}

// ── pre-announce shaping ────────────────────────────────────────

#[test]
fn oversized_lead_falls_back_to_one_hour() {
    let mut module = AutoShutdown::new();
    let mut host = SimHost::new();
    let mut settings = enabled_settings();
    settings.pre_announce.seconds = 90_000;

    module.init_at(&settings, &mut host, monday_midnight());

    let plan = module.plan().unwrap();
    assert_eq!(plan.announce_lead_secs, 3_600);
    assert_eq!(plan.pre_announce_epoch, utc(2024, 1, 1, 3, 0, 0).timestamp());
}

#[test]
fn a_target_closer_than_the_lead_collapses_the_announcement() {
    let mut module = AutoShutdown::new();
    let mut host = SimHost::new();
    let now = utc(2024, 1, 1, 3, 30, 0);

    module.init_at(&enabled_settings(), &mut host, now);

    let plan = module.plan().unwrap();
    assert_eq!(plan.shutdown_epoch, utc(2024, 1, 1, 4, 0, 0).timestamp());
    // Announce on the next tick, with only the real remainder as lead.
    assert_eq!(plan.pre_announce_epoch, now.timestamp() + 1);
    assert_eq!(plan.announce_lead_secs, 1_800);

    module.on_update(secs(1), &mut host);
    assert_eq!(
        host.sessions.sent(),
        &[(
            ServerMessageKind::String,
            "[SERVER]: Automated server restart(shutdown) in 30 Minutes".to_string()
        )]
    );
    assert_eq!(host.world.pending().unwrap().remaining, secs(1_800));
}

#[test]
fn a_countdown_equal_to_the_lead_keeps_the_full_lead() {
    let mut module = AutoShutdown::new();
    let mut host = SimHost::new();
    let now = utc(2024, 1, 1, 3, 0, 0);

    module.init_at(&enabled_settings(), &mut host, now);

    let plan = module.plan().unwrap();
    assert_eq!(plan.pre_announce_epoch, now.timestamp());
    assert_eq!(plan.announce_lead_secs, 3_600);

    // Due immediately: the first tick fires it.
    module.on_update(Duration::ZERO, &mut host);
    assert_eq!(host.world.pending().unwrap().remaining, secs(3_600));
}

#[test]
fn custom_template_is_rendered_with_the_remaining_time() {
    let mut module = AutoShutdown::new();
    let mut host = SimHost::new();
    let mut settings = enabled_settings();
    settings.pre_announce.message = "going down for maintenance in {}".to_string();
    settings.pre_announce.seconds = 90;

    module.init_at(&settings, &mut host, monday_midnight());
    module.on_update(secs(4 * 3_600 - 90), &mut host);

    assert_eq!(
        host.sessions.sent(),
        &[(
            ServerMessageKind::String,
            "going down for maintenance in 1 Minute 30 Seconds".to_string()
        )]
    );
}

// ── action selection ────────────────────────────────────────────

#[test]
fn only_the_exact_word_shutdown_stops_for_good() {
    let mut module = AutoShutdown::new();
    let mut host = SimHost::new();
    let settings = AutoShutdownSettings {
        action: "shutdown".to_string(),
        ..enabled_settings()
    };

    module.init_at(&settings, &mut host, monday_midnight());
    assert_eq!(module.plan().unwrap().action, ShutdownAction::Shutdown);

    module.on_update(secs(3 * 3_600), &mut host);
    assert_eq!(host.world.pending().unwrap().action, ShutdownAction::Shutdown);
}

#[test]
fn any_other_action_value_restarts() {
    for raw in ["restart", "Shutdown", "halt", ""] {
        let mut module = AutoShutdown::new();
        let mut host = SimHost::new();
        let settings = AutoShutdownSettings {
            action: raw.to_string(),
            ..enabled_settings()
        };

        module.init_at(&settings, &mut host, monday_midnight());
        assert_eq!(module.plan().unwrap().action, ShutdownAction::Restart, "{raw:?}");
    }
}

// ── degradation on rejected settings ────────────────────────────

#[test]
fn malformed_time_disables_and_leaves_nothing_pending() {
    for raw in ["04:00", "4", "aa:bb:cc", "1:2:3:4"] {
        let mut module = AutoShutdown::new();
        let mut host = SimHost::new();
        let settings = AutoShutdownSettings {
            time: raw.to_string(),
            ..enabled_settings()
        };

        module.init_at(&settings, &mut host, monday_midnight());

        assert!(!module.is_enabled(), "{raw:?}");
        assert!(module.plan().is_none(), "{raw:?}");
        assert_eq!(module.pending_tasks(), 0, "{raw:?}");
        assert!(host.world.pending().is_none(), "{raw:?}");
    }
}

#[test]
fn out_of_range_fields_disable_the_module() {
    let cases = [
        AutoShutdownSettings {
            time: "25:00:00".to_string(),
            ..enabled_settings()
        },
        AutoShutdownSettings {
            every_days: 0,
            ..enabled_settings()
        },
        AutoShutdownSettings {
            every_days: 400,
            weekday: 2,
            ..enabled_settings()
        },
    ];

    for settings in cases {
        let mut module = AutoShutdown::new();
        let mut host = SimHost::new();

        module.init_at(&settings, &mut host, monday_midnight());

        assert!(!module.is_enabled());
        assert_eq!(module.pending_tasks(), 0);
    }
}

// ── persistent game events ──────────────────────────────────────

#[test]
fn listed_events_activate_in_order_on_every_init() {
    let mut module = AutoShutdown::new();
    let mut host = SimHost::with_events(SimEventRegistry::from_entries([
        (5, "Harvest Festival".to_string()),
        (7, "Double Rates".to_string()),
    ]));
    let settings = AutoShutdownSettings {
        start_events: "5 7 7".to_string(),
        ..enabled_settings()
    };

    module.init_at(&settings, &mut host, monday_midnight());
    assert_eq!(host.events.started(), &[5, 7, 7]);
    assert!(module.is_enabled());

    module.init_at(&settings, &mut host, monday_midnight());
    assert_eq!(host.events.started(), &[5, 7, 7, 5, 7, 7]);
}

#[test]
fn a_bad_event_token_disables_after_the_partial_start() {
    let mut module = AutoShutdown::new();
    let mut host = SimHost::new();
    let settings = AutoShutdownSettings {
        start_events: "5 x 9".to_string(),
        ..enabled_settings()
    };

    module.init_at(&settings, &mut host, monday_midnight());

    assert!(!module.is_enabled());
    assert_eq!(module.pending_tasks(), 0);
    assert_eq!(host.events.started(), &[5]);
}

// ── re-initialization ───────────────────────────────────────────

#[test]
fn reinit_cancels_the_previous_schedule_and_world_countdown() {
    let mut module = AutoShutdown::new();
    let mut host = SimHost::new();
    module.init_at(&enabled_settings(), &mut host, monday_midnight());

    // Fire the announcement so the world is counting down.
    module.on_update(secs(3 * 3_600), &mut host);
    assert!(host.world.pending().is_some());
    assert_eq!(host.sessions.sent().len(), 1);

    // Reload at 05:00: the in-flight countdown is aborted, a fresh plan
    // for tomorrow replaces it.
    module.init_at(&enabled_settings(), &mut host, utc(2024, 1, 1, 5, 0, 0));

    assert!(host.world.pending().is_none());
    assert_eq!(host.sessions.sent().len(), 1);
    assert_eq!(module.pending_tasks(), 1);
    assert_eq!(
        module.plan().unwrap().shutdown_epoch,
        utc(2024, 1, 2, 4, 0, 0).timestamp()
    );
}

#[test]
fn reload_into_a_bad_config_clears_the_previous_schedule() {
    let mut module = AutoShutdown::new();
    let mut host = SimHost::new();
    module.init_at(&enabled_settings(), &mut host, monday_midnight());
    assert_eq!(module.pending_tasks(), 1);

    let broken = AutoShutdownSettings {
        time: "nope".to_string(),
        ..enabled_settings()
    };
    module.init_at(&broken, &mut host, utc(2024, 1, 1, 1, 0, 0));

    assert!(!module.is_enabled());
    assert_eq!(module.pending_tasks(), 0);

    // With nothing armed, time passing changes nothing.
    module.on_update(secs(48 * 3_600), &mut host);
    assert!(host.sessions.sent().is_empty());
    assert!(host.world.pending().is_none());
}
