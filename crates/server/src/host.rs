//! The demo host loop: drives the module against the simulated world.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use downtimer_autoshutdown::AutoShutdown;
use downtimer_core::{humanize_secs, timeutil};
use downtimer_world::{SimEventRegistry, SimHost};
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::config::HostConfig;

/// Run until the world's countdown expires or the process is interrupted.
/// Returns the exit code the world asked for.
pub async fn run(config_path: &Path, tick: Duration) -> anyhow::Result<i32> {
    let config = match HostConfig::from_file(config_path) {
        Ok(config) => config,
        Err(err) => {
            warn!(
                path = %config_path.display(),
                error = %err,
                "config load failed, starting with defaults"
            );
            HostConfig::default()
        }
    };

    let mut host = build_host(&config);
    let mut module = AutoShutdown::new();
    module.init(&config.autoshutdown, &mut host);
    log_plan(&module);

    let (reload_tx, mut reload_rx) = mpsc::unbounded_channel();
    let _watcher = match watch_config(config_path, reload_tx) {
        Ok(watcher) => Some(watcher),
        Err(err) => {
            warn!(error = %err, "config watcher unavailable, reload via SIGHUP only");
            None
        }
    };
    let mut sighup = signal(SignalKind::hangup()).context("installing SIGHUP handler")?;

    let mut ticker = tokio::time::interval(tick);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    let mut last = tokio::time::Instant::now();

    info!(
        path = %config_path.display(),
        tick_ms = tick.as_millis() as u64,
        "host running"
    );

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let now = tokio::time::Instant::now();
                let elapsed = now - last;
                last = now;

                module.on_update(elapsed, &mut host);
                if let Some(exit) = host.world.tick(elapsed) {
                    info!(action = %exit.action, code = exit.exit_code, "world stopped");
                    return Ok(exit.exit_code);
                }
            }
            _ = sighup.recv() => {
                info!("SIGHUP received, reloading configuration");
                reload(config_path, &mut module, &mut host);
            }
            Some(()) = reload_rx.recv() => {
                // Editors fire bursts of events for one save; drain them.
                while reload_rx.try_recv().is_ok() {}
                info!("config file changed, reloading");
                reload(config_path, &mut module, &mut host);
            }
            _ = tokio::signal::ctrl_c() => {
                info!("interrupt received, exiting");
                return Ok(0);
            }
        }
    }
}

/// Seed the sim host from the `[world]` section.
pub fn build_host(config: &HostConfig) -> SimHost {
    let registry = SimEventRegistry::from_entries(
        config
            .world
            .game_event
            .iter()
            .map(|e| (e.id, e.description.clone())),
    );
    SimHost::with_events(registry)
}

/// Re-read the config and re-initialize the module. A file that fails to
/// load keeps the previous schedule running untouched.
fn reload(path: &Path, module: &mut AutoShutdown<SimHost>, host: &mut SimHost) {
    match HostConfig::from_file(path) {
        Ok(config) => {
            host.events = SimEventRegistry::from_entries(
                config
                    .world
                    .game_event
                    .iter()
                    .map(|e| (e.id, e.description.clone())),
            );
            module.init(&config.autoshutdown, host);
            log_plan(module);
        }
        Err(err) => {
            warn!(error = %err, "reload failed, keeping previous configuration");
        }
    }
}

fn log_plan(module: &AutoShutdown<SimHost>) {
    match module.plan() {
        Some(plan) => info!(
            shutdown_at = %timeutil::format_epoch_local(plan.shutdown_epoch),
            announce_at = %timeutil::format_epoch_local(plan.pre_announce_epoch),
            lead = %humanize_secs(plan.announce_lead_secs),
            action = %plan.action,
            "module armed"
        ),
        None => info!("module disabled"),
    }
}

/// Watch the config file's directory and signal on changes to the file.
fn watch_config(
    path: &Path,
    tx: mpsc::UnboundedSender<()>,
) -> notify::Result<RecommendedWatcher> {
    let file_name = path.file_name().map(|n| n.to_os_string());
    let mut watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
        match res {
            Ok(event) if event.kind.is_modify() || event.kind.is_create() => {
                let ours = file_name.as_ref().map_or(true, |name| {
                    event
                        .paths
                        .iter()
                        .any(|p| p.file_name() == Some(name.as_os_str()))
                });
                if ours {
                    let _ = tx.send(());
                }
            }
            Ok(_) => {}
            Err(err) => warn!(error = %err, "config watch error"),
        }
    })?;

    // Watch the parent directory: editors typically replace the file
    // rather than write it in place.
    let target = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    watcher.watch(target, RecursiveMode::NonRecursive)?;
    Ok(watcher)
}
