//! Tokio runtime driving the periodic sampling tick.
//!
//! One task owns the monitor and is the only writer; everyone else observes
//! immutable snapshots through a watch channel.

use std::sync::Arc;

use chrono::Utc;
use log::warn;
use tokio::sync::{broadcast, watch};
use tokio::time::{interval, Duration, MissedTickBehavior};

use super::monitor::ThermalMonitor;
use super::policy::{render, NotificationSink};
use super::types::MonitorSnapshot;

/// Default sampling period.
pub const DEFAULT_TICK_MS: u64 = 2000;

/// Wrapper around the Tokio runtime that owns the sampling loop.
pub struct MonitorRuntime {
    /// Receiver for published state snapshots.
    pub snapshot_rx: watch::Receiver<Arc<MonitorSnapshot>>,

    /// Shutdown signal sender
    shutdown_tx: broadcast::Sender<()>,

    /// Handle to the runtime (for shutdown)
    _runtime_handle: tokio::runtime::Runtime,
}

impl MonitorRuntime {
    /// Spawn the sampling task on a fresh runtime.
    pub fn new(
        monitor: ThermalMonitor,
        sink: Box<dyn NotificationSink>,
        period: Duration,
    ) -> anyhow::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_time()
            .thread_name("thermwatch-sampler")
            .build()?;

        let (snapshot_tx, snapshot_rx) = watch::channel(Arc::new(MonitorSnapshot::default()));
        let (shutdown_tx, shutdown_rx) = broadcast::channel::<()>(1);

        runtime.spawn(sampling_task(monitor, sink, period, snapshot_tx, shutdown_rx));

        Ok(Self {
            snapshot_rx,
            shutdown_tx,
            _runtime_handle: runtime,
        })
    }

    /// Shutdown the runtime gracefully.
    pub fn shutdown(self) {
        let _ = self.shutdown_tx.send(());
        // Runtime shuts down when dropped; source teardown (pressure
        // deregistration, SMC close) runs via Drop on the monitor's sources.
    }
}

/// The single-writer sampling loop.
///
/// Ticks never overlap: a missed deadline delays the next tick instead of
/// bunching, and the whole tick (reads, append, eviction, publication) runs
/// before the timer is polled again.
async fn sampling_task(
    mut monitor: ThermalMonitor,
    mut sink: Box<dyn NotificationSink>,
    period: Duration,
    snapshot_tx: watch::Sender<Arc<MonitorSnapshot>>,
    mut shutdown: broadcast::Receiver<()>,
) {
    let mut timer = interval(period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut delivery_warned = false;

    loop {
        tokio::select! {
            _ = timer.tick() => {
                let sound = monitor.toggles().sound_enabled;
                let event = monitor.tick(Utc::now());

                if let Some(event) = event {
                    let (title, body) = render(&event);
                    if let Err(e) = sink.deliver(&title, &body, sound) {
                        // Surface the failure once, keep sampling.
                        if !delivery_warned {
                            warn!("notification delivery failed: {e}");
                            delivery_warned = true;
                        }
                    }
                }

                // watch::send only fails with no receivers, which is fine.
                let _ = snapshot_tx.send(Arc::new(monitor.snapshot()));
            }
            _ = shutdown.recv() => {
                break;
            }
        }
    }
}
