mod blackboard; // brings `blackboard.rs` in as `crate::blackboard`
mod bus; // brings `bus.rs` in as `crate::bus`
mod config; // brings `config.rs` in as `crate::config`
mod encoders; // brings `encoders.rs` in as `crate::encoders`

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use spin_sleep::SpinSleeper;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use tracing_subscriber::{self, EnvFilter};

use trax_odometry::{OdometryTracker, Pose, TrackingGeometry, WheelTravelSampler};

use blackboard::{Blackboard, raise_fault, record_update, snapshot};
use bus::Topic;
use encoders::EncoderRig;

/// Scripted constant twist driving the simulated encoder rig.
#[derive(Debug, Clone, Copy)]
struct MotionProfile {
    linear_velocity: f64,
    angular_velocity: f64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    info!("Trax odometry runtime started. Loading configuration...");

    let settings = config::load_config().context("failed to load configuration")?;

    // Degenerate geometry must be rejected here, before any cycling begins.
    let geometry = TrackingGeometry::new(
        settings.get_float("odometry.wheel_diameter")?,
        settings.get_float("odometry.left_offset")?,
        settings.get_float("odometry.right_offset")?,
        settings.get_float("odometry.back_offset")?,
    )
    .context("invalid tracking geometry")?;
    let cycle = Duration::from_millis(settings.get_int("odometry.cycle_ms")? as u64);
    let profile = MotionProfile {
        linear_velocity: settings.get_float("profile.linear_velocity")?,
        angular_velocity: settings.get_float("profile.angular_velocity")?,
    };
    info!(%geometry, ?cycle, "Configuration validated");

    run(geometry, cycle, profile).await
}

async fn run(
    geometry: TrackingGeometry,
    cycle: Duration,
    profile: MotionProfile,
) -> anyhow::Result<()> {
    let bb: Blackboard = Arc::default();
    let pose_topic: Topic<Pose> = Topic::new(16);
    let pose_rx_for_telemetry = pose_topic.subscribe();

    info!("Spawning odometry thread...");
    std::thread::Builder::new().name("odometry".into()).spawn({
        let bb_clone = Arc::clone(&bb);
        let pose_topic = pose_topic.clone();
        move || {
            info!("Odometry thread started.");
            let rig = EncoderRig::new(geometry);
            let (left, right, back) = rig.encoders();
            let mut sampler = WheelTravelSampler::new(geometry, left, right, back);
            let mut tracker = OdometryTracker::new(geometry);
            let sleeper = SpinSleeper::new(10_000);
            let dt = cycle.as_secs_f64();
            loop {
                rig.advance(
                    profile.linear_velocity * dt,
                    0.0,
                    profile.angular_velocity * dt,
                );

                match sampler.sample() {
                    Ok(arcs) => {
                        tracker.integrate(arcs);
                        let pose = tracker.pose();
                        pose_topic.publish(pose);
                        record_update(&bb_clone, pose, tracker.distance_traveled());
                        debug!(x = pose.x, y = pose.y, heading = pose.heading, "Cycle integrated");
                    }
                    Err(e) => {
                        // The pose is held for this cycle; the travel stays
                        // in the accumulators for the next one.
                        warn!("Odometry cycle skipped: {}", e);
                        raise_fault(&bb_clone, &e.to_string());
                    }
                }
                sleeper.sleep(cycle);
            }
        }
    })?;

    info!("Starting async tasks (telemetry, watchdog)...");
    tokio::try_join!(
        telemetry(bb.clone(), pose_rx_for_telemetry),
        watchdog(bb, cycle),
    )?;
    Ok(())
}

/// 1 Hz state snapshot plus per-update debug logging.
async fn telemetry(
    bb: Blackboard,
    mut pose_rx: broadcast::Receiver<Arc<Pose>>,
) -> anyhow::Result<()> {
    info!("Telemetry task started.");
    let mut tick = tokio::time::interval(Duration::from_secs(1));
    loop {
        tokio::select! {
            _ = tick.tick() => {
                let state = snapshot(&bb);
                info!(
                    pose = %state.pose,
                    distance = state.distance_traveled,
                    faults = state.faults.len(),
                    "Odometry snapshot"
                );
            }
            Ok(pose) = pose_rx.recv() => {
                debug!(pose = %pose, "Pose published");
            }
        }
    }
}

async fn watchdog(bb: Blackboard, cycle: Duration) -> anyhow::Result<()> {
    info!("Watchdog task started.");
    let stale_after = cycle * 5;
    let mut tick = tokio::time::interval(Duration::from_millis(100));
    loop {
        tick.tick().await;
        let age = Instant::now() - snapshot(&bb).last_update_ts;
        if age > stale_after {
            warn!(?age, "Pose estimate is stale! Odometry thread may have stalled.");
            raise_fault(&bb, "odometry stale");
        }
    }
}
