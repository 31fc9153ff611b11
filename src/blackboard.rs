use parking_lot::RwLock;
use std::{sync::Arc, time::Instant};

use trax_odometry::Pose;

#[derive(Clone)]
pub struct State {
    pub pose: Pose,
    pub distance_traveled: f64,
    pub last_update_ts: Instant,
    pub faults: Vec<String>,
}

impl Default for State {
    fn default() -> Self {
        State {
            pose: Pose::default(),
            distance_traveled: 0.0,
            last_update_ts: Instant::now(),
            faults: Vec::new(),
        }
    }
}

pub type Blackboard = Arc<RwLock<State>>;

pub fn snapshot(bb: &Blackboard) -> State {
    (*bb.read()).clone()
}

pub fn record_update(bb: &Blackboard, pose: Pose, distance_traveled: f64) {
    let mut g = bb.write();
    g.pose = pose;
    g.distance_traveled = distance_traveled;
    g.last_update_ts = Instant::now();
}

pub fn raise_fault(bb: &Blackboard, msg: &str) {
    let mut g = bb.write();
    if !g.faults.iter().any(|s| s == msg) {
        g.faults.push(msg.to_string());
    }
}
