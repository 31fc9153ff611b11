//! Simulated tracking-wheel encoders for the host-side runtime.
//!
//! The rig stands in for the platform's rotation sensors: it accumulates
//! centidegrees into three shared cells from scripted chassis motion, and
//! hands out [`SimEncoder`] handles that the sampler reads and resets like
//! real devices.

use std::convert::Infallible;
use std::f64::consts::PI;
use std::sync::Arc;

use parking_lot::Mutex;

use trax_odometry::{RotaryEncoder, TrackingGeometry};

const CENTIDEGREES_PER_REVOLUTION: f64 = 36000.0;

/// One simulated centidegree accumulator, shared between the rig (writer)
/// and the sampler (reader).
#[derive(Clone, Default)]
pub struct SimEncoder {
    centidegrees: Arc<Mutex<f64>>,
}

impl SimEncoder {
    fn add_arc(&self, arc: f64, wheel_diameter: f64) {
        *self.centidegrees.lock() += arc / (wheel_diameter * PI) * CENTIDEGREES_PER_REVOLUTION;
    }
}

impl RotaryEncoder for SimEncoder {
    type Error = Infallible;

    fn position(&self) -> Result<i32, Infallible> {
        // Readings are quantized to whole centidegrees, like the hardware.
        Ok(self.centidegrees.lock().round() as i32)
    }

    fn reset_position(&mut self) -> Result<(), Infallible> {
        *self.centidegrees.lock() = 0.0;
        Ok(())
    }
}

/// Drives the three simulated encoders from scripted chassis motion.
pub struct EncoderRig {
    geometry: TrackingGeometry,
    left: SimEncoder,
    right: SimEncoder,
    back: SimEncoder,
}

impl EncoderRig {
    pub fn new(geometry: TrackingGeometry) -> Self {
        EncoderRig {
            geometry,
            left: SimEncoder::default(),
            right: SimEncoder::default(),
            back: SimEncoder::default(),
        }
    }

    /// Handles for the sampler side of the rig.
    pub fn encoders(&self) -> (SimEncoder, SimEncoder, SimEncoder) {
        (self.left.clone(), self.right.clone(), self.back.clone())
    }

    /// Advance the rig by one step of robot-frame motion.
    ///
    /// Each wheel accumulates the arc its contact point sweeps: the parallel
    /// wheels pick up the forward travel plus their offset's share of the
    /// rotation, the back wheel picks up the lateral travel plus its
    /// rotation-induced swing.
    pub fn advance(&self, dx: f64, dy: f64, dtheta: f64) {
        let d = self.geometry.wheel_diameter();
        self.left.add_arc(dx + dtheta * self.geometry.left_offset(), d);
        self.right.add_arc(dx + dtheta * self.geometry.right_offset(), d);
        self.back.add_arc(dy + dtheta * self.geometry.back_offset(), d);
    }
}
