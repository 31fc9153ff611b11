#![warn(missing_docs)]

//! Encoder boundary and the per-cycle wheel travel sampler.
//!
//! The odometry core never talks to hardware directly. It consumes three
//! cumulative rotary encoders through the [`RotaryEncoder`] trait and turns
//! their raw angular positions into per-cycle [`ArcLengths`] via the
//! [`WheelTravelSampler`].

use core::fmt;

use crate::error::OdometryError;
use crate::{ArcLengths, TrackingGeometry};

/// Identifies one of the three tracking wheels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wheel {
    /// The left parallel tracking wheel.
    Left,
    /// The right parallel tracking wheel.
    Right,
    /// The perpendicular back tracking wheel.
    Back,
}

impl fmt::Display for Wheel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Wheel::Left => write!(f, "left"),
            Wheel::Right => write!(f, "right"),
            Wheel::Back => write!(f, "back"),
        }
    }
}

/// Interface to a cumulative rotary encoder on an unpowered tracking wheel.
///
/// Implementations report wheel rotation in centidegrees (36000 per
/// revolution), accumulated since the last reset, and allow the accumulator
/// to be zeroed. Read and reset failures are reported through the
/// implementation's own error type; the sampler maps them to
/// [`OdometryError::SensorFault`] rather than feeding sentinel values into
/// the arithmetic.
pub trait RotaryEncoder {
    /// Device-specific error type for failed reads or resets.
    type Error;

    /// Cumulative angular position in centidegrees since the last reset.
    fn position(&self) -> Result<i32, Self::Error>;

    /// Reset the position accumulator to zero.
    fn reset_position(&mut self) -> Result<(), Self::Error>;
}

/// Reads the three tracking-wheel encoders once per control cycle.
///
/// Each [`sample`](WheelTravelSampler::sample) call reads all three raw
/// positions, converts them to linear arc lengths, then resets the
/// accumulators so the next call reports travel since this one. The sampler
/// owns the encoder handles; the caller is expected to invoke it from a
/// single periodic loop.
pub struct WheelTravelSampler<E: RotaryEncoder> {
    geometry: TrackingGeometry,
    left: E,
    right: E,
    back: E,
}

impl<E: RotaryEncoder> WheelTravelSampler<E> {
    /// Construct a sampler over the three encoder handles.
    ///
    /// # Arguments
    ///
    /// * `geometry`: The tracking geometry used for the centidegree to
    ///   arc-length conversion.
    /// * `left`, `right`, `back`: Encoder handles for the corresponding
    ///   tracking wheels.
    pub fn new(geometry: TrackingGeometry, left: E, right: E, back: E) -> Self {
        WheelTravelSampler {
            geometry,
            left,
            right,
            back,
        }
    }

    /// Sample the travel of all three wheels since the previous call.
    ///
    /// All three positions are read before any accumulator is reset, so one
    /// call yields an internally consistent snapshot. The reads are still
    /// three separate device transactions; a stricter snapshot would need a
    /// synchronized multi-read from the platform layer.
    ///
    /// # Errors
    ///
    /// Returns `Err(OdometryError::SensorFault(wheel))` if any encoder fails
    /// to read or reset. A read failure leaves every accumulator untouched,
    /// so the travel is carried into the next successful sample and the pose
    /// can simply be held for this cycle. A reset failure abandons the
    /// sample; wheels that were already reset drop this cycle's travel.
    pub fn sample(&mut self) -> Result<ArcLengths, OdometryError> {
        let left = self
            .left
            .position()
            .map_err(|_| OdometryError::SensorFault(Wheel::Left))?;
        let right = self
            .right
            .position()
            .map_err(|_| OdometryError::SensorFault(Wheel::Right))?;
        let back = self
            .back
            .position()
            .map_err(|_| OdometryError::SensorFault(Wheel::Back))?;

        let arcs = ArcLengths::new(
            self.geometry.arc_from_centidegrees(left),
            self.geometry.arc_from_centidegrees(right),
            self.geometry.arc_from_centidegrees(back),
        );

        self.left
            .reset_position()
            .map_err(|_| OdometryError::SensorFault(Wheel::Left))?;
        self.right
            .reset_position()
            .map_err(|_| OdometryError::SensorFault(Wheel::Right))?;
        self.back
            .reset_position()
            .map_err(|_| OdometryError::SensorFault(Wheel::Back))?;

        Ok(arcs)
    }

    /// Returns the tracking geometry the sampler converts with.
    pub fn geometry(&self) -> TrackingGeometry {
        self.geometry
    }
}
