#![warn(missing_docs)]

//! Error types for the odometry library.
//!
//! This module defines the errors that can occur while configuring the
//! tracking geometry or while sampling the tracking-wheel encoders.

use core::fmt;

use crate::encoder::Wheel;

/// Errors that can occur in odometry configuration and sampling.
#[derive(Debug, Clone, PartialEq)]
pub enum OdometryError {
    /// Error for an invalid tracking-wheel diameter.
    /// This variant is returned when a wheel diameter is provided that is not positive.
    InvalidWheelDiameter(&'static str),
    /// Error for degenerate parallel-wheel offsets.
    /// This variant is returned when the left and right wheel offsets are equal,
    /// which would make the heading-change computation divide by zero.
    DegenerateTrackOffsets(&'static str),
    /// Error for a tracking-wheel encoder that failed to read or reset.
    /// The pose must be held for the cycle in which this is returned.
    SensorFault(Wheel),
}

impl fmt::Display for OdometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OdometryError::InvalidWheelDiameter(msg) => {
                write!(f, "Invalid wheel diameter: {}", msg)
            }
            OdometryError::DegenerateTrackOffsets(msg) => {
                write!(f, "Degenerate track offsets: {}", msg)
            }
            OdometryError::SensorFault(wheel) => {
                write!(f, "Sensor fault on {} tracking wheel", wheel)
            }
        }
    }
}

impl core::error::Error for OdometryError {}
