#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![doc = "A `no_std` library for three-wheel dead-reckoning odometry."]
#![doc = ""]
#![doc = "This crate converts raw tracking-wheel encoder readings into incremental"]
#![doc = "displacement and heading change, and integrates them into a running 2D pose"]
#![doc = "using differential odometry with a midpoint-heading approximation."]

use core::f64::consts::PI;
use core::fmt;
use libm::{cos, fabs, sin};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub mod encoder;
pub mod error;
pub use encoder::{RotaryEncoder, Wheel, WheelTravelSampler};
pub use error::OdometryError;

/// Centidegrees in one full wheel revolution (360 degrees x 100).
const CENTIDEGREES_PER_REVOLUTION: f64 = 36000.0;

/// A 2‑D pose `(x, y, heading)` in the tracking wheels' linear unit and
/// radians (heading measured counter‑clockwise in the world frame).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pose {
    /// World‑frame x position.
    pub x: f64,
    /// World‑frame y position.
    pub y: f64,
    /// Heading (rad), normalized to `[0, 2*PI)`.
    pub heading: f64,
}

impl Pose {
    /// Construct a new pose.
    ///
    /// # Arguments
    ///
    /// * `x`: World-frame x position.
    /// * `y`: World-frame y position.
    /// * `heading`: Heading in radians.
    pub const fn new(x: f64, y: f64, heading: f64) -> Self {
        Pose { x, y, heading }
    }

    /// Normalize an angle to be within `[0, 2*PI)`.
    ///
    /// Uses modulo normalization, so inputs more than a full turn outside
    /// the range (in either direction) still land in it.
    ///
    /// # Arguments
    ///
    /// * `angle`: The angle in radians to normalize.
    ///
    /// # Returns
    ///
    /// The normalized angle in radians.
    pub fn normalize_angle(angle: f64) -> f64 {
        let a = angle % (2.0 * PI);
        if a < 0.0 {
            // The second modulo folds the rounding case `a + 2*PI == 2*PI`
            // back to zero.
            (a + 2.0 * PI) % (2.0 * PI)
        } else {
            a
        }
    }
}

impl fmt::Display for Pose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(x: {:.2}, y: {:.2}, θ: {:.2} rad)", self.x, self.y, self.heading)
    }
}

/// Signed linear distances traveled by the three tracking wheels since the
/// previous sample, in the same unit as the wheel diameter.
///
/// This is a per-cycle value object: it is produced by
/// [`WheelTravelSampler::sample`] and consumed once by
/// [`OdometryTracker::integrate`], never persisted.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ArcLengths {
    /// Arc traveled by the left parallel wheel.
    pub left: f64,
    /// Arc traveled by the right parallel wheel.
    pub right: f64,
    /// Arc traveled by the perpendicular back wheel.
    pub back: f64,
}

impl ArcLengths {
    /// Construct arc lengths.
    pub const fn new(left: f64, right: f64, back: f64) -> Self {
        ArcLengths { left, right, back }
    }
}

impl fmt::Display for ArcLengths {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(L: {:.3}, R: {:.3}, B: {:.3})", self.left, self.right, self.back)
    }
}

/// Placement of the three tracking wheels relative to the rotation center.
///
/// Offsets are *signed* coordinates: `left_offset` and `right_offset` are
/// the lateral positions of the two parallel wheels, and `back_offset` is
/// the longitudinal position of the perpendicular wheel (negative when it is
/// mounted behind the center). All distances share the wheel diameter's
/// unit.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackingGeometry {
    /// Tracking-wheel diameter.
    wheel_diameter: f64,
    /// Signed lateral offset of the left parallel wheel.
    left_offset: f64,
    /// Signed lateral offset of the right parallel wheel.
    right_offset: f64,
    /// Signed longitudinal offset of the perpendicular back wheel.
    back_offset: f64,
}

impl TrackingGeometry {
    /// Construct a validated tracking geometry.
    ///
    /// # Arguments
    ///
    /// * `wheel_diameter`: Diameter of the tracking wheels.
    /// * `left_offset`: Signed lateral offset of the left parallel wheel.
    /// * `right_offset`: Signed lateral offset of the right parallel wheel.
    /// * `back_offset`: Signed longitudinal offset of the back wheel.
    ///
    /// # Errors
    ///
    /// Returns `Err(OdometryError::InvalidWheelDiameter)` if `wheel_diameter`
    /// is not positive.
    /// Returns `Err(OdometryError::DegenerateTrackOffsets)` if `left_offset`
    /// equals `right_offset`, since their difference divides the heading
    /// change.
    pub const fn new(
        wheel_diameter: f64,
        left_offset: f64,
        right_offset: f64,
        back_offset: f64,
    ) -> Result<Self, OdometryError> {
        if wheel_diameter <= 0.0 {
            return Err(OdometryError::InvalidWheelDiameter("must be positive"));
        }
        if left_offset == right_offset {
            return Err(OdometryError::DegenerateTrackOffsets(
                "left and right offsets must differ",
            ));
        }
        Ok(TrackingGeometry {
            wheel_diameter,
            left_offset,
            right_offset,
            back_offset,
        })
    }

    /// Returns the tracking-wheel diameter.
    pub fn wheel_diameter(&self) -> f64 {
        self.wheel_diameter
    }

    /// Returns the signed lateral offset of the left parallel wheel.
    pub fn left_offset(&self) -> f64 {
        self.left_offset
    }

    /// Returns the signed lateral offset of the right parallel wheel.
    pub fn right_offset(&self) -> f64 {
        self.right_offset
    }

    /// Returns the signed longitudinal offset of the back wheel.
    pub fn back_offset(&self) -> f64 {
        self.back_offset
    }

    /// Convert a raw cumulative encoder reading to a linear arc length.
    ///
    /// The reading is in centidegrees of wheel rotation (36000 per
    /// revolution); the result is the distance rolled by the wheel's contact
    /// point, in the wheel diameter's unit.
    pub fn arc_from_centidegrees(&self, raw: i32) -> f64 {
        (raw as f64 / CENTIDEGREES_PER_REVOLUTION) * self.wheel_diameter * PI
    }
}

impl fmt::Display for TrackingGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TrackingGeometry (d: {:.2}, L: {:.2}, R: {:.2}, B: {:.2})",
            self.wheel_diameter, self.left_offset, self.right_offset, self.back_offset
        )
    }
}

/// Dead-reckoning pose integrator over the three tracking wheels.
///
/// The tracker exclusively owns the running [`Pose`] and mutates it once per
/// cycle by accumulation. It has no modes and never suspends; the caller is
/// responsible for invoking [`integrate`](OdometryTracker::integrate) from a
/// single periodic loop with the arc lengths of exactly one sample.
#[derive(Debug, Clone)]
pub struct OdometryTracker {
    geometry: TrackingGeometry,
    pose: Pose,
    /// Total absolute forward travel, kept as a diagnostic counter.
    distance_traveled: f64,
}

impl OdometryTracker {
    /// Construct a tracker starting at the origin with heading zero.
    pub fn new(geometry: TrackingGeometry) -> Self {
        Self::from_pose(geometry, Pose::default())
    }

    /// Construct a tracker starting at a specific pose.
    pub fn from_pose(geometry: TrackingGeometry, pose: Pose) -> Self {
        OdometryTracker {
            geometry,
            pose,
            distance_traveled: 0.0,
        }
    }

    /// Integrate one cycle's arc lengths into the pose.
    ///
    /// The heading change comes from the differential of the two parallel
    /// wheels; the local displacement is their average forward travel plus
    /// the back wheel's reading corrected for rotation-induced swing. The
    /// local displacement is rotated into the world frame at the midpoint
    /// heading, which cancels the first-order integration error of either
    /// endpoint.
    pub fn integrate(&mut self, arcs: ArcLengths) {
        let delta_theta =
            (arcs.right - arcs.left) / (self.geometry.right_offset - self.geometry.left_offset);

        let dx_local = (arcs.left + arcs.right) / 2.0;
        // The back wheel conflates true lateral motion with the swing induced
        // by rotating about the center; subtract the induced part.
        let dy_local = arcs.back - delta_theta * self.geometry.back_offset;

        let heading_mid = self.pose.heading + delta_theta / 2.0;
        let (sin_mid, cos_mid) = (sin(heading_mid), cos(heading_mid));

        self.pose.x += cos_mid * dx_local - sin_mid * dy_local;
        self.pose.y += sin_mid * dx_local + cos_mid * dy_local;
        self.pose.heading = Pose::normalize_angle(self.pose.heading + delta_theta);

        self.distance_traveled += fabs(dx_local);
    }

    /// Returns the current pose.
    pub fn pose(&self) -> Pose {
        self.pose
    }

    /// Returns the tracking geometry.
    pub fn geometry(&self) -> TrackingGeometry {
        self.geometry
    }

    /// Total absolute forward travel integrated so far.
    ///
    /// Diagnostic instrumentation only; it is not part of the pose estimate.
    pub fn distance_traveled(&self) -> f64 {
        self.distance_traveled
    }

    /// Reset the tracker to a new pose, clearing the distance counter.
    pub fn reset(&mut self, pose: Pose) {
        self.pose = pose;
        self.distance_traveled = 0.0;
    }
}

impl fmt::Display for OdometryTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OdometryTracker at {}", self.pose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    const EPSILON: f64 = 1e-9;

    // Symmetric parallel wheels 11.0 apart, back wheel 3.0 behind the
    // center, 2.6 diameter wheels.
    fn geometry() -> TrackingGeometry {
        TrackingGeometry::new(2.6, -5.5, 5.5, -3.0).unwrap()
    }

    #[test]
    fn test_normalize_angle() {
        assert!((Pose::normalize_angle(0.0) - 0.0).abs() < EPSILON);
        assert!((Pose::normalize_angle(PI) - PI).abs() < EPSILON);
        assert!((Pose::normalize_angle(2.0 * PI) - 0.0).abs() < EPSILON);
        assert!((Pose::normalize_angle(-PI / 4.0) - 7.0 * PI / 4.0).abs() < EPSILON);
        // Deltas beyond a full turn must still land in range.
        assert!((Pose::normalize_angle(5.0 * PI) - PI).abs() < EPSILON);
        assert!((Pose::normalize_angle(-5.0 * PI) - PI).abs() < EPSILON);
        assert!((Pose::normalize_angle(9.0 * PI / 2.0) - PI / 2.0).abs() < EPSILON);
        let just_below = 2.0 * PI - 1e-12;
        assert!((Pose::normalize_angle(just_below) - just_below).abs() < EPSILON);
    }

    #[test]
    fn test_geometry_constructor() {
        let geometry = geometry();
        assert_eq!(geometry.wheel_diameter(), 2.6);
        assert_eq!(geometry.left_offset(), -5.5);
        assert_eq!(geometry.right_offset(), 5.5);
        assert_eq!(geometry.back_offset(), -3.0);
    }

    #[test]
    fn test_geometry_invalid_diameter() {
        let result = TrackingGeometry::new(0.0, -5.5, 5.5, -3.0);
        assert!(matches!(
            result,
            Err(OdometryError::InvalidWheelDiameter("must be positive"))
        ));
        let result_negative = TrackingGeometry::new(-2.6, -5.5, 5.5, -3.0);
        assert!(matches!(
            result_negative,
            Err(OdometryError::InvalidWheelDiameter("must be positive"))
        ));
    }

    #[test]
    fn test_geometry_degenerate_offsets() {
        // Equal offsets would divide the heading change by zero; reject
        // them before any cycle runs.
        let result = TrackingGeometry::new(2.6, 5.5, 5.5, -3.0);
        assert!(matches!(
            result,
            Err(OdometryError::DegenerateTrackOffsets(
                "left and right offsets must differ"
            ))
        ));
    }

    #[test]
    fn test_unit_round_trip() {
        // One full revolution (36000 centidegrees) rolls one circumference.
        let arc = geometry().arc_from_centidegrees(36000);
        assert!((arc - PI * 2.6).abs() < EPSILON);
        let arc_back = geometry().arc_from_centidegrees(-18000);
        assert!((arc_back - (-PI * 1.3)).abs() < EPSILON);
    }

    #[test]
    fn test_zero_motion_is_idempotent() {
        let mut tracker =
            OdometryTracker::from_pose(geometry(), Pose::new(1.0, 2.0, PI / 3.0));
        for _ in 0..100 {
            tracker.integrate(ArcLengths::new(0.0, 0.0, 0.0));
        }
        let pose = tracker.pose();
        assert!((pose.x - 1.0).abs() < EPSILON);
        assert!((pose.y - 2.0).abs() < EPSILON);
        assert!((pose.heading - PI / 3.0).abs() < EPSILON);
        assert!((tracker.distance_traveled() - 0.0).abs() < EPSILON);
    }

    #[test]
    fn test_straight_line() {
        // Equal parallel arcs, no back travel: dtheta = 0, pure forward
        // motion along the current heading.
        let mut tracker = OdometryTracker::new(geometry());
        tracker.integrate(ArcLengths::new(2.0, 2.0, 0.0));
        let pose = tracker.pose();
        assert!((pose.x - 2.0).abs() < EPSILON);
        assert!((pose.y - 0.0).abs() < EPSILON);
        assert!((pose.heading - 0.0).abs() < EPSILON);
    }

    #[test]
    fn test_straight_line_rotated_frame() {
        // Same arcs from a 90 degree heading move the pose along +y.
        let mut tracker =
            OdometryTracker::from_pose(geometry(), Pose::new(0.0, 0.0, PI / 2.0));
        tracker.integrate(ArcLengths::new(2.0, 2.0, 0.0));
        let pose = tracker.pose();
        assert!((pose.x - 0.0).abs() < EPSILON);
        assert!((pose.y - 2.0).abs() < EPSILON);
        assert!((pose.heading - PI / 2.0).abs() < EPSILON);
    }

    #[test]
    fn test_pure_rotation_cancels_back_swing() {
        // Spin in place: left = -right, and the back wheel reads exactly the
        // swing its offset induces, delta_theta * back_offset. The
        // correction must cancel it so the position does not drift.
        let geometry = geometry();
        let mut tracker = OdometryTracker::new(geometry);
        let (left, right) = (-1.1, 1.1);
        let delta_theta = (right - left) / (geometry.right_offset() - geometry.left_offset());
        let back = delta_theta * geometry.back_offset();
        tracker.integrate(ArcLengths::new(left, right, back));
        let pose = tracker.pose();
        assert!((pose.x - 0.0).abs() < EPSILON);
        assert!((pose.y - 0.0).abs() < EPSILON);
        assert!((pose.heading - delta_theta).abs() < EPSILON);
    }

    #[test]
    fn test_multi_turn_delta_stays_normalized() {
        // 2.5 turns in a single step: a bounded +-2*PI correction would
        // leave the heading outside range, modulo normalization must not.
        let geometry = geometry();
        let mut tracker = OdometryTracker::new(geometry);
        let delta_theta = 5.0 * PI;
        let half_span = delta_theta * 11.0 / 2.0;
        let back = delta_theta * geometry.back_offset();
        tracker.integrate(ArcLengths::new(-half_span, half_span, back));
        let pose = tracker.pose();
        assert!((pose.x - 0.0).abs() < EPSILON);
        assert!((pose.y - 0.0).abs() < EPSILON);
        assert!(pose.heading >= 0.0 && pose.heading < 2.0 * PI);
        assert!((pose.heading - PI).abs() < EPSILON);
    }

    #[test]
    fn test_lateral_slide() {
        // Only the back wheel moves: a pure sideways slide, rotated by the
        // current heading into the world frame.
        let mut tracker =
            OdometryTracker::from_pose(geometry(), Pose::new(0.0, 0.0, PI / 2.0));
        tracker.integrate(ArcLengths::new(0.0, 0.0, 0.5));
        let pose = tracker.pose();
        // Local (0, 0.5) rotated by PI/2 -> world (-0.5, 0).
        assert!((pose.x - (-0.5)).abs() < EPSILON);
        assert!((pose.y - 0.0).abs() < EPSILON);
        assert!((pose.heading - PI / 2.0).abs() < EPSILON);
    }

    #[test]
    fn test_arc_turn_uses_midpoint_heading() {
        let geometry = geometry();
        let mut tracker = OdometryTracker::new(geometry);
        let arcs = ArcLengths::new(1.0, 1.22, 0.0);
        // delta_theta = 0.22 / 11 = 0.02, midpoint heading = 0.01.
        let delta_theta = 0.02;
        let heading_mid = delta_theta / 2.0;
        let dx_local = 1.11;
        let dy_local = -delta_theta * geometry.back_offset();
        tracker.integrate(arcs);
        let pose = tracker.pose();
        let expected_x = heading_mid.cos() * dx_local - heading_mid.sin() * dy_local;
        let expected_y = heading_mid.sin() * dx_local + heading_mid.cos() * dy_local;
        assert!((pose.x - expected_x).abs() < EPSILON);
        assert!((pose.y - expected_y).abs() < EPSILON);
        assert!((pose.heading - delta_theta).abs() < EPSILON);
    }

    #[test]
    fn test_distance_counter_accumulates_magnitude() {
        let mut tracker = OdometryTracker::new(geometry());
        tracker.integrate(ArcLengths::new(1.0, 1.0, 0.0));
        tracker.integrate(ArcLengths::new(-1.0, -1.0, 0.0));
        // Forward then back: pose returns to the origin, the counter does not.
        let pose = tracker.pose();
        assert!((pose.x - 0.0).abs() < EPSILON);
        assert!((tracker.distance_traveled() - 2.0).abs() < EPSILON);

        tracker.reset(Pose::default());
        assert!((tracker.distance_traveled() - 0.0).abs() < EPSILON);
    }

    // End-to-end: raw centidegree deltas through the sampler into the
    // integrator, one tenth of a turn forward on both parallel wheels.
    #[test]
    fn test_end_to_end_straight_cycle() {
        struct FixedEncoder(i32);
        impl RotaryEncoder for FixedEncoder {
            type Error = ();
            fn position(&self) -> Result<i32, ()> {
                Ok(self.0)
            }
            fn reset_position(&mut self) -> Result<(), ()> {
                self.0 = 0;
                Ok(())
            }
        }

        let geometry = geometry();
        let mut sampler = WheelTravelSampler::new(
            geometry,
            FixedEncoder(3600),
            FixedEncoder(3600),
            FixedEncoder(0),
        );
        let mut tracker = OdometryTracker::new(geometry);

        let arcs = sampler.sample().unwrap();
        tracker.integrate(arcs);

        // arc(3600) = (3600 / 36000) * 2.6 * PI = 0.26 * PI
        let expected = 0.26 * PI;
        let pose = tracker.pose();
        assert!((pose.x - expected).abs() < EPSILON);
        assert!((pose.y - 0.0).abs() < EPSILON);
        assert!((pose.heading - 0.0).abs() < EPSILON);

        // The accumulators were reset: a second cycle with no rotation is a
        // no-op.
        let arcs = sampler.sample().unwrap();
        tracker.integrate(arcs);
        let pose = tracker.pose();
        assert!((pose.x - expected).abs() < EPSILON);
    }
}
