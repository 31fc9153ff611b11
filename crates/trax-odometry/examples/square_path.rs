use core::f64::consts::PI;

use trax_odometry::*;

fn main() {
    let wheel_diameter = 2.6;
    let left_offset = -5.5;
    let right_offset = 5.5;
    let back_offset = -3.0;

    let geometry_result =
        TrackingGeometry::new(wheel_diameter, left_offset, right_offset, back_offset);

    let geometry = match geometry_result {
        Ok(geometry) => geometry,
        Err(e) => {
            eprintln!("Failed to build tracking geometry: {:?}", e);
            eprintln!(
                "Please ensure the diameter ({}) is positive and the offsets ({}, {}) differ.",
                wheel_diameter, left_offset, right_offset
            );
            return;
        }
    };

    println!("Driving a square (side 10.0) from scripted arc lengths...");
    println!("  Geometry: {}", geometry);

    let mut tracker = OdometryTracker::new(geometry);
    let forward_steps = 10;
    let side_length = 10.0;
    let step = side_length / forward_steps as f64;

    // A quarter turn in place: the parallel wheels trace opposite arcs and
    // the back wheel reads its rotation-induced swing.
    let quarter = PI / 2.0;
    let span = geometry.right_offset() - geometry.left_offset();
    let pivot = ArcLengths::new(
        -quarter * span / 2.0,
        quarter * span / 2.0,
        quarter * geometry.back_offset(),
    );

    for side in 0..4 {
        for _ in 0..forward_steps {
            tracker.integrate(ArcLengths::new(step, step, 0.0));
        }
        tracker.integrate(pivot);
        println!("Side {}: Pose: {}", side + 1, tracker.pose());
    }

    println!("\nFinal Pose: {:?}", tracker.pose());
    println!("Distance traveled: {:.2}", tracker.distance_traveled());
}
