/// Basic usage example: feed readings, get crash verdicts
use crash_sensing::{
    AlertKind, AlertRequest, DangerResult, DetectionSession, GeoPoint, VehicleProfile,
};

fn main() {
    println!("=== Crash Sensing: Basic Example ===\n");

    let mut session = DetectionSession::new();
    session.set_vehicle_type(VehicleProfile::Car);

    // Simulated ride: cruising, a pothole, cruising, then a rollover.
    // (accel in g, gyro in deg/s)
    let readings = vec![
        // Cruising
        ([0.02, 0.01, 1.00], [1.0, 0.5, 2.0]),
        ([0.03, -0.01, 0.99], [0.8, 0.4, 1.5]),
        ([0.01, 0.02, 1.01], [1.1, 0.3, 2.2]),
        ([0.02, 0.00, 1.00], [0.9, 0.6, 1.8]),
        ([0.04, 0.01, 0.98], [1.2, 0.5, 2.1]),
        // Pothole: one sharp vertical jolt
        ([0.10, 0.05, 6.50], [4.0, 3.0, 2.0]),
        // Cruising
        ([0.02, 0.01, 1.00], [1.0, 0.5, 2.0]),
        ([0.03, 0.00, 0.99], [0.7, 0.4, 1.9]),
        // Rollover
        ([0.60, 0.00, 0.70], [0.0, 120.0, 10.0]),
        ([0.90, 0.00, 0.20], [0.0, 180.0, 20.0]),
        ([0.50, 0.00, -0.60], [0.0, 150.0, 15.0]),
        ([0.00, 0.00, -1.00], [0.0, 0.0, 0.0]),
    ];

    println!("Processing {} readings...\n", readings.len());

    let mut last = DangerResult::insufficient_data();
    for (i, (accel, gyro)) in readings.into_iter().enumerate() {
        if let Err(err) = session.add_reading(accel[0], accel[1], accel[2], gyro[0], gyro[1], gyro[2]) {
            println!("[{i:>2}] rejected: {err}");
            continue;
        }
        last = session.detect_with_history();
        print_verdict(i, &last);
    }

    println!("\n=== Summary ===");
    match AlertRequest::from_verdict(&last, AlertKind::UserConfirmation, GeoPoint::new(36.8065, 10.1815)) {
        Some(request) => {
            println!("Alert request for notification pipeline:");
            println!("  Danger: {}% ({})", request.danger_percentage, request.level());
            println!("  Map: {}", request.location().maps_link());
        }
        None => println!("No alert needed."),
    }
}

fn print_verdict(index: usize, verdict: &DangerResult) {
    let flag = if verdict.is_accident { "ACCIDENT" } else { "ok" };
    println!(
        "[{index:>2}] {flag:<8} {:>3}% {:?}: {}",
        verdict.danger_percentage, verdict.outcome, verdict.reason
    );
}
