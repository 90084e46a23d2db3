/// Stress testing for the detection session.
///
/// Long, noisy and pathological streams that would expose window growth,
/// out-of-range scores or state leaking across profile switches.

#[cfg(test)]
mod stress_tests {
    use crate::clock::SteppedClock;
    use crate::config::DetectorConfig;
    use crate::session::DetectionSession;
    use crate::types::*;

    fn new_session(profile: VehicleProfile, rate_hz: u32) -> DetectionSession<SteppedClock> {
        let mut session =
            DetectionSession::with_clock(DetectorConfig::default(), SteppedClock::at_rate(rate_hz))
                .unwrap();
        session.set_vehicle_type(profile);
        session
    }

    /// Deterministic pseudo-random generator (xorshift) for repeatable noise.
    struct Noise(u64);

    impl Noise {
        fn next(&mut self) -> f64 {
            self.0 ^= self.0 << 13;
            self.0 ^= self.0 >> 7;
            self.0 ^= self.0 << 17;
            (self.0 >> 11) as f64 / (1u64 << 53) as f64
        }

        /// Uniform in [-scale, scale].
        fn spread(&mut self, scale: f64) -> f64 {
            (self.next() * 2.0 - 1.0) * scale
        }
    }

    // ============================================================================
    // CATEGORY 1: EXTREME DURATION
    // ============================================================================

    /// One hour of 50Hz cruising: the window must stay bounded and quiet.
    #[test]
    fn stress_one_hour_cruising_50hz() {
        let mut session = new_session(VehicleProfile::Car, 50);
        let mut noise = Noise(0x9E37_79B9_7F4A_7C15);

        for _ in 0..180_000 {
            session
                .add_reading(
                    noise.spread(0.1),
                    noise.spread(0.1),
                    1.0 + noise.spread(0.08),
                    noise.spread(5.0),
                    noise.spread(5.0),
                    noise.spread(20.0),
                )
                .unwrap();
            assert!(session.len() <= 10);
        }

        let verdict = session.detect_with_history();
        assert!(!verdict.is_accident);
        assert_eq!(session.readings().last().map(|r| r.timestamp_ms), Some(179_999 * 20));
    }

    /// Polling after every reading of a long noisy stream never leaves [0, 100].
    #[test]
    fn stress_random_stream_scores_bounded() {
        for profile in [VehicleProfile::Car, VehicleProfile::Scooter] {
            let mut session = new_session(profile, 100);
            let mut noise = Noise(42);

            for _ in 0..20_000 {
                session
                    .add_reading(
                        noise.spread(12.0),
                        noise.spread(12.0),
                        noise.spread(12.0),
                        noise.spread(800.0),
                        noise.spread(800.0),
                        noise.spread(800.0),
                    )
                    .unwrap();

                let verdict = session.detect_with_history();
                assert!(verdict.danger_percentage <= 100);
                if verdict.outcome == Outcome::NoiseFiltered {
                    assert!(!verdict.is_accident);
                }
                if verdict.outcome == Outcome::Confirmed {
                    assert!(verdict.reason.ends_with(CONFIRMED_SUFFIX));
                }
            }
        }
    }

    // ============================================================================
    // CATEGORY 2: PATHOLOGICAL INPUT
    // ============================================================================

    /// Flood of non-finite readings between good ones: none may enter the window.
    #[test]
    fn stress_non_finite_flood() {
        let mut session = new_session(VehicleProfile::Scooter, 50);
        let bad = [f64::NAN, f64::INFINITY, f64::NEG_INFINITY];

        for i in 0..3_000 {
            if i % 4 == 0 {
                session.add_reading(0.0, 0.0, 1.0, 0.0, 0.0, 0.0).unwrap();
            } else {
                let value = bad[i % bad.len()];
                let channel = i % 6;
                let mut reading = [0.0, 0.0, 1.0, 0.0, 0.0, 0.0];
                reading[channel] = value;
                assert!(session
                    .add_reading(reading[0], reading[1], reading[2], reading[3], reading[4], reading[5])
                    .is_err());
            }
        }

        assert_eq!(session.len(), 10);
        assert!(session
            .readings()
            .all(|r| r.channels().iter().all(|v| v.is_finite())));
        assert_eq!(session.detect_with_history().reason, NORMAL_OPERATION);
    }

    /// Unvalidated samples pushed directly still produce bounded verdicts.
    #[test]
    fn stress_unvalidated_nan_samples_do_not_panic() {
        let mut session = new_session(VehicleProfile::Car, 50);
        for i in 0..20 {
            session.push_sample(Sample::new(
                i,
                [f64::NAN, f64::INFINITY, f64::NAN],
                [f64::NEG_INFINITY, 0.0, f64::NAN],
            ));
            assert!(session.detect_with_history().danger_percentage <= 100);
        }
    }

    /// Saturated sensors pinned at full scale.
    #[test]
    fn stress_saturated_sensors() {
        for profile in [VehicleProfile::Car, VehicleProfile::Scooter] {
            let mut session = new_session(profile, 50);
            for _ in 0..50 {
                session
                    .add_reading(16.0, -16.0, 16.0, 2000.0, -2000.0, 2000.0)
                    .unwrap();
            }
            let verdict = session.detect_with_history();
            assert!(verdict.is_accident);
            assert_eq!(verdict.danger_percentage, 100);
        }
    }

    // ============================================================================
    // CATEGORY 3: STATE CHURN
    // ============================================================================

    /// Rapid profile flipping must never carry readings across.
    #[test]
    fn stress_profile_flip_every_few_readings() {
        let mut session = new_session(VehicleProfile::Car, 50);
        let profiles = [VehicleProfile::Car, VehicleProfile::Scooter];

        for round in 0..2_000 {
            session.set_vehicle_type(profiles[round % 2]);
            for _ in 0..(round % 5) {
                session.add_reading(0.0, 0.0, -1.0, 0.0, 0.0, 0.0).unwrap();
            }
            // At most four readings per round: never enough to judge.
            let verdict = session.detect_with_history();
            assert_eq!(verdict.outcome, Outcome::InsufficientData);
            assert!(!verdict.is_accident);
        }
    }

    /// Periodic crash bursts: every sustained burst is confirmed, every
    /// isolated spike is filtered.
    #[test]
    fn stress_periodic_bursts_and_spikes() {
        let mut session = new_session(VehicleProfile::Car, 50);
        let mut confirmed = 0;
        let mut filtered = 0;

        for i in 0..10_000usize {
            let phase = i % 100;
            let reading = match phase {
                // Sustained three-reading side impact
                40..=42 => [3.5, 0.0, 1.0, 0.0, 0.0, 0.0],
                // Isolated vertical spike
                80 => [0.0, 0.0, 7.0, 0.0, 0.0, 0.0],
                _ => [0.0, 0.0, 1.0, 0.0, 0.0, 0.0],
            };
            session
                .add_reading(reading[0], reading[1], reading[2], reading[3], reading[4], reading[5])
                .unwrap();

            match session.detect_with_history().outcome {
                Outcome::Confirmed => confirmed += 1,
                Outcome::NoiseFiltered => filtered += 1,
                _ => {}
            }
        }

        // Per 100 readings: the burst's first reading is filtered, the next
        // two confirmed; the lone spike is filtered.
        assert_eq!(confirmed, 200);
        assert_eq!(filtered, 200);
    }

    /// Many independent sessions, one per simulated device.
    #[test]
    fn stress_many_sessions() {
        let mut sessions: Vec<_> = (0..500)
            .map(|i| {
                let profile = if i % 2 == 0 {
                    VehicleProfile::Car
                } else {
                    VehicleProfile::Scooter
                };
                new_session(profile, 50)
            })
            .collect();

        for step in 0..30 {
            for (i, session) in sessions.iter_mut().enumerate() {
                // Only every tenth device crashes, from step 20 onwards.
                let crashed = i % 10 == 0 && step >= 20;
                let z = if crashed { -1.0 } else { 1.0 };
                session.add_reading(0.0, 0.0, z, 0.0, 0.0, 0.0).unwrap();
            }
        }

        let accidents = sessions
            .iter()
            .filter(|s| s.detect_with_history().is_accident)
            .count();
        assert_eq!(accidents, 50);
    }
}
