//! Unit tests for ps-core primitives.

#[cfg(test)]
mod ids {
    use crate::{AgentId, CrossingId, NodeId};

    #[test]
    fn index_roundtrip() {
        let id = NodeId::from_index(42);
        assert_eq!(id, NodeId(42));
        assert_eq!(id.index(), 42);
    }

    #[test]
    fn oversized_index_is_invalid() {
        assert_eq!(NodeId::from_index(u32::MAX as usize), NodeId::INVALID);
        assert!(!NodeId::from_index(usize::MAX).is_valid());
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(AgentId::INVALID.0, u32::MAX);
        assert_eq!(NodeId::INVALID.0, u32::MAX);
        assert!(!CrossingId::default().is_valid());
        assert!(CrossingId(0).is_valid());
    }

    #[test]
    fn display() {
        assert_eq!(CrossingId(3).to_string(), "crossing#3");
        assert_eq!(AgentId::INVALID.to_string(), "agent#none");
    }
}

#[cfg(test)]
mod geo {
    use crate::Point2;

    #[test]
    fn distance_is_euclidean() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(3.0, 4.0);
        assert_eq!(a.distance(b), 5.0);
        assert_eq!(b.distance(a), 5.0);
    }

    #[test]
    fn normalized_zero_stays_zero() {
        assert_eq!(Point2::ORIGIN.normalized(), Point2::ORIGIN);
        let n = Point2::new(0.0, 2.0).normalized();
        assert_eq!(n, Point2::new(0.0, 1.0));
    }

    #[test]
    fn arithmetic() {
        let p = Point2::new(1.0, 2.0) + Point2::new(0.5, 0.5) * 2.0;
        assert_eq!(p, Point2::new(2.0, 3.0));
        assert_eq!(p - Point2::new(2.0, 3.0), Point2::ORIGIN);
    }
}

#[cfg(test)]
mod time {
    use std::sync::Arc;
    use std::time::Duration;

    use crate::{Tick, TickCounter, TickLength, TimeUnit};

    #[test]
    fn tick_arithmetic() {
        let t = Tick(10);
        assert_eq!(t + 5, Tick(15));
        assert_eq!(t.next(), Tick(11));
    }

    #[test]
    fn tick_length_units() {
        assert_eq!(TickLength::new(250, TimeUnit::Microseconds).as_duration(), Duration::from_micros(250));
        assert_eq!(TickLength::new(2, TimeUnit::Seconds).as_duration(), Duration::from_secs(2));
        assert_eq!(TickLength::new(1, TimeUnit::Minutes).as_duration(), Duration::from_secs(60));
        assert_eq!(TickLength::millis(100).as_secs_f32(), 0.1);
    }

    #[test]
    fn counter_is_monotonic_across_threads() {
        let counter = Arc::new(TickCounter::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let c = Arc::clone(&counter);
                std::thread::spawn(move || {
                    for _ in 0..250 {
                        c.increment();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(counter.get(), Tick(1000));
    }
}

#[cfg(test)]
mod rng {
    use crate::SimRng;

    #[test]
    fn deterministic_same_seed() {
        let mut r1 = SimRng::new(12345);
        let mut r2 = SimRng::new(12345);
        for _ in 0..100 {
            assert_eq!(r1.gen_bool(0.5), r2.gen_bool(0.5));
            assert_eq!(r1.choose(&[1, 2, 3, 4, 5]), r2.choose(&[1, 2, 3, 4, 5]));
        }
    }

    #[test]
    fn gen_bool_extremes() {
        let mut rng = SimRng::new(0);
        assert!(!rng.gen_bool(0.0));
        assert!(rng.gen_bool(1.0));
        assert!(rng.gen_bool(7.0), "probability is clamped to 1");
    }

    #[test]
    fn choose_empty_is_none() {
        let mut rng = SimRng::new(0);
        let empty: [u8; 0] = [];
        assert!(rng.choose(&empty).is_none());
        assert_eq!(rng.choose(&[9]), Some(&9));
    }
}

#[cfg(test)]
mod config {
    use crate::{AgentKind, CoreError, CrossingId, SimConfig, TimeUnit};

    const SAMPLE: &str = r#"
seed       = 7
max_agents = 20

[tick_length]
value = 2
unit  = "seconds"

[[departures]]
entrance    = 1
kind        = "vehicle"
probability = 0.5
"#;

    #[test]
    fn parses_toml_with_defaults() {
        let cfg = SimConfig::from_toml_str(SAMPLE).unwrap();
        assert_eq!(cfg.seed, 7);
        assert_eq!(cfg.max_agents, 20);
        assert_eq!(cfg.tick_length.unit, TimeUnit::Seconds);
        assert_eq!(cfg.pedestrian_speed, SimConfig::default().pedestrian_speed);
        assert_eq!(cfg.departures.len(), 1);
        assert_eq!(cfg.departures[0].entrance, CrossingId(1));
        assert_eq!(cfg.departures[0].kind, AgentKind::Vehicle);
    }

    #[test]
    fn rejects_zero_tick_length() {
        let err = SimConfig::from_toml_str("[tick_length]\nvalue = 0\n").unwrap_err();
        assert!(matches!(err, CoreError::Config(_)));
    }

    #[test]
    fn rejects_bad_probability() {
        let text = "[[departures]]\nentrance = 0\nprobability = 1.5\n";
        assert!(matches!(SimConfig::from_toml_str(text), Err(CoreError::Config(_))));
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(matches!(SimConfig::from_toml_str("seed = ["), Err(CoreError::Parse(_))));
    }

    #[test]
    fn speed_of_kind() {
        let cfg = SimConfig::default();
        assert_eq!(cfg.speed_of(AgentKind::Vehicle), cfg.vehicle_speed);
        assert_eq!(cfg.speed_of(AgentKind::Pedestrian), cfg.pedestrian_speed);
    }
}
