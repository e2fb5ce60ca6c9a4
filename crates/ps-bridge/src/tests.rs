//! Unit tests for ps-bridge.
//!
//! Engines are built on the same 1×10 corridor the ps-engine tests use:
//! crossing 0 at the west end, crossing 1 at the east end, one-second ticks,
//! 1 unit/s pedestrians.

#[cfg(test)]
mod helpers {
    use ps_core::{AgentKind, CrossingId, DepartureConfig, Point2, SimConfig, TickLength, TimeUnit};
    use ps_engine::{EngineBuilder, Environment, HeadlessEngine, MotionModel};
    use ps_grid::OccupancyGrid;

    pub fn config(probability: f64, max_agents: usize) -> SimConfig {
        SimConfig {
            seed:             11,
            tick_length:      TickLength::new(1, TimeUnit::Seconds),
            max_agents,
            arrival_radius:   0.1,
            pedestrian_speed: 1.0,
            vehicle_speed:    2.0,
            departures:       vec![DepartureConfig {
                entrance:    CrossingId(0),
                kind:        AgentKind::Pedestrian,
                probability,
            }],
        }
    }

    pub fn environment(map: &str) -> Environment {
        let grid = OccupancyGrid::parse_ascii(map, 1.0).unwrap();
        let east = (grid.cols() - 1) as f32;
        Environment::new(
            &grid,
            [(CrossingId(0), Point2::new(0.0, 0.0)), (CrossingId(1), Point2::new(east, 0.0))],
        )
        .unwrap()
    }

    pub fn engine(probability: f64, max_agents: usize) -> HeadlessEngine {
        EngineBuilder::new(config(probability, max_agents), environment(".........."))
            .headless()
            .unwrap()
    }

    pub fn engine_with<M: MotionModel>(motion: M) -> HeadlessEngine<M> {
        EngineBuilder::new(config(1.0, 1), environment(".........."))
            .motion(motion)
            .headless()
            .unwrap()
    }
}

// ── TickSynchronizer ──────────────────────────────────────────────────────────

#[cfg(test)]
mod sync {
    use std::sync::Arc;
    use std::thread;
    use std::time::{Duration, Instant};

    use ps_core::{Tick, TickLength, TimeUnit};

    use crate::{AdvanceOutcome, Phase, TickEvent, TickEventKind, TickSynchronizer};

    fn unrepresentable_timeout() -> Duration {
        TickLength::new(u64::MAX, TimeUnit::Seconds).as_duration()
    }

    #[test]
    fn stalled_worker_times_out_within_bound() {
        let sync = TickSynchronizer::new();
        let timeout = Duration::from_millis(50);

        let started = Instant::now();
        let outcome = sync.advance(timeout);
        let elapsed = started.elapsed();

        assert_eq!(outcome, AdvanceOutcome::TimedOut);
        assert!(elapsed >= timeout);
        assert!(elapsed < timeout + Duration::from_millis(500), "took {elapsed:?}");
        assert_eq!(sync.phase(), Phase::Idle);
    }

    #[test]
    fn unserved_request_is_coalesced() {
        let sync = TickSynchronizer::new();
        assert_eq!(sync.advance(Duration::from_millis(5)), AdvanceOutcome::TimedOut);
        assert_eq!(sync.advance(Duration::from_millis(5)), AdvanceOutcome::TimedOut);
        assert_eq!(sync.pending_requests(), 1);
    }

    #[test]
    fn served_request_completes() {
        let sync = Arc::new(TickSynchronizer::new());
        let worker = {
            let sync = Arc::clone(&sync);
            thread::spawn(move || {
                let request = sync.wait_for_request();
                sync.complete(Tick(1));
                request
            })
        };

        let outcome = sync.advance(Duration::from_secs(5));
        assert_eq!(
            outcome,
            AdvanceOutcome::Completed(TickEvent { kind: TickEventKind::StepCompleted, tick: Tick(1) })
        );
        assert_eq!(worker.join().unwrap(), Some(1));
        assert_eq!(sync.phase(), Phase::Idle);
        assert_eq!(sync.pending_requests(), 0);
    }

    #[test]
    fn late_completion_does_not_satisfy_next_request() {
        let sync = TickSynchronizer::new();
        assert_eq!(sync.advance(Duration::from_millis(5)), AdvanceOutcome::TimedOut);

        // The stalled step finishes after the driver gave up on it.
        assert_eq!(sync.wait_for_request(), Some(1));
        sync.complete(Tick(1));

        assert_eq!(sync.advance(Duration::from_millis(5)), AdvanceOutcome::TimedOut);
        assert_eq!(sync.pending_requests(), 1);
    }

    #[test]
    fn disconnect_unblocks_waiting_driver() {
        let sync = Arc::new(TickSynchronizer::new());
        let driver = {
            let sync = Arc::clone(&sync);
            thread::spawn(move || {
                let started = Instant::now();
                (sync.advance(Duration::from_secs(10)), started.elapsed())
            })
        };

        thread::sleep(Duration::from_millis(50));
        sync.disconnect();
        let (outcome, elapsed) = driver.join().unwrap();

        assert_eq!(outcome, AdvanceOutcome::Disconnected);
        assert!(elapsed < Duration::from_secs(5));
        assert_eq!(sync.phase(), Phase::Idle);
    }

    #[test]
    fn huge_timeout_waits_for_completion() {
        let sync = Arc::new(TickSynchronizer::new());
        let worker = {
            let sync = Arc::clone(&sync);
            thread::spawn(move || {
                sync.wait_for_request();
                sync.complete(Tick(1));
            })
        };

        assert!(sync.advance(unrepresentable_timeout()).is_completed());
        worker.join().unwrap();
        assert_eq!(sync.phase(), Phase::Idle);
    }

    #[test]
    fn huge_timeout_still_unblocked_by_disconnect() {
        let sync = Arc::new(TickSynchronizer::new());
        let driver = {
            let sync = Arc::clone(&sync);
            thread::spawn(move || sync.advance(unrepresentable_timeout()))
        };

        thread::sleep(Duration::from_millis(50));
        sync.disconnect();
        assert_eq!(driver.join().unwrap(), AdvanceOutcome::Disconnected);
    }

    #[test]
    fn disconnect_stops_worker_and_later_advances() {
        let sync = TickSynchronizer::new();
        sync.disconnect();
        sync.disconnect();

        assert!(sync.is_shut_down());
        assert_eq!(sync.wait_for_request(), None);
        assert_eq!(sync.advance(Duration::from_secs(1)), AdvanceOutcome::Disconnected);
    }
}

// ── Bridge stepping ───────────────────────────────────────────────────────────

#[cfg(test)]
mod stepping {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;
    use std::time::{Duration, Instant};

    use ps_core::{AgentKind, Point2, Tick};
    use ps_engine::{Agent, MotionModel, SimulationEngine, WaypointFollower};

    use super::helpers::{engine, engine_with};
    use crate::{AdvanceOutcome, Bridge, Phase};

    struct Broken;

    impl MotionModel for Broken {
        fn desired_velocity(&self, _agent: &Agent, _speed: f32, _dt: f32) -> Point2 {
            Point2::new(f32::NAN, 0.0)
        }
    }

    struct Panicking;

    impl MotionModel for Panicking {
        fn desired_velocity(&self, _agent: &Agent, _speed: f32, _dt: f32) -> Point2 {
            panic!("motion model exploded");
        }
    }

    struct Sluggish;

    impl MotionModel for Sluggish {
        fn desired_velocity(&self, _agent: &Agent, _speed: f32, _dt: f32) -> Point2 {
            thread::sleep(Duration::from_millis(300));
            Point2::ORIGIN
        }
    }

    /// Follows waypoints, but raises `entered` and then stalls mid-step.
    struct StallingFollower {
        entered: Arc<AtomicBool>,
    }

    impl MotionModel for StallingFollower {
        fn desired_velocity(&self, agent: &Agent, speed: f32, dt: f32) -> Point2 {
            self.entered.store(true, Ordering::Release);
            thread::sleep(Duration::from_millis(200));
            WaypointFollower.desired_velocity(agent, speed, dt)
        }
    }

    #[test]
    fn reads_wait_for_the_step_in_progress() {
        let entered = Arc::new(AtomicBool::new(false));
        let model = StallingFollower { entered: Arc::clone(&entered) };
        let mut bridge = Bridge::headless(engine_with(model))
            .unwrap()
            .with_timeout(Duration::from_millis(10));

        assert_eq!(bridge.advance(), AdvanceOutcome::TimedOut);
        while !entered.load(Ordering::Acquire) {
            thread::sleep(Duration::from_millis(1));
        }

        // The worker is inside the step: this read blocks until it ends and
        // then sees the finished tick, never the agent spawned but unmoved.
        let started = Instant::now();
        let (tick, positions) = bridge.with_engine(|e| {
            let positions: Vec<Point2> = e
                .list_agents(AgentKind::Pedestrian)
                .iter()
                .map(|a| a.position)
                .collect();
            (e.current_tick(), positions)
        });
        assert!(started.elapsed() >= Duration::from_millis(100), "read did not block");
        assert_eq!(tick, Tick(1));
        assert_eq!(positions, vec![Point2::new(1.0, 0.0)]);

        let published = bridge.publish();
        assert_eq!(published.agents.len(), 1);
        assert_eq!(published.agents[0].position, Point2::new(1.0, 0.0));
        bridge.shutdown().unwrap();
    }

    #[test]
    fn headless_worker_completes_each_advance() {
        let bridge = Bridge::headless(engine(0.5, 4)).unwrap();
        assert_eq!(bridge.timeout(), Duration::from_secs(1));

        for n in 1..=5 {
            match bridge.advance() {
                AdvanceOutcome::Completed(event) => assert_eq!(event.tick, Tick(n)),
                other => panic!("step {n}: {other:?}"),
            }
        }
        assert_eq!(bridge.tick_count(), Tick(5));
        assert_eq!(bridge.with_engine(|e| e.current_tick()), Tick(5));
        assert_eq!(bridge.phase(), Phase::Idle);
        bridge.shutdown().unwrap();
    }

    #[test]
    fn interactive_steps_inline() {
        let bridge = Bridge::interactive(engine(1.0, 1));
        assert!(bridge.advance().is_completed());
        assert!(bridge.advance().is_completed());
        assert_eq!(bridge.tick_count(), Tick(2));

        bridge.disconnect();
        assert_eq!(bridge.advance(), AdvanceOutcome::Disconnected);
        assert_eq!(bridge.tick_count(), Tick(2));
    }

    #[test]
    fn failed_step_is_counted() {
        let bridge = Bridge::headless(engine_with(Broken)).unwrap();
        for _ in 0..3 {
            assert!(bridge.advance().is_completed());
        }
        assert_eq!(bridge.tick_count(), Tick(3));
        bridge.shutdown().unwrap();
    }

    #[test]
    fn panicking_step_is_contained() {
        let mut bridge = Bridge::headless(engine_with(Panicking)).unwrap();
        assert!(bridge.advance().is_completed());
        assert!(bridge.advance().is_completed());
        assert_eq!(bridge.tick_count(), Tick(2));

        // The engine lock is still usable after the panic.
        let published = bridge.publish();
        assert_eq!(published.tick, Tick(2));
        assert_eq!(bridge.with_engine(|e| e.list_agents(AgentKind::Pedestrian).len()), 1);
        bridge.shutdown().unwrap();
    }

    #[test]
    fn slow_step_times_out_without_error() {
        let timeout = Duration::from_millis(30);
        let bridge = Bridge::headless(engine_with(Sluggish)).unwrap().with_timeout(timeout);

        let started = Instant::now();
        assert_eq!(bridge.advance(), AdvanceOutcome::TimedOut);
        assert!(started.elapsed() < timeout + Duration::from_millis(250));
        assert_eq!(bridge.phase(), Phase::Idle);

        bridge.disconnect();
        assert_eq!(bridge.advance(), AdvanceOutcome::Disconnected);
    }
}

// ── Ownership ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod ownership {
    use ps_core::{AgentKind, CrossingId, Point2};
    use ps_engine::{Activity, EngineBuilder, Environment, ExternalAgent, SimulationEngine};
    use ps_grid::OccupancyGrid;

    use super::helpers::{config, engine, environment};
    use crate::{Bridge, BridgeError};

    /// Two corridors separated by a wall.
    const SPLIT: &str = "..........\n##########\n..........\n";

    const WALKER: &str = "pedestrian-0";

    #[test]
    fn release_then_take_assigns_new_exit() {
        let mut bridge = Bridge::interactive(engine(1.0, 1));
        assert!(bridge.advance().is_completed());
        assert_eq!(bridge.publish().agents.len(), 1);

        let released = bridge.release_ownership(WALKER).unwrap();
        assert_eq!(released.exit, CrossingId(1));
        assert!(bridge.publish().agents.is_empty());

        let moved = ExternalAgent { position: Point2::new(5.0, 0.0), ..released };
        assert_eq!(bridge.take_ownership(&moved).unwrap(), Some(CrossingId(0)));

        let agents = bridge.publish().agents;
        assert_eq!(agents.len(), 1);
        assert_eq!(agents[0].identifier, WALKER);
        assert_eq!(agents[0].exit, CrossingId(0));
        assert_eq!(agents[0].position, Point2::new(5.0, 0.0));

        bridge.with_engine(|e| {
            let agent = e.agent_by_identifier(WALKER).unwrap();
            assert_eq!(agent.activity, Activity::Active);
            assert_eq!(agent.target(), Some(Point2::new(4.0, 0.0)));
        });
    }

    #[test]
    fn transfers_are_idempotent() {
        let bridge = Bridge::interactive(engine(1.0, 1));
        assert!(bridge.advance().is_completed());

        let first = bridge.release_ownership(WALKER).unwrap();
        let second = bridge.release_ownership(WALKER).unwrap();
        assert_eq!(first, second);

        assert!(bridge.take_ownership(&first).unwrap().is_some());
        assert_eq!(bridge.take_ownership(&first).unwrap(), None);
    }

    #[test]
    fn unreachable_take_back_restores_agent() {
        let split = EngineBuilder::new(config(1.0, 1), environment(SPLIT)).headless().unwrap();
        let mut bridge = Bridge::interactive(split);
        assert!(bridge.advance().is_completed());

        let released = bridge.release_ownership(WALKER).unwrap();
        let stranded = ExternalAgent { position: Point2::new(5.0, 2.0), ..released.clone() };
        assert!(matches!(
            bridge.take_ownership(&stranded),
            Err(BridgeError::Unreachable(id)) if id == WALKER
        ));

        bridge.with_engine(|e| {
            let agent = e.agent_by_identifier(WALKER).unwrap();
            assert_eq!(agent.activity, Activity::NotActive);
            assert_eq!(agent.position, released.position);
            assert_eq!(agent.exit, CrossingId(1));
        });
        assert!(bridge.publish().agents.is_empty());

        // Reported back on the connected side, the hand-back succeeds.
        let returned = ExternalAgent { position: Point2::new(5.0, 0.0), ..released };
        assert_eq!(bridge.take_ownership(&returned).unwrap(), Some(CrossingId(0)));
        assert_eq!(bridge.publish().agents.len(), 1);
    }

    #[test]
    fn unreachable_exit_falls_back_to_reachable_one() {
        let grid = OccupancyGrid::parse_ascii(SPLIT, 1.0).unwrap();
        let env = Environment::new(
            &grid,
            [
                (CrossingId(0), Point2::new(0.0, 0.0)),
                (CrossingId(1), Point2::new(9.0, 0.0)),
                (CrossingId(2), Point2::new(9.0, 2.0)),
            ],
        )
        .unwrap();
        let engine = EngineBuilder::new(config(0.0, 1), env).headless().unwrap();
        let bridge = Bridge::interactive(engine);

        let report = ExternalAgent::new("car-7", AgentKind::Vehicle, Point2::new(5.0, 2.0));
        bridge.add_or_update_external_agent(report.clone());
        assert!(bridge.advance().is_completed());

        // Only crossing 2 shares the lower corridor; the second hand-back
        // excludes it when drawing and must come back to it.
        for _ in 0..2 {
            assert_eq!(bridge.take_ownership(&report).unwrap(), Some(CrossingId(2)));
            assert!(bridge.release_ownership("car-7").is_some());
        }
    }

    #[test]
    fn unknown_identifiers_are_ignored() {
        let bridge = Bridge::interactive(engine(0.0, 1));
        assert_eq!(bridge.release_ownership("ghost"), None);

        let ghost = ExternalAgent::new("ghost", AgentKind::Vehicle, Point2::ORIGIN);
        assert_eq!(bridge.take_ownership(&ghost).unwrap(), None);
        assert!(!bridge.delete_agent("ghost"));
    }

    #[test]
    fn external_agent_stays_out_of_publication_until_taken() {
        let mut bridge = Bridge::interactive(engine(0.0, 1));
        bridge.add_or_update_external_agent(ExternalAgent::new(
            "car-7",
            AgentKind::Vehicle,
            Point2::new(3.0, 0.0),
        ));
        assert!(bridge.advance().is_completed());
        assert!(bridge.publish().agents.is_empty());

        let report = ExternalAgent::new("car-7", AgentKind::Vehicle, Point2::new(3.0, 0.0));
        let exit = bridge.take_ownership(&report).unwrap().unwrap();
        assert!(exit == CrossingId(0) || exit == CrossingId(1));

        let agents = bridge.publish().agents;
        assert_eq!(agents.len(), 1);
        assert_eq!(agents[0].kind, AgentKind::Vehicle);
        assert!(bridge.delete_agent("car-7"));
    }
}

// ── Publication ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod publication {
    use ps_core::{ObstacleId, Point2};
    use ps_engine::{EngineBuilder, StaticObstacle};

    use super::helpers::{config, environment};
    use crate::{Bridge, PublicationLedger};

    #[test]
    fn obstacles_published_once() {
        let env = environment(".....\n.##..\n.....\n");
        let engine = EngineBuilder::new(config(0.0, 1), env).headless().unwrap();
        let mut bridge = Bridge::interactive(engine);

        let first = bridge.publish();
        assert_eq!(first.obstacles.len(), 1);
        assert_eq!(first.obstacles[0].min, Point2::new(1.0, 1.0));
        assert_eq!(first.obstacles[0].max, Point2::new(3.0, 2.0));

        assert!(bridge.advance().is_completed());
        assert!(bridge.publish().obstacles.is_empty());
    }

    #[test]
    fn ledger_tracks_ids() {
        let obstacle = |id| StaticObstacle {
            id:  ObstacleId(id),
            min: Point2::ORIGIN,
            max: Point2::new(1.0, 1.0),
        };
        let mut ledger = PublicationLedger::new();
        assert_eq!(ledger.unpublished(&[obstacle(0)]).len(), 1);
        assert_eq!(ledger.unpublished(&[obstacle(0), obstacle(1)]), vec![obstacle(1)]);
        assert_eq!(ledger.published_count(), 2);
    }
}
