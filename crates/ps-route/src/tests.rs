//! Unit tests for ps-route.

#[cfg(test)]
mod helpers {
    use ps_core::CrossingId;

    use crate::{BehaviorState, PrecomputedPathQueue, Waypoint};

    /// `[(0,0,1), (1,1,2)]` tagged MOVE, crossing 0 → 1.
    pub fn two_step() -> PrecomputedPathQueue {
        PrecomputedPathQueue::with_waypoints(
            [Waypoint::new(0.0, 0.0, 1), Waypoint::new(1.0, 1.0, 2)],
            BehaviorState::Move,
            CrossingId(0),
            CrossingId(1),
        )
    }
}

// ── Queue ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod queue {
    use ps_core::{CrossingId, Point2};
    use ps_grid::{GridGraph, PathFinder};

    use crate::{BehaviorState, PrecomputedPathQueue, Waypoint};

    #[test]
    fn remove_first_goes_two_one_zero() {
        let mut q = super::helpers::two_step();
        assert_eq!(q.len(), 2);
        assert_eq!(q.behavior(), BehaviorState::Move);

        q.remove_first();
        assert_eq!(q.len(), 1);
        assert_eq!(q.first(), Some(&Waypoint::new(1.0, 1.0, 2)));

        q.remove_first();
        assert_eq!(q.len(), 0);
        assert!(q.is_empty());
        assert_eq!(q.first(), None);
    }

    #[test]
    fn remove_first_on_empty_is_noop() {
        let mut q = PrecomputedPathQueue::new(BehaviorState::Wait, CrossingId(2), CrossingId(3));
        q.remove_first();
        assert!(q.is_empty());
        assert_eq!(q.entrance(), CrossingId(2));
        assert_eq!(q.exit(), CrossingId(3));
    }

    #[test]
    fn last_stays_until_consumed() {
        let mut q = super::helpers::two_step();
        q.push_back(Waypoint::new(2.0, 2.0, 3));
        assert_eq!(q.last().map(|w| w.id), Some(3));
        q.remove_first();
        q.remove_first();
        assert_eq!(q.first().map(|w| w.id), Some(3));
        assert_eq!(q.last().map(|w| w.id), Some(3));
        q.clear();
        assert!(q.last().is_none());
    }

    #[test]
    fn from_path_is_in_traversal_order() {
        let g = GridGraph::from_rows(vec![vec![true; 4]], 1.0).unwrap();
        let path = PathFinder::new()
            .find_path(&g, Point2::ORIGIN, Point2::new(3.0, 0.0))
            .unwrap();
        let q = PrecomputedPathQueue::from_path(path, BehaviorState::Move, CrossingId(0), CrossingId(1));

        let got: Vec<_> = q.iter().map(|w| (w.x, w.id)).collect();
        assert_eq!(got, vec![(1.0, 1), (2.0, 2), (3.0, 3)]);
        assert_eq!(q.last().map(Waypoint::position), Some(Point2::new(3.0, 0.0)));
    }
}

// ── Behaviour tag ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod behavior {
    use crate::{BehaviorState, RouteError};

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("MOVE".parse::<BehaviorState>().unwrap(), BehaviorState::Move);
        assert_eq!(" queue ".parse::<BehaviorState>().unwrap(), BehaviorState::Queue);
        assert_eq!("Exit".parse::<BehaviorState>().unwrap(), BehaviorState::Exit);
    }

    #[test]
    fn parse_rejects_unknown() {
        assert!(matches!("run".parse::<BehaviorState>(), Err(RouteError::Parse(_))));
    }

    #[test]
    fn display_matches_persisted_form() {
        for b in BehaviorState::ALL {
            assert_eq!(b.to_string().parse::<BehaviorState>().unwrap(), b);
        }
    }
}

// ── Library ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod library {
    use ps_core::CrossingId;

    use crate::{BehaviorState, PrecomputedPathQueue, RouteLibrary, Waypoint};

    #[test]
    fn lookup_by_crossing_pair() {
        let back = PrecomputedPathQueue::with_waypoints(
            [Waypoint::new(5.0, 5.0, 1)],
            BehaviorState::Move,
            CrossingId(1),
            CrossingId(0),
        );
        let lib: RouteLibrary = [super::helpers::two_step(), back].into_iter().collect();

        assert_eq!(lib.len(), 2);
        assert_eq!(lib.route(CrossingId(0), CrossingId(1)).map(|q| q.len()), Some(2));
        assert_eq!(lib.route(CrossingId(1), CrossingId(0)).map(|q| q.len()), Some(1));
        assert!(lib.route(CrossingId(0), CrossingId(2)).is_none());
        assert!(lib.routes(CrossingId(0), CrossingId(2)).is_empty());
    }

    #[test]
    fn first_inserted_wins() {
        let mut lib = RouteLibrary::new();
        lib.insert(super::helpers::two_step());
        let mut longer = super::helpers::two_step();
        longer.push_back(Waypoint::new(9.0, 9.0, 3));
        lib.insert(longer);

        assert_eq!(lib.routes(CrossingId(0), CrossingId(1)).len(), 2);
        assert_eq!(lib.route(CrossingId(0), CrossingId(1)).map(|q| q.len()), Some(2));
    }
}

// ── CSV persistence ───────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use std::io::Cursor;

    use ps_core::CrossingId;

    use crate::{
        load_paths_csv, load_paths_reader, save_paths_csv, save_paths_writer, BehaviorState,
        PrecomputedPathQueue, RouteError, Waypoint,
    };

    const CSV: &str = "\
path_id,entrance,exit,behavior,x,y,waypoint_id
1,1,0,wait,4.0,2.0,1
0,0,1,MOVE,0.0,0.0,1
0,0,1,MOVE,1.0,1.0,2
";

    #[test]
    fn groups_rows_by_path_id() {
        let paths = load_paths_reader(Cursor::new(CSV)).unwrap();
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0], super::helpers::two_step());
        assert_eq!(paths[1].behavior(), BehaviorState::Wait);
        assert_eq!(paths[1].entrance(), CrossingId(1));
        assert_eq!(paths[1].first(), Some(&Waypoint::new(4.0, 2.0, 1)));
    }

    #[test]
    fn rejects_bad_behavior() {
        let csv = "path_id,entrance,exit,behavior,x,y,waypoint_id\n0,0,1,FLY,0,0,1\n";
        assert!(matches!(load_paths_reader(Cursor::new(csv)), Err(RouteError::Parse(_))));
    }

    #[test]
    fn rejects_inconsistent_rows() {
        let csv = "\
path_id,entrance,exit,behavior,x,y,waypoint_id
0,0,1,MOVE,0,0,1
0,0,2,MOVE,1,1,2
";
        assert!(matches!(load_paths_reader(Cursor::new(csv)), Err(RouteError::Parse(_))));
    }

    #[test]
    fn rejects_missing_columns() {
        let csv = "path_id,entrance\n0,0\n";
        assert!(load_paths_reader(Cursor::new(csv)).is_err());
    }

    #[test]
    fn save_skips_empty_queues() {
        let empty = PrecomputedPathQueue::new(BehaviorState::Move, CrossingId(3), CrossingId(4));
        let paths = [empty, super::helpers::two_step()];
        let mut buf = Vec::new();
        save_paths_writer(&mut buf, &paths).unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "path_id,entrance,exit,behavior,x,y,waypoint_id\n0,0,1,MOVE,0.0,0.0,1\n0,0,1,MOVE,1.0,1.0,2\n"
        );
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("paths.csv");
        let original = load_paths_reader(Cursor::new(CSV)).unwrap();

        save_paths_csv(&file, &original).unwrap();
        let reloaded = load_paths_csv(&file).unwrap();
        assert_eq!(reloaded, original);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_paths_csv(&dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, RouteError::Io(_)));
    }
}
