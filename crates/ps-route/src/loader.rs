//! CSV persistence for precomputed paths.
//!
//! # CSV format
//!
//! One row per waypoint.  Rows of one path share `path_id`, `entrance`,
//! `exit` and `behavior`, and appear in traversal order.
//!
//! ```csv
//! path_id,entrance,exit,behavior,x,y,waypoint_id
//! 0,0,1,MOVE,0.0,0.0,1
//! 0,0,1,MOVE,1.0,1.0,2
//! 1,1,0,MOVE,4.0,2.0,1
//! ```
//!
//! `behavior` is one of `MOVE`, `WAIT`, `QUEUE`, `EXIT` (any case).
//! Paths are returned in ascending `path_id` order.  Empty queues have no
//! rows and are skipped on save.

use std::collections::BTreeMap;
use std::io::{Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use ps_core::CrossingId;

use crate::{BehaviorState, PrecomputedPathQueue, RouteError, RouteResult, Waypoint};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Serialize, Deserialize)]
struct PathRecord {
    path_id:     u32,
    entrance:    u32,
    exit:        u32,
    behavior:    String,
    x:           f32,
    y:           f32,
    waypoint_id: u32,
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// Load every path stored in a CSV file.
pub fn load_paths_csv(path: &Path) -> RouteResult<Vec<PrecomputedPathQueue>> {
    let file = std::fs::File::open(path)?;
    load_paths_reader(file)
}

/// Like [`load_paths_csv`] but accepts any `Read` source.
pub fn load_paths_reader<R: Read>(reader: R) -> RouteResult<Vec<PrecomputedPathQueue>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut by_path: BTreeMap<u32, Vec<PathRecord>> = BTreeMap::new();

    for result in csv_reader.deserialize::<PathRecord>() {
        let row = result.map_err(|e| RouteError::Parse(e.to_string()))?;
        by_path.entry(row.path_id).or_default().push(row);
    }

    let paths = by_path
        .into_iter()
        .map(|(path_id, rows)| build_queue(path_id, rows))
        .collect::<RouteResult<Vec<_>>>()?;

    debug!(paths = paths.len(), "loaded precomputed paths");
    Ok(paths)
}

fn build_queue(path_id: u32, rows: Vec<PathRecord>) -> RouteResult<PrecomputedPathQueue> {
    // `rows` is never empty: a group exists only once a row was pushed.
    let head = &rows[0];
    let entrance = CrossingId(head.entrance);
    let exit = CrossingId(head.exit);
    let behavior: BehaviorState = head.behavior.parse()?;

    let mut queue = PrecomputedPathQueue::new(behavior, entrance, exit);
    for row in &rows {
        if row.entrance != head.entrance || row.exit != head.exit {
            return Err(RouteError::Parse(format!(
                "path {path_id}: waypoint {} changes entrance/exit mid-route",
                row.waypoint_id
            )));
        }
        if row.behavior.parse::<BehaviorState>()? != behavior {
            return Err(RouteError::Parse(format!(
                "path {path_id}: waypoint {} changes behaviour mid-route",
                row.waypoint_id
            )));
        }
        queue.push_back(Waypoint::new(row.x, row.y, row.waypoint_id));
    }
    Ok(queue)
}

// ── Saving ────────────────────────────────────────────────────────────────────

/// Write `paths` to a CSV file, replacing it if present.
pub fn save_paths_csv<'a>(
    path:  &Path,
    paths: impl IntoIterator<Item = &'a PrecomputedPathQueue>,
) -> RouteResult<()> {
    let file = std::fs::File::create(path)?;
    save_paths_writer(file, paths)
}

/// Like [`save_paths_csv`] but accepts any `Write` sink.
///
/// `path_id`s are assigned 0, 1, 2, … in iteration order.
pub fn save_paths_writer<'a, W: Write>(
    writer: W,
    paths:  impl IntoIterator<Item = &'a PrecomputedPathQueue>,
) -> RouteResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    let mut written = 0u32;

    for queue in paths.into_iter().filter(|q| !q.is_empty()) {
        for wp in queue {
            csv_writer.serialize(PathRecord {
                path_id:     written,
                entrance:    queue.entrance().0,
                exit:        queue.exit().0,
                behavior:    queue.behavior().as_str().to_owned(),
                x:           wp.x,
                y:           wp.y,
                waypoint_id: wp.id,
            })?;
        }
        written += 1;
    }

    csv_writer.flush()?;
    debug!(paths = written, "saved precomputed paths");
    Ok(())
}
