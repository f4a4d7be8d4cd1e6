#![allow(clippy::unwrap_used)]

use crate::math::Point2;
use crate::model::{Wall, WallId, DEFAULT_WALL_HEIGHT_CM, DEFAULT_WALL_THICKNESS_CM};

pub(crate) type Segment = ((f64, f64), (f64, f64));

/// Builds walls with ids `1..` from raw segments.
pub(crate) fn walls(segments: &[Segment]) -> Vec<Wall> {
    segments
        .iter()
        .zip(1_u64..)
        .map(|(&((x1, y1), (x2, y2)), id)| {
            Wall::new(
                WallId(id),
                Point2::new(x1, y1),
                Point2::new(x2, y2),
                DEFAULT_WALL_THICKNESS_CM,
                DEFAULT_WALL_HEIGHT_CM,
            )
            .unwrap()
        })
        .collect()
}

/// The 500 × 400 cm rectangle used across the detection tests.
pub(crate) fn rectangle() -> Vec<Segment> {
    vec![
        ((0.0, 0.0), (500.0, 0.0)),
        ((500.0, 0.0), (500.0, 400.0)),
        ((500.0, 400.0), (0.0, 400.0)),
        ((0.0, 400.0), (0.0, 0.0)),
    ]
}

/// The rectangle split in two by a partition at x = 250.
pub(crate) fn partitioned_rectangle() -> Vec<Segment> {
    let mut segs = rectangle();
    segs.push(((250.0, 0.0), (250.0, 400.0)));
    segs
}

/// Three walls forming an open "U".
pub(crate) fn u_shape() -> Vec<Segment> {
    vec![
        ((0.0, 400.0), (0.0, 0.0)),
        ((0.0, 0.0), (500.0, 0.0)),
        ((500.0, 0.0), (500.0, 400.0)),
    ]
}

/// Installs a test subscriber once; honours `RUST_LOG`.
pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
