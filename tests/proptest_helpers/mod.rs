#![allow(dead_code)]

use proptest::prelude::*;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

/// Tolerance for pixel boxes recovered from YOLO values.
pub const EPS_ROUNDTRIP: f64 = 1e-4;

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(256);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// An image size and a box that lies fully inside it:
/// `(width, height, xmin, ymin, xmax, ymax)`.
pub fn arb_image_and_inner_box() -> impl Strategy<Value = (u32, u32, f64, f64, f64, f64)> {
    (1u32..=8192, 1u32..=8192).prop_flat_map(|(width, height)| {
        let w = width as f64;
        let h = height as f64;
        (
            Just(width),
            Just(height),
            (0.0..=w, 0.0..=w),
            (0.0..=h, 0.0..=h),
        )
            .prop_map(|(width, height, (x1, x2), (y1, y2))| {
                (width, height, x1.min(x2), y1.min(y2), x1.max(x2), y1.max(y2))
            })
    })
}

/// An image size and an arbitrary, possibly overhanging or inverted, box.
pub fn arb_image_and_any_box() -> impl Strategy<Value = (u32, u32, f64, f64, f64, f64)> {
    (
        1u32..=8192,
        1u32..=8192,
        -1e4f64..1e4,
        -1e4f64..1e4,
        -1e4f64..1e4,
        -1e4f64..1e4,
    )
}

/// Class names drawn from a small pool, some of them outside the class map.
pub fn arb_class_names() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(
        prop::sample::select(vec!["jg", "ld", "txx", "cat", "unknown_class"]),
        0..8,
    )
    .prop_map(|names| names.into_iter().map(str::to_string).collect())
}
