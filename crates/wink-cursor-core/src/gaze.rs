use serde::{Deserialize, Serialize};

use crate::landmarks::{
    eye_region, iris_center, FrameSize, Landmark, PixelPoint, LEFT_EYE_CORNERS, LEFT_IRIS,
    RIGHT_EYE_CORNERS, RIGHT_IRIS,
};

pub const GAZE_LOWER_BOUND: f64 = 0.4;
pub const GAZE_UPPER_BOUND: f64 = 0.6;
const SPAN_EPSILON: f64 = 1e-6;
/// Ratios are compared after rounding to this many steps per unit, so
/// pixel round-off from denormalizing cannot push a boundary ratio across.
const RATIO_STEPS: f64 = 1e9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GazeDirection {
    Left,
    Center,
    Right,
    Unknown,
}

/// Per-eye gaze labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gaze {
    pub left: GazeDirection,
    pub right: GazeDirection,
}

impl Default for Gaze {
    fn default() -> Self {
        Self {
            left: GazeDirection::Unknown,
            right: GazeDirection::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GazeState {
    pub gaze: Gaze,
    pub left_iris: Option<PixelPoint>,
    pub right_iris: Option<PixelPoint>,
}

impl GazeState {
    /// Normalized midpoint of both iris centers, the cursor target.
    pub fn iris_target(&self, size: FrameSize) -> Option<(f64, f64)> {
        let (left, right) = (self.left_iris?, self.right_iris?);
        size.normalize(&PixelPoint {
            x: (left.x + right.x) / 2.0,
            y: (left.y + right.y) / 2.0,
        })
    }
}

struct EyeGeometry {
    inner: usize,
    outer: usize,
    iris: [usize; 4],
    toward_inner: GazeDirection,
    toward_outer: GazeDirection,
}

// The right eye's bounds are swapped: an iris near the inner bound reads
// as the opposite visual direction.
const LEFT_EYE: EyeGeometry = EyeGeometry {
    inner: LEFT_EYE_CORNERS[0],
    outer: LEFT_EYE_CORNERS[1],
    iris: LEFT_IRIS,
    toward_inner: GazeDirection::Left,
    toward_outer: GazeDirection::Right,
};

const RIGHT_EYE: EyeGeometry = EyeGeometry {
    inner: RIGHT_EYE_CORNERS[1],
    outer: RIGHT_EYE_CORNERS[0],
    iris: RIGHT_IRIS,
    toward_inner: GazeDirection::Right,
    toward_outer: GazeDirection::Left,
};

/// Horizontal iris position within the inner→outer corner span.
pub fn gaze_ratio(iris_x: f64, inner_x: f64, outer_x: f64) -> f64 {
    let span = outer_x - inner_x;
    let span = if span.abs() < SPAN_EPSILON { SPAN_EPSILON } else { span };
    (iris_x - inner_x) / span
}

/// Bounds are exclusive: exactly 0.4 or 0.6 is `Center`.
pub fn classify_ratio(ratio: f64, below: GazeDirection, above: GazeDirection) -> GazeDirection {
    if !ratio.is_finite() {
        return GazeDirection::Unknown;
    }

    let ratio = (ratio * RATIO_STEPS).round() / RATIO_STEPS;
    if ratio < GAZE_LOWER_BOUND {
        below
    } else if ratio > GAZE_UPPER_BOUND {
        above
    } else {
        GazeDirection::Center
    }
}

/// Stateless landmark-geometry gaze classifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct GazeEstimator;

impl GazeEstimator {
    pub fn new() -> Self {
        Self
    }

    pub fn estimate(&self, landmarks: &[Landmark], size: FrameSize) -> GazeState {
        let (left, left_iris) = estimate_eye(landmarks, size, &LEFT_EYE);
        let (right, right_iris) = estimate_eye(landmarks, size, &RIGHT_EYE);

        GazeState {
            gaze: Gaze { left, right },
            left_iris,
            right_iris,
        }
    }
}

fn estimate_eye(
    landmarks: &[Landmark],
    size: FrameSize,
    eye: &EyeGeometry,
) -> (GazeDirection, Option<PixelPoint>) {
    let corners = eye_region(landmarks, &[eye.inner, eye.outer], size);
    let iris = iris_center(landmarks, &eye.iris, size);

    match (corners, iris) {
        (Some([inner, outer]), Some(iris)) => {
            let ratio = gaze_ratio(iris.x, inner.x, outer.x);
            (classify_ratio(ratio, eye.toward_inner, eye.toward_outer), Some(iris))
        }
        _ => (GazeDirection::Unknown, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const WIDTH: u32 = 1024;

    fn face(left: [f64; 3], right: [f64; 3]) -> Vec<Landmark> {
        face_at(WIDTH, left, right)
    }

    fn face_at(width: u32, left: [f64; 3], right: [f64; 3]) -> Vec<Landmark> {
        // [inner_x, outer_x, iris_x] in pixels, all at y = 256
        let w = f64::from(width);
        let y = 256.0 / w;
        let mut landmarks = vec![Landmark::new(0.5, 0.5); 478];
        landmarks[33] = Landmark::new(left[0] / w, y);
        landmarks[133] = Landmark::new(left[1] / w, y);
        for i in LEFT_IRIS {
            landmarks[i] = Landmark::new(left[2] / w, y);
        }
        landmarks[263] = Landmark::new(right[0] / w, y);
        landmarks[362] = Landmark::new(right[1] / w, y);
        for i in RIGHT_IRIS {
            landmarks[i] = Landmark::new(right[2] / w, y);
        }
        landmarks
    }

    #[test]
    fn test_lower_boundary_is_center() {
        let landmarks = face([100.0, 140.0, 116.0], [300.0, 260.0, 280.0]);
        let state = GazeEstimator::new().estimate(&landmarks, FrameSize::new(WIDTH, WIDTH));
        assert_eq!(state.gaze.left, GazeDirection::Center);
        assert_eq!(state.left_iris.map(|p| p.x), Some(116.0));
    }

    #[test]
    fn test_upper_boundary_is_center() {
        let landmarks = face([100.0, 140.0, 124.0], [300.0, 260.0, 276.0]);
        let state = GazeEstimator::new().estimate(&landmarks, FrameSize::new(WIDTH, WIDTH));
        assert_eq!(state.gaze.left, GazeDirection::Center);
        assert_eq!(state.gaze.right, GazeDirection::Center);
    }

    #[test]
    fn test_boundaries_hold_at_common_widths() {
        for width in [640, 800, 1000, 1280, 1920] {
            let size = FrameSize::new(width, width);
            let lower = face_at(width, [100.0, 140.0, 116.0], [300.0, 260.0, 284.0]);
            let upper = face_at(width, [100.0, 140.0, 124.0], [300.0, 260.0, 276.0]);

            let lower = GazeEstimator.estimate(&lower, size).gaze;
            let upper = GazeEstimator.estimate(&upper, size).gaze;
            assert_eq!(lower, Gaze { left: GazeDirection::Center, right: GazeDirection::Center }, "width {width}");
            assert_eq!(upper, Gaze { left: GazeDirection::Center, right: GazeDirection::Center }, "width {width}");
        }
    }

    #[test]
    fn test_just_past_boundary_still_classifies() {
        for width in [640, 800, 1920] {
            let size = FrameSize::new(width, width);
            let landmarks = face_at(width, [100.0, 140.0, 115.9], [300.0, 260.0, 275.9]);
            let gaze = GazeEstimator.estimate(&landmarks, size).gaze;
            assert_eq!(gaze.left, GazeDirection::Left, "width {width}");
            assert_eq!(gaze.right, GazeDirection::Left, "width {width}");
        }
    }

    #[test]
    fn test_left_eye_directions() {
        let size = FrameSize::new(WIDTH, WIDTH);
        let toward_inner = face([100.0, 140.0, 104.0], [300.0, 260.0, 280.0]);
        let toward_outer = face([100.0, 140.0, 136.0], [300.0, 260.0, 280.0]);
        assert_eq!(GazeEstimator.estimate(&toward_inner, size).gaze.left, GazeDirection::Left);
        assert_eq!(GazeEstimator.estimate(&toward_outer, size).gaze.left, GazeDirection::Right);
    }

    #[test]
    fn test_right_eye_labels_are_swapped() {
        let size = FrameSize::new(WIDTH, WIDTH);
        let near_inner = face([100.0, 140.0, 120.0], [300.0, 260.0, 296.0]);
        let near_outer = face([100.0, 140.0, 120.0], [300.0, 260.0, 264.0]);
        assert_eq!(GazeEstimator.estimate(&near_inner, size).gaze.right, GazeDirection::Right);
        assert_eq!(GazeEstimator.estimate(&near_outer, size).gaze.right, GazeDirection::Left);
    }

    #[test]
    fn test_short_landmark_list_is_unknown() {
        let landmarks = vec![Landmark::new(0.5, 0.5); 468];
        let state = GazeEstimator.estimate(&landmarks, FrameSize::new(640, 480));
        assert_eq!(state.gaze, Gaze::default());
        assert!(state.left_iris.is_none());
        assert!(state.right_iris.is_none());
        assert!(state.iris_target(FrameSize::new(640, 480)).is_none());
    }

    #[test]
    fn test_iris_target_is_normalized_midpoint() {
        let landmarks = face([100.0, 140.0, 120.0], [300.0, 260.0, 280.0]);
        let size = FrameSize::new(WIDTH, WIDTH);
        let (x, y) = GazeEstimator.estimate(&landmarks, size).iris_target(size).unwrap();
        assert!((x - 200.0 / 1024.0).abs() < 1e-12);
        assert!((y - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_span_does_not_panic() {
        assert!(gaze_ratio(5.0, 3.0, 3.0).is_finite());
    }

    proptest! {
        #[test]
        fn prop_classification_matches_bounds(ratio in -1.0f64..2.0) {
            prop_assume!((ratio - 0.4).abs() > 1e-8 && (ratio - 0.6).abs() > 1e-8);
            let label = classify_ratio(ratio, GazeDirection::Left, GazeDirection::Right);
            let expected = if ratio < 0.4 {
                GazeDirection::Left
            } else if ratio > 0.6 {
                GazeDirection::Right
            } else {
                GazeDirection::Center
            };
            prop_assert_eq!(label, expected);
        }
    }
}
