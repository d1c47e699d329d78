use serde::Serialize;

use crate::landmarks::{eye_region, FrameSize, Landmark, PixelPoint, LEFT_EYE_CONTOUR, RIGHT_EYE_CONTOUR};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EarReading {
    pub left_ear: f64,
    pub right_ear: f64,
}

/// Eye aspect ratio over a six-point contour `[p0..p5]`.
///
/// Uses the two vertical lid pairs (p1/p5, p2/p4) against the horizontal
/// corner distance (p0/p3). Returns 0 for a degenerate eye width.
pub fn eye_aspect_ratio(contour: &[PixelPoint; 6]) -> f64 {
    let horizontal = (contour[0].x - contour[3].x).abs();
    if horizontal <= f64::EPSILON {
        return 0.0;
    }

    let vertical1 = (contour[1].y - contour[5].y).abs();
    let vertical2 = (contour[2].y - contour[4].y).abs();

    (vertical1 + vertical2) / (2.0 * horizontal)
}

/// EAR for one eye; a contour with unresolvable indices reads as 0.
pub fn eye_ear(landmarks: &[Landmark], contour: &[usize; 6], size: FrameSize) -> f64 {
    eye_region(landmarks, contour, size)
        .map(|points| eye_aspect_ratio(&points))
        .unwrap_or(0.0)
}

pub fn compute_ear(landmarks: &[Landmark], size: FrameSize) -> EarReading {
    EarReading {
        left_ear: eye_ear(landmarks, &LEFT_EYE_CONTOUR, size),
        right_ear: eye_ear(landmarks, &RIGHT_EYE_CONTOUR, size),
    }
}
