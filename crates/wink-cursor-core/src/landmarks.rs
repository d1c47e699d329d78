use serde::{Deserialize, Serialize};

// MediaPipe Face Mesh indices (478-point model with iris refinement)
pub const LEFT_IRIS: [usize; 4] = [468, 469, 470, 471];
pub const RIGHT_IRIS: [usize; 4] = [473, 474, 475, 476];

pub const LEFT_EYE_CORNERS: [usize; 2] = [33, 133];
pub const RIGHT_EYE_CORNERS: [usize; 2] = [362, 263];

// p0/p3 horizontal corners, p1/p2 upper lid, p4/p5 lower lid
pub const LEFT_EYE_CONTOUR: [usize; 6] = [33, 160, 158, 133, 153, 144];
pub const RIGHT_EYE_CONTOUR: [usize; 6] = [362, 385, 387, 263, 373, 380];

// Left/right counterparts of every index read here. Flipping the camera
// image before the mesh runs lands each eye on the other eye's indices.
// Iris rings are only averaged, so their order within the ring is free.
const MIRROR_PAIRS: [(usize, usize); 10] = [
    (33, 263),
    (160, 387),
    (158, 385),
    (133, 362),
    (153, 380),
    (144, 373),
    (468, 473),
    (469, 474),
    (470, 475),
    (471, 476),
];

/// One face-mesh point, normalized to the frame (0..1 on both axes).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
}

impl Landmark {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Horizontal flip of this point alone; see [`mirror_face`] for a whole
    /// mesh.
    pub fn mirrored(self) -> Self {
        Self {
            x: 1.0 - self.x,
            y: self.y,
        }
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl FrameSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn to_pixel(&self, landmark: &Landmark) -> PixelPoint {
        PixelPoint {
            x: landmark.x * f64::from(self.width),
            y: landmark.y * f64::from(self.height),
        }
    }

    pub fn normalize(&self, point: &PixelPoint) -> Option<(f64, f64)> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        Some((
            point.x / f64::from(self.width),
            point.y / f64::from(self.height),
        ))
    }
}

/// Landmarks as if the mesh had run on the horizontally flipped frame: every
/// x is mirrored and the eye and iris indices trade places with their
/// counterparts on the other side of the face.
pub fn mirror_face(landmarks: &[Landmark]) -> Vec<Landmark> {
    let mut mirrored: Vec<Landmark> = landmarks.iter().map(|lm| lm.mirrored()).collect();
    for (a, b) in MIRROR_PAIRS {
        if a < mirrored.len() && b < mirrored.len() {
            mirrored.swap(a, b);
        }
    }
    mirrored
}

/// Pixel position of a single landmark; `None` when the index is out of
/// range or the point is not a finite coordinate.
pub fn pixel_at(landmarks: &[Landmark], index: usize, size: FrameSize) -> Option<PixelPoint> {
    landmarks
        .get(index)
        .filter(|lm| lm.is_finite())
        .map(|lm| size.to_pixel(lm))
}

/// Eye region for a fixed index set. All indices must resolve.
pub fn eye_region<const N: usize>(
    landmarks: &[Landmark],
    indices: &[usize; N],
    size: FrameSize,
) -> Option<[PixelPoint; N]> {
    let mut points = [PixelPoint { x: 0.0, y: 0.0 }; N];
    for (slot, &index) in points.iter_mut().zip(indices.iter()) {
        *slot = pixel_at(landmarks, index, size)?;
    }
    Some(points)
}

/// Mean pixel position of whichever iris points are present.
pub fn iris_center(landmarks: &[Landmark], indices: &[usize; 4], size: FrameSize) -> Option<PixelPoint> {
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut count = 0usize;

    for &index in indices {
        if let Some(p) = pixel_at(landmarks, index, size) {
            sum_x += p.x;
            sum_y += p.y;
            count += 1;
        }
    }

    if count == 0 {
        return None;
    }

    Some(PixelPoint {
        x: sum_x / count as f64,
        y: sum_y / count as f64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_at_out_of_range() {
        let landmarks = vec![Landmark::new(0.5, 0.5); 10];
        assert!(pixel_at(&landmarks, 10, FrameSize::new(640, 480)).is_none());
        let p = pixel_at(&landmarks, 3, FrameSize::new(640, 480)).unwrap();
        assert_eq!(p, PixelPoint { x: 320.0, y: 240.0 });
    }

    #[test]
    fn test_non_finite_point_is_missing() {
        let mut landmarks = vec![Landmark::new(0.5, 0.5); 4];
        landmarks[2] = Landmark::new(f64::NAN, 0.1);
        assert!(pixel_at(&landmarks, 2, FrameSize::new(100, 100)).is_none());
    }

    #[test]
    fn test_eye_region_requires_every_index() {
        let landmarks = vec![Landmark::new(0.25, 0.75); 200];
        assert!(eye_region(&landmarks, &LEFT_EYE_CONTOUR, FrameSize::new(100, 100)).is_some());
        assert!(eye_region(&landmarks, &RIGHT_EYE_CONTOUR, FrameSize::new(100, 100)).is_none());
    }

    #[test]
    fn test_iris_center_uses_available_points() {
        let mut landmarks = vec![Landmark::default(); 470];
        landmarks[468] = Landmark::new(0.1, 0.2);
        landmarks[469] = Landmark::new(0.3, 0.4);
        let center = iris_center(&landmarks, &LEFT_IRIS, FrameSize::new(100, 100)).unwrap();
        assert!((center.x - 20.0).abs() < 1e-9);
        assert!((center.y - 30.0).abs() < 1e-9);

        assert!(iris_center(&landmarks, &RIGHT_IRIS, FrameSize::new(100, 100)).is_none());
    }

    #[test]
    fn test_mirrored_flips_x_only() {
        let lm = Landmark::new(0.25, 0.6).mirrored();
        assert_eq!(lm, Landmark::new(0.75, 0.6));
    }

    #[test]
    fn test_mirror_face_swaps_eyes() {
        let mut landmarks = vec![Landmark::new(0.5, 0.5); 478];
        landmarks[33] = Landmark::new(0.25, 0.4);
        landmarks[263] = Landmark::new(0.625, 0.45);
        landmarks[468] = Landmark::new(0.3, 0.4);
        landmarks[10] = Landmark::new(0.125, 0.2);

        let mirrored = mirror_face(&landmarks);
        assert_eq!(mirrored.len(), 478);
        assert_eq!(mirrored[33], Landmark::new(0.375, 0.45));
        assert_eq!(mirrored[263], Landmark::new(0.75, 0.4));
        assert_eq!(mirrored[473], Landmark::new(0.7, 0.4));
        // points outside the eye sets are only flipped
        assert_eq!(mirrored[10], Landmark::new(0.875, 0.2));
    }

    #[test]
    fn test_mirror_face_short_mesh_only_flips() {
        let landmarks = vec![Landmark::new(0.25, 0.5); 100];
        let mirrored = mirror_face(&landmarks);
        assert!(mirrored.iter().all(|lm| *lm == Landmark::new(0.75, 0.5)));
    }
}
