use super::math::Point3;

pub const FOCAL_LENGTH: f64 = 900.0;
/// Added to every z before the divide, moving the scene away from the eye.
pub const CAMERA_OFFSET: f64 = 1100.0;
/// Depth stays positive for any z above this. Scene content lives in roughly -400..400.
pub const SAFE_MIN_Z: f64 = -(FOCAL_LENGTH + CAMERA_OFFSET);
/// Fraction of the surface height where the scene origin lands.
const HORIZON: f64 = 0.55;

/// Screen position of a projected point plus its perspective scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projected {
    pub x: f64,
    pub y: f64,
    pub scale: f64,
}

impl Projected {
    pub fn xy(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}

/// Perspective camera for a surface of known pixel size.
///
/// `pixel_ratio` scales screen-space offsets, so the same scene can be laid
/// onto a small raster. At 1.0 a scene unit is one surface pixel at the
/// focal plane.
#[derive(Clone, Copy, Debug)]
pub struct Projector {
    pub width: f64,
    pub height: f64,
    pub pixel_ratio: f64,
}

impl Projector {
    pub fn new(width: f64, height: f64, pixel_ratio: f64) -> Self {
        Self { width, height, pixel_ratio }
    }

    pub fn center(&self) -> (f64, f64) {
        (self.width / 2.0, self.height * HORIZON)
    }

    pub fn project(&self, p: Point3) -> Projected {
        debug_assert!(
            p.z > SAFE_MIN_Z,
            "z = {} is outside the projectable range (> {})",
            p.z,
            SAFE_MIN_Z
        );
        let depth = FOCAL_LENGTH + p.z + CAMERA_OFFSET;
        let k = FOCAL_LENGTH / depth;
        let (cx, cy) = self.center();
        Projected {
            x: cx + p.x * k * self.pixel_ratio,
            y: cy - p.y * k * self.pixel_ratio,
            scale: k,
        }
    }
}
