use std::ops::{Add, Mul, Sub};

/// A point or vector in scene space. Scene y points up, z points away from the camera.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[cfg(test)]
    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Point on the segment `self -> other` at fraction `t`.
    pub fn lerp(self, other: Point3, t: f64) -> Point3 {
        self + (other - self) * t
    }
}

impl Add for Point3 {
    type Output = Point3;
    fn add(self, o: Point3) -> Point3 {
        Point3::new(self.x + o.x, self.y + o.y, self.z + o.z)
    }
}

impl Sub for Point3 {
    type Output = Point3;
    fn sub(self, o: Point3) -> Point3 {
        Point3::new(self.x - o.x, self.y - o.y, self.z - o.z)
    }
}

impl Mul<f64> for Point3 {
    type Output = Point3;
    fn mul(self, k: f64) -> Point3 {
        Point3::new(self.x * k, self.y * k, self.z * k)
    }
}

pub fn rotate_x(p: Point3, angle: f64) -> Point3 {
    let (s, c) = angle.sin_cos();
    Point3::new(p.x, p.y * c - p.z * s, p.y * s + p.z * c)
}

pub fn rotate_y(p: Point3, angle: f64) -> Point3 {
    let (s, c) = angle.sin_cos();
    Point3::new(p.x * c + p.z * s, p.y, -p.x * s + p.z * c)
}

pub fn rotate_z(p: Point3, angle: f64) -> Point3 {
    let (s, c) = angle.sin_cos();
    Point3::new(p.x * c - p.y * s, p.x * s + p.y * c, p.z)
}

/// Roll about X, then pitch about Y, then yaw about Z (Z∘Y∘X).
pub fn apply_orientation(p: Point3, roll: f64, pitch: f64, yaw: f64) -> Point3 {
    rotate_z(rotate_y(rotate_x(p, roll), pitch), yaw)
}
