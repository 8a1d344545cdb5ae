use super::math::Point3;
use super::params::BASE_RADIUS;

const RB: f64 = BASE_RADIUS;

/// Closed loop the end effector sweeps, as uniform Catmull-Rom anchors.
pub const CONTROL_POINTS: [Point3; 6] = [
    Point3::new(0.0, 0.0, -180.0),
    Point3::new(0.7 * RB, 0.1 * RB, -160.0),
    Point3::new(0.25 * RB, 0.7 * RB, -205.0),
    Point3::new(-0.6 * RB, 0.05 * RB, -170.0),
    Point3::new(-0.2 * RB, -0.6 * RB, -225.0),
    Point3::new(0.6 * RB, -0.4 * RB, -190.0),
];

/// Cyclic uniform Catmull-Rom curve through a fixed set of anchors.
#[derive(Clone, Debug)]
pub struct ControlPath {
    points: Vec<Point3>,
}

impl Default for ControlPath {
    fn default() -> Self {
        Self::new(CONTROL_POINTS.to_vec())
    }
}

fn catmull_rom(a: f64, b: f64, c: f64, d: f64, t: f64) -> f64 {
    let t2 = t * t;
    let t3 = t2 * t;
    0.5 * ((2.0 * b)
        + (-a + c) * t
        + (2.0 * a - 5.0 * b + 4.0 * c - d) * t2
        + (-a + 3.0 * b - 3.0 * c + d) * t3)
}

impl ControlPath {
    /// Needs at least one anchor; a single anchor is a degenerate loop.
    pub fn new(points: Vec<Point3>) -> Self {
        assert!(!points.is_empty(), "a control path needs at least one anchor");
        Self { points }
    }

    /// Point at loop parameter `u`. Any real `u` is accepted and taken mod 1.
    pub fn evaluate(&self, u: f64) -> Point3 {
        let n = self.points.len();
        let u = u.rem_euclid(1.0);
        let s = u * n as f64;
        let whole = s.floor();
        let i = (whole as usize) % n;
        let t = s - whole;

        let p0 = self.points[(i + n - 1) % n];
        let p1 = self.points[i];
        let p2 = self.points[(i + 1) % n];
        let p3 = self.points[(i + 2) % n];

        Point3::new(
            catmull_rom(p0.x, p1.x, p2.x, p3.x, t),
            catmull_rom(p0.y, p1.y, p2.y, p3.y, t),
            catmull_rom(p0.z, p1.z, p2.z, p3.z, t),
        )
    }
}
