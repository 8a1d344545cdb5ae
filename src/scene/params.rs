//! Fixed geometry and palette of the delta-robot scene.

use std::f64::consts::TAU;

use super::math::Point3;
use crate::color::Rgba;

pub const BASE_RADIUS: f64 = 320.0;
pub const PLATFORM_RADIUS: f64 = 130.0;
pub const BASE_Z: f64 = -60.0;

pub const ARM_COLORS: [Rgba; 3] = [
    Rgba::rgb(0x7a, 0x86, 0xff),
    Rgba::rgb(0x8f, 0x6f, 0xff),
    Rgba::rgb(0x58, 0x65, 0xf2),
];

pub const INDIGO: Rgba = Rgba::rgb(88, 101, 242);
pub const VIOLET: Rgba = Rgba::rgb(122, 92, 255);
pub const PERIWINKLE: Rgba = Rgba::rgb(138, 148, 255);
pub const SLATE: Rgba = Rgba::rgb(93, 107, 124);
pub const NAVY: Rgba = Rgba::rgb(15, 22, 40);
pub const INK: Rgba = Rgba::rgb(10, 15, 30);

/// Background HUD grid lying on a plane behind the robot.
pub struct GridSpec {
    pub half_extent: f64,
    pub step: f64,
    pub z: f64,
}

pub const GRID: GridSpec = GridSpec {
    half_extent: 1100.0,
    step: 100.0,
    z: BASE_Z + 260.0,
};

/// One decorative ring: `spin` is radians per clock unit.
pub struct RingSpec {
    pub radius: f64,
    pub spin: f64,
}

pub const RING_Z: f64 = BASE_Z + 20.0;
pub const RINGS: [RingSpec; 2] = [
    RingSpec { radius: BASE_RADIUS + 60.0, spin: 0.6 },
    RingSpec { radius: BASE_RADIUS + 100.0, spin: -0.35 },
];
pub const RING_SEGMENTS: usize = 80;
pub const RING_TICKS: usize = 24;

/// Three points 120° apart on a circle of `radius` at height `z`.
fn triangle(radius: f64, z: f64) -> [Point3; 3] {
    std::array::from_fn(|i| {
        let a = i as f64 * TAU / 3.0;
        Point3::new(radius * a.cos(), radius * a.sin(), z)
    })
}

pub fn base_anchors() -> [Point3; 3] {
    triangle(BASE_RADIUS, BASE_Z)
}

/// Platform triangle in its own frame, centred on the end effector.
pub fn platform_local() -> [Point3; 3] {
    triangle(PLATFORM_RADIUS, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_anchors_sit_on_the_base_circle_120_degrees_apart() {
        let anchors = base_anchors();
        for a in &anchors {
            assert!((a.x.hypot(a.y) - BASE_RADIUS).abs() < 1e-9);
            assert_eq!(a.z, BASE_Z);
        }
        for i in 0..3 {
            let a = anchors[i];
            let b = anchors[(i + 1) % 3];
            let sep = (a.x * b.x + a.y * b.y) / (BASE_RADIUS * BASE_RADIUS);
            assert!((sep.acos() - TAU / 3.0).abs() < 1e-9);
        }
    }

    #[test]
    fn platform_is_centred_on_its_origin() {
        let local = platform_local();
        let cx: f64 = local.iter().map(|p| p.x).sum();
        let cy: f64 = local.iter().map(|p| p.y).sum();
        assert!(cx.abs() < 1e-9 && cy.abs() < 1e-9);
        assert!(local.iter().all(|p| (p.length() - PLATFORM_RADIUS).abs() < 1e-9));
    }
}
