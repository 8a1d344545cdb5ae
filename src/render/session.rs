//! One animation session: clock, trail and sparks, and the per-frame painter.

use std::f64::consts::TAU;

use log::trace;

use super::effects::{Jitter, SparkSwarm, Trail, SPARK_COUNT, TRAIL_CAPACITY};
use super::{Blend, Glow, Gradient, Layer, Paint, Point2, Stroke, Surface};
use crate::color::Rgba;
use crate::config::Config;
use crate::scene::params::{
    base_anchors, platform_local, ARM_COLORS, GRID, INDIGO, INK, NAVY, PERIWINKLE, RINGS,
    RING_SEGMENTS, RING_TICKS, RING_Z, SLATE, VIOLET,
};
use crate::scene::{apply_orientation, ControlPath, Point3, Projected, Projector};

/// Surface height at which one scene unit maps to one pixel at the focal plane.
pub const REFERENCE_HEIGHT: f64 = 560.0;

/// Where along the anchor-to-vertex span the elbow bulges out.
const ELBOW_AT: f64 = 0.55;
const RETICLE_HALF: f64 = 10.0;

/// Synthetic wrist angles `(roll, pitch, yaw)` at `clock`.
pub fn orientation(clock: f64) -> (f64, f64, f64) {
    (
        (clock * 1.8).sin() * 0.25,
        (clock * 1.3).cos() * 0.22,
        (clock * 0.9 + 0.6).sin() * 0.35,
    )
}

/// Platform corners in world space for an end effector at `ee`.
pub fn platform_world(ee: Point3, (roll, pitch, yaw): (f64, f64, f64)) -> [Point3; 3] {
    platform_local().map(|p| apply_orientation(p, roll, pitch, yaw) + ee)
}

/// Elbow of arm `index`: pushed sideways from the span's 55% point, along the
/// XY-plane perpendicular, by a breathing offset.
pub fn elbow(anchor: Point3, vertex: Point3, clock: f64, index: usize) -> Point3 {
    let v = vertex - anchor;
    let mid = anchor.lerp(vertex, ELBOW_AT);
    let (nx, ny) = (-v.y, v.x);
    let mag = nx.hypot(ny).max(1.0);
    let off = 30.0 + 9.0 * (clock * 2.0 + index as f64 * 1.8).sin();
    Point3::new(mid.x + nx / mag * off, mid.y + ny / mag * off, mid.z)
}

/// What one frame computed, for status displays and tests.
#[derive(Clone, Copy, Debug)]
pub struct FrameSnapshot {
    pub clock: f64,
    pub end_effector: Point3,
    pub end_effector_screen: Projected,
}

/// All mutable animation state. Owned by whoever drives the frames.
pub struct AnimationSession {
    clock: f64,
    clock_step: f64,
    speed_factor: f64,
    pixel_ratio: Option<f64>,
    frames: u64,
    path: ControlPath,
    anchors: [Point3; 3],
    trail: Trail,
    sparks: SparkSwarm,
    jitter: Box<dyn Jitter>,
}

impl AnimationSession {
    /// Sparks are born at `spark_origin`, normally the surface centre.
    pub fn new(config: &Config, spark_origin: Point2, mut jitter: Box<dyn Jitter>) -> Self {
        let sparks = SparkSwarm::new(SPARK_COUNT, spark_origin, jitter.as_mut());
        Self {
            clock: 0.0,
            clock_step: config.clock_step,
            speed_factor: config.speed_factor,
            pixel_ratio: config.pixel_ratio,
            frames: 0,
            path: ControlPath::default(),
            anchors: base_anchors(),
            trail: Trail::new(TRAIL_CAPACITY),
            sparks,
            jitter,
        }
    }

    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    #[cfg(test)]
    pub fn trail(&self) -> &Trail {
        &self.trail
    }

    #[cfg(test)]
    pub fn sparks(&self) -> &SparkSwarm {
        &self.sparks
    }

    /// End effector position at `clock`.
    pub fn end_effector_at(&self, clock: f64) -> Point3 {
        self.path.evaluate((clock * self.speed_factor).rem_euclid(1.0))
    }

    fn projector_for(&self, surface: &dyn Surface) -> Projector {
        let ratio = self
            .pixel_ratio
            .unwrap_or_else(|| surface.height() / REFERENCE_HEIGHT);
        Projector::new(surface.width(), surface.height(), ratio)
    }

    /// Advances the clock one step and paints a full frame back to front.
    pub fn advance(&mut self, surface: &mut dyn Surface) -> FrameSnapshot {
        self.clock += self.clock_step;
        self.frames += 1;
        let t = self.clock;

        surface.clear();
        let proj = self.projector_for(surface);
        let dpr = proj.pixel_ratio;

        surface.begin_layer(Layer::Grid);
        draw_grid(surface, &proj, dpr);

        surface.begin_layer(Layer::Rings);
        for ring in &RINGS {
            draw_ring(surface, &proj, dpr, ring.radius, t * ring.spin);
        }

        let ee = self.end_effector_at(t);
        let platform = platform_world(ee, orientation(t));

        let ee_screen = proj.project(ee);
        self.trail.push(ee_screen.xy());

        surface.begin_layer(Layer::Trail);
        let trail_stroke = Stroke {
            paint: Paint::Linear(Gradient {
                x0: 0.0,
                x1: surface.width(),
                stops: vec![
                    (0.0, INDIGO.with_alpha(0.12)),
                    (0.5, VIOLET.with_alpha(0.28)),
                    (1.0, VIOLET.with_alpha(0.08)),
                ],
            }),
            width: 3.2 * dpr,
            blend: Blend::Lighter,
            glow: None,
        };
        let trail = self.trail.as_slice();
        surface.stroke_path(trail, false, &trail_stroke);
        let trail_len = trail.len();

        surface.begin_layer(Layer::Base);
        let base: Vec<Point2> = self.anchors.iter().map(|&a| proj.project(a).xy()).collect();
        surface.stroke_path(&base, true, &Stroke::solid(INDIGO.with_alpha(0.30), 1.6 * dpr));

        surface.begin_layer(Layer::Arms);
        for (i, (&anchor, &vertex)) in self.anchors.iter().zip(platform.iter()).enumerate() {
            let joint = elbow(anchor, vertex, t, i);
            draw_arm(
                surface,
                dpr,
                [proj.project(anchor).xy(), proj.project(joint).xy(), proj.project(vertex).xy()],
                ARM_COLORS[i % ARM_COLORS.len()],
            );
        }

        surface.begin_layer(Layer::Platform);
        let plate: Vec<Point2> = platform.iter().map(|&p| proj.project(p).xy()).collect();
        surface.stroke_path(&plate, true, &Stroke::solid(NAVY.with_alpha(0.6), 1.6 * dpr));
        surface.fill_polygon(&plate, INDIGO.with_alpha(0.08), Blend::Normal);

        surface.begin_layer(Layer::Reticle);
        draw_reticle(surface, dpr, ee_screen.xy());

        surface.begin_layer(Layer::Particles);
        self.sparks.update(ee_screen.xy(), self.jitter.as_mut());
        let spark_color = PERIWINKLE.with_alpha(0.35);
        for s in self.sparks.sparks() {
            surface.fill_circle((s.x, s.y), s.radius(dpr), spark_color, Blend::Lighter);
        }

        trace!(
            "frame {} t={:.3} ee=({:.1}, {:.1}, {:.1}) trail={}",
            self.frames,
            t,
            ee.x,
            ee.y,
            ee.z,
            trail_len
        );

        FrameSnapshot {
            clock: t,
            end_effector: ee,
            end_effector_screen: ee_screen,
        }
    }
}

fn draw_grid(surface: &mut dyn Surface, proj: &Projector, dpr: f64) {
    let size = GRID.half_extent;
    let lines = (size / GRID.step).round() as i32;
    for (color, vertical) in [(INDIGO, true), (VIOLET, false)] {
        for i in -lines..=lines {
            let c = i as f64 * GRID.step;
            let (a, b) = if vertical {
                (Point3::new(c, -size, GRID.z), Point3::new(c, size, GRID.z))
            } else {
                (Point3::new(-size, c, GRID.z), Point3::new(size, c, GRID.z))
            };
            let fade = 0.06 + 0.12 * (1.0 - c.abs() / size);
            let stroke = Stroke::solid(color.with_alpha(fade), dpr).blend(Blend::Screen);
            surface.stroke_path(&[proj.project(a).xy(), proj.project(b).xy()], false, &stroke);
        }
    }
}

fn draw_ring(surface: &mut dyn Surface, proj: &Projector, dpr: f64, radius: f64, rot: f64) {
    let at = |r: f64, a: f64| proj.project(Point3::new(r * a.cos(), r * a.sin(), RING_Z)).xy();

    let circle: Vec<Point2> = (0..=RING_SEGMENTS)
        .map(|i| at(radius, rot + i as f64 / RING_SEGMENTS as f64 * TAU))
        .collect();
    let ring = Stroke::solid(PERIWINKLE.with_alpha(0.35), 1.5 * dpr).blend(Blend::Lighter);
    surface.stroke_path(&circle, false, &ring);

    let tick = Stroke::solid(SLATE.with_alpha(0.35), dpr).blend(Blend::Lighter);
    for k in 0..RING_TICKS {
        let a = rot + k as f64 / RING_TICKS as f64 * TAU;
        surface.stroke_path(&[at(radius - 8.0, a), at(radius + 10.0, a)], false, &tick);
    }
}

/// `pts` is anchor, elbow, platform vertex on screen.
fn draw_arm(surface: &mut dyn Surface, dpr: f64, pts: [Point2; 3], color: Rgba) {
    let [b, e, p] = pts;

    let glow = Stroke::solid(color, 3.6 * dpr)
        .blend(Blend::Lighter)
        .glow(Glow {
            color: VIOLET.with_alpha(0.55),
            blur: 14.0 * dpr,
        });
    surface.stroke_path(&[b, e], false, &glow);
    surface.stroke_path(&[e, p], false, &glow);

    surface.stroke_path(&[b, e], false, &Stroke::solid(color, 2.2 * dpr));
    surface.stroke_path(&[e, p], false, &Stroke::solid(color, 2.0 * dpr));

    for (pt, r, core, halo) in [(b, 3.0, 0.28, 0.22), (e, 2.8, 0.30, 0.24), (p, 2.6, 0.30, 0.26)] {
        surface.fill_circle(pt, r * 1.8 * dpr, PERIWINKLE.with_alpha(halo), Blend::Lighter);
        surface.fill_circle(pt, r * dpr, INK.with_alpha(core), Blend::Normal);
    }
}

fn draw_reticle(surface: &mut dyn Surface, dpr: f64, (x, y): Point2) {
    let arm = RETICLE_HALF * dpr;
    let cross = Stroke::solid(PERIWINKLE.with_alpha(0.6), dpr).blend(Blend::Lighter);
    surface.stroke_path(&[(x - arm, y), (x + arm, y)], false, &cross);
    surface.stroke_path(&[(x, y - arm), (x, y + arm)], false, &cross);
    surface.fill_circle((x, y), 4.2 * dpr, VIOLET.with_alpha(0.95), Blend::Normal);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::effects::{NoJitter, RngJitter};
    use crate::render::recording::{Op, RecordingSurface};
    use crate::scene::params::BASE_RADIUS;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn session(step: f64) -> AnimationSession {
        let config = Config {
            clock_step: step,
            pixel_ratio: Some(1.0),
            ..Config::default()
        };
        AnimationSession::new(&config, (640.0, 360.0), Box::new(NoJitter))
    }

    #[test]
    fn clock_advances_by_the_injected_step() {
        let mut s = session(0.25);
        let mut surface = RecordingSurface::new(1280.0, 720.0);
        for _ in 0..4 {
            s.advance(&mut surface);
        }
        assert!((s.clock() - 1.0).abs() < 1e-12);
        assert_eq!(s.frames(), 4);
    }

    #[test]
    fn end_effector_starts_on_the_first_control_point() {
        let s = session(0.01);
        assert_eq!(s.end_effector_at(0.0), Point3::new(0.0, 0.0, -180.0));
    }

    #[test]
    fn layers_are_painted_back_to_front() {
        let mut s = session(0.01);
        let mut surface = RecordingSurface::new(1280.0, 720.0);
        s.advance(&mut surface);
        assert_eq!(
            surface.layers(),
            vec![
                Layer::Grid,
                Layer::Rings,
                Layer::Trail,
                Layer::Base,
                Layer::Arms,
                Layer::Platform,
                Layer::Reticle,
                Layer::Particles,
            ]
        );
        assert_eq!(surface.ops().first(), Some(&Op::Clear));
    }

    #[test]
    fn each_layer_issues_the_expected_draw_calls() {
        let mut s = session(0.01);
        let mut surface = RecordingSurface::new(1280.0, 720.0);
        s.advance(&mut surface);

        // 23 constant-x and 23 constant-y lines.
        assert_eq!(surface.strokes_in(Layer::Grid), 46);
        // Per ring: one circle and its ticks.
        assert_eq!(surface.strokes_in(Layer::Rings), 2 * (1 + RING_TICKS));
        assert_eq!(surface.strokes_in(Layer::Trail), 1);
        assert_eq!(surface.strokes_in(Layer::Base), 1);
        // Per arm: two glow segments, two crisp segments, three two-part joints.
        assert_eq!(surface.strokes_in(Layer::Arms), 3 * 4);
        assert_eq!(surface.circles_in(Layer::Arms), 3 * 6);
        assert_eq!(surface.strokes_in(Layer::Platform), 1);
        assert_eq!(surface.fills_in(Layer::Platform), 1);
        assert_eq!(surface.strokes_in(Layer::Reticle), 2);
        assert_eq!(surface.circles_in(Layer::Reticle), 1);
        assert_eq!(surface.circles_in(Layer::Particles), SPARK_COUNT);
    }

    #[test]
    fn arm_glow_pass_precedes_crisp_pass() {
        let mut s = session(0.01);
        let mut surface = RecordingSurface::new(1280.0, 720.0);
        s.advance(&mut surface);
        let arm_strokes = surface.strokes_of(Layer::Arms);
        assert!(arm_strokes[0].glow.is_some() && arm_strokes[0].blend == Blend::Lighter);
        assert!(arm_strokes[1].glow.is_some());
        assert!(arm_strokes[2].glow.is_none() && arm_strokes[2].blend == Blend::Normal);
        assert!((arm_strokes[2].width - 2.2).abs() < 1e-12);
        assert!((arm_strokes[3].width - 2.0).abs() < 1e-12);
    }

    #[test]
    fn grid_fades_from_the_centre_lines_outward() {
        let mut s = session(0.01);
        let mut surface = RecordingSurface::new(1280.0, 720.0);
        s.advance(&mut surface);
        let grid = surface.strokes_of(Layer::Grid);
        let alpha = |stroke: &Stroke| match &stroke.paint {
            Paint::Solid(c) => c.a,
            Paint::Linear(_) => panic!("grid lines are solid"),
        };

        for stroke in &grid {
            assert_eq!(stroke.blend, Blend::Screen);
            let a = alpha(stroke);
            assert!((0.06 - 1e-12..=0.18 + 1e-12).contains(&a), "alpha {}", a);
        }
        // Per direction the lines run from -half_extent to +half_extent; index 11 is c = 0.
        for centre in [11, 23 + 11] {
            assert!((alpha(&grid[centre]) - 0.18).abs() < 1e-12);
            assert!((alpha(&grid[centre - 11]) - 0.06).abs() < 1e-12);
            assert!((alpha(&grid[centre + 11]) - 0.06).abs() < 1e-12);
            assert!(alpha(&grid[centre]) > alpha(&grid[centre + 1]));
        }
    }

    #[test]
    fn rings_counter_rotate_with_the_clock() {
        let step = 0.5;
        let mut s = session(step);
        let mut surface = RecordingSurface::new(1280.0, 720.0);
        s.advance(&mut surface);
        let proj = Projector::new(1280.0, 720.0, 1.0);

        let tick_starts: Vec<Point2> = surface
            .ops_in(Layer::Rings)
            .into_iter()
            .filter_map(|op| match op {
                Op::Stroke { points, .. } if points.len() == 2 => Some(points[0]),
                _ => None,
            })
            .collect();
        assert_eq!(tick_starts.len(), 2 * RING_TICKS);

        for (k, ring) in RINGS.iter().enumerate() {
            let angle = step * ring.spin;
            let r = ring.radius - 8.0;
            let expected = proj
                .project(Point3::new(r * angle.cos(), r * angle.sin(), RING_Z))
                .xy();
            let got = tick_starts[k * RING_TICKS];
            assert!((got.0 - expected.0).abs() < 1e-9, "ring {}: {:?}", k, got);
            assert!((got.1 - expected.1).abs() < 1e-9, "ring {}: {:?}", k, got);
        }
        assert!(RINGS[0].spin > 0.0 && RINGS[1].spin < 0.0);
    }

    #[test]
    fn trail_is_an_additive_gradient_across_the_surface() {
        let mut s = session(0.01);
        let mut surface = RecordingSurface::new(1280.0, 720.0);
        s.advance(&mut surface);
        let trail = surface.strokes_of(Layer::Trail);
        let stroke = &trail[0];
        assert_eq!(stroke.blend, Blend::Lighter);
        assert!(stroke.glow.is_none());
        assert!((stroke.width - 3.2).abs() < 1e-12);
        let Paint::Linear(gradient) = &stroke.paint else {
            panic!("trail should use a linear gradient");
        };
        assert_eq!((gradient.x0, gradient.x1), (0.0, 1280.0));
        let offsets: Vec<f64> = gradient.stops.iter().map(|(o, _)| *o).collect();
        assert_eq!(offsets, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn trail_grows_one_point_per_frame_up_to_capacity() {
        let mut s = session(0.01);
        let mut surface = RecordingSurface::new(1280.0, 720.0);
        for frame in 1..=TRAIL_CAPACITY + 40 {
            s.advance(&mut surface);
            assert_eq!(s.trail().len(), frame.min(TRAIL_CAPACITY));
        }
    }

    #[test]
    fn trail_holds_the_projected_end_effector() {
        let mut s = session(0.01);
        let mut surface = RecordingSurface::new(1280.0, 720.0);
        let snap = s.advance(&mut surface);
        let last = *s.trail().iter().last().expect("one point after a frame");
        assert_eq!(last, snap.end_effector_screen.xy());
    }

    #[test]
    fn platform_is_a_rigid_triangle_around_the_end_effector() {
        for &t in &[0.0, 0.7, 3.3, 41.0] {
            let ee = Point3::new(12.0, -30.0, -190.0);
            let plat = platform_world(ee, orientation(t));
            let centroid = (plat[0] + plat[1] + plat[2]) * (1.0 / 3.0);
            assert!((centroid - ee).length() < 1e-9);
            let side = (130.0_f64) * 3.0_f64.sqrt();
            for i in 0..3 {
                assert!(((plat[i] - plat[(i + 1) % 3]).length() - side).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn orientation_stays_within_its_amplitudes() {
        for i in 0..1000 {
            let (roll, pitch, yaw) = orientation(i as f64 * 0.037);
            assert!(roll.abs() <= 0.25 && pitch.abs() <= 0.22 && yaw.abs() <= 0.35);
        }
    }

    #[test]
    fn elbow_offset_is_perpendicular_in_the_xy_plane() {
        let anchor = Point3::new(BASE_RADIUS, 0.0, -60.0);
        let vertex = Point3::new(40.0, 90.0, -200.0);
        for i in 0..3 {
            for &t in &[0.0, 0.4, 2.5] {
                let e = elbow(anchor, vertex, t, i);
                let mid = anchor.lerp(vertex, 0.55);
                let off = e - mid;
                let v = vertex - anchor;
                assert!((off.x * v.x + off.y * v.y).abs() < 1e-9);
                assert_eq!(off.z, 0.0);
                let expected = 30.0 + 9.0 * (t * 2.0 + i as f64 * 1.8).sin();
                assert!((off.x.hypot(off.y) - expected).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn degenerate_arm_does_not_divide_by_zero() {
        let p = Point3::new(5.0, 5.0, 5.0);
        let e = elbow(p, p, 0.0, 0);
        assert!(e.x.is_finite() && e.y.is_finite() && e.z.is_finite());
        assert_eq!(e, p);
    }

    #[test]
    fn sparks_chase_the_end_effector() {
        let config = Config {
            pixel_ratio: Some(1.0),
            ..Config::default()
        };
        let jitter = RngJitter(StdRng::seed_from_u64(11));
        let mut s = AnimationSession::new(&config, (0.0, 0.0), Box::new(jitter));
        let mut surface = RecordingSurface::new(1280.0, 720.0);
        let mut snap = s.advance(&mut surface);
        for _ in 0..120 {
            snap = s.advance(&mut surface);
        }
        let target = snap.end_effector_screen;
        let mean_dist: f64 = s
            .sparks()
            .sparks()
            .iter()
            .map(|sp| (sp.x - target.x).hypot(sp.y - target.y))
            .sum::<f64>()
            / s.sparks().len() as f64;
        assert!(mean_dist < 60.0, "sparks lag too far behind: {}", mean_dist);
    }

    #[test]
    fn pixel_ratio_defaults_to_surface_height_over_reference() {
        let config = Config::default();
        let mut s = AnimationSession::new(&config, (0.0, 0.0), Box::new(NoJitter));
        let mut surface = RecordingSurface::new(560.0, 280.0);
        s.advance(&mut surface);
        let reticle = surface.strokes_of(Layer::Reticle);
        assert!((reticle[0].width - 0.5).abs() < 1e-12);
    }

    #[test]
    fn independent_sessions_do_not_share_state() {
        let mut a = session(0.01);
        let b = session(0.01);
        let mut surface = RecordingSurface::new(640.0, 360.0);
        for _ in 0..10 {
            a.advance(&mut surface);
        }
        assert_eq!(a.frames(), 10);
        assert_eq!(b.frames(), 0);
        assert!(b.trail().is_empty());
    }
}
