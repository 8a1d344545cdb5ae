pub mod braille;
pub mod effects;
pub mod lifecycle;
pub mod session;

#[cfg(test)]
pub mod recording;

use crate::color::Rgba;

/// How a draw call combines with what is already on the surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Blend {
    /// Source-over.
    Normal,
    /// Additive ("lighter").
    Lighter,
    /// `1 - (1 - dst) * (1 - src)`.
    Screen,
}

/// Horizontal linear gradient between two surface x coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct Gradient {
    pub x0: f64,
    pub x1: f64,
    /// `(offset, color)` pairs with offsets ascending in `0.0..=1.0`.
    pub stops: Vec<(f64, Rgba)>,
}

impl Gradient {
    pub fn color_at(&self, x: f64) -> Rgba {
        let span = self.x1 - self.x0;
        let t = if span.abs() < f64::EPSILON {
            0.0
        } else {
            ((x - self.x0) / span).clamp(0.0, 1.0)
        };
        match self.stops.as_slice() {
            [] => Rgba::rgba(0, 0, 0, 0.0),
            [only] => only.1,
            stops => {
                if t <= stops[0].0 {
                    return stops[0].1;
                }
                for pair in stops.windows(2) {
                    let (o0, c0) = pair[0];
                    let (o1, c1) = pair[1];
                    if t <= o1 {
                        let local = if o1 > o0 { (t - o0) / (o1 - o0) } else { 1.0 };
                        return c0.mix(c1, local);
                    }
                }
                stops[stops.len() - 1].1
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
    Solid(Rgba),
    Linear(Gradient),
}

impl Paint {
    pub fn color_at(&self, x: f64) -> Rgba {
        match self {
            Paint::Solid(c) => *c,
            Paint::Linear(g) => g.color_at(x),
        }
    }
}

/// Soft halo drawn under a stroke.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Glow {
    pub color: Rgba,
    pub blur: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Stroke {
    pub paint: Paint,
    pub width: f64,
    pub blend: Blend,
    pub glow: Option<Glow>,
}

impl Stroke {
    pub fn solid(color: Rgba, width: f64) -> Self {
        Self {
            paint: Paint::Solid(color),
            width,
            blend: Blend::Normal,
            glow: None,
        }
    }

    pub fn blend(mut self, blend: Blend) -> Self {
        self.blend = blend;
        self
    }

    pub fn glow(mut self, glow: Glow) -> Self {
        self.glow = Some(glow);
        self
    }
}

/// Back-to-front drawing groups of one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Layer {
    Grid,
    Rings,
    Trail,
    Base,
    Arms,
    Platform,
    Reticle,
    Particles,
}

pub type Point2 = (f64, f64);

/// A 2D raster the frame renderer paints onto. Coordinates are surface pixels,
/// origin top-left, y down.
pub trait Surface {
    fn width(&self) -> f64;
    fn height(&self) -> f64;
    fn clear(&mut self);
    /// Open or closed polyline. Fewer than two points draws nothing.
    fn stroke_path(&mut self, points: &[Point2], closed: bool, stroke: &Stroke);
    fn fill_polygon(&mut self, points: &[Point2], color: Rgba, blend: Blend);
    fn fill_circle(&mut self, center: Point2, radius: f64, color: Rgba, blend: Blend);
    /// Marks the start of a drawing group. Rasters may ignore it.
    fn begin_layer(&mut self, _layer: Layer) {}

    fn is_drawable(&self) -> bool {
        self.width() >= 1.0 && self.height() >= 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gradient_interpolates_between_stops_and_clamps_outside() {
        let g = Gradient {
            x0: 0.0,
            x1: 200.0,
            stops: vec![
                (0.0, Rgba::rgba(88, 101, 242, 0.12)),
                (0.5, Rgba::rgba(122, 92, 255, 0.28)),
                (1.0, Rgba::rgba(122, 92, 255, 0.08)),
            ],
        };
        assert_eq!(g.color_at(-50.0), Rgba::rgba(88, 101, 242, 0.12));
        assert_eq!(g.color_at(100.0), Rgba::rgba(122, 92, 255, 0.28));
        assert!((g.color_at(150.0).a - 0.18).abs() < 1e-9);
        assert_eq!(g.color_at(400.0), Rgba::rgba(122, 92, 255, 0.08));
    }

    #[test]
    fn layers_order_back_to_front() {
        assert!(Layer::Grid < Layer::Rings);
        assert!(Layer::Arms < Layer::Platform);
        assert!(Layer::Reticle < Layer::Particles);
    }
}
