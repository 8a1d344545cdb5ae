//! Surface double that records draw calls instead of rasterizing them.

use super::{Blend, Layer, Point2, Stroke, Surface};
use crate::color::Rgba;

#[derive(Clone, Debug, PartialEq)]
pub enum Op {
    Clear,
    Layer(Layer),
    Stroke {
        points: Vec<Point2>,
        closed: bool,
        stroke: Stroke,
    },
    Fill {
        points: Vec<Point2>,
        color: Rgba,
        blend: Blend,
    },
    Circle {
        center: Point2,
        radius: f64,
        color: Rgba,
        blend: Blend,
    },
}

pub struct RecordingSurface {
    pub width: f64,
    pub height: f64,
    ops: Vec<Op>,
}

impl RecordingSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
        }
    }

    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    pub fn layers(&self) -> Vec<Layer> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Layer(l) => Some(*l),
                _ => None,
            })
            .collect()
    }

    /// Ops issued after `layer` began and before the next layer.
    pub fn ops_in(&self, layer: Layer) -> Vec<&Op> {
        let mut current = None;
        let mut out = Vec::new();
        for op in &self.ops {
            match op {
                Op::Layer(l) => current = Some(*l),
                other if current == Some(layer) => out.push(other),
                _ => {}
            }
        }
        out
    }

    pub fn strokes_of(&self, layer: Layer) -> Vec<Stroke> {
        self.ops_in(layer)
            .into_iter()
            .filter_map(|op| match op {
                Op::Stroke { stroke, .. } => Some(stroke.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn strokes_in(&self, layer: Layer) -> usize {
        self.strokes_of(layer).len()
    }

    pub fn fills_in(&self, layer: Layer) -> usize {
        self.ops_in(layer)
            .iter()
            .filter(|op| matches!(op, Op::Fill { .. }))
            .count()
    }

    pub fn circles_in(&self, layer: Layer) -> usize {
        self.ops_in(layer)
            .iter()
            .filter(|op| matches!(op, Op::Circle { .. }))
            .count()
    }
}

impl Surface for RecordingSurface {
    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn clear(&mut self) {
        self.ops.clear();
        self.ops.push(Op::Clear);
    }

    fn stroke_path(&mut self, points: &[Point2], closed: bool, stroke: &Stroke) {
        self.ops.push(Op::Stroke {
            points: points.to_vec(),
            closed,
            stroke: stroke.clone(),
        });
    }

    fn fill_polygon(&mut self, points: &[Point2], color: Rgba, blend: Blend) {
        self.ops.push(Op::Fill {
            points: points.to_vec(),
            color,
            blend,
        });
    }

    fn fill_circle(&mut self, center: Point2, radius: f64, color: Rgba, blend: Blend) {
        self.ops.push(Op::Circle {
            center,
            radius,
            color,
            blend,
        });
    }

    fn begin_layer(&mut self, layer: Layer) {
        self.ops.push(Op::Layer(layer));
    }
}
