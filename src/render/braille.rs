use std::collections::HashMap;

use ratatui::prelude::*;

use super::{Blend, Paint, Point2, Stroke, Surface};
use crate::color::Rgba;

/// Glow halo strength relative to the shadow color's own alpha.
const GLOW_FALLOFF: f64 = 0.5;

fn braille_bit(sub_x: usize, sub_y: usize) -> u8 {
    match (sub_x, sub_y) {
        (0, 0) => 0x01,
        (0, 1) => 0x02,
        (0, 2) => 0x04,
        (0, 3) => 0x40,
        (1, 0) => 0x08,
        (1, 1) => 0x10,
        (1, 2) => 0x20,
        (1, 3) => 0x80,
        _ => 0,
    }
}

fn line_dots(x0: i32, y0: i32, x1: i32, y1: i32) -> Vec<(i32, i32)> {
    let mut dots = Vec::new();
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut cx, mut cy) = (x0, y0);
    loop {
        dots.push((cx, cy));
        if cx == x1 && cy == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            cx += sx;
        }
        if e2 <= dx {
            err += dx;
            cy += sy;
        }
    }
    dots
}

/// Liang-Barsky: the part of `a -> b` inside the box `min..=max`, if any.
/// Segments with non-finite endpoints are dropped.
fn clip_segment(a: Point2, b: Point2, min: Point2, max: Point2) -> Option<(Point2, Point2)> {
    if ![a.0, a.1, b.0, b.1].iter().all(|v| v.is_finite()) {
        return None;
    }
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
    for (p, q) in [
        (-dx, a.0 - min.0),
        (dx, max.0 - a.0),
        (-dy, a.1 - min.1),
        (dy, max.1 - a.1),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }
    let start = if t0 > 0.0 { (a.0 + t0 * dx, a.1 + t0 * dy) } else { a };
    let end = if t1 < 1.0 { (a.0 + t1 * dx, a.1 + t1 * dy) } else { b };
    Some((start, end))
}

fn composite(dst: [f64; 3], src: Rgba, blend: Blend) -> [f64; 3] {
    let s = src.channels();
    let a = src.a.clamp(0.0, 1.0);
    std::array::from_fn(|i| match blend {
        Blend::Normal => dst[i] * (1.0 - a) + s[i] * a,
        Blend::Lighter => dst[i] + s[i] * a,
        Blend::Screen => 1.0 - (1.0 - dst[i]) * (1.0 - s[i] * a),
    })
}

/// Dots touched by one draw call, keyed by cell, with the color of the last dot.
type DotMap = HashMap<(usize, usize), (u8, Rgba)>;

/// Terminal raster: every cell is a 2x4 block of braille dots sharing one
/// foreground color.
pub struct BrailleSurface {
    cols: usize,
    rows: usize,
    bits: Vec<u8>,
    light: Vec<[f64; 3]>,
    background: Rgba,
}

impl BrailleSurface {
    pub fn new(cols: usize, rows: usize, background: Rgba) -> Self {
        let mut s = Self {
            cols: 0,
            rows: 0,
            bits: Vec::new(),
            light: Vec::new(),
            background,
        };
        s.resize(cols, rows);
        s
    }

    #[cfg(test)]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[cfg(test)]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Reallocates and clears when the cell size changes.
    pub fn resize(&mut self, cols: usize, rows: usize) {
        if cols == self.cols && rows == self.rows && !self.bits.is_empty() {
            return;
        }
        self.cols = cols;
        self.rows = rows;
        self.bits = vec![0; cols * rows];
        self.light = vec![self.background.channels(); cols * rows];
    }

    /// Dot bits of one cell, for inspection.
    #[cfg(test)]
    pub fn cell_bits(&self, col: usize, row: usize) -> u8 {
        if col < self.cols && row < self.rows {
            self.bits[row * self.cols + col]
        } else {
            0
        }
    }

    #[cfg(test)]
    pub fn lit_dots(&self) -> u32 {
        self.bits.iter().map(|b| b.count_ones()).sum()
    }

    fn set_dot(&self, map: &mut DotMap, x: i32, y: i32, color: Rgba) {
        let (w, h) = ((self.cols * 2) as i32, (self.rows * 4) as i32);
        if x < 0 || y < 0 || x >= w || y >= h {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        let entry = map.entry((x / 2, y / 4)).or_insert((0, color));
        entry.0 |= braille_bit(x % 2, y % 4);
        entry.1 = color;
    }

    /// Disc of dots of radius `r`, or a single dot when the pen is thinner than a dot.
    /// Only the part of the disc on the raster is visited.
    fn stamp(&self, map: &mut DotMap, x: i32, y: i32, r: f64, color: Rgba) {
        if r < 1.0 {
            self.set_dot(map, x, y, color);
            return;
        }
        let (w, h) = ((self.cols * 2) as i32, (self.rows * 4) as i32);
        let ri = r.ceil() as i32;
        for dy in (-ri).max(-y)..=ri.min(h - 1 - y) {
            for dx in (-ri).max(-x)..=ri.min(w - 1 - x) {
                if ((dx * dx + dy * dy) as f64) <= r * r {
                    self.set_dot(map, x + dx, y + dy, color);
                }
            }
        }
    }

    fn write_layer(&mut self, map: &DotMap, blend: Blend) {
        for (&(cx, cy), &(bits, color)) in map {
            if cx < self.cols && cy < self.rows && bits != 0 {
                let idx = cy * self.cols + cx;
                self.bits[idx] |= bits;
                self.light[idx] = composite(self.light[idx], color, blend);
            }
        }
    }

    /// Walks each segment after clipping it to the raster grown by the pen radius.
    /// A pen wider than the raster floods it, so the radius is capped there.
    fn trace(
        &self,
        map: &mut DotMap,
        points: &[Point2],
        closed: bool,
        radius: f64,
        paint: &Paint,
        alpha_scale: f64,
    ) {
        let r = radius.min(self.width() + self.height());
        let (min, max) = ((-r, -r), (self.width() + r, self.height() + r));
        let segment_count = if closed { points.len() } else { points.len() - 1 };
        for i in 0..segment_count {
            let a = points[i];
            let b = points[(i + 1) % points.len()];
            let Some(((ax, ay), (bx, by))) = clip_segment(a, b, min, max) else {
                continue;
            };
            let dots = line_dots(
                ax.floor() as i32,
                ay.floor() as i32,
                bx.floor() as i32,
                by.floor() as i32,
            );
            for (px, py) in dots {
                let c = paint.color_at(px as f64 + 0.5);
                self.stamp(map, px, py, r, c.with_alpha(c.a * alpha_scale));
            }
        }
    }

    pub fn to_lines(&self) -> Vec<Line<'static>> {
        let bg = Color::from(self.background);
        (0..self.rows)
            .map(|row| {
                let spans: Vec<Span<'static>> = (0..self.cols)
                    .map(|col| {
                        let idx = row * self.cols + col;
                        let bits = self.bits[idx];
                        if bits == 0 {
                            Span::styled(" ", Style::default().bg(bg))
                        } else {
                            let ch = char::from_u32(0x2800 + bits as u32).unwrap_or(' ');
                            let fg = Color::from(Rgba::from_channels(self.light[idx]));
                            Span::styled(String::from(ch), Style::default().fg(fg).bg(bg))
                        }
                    })
                    .collect();
                Line::from(spans)
            })
            .collect()
    }
}

impl Surface for BrailleSurface {
    fn width(&self) -> f64 {
        (self.cols * 2) as f64
    }

    fn height(&self) -> f64 {
        (self.rows * 4) as f64
    }

    fn clear(&mut self) {
        self.bits.fill(0);
        self.light.fill(self.background.channels());
    }

    fn stroke_path(&mut self, points: &[Point2], closed: bool, stroke: &Stroke) {
        if points.len() < 2 {
            return;
        }
        if let Some(glow) = stroke.glow {
            let mut halo = DotMap::new();
            let paint = Paint::Solid(glow.color);
            let radius = (stroke.width + glow.blur) / 2.0;
            self.trace(&mut halo, points, closed, radius, &paint, GLOW_FALLOFF);
            self.write_layer(&halo, Blend::Lighter);
        }
        let mut map = DotMap::new();
        self.trace(&mut map, points, closed, stroke.width / 2.0, &stroke.paint, 1.0);
        self.write_layer(&map, stroke.blend);
    }

    fn fill_polygon(&mut self, points: &[Point2], color: Rgba, blend: Blend) {
        if points.len() < 3 {
            return;
        }
        let min_x = points.iter().map(|p| p.0).fold(f64::INFINITY, f64::min).floor() as i32;
        let max_x = points.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max).ceil() as i32;
        let min_y = points.iter().map(|p| p.1).fold(f64::INFINITY, f64::min).floor() as i32;
        let max_y = points.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max).ceil() as i32;

        let mut map = DotMap::new();
        for y in min_y.max(0)..=max_y.min(self.height() as i32 - 1) {
            for x in min_x.max(0)..=max_x.min(self.width() as i32 - 1) {
                if contains(points, (x as f64 + 0.5, y as f64 + 0.5)) {
                    self.set_dot(&mut map, x, y, color);
                }
            }
        }
        self.write_layer(&map, blend);
    }

    fn fill_circle(&mut self, center: Point2, radius: f64, color: Rgba, blend: Blend) {
        if radius <= 0.0 || !(center.0.is_finite() && center.1.is_finite()) {
            return;
        }
        let x_lo = (center.0 - radius).floor().max(0.0) as i32;
        let x_hi = (center.0 + radius).ceil().min(self.width() - 1.0) as i32;
        let y_lo = (center.1 - radius).floor().max(0.0) as i32;
        let y_hi = (center.1 + radius).ceil().min(self.height() - 1.0) as i32;

        let mut map = DotMap::new();
        for y in y_lo..=y_hi {
            for x in x_lo..=x_hi {
                let px = x as f64 + 0.5 - center.0;
                let py = y as f64 + 0.5 - center.1;
                if px * px + py * py <= radius * radius {
                    self.set_dot(&mut map, x, y, color);
                }
            }
        }
        if map.is_empty() {
            self.set_dot(&mut map, center.0.floor() as i32, center.1.floor() as i32, color);
        }
        self.write_layer(&map, blend);
    }
}

/// Even-odd point-in-polygon.
fn contains(poly: &[Point2], (x, y): Point2) -> bool {
    let mut inside = false;
    let mut j = poly.len() - 1;
    for i in 0..poly.len() {
        let (xi, yi) = poly[i];
        let (xj, yj) = poly[j];
        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}
