use ratatui::style::Color;

/// An sRGB color with straight (non-premultiplied) alpha in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }

    /// Channels as floats in `0.0..=1.0`, alpha untouched.
    pub fn channels(&self) -> [f64; 3] {
        [
            self.r as f64 / 255.0,
            self.g as f64 / 255.0,
            self.b as f64 / 255.0,
        ]
    }

    pub fn from_channels(c: [f64; 3]) -> Self {
        let q = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::rgb(q(c[0]), q(c[1]), q(c[2]))
    }

    /// Component-wise interpolation, alpha included.
    pub fn mix(self, other: Rgba, t: f64) -> Rgba {
        if t <= 0.0 {
            return self;
        }
        if t >= 1.0 {
            return other;
        }
        let l = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgba {
            r: l(self.r, other.r),
            g: l(self.g, other.g),
            b: l(self.b, other.b),
            a: self.a + (other.a - self.a) * t,
        }
    }
}

impl From<Rgba> for Color {
    fn from(c: Rgba) -> Color {
        Color::Rgb(c.r, c.g, c.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mix_interpolates_channels_and_alpha() {
        let a = Rgba::rgba(88, 101, 242, 0.12);
        let b = Rgba::rgba(122, 92, 255, 0.28);
        assert_eq!(a.mix(b, 0.0), a);
        assert_eq!(a.mix(b, 1.0), b);
        let m = a.mix(b, 0.5);
        assert_eq!((m.r, m.g, m.b), (105, 97, 249));
        assert!((m.a - 0.2).abs() < 1e-12);
    }

    #[test]
    fn channel_round_trip_clamps() {
        let c = Rgba::from_channels([1.4, 0.5, -0.2]);
        assert_eq!((c.r, c.g, c.b), (255, 128, 0));
        assert_eq!(Color::from(c), Color::Rgb(255, 128, 0));
    }
}
