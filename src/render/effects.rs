use std::collections::VecDeque;

use rand::Rng;

use super::Point2;

pub const TRAIL_CAPACITY: usize = 260;
pub const SPARK_COUNT: usize = 40;
/// Fraction of the remaining distance a spark closes each frame.
pub const SPARK_ATTRACTION: f64 = 0.08;
/// Peak-to-peak random wander per axis per frame, in surface pixels.
pub const SPARK_JITTER: f64 = 1.2;
pub const SPARK_LIFE_STEP: f64 = 0.02;

/// Source of uniform samples in `0.0..1.0` for particle noise.
pub trait Jitter {
    fn next_unit(&mut self) -> f64;
}

/// Adapts any `rand` generator.
pub struct RngJitter<R: Rng>(pub R);

impl<R: Rng> Jitter for RngJitter<R> {
    fn next_unit(&mut self) -> f64 {
        self.0.gen::<f64>()
    }
}

/// Always the midpoint, so jitter terms vanish.
#[cfg(test)]
pub struct NoJitter;

#[cfg(test)]
impl Jitter for NoJitter {
    fn next_unit(&mut self) -> f64 {
        0.5
    }
}

/// Most recent end-effector screen positions, oldest first.
#[derive(Clone, Debug)]
pub struct Trail {
    points: VecDeque<Point2>,
    capacity: usize,
}

impl Trail {
    pub fn new(capacity: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, p: Point2) {
        if self.capacity == 0 {
            return;
        }
        if self.points.len() == self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(p);
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn as_slice(&mut self) -> &[Point2] {
        self.points.make_contiguous()
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = &Point2> {
        self.points.iter()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spark {
    pub x: f64,
    pub y: f64,
    pub life: f64,
}

impl Spark {
    /// Pulsing radius; never negative.
    pub fn radius(&self, pixel_ratio: f64) -> f64 {
        (0.8 * pixel_ratio + 0.6 * (self.life * 8.0 + self.x * 0.01).sin()).max(0.0)
    }
}

/// Fixed swarm of sparks drawn toward a moving target. Sparks are never
/// spawned or retired after construction.
#[derive(Clone, Debug)]
pub struct SparkSwarm {
    sparks: Vec<Spark>,
}

impl SparkSwarm {
    pub fn new(count: usize, start: Point2, jitter: &mut dyn Jitter) -> Self {
        let sparks = (0..count)
            .map(|_| Spark {
                x: start.0,
                y: start.1,
                life: jitter.next_unit(),
            })
            .collect();
        Self { sparks }
    }

    pub fn update(&mut self, target: Point2, jitter: &mut dyn Jitter) {
        for s in &mut self.sparks {
            s.x += (target.0 - s.x) * SPARK_ATTRACTION + (jitter.next_unit() - 0.5) * SPARK_JITTER;
            s.y += (target.1 - s.y) * SPARK_ATTRACTION + (jitter.next_unit() - 0.5) * SPARK_JITTER;
            s.life += SPARK_LIFE_STEP;
        }
    }

    pub fn sparks(&self) -> &[Spark] {
        &self.sparks
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.sparks.len()
    }
}
