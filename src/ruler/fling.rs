//! Ballistic fling simulation.
//!
//! A fling is a value type: it is planned once from its start offset and velocity, and every
//! sample is a pure function of elapsed time. Restarting means building a new one.

use crate::ruler::Geometry;
use std::time::Duration;

/// How long an overscrolled fling takes to return to the nearest bound.
pub const SPRING_BACK_DURATION: Duration = Duration::from_millis(250);

/// Range a fling may come to rest in, plus how far it may overshoot before springing back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlingBounds {
    pub min: i32,
    pub max: i32,
    pub overscroll: i32,
}

impl FlingBounds {
    /// The upper bound stops one tick short of the scroll range's end.
    pub fn for_geometry(geometry: &Geometry) -> Self {
        let half = geometry.half_width();
        Self {
            min: -half,
            max: (geometry.tick_count() - 1) * geometry.tick_spacing - half,
            overscroll: geometry.viewport_width / 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationSample {
    pub offset: i32,
    pub finished: bool,
}

/// Motion under constant deceleration until the velocity reaches zero.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Glide {
    from: f64,
    velocity: f64,
    deceleration: f64,
}

impl Glide {
    fn duration(&self) -> f64 {
        self.velocity.abs() / self.deceleration
    }

    fn position(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, self.duration());
        self.from + self.velocity * t - self.velocity.signum() * self.deceleration * t * t / 2.0
    }

    fn velocity_at(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, self.duration());
        self.velocity - self.velocity.signum() * self.deceleration * t
    }

    fn end(&self) -> f64 {
        self.position(self.duration())
    }

    /// Time at which the glide passes `target`, if it gets there at all.
    fn time_to_reach(&self, target: f64) -> Option<f64> {
        let distance = (target - self.from) * self.velocity.signum();
        if distance < 0.0 {
            return None;
        }
        let speed = self.velocity.abs();
        let discriminant = speed * speed - 2.0 * self.deceleration * distance;
        (discriminant >= 0.0).then(|| (speed - discriminant.sqrt()) / self.deceleration)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Motion {
    Glide(Glide),
    /// Ease-out return to a bound after an overshoot.
    SpringBack { from: f64, to: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Segment {
    start: f64,
    duration: f64,
    motion: Motion,
}

impl Segment {
    fn end(&self) -> f64 {
        self.start + self.duration
    }

    fn position(&self, t: f64) -> f64 {
        let local = (t - self.start).clamp(0.0, self.duration);
        match self.motion {
            Motion::Glide(glide) => glide.position(local),
            Motion::SpringBack { from, to } => {
                let progress = if self.duration > 0.0 {
                    local / self.duration
                } else {
                    1.0
                };
                from + (to - from) * (1.0 - (1.0 - progress).powi(3))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlingAnimation {
    pub start_offset: i32,
    pub initial_velocity: f64,
    pub bounds: FlingBounds,
    segments: Vec<Segment>,
    elapsed: Duration,
}

impl FlingAnimation {
    /// Plans a fling from `start_offset` at `initial_velocity` px/s, slowing by `deceleration`
    /// px/s².
    pub fn new(
        start_offset: i32,
        initial_velocity: f64,
        bounds: FlingBounds,
        deceleration: f64,
    ) -> Self {
        let segments = Self::plan(start_offset, initial_velocity, bounds, deceleration);
        log::debug!(
            "fling from {} at {:.0}px/s, {} segment(s)",
            start_offset,
            initial_velocity,
            segments.len()
        );
        Self {
            start_offset,
            initial_velocity,
            bounds,
            segments,
            elapsed: Duration::ZERO,
        }
    }

    fn plan(start: i32, velocity: f64, bounds: FlingBounds, deceleration: f64) -> Vec<Segment> {
        let start = f64::from(start);
        let (min, max) = (f64::from(bounds.min), f64::from(bounds.max));
        let spring_back = SPRING_BACK_DURATION.as_secs_f64();

        if start < min || start > max {
            return vec![Segment {
                start: 0.0,
                duration: spring_back,
                motion: Motion::SpringBack {
                    from: start,
                    to: start.clamp(min, max),
                },
            }];
        }

        let glide = Glide {
            from: start,
            velocity,
            deceleration,
        };
        let end = glide.end();
        let edge = if end > max {
            max
        } else if end < min {
            min
        } else {
            return vec![Segment {
                start: 0.0,
                duration: glide.duration(),
                motion: Motion::Glide(glide),
            }];
        };

        let hit = glide.time_to_reach(edge).unwrap_or(glide.duration());
        let mut segments = vec![Segment {
            start: 0.0,
            duration: hit,
            motion: Motion::Glide(glide),
        }];

        let edge_velocity = glide.velocity_at(hit);
        let allowance = f64::from(bounds.overscroll.max(0));
        if allowance == 0.0 || edge_velocity == 0.0 {
            return segments;
        }

        // Brake harder than the glide when the natural run-out would exceed the allowance.
        let natural = edge_velocity * edge_velocity / (2.0 * deceleration);
        let overshoot_distance = natural.min(allowance);
        let overshoot = Glide {
            from: edge,
            velocity: edge_velocity,
            deceleration: edge_velocity * edge_velocity / (2.0 * overshoot_distance),
        };
        let overshoot = Segment {
            start: hit,
            duration: overshoot.duration(),
            motion: Motion::Glide(overshoot),
        };
        let peak = overshoot.position(overshoot.end());
        segments.push(overshoot);
        segments.push(Segment {
            start: overshoot.end(),
            duration: spring_back,
            motion: Motion::SpringBack {
                from: peak,
                to: edge,
            },
        });
        segments
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.segments.last().map(Segment::end).unwrap_or(0.0))
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration()
    }

    pub fn position_at(&self, elapsed: Duration) -> f64 {
        let t = elapsed.as_secs_f64();
        self.segments
            .iter()
            .rev()
            .find(|segment| segment.start <= t)
            .map(|segment| segment.position(t))
            .unwrap_or(f64::from(self.start_offset))
    }

    pub fn final_offset(&self) -> i32 {
        self.position_at(self.duration()).round() as i32
    }

    /// Moves the simulation forward by one frame's worth of time.
    pub fn advance(&mut self, dt: Duration) -> AnimationSample {
        self.elapsed = self.elapsed.saturating_add(dt);
        let finished = self.is_finished();
        let offset = if finished {
            self.final_offset()
        } else {
            self.position_at(self.elapsed).round() as i32
        };
        AnimationSample { offset, finished }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RulerConfig;

    const DECELERATION: f64 = 2000.0;

    fn bounds() -> FlingBounds {
        FlingBounds::for_geometry(&Geometry::new(&RulerConfig::default(), 400))
    }

    fn run(fling: &mut FlingAnimation) -> Vec<i32> {
        let mut samples = Vec::new();
        for _ in 0..1000 {
            let sample = fling.advance(Duration::from_millis(16));
            samples.push(sample.offset);
            if sample.finished {
                return samples;
            }
        }
        panic!("fling did not finish");
    }

    #[test]
    fn test_bounds_for_geometry() {
        assert_eq!(
            bounds(),
            FlingBounds {
                min: -200,
                max: 154 * 11 - 200,
                overscroll: 100,
            }
        );
    }

    #[test]
    fn test_free_glide_decelerates_and_stops() {
        let mut fling = FlingAnimation::new(0, 1000.0, bounds(), DECELERATION);
        // v² / 2a = 250px over v / a = 0.5s
        assert_eq!(fling.duration(), Duration::from_millis(500));
        assert_eq!(fling.final_offset(), 250);

        let samples = run(&mut fling);
        assert_eq!(*samples.last().unwrap(), 250);
        let steps: Vec<i32> = samples.windows(2).map(|w| w[1] - w[0]).collect();
        assert!(steps.iter().all(|&s| s >= 0));
        assert!(steps.first().unwrap() > steps.last().unwrap());
    }

    #[test]
    fn test_negative_velocity_moves_left() {
        let fling = FlingAnimation::new(500, -1000.0, bounds(), DECELERATION);
        assert_eq!(fling.final_offset(), 250);
        assert!(fling.position_at(Duration::from_millis(100)) < 500.0);
    }

    #[test]
    fn test_overshoot_is_bounded_and_springs_back() {
        let b = bounds();
        let mut fling = FlingAnimation::new(1000, 4000.0, b, DECELERATION);
        let samples = run(&mut fling);

        let peak = *samples.iter().max().unwrap();
        assert!(peak > b.max);
        assert!(peak <= b.max + b.overscroll);
        assert_eq!(*samples.last().unwrap(), b.max);
    }

    #[test]
    fn test_overshoot_at_lower_bound() {
        let b = bounds();
        let fling = FlingAnimation::new(0, -4000.0, b, DECELERATION);
        assert_eq!(fling.final_offset(), b.min);
        let lowest = (0..200)
            .map(|ms| fling.position_at(Duration::from_millis(ms * 5)))
            .fold(f64::INFINITY, f64::min);
        assert!(lowest >= f64::from(b.min - b.overscroll) - 0.5);
    }

    #[test]
    fn test_start_outside_bounds_springs_back() {
        let b = bounds();
        let fling = FlingAnimation::new(b.max + 11, 300.0, b, DECELERATION);
        assert_eq!(fling.duration(), SPRING_BACK_DURATION);
        assert_eq!(fling.final_offset(), b.max);
    }

    #[test]
    fn test_zero_velocity_finishes_immediately() {
        let mut fling = FlingAnimation::new(42, 0.0, bounds(), DECELERATION);
        let sample = fling.advance(Duration::ZERO);
        assert!(sample.finished);
        assert_eq!(sample.offset, 42);
    }

    #[test]
    fn test_samples_depend_only_on_elapsed_time() {
        let mut coarse = FlingAnimation::new(0, 1500.0, bounds(), DECELERATION);
        let mut fine = coarse.clone();
        coarse.advance(Duration::from_millis(100));
        for _ in 0..10 {
            fine.advance(Duration::from_millis(10));
        }
        assert_eq!(
            coarse.position_at(coarse.elapsed()),
            fine.position_at(fine.elapsed())
        );
    }
}
