use crate::ruler::{AnimationSample, Geometry};
use serde::Serialize;
use serde_with::DeserializeFromStr;
use std::time::Duration;
use strum::{Display as StrumDisplay, EnumIter, EnumString};

const VISCOUS_FLUID_SCALE: f64 = 8.0;

/// Interpolation curve of the snap animation.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    /// Slow start, quick middle, long soft landing.
    #[default]
    #[strum(serialize = "viscous", serialize = "viscous-fluid")]
    Viscous,
    #[strum(serialize = "linear")]
    Linear,
    #[strum(serialize = "ease-out", serialize = "easeout", serialize = "cubic")]
    EaseOut,
}

impl Easing {
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Viscous => viscous_fluid(t) / viscous_fluid(1.0),
            Self::Linear => t,
            Self::EaseOut => 1.0 - (1.0 - t).powi(3),
        }
    }
}

fn viscous_fluid(x: f64) -> f64 {
    let x = x * VISCOUS_FLUID_SCALE;
    if x < 1.0 {
        x - (1.0 - (-x).exp())
    } else {
        let start = (-1.0_f64).exp();
        start + (1.0 - (1.0 - x).exp()) * (1.0 - start)
    }
}

/// Distance the snap animation should move from `offset`, or `None` when already on the tick.
///
/// The deviation is measured against the tick of the already-derived `selected_value`. A
/// deviation of more than half a tick moves on to the adjacent tick; anything else, ties
/// included, moves back by the deviation.
pub fn correction_delta(geometry: &Geometry, offset: i32, selected_value: i32) -> Option<i32> {
    let target = geometry.offset_for_value(selected_value);
    let deviation = (target - offset).abs();
    if deviation == 0 {
        return None;
    }
    if deviation * 2 > geometry.tick_spacing {
        Some(geometry.tick_spacing - deviation)
    } else {
        Some(-deviation)
    }
}

/// Short eased scroll that carries the ruler onto a tick.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrectionAnimation {
    pub from_offset: i32,
    pub delta_offset: i32,
    pub duration: Duration,
    pub easing: Easing,
    elapsed: Duration,
}

impl CorrectionAnimation {
    pub fn new(from_offset: i32, delta_offset: i32, duration: Duration, easing: Easing) -> Self {
        log::debug!(
            "snap correction from {} by {} over {:?}",
            from_offset,
            delta_offset,
            duration
        );
        Self {
            from_offset,
            delta_offset,
            duration,
            easing,
            elapsed: Duration::ZERO,
        }
    }

    pub fn target(&self) -> i32 {
        self.from_offset + self.delta_offset
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    pub fn offset_at(&self, elapsed: Duration) -> i32 {
        if elapsed >= self.duration {
            return self.target();
        }
        let progress = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        let eased = self.easing.apply(progress);
        self.from_offset + (f64::from(self.delta_offset) * eased).round() as i32
    }

    pub fn advance(&mut self, dt: Duration) -> AnimationSample {
        self.elapsed = self.elapsed.saturating_add(dt);
        AnimationSample {
            offset: self.offset_at(self.elapsed),
            finished: self.is_finished(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RulerConfig;
    use strum::IntoEnumIterator;

    fn geometry(tick_spacing: i32) -> Geometry {
        let config = RulerConfig {
            tick_spacing,
            ..RulerConfig::default()
        };
        Geometry::new(&config, 400)
    }

    #[test]
    fn test_no_correction_on_tick() {
        let g = geometry(11);
        assert_eq!(correction_delta(&g, g.offset_for_value(40), 40), None);
    }

    #[test]
    fn test_small_deviation_moves_back() {
        let g = geometry(11);
        // value 22 sits at 42, offset 45 is 3 past it
        assert_eq!(correction_delta(&g, 45, 22), Some(-3));
        // value 23 sits at 53, offset 50 is 3 short of it
        assert_eq!(correction_delta(&g, 50, 23), Some(-3));
    }

    #[test]
    fn test_large_deviation_wraps_to_adjacent_tick() {
        let g = geometry(11);
        // value 22 sits at 42, offset 50 is 8 past it
        assert_eq!(correction_delta(&g, 50, 22), Some(3));
    }

    #[test]
    fn test_half_tick_deviation_takes_move_back_branch() {
        let g = geometry(10);
        // value 0 sits at -200, offset -195 is exactly half a tick away
        assert_eq!(correction_delta(&g, -195, 0), Some(-5));
        assert_eq!(correction_delta(&g, -194, 0), Some(4));
    }

    #[test]
    fn test_easing_endpoints() {
        for easing in Easing::iter() {
            assert_eq!(easing.apply(0.0), 0.0, "{easing}");
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-12, "{easing}");
            assert!(easing.apply(0.5) > 0.0 && easing.apply(0.5) < 1.0, "{easing}");
        }
    }

    #[test]
    fn test_easing_is_monotonic() {
        for easing in Easing::iter() {
            let samples: Vec<f64> = (0..=100).map(|i| easing.apply(i as f64 / 100.0)).collect();
            assert!(samples.windows(2).all(|w| w[1] >= w[0]), "{easing}");
        }
    }

    #[test]
    fn test_easing_deserialization() {
        let cases = vec![
            ("\"viscous\"", Easing::Viscous),
            ("\"Viscous\"", Easing::Viscous),
            ("\"viscous-fluid\"", Easing::Viscous),
            ("\"linear\"", Easing::Linear),
            ("\"LINEAR\"", Easing::Linear),
            ("\"ease-out\"", Easing::EaseOut),
            ("\"cubic\"", Easing::EaseOut),
        ];

        for (json, expected) in cases {
            let deserialized: Easing = serde_json::from_str(json).unwrap();
            assert_eq!(deserialized, expected);
        }
        assert!(serde_json::from_str::<Easing>("\"bouncy\"").is_err());
    }

    #[test]
    fn test_correction_animation_lands_exactly() {
        let mut animation =
            CorrectionAnimation::new(50, 3, Duration::from_millis(200), Easing::Viscous);
        let mut last = animation.advance(Duration::ZERO);
        assert_eq!(last.offset, 50);
        while !last.finished {
            let next = animation.advance(Duration::from_millis(16));
            assert!(next.offset >= last.offset);
            last = next;
        }
        assert_eq!(last.offset, 53);
        assert_eq!(animation.elapsed, Duration::from_millis(208));
    }

    #[test]
    fn test_zero_duration_correction_is_immediate() {
        let mut animation = CorrectionAnimation::new(10, -4, Duration::ZERO, Easing::Linear);
        let sample = animation.advance(Duration::ZERO);
        assert!(sample.finished);
        assert_eq!(sample.offset, 6);
    }
}
