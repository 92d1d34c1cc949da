use crate::config::RulerConfig;

pub const DEFAULT_LONG_TICK_HEIGHT: f64 = 50.0;
pub const DEFAULT_SHORT_TICK_HEIGHT: f64 = 40.0;

/// Mapping between tick indices, values and scroll offsets for one viewport width.
///
/// Offsets are measured from the content origin (tick 0) to the left edge of the
/// viewport, so the value under the centre marker sits `viewport_width / 2` further right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub min_value: i32,
    pub max_value: i32,
    pub tick_spacing: i32,
    pub long_tick_interval: u32,
    pub viewport_width: i32,
}

impl Geometry {
    pub fn new(config: &RulerConfig, viewport_width: i32) -> Self {
        Self {
            min_value: config.min_value,
            max_value: config.max_value,
            tick_spacing: config.tick_spacing,
            long_tick_interval: config.long_tick_interval,
            viewport_width: viewport_width.max(0),
        }
    }

    pub fn tick_count(&self) -> i32 {
        self.max_value - self.min_value
    }

    pub fn half_width(&self) -> i32 {
        self.viewport_width / 2
    }

    /// No size has been negotiated yet, so there is no visible range.
    pub fn is_degenerate(&self) -> bool {
        self.viewport_width == 0
    }

    pub fn min_offset(&self) -> i32 {
        -self.half_width()
    }

    pub fn max_offset(&self) -> i32 {
        self.tick_count() * self.tick_spacing - self.half_width()
    }

    pub fn clamp_offset(&self, offset: i32) -> i32 {
        offset.clamp(self.min_offset(), self.max_offset())
    }

    pub fn clamp_value(&self, value: i32) -> i32 {
        value.clamp(self.min_value, self.max_value)
    }

    pub fn offset_for_value(&self, value: i32) -> i32 {
        (self.clamp_value(value) - self.min_value) * self.tick_spacing - self.half_width()
    }

    /// Value of the tick nearest to the centre of the viewport. Halfway positions round away
    /// from the content origin.
    pub fn value_for_offset(&self, offset: i32) -> i32 {
        let position = f64::from(offset) + f64::from(self.half_width());
        let ticks = (position / f64::from(self.tick_spacing)).round() as i32;
        self.clamp_value(ticks.saturating_add(self.min_value))
    }

    pub fn tick_x(&self, index: i32) -> i32 {
        index * self.tick_spacing
    }

    pub fn is_long_tick(&self, index: i32) -> bool {
        index.rem_euclid(self.long_tick_interval as i32) == 0
    }

    pub fn ticks(&self) -> impl Iterator<Item = i32> {
        0..=self.tick_count()
    }
}

/// Resolved tick heights for the current viewport height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickHeights {
    pub long: f64,
    pub short: f64,
}

impl Default for TickHeights {
    fn default() -> Self {
        Self {
            long: DEFAULT_LONG_TICK_HEIGHT,
            short: DEFAULT_SHORT_TICK_HEIGHT,
        }
    }
}

impl TickHeights {
    /// Fixed heights from the config win; missing ones fill the available height, with the
    /// short tick `short_tick_inset` below the long one.
    pub fn resolve(config: &RulerConfig, viewport_height: i32) -> Self {
        let defaults = Self::default();
        let available = f64::from(viewport_height) - config.padding_top - config.padding_bottom;

        let long = config.long_tick_height.unwrap_or(if viewport_height > 0 {
            available.max(0.0)
        } else {
            defaults.long
        });
        let short = config.short_tick_height.unwrap_or(
            if viewport_height > 0 || config.long_tick_height.is_some() {
                (long - config.short_tick_inset).max(0.0)
            } else {
                defaults.short
            },
        );

        Self { long, short }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry() -> Geometry {
        Geometry::new(&RulerConfig::default(), 400)
    }

    #[test]
    fn test_offset_for_value_centres_the_tick() {
        let g = geometry();
        assert_eq!(g.offset_for_value(0), -200);
        assert_eq!(g.offset_for_value(155), 155 * 11 - 200);
        assert_eq!(g.offset_for_value(-40), -200);
        assert_eq!(g.offset_for_value(900), 1505);
    }

    #[test]
    fn test_value_round_trip() {
        let g = geometry();
        for v in g.min_value..=g.max_value {
            assert_eq!(g.value_for_offset(g.offset_for_value(v)), v);
        }
    }

    #[test]
    fn test_value_for_offset_rounds_to_nearest_tick() {
        let g = geometry();
        // (50 + 200) / 11 = 22.7
        assert_eq!(g.value_for_offset(50), 23);
        // (47 + 200) / 11 = 22.45
        assert_eq!(g.value_for_offset(47), 22);
        assert_eq!(g.value_for_offset(-1000), 0);
        assert_eq!(g.value_for_offset(100_000), 155);
    }

    #[test]
    fn test_value_for_offset_with_negative_minimum() {
        let config = RulerConfig {
            min_value: -20,
            max_value: 20,
            tick_spacing: 10,
            ..RulerConfig::default()
        };
        let g = Geometry::new(&config, 100);
        assert_eq!(g.offset_for_value(-20), -50);
        assert_eq!(g.offset_for_value(0), 150);
        assert_eq!(g.value_for_offset(150), 0);
        // halfway between -20 and -19 rounds away from the origin
        assert_eq!(g.value_for_offset(-45), -19);
    }

    #[test]
    fn test_offset_bounds() {
        let g = geometry();
        assert_eq!(g.min_offset(), -200);
        assert_eq!(g.max_offset(), 1505);
        assert_eq!(g.clamp_offset(-201), -200);
        assert_eq!(g.clamp_offset(2000), 1505);
        assert_eq!(g.clamp_offset(77), 77);
    }

    #[test]
    fn test_long_ticks() {
        let g = geometry();
        let long: Vec<i32> = g.ticks().filter(|&i| g.is_long_tick(i)).collect();
        assert_eq!(long, (0..=150).step_by(10).collect::<Vec<_>>());
        assert_eq!(g.ticks().count(), 156);
        assert_eq!(g.tick_x(3), 33);
    }

    #[test]
    fn test_degenerate_viewport() {
        let g = Geometry::new(&RulerConfig::default(), 0);
        assert!(g.is_degenerate());
        assert!(!geometry().is_degenerate());
    }

    #[test]
    fn test_tick_heights() {
        let config = RulerConfig::default();
        assert_eq!(TickHeights::resolve(&config, 0), TickHeights::default());
        assert_eq!(
            TickHeights::resolve(&config, 80),
            TickHeights {
                long: 80.0,
                short: 70.0
            }
        );

        let padded = RulerConfig {
            padding_top: 10.0,
            padding_bottom: 6.0,
            ..RulerConfig::default()
        };
        assert_eq!(TickHeights::resolve(&padded, 80).long, 64.0);

        let fixed = RulerConfig {
            long_tick_height: Some(30.0),
            ..RulerConfig::default()
        };
        assert_eq!(
            TickHeights::resolve(&fixed, 200),
            TickHeights {
                long: 30.0,
                short: 20.0
            }
        );
    }
}
