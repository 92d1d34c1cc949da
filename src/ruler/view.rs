use crate::config::RulerConfig;
use crate::ruler::{Geometry, ScrollState, TickHeights};

/// Distance the centre marker reaches below the baseline.
const MARKER_OVERHANG: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineKind {
    LongTick,
    ShortTick,
    CenterMarker,
}

/// A vertical line in content coordinates. Draw it shifted left by the scroll offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    pub kind: LineKind,
    pub x: f64,
    /// Bottom end of the line.
    pub y_start: f64,
    /// Top end of the line.
    pub y_end: f64,
}

impl LineSegment {
    pub fn length(&self) -> f64 {
        (self.y_start - self.y_end).abs()
    }
}

/// Every tick of the range, bottom-aligned on the baseline, followed by the centre marker that
/// tracks the middle of the viewport.
pub fn render(
    state: &ScrollState,
    geometry: &Geometry,
    heights: &TickHeights,
    config: &RulerConfig,
) -> Vec<LineSegment> {
    if geometry.is_degenerate() {
        return Vec::new();
    }

    let baseline = f64::from(state.viewport_height) - config.padding_bottom;

    let ticks = geometry.ticks().map(|i| {
        let (kind, height) = if geometry.is_long_tick(i) {
            (LineKind::LongTick, heights.long)
        } else {
            (LineKind::ShortTick, heights.short)
        };
        LineSegment {
            kind,
            x: f64::from(geometry.tick_x(i)),
            y_start: baseline,
            y_end: baseline - height,
        }
    });

    let marker_bottom = baseline + MARKER_OVERHANG;
    let marker = LineSegment {
        kind: LineKind::CenterMarker,
        x: f64::from(geometry.half_width() + state.offset),
        y_start: marker_bottom,
        y_end: marker_bottom - config.center_marker_height,
    };

    ticks.chain(std::iter::once(marker)).collect()
}
