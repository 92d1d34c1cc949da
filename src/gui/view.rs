use crate::config::RulerConfig;
use crate::gui::theme::ThemeColors;
use crate::ruler::{LineKind, LineSegment, Ruler};
use cairo::{Context, LineCap};
use palette::Srgba;

struct Stroke {
    color: Srgba<f64>,
    width: f64,
    cap: LineCap,
}

impl Stroke {
    fn for_kind(kind: LineKind, config: &RulerConfig, colors: &ThemeColors) -> Self {
        match kind {
            LineKind::LongTick => Self {
                color: colors.long_tick,
                width: config.tick_width,
                cap: LineCap::Butt,
            },
            LineKind::ShortTick => Self {
                color: colors.tick,
                width: config.tick_width,
                cap: LineCap::Butt,
            },
            LineKind::CenterMarker => Self {
                color: colors.marker,
                width: config.marker_width,
                cap: LineCap::Round,
            },
        }
    }

    fn draw(&self, cr: &Context, line: &LineSegment) -> Result<(), cairo::Error> {
        let (r, g, b, a) = self.color.into_components();
        cr.set_source_rgba(r, g, b, a);
        cr.set_line_width(self.width);
        cr.set_line_cap(self.cap);
        cr.move_to(line.x, line.y_start);
        cr.line_to(line.x, line.y_end);
        cr.stroke()
    }
}

/// Paints the ruler's lines, scrolled so the current offset is at the left edge.
pub fn draw(cr: &Context, ruler: &Ruler, colors: &ThemeColors) -> Result<(), cairo::Error> {
    let config = ruler.config();
    cr.save()?;
    cr.translate(-f64::from(ruler.offset()), 0.0);
    for line in ruler.render() {
        Stroke::for_kind(line.kind, config, colors).draw(cr, &line)?;
    }
    cr.restore()
}
