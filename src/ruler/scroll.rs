use crate::ruler::Geometry;

/// Scroll position of the ruler and the value it currently selects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollState {
    pub viewport_width: i32,
    pub viewport_height: i32,
    pub offset: i32,
    pub selected_value: i32,
    needs_redraw: bool,
}

impl ScrollState {
    pub fn new(selected_value: i32) -> Self {
        Self {
            viewport_width: 0,
            viewport_height: 0,
            offset: 0,
            selected_value,
            needs_redraw: true,
        }
    }

    /// Clamps `offset` into the scrollable range, stores it and re-derives the selected value.
    ///
    /// Returns whether anything observable changed. Deferred while the viewport is degenerate.
    pub fn scroll_to(&mut self, geometry: &Geometry, offset: i32) -> bool {
        if geometry.is_degenerate() {
            return false;
        }

        let offset = geometry.clamp_offset(offset);
        let value = geometry.value_for_offset(offset);
        if offset == self.offset && value == self.selected_value {
            return false;
        }

        log::trace!("scroll_to {} -> value {}", offset, value);
        self.offset = offset;
        self.selected_value = value;
        self.needs_redraw = true;
        true
    }

    pub fn scroll_by(&mut self, geometry: &Geometry, delta: i32) -> bool {
        self.scroll_to(geometry, self.offset.saturating_add(delta))
    }

    /// Stores `value` (clamped) as the intended selection and lays out the offset from it.
    pub fn set_selected_value(&mut self, geometry: &Geometry, value: i32) -> bool {
        let value = geometry.clamp_value(value);
        let changed = value != self.selected_value;
        self.selected_value = value;
        self.needs_redraw |= changed;
        self.layout(geometry) || changed
    }

    /// Derives the offset from the intended value, as a layout pass does after a size change or
    /// an external value request.
    pub fn layout(&mut self, geometry: &Geometry) -> bool {
        if geometry.is_degenerate() {
            return false;
        }
        self.selected_value = geometry.clamp_value(self.selected_value);
        self.scroll_to(geometry, geometry.offset_for_value(self.selected_value))
    }

    pub fn resize(&mut self, width: i32, height: i32) -> bool {
        let (width, height) = (width.max(0), height.max(0));
        let changed = width != self.viewport_width || height != self.viewport_height;
        self.viewport_width = width;
        self.viewport_height = height;
        self.needs_redraw |= changed;
        changed
    }

    /// Offset of the exact tick for the selected value.
    pub fn snapped_offset(&self, geometry: &Geometry) -> i32 {
        geometry.offset_for_value(self.selected_value)
    }

    pub fn is_snapped(&self, geometry: &Geometry) -> bool {
        self.offset == self.snapped_offset(geometry)
    }

    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.needs_redraw)
    }
}
