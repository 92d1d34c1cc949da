use crate::config::{ConfigError, RulerConfig};
use crate::ruler::{
    CorrectionAnimation, FlingAnimation, FlingBounds, Geometry, GestureInterpreter,
    GestureOutcome, GesturePhase, LineSegment, ScrollState, TickHeights, correction_delta, view,
};
use std::time::Duration;

/// What the host has to do after handing an event to the ruler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RulerAction {
    pub should_redraw: bool,
    /// An animation is running; call [`Ruler::on_frame`] again on the next frame.
    pub wants_frame: bool,
}

impl RulerAction {
    pub fn new(should_redraw: bool, wants_frame: bool) -> Self {
        Self {
            should_redraw,
            wants_frame,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Animation {
    Fling(FlingAnimation),
    Correction(CorrectionAnimation),
}

#[derive(Debug, Clone, PartialEq)]
struct Running {
    animation: Animation,
    last_frame: Option<Duration>,
}

/// A horizontally scrolling ruler that always comes to rest on a tick.
///
/// The ruler never draws or schedules anything itself. Every entry point returns a
/// [`RulerAction`] telling the host whether to repaint and whether to keep delivering frames.
#[derive(Debug, Clone)]
pub struct Ruler {
    config: RulerConfig,
    state: ScrollState,
    heights: TickHeights,
    gestures: GestureInterpreter,
    running: Option<Running>,
}

impl Ruler {
    pub fn new(config: RulerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let initial = config
            .initial_value
            .unwrap_or(config.min_value + config.tick_count() / 2)
            .clamp(config.min_value, config.max_value);

        Ok(Self {
            state: ScrollState::new(initial),
            heights: TickHeights::resolve(&config, 0),
            gestures: GestureInterpreter::from_config(&config),
            running: None,
            config,
        })
    }

    /// Swaps in a new configuration, keeping the selected value where the new range allows.
    pub fn reconfigure(&mut self, config: RulerConfig) -> Result<RulerAction, ConfigError> {
        config.validate()?;
        self.cancel_animation();
        self.gestures = GestureInterpreter::from_config(&config);
        self.heights = TickHeights::resolve(&config, self.state.viewport_height);
        self.config = config;

        let geometry = self.geometry();
        self.state.selected_value = geometry.clamp_value(self.state.selected_value);
        self.state.layout(&geometry);
        Ok(RulerAction::new(true, false))
    }

    pub fn config(&self) -> &RulerConfig {
        &self.config
    }

    pub fn geometry(&self) -> Geometry {
        Geometry::new(&self.config, self.state.viewport_width)
    }

    pub fn state(&self) -> &ScrollState {
        &self.state
    }

    pub fn heights(&self) -> TickHeights {
        self.heights
    }

    pub fn offset(&self) -> i32 {
        self.state.offset
    }

    pub fn selected_value(&self) -> i32 {
        self.state.selected_value
    }

    pub fn phase(&self) -> GesturePhase {
        self.gestures.phase()
    }

    pub fn is_animating(&self) -> bool {
        self.running.is_some()
    }

    pub fn is_flinging(&self) -> bool {
        matches!(
            self.running,
            Some(Running {
                animation: Animation::Fling(_),
                ..
            })
        )
    }

    pub fn is_correcting(&self) -> bool {
        matches!(
            self.running,
            Some(Running {
                animation: Animation::Correction(_),
                ..
            })
        )
    }

    /// Nothing is moving and the offset sits exactly on the selected value's tick.
    pub fn is_settled(&self) -> bool {
        self.running.is_none()
            && !self.gestures.is_dragging()
            && self.state.is_snapped(&self.geometry())
    }

    pub fn set_selected_value(&mut self, value: i32) -> RulerAction {
        self.cancel_animation();
        self.gestures.abort_fling();
        let geometry = self.geometry();
        self.state.set_selected_value(&geometry, value);
        self.action()
    }

    pub fn on_size_changed(&mut self, width: i32, height: i32) -> RulerAction {
        let old_width = self.state.viewport_width;
        if self.state.resize(width, height) {
            log::debug!("viewport resized to {}x{}", width, height);
            self.heights = TickHeights::resolve(&self.config, self.state.viewport_height);
        }
        let width_changed = self.state.viewport_width != old_width;
        if width_changed {
            // Flings and corrections were planned against the old half width.
            self.cancel_animation();
            self.gestures.abort_fling();
        }
        if width_changed || (!self.gestures.is_dragging() && !self.is_animating()) {
            let geometry = self.geometry();
            self.state.layout(&geometry);
        }
        self.action()
    }

    pub fn on_pointer_down(&mut self, x: f64) -> RulerAction {
        let outcome = self.gestures.pointer_down(x);
        self.apply(outcome)
    }

    pub fn on_pointer_move(&mut self, x: f64) -> RulerAction {
        let outcome = self.gestures.pointer_move(x);
        self.apply(outcome)
    }

    pub fn on_pointer_up(&mut self, x: f64) -> RulerAction {
        let moved = self.on_pointer_move(x);
        let outcome = self.gestures.pointer_up();
        let released = self.apply(outcome);
        RulerAction::new(
            moved.should_redraw || released.should_redraw,
            released.wants_frame,
        )
    }

    pub fn on_pointer_cancel(&mut self) -> RulerAction {
        let outcome = self.gestures.pointer_cancel();
        self.apply(outcome)
    }

    /// `velocity` is the pointer's horizontal release velocity in px/s.
    pub fn on_fling(&mut self, velocity: f64) -> RulerAction {
        let outcome = self.gestures.fling(velocity);
        self.apply(outcome)
    }

    /// Advances the running animation to `frame_time`, a monotonic timestamp of the frame about to
    /// be drawn. Applies at most one scroll per call.
    pub fn on_frame(&mut self, frame_time: Duration) -> RulerAction {
        let Some(running) = self.running.as_mut() else {
            return self.action();
        };

        let dt = running
            .last_frame
            .map(|last| frame_time.saturating_sub(last))
            .unwrap_or(Duration::ZERO);
        running.last_frame = Some(frame_time);

        let geometry = Geometry::new(&self.config, self.state.viewport_width);
        let (sample, was_fling) = match &mut running.animation {
            Animation::Fling(fling) => (fling.advance(dt), true),
            Animation::Correction(correction) => (correction.advance(dt), false),
        };
        self.state.scroll_to(&geometry, sample.offset);

        if sample.finished {
            self.running = None;
            if was_fling {
                log::debug!("fling finished at {}", self.state.offset);
                self.gestures.fling_finished();
            }
            // Corrections repeat until the offset lands on the selected value's tick.
            self.start_correction(Some(frame_time));
        }
        self.action()
    }

    pub fn render(&self) -> Vec<LineSegment> {
        view::render(&self.state, &self.geometry(), &self.heights, &self.config)
    }

    fn apply(&mut self, outcome: GestureOutcome) -> RulerAction {
        match outcome {
            GestureOutcome::Ignored => {}
            GestureOutcome::Interrupt => self.cancel_animation(),
            GestureOutcome::ScrollBy(delta) => {
                let geometry = self.geometry();
                self.state.scroll_by(&geometry, delta);
            }
            GestureOutcome::Settle => self.start_correction(None),
            GestureOutcome::Fling(velocity) => self.start_fling(velocity),
        }
        self.action()
    }

    fn start_fling(&mut self, velocity: f64) {
        self.cancel_animation();
        let geometry = self.geometry();
        if geometry.is_degenerate() {
            self.gestures.abort_fling();
            return;
        }
        let fling = FlingAnimation::new(
            self.state.offset,
            velocity,
            FlingBounds::for_geometry(&geometry),
            self.config.fling_deceleration,
        );
        self.running = Some(Running {
            animation: Animation::Fling(fling),
            last_frame: None,
        });
    }

    fn start_correction(&mut self, last_frame: Option<Duration>) {
        self.cancel_animation();
        let geometry = self.geometry();
        if geometry.is_degenerate() {
            return;
        }
        let Some(delta) = correction_delta(&geometry, self.state.offset, self.state.selected_value)
        else {
            log::debug!("settled on {}", self.state.selected_value);
            return;
        };
        let correction = CorrectionAnimation::new(
            self.state.offset,
            delta,
            Duration::from_millis(self.config.snap_duration_ms),
            self.config.snap_easing,
        );
        self.running = Some(Running {
            animation: Animation::Correction(correction),
            last_frame,
        });
    }

    fn cancel_animation(&mut self) {
        if self.running.take().is_some() {
            log::debug!("animation cancelled at {}", self.state.offset);
        }
    }

    fn action(&mut self) -> RulerAction {
        RulerAction::new(self.state.take_redraw(), self.running.is_some())
    }
}
