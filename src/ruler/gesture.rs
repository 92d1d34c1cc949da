use crate::config::RulerConfig;

/// Pointer bookkeeping while a finger or button is down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureSession {
    pub last_x: f64,
    /// Sub-pixel drag distance not yet applied to the offset.
    pub remainder: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GesturePhase {
    #[default]
    Idle,
    Dragging(GestureSession),
    Flinging,
}

/// What the ruler should do in response to a pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureOutcome {
    Ignored,
    /// Drop any running animation; the pointer owns the ruler now.
    Interrupt,
    ScrollBy(i32),
    /// The gesture is over and no fling follows; snap onto a tick.
    Settle,
    /// Start a fling with this offset velocity, in px/s.
    Fling(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct GestureInterpreter {
    phase: GesturePhase,
    min_fling_velocity: f64,
    max_fling_velocity: f64,
}

impl GestureInterpreter {
    pub fn new(min_fling_velocity: f64, max_fling_velocity: f64) -> Self {
        Self {
            phase: GesturePhase::Idle,
            min_fling_velocity: min_fling_velocity.abs(),
            max_fling_velocity: max_fling_velocity.abs().max(min_fling_velocity.abs()),
        }
    }

    pub fn from_config(config: &RulerConfig) -> Self {
        Self::new(config.min_fling_velocity, config.max_fling_velocity)
    }

    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, GesturePhase::Dragging(_))
    }

    pub fn pointer_down(&mut self, x: f64) -> GestureOutcome {
        log::debug!("pointer down at {:.1} (was {:?})", x, self.phase);
        self.phase = GesturePhase::Dragging(GestureSession {
            last_x: x,
            remainder: 0.0,
        });
        GestureOutcome::Interrupt
    }

    /// Dragging the content left (x decreasing) scrolls the offset forward.
    pub fn pointer_move(&mut self, x: f64) -> GestureOutcome {
        let GesturePhase::Dragging(session) = &mut self.phase else {
            return GestureOutcome::Ignored;
        };

        let distance = session.last_x - x + session.remainder;
        let whole = distance.trunc();
        session.last_x = x;
        session.remainder = distance - whole;

        if whole == 0.0 {
            GestureOutcome::Ignored
        } else {
            GestureOutcome::ScrollBy(whole as i32)
        }
    }

    pub fn pointer_up(&mut self) -> GestureOutcome {
        if !self.is_dragging() {
            return GestureOutcome::Ignored;
        }
        self.phase = GesturePhase::Idle;
        GestureOutcome::Settle
    }

    pub fn pointer_cancel(&mut self) -> GestureOutcome {
        self.pointer_up()
    }

    /// `velocity` is the pointer's horizontal velocity in px/s. Too slow a release is not a
    /// fling and leaves the phase untouched.
    pub fn fling(&mut self, velocity: f64) -> GestureOutcome {
        if !velocity.is_finite() || velocity.abs() < self.min_fling_velocity {
            return GestureOutcome::Ignored;
        }
        let velocity = velocity.clamp(-self.max_fling_velocity, self.max_fling_velocity);
        self.phase = GesturePhase::Flinging;
        GestureOutcome::Fling(-velocity / 2.0)
    }

    pub fn fling_finished(&mut self) -> GestureOutcome {
        if self.phase != GesturePhase::Flinging {
            return GestureOutcome::Ignored;
        }
        self.phase = GesturePhase::Idle;
        GestureOutcome::Settle
    }

    /// Forgets an in-flight fling without settling, e.g. when the value is set from outside.
    pub fn abort_fling(&mut self) {
        if self.phase == GesturePhase::Flinging {
            self.phase = GesturePhase::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interpreter() -> GestureInterpreter {
        GestureInterpreter::new(50.0, 8000.0)
    }

    #[test]
    fn test_drag_scrolls_opposite_to_pointer() {
        let mut gestures = interpreter();
        assert_eq!(gestures.pointer_down(300.0), GestureOutcome::Interrupt);
        assert_eq!(gestures.pointer_move(250.0), GestureOutcome::ScrollBy(50));
        assert_eq!(gestures.pointer_move(270.0), GestureOutcome::ScrollBy(-20));
        assert_eq!(gestures.pointer_up(), GestureOutcome::Settle);
        assert_eq!(gestures.phase(), GesturePhase::Idle);
    }

    #[test]
    fn test_sub_pixel_moves_accumulate() {
        let mut gestures = interpreter();
        gestures.pointer_down(100.0);
        assert_eq!(gestures.pointer_move(99.6), GestureOutcome::Ignored);
        assert_eq!(gestures.pointer_move(99.2), GestureOutcome::Ignored);
        assert_eq!(gestures.pointer_move(98.8), GestureOutcome::ScrollBy(1));
    }

    #[test]
    fn test_events_without_pointer_down_are_ignored() {
        let mut gestures = interpreter();
        assert_eq!(gestures.pointer_move(10.0), GestureOutcome::Ignored);
        assert_eq!(gestures.pointer_up(), GestureOutcome::Ignored);
        assert_eq!(gestures.pointer_cancel(), GestureOutcome::Ignored);
        assert_eq!(gestures.fling_finished(), GestureOutcome::Ignored);
    }

    #[test]
    fn test_fling_halves_and_inverts_velocity() {
        let mut gestures = interpreter();
        gestures.pointer_down(0.0);
        gestures.pointer_up();
        assert_eq!(gestures.fling(-3000.0), GestureOutcome::Fling(1500.0));
        assert_eq!(gestures.phase(), GesturePhase::Flinging);
        assert_eq!(gestures.fling_finished(), GestureOutcome::Settle);
        assert_eq!(gestures.phase(), GesturePhase::Idle);
    }

    #[test]
    fn test_fling_velocity_is_capped() {
        let mut gestures = interpreter();
        assert_eq!(gestures.fling(20_000.0), GestureOutcome::Fling(-4000.0));
    }

    #[test]
    fn test_slow_release_is_not_a_fling() {
        let mut gestures = interpreter();
        gestures.pointer_down(0.0);
        assert_eq!(gestures.fling(30.0), GestureOutcome::Ignored);
        assert!(gestures.is_dragging());
        assert_eq!(gestures.fling(f64::NAN), GestureOutcome::Ignored);
    }

    #[test]
    fn test_fling_before_release_ends_the_drag() {
        let mut gestures = interpreter();
        gestures.pointer_down(0.0);
        assert_eq!(gestures.fling(1000.0), GestureOutcome::Fling(-500.0));
        assert_eq!(gestures.pointer_up(), GestureOutcome::Ignored);
        assert_eq!(gestures.phase(), GesturePhase::Flinging);
    }

    #[test]
    fn test_pointer_down_interrupts_fling() {
        let mut gestures = interpreter();
        gestures.fling(1000.0);
        assert_eq!(gestures.pointer_down(5.0), GestureOutcome::Interrupt);
        assert!(gestures.is_dragging());
        assert_eq!(gestures.fling_finished(), GestureOutcome::Ignored);
    }
}
