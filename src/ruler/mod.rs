pub mod fling;
pub mod geometry;
pub mod gesture;
pub mod scroll;
pub mod snap;
pub mod view;
pub mod widget;

pub use fling::{AnimationSample, FlingAnimation, FlingBounds};
pub use geometry::{Geometry, TickHeights};
pub use gesture::{GestureInterpreter, GestureOutcome, GesturePhase, GestureSession};
pub use scroll::ScrollState;
pub use snap::{CorrectionAnimation, Easing, correction_delta};
pub use view::{LineKind, LineSegment, render};
pub use widget::{Ruler, RulerAction};
