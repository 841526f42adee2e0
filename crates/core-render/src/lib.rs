//! Rendering: buffer layout, frame diffing and terminal command emission.
//!
//! Pipeline per redraw:
//! 1. `frame::layout` wraps the buffer rows (with prompt and continuation
//!    markers) at the terminal width into a `Frame`.
//! 2. Optional overlay lines (`overlay::completion_lines`) are appended.
//! 3. `RenderEngine::render` diffs against the previous frame and queues the
//!    minimal commands on a `Writer`.
//! 4. The caller flushes the `Writer` to the terminal in one write.
//!
//! Rendering never blocks and never reads input; it is pure compute followed
//! by one flush.

pub mod frame;
pub mod overlay;
pub mod render_engine;
pub mod style;
pub mod writer;

pub use frame::{DisplayLine, Frame, PromptSpec, ScreenPos, Span, layout};
pub use overlay::completion_lines;
pub use render_engine::{RenderEngine, RenderMetrics};
pub use style::{Style, parse_color};
pub use writer::{Command, Writer};
