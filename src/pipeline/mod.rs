// Event pipeline — routes change events to detectors and owns the
// swallow-and-log error boundary around dispatch.

pub mod handler;
pub mod stream;

pub use handler::{decide, handle_event, Outcome};
pub use stream::{run_stream, StreamStats};
