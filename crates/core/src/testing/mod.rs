//! Mock implementations for testing.
//!
//! These mocks record every interaction so tests can assert on the exact
//! sequence of external effects a scenario produced, without a real ffmpeg
//! binary or Telegram connection.

mod mock_runner;
mod mock_transport;

pub use mock_runner::MockRunner;
pub use mock_transport::{MockTransport, RecordedReply};
