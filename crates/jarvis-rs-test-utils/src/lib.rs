//! Test helpers shared across Jarvis crates.

pub mod generator;
pub mod http;
pub mod memory;
pub mod tools;
pub mod voice;

pub use generator::{EchoGenerator, FailingGenerator, FixedGenerator, RecordingTransport};
pub use http::OneShotServer;
pub use memory::FailingStore;
pub use tools::StubExecutor;
pub use voice::{RecordingOutput, ScriptedInput};
