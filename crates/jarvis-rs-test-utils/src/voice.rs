use async_trait::async_trait;
use jarvis_rs_voice::{VoiceError, VoiceInput, VoiceOutput};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// Input that yields queued lines, then reports the stream closed.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    lines: VecDeque<String>,
}

impl ScriptedInput {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

#[async_trait]
impl VoiceInput for ScriptedInput {
    async fn listen(&mut self) -> Result<String, VoiceError> {
        self.lines.pop_front().ok_or(VoiceError::Closed)
    }
}

/// Output that keeps everything spoken.
#[derive(Debug, Clone, Default)]
pub struct RecordingOutput {
    spoken: Arc<Mutex<Vec<String>>>,
}

impl RecordingOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().clone()
    }
}

#[async_trait]
impl VoiceOutput for RecordingOutput {
    async fn speak(&mut self, text: &str) -> Result<(), VoiceError> {
        self.spoken.lock().push(text.to_string());
        Ok(())
    }
}
