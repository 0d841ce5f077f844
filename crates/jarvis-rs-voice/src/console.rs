//! Line-oriented console adapters.

use crate::error::VoiceError;
use crate::{VoiceInput, VoiceOutput};
use async_trait::async_trait;
use std::io::{self, BufRead, BufReader, Stdin, Stdout, Write};

/// Reads one trimmed line per utterance after printing a prompt.
pub struct ConsoleInput<R, W> {
    reader: R,
    prompt: W,
}

impl ConsoleInput<BufReader<Stdin>, Stdout> {
    /// Read from stdin, prompt on stdout.
    pub fn stdio() -> Self {
        Self::new(BufReader::new(io::stdin()), io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsoleInput<R, W> {
    pub fn new(reader: R, prompt: W) -> Self {
        Self { reader, prompt }
    }
}

#[async_trait]
impl<R, W> VoiceInput for ConsoleInput<R, W>
where
    R: BufRead + Send,
    W: Write + Send,
{
    async fn listen(&mut self) -> Result<String, VoiceError> {
        write!(self.prompt, "You: ")?;
        self.prompt.flush()?;
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(VoiceError::Closed);
        }
        Ok(line.trim().to_string())
    }
}

/// Prints each response on its own line.
pub struct ConsoleOutput<W> {
    writer: W,
}

impl ConsoleOutput<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsoleOutput<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[async_trait]
impl<W: Write + Send> VoiceOutput for ConsoleOutput<W> {
    async fn speak(&mut self, text: &str) -> Result<(), VoiceError> {
        writeln!(self.writer, "Assistant: {text}")?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ConsoleInput, ConsoleOutput};
    use crate::{VoiceError, VoiceInput, VoiceOutput};
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    #[tokio::test]
    async fn console_input_trims_lines_and_reports_eof() {
        let mut prompt = Vec::new();
        let mut input = ConsoleInput::new(Cursor::new("  hello there \n\n"), &mut prompt);

        assert_eq!(input.listen().await.expect("first"), "hello there");
        assert_eq!(input.listen().await.expect("blank"), "");
        assert!(matches!(input.listen().await, Err(VoiceError::Closed)));
        drop(input);
        assert_eq!(String::from_utf8(prompt).expect("utf8"), "You: You: You: ");
    }

    #[tokio::test]
    async fn console_output_prefixes_responses() {
        let mut output = ConsoleOutput::new(Vec::new());
        output.speak("It is 10:00:00.").await.expect("speak");
        assert_eq!(
            String::from_utf8(output.into_inner()).expect("utf8"),
            "Assistant: It is 10:00:00.\n"
        );
    }
}
