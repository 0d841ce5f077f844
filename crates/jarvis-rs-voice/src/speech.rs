//! Text-to-speech through a host program.

use crate::VoiceOutput;
use crate::error::VoiceError;
use async_trait::async_trait;
use jarvis_rs_config::VoiceConfig;
use jarvis_rs_tools::{CommandError, CommandSpec, HostProcessRunner, ProcessRunner};
use log::{debug, info};
use std::path::{Path, PathBuf};

/// Words per minute used when nothing else is configured.
pub const DEFAULT_SPEECH_RATE: u32 = 180;

/// Programs probed when none is configured.
fn default_candidates() -> &'static [&'static str] {
    if cfg!(target_os = "macos") {
        &["say"]
    } else {
        &["espeak", "espeak-ng"]
    }
}

/// Speaks responses with `say` or `espeak`, waiting for each to finish.
pub struct SpeechOutput<R: ProcessRunner = HostProcessRunner> {
    runner: R,
    program: PathBuf,
    rate: u32,
}

impl<R: ProcessRunner> SpeechOutput<R> {
    /// Resolve the configured speech program, or the first platform default
    /// found on PATH.
    pub fn detect(runner: R, config: &VoiceConfig) -> Result<Self, VoiceError> {
        let candidates: Vec<&str> = match &config.speech_program {
            Some(program) => vec![program.as_str()],
            None => default_candidates().to_vec(),
        };
        for candidate in &candidates {
            match runner.resolve(candidate) {
                Ok(program) => {
                    info!(
                        "speech output initialized (program={}, rate={})",
                        program.display(),
                        config.rate
                    );
                    return Ok(Self {
                        runner,
                        program,
                        rate: config.rate,
                    });
                }
                Err(err) => debug!("speech program unavailable (candidate={candidate}, err={err})"),
            }
        }
        Err(VoiceError::NoSpeechProgram(candidates.join(", ")))
    }

    pub fn rate(&self) -> u32 {
        self.rate
    }

    /// Change the speaking rate in words per minute.
    pub fn set_rate(&mut self, rate: u32) {
        self.rate = rate;
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// `say` takes `-r`; the espeak family takes `-s`.
    fn rate_flag(&self) -> &'static str {
        let stem = self
            .program
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or_default();
        if stem == "say" { "-r" } else { "-s" }
    }
}

#[async_trait]
impl<R: ProcessRunner> VoiceOutput for SpeechOutput<R> {
    async fn speak(&mut self, text: &str) -> Result<(), VoiceError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(());
        }
        let spec = CommandSpec::new(&self.program).with_args([
            self.rate_flag().to_string(),
            self.rate.to_string(),
            "--".to_string(),
            text.to_string(),
        ]);
        let output = self.runner.run(spec).await?;
        if !output.success() {
            return Err(CommandError::ExecutionFailed(format!(
                "{} exited with {:?}: {}",
                self.program.display(),
                output.status_code,
                output.stderr.trim()
            ))
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_SPEECH_RATE, SpeechOutput};
    use crate::{VoiceError, VoiceOutput};
    use async_trait::async_trait;
    use jarvis_rs_config::VoiceConfig;
    use jarvis_rs_tools::{CommandError, CommandOutput, CommandSpec, ProcessRunner};
    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;
    use std::sync::Arc;

    #[derive(Clone)]
    struct Runner {
        available: Vec<&'static str>,
        status: i32,
        runs: Arc<Mutex<Vec<CommandSpec>>>,
    }

    impl Runner {
        fn with(available: Vec<&'static str>) -> Self {
            Self {
                available,
                status: 0,
                runs: Arc::default(),
            }
        }
    }

    #[async_trait]
    impl ProcessRunner for Runner {
        fn resolve(&self, program: &str) -> Result<PathBuf, CommandError> {
            if self.available.contains(&program) {
                Ok(PathBuf::from("/usr/bin").join(program))
            } else {
                Err(CommandError::ProgramNotFound(program.to_string()))
            }
        }

        async fn spawn(&self, _spec: CommandSpec) -> Result<(), CommandError> {
            Ok(())
        }

        async fn run(&self, spec: CommandSpec) -> Result<CommandOutput, CommandError> {
            self.runs.lock().push(spec);
            Ok(CommandOutput {
                status_code: Some(self.status),
                stdout: String::new(),
                stderr: "no audio device".to_string(),
            })
        }
    }

    fn voice(program: Option<&str>) -> VoiceConfig {
        VoiceConfig {
            speech_program: program.map(str::to_string),
            ..VoiceConfig::default()
        }
    }

    #[tokio::test]
    async fn speaks_trimmed_text_with_rate() {
        let runner = Runner::with(vec!["say"]);
        let mut speech = SpeechOutput::detect(runner.clone(), &voice(Some("say"))).expect("detect");
        assert_eq!(speech.rate(), DEFAULT_SPEECH_RATE);
        speech.set_rate(200);

        speech.speak("  hello  ").await.expect("speak");

        let runs = runner.runs.lock();
        assert_eq!(runs[0].command, PathBuf::from("/usr/bin/say"));
        assert_eq!(runs[0].args, vec!["-r", "200", "--", "hello"]);
    }

    #[tokio::test]
    async fn leading_dash_text_follows_option_terminator() {
        let runner = Runner::with(vec!["espeak"]);
        let mut speech =
            SpeechOutput::detect(runner.clone(), &voice(Some("espeak"))).expect("detect");

        speech.speak("- buy milk\n- call mom").await.expect("speak");

        let runs = runner.runs.lock();
        assert_eq!(
            runs[0].args,
            vec!["-s", "180", "--", "- buy milk\n- call mom"]
        );
    }

    #[tokio::test]
    async fn blank_text_is_not_spoken() {
        let runner = Runner::with(vec!["espeak"]);
        let mut speech =
            SpeechOutput::detect(runner.clone(), &voice(Some("espeak"))).expect("detect");
        speech.speak(" \n ").await.expect("speak");
        assert!(runner.runs.lock().is_empty());
    }

    #[tokio::test]
    async fn failed_speech_is_an_error() {
        let mut runner = Runner::with(vec!["espeak"]);
        runner.status = 1;
        let mut speech = SpeechOutput::detect(runner, &voice(Some("espeak"))).expect("detect");
        let err = speech.speak("hi").await.unwrap_err();
        assert!(err.to_string().contains("no audio device"));
    }

    #[test]
    fn missing_program_is_reported() {
        let result = SpeechOutput::detect(Runner::with(Vec::new()), &voice(Some("festival")));
        assert!(matches!(result, Err(VoiceError::NoSpeechProgram(tried)) if tried == "festival"));
    }
}
