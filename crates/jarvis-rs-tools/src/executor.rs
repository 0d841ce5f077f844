//! Performs recognized actions on the host.

use crate::classifier::Action;
use crate::error::CommandError;
use crate::runner::{CommandSpec, HostProcessRunner, ProcessRunner};
use async_trait::async_trait;
use chrono::{DateTime, Local};
use jarvis_rs_config::CommandsConfig;
use log::{debug, info};

/// Executes a classified action and returns the reply text.
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    async fn execute(&self, action: Action) -> Result<String, CommandError>;
}

/// Source of the current local time.
pub type Clock = Box<dyn Fn() -> DateTime<Local> + Send + Sync>;

/// Launcher argv prefixes for the browser and the editor.
///
/// The browser URL is appended to the browser argv; the editor argv is used
/// as is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Launchers {
    pub browser: Vec<String>,
    pub editor: Vec<String>,
}

impl Launchers {
    /// Launchers for the platform this binary was built for.
    pub fn platform_default() -> Self {
        let (browser, editor): (&[&str], &[&str]) = if cfg!(windows) {
            (&["cmd", "/c", "start", ""], &["notepad"])
        } else if cfg!(target_os = "macos") {
            (&["open"], &["open", "-a", "TextEdit"])
        } else {
            (&["xdg-open"], &["gedit"])
        };
        Self {
            browser: browser.iter().map(|arg| arg.to_string()).collect(),
            editor: editor.iter().map(|arg| arg.to_string()).collect(),
        }
    }

    /// Platform defaults with any configured overrides applied.
    pub fn from_config(config: &CommandsConfig) -> Self {
        let mut launchers = Self::platform_default();
        if let Some(browser) = &config.browser {
            launchers.browser = browser.clone();
        }
        if let Some(editor) = &config.editor {
            launchers.editor = editor.clone();
        }
        launchers
    }
}

/// Executor backed by the host clock and a process runner.
pub struct SystemExecutor<R: ProcessRunner = HostProcessRunner> {
    runner: R,
    launchers: Launchers,
    browser_url: String,
    clock: Clock,
}

impl<R: ProcessRunner> SystemExecutor<R> {
    pub fn new(runner: R, config: &CommandsConfig) -> Self {
        Self {
            runner,
            launchers: Launchers::from_config(config),
            browser_url: config.browser_url.clone(),
            clock: Box::new(Local::now),
        }
    }

    /// Replace the wall clock.
    pub fn with_clock(
        mut self,
        clock: impl Fn() -> DateTime<Local> + Send + Sync + 'static,
    ) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn launchers(&self) -> &Launchers {
        &self.launchers
    }

    async fn launch(&self, argv: &[String], extra: Option<&str>) -> Result<(), CommandError> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| CommandError::InvalidCommand("empty launcher argv".to_string()))?;
        let command = self.runner.resolve(program)?;
        let spec = CommandSpec::new(command)
            .with_args(args.iter().cloned().chain(extra.map(str::to_string)));
        debug!(
            "launching program (program={}, args_len={})",
            program,
            spec.args.len()
        );
        self.runner.spawn(spec).await
    }
}

#[async_trait]
impl<R: ProcessRunner> CommandExecutor for SystemExecutor<R> {
    async fn execute(&self, action: Action) -> Result<String, CommandError> {
        info!("executing command (action={})", action);
        match action {
            Action::QueryTime => Ok((self.clock)().format("It is %H:%M:%S.").to_string()),
            Action::OpenBrowser => {
                self.launch(&self.launchers.browser, Some(self.browser_url.as_str()))
                    .await?;
                Ok("Opening browser.".to_string())
            }
            Action::OpenEditor => {
                self.launch(&self.launchers.editor, None).await?;
                Ok("Opening notepad.".to_string())
            }
        }
    }
}
