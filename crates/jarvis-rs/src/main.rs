//! Command-line entry point for the Jarvis assistant.

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use jarvis_rs::config::{
    AssistantConfig, GeneratorBackend, LayeredConfigOptions, VoiceOutputMode,
};
use jarvis_rs::core::{Assistant, Brain, build_generator};
use jarvis_rs::memory::MemoryService;
use jarvis_rs::tools::{HostProcessRunner, SystemExecutor};
use jarvis_rs::voice::{ConsoleInput, ConsoleOutput, SpeechOutput, VoiceOutput};
use log::{debug, info, warn};
use std::path::PathBuf;

/// Command-line options for the assistant.
#[derive(Debug, Parser)]
#[command(name = "jarvis", version, about)]
struct Cli {
    /// Extra jarvis.json5 layer applied over the discovered ones
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Override the memory file location
    #[arg(long, global = true)]
    memory_file: Option<PathBuf>,
    /// Override the generation backend
    #[arg(long, global = true, value_enum)]
    backend: Option<BackendArg>,
    /// Override the model name
    #[arg(long, global = true)]
    model: Option<String>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
enum Command {
    /// Interactive session (default)
    Chat,
    /// Answer a single utterance and exit
    Ask {
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// List saved notes
    Notes,
    /// Show recent conversation records
    History {
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
enum BackendArg {
    Ollama,
    Openai,
}

impl From<BackendArg> for GeneratorBackend {
    fn from(value: BackendArg) -> Self {
        match value {
            BackendArg::Ollama => GeneratorBackend::Ollama,
            BackendArg::Openai => GeneratorBackend::OpenAi,
        }
    }
}

/// Entry point for the Jarvis CLI.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    jarvis_rs::init_logging();

    let cli = Cli::parse();
    info!(
        "starting jarvis (config_set={}, memory_file_set={}, backend={:?}, model_set={})",
        cli.config.is_some(),
        cli.memory_file.is_some(),
        cli.backend,
        cli.model.is_some()
    );
    let config = load_config(&cli)?;

    match cli.command.unwrap_or(Command::Chat) {
        Command::Chat => chat(config).await,
        Command::Ask { text } => {
            let mut assistant = Assistant::new(build_brain(config)?);
            let response = assistant
                .respond(&text.join(" "))
                .await
                .context("failed to answer")?;
            println!("{response}");
            Ok(())
        }
        Command::Notes => {
            let memory = open_memory(&config)?;
            let notes = memory.list_notes();
            if notes.is_empty() {
                println!("No saved memory yet.");
            }
            for note in notes {
                println!("- {note}");
            }
            Ok(())
        }
        Command::History { limit } => {
            let memory = open_memory(&config)?;
            for record in memory.recent_history(limit) {
                println!("{}: {}", record.role, record.message);
            }
            Ok(())
        }
    }
}

/// Load the layered config and apply command-line overrides.
fn load_config(cli: &Cli) -> anyhow::Result<AssistantConfig> {
    let cwd = std::env::current_dir().context("failed to resolve current working directory")?;
    let mut options = LayeredConfigOptions::new(&cwd);
    if let Some(path) = &cli.config {
        options = options.with_runtime_path(path);
    }
    let layered =
        AssistantConfig::load_layered_with_options(options).context("failed to load config")?;
    debug!("layered config loaded (layers={})", layered.layers.len());
    let mut config = layered.config;
    apply_overrides(&mut config, cli);
    Ok(config)
}

fn apply_overrides(config: &mut AssistantConfig, cli: &Cli) {
    if let Some(path) = &cli.memory_file {
        config.memory_file = path.clone();
    }
    if let Some(backend) = cli.backend {
        let backend = GeneratorBackend::from(backend);
        if backend != config.generator.backend {
            config.generator.base_url = None;
            config.generator.model = None;
        }
        config.generator.backend = backend;
    }
    if let Some(model) = &cli.model {
        config.generator.model = Some(model.clone());
    }
}

fn open_memory(config: &AssistantConfig) -> anyhow::Result<MemoryService> {
    MemoryService::open(&config.memory_file).with_context(|| {
        format!(
            "failed to open memory file {}",
            config.memory_file.display()
        )
    })
}

/// Wire memory, the host executor, and the configured generator together.
fn build_brain(config: AssistantConfig) -> anyhow::Result<Brain> {
    let memory = open_memory(&config)?;
    let executor = SystemExecutor::new(HostProcessRunner::new(), &config.commands);
    let generator = build_generator(&config.generator, &config.system_prompt, |name| {
        std::env::var(name).ok()
    })
    .context("failed to build response generator")?;
    Ok(Brain::new(config, memory, executor, generator))
}

fn build_output(config: &AssistantConfig) -> Box<dyn VoiceOutput> {
    match config.voice.output {
        VoiceOutputMode::Console => Box::new(ConsoleOutput::stdout()),
        VoiceOutputMode::Speech => {
            match SpeechOutput::detect(HostProcessRunner::new(), &config.voice) {
                Ok(speech) => Box::new(speech),
                Err(err) => {
                    warn!("speech output unavailable, using console (err={err})");
                    Box::new(ConsoleOutput::stdout())
                }
            }
        }
    }
}

async fn chat(config: AssistantConfig) -> anyhow::Result<()> {
    let mut output = build_output(&config);
    let mut assistant = Assistant::new(build_brain(config)?);
    let mut input = ConsoleInput::stdio();
    assistant
        .run(&mut input, output.as_mut())
        .await
        .context("assistant stopped with an error")?;
    info!("assistant stopped");
    Ok(())
}
