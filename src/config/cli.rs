use crate::config::{resolve_history_dir, toml_config::TomlConfig};
use crate::domain::model::{Audience, ExcuseRequest, Length, Scenario, Tone, DEFAULT_SPECIFICITY};
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "excuse-gen")]
#[command(about = "Generate polished, context-aware excuses in seconds")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Generate a new excuse
    Generate(RequestArgs),
    /// Re-roll the most recently saved excuse
    Rephrase(RequestArgs),
    /// Show saved excuses, newest first
    History(HistoryArgs),
    /// Short writing tips
    Tips,
    /// Generate and rephrase in a line-by-line session
    Interactive(RequestArgs),
}

#[derive(Debug, Clone, Default, Args)]
pub struct RequestArgs {
    #[arg(long, value_enum, ignore_case = true)]
    pub scenario: Option<Scenario>,

    #[arg(long, value_enum, ignore_case = true)]
    pub audience: Option<Audience>,

    #[arg(long, value_enum, ignore_case = true)]
    pub tone: Option<Tone>,

    /// 0-10; higher values add more concrete details
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=10))]
    pub specificity: Option<u8>,

    #[arg(long, value_enum, ignore_case = true)]
    pub length: Option<Length>,

    /// Key details (project name, course, event, constraints)
    #[arg(long)]
    pub context: Option<String>,

    /// Random seed; 0 means unseeded
    #[arg(long)]
    pub seed: Option<u64>,

    /// Save generated excuses to the history folder
    #[arg(long)]
    pub save: bool,

    #[arg(long)]
    pub history_dir: Option<String>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct HistoryArgs {
    /// Show at most this many entries
    #[arg(long)]
    pub limit: Option<usize>,

    #[arg(long)]
    pub history_dir: Option<String>,
}

impl RequestArgs {
    /// Command line first, then the config file, then built-in defaults.
    pub fn resolve(&self, file: Option<&TomlConfig>) -> ExcuseRequest {
        let defaults = file.and_then(|f| f.defaults.as_ref());

        let request = ExcuseRequest {
            scenario: self
                .scenario
                .or_else(|| defaults.and_then(|d| d.scenario))
                .unwrap_or_default(),
            audience: self
                .audience
                .or_else(|| defaults.and_then(|d| d.audience))
                .unwrap_or_default(),
            tone: self
                .tone
                .or_else(|| defaults.and_then(|d| d.tone))
                .unwrap_or_default(),
            specificity: self
                .specificity
                .or_else(|| defaults.and_then(|d| d.specificity))
                .unwrap_or(DEFAULT_SPECIFICITY),
            length: self
                .length
                .or_else(|| defaults.and_then(|d| d.length))
                .unwrap_or_default(),
            custom_context: None,
            seed: None,
            persist_history: self.save || file.is_some_and(TomlConfig::persist_history),
            history_dir: Some(resolve_history_dir(self.history_dir.as_deref(), file)),
        };

        request
            .with_custom_context(
                self.context
                    .as_deref()
                    .or_else(|| defaults.and_then(|d| d.context.as_deref())),
            )
            .with_seed(self.seed.or_else(|| defaults.and_then(|d| d.seed)))
    }
}
