//! CLI command definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for grading reports and generated content
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Colored, human-readable table
    Table,
    /// Pretty-printed JSON
    Json,
}

/// CLI arguments for gradewise
#[derive(Parser, Debug)]
#[command(name = "gradewise")]
#[command(author, version, about = "Resilient exam grading and content generation")]
#[command(long_about = r#"
gradewise grades submitted exam papers with a hosted language model as the
qualitative assessor, and never fails to produce a complete result.

Objective questions are scored by literal comparison. Free-text and code
answers are assessed by the model; when its reply is unusable every item
gets a deterministic default score and is flagged for human review.

Configuration files are loaded from (in priority order):
1. GRADEWISE_* environment variables (e.g. GRADEWISE_PROVIDER__MODEL)
2. --config <path>     Explicit config file
3. ./gradewise.toml    Project-level config
4. ~/.config/gradewise/config.toml   Global config

Example:
  gradewise grade paper.json
  gradewise grade paper.json --response-file reply.txt -o json
  gradewise generate exam "Rust ownership" --objective 4 --free-text 2 --code 1
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Grade a submitted paper
    Grade(GradeArgs),

    /// Generate teaching content
    #[command(subcommand)]
    Generate(GenerateCommand),
}

#[derive(Args, Debug)]
pub struct GradeArgs {
    /// Paper file holding `questions` and `answers`
    #[arg(value_name = "PAPER")]
    pub paper: PathBuf,

    /// Replay a recorded model response instead of calling the provider
    #[arg(long, value_name = "FILE")]
    pub response_file: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: OutputFormat,

    /// Override the configured model
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,
}

/// Options shared by every generate subcommand
#[derive(Args, Debug)]
pub struct GenerateOptions {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: OutputFormat,

    /// Override the configured model
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Replay a recorded model response instead of calling the provider
    #[arg(long, value_name = "FILE")]
    pub response_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum GenerateCommand {
    /// One practice question with a reference answer
    Question {
        topic: String,
        #[command(flatten)]
        options: GenerateOptions,
    },

    /// A complete exam paper
    Exam {
        /// What the exam covers
        scope: String,
        /// Number of multiple-choice questions
        #[arg(long, default_value_t = 5)]
        objective: usize,
        /// Number of short-answer questions
        #[arg(long, default_value_t = 3)]
        free_text: usize,
        /// Number of programming questions
        #[arg(long, default_value_t = 1)]
        code: usize,
        #[command(flatten)]
        options: GenerateOptions,
    },

    /// A knowledge graph rooted at a topic
    Graph {
        topic: String,
        /// Extra guidance for the model
        #[arg(long)]
        description: Option<String>,
        #[command(flatten)]
        options: GenerateOptions,
    },
}

impl GenerateCommand {
    pub fn options(&self) -> &GenerateOptions {
        match self {
            GenerateCommand::Question { options, .. }
            | GenerateCommand::Exam { options, .. }
            | GenerateCommand::Graph { options, .. } => options,
        }
    }
}
