//! CLI entrypoint for gradewise
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use gradewise_application::{
    AuditLogger, GenerateContentUseCase, GradeExamInput, GradeExamUseCase, GradingConfig,
    LlmGateway, NoAuditLogger,
};
use gradewise_domain::{ExamBlueprint, Model};
use gradewise_infrastructure::{
    ConfigLoader, FileConfig, JsonlAuditLogger, OpenAiConfig, OpenAiGateway, ReplayGateway,
    load_paper,
};
use gradewise_presentation::{
    Cli, Command, ConsoleFormatter, GenerateCommand, GradeArgs, JsonFormatter, OutputFormat,
    OutputFormatter, ProgressReporter, set_color,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.show_config {
        println!("Configuration sources (lowest to highest priority):");
        for source in ConfigLoader::describe_sources(cli.config.as_ref()) {
            println!("  {}", source);
        }
        return Ok(());
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?
    };
    config.validate().context("Invalid configuration")?;
    set_color(config.output.color);

    info!("Starting gradewise");

    let Some(command) = cli.command else {
        bail!("No command given. Try `gradewise grade <paper.json>` or `gradewise --help`.");
    };

    let show_progress = !cli.quiet && config.output.show_progress;
    let audit = audit_logger(&config);

    match command {
        Command::Grade(args) => {
            let grading = grading_config(&config, args.model.as_deref());
            match &args.response_file {
                Some(path) => {
                    let gateway = Arc::new(ReplayGateway::from_file(path)?);
                    grade(gateway, grading, audit, &args, show_progress).await
                }
                None => {
                    let gateway = Arc::new(provider_gateway(&config)?);
                    grade(gateway, grading, audit, &args, show_progress).await
                }
            }
        }
        Command::Generate(command) => {
            let options = command.options();
            let grading = grading_config(&config, options.model.as_deref());
            match &options.response_file {
                Some(path) => {
                    let gateway = Arc::new(ReplayGateway::from_file(path)?);
                    generate(gateway, grading, audit, &command).await
                }
                None => {
                    let gateway = Arc::new(provider_gateway(&config)?);
                    generate(gateway, grading, audit, &command).await
                }
            }
        }
    }
}

fn grading_config(config: &FileConfig, model: Option<&str>) -> GradingConfig {
    let grading = config.grading_config();
    match model {
        Some(name) => GradingConfig {
            model: Model::new(name),
            ..grading
        },
        None => grading,
    }
}

fn provider_gateway(config: &FileConfig) -> Result<OpenAiGateway> {
    let provider = OpenAiConfig::from_provider(&config.provider);
    if provider.api_key.is_none() {
        warn!(
            "No API key found (set {} or provider.api_key)",
            config.provider.api_key_env
        );
    }
    Ok(OpenAiGateway::new(provider)?)
}

fn audit_logger(config: &FileConfig) -> Arc<dyn AuditLogger> {
    match &config.grading.audit_log {
        Some(path) => match JsonlAuditLogger::open(PathBuf::from(path)) {
            Some(logger) => {
                info!("Writing audit trail to {}", logger.path().display());
                Arc::new(logger)
            }
            None => Arc::new(NoAuditLogger),
        },
        None => Arc::new(NoAuditLogger),
    }
}

fn formatter(format: OutputFormat) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Table => Box::new(ConsoleFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}

async fn grade<G: LlmGateway + 'static>(
    gateway: Arc<G>,
    config: GradingConfig,
    audit: Arc<dyn AuditLogger>,
    args: &GradeArgs,
    show_progress: bool,
) -> Result<()> {
    let loaded = load_paper(&args.paper)?;
    let input = GradeExamInput::new(loaded.paper.into_questions(), loaded.answers);

    let use_case = GradeExamUseCase::new(gateway, config).with_audit_logger(audit);

    let report = if show_progress {
        let progress = ProgressReporter::new();
        use_case.execute_with_progress(input, &progress).await
    } else {
        use_case.execute(input).await
    };

    println!("{}", formatter(args.output).format_report(&report));
    Ok(())
}

async fn generate<G: LlmGateway + 'static>(
    gateway: Arc<G>,
    config: GradingConfig,
    audit: Arc<dyn AuditLogger>,
    command: &GenerateCommand,
) -> Result<()> {
    let use_case = GenerateContentUseCase::new(gateway, config).with_audit_logger(audit);
    let formatter = formatter(command.options().output);

    let output = match command {
        GenerateCommand::Question { topic, .. } => {
            formatter.format_question(&use_case.generate_question(topic).await?)
        }
        GenerateCommand::Exam {
            scope,
            objective,
            free_text,
            code,
            ..
        } => {
            let blueprint =
                ExamBlueprint::new(scope.as_str()).with_counts(*objective, *free_text, *code);
            formatter.format_exam(&use_case.generate_exam(&blueprint).await?)
        }
        GenerateCommand::Graph {
            topic, description, ..
        } => formatter.format_graph(
            &use_case
                .generate_graph(topic, description.as_deref())
                .await?,
        ),
    };

    println!("{}", output);
    Ok(())
}
