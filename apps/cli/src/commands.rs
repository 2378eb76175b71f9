//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use lessonforge_catalog::{ContentState, load_catalog};
use lessonforge_core::{
    BatchOptions, BatchProgress, BatchSummary, GenerationPipeline, generate_single, run_batch,
};
use lessonforge_extract::{ExtractionOptions, build_extractor};
use lessonforge_search::{ExaClient, SearchOptions};
use lessonforge_shared::{
    AppConfig, LessonConfig, LessonForgeError, init_config, load_config, resolve_credentials,
};
use lessonforge_synthesis::{AnthropicClient, SynthesisOptions};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// lessonforge — generate roadmap lesson content from web sources.
#[derive(Parser)]
#[command(
    name = "lessonforge",
    version,
    about = "Generate markdown lesson content for the learning roadmap from web sources.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Generate content for every lesson that lacks it.
    Batch {
        /// Generate at most N lessons (first N in catalog order).
        #[arg(long)]
        limit: Option<usize>,

        /// Path to the lesson catalog JSON (defaults to config).
        #[arg(long)]
        catalog: Option<String>,

        /// Directory for generated markdown (defaults to config).
        #[arg(long)]
        content_dir: Option<String>,

        /// Delay between consecutive lessons in milliseconds (defaults to config).
        #[arg(long)]
        pacing_ms: Option<u64>,
    },

    /// Generate content for one lesson by id (overwrites existing content).
    Lesson {
        /// Lesson id (catalog slug).
        lesson_id: String,

        /// Path to the lesson catalog JSON (defaults to config).
        #[arg(long)]
        catalog: Option<String>,

        /// Directory for generated markdown (defaults to config).
        #[arg(long)]
        content_dir: Option<String>,
    },

    /// Report content coverage: generated, pending, ungeneratable, orphans.
    Status {
        /// Path to the lesson catalog JSON (defaults to config).
        #[arg(long)]
        catalog: Option<String>,

        /// Directory for generated markdown (defaults to config).
        #[arg(long)]
        content_dir: Option<String>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "lessonforge=info",
        1 => "lessonforge=debug",
        _ => "lessonforge=trace",
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Batch {
            limit,
            catalog,
            content_dir,
            pacing_ms,
        } => cmd_batch(limit, catalog.as_deref(), content_dir.as_deref(), pacing_ms).await,
        Command::Lesson {
            lesson_id,
            catalog,
            content_dir,
        } => cmd_lesson(&lesson_id, catalog.as_deref(), content_dir.as_deref()).await,
        Command::Status {
            catalog,
            content_dir,
        } => cmd_status(catalog.as_deref(), content_dir.as_deref()).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show().await,
        },
    }
}

// ---------------------------------------------------------------------------
// Pipeline construction
// ---------------------------------------------------------------------------

/// Resolve a CLI path flag against the config default.
fn resolve_path(flag: Option<&str>, config_value: &str) -> PathBuf {
    PathBuf::from(flag.unwrap_or(config_value))
}

/// Build the generation pipeline from config + environment credentials.
///
/// Credential resolution runs first so a missing required key aborts
/// before any client exists and before any network call is possible.
fn build_pipeline(config: &AppConfig, content_dir: PathBuf) -> Result<GenerationPipeline> {
    let credentials = resolve_credentials(config)?;

    let finder = ExaClient::new(
        credentials.search_api_key,
        SearchOptions {
            max_chars: config.search.max_chars,
            category: config.search.category.clone(),
            timeout_secs: config.search.timeout_secs,
        },
    )?;

    let extractor = build_extractor(
        credentials.extraction_api_key,
        ExtractionOptions {
            timeout_secs: config.extraction.timeout_secs,
        },
    )?;

    let synthesizer = AnthropicClient::new(
        credentials.synthesis_api_key,
        SynthesisOptions {
            model: config.synthesis.model.clone(),
            max_tokens: config.synthesis.max_tokens,
            source_char_cap: config.synthesis.source_char_cap,
            timeout_secs: config.synthesis.timeout_secs,
        },
    )?;

    Ok(GenerationPipeline::new(
        Box::new(finder),
        extractor,
        Box::new(synthesizer),
        content_dir,
        config.search.num_results,
    ))
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_batch(
    limit: Option<usize>,
    catalog_flag: Option<&str>,
    content_dir_flag: Option<&str>,
    pacing_ms: Option<u64>,
) -> Result<()> {
    let config = load_config()?;
    let catalog_path = resolve_path(catalog_flag, &config.defaults.catalog_path);
    let content_dir = resolve_path(content_dir_flag, &config.defaults.content_dir);

    let pipeline = build_pipeline(&config, content_dir)?;
    let modules = load_catalog(&catalog_path)?;

    let options = BatchOptions {
        limit,
        pacing: Duration::from_millis(pacing_ms.unwrap_or(config.batch.pacing_ms)),
    };

    info!(
        catalog = %catalog_path.display(),
        limit = ?limit,
        pacing_ms = options.pacing.as_millis() as u64,
        "starting batch generation"
    );

    let reporter = CliProgress::new();
    let summary = run_batch(&pipeline, &modules, &options, &reporter).await?;

    print_summary(&summary);

    // Per-lesson failures are part of a completed run; only pre-run
    // errors (config, catalog) make the process exit non-zero.
    Ok(())
}

fn print_summary(summary: &BatchSummary) {
    println!();
    println!("  Batch generation complete");
    println!("  Needing content: {}", summary.needing_content);
    println!("  Attempted:       {}", summary.attempted);
    println!("  Succeeded:       {}", summary.succeeded.len());
    println!("  Failed:          {}", summary.failed.len());

    if !summary.succeeded.is_empty() {
        println!();
        println!("  Generated lessons:");
        for id in &summary.succeeded {
            println!("    - {id}");
        }
    }

    if !summary.failed.is_empty() {
        println!();
        println!("  Failed lessons:");
        for failure in &summary.failed {
            println!("    - {}: {}", failure.lesson_id, failure.reason);
        }
    }
    println!();
}

async fn cmd_lesson(
    lesson_id: &str,
    catalog_flag: Option<&str>,
    content_dir_flag: Option<&str>,
) -> Result<()> {
    let config = load_config()?;
    let catalog_path = resolve_path(catalog_flag, &config.defaults.catalog_path);
    let content_dir = resolve_path(content_dir_flag, &config.defaults.content_dir);

    let pipeline = build_pipeline(&config, content_dir)?;
    let modules = load_catalog(&catalog_path)?;

    let spinner = CliProgress::new();
    spinner.spinner.set_message(format!("Generating: {lesson_id}"));

    let saved = match generate_single(&pipeline, &modules, lesson_id).await {
        Ok(saved) => saved,
        Err(e) => {
            spinner.spinner.finish_and_clear();
            return Err(classify(e));
        }
    };
    spinner.spinner.finish_and_clear();

    println!();
    println!("  Lesson generated");
    println!("  Path:    {}", saved.path.display());
    println!("  Sources: {}", saved.result.sources.len());
    for (i, source) in saved.result.sources.iter().enumerate() {
        println!("    {}. {}", i + 1, source.title);
        println!("       {}", source.url);
    }
    println!();

    Ok(())
}

/// Prefix the error with its boundary classification so failures read the
/// same way here as they would from the web app's trigger.
fn classify(error: LessonForgeError) -> color_eyre::eyre::Report {
    use lessonforge_shared::FailureClass;

    match error.class() {
        FailureClass::InvalidRequest => eyre!("invalid request: {error}"),
        FailureClass::Configuration => eyre!("configuration: {error}"),
        FailureClass::Internal => eyre!("generation failed: {error}"),
    }
}

async fn cmd_status(catalog_flag: Option<&str>, content_dir_flag: Option<&str>) -> Result<()> {
    let config = load_config()?;
    let catalog_path = resolve_path(catalog_flag, &config.defaults.catalog_path);
    let content_dir = resolve_path(content_dir_flag, &config.defaults.content_dir);

    let modules = load_catalog(&catalog_path)?;
    let report = lessonforge_catalog::catalog_status(&modules, &content_dir)?;

    println!();
    println!("  Content coverage for {}", catalog_path.display());
    println!(
        "  Generated: {}   Pending: {}   No description: {}",
        report.generated(),
        report.pending(),
        report.ungeneratable()
    );
    println!();

    let mut current_module = "";
    for lesson in &report.lessons {
        if lesson.module_id != current_module {
            current_module = &lesson.module_id;
            println!("  [{current_module}]");
        }
        let marker = match lesson.state {
            ContentState::Generated => "x",
            ContentState::Pending => " ",
            ContentState::Ungeneratable => "-",
        };
        println!("    [{marker}] {}: {}", lesson.lesson_id, lesson.title);
    }

    if !report.orphans.is_empty() {
        println!();
        println!("  Orphan content files (no catalog entry):");
        for orphan in &report.orphans {
            println!("    - {orphan}.md");
        }
    }
    println!();

    Ok(())
}

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl BatchProgress for CliProgress {
    fn batch_started(&self, scheduled: usize, needing_content: usize) {
        self.spinner.set_message(format!(
            "Found {needing_content} lessons without content, generating {scheduled}"
        ));
    }

    fn lesson_started(&self, current: usize, total: usize, lesson: &LessonConfig) {
        self.spinner.set_message(format!(
            "[{current}/{total}] Generating: {} ({})",
            lesson.title, lesson.id
        ));
    }

    fn lesson_succeeded(&self, lesson_id: &str, path: &Path) {
        self.spinner
            .println(format!("  + {lesson_id} → {}", path.display()));
    }

    fn lesson_failed(&self, lesson_id: &str, error: &LessonForgeError) {
        self.spinner
            .println(format!("  ! {lesson_id} failed: {error}"));
    }

    fn pacing(&self, delay: Duration) {
        self.spinner
            .set_message(format!("Waiting {}ms before next lesson…", delay.as_millis()));
    }

    fn batch_finished(&self, _summary: &BatchSummary) {
        self.spinner.finish_and_clear();
    }
}
