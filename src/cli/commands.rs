use crate::generator::{plan_app, AppPlan, ScaffoldOptions, ScaffoldReport};
use crate::logging::{init_logging, LogConfig};
use crate::spec::{load_spec, partition_by_tag, ApiModel};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Command-line interface for oas-scaffold
///
/// Scaffolds a Hono + Drizzle TypeScript backend from an OpenAPI 3.x document.
#[derive(Debug, Parser)]
#[command(name = "oas-scaffold", version)]
#[command(about = "Scaffold a backend application from an OpenAPI spec", long_about = None)]
pub struct Cli {
    /// Log at debug level (SCAFFOLD_LOG_LEVEL and RUST_LOG still apply)
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a new application from an OpenAPI spec
    New {
        /// Name of the application directory (letters, digits, '-' and '_')
        app_name: String,

        /// Path to the OpenAPI specification file (YAML or JSON)
        #[arg(short, long)]
        spec: PathBuf,

        /// Directory the application directory is created in
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// Layout configuration (default: scaffold.toml next to the spec)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Application tree to use instead of the built-in one
        #[arg(long)]
        template_dir: Option<PathBuf>,

        /// Render everything and list the files without writing them
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },
    /// Print the endpoints grouped by tag and the schema names of a spec
    Inspect {
        /// Path to the OpenAPI specification file (YAML or JSON)
        #[arg(short, long)]
        spec: PathBuf,
    },
}

/// Parse the process arguments, set up logging and run the command.
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    let mut log_config = LogConfig::from_env();
    if cli.verbose {
        log_config = log_config.verbose();
    }
    init_logging(&log_config)?;
    run(cli)
}

/// Run an already parsed command line.
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::New {
            app_name,
            spec,
            output_dir,
            config,
            template_dir,
            dry_run,
        } => {
            let options = ScaffoldOptions {
                app_name,
                spec_path: spec,
                output_dir,
                config_path: config,
                template_dir,
                dry_run,
            };
            new_app(&options)
                .with_context(|| format!("failed to scaffold '{}'", options.app_name))
        }
        Commands::Inspect { spec } => {
            let model = load_spec(&spec)
                .with_context(|| format!("failed to inspect {}", spec.display()))?;
            print_inspection(&model);
            Ok(())
        }
    }
}

fn new_app(options: &ScaffoldOptions) -> Result<()> {
    let plan = run_with_spinner(
        "Reading OpenAPI spec...",
        |plan: &AppPlan| {
            format!(
                "✅ Loaded {} ({} endpoints, {} schemas)",
                plan.model.metadata.title,
                plan.model.endpoints.len(),
                plan.model.schemas.len()
            )
        },
        || plan_app(options).map_err(anyhow::Error::from),
    )?;

    let description = if options.dry_run {
        "Rendering application files..."
    } else {
        "Writing application files..."
    };
    let report = run_with_spinner(
        description,
        |report: &ScaffoldReport| {
            if report.dry_run {
                format!(
                    "📝 Dry run: {} files would be written to {}",
                    report.files.len(),
                    report.target.display()
                )
            } else {
                format!(
                    "✅ Created {} files in {}",
                    report.files.len(),
                    report.target.display()
                )
            }
        },
        || plan.apply(options.dry_run).map_err(anyhow::Error::from),
    )?;

    if report.dry_run {
        for file in &report.files {
            println!("   {}", file.display());
        }
        return Ok(());
    }
    tracing::debug!(files = ?report.files, "scaffold written");

    println!();
    println!("Next steps:");
    println!("  cd {}", display_relative(&report.target));
    println!("  npm install");
    println!("  npm run db:push");
    println!("  npm run dev");
    Ok(())
}

fn print_inspection(model: &ApiModel) {
    println!(
        "📄 {} {} ({} endpoints, {} schemas)",
        model.metadata.title,
        model.metadata.version,
        model.endpoints.len(),
        model.schemas.len()
    );
    for group in partition_by_tag(&model.endpoints) {
        println!();
        println!("🏷️  {} ({})", group.tag, group.endpoints.len());
        for endpoint in group.endpoints {
            println!(
                "   {:<7} {} → {}",
                endpoint.method, endpoint.path, endpoint.operation_id
            );
        }
    }
    if !model.schemas.is_empty() {
        println!();
        println!("📦 Schemas");
        for schema in &model.schemas {
            println!("   {} ({} properties)", schema.name, schema.properties.len());
        }
    }
}

fn display_relative(path: &Path) -> String {
    path.strip_prefix(".")
        .unwrap_or(path)
        .display()
        .to_string()
}

fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner.set_message(message.to_string());
    spinner
}

fn format_elapsed_ms(start: Instant) -> String {
    let elapsed = start.elapsed();
    if elapsed.as_secs() == 0 {
        return format!("{}ms", elapsed.as_millis());
    }
    format!("{}s {}ms", elapsed.as_secs(), elapsed.subsec_millis())
}

/// Run `f` behind a spinner and print the success line with the elapsed time.
fn run_with_spinner<T, F>(
    description: &str,
    success_message: impl FnOnce(&T) -> String,
    f: F,
) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    let spinner = spinner(description);
    let start = Instant::now();
    let result = f();
    spinner.finish_and_clear();
    if let Ok(value) = &result {
        println!("{} ({})", success_message(value), format_elapsed_ms(start));
    }
    result
}
