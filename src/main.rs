//! LogoStamp CLI - Batch Logo Watermarking
//!
//! Stamps a logo onto every supported image in a folder. The batch itself
//! runs on a blocking worker while this task renders its progress.

use std::path::{Path, PathBuf};
use std::process;

use anyhow::Context;
use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use logostamp::config::Overrides;
use logostamp::processing::scan_directory;
use logostamp::{
    init_with_config, BatchSummary, ChannelSink, Config, ProcessingEvent, WatermarkEngine,
};

/// LogoStamp - Batch Logo Watermarking
#[derive(Parser)]
#[command(
    name = "logostamp",
    version,
    about = "Stamp a proportionally sized logo onto every image in a folder",
    long_about = "LogoStamp adds a logo to the top-left corner of every PNG, JPEG, BMP and GIF \
                  image in a folder. The logo is scaled to a percentage of each image's width, \
                  keeps its aspect ratio, and is alpha-blended at a 10px offset. PNG output keeps \
                  transparency; other formats are flattened to RGB.",
    arg_required_else_help = false
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Folder with the images to stamp
    #[arg(short, long, value_name = "DIR")]
    input: Option<PathBuf>,

    /// Folder to write stamped images to (created if missing)
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Logo image
    #[arg(short, long, value_name = "FILE")]
    logo: Option<PathBuf>,

    /// Logo width as a percentage of each image's width [default: 15]
    #[arg(short, long, value_name = "PERCENT", value_parser = clap::value_parser!(u32).range(1..))]
    percentage: Option<u32>,

    /// JPEG output quality (1-100) [default: 90]
    #[arg(short, long, value_name = "QUALITY", value_parser = clap::value_parser!(u8).range(1..=100))]
    quality: Option<u8>,

    /// Configuration file path (.toml or .yaml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Show what would be processed without writing anything
    #[arg(long)]
    dry_run: bool,

    /// Output progress events as JSON lines
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short = 'Q', long, conflicts_with = "verbose")]
    quiet: bool,
}

/// Available subcommands
#[derive(Subcommand)]
enum Commands {
    /// Validate configuration file
    Config {
        /// Configuration file to validate
        file: PathBuf,
    },
    /// Generate example configuration file
    ExampleConfig {
        /// Output file path
        #[arg(short, long, default_value = "logostamp.toml")]
        output: PathBuf,
        /// Use YAML format instead of TOML
        #[arg(long)]
        yaml: bool,
    },
}

#[tokio::main]
async fn main() {
    let mut cli = Cli::parse();

    if let Some(command) = cli.command.take() {
        if let Err(e) = handle_subcommand(command) {
            eprintln!("{}: {:#}", style("Error").red().bold(), e);
            process::exit(1);
        }
        return;
    }

    match run(cli).await {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("{}: {:#}", style("Error").red().bold(), e);
            process::exit(1);
        }
    }
}

/// Handle subcommands
fn handle_subcommand(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Config { file } => validate_config_file(&file),
        Commands::ExampleConfig { output, yaml } => generate_example_config(&output, yaml),
    }
}

/// Resolve configuration, run the batch and render its events
async fn run(cli: Cli) -> anyhow::Result<i32> {
    let config = load_config(&cli)?;
    init_with_config(&config)?;

    let request = config.to_request()?;
    debug!("Batch request: {:?}", request);

    if cli.dry_run {
        let files = scan_directory(&request.input_folder)?;
        println!("{} files would be processed:", style(files.len()).bold());
        for file in &files {
            println!("  {}", file.display());
        }
        return Ok(0);
    }

    let engine = WatermarkEngine::new().with_encoder(config.output.encoder());
    let (mut sink, mut events) = ChannelSink::new();
    let worker = tokio::task::spawn_blocking(move || engine.run(&request, &mut sink));

    let mut reporter = Reporter::new(cli.json, cli.quiet);
    while let Some(event) = events.recv().await {
        reporter.handle(&event)?;
    }

    let outcome = worker.await.context("Batch worker panicked")?;
    reporter.finish();

    match outcome {
        Ok(summary) => {
            reporter.summary(&summary)?;
            Ok(0)
        }
        // Already reported through the fatal event
        Err(_) => Ok(1),
    }
}

/// Merge the optional config file with command line flags
fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let base = match &cli.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load configuration {}", path.display()))?,
        None => Config::default(),
    };

    let mut config = base.merge(Overrides {
        input_folder: cli.input.clone(),
        output_folder: cli.output.clone(),
        logo_path: cli.logo.clone(),
        logo_percentage: cli.percentage,
        jpeg_quality: cli.quality,
    });

    if cli.quiet {
        config.logging.level = "error".to_string();
    } else if cli.verbose {
        config.logging.level = "debug".to_string();
    }

    config.validate()?;
    Ok(config)
}

/// Renders batch events as a progress bar or JSON lines
struct Reporter {
    json: bool,
    quiet: bool,
    progress: Option<ProgressBar>,
}

impl Reporter {
    fn new(json: bool, quiet: bool) -> Self {
        let progress = if !json && !quiet {
            let pb = ProgressBar::new(0);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("#>-"),
            );
            Some(pb)
        } else {
            None
        };

        Self { json, quiet, progress }
    }

    fn handle(&mut self, event: &ProcessingEvent) -> anyhow::Result<()> {
        if self.json {
            println!("{}", serde_json::to_string(event)?);
            return Ok(());
        }

        match event {
            ProcessingEvent::FileProcessed { filename, index, total } => {
                if let Some(pb) = &self.progress {
                    pb.set_length(*total as u64);
                    pb.set_position(*index as u64);
                    pb.set_message(filename.clone());
                }
            }
            ProcessingEvent::FileError { .. } => {
                if let Some(pb) = &self.progress {
                    pb.inc(1);
                }
                self.print(format!("{} {}", style("✗").red(), event));
            }
            ProcessingEvent::FatalLogoError { .. } | ProcessingEvent::FatalFolderError { .. } => {
                self.print(format!("{}", style(event).red().bold()));
            }
            ProcessingEvent::FileSkippedWarning { .. } | ProcessingEvent::LogoFallbackWarning { .. } => {
                if !self.quiet {
                    self.print(format!("{}", style(event).yellow()));
                }
            }
            ProcessingEvent::FolderCreated { .. } | ProcessingEvent::EmptyInput => {
                if !self.quiet {
                    self.print(format!("{}", style(event).blue()));
                }
            }
        }

        Ok(())
    }

    fn print(&self, line: String) {
        match &self.progress {
            Some(pb) => pb.println(line),
            None => eprintln!("{}", line),
        }
    }

    fn finish(&self) {
        if let Some(pb) = &self.progress {
            pb.finish_with_message("Processing complete");
        }
    }

    fn summary(&self, summary: &BatchSummary) -> anyhow::Result<()> {
        if self.json {
            println!("{}", serde_json::to_string(summary)?);
            return Ok(());
        }
        if self.quiet {
            return Ok(());
        }

        println!();
        println!("{}", style("Processing Summary:").bold());
        println!("  {}: {}", style("Found").cyan(), summary.total);
        println!("  {}: {}", style("Processed").green(), summary.processed);
        if summary.overlay_skipped > 0 {
            println!("  {}: {}", style("Logo skipped").yellow(), summary.overlay_skipped);
        }
        if summary.size_fallbacks > 0 {
            println!("  {}: {}", style("Native logo size").yellow(), summary.size_fallbacks);
        }
        if summary.failed > 0 {
            println!("  {}: {}", style("Failed").red(), summary.failed);
        }
        println!("  {}: {:.2}s", style("Duration").blue(), summary.duration.as_secs_f64());

        Ok(())
    }
}

/// Validate configuration file
fn validate_config_file(file_path: &Path) -> anyhow::Result<()> {
    let config = Config::from_file(file_path)?;
    config.validate()?;

    println!("{}: Configuration file is valid", style("Success").green().bold());
    println!("Logo percentage: {}%", config.batch.logo_percentage);
    println!("JPEG quality: {}", config.output.jpeg_quality);

    Ok(())
}

/// Generate example configuration file
fn generate_example_config(output_path: &Path, use_yaml: bool) -> anyhow::Result<()> {
    let output_path = if use_yaml {
        output_path.with_extension("yaml")
    } else {
        output_path.to_path_buf()
    };

    let mut config = Config::default();
    config.batch.input_folder = Some(PathBuf::from("input_images"));
    config.batch.output_folder = Some(PathBuf::from("output_images"));
    config.batch.logo_path = Some(PathBuf::from("assets/logo.png"));
    config.to_file(&output_path)?;

    let format = if use_yaml { "YAML" } else { "TOML" };
    println!("{}: Generated example {} configuration: {}",
             style("Success").green().bold(),
             format,
             output_path.display());

    Ok(())
}
