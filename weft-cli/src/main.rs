//! Weft CLI - Literate Programming Engine

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use weft::interface::Context;
use weft::ReferenceStyle;

#[derive(Parser)]
#[command(name = "weft")]
#[command(
    author,
    version,
    about = "Literate programming engine",
    long_about = "\
Literate programming engine that produces two artifacts from one WEB file.\n\n\
  tangle  - extract source files from the named chunks\n\
  weave   - render the typeset document through a template set\n\
  build   - tangle and weave in one pass"
)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Working directory
    #[arg(short = 'C', long, global = true)]
    directory: Option<PathBuf>,

    /// Command lead character (default '@')
    #[arg(long, global = true, value_name = "CHAR")]
    command_char: Option<char>,

    /// Reject unknown markers in prose
    #[arg(long, global = true)]
    strict: bool,

    /// Treat missing includes for these markers as warnings (e.g. '@i')
    #[arg(short = 'p', long = "permit", global = true, value_name = "MARKER")]
    permit: Vec<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress normal output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract source files from a WEB document
    Tangle {
        /// Output directory (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Line-comment template for source positions, e.g. '# line ${line} "${file}"'
        #[arg(long, value_name = "TEMPLATE")]
        line_comment: Option<String>,

        /// WEB source file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Render the typeset document
    Weave {
        /// Output directory (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Template set: rst, html, latex, or a TOML file
        #[arg(short, long)]
        templates: Option<String>,

        /// Reference list style
        #[arg(short = 'r', long, value_enum)]
        style: Option<ReferenceStyle>,

        /// WEB source file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Tangle and weave in one pass
    Build {
        /// Output directory (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Template set: rst, html, latex, or a TOML file
        #[arg(short, long)]
        templates: Option<String>,

        /// Reference list style
        #[arg(short = 'r', long, value_enum)]
        style: Option<ReferenceStyle>,

        /// Line-comment template for source positions
        #[arg(long, value_name = "TEMPLATE")]
        line_comment: Option<String>,

        /// WEB source file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.quiet {
        EnvFilter::new("error")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    // Respect NO_COLOR convention (https://no-color.org/)
    let no_color = std::env::var_os("NO_COLOR").is_some();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(!no_color)
        .init();

    // Determine working directory
    let base_dir = cli
        .directory
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));

    // Read configuration from file or use defaults
    let mut config = match cli.config {
        Some(ref path) => {
            // Explicit --config: parse failure is a hard error
            match weft::config::read_config_file(path) {
                Ok(cfg) => cfg,
                Err(e) => {
                    eprintln!("Error reading config file {}: {}", path.display(), e);
                    return ExitCode::FAILURE;
                }
            }
        }
        None => {
            // Auto-discovery: warn on parse failure, fall back to defaults
            match weft::config::read_config(&base_dir) {
                Ok(cfg) => cfg,
                Err(e) => {
                    tracing::warn!("Failed to parse config file, using defaults: {}", e);
                    weft::Config::default()
                }
            }
        }
    };

    // Global overrides
    if let Some(ch) = cli.command_char {
        config.command = ch.to_string();
    }
    if cli.strict {
        config.strict = true;
    }
    config.permit.extend(cli.permit.iter().cloned());

    // Execute command
    let result = match cli.command {
        Commands::Tangle {
            output,
            line_comment,
            file,
        } => {
            if let Some(dir) = output {
                config.output_dir = Some(dir);
            }
            if line_comment.is_some() {
                config.line_comment = line_comment;
            }
            let ctx = Context::new(config, base_dir);
            commands::tangle(
                &ctx,
                commands::TangleOptions {
                    file,
                    quiet: cli.quiet,
                },
            )
        }

        Commands::Weave {
            output,
            templates,
            style,
            file,
        } => {
            if let Some(dir) = output {
                config.output_dir = Some(dir);
            }
            if let Some(set) = templates {
                config.templates = set;
            }
            if let Some(style) = style {
                config.reference_style = style;
            }
            let ctx = Context::new(config, base_dir);
            commands::weave(
                &ctx,
                commands::WeaveOptions {
                    file,
                    quiet: cli.quiet,
                },
            )
        }

        Commands::Build {
            output,
            templates,
            style,
            line_comment,
            file,
        } => {
            if let Some(dir) = output {
                config.output_dir = Some(dir);
            }
            if let Some(set) = templates {
                config.templates = set;
            }
            if let Some(style) = style {
                config.reference_style = style;
            }
            if line_comment.is_some() {
                config.line_comment = line_comment;
            }
            let ctx = Context::new(config, base_dir);
            commands::build(
                &ctx,
                commands::BuildOptions {
                    file,
                    quiet: cli.quiet,
                },
            )
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}
