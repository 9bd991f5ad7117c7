//! eaglescript CLI - build Eagle scripts from board descriptions and check them.

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use eaglescript::{EagleScriptCore, RenderOptions, RenderResult, ScriptSummary};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "eaglescript")]
#[command(about = "Eagle PCB script generator", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a board description and write its script
    Render {
        /// Path to a JSON board description
        #[arg(value_name = "DESCRIPTION")]
        file: PathBuf,

        /// Script file to write (defaults to the description's output)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Print the script instead of writing a file
        #[arg(long)]
        stdout: bool,

        /// Output format for the summary
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,
    },

    /// Read a generated script back and summarize it
    Check {
        /// Path to a .scr file
        #[arg(value_name = "SCRIPT")]
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output for scripting
    Json,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let exit_code = match cli.command {
        Commands::Render {
            file,
            output,
            stdout,
            format,
        } => handle_render(&file, output, stdout, format),
        Commands::Check { file, format } => handle_check(&file, format),
    };

    process::exit(exit_code);
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn handle_render(file: &Path, output: Option<PathBuf>, stdout: bool, format: OutputFormat) -> i32 {
    let options = RenderOptions {
        output,
        dry_run: stdout,
    };
    tracing::debug!("Rendering {}", file.display());

    match EagleScriptCore::render(file, options) {
        Ok(result) => {
            if stdout {
                print!("{}", result.script);
            } else {
                output_render(&result, &format);
            }
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn handle_check(file: &Path, format: OutputFormat) -> i32 {
    match EagleScriptCore::check(file) {
        Ok(summary) => {
            output_summary(file, &summary, &format);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn output_render(result: &RenderResult, format: &OutputFormat) {
    match format {
        OutputFormat::Human => {
            println!("\nDescription: {}", result.description.display());
            println!("Script:      {}", result.output.display());
            print_summary(&result.summary);
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "description": result.description.display().to_string(),
                "output": result.output.display().to_string(),
                "summary": result.summary,
            });
            print_json(&output);
        }
    }
}

fn output_summary(file: &Path, summary: &ScriptSummary, format: &OutputFormat) {
    match format {
        OutputFormat::Human => {
            println!("\nFile: {}", file.display());
            print_summary(summary);
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "file": file.display().to_string(),
                "summary": summary,
            });
            print_json(&output);
        }
    }
}

fn print_summary(summary: &ScriptSummary) {
    println!("{}", "─".repeat(60));
    let layers: Vec<String> = summary.layers.iter().map(|l| l.to_string()).collect();
    println!("  Statements:  {}", summary.statements);
    println!("  Signals:     {}", summary.signals);
    println!("  Wires:       {}", summary.wires);
    println!("  Wire length: {:.3}mm", summary.wire_length);
    println!("  Layers:      {}", layers.join(", "));
    println!("  Footprints:  {}", summary.footprints);
}

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(e) => eprintln!("Error: {}", e),
    }
}
