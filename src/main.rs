//! Nimbus Term - terminal client for the Nimbus remote drive
//!
//! Usage:
//!   nimbusterm                 Interactive terminal
//!   nimbusterm -c "command"    Execute single command

use std::env;
use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use nimbus_term::config::Config;
use nimbus_term::notify::ConsoleNotifier;
use nimbus_term::remote::http::HttpRemoteFs;
use nimbus_term::shell::block::{Block, OutputLevel, ProgressStatus};
use nimbus_term::shell::input::{InputResult, TermInput};
use nimbus_term::shell::picker::PromptPicker;
use nimbus_term::shell::registry::CommandId;
use nimbus_term::Shell;

fn init_logging() {
    let filter = EnvFilter::try_from_env("NIMBUS_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let args: Vec<String> = env::args().collect();

    if args.len() > 1 {
        match args[1].as_str() {
            "-c" => {
                if args.len() < 3 {
                    eprintln!("nimbusterm: -c requires an argument");
                    std::process::exit(1);
                }
                let cmd = args[2..].join(" ");
                let code = execute_command(&cmd).await?;
                std::process::exit(code);
            }
            "-h" | "--help" => {
                print_help();
                return Ok(());
            }
            "-v" | "--version" => {
                println!("Nimbus Term v{}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            _ => {
                eprintln!("nimbusterm: unknown option: {}", args[1]);
                std::process::exit(1);
            }
        }
    }

    let code = run_repl().await?;
    std::process::exit(code);
}

fn print_help() {
    println!("{}", "Nimbus Term - remote drive terminal".bold());
    println!();
    println!("Usage:");
    println!("  nimbusterm                 Start the interactive terminal");
    println!("  nimbusterm -c \"command\"    Execute a single command");
    println!("  nimbusterm -h, --help      Show this help");
    println!("  nimbusterm -v, --version   Show version");
    println!();
    println!("Configuration: NIMBUS_API_URL or config.toml under the user config dir.");
    println!("Type 'help' in the terminal for available commands.");
}

fn print_banner() {
    println!(
        "{}",
        format!("Nimbus Term v{}", env!("CARGO_PKG_VERSION"))
            .cyan()
            .bold()
    );
    println!(
        "  {} for commands, {} to leave, {} to complete",
        "help".green(),
        "exit".green(),
        "Tab".yellow()
    );
    println!();
}

fn build_shell(config: &Config) -> Result<Shell> {
    let remote = HttpRemoteFs::new(&config.api_base_url, config.request_timeout())?;
    Ok(Shell::new(
        Arc::new(remote),
        Arc::new(PromptPicker::new(config.picker_timeout())),
        Arc::new(ConsoleNotifier::new()),
        "/",
        config.download_dir(),
    ))
}

/// Print freshly appended transcript blocks; returns the exit status the
/// batch implies (1 when any error block was rendered).
fn render_blocks(blocks: &[Block]) -> i32 {
    let mut status = 0;
    for block in blocks {
        match block {
            // The typed line is already on screen.
            Block::Command { .. } => {}
            Block::Nope => {}
            Block::Clear => print!("\x1b[2J\x1b[H"),
            Block::Output { level, content } => match level {
                OutputLevel::Default => println!("{content}"),
                OutputLevel::Info => println!("{}", content.cyan()),
                OutputLevel::Success => println!("{}", content.green()),
                OutputLevel::Error => {
                    status = 1;
                    println!("{}", content.red());
                }
                OutputLevel::Muted => println!("{}", content.bright_black()),
            },
            Block::Progress {
                subject,
                loaded,
                total,
                status: progress,
                ..
            } => {
                let marker = match progress {
                    ProgressStatus::Success => "✓".green(),
                    ProgressStatus::Error => "✗".red(),
                    _ => "…".bright_black(),
                };
                if *progress == ProgressStatus::Error {
                    status = 1;
                }
                println!("{} {} ({} / {} bytes)", marker, subject, loaded, total);
            }
        }
    }
    status
}

async fn execute_command(cmd: &str) -> Result<i32> {
    let config = Config::load()?;
    let shell = build_shell(&config)?;
    shell.refresh_listing();
    shell.submit(cmd).await;
    Ok(render_blocks(&shell.take_unrendered()))
}

async fn run_repl() -> Result<i32> {
    print_banner();

    let config = Config::load()?;
    let shell = build_shell(&config)?;
    shell.refresh_listing();

    let mut input = TermInput::new(CommandId::completion_names());
    let mut status = 0;

    loop {
        input.set_entries(shell.workspace().entry_names());

        match input.read_line(&shell.prompt())? {
            InputResult::Line(line) => {
                let line = line.trim().to_string();
                if line.is_empty() {
                    continue;
                }
                if line == "exit" || line == "quit" {
                    break;
                }
                input.add_history(line.clone());
                shell.submit(&line).await;
                status = render_blocks(&shell.take_unrendered());
            }
            InputResult::Interrupt => {
                println!("^C");
            }
            InputResult::Eof => break,
        }
    }

    println!("Goodbye!");
    Ok(status)
}
