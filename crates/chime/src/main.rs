// SPDX-FileCopyrightText: 2026 Chime Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chime - An always-on reminder daemon.
//!
//! This is the binary entry point for the Chime daemon.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use chime_config::ChimeConfig;

mod add;
mod console;
mod delete;
mod list;
mod parse;
mod serve;

/// Chime - An always-on reminder daemon.
#[derive(Parser, Debug)]
#[command(name = "chime", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the Chime reminder daemon.
    Serve {
        /// Explicit config file path (skips the XDG hierarchy).
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Resolve a temporal expression and print the outcome.
    Parse {
        /// The expression to resolve, e.g. "2d", "eoy", "5th july 15:00".
        #[arg(required = true)]
        text: Vec<String>,
        /// IANA timezone for wall-clock interpretation. Defaults to the
        /// configured time.default_timezone.
        #[arg(long)]
        timezone: Option<String>,
        /// Reference instant as RFC 3339. Defaults to the current time.
        #[arg(long)]
        now: Option<String>,
    },
    /// Create a reminder from a temporal expression.
    Add {
        /// When to fire, e.g. "2d", "tomorrow 9am", "every other friday".
        #[arg(required = true)]
        when: Vec<String>,
        /// The reminder text to deliver.
        #[arg(long, short)]
        message: String,
        /// Author the reminder belongs to.
        #[arg(long, default_value = "console")]
        author: String,
        /// Channel surface the reminder fires on.
        #[arg(long, default_value = "console")]
        channel: String,
        /// IANA timezone for wall-clock interpretation. Defaults to the
        /// configured time.default_timezone.
        #[arg(long)]
        timezone: Option<String>,
    },
    /// List reminders for an author.
    List {
        /// Author whose reminders to show.
        #[arg(long, default_value = "console")]
        author: String,
    },
    /// Delete a reminder before it fires.
    Delete {
        /// The reminder id as printed by `chime add` or `chime list`.
        id: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config } => {
            let config = load_config_or_exit(config.as_deref());
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("chime serve failed: {e}");
                std::process::exit(1);
            }
        }
        Commands::Parse {
            text,
            timezone,
            now,
        } => {
            let config = load_config_or_exit(None);
            let text = text.join(" ");
            if let Err(e) = parse::run_parse(&text, timezone.as_deref(), now.as_deref(), &config)
            {
                eprintln!("chime parse failed: {e}");
                std::process::exit(1);
            }
        }
        Commands::Add {
            when,
            message,
            author,
            channel,
            timezone,
        } => {
            let config = load_config_or_exit(None);
            let when = when.join(" ");
            if let Err(e) = add::run_add(
                &when,
                &message,
                &author,
                &channel,
                timezone.as_deref(),
                &config,
            )
            .await
            {
                eprintln!("chime add failed: {e}");
                std::process::exit(1);
            }
        }
        Commands::List { author } => {
            let config = load_config_or_exit(None);
            if let Err(e) = list::run_list(&author, &config).await {
                eprintln!("chime list failed: {e}");
                std::process::exit(1);
            }
        }
        Commands::Delete { id } => {
            let config = load_config_or_exit(None);
            if let Err(e) = delete::run_delete(&id, &config).await {
                eprintln!("chime delete failed: {e}");
                std::process::exit(1);
            }
        }
    }
}

/// Load and validate configuration, rendering diagnostics and exiting on error.
fn load_config_or_exit(path: Option<&Path>) -> ChimeConfig {
    let result = match path {
        Some(p) => chime_config::load_and_validate_path(p),
        None => chime_config::load_and_validate(),
    };
    match result {
        Ok(config) => config,
        Err(errors) => {
            chime_config::render_errors(&errors);
            std::process::exit(1);
        }
    }
}
