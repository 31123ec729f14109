//! Storyloom - a terminal editor for branching choose-your-path stories.
//!
//! # Usage
//!
//! ```bash
//! storyloom
//! storyloom "The Long Dark"
//! storyloom --export-dir stories
//! storyloom play the_long_dark.json
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use storyloom::app::App;
use storyloom::config::{
    ConfigFlags, clear_config_flags, global_config_path, load_config_flags, local_override_path,
    parse_flag_tokens, save_config_flags,
};
use storyloom::story::export::read_story;
use storyloom::trace;

/// A terminal editor for branching choose-your-path stories
#[derive(Parser, Debug)]
#[command(name = "storyloom", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Title for the story being edited
    #[arg(value_name = "TITLE")]
    title: Option<String>,

    /// Directory exported stories are written into
    #[arg(long, value_name = "DIR")]
    export_dir: Option<PathBuf>,

    /// Start on the raw JSON view
    #[arg(long)]
    json: bool,

    /// Append dispatched messages and effect outcomes to a log file
    #[arg(long, value_name = "PATH")]
    action_log: Option<PathBuf>,

    /// Save current command-line flags as defaults in the config file
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Play an exported story without the editor
    Play {
        /// Exported story JSON file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    let action_log_path = effective
        .action_log
        .clone()
        .or_else(|| std::env::var_os("STORYLOOM_ACTION_LOG").map(PathBuf::from));
    if let Err(err) = trace::set_log_path(action_log_path.as_deref()) {
        eprintln!(
            "[warn] Failed to initialize action log {}: {}",
            action_log_path
                .as_ref()
                .map_or_else(|| "<unset>".to_string(), |p| p.display().to_string()),
            err
        );
    }

    let export_dir = effective
        .export_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));

    let app_base = App::new().with_export_dir(export_dir).with_config_paths(
        Some(global_path.clone()),
        if local_path.exists() {
            Some(local_path.clone())
        } else {
            None
        },
    );

    let mut app = match cli.command {
        Some(Commands::Play { file }) => {
            if !file.exists() {
                anyhow::bail!("File not found: {}", file.display());
            }
            let story = read_story(&file)
                .with_context(|| format!("Failed to load story {}", file.display()))?;
            app_base.with_story(story).with_play_only(true)
        }
        None => app_base
            .with_title(cli.title)
            .with_json_view(effective.json),
    };

    app.run().context("Application error")
}
