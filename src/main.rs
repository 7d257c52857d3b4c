mod config;
mod logging;
mod playlist;
mod ports;
mod services;
mod sync;
#[cfg(test)]
mod test_utils;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::{
    Result,
    eyre::{Context, eyre},
};

use crate::{
    config::Config,
    logging::setup_logging,
    services::log_reporter::LogReporter,
    sync::{SyncOptions, SyncSession},
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The config file to use
    #[arg(short, long, env = "PLAYLIST_SYNC_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Console log level (default: debug)
    #[arg(long, default_value = "debug", global = true, env = "LOG_LEVEL")]
    log_level: log::LevelFilter,

    /// Don't write too much: caps the console log level at info
    #[arg(short, long, global = true)]
    silent: bool,

    /// File log level (default: debug)
    #[arg(long, default_value = "debug", global = true)]
    log_file_level: log::LevelFilter,

    /// Path to log file
    #[arg(long, env = "PLAYLIST_SYNC_LOG_FILE", global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

fn is_directory(s: &str) -> Result<PathBuf, String> {
    let p: PathBuf = s.into();
    if p.is_dir() {
        Ok(p)
    } else {
        Err(format!("`{}` is not an existing directory", s))
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Synchronize a directory with a playlist
    Sync {
        /// Playlist specifying which files from source should appear in dest (`-` for stdin)
        #[arg(short, long)]
        playlist: PathBuf,

        /// Source directory with the music
        #[arg(long, value_parser = is_directory, env = "PLAYLIST_SYNC_SOURCE")]
        source: Option<PathBuf>,

        /// Target directory
        #[arg(long, env = "PLAYLIST_SYNC_DEST")]
        dest: Option<PathBuf>,

        /// Don't delete files that aren't in the playlist
        #[arg(long)]
        no_delete: bool,

        /// Print what would be done without touching the filesystem
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Lowercase names and strip punctuation and diacritics in dest
        #[arg(long)]
        normalize_names: bool,
    },
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Create a default config file, if it doesn't exist
    CreateDefault,
    /// Print the path to the config file
    Path,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    let console_level = if args.silent {
        args.log_level.min(log::LevelFilter::Info)
    } else {
        args.log_level
    };
    setup_logging(console_level, args.log_file.clone(), args.log_file_level)?;

    log::debug!("Loading configuration");
    let config = {
        if let Some(config) = &args.config {
            Config::from_file(config)
        } else {
            Config::load()
        }
    }
    .with_context(|| "Failed to load playlist-sync config")?;

    match args.command {
        Commands::Sync {
            playlist,
            source,
            dest,
            no_delete,
            dry_run,
            normalize_names,
        } => {
            let source = source.or_else(|| config.source_path()).ok_or_else(|| {
                eyre!("No source directory given. Pass --source or set `source` in the config")
            })?;
            let dest = dest.or_else(|| config.dest_path()).ok_or_else(|| {
                eyre!("No destination directory given. Pass --dest or set `dest` in the config")
            })?;
            if !source.is_dir() {
                return Err(eyre!("`{}` is not an existing directory", source.display()));
            }
            let source = std::path::absolute(&source)
                .with_context(|| format!("Failed to resolve source: {}", source.display()))?;
            let dest = std::path::absolute(&dest)
                .with_context(|| format!("Failed to resolve destination: {}", dest.display()))?;

            let options = SyncOptions {
                dry_run,
                normalize_names: normalize_names || config.normalize_names,
            };
            let skip_delete = no_delete || config.no_delete;

            log::info!("Loading playlist.");
            let entries = crate::playlist::load(&playlist)?;

            let session =
                SyncSession::new(entries, source, dest, &options, Box::new(LogReporter));
            log::debug!(
                "Syncing {} files from {} to {}",
                session.mapping().len(),
                session.source_root().display(),
                session.destination_root().display()
            );

            let summary = session
                .run(skip_delete)
                .wrap_err("Synchronization failed")?;

            if let Some(negative) = summary.negative {
                log::info!(
                    "Removed {} files and {} directories",
                    negative.removed_files,
                    negative.removed_dirs
                );
            }
            log::info!(
                "Copied {} files, {} already up to date, {} skipped",
                summary.positive.copied,
                summary.positive.up_to_date,
                summary.positive.skipped
            );
            log::info!("Done.");
        }
        Commands::Config(config_commands) => match config_commands {
            ConfigCommands::CreateDefault => {
                log::debug!("Creating default config");
                let path = Config::create_default()?;
                println!("{}", path.display());
            }
            ConfigCommands::Path => match Config::config_path() {
                Some(path) => println!("{}", path.display()),
                None => println!("No default config path found"),
            },
        },
    }

    Ok(())
}
