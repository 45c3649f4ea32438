//! worksite CLI
//!
//! Command-line interface for scheduling and tracking installation jobs.

mod cli_types;
mod commands;
mod error;
mod logger;
mod spinner;

use clap::Parser;

use cli_types::{Cli, Commands, ConfigAction, MediaAction, MediaCacheAction, ModeAction};
use commands::Context;
use error::CliError;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logger::init(cli.quiet, cli.verbose, cli.logfile.as_deref()) {
        eprintln!("Failed to set up logging: {}", e);
        std::process::exit(2);
    }

    if let Err(e) = run(cli) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    // Commands that only touch the settings file run without a store.
    match &cli.command {
        Commands::Config {
            action: ConfigAction::Path,
        } => return commands::config::run_config_path(),
        Commands::Mode {
            action: ModeAction::Set { mode },
        } => return commands::mode::run_mode_set(*mode),
        _ => {}
    }

    let ctx = Context::load(cli.mode, cli.quiet)?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::runtime(e.to_string()))?;

    runtime.block_on(async {
        match cli.command {
            Commands::List {
                q,
                status,
                start,
                end,
                archived,
                page,
                page_size,
                json,
            } => {
                let query = worksite_lib::ListQuery {
                    q,
                    status,
                    start,
                    end,
                    include_archived: archived,
                    page,
                    page_size,
                };
                commands::projects::run_list(&ctx, query, json).await
            }
            Commands::Show { id, json } => commands::projects::run_show(&ctx, id, json).await,
            Commands::Create { fields } => commands::projects::run_create(&ctx, fields).await,
            Commands::Update {
                id,
                fields,
                change_note,
            } => commands::projects::run_update(&ctx, id, fields, change_note).await,
            Commands::Archive { id } => commands::projects::run_archive(&ctx, id, true).await,
            Commands::Unarchive { id } => commands::projects::run_archive(&ctx, id, false).await,
            Commands::Delete { id, yes } => commands::projects::run_delete(&ctx, id, yes).await,
            Commands::Media { action } => match action {
                MediaAction::List { id } => commands::media::run_media_list(&ctx, id).await,
                MediaAction::Upload { id, files } => {
                    commands::media::run_media_upload(&ctx, id, files).await
                }
                MediaAction::Delete { id, media } => {
                    commands::media::run_media_delete(&ctx, id, &media).await
                }
                MediaAction::Clear { id, yes } => {
                    commands::media::run_media_clear(&ctx, id, yes).await
                }
            },
            Commands::Export {
                format,
                start,
                end,
                archived,
                out,
            } => commands::export::run_export(&ctx, format, start, end, archived, out).await,
            Commands::Calendar {
                month,
                location,
                weather,
                no_weather,
            } => {
                commands::calendar::run_calendar(&ctx, month, location, weather, no_weather).await
            }
            Commands::Seed { count } => commands::local::run_seed(&ctx, count),
            Commands::Stats => commands::local::run_stats(&ctx),
            Commands::Mode { action } => match action {
                ModeAction::Show => commands::mode::run_mode_show(&ctx),
                ModeAction::Set { mode } => commands::mode::run_mode_set(mode),
            },
            Commands::Config { action } => match action {
                ConfigAction::Show => commands::config::run_config_show(&ctx),
                ConfigAction::Path => commands::config::run_config_path(),
            },
            Commands::MediaCache { action } => match action {
                MediaCacheAction::Fetch { id, url, token } => {
                    commands::media_cache::run_fetch(&ctx, id, &url, token.as_deref()).await
                }
                MediaCacheAction::Remove { id, url, token } => {
                    commands::media_cache::run_remove(&ctx, id, &url, &token)
                }
                MediaCacheAction::Clear => commands::media_cache::run_clear(&ctx),
            },
        }
    })
}
