use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod cli;
mod command;
mod domain;
mod export;
mod share;
mod state;
mod storage;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let data_dir = cli.data_dir;

    match cli.command {
        Some(Commands::New { name }) => command::run_new(data_dir, &name)?,
        Some(Commands::Show) => command::run_show(data_dir)?,
        Some(Commands::Task { action }) => command::run_task(data_dir, action)?,
        Some(Commands::Subtask { action }) => command::run_subtask(data_dir, action)?,
        Some(Commands::Error { action }) => command::run_error(data_dir, action)?,
        Some(Commands::Obs { text }) => command::run_obs(data_dir, &text)?,
        Some(Commands::Team { action }) => command::run_team(data_dir, action)?,
        Some(Commands::Save) => command::run_save(data_dir)?,
        Some(Commands::Lists) => command::run_lists(data_dir)?,
        Some(Commands::Open { list }) => command::run_open(data_dir, &list)?,
        Some(Commands::Delete { list }) => command::run_delete(data_dir, &list)?,
        Some(Commands::Rename { list, new_name }) => {
            command::run_rename(data_dir, &list, &new_name)?
        }
        Some(Commands::Duplicate { list }) => command::run_duplicate(data_dir, &list)?,
        Some(Commands::Reorder { list, position }) => {
            command::run_reorder(data_dir, &list, position)?
        }
        Some(Commands::Share {
            list,
            shorten,
            open,
        }) => command::run_share(data_dir, list, shorten, open).await?,
        Some(Commands::Import {
            url,
            overwrite,
            copy,
        }) => command::run_import(data_dir, &url, overwrite, copy)?,
        Some(Commands::Export { format, list, out }) => {
            command::run_export(data_dir, &format, list, out)?
        }
        Some(Commands::Restore { file, yes }) => command::run_restore(data_dir, &file, yes)?,
        Some(Commands::Status) => command::run_status(data_dir)?,
        Some(Commands::Theme { value }) => command::run_theme(data_dir, value)?,
        Some(Commands::Edit { autosave_secs }) => {
            command::run_edit(data_dir, autosave_secs).await?
        }
        None => {
            // No command specified, show help
            eprintln!("No command specified. Use --help for usage information.");
            eprintln!("Use 'listo new <name>' to start a list or 'listo lists' to browse saved ones.");
        }
    }

    Ok(())
}
