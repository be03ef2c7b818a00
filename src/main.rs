use anyhow::{Context, Result};
use clap::Parser;
use rusqlite::Connection;

use pace::cli::args::{Cli, Commands};
use pace::cli::handlers;
use pace::config::AppConfig;
use pace::db::migrations::run_migrations;
use pace::utils::dates;

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = AppConfig::load().context("Loading config")?;

    // Ensure data directory exists and open DB
    AppConfig::ensure_data_dir()?;
    let db_path = AppConfig::db_path()?;
    let conn = Connection::open(&db_path)
        .with_context(|| format!("Opening database at {:?}", db_path))?;
    log::debug!("using database {:?}", db_path);

    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    run_migrations(&conn)?;

    let today = dates::today();

    match cli.command {
        Some(Commands::Add {
            name,
            kind,
            goal,
            reminder,
        }) => {
            handlers::handle_add(
                &conn,
                &config,
                &name,
                kind.as_deref(),
                goal,
                reminder.as_deref(),
            )?;
        }
        Some(Commands::List { json }) => {
            handlers::handle_list(&conn, today, json)?;
        }
        Some(Commands::Done { habit, value, date }) => {
            handlers::handle_done(&conn, today, &habit, value, date.as_deref())?;
        }
        Some(Commands::Undo { habit, date }) => {
            handlers::handle_undo(&conn, today, &habit, date.as_deref())?;
        }
        Some(Commands::Streak { habit, json }) => {
            handlers::handle_streak(&conn, today, &habit, json)?;
        }
        Some(Commands::Review { habit, dry_run }) => {
            handlers::handle_review(&conn, &config, today, habit.as_deref(), dry_run)?;
        }
        Some(Commands::Delete { habit }) => {
            handlers::handle_delete(&conn, &habit)?;
        }
        // No subcommand → today's overview
        Some(Commands::Today) | None => {
            handlers::handle_today(&conn, today)?;
        }
    }

    Ok(())
}
