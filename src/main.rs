mod config;
mod db;
mod entities;
mod error;
mod schema;

use std::str::FromStr;

use crate::{config::Config, error::CinemaError};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Command {
    Up,
    Down,
    Status,
}

impl FromStr for Command {
    type Err = CinemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" | "apply" => Ok(Command::Up),
            "down" | "revert" => Ok(Command::Down),
            "status" => Ok(Command::Status),
            other => Err(CinemaError::UnknownCommand(other.to_string())),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,cinema=debug,sqlx=warn".to_string()),
        )
        .init();

    let command: Command = std::env::args().nth(1).as_deref().unwrap_or("up").parse()?;
    let config = Config::from_env()?;

    let db = db::connect(&config).await?;

    match command {
        Command::Up => {
            db::apply(&db).await?;
        },
        Command::Down => {
            db::revert(&db).await?;
        },
        Command::Status => {},
    }

    let report = schema::inspect(&db).await?;
    if report.is_absent() {
        tracing::info!(?command, "no cinema tables present");
    } else if !report.is_complete() {
        tracing::warn!(?command, "cinema schema is incomplete");
    } else {
        tracing::info!(?command, "cinema schema is complete");
    }
    println!("{}", serde_json::to_string_pretty(&report)?);

    db.close().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands() {
        assert_eq!("up".parse::<Command>().unwrap(), Command::Up);
        assert_eq!("REVERT".parse::<Command>().unwrap(), Command::Down);
        assert_eq!(" status ".parse::<Command>().unwrap(), Command::Status);
    }

    #[test]
    fn rejects_unknown_command() {
        let err = "seed".parse::<Command>().unwrap_err();
        assert!(matches!(err, CinemaError::UnknownCommand(ref cmd) if cmd == "seed"));
    }
}
