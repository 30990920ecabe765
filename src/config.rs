use anyhow::Context;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    pub sql_logging: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://cinema.db?mode=rwc".to_string());

        let max_connections = parse_max_connections(
            &std::env::var("DB_MAX_CONNECTIONS").unwrap_or_else(|_| "5".to_string()),
        )?;

        let sql_logging = std::env::var("DB_SQL_LOGGING")
            .ok()
            .map(|s| matches!(s.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self { database_url, max_connections, sql_logging })
    }
}

fn parse_max_connections(raw: &str) -> anyhow::Result<u32> {
    let max_connections: u32 = raw.trim().parse().context("DB_MAX_CONNECTIONS")?;
    if max_connections == 0 {
        anyhow::bail!("DB_MAX_CONNECTIONS must be at least 1");
    }
    Ok(max_connections)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_connections_accepts_positive_values() {
        assert_eq!(parse_max_connections("8").unwrap(), 8);
        assert_eq!(parse_max_connections(" 1 ").unwrap(), 1);
    }

    #[test]
    fn max_connections_rejects_zero_and_garbage() {
        let err = parse_max_connections("0").unwrap_err();
        assert!(err.to_string().contains("at least 1"));

        assert!(parse_max_connections("many").is_err());
        assert!(parse_max_connections("-2").is_err());
    }
}
