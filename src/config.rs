use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub host: String,
    pub port: u16,

    /// Master secret for signing flash cookies.
    pub secret_key: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://pancrepal.db?mode=rwc".into()),
            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),

            secret_key: env::var("SECRET_KEY")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "dev".into()),
        }
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listen_addr_joins_host_and_port() {
        let config = Config {
            database_url: "sqlite::memory:".into(),
            database_max_connections: 1,
            host: "127.0.0.1".into(),
            port: 5000,
            secret_key: "dev".into(),
        };
        assert_eq!(config.listen_addr(), "127.0.0.1:5000");
    }
}
