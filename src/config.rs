use std::env;

/// Process configuration, read once at startup
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// MongoDB connection string; the path names the database
    pub database_url: String,
    /// Frontend origin allowed by CORS
    pub cors_origin: String,
    pub bcrypt_cost: u32,
}

impl Config {
    /// Loads `.env` (if present) and reads the environment
    pub fn from_env() -> Result<Self, String> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| "DATABASE_URL must be set".to_string())?;

        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| format!("Invalid PORT: {}", raw))?,
            None => 5000,
        };

        let bcrypt_cost = match lookup("BCRYPT_COST") {
            Some(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|cost| (4..=31).contains(cost))
                .ok_or_else(|| format!("Invalid BCRYPT_COST: {} (expected 4-31)", raw))?,
            None => bcrypt::DEFAULT_COST,
        };

        Ok(Config {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            database_url,
            cors_origin: lookup("CORS_ORIGIN").unwrap_or_else(|| "http://localhost:3000".to_string()),
            bcrypt_cost,
        })
    }
}
