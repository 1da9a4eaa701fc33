use std::env;

use crate::core::logging::LogLevel;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub supabase: SupabaseConfig,
    pub log: LogConfig,
    pub swagger: SwaggerConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
}

/// Connection settings for the hosted Supabase project
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    /// Project base URL, without trailing slash
    pub url: String,
    /// Project API key (sent as `apikey` and as the default bearer token)
    pub api_key: String,
    /// Storage bucket holding avatar images
    pub avatar_bucket: String,
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: LogLevel,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            supabase: SupabaseConfig::from_env()?,
            log: LogConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
        })
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        let cors_allowed_origins = parse_origins(
            &env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| "*".to_string()),
        );

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl SupabaseConfig {
    const DEFAULT_AVATAR_BUCKET: &'static str = "avatars";

    pub fn from_env() -> Result<Self, String> {
        let url = env::var("SUPABASE_URL")
            .map_err(|_| "SUPABASE_URL environment variable is required".to_string())?;

        let api_key = env::var("SUPABASE_KEY")
            .map_err(|_| "SUPABASE_KEY environment variable is required".to_string())?;

        let avatar_bucket = env::var("SUPABASE_AVATAR_BUCKET")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| Self::DEFAULT_AVATAR_BUCKET.to_string());

        Ok(Self::new(url, api_key, avatar_bucket))
    }

    pub fn new(
        url: impl Into<String>,
        api_key: impl Into<String>,
        avatar_bucket: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            avatar_bucket: avatar_bucket.into(),
        }
    }

    /// Base URL of the PostgREST endpoint
    pub fn rest_url(&self) -> String {
        format!("{}/rest/v1", self.url)
    }

    /// Base URL of the GoTrue auth endpoint
    pub fn auth_url(&self) -> String {
        format!("{}/auth/v1", self.url)
    }

    /// Base URL of the storage endpoint
    pub fn storage_url(&self) -> String {
        format!("{}/storage/v1", self.url)
    }
}

impl LogConfig {
    pub fn from_env() -> Result<Self, String> {
        let level = match env::var("LOG_LEVEL") {
            Ok(value) => value
                .parse::<LogLevel>()
                .map_err(|e| format!("Invalid LOG_LEVEL: {}", e))?,
            Err(_) => LogLevel::default(),
        };

        Ok(Self { level })
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        let title = env::var("SWAGGER_TITLE").unwrap_or_else(|_| "Profiles API".to_string());
        let version =
            env::var("SWAGGER_VERSION").unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_string());
        let description = env::var("SWAGGER_DESCRIPTION")
            .unwrap_or_else(|_| "User sign-up and profile management".to_string());

        Ok(Self {
            title,
            version,
            description,
        })
    }
}

/// Parse a comma-separated origin list, dropping blanks
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
