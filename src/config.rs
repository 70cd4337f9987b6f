use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub site: SiteConfig,
    pub storage: StorageConfig,
    /// JSON document imported into the metadata store at startup.
    pub seed_file: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_address: String,
    pub data_dir: String,
}

/// Presentation settings for redirects and rendered pages.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Where `GET /` redirects to.
    pub redirect_url: String,
    /// Shown in the embed page title ("<user> on <site_name>").
    pub site_name: String,
    pub stylesheet_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    Local,
    S3,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Directory for local storage backend
    pub local_storage_path: String,
    /// Object store endpoint, also the public prefix of every file URL
    pub endpoint: String,
    pub bucket: String,
    pub region: String,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    /// Upper bound on a single object fetch
    pub request_timeout: Duration,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            redirect_url: "https://higure.wtf".to_string(),
            site_name: "higure.wtf".to_string(),
            stylesheet_url: Some("https://cdn.higure.wtf/higure/cdn.css".to_string()),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Local,
            local_storage_path: "./files".to_string(),
            endpoint: String::new(),
            bucket: String::new(),
            region: "us-east-1".to_string(),
            access_key_id: None,
            secret_access_key: None,
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl StorageConfig {
    /// Public URL of an object: endpoint, bucket and key joined with `/`.
    pub fn cdn_url(&self, key: &str) -> String {
        format!(
            "{}/{}/{}",
            self.endpoint.trim_end_matches('/'),
            self.bucket,
            key
        )
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let bind_address = std::env::var("BIND_ADDRESS").unwrap_or_else(|_| {
            let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());
            format!("0.0.0.0:{port}")
        });

        let data_dir = std::env::var("DATA_DIR").unwrap_or_else(|_| "./data".to_string());
        let seed_file = std::env::var("SEED_FILE").ok().filter(|s| !s.is_empty());

        let defaults = SiteConfig::default();
        let site = SiteConfig {
            redirect_url: std::env::var("ROOT_REDIRECT_URL").unwrap_or(defaults.redirect_url),
            site_name: std::env::var("SITE_NAME").unwrap_or(defaults.site_name),
            stylesheet_url: match std::env::var("STYLESHEET_URL") {
                Ok(url) if url.is_empty() => None,
                Ok(url) => Some(url),
                Err(_) => defaults.stylesheet_url,
            },
        };

        let backend = match std::env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "local".to_string())
            .to_lowercase()
            .as_str()
        {
            "s3" => StorageBackend::S3,
            _ => StorageBackend::Local,
        };

        let request_timeout = std::env::var("UPSTREAM_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(30));

        let storage = StorageConfig {
            backend,
            local_storage_path: std::env::var("LOCAL_STORAGE_PATH")
                .unwrap_or_else(|_| "./files".to_string()),
            endpoint: std::env::var("S3_ENDPOINT").unwrap_or_default(),
            bucket: std::env::var("S3_BUCKET_NAME").unwrap_or_default(),
            region: std::env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
            access_key_id: std::env::var("AWS_ACCESS_KEY_ID").ok(),
            secret_access_key: std::env::var("AWS_SECRET_ACCESS_KEY").ok(),
            request_timeout,
        };

        let config = Config {
            server: ServerConfig {
                bind_address,
                data_dir,
            },
            site,
            storage,
            seed_file,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.endpoint.is_empty() {
            return Err(ConfigError::ValidationError(
                "S3_ENDPOINT is required to build file URLs".to_string(),
            ));
        }

        if self.storage.bucket.is_empty() {
            return Err(ConfigError::ValidationError(
                "S3_BUCKET_NAME is required to build file URLs".to_string(),
            ));
        }

        if self.storage.access_key_id.is_some() != self.storage.secret_access_key.is_some() {
            return Err(ConfigError::ValidationError(
                "AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY must be set together".to_string(),
            ));
        }

        if self.storage.backend == StorageBackend::Local && self.storage.access_key_id.is_some() {
            tracing::warn!("AWS credentials are ignored with STORAGE_BACKEND=local");
        }

        Ok(())
    }
}
