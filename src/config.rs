use anyhow::{Context, Result};
use clap::Parser;
use std::env;

/// Centralized application configuration.
/// Combines environment variables and CLI arguments.
///
/// The five storage settings (endpoint, region, access key, secret key,
/// bucket) are required; a missing one is a startup failure, never a
/// runtime one.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub endpoint: String,
    pub region: String,
    pub access_key: String,
    pub secret_key: String,
    pub bucket: String,
    pub path_style: bool,
}

/// Command-line + environment configuration.
#[derive(Parser, Debug)]
#[command(author, version, about = "Web file browser for S3-compatible object storage")]
pub struct Args {
    /// Host to bind to (overrides BUCKET_BROWSER_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides BUCKET_BROWSER_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Storage endpoint URL (overrides BUCKET_BROWSER_ENDPOINT)
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Storage region (overrides BUCKET_BROWSER_REGION)
    #[arg(long)]
    pub region: Option<String>,

    /// Access key (overrides BUCKET_BROWSER_ACCESS_KEY)
    #[arg(long)]
    pub access_key: Option<String>,

    /// Secret key (overrides BUCKET_BROWSER_SECRET_KEY)
    #[arg(long)]
    pub secret_key: Option<String>,

    /// Bucket to browse (overrides BUCKET_BROWSER_BUCKET)
    #[arg(long)]
    pub bucket: Option<String>,

    /// Use path-style addressing (overrides BUCKET_BROWSER_PATH_STYLE)
    #[arg(long)]
    pub path_style: Option<bool>,
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig.
    pub fn from_env_and_args() -> Result<Self> {
        Self::merge(Args::parse())
    }

    fn merge(args: Args) -> Result<Self> {
        // --- Environment fallback ---
        let env_host = env::var("BUCKET_BROWSER_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let env_port = match env::var("BUCKET_BROWSER_PORT") {
            Ok(value) => value
                .parse::<u16>()
                .with_context(|| format!("parsing BUCKET_BROWSER_PORT value `{}`", value))?,
            Err(env::VarError::NotPresent) => 3000,
            Err(err) => return Err(err).context("reading BUCKET_BROWSER_PORT"),
        };
        let env_path_style = match env::var("BUCKET_BROWSER_PATH_STYLE") {
            Ok(value) => value
                .parse::<bool>()
                .with_context(|| format!("parsing BUCKET_BROWSER_PATH_STYLE value `{}`", value))?,
            Err(env::VarError::NotPresent) => true,
            Err(err) => return Err(err).context("reading BUCKET_BROWSER_PATH_STYLE"),
        };

        // --- Merge ---
        let cfg = Self {
            host: args.host.unwrap_or(env_host),
            port: args.port.unwrap_or(env_port),
            endpoint: required(args.endpoint, "BUCKET_BROWSER_ENDPOINT")?,
            region: required(args.region, "BUCKET_BROWSER_REGION")?,
            access_key: required(args.access_key, "BUCKET_BROWSER_ACCESS_KEY")?,
            secret_key: required(args.secret_key, "BUCKET_BROWSER_SECRET_KEY")?,
            bucket: required(args.bucket, "BUCKET_BROWSER_BUCKET")?,
            path_style: args.path_style.unwrap_or(env_path_style),
        };

        Ok(cfg)
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// A required setting: CLI flag first, then environment, else a startup
/// error naming the missing variable.
fn required(arg: Option<String>, var: &str) -> Result<String> {
    if let Some(value) = arg {
        return Ok(value);
    }
    let value = env::var(var).with_context(|| format!("{var} must be set"))?;
    if value.trim().is_empty() {
        anyhow::bail!("{var} must not be empty");
    }
    Ok(value)
}
