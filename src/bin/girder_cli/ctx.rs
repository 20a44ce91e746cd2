#![deny(clippy::all, clippy::pedantic)]

use std::fs;
use std::sync::Arc;

use thiserror::Error;

use girder::application::render::{ContentRenderer, content_renderer};
use girder::config::{LoadError, Settings};
use girder::infra::http::{ApiClient, ApiError, MemoryCsrfToken, MemoryTokenStore};

use crate::args::Cli;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("site URL is required (use --site or GIRDER_SITE_URL)")]
    MissingSite,
    #[error("failed to read token file: {0}")]
    TokenFile(std::io::Error),
    #[error("failed to read input file {path}: {source}")]
    InputFile {
        path: String,
        source: std::io::Error,
    },
    #[error("configuration error: {0}")]
    Config(#[from] LoadError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

pub struct Ctx {
    pub api: ApiClient,
    pub tokens: Arc<MemoryTokenStore>,
    pub csrf: Arc<MemoryCsrfToken>,
    pub renderer: Arc<ContentRenderer>,
}

impl std::fmt::Debug for Ctx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ctx").finish_non_exhaustive()
    }
}

impl Ctx {
    pub fn new(site: &str, settings: &Settings, tokens: MemoryTokenStore) -> Result<Self, CliError> {
        let tokens = Arc::new(tokens);
        let csrf = Arc::new(MemoryCsrfToken::new());

        let api = ApiClient::builder(site)
            .token_store(Arc::clone(&tokens) as Arc<dyn girder::infra::http::TokenStore>)
            .csrf_source(Arc::clone(&csrf) as Arc<dyn girder::infra::http::CsrfTokenSource>)
            .retry_policy(settings.client.retry.policy())
            .timeout(settings.client.timeout())
            .build()?;

        Ok(Self {
            api,
            tokens,
            csrf,
            renderer: content_renderer(),
        })
    }
}

pub fn build_ctx_from_cli(cli: &Cli, settings: &Settings) -> Result<Ctx, CliError> {
    let site = cli
        .site
        .clone()
        .or_else(|| settings.client.site_url.clone())
        .ok_or(CliError::MissingSite)?;

    let access = if let Some(path) = &cli.token_file {
        Some(
            fs::read_to_string(path)
                .map_err(CliError::TokenFile)?
                .trim()
                .to_string(),
        )
    } else {
        cli.access_token_env.clone()
    };

    let tokens = match access {
        Some(access) => MemoryTokenStore::with_tokens(access, cli.refresh_token_env.clone()),
        None => MemoryTokenStore::new(),
    };

    Ctx::new(&site, settings, tokens)
}
