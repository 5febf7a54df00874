pub mod normalize;
pub mod render;
pub mod select;
pub mod tools;

pub use normalize::{normalize, NormalizeArgs};
pub use render::{render, RenderArgs};
pub use select::{select, SelectArgs};
pub use tools::{tools, ToolsArgs};

use crate::config::Config;
use anyhow::{anyhow, Context, Result};
use clap::Args;
use guide_common::Language;
use guide_editor::EditorConfig;
use guide_gateway::{EntityGateway, HttpGateway, MemoryGateway};
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

/// Where the document and its catalog data come from
#[derive(Debug, Args)]
pub struct SourceArgs {
    /// Document JSON file ("-" reads stdin)
    #[arg(default_value = "-")]
    pub input: String,

    /// Serve entity lists from a catalog fixture instead of the API
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// API origin (overrides config)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Bearer token (overrides config)
    #[arg(long, env = "GUIDE_EDITOR_TOKEN")]
    pub token: Option<String>,

    /// Label language: en or ar (overrides config)
    #[arg(short, long)]
    pub lang: Option<Language>,
}

impl SourceArgs {
    pub fn read_input(&self) -> Result<String> {
        if self.input == "-" {
            let mut content = String::new();
            std::io::stdin()
                .read_to_string(&mut content)
                .context("Cannot read document from stdin")?;
            return Ok(content);
        }
        std::fs::read_to_string(&self.input)
            .with_context(|| format!("Cannot read document: {}", self.input))
    }

    pub fn editor_config(&self, config: &Config) -> EditorConfig {
        let mut editor = config.editor.clone();
        if let Some(language) = self.lang {
            editor.language = language;
        }
        editor
    }

    pub fn gateway(&self, config: &Config) -> Result<Arc<dyn EntityGateway>> {
        if let Some(path) = &self.catalog {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Cannot read catalog: {}", path.display()))?;
            let gateway = MemoryGateway::from_json(&content)
                .map_err(|e| anyhow!("Invalid catalog {}: {}", path.display(), e))?;
            return Ok(Arc::new(gateway));
        }

        let mut gateway = config.gateway.clone();
        if let Some(base_url) = &self.base_url {
            gateway.base_url = base_url.clone();
        }
        if let Some(token) = &self.token {
            gateway.access_token = Some(token.clone());
        }
        Ok(Arc::new(HttpGateway::new(gateway)?))
    }
}
