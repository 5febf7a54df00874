use super::SourceArgs;
use crate::config::Config;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use guide_editor::{EditorEvent, EditorHost};
use guide_render::HtmlOptions;

#[derive(Debug, Args)]
pub struct RenderArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Output format (html, json)
    #[arg(short, long, default_value = "html")]
    pub format: String,

    /// Single-line HTML
    #[arg(long)]
    pub compact: bool,
}

pub async fn render(args: RenderArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let content = args.source.read_input()?;
    let gateway = args.source.gateway(&config)?;

    let mut host = EditorHost::mount(&content, |_| {}, gateway, args.source.editor_config(&config))?;
    let events = host.settle().await;

    for event in &events {
        if let EditorEvent::FetchFailed { instance, error } = event {
            eprintln!("  {} {} - {}", "✗".red(), instance, error.to_string().red());
        }
    }

    let editor = host
        .editor()
        .ok_or_else(|| anyhow!("Editor was torn down before rendering"))?;
    let view = editor.view();

    let output = match args.format.as_str() {
        "html" => view.to_html(HtmlOptions {
            pretty: !args.compact,
            ..HtmlOptions::default()
        }),
        "json" => serde_json::to_string_pretty(&view)?,
        other => return Err(anyhow!("Unknown format: {}", other)),
    };
    println!("{}", output);

    eprintln!(
        "{} Rendered {} blocks ({} fetches)",
        "✅".green(),
        editor.len(),
        events.len()
    );
    Ok(())
}
