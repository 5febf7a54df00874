use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use guide_editor::Registry;

#[derive(Debug, Args)]
pub struct ToolsArgs {
    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

/// List the block tools a document can use
pub fn tools(args: ToolsArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let registry = Registry::with_defaults(config.editor.plugin_config());

    if args.json {
        let tools: Vec<_> = registry
            .tools()
            .map(|(tag, descriptor)| {
                serde_json::json!({
                    "tag": tag,
                    "title": descriptor.title,
                    "picker": descriptor.kind.is_picker(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&tools)?);
        return Ok(());
    }

    for (tag, descriptor) in registry.tools() {
        let title = if descriptor.kind.is_picker() {
            descriptor.title.bright_blue().bold()
        } else {
            descriptor.title.normal()
        };
        println!("  {:<16} {}", tag, title);
    }
    Ok(())
}
