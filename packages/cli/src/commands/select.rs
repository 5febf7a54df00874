use super::SourceArgs;
use crate::config::Config;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use guide_editor::{EditorHost, SelectOutcome};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Args)]
pub struct SelectArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Index of the picker block (0-based)
    #[arg(short, long)]
    pub block: usize,

    /// Entity id to select ("" clears the selection)
    #[arg(short, long)]
    pub id: String,
}

pub async fn select(args: SelectArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let content = args.source.read_input()?;
    let gateway = args.source.gateway(&config)?;

    let changes = Rc::new(RefCell::new(0usize));
    let counter = changes.clone();
    let mut host = EditorHost::mount(
        &content,
        move |_| *counter.borrow_mut() += 1,
        gateway,
        args.source.editor_config(&config),
    )?;
    host.settle().await;

    let instance = host
        .editor()
        .and_then(|editor| editor.instance_at(args.block))
        .ok_or_else(|| anyhow!("No editable block at index {}", args.block))?;

    if !args.id.is_empty() {
        if let Some(error) = host.editor().and_then(|editor| editor.load_error(instance)) {
            return Err(anyhow!(
                "Block {} has no entity list to select from: {}",
                args.block,
                error
            ));
        }
    }

    match host.select(instance, &args.id)? {
        SelectOutcome::NotFound => {
            return Err(anyhow!("{} is not a selectable entity in block {}", args.id, args.block))
        }
        SelectOutcome::NotReady => {
            return Err(anyhow!("Block {} is not interactive yet", args.block))
        }
        SelectOutcome::Unsupported => {
            return Err(anyhow!("Block {} is not a picker block", args.block))
        }
        outcome if !outcome.changed() => {
            eprintln!("{}", "Selection unchanged".yellow());
        }
        _ => {}
    }

    println!("{}", host.value());
    eprintln!("{} {} change(s) forwarded", "✓".green(), changes.borrow());
    Ok(())
}
