use anyhow::Result;
use clap::Args;
use colored::Colorize;
use guide_document::Document;
use std::fs;
use std::io::Read;

#[derive(Debug, Args)]
pub struct NormalizeArgs {
    /// Document JSON file ("-" reads stdin)
    #[arg(default_value = "-")]
    pub input: String,

    /// Rewrite the input file instead of printing
    #[arg(short, long)]
    pub write: bool,
}

/// Load and save a document without mounting it. Malformed input fails
/// here instead of silently becoming an empty document.
pub fn normalize(args: NormalizeArgs) -> Result<()> {
    let content = if args.input == "-" {
        let mut content = String::new();
        std::io::stdin().read_to_string(&mut content)?;
        content
    } else {
        fs::read_to_string(&args.input)?
    };

    let document = Document::load(Some(&content))?;
    let output = document.to_json()?;

    if args.write && args.input != "-" {
        fs::write(&args.input, &output)?;
        eprintln!(
            "{} {} ({} blocks)",
            "✓".green(),
            args.input,
            document.len()
        );
    } else {
        println!("{}", output);
    }
    Ok(())
}
