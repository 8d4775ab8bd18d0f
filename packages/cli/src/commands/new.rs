use super::write_output;
use crate::config::Config;
use anyhow::Result;
use blockpress_editor::finalize;
use blockpress_model::{Document, Status};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Args)]
pub struct NewArgs {
    /// Document title
    #[arg(short, long)]
    pub title: String,

    /// URL slug, stored as given
    #[arg(short, long)]
    pub slug: String,

    /// Status (defaults to the configured default status)
    #[arg(long)]
    pub status: Option<Status>,

    /// Output file (stdout if omitted)
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

pub fn new(args: NewArgs, config: &Config) -> Result<()> {
    let status = args.status.unwrap_or(config.default_status);
    let document = Document::new(args.title, args.slug).with_status(status);
    let payload = finalize(&document);

    info!(slug = %payload.slug, %status, "Creating document");
    write_output(&config.to_json(&payload)?, args.out.as_deref())?;

    if let Some(out) = &args.out {
        eprintln!("{} Created {} ({})", "✓".green(), out.display(), status.to_string().bright_white());
    }
    Ok(())
}
