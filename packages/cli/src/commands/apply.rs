use super::{load_document, write_output};
use crate::config::Config;
use crate::script::{self, ScriptStep};
use anyhow::Result;
use blockpress_editor::{EditSession, MutationResult, SavePayload};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Args)]
pub struct ApplyArgs {
    /// Saved document to edit
    pub document: PathBuf,

    /// Edit script (JSON array of steps)
    pub script: PathBuf,

    /// Output file (stdout if omitted)
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Fail if any step is rejected
    #[arg(long)]
    pub strict: bool,
}

/// Outcome of replaying a script
#[derive(Debug)]
pub struct ApplyReport {
    pub payload: SavePayload,
    pub applied: usize,
    pub skipped: usize,
}

pub fn apply(args: ApplyArgs, config: &Config) -> Result<()> {
    let document = load_document(&args.document)?;
    let steps = script::load(&args.script)?;

    eprintln!(
        "{}",
        format!("📝 Applying {} steps to {}", steps.len(), args.document.display())
            .bright_blue()
            .bold()
    );

    let mut session = EditSession::with_options(document, &config.editor);
    let report = run_steps(&mut session, &steps, |index, step, result| match result {
        MutationResult::Applied { version } => {
            eprintln!("  {} {:>3} {} (v{})", "✓".green(), index + 1, step.name(), version);
        }
        MutationResult::Noop { reason } => {
            eprintln!("  {} {:>3} {} {}", "⚠️".yellow(), index + 1, step.name(), reason.dimmed());
        }
    });

    info!(applied = report.applied, skipped = report.skipped, "Script finished");

    if args.strict && report.skipped > 0 {
        anyhow::bail!("{} of {} steps were rejected", report.skipped, steps.len());
    }

    write_output(&config.to_json(&report.payload)?, args.out.as_deref())?;

    eprintln!();
    eprintln!(
        "{} {} applied, {} skipped",
        "✨ Done".green().bold(),
        report.applied,
        report.skipped
    );
    Ok(())
}

/// Run every step in order, reporting each result
pub fn run_steps<F>(session: &mut EditSession, steps: &[ScriptStep], mut on_step: F) -> ApplyReport
where
    F: FnMut(usize, &ScriptStep, &MutationResult),
{
    let mut applied = 0;
    let mut skipped = 0;

    for (index, step) in steps.iter().enumerate() {
        let result = step.run(session);
        if result.is_applied() {
            applied += 1;
        } else {
            skipped += 1;
        }
        on_step(index, step, &result);
    }

    ApplyReport {
        payload: session.finalize(),
        applied,
        skipped,
    }
}
