use super::Context;
use crate::script::{self, run_script};
use anyhow::{bail, Context as _, Result};
use bookforge_persistence::{spawn_autosave, SaveOutcome};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Args)]
pub struct EditArgs {
    /// Project id
    pub id: String,

    /// JSON file holding an array of editor commands
    #[arg(short, long)]
    pub script: PathBuf,
}

pub async fn edit(args: EditArgs, ctx: &Context) -> Result<()> {
    let content = std::fs::read_to_string(&args.script)
        .with_context(|| format!("Cannot read script {}", args.script.display()))?;
    let commands = script::parse(&content)
        .with_context(|| format!("Invalid script {}", args.script.display()))?;

    let mut editor = ctx.controller();
    editor.load(&args.id).await?;
    let editor = Arc::new(Mutex::new(editor));

    println!(
        "✏️  {} {} command(s) on {}",
        "Editing".green().bold(),
        commands.len(),
        args.id
    );

    let autosave = spawn_autosave(Arc::clone(&editor), ctx.autosave.poll_interval);
    let report = run_script(&mut *editor.lock().await, commands);

    for index in &report.skipped {
        println!("  {} command #{} had no effect", "⚠️".yellow(), index + 1);
    }

    // Leaving the editor flushes whatever is unsaved
    match autosave.shutdown().await {
        Some(SaveOutcome::Saved { version, .. }) => {
            println!(
                "{} Applied {} command(s), saved version {}",
                "✓".green(),
                report.applied,
                version
            );
        }
        Some(SaveOutcome::Failed) => bail!("Saving {} failed; see log for details", args.id),
        Some(SaveOutcome::Skipped) | None => {
            println!("{} No changes to save", "✓".green());
        }
    }

    Ok(())
}
