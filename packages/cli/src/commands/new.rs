use super::Context;
use anyhow::Result;
use bookforge_editor::ProjectType;
use bookforge_persistence::{NewProject, ProjectStore};
use clap::Args;
use colored::Colorize;

#[derive(Debug, Args)]
pub struct NewArgs {
    /// Project title
    #[arg(short, long)]
    pub title: String,

    /// Project type (textbook, workbook)
    #[arg(long = "type", default_value = "textbook")]
    pub project_type: ProjectType,

    /// Cover preset (mathematics, science, literature, history, upload)
    #[arg(long)]
    pub cover: Option<String>,

    /// Page template (classic, modern, interactive)
    #[arg(long)]
    pub template: Option<String>,
}

pub async fn new(args: NewArgs, ctx: &Context) -> Result<()> {
    let user = ctx.identity()?;
    let project = NewProject {
        title: args.title,
        project_type: args.project_type,
        cover_type: args.cover,
        template_type: args.template,
    };

    let record = ctx.store.create(&user, project).await?;

    println!(
        "{} Created {} {}",
        "✓".green(),
        record.project_type,
        record.title.bright_white().bold()
    );
    println!("   id: {}", record.id);

    Ok(())
}
