use super::Context;
use anyhow::Result;
use bookforge_editor::{ComponentProps, Project};
use bookforge_persistence::ProjectStore;
use clap::Args;
use colored::Colorize;

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Project id
    pub id: String,

    /// Print the document as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn show(args: ShowArgs, ctx: &Context) -> Result<()> {
    let user = ctx.identity()?;
    let project = ctx.store.load(&user, &args.id).await?.into_project();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&project)?);
    } else {
        print_outline(&project);
    }

    Ok(())
}

fn print_outline(project: &Project) {
    println!(
        "{} ({})",
        project.title.bright_white().bold(),
        project.project_type
    );

    let meta = &project.metadata;
    for (label, value) in [
        ("author", &meta.author),
        ("description", &meta.description),
        ("cover", &meta.cover_type),
        ("template", &meta.template_type),
    ] {
        if let Some(value) = value {
            println!("   {}: {}", label.dimmed(), value);
        }
    }

    for page in &project.pages {
        println!();
        println!("  {} {}", "▸".bright_blue(), page.title);
        if page.components.is_empty() {
            println!("    {}", "(empty)".dimmed());
        }
        for component in &page.components {
            let summary = match &component.props {
                ComponentProps::Text { content, .. } => format!("\"{}\"", content),
                ComponentProps::Image { image_url } => image_url.clone(),
                ComponentProps::Qr { qr_label, qr_target } => format!("{} → {}", qr_label, qr_target),
            };
            println!(
                "    {:<5} at ({}, {}) {}x{} z{}  {}",
                component.kind().to_string(),
                component.position.x,
                component.position.y,
                component.size.width,
                component.size.height,
                component.z_index,
                summary
            );
        }
    }
}
