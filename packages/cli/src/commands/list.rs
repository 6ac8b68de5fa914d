use super::Context;
use anyhow::Result;
use bookforge_persistence::ProjectStore;
use colored::Colorize;

pub async fn list(ctx: &Context) -> Result<()> {
    let user = ctx.identity()?;
    let projects = ctx.store.list(&user).await?;

    if projects.is_empty() {
        println!("No projects yet. Run: bookforge new --title <title>");
        return Ok(());
    }

    println!("{}", format!("📚 {} project(s)", projects.len()).bright_blue().bold());
    for project in projects {
        println!(
            "  {}  {} ({}, {} page{})  updated {}",
            project.id.dimmed(),
            project.title.bright_white(),
            project.project_type,
            project.page_count,
            if project.page_count == 1 { "" } else { "s" },
            project.updated_at.format("%Y-%m-%d %H:%M")
        );
    }

    Ok(())
}
