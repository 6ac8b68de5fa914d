use super::Context;
use anyhow::Result;
use bookforge_persistence::ProjectStore;
use clap::Args;
use colored::Colorize;

#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Project id
    pub id: String,
}

pub async fn delete(args: DeleteArgs, ctx: &Context) -> Result<()> {
    let user = ctx.identity()?;
    ctx.store.delete(&user, &args.id).await?;

    println!("{} Deleted {}", "✓".green(), args.id);
    Ok(())
}
