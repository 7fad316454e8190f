use anyhow::Result;
use owo_colors::OwoColorize;

use crate::ViewArgs;
use crate::session::Session;

pub async fn run(args: &ViewArgs) -> Result<()> {
    let view = Session::synced(args).await?;
    let companies = view.companies();

    if companies.is_empty() {
        println!("{}", "No organizations found".dimmed());
        return Ok(());
    }

    for (id, name) in companies.sorted() {
        println!("{:>6}  {}", id.dimmed(), name);
    }

    Ok(())
}
