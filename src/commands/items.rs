use anyhow::Result;
use owo_colors::OwoColorize;
use unical_core::item::CalendarItem;
use unical_core::notify::LogNotifier;

use crate::ViewArgs;
use crate::render::render_item_line;
use crate::session::Session;

pub async fn run(args: &ViewArgs, json: bool) -> Result<()> {
    // JSON output is for scripts; alerts go to the log instead of the terminal.
    let view = if json {
        Session::synced_with(args, &LogNotifier).await?
    } else {
        Session::synced(args).await?
    };
    let grid = view.grid();

    if json {
        let items: Vec<&CalendarItem> = grid.days().flat_map(|day| day.items().iter().copied()).collect();
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    println!("{}", grid.month.label().bold());

    let mut any = false;
    for day in grid.days().filter(|day| !day.is_empty()) {
        any = true;
        let label = day.date.format("%a %b %-d").to_string();
        if day.is_today {
            println!("\n{} {}", label.bold(), "(today)".dimmed());
        } else {
            println!("\n{}", label.bold());
        }
        for item in day.items() {
            println!("{}", render_item_line(item, view.zone()));
        }
    }

    if !any {
        println!("{}", "No items this month".dimmed());
    }

    Ok(())
}
