use anyhow::Result;
use owo_colors::OwoColorize;
use tokio::io::{AsyncBufReadExt, BufReader};
use unical_core::grid::DayOrder;
use unical_core::item::ItemKind;
use unical_core::view::{Applied, MonthStep, ViewState};

use crate::ViewArgs;
use crate::render::Render;
use crate::session::Session;

const HELP: &str = "[n]ext  [p]rev  [t]asks  [m]eetings  [o]rder  [q]uit";

enum Key {
    Next,
    Previous,
    ToggleTasks,
    ToggleMeetings,
    CycleOrder,
    Quit,
    Unknown,
}

fn parse_key(line: &str) -> Key {
    match line.trim().to_ascii_lowercase().as_str() {
        "n" | "next" | ">" => Key::Next,
        "p" | "prev" | "<" => Key::Previous,
        "t" | "tasks" => Key::ToggleTasks,
        "m" | "meetings" => Key::ToggleMeetings,
        "o" | "order" => Key::CycleOrder,
        "q" | "quit" | "exit" => Key::Quit,
        _ => Key::Unknown,
    }
}

fn status_line(view: &ViewState, syncing: bool) -> String {
    let on_off = |shown: bool| if shown { "on" } else { "off" };
    let visibility = view.visibility();
    let mut status = format!(
        "tasks {} · meetings {} · order {:?}",
        on_off(visibility.action_items),
        on_off(visibility.meetings),
        view.options().day_order
    );
    if syncing {
        status.push_str(" · syncing…");
    }
    status
}

/// Interactive month browser. Syncs once in the background; navigation and
/// toggles only redraw.
pub async fn run(args: &ViewArgs) -> Result<()> {
    let session = Session::open(args)?;
    let mut sync = Some(session.sync_in_background());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        if sync.as_ref().is_some_and(|handle| handle.is_finished()) {
            if let Some(handle) = sync.take() {
                if let Ok(Applied::Failed) = handle.await {
                    println!("{}", "Showing the last synced data".dimmed());
                }
            }
        }
        let syncing = sync.is_some();

        {
            let view = session.view.lock().await;
            println!("{}", view.grid().render());
            println!("{}", status_line(&view, syncing).dimmed());
        }
        println!("{}", HELP.dimmed());

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let mut view = session.view.lock().await;
        match parse_key(&line) {
            Key::Next => view.advance_month(MonthStep::Next),
            Key::Previous => view.advance_month(MonthStep::Previous),
            Key::ToggleTasks => view.toggle(ItemKind::ActionItem),
            Key::ToggleMeetings => view.toggle(ItemKind::Meeting),
            Key::CycleOrder => {
                let next = match view.options().day_order {
                    DayOrder::Source => DayOrder::Chronological,
                    DayOrder::Chronological => DayOrder::Source,
                };
                view.set_day_order(next);
            }
            Key::Quit => break,
            Key::Unknown => println!("{}", "Unknown command".yellow()),
        }
    }

    // A sync still in flight must not land on a closed view.
    session.view.lock().await.deactivate();
    if let Some(handle) = sync {
        handle.abort();
    }

    Ok(())
}
