use anyhow::Result;
use unical_core::item::ItemKind;
use unical_core::view::MonthStep;

use crate::ViewArgs;
use crate::render::Render;
use crate::session::Session;

pub async fn run(args: &ViewArgs, count: u32, hide_tasks: bool, hide_meetings: bool) -> Result<()> {
    let mut view = Session::synced(args).await?;

    view.set_visible(ItemKind::ActionItem, !hide_tasks);
    view.set_visible(ItemKind::Meeting, !hide_meetings);

    for i in 0..count.max(1) {
        if i > 0 {
            view.advance_month(MonthStep::Next);
            println!();
        }
        println!("{}", view.grid().render());
    }

    Ok(())
}
