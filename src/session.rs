//! Opening a calendar view from the config and syncing it.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use unical_core::config::UnicalConfig;
use unical_core::notify::Notifier;
use unical_core::source::ProviderSources;
use unical_core::view::{Applied, ViewState, activate_shared};
use unical_core::{Aggregator, ViewerZone, YearMonth};

use crate::ViewArgs;
use crate::notifier::TerminalNotifier;
use crate::utils::tui::create_spinner;

pub struct Session {
    pub view: Arc<Mutex<ViewState>>,
    aggregator: Arc<Aggregator<ProviderSources>>,
}

impl Session {
    /// Build the view and aggregator. Nothing is fetched yet.
    pub fn open(args: &ViewArgs) -> Result<Self> {
        let config = UnicalConfig::load()?;

        let zone: ViewerZone = match &args.tz {
            Some(tz) => tz.parse()?,
            None => config.zone()?,
        };
        let view = match &args.month {
            Some(month) => ViewState::at(month.parse::<YearMonth>()?, zone, config.grid_options()),
            None => ViewState::new(zone, config.grid_options()),
        };
        let timeout = config.timeout()?;

        let sources = ProviderSources::new(config.require_source()?.clone()).with_timeout(timeout);
        let aggregator = Aggregator::new(sources, zone).with_timeout(timeout);
        tracing::debug!(month = %view.month(), %zone, ?timeout, "session opened");

        Ok(Session {
            view: Arc::new(Mutex::new(view)),
            aggregator: Arc::new(aggregator),
        })
    }

    /// Activate the view and wait for its one aggregation.
    pub async fn sync(&self, notifier: &impl Notifier) -> Applied {
        let spinner = create_spinner(format!(
            "Syncing from {}",
            self.aggregator.sources().provider().name()
        ));
        let applied = activate_shared(&self.view, &self.aggregator, notifier).await;
        spinner.finish_and_clear();
        applied
    }

    /// Activate the view and aggregate in the background.
    pub fn sync_in_background(&self) -> JoinHandle<Applied> {
        let view = Arc::clone(&self.view);
        let aggregator = Arc::clone(&self.aggregator);
        tokio::spawn(async move { activate_shared(&view, &aggregator, &TerminalNotifier).await })
    }

    /// Open and sync in one go, handing back the view state.
    pub async fn synced(args: &ViewArgs) -> Result<ViewState> {
        Self::synced_with(args, &TerminalNotifier).await
    }

    pub async fn synced_with(args: &ViewArgs, notifier: &impl Notifier) -> Result<ViewState> {
        let session = Session::open(args)?;
        session.sync(notifier).await;
        let view = Arc::try_unwrap(session.view)
            .ok()
            .context("calendar view still shared after sync")?;
        Ok(view.into_inner())
    }
}
