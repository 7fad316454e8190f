//! View state: reference month, visibility toggles and the installed items.
//!
//! Navigation and toggles only rebuild the grid; they never re-aggregate.
//! Aggregation runs once per activation, and its result is applied only if
//! the activation that requested it is still the current one.

use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::Mutex;

use crate::aggregate::{Aggregation, Aggregator};
use crate::error::SyncFailure;
use crate::grid::{DayOrder, GridOptions, MonthGrid, Visibility, build_month_grid};
use crate::item::{CalendarItem, ItemKind};
use crate::local_date::ViewerZone;
use crate::model::CompanyMap;
use crate::month::YearMonth;
use crate::notify::{Notifier, SYNC_FAILED_MESSAGE, Severity};
use crate::source::CalendarSources;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthStep {
    Previous,
    Next,
}

impl MonthStep {
    fn delta(self) -> i32 {
        match self {
            MonthStep::Previous => -1,
            MonthStep::Next => 1,
        }
    }
}

/// Proof that an aggregation was requested by a given activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Activation {
    generation: u64,
}

/// What `apply` did with an aggregation outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Installed,
    /// Failure reported; previous items kept.
    Failed,
    /// The view was deactivated or re-activated since the request.
    Stale,
}

#[derive(Debug, Clone)]
pub struct ViewState {
    month: YearMonth,
    visibility: Visibility,
    options: GridOptions,
    zone: ViewerZone,
    items: Arc<Vec<CalendarItem>>,
    companies: Arc<CompanyMap>,
    generation: u64,
    active: bool,
}

impl ViewState {
    /// Starts on the viewer's current month with both kinds visible.
    pub fn new(zone: ViewerZone, options: GridOptions) -> Self {
        ViewState::at(YearMonth::current(&zone), zone, options)
    }

    pub fn at(month: YearMonth, zone: ViewerZone, options: GridOptions) -> Self {
        ViewState {
            month,
            visibility: Visibility::default(),
            options,
            zone,
            items: Arc::new(Vec::new()),
            companies: Arc::new(CompanyMap::default()),
            generation: 0,
            active: false,
        }
    }

    // LIFECYCLE:

    /// Mark the view active. Results from any earlier activation become stale.
    pub fn activate(&mut self) -> Activation {
        self.generation += 1;
        self.active = true;
        tracing::debug!(generation = self.generation, "view activated");
        Activation {
            generation: self.generation,
        }
    }

    /// Tear the view down. In-flight aggregations will be discarded.
    pub fn deactivate(&mut self) {
        self.generation += 1;
        self.active = false;
        tracing::debug!(generation = self.generation, "view deactivated");
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_current(&self, activation: Activation) -> bool {
        self.active && activation.generation == self.generation
    }

    /// Install a finished aggregation, or report its failure once.
    ///
    /// Stale outcomes are dropped without touching state or notifying.
    pub fn apply(
        &mut self,
        activation: Activation,
        outcome: Result<Aggregation, SyncFailure>,
        notifier: &impl Notifier,
    ) -> Applied {
        if !self.is_current(activation) {
            tracing::debug!(
                requested = activation.generation,
                current = self.generation,
                "discarding aggregation for inactive view"
            );
            return Applied::Stale;
        }

        match outcome {
            Ok(aggregation) => {
                self.items = Arc::new(aggregation.items);
                self.companies = Arc::new(aggregation.companies);
                tracing::info!(items = self.items.len(), "calendar items installed");
                Applied::Installed
            }
            Err(failure) => {
                tracing::error!(error = %failure, "calendar sync failed");
                notifier.notify(SYNC_FAILED_MESSAGE, Severity::Error);
                Applied::Failed
            }
        }
    }

    // NAVIGATION + TOGGLES:

    pub fn month(&self) -> YearMonth {
        self.month
    }

    pub fn set_month(&mut self, month: YearMonth) {
        self.month = month;
    }

    pub fn advance_month(&mut self, step: MonthStep) {
        self.month = self.month.shift(step.delta());
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn set_visible(&mut self, kind: ItemKind, visible: bool) {
        match kind {
            ItemKind::ActionItem => self.visibility.action_items = visible,
            ItemKind::Meeting => self.visibility.meetings = visible,
        }
    }

    pub fn toggle(&mut self, kind: ItemKind) {
        let visible = self.visibility.shows(kind);
        self.set_visible(kind, !visible);
    }

    pub fn options(&self) -> &GridOptions {
        &self.options
    }

    pub fn set_day_order(&mut self, order: DayOrder) {
        self.options.day_order = order;
    }

    pub fn zone(&self) -> &ViewerZone {
        &self.zone
    }

    // DATA:

    /// The installed items. A later install swaps the list; this one stays valid.
    pub fn items(&self) -> Arc<Vec<CalendarItem>> {
        Arc::clone(&self.items)
    }

    pub fn companies(&self) -> Arc<CompanyMap> {
        Arc::clone(&self.companies)
    }

    pub fn grid(&self) -> MonthGrid<'_> {
        self.grid_at(self.zone.today())
    }

    pub fn grid_at(&self, today: NaiveDate) -> MonthGrid<'_> {
        build_month_grid(&self.items, self.month, self.visibility, &self.options, today)
    }
}

/// Run one activation against a shared view.
///
/// The lock is not held while the sources are fetched, so the view can be
/// navigated or deactivated meanwhile; a deactivated view ignores the result.
pub async fn activate_shared<S: CalendarSources>(
    view: &Arc<Mutex<ViewState>>,
    aggregator: &Aggregator<S>,
    notifier: &impl Notifier,
) -> Applied {
    let activation = view.lock().await.activate();
    let outcome = aggregator.aggregate().await;
    view.lock().await.apply(activation, outcome, notifier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::tests::{StubSources, meeting, task};
    use crate::error::TransportError;
    use crate::source::SourceKind;
    use chrono_tz::Tz;
    use std::sync::Mutex as StdMutex;
    use std::time::Duration;

    #[derive(Default)]
    struct RecordingNotifier {
        alerts: StdMutex<Vec<(String, Severity)>>,
    }

    impl RecordingNotifier {
        fn alerts(&self) -> Vec<(String, Severity)> {
            self.alerts.lock().unwrap().clone()
        }
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, message: &str, severity: Severity) {
            self.alerts.lock().unwrap().push((message.to_string(), severity));
        }
    }

    fn utc() -> ViewerZone {
        ViewerZone::Named(Tz::UTC)
    }

    fn march() -> YearMonth {
        "2024-03".parse().unwrap()
    }

    fn aggregation() -> Aggregation {
        Aggregation::build(
            vec![task(1, "2024-03-05", "InProgress")],
            vec![meeting(7, "2024-03-05T09:00:00Z", "Scheduled")],
            &[],
            &utc(),
        )
    }

    fn failure() -> SyncFailure {
        SyncFailure::new(SourceKind::Meetings, TransportError::Provider("503".into()))
    }

    #[test]
    fn test_defaults_show_both_kinds() {
        let view = ViewState::at(march(), utc(), GridOptions::default());
        assert_eq!(view.visibility(), Visibility { action_items: true, meetings: true });
        assert!(!view.is_active());
        assert!(view.items().is_empty());
    }

    #[test]
    fn test_apply_installs_and_grid_places_items() {
        let notifier = RecordingNotifier::default();
        let mut view = ViewState::at(march(), utc(), GridOptions::default());
        let activation = view.activate();

        assert_eq!(view.apply(activation, Ok(aggregation()), &notifier), Applied::Installed);

        let grid = view.grid_at(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        let ids: Vec<_> = grid.day(5).unwrap().items().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["task-1", "meeting-7"]);
        assert!(notifier.alerts().is_empty());
    }

    #[test]
    fn test_failure_notifies_once_and_keeps_previous_items() {
        let notifier = RecordingNotifier::default();
        let mut view = ViewState::at(march(), utc(), GridOptions::default());
        let first = view.activate();
        view.apply(first, Ok(aggregation()), &notifier);
        let before = view.items();

        let second = view.activate();
        assert_eq!(view.apply(second, Err(failure()), &notifier), Applied::Failed);

        assert_eq!(view.items(), before);
        assert_eq!(notifier.alerts(), vec![("Sync failed".to_string(), Severity::Error)]);
    }

    #[test]
    fn test_stale_results_are_discarded_silently() {
        let notifier = RecordingNotifier::default();
        let mut view = ViewState::at(march(), utc(), GridOptions::default());

        let torn_down = view.activate();
        view.deactivate();
        assert_eq!(view.apply(torn_down, Ok(aggregation()), &notifier), Applied::Stale);
        assert!(view.items().is_empty());

        let superseded = view.activate();
        let latest = view.activate();
        assert_eq!(view.apply(superseded, Err(failure()), &notifier), Applied::Stale);
        assert!(notifier.alerts().is_empty());
        assert_eq!(view.apply(latest, Ok(aggregation()), &notifier), Applied::Installed);
    }

    #[test]
    fn test_navigation_and_toggles_keep_items() {
        let notifier = RecordingNotifier::default();
        let mut view = ViewState::at(march(), utc(), GridOptions::default());
        let activation = view.activate();
        view.apply(activation, Ok(aggregation()), &notifier);
        let installed = view.items();

        view.advance_month(MonthStep::Next);
        assert_eq!(view.month(), "2024-04".parse::<YearMonth>().unwrap());
        view.advance_month(MonthStep::Previous);
        view.advance_month(MonthStep::Previous);
        assert_eq!(view.month(), "2024-02".parse::<YearMonth>().unwrap());
        view.advance_month(MonthStep::Next);

        view.toggle(ItemKind::ActionItem);
        let grid = view.grid_at(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        let ids: Vec<_> = grid.day(5).unwrap().items().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["meeting-7"]);

        view.set_visible(ItemKind::Meeting, false);
        let grid = view.grid_at(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert!(grid.day(5).unwrap().is_empty());

        assert!(Arc::ptr_eq(&installed, &view.items()));
    }

    #[test]
    fn test_old_item_list_stays_valid_after_swap() {
        let notifier = RecordingNotifier::default();
        let mut view = ViewState::at(march(), utc(), GridOptions::default());
        let first = view.activate();
        view.apply(first, Ok(aggregation()), &notifier);
        let held = view.items();

        let second = view.activate();
        view.apply(second, Ok(Aggregation::default()), &notifier);

        assert_eq!(held.len(), 2);
        assert!(view.items().is_empty());
    }

    #[tokio::test]
    async fn test_activate_shared_fetches_once() {
        let sources = StubSources::ok(
            vec![task(1, "2024-03-05", "InProgress")],
            vec![meeting(7, "2024-03-05T09:00:00Z", "Scheduled")],
        );
        let aggregator = Aggregator::new(sources, utc());
        let notifier = RecordingNotifier::default();
        let view = Arc::new(Mutex::new(ViewState::at(march(), utc(), GridOptions::default())));

        assert_eq!(activate_shared(&view, &aggregator, &notifier).await, Applied::Installed);

        {
            let mut state = view.lock().await;
            state.advance_month(MonthStep::Next);
            state.toggle(ItemKind::Meeting);
            let _ = state.grid();
        }
        assert_eq!(
            aggregator.sources().calls.load(std::sync::atomic::Ordering::SeqCst),
            3
        );
    }

    #[tokio::test]
    async fn test_activate_shared_reports_failure() {
        let mut sources = StubSources::ok(vec![], vec![]);
        sources.directory = None;
        let aggregator = Aggregator::new(sources, utc());
        let notifier = RecordingNotifier::default();
        let view = Arc::new(Mutex::new(ViewState::at(march(), utc(), GridOptions::default())));

        assert_eq!(activate_shared(&view, &aggregator, &notifier).await, Applied::Failed);
        assert_eq!(notifier.alerts().len(), 1);
        assert!(view.lock().await.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_deactivating_mid_fetch_discards_the_late_result() {
        let sources = StubSources {
            hang_meetings: true,
            ..StubSources::ok(vec![task(1, "2024-03-05", "InProgress")], vec![])
        };
        let aggregator = Arc::new(Aggregator::new(sources, utc()).with_timeout(Duration::from_secs(5)));
        let notifier = Arc::new(RecordingNotifier::default());
        let view = Arc::new(Mutex::new(ViewState::at(march(), utc(), GridOptions::default())));

        let sync = tokio::spawn({
            let view = Arc::clone(&view);
            let aggregator = Arc::clone(&aggregator);
            let notifier = Arc::clone(&notifier);
            async move { activate_shared(&view, &aggregator, &*notifier).await }
        });

        // Let the sync activate the view and block on the hung source.
        tokio::task::yield_now().await;
        assert!(view.lock().await.is_active());
        view.lock().await.deactivate();

        assert_eq!(sync.await.unwrap(), Applied::Stale);
        assert!(notifier.alerts().is_empty());
        assert!(view.lock().await.items().is_empty());
        assert!(!view.lock().await.is_active());
    }
}
