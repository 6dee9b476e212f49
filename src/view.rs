// src/view.rs

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use chrono::Utc;
use tokio::sync::Mutex;
use url::Url;

use crate::{
    config::Config,
    models::{
        leaderboard::{Notification, QuizInfo, SortKey, Statistics, TimeFilter},
        participant::{ParticipantRecord, Session},
    },
    ranking::{self, ViewQuery},
    services::{identity::IdentityProvider, render::RenderSurface, result_store::ResultStore},
    utils::format::avatar_url,
};

pub const NO_RESULTS_MESSAGE: &str =
    "No quiz results available yet. Complete some quizzes to see the leaderboard!";
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load leaderboard data. Please refresh the page.";

#[derive(Debug, Clone)]
pub struct ViewSettings {
    pub title: String,
    pub fetch_limit: usize,
    pub page_size: usize,
    pub avatar_base: Url,
    /// Pause before a "load more" step is rendered.
    pub load_more_delay: Duration,
    /// Filter and sort in effect when the first load renders.
    pub filter: TimeFilter,
    pub sort: SortKey,
}

impl ViewSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            title: config.board_title.clone(),
            fetch_limit: config.fetch_limit,
            page_size: config.page_size,
            avatar_base: config.avatar_base_url.clone(),
            load_more_delay: Duration::from_millis(config.load_more_delay_ms),
            filter: TimeFilter::default(),
            sort: SortKey::default(),
        }
    }

    pub fn with_filter(mut self, filter: TimeFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }
}

/// Outcome of a page load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewStatus {
    Ready { participants: usize },
    /// The store had no results.
    Empty,
    /// The store could not be queried; the user has to reload.
    Failed,
    /// No session; the surface was told to navigate away.
    Unauthorized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMore {
    Appended(usize),
    /// Every item of the current view is already displayed.
    Exhausted,
    /// Another load-more is still in flight.
    Busy,
    /// Filter or sort changed while this step was pending; nothing was appended.
    Stale,
}

#[derive(Debug, Default)]
struct ViewState {
    session: Option<Session>,
    /// Full population in rank order.
    board: Vec<ParticipantRecord>,
    /// Filtered and display-sorted view of `board`.
    shown: Vec<ParticipantRecord>,
    filter: TimeFilter,
    sort: SortKey,
    /// Number of pages currently displayed.
    page: usize,
    /// Bumped whenever `shown` is rebuilt.
    generation: u64,
}

/// Clears the load-more flag when the step finishes or is dropped.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlight(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Loads, ranks and displays the leaderboard for one signed-in user.
pub struct RankingView {
    store: Arc<dyn ResultStore>,
    identity: Arc<dyn IdentityProvider>,
    surface: Arc<dyn RenderSurface>,
    settings: ViewSettings,
    state: Mutex<ViewState>,
    loading_more: AtomicBool,
}

impl RankingView {
    pub fn new(
        store: Arc<dyn ResultStore>,
        identity: Arc<dyn IdentityProvider>,
        surface: Arc<dyn RenderSurface>,
        settings: ViewSettings,
    ) -> Self {
        let state = ViewState {
            filter: settings.filter,
            sort: settings.sort,
            page: 1,
            ..ViewState::default()
        };

        Self {
            store,
            identity,
            surface,
            settings,
            state: Mutex::new(state),
            loading_more: AtomicBool::new(false),
        }
    }

    /// Renders once for the identity provider's current session.
    pub async fn start(&self) -> ViewStatus {
        let session = self.identity.subscribe().borrow().clone();
        self.on_session(session).await
    }

    /// Renders for the current session and again on every session change.
    /// Returns when the identity provider goes away.
    pub async fn run(&self) {
        let mut sessions = self.identity.subscribe();
        loop {
            let session = sessions.borrow_and_update().clone();
            self.on_session(session).await;
            if sessions.changed().await.is_err() {
                break;
            }
        }
    }

    pub async fn on_session(&self, session: Option<Session>) -> ViewStatus {
        let Some(session) = session else {
            tracing::info!("No session, leaving leaderboard");
            self.surface.navigate_away();
            return ViewStatus::Unauthorized;
        };

        tracing::debug!(uid = %session.uid, "Session changed");
        self.surface.show_account_avatar(&self.account_avatar(&session));
        self.state.lock().await.session = Some(session);
        self.load().await
    }

    /// Fetches the recent results and redraws every section.
    pub async fn load(&self) -> ViewStatus {
        self.surface.set_loading(true);
        let status = self.fetch_and_display().await;
        self.surface.set_loading(false);
        status
    }

    async fn fetch_and_display(&self) -> ViewStatus {
        let documents = match self.store.recent_results(self.settings.fetch_limit).await {
            Ok(documents) => documents,
            Err(e) => {
                tracing::error!("Error loading leaderboard data: {}", e);
                self.surface.notify(Notification::error(LOAD_FAILED_MESSAGE));
                return ViewStatus::Failed;
            }
        };

        if documents.is_empty() {
            tracing::info!("No quiz results found");
            self.surface.notify(Notification::info(NO_RESULTS_MESSAGE));
            return ViewStatus::Empty;
        }

        let now = Utc::now();
        let mut state = self.state.lock().await;
        let uid = state.session.as_ref().map(|s| s.uid.clone());

        let board = ranking::rank(
            documents
                .into_iter()
                .map(|doc| ranking::normalize(doc, uid.as_deref(), now))
                .collect(),
        );
        let participants = board.len();
        tracing::info!(participants, "Loaded leaderboard");

        state.board = board;
        state.page = 1;
        state.generation += 1;
        state.shown = ranking::visible(&state.board, state.filter, state.sort, now);

        let query = ViewQuery {
            filter: state.filter,
            sort: state.sort,
            page: state.page,
            page_size: self.settings.page_size,
        };
        let model = ranking::project(&state.board, &query, now, &self.settings.avatar_base);

        if model.user_position.is_none() {
            tracing::debug!("Current user not found in leaderboard data");
        }

        self.surface
            .show_quiz_info(&QuizInfo::new(&self.settings.title, &model.aggregates));
        self.surface.show_podium(&model.podium);
        self.surface.show_user_position(model.user_position.as_ref());
        self.surface.replace_list(&model.items, model.remaining);
        self.surface
            .show_statistics(&Statistics::from(&model.aggregates));

        ViewStatus::Ready { participants }
    }

    pub async fn apply_time_filter(&self, filter: TimeFilter) {
        let mut state = self.state.lock().await;
        state.filter = filter;
        self.refresh(&mut state);
        self.surface.notify(Notification::info(format!(
            "Filtered by: {}",
            filter.label()
        )));
    }

    pub async fn apply_sorting(&self, sort: SortKey) {
        let mut state = self.state.lock().await;
        state.sort = sort;
        self.refresh(&mut state);
        self.surface
            .notify(Notification::info(format!("Sorted by: {}", sort.label())));
    }

    /// Appends the next page to the displayed list.
    pub async fn load_more(&self) -> LoadMore {
        let Some(_in_flight) = InFlight::acquire(&self.loading_more) else {
            return LoadMore::Busy;
        };

        let generation = self.state.lock().await.generation;
        if !self.settings.load_more_delay.is_zero() {
            tokio::time::sleep(self.settings.load_more_delay).await;
        }

        let mut state = self.state.lock().await;
        if state.generation != generation {
            tracing::debug!("View changed during load more, dropping page");
            return LoadMore::Stale;
        }

        let next = state.page + 1;
        let size = self.settings.page_size;
        let slice = ranking::page_slice(&state.shown, next, size);
        if slice.is_empty() {
            return LoadMore::Exhausted;
        }

        let items = ranking::list_items(slice, &self.settings.avatar_base);
        state.page = next;
        self.surface
            .append_list(&items, ranking::remaining_after(state.shown.len(), next, size));
        LoadMore::Appended(items.len())
    }

    pub async fn filter(&self) -> TimeFilter {
        self.state.lock().await.filter
    }

    pub async fn sort(&self) -> SortKey {
        self.state.lock().await.sort
    }

    pub async fn page(&self) -> usize {
        self.state.lock().await.page
    }

    /// Rebuilds the shown set from the full board and redraws page one.
    fn refresh(&self, state: &mut ViewState) {
        state.page = 1;
        state.generation += 1;
        state.shown = ranking::visible(&state.board, state.filter, state.sort, Utc::now());

        let size = self.settings.page_size;
        let first = ranking::page_slice(&state.shown, 1, size);
        self.surface.replace_list(
            &ranking::list_items(first, &self.settings.avatar_base),
            ranking::remaining_after(state.shown.len(), 1, size),
        );
    }

    fn account_avatar(&self, session: &Session) -> String {
        match &session.photo_url {
            Some(photo) => photo.clone(),
            None => {
                let name = session
                    .display_name
                    .as_deref()
                    .or(session.email.as_deref())
                    .unwrap_or(&session.uid);
                avatar_url(&self.settings.avatar_base, name)
            }
        }
    }
}
