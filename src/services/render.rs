// src/services/render.rs

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::models::leaderboard::{
    LeaderboardPage, ListItem, Notification, PodiumEntry, QuizInfo, Statistics, UserPosition,
};

/// Named display slots the leaderboard writes into. Write-only.
pub trait RenderSurface: Send + Sync {
    fn set_loading(&self, loading: bool);
    fn show_account_avatar(&self, avatar_url: &str);
    fn show_quiz_info(&self, info: &QuizInfo);
    /// Up to three entries, first place first.
    fn show_podium(&self, podium: &[PodiumEntry]);
    /// `None` hides the "your position" section.
    fn show_user_position(&self, position: Option<&UserPosition>);
    fn replace_list(&self, items: &[ListItem], remaining: usize);
    fn append_list(&self, items: &[ListItem], remaining: usize);
    fn show_statistics(&self, statistics: &Statistics);
    fn notify(&self, notification: Notification);
    /// The visitor is not signed in and should leave the page.
    fn navigate_away(&self);
}

/// Records every slot write into a `LeaderboardPage` snapshot.
#[derive(Debug)]
pub struct PageSurface {
    home_url: String,
    page: Mutex<LeaderboardPage>,
}

impl PageSurface {
    pub fn new(home_url: impl Into<String>) -> Self {
        Self {
            home_url: home_url.into(),
            page: Mutex::new(LeaderboardPage::default()),
        }
    }

    pub fn snapshot(&self) -> LeaderboardPage {
        self.page().clone()
    }

    fn page(&self) -> MutexGuard<'_, LeaderboardPage> {
        self.page.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl RenderSurface for PageSurface {
    fn set_loading(&self, loading: bool) {
        self.page().loading = loading;
    }

    fn show_account_avatar(&self, avatar_url: &str) {
        self.page().account_avatar = Some(avatar_url.to_string());
    }

    fn show_quiz_info(&self, info: &QuizInfo) {
        self.page().quiz_info = Some(info.clone());
    }

    fn show_podium(&self, podium: &[PodiumEntry]) {
        self.page().podium = podium.to_vec();
    }

    fn show_user_position(&self, position: Option<&UserPosition>) {
        self.page().user_position = position.cloned();
    }

    fn replace_list(&self, items: &[ListItem], remaining: usize) {
        let mut page = self.page();
        page.items = items.to_vec();
        page.remaining = remaining;
        page.has_more = remaining > 0;
    }

    fn append_list(&self, items: &[ListItem], remaining: usize) {
        let mut page = self.page();
        page.items.extend_from_slice(items);
        page.remaining = remaining;
        page.has_more = remaining > 0;
    }

    fn show_statistics(&self, statistics: &Statistics) {
        self.page().statistics = Some(statistics.clone());
    }

    fn notify(&self, notification: Notification) {
        self.page().notifications.push(notification);
    }

    fn navigate_away(&self) {
        self.page().redirect = Some(self.home_url.clone());
    }
}
