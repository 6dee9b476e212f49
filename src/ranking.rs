// src/ranking.rs

//! Pure leaderboard logic: normalization, ranking, filtering, display sorting,
//! pagination and projection into display models. Nothing here touches I/O,
//! so `RankingView` and the tests share exactly the same code path.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use url::Url;

use crate::{
    models::{
        leaderboard::{
            Aggregates, ListItem, Medal, PodiumEntry, RankTier, SortKey, TimeFilter, UserPosition,
        },
        participant::ParticipantRecord,
        quiz_result::QuizResultDocument,
    },
    utils::format::{avatar_url, format_time, short_date},
};

pub const DEFAULT_NAME: &str = "Anonymous User";
pub const DEFAULT_QUIZ_TITLE: &str = "Quiz";
pub const PODIUM_SIZE: usize = 3;

/// Turns a stored document into a participant record (unranked).
///
/// Missing or negative numbers become 0; a zero question count is treated
/// as 1 when computing the percentage.
pub fn normalize(
    doc: QuizResultDocument,
    session_uid: Option<&str>,
    now: DateTime<Utc>,
) -> ParticipantRecord {
    let raw_score = non_negative(doc.score);
    let total_questions = non_negative(doc.total);
    let denominator = total_questions.max(1);
    let score = ((raw_score as f64 / denominator as f64) * 100.0).round() as u32;

    let is_self = match (session_uid, doc.user_id.as_deref()) {
        (Some(uid), Some(owner)) => uid == owner,
        _ => false,
    };

    let name = non_empty(doc.user_first_name)
        .or_else(|| non_empty(doc.user_name))
        .unwrap_or_else(|| DEFAULT_NAME.to_string());

    ParticipantRecord {
        id: doc.id,
        name,
        score: score.min(100),
        raw_score,
        total_questions,
        elapsed_seconds: non_negative(doc.time_taken),
        completed_at: doc.completed_at.unwrap_or(now),
        quiz_title: non_empty(doc.quiz_title).unwrap_or_else(|| DEFAULT_QUIZ_TITLE.to_string()),
        rank: 0,
        is_self,
    }
}

fn non_negative(value: Option<i64>) -> u64 {
    value.unwrap_or(0).max(0) as u64
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Higher score first, then faster time.
pub fn compare_by_score(a: &ParticipantRecord, b: &ParticipantRecord) -> Ordering {
    b.score
        .cmp(&a.score)
        .then(a.elapsed_seconds.cmp(&b.elapsed_seconds))
}

/// Orders the whole population and assigns dense 1-based ranks.
/// Equal (score, time) pairs keep their input order.
pub fn rank(mut participants: Vec<ParticipantRecord>) -> Vec<ParticipantRecord> {
    participants.sort_by(compare_by_score);
    for (index, participant) in participants.iter_mut().enumerate() {
        participant.rank = index + 1;
    }
    participants
}

pub fn aggregate(board: &[ParticipantRecord]) -> Aggregates {
    if board.is_empty() {
        return Aggregates::default();
    }

    let count = board.len();
    let score_sum: u64 = board.iter().map(|p| u64::from(p.score)).sum();
    let elapsed_sum: u64 = board.iter().map(|p| p.elapsed_seconds).sum();

    Aggregates {
        count,
        mean_score: (score_sum as f64 / count as f64).round() as u32,
        mean_elapsed_seconds: (elapsed_sum as f64 / count as f64).round() as u64,
        max_score: board.iter().map(|p| p.score).max().unwrap_or(0),
        min_elapsed_seconds: board.iter().map(|p| p.elapsed_seconds).min().unwrap_or(0),
    }
}

/// Keeps records younger than the filter's window (strictly).
pub fn filter_by_window(
    board: &[ParticipantRecord],
    filter: TimeFilter,
    now: DateTime<Utc>,
) -> Vec<ParticipantRecord> {
    match filter.window() {
        None => board.to_vec(),
        Some(window) => board
            .iter()
            .filter(|p| now.signed_duration_since(p.completed_at) < window)
            .cloned()
            .collect(),
    }
}

pub fn sort_for_display(records: &mut [ParticipantRecord], key: SortKey) {
    match key {
        SortKey::Score => records.sort_by(compare_by_score),
        SortKey::Time => records.sort_by_key(|p| p.elapsed_seconds),
        SortKey::Date => records.sort_by(|a, b| b.completed_at.cmp(&a.completed_at)),
    }
}

/// The filtered and display-sorted view of the full ranked set.
pub fn visible(
    board: &[ParticipantRecord],
    filter: TimeFilter,
    sort: SortKey,
    now: DateTime<Utc>,
) -> Vec<ParticipantRecord> {
    let mut records = filter_by_window(board, filter, now);
    sort_for_display(&mut records, sort);
    records
}

/// Items of page `page` (1-based). Page 0 and pages past the end are empty.
pub fn page_slice<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    if page == 0 {
        return &[];
    }
    let start = ((page - 1).saturating_mul(page_size)).min(items.len());
    let end = page.saturating_mul(page_size).min(items.len());
    &items[start..end]
}

/// Pages 1..=page concatenated, i.e. what an accumulating list shows.
pub fn accumulated<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    let end = page.saturating_mul(page_size).min(items.len());
    &items[..end]
}

/// How many items are still hidden once `page` pages are shown.
pub fn remaining_after(len: usize, page: usize, page_size: usize) -> usize {
    len.saturating_sub(page.saturating_mul(page_size))
}

pub fn podium(board: &[ParticipantRecord], avatar_base: &Url) -> Vec<PodiumEntry> {
    board
        .iter()
        .take(PODIUM_SIZE)
        .enumerate()
        .map(|(index, p)| PodiumEntry {
            place: index + 1,
            name: p.name.clone(),
            score: p.score,
            time: format_time(p.elapsed_seconds),
            avatar_url: avatar_url(avatar_base, &p.name),
        })
        .collect()
}

/// The session's own entry in the full ranked set, if any.
pub fn user_position(board: &[ParticipantRecord]) -> Option<UserPosition> {
    let me = board.iter().find(|p| p.is_self)?;
    let tier = RankTier::for_rank(me.rank);
    let progress = 100.0 - (me.rank as f64 / board.len() as f64 * 100.0);

    Some(UserPosition {
        rank: me.rank,
        name: me.name.clone(),
        score: me.score,
        time: format_time(me.elapsed_seconds),
        progress_percent: progress.max(5.0),
        tier,
        message: tier.message(),
    })
}

pub fn list_item(participant: &ParticipantRecord, avatar_base: &Url) -> ListItem {
    ListItem {
        rank: participant.rank,
        medal: Medal::for_rank(participant.rank),
        avatar_url: avatar_url(avatar_base, &participant.name),
        name: participant.name.clone(),
        is_self: participant.is_self,
        score: participant.score,
        elapsed_seconds: participant.elapsed_seconds,
        time: format_time(participant.elapsed_seconds),
        completed_at: participant.completed_at,
        date: short_date(&participant.completed_at),
    }
}

pub fn list_items(records: &[ParticipantRecord], avatar_base: &Url) -> Vec<ListItem> {
    records.iter().map(|p| list_item(p, avatar_base)).collect()
}

/// What the user is currently looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewQuery {
    pub filter: TimeFilter,
    pub sort: SortKey,
    pub page: usize,
    pub page_size: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DisplayModel {
    pub podium: Vec<PodiumEntry>,
    pub user_position: Option<UserPosition>,
    pub aggregates: Aggregates,
    pub items: Vec<ListItem>,
    pub remaining: usize,
}

/// Projects a ranked board onto everything the page displays.
pub fn project(
    board: &[ParticipantRecord],
    query: &ViewQuery,
    now: DateTime<Utc>,
    avatar_base: &Url,
) -> DisplayModel {
    let shown = visible(board, query.filter, query.sort, now);

    DisplayModel {
        podium: podium(board, avatar_base),
        user_position: user_position(board),
        aggregates: aggregate(board),
        items: list_items(accumulated(&shown, query.page, query.page_size), avatar_base),
        remaining: remaining_after(shown.len(), query.page, query.page_size),
    }
}
