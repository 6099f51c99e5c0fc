//! Client-side state kept in sync with the catalog API.
//!
//! A view model owns its records exclusively. After each call it merges the
//! server's answer back with [upsert_by_id] or [remove_by_id] and nothing
//! else, so local state always reflects the last response for the ids that
//! were acted upon.

use std::{fmt::Write, marker::PhantomData};

use chrono::{DateTime, Duration, Utc};
use tracing::warn;

use crate::{
    config::Config,
    error::RequestFailure,
    traits::{DisplayTerminal, Resource},
    types::id::Id,
};

pub mod collection;
pub mod detail;

pub const DEFAULT_NOTICE_TTL_SECONDS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// A transient message raised by a view model for the user to see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind:      NoticeKind,
    pub text:      String,
    pub raised_at: DateTime<Utc>,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind:      NoticeKind::Success,
            text:      text.into(),
            raised_at: Utc::now(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind:      NoticeKind::Error,
            text:      text.into(),
            raised_at: Utc::now(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }

    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.raised_at >= ttl
    }
}

impl DisplayTerminal for Notice {
    fn fmt(&self, f: &mut String, config: &Config) -> anyhow::Result<()> {
        let output = match self.kind {
            NoticeKind::Success => &config.output_success,
            NoticeKind::Error => &config.output_error,
        };
        write!(f, "{}", output.format_str(&self.text))?;
        Ok(())
    }
}

/// The notice slot every view model carries.
#[derive(Debug, Clone)]
pub(crate) struct NoticeBoard {
    current: Option<Notice>,
    ttl:     Duration,
}

impl Default for NoticeBoard {
    fn default() -> Self {
        Self {
            current: None,
            ttl:     Duration::seconds(i64::from(DEFAULT_NOTICE_TTL_SECONDS)),
        }
    }
}

impl NoticeBoard {
    pub(crate) fn set_ttl(&mut self, ttl: Duration) {
        self.ttl = ttl;
    }

    pub(crate) fn raise(&mut self, notice: Notice) {
        self.current = Some(notice);
    }

    /// Logs the failure and raises the generic message shown to the user.
    pub(crate) fn fail(&mut self, action: &str, resource: &str, e: &RequestFailure) {
        warn!("Failed to {action} {resource}: {e}");
        self.raise(Notice::error(format!("Failed to {action} {resource}")));
    }

    pub(crate) fn current(&self, now: DateTime<Utc>) -> Option<&Notice> {
        self.current
            .as_ref()
            .filter(|x| !x.is_expired(now, self.ttl))
    }

    pub(crate) fn take(&mut self) -> Option<Notice> {
        self.current.take()
    }
}

/// First half of a two-step removal. Creating one has no side effect;
/// dropping it cancels the removal.
#[must_use = "nothing is deleted until the request is confirmed"]
#[derive(Debug, PartialEq, Eq)]
pub struct DeleteRequest<R> {
    id:        Id,
    _resource: PhantomData<fn() -> R>,
}

impl<R> DeleteRequest<R> {
    pub(crate) fn new(id: Id) -> Self {
        Self {
            id,
            _resource: PhantomData,
        }
    }

    pub fn id(&self) -> Id {
        self.id
    }
}

/// Replaces the record with the same id in place, or appends it.
pub fn upsert_by_id<R: Resource>(items: &mut Vec<R>, record: R) {
    match items.iter_mut().find(|x| x.id() == record.id()) {
        Some(existing) => *existing = record,
        None => items.push(record),
    }
}

/// Removes every record with `id`. Returns whether anything was removed.
pub fn remove_by_id<R: Resource>(items: &mut Vec<R>, id: Id) -> bool {
    let before = items.len();
    items.retain(|x| x.id() != id);
    items.len() != before
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::genre::Genre;
    use pretty_assertions::assert_eq;

    fn genre(id: i64, name: &str) -> Genre {
        Genre {
            id:          Id(id),
            name:        name.into(),
            description: "".into(),
        }
    }

    #[test]
    fn upsert_replaces_in_place() {
        let mut items = vec![genre(1, "A"), genre(2, "B"), genre(3, "C")];
        upsert_by_id(&mut items, genre(2, "B2"));
        assert_eq!(items, vec![genre(1, "A"), genre(2, "B2"), genre(3, "C")]);
        upsert_by_id(&mut items, genre(4, "D"));
        assert_eq!(items.last(), Some(&genre(4, "D")));
        assert_eq!(items.len(), 4);
    }

    #[test]
    fn remove_reports_whether_it_removed() {
        let mut items = vec![genre(1, "A"), genre(2, "B")];
        assert!(remove_by_id(&mut items, Id(1)));
        assert!(!remove_by_id(&mut items, Id(1)));
        assert_eq!(items, vec![genre(2, "B")]);
    }

    #[test]
    fn notices_expire_after_their_ttl() {
        let mut board = NoticeBoard::default();
        let notice = Notice::success("Created genre");
        let raised_at = notice.raised_at;
        board.raise(notice);
        assert!(board.current(raised_at).is_some());
        assert!(board
            .current(raised_at + Duration::milliseconds(2999))
            .is_some());
        assert!(board.current(raised_at + Duration::seconds(3)).is_none());
        assert!(board.take().is_some());
        assert!(board.take().is_none());
    }
}
