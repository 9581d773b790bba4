//! Optimistic praise list for a single day.
//!
//! Local state changes first; the network write follows. A failed write
//! restores the list to exactly what it was before the mutation.

use async_trait::async_trait;
use chrono::Utc;
use std::fmt;
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

use crate::dates::CalendarDate;
use crate::models::praise::{normalize_content, Praise};

/// Remote praise operations for the signed-in user
#[async_trait]
pub trait PraiseStore: Send + Sync {
    type Error: fmt::Display + Send;

    async fn fetch_praises(&self, date: CalendarDate) -> Result<Vec<Praise>, Self::Error>;
    async fn create_praise(&self, date: CalendarDate, content: &str) -> Result<Praise, Self::Error>;
    async fn update_praise(&self, id: i64, content: &str) -> Result<Praise, Self::Error>;
    async fn delete_praise(&self, id: i64) -> Result<(), Self::Error>;
}

/// Result of an optimistic write
#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutcome<T, E> {
    Committed(T),
    /// The write failed and the list was reset to `restored`
    RolledBack { error: E, restored: Vec<Praise> },
}

impl<T, E> MutationOutcome<T, E> {
    pub fn is_committed(&self) -> bool {
        matches!(self, MutationOutcome::Committed(_))
    }
}

/// Mutations refused before anything is sent
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JournalError {
    #[error("{0}")]
    Invalid(String),

    #[error("Praise {0} is not in this day's list")]
    UnknownPraise(i64),
}

pub struct DayPraises<S: PraiseStore> {
    store: S,
    date: CalendarDate,
    praises: Vec<Praise>,
    next_temp_id: i64,
}

impl<S: PraiseStore> DayPraises<S> {
    pub fn new(store: S, date: CalendarDate) -> Self {
        Self {
            store,
            date,
            praises: Vec::new(),
            next_temp_id: -1,
        }
    }

    pub fn date(&self) -> CalendarDate {
        self.date
    }

    /// Current list, newest first
    pub fn praises(&self) -> &[Praise] {
        &self.praises
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Replace the list with whatever the server returns
    pub async fn refresh(&mut self) -> Result<&[Praise], S::Error> {
        self.praises = self.store.fetch_praises(self.date).await?;
        Ok(&self.praises)
    }

    pub async fn add(
        &mut self,
        content: &str,
    ) -> Result<MutationOutcome<Praise, S::Error>, JournalError> {
        let content = normalize_content(content).map_err(JournalError::Invalid)?;
        let snapshot = self.praises.clone();

        let temp_id = self.next_temp_id;
        self.next_temp_id -= 1;
        self.praises.insert(
            0,
            Praise {
                id: temp_id,
                user_id: Uuid::nil(),
                praise_date: self.date,
                content: content.clone(),
                created_at: Utc::now(),
            },
        );

        match self.store.create_praise(self.date, &content).await {
            Ok(saved) => {
                if let Some(slot) = self.praises.iter_mut().find(|p| p.id == temp_id) {
                    *slot = saved.clone();
                }
                Ok(MutationOutcome::Committed(saved))
            }
            Err(error) => Ok(self.roll_back(snapshot, error, "add")),
        }
    }

    pub async fn update(
        &mut self,
        id: i64,
        content: &str,
    ) -> Result<MutationOutcome<Praise, S::Error>, JournalError> {
        let content = normalize_content(content).map_err(JournalError::Invalid)?;
        let index = self.position(id)?;
        let snapshot = self.praises.clone();

        self.praises[index].content = content.clone();

        match self.store.update_praise(id, &content).await {
            Ok(saved) => {
                if let Some(slot) = self.praises.iter_mut().find(|p| p.id == id) {
                    *slot = saved.clone();
                }
                Ok(MutationOutcome::Committed(saved))
            }
            Err(error) => Ok(self.roll_back(snapshot, error, "update")),
        }
    }

    pub async fn delete(&mut self, id: i64) -> Result<MutationOutcome<(), S::Error>, JournalError> {
        let index = self.position(id)?;
        let snapshot = self.praises.clone();

        self.praises.remove(index);

        match self.store.delete_praise(id).await {
            Ok(()) => Ok(MutationOutcome::Committed(())),
            Err(error) => Ok(self.roll_back(snapshot, error, "delete")),
        }
    }

    fn position(&self, id: i64) -> Result<usize, JournalError> {
        self.praises
            .iter()
            .position(|p| p.id == id)
            .ok_or(JournalError::UnknownPraise(id))
    }

    fn roll_back<T>(
        &mut self,
        snapshot: Vec<Praise>,
        error: S::Error,
        action: &str,
    ) -> MutationOutcome<T, S::Error> {
        warn!("Praise {} on {} failed, rolling back: {}", action, self.date, error);
        self.praises = snapshot.clone();
        MutationOutcome::RolledBack {
            error,
            restored: snapshot,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeStore {
        fail: AtomicBool,
        next_id: AtomicI64,
        rows: Mutex<Vec<Praise>>,
    }

    impl FakeStore {
        fn failing() -> Self {
            let store = Self::default();
            store.fail.store(true, Ordering::SeqCst);
            store
        }

        fn check(&self) -> Result<(), String> {
            if self.fail.load(Ordering::SeqCst) {
                Err("save failed".to_string())
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl PraiseStore for FakeStore {
        type Error = String;

        async fn fetch_praises(&self, date: CalendarDate) -> Result<Vec<Praise>, String> {
            self.check()?;
            let rows = self.rows.lock().unwrap();
            let mut list: Vec<Praise> =
                rows.iter().filter(|p| p.praise_date == date).cloned().collect();
            list.reverse();
            Ok(list)
        }

        async fn create_praise(&self, date: CalendarDate, content: &str) -> Result<Praise, String> {
            self.check()?;
            let praise = Praise {
                id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
                user_id: Uuid::nil(),
                praise_date: date,
                content: content.to_string(),
                created_at: Utc::now(),
            };
            self.rows.lock().unwrap().push(praise.clone());
            Ok(praise)
        }

        async fn update_praise(&self, id: i64, content: &str) -> Result<Praise, String> {
            self.check()?;
            let mut rows = self.rows.lock().unwrap();
            let row = rows.iter_mut().find(|p| p.id == id).ok_or("missing")?;
            row.content = content.to_string();
            Ok(row.clone())
        }

        async fn delete_praise(&self, id: i64) -> Result<(), String> {
            self.check()?;
            self.rows.lock().unwrap().retain(|p| p.id != id);
            Ok(())
        }
    }

    fn day() -> CalendarDate {
        "2024-05-01".parse().unwrap()
    }

    #[tokio::test]
    async fn committed_add_replaces_the_temporary_row() {
        let mut model = DayPraises::new(FakeStore::default(), day());
        let outcome = model.add("  drank water ").await.unwrap();

        let saved = match outcome {
            MutationOutcome::Committed(saved) => saved,
            other => panic!("expected commit, got {:?}", other),
        };
        assert!(saved.id > 0);
        assert_eq!(model.praises().len(), 1);
        assert_eq!(model.praises()[0], saved);
        assert_eq!(saved.content, "drank water");
    }

    #[tokio::test]
    async fn failed_add_restores_the_snapshot() {
        let mut model = DayPraises::new(FakeStore::default(), day());
        model.add("first").await.unwrap();
        let before = model.praises().to_vec();

        model.store().fail.store(true, Ordering::SeqCst);
        let outcome = model.add("second").await.unwrap();

        match outcome {
            MutationOutcome::RolledBack { error, restored } => {
                assert_eq!(error, "save failed");
                assert_eq!(restored, before);
            }
            other => panic!("expected rollback, got {:?}", other),
        }
        assert_eq!(model.praises(), before.as_slice());
    }

    #[tokio::test]
    async fn failed_update_and_delete_restore_the_snapshot() {
        let mut model = DayPraises::new(FakeStore::default(), day());
        model.add("one").await.unwrap();
        model.add("two").await.unwrap();
        let before = model.praises().to_vec();
        let id = before[1].id;

        model.store().fail.store(true, Ordering::SeqCst);

        let updated = model.update(id, "changed").await.unwrap();
        assert!(!updated.is_committed());
        assert_eq!(model.praises(), before.as_slice());

        let deleted = model.delete(id).await.unwrap();
        assert!(!deleted.is_committed());
        assert_eq!(model.praises(), before.as_slice());
    }

    #[tokio::test]
    async fn temporary_ids_are_negative_and_distinct() {
        let mut model = DayPraises::new(FakeStore::failing(), day());
        model.add("a").await.unwrap();
        assert!(model.praises().is_empty());
        assert_eq!(model.next_temp_id, -2);
        model.add("b").await.unwrap();
        assert_eq!(model.next_temp_id, -3);
    }

    #[tokio::test]
    async fn unknown_ids_and_blank_content_are_refused_up_front() {
        let mut model = DayPraises::new(FakeStore::default(), day());
        assert_eq!(model.delete(42).await.unwrap_err(), JournalError::UnknownPraise(42));
        assert!(matches!(model.add("   ").await, Err(JournalError::Invalid(_))));
    }

    #[tokio::test]
    async fn refresh_takes_the_server_list() {
        let store = FakeStore::default();
        store.create_praise(day(), "from elsewhere").await.unwrap();
        let mut model = DayPraises::new(store, day());
        let list = model.refresh().await.unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].content, "from elsewhere");
    }
}
