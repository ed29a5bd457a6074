//! Secondary full-text mirror of shifts and car licences.
//!
//! The relational store stays the source of truth. Handlers write the store
//! first and then the mirror; nothing ties the two writes together, so a
//! failed or interrupted mirror write leaves the mirror stale until the next
//! [`rebuild`].

mod query;

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::SqlitePool;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::paging::{Page, PageRequest};
use crate::store;
use crate::types::{CarLicence, Shift};

pub use query::SearchQuery;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("document has no id")]
    MissingId,
    #[error("{0}")]
    InvalidQuery(String),
    #[error("search index unavailable: {0}")]
    Unavailable(String),
}

/// A document the mirror can hold. Field names must be lowercase.
pub trait Searchable: Clone + Send + Sync + 'static {
    fn doc_id(&self) -> Option<i64>;
    fn fields(&self) -> Vec<(&'static str, String)>;
}

/// Text-searchable copy of entities, keyed by the store id.
#[async_trait]
pub trait SearchMirror<D: Searchable>: Send + Sync {
    /// Inserts or replaces the document under its id.
    async fn index(&self, doc: &D) -> Result<(), SearchError>;
    /// Removing an unknown id is not an error.
    async fn remove(&self, id: i64) -> Result<(), SearchError>;
    async fn get(&self, id: i64) -> Result<Option<D>, SearchError>;
    /// Matches ordered by id.
    async fn search(&self, query: &SearchQuery, page: &PageRequest) -> Result<Page<D>, SearchError>;
    async fn clear(&self) -> Result<(), SearchError>;
    async fn len(&self) -> usize;
}

/// Lowercase alphanumeric runs. A `-` directly before a digit is kept when it
/// does not follow a letter or digit, so `-5` and `5` stay distinct while
/// `class-b` still splits.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut prev: Option<char> = None;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c.is_alphanumeric() {
            current.extend(c.to_lowercase());
        } else {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
            let negative = c == '-'
                && !prev.is_some_and(char::is_alphanumeric)
                && chars.peek().is_some_and(|n| n.is_ascii_digit());
            if negative {
                current.push('-');
            }
        }
        prev = Some(c);
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

struct Indexed<D> {
    doc: D,
    fields: Vec<(&'static str, Vec<String>)>,
}

/// In-process mirror. Tokens are computed once at index time.
pub struct MemoryIndex<D> {
    docs: RwLock<BTreeMap<i64, Indexed<D>>>,
}

impl<D> Default for MemoryIndex<D> {
    fn default() -> Self {
        Self { docs: RwLock::new(BTreeMap::new()) }
    }
}

impl<D: Searchable> MemoryIndex<D> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }
}

#[async_trait]
impl<D: Searchable> SearchMirror<D> for MemoryIndex<D> {
    async fn index(&self, doc: &D) -> Result<(), SearchError> {
        let id = doc.doc_id().ok_or(SearchError::MissingId)?;
        let fields = doc.fields().into_iter().map(|(name, value)| (name, tokenize(&value))).collect();
        self.docs.write().await.insert(id, Indexed { doc: doc.clone(), fields });
        Ok(())
    }

    async fn remove(&self, id: i64) -> Result<(), SearchError> {
        self.docs.write().await.remove(&id);
        Ok(())
    }

    async fn get(&self, id: i64) -> Result<Option<D>, SearchError> {
        Ok(self.docs.read().await.get(&id).map(|e| e.doc.clone()))
    }

    async fn search(&self, query: &SearchQuery, page: &PageRequest) -> Result<Page<D>, SearchError> {
        let docs = self.docs.read().await;
        let mut total = 0i64;
        let mut items = Vec::new();
        let skip = page.offset();
        for entry in docs.values().filter(|e| query.matches(&e.fields)) {
            if total >= skip && (items.len() as i64) < page.limit() {
                items.push(entry.doc.clone());
            }
            total += 1;
        }
        Ok(Page::new(items, total))
    }

    async fn clear(&self) -> Result<(), SearchError> {
        self.docs.write().await.clear();
        Ok(())
    }

    async fn len(&self) -> usize {
        self.docs.read().await.len()
    }
}

impl Searchable for Shift {
    fn doc_id(&self) -> Option<i64> {
        self.id
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = Vec::with_capacity(5);
        if let Some(id) = self.id {
            fields.push(("id", id.to_string()));
        }
        if let Some(car) = self.car {
            fields.push(("car", car.id.to_string()));
        }
        if let Some(driver) = self.safety_driver {
            fields.push(("safetydriver", driver.id.to_string()));
        }
        fields.push(("start", self.start.to_string()));
        fields.push(("end", self.end.to_string()));
        fields
    }
}

impl Searchable for CarLicence {
    fn doc_id(&self) -> Option<i64> {
        self.id
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = Vec::with_capacity(4);
        if let Some(id) = self.id {
            fields.push(("id", id.to_string()));
        }
        if let Some(licence) = &self.licence {
            fields.push(("licence", licence.clone()));
        }
        if let Some(car) = self.car {
            fields.push(("car", car.id.to_string()));
        }
        if let Some(driver) = self.safety_driver {
            fields.push(("safetydriver", driver.id.to_string()));
        }
        fields
    }
}

/// Replaces both mirrors' contents with what the store holds.
/// Returns the number of shifts and licences indexed.
pub async fn rebuild(
    db: &SqlitePool,
    shifts: &dyn SearchMirror<Shift>,
    licences: &dyn SearchMirror<CarLicence>,
) -> anyhow::Result<(usize, usize)> {
    let all_shifts = store::shifts::find_all(db).await?;
    shifts.clear().await?;
    for shift in &all_shifts {
        shifts.index(shift).await?;
    }

    let all_licences = store::licences::find_all(db).await?;
    licences.clear().await?;
    for licence in &all_licences {
        licences.index(licence).await?;
    }

    tracing::info!(shifts = all_shifts.len(), licences = all_licences.len(), "search mirror rebuilt");
    Ok((all_shifts.len(), all_licences.len()))
}
