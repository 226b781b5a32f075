use crate::core::generator::ExcuseGenerator;
use crate::domain::model::{ExcuseRequest, HistoryEntry};
use crate::domain::ports::{Clock, HistoryStore};
use crate::utils::error::{ExcuseError, Result};
use std::sync::Arc;

/// Holds the current excuse and the in-memory history of one run.
pub struct ExcuseSession<H: HistoryStore> {
    generator: ExcuseGenerator,
    store: H,
    clock: Arc<dyn Clock>,
    current: Option<String>,
    history: Vec<String>,
}

impl<H: HistoryStore> ExcuseSession<H> {
    pub fn new(generator: ExcuseGenerator, store: H, clock: Arc<dyn Clock>) -> Self {
        Self {
            generator,
            store,
            clock,
            current: None,
            history: Vec::new(),
        }
    }

    pub async fn generate(&mut self, request: &ExcuseRequest) -> Result<String> {
        let text = self.generator.generate(request)?;
        tracing::info!("Generated excuse ({} / {})", request.scenario, request.tone);
        self.record(request, text).await
    }

    pub async fn rephrase(&mut self, request: &ExcuseRequest) -> Result<String> {
        let base = self.current.clone().ok_or(ExcuseError::NothingToRephrase)?;
        let text = self.generator.rephrase(request, &base)?;
        tracing::info!("Rephrased excuse ({} / {})", request.scenario, request.tone);
        self.record(request, text).await
    }

    /// Makes `text` the current excuse without adding it to the history.
    pub fn resume(&mut self, text: impl Into<String>) {
        self.current = Some(text.into());
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Newest first, numbered from the history length down to 1.
    pub fn recent(&self, limit: Option<usize>) -> Vec<(usize, &str)> {
        numbered_newest_first(&self.history, limit)
    }

    pub fn store(&self) -> &H {
        &self.store
    }

    /// Session state only changes once the entry is saved.
    async fn record(&mut self, request: &ExcuseRequest, text: String) -> Result<String> {
        if request.persist_history {
            let entry = HistoryEntry::new(self.clock.now(), text.clone());
            self.store.append(&entry).await?;
            tracing::debug!("Saved excuse to history");
        }

        self.current = Some(text.clone());
        self.history.push(text.clone());
        Ok(text)
    }
}

/// Numbers `items` from `len` down to 1, newest first.
pub fn numbered_newest_first<T: AsRef<str>>(items: &[T], limit: Option<usize>) -> Vec<(usize, &str)> {
    let total = items.len();
    items
        .iter()
        .rev()
        .enumerate()
        .take(limit.unwrap_or(total))
        .map(|(idx, item)| (total - idx, item.as_ref()))
        .collect()
}
