use crate::app::TIPS;
use crate::core::session::{numbered_newest_first, ExcuseSession};
use crate::domain::model::ExcuseRequest;
use crate::domain::ports::HistoryStore;
use crate::utils::error::{ExcuseError, Result};
use std::io::Write;

pub const EMPTY_HISTORY: &str = "No history yet. Generate an excuse to see it here.";

pub async fn generate<H: HistoryStore, W: Write>(
    session: &mut ExcuseSession<H>,
    request: &ExcuseRequest,
    out: &mut W,
) -> Result<()> {
    let text = session.generate(request).await?;
    writeln!(out, "{}", text)?;
    Ok(())
}

/// Rephrases the newest saved excuse.
pub async fn rephrase<H: HistoryStore, W: Write>(
    session: &mut ExcuseSession<H>,
    request: &ExcuseRequest,
    out: &mut W,
) -> Result<()> {
    if session.current().is_none() {
        let last = session
            .store()
            .load()
            .await?
            .pop()
            .ok_or(ExcuseError::NothingToRephrase)?;
        tracing::debug!("Resuming from entry saved at {}", last.timestamp);
        session.resume(last.text);
    }

    let text = session.rephrase(request).await?;
    writeln!(out, "{}", text)?;
    Ok(())
}

pub async fn history<H: HistoryStore, W: Write>(
    store: &H,
    limit: Option<usize>,
    out: &mut W,
) -> Result<()> {
    let entries = store.load().await?;
    let texts: Vec<&str> = entries.iter().map(|e| e.text.as_str()).collect();
    write_numbered(out, &texts, limit)
}

pub fn write_numbered<T: AsRef<str>, W: Write>(
    out: &mut W,
    items: &[T],
    limit: Option<usize>,
) -> Result<()> {
    if items.is_empty() {
        writeln!(out, "{}", EMPTY_HISTORY)?;
        return Ok(());
    }
    for (number, text) in numbered_newest_first(items, limit) {
        writeln!(out, "{}. {}", number, text)?;
    }
    Ok(())
}

pub fn tips<W: Write>(out: &mut W) -> Result<()> {
    for tip in TIPS {
        writeln!(out, "- {}", tip)?;
    }
    Ok(())
}
