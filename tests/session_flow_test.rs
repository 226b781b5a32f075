use anyhow::Result;
use chrono::NaiveDate;
use excuse_gen::app::commands;
use excuse_gen::domain::ports::{Clock, HistoryStore};
use excuse_gen::{
    ExcuseError, ExcuseGenerator, ExcuseRequest, ExcuseSession, FixedClock, JsonlHistoryStore,
    Length, Scenario, TemplateCatalog, Tone,
};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

const TRAFFIC: &str = "Running late due to traffic. ETA tomorrow.";

fn session_in(dir: &Path) -> ExcuseSession<JsonlHistoryStore> {
    let now = NaiveDate::from_ymd_opt(2024, 5, 1)
        .unwrap()
        .and_hms_opt(17, 45, 0)
        .unwrap();
    let clock: Arc<dyn Clock> = Arc::new(FixedClock(now));
    let generator = ExcuseGenerator::new(TemplateCatalog::builtin(), clock.clone());
    ExcuseSession::new(generator, JsonlHistoryStore::new(dir), clock)
}

fn traffic_request(dir: &Path, save: bool) -> ExcuseRequest {
    ExcuseRequest {
        scenario: Scenario::TravelCommute,
        tone: Tone::Brief,
        length: Length::Medium,
        specificity: 1,
        persist_history: save,
        history_dir: Some(dir.to_path_buf()),
        ..ExcuseRequest::default()
    }
}

#[tokio::test]
async fn test_generate_with_save_writes_daily_jsonl() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let mut session = session_in(temp_dir.path());
    let request = traffic_request(temp_dir.path(), true);

    let mut out = Vec::new();
    commands::generate(&mut session, &request, &mut out).await?;
    assert_eq!(String::from_utf8(out)?, format!("{}\n", TRAFFIC));

    let content = std::fs::read_to_string(temp_dir.path().join("history_20240501.jsonl"))?;
    let record: serde_json::Value = serde_json::from_str(content.trim())?;
    assert_eq!(record["text"], TRAFFIC);
    assert_eq!(record["timestamp"], "2024-05-01T17:45:00");
    Ok(())
}

#[tokio::test]
async fn test_generate_without_save_leaves_disk_alone() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let history_dir = temp_dir.path().join("history");
    let mut session = session_in(&history_dir);

    session.generate(&traffic_request(&history_dir, false)).await?;

    assert_eq!(session.history().len(), 1);
    assert!(!history_dir.exists());
    Ok(())
}

#[tokio::test]
async fn test_rephrase_command_resumes_from_saved_history() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let request = traffic_request(temp_dir.path(), true);

    let mut first_run = session_in(temp_dir.path());
    first_run.generate(&request).await?;

    // A fresh process has no current excuse until it reads the folder.
    let mut second_run = session_in(temp_dir.path());
    assert!(second_run.current().is_none());

    let mut out = Vec::new();
    commands::rephrase(&mut second_run, &request, &mut out).await?;
    assert_eq!(String::from_utf8(out)?.trim(), TRAFFIC);

    let saved = second_run.store().load().await?;
    assert_eq!(saved.len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_rephrase_command_with_empty_history_fails() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let mut session = session_in(temp_dir.path());
    let request = traffic_request(temp_dir.path(), false);

    let mut out = Vec::new();
    let err = commands::rephrase(&mut session, &request, &mut out)
        .await
        .unwrap_err();
    assert!(matches!(err, ExcuseError::NothingToRephrase));
    assert!(out.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_history_command_lists_newest_first() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let mut session = session_in(temp_dir.path());

    let mut appointment = traffic_request(temp_dir.path(), true);
    appointment.scenario = Scenario::Appointment;
    appointment.tone = Tone::Professional;

    session
        .generate(&traffic_request(temp_dir.path(), true))
        .await?;
    session.generate(&appointment).await?;

    let store = JsonlHistoryStore::new(temp_dir.path());
    let mut out = Vec::new();
    commands::history(&store, None, &mut out).await?;
    let listing = String::from_utf8(out)?;
    let lines: Vec<&str> = listing.lines().collect();

    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("2. I need to reschedule today's appointment"));
    assert_eq!(lines[1], format!("1. {}", TRAFFIC));

    let mut out = Vec::new();
    commands::history(&store, Some(1), &mut out).await?;
    assert_eq!(String::from_utf8(out)?.lines().count(), 1);
    Ok(())
}

#[tokio::test]
async fn test_history_command_on_empty_folder() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = JsonlHistoryStore::new(temp_dir.path().join("missing"));

    let mut out = Vec::new();
    commands::history(&store, None, &mut out).await?;
    assert_eq!(String::from_utf8(out)?.trim(), commands::EMPTY_HISTORY);
    Ok(())
}
