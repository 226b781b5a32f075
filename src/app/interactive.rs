//! Line-oriented session: one command per line, excuses printed as they are made.

use crate::app::commands::{self, write_numbered};
use crate::core::session::ExcuseSession;
use crate::domain::model::{
    parse_choice, Audience, Choice, ExcuseRequest, Length, Scenario, Tone, MAX_SPECIFICITY,
};
use crate::domain::ports::HistoryStore;
use crate::utils::error::{ErrorCategory, ExcuseError, Result};
use crate::utils::validation::{validate_range, Validate};
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

const HELP: &str = "\
Commands:
  g, generate            make a new excuse
  r, rephrase            re-roll the current excuse
  short | medium | long  quick pick for length
  sincere                quick pick for tone
  set <field> <value>    scenario, audience, tone, specificity, length, context, seed, save
  show                   current settings and excuse
  history                excuses from this session, newest first
  tips                   writing tips
  help                   this text
  quit                   leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractiveCommand {
    Generate,
    Rephrase,
    Set(Setting),
    Show,
    History,
    Tips,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Setting {
    Scenario(Scenario),
    Audience(Audience),
    Tone(Tone),
    Specificity(u8),
    Length(Length),
    Context(Option<String>),
    Seed(Option<u64>),
    Save(bool),
}

impl Setting {
    fn apply(self, request: &mut ExcuseRequest) {
        match self {
            Setting::Scenario(v) => request.scenario = v,
            Setting::Audience(v) => request.audience = v,
            Setting::Tone(v) => request.tone = v,
            Setting::Specificity(v) => request.specificity = v,
            Setting::Length(v) => request.length = v,
            Setting::Context(v) => {
                *request = request.clone().with_custom_context(v.as_deref());
            }
            Setting::Seed(v) => *request = request.clone().with_seed(v),
            Setting::Save(v) => request.persist_history = v,
        }
    }
}

/// Parses one input line. Blank lines yield `None`.
pub fn parse_line(line: &str) -> Result<Option<InteractiveCommand>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "g" | "generate" => InteractiveCommand::Generate,
        "r" | "rephrase" => InteractiveCommand::Rephrase,
        "short" => InteractiveCommand::Set(Setting::Length(Length::Short)),
        "medium" => InteractiveCommand::Set(Setting::Length(Length::Medium)),
        "long" => InteractiveCommand::Set(Setting::Length(Length::Long)),
        "sincere" => InteractiveCommand::Set(Setting::Tone(Tone::Sincere)),
        "set" => InteractiveCommand::Set(parse_setting(rest)?),
        "show" => InteractiveCommand::Show,
        "history" => InteractiveCommand::History,
        "tips" => InteractiveCommand::Tips,
        "help" | "?" => InteractiveCommand::Help,
        "q" | "quit" | "exit" => InteractiveCommand::Quit,
        other => {
            return Err(ExcuseError::InvalidConfigValueError {
                field: "command".to_string(),
                value: other.to_string(),
                reason: "Unknown command; type 'help' for the list".to_string(),
            })
        }
    };
    Ok(Some(command))
}

fn parse_setting(args: &str) -> Result<Setting> {
    let (field, value) = match args.split_once(char::is_whitespace) {
        Some((field, value)) => (field, value.trim()),
        None => (args, ""),
    };

    match field.to_ascii_lowercase().as_str() {
        "scenario" => Ok(Setting::Scenario(parse_choice(value)?)),
        "audience" => Ok(Setting::Audience(parse_choice(value)?)),
        "tone" => Ok(Setting::Tone(parse_choice(value)?)),
        "length" => Ok(Setting::Length(parse_choice(value)?)),
        "specificity" => {
            let level: u8 = value
                .parse()
                .map_err(|_| invalid("specificity", value, "Expected a whole number"))?;
            validate_range("specificity", level, 0, MAX_SPECIFICITY)?;
            Ok(Setting::Specificity(level))
        }
        "context" => Ok(Setting::Context(Some(value.to_string()).filter(|v| !v.is_empty()))),
        "seed" => {
            if value.is_empty() || value.eq_ignore_ascii_case("none") {
                return Ok(Setting::Seed(None));
            }
            let seed: u64 = value
                .parse()
                .map_err(|_| invalid("seed", value, "Expected a non-negative number"))?;
            Ok(Setting::Seed(Some(seed)))
        }
        "save" => match value.to_ascii_lowercase().as_str() {
            "on" | "yes" | "true" => Ok(Setting::Save(true)),
            "off" | "no" | "false" => Ok(Setting::Save(false)),
            _ => Err(invalid("save", value, "Expected on or off")),
        },
        other => Err(invalid(
            "field",
            other,
            "Expected scenario, audience, tone, specificity, length, context, seed or save",
        )),
    }
}

fn invalid(field: &str, value: &str, reason: &str) -> ExcuseError {
    ExcuseError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn write_settings<W: Write>(out: &mut W, request: &ExcuseRequest) -> Result<()> {
    writeln!(
        out,
        "{}: {} | {}: {} | {}: {} | specificity: {} | {}: {}",
        Scenario::FIELD,
        request.scenario,
        Audience::FIELD,
        request.audience,
        Tone::FIELD,
        request.tone,
        request.specificity,
        Length::FIELD,
        request.length
    )?;
    if let Some(context) = &request.custom_context {
        writeln!(out, "context: {}", context)?;
    }
    if let Some(seed) = request.seed {
        writeln!(out, "seed: {}", seed)?;
    }
    writeln!(out, "save: {}", if request.persist_history { "on" } else { "off" })?;
    Ok(())
}

/// Reads commands from `input` until `quit` or end of input.
///
/// Usage mistakes are reported on `out` and the session continues; storage
/// failures end it.
pub async fn run<H, R, W>(
    session: &mut ExcuseSession<H>,
    mut request: ExcuseRequest,
    input: R,
    out: &mut W,
) -> Result<()>
where
    H: HistoryStore,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    writeln!(out, "Excuse Generator. Type 'help' for commands.")?;
    let mut lines = input.lines();

    loop {
        write!(out, "> ")?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            writeln!(out)?;
            break;
        };

        let command = match parse_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                writeln!(out, "{}", e.user_friendly_message())?;
                continue;
            }
        };
        tracing::debug!("Interactive command: {:?}", command);

        let outcome = match command {
            InteractiveCommand::Quit => break,
            InteractiveCommand::Generate => commands::generate(session, &request, out).await,
            InteractiveCommand::Rephrase => match session.rephrase(&request).await {
                Ok(text) => Ok(writeln!(out, "{}", text)?),
                Err(e) => Err(e),
            },
            InteractiveCommand::Set(setting) => {
                let mut updated = request.clone();
                setting.apply(&mut updated);
                match updated.validate() {
                    Ok(()) => {
                        request = updated;
                        write_settings(out, &request)
                    }
                    Err(e) => Err(e),
                }
            }
            InteractiveCommand::Show => {
                write_settings(out, &request)?;
                match session.current() {
                    Some(current) => writeln!(out, "current: {}", current)?,
                    None => writeln!(out, "current: (none)")?,
                }
                Ok(())
            }
            InteractiveCommand::History => write_numbered(out, session.history(), None),
            InteractiveCommand::Tips => commands::tips(out),
            InteractiveCommand::Help => Ok(writeln!(out, "{}", HELP)?),
        };

        if let Err(e) = outcome {
            match e.category() {
                ErrorCategory::Storage => return Err(e),
                _ => writeln!(out, "{}", e.user_friendly_message())?,
            }
        }
    }

    tracing::info!("Interactive session ended after {} excuses", session.history().len());
    Ok(())
}
