use crate::domain::model::ExcuseRequest;
use chrono::{NaiveDateTime, Timelike};
use std::collections::HashMap;

pub const DEFAULT_ACTION: &str = "complete the task";
pub const DEFAULT_DELIVERABLE: &str = "the deliverable";
pub const DEFAULT_EVENT: &str = "the event";

const DETAILED_SPECIFICITY: u8 = 7;
const DAY_SPECIFICITY: u8 = 4;
const MAX_DELIVERABLE_CHARS: usize = 120;

pub type SlotValues = HashMap<&'static str, String>;

/// Slot values for one request at a given moment.
pub fn build(request: &ExcuseRequest, now: NaiveDateTime) -> SlotValues {
    let (timeframe, new_time) = time_slots(request.specificity, now);

    let mut context = SlotValues::new();
    context.insert("action", DEFAULT_ACTION.to_string());
    context.insert("deliverable", DEFAULT_DELIVERABLE.to_string());
    context.insert("event", DEFAULT_EVENT.to_string());
    context.insert("timeframe", timeframe);
    context.insert("new_time", new_time);
    context.insert("audience", request.audience.phrase().to_string());
    context.insert("scenario", request.scenario.to_string().to_lowercase());

    if let Some(text) = request.custom_context.as_deref() {
        if looks_like_deliverable(text) {
            context.insert("deliverable", text.to_string());
        } else {
            context.insert("notes", text.to_string());
        }
    }

    context
}

// A short phrase reads as the thing being delayed; anything else is kept as notes.
fn looks_like_deliverable(text: &str) -> bool {
    text.chars().count() < MAX_DELIVERABLE_CHARS && !text.contains(',') && text.contains(' ')
}

fn time_slots(specificity: u8, now: NaiveDateTime) -> (String, String) {
    if specificity >= DETAILED_SPECIFICITY {
        let quarter = now.with_minute((now.minute() / 15) * 15).unwrap_or(now);
        (
            now.format("%A %I:%M %p").to_string(),
            quarter.format("%A %I:%M %p").to_string(),
        )
    } else if specificity >= DAY_SPECIFICITY {
        // Same calendar day even when the hour wraps past midnight.
        let later = now.with_hour((now.hour() + 3) % 24).unwrap_or(now);
        (
            now.format("%A").to_string(),
            later.format("%A %I %p").to_string(),
        )
    } else {
        ("today".to_string(), "tomorrow".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Audience, Scenario};
    use chrono::NaiveDate;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        // 2024-05-01 is a Wednesday.
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(hour, minute, 27)
            .unwrap()
    }

    fn request(specificity: u8) -> ExcuseRequest {
        ExcuseRequest {
            specificity,
            ..ExcuseRequest::default()
        }
    }

    #[test]
    fn test_high_specificity_uses_clock_time() {
        let context = build(&request(8), at(14, 38));
        assert_eq!(context["timeframe"], "Wednesday 02:38 PM");
        assert_eq!(context["new_time"], "Wednesday 02:30 PM");
    }

    #[test]
    fn test_specificity_seven_is_detailed() {
        let context = build(&request(7), at(9, 52));
        assert_eq!(context["timeframe"], "Wednesday 09:52 AM");
        assert_eq!(context["new_time"], "Wednesday 09:45 AM");

        let context = build(&request(6), at(9, 52));
        assert_eq!(context["timeframe"], "Wednesday");
    }

    #[test]
    fn test_medium_specificity_uses_day_and_hour() {
        let context = build(&request(4), at(9, 5));
        assert_eq!(context["timeframe"], "Wednesday");
        assert_eq!(context["new_time"], "Wednesday 12 PM");
    }

    #[test]
    fn test_medium_specificity_wraps_hour_on_same_day() {
        let context = build(&request(6), at(22, 0));
        assert_eq!(context["new_time"], "Wednesday 01 AM");
    }

    #[test]
    fn test_low_specificity_is_vague() {
        let context = build(&request(3), at(10, 0));
        assert_eq!(context["timeframe"], "today");
        assert_eq!(context["new_time"], "tomorrow");
    }

    #[test]
    fn test_defaults_and_request_slots() {
        let req = ExcuseRequest {
            scenario: Scenario::TravelCommute,
            audience: Audience::Client,
            ..ExcuseRequest::default()
        };
        let context = build(&req, at(10, 0));
        assert_eq!(context["action"], DEFAULT_ACTION);
        assert_eq!(context["deliverable"], DEFAULT_DELIVERABLE);
        assert_eq!(context["event"], DEFAULT_EVENT);
        assert_eq!(context["audience"], "my client");
        assert_eq!(context["scenario"], "travel/commute");
        assert!(!context.contains_key("notes"));
    }

    #[test]
    fn test_short_phrase_becomes_deliverable() {
        let req = ExcuseRequest::default().with_custom_context(Some("the Q3 report"));
        let context = build(&req, at(10, 0));
        assert_eq!(context["deliverable"], "the Q3 report");
        assert!(!context.contains_key("notes"));
    }

    #[test]
    fn test_other_context_becomes_notes() {
        let single_word = ExcuseRequest::default().with_custom_context(Some("Q3"));
        let context = build(&single_word, at(10, 0));
        assert_eq!(context["deliverable"], DEFAULT_DELIVERABLE);
        assert_eq!(context["notes"], "Q3");

        let with_comma =
            ExcuseRequest::default().with_custom_context(Some("report, slides and demo"));
        let context = build(&with_comma, at(10, 0));
        assert_eq!(context["notes"], "report, slides and demo");

        let long = "word ".repeat(30);
        let context = build(
            &ExcuseRequest::default().with_custom_context(Some(&long)),
            at(10, 0),
        );
        assert_eq!(context["deliverable"], DEFAULT_DELIVERABLE);
        assert!(context.contains_key("notes"));
    }
}
