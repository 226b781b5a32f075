use crate::utils::error::{ExcuseError, Result};
use crate::utils::validation::{validate_path, validate_range, Validate};
use chrono::NaiveDateTime;
use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub const MAX_SPECIFICITY: u8 = 10;
pub const DEFAULT_SPECIFICITY: u8 = 6;

/// A closed set of options the user picks from.
///
/// `key` is the kebab-case name used on the command line, in TOML and in serde;
/// `label` is the text shown to people.
pub trait Choice: Sized + Copy + 'static {
    const FIELD: &'static str;
    const ALL: &'static [Self];

    fn key(&self) -> &'static str;
    fn label(&self) -> &'static str;
}

/// Case-insensitive lookup by key or label.
pub fn parse_choice<T: Choice>(input: &str) -> Result<T> {
    let wanted = input.trim();
    T::ALL
        .iter()
        .copied()
        .find(|c| c.key().eq_ignore_ascii_case(wanted) || c.label().eq_ignore_ascii_case(wanted))
        .ok_or_else(|| ExcuseError::InvalidConfigValueError {
            field: T::FIELD.to_string(),
            value: input.to_string(),
            reason: format!(
                "Expected one of: {}",
                T::ALL.iter().map(|c| c.key()).collect::<Vec<_>>().join(", ")
            ),
        })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum Scenario {
    #[default]
    WorkDeadline,
    SchoolAssignment,
    SocialEvent,
    Appointment,
    TravelCommute,
    General,
}

impl Choice for Scenario {
    const FIELD: &'static str = "scenario";
    const ALL: &'static [Self] = &[
        Scenario::WorkDeadline,
        Scenario::SchoolAssignment,
        Scenario::SocialEvent,
        Scenario::Appointment,
        Scenario::TravelCommute,
        Scenario::General,
    ];

    fn key(&self) -> &'static str {
        match self {
            Scenario::WorkDeadline => "work-deadline",
            Scenario::SchoolAssignment => "school-assignment",
            Scenario::SocialEvent => "social-event",
            Scenario::Appointment => "appointment",
            Scenario::TravelCommute => "travel-commute",
            Scenario::General => "general",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Scenario::WorkDeadline => "Work Deadline",
            Scenario::SchoolAssignment => "School Assignment",
            Scenario::SocialEvent => "Social Event",
            Scenario::Appointment => "Appointment",
            Scenario::TravelCommute => "Travel/Commute",
            Scenario::General => "General",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum Audience {
    #[default]
    Manager,
    Professor,
    Friend,
    Family,
    Client,
    Other,
}

impl Audience {
    /// Value of the `{audience}` slot.
    pub fn phrase(&self) -> &'static str {
        match self {
            Audience::Manager => "my manager",
            Audience::Professor => "my professor",
            Audience::Friend => "my friend",
            Audience::Family => "my family",
            Audience::Client => "my client",
            Audience::Other => "everyone",
        }
    }
}

impl Choice for Audience {
    const FIELD: &'static str = "audience";
    const ALL: &'static [Self] = &[
        Audience::Manager,
        Audience::Professor,
        Audience::Friend,
        Audience::Family,
        Audience::Client,
        Audience::Other,
    ];

    fn key(&self) -> &'static str {
        match self {
            Audience::Manager => "manager",
            Audience::Professor => "professor",
            Audience::Friend => "friend",
            Audience::Family => "family",
            Audience::Client => "client",
            Audience::Other => "other",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Audience::Manager => "Manager",
            Audience::Professor => "Professor",
            Audience::Friend => "Friend",
            Audience::Family => "Family",
            Audience::Client => "Client",
            Audience::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum Tone {
    #[default]
    Professional,
    Casual,
    Sincere,
    Brief,
    LightHearted,
}

impl Choice for Tone {
    const FIELD: &'static str = "tone";
    const ALL: &'static [Self] = &[
        Tone::Professional,
        Tone::Casual,
        Tone::Sincere,
        Tone::Brief,
        Tone::LightHearted,
    ];

    fn key(&self) -> &'static str {
        match self {
            Tone::Professional => "professional",
            Tone::Casual => "casual",
            Tone::Sincere => "sincere",
            Tone::Brief => "brief",
            Tone::LightHearted => "light-hearted",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Tone::Professional => "Professional",
            Tone::Casual => "Casual",
            Tone::Sincere => "Sincere",
            Tone::Brief => "Brief",
            Tone::LightHearted => "Light-hearted",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum Length {
    Short,
    #[default]
    Medium,
    Long,
}

impl Choice for Length {
    const FIELD: &'static str = "length";
    const ALL: &'static [Self] = &[Length::Short, Length::Medium, Length::Long];

    fn key(&self) -> &'static str {
        match self {
            Length::Short => "short",
            Length::Medium => "medium",
            Length::Long => "long",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Length::Short => "Short",
            Length::Medium => "Medium",
            Length::Long => "Long",
        }
    }
}

macro_rules! impl_display_from_str {
    ($($ty:ty),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.label())
                }
            }

            impl FromStr for $ty {
                type Err = ExcuseError;

                fn from_str(s: &str) -> Result<Self> {
                    parse_choice(s)
                }
            }

            // Serialized as the kebab-case key; read back through `parse_choice`.
            impl<'de> Deserialize<'de> for $ty {
                fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
                where
                    D: Deserializer<'de>,
                {
                    let raw = String::deserialize(deserializer)?;
                    parse_choice(&raw).map_err(de::Error::custom)
                }
            }
        )*
    };
}

impl_display_from_str!(Scenario, Audience, Tone, Length);

/// Everything the generator needs to produce one excuse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExcuseRequest {
    pub scenario: Scenario,
    pub audience: Audience,
    pub tone: Tone,
    pub specificity: u8,
    pub length: Length,
    pub custom_context: Option<String>,
    pub seed: Option<u64>,
    pub persist_history: bool,
    pub history_dir: Option<PathBuf>,
}

impl Default for ExcuseRequest {
    fn default() -> Self {
        Self {
            scenario: Scenario::default(),
            audience: Audience::default(),
            tone: Tone::default(),
            specificity: DEFAULT_SPECIFICITY,
            length: Length::default(),
            custom_context: None,
            seed: None,
            persist_history: false,
            history_dir: None,
        }
    }
}

impl ExcuseRequest {
    /// Trims the context and drops it when blank.
    pub fn with_custom_context(mut self, context: Option<&str>) -> Self {
        self.custom_context = context
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);
        self
    }

    /// A seed of zero means "unseeded".
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed.filter(|s| *s != 0);
        self
    }
}

impl Validate for ExcuseRequest {
    fn validate(&self) -> Result<()> {
        validate_range("specificity", self.specificity, 0, MAX_SPECIFICITY)?;
        if let Some(dir) = &self.history_dir {
            validate_path("history_dir", &dir.to_string_lossy())?;
        }
        Ok(())
    }
}

/// One line of a history file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: NaiveDateTime,
    pub text: String,
}

impl HistoryEntry {
    pub fn new(timestamp: NaiveDateTime, text: impl Into<String>) -> Self {
        Self {
            timestamp,
            text: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_choice_accepts_key_and_label() {
        assert_eq!("travel-commute".parse::<Scenario>().unwrap(), Scenario::TravelCommute);
        assert_eq!("Travel/Commute".parse::<Scenario>().unwrap(), Scenario::TravelCommute);
        assert_eq!("LIGHT-HEARTED".parse::<Tone>().unwrap(), Tone::LightHearted);
        assert!("dramatic".parse::<Tone>().is_err());
    }

    #[test]
    fn test_display_uses_label() {
        assert_eq!(Scenario::WorkDeadline.to_string(), "Work Deadline");
        assert_eq!(Tone::LightHearted.to_string(), "Light-hearted");
    }

    #[test]
    fn test_serde_uses_kebab_case() {
        let json = serde_json::to_string(&Scenario::SchoolAssignment).unwrap();
        assert_eq!(json, "\"school-assignment\"");
        let tone: Tone = serde_json::from_str("\"light-hearted\"").unwrap();
        assert_eq!(tone, Tone::LightHearted);
    }

    #[test]
    fn test_deserialize_ignores_case() {
        let tone: Tone = serde_json::from_str("\"Casual\"").unwrap();
        assert_eq!(tone, Tone::Casual);
        let scenario: Scenario = serde_json::from_str("\"WORK-DEADLINE\"").unwrap();
        assert_eq!(scenario, Scenario::WorkDeadline);
        assert!(serde_json::from_str::<Length>("\"tiny\"").is_err());
    }

    #[test]
    fn test_request_defaults() {
        let request = ExcuseRequest::default();
        assert_eq!(request.scenario, Scenario::WorkDeadline);
        assert_eq!(request.audience, Audience::Manager);
        assert_eq!(request.tone, Tone::Professional);
        assert_eq!(request.specificity, 6);
        assert_eq!(request.length, Length::Medium);
    }

    #[test]
    fn test_zero_seed_is_unseeded() {
        assert_eq!(ExcuseRequest::default().with_seed(Some(0)).seed, None);
        assert_eq!(ExcuseRequest::default().with_seed(Some(7)).seed, Some(7));
    }

    #[test]
    fn test_blank_context_is_dropped() {
        let request = ExcuseRequest::default().with_custom_context(Some("   "));
        assert_eq!(request.custom_context, None);
        let request = ExcuseRequest::default().with_custom_context(Some("  Q3 report "));
        assert_eq!(request.custom_context.as_deref(), Some("Q3 report"));
    }

    #[test]
    fn test_request_validation_rejects_out_of_range_specificity() {
        let mut request = ExcuseRequest::default();
        assert!(request.validate().is_ok());
        request.specificity = 11;
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_history_entry_json_shape() {
        let ts = chrono::NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        let entry = HistoryEntry::new(ts, "Running late.");
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["text"], "Running late.");
        assert_eq!(value["timestamp"], "2024-05-01T09:30:00");
    }
}
