use crate::domain::model::{Scenario, Tone};
use crate::utils::error::{ExcuseError, Result};
use crate::utils::validation::validate_non_empty_string;
use rand::seq::SliceRandom;
use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::LazyLock;

/// Slot names a template may reference as `{name}`.
pub const SLOTS: &[&str] = &[
    "action",
    "deliverable",
    "event",
    "timeframe",
    "new_time",
    "notes",
    "audience",
    "scenario",
];

const SLOT_PATTERN: &str = r"\{([A-Za-z_][A-Za-z0-9_]*)\}";

/// A user-supplied template, usually from the `[[templates]]` table of the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraTemplate {
    pub scenario: Scenario,
    pub tone: Tone,
    pub text: String,
}

#[derive(Debug, Clone)]
struct ScenarioTemplates {
    scenario: Scenario,
    // Insertion order matters: the first tone is the fallback.
    tones: Vec<(Tone, Vec<String>)>,
}

impl ScenarioTemplates {
    fn new(scenario: Scenario, tones: Vec<(Tone, Vec<&str>)>) -> Self {
        Self {
            scenario,
            tones: tones
                .into_iter()
                .map(|(tone, texts)| (tone, texts.into_iter().map(str::to_string).collect()))
                .collect(),
        }
    }

    fn templates_for(&self, tone: Tone) -> Option<&[String]> {
        self.tones
            .iter()
            .find(|(t, _)| *t == tone)
            .map(|(_, texts)| texts.as_slice())
    }
}

/// Scenario -> tone -> templates.
#[derive(Debug, Clone)]
pub struct TemplateCatalog {
    scenarios: Vec<ScenarioTemplates>,
}

impl Default for TemplateCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TemplateCatalog {
    pub fn builtin() -> Self {
        use Tone::*;

        let scenarios = vec![
            ScenarioTemplates::new(
                Scenario::General,
                vec![
                    (
                        Professional,
                        vec![
                            "Sorry for the short notice. Something unexpected came up, so I can't {action} by {timeframe}. I'll share a simple plan and new time.",
                            "Apologies—an issue popped up and needs my attention. I'll update on {deliverable} by {new_time}.",
                        ],
                    ),
                    (
                        Casual,
                        vec![
                            "Sorry—something came up, so I can't {action} today. Can we do {new_time}?",
                            "Hey, quick heads-up: I'm tied up last minute. Can we move {action} to {new_time}?",
                        ],
                    ),
                    (
                        Sincere,
                        vec!["Thanks for understanding. A personal thing came up, so I can't {action} as planned. I'll follow up by {new_time}."],
                    ),
                    (
                        Brief,
                        vec!["Sorry—unexpected issue. Can't {action} by {timeframe}. Update by {new_time}."],
                    ),
                    (
                        LightHearted,
                        vec!["Looks like I double-booked myself. Can we move {action} to {new_time}?"],
                    ),
                ],
            ),
            ScenarioTemplates::new(
                Scenario::WorkDeadline,
                vec![
                    (
                        Professional,
                        vec!["I hit a blocker on {deliverable}. I won't make today's deadline. I'll send a simple plan and new ETA by {new_time}."],
                    ),
                    (
                        Sincere,
                        vec!["I'm sorry—something urgent slowed down {deliverable}. I'll focus on it and share a new time by {new_time}."],
                    ),
                    (
                        Brief,
                        vec!["Delay on {deliverable} due to a blocker. New ETA {new_time}."],
                    ),
                ],
            ),
            ScenarioTemplates::new(
                Scenario::SchoolAssignment,
                vec![
                    (
                        Professional,
                        vec!["I ran into an issue and need a short extension for {deliverable}. I can submit by {new_time} if that's okay."],
                    ),
                    (
                        Sincere,
                        vec!["A personal situation came up and I couldn't finish {deliverable}. May I submit by {new_time}?"],
                    ),
                ],
            ),
            ScenarioTemplates::new(
                Scenario::SocialEvent,
                vec![
                    (
                        Casual,
                        vec!["I'm really sorry—I can't make it to {event} tonight. Can we catch up this weekend?"],
                    ),
                    (
                        LightHearted,
                        vec!["My day did a plot twist. I have to miss {event}. Rain check for {new_time}?"],
                    ),
                ],
            ),
            ScenarioTemplates::new(
                Scenario::Appointment,
                vec![(
                    Professional,
                    vec!["I need to reschedule today's appointment due to a conflict. Could we move it to {new_time}?"],
                )],
            ),
            ScenarioTemplates::new(
                Scenario::TravelCommute,
                vec![
                    (
                        Professional,
                        vec!["Travel delays are slowing me down. I should be there by {new_time}. Sorry for the hassle."],
                    ),
                    (Brief, vec!["Running late due to traffic. ETA {new_time}."]),
                ],
            ),
        ];

        Self { scenarios }
    }

    /// Appends extra templates after validating their slots.
    ///
    /// A tone the scenario has not seen yet is added after its existing tones,
    /// so the fallback tone of built-in scenarios never changes.
    pub fn extend(&mut self, extra: &[ExtraTemplate]) -> Result<()> {
        for template in extra {
            validate_template(&template.text)?;

            let position = match self
                .scenarios
                .iter()
                .position(|s| s.scenario == template.scenario)
            {
                Some(position) => position,
                None => {
                    self.scenarios.push(ScenarioTemplates {
                        scenario: template.scenario,
                        tones: Vec::new(),
                    });
                    self.scenarios.len() - 1
                }
            };
            let entry = &mut self.scenarios[position];

            match entry.tones.iter_mut().find(|(t, _)| *t == template.tone) {
                Some((_, texts)) => texts.push(template.text.clone()),
                None => entry
                    .tones
                    .push((template.tone, vec![template.text.clone()])),
            }

            tracing::debug!(
                "Added template for {} / {}",
                template.scenario,
                template.tone
            );
        }
        Ok(())
    }

    /// Picks a template for the scenario and tone.
    ///
    /// Unknown scenarios fall back to `General`; a tone missing from the
    /// scenario falls back to that scenario's first tone.
    pub fn choose<R: Rng + ?Sized>(&self, scenario: Scenario, tone: Tone, rng: &mut R) -> Result<&str> {
        let entry = self
            .scenario(scenario)
            .or_else(|| self.scenario(Scenario::General))
            .ok_or_else(|| ExcuseError::TemplateError {
                message: format!("No templates for '{}' and no General fallback", scenario),
            })?;

        let templates = match entry.templates_for(tone) {
            Some(templates) => templates,
            None => {
                let (fallback, templates) =
                    entry.tones.first().ok_or_else(|| ExcuseError::TemplateError {
                        message: format!("Scenario '{}' has no templates", entry.scenario),
                    })?;
                tracing::debug!(
                    "No '{}' templates for {}, using '{}'",
                    tone,
                    entry.scenario,
                    fallback
                );
                templates.as_slice()
            }
        };

        templates
            .choose(rng)
            .map(String::as_str)
            .ok_or_else(|| ExcuseError::TemplateError {
                message: format!("Scenario '{}' has an empty template list", entry.scenario),
            })
    }

    /// Number of templates for a scenario/tone pair, without fallback.
    pub fn count(&self, scenario: Scenario, tone: Tone) -> usize {
        self.scenario(scenario)
            .and_then(|s| s.templates_for(tone))
            .map_or(0, <[String]>::len)
    }

    /// Tones with their own templates under a scenario, in fallback order.
    pub fn tones(&self, scenario: Scenario) -> Vec<Tone> {
        self.scenario(scenario)
            .map(|s| s.tones.iter().map(|(t, _)| *t).collect())
            .unwrap_or_default()
    }

    fn scenario(&self, scenario: Scenario) -> Option<&ScenarioTemplates> {
        self.scenarios.iter().find(|s| s.scenario == scenario)
    }
}

static SLOT_RE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(SLOT_PATTERN).ok());

fn slot_regex() -> Result<&'static Regex> {
    SLOT_RE.as_ref().ok_or_else(|| ExcuseError::TemplateError {
        message: format!("Invalid slot pattern: {}", SLOT_PATTERN),
    })
}

/// Slot names referenced by a template, in order of appearance.
pub fn placeholders(template: &str) -> Result<Vec<String>> {
    let re = slot_regex()?;
    Ok(re
        .captures_iter(template)
        .map(|caps| caps[1].to_string())
        .collect())
}

pub fn validate_template(template: &str) -> Result<()> {
    validate_non_empty_string("templates.text", template)?;

    for name in placeholders(template)? {
        if !SLOTS.contains(&name.as_str()) {
            return Err(ExcuseError::TemplateError {
                message: format!("Unknown slot '{{{}}}' in template: {}", name, template),
            });
        }
    }
    Ok(())
}

/// Fills every `{slot}` from `context`.
///
/// Returns `None` when the template references a slot the context lacks.
pub fn render(template: &str, context: &HashMap<&'static str, String>) -> Result<Option<String>> {
    let re = slot_regex()?;

    if let Some(missing) = re
        .captures_iter(template)
        .map(|caps| caps[1].to_string())
        .find(|name| !context.contains_key(name.as_str()))
    {
        tracing::debug!("Slot '{}' has no value", missing);
        return Ok(None);
    }

    let rendered = re.replace_all(template, |caps: &regex::Captures| {
        context
            .get(&caps[1])
            .cloned()
            .unwrap_or_else(|| caps[0].to_string())
    });
    Ok(Some(rendered.into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_builtin_covers_every_scenario() {
        let catalog = TemplateCatalog::builtin();
        assert_eq!(catalog.tones(Scenario::General).len(), 5);
        assert_eq!(
            catalog.tones(Scenario::WorkDeadline),
            vec![Tone::Professional, Tone::Sincere, Tone::Brief]
        );
        assert_eq!(catalog.count(Scenario::General, Tone::Casual), 2);
        assert_eq!(catalog.count(Scenario::Appointment, Tone::Casual), 0);
    }

    #[test]
    fn test_choose_falls_back_to_first_tone() {
        let catalog = TemplateCatalog::builtin();
        let mut rng = StdRng::seed_from_u64(1);
        let chosen = catalog
            .choose(Scenario::SocialEvent, Tone::Professional, &mut rng)
            .unwrap();
        assert_eq!(
            chosen,
            "I'm really sorry—I can't make it to {event} tonight. Can we catch up this weekend?"
        );
    }

    #[test]
    fn test_choose_single_template() {
        let catalog = TemplateCatalog::builtin();
        let mut rng = StdRng::seed_from_u64(1);
        let chosen = catalog
            .choose(Scenario::TravelCommute, Tone::Brief, &mut rng)
            .unwrap();
        assert_eq!(chosen, "Running late due to traffic. ETA {new_time}.");
    }

    #[test]
    fn test_choose_is_deterministic_for_a_seed() {
        let catalog = TemplateCatalog::builtin();
        let a = catalog
            .choose(Scenario::General, Tone::Professional, &mut StdRng::seed_from_u64(42))
            .unwrap()
            .to_string();
        let b = catalog
            .choose(Scenario::General, Tone::Professional, &mut StdRng::seed_from_u64(42))
            .unwrap()
            .to_string();
        assert_eq!(a, b);
    }

    #[test]
    fn test_extend_appends_new_tone_after_existing() {
        let mut catalog = TemplateCatalog::builtin();
        catalog
            .extend(&[ExtraTemplate {
                scenario: Scenario::Appointment,
                tone: Tone::Casual,
                text: "Can we push {event} to {new_time}?".to_string(),
            }])
            .unwrap();

        assert_eq!(
            catalog.tones(Scenario::Appointment),
            vec![Tone::Professional, Tone::Casual]
        );
        let mut rng = StdRng::seed_from_u64(3);
        let chosen = catalog
            .choose(Scenario::Appointment, Tone::Casual, &mut rng)
            .unwrap();
        assert_eq!(chosen, "Can we push {event} to {new_time}?");
    }

    #[test]
    fn test_extend_rejects_unknown_slot() {
        let mut catalog = TemplateCatalog::builtin();
        let err = catalog
            .extend(&[ExtraTemplate {
                scenario: Scenario::General,
                tone: Tone::Brief,
                text: "Blame {weather}.".to_string(),
            }])
            .unwrap_err();
        assert!(matches!(err, ExcuseError::TemplateError { .. }));
        assert_eq!(catalog.count(Scenario::General, Tone::Brief), 1);
    }

    #[test]
    fn test_render_fills_slots() {
        let mut context = HashMap::new();
        context.insert("deliverable", "the slides".to_string());
        context.insert("new_time", "tomorrow".to_string());

        let out = render("Delay on {deliverable}. New ETA {new_time}.", &context)
            .unwrap()
            .unwrap();
        assert_eq!(out, "Delay on the slides. New ETA tomorrow.");
    }

    #[test]
    fn test_render_missing_slot_returns_none() {
        let context = HashMap::new();
        assert_eq!(render("See you at {event}.", &context).unwrap(), None);
        assert_eq!(
            render("No slots here.", &context).unwrap().as_deref(),
            Some("No slots here.")
        );
    }

    #[test]
    fn test_placeholders_in_order() {
        let names = placeholders("{action} by {timeframe}, then {new_time}").unwrap();
        assert_eq!(names, vec!["action", "timeframe", "new_time"]);
    }

    #[test]
    fn test_slot_regex_is_compiled_once() {
        let first = slot_regex().unwrap();
        let second = slot_regex().unwrap();
        assert!(std::ptr::eq(first, second));
    }
}
