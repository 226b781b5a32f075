use crate::core::context;
use crate::core::templates::{self, TemplateCatalog};
use crate::domain::model::{ExcuseRequest, Length};
use crate::domain::ports::Clock;
use crate::utils::error::Result;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::sync::Arc;

const SHORT_LIMIT_CHARS: usize = 140;

const LONG_ADDONS: &[&str] = &[
    " Thank you for your patience.",
    " I appreciate your understanding and will keep you informed.",
    " Please let me know if a different time works better.",
];

/// Turns an [`ExcuseRequest`] into text.
///
/// Unseeded generators draw from OS entropy once and keep their state across
/// calls. A seeded request reseeds before each call, so the same seed, request
/// and clock always give the same excuse.
pub struct ExcuseGenerator {
    catalog: TemplateCatalog,
    clock: Arc<dyn Clock>,
    rng: StdRng,
}

impl ExcuseGenerator {
    pub fn new(catalog: TemplateCatalog, clock: Arc<dyn Clock>) -> Self {
        Self {
            catalog,
            clock,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn generate(&mut self, request: &ExcuseRequest) -> Result<String> {
        if let Some(seed) = request.seed {
            self.rng = StdRng::seed_from_u64(seed);
        }
        self.compose(request)
    }

    /// Re-rolls the template with the request's knobs.
    ///
    /// `base_text` does not influence the result; a seeded request uses `seed + 1`
    /// so the rephrasing differs from what `generate` produced.
    pub fn rephrase(&mut self, request: &ExcuseRequest, base_text: &str) -> Result<String> {
        tracing::debug!("Rephrasing: {}", base_text);
        if let Some(seed) = request.seed {
            self.rng = StdRng::seed_from_u64(seed.wrapping_add(1));
        }
        self.compose(request)
    }

    fn compose(&mut self, request: &ExcuseRequest) -> Result<String> {
        let template = self
            .catalog
            .choose(request.scenario, request.tone, &mut self.rng)?
            .to_string();
        let slots = context::build(request, self.clock.now());

        let text = match templates::render(&template, &slots)? {
            Some(text) => text,
            None => {
                tracing::warn!("Template has an unfilled slot, using it verbatim: {}", template);
                template
            }
        };

        Ok(self.vary(text, request.length))
    }

    fn vary(&mut self, text: String, length: Length) -> String {
        let text = match length {
            Length::Short if text.chars().count() > SHORT_LIMIT_CHARS => {
                let first = text.split(". ").next().unwrap_or(&text);
                format!("{}.", first)
            }
            Length::Long => match LONG_ADDONS.choose(&mut self.rng) {
                Some(addon) => format!("{}{}", text, addon),
                None => text,
            },
            _ => text,
        };
        text.trim().to_string()
    }
}
