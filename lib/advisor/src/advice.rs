use crate::category::{categorize, IssueCategory};
use liftdoc_core::ScoredResult;
use serde::Serialize;

/// Always the first line of any advice
pub const SAFETY_BANNER: &str =
    "⚠️ **SAFETY FIRST:** Always turn off power before inspection. Wear safety gear.";

/// Returned when no manual passage is relevant
pub const FALLBACK_ADVICE: &str = "⚠️ **SAFETY FIRST:** Always turn off power and wear protective gear.

**General Maintenance Steps:**
1. Perform visual inspection of the affected area
2. Check all safety switches and circuits
3. Consult the physical maintenance manual
4. Contact a certified technician if unsure";

const ESCALATION: &[&str] = &[
    "\n**Call certified technician if:**",
    "- Problem persists after basic checks",
    "- Safety circuit is faulting",
    "- Electrical components are damaged",
];

/// Characters of the top passage quoted in the advice
pub const DEFAULT_EXCERPT_CHARS: usize = 300;

/// Composed advice plus the passages it was built from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Advice {
    pub text: String,
    /// `None` for the fallback advice
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<IssueCategory>,
    pub sources: Vec<ScoredResult>,
}

impl Advice {
    /// True when no manual passage backed the advice
    #[inline]
    pub fn is_fallback(&self) -> bool {
        self.sources.is_empty()
    }
}

/// Template-based advice composer
#[derive(Debug, Clone)]
pub struct Advisor {
    excerpt_chars: usize,
}

impl Default for Advisor {
    fn default() -> Self {
        Self {
            excerpt_chars: DEFAULT_EXCERPT_CHARS,
        }
    }
}

impl Advisor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_excerpt_chars(mut self, chars: usize) -> Self {
        self.excerpt_chars = chars;
        self
    }

    /// Compose advice for `query` from ranked `results`. The results are
    /// returned unchanged as the advice sources.
    pub fn advise(&self, query: &str, results: Vec<ScoredResult>) -> Advice {
        let Some(best) = results.first() else {
            return Advice {
                text: FALLBACK_ADVICE.to_string(),
                category: None,
                sources: results,
            };
        };

        let category = categorize(query);
        let excerpt: String = best.text.chars().take(self.excerpt_chars).collect();

        let mut parts: Vec<String> = Vec::with_capacity(12);
        parts.push(SAFETY_BANNER.to_string());
        parts.push(format!("**From manual:** {}...", excerpt));
        parts.push(format!("\n**For {}, follow these steps:**", category.label()));
        parts.extend(category.steps().iter().map(|s| s.to_string()));
        parts.extend(ESCALATION.iter().map(|s| s.to_string()));

        Advice {
            text: parts.join("\n\n"),
            category: Some(category),
            sources: results,
        }
    }
}
