//! Client-side validation of content drafts.
//!
//! Validation runs before any remote call. Every failing rule is collected;
//! callers usually show only [`ValidationErrors::first`].

use std::fmt;

use url::Url;

/// Maximum length of a title field, in characters.
pub const MAX_TITLE_CHARS: usize = 200;
/// Maximum length of a description field, in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 1000;
/// Inclusive range of a manual sort position.
pub const SORT_ORDER_RANGE: (i64, i64) = (0, 999);

/// The rule a field broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Required,
    TooLong { max: usize },
    InvalidUrl,
    OutOfRange { min: i64, max: i64 },
}

impl Rule {
    /// Translation key of the rule's message.
    #[must_use]
    pub const fn message_key(self) -> &'static str {
        match self {
            Self::Required => "validation.required",
            Self::TooLong { .. } => "validation.too_long",
            Self::InvalidUrl => "validation.invalid_url",
            Self::OutOfRange { .. } => "validation.out_of_range",
        }
    }
}

/// One failed rule on one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub field: &'static str,
    pub rule: Rule,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.rule {
            Rule::Required => write!(f, "{} is required", self.field),
            Rule::TooLong { max } => {
                write!(f, "{} must be at most {max} characters", self.field)
            }
            Rule::InvalidUrl => write!(f, "{} must be a valid URL", self.field),
            Rule::OutOfRange { min, max } => {
                write!(f, "{} must be between {min} and {max}", self.field)
            }
        }
    }
}

/// Non-empty list of failed rules, in field order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(Vec<ValidationIssue>);

impl ValidationErrors {
    /// The issue to surface prominently.
    #[must_use]
    #[allow(clippy::indexing_slicing)]
    pub fn first(&self) -> &ValidationIssue {
        // Constructed only by `Checks::finish` with at least one issue.
        &self.0[0]
    }

    #[must_use]
    pub fn issues(&self) -> &[ValidationIssue] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether any issue concerns `field`.
    #[must_use]
    pub fn has(&self, field: &str) -> bool {
        self.0.iter().any(|issue| issue.field == field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.first())?;
        if self.0.len() > 1 {
            write!(f, " (and {} more)", self.0.len() - 1)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// A write payload that can be checked before it is sent.
pub trait Validate {
    /// # Errors
    ///
    /// Returns every broken rule when the value is not acceptable.
    fn validate(&self) -> Result<(), ValidationErrors>;
}

/// Accumulates issues field by field.
#[derive(Debug, Default)]
pub(crate) struct Checks(Vec<ValidationIssue>);

fn is_blank(value: Option<&String>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

impl Checks {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, field: &'static str, rule: Rule) {
        self.0.push(ValidationIssue { field, rule });
    }

    /// Present and not just whitespace.
    pub(crate) fn required(&mut self, field: &'static str, value: Option<&String>) -> &mut Self {
        if is_blank(value) {
            self.push(field, Rule::Required);
        }
        self
    }

    /// Trimmed length in characters does not exceed `max`.
    pub(crate) fn max_chars(
        &mut self,
        field: &'static str,
        value: Option<&String>,
        max: usize,
    ) -> &mut Self {
        if value.is_some_and(|v| v.trim().chars().count() > max) {
            self.push(field, Rule::TooLong { max });
        }
        self
    }

    /// Required title within the title length limit.
    pub(crate) fn title(&mut self, field: &'static str, value: Option<&String>) -> &mut Self {
        self.required(field, value)
            .max_chars(field, value, MAX_TITLE_CHARS)
    }

    /// Length-limited description; `required` controls presence.
    pub(crate) fn description(
        &mut self,
        field: &'static str,
        value: Option<&String>,
        required: bool,
    ) -> &mut Self {
        if required {
            self.required(field, value);
        }
        self.max_chars(field, value, MAX_DESCRIPTION_CHARS)
    }

    /// Blank is fine; anything else must be an absolute URL.
    pub(crate) fn url(&mut self, field: &'static str, value: Option<&String>) -> &mut Self {
        if let Some(v) = value.map(|v| v.trim()).filter(|v| !v.is_empty())
            && Url::parse(v).is_err()
        {
            self.push(field, Rule::InvalidUrl);
        }
        self
    }

    pub(crate) fn range(
        &mut self,
        field: &'static str,
        value: Option<i64>,
        (min, max): (i64, i64),
    ) -> &mut Self {
        if value.is_some_and(|v| v < min || v > max) {
            self.push(field, Rule::OutOfRange { min, max });
        }
        self
    }

    pub(crate) fn sort_order(&mut self, value: Option<i32>) -> &mut Self {
        self.range("sort_order", value.map(i64::from), SORT_ORDER_RANGE)
    }

    pub(crate) fn finish(&mut self) -> Result<(), ValidationErrors> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(std::mem::take(&mut self.0)))
        }
    }
}
