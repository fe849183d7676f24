use std::sync::LazyLock;

use fancy_regex::Regex as PatternRegex;
use regex::Regex;
use tracing::{trace, warn};
use url::Url;

use super::controller::{FieldSnapshot, FormController, FormResult, read_lock, write_lock};
use super::field::{FieldConstraints, FieldHandle, FieldKey, FieldKind, FieldValidity};
use crate::i18n::I18nManager;

static EMAIL_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email shape pattern must compile")
});

/// A field-level constraint failure. The `Display` text is the default
/// English message; `message` resolves it through the active catalog.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ConstraintViolation {
    #[error("This field is required")]
    Required,
    #[error("Please enter a valid email address")]
    InvalidEmail,
    #[error("Please enter a valid URL")]
    InvalidUrl,
    #[error("Minimum {min} characters required")]
    TooShort { min: usize },
    #[error("Maximum {max} characters allowed")]
    TooLong { max: usize },
    #[error("{}", .title.as_deref().unwrap_or("Invalid format"))]
    PatternMismatch { title: Option<String> },
}

impl ConstraintViolation {
    pub fn message(&self, i18n: &I18nManager) -> String {
        match self {
            Self::Required => i18n.t("form.required"),
            Self::InvalidEmail => i18n.t("form.email"),
            Self::InvalidUrl => i18n.t("form.url"),
            Self::TooShort { min } => i18n.t_with("form.min_length", &[("min", &min.to_string())]),
            Self::TooLong { max } => i18n.t_with("form.max_length", &[("max", &max.to_string())]),
            Self::PatternMismatch { title: Some(title) } => title.clone(),
            Self::PatternMismatch { title: None } => i18n.t("form.pattern"),
        }
    }
}

/// Checks one value against declared constraints, stopping at the first
/// failure. `pattern` is the compiled form of `constraints.pattern`; it may use
/// lookaround, as browser `pattern` attributes do.
pub fn check_constraints(
    constraints: &FieldConstraints,
    pattern: Option<&PatternRegex>,
    raw: &str,
) -> Result<(), ConstraintViolation> {
    let value = raw.trim();

    if constraints.required && value.is_empty() {
        return Err(ConstraintViolation::Required);
    }

    if !value.is_empty() {
        match constraints.kind {
            FieldKind::Email if !EMAIL_SHAPE.is_match(value) => {
                return Err(ConstraintViolation::InvalidEmail);
            }
            FieldKind::Url if Url::parse(value).is_err() => {
                return Err(ConstraintViolation::InvalidUrl);
            }
            _ => {}
        }
    }

    let length = value.chars().count();
    if let Some(min) = constraints.min_length {
        if length < min {
            return Err(ConstraintViolation::TooShort { min });
        }
    }
    if let Some(max) = constraints.max_length {
        if length > max {
            return Err(ConstraintViolation::TooLong { max });
        }
    }

    if let Some(pattern) = pattern {
        let matched = pattern.is_match(value).unwrap_or_else(|error| {
            warn!(%error, "pattern evaluation aborted, treating value as a mismatch");
            false
        });
        if !matched {
            return Err(ConstraintViolation::PatternMismatch {
                title: constraints.title.clone(),
            });
        }
    }

    Ok(())
}

impl FieldHandle {
    pub(super) fn check(&self) -> Result<(), ConstraintViolation> {
        check_constraints(self.constraints(), self.pattern.as_ref(), &self.value)
    }

    pub(super) fn revalidate(&mut self) -> bool {
        self.validity = match self.check() {
            Ok(()) => FieldValidity::Valid,
            Err(violation) => FieldValidity::Invalid(violation),
        };
        !self.validity.is_invalid()
    }
}

impl FormController {
    /// Validates a single field and records the outcome as its annotation.
    /// Other fields are left untouched.
    pub fn validate_field(&self, key: &FieldKey) -> FormResult<bool> {
        let mut state = write_lock(&self.state, "validating field")?;
        let field = state.field_mut(key)?;
        let valid = field.revalidate();
        trace!(field = %key, valid, "field validated");
        Ok(valid)
    }

    /// Validates every field outside the honeypot container, annotating each.
    pub fn validate_all(&self) -> FormResult<bool> {
        let mut state = write_lock(&self.state, "validating all fields")?;
        let mut all_valid = true;
        for field in state.fields.iter_mut().filter(|field| !field.is_honeypot()) {
            if !field.revalidate() {
                all_valid = false;
            }
        }
        Ok(all_valid)
    }

    /// Evaluates validity against the current values without touching any
    /// annotation. Never cached.
    pub fn is_valid(&self) -> FormResult<bool> {
        Ok(read_lock(&self.state, "computing form validity")?
            .fields
            .iter()
            .filter(|field| !field.is_honeypot())
            .all(|field| field.check().is_ok()))
    }

    pub fn invalid_fields(&self) -> FormResult<Vec<FieldKey>> {
        Ok(self
            .snapshot()?
            .fields
            .into_iter()
            .filter(|field: &FieldSnapshot| field.validity.is_invalid())
            .map(|field| field.key)
            .collect())
    }

    /// Localized text of the field's current annotation, if any.
    pub fn field_error_message(&self, key: &FieldKey) -> FormResult<Option<String>> {
        let state = read_lock(&self.state, "reading field error message")?;
        Ok(state
            .field(key)?
            .validity()
            .violation()
            .map(|violation| violation.message(&self.i18n)))
    }
}
