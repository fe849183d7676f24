use std::fmt::{Display, Formatter};

use fancy_regex::Regex;

use super::controller::{FormError, FormResult};
use super::schema::FieldSpec;
use super::validation::ConstraintViolation;

#[derive(Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct FieldKey(String);

impl FieldKey {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for FieldKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FieldKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for FieldKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Declared control type, as carried by the `type` attribute or the tag name.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum FieldKind {
    #[default]
    Text,
    Email,
    Url,
    Tel,
    Password,
    Number,
    Search,
    Hidden,
    File,
    Checkbox,
    Textarea,
    Select,
}

impl FieldKind {
    /// Maps an `<input type>` value. Unknown types behave like text inputs.
    pub fn from_type_attr(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "email" => Self::Email,
            "url" => Self::Url,
            "tel" => Self::Tel,
            "password" => Self::Password,
            "number" => Self::Number,
            "search" => Self::Search,
            "hidden" => Self::Hidden,
            "file" => Self::File,
            "checkbox" => Self::Checkbox,
            "textarea" => Self::Textarea,
            "select" => Self::Select,
            _ => Self::Text,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Email => "email",
            Self::Url => "url",
            Self::Tel => "tel",
            Self::Password => "password",
            Self::Number => "number",
            Self::Search => "search",
            Self::Hidden => "hidden",
            Self::File => "file",
            Self::Checkbox => "checkbox",
            Self::Textarea => "textarea",
            Self::Select => "select",
        }
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FieldConstraints {
    pub kind: FieldKind,
    pub required: bool,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<String>,
    pub title: Option<String>,
}

/// Result of the most recent validation pass of one field.
///
/// `Invalid` carries the single error annotation a field may show.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum FieldValidity {
    #[default]
    Unchecked,
    Valid,
    Invalid(ConstraintViolation),
}

impl FieldValidity {
    pub fn violation(&self) -> Option<&ConstraintViolation> {
        match self {
            Self::Invalid(violation) => Some(violation),
            Self::Unchecked | Self::Valid => None,
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid(_))
    }
}

/// Live state of one attached field.
#[derive(Clone, Debug)]
pub struct FieldHandle {
    pub(super) spec: FieldSpec,
    pub(super) pattern: Option<Regex>,
    pub(super) value: String,
    pub(super) disabled: bool,
    pub(super) validity: FieldValidity,
}

impl FieldHandle {
    pub(super) fn attach(spec: FieldSpec) -> FormResult<Self> {
        let pattern = match spec.constraints.pattern.as_deref() {
            Some(source) => {
                Some(
                    Regex::new(source).map_err(|error| FormError::InvalidPattern {
                        field: spec.key.clone(),
                        message: error.to_string(),
                    })?,
                )
            }
            None => None,
        };
        Ok(Self {
            value: spec.initial.clone(),
            spec,
            pattern,
            disabled: false,
            validity: FieldValidity::Unchecked,
        })
    }

    pub fn key(&self) -> &FieldKey {
        &self.spec.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn constraints(&self) -> &FieldConstraints {
        &self.spec.constraints
    }

    pub fn is_honeypot(&self) -> bool {
        self.spec.honeypot
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn validity(&self) -> &FieldValidity {
        &self.validity
    }

    pub(super) fn reset(&mut self) {
        self.value = self.spec.initial.clone();
        self.validity = FieldValidity::Unchecked;
    }

    pub(super) fn clear_error(&mut self) {
        if self.validity.is_invalid() {
            self.validity = FieldValidity::Unchecked;
        }
    }
}
