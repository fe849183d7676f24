use crate::form::FieldConstraints;

pub const DEFAULT_COUNTER_LIMIT: usize = 500;

/// Remaining-characters readout bound to one multi-line field. Purely
/// informational; it never blocks input or validation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CharacterCounter {
    max_length: usize,
    length: usize,
}

impl CharacterCounter {
    pub fn new(max_length: usize) -> Self {
        Self {
            max_length,
            length: 0,
        }
    }

    /// Uses the field's `maxlength`, falling back to [`DEFAULT_COUNTER_LIMIT`].
    pub fn for_field(constraints: &FieldConstraints) -> Self {
        Self::new(constraints.max_length.unwrap_or(DEFAULT_COUNTER_LIMIT))
    }

    pub fn update(&mut self, value: &str) {
        self.length = value.chars().count();
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    pub fn remaining(&self) -> isize {
        self.max_length as isize - self.length as isize
    }

    pub fn limit_reached(&self) -> bool {
        self.remaining() <= 0
    }

    pub fn label(&self) -> String {
        format!("{} / {}", self.length, self.max_length)
    }
}
