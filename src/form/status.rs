use super::controller::SubmitState;
use crate::i18n::I18nManager;

/// How the most recent submit attempt ended, when it got past the spam guard.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SettledOutcome {
    Blocked,
    Delivered,
    Failed,
}

/// The single status banner of a form.
///
/// Never stored: always derived from the submit state and the last settled
/// outcome, so text and style cannot drift from the state machine.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StatusBanner {
    Hidden,
    Sending,
    Blocked,
    Delivered,
    Failed,
}

impl StatusBanner {
    pub fn derive(state: SubmitState, last_outcome: Option<SettledOutcome>) -> Self {
        match state {
            SubmitState::Validating | SubmitState::Submitting => Self::Sending,
            SubmitState::Succeeded => Self::Delivered,
            SubmitState::Failed => Self::Failed,
            SubmitState::Idle => match last_outcome {
                None => Self::Hidden,
                Some(SettledOutcome::Blocked) => Self::Blocked,
                Some(SettledOutcome::Delivered) => Self::Delivered,
                Some(SettledOutcome::Failed) => Self::Failed,
            },
        }
    }

    /// Style modifier appended to `form-status`.
    pub const fn kind(self) -> Option<&'static str> {
        match self {
            Self::Hidden => None,
            Self::Sending => Some("loading"),
            Self::Blocked | Self::Failed => Some("error"),
            Self::Delivered => Some("success"),
        }
    }

    pub const fn message_key(self) -> Option<&'static str> {
        match self {
            Self::Hidden => None,
            Self::Sending => Some("form.status.sending"),
            Self::Blocked => Some("form.status.blocked"),
            Self::Delivered => Some("form.status.delivered"),
            Self::Failed => Some("form.status.failed"),
        }
    }

    pub fn message(self, i18n: &I18nManager) -> Option<String> {
        self.message_key().map(|key| i18n.t(key))
    }

    pub const fn is_visible(self) -> bool {
        !matches!(self, Self::Hidden)
    }
}
