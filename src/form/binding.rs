use std::sync::PoisonError;

use tracing::{debug, info, trace, warn};

use super::controller::{
    FormController, FormError, FormResult, SubmitState, ValidationMode, read_lock,
    transition_submit_state, write_lock,
};
use super::field::FieldKey;
use super::status::SettledOutcome;
use super::transport::{Payload, SubmissionTransport, TransportError};

/// Field-level DOM events the controller listens to.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FieldEvent {
    Blur(FieldKey),
    Input(FieldKey, String),
}

/// What a submit attempt amounted to.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SubmitOutcome {
    /// The honeypot was filled in; nothing was sent and nothing is shown.
    Discarded,
    /// At least one field failed validation; the transport was not called.
    Blocked { invalid: Vec<FieldKey> },
    Delivered,
    Failed(TransportError),
}

impl FormController {
    pub fn handle_event(&self, event: FieldEvent) -> FormResult<()> {
        match event {
            FieldEvent::Blur(key) => self.blur(&key).map(drop),
            FieldEvent::Input(key, value) => self.input(&key, value),
        }
    }

    /// Field lost focus. Validates it when the form validates on blur.
    ///
    /// Returns whether the field is currently free of annotations.
    pub fn blur(&self, key: &FieldKey) -> FormResult<bool> {
        {
            let state = read_lock(&self.state, "handling blur")?;
            let field = state.field(key)?;
            if field.is_disabled() {
                trace!(field = %key, "ignoring blur on disabled field");
                return Ok(!field.validity().is_invalid());
            }
        }
        if self.options.validate_mode == ValidationMode::OnBlur {
            return self.validate_field(key);
        }
        let state = read_lock(&self.state, "reading blur result")?;
        Ok(!state.field(key)?.validity().is_invalid())
    }

    /// The user edited a field: store the value and drop that field's
    /// annotation only.
    pub fn input(&self, key: &FieldKey, value: impl Into<String>) -> FormResult<()> {
        {
            let mut state = write_lock(&self.state, "handling input")?;
            let field = state.field_mut(key)?;
            if field.is_disabled() {
                trace!(field = %key, "ignoring input on disabled field");
                return Ok(());
            }
            field.value = value.into();
            field.clear_error();
        }
        if self.options.validate_mode == ValidationMode::OnChange {
            let _ = self.validate_field(key)?;
        }
        Ok(())
    }

    /// Runs the full submit contract against `transport`.
    ///
    /// User-facing results are reported through [`SubmitOutcome`]; `Err` is
    /// reserved for misuse such as submitting while a submission is in flight.
    pub async fn submit<T>(&self, transport: &T) -> FormResult<SubmitOutcome>
    where
        T: SubmissionTransport,
    {
        let payload = {
            let mut state = write_lock(&self.state, "preparing submit")?;
            if state.submit_state != SubmitState::Idle {
                return Err(FormError::AlreadySubmitting);
            }

            if state
                .fields
                .iter()
                .any(|field| field.is_honeypot() && !field.value().is_empty())
            {
                debug!(form = state.id.0, "honeypot filled in, discarding submission");
                return Ok(SubmitOutcome::Discarded);
            }

            transition_submit_state(&mut state, SubmitState::Validating)?;
            state.submit_count = state.submit_count.saturating_add(1);

            let mut invalid = Vec::new();
            for field in state.fields.iter_mut().filter(|field| !field.is_honeypot()) {
                if !field.revalidate() {
                    invalid.push(field.key().clone());
                }
            }
            if !invalid.is_empty() {
                state.last_outcome = Some(SettledOutcome::Blocked);
                transition_submit_state(&mut state, SubmitState::Idle)?;
                debug!(form = state.id.0, invalid = invalid.len(), "submission blocked");
                return Ok(SubmitOutcome::Blocked { invalid });
            }

            let payload = state
                .fields
                .iter()
                .filter(|field| !field.is_honeypot())
                .map(|field| (field.key().to_string(), field.value().to_string()))
                .collect::<Payload>();

            transition_submit_state(&mut state, SubmitState::Submitting)?;
            state.set_interactive(false, &self.i18n.t("form.sending"));
            payload
        };

        let mut in_flight = InFlight {
            controller: self,
            settled: false,
        };
        let result = transport.submit(payload).await;

        let mut state = write_lock(&self.state, "completing submit")?;
        let outcome = match result {
            Ok(()) => {
                transition_submit_state(&mut state, SubmitState::Succeeded)?;
                state.last_outcome = Some(SettledOutcome::Delivered);
                if self.options.reset_on_success {
                    for field in &mut state.fields {
                        field.reset();
                    }
                }
                info!(form = state.id.0, "form submission delivered");
                SubmitOutcome::Delivered
            }
            Err(error) => {
                transition_submit_state(&mut state, SubmitState::Failed)?;
                state.last_outcome = Some(SettledOutcome::Failed);
                warn!(form = state.id.0, %error, "form submission failed");
                SubmitOutcome::Failed(error)
            }
        };
        state.set_interactive(true, "");
        transition_submit_state(&mut state, SubmitState::Idle)?;
        in_flight.settled = true;
        Ok(outcome)
    }
}

/// Held across the transport call. If the submit future is dropped or bails
/// out before settling, the form is re-enabled and put back to `Idle`.
struct InFlight<'a> {
    controller: &'a FormController,
    settled: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let mut state = self
            .controller
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        warn!(form = state.id.0, "submission abandoned before it settled");
        state.set_interactive(true, "");
        state.submit_state = SubmitState::Idle;
    }
}
