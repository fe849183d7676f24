use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use super::field::{FieldHandle, FieldKey, FieldValidity};
use super::schema::{FormModel, FormSchema};
use super::status::{SettledOutcome, StatusBanner};
use crate::i18n::I18nManager;

static FORM_ID_ALLOCATOR: AtomicU64 = AtomicU64::new(1);

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct FormId(pub u64);

impl FormId {
    pub fn next() -> Self {
        Self(FORM_ID_ALLOCATOR.fetch_add(1, Ordering::SeqCst))
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SubmitState {
    Idle,
    Validating,
    Submitting,
    Succeeded,
    Failed,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ValidationMode {
    OnChange,
    #[default]
    OnBlur,
    OnSubmit,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FormOptions {
    pub validate_mode: ValidationMode,
    pub reset_on_success: bool,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            validate_mode: ValidationMode::OnBlur,
            reset_on_success: true,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SubmitControl {
    pub label: String,
    pub disabled: bool,
    idle_label: String,
}

impl SubmitControl {
    fn new(label: String) -> Self {
        Self {
            idle_label: label.clone(),
            label,
            disabled: false,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldSnapshot {
    pub key: FieldKey,
    pub value: String,
    pub validity: FieldValidity,
    pub disabled: bool,
    pub honeypot: bool,
}

#[derive(Clone, Debug)]
pub struct FormSnapshot {
    pub id: FormId,
    pub dom_id: Option<String>,
    pub submit_state: SubmitState,
    pub submit_count: u32,
    pub banner: StatusBanner,
    pub submit_control: SubmitControl,
    pub fields: Vec<FieldSnapshot>,
}

impl FormSnapshot {
    pub fn field(&self, key: &FieldKey) -> Option<&FieldSnapshot> {
        self.fields.iter().find(|field| &field.key == key)
    }

    pub fn value(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|field| field.key.as_str() == key)
            .map(|field| field.value.as_str())
    }

    pub fn annotation_count(&self) -> usize {
        self.fields
            .iter()
            .filter(|field| field.validity.is_invalid())
            .count()
    }
}

#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum FormError {
    #[error("form state lock poisoned while {0}")]
    StatePoisoned(&'static str),
    #[error("invalid submit state transition: {from:?} -> {to:?}")]
    InvalidStateTransition { from: SubmitState, to: SubmitState },
    #[error("form submit is already in progress")]
    AlreadySubmitting,
    #[error("form has no field named `{0}`")]
    UnknownField(FieldKey),
    #[error("field `{field}` declares an invalid pattern: {message}")]
    InvalidPattern { field: FieldKey, message: String },
}

pub type FormResult<T> = Result<T, FormError>;

pub(super) struct FormState {
    pub(super) id: FormId,
    pub(super) dom_id: Option<String>,
    pub(super) fields: Vec<FieldHandle>,
    pub(super) submit_state: SubmitState,
    pub(super) submit_count: u32,
    pub(super) last_outcome: Option<SettledOutcome>,
    pub(super) submit_control: SubmitControl,
}

impl FormState {
    pub(super) fn field(&self, key: &FieldKey) -> FormResult<&FieldHandle> {
        self.fields
            .iter()
            .find(|field| field.key() == key)
            .ok_or_else(|| FormError::UnknownField(key.clone()))
    }

    pub(super) fn field_mut(&mut self, key: &FieldKey) -> FormResult<&mut FieldHandle> {
        self.fields
            .iter_mut()
            .find(|field| field.key() == key)
            .ok_or_else(|| FormError::UnknownField(key.clone()))
    }

    pub(super) fn set_interactive(&mut self, interactive: bool, busy_label: &str) {
        for field in &mut self.fields {
            field.disabled = !interactive;
        }
        self.submit_control.disabled = !interactive;
        self.submit_control.label = if interactive {
            self.submit_control.idle_label.clone()
        } else {
            busy_label.to_string()
        };
    }

    pub(super) fn banner(&self) -> StatusBanner {
        StatusBanner::derive(self.submit_state, self.last_outcome)
    }
}

/// Interaction controller for one form: field validity, the submit state
/// machine and the status banner.
///
/// Clones share the same session, so event handlers can each hold one.
#[derive(Clone)]
pub struct FormController {
    pub(super) options: FormOptions,
    pub(super) i18n: I18nManager,
    pub(super) state: Arc<RwLock<FormState>>,
}

impl std::fmt::Debug for FormController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut debug = f.debug_struct("FormController");
        debug.field("options", &self.options);
        if let Ok(state) = self.state.read() {
            debug
                .field("id", &state.id)
                .field("submit_state", &state.submit_state)
                .field("fields", &state.fields.len());
        }
        debug.finish()
    }
}

impl FormController {
    pub fn new(schema: FormSchema, options: FormOptions) -> FormResult<Self> {
        Self::with_i18n(schema, options, I18nManager::new())
    }

    pub fn with_i18n(
        schema: FormSchema,
        options: FormOptions,
        i18n: I18nManager,
    ) -> FormResult<Self> {
        let fields = schema
            .fields
            .into_iter()
            .map(FieldHandle::attach)
            .collect::<FormResult<Vec<_>>>()?;
        let submit_label = schema
            .submit_label
            .unwrap_or_else(|| i18n.t("form.submit"));
        let id = FormId::next();
        debug!(form = id.0, fields = fields.len(), "form controller attached");

        Ok(Self {
            options,
            i18n,
            state: Arc::new(RwLock::new(FormState {
                id,
                dom_id: schema.id,
                fields,
                submit_state: SubmitState::Idle,
                submit_count: 0,
                last_outcome: None,
                submit_control: SubmitControl::new(submit_label),
            })),
        })
    }

    pub fn for_model<M: FormModel>(options: FormOptions) -> FormResult<Self> {
        Self::new(M::schema(), options)
    }

    pub fn form_id(&self) -> FormResult<FormId> {
        Ok(read_lock(&self.state, "reading form id")?.id)
    }

    pub fn options(&self) -> FormOptions {
        self.options
    }

    pub fn i18n(&self) -> &I18nManager {
        &self.i18n
    }

    pub fn submit_state(&self) -> FormResult<SubmitState> {
        Ok(read_lock(&self.state, "reading submit state")?.submit_state)
    }

    pub fn banner(&self) -> FormResult<StatusBanner> {
        Ok(read_lock(&self.state, "reading status banner")?.banner())
    }

    pub fn banner_message(&self) -> FormResult<Option<String>> {
        Ok(self.banner()?.message(&self.i18n))
    }

    pub fn value(&self, key: &FieldKey) -> FormResult<String> {
        Ok(read_lock(&self.state, "reading field value")?
            .field(key)?
            .value()
            .to_string())
    }

    pub fn field_keys(&self) -> FormResult<Vec<FieldKey>> {
        Ok(read_lock(&self.state, "listing field keys")?
            .fields
            .iter()
            .map(|field| field.key().clone())
            .collect())
    }

    pub fn snapshot(&self) -> FormResult<FormSnapshot> {
        let state = read_lock(&self.state, "creating form snapshot")?;
        Ok(FormSnapshot {
            id: state.id,
            dom_id: state.dom_id.clone(),
            submit_state: state.submit_state,
            submit_count: state.submit_count,
            banner: state.banner(),
            submit_control: state.submit_control.clone(),
            fields: state
                .fields
                .iter()
                .map(|field| FieldSnapshot {
                    key: field.key().clone(),
                    value: field.value().to_string(),
                    validity: field.validity().clone(),
                    disabled: field.is_disabled(),
                    honeypot: field.is_honeypot(),
                })
                .collect(),
        })
    }

    /// Drops every error annotation, leaving values in place.
    pub fn clear_errors(&self) -> FormResult<()> {
        let mut state = write_lock(&self.state, "clearing all field errors")?;
        for field in &mut state.fields {
            field.clear_error();
        }
        Ok(())
    }
}

pub(super) fn transition_submit_state(state: &mut FormState, next: SubmitState) -> FormResult<()> {
    let current = state.submit_state;
    let allowed = matches!(
        (current, next),
        (SubmitState::Idle, SubmitState::Validating)
            | (SubmitState::Validating, SubmitState::Idle)
            | (SubmitState::Validating, SubmitState::Submitting)
            | (SubmitState::Submitting, SubmitState::Succeeded)
            | (SubmitState::Submitting, SubmitState::Failed)
            | (SubmitState::Succeeded, SubmitState::Idle)
            | (SubmitState::Failed, SubmitState::Idle)
    );
    if !allowed {
        return Err(FormError::InvalidStateTransition {
            from: current,
            to: next,
        });
    }
    debug!(form = state.id.0, from = ?current, to = ?next, "submit state transition");
    state.submit_state = next;
    Ok(())
}

pub(super) fn read_lock<'a, T>(
    lock: &'a RwLock<T>,
    context: &'static str,
) -> FormResult<RwLockReadGuard<'a, T>> {
    lock.read().map_err(|_| FormError::StatePoisoned(context))
}

pub(super) fn write_lock<'a, T>(
    lock: &'a RwLock<T>,
    context: &'static str,
) -> FormResult<RwLockWriteGuard<'a, T>> {
    lock.write().map_err(|_| FormError::StatePoisoned(context))
}
