pub use crate::components::{
    CharacterCounter, ColorScheme, FileSelectionError, FileSelector, MenuEvent, MenuToggle,
    SelectedFile, ThemeToggle,
};
pub use crate::form::{
    ConstraintViolation, DelayedTransport, ElementDecl, FieldEvent, FieldKey, FieldSpec,
    FormController, FormDecl, FormError, FormModel, FormOptions, FormResult, FormSchema,
    Payload, StatusBanner, SubmissionTransport, SubmitOutcome, SubmitState, TransportError,
    ValidationMode,
};
pub use crate::i18n::{I18nManager, Locale};
pub use crate::markup::FormPresentation;
pub use crate::page::{Page, PageDecl};
pub use crate::preference::{InMemoryPreferenceStore, PreferenceStore};
