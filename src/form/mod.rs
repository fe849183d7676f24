mod binding;
mod controller;
mod field;
mod schema;
mod status;
mod transport;
mod validation;


pub use binding::{FieldEvent, SubmitOutcome};
pub use controller::{
    FieldSnapshot, FormController, FormError, FormId, FormOptions, FormResult, FormSnapshot,
    SubmitControl, SubmitState, ValidationMode,
};
pub use field::{FieldConstraints, FieldHandle, FieldKey, FieldKind, FieldValidity};
pub use folioform_derive::FormModel;
pub use schema::{
    COUNTER_MARKER, ElementDecl, FieldSpec, FormDecl, FormModel, FormSchema, VALIDATE_MARKER,
};
pub use status::{SettledOutcome, StatusBanner};
pub use transport::{BoxedSubmitFuture, DelayedTransport, Payload, SubmissionTransport, TransportError};
pub use validation::{ConstraintViolation, check_constraints};
