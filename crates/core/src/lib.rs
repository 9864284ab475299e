//! # PIES Core
//!
//! Form-payload pipeline for the PIES practice client.
//!
//! This crate turns raw form state into the JSON payloads the backend expects:
//! - Option resolution and key sanitization for checkbox groups
//! - Binding checkbox groups and extracting the labels that were checked
//! - Validation and payload assembly for the intake, SOAP, self-assessment and therapist forms
//! - Session state and role gating
//!
//! **No network concerns**: HTTP calls and response interpretation belong in `pies-client`.

pub mod checkbox;
pub mod constants;
pub mod dates;
pub mod error;
pub mod extract;
pub mod form;
pub mod form_state;
pub mod intake;
pub mod normalize;
pub mod notes;
pub mod options;
pub mod records;
pub mod sanitize;
pub mod self_assessment;
pub mod session;
pub mod soap;
pub mod therapist;
pub mod validation;

pub use checkbox::{BoundCheckbox, CheckboxGroup};
pub use dates::{Clock, FixedClock, SystemClock};
pub use error::{FormError, FormResult, SessionError, SessionResult};
pub use extract::extract_selections;
pub use form::{AssembleContext, FormDefinition, FormInstance, Submission, SubmissionPhase};
pub use form_state::{FieldGroup, FieldRegistry, FormState};
pub use intake::IntakeForm;
pub use options::{OptionSet, OptionSpec, ResolvedOption};
pub use sanitize::sanitize_key;
pub use self_assessment::SelfAssessmentForm;
pub use session::{Role, Session, SessionState, SessionStore};
pub use soap::{SoapAutofill, SoapForm};
pub use therapist::{RegisterForm, TherapistEdit};
pub use validation::ValidationErrors;
