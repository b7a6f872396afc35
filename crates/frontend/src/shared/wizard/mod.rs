//! Multi-step wizard engine shared by every data-entry dialog.
//!
//! - [`form_state`]: field store
//! - [`validation`]: per-step rules
//! - [`machine`]: step controller
//! - [`gateway`]: submission through the injected `ApiClient`
//! - [`session`]: the pieces above bundled for one open dialog
//! - [`dialog`]: Leptos rendering

pub mod definition;
pub mod dialog;
pub mod form_state;
pub mod gateway;
pub mod machine;
pub mod payload;
pub mod session;
pub mod validation;

pub use definition::{ColumnSpec, FieldSpec, InputKind, OptionSource, StepSpec, WizardDefinition};
pub use dialog::{open_wizard_dialog, parse_number_input, WizardDialog};
pub use form_state::{FieldValue, FormError, FormState};
pub use gateway::{MappingError, SubmissionGateway, SubmissionResult, SubmissionTicket};
pub use machine::{WizardError, WizardState};
pub use session::{AdvanceOutcome, WizardSession};
pub use validation::{CrossRule, Rule, ValidationErrors};
