pub mod api_response;
pub mod options;

pub use api_response::{ApiEnvelope, ApiFailure, ApiResponse, FailureKind};
pub use options::{label_for, SelectOption};
