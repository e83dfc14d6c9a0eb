//! # vitrine-forms
//!
//! Form orchestration for the storefront checkout and registration pages.
//!
//! A [`FormOrchestrator`] is built per rendered form from a [`FormConfig`]
//! and owns the state of every field. The rendering layer forwards input and
//! blur events to it and writes back the returned [`FieldView`]s.
//!
//! ```rust
//! use vitrine_forms::{FormConfig, FormOrchestrator, Marker};
//!
//! let mut form = FormOrchestrator::new(&FormConfig::checkout()).unwrap();
//! let update = form.on_input("cpf", "11144477735").unwrap();
//! assert_eq!(update.text, "111.444.777-35");
//! assert_eq!(update.marker, Marker::Valid);
//! ```

pub mod config;
pub mod error;
pub mod field;
pub mod orchestrator;
pub mod postal;
pub mod registry;
pub mod submit;

pub use config::{ConditionalRule, FieldConfig, FieldRules, FormConfig, StorefrontConfig};
pub use error::{FormError, LookupError, SubmitError};
pub use field::{FieldState, FieldView, Marker, Validity};
pub use orchestrator::{
    BlurOutcome, FieldUpdate, FormOrchestrator, FormPhase, FormResult, LookupApplied,
    SubmitGate, SubmitOutcome,
};
pub use postal::{enrich, parse_viacep, PostalAddress, PostalLookup, PostalLookupRequest};
pub use registry::{FieldRegistry, FieldSpec};
pub use submit::{FormSnapshot, NoopSubmitter, Submitter};

#[cfg(feature = "viacep")]
pub use postal::ViaCepClient;

// Re-export the validation core so front ends need a single dependency
pub use vitrine_validation as validation;
pub use vitrine_validation::{FieldKind, ValidationError};
