// File: src/orchestrator.rs
// Purpose: Per-form orchestrator wiring masks and validators to named fields

use chrono::{Local, NaiveDate};
use serde::Serialize;
use tracing::{debug, info, warn};
use vitrine_validation::{
    validate_kind, validate_min_length, validate_password, validate_password_confirmation,
    validate_person_name, validate_taxpayer_id, AgeError, FieldKind, ValidationError,
};

use crate::config::FormConfig;
use crate::error::{FormError, LookupError, SubmitError};
use crate::field::{FieldState, FieldView, Marker, Validity};
use crate::postal::{PostalAddress, PostalLookupRequest};
use crate::registry::FieldRegistry;
use crate::submit::{FormSnapshot, Submitter};

/// Submission state machine: `Idle -> Validating -> {Blocked, Submitting} -> Idle`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormPhase {
    Idle,
    Validating,
    /// Last pass found invalid fields; the next event returns to `Idle`
    Blocked,
    Submitting,
}

/// What the rendering layer writes back into a field after an event
pub type FieldUpdate = FieldView;

/// Result of a blur event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlurOutcome {
    pub update: FieldUpdate,
    /// Postal lookup to fire, if the blurred field is a complete postal code
    pub lookup: Option<PostalLookupRequest>,
}

/// Outcome of one validation pass. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormResult {
    /// Every registered field in pass order
    pub fields: Vec<(String, FieldState)>,
    pub all_valid: bool,
}

impl FormResult {
    /// Invalid fields in pass order
    pub fn errors(&self) -> impl Iterator<Item = (&str, &ValidationError)> {
        self.fields
            .iter()
            .filter_map(|(id, state)| state.validity.error().map(|err| (id.as_str(), err)))
    }

    pub fn first_invalid(&self) -> Option<&str> {
        self.errors().next().map(|(id, _)| id)
    }

    pub fn get(&self, id: &str) -> Option<&FieldState> {
        self.fields
            .iter()
            .find(|(field, _)| field == id)
            .map(|(_, state)| state)
    }
}

/// First half of a submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitGate {
    /// Invalid fields were found; `focus` should be brought into view
    Blocked { result: FormResult, focus: Option<String> },
    /// The form is valid and now `Submitting`; run the submit action and
    /// report back with [`FormOrchestrator::finish_submit`]
    Ready { result: FormResult, snapshot: FormSnapshot },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Blocked { result: FormResult, focus: Option<String> },
    Submitted { result: FormResult },
    Failed { result: FormResult, error: SubmitError },
}

/// How a postal lookup outcome changed the form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum LookupApplied {
    /// Address fields were filled; `focus` names the house number field
    Filled {
        updates: Vec<FieldUpdate>,
        focus: Option<String>,
    },
    /// The service does not know the code
    NotFound { update: FieldUpdate },
    /// Failed or stale lookup; nothing changed
    Ignored,
}

/// Orchestrates one rendered form: owns its field states, reacts to input
/// and blur events, and gates submission.
#[derive(Debug, Clone)]
pub struct FormOrchestrator {
    name: String,
    registry: FieldRegistry,
    states: Vec<FieldState>,
    phase: FormPhase,
    today: Option<NaiveDate>,
}

impl FormOrchestrator {
    pub fn new(config: &FormConfig) -> Result<Self, FormError> {
        let registry = FieldRegistry::from_config(config)?;
        let states = registry
            .fields()
            .iter()
            .map(|f| FieldState::new(f.kind))
            .collect();

        debug!(
            "Form '{}' set up with {} fields",
            config.name,
            registry.fields().len()
        );

        Ok(Self {
            name: config.name.clone(),
            registry,
            states,
            phase: FormPhase::Idle,
            today: None,
        })
    }

    /// Pins the reference date used by birth-date checks
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn set_today(&mut self, today: NaiveDate) {
        self.today = Some(today);
    }

    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn registry(&self) -> &FieldRegistry {
        &self.registry
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn submit_enabled(&self) -> bool {
        self.phase != FormPhase::Submitting
    }

    /// Whether the busy indicator should be shown
    pub fn busy(&self) -> bool {
        self.phase == FormPhase::Submitting
    }

    fn position(&self, id: &str) -> Result<usize, FormError> {
        self.registry
            .position(id)
            .ok_or_else(|| FormError::UnknownField(id.to_string()))
    }

    pub fn state(&self, id: &str) -> Option<&FieldState> {
        self.registry.position(id).map(|i| &self.states[i])
    }

    pub fn value(&self, id: &str) -> Option<&str> {
        self.state(id).map(|s| s.raw.as_str())
    }

    fn view_at(&self, i: usize) -> FieldView {
        let spec = &self.registry.fields()[i];
        let state = &self.states[i];
        FieldView {
            id: spec.id.clone(),
            text: state.display(),
            marker: Marker::for_validity(&state.validity, spec.rules.message.as_deref()),
            pending: state.pending,
        }
    }

    pub fn view(&self, id: &str) -> Option<FieldView> {
        self.registry.position(id).map(|i| self.view_at(i))
    }

    /// Views of every field in declaration order
    pub fn views(&self) -> Vec<FieldView> {
        (0..self.states.len()).map(|i| self.view_at(i)).collect()
    }

    fn leave_blocked(&mut self) {
        if self.phase == FormPhase::Blocked {
            self.phase = FormPhase::Idle;
        }
    }

    /// Handles a keystroke: re-masks the field and clears its marker.
    ///
    /// A taxpayer ID is checked as soon as all 11 digits are present.
    pub fn on_input(&mut self, id: &str, raw: &str) -> Result<FieldUpdate, FormError> {
        let i = self.position(id)?;
        self.leave_blocked();

        let state = &mut self.states[i];
        state.set_input(raw);
        state.validity = Validity::Untouched;
        state.pending = false;

        if state.kind == FieldKind::TaxpayerId && state.raw.len() == 11 {
            state.validity = Validity::from_result(validate_taxpayer_id(&state.raw));
        }

        debug!("Input on '{}' -> {:?}", id, state.validity);
        Ok(self.view_at(i))
    }

    /// Handles focus loss: runs the field's dedicated validator when it has
    /// one and a value. A complete postal code yields a lookup request.
    pub fn on_blur(&mut self, id: &str) -> Result<BlurOutcome, FormError> {
        let i = self.position(id)?;
        self.leave_blocked();
        let today = self.today();

        let state = &mut self.states[i];
        if state.kind.has_validator() && !state.is_blank() {
            state.validity = Validity::from_result(validate_kind(state.kind, &state.raw, today));
            debug!("Blur on '{}' -> {:?}", id, state.validity);
        }

        let lookup = match self.registry.postal_field() {
            Some(postal) if postal == id && state.raw.len() == 8 => Some(PostalLookupRequest {
                field_id: id.to_string(),
                postal_code: state.raw.clone(),
            }),
            _ => None,
        };
        if lookup.is_some() {
            state.pending = true;
        }

        Ok(BlurOutcome {
            update: self.view_at(i),
            lookup,
        })
    }

    /// Checks one field for a submission pass; the first failing check wins
    fn check_field(&self, i: usize, required: bool, today: NaiveDate) -> Validity {
        let spec = &self.registry.fields()[i];
        let state = &self.states[i];

        if state.is_blank() {
            return if required {
                Validity::Invalid(ValidationError::MissingRequired)
            } else if spec.kind == FieldKind::Date {
                // An empty birth date fails even on optional fields
                Validity::Invalid(ValidationError::InvalidAge(AgeError::Missing))
            } else {
                Validity::Untouched
            };
        }

        let value = state.raw.as_str();
        let rules = &spec.rules;
        let result = validate_kind(spec.kind, value, today)
            .and_then(|_| {
                if rules.person_name {
                    validate_person_name(value)
                } else {
                    Ok(())
                }
            })
            .and_then(|_| match rules.min_length {
                Some(min) => validate_min_length(value, min),
                None => Ok(()),
            })
            .and_then(|_| match &rules.password {
                Some(policy) => validate_password(value, policy),
                None => Ok(()),
            })
            .and_then(|_| match &rules.equals_field {
                Some(other) => {
                    let expected = self.value(other).unwrap_or_default();
                    validate_password_confirmation(expected, value)
                }
                None => Ok(()),
            });

        Validity::from_result(result)
    }

    /// Full validation pass: clears every marker, then checks declared
    /// required fields, conditionally required fields and the remaining
    /// fields, in that order.
    pub fn validate(&mut self) -> FormResult {
        let today = self.today();

        for state in &mut self.states {
            state.validity = Validity::Untouched;
        }

        let order = self.registry.pass_order(|i| self.states[i].raw.as_str());
        let checked: Vec<(usize, Validity)> = order
            .into_iter()
            .map(|(i, required)| (i, self.check_field(i, required, today)))
            .collect();

        let mut fields = Vec::with_capacity(checked.len());
        for (i, validity) in checked {
            self.states[i].validity = validity;
            fields.push((self.registry.fields()[i].id.clone(), self.states[i].clone()));
        }

        let all_valid = fields.iter().all(|(_, state)| !state.validity.is_invalid());
        let result = FormResult { fields, all_valid };

        debug!(
            "Validated form '{}': {} invalid field(s)",
            self.name,
            result.errors().count()
        );
        result
    }

    pub fn snapshot(&self) -> FormSnapshot {
        let mut snapshot = FormSnapshot {
            form: self.name.clone(),
            ..FormSnapshot::default()
        };
        for (spec, state) in self.registry.fields().iter().zip(&self.states) {
            snapshot.values.insert(spec.id.clone(), state.raw.clone());
            snapshot.display.insert(spec.id.clone(), state.display());
        }
        snapshot
    }

    /// Runs a validation pass and either blocks or moves to `Submitting`
    pub fn begin_submit(&mut self) -> Result<SubmitGate, FormError> {
        if self.phase == FormPhase::Submitting {
            return Err(FormError::SubmissionInProgress);
        }

        self.phase = FormPhase::Validating;
        let result = self.validate();

        if !result.all_valid {
            self.phase = FormPhase::Blocked;
            let focus = result.first_invalid().map(str::to_string);
            debug!("Submission of '{}' blocked, focus {:?}", self.name, focus);
            return Ok(SubmitGate::Blocked { result, focus });
        }

        self.phase = FormPhase::Submitting;
        info!("Submitting form '{}'", self.name);
        Ok(SubmitGate::Ready {
            result,
            snapshot: self.snapshot(),
        })
    }

    /// Ends a submission started by [`begin_submit`](Self::begin_submit)
    /// and re-enables the submit control
    pub fn finish_submit(&mut self, outcome: &Result<(), SubmitError>) -> Result<(), FormError> {
        if self.phase != FormPhase::Submitting {
            return Err(FormError::NotSubmitting);
        }

        self.phase = FormPhase::Idle;
        match outcome {
            Ok(()) => info!("Form '{}' submitted", self.name),
            Err(err) => warn!("Form '{}' submission failed: {}", self.name, err),
        }
        Ok(())
    }

    /// Validates and, when every field passes, runs `submitter` to
    /// completion before returning to `Idle`
    pub async fn submit<S: Submitter + ?Sized>(
        &mut self,
        submitter: &S,
    ) -> Result<SubmitOutcome, FormError> {
        match self.begin_submit()? {
            SubmitGate::Blocked { result, focus } => Ok(SubmitOutcome::Blocked { result, focus }),
            SubmitGate::Ready { result, snapshot } => {
                let outcome = submitter.submit(&snapshot).await;
                self.finish_submit(&outcome)?;
                Ok(match outcome {
                    Ok(()) => SubmitOutcome::Submitted { result },
                    Err(error) => SubmitOutcome::Failed { result, error },
                })
            }
        }
    }

    /// Clears every value and marker
    pub fn reset(&mut self) {
        for state in &mut self.states {
            state.raw.clear();
            state.validity = Validity::Untouched;
            state.pending = false;
        }
        self.leave_blocked();
    }

    /// Applies the outcome of a postal lookup fired for `request`.
    ///
    /// Transport failures are only logged: the address fields stay editable
    /// and the user fills them in by hand. Responses for a code the field no
    /// longer holds are dropped.
    pub fn apply_lookup(
        &mut self,
        request: &PostalLookupRequest,
        outcome: Result<Option<PostalAddress>, LookupError>,
    ) -> Result<LookupApplied, FormError> {
        let postal = self.position(&request.field_id)?;

        if self.states[postal].raw != request.postal_code {
            debug!(
                "Dropping stale lookup for {} (field now holds '{}')",
                request.postal_code, self.states[postal].raw
            );
            return Ok(LookupApplied::Ignored);
        }
        self.states[postal].pending = false;

        let address = match outcome {
            Ok(Some(address)) => address,
            Ok(None) => {
                self.states[postal].validity =
                    Validity::Invalid(ValidationError::PostalCodeNotFound);
                return Ok(LookupApplied::NotFound {
                    update: self.view_at(postal),
                });
            }
            Err(err) => {
                warn!("Postal lookup for {} failed: {}", request.postal_code, err);
                return Ok(LookupApplied::Ignored);
            }
        };

        let mut updates = Vec::new();
        let targets = [
            ("address", &address.street),
            ("neighborhood", &address.neighborhood),
            ("city", &address.city),
            ("state", &address.state),
        ];
        for (canonical, value) in targets {
            if value.is_empty() {
                continue;
            }
            let Some(i) = self
                .registry
                .resolve(canonical)
                .and_then(|id| self.registry.position(id))
            else {
                continue;
            };
            self.states[i].set_input(value);
            self.states[i].validity = Validity::Untouched;
            updates.push(self.view_at(i));
        }

        self.states[postal].validity = Validity::Valid;
        updates.push(self.view_at(postal));

        let focus = self.registry.resolve("number").map(str::to_string);
        debug!(
            "Filled {} address field(s) from postal code {}",
            updates.len() - 1,
            request.postal_code
        );
        Ok(LookupApplied::Filled { updates, focus })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FieldConfig, FieldRules};
    use pretty_assertions::assert_eq;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn checkout() -> FormOrchestrator {
        FormOrchestrator::new(&FormConfig::checkout())
            .unwrap()
            .with_today(today())
    }

    #[test]
    fn test_input_masks_and_clears_marker() {
        let mut form = checkout();
        form.on_input("phone", "1181").unwrap();
        form.on_blur("phone").unwrap();
        assert!(matches!(form.view("phone").unwrap().marker, Marker::Invalid(_)));

        let update = form.on_input("phone", "(11) 8199").unwrap();
        assert_eq!(update.text, "(11) 8199");
        assert_eq!(update.marker, Marker::None);
        assert_eq!(form.value("phone"), Some("118199"));
    }

    #[test]
    fn test_taxpayer_id_checked_when_complete() {
        let mut form = checkout();
        assert_eq!(form.on_input("cpf", "1114447773").unwrap().marker, Marker::None);
        assert_eq!(form.on_input("cpf", "11144477735").unwrap().marker, Marker::Valid);
        assert_eq!(
            form.on_input("cpf", "12345678901").unwrap().marker,
            Marker::Invalid("invalid taxpayer ID".to_string())
        );
    }

    #[test]
    fn test_blur_skips_empty_fields() {
        let mut form = checkout();
        let outcome = form.on_blur("phone").unwrap();
        assert_eq!(outcome.update.marker, Marker::None);
        assert_eq!(outcome.lookup, None);
    }

    #[test]
    fn test_blur_runs_age_check() {
        let mut form = checkout();
        form.on_input("firstDate", "2006-01-02").unwrap();
        assert_eq!(
            form.on_blur("firstDate").unwrap().update.marker,
            Marker::Invalid("must be at least 18".to_string())
        );
        form.on_input("firstDate", "2006-01-01").unwrap();
        assert_eq!(form.on_blur("firstDate").unwrap().update.marker, Marker::Valid);
    }

    #[test]
    fn test_blur_on_complete_postal_code_requests_lookup() {
        let mut form = checkout();
        form.on_input("zipCode", "0131").unwrap();
        assert_eq!(form.on_blur("zipCode").unwrap().lookup, None);

        form.on_input("zipCode", "01310-100").unwrap();
        assert_eq!(
            form.on_blur("zipCode").unwrap().lookup,
            Some(PostalLookupRequest {
                field_id: "zipCode".to_string(),
                postal_code: "01310100".to_string(),
            })
        );
    }

    #[test]
    fn test_unknown_field() {
        let mut form = checkout();
        assert_eq!(
            form.on_input("nope", "x"),
            Err(FormError::UnknownField("nope".to_string()))
        );
    }

    #[test]
    fn test_validate_reports_first_failure_per_field() {
        let mut form = checkout();
        form.on_input("email", "a@b").unwrap();
        form.on_input("cpf", "12345678901").unwrap();

        let result = form.validate();
        assert!(!result.all_valid);
        assert_eq!(result.first_invalid(), Some("firstName"));
        assert_eq!(
            result.get("email").unwrap().validity,
            Validity::Invalid(ValidationError::MalformedEmail)
        );
        assert_eq!(
            result.get("cpf").unwrap().validity,
            Validity::Invalid(ValidationError::InvalidTaxpayerId)
        );
        assert_eq!(result.get("neighborhood").unwrap().validity, Validity::Untouched);
    }

    #[test]
    fn test_field_rules_and_message_override() {
        let config = FormConfig::new("signup")
            .field(FieldConfig::new("senha", FieldKind::GenericText).required())
            .field(
                FieldConfig::new("confirmar", FieldKind::GenericText)
                    .required()
                    .with_rules(FieldRules {
                        equals_field: Some("senha".to_string()),
                        message: Some("As senhas não coincidem.".to_string()),
                        ..FieldRules::default()
                    }),
            );
        let mut form = FormOrchestrator::new(&config).unwrap();
        form.on_input("senha", "abc1@x").unwrap();
        form.on_input("confirmar", "abc1@y").unwrap();

        let result = form.validate();
        assert_eq!(
            result.get("confirmar").unwrap().validity,
            Validity::Invalid(ValidationError::PasswordMismatch)
        );
        assert_eq!(
            form.view("confirmar").unwrap().marker,
            Marker::Invalid("As senhas não coincidem.".to_string())
        );
    }

    #[test]
    fn test_begin_submit_blocks_then_input_returns_to_idle() {
        let mut form = checkout();
        match form.begin_submit().unwrap() {
            SubmitGate::Blocked { focus, .. } => assert_eq!(focus.as_deref(), Some("firstName")),
            other => panic!("expected Blocked, got {:?}", other),
        }
        assert_eq!(form.phase(), FormPhase::Blocked);
        assert!(form.submit_enabled());

        form.on_input("firstName", "Ana").unwrap();
        assert_eq!(form.phase(), FormPhase::Idle);
    }

    #[test]
    fn test_finish_submit_requires_submission() {
        let mut form = checkout();
        assert_eq!(form.finish_submit(&Ok(())), Err(FormError::NotSubmitting));
    }

    #[test]
    fn test_stale_lookup_is_ignored() {
        let mut form = checkout();
        form.on_input("zipCode", "01310100").unwrap();
        let request = form.on_blur("zipCode").unwrap().lookup.unwrap();
        form.on_input("zipCode", "01310200").unwrap();

        let applied = form
            .apply_lookup(&request, Ok(Some(PostalAddress::default())))
            .unwrap();
        assert_eq!(applied, LookupApplied::Ignored);
    }

    #[test]
    fn test_failed_lookup_changes_nothing() {
        let mut form = checkout();
        form.on_input("zipCode", "01310100").unwrap();
        let request = form.on_blur("zipCode").unwrap().lookup.unwrap();

        let applied = form
            .apply_lookup(&request, Err(LookupError::Transport("offline".to_string())))
            .unwrap();
        assert_eq!(applied, LookupApplied::Ignored);
        assert_eq!(form.view("zipCode").unwrap().marker, Marker::None);
        assert_eq!(form.value("address"), Some(""));
    }

    #[test]
    fn test_optional_empty_date_is_missing() {
        let config = FormConfig::new("profile")
            .field(FieldConfig::new("nickname", FieldKind::GenericText))
            .field(FieldConfig::new("birthDate", FieldKind::Date));
        let mut form = FormOrchestrator::new(&config).unwrap().with_today(today());

        let result = form.validate();
        assert!(!result.all_valid);
        assert_eq!(result.get("nickname").unwrap().validity, Validity::Untouched);
        assert_eq!(
            result.get("birthDate").unwrap().validity,
            Validity::Invalid(ValidationError::InvalidAge(AgeError::Missing))
        );
        assert_eq!(
            form.view("birthDate").unwrap().marker,
            Marker::Invalid("birth date is required".to_string())
        );
    }

    #[test]
    fn test_required_empty_date_is_missing_required() {
        let mut form = checkout();
        let result = form.validate();
        assert_eq!(
            result.get("firstDate").unwrap().validity,
            Validity::Invalid(ValidationError::MissingRequired)
        );
    }

    #[test]
    fn test_set_today_pins_reference_date() {
        let mut form = checkout();
        form.set_today(today());
        assert_eq!(form.today(), today());

        form.on_input("firstDate", "2006-01-02").unwrap();
        assert_eq!(
            form.on_blur("firstDate").unwrap().update.marker,
            Marker::Invalid("must be at least 18".to_string())
        );
    }

    #[test]
    fn test_postal_lookup_pending_until_applied() {
        let mut form = checkout();
        form.on_input("zipCode", "01310100").unwrap();
        let outcome = form.on_blur("zipCode").unwrap();
        assert!(outcome.update.pending);
        assert!(!form.view("address").unwrap().pending);

        let request = outcome.lookup.unwrap();
        form.apply_lookup(&request, Ok(None)).unwrap();
        assert!(!form.view("zipCode").unwrap().pending);
    }

    #[test]
    fn test_new_input_clears_pending_lookup() {
        let mut form = checkout();
        form.on_input("zipCode", "01310100").unwrap();
        let request = form.on_blur("zipCode").unwrap().lookup.unwrap();

        assert!(!form.on_input("zipCode", "0131").unwrap().pending);
        assert_eq!(
            form.apply_lookup(&request, Ok(Some(PostalAddress::default())))
                .unwrap(),
            LookupApplied::Ignored
        );
        assert!(!form.view("zipCode").unwrap().pending);
    }

    #[test]
    fn test_blur_without_lookup_is_not_pending() {
        let mut form = checkout();
        form.on_input("zipCode", "0131").unwrap();
        assert!(!form.on_blur("zipCode").unwrap().update.pending);
    }

    #[test]
    fn test_reset_clears_values() {
        let mut form = checkout();
        form.on_input("firstName", "Ana").unwrap();
        form.reset();
        assert_eq!(form.value("firstName"), Some(""));
    }
}
