//! One open wizard dialog: definition, form values, step machine, errors and banner.
//!
//! The session is plain data. The dialog keeps it in a signal and the async
//! part of a submission happens outside; the result comes back through
//! [`WizardSession::apply_result`] together with the generation it was issued
//! for, so answers that arrive after a close are dropped.

use super::definition::{StepSpec, WizardDefinition};
use super::form_state::{entry_path, FieldValue, FormError, FormState};
use super::gateway::{SubmissionGateway, SubmissionResult, SubmissionTicket};
use super::machine::{StepMachine, WizardError, WizardEvent, WizardState};
use super::validation::{validate_step, ValidationErrors};
use contracts::shared::ApiFailure;
use serde_json::Value;

/// Dismissible message shown above the review step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub message: String,
    /// Trying again may help (network trouble, server error)
    pub retryable: bool,
}

impl From<&ApiFailure> for Banner {
    fn from(failure: &ApiFailure) -> Self {
        Self {
            message: failure.message.clone(),
            retryable: failure.is_retryable(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AdvanceOutcome {
    Moved(WizardState),
    /// Current step has errors; nothing moved
    Blocked,
    /// Review passed: the ticket must go through the gateway
    Submit(SubmissionTicket),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultDisposition {
    Confirmed,
    Failed,
    /// Session was closed or already settled; result ignored
    Stale,
}

#[derive(Clone)]
pub struct WizardSession {
    definition: &'static WizardDefinition,
    form: FormState,
    machine: StepMachine,
    errors: ValidationErrors,
    banner: Option<Banner>,
    generation: u64,
    created: Option<Value>,
}

impl WizardSession {
    pub fn open(definition: &'static WizardDefinition) -> Self {
        Self {
            definition,
            form: definition.initial_state(),
            machine: StepMachine::new(definition.entry_steps.len()),
            errors: ValidationErrors::new(),
            banner: None,
            generation: 0,
            created: None,
        }
    }

    pub fn definition(&self) -> &'static WizardDefinition {
        self.definition
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn state(&self) -> WizardState {
        self.machine.state()
    }

    pub fn index(&self) -> usize {
        self.machine.index()
    }

    pub fn step_count(&self) -> usize {
        self.machine.step_count()
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn error(&self, key: &str) -> Option<String> {
        self.errors.get(key).map(str::to_string)
    }

    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_busy(&self) -> bool {
        self.machine.is_busy()
    }

    pub fn is_confirmed(&self) -> bool {
        self.machine.is_confirmed()
    }

    pub fn can_retreat(&self) -> bool {
        self.machine.can_retreat()
    }

    pub fn is_review(&self) -> bool {
        matches!(
            self.state(),
            WizardState::Review | WizardState::Submitting
        )
    }

    /// Step whose fields are on screen; `None` on the confirmation step.
    pub fn current_step(&self) -> Option<&'static StepSpec> {
        match self.state() {
            WizardState::Entry(i) => self.definition.entry_steps.get(i),
            WizardState::Review | WizardState::Submitting => Some(&self.definition.review),
            WizardState::Confirmed => None,
        }
    }

    /// Record returned by the backend for the confirmed submission
    pub fn created_record(&self) -> Option<&Value> {
        self.created.as_ref()
    }

    /// Human reference of the created record, if the backend sent one.
    pub fn created_reference(&self) -> Option<String> {
        let record = self.created.as_ref()?;
        ["reference", "id"]
            .iter()
            .find_map(|key| record.get(*key).and_then(Value::as_str))
            .map(str::to_string)
    }

    /// The form is frozen while a submission is in flight.
    fn ensure_editable(&self) -> Result<(), FormError> {
        if self.is_busy() {
            return Err(FormError::Locked);
        }
        Ok(())
    }

    pub fn set_field(&mut self, name: &str, value: FieldValue) -> Result<bool, FormError> {
        self.ensure_editable()?;
        let changed = self.form.set_field(name, value)?;
        if changed {
            self.errors.clear_field(name);
        }
        Ok(changed)
    }

    /// Append a blank row to the list field `name`. Returns the index of
    /// the new row.
    pub fn append_entry(&mut self, name: &str) -> Result<usize, FormError> {
        self.ensure_editable()?;
        let entry = match self.definition.blank_entry(name) {
            Some(entry) => entry,
            None if self.form.contains(name) => return Err(FormError::NotAList(name.to_string())),
            None => return Err(FormError::UnknownField(name.to_string())),
        };
        let index = self.form.append_entry(name, entry)?;
        self.errors.clear_field(name);
        Ok(index)
    }

    pub fn remove_entry(&mut self, name: &str, index: usize) -> Result<(), FormError> {
        self.ensure_editable()?;
        self.form.remove_entry(name, index)?;
        // Row keys shift after a removal.
        self.errors.clear_field(name);
        Ok(())
    }

    pub fn set_entry_field(
        &mut self,
        name: &str,
        index: usize,
        column: &str,
        value: FieldValue,
    ) -> Result<bool, FormError> {
        self.ensure_editable()?;
        let changed = self.form.set_entry_field(name, index, column, value)?;
        if changed {
            self.errors.remove(name);
            self.errors.remove(&entry_path(name, index, column));
        }
        Ok(changed)
    }

    /// Validate the current step and move on, or hand out a submission ticket
    /// when leaving the review step.
    pub fn advance(&mut self) -> Result<AdvanceOutcome, WizardError> {
        // Rejects Submitting and Confirmed before any validation runs.
        self.machine.transition(WizardEvent::Advance)?;

        let step = match self.current_step() {
            Some(step) => step,
            None => {
                return Err(WizardError::IllegalTransition {
                    from: self.state(),
                    event: WizardEvent::Advance,
                })
            }
        };

        let validation = validate_step(step, &self.form);
        if !validation.valid {
            log::debug!(
                "{}: step {} blocked by {} error(s)",
                self.definition.key,
                self.index(),
                validation.errors.len()
            );
            self.errors = validation.errors;
            return Ok(AdvanceOutcome::Blocked);
        }
        self.errors.clear();

        if self.state() == WizardState::Review {
            let payload = match (self.definition.mapper)(&self.form) {
                Ok(payload) => payload,
                Err(e) => {
                    log::error!("{}: payload mapping failed: {}", self.definition.key, e);
                    self.banner = Some(Banner {
                        message: e.to_string(),
                        retryable: false,
                    });
                    return Err(WizardError::Mapping(e.to_string()));
                }
            };
            self.machine.apply(WizardEvent::Advance)?;
            self.banner = None;
            return Ok(AdvanceOutcome::Submit(SubmissionTicket {
                generation: self.generation,
                resource: self.definition.resource,
                payload,
            }));
        }

        let next = self.machine.apply(WizardEvent::Advance)?;
        Ok(AdvanceOutcome::Moved(next))
    }

    /// Step back without re-validating what was entered.
    pub fn retreat(&mut self) -> Result<WizardState, WizardError> {
        let previous = self.machine.apply(WizardEvent::Retreat)?;
        self.errors.clear();
        self.banner = None;
        Ok(previous)
    }

    pub fn apply_result(&mut self, generation: u64, result: SubmissionResult) -> ResultDisposition {
        if generation != self.generation || !self.is_busy() {
            log::debug!(
                "{}: dropping result for generation {} (current {})",
                self.definition.key,
                generation,
                self.generation
            );
            return ResultDisposition::Stale;
        }

        match result {
            SubmissionResult::Submitted { data } => {
                if self.machine.apply(WizardEvent::SubmitSucceeded).is_err() {
                    return ResultDisposition::Stale;
                }
                self.created = Some(data);
                ResultDisposition::Confirmed
            }
            SubmissionResult::Failed(failure) => {
                if self.machine.apply(WizardEvent::SubmitFailed).is_err() {
                    return ResultDisposition::Stale;
                }
                self.banner = Some(Banner::from(&failure));
                ResultDisposition::Failed
            }
        }
    }

    pub fn dismiss_banner(&mut self) {
        self.banner = None;
    }

    /// Back to the first step with default values. Results still in flight
    /// become stale.
    pub fn close(&mut self) {
        // Close is legal from every state.
        let _ = self.machine.apply(WizardEvent::Close);
        self.form = self.definition.initial_state();
        self.errors.clear();
        self.banner = None;
        self.created = None;
        self.generation += 1;
    }

    /// `advance` plus, at the review step, the whole submission round trip.
    pub async fn advance_with(
        &mut self,
        gateway: &SubmissionGateway,
    ) -> Result<WizardState, WizardError> {
        if let AdvanceOutcome::Submit(ticket) = self.advance()? {
            let result = gateway.submit(&ticket).await;
            self.apply_result(ticket.generation, result);
        }
        Ok(self.state())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::api::mock::MockApiClient;
    use crate::shared::wizard::definition::{ColumnSpec, FieldSpec, InputKind};
    use crate::shared::wizard::gateway::MappingError;
    use crate::shared::wizard::payload::{required_date, required_text, tax_entries};
    use crate::shared::wizard::validation::Rule;
    use chrono::NaiveDate;
    use contracts::domain::common::TaxEntryDto;
    use contracts::shared::{ApiEnvelope, FailureKind};
    use once_cell::sync::Lazy;
    use serde::Deserialize;
    use serde_json::json;
    use std::sync::Arc;

    fn map_visit(form: &FormState) -> Result<Value, MappingError> {
        Ok(json!({
            "visitorName": required_text(form, "visitor")?,
            "visitDate": required_date(form, "visit_date")?,
            "taxes": tax_entries(form, "taxes")?,
        }))
    }

    static VISIT: Lazy<WizardDefinition> = Lazy::new(|| WizardDefinition {
        key: "visit",
        title: "Site visit",
        resource: "visits",
        entry_steps: vec![
            StepSpec::new("Visitor")
                .field(FieldSpec::new("visitor", "Visitor", InputKind::Text).required())
                .field(FieldSpec::new("visit_date", "Visit date", InputKind::Date).required()),
            StepSpec::new("Taxes").field(
                FieldSpec::new(
                    "taxes",
                    "Taxes",
                    InputKind::List {
                        columns: vec![
                            ColumnSpec::text("type", "Type"),
                            ColumnSpec::number("rate", "Rate"),
                        ],
                        add_label: "Add tax",
                    },
                )
                .rule(Rule::AtLeastOneEntry {
                    text: "type",
                    positive: "rate",
                    message: "Add at least one tax with a type and a rate above zero",
                }),
            ),
        ],
        review: StepSpec::new("Review"),
        confirmation: "Visit recorded",
        mapper: map_visit,
    });

    fn filled() -> WizardSession {
        let mut s = WizardSession::open(&VISIT);
        s.set_field("visitor", FieldValue::text("T. Moyo")).unwrap();
        s.set_field(
            "visit_date",
            FieldValue::date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()),
        )
        .unwrap();
        s.set_entry_field("taxes", 0, "type", FieldValue::text("VAT")).unwrap();
        s.set_entry_field("taxes", 0, "rate", FieldValue::number(15.0)).unwrap();
        s
    }

    fn to_review(s: &mut WizardSession) {
        assert_eq!(
            s.advance(),
            Ok(AdvanceOutcome::Moved(WizardState::Entry(1)))
        );
        assert_eq!(s.advance(), Ok(AdvanceOutcome::Moved(WizardState::Review)));
    }

    #[test]
    fn test_advance_blocked_until_step_is_valid() {
        let mut s = WizardSession::open(&VISIT);
        assert_eq!(s.advance(), Ok(AdvanceOutcome::Blocked));
        assert_eq!(s.index(), 0);
        assert_eq!(s.error("visitor").as_deref(), Some("Visitor is required"));

        s.set_field("visitor", FieldValue::text("T. Moyo")).unwrap();
        assert!(s.error("visitor").is_none());
        assert!(s.error("visit_date").is_some());
    }

    #[test]
    fn test_retreat_skips_validation() {
        let mut s = filled();
        to_review(&mut s);
        s.set_entry_field("taxes", 0, "rate", FieldValue::number(0.0)).unwrap();
        assert_eq!(s.retreat(), Ok(WizardState::Entry(1)));
        assert_eq!(s.retreat(), Ok(WizardState::Entry(0)));
        assert!(s.retreat().is_err());
    }

    #[test]
    fn test_tax_list_scenario() {
        let mut s = filled();
        s.set_entry_field("taxes", 0, "type", FieldValue::text("")).unwrap();
        s.set_entry_field("taxes", 0, "rate", FieldValue::number(0.0)).unwrap();
        s.advance().unwrap();
        assert_eq!(s.advance(), Ok(AdvanceOutcome::Blocked));
        assert!(s.error("taxes").is_some());

        let idx = s.append_entry("taxes").unwrap();
        assert_eq!(idx, 1);
        s.set_entry_field("taxes", idx, "type", FieldValue::text("VAT")).unwrap();
        assert!(s.error("taxes").is_none());
        s.set_entry_field("taxes", idx, "rate", FieldValue::number(15.0)).unwrap();

        let rows = s.form().list("taxes");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("type"), Some(&FieldValue::text("")));
        assert_eq!(rows[1].get("type"), Some(&FieldValue::text("VAT")));
        assert_eq!(rows[1].get("rate"), Some(&FieldValue::number(15.0)));
        assert_eq!(s.advance(), Ok(AdvanceOutcome::Moved(WizardState::Review)));
    }

    #[test]
    fn test_append_entry_on_scalar_field_is_rejected() {
        let mut s = WizardSession::open(&VISIT);
        assert_eq!(
            s.append_entry("visitor"),
            Err(FormError::NotAList("visitor".into()))
        );
        assert_eq!(
            s.append_entry("nope"),
            Err(FormError::UnknownField("nope".into()))
        );
    }

    #[test]
    fn test_second_advance_while_submitting_is_rejected() {
        let mut s = filled();
        to_review(&mut s);
        let ticket = match s.advance() {
            Ok(AdvanceOutcome::Submit(ticket)) => ticket,
            other => panic!("expected ticket, got {:?}", other),
        };
        assert!(s.is_busy());
        assert_eq!(s.advance(), Err(WizardError::SubmissionInFlight));
        assert_eq!(
            s.apply_result(ticket.generation, SubmissionResult::Submitted { data: json!({}) }),
            ResultDisposition::Confirmed
        );
    }

    #[test]
    fn test_form_is_locked_while_submitting() {
        let mut s = filled();
        to_review(&mut s);
        let before = s.form().clone();
        let ticket = match s.advance() {
            Ok(AdvanceOutcome::Submit(ticket)) => ticket,
            other => panic!("expected ticket, got {:?}", other),
        };

        assert_eq!(s.set_field("visitor", FieldValue::text("Someone else")), Err(FormError::Locked));
        assert_eq!(s.append_entry("taxes"), Err(FormError::Locked));
        assert_eq!(s.remove_entry("taxes", 0), Err(FormError::Locked));
        assert_eq!(
            s.set_entry_field("taxes", 0, "rate", FieldValue::number(1.0)),
            Err(FormError::Locked)
        );
        assert_eq!(s.form(), &before);

        s.apply_result(
            ticket.generation,
            SubmissionResult::Failed(ApiFailure::new(FailureKind::Server, "boom")),
        );
        assert_eq!(s.set_field("visitor", FieldValue::text("Someone else")), Ok(true));
    }

    #[test]
    fn test_result_after_close_is_stale() {
        let mut s = filled();
        to_review(&mut s);
        let ticket = match s.advance() {
            Ok(AdvanceOutcome::Submit(ticket)) => ticket,
            other => panic!("expected ticket, got {:?}", other),
        };
        s.close();
        let disposition = s.apply_result(
            ticket.generation,
            SubmissionResult::Submitted {
                data: json!({"id": "late"}),
            },
        );
        assert_eq!(disposition, ResultDisposition::Stale);
        assert_eq!(s.state(), WizardState::Entry(0));
        assert!(s.created_record().is_none());
    }

    #[tokio::test]
    async fn test_rejected_submission_keeps_review_and_data() {
        let client = Arc::new(
            MockApiClient::new().respond_with(ApiEnvelope::err("404 not found")),
        );
        let gateway = SubmissionGateway::new(client.clone());
        let mut s = filled();
        to_review(&mut s);
        let before = s.form().clone();

        let state = s.advance_with(&gateway).await.unwrap();

        assert_eq!(state, WizardState::Review);
        assert_eq!(s.index(), 2);
        assert_eq!(s.form(), &before);
        let banner = s.banner().expect("banner shown");
        assert!(banner.message.contains("404 not found"));
        assert!(!banner.retryable);

        s.dismiss_banner();
        assert!(s.banner().is_none());
        assert_eq!(client.calls().len(), 1);
    }

    #[test]
    fn test_network_failure_is_retryable() {
        let mut s = filled();
        to_review(&mut s);
        let ticket = match s.advance().unwrap() {
            AdvanceOutcome::Submit(ticket) => ticket,
            other => panic!("expected ticket, got {:?}", other),
        };
        s.apply_result(
            ticket.generation,
            SubmissionResult::Failed(ApiFailure::new(FailureKind::Network, "offline")),
        );
        assert!(s.banner().map(|b| b.retryable).unwrap_or(false));
        assert_eq!(s.state(), WizardState::Review);
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct EchoedVisit {
        visitor_name: String,
        visit_date: NaiveDate,
        taxes: Vec<TaxEntryDto>,
    }

    #[tokio::test]
    async fn test_submission_round_trips_through_echo_client() {
        let client = Arc::new(MockApiClient::new());
        let gateway = SubmissionGateway::new(client.clone());
        let mut s = filled();
        let extra = s.append_entry("taxes").unwrap();
        assert_eq!(extra, 1);
        to_review(&mut s);

        assert_eq!(
            s.advance_with(&gateway).await,
            Ok(WizardState::Confirmed)
        );
        assert_eq!(s.created_reference().as_deref(), Some("rec-1"));

        let echoed: EchoedVisit =
            serde_json::from_value(s.created_record().cloned().unwrap()).unwrap();
        assert_eq!(echoed.visitor_name, "T. Moyo");
        assert_eq!(echoed.visit_date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        // Blank second row is not sent.
        assert_eq!(echoed.taxes.len(), 1);

        let sent = client.calls()[0].payload.clone().unwrap();
        assert_eq!(sent["visitDate"], "2024-03-01");
    }

    #[tokio::test]
    async fn test_close_after_confirmation_resets() {
        let gateway = SubmissionGateway::new(Arc::new(MockApiClient::new()));
        let mut s = filled();
        to_review(&mut s);
        s.advance_with(&gateway).await.unwrap();
        assert!(s.is_confirmed());
        assert!(s.advance().is_err());

        s.close();

        assert_eq!(s.index(), 0);
        assert_eq!(s.form(), &VISIT.initial_state());
        assert!(s.errors().is_empty());
        assert_eq!(s.generation(), 1);
    }
}
