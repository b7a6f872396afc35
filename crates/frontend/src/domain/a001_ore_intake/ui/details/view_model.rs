use crate::domain::a001_ore_intake::api;
use crate::shared::api::SharedApiClient;
use crate::shared::wizard::parse_number_input;
use contracts::domain::a001_ore_intake::{MillAssignmentDto, OreIntake, SampleDecisionDto};
use contracts::shared::SelectOption;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// Build the sample decision from the raw inputs.
///
/// Approving needs an assay grade above zero, rejecting needs a comment.
pub fn build_decision(
    approved: bool,
    grade_raw: &str,
    comment: &str,
) -> Result<SampleDecisionDto, String> {
    let comment = comment.trim();
    let comment = (!comment.is_empty()).then(|| comment.to_string());
    if approved {
        let grade = parse_number_input(grade_raw)
            .filter(|g| *g > 0.0)
            .ok_or_else(|| "Enter an assay grade above zero to approve".to_string())?;
        Ok(SampleDecisionDto {
            approved,
            assay_grade_gpt: Some(grade),
            comment,
        })
    } else {
        if comment.is_none() {
            return Err("Give a reason for rejecting the sample".to_string());
        }
        Ok(SampleDecisionDto {
            approved,
            assay_grade_gpt: None,
            comment,
        })
    }
}

#[derive(Clone)]
pub struct OreIntakeDetailsViewModel {
    client: SharedApiClient,
    pub record: RwSignal<Option<OreIntake>>,
    pub error: RwSignal<Option<String>>,
    pub busy: RwSignal<bool>,
    pub grade: RwSignal<String>,
    pub comment: RwSignal<String>,
    pub mills: RwSignal<Vec<SelectOption>>,
    pub mill_id: RwSignal<String>,
}

impl OreIntakeDetailsViewModel {
    pub fn new(client: SharedApiClient) -> Self {
        Self {
            client,
            record: RwSignal::new(None),
            error: RwSignal::new(None),
            busy: RwSignal::new(false),
            grade: RwSignal::new(String::new()),
            comment: RwSignal::new(String::new()),
            mills: RwSignal::new(Vec::new()),
            mill_id: RwSignal::new(String::new()),
        }
    }

    /// Load the record and, if a mill can be assigned, the mill options.
    pub fn load(&self, id: String) {
        let vm = self.clone();
        spawn_local(async move {
            match api::fetch_intake(vm.client.as_ref(), &id).await {
                Ok(intake) => {
                    let needs_mills = intake.can_assign_mill();
                    vm.record.try_set(Some(intake));
                    if needs_mills {
                        match api::fetch_mills(vm.client.as_ref()).await {
                            Ok(mills) => {
                                vm.mills.try_set(mills);
                            }
                            Err(e) => {
                                vm.error.try_set(Some(e));
                            }
                        }
                    }
                }
                Err(e) => {
                    vm.error.try_set(Some(e));
                }
            }
        });
    }

    pub fn decide(&self, approved: bool, on_changed: Callback<()>) {
        let Some(id) = self.record.with_untracked(|r| r.as_ref().map(|r| r.id.clone())) else {
            return;
        };
        let decision = match build_decision(
            approved,
            &self.grade.get_untracked(),
            &self.comment.get_untracked(),
        ) {
            Ok(d) => d,
            Err(e) => {
                self.error.set(Some(e));
                return;
            }
        };
        self.error.set(None);
        self.busy.set(true);
        let vm = self.clone();
        spawn_local(async move {
            let result = api::decide_sample(vm.client.as_ref(), &id, &decision).await;
            vm.busy.try_set(false);
            match result {
                Ok(()) => {
                    log::info!("Sample of {} {}", id, if approved { "approved" } else { "rejected" });
                    on_changed.run(());
                    vm.load(id);
                }
                Err(e) => {
                    vm.error.try_set(Some(e));
                }
            }
        });
    }

    pub fn assign_mill(&self, on_changed: Callback<()>) {
        let Some(id) = self.record.with_untracked(|r| r.as_ref().map(|r| r.id.clone())) else {
            return;
        };
        let mill_id = self.mill_id.get_untracked();
        if mill_id.is_empty() {
            self.error.set(Some("Select a mill".to_string()));
            return;
        }
        self.error.set(None);
        self.busy.set(true);
        let vm = self.clone();
        spawn_local(async move {
            let result =
                api::assign_mill(vm.client.as_ref(), &id, &MillAssignmentDto { mill_id }).await;
            vm.busy.try_set(false);
            match result {
                Ok(()) => {
                    on_changed.run(());
                    vm.load(id);
                }
                Err(e) => {
                    vm.error.try_set(Some(e));
                }
            }
        });
    }
}
