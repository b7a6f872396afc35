use super::view_model::OreIntakeDetailsViewModel;
use crate::shared::api::use_api_client;
use crate::shared::components::record_details::{optional_value, DetailRows, RecordDetails};
use crate::shared::date_utils::{format_date, format_datetime};
use crate::shared::icons::icon;
use crate::shared::wizard::form_state::format_number;
use contracts::domain::a001_ore_intake::OreIntake;
use leptos::prelude::*;
use thaw::*;

fn detail_rows(intake: &OreIntake) -> DetailRows {
    let taxes = intake
        .taxes
        .iter()
        .map(|t| format!("{} {}%", t.tax_type, format_number(t.rate)))
        .collect::<Vec<_>>()
        .join(", ");
    vec![
        ("Reference", intake.reference.clone()),
        ("Company", intake.company_name.clone()),
        ("Shaft", intake.shaft_name.clone()),
        ("Intake date", format_date(&intake.intake_date)),
        ("Ore type", intake.ore_type.clone()),
        ("Tonnage (t)", format_number(intake.tonnage)),
        ("Vehicle", intake.vehicle_reg.clone()),
        ("Taxes", taxes),
        ("Sample", intake.sample_status.label().to_string()),
        (
            "Assay grade (g/t)",
            intake.assay_grade_gpt.map(format_number).unwrap_or_default(),
        ),
        ("Mill", optional_value(intake.mill_name.as_deref())),
        ("Created", format_datetime(&intake.created_at)),
    ]
}

#[component]
pub fn OreIntakeDetails(
    id: String,
    /// Fired after a sample decision or mill assignment was accepted
    on_changed: Callback<()>,
    on_close: Callback<()>,
) -> impl IntoView {
    let vm = OreIntakeDetailsViewModel::new(use_api_client());
    vm.load(id);

    let vm_sample = vm.clone();
    let vm_mill = vm.clone();
    let record = vm.record;
    let error = vm.error;
    let busy = vm.busy;

    view! {
        {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}
        {move || match record.get() {
            None => view! { <div class="details-container">"Loading..."</div> }.into_any(),
            Some(intake) => {
                let can_decide = intake.can_decide_sample();
                let can_assign = intake.can_assign_mill();
                let vm_sample = vm_sample.clone();
                let vm_mill = vm_mill.clone();
                view! {
                    <RecordDetails
                        title=format!("Ore intake {}", intake.reference)
                        rows=detail_rows(&intake)
                        on_close=on_close
                    >
                        <Show when=move || can_decide>
                            <SampleDecisionPanel vm=vm_sample.clone() on_changed=on_changed />
                        </Show>
                        <Show when=move || can_assign>
                            <MillAssignmentPanel vm=vm_mill.clone() on_changed=on_changed />
                        </Show>
                    </RecordDetails>
                }
                .into_any()
            }
        }}
        <Show when=move || busy.get()>
            <div class="details-busy">"Saving..."</div>
        </Show>
    }
}

#[component]
fn SampleDecisionPanel(vm: OreIntakeDetailsViewModel, on_changed: Callback<()>) -> impl IntoView {
    let grade = vm.grade;
    let comment = vm.comment;
    let busy = vm.busy;
    let vm_approve = vm.clone();
    let vm_reject = vm;

    view! {
        <div class="details-section">
            <h3 class="details-section__title">"Sample decision"</h3>
            <div class="form-group">
                <label for="assay_grade">"Assay grade (g/t)"</label>
                <input
                    id="assay_grade"
                    type="text"
                    inputmode="decimal"
                    prop:value=move || grade.get()
                    on:input=move |ev| grade.set(event_target_value(&ev))
                />
            </div>
            <div class="form-group">
                <label for="sample_comment">"Comment"</label>
                <textarea
                    id="sample_comment"
                    prop:value=move || comment.get()
                    on:input=move |ev| comment.set(event_target_value(&ev))
                ></textarea>
            </div>
            <div class="details-actions">
                <Button
                    appearance=ButtonAppearance::Primary
                    on_click=move |_| vm_approve.decide(true, on_changed)
                    disabled=Signal::derive(move || busy.get())
                >
                    {icon("check")}
                    " Approve"
                </Button>
                <Button
                    appearance=ButtonAppearance::Secondary
                    on_click=move |_| vm_reject.decide(false, on_changed)
                    disabled=Signal::derive(move || busy.get())
                >
                    {icon("x")}
                    " Reject"
                </Button>
            </div>
        </div>
    }
}

#[component]
fn MillAssignmentPanel(vm: OreIntakeDetailsViewModel, on_changed: Callback<()>) -> impl IntoView {
    let mills = vm.mills;
    let mill_id = vm.mill_id;
    let busy = vm.busy;

    view! {
        <div class="details-section">
            <h3 class="details-section__title">"Mill assignment"</h3>
            <div class="form-group">
                <label for="mill_id">"Mill"</label>
                <select
                    id="mill_id"
                    prop:value=move || mill_id.get()
                    on:change=move |ev| mill_id.set(event_target_value(&ev))
                >
                    <option value="">"Select a mill..."</option>
                    <For
                        each=move || mills.get()
                        key=|m| m.value.clone()
                        children=|m| view! { <option value=m.value.clone()>{m.label.clone()}</option> }
                    />
                </select>
                <Show when=move || mills.with(|m| m.is_empty())>
                    <span class="form-hint">"No mills available"</span>
                </Show>
            </div>
            <div class="details-actions">
                <Button
                    appearance=ButtonAppearance::Primary
                    on_click=move |_| vm.assign_mill(on_changed)
                    disabled=Signal::derive(move || busy.get() || mill_id.with(|m| m.is_empty()))
                >
                    "Assign mill"
                </Button>
            </div>
        </div>
    }
}
