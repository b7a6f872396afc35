//! Leptos rendering of a wizard session.
//!
//! `WizardDialog` draws whatever step the session is on from the definition's
//! field specs. All state lives in one `RwSignal<WizardSession>`; the step body
//! only re-renders when the step index changes so inputs keep their focus
//! while the user types.

use super::definition::{ColumnInput, ColumnSpec, FieldSpec, InputKind, OptionSource, WizardDefinition};
use super::form_state::{entry_is_blank, entry_path, format_number, FieldValue, FileRef};
use super::gateway::SubmissionGateway;
use super::session::{AdvanceOutcome, WizardSession};
use crate::shared::api::use_api_client;
use crate::shared::date_utils::{parse_input_date, to_input_date};
use crate::shared::icons::icon;
use crate::shared::modal_stack::ModalStackService;
use contracts::shared::{label_for, SelectOption};
use leptos::prelude::*;
use leptos::task::spawn_local;
use serde_json::Value;
use std::collections::BTreeMap;
use thaw::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlInputElement;

#[derive(Debug, Clone, PartialEq)]
pub enum OptionsLoad {
    Loading,
    Ready(Vec<SelectOption>),
    Failed(String),
}

type OptionsMap = BTreeMap<&'static str, OptionsLoad>;

/// Text typed into a number input. Empty or unparsable input is "no value".
pub fn parse_number_input(raw: &str) -> Option<f64> {
    let normalized = raw.trim().replace(',', ".");
    if normalized.is_empty() {
        return None;
    }
    normalized.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn resolve_options(source: OptionSource, options: &OptionsMap) -> Vec<SelectOption> {
    match source {
        OptionSource::Static(pairs) => pairs
            .iter()
            .map(|(value, label)| SelectOption::new(*value, *label))
            .collect(),
        OptionSource::Remote(category) => match options.get(category) {
            Some(OptionsLoad::Ready(list)) => list.clone(),
            _ => Vec::new(),
        },
    }
}

fn select_label(source: OptionSource, value: &str, options: &OptionsMap) -> String {
    let resolved = resolve_options(source, options);
    label_for(&resolved, value).to_string()
}

/// Review-step text of one field; list fields yield one line per filled row.
fn summary_lines(field: &FieldSpec, value: &FieldValue, options: &OptionsMap) -> Vec<String> {
    match (&field.input, value) {
        (InputKind::Select(source), FieldValue::Text(code)) => {
            vec![select_label(*source, code, options)]
        }
        (InputKind::List { columns, .. }, FieldValue::List(entries)) => entries
            .iter()
            .filter(|entry| !entry_is_blank(entry))
            .map(|entry| {
                columns
                    .iter()
                    .map(|column| {
                        let cell = entry.get(column.name).cloned().unwrap_or(FieldValue::text(""));
                        let text = match (column.input, &cell) {
                            (ColumnInput::Select(source), FieldValue::Text(code)) => {
                                select_label(source, code, options)
                            }
                            _ => cell.display(),
                        };
                        format!("{}: {}", column.label, text)
                    })
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .collect(),
        _ => vec![value.display()],
    }
}

/// Push a wizard onto the modal stack.
pub fn open_wizard_dialog(
    modal_stack: ModalStackService,
    definition: &'static WizardDefinition,
    on_created: Callback<Value>,
) {
    log::info!("Opening wizard {}", definition.key);
    modal_stack.push_with_frame(
        Some("width: min(780px, 96vw); max-height: 92vh;".to_string()),
        Some("wizard-modal".to_string()),
        move |handle| {
            let on_close = Callback::new(move |_| handle.close());
            view! {
                <WizardDialog definition=definition on_created=on_created on_close=on_close />
            }
            .into_any()
        },
    );
}

#[component]
pub fn WizardDialog(
    definition: &'static WizardDefinition,
    /// Receives the created record after a successful submission
    on_created: Callback<Value>,
    on_close: Callback<()>,
) -> impl IntoView {
    let client = use_api_client();
    let session = RwSignal::new(WizardSession::open(definition));
    let options: RwSignal<OptionsMap> = RwSignal::new(BTreeMap::new());

    for category in definition.remote_categories() {
        options.update(|m| {
            m.insert(category, OptionsLoad::Loading);
        });
        let client = client.clone();
        spawn_local(async move {
            let loaded = match client.fetch_options(category).await {
                Ok(list) => OptionsLoad::Ready(list),
                Err(e) => {
                    log::warn!("Options {} failed: {}", category, e);
                    OptionsLoad::Failed(e.message)
                }
            };
            let _ = options.try_update(|m| m.insert(category, loaded));
        });
    }

    let gateway = StoredValue::new(
        SubmissionGateway::new(client).with_refresh(move |data| on_created.run(data.clone())),
    );

    let step_index = Memo::new(move |_| session.with(|s| s.index()));
    let is_busy = Memo::new(move |_| session.with(|s| s.is_busy()));
    let is_review = Memo::new(move |_| session.with(|s| s.is_review()));
    let is_confirmed = Memo::new(move |_| session.with(|s| s.is_confirmed()));
    let can_retreat = Memo::new(move |_| session.with(|s| s.can_retreat()));

    let on_next = move |_| {
        let outcome = session.try_update(|s| s.advance());
        match outcome {
            Some(Ok(AdvanceOutcome::Submit(ticket))) => {
                let gateway = gateway.get_value();
                spawn_local(async move {
                    let result = gateway.submit(&ticket).await;
                    // Signal is gone if the dialog was closed meanwhile.
                    let _ = session.try_update(|s| s.apply_result(ticket.generation, result));
                });
            }
            Some(Err(e)) => log::warn!("{}: {}", definition.key, e),
            _ => {}
        }
    };

    let on_back = move |_| {
        if let Some(Err(e)) = session.try_update(|s| s.retreat()) {
            log::warn!("{}: {}", definition.key, e);
        }
    };

    let close = move || {
        session.update(|s| s.close());
        on_close.run(());
    };

    let step_titles = definition.step_titles();

    view! {
        <div class="wizard" id=format!("wizard--{}", definition.key)>
            <div class="wizard__header">
                <h2 class="wizard__title">{definition.title}</h2>
                <button class="wizard__close" title="Close" on:click=move |_| close()>
                    {icon("x")}
                </button>
            </div>

            <ol class="wizard__steps">
                {step_titles
                    .into_iter()
                    .enumerate()
                    .map(|(i, title)| {
                        view! {
                            <li
                                class=move || {
                                    let current = step_index.get();
                                    if current == i {
                                        "wizard__step wizard__step--active"
                                    } else if current > i {
                                        "wizard__step wizard__step--done"
                                    } else {
                                        "wizard__step"
                                    }
                                }
                            >
                                <span class="wizard__step-number">{i + 1}</span>
                                <span class="wizard__step-title">{title}</span>
                            </li>
                        }
                    })
                    .collect_view()}
            </ol>

            {move || {
                session
                    .with(|s| s.banner().cloned())
                    .map(|banner| {
                        view! {
                            <div class="alert alert--error wizard__banner">
                                {icon("alert")}
                                <span>{banner.message}</span>
                                {banner.retryable.then(|| view! {
                                    <span class="wizard__banner-hint">" You can try again."</span>
                                })}
                                <button
                                    class="wizard__banner-dismiss"
                                    title="Dismiss"
                                    on:click=move |_| session.update(|s| s.dismiss_banner())
                                >
                                    {icon("x")}
                                </button>
                            </div>
                        }
                    })
            }}

            <fieldset class="wizard__body" disabled=move || is_busy.get()>
                {move || {
                    step_index.track();
                    let (step, confirmed, review) = session
                        .with_untracked(|s| (s.current_step(), s.is_confirmed(), s.is_review()));
                    if confirmed {
                        return view! { <ConfirmationStep definition=definition session=session /> }
                            .into_any();
                    }
                    let Some(step) = step else {
                        return view! { <div class="wizard__step-body"></div> }.into_any();
                    };
                    view! {
                        <div class="wizard__step-body">
                            {step.description.map(|d| view! { <p class="wizard__description">{d}</p> })}
                            {review.then(|| view! { <ReviewSummary definition=definition session=session options=options /> })}
                            {step
                                .fields
                                .iter()
                                .map(|field| render_field(field, session, options))
                                .collect_view()}
                        </div>
                    }
                    .into_any()
                }}
            </fieldset>

            <div class="wizard__footer">
                <Show
                    when=move || !is_confirmed.get()
                    fallback=move || view! {
                        <Button appearance=ButtonAppearance::Primary on_click=move |_| close()>
                            "Close"
                        </Button>
                    }
                >
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=on_back
                        disabled=Signal::derive(move || !can_retreat.get() || is_busy.get())
                    >
                        {icon("chevron-left")}
                        " Back"
                    </Button>
                    <Button
                        appearance=ButtonAppearance::Primary
                        on_click=on_next
                        disabled=Signal::derive(move || is_busy.get())
                    >
                        {move || {
                            if is_busy.get() {
                                "Submitting..."
                            } else if is_review.get() {
                                "Submit"
                            } else {
                                "Next"
                            }
                        }}
                    </Button>
                </Show>
            </div>
        </div>
    }
}

#[component]
fn ConfirmationStep(
    definition: &'static WizardDefinition,
    session: RwSignal<WizardSession>,
) -> impl IntoView {
    let reference = session.with_untracked(|s| s.created_reference());
    view! {
        <div class="wizard__confirmation">
            <div class="wizard__confirmation-icon">{icon("check")}</div>
            <h3>{definition.confirmation}</h3>
            {reference.map(|r| view! {
                <p class="wizard__reference">"Reference: " <strong>{r}</strong></p>
            })}
        </div>
    }
}

#[component]
fn ReviewSummary(
    definition: &'static WizardDefinition,
    session: RwSignal<WizardSession>,
    options: RwSignal<OptionsMap>,
) -> impl IntoView {
    view! {
        <div class="wizard__review">
            {move || {
                options.with(|opts| {
                    session.with(|s| {
                        definition
                            .entry_steps
                            .iter()
                            .map(|step| {
                                let rows = step
                                    .fields
                                    .iter()
                                    .filter_map(|field| {
                                        let value = s.form().get(field.name)?;
                                        let lines = summary_lines(field, value, opts);
                                        Some(view! {
                                            <dt>{field.label}</dt>
                                            <dd>
                                                {if lines.iter().all(|l| l.is_empty()) {
                                                    view! { <span class="wizard__empty">"-"</span> }.into_any()
                                                } else {
                                                    lines
                                                        .into_iter()
                                                        .map(|line| view! { <div>{line}</div> })
                                                        .collect_view()
                                                        .into_any()
                                                }}
                                            </dd>
                                        })
                                    })
                                    .collect_view();
                                view! {
                                    <section class="wizard__review-section">
                                        <h4>{step.title}</h4>
                                        <dl>{rows}</dl>
                                    </section>
                                }
                            })
                            .collect_view()
                    })
                })
            }}
        </div>
    }
}

fn set_value(session: RwSignal<WizardSession>, name: &'static str, value: FieldValue) {
    session.update(|s| {
        if let Err(e) = s.set_field(name, value) {
            log::error!("{}", e);
        }
    });
}

fn field_error(session: RwSignal<WizardSession>, key: String) -> impl IntoView {
    move || {
        session
            .with(|s| s.error(&key))
            .map(|message| view! { <div class="form__error">{message}</div> })
    }
}

fn render_field(
    field: &'static FieldSpec,
    session: RwSignal<WizardSession>,
    options: RwSignal<OptionsMap>,
) -> AnyView {
    let name = field.name;
    let placeholder = field.placeholder.unwrap_or("");
    let required = field.is_required();

    let control = match &field.input {
        InputKind::Text | InputKind::Email | InputKind::Phone => {
            let input_type = match field.input {
                InputKind::Email => "email",
                InputKind::Phone => "tel",
                _ => "text",
            };
            view! {
                <input
                    type=input_type
                    class="form__input"
                    id=name
                    placeholder=placeholder
                    prop:value=move || session.with(|s| s.form().text(name).to_string())
                    on:input=move |ev| set_value(session, name, FieldValue::text(event_target_value(&ev)))
                />
            }
            .into_any()
        }
        InputKind::TextArea => view! {
            <textarea
                class="form__textarea"
                id=name
                rows="3"
                placeholder=placeholder
                prop:value=move || session.with(|s| s.form().text(name).to_string())
                on:input=move |ev| set_value(session, name, FieldValue::text(event_target_value(&ev)))
            ></textarea>
        }
        .into_any(),
        InputKind::Number => view! {
            <NumberInput
                value=Signal::derive(move || session.with(|s| s.form().number(name)))
                on_change=Callback::new(move |n| set_value(session, name, FieldValue::Number(n)))
                placeholder=placeholder
            />
        }
        .into_any(),
        InputKind::Date => view! {
            <input
                type="date"
                class="form__input"
                id=name
                prop:value=move || session.with(|s| to_input_date(s.form().date(name)))
                on:change=move |ev| {
                    set_value(session, name, FieldValue::Date(parse_input_date(&event_target_value(&ev))))
                }
            />
        }
        .into_any(),
        InputKind::Checkbox => view! {
            <label class="form__checkbox">
                <input
                    type="checkbox"
                    id=name
                    prop:checked=move || session.with(|s| s.form().flag(name))
                    on:change=move |ev| set_value(session, name, FieldValue::Flag(event_target_checked(&ev)))
                />
                <span>{field.label}</span>
            </label>
        }
        .into_any(),
        InputKind::Select(source) => view! {
            <SelectInput
                source=*source
                options=options
                value=Signal::derive(move || session.with(|s| s.form().text(name).to_string()))
                on_change=Callback::new(move |v: String| set_value(session, name, FieldValue::Text(v)))
            />
        }
        .into_any(),
        InputKind::File { accept, multiple } => {
            let accept = *accept;
            let multiple = *multiple;
            view! {
                <input
                    type="file"
                    class="form__file"
                    id=name
                    accept=accept
                    multiple=multiple
                    on:change=move |ev| {
                        let Some(input) = ev
                            .target()
                            .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
                        else {
                            return;
                        };
                        set_value(session, name, FieldValue::Files(selected_files(&input)));
                    }
                />
                <ul class="form__file-list">
                    {move || {
                        session.with(|s| {
                            s.form()
                                .files(name)
                                .iter()
                                .map(|f| view! {
                                    <li>{icon("file")} " " {f.name.clone()} " (" {f.size_bytes / 1024} " KB)"</li>
                                })
                                .collect_view()
                        })
                    }}
                </ul>
            }
            .into_any()
        }
        InputKind::List { columns, add_label } => view! {
            <ListEditor
                name=name
                columns=columns.as_slice()
                add_label=*add_label
                session=session
                options=options
            />
        }
        .into_any(),
    };

    let show_label = !matches!(field.input, InputKind::Checkbox);
    view! {
        <div class=move || {
            if session.with(|s| s.errors().contains(name)) {
                "form__group form__group--invalid"
            } else {
                "form__group"
            }
        }>
            {show_label.then(|| view! {
                <label class="form__label" for=name>
                    {field.label}
                    {required.then(|| view! { <span class="form__required">" *"</span> })}
                </label>
            })}
            {control}
            {field_error(session, name.to_string())}
        </div>
    }
    .into_any()
}

fn selected_files(input: &HtmlInputElement) -> Vec<FileRef> {
    let Some(list) = input.files() else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.get(i))
        .map(|file| FileRef {
            name: file.name(),
            content_type: file.type_(),
            size_bytes: file.size() as u64,
        })
        .collect()
}

/// Number input keeping the raw text locally, so "1." or "0,5" survive while typing.
#[component]
fn NumberInput(
    #[prop(into)] value: Signal<Option<f64>>,
    on_change: Callback<Option<f64>>,
    #[prop(optional)] placeholder: &'static str,
) -> impl IntoView {
    let raw = RwSignal::new(value.get_untracked().map(format_number).unwrap_or_default());
    view! {
        <input
            type="text"
            inputmode="decimal"
            class="form__input form__input--number"
            placeholder=placeholder
            prop:value=move || raw.get()
            on:input=move |ev| {
                let text = event_target_value(&ev);
                on_change.run(parse_number_input(&text));
                raw.set(text);
            }
        />
    }
}

#[component]
fn SelectInput(
    source: OptionSource,
    options: RwSignal<OptionsMap>,
    #[prop(into)] value: Signal<String>,
    on_change: Callback<String>,
) -> impl IntoView {
    let status = move || match source {
        OptionSource::Static(_) => None,
        OptionSource::Remote(category) => options.with(|m| match m.get(category) {
            Some(OptionsLoad::Loading) | None => Some(("form__hint", "Loading options...".to_string())),
            Some(OptionsLoad::Failed(e)) => {
                Some(("form__error", format!("Could not load {}: {}", category, e)))
            }
            Some(OptionsLoad::Ready(list)) if list.is_empty() => {
                Some(("form__hint", format!("No {} available", category.replace('-', " "))))
            }
            Some(OptionsLoad::Ready(_)) => None,
        }),
    };

    view! {
        <select
            class="form__select"
            prop:value=move || value.get()
            on:change=move |ev| on_change.run(event_target_value(&ev))
        >
            <option value="">"Select..."</option>
            {move || {
                options.with(|m| resolve_options(source, m))
                    .into_iter()
                    .map(|o| {
                        let code = o.value.clone();
                        view! {
                            <option value=o.value selected=move || value.with(|v| *v == code)>
                                {o.label}
                            </option>
                        }
                    })
                    .collect_view()
            }}
        </select>
        {move || status().map(|(class, text)| view! { <div class=class>{text}</div> })}
    }
}

#[component]
fn ListEditor(
    name: &'static str,
    columns: &'static [ColumnSpec],
    add_label: &'static str,
    session: RwSignal<WizardSession>,
    options: RwSignal<OptionsMap>,
) -> impl IntoView {
    let row_count = Memo::new(move |_| session.with(|s| s.form().list(name).len()));

    let add_row = move |_| {
        session.update(|s| {
            if let Err(e) = s.append_entry(name) {
                log::error!("{}", e);
            }
        });
    };

    view! {
        <table class="form__list">
            <thead>
                <tr>
                    {columns.iter().map(|c| view! { <th>{c.label}</th> }).collect_view()}
                    <th></th>
                </tr>
            </thead>
            <tbody>
                {move || {
                    (0..row_count.get())
                        .map(|index| {
                            let cells = columns
                                .iter()
                                .map(|column| list_cell(name, index, column, session, options))
                                .collect_view();
                            view! {
                                <tr>
                                    {cells}
                                    <td>
                                        <button
                                            class="form__list-remove"
                                            title="Remove"
                                            on:click=move |_| {
                                                session.update(|s| {
                                                    if let Err(e) = s.remove_entry(name, index) {
                                                        log::error!("{}", e);
                                                    }
                                                })
                                            }
                                        >
                                            {icon("trash")}
                                        </button>
                                    </td>
                                </tr>
                            }
                        })
                        .collect_view()
                }}
            </tbody>
        </table>
        <Button appearance=ButtonAppearance::Subtle on_click=add_row>
            {icon("plus")}
            " "
            {add_label}
        </Button>
    }
}

fn list_cell(
    name: &'static str,
    index: usize,
    column: &'static ColumnSpec,
    session: RwSignal<WizardSession>,
    options: RwSignal<OptionsMap>,
) -> AnyView {
    let col = column.name;
    let cell = move || {
        session.with(|s| {
            s.form()
                .list(name)
                .get(index)
                .and_then(|entry| entry.get(col).cloned())
        })
    };
    let set_cell = move |value: FieldValue| {
        session.update(|s| {
            if let Err(e) = s.set_entry_field(name, index, col, value) {
                log::error!("{}", e);
            }
        });
    };

    let control = match column.input {
        ColumnInput::Text => view! {
            <input
                type="text"
                class="form__input"
                prop:value=move || cell().and_then(|v| v.as_text().map(str::to_string)).unwrap_or_default()
                on:input=move |ev| set_cell(FieldValue::text(event_target_value(&ev)))
            />
        }
        .into_any(),
        ColumnInput::Number => view! {
            <NumberInput
                value=Signal::derive(move || cell().and_then(|v| v.as_number()))
                on_change=Callback::new(move |n| set_cell(FieldValue::Number(n)))
            />
        }
        .into_any(),
        ColumnInput::Select(source) => view! {
            <SelectInput
                source=source
                options=options
                value=Signal::derive(move || {
                    cell().and_then(|v| v.as_text().map(str::to_string)).unwrap_or_default()
                })
                on_change=Callback::new(move |v: String| set_cell(FieldValue::Text(v)))
            />
        }
        .into_any(),
    };

    let key = entry_path(name, index, col);
    view! {
        <td>
            {control}
            {field_error(session, key)}
        </td>
    }
    .into_any()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::wizard::form_state::Entry;

    #[test]
    fn test_parse_number_input() {
        assert_eq!(parse_number_input(""), None);
        assert_eq!(parse_number_input("  "), None);
        assert_eq!(parse_number_input("0"), Some(0.0));
        assert_eq!(parse_number_input("12.5"), Some(12.5));
        assert_eq!(parse_number_input("0,75"), Some(0.75));
        assert_eq!(parse_number_input("abc"), None);
        assert_eq!(parse_number_input("inf"), None);
    }

    #[test]
    fn test_select_label_uses_loaded_options() {
        let mut options = OptionsMap::new();
        options.insert(
            "mills",
            OptionsLoad::Ready(vec![SelectOption::new("m2", "Shamva Mill")]),
        );
        assert_eq!(select_label(OptionSource::Remote("mills"), "m2", &options), "Shamva Mill");
        assert_eq!(select_label(OptionSource::Remote("mills"), "m9", &options), "m9");
        assert_eq!(select_label(OptionSource::Remote("shafts"), "s1", &options), "s1");
    }

    #[test]
    fn test_summary_uses_option_labels_and_skips_blank_rows() {
        static KINDS: &[(&str, &str)] = &[("vat", "Value added tax")];
        let field = FieldSpec::new(
            "taxes",
            "Taxes",
            InputKind::List {
                columns: vec![
                    ColumnSpec::select("type", "Type", OptionSource::Static(KINDS)),
                    ColumnSpec::number("rate", "Rate"),
                ],
                add_label: "Add tax",
            },
        );
        let mut filled = Entry::new();
        filled.insert("type".into(), FieldValue::text("vat"));
        filled.insert("rate".into(), FieldValue::number(15.0));
        let mut blank = Entry::new();
        blank.insert("type".into(), FieldValue::text(""));
        blank.insert("rate".into(), FieldValue::number(0.0));

        let lines = summary_lines(
            &field,
            &FieldValue::List(vec![filled, blank]),
            &OptionsMap::new(),
        );
        assert_eq!(lines, vec!["Type: Value added tax, Rate: 15".to_string()]);
    }

    #[test]
    fn test_remote_select_falls_back_to_code_until_loaded() {
        let field = FieldSpec::new("mill_id", "Mill", InputKind::Select(OptionSource::Remote("mills")));
        let value = FieldValue::text("m-7");
        assert_eq!(summary_lines(&field, &value, &OptionsMap::new()), vec!["m-7"]);

        let mut loaded = OptionsMap::new();
        loaded.insert("mills", OptionsLoad::Ready(vec![SelectOption::new("m-7", "Shamva Mill")]));
        assert_eq!(summary_lines(&field, &value, &loaded), vec!["Shamva Mill"]);
    }
}
