use crate::domain::a003_incident::api;
use crate::domain::a003_incident::wizard::INCIDENT_WIZARD;
use crate::shared::api::use_api_client;
use crate::shared::components::pagination_controls::PaginationControls;
use crate::shared::components::record_details::{
    open_record_details, optional_value, status_badge_class, DetailRows,
};
use crate::shared::date_utils::{format_date, format_datetime};
use crate::shared::icons::icon;
use crate::shared::list_utils::{
    any_contains, compare_f64, compare_text, ListState, SearchInput, Searchable, SortHeader,
    Sortable, PAGE_SIZE_OPTIONS,
};
use crate::shared::modal_stack::use_modal_stack;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_LIST;
use crate::shared::wizard::open_wizard_dialog;
use contracts::domain::a003_incident::Incident;
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::cmp::Ordering;
use thaw::*;

impl Searchable for Incident {
    fn matches_filter(&self, filter: &str) -> bool {
        any_contains(
            filter,
            &[
                &self.reference,
                self.incident_type.label(),
                &self.location,
                self.contravention_code.as_deref().unwrap_or(""),
                &self.status,
            ],
        ) || self
            .persons
            .iter()
            .any(|p| p.full_name.to_lowercase().contains(filter))
    }
}

impl Sortable for Incident {
    fn compare_by_field(&self, other: &Self, field: &str) -> Ordering {
        match field {
            "reference" => compare_text(&self.reference, &other.reference),
            "incident_type" => compare_text(self.incident_type.label(), other.incident_type.label()),
            "location" => compare_text(&self.location, &other.location),
            "persons" => self.persons.len().cmp(&other.persons.len()),
            "penalty_amount" => compare_f64(
                self.penalty_amount.unwrap_or(0.0),
                other.penalty_amount.unwrap_or(0.0),
            ),
            "status" => compare_text(&self.status, &other.status),
            _ => self.incident_date.cmp(&other.incident_date),
        }
    }
}

fn detail_rows(i: &Incident) -> DetailRows {
    let persons = i
        .persons
        .iter()
        .map(|p| format!("{} ({})", p.full_name, p.role))
        .collect::<Vec<_>>()
        .join(", ");
    vec![
        ("Reference", i.reference.clone()),
        ("Type", i.incident_type.label().to_string()),
        ("Date", format_date(&i.incident_date)),
        ("Location", i.location.clone()),
        ("Persons involved", persons),
        ("Contravention code", optional_value(i.contravention_code.as_deref())),
        (
            "Penalty",
            i.penalty_amount.map(|p| format!("{:.2}", p)).unwrap_or_default(),
        ),
        ("Status", i.status.clone()),
        ("Created", format_datetime(&i.created_at)),
    ]
}

#[component]
pub fn IncidentList() -> impl IntoView {
    let client = use_api_client();
    let modal_stack = use_modal_stack();
    let state = RwSignal::new(ListState::<Incident>::new("incident_date", false));
    let all_items: RwSignal<Vec<Incident>> = RwSignal::new(Vec::new());
    let (error, set_error) = signal::<Option<String>>(None);
    let (loading, set_loading) = signal(false);

    let refresh_view = move || {
        all_items.with_untracked(|all| state.update(|s| s.refresh(all)));
    };

    let load_data = StoredValue::new(move || {
        set_loading.set(true);
        set_error.set(None);
        let client = client.clone();
        spawn_local(async move {
            match api::fetch_incidents(client.as_ref()).await {
                Ok(data) => {
                    all_items.set(data);
                    state.update(|s| s.is_loaded = true);
                    refresh_view();
                }
                Err(e) => set_error.set(Some(e)),
            }
            set_loading.set(false);
        });
    });
    let reload = move || load_data.with_value(|f| f());

    Effect::new(move |_| {
        if !state.with_untracked(|s| s.is_loaded) {
            reload();
        }
    });

    let on_search = Callback::new(move |query: String| {
        state.update(|s| {
            s.search_query = query;
            s.page = 0;
        });
        refresh_view();
    });
    let on_sort = Callback::new(move |field: &'static str| {
        state.update(|s| s.toggle_sort(field));
        refresh_view();
    });

    let sort_field = Signal::derive(move || state.with(|s| s.sort_field.clone()));
    let ascending = Signal::derive(move || state.with(|s| s.sort_ascending));

    view! {
        <PageFrame page_id="a003_incident--list" category=PAGE_CAT_LIST>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Incidents & penalties"</h1>
                    <Badge>{move || state.with(|s| s.total_count).to_string()}</Badge>
                </div>
                <div class="page__header-right">
                    <Button
                        appearance=ButtonAppearance::Primary
                        on_click=move |_| {
                            open_wizard_dialog(modal_stack, &INCIDENT_WIZARD, Callback::new(move |_| reload()))
                        }
                    >
                        {icon("plus")}
                        " Report incident"
                    </Button>
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| reload()
                        disabled=Signal::derive(move || loading.get())
                    >
                        {icon("refresh")}
                        {move || if loading.get() { " Loading..." } else { " Refresh" }}
                    </Button>
                </div>
            </div>

            <div class="page__content">
                {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}

                <div class="filter-panel">
                    <div class="filter-panel-header">
                        <div class="filter-panel-header__left">
                            {icon("filter")}
                            <SearchInput
                                value=Signal::derive(move || state.with(|s| s.search_query.clone()))
                                on_change=on_search
                                placeholder="Reference, type, person, code..."
                            />
                        </div>
                        <div class="filter-panel-header__center">
                            <PaginationControls
                                current_page=Signal::derive(move || state.with(|s| s.page))
                                total_pages=Signal::derive(move || state.with(|s| s.total_pages))
                                total_count=Signal::derive(move || state.with(|s| s.total_count))
                                page_size=Signal::derive(move || state.with(|s| s.page_size))
                                on_page_change=Callback::new(move |page| {
                                    state.update(|s| s.page = page);
                                    refresh_view();
                                })
                                on_page_size_change=Callback::new(move |size| {
                                    state.update(|s| s.set_page_size(size));
                                    refresh_view();
                                })
                                page_size_options=PAGE_SIZE_OPTIONS.to_vec()
                            />
                        </div>
                    </div>
                </div>

                <div class="table-wrapper">
                    <Table attr:style="width: 100%;">
                        <TableHeader>
                            <TableRow>
                                <TableHeaderCell min_width=110.0>
                                    <SortHeader label="Reference" field="reference" sort_field=sort_field ascending=ascending on_sort=on_sort />
                                </TableHeaderCell>
                                <TableHeaderCell min_width=100.0>
                                    <SortHeader label="Date" field="incident_date" sort_field=sort_field ascending=ascending on_sort=on_sort />
                                </TableHeaderCell>
                                <TableHeaderCell min_width=140.0>
                                    <SortHeader label="Type" field="incident_type" sort_field=sort_field ascending=ascending on_sort=on_sort />
                                </TableHeaderCell>
                                <TableHeaderCell min_width=140.0>
                                    <SortHeader label="Location" field="location" sort_field=sort_field ascending=ascending on_sort=on_sort />
                                </TableHeaderCell>
                                <TableHeaderCell min_width=80.0>
                                    <SortHeader label="Persons" field="persons" sort_field=sort_field ascending=ascending on_sort=on_sort />
                                </TableHeaderCell>
                                <TableHeaderCell min_width=100.0>
                                    <SortHeader label="Penalty" field="penalty_amount" sort_field=sort_field ascending=ascending on_sort=on_sort />
                                </TableHeaderCell>
                                <TableHeaderCell min_width=100.0>
                                    <SortHeader label="Status" field="status" sort_field=sort_field ascending=ascending on_sort=on_sort />
                                </TableHeaderCell>
                            </TableRow>
                        </TableHeader>
                        <TableBody>
                            <For
                                each=move || state.with(|s| s.items.clone())
                                key=|item| item.id.clone()
                                children=move |item| {
                                    let rows = detail_rows(&item);
                                    let title = format!("Incident {}", item.reference);
                                    view! {
                                        <TableRow>
                                            <TableCell>
                                                <TableCellLayout>
                                                    <a
                                                        href="#"
                                                        class="table__link"
                                                        on:click=move |ev| {
                                                            ev.prevent_default();
                                                            open_record_details(modal_stack, title.clone(), rows.clone());
                                                        }
                                                    >
                                                        {item.reference.clone()}
                                                    </a>
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>{format_date(&item.incident_date)}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>
                                                    <span
                                                        class="badge"
                                                        class:badge--error=item.incident_type.is_penalisable()
                                                        class:badge--neutral=!item.incident_type.is_penalisable()
                                                    >
                                                        {item.incident_type.label()}
                                                    </span>
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout truncate=true>{item.location.clone()}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>{item.persons.len().to_string()}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>
                                                    {item.penalty_amount.map(|p| format!("{:.2}", p)).unwrap_or_else(|| "-".to_string())}
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>
                                                    <span class=status_badge_class(&item.status)>{item.status.clone()}</span>
                                                </TableCellLayout>
                                            </TableCell>
                                        </TableRow>
                                    }
                                }
                            />
                        </TableBody>
                    </Table>
                    <Show when=move || state.with(|s| s.is_loaded && s.total_count == 0)>
                        <div class="table__empty">"No incidents recorded"</div>
                    </Show>
                </div>
            </div>
        </PageFrame>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::list_utils::filter_list;
    use contracts::domain::a003_incident::{IncidentType, PersonInvolvedDto};

    fn incident(reference: &str, person: &str) -> Incident {
        Incident {
            id: reference.to_lowercase(),
            reference: reference.to_string(),
            incident_type: IncidentType::Theft,
            incident_date: "2024-02-01".to_string(),
            location: "Level 4".to_string(),
            persons: vec![PersonInvolvedDto {
                full_name: person.to_string(),
                role: "suspect".to_string(),
                id_number: None,
            }],
            contravention_code: None,
            penalty_amount: None,
            status: "open".to_string(),
            created_at: "2024-02-01T06:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_search_finds_involved_person() {
        let rows = vec![incident("INC-1", "Tendai Chari"), incident("INC-2", "Peter Ndlovu")];
        let found = filter_list(rows, "ndlovu");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].reference, "INC-2");
    }
}
