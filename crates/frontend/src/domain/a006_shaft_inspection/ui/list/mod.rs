use crate::domain::a006_shaft_inspection::api;
use crate::domain::a006_shaft_inspection::wizard::SHAFT_INSPECTION_WIZARD;
use crate::shared::api::use_api_client;
use crate::shared::components::pagination_controls::PaginationControls;
use crate::shared::components::record_details::{
    open_record_details, optional_value, status_badge_class, DetailRows,
};
use crate::shared::date_utils::{format_date, format_datetime};
use crate::shared::icons::icon;
use crate::shared::list_utils::{
    any_contains, compare_text, ListState, SearchInput, Searchable, SortHeader, Sortable,
    PAGE_SIZE_OPTIONS,
};
use crate::shared::modal_stack::use_modal_stack;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_LIST;
use crate::shared::wizard::open_wizard_dialog;
use contracts::domain::a006_shaft_inspection::{ShaftCondition, ShaftInspection};
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::cmp::Ordering;
use thaw::*;

impl Searchable for ShaftInspection {
    fn matches_filter(&self, filter: &str) -> bool {
        any_contains(
            filter,
            &[
                &self.shaft_name,
                &self.inspector_name,
                self.condition.label(),
                self.recommended_status.label(),
            ],
        )
    }
}

impl Sortable for ShaftInspection {
    fn compare_by_field(&self, other: &Self, field: &str) -> Ordering {
        match field {
            "shaft_name" => compare_text(&self.shaft_name, &other.shaft_name),
            "inspector_name" => compare_text(&self.inspector_name, &other.inspector_name),
            // Declaration order runs from best to worst
            "condition" => (self.condition as u8).cmp(&(other.condition as u8)),
            "recommended_status" => compare_text(
                self.recommended_status.label(),
                other.recommended_status.label(),
            ),
            _ => self.inspection_date.cmp(&other.inspection_date),
        }
    }
}

fn condition_badge_class(condition: ShaftCondition) -> &'static str {
    match condition {
        ShaftCondition::Good => "badge badge--success",
        ShaftCondition::Fair => "badge badge--neutral",
        ShaftCondition::Poor => "badge badge--warning",
        ShaftCondition::Critical => "badge badge--error",
    }
}

fn detail_rows(i: &ShaftInspection) -> DetailRows {
    vec![
        ("Shaft", i.shaft_name.clone()),
        ("Inspection date", format_date(&i.inspection_date)),
        ("Inspector", i.inspector_name.clone()),
        ("Condition", i.condition.label().to_string()),
        ("Recommended status", i.recommended_status.label().to_string()),
        ("Reason", optional_value(i.status_reason.as_deref())),
        ("Filed", format_datetime(&i.created_at)),
    ]
}

#[component]
pub fn ShaftInspectionList() -> impl IntoView {
    let client = use_api_client();
    let modal_stack = use_modal_stack();
    let state = RwSignal::new(ListState::<ShaftInspection>::new("inspection_date", false));
    let all_items: RwSignal<Vec<ShaftInspection>> = RwSignal::new(Vec::new());
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
            match api::fetch_inspections(client.as_ref()).await {
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
        <PageFrame page_id="a006_shaft_inspection--list" category=PAGE_CAT_LIST>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Shaft inspections"</h1>
                    <Badge>{move || state.with(|s| s.total_count).to_string()}</Badge>
                </div>
                <div class="page__header-right">
                    <Button
                        appearance=ButtonAppearance::Primary
                        on_click=move |_| {
                            open_wizard_dialog(modal_stack, &SHAFT_INSPECTION_WIZARD, Callback::new(move |_| reload()))
                        }
                    >
                        {icon("plus")}
                        " New inspection"
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
                                placeholder="Shaft, inspector, condition..."
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
                                <TableHeaderCell min_width=160.0>
                                    <SortHeader label="Shaft" field="shaft_name" sort_field=sort_field ascending=ascending on_sort=on_sort />
                                </TableHeaderCell>
                                <TableHeaderCell min_width=100.0>
                                    <SortHeader label="Date" field="inspection_date" sort_field=sort_field ascending=ascending on_sort=on_sort />
                                </TableHeaderCell>
                                <TableHeaderCell min_width=150.0>
                                    <SortHeader label="Inspector" field="inspector_name" sort_field=sort_field ascending=ascending on_sort=on_sort />
                                </TableHeaderCell>
                                <TableHeaderCell min_width=100.0>
                                    <SortHeader label="Condition" field="condition" sort_field=sort_field ascending=ascending on_sort=on_sort />
                                </TableHeaderCell>
                                <TableHeaderCell min_width=130.0>
                                    <SortHeader label="Recommended" field="recommended_status" sort_field=sort_field ascending=ascending on_sort=on_sort />
                                </TableHeaderCell>
                            </TableRow>
                        </TableHeader>
                        <TableBody>
                            <For
                                each=move || state.with(|s| s.items.clone())
                                key=|item| item.id.clone()
                                children=move |item| {
                                    let rows = detail_rows(&item);
                                    let title = format!(
                                        "{} inspection, {}",
                                        item.shaft_name,
                                        format_date(&item.inspection_date),
                                    );
                                    view! {
                                        <TableRow>
                                            <TableCell>
                                                <TableCellLayout truncate=true>
                                                    <a
                                                        href="#"
                                                        class="table__link"
                                                        on:click=move |ev| {
                                                            ev.prevent_default();
                                                            open_record_details(modal_stack, title.clone(), rows.clone());
                                                        }
                                                    >
                                                        {item.shaft_name.clone()}
                                                    </a>
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>{format_date(&item.inspection_date)}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout truncate=true>{item.inspector_name.clone()}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>
                                                    <span class=condition_badge_class(item.condition)>
                                                        {item.condition.label()}
                                                    </span>
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>
                                                    <span class=status_badge_class(item.recommended_status.code())>
                                                        {item.recommended_status.label()}
                                                    </span>
                                                </TableCellLayout>
                                            </TableCell>
                                        </TableRow>
                                    }
                                }
                            />
                        </TableBody>
                    </Table>
                    <Show when=move || state.with(|s| s.is_loaded && s.total_count == 0)>
                        <div class="table__empty">"No inspections filed"</div>
                    </Show>
                </div>
            </div>
        </PageFrame>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a006_shaft_inspection::ShaftStatus;

    fn inspection(condition: ShaftCondition) -> ShaftInspection {
        ShaftInspection {
            id: "si-1".to_string(),
            shaft_name: "Number 3".to_string(),
            inspection_date: "2024-04-02".to_string(),
            inspector_name: "P. Moyo".to_string(),
            condition,
            recommended_status: ShaftStatus::Active,
            status_reason: None,
            created_at: "2024-04-02T10:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_condition_sorts_by_severity() {
        let good = inspection(ShaftCondition::Good);
        let critical = inspection(ShaftCondition::Critical);
        assert_eq!(good.compare_by_field(&critical, "condition"), Ordering::Less);
    }

    #[test]
    fn test_detail_rows_show_missing_reason_as_dash() {
        let rows = detail_rows(&inspection(ShaftCondition::Fair));
        assert!(rows.contains(&("Reason", "-".to_string())));
    }
}
