use crate::domain::a001_ore_intake::api;
use crate::domain::a001_ore_intake::ui::details::OreIntakeDetails;
use crate::domain::a001_ore_intake::wizard::ORE_INTAKE_WIZARD;
use crate::shared::api::use_api_client;
use crate::shared::components::pagination_controls::PaginationControls;
use crate::shared::date_utils::format_date;
use crate::shared::icons::icon;
use crate::shared::list_utils::{
    any_contains, compare_f64, compare_text, ListState, SearchInput, Searchable, SortHeader,
    Sortable, PAGE_SIZE_OPTIONS,
};
use crate::shared::modal_stack::use_modal_stack;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_LIST;
use crate::shared::wizard::form_state::format_number;
use crate::shared::wizard::open_wizard_dialog;
use contracts::domain::a001_ore_intake::{OreIntake, SampleStatus};
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::cmp::Ordering;
use thaw::*;

impl Searchable for OreIntake {
    fn matches_filter(&self, filter: &str) -> bool {
        any_contains(
            filter,
            &[
                &self.reference,
                &self.company_name,
                &self.shaft_name,
                &self.ore_type,
                &self.vehicle_reg,
                self.mill_name.as_deref().unwrap_or(""),
            ],
        )
    }
}

impl Sortable for OreIntake {
    fn compare_by_field(&self, other: &Self, field: &str) -> Ordering {
        match field {
            "reference" => compare_text(&self.reference, &other.reference),
            "company_name" => compare_text(&self.company_name, &other.company_name),
            "shaft_name" => compare_text(&self.shaft_name, &other.shaft_name),
            "ore_type" => compare_text(&self.ore_type, &other.ore_type),
            "tonnage" => compare_f64(self.tonnage, other.tonnage),
            "sample_status" => compare_text(self.sample_status.label(), other.sample_status.label()),
            "mill_name" => compare_text(
                self.mill_name.as_deref().unwrap_or(""),
                other.mill_name.as_deref().unwrap_or(""),
            ),
            _ => self.intake_date.cmp(&other.intake_date),
        }
    }
}

fn sample_badge_class(status: SampleStatus) -> &'static str {
    match status {
        SampleStatus::Pending => "badge badge--warning",
        SampleStatus::Approved => "badge badge--success",
        SampleStatus::Rejected => "badge badge--error",
    }
}

#[component]
pub fn OreIntakeList() -> impl IntoView {
    let client = use_api_client();
    let modal_stack = use_modal_stack();
    let state = RwSignal::new(ListState::<OreIntake>::new("intake_date", false));
    let all_items: RwSignal<Vec<OreIntake>> = RwSignal::new(Vec::new());
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
            match api::fetch_intakes(client.as_ref()).await {
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
    let go_to_page = move |page: usize| {
        state.update(|s| s.page = page);
        refresh_view();
    };
    let change_page_size = move |size: usize| {
        state.update(|s| s.set_page_size(size));
        refresh_view();
    };

    let open_new = move || {
        open_wizard_dialog(
            modal_stack,
            &ORE_INTAKE_WIZARD,
            Callback::new(move |_| reload()),
        );
    };

    let open_details = move |id: String| {
        modal_stack.push_with_frame(
            Some("width: min(720px, 95vw);".to_string()),
            Some("ore-intake-details-modal".to_string()),
            move |handle| {
                let on_close = Callback::new(move |_| handle.close());
                view! {
                    <OreIntakeDetails
                        id=id.clone()
                        on_changed=Callback::new(move |_| reload())
                        on_close=on_close
                    />
                }
                .into_any()
            },
        );
    };

    let sort_field = Signal::derive(move || state.with(|s| s.sort_field.clone()));
    let ascending = Signal::derive(move || state.with(|s| s.sort_ascending));

    view! {
        <PageFrame page_id="a001_ore_intake--list" category=PAGE_CAT_LIST>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Ore intakes"</h1>
                    <Badge>{move || state.with(|s| s.total_count).to_string()}</Badge>
                </div>
                <div class="page__header-right">
                    <Button appearance=ButtonAppearance::Primary on_click=move |_| open_new()>
                        {icon("plus")}
                        " New intake"
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
                                placeholder="Reference, company, shaft, vehicle..."
                            />
                        </div>
                        <div class="filter-panel-header__center">
                            <PaginationControls
                                current_page=Signal::derive(move || state.with(|s| s.page))
                                total_pages=Signal::derive(move || state.with(|s| s.total_pages))
                                total_count=Signal::derive(move || state.with(|s| s.total_count))
                                page_size=Signal::derive(move || state.with(|s| s.page_size))
                                on_page_change=Callback::new(go_to_page)
                                on_page_size_change=Callback::new(change_page_size)
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
                                    <SortHeader label="Date" field="intake_date" sort_field=sort_field ascending=ascending on_sort=on_sort />
                                </TableHeaderCell>
                                <TableHeaderCell min_width=160.0>
                                    <SortHeader label="Company" field="company_name" sort_field=sort_field ascending=ascending on_sort=on_sort />
                                </TableHeaderCell>
                                <TableHeaderCell min_width=120.0>
                                    <SortHeader label="Shaft" field="shaft_name" sort_field=sort_field ascending=ascending on_sort=on_sort />
                                </TableHeaderCell>
                                <TableHeaderCell min_width=100.0>
                                    <SortHeader label="Ore type" field="ore_type" sort_field=sort_field ascending=ascending on_sort=on_sort />
                                </TableHeaderCell>
                                <TableHeaderCell min_width=90.0>
                                    <SortHeader label="Tonnage" field="tonnage" sort_field=sort_field ascending=ascending on_sort=on_sort />
                                </TableHeaderCell>
                                <TableHeaderCell min_width=100.0>
                                    <SortHeader label="Sample" field="sample_status" sort_field=sort_field ascending=ascending on_sort=on_sort />
                                </TableHeaderCell>
                                <TableHeaderCell min_width=120.0>
                                    <SortHeader label="Mill" field="mill_name" sort_field=sort_field ascending=ascending on_sort=on_sort />
                                </TableHeaderCell>
                            </TableRow>
                        </TableHeader>
                        <TableBody>
                            <For
                                each=move || state.with(|s| s.items.clone())
                                key=|item| item.id.clone()
                                children=move |item| {
                                    let id = item.id.clone();
                                    view! {
                                        <TableRow>
                                            <TableCell>
                                                <TableCellLayout>
                                                    <a
                                                        href="#"
                                                        class="table__link"
                                                        on:click=move |ev| {
                                                            ev.prevent_default();
                                                            open_details(id.clone());
                                                        }
                                                    >
                                                        {item.reference.clone()}
                                                    </a>
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>{format_date(&item.intake_date)}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout truncate=true>{item.company_name.clone()}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout truncate=true>{item.shaft_name.clone()}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>{item.ore_type.clone()}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>{format_number(item.tonnage)}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>
                                                    <span class=sample_badge_class(item.sample_status)>
                                                        {item.sample_status.label()}
                                                    </span>
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout truncate=true>
                                                    {item.mill_name.clone().unwrap_or_else(|| "-".to_string())}
                                                </TableCellLayout>
                                            </TableCell>
                                        </TableRow>
                                    }
                                }
                            />
                        </TableBody>
                    </Table>
                    <Show when=move || state.with(|s| s.is_loaded && s.total_count == 0)>
                        <div class="table__empty">"No ore intakes found"</div>
                    </Show>
                </div>
            </div>
        </PageFrame>
    }
}
