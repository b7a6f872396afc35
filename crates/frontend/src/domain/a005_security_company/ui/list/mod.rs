use crate::domain::a005_security_company::api;
use crate::domain::a005_security_company::wizard::SECURITY_COMPANY_WIZARD;
use crate::shared::api::use_api_client;
use crate::shared::components::pagination_controls::PaginationControls;
use crate::shared::components::record_details::{
    open_record_details, optional_value, status_badge_class, DetailRows,
};
use crate::shared::date_utils::{format_date, format_datetime, parse_input_date};
use crate::shared::icons::icon;
use crate::shared::list_utils::{
    any_contains, compare_text, ListState, SearchInput, Searchable, SortHeader, Sortable,
    PAGE_SIZE_OPTIONS,
};
use crate::shared::modal_stack::use_modal_stack;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_LIST;
use crate::shared::wizard::open_wizard_dialog;
use chrono::NaiveDate;
use contracts::domain::a005_security_company::SecurityCompany;
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::cmp::Ordering;
use thaw::*;

impl Searchable for SecurityCompany {
    fn matches_filter(&self, filter: &str) -> bool {
        any_contains(
            filter,
            &[
                &self.name,
                &self.license_number,
                &self.contact_person,
                self.email.as_deref().unwrap_or(""),
            ],
        )
    }
}

impl Sortable for SecurityCompany {
    fn compare_by_field(&self, other: &Self, field: &str) -> Ordering {
        match field {
            "license_number" => compare_text(&self.license_number, &other.license_number),
            "license_expiry" => self.license_expiry.cmp(&other.license_expiry),
            "contact_person" => compare_text(&self.contact_person, &other.contact_person),
            "guards_count" => self.guards_count.cmp(&other.guards_count),
            "status" => compare_text(&self.status, &other.status),
            _ => compare_text(&self.name, &other.name),
        }
    }
}

/// Licence expired before `today`. Unparsable dates are not flagged.
fn is_license_expired(expiry: &str, today: NaiveDate) -> bool {
    expiry
        .get(..10)
        .and_then(parse_input_date)
        .map_or(false, |d| d < today)
}

fn detail_rows(c: &SecurityCompany) -> DetailRows {
    vec![
        ("Name", c.name.clone()),
        ("Licence number", c.license_number.clone()),
        ("Licence expiry", format_date(&c.license_expiry)),
        ("Contact person", c.contact_person.clone()),
        ("Email", optional_value(c.email.as_deref())),
        ("Guards", c.guards_count.to_string()),
        ("Status", c.status.clone()),
        ("Onboarded", format_datetime(&c.created_at)),
    ]
}

#[component]
pub fn SecurityCompanyList() -> impl IntoView {
    let client = use_api_client();
    let modal_stack = use_modal_stack();
    let state = RwSignal::new(ListState::<SecurityCompany>::new("name", true));
    let all_items: RwSignal<Vec<SecurityCompany>> = RwSignal::new(Vec::new());
    let (error, set_error) = signal::<Option<String>>(None);
    let (loading, set_loading) = signal(false);
    let today = chrono::Local::now().date_naive();

    let refresh_view = move || {
        all_items.with_untracked(|all| state.update(|s| s.refresh(all)));
    };

    let load_data = StoredValue::new(move || {
        set_loading.set(true);
        set_error.set(None);
        let client = client.clone();
        spawn_local(async move {
            match api::fetch_security_companies(client.as_ref()).await {
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
        <PageFrame page_id="a005_security_company--list" category=PAGE_CAT_LIST>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Security companies"</h1>
                    <Badge>{move || state.with(|s| s.total_count).to_string()}</Badge>
                </div>
                <div class="page__header-right">
                    <Button
                        appearance=ButtonAppearance::Primary
                        on_click=move |_| {
                            open_wizard_dialog(modal_stack, &SECURITY_COMPANY_WIZARD, Callback::new(move |_| reload()))
                        }
                    >
                        {icon("plus")}
                        " Onboard company"
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
                                placeholder="Name, licence, contact..."
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
                                <TableHeaderCell min_width=180.0>
                                    <SortHeader label="Name" field="name" sort_field=sort_field ascending=ascending on_sort=on_sort />
                                </TableHeaderCell>
                                <TableHeaderCell min_width=120.0>
                                    <SortHeader label="Licence" field="license_number" sort_field=sort_field ascending=ascending on_sort=on_sort />
                                </TableHeaderCell>
                                <TableHeaderCell min_width=110.0>
                                    <SortHeader label="Expiry" field="license_expiry" sort_field=sort_field ascending=ascending on_sort=on_sort />
                                </TableHeaderCell>
                                <TableHeaderCell min_width=150.0>
                                    <SortHeader label="Contact" field="contact_person" sort_field=sort_field ascending=ascending on_sort=on_sort />
                                </TableHeaderCell>
                                <TableHeaderCell min_width=80.0>
                                    <SortHeader label="Guards" field="guards_count" sort_field=sort_field ascending=ascending on_sort=on_sort />
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
                                    let title = item.name.clone();
                                    let expired = is_license_expired(&item.license_expiry, today);
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
                                                        {item.name.clone()}
                                                    </a>
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>{item.license_number.clone()}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>
                                                    <span class:text--error=expired>{format_date(&item.license_expiry)}</span>
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout truncate=true>{item.contact_person.clone()}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>{item.guards_count.to_string()}</TableCellLayout>
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
                        <div class="table__empty">"No security companies onboarded"</div>
                    </Show>
                </div>
            </div>
        </PageFrame>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_license_expiry_check() {
        let today = NaiveDate::from_ymd_opt(2024, 9, 1).unwrap();
        assert!(is_license_expired("2024-08-31", today));
        assert!(!is_license_expired("2024-09-01T00:00:00Z", today));
        assert!(!is_license_expired("soon", today));
    }
}
