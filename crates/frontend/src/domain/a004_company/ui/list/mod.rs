use crate::domain::a004_company::api;
use crate::domain::a004_company::wizard::COMPANY_WIZARD;
use crate::shared::api::use_api_client;
use crate::shared::components::pagination_controls::PaginationControls;
use crate::shared::components::record_details::{
    open_record_details, optional_value, status_badge_class, DetailRows,
};
use crate::shared::date_utils::format_datetime;
use crate::shared::icons::icon;
use crate::shared::list_utils::{
    any_contains, compare_text, ListState, SearchInput, Searchable, SortHeader, Sortable,
    PAGE_SIZE_OPTIONS,
};
use crate::shared::modal_stack::use_modal_stack;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_LIST;
use crate::shared::wizard::open_wizard_dialog;
use contracts::domain::a004_company::Company;
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::cmp::Ordering;
use thaw::*;

impl Searchable for Company {
    fn matches_filter(&self, filter: &str) -> bool {
        any_contains(
            filter,
            &[
                &self.name,
                &self.registration_number,
                &self.company_type,
                self.email.as_deref().unwrap_or(""),
                self.phone.as_deref().unwrap_or(""),
            ],
        )
    }
}

impl Sortable for Company {
    fn compare_by_field(&self, other: &Self, field: &str) -> Ordering {
        match field {
            "registration_number" => {
                compare_text(&self.registration_number, &other.registration_number)
            }
            "company_type" => compare_text(&self.company_type, &other.company_type),
            "email" => compare_text(
                self.email.as_deref().unwrap_or(""),
                other.email.as_deref().unwrap_or(""),
            ),
            "status" => compare_text(&self.status, &other.status),
            "created_at" => self.created_at.cmp(&other.created_at),
            _ => compare_text(&self.name, &other.name),
        }
    }
}

fn detail_rows(c: &Company) -> DetailRows {
    vec![
        ("Name", c.name.clone()),
        ("Registration number", c.registration_number.clone()),
        ("Type", c.company_type.clone()),
        ("Email", optional_value(c.email.as_deref())),
        ("Phone", optional_value(c.phone.as_deref())),
        ("Status", c.status.clone()),
        ("Registered", format_datetime(&c.created_at)),
    ]
}

#[component]
pub fn CompanyList() -> impl IntoView {
    let client = use_api_client();
    let modal_stack = use_modal_stack();
    let state = RwSignal::new(ListState::<Company>::new("name", true));
    let all_items: RwSignal<Vec<Company>> = RwSignal::new(Vec::new());
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
            match api::fetch_companies(client.as_ref()).await {
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
        <PageFrame page_id="a004_company--list" category=PAGE_CAT_LIST>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Companies"</h1>
                    <Badge>{move || state.with(|s| s.total_count).to_string()}</Badge>
                </div>
                <div class="page__header-right">
                    <Button
                        appearance=ButtonAppearance::Primary
                        on_click=move |_| {
                            open_wizard_dialog(modal_stack, &COMPANY_WIZARD, Callback::new(move |_| reload()))
                        }
                    >
                        {icon("plus")}
                        " Register company"
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
                                placeholder="Name, registration number, email..."
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
                                <TableHeaderCell min_width=200.0>
                                    <SortHeader label="Name" field="name" sort_field=sort_field ascending=ascending on_sort=on_sort />
                                </TableHeaderCell>
                                <TableHeaderCell min_width=140.0>
                                    <SortHeader label="Reg. number" field="registration_number" sort_field=sort_field ascending=ascending on_sort=on_sort />
                                </TableHeaderCell>
                                <TableHeaderCell min_width=140.0>
                                    <SortHeader label="Type" field="company_type" sort_field=sort_field ascending=ascending on_sort=on_sort />
                                </TableHeaderCell>
                                <TableHeaderCell min_width=180.0>
                                    <SortHeader label="Email" field="email" sort_field=sort_field ascending=ascending on_sort=on_sort />
                                </TableHeaderCell>
                                <TableHeaderCell min_width=100.0>
                                    <SortHeader label="Status" field="status" sort_field=sort_field ascending=ascending on_sort=on_sort />
                                </TableHeaderCell>
                                <TableHeaderCell min_width=130.0>
                                    <SortHeader label="Registered" field="created_at" sort_field=sort_field ascending=ascending on_sort=on_sort />
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
                                                <TableCellLayout>{item.registration_number.clone()}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>{item.company_type.clone()}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout truncate=true>
                                                    {optional_value(item.email.as_deref())}
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>
                                                    <span class=status_badge_class(&item.status)>{item.status.clone()}</span>
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>{format_datetime(&item.created_at)}</TableCellLayout>
                                            </TableCell>
                                        </TableRow>
                                    }
                                }
                            />
                        </TableBody>
                    </Table>
                    <Show when=move || state.with(|s| s.is_loaded && s.total_count == 0)>
                        <div class="table__empty">"No companies registered"</div>
                    </Show>
                </div>
            </div>
        </PageFrame>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn company(name: &str, email: Option<&str>) -> Company {
        Company {
            id: name.to_lowercase(),
            name: name.to_string(),
            registration_number: "REG-1".to_string(),
            company_type: "syndicate".to_string(),
            email: email.map(str::to_string),
            phone: None,
            status: "registered".to_string(),
            created_at: "2024-01-05T09:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_default_sort_is_by_name() {
        let mut state = ListState::new("name", true);
        state.refresh(&[company("zvishavane gold", None), company("Acturus", None)]);
        assert_eq!(state.items[0].name, "Acturus");
    }

    #[test]
    fn test_email_sort_treats_missing_as_empty() {
        let a = company("A", None);
        let b = company("B", Some("b@mine.co.zw"));
        assert_eq!(a.compare_by_field(&b, "email"), Ordering::Less);
    }
}
