use crate::domain::a002_gold_payout::api;
use crate::domain::a002_gold_payout::wizard::GOLD_PAYOUT_WIZARD;
use crate::shared::api::use_api_client;
use crate::shared::components::pagination_controls::PaginationControls;
use crate::shared::components::record_details::{open_record_details, status_badge_class, DetailRows};
use crate::shared::date_utils::{format_date, format_datetime};
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
use contracts::domain::a002_gold_payout::GoldPayout;
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::cmp::Ordering;
use thaw::*;

impl Searchable for GoldPayout {
    fn matches_filter(&self, filter: &str) -> bool {
        any_contains(
            filter,
            &[
                &self.reference,
                &self.company_name,
                self.payment_method.label(),
                &self.status,
            ],
        )
    }
}

impl Sortable for GoldPayout {
    fn compare_by_field(&self, other: &Self, field: &str) -> Ordering {
        match field {
            "reference" => compare_text(&self.reference, &other.reference),
            "company_name" => compare_text(&self.company_name, &other.company_name),
            "gold_weight_g" => compare_f64(self.gold_weight_g, other.gold_weight_g),
            "purity_percent" => compare_f64(self.purity_percent, other.purity_percent),
            "net_amount" => compare_f64(
                self.net_amount.unwrap_or(0.0),
                other.net_amount.unwrap_or(0.0),
            ),
            "payment_method" => {
                compare_text(self.payment_method.label(), other.payment_method.label())
            }
            "status" => compare_text(&self.status, &other.status),
            _ => self.sale_date.cmp(&other.sale_date),
        }
    }
}

fn amount(value: Option<f64>) -> String {
    value.map(|v| format!("{:.2}", v)).unwrap_or_else(|| "-".to_string())
}

fn detail_rows(p: &GoldPayout) -> DetailRows {
    vec![
        ("Reference", p.reference.clone()),
        ("Seller", p.company_name.clone()),
        ("Sale date", format_date(&p.sale_date)),
        ("Gold weight (g)", format_number(p.gold_weight_g)),
        ("Purity (%)", format_number(p.purity_percent)),
        ("Gross amount", amount(p.gross_amount)),
        ("Net amount", amount(p.net_amount)),
        ("Payment method", p.payment_method.label().to_string()),
        ("Status", p.status.clone()),
        ("Created", format_datetime(&p.created_at)),
    ]
}

#[component]
pub fn GoldPayoutList() -> impl IntoView {
    let client = use_api_client();
    let modal_stack = use_modal_stack();
    let state = RwSignal::new(ListState::<GoldPayout>::new("sale_date", false));
    let all_items: RwSignal<Vec<GoldPayout>> = RwSignal::new(Vec::new());
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
            match api::fetch_payouts(client.as_ref()).await {
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
        <PageFrame page_id="a002_gold_payout--list" category=PAGE_CAT_LIST>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Gold payouts"</h1>
                    <Badge>{move || state.with(|s| s.total_count).to_string()}</Badge>
                </div>
                <div class="page__header-right">
                    <Button
                        appearance=ButtonAppearance::Primary
                        on_click=move |_| {
                            open_wizard_dialog(modal_stack, &GOLD_PAYOUT_WIZARD, Callback::new(move |_| reload()))
                        }
                    >
                        {icon("plus")}
                        " New payout"
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
                                placeholder="Reference, seller, status..."
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
                                    <SortHeader label="Sale date" field="sale_date" sort_field=sort_field ascending=ascending on_sort=on_sort />
                                </TableHeaderCell>
                                <TableHeaderCell min_width=160.0>
                                    <SortHeader label="Seller" field="company_name" sort_field=sort_field ascending=ascending on_sort=on_sort />
                                </TableHeaderCell>
                                <TableHeaderCell min_width=90.0>
                                    <SortHeader label="Weight (g)" field="gold_weight_g" sort_field=sort_field ascending=ascending on_sort=on_sort />
                                </TableHeaderCell>
                                <TableHeaderCell min_width=80.0>
                                    <SortHeader label="Purity" field="purity_percent" sort_field=sort_field ascending=ascending on_sort=on_sort />
                                </TableHeaderCell>
                                <TableHeaderCell min_width=110.0>
                                    <SortHeader label="Net amount" field="net_amount" sort_field=sort_field ascending=ascending on_sort=on_sort />
                                </TableHeaderCell>
                                <TableHeaderCell min_width=120.0>
                                    <SortHeader label="Method" field="payment_method" sort_field=sort_field ascending=ascending on_sort=on_sort />
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
                                    let title = format!("Gold payout {}", item.reference);
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
                                                <TableCellLayout>{format_date(&item.sale_date)}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout truncate=true>{item.company_name.clone()}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>{format_number(item.gold_weight_g)}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>{format!("{}%", format_number(item.purity_percent))}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>{amount(item.net_amount)}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>{item.payment_method.label()}</TableCellLayout>
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
                        <div class="table__empty">"No payouts found"</div>
                    </Show>
                </div>
            </div>
        </PageFrame>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a002_gold_payout::PaymentMethod;

    fn payout(reference: &str, net: Option<f64>) -> GoldPayout {
        GoldPayout {
            id: reference.to_lowercase(),
            reference: reference.to_string(),
            company_name: "Blanket Mine".to_string(),
            sale_date: "2024-07-01".to_string(),
            gold_weight_g: 50.0,
            purity_percent: 90.0,
            gross_amount: None,
            net_amount: net,
            payment_method: PaymentMethod::MobileMoney,
            status: "pending".to_string(),
            created_at: "2024-07-01T10:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_missing_net_amount_sorts_first() {
        let mut state = ListState::new("sale_date", false);
        state.toggle_sort("net_amount");
        state.refresh(&[payout("GP-1", Some(900.0)), payout("GP-2", None)]);
        assert_eq!(state.items[0].reference, "GP-2");
    }

    #[test]
    fn test_search_matches_payment_method_label() {
        let state_items = crate::shared::list_utils::filter_list(vec![payout("GP-1", None)], "mobile");
        assert_eq!(state_items.len(), 1);
        assert_eq!(amount(Some(1234.5)), "1234.50");
    }
}
