use crate::shared::icons::icon;
use crate::shared::list_utils::PAGE_SIZE_OPTIONS;
use leptos::prelude::*;

/// Last valid page index for `total_pages` (at least one page is always shown).
fn last_page(total_pages: usize) -> usize {
    total_pages.max(1) - 1
}

/// `"2 / 5 (93)"` for page index 1 of 5 with 93 records.
fn page_summary(page: usize, total_pages: usize, total_count: usize) -> String {
    format!("{} / {} ({})", page + 1, total_pages.max(1), total_count)
}

/// First/previous/next/last buttons, position summary and page size select.
#[component]
pub fn PaginationControls(
    /// Zero-based
    #[prop(into)]
    current_page: Signal<usize>,
    #[prop(into)] total_pages: Signal<usize>,
    #[prop(into)] total_count: Signal<usize>,
    #[prop(into)] page_size: Signal<usize>,
    on_page_change: Callback<usize>,
    on_page_size_change: Callback<usize>,
    #[prop(optional)] page_size_options: Option<Vec<usize>>,
) -> impl IntoView {
    let options = page_size_options.unwrap_or_else(|| PAGE_SIZE_OPTIONS.to_vec());
    let at_start = move || current_page.get() == 0;
    let at_end = move || current_page.get() >= last_page(total_pages.get());

    view! {
        <div class="pagination-controls">
            <button
                class="pagination-btn"
                title="First page"
                disabled=at_start
                on:click=move |_| on_page_change.run(0)
            >
                {icon("chevrons-left")}
            </button>
            <button
                class="pagination-btn"
                title="Previous page"
                disabled=at_start
                on:click=move |_| on_page_change.run(current_page.get().saturating_sub(1))
            >
                {icon("chevron-left")}
            </button>
            <span class="pagination-info">
                {move || page_summary(current_page.get(), total_pages.get(), total_count.get())}
            </span>
            <button
                class="pagination-btn"
                title="Next page"
                disabled=at_end
                on:click=move |_| {
                    let next = (current_page.get() + 1).min(last_page(total_pages.get()));
                    on_page_change.run(next);
                }
            >
                {icon("chevron-right")}
            </button>
            <button
                class="pagination-btn"
                title="Last page"
                disabled=at_end
                on:click=move |_| on_page_change.run(last_page(total_pages.get()))
            >
                {icon("chevrons-right")}
            </button>
            <select
                class="page-size-select"
                title="Rows per page"
                prop:value=move || page_size.get().to_string()
                on:change=move |ev| {
                    if let Ok(size) = event_target_value(&ev).parse() {
                        on_page_size_change.run(size);
                    }
                }
            >
                {options
                    .into_iter()
                    .map(|size| {
                        view! {
                            <option value=size.to_string() selected=move || page_size.get() == size>
                                {size.to_string()}
                            </option>
                        }
                    })
                    .collect_view()}
            </select>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_list_still_shows_one_page() {
        assert_eq!(last_page(0), 0);
        assert_eq!(page_summary(0, 0, 0), "1 / 1 (0)");
        assert_eq!(last_page(5), 4);
        assert_eq!(page_summary(1, 5, 93), "2 / 5 (93)");
    }
}
