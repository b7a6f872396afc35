//! Shared list helpers: search, sort, pagination and their small UI pieces.
use leptos::prelude::*;
use std::cmp::Ordering;
use wasm_bindgen::JsCast;

/// Filters shorter than this are ignored.
pub const MIN_FILTER_LEN: usize = 3;

pub const PAGE_SIZE_OPTIONS: [usize; 3] = [50, 100, 200];

/// Records that can be matched against a search string
pub trait Searchable {
    /// `filter` is already lower-cased.
    fn matches_filter(&self, filter: &str) -> bool;
}

/// Records that can be ordered by a named column
pub trait Sortable {
    fn compare_by_field(&self, other: &Self, field: &str) -> Ordering;
}

/// Case-insensitive substring test over a set of columns.
pub fn any_contains(filter: &str, values: &[&str]) -> bool {
    values.iter().any(|v| v.to_lowercase().contains(filter))
}

pub fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

pub fn compare_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

pub fn sort_list<T: Sortable>(items: &mut [T], field: &str, ascending: bool) {
    items.sort_by(|a, b| {
        let cmp = a.compare_by_field(b, field);
        if ascending {
            cmp
        } else {
            cmp.reverse()
        }
    });
}

fn is_active_filter(filter: &str) -> bool {
    filter.trim().chars().count() >= MIN_FILTER_LEN
}

pub fn filter_list<T: Searchable>(items: Vec<T>, filter: &str) -> Vec<T> {
    if !is_active_filter(filter) {
        return items;
    }
    let needle = filter.trim().to_lowercase();
    items
        .into_iter()
        .filter(|item| item.matches_filter(&needle))
        .collect()
}

/// Table state of one list page. `items` is the visible page only.
#[derive(Clone, Debug)]
pub struct ListState<T> {
    pub items: Vec<T>,
    pub search_query: String,
    pub sort_field: String,
    pub sort_ascending: bool,
    pub page: usize,
    pub page_size: usize,
    pub total_count: usize,
    pub total_pages: usize,
    pub is_loaded: bool,
}

impl<T> ListState<T> {
    pub fn new(sort_field: &str, sort_ascending: bool) -> Self {
        Self {
            items: Vec::new(),
            search_query: String::new(),
            sort_field: sort_field.to_string(),
            sort_ascending,
            page: 0,
            page_size: PAGE_SIZE_OPTIONS[0],
            total_count: 0,
            total_pages: 1,
            is_loaded: false,
        }
    }

    /// Click on a column header.
    pub fn toggle_sort(&mut self, field: &str) {
        if self.sort_field == field {
            self.sort_ascending = !self.sort_ascending;
        } else {
            self.sort_field = field.to_string();
            self.sort_ascending = true;
        }
    }

    pub fn set_page_size(&mut self, size: usize) {
        self.page_size = size.max(1);
        self.page = 0;
    }

    fn recalc_pagination(&mut self) {
        self.total_pages = if self.total_count == 0 {
            1
        } else {
            (self.total_count + self.page_size - 1) / self.page_size
        };
        if self.page >= self.total_pages {
            self.page = self.total_pages.saturating_sub(1);
        }
    }
}

impl<T: Searchable + Sortable + Clone> ListState<T> {
    /// Filter, sort and cut the current page out of `all`.
    pub fn refresh(&mut self, all: &[T]) {
        let mut data = filter_list(all.to_vec(), &self.search_query);
        sort_list(&mut data, &self.sort_field, self.sort_ascending);
        self.total_count = data.len();
        self.recalc_pagination();
        let start = self.page * self.page_size;
        let end = (start + self.page_size).min(data.len());
        self.items = data.get(start..end).unwrap_or(&[]).to_vec();
    }
}

/// Search box with debounce and a clear button
#[component]
pub fn SearchInput(
    #[prop(into)] value: Signal<String>,
    #[prop(into)] on_change: Callback<String>,
    #[prop(optional, into)] placeholder: String,
) -> impl IntoView {
    let placeholder = if placeholder.is_empty() {
        format!("Search (min. {} characters)...", MIN_FILTER_LEN)
    } else {
        placeholder
    };

    let (input_value, set_input_value) = signal(value.get_untracked());
    let debounce_timeout = StoredValue::new(None::<i32>);

    let handle_input_change = move |new_value: String| {
        set_input_value.set(new_value.clone());

        let Some(window) = web_sys::window() else {
            return;
        };
        if let Some(timeout_id) = debounce_timeout.get_value() {
            window.clear_timeout_with_handle(timeout_id);
        }

        let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move || {
            on_change.run(new_value.clone());
        }) as Box<dyn Fn()>);

        match window.set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref::<js_sys::Function>(),
            300,
        ) {
            Ok(timeout_id) => debounce_timeout.set_value(Some(timeout_id)),
            Err(e) => log::warn!("setTimeout failed: {:?}", e),
        }
        closure.forget();
    };

    let clear_filter = move |_| {
        set_input_value.set(String::new());
        on_change.run(String::new());
    };

    view! {
        <div class="search-input">
            <input
                type="text"
                placeholder=placeholder
                class=move || {
                    if is_active_filter(&value.get()) {
                        "search-input__field search-input__field--active"
                    } else {
                        "search-input__field"
                    }
                }
                prop:value=move || input_value.get()
                on:input=move |ev| handle_input_change(event_target_value(&ev))
            />
            <Show when=move || !input_value.get().is_empty()>
                <button class="search-input__clear" on:click=clear_filter title="Clear">
                    {crate::shared::icons::icon("x")}
                </button>
            </Show>
        </div>
    }
}

/// Clickable column header showing the current sort direction
#[component]
pub fn SortHeader(
    label: &'static str,
    field: &'static str,
    #[prop(into)] sort_field: Signal<String>,
    #[prop(into)] ascending: Signal<bool>,
    on_sort: Callback<&'static str>,
) -> impl IntoView {
    view! {
        <div class="table__sortable-header" style="cursor:pointer;" on:click=move |_| on_sort.run(field)>
            {label}
            <span class=move || get_sort_class(&sort_field.get(), field)>
                {move || get_sort_indicator(&sort_field.get(), field, ascending.get())}
            </span>
        </div>
    }
}

pub fn get_sort_indicator(current_field: &str, field: &str, ascending: bool) -> &'static str {
    if current_field == field {
        if ascending {
            " ▲"
        } else {
            " ▼"
        }
    } else {
        " ⇅"
    }
}

pub fn get_sort_class(current_field: &str, field: &str) -> &'static str {
    if current_field == field {
        "table__sort-indicator table__sort-indicator--active"
    } else {
        "table__sort-indicator"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Shaft {
        name: &'static str,
        depth: f64,
    }

    impl Searchable for Shaft {
        fn matches_filter(&self, filter: &str) -> bool {
            any_contains(filter, &[self.name])
        }
    }

    impl Sortable for Shaft {
        fn compare_by_field(&self, other: &Self, field: &str) -> Ordering {
            match field {
                "depth" => compare_f64(self.depth, other.depth),
                _ => compare_text(self.name, other.name),
            }
        }
    }

    fn shafts(n: usize) -> Vec<Shaft> {
        (0..n)
            .map(|i| Shaft {
                name: if i % 2 == 0 { "North Decline" } else { "Main Vertical" },
                depth: i as f64,
            })
            .collect()
    }

    #[test]
    fn test_short_filter_is_ignored() {
        assert_eq!(filter_list(shafts(4), "no").len(), 4);
        assert_eq!(filter_list(shafts(4), "NORTH").len(), 2);
    }

    #[test]
    fn test_sort_descending() {
        let mut data = shafts(3);
        sort_list(&mut data, "depth", false);
        assert_eq!(data[0].depth, 2.0);
    }

    #[test]
    fn test_toggle_sort_flips_direction_on_same_column() {
        let mut state = ListState::<Shaft>::new("name", true);
        state.toggle_sort("name");
        assert!(!state.sort_ascending);
        state.toggle_sort("depth");
        assert_eq!(state.sort_field, "depth");
        assert!(state.sort_ascending);
    }

    #[test]
    fn test_refresh_paginates_and_clamps_page() {
        let all = shafts(120);
        let mut state = ListState::new("depth", true);
        state.page = 2;
        state.refresh(&all);
        assert_eq!(state.total_pages, 3);
        assert_eq!(state.items.len(), 20);
        assert_eq!(state.items[0].depth, 100.0);

        state.search_query = "north".into();
        state.refresh(&all);
        assert_eq!(state.total_count, 60);
        assert_eq!(state.total_pages, 2);
        assert_eq!(state.page, 1);
        assert_eq!(state.items.len(), 10);
    }

    #[test]
    fn test_empty_list_has_one_page() {
        let mut state = ListState::<Shaft>::new("name", true);
        state.refresh(&[]);
        assert_eq!(state.total_pages, 1);
        assert_eq!(state.page, 0);
        assert!(state.items.is_empty());
    }
}
