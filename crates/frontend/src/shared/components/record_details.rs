//! Read-only details dialog for a single record.
use crate::shared::icons::icon;
use crate::shared::modal_stack::ModalStackService;
use leptos::prelude::*;
use thaw::*;

/// Label/value pairs shown in the details grid. Empty values render as "-".
pub type DetailRows = Vec<(&'static str, String)>;

/// Badge modifier for a free-form backend status.
pub fn status_badge_class(status: &str) -> &'static str {
    match status.to_lowercase().as_str() {
        "active" | "approved" | "registered" | "paid" | "completed" => {
            "badge badge--success"
        }
        "pending" | "submitted" | "open" | "under_review" | "suspended" => "badge badge--warning",
        "rejected" | "closed" | "expired" | "cancelled" => "badge badge--error",
        _ => "badge badge--neutral",
    }
}

pub fn optional_value(value: Option<&str>) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| "-".to_string())
}

#[component]
pub fn RecordDetails(
    #[prop(into)] title: String,
    rows: DetailRows,
    on_close: Callback<()>,
    /// Action area rendered under the grid
    #[prop(optional)]
    children: Option<Children>,
) -> impl IntoView {
    view! {
        <div class="details-container">
            <div class="modal-header">
                <h2 class="modal-title">{title}</h2>
                <Button appearance=ButtonAppearance::Subtle on_click=move |_| on_close.run(())>
                    {icon("x")}
                </Button>
            </div>
            <dl class="details-grid">
                {rows
                    .into_iter()
                    .map(|(label, value)| {
                        let value = if value.trim().is_empty() { "-".to_string() } else { value };
                        view! {
                            <dt class="details-grid__label">{label}</dt>
                            <dd class="details-grid__value">{value}</dd>
                        }
                    })
                    .collect_view()}
            </dl>
            {children.map(|c| c())}
        </div>
    }
}

/// Show `rows` in a modal on top of the stack.
pub fn open_record_details(modal_stack: ModalStackService, title: String, rows: DetailRows) {
    modal_stack.push_with_frame(
        Some("width: min(640px, 95vw);".to_string()),
        Some("record-details-modal".to_string()),
        move |handle| {
            let on_close = Callback::new(move |_| handle.close());
            view! { <RecordDetails title=title.clone() rows=rows.clone() on_close=on_close /> }
                .into_any()
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_badge_class_is_case_insensitive() {
        assert_eq!(status_badge_class("Approved"), "badge badge--success");
        assert_eq!(status_badge_class("PENDING"), "badge badge--warning");
        assert_eq!(status_badge_class("rejected"), "badge badge--error");
        assert_eq!(status_badge_class("draft"), "badge badge--neutral");
    }

    #[test]
    fn test_optional_value_dashes_blanks() {
        assert_eq!(optional_value(None), "-");
        assert_eq!(optional_value(Some("  ")), "-");
        assert_eq!(optional_value(Some("M-12")), "M-12");
    }
}
