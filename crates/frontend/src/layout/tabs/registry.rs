//! Tab key to page view. Every tab key the app knows is listed here.

use crate::domain::a001_ore_intake::ui::list::OreIntakeList;
use crate::domain::a002_gold_payout::ui::list::GoldPayoutList;
use crate::domain::a003_incident::ui::list::IncidentList;
use crate::domain::a004_company::ui::list::CompanyList;
use crate::domain::a005_security_company::ui::list::SecurityCompanyList;
use crate::domain::a006_shaft_inspection::ui::list::ShaftInspectionList;
use crate::domain::a007_section::ui::list::SectionList;
use leptos::prelude::*;

pub const TAB_KEYS: &[&str] = &[
    "a001_ore_intake",
    "a002_gold_payout",
    "a003_incident",
    "a004_company",
    "a005_security_company",
    "a006_shaft_inspection",
    "a007_section",
];

pub fn render_tab_content(key: &str) -> AnyView {
    match key {
        "a001_ore_intake" => view! { <OreIntakeList /> }.into_any(),
        "a002_gold_payout" => view! { <GoldPayoutList /> }.into_any(),
        "a003_incident" => view! { <IncidentList /> }.into_any(),
        "a004_company" => view! { <CompanyList /> }.into_any(),
        "a005_security_company" => view! { <SecurityCompanyList /> }.into_any(),
        "a006_shaft_inspection" => view! { <ShaftInspectionList /> }.into_any(),
        "a007_section" => view! { <SectionList /> }.into_any(),
        _ => {
            log::warn!("Unknown tab key: {}", key);
            view! { <div class="placeholder">"Unknown page: " {key.to_string()}</div> }.into_any()
        }
    }
}
