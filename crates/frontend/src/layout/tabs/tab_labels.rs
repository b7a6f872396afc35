/// Tab and menu title for a tab key. Unknown keys get a generic title.
pub fn tab_label_for_key(key: &str) -> &'static str {
    match key {
        "a001_ore_intake" => "Ore intake",
        "a002_gold_payout" => "Gold payouts",
        "a003_incident" => "Incidents",
        "a004_company" => "Companies",
        "a005_security_company" => "Security companies",
        "a006_shaft_inspection" => "Shaft inspections",
        "a007_section" => "Sections",
        _ => "Page",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::tabs::registry::TAB_KEYS;

    #[test]
    fn test_every_tab_key_has_a_label() {
        for key in TAB_KEYS {
            assert_ne!(tab_label_for_key(key), "Page", "{key} has no label");
        }
    }
}
