use serde::{Deserialize, Serialize};

/// Option for a select control, as served by the options endpoints
/// (`/api/options/{category}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Look up the label for a stored value, falling back to the value itself.
pub fn label_for<'a>(options: &'a [SelectOption], value: &'a str) -> &'a str {
    options
        .iter()
        .find(|o| o.value == value)
        .map(|o| o.label.as_str())
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_for() {
        let options = vec![
            SelectOption::new("m1", "Kwekwe Mill"),
            SelectOption::new("m2", "Shamva Mill"),
        ];
        assert_eq!(label_for(&options, "m2"), "Shamva Mill");
        assert_eq!(label_for(&options, "m9"), "m9");
    }
}
