//! Declarative description of a wizard: its steps, fields, rules and payload mapping.
//!
//! Definitions are built once into `static` values (see the `wizard` module of
//! each domain) and shared by every dialog instance.

use super::form_state::{Entry, FieldValue, FormState};
use super::gateway::PayloadMapper;
use super::validation::{CrossRule, Rule};

/// Where a select control gets its options from
#[derive(Debug, Clone, Copy)]
pub enum OptionSource {
    /// `(value, label)` pairs compiled into the definition
    Static(&'static [(&'static str, &'static str)]),
    /// Category served by `ApiClient::fetch_options`
    Remote(&'static str),
}

/// Input control of a list column
#[derive(Debug, Clone, Copy)]
pub enum ColumnInput {
    Text,
    Number,
    Select(OptionSource),
}

#[derive(Debug, Clone)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub input: ColumnInput,
}

impl ColumnSpec {
    pub const fn text(name: &'static str, label: &'static str) -> Self {
        Self { name, label, input: ColumnInput::Text }
    }

    pub const fn number(name: &'static str, label: &'static str) -> Self {
        Self { name, label, input: ColumnInput::Number }
    }

    pub const fn select(name: &'static str, label: &'static str, source: OptionSource) -> Self {
        Self { name, label, input: ColumnInput::Select(source) }
    }

    /// Value of this cell in a freshly added row. Numbers start at zero.
    pub fn blank_value(&self) -> FieldValue {
        match self.input {
            ColumnInput::Number => FieldValue::number(0.0),
            ColumnInput::Text | ColumnInput::Select(_) => FieldValue::text(""),
        }
    }
}

/// Input control of a top-level field
#[derive(Debug, Clone)]
pub enum InputKind {
    Text,
    Email,
    Phone,
    TextArea,
    Number,
    Date,
    Checkbox,
    Select(OptionSource),
    File { accept: &'static str, multiple: bool },
    List { columns: Vec<ColumnSpec>, add_label: &'static str },
}

impl InputKind {
    pub fn initial_value(&self) -> FieldValue {
        match self {
            Self::Text | Self::Email | Self::Phone | Self::TextArea | Self::Select(_) => {
                FieldValue::text("")
            }
            Self::Number => FieldValue::Number(None),
            Self::Date => FieldValue::Date(None),
            Self::Checkbox => FieldValue::Flag(false),
            Self::File { .. } => FieldValue::Files(Vec::new()),
            Self::List { columns, .. } => FieldValue::List(vec![blank_entry(columns)]),
        }
    }
}

pub fn blank_entry(columns: &[ColumnSpec]) -> Entry {
    columns
        .iter()
        .map(|c| (c.name.to_string(), c.blank_value()))
        .collect()
}

#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub input: InputKind,
    pub rules: Vec<Rule>,
    pub placeholder: Option<&'static str>,
}

impl FieldSpec {
    pub fn new(name: &'static str, label: &'static str, input: InputKind) -> Self {
        Self {
            name,
            label,
            input,
            rules: Vec::new(),
            placeholder: None,
        }
    }

    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn required(self) -> Self {
        self.rule(Rule::Required)
    }

    pub fn placeholder(mut self, text: &'static str) -> Self {
        self.placeholder = Some(text);
        self
    }

    pub fn is_required(&self) -> bool {
        self.rules.iter().any(|r| matches!(r, Rule::Required))
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        match &self.input {
            InputKind::List { columns, .. } => columns,
            _ => &[],
        }
    }
}

/// One data-entry (or review) step
#[derive(Debug, Clone)]
pub struct StepSpec {
    pub title: &'static str,
    pub description: Option<&'static str>,
    pub fields: Vec<FieldSpec>,
    pub cross_rules: Vec<CrossRule>,
}

impl StepSpec {
    pub fn new(title: &'static str) -> Self {
        Self {
            title,
            description: None,
            fields: Vec::new(),
            cross_rules: Vec::new(),
        }
    }

    pub fn describe(mut self, text: &'static str) -> Self {
        self.description = Some(text);
        self
    }

    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    pub fn cross_rule(mut self, rule: CrossRule) -> Self {
        self.cross_rules.push(rule);
        self
    }
}

pub struct WizardDefinition {
    /// Stable key, used in logs and DOM ids
    pub key: &'static str,
    pub title: &'static str,
    /// REST collection the payload is posted to
    pub resource: &'static str,
    pub entry_steps: Vec<StepSpec>,
    /// Last step before submission: summary of everything entered plus its own fields
    pub review: StepSpec,
    pub confirmation: &'static str,
    pub mapper: PayloadMapper,
}

impl WizardDefinition {
    /// Declared steps including review and confirmation
    pub fn step_count(&self) -> usize {
        self.entry_steps.len() + 2
    }

    pub fn step_titles(&self) -> Vec<&'static str> {
        self.entry_steps
            .iter()
            .map(|s| s.title)
            .chain([self.review.title, "Done"])
            .collect()
    }

    pub fn all_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.entry_steps
            .iter()
            .chain(std::iter::once(&self.review))
            .flat_map(|s| s.fields.iter())
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.all_fields().find(|f| f.name == name)
    }

    /// FormState with every declared field at its initial value
    pub fn initial_state(&self) -> FormState {
        FormState::new(
            self.all_fields()
                .map(|f| (f.name, f.input.initial_value())),
        )
    }

    /// Fresh row for the list field `name`
    pub fn blank_entry(&self, name: &str) -> Option<Entry> {
        self.field(name)
            .filter(|f| matches!(f.input, InputKind::List { .. }))
            .map(|f| blank_entry(f.columns()))
    }

    /// Option categories to fetch when the dialog opens
    pub fn remote_categories(&self) -> Vec<&'static str> {
        let mut categories = Vec::new();
        for field in self.all_fields() {
            let mut sources = Vec::new();
            if let InputKind::Select(source) = &field.input {
                sources.push(*source);
            }
            for column in field.columns() {
                if let ColumnInput::Select(source) = column.input {
                    sources.push(source);
                }
            }
            for source in sources {
                if let OptionSource::Remote(category) = source {
                    if !categories.contains(&category) {
                        categories.push(category);
                    }
                }
            }
        }
        categories
    }
}
