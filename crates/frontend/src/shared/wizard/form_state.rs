//! Field store of a wizard dialog.
//!
//! Pure data capture: no validation happens here. The set of fields is fixed
//! when the store is built from the wizard definition; only list fields grow
//! and shrink. List mutations replace the whole list value instead of editing
//! it in place, so a reactive reader always sees a new value.

use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Attached file metadata (the browser keeps the bytes)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRef {
    pub name: String,
    pub content_type: String,
    pub size_bytes: u64,
}

/// One row of a list field (tax line, involved person, ...)
pub type Entry = BTreeMap<String, FieldValue>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    Date,
    Flag,
    Files,
    List,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Date => "date",
            Self::Flag => "flag",
            Self::Files => "files",
            Self::List => "list",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    /// `None` is an empty input, which is not the same as zero.
    Number(Option<f64>),
    Date(Option<NaiveDate>),
    Flag(bool),
    Files(Vec<FileRef>),
    List(Vec<Entry>),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn number(value: f64) -> Self {
        Self::Number(Some(value))
    }

    pub fn date(value: NaiveDate) -> Self {
        Self::Date(Some(value))
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Text(_) => FieldKind::Text,
            Self::Number(_) => FieldKind::Number,
            Self::Date(_) => FieldKind::Date,
            Self::Flag(_) => FieldKind::Flag,
            Self::Files(_) => FieldKind::Files,
            Self::List(_) => FieldKind::List,
        }
    }

    /// True for values the user has not filled in.
    ///
    /// A list is blank when it has no entries at all; an unchecked flag counts as blank.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(s) => s.trim().is_empty(),
            Self::Number(n) => n.is_none(),
            Self::Date(d) => d.is_none(),
            Self::Flag(b) => !*b,
            Self::Files(files) => files.is_empty(),
            Self::List(entries) => entries.is_empty(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => *n,
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(d) => *d,
            _ => None,
        }
    }

    pub fn as_flag(&self) -> bool {
        matches!(self, Self::Flag(true))
    }

    pub fn as_files(&self) -> &[FileRef] {
        match self {
            Self::Files(files) => files,
            _ => &[],
        }
    }

    pub fn as_list(&self) -> &[Entry] {
        match self {
            Self::List(entries) => entries,
            _ => &[],
        }
    }

    /// Human readable rendering for the review step.
    pub fn display(&self) -> String {
        match self {
            Self::Text(s) => s.trim().to_string(),
            Self::Number(Some(n)) => format_number(*n),
            Self::Number(None) | Self::Date(None) => String::new(),
            Self::Date(Some(d)) => d.format("%Y-%m-%d").to_string(),
            Self::Flag(b) => if *b { "Yes" } else { "No" }.to_string(),
            Self::Files(files) => files
                .iter()
                .map(|f| f.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            Self::List(entries) => format!("{} entries", entries.len()),
        }
    }
}

pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Blank when every cell of the entry is blank. `0` counts as blank in a list row
/// because a fresh row starts at zero.
pub fn entry_is_blank(entry: &Entry) -> bool {
    entry.values().all(|v| match v {
        FieldValue::Number(Some(n)) => *n == 0.0,
        other => other.is_blank(),
    })
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormError {
    #[error("unknown field `{0}`")]
    UnknownField(String),
    #[error("field `{field}` holds {expected}, got {found}")]
    KindMismatch {
        field: String,
        expected: FieldKind,
        found: FieldKind,
    },
    #[error("field `{0}` is not a list")]
    NotAList(String),
    #[error("entry {index} of `{field}` does not exist (len {len})")]
    IndexOutOfRange {
        field: String,
        index: usize,
        len: usize,
    },
    #[error("form is locked while a submission is in flight")]
    Locked,
}

/// Current values of every field of a wizard
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormState {
    values: BTreeMap<String, FieldValue>,
}

impl FormState {
    pub fn new<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, FieldValue)>,
        K: Into<String>,
    {
        Self {
            values: fields.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn text(&self, name: &str) -> &str {
        self.get(name).and_then(FieldValue::as_text).unwrap_or("")
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(FieldValue::as_number)
    }

    pub fn date(&self, name: &str) -> Option<NaiveDate> {
        self.get(name).and_then(FieldValue::as_date)
    }

    pub fn flag(&self, name: &str) -> bool {
        self.get(name).map(FieldValue::as_flag).unwrap_or(false)
    }

    pub fn files(&self, name: &str) -> &[FileRef] {
        self.get(name).map(FieldValue::as_files).unwrap_or(&[])
    }

    pub fn list(&self, name: &str) -> &[Entry] {
        self.get(name).map(FieldValue::as_list).unwrap_or(&[])
    }

    /// Replace the value of `name`. Returns whether anything changed.
    pub fn set_field(&mut self, name: &str, value: FieldValue) -> Result<bool, FormError> {
        let current = self
            .values
            .get_mut(name)
            .ok_or_else(|| FormError::UnknownField(name.to_string()))?;
        if current.kind() != value.kind() {
            return Err(FormError::KindMismatch {
                field: name.to_string(),
                expected: current.kind(),
                found: value.kind(),
            });
        }
        if *current == value {
            return Ok(false);
        }
        *current = value;
        Ok(true)
    }

    /// Append `entry` to the list `name`, returning its index.
    pub fn append_entry(&mut self, name: &str, entry: Entry) -> Result<usize, FormError> {
        let mut entries = self.list_value(name)?.to_vec();
        entries.push(entry);
        let index = entries.len() - 1;
        self.values.insert(name.to_string(), FieldValue::List(entries));
        Ok(index)
    }

    /// Remove and return entry `index` of the list `name`.
    pub fn remove_entry(&mut self, name: &str, index: usize) -> Result<Entry, FormError> {
        let current = self.list_value(name)?;
        if index >= current.len() {
            return Err(FormError::IndexOutOfRange {
                field: name.to_string(),
                index,
                len: current.len(),
            });
        }
        let mut entries = current.to_vec();
        let removed = entries.remove(index);
        self.values.insert(name.to_string(), FieldValue::List(entries));
        Ok(removed)
    }

    /// Set one cell of a list entry. The entry keeps the columns it was created with.
    pub fn set_entry_field(
        &mut self,
        name: &str,
        index: usize,
        column: &str,
        value: FieldValue,
    ) -> Result<bool, FormError> {
        let current = self.list_value(name)?;
        let entry = current.get(index).ok_or_else(|| FormError::IndexOutOfRange {
            field: name.to_string(),
            index,
            len: current.len(),
        })?;
        let cell_path = entry_path(name, index, column);
        let cell = entry
            .get(column)
            .ok_or_else(|| FormError::UnknownField(cell_path.clone()))?;
        if cell.kind() != value.kind() {
            return Err(FormError::KindMismatch {
                field: cell_path,
                expected: cell.kind(),
                found: value.kind(),
            });
        }
        if *cell == value {
            return Ok(false);
        }
        let mut entries = current.to_vec();
        entries[index].insert(column.to_string(), value);
        self.values.insert(name.to_string(), FieldValue::List(entries));
        Ok(true)
    }

    fn list_value(&self, name: &str) -> Result<&[Entry], FormError> {
        match self.values.get(name) {
            Some(FieldValue::List(entries)) => Ok(entries),
            Some(_) => Err(FormError::NotAList(name.to_string())),
            None => Err(FormError::UnknownField(name.to_string())),
        }
    }
}

/// Error-map key of a list cell, e.g. `taxes[1].rate`
pub fn entry_path(list: &str, index: usize, column: &str) -> String {
    format!("{}[{}].{}", list, index, column)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tax_entry(tax_type: &str, rate: f64) -> Entry {
        Entry::from([
            ("type".to_string(), FieldValue::text(tax_type)),
            ("rate".to_string(), FieldValue::number(rate)),
        ])
    }

    fn sample() -> FormState {
        FormState::new([
            ("vehicle_reg", FieldValue::text("")),
            ("tonnage", FieldValue::Number(None)),
            ("taxes", FieldValue::List(vec![tax_entry("", 0.0)])),
        ])
    }

    #[test]
    fn test_set_field_is_idempotent() {
        let mut form = sample();
        assert_eq!(form.set_field("vehicle_reg", FieldValue::text("ACD 1234")), Ok(true));
        let snapshot = form.clone();
        assert_eq!(form.set_field("vehicle_reg", FieldValue::text("ACD 1234")), Ok(false));
        assert_eq!(form, snapshot);
    }

    #[test]
    fn test_shape_is_fixed() {
        let mut form = sample();
        assert_eq!(
            form.set_field("driver", FieldValue::text("x")),
            Err(FormError::UnknownField("driver".into()))
        );
        assert!(matches!(
            form.set_field("tonnage", FieldValue::text("12")),
            Err(FormError::KindMismatch { .. })
        ));
        assert!(!form.contains("driver"));
    }

    #[test]
    fn test_empty_number_is_not_zero() {
        let mut form = sample();
        assert_eq!(form.number("tonnage"), None);
        form.set_field("tonnage", FieldValue::number(0.0)).unwrap();
        assert_eq!(form.number("tonnage"), Some(0.0));
        assert!(!form.get("tonnage").unwrap().is_blank());
    }

    #[test]
    fn test_list_mutations_replace_the_list() {
        let mut form = sample();
        let before = form.list("taxes").to_vec();

        let index = form.append_entry("taxes", tax_entry("", 0.0)).unwrap();
        assert_eq!(index, 1);
        assert_eq!(before.len(), 1);
        assert_eq!(form.list("taxes").len(), 2);

        form.set_entry_field("taxes", 1, "type", FieldValue::text("VAT")).unwrap();
        form.set_entry_field("taxes", 1, "rate", FieldValue::number(15.0)).unwrap();
        assert_eq!(form.list("taxes")[1]["type"], FieldValue::text("VAT"));

        let removed = form.remove_entry("taxes", 0).unwrap();
        assert!(entry_is_blank(&removed));
        assert_eq!(form.list("taxes").len(), 1);
        assert_eq!(form.list("taxes")[0]["rate"], FieldValue::number(15.0));
    }

    #[test]
    fn test_list_errors() {
        let mut form = sample();
        assert_eq!(
            form.remove_entry("taxes", 3),
            Err(FormError::IndexOutOfRange { field: "taxes".into(), index: 3, len: 1 })
        );
        assert_eq!(
            form.append_entry("vehicle_reg", Entry::new()),
            Err(FormError::NotAList("vehicle_reg".into()))
        );
        assert_eq!(
            form.set_entry_field("taxes", 0, "amount", FieldValue::number(1.0)),
            Err(FormError::UnknownField("taxes[0].amount".into()))
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(FieldValue::number(15.0).display(), "15");
        assert_eq!(FieldValue::number(12.5).display(), "12.5");
        assert_eq!(
            FieldValue::date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()).display(),
            "2024-03-01"
        );
        assert_eq!(FieldValue::Number(None).display(), "");
    }
}
