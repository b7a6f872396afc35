//! Helpers for payload mappers: pull typed values out of a `FormState`.

use super::form_state::{entry_is_blank, Entry, FieldValue, FormState};
use super::gateway::MappingError;
use chrono::NaiveDate;
use contracts::domain::common::{FileMetaDto, TaxEntryDto};

pub fn required_text(form: &FormState, name: &str) -> Result<String, MappingError> {
    let value = form.text(name).trim();
    if value.is_empty() {
        return Err(MappingError::Missing(name.to_string()));
    }
    Ok(value.to_string())
}

pub fn optional_text(form: &FormState, name: &str) -> Option<String> {
    let value = form.text(name).trim();
    (!value.is_empty()).then(|| value.to_string())
}

pub fn required_number(form: &FormState, name: &str) -> Result<f64, MappingError> {
    form.number(name)
        .ok_or_else(|| MappingError::Missing(name.to_string()))
}

pub fn optional_number(form: &FormState, name: &str) -> Option<f64> {
    form.number(name)
}

/// Whole, non-negative count.
pub fn required_count(form: &FormState, name: &str) -> Result<u32, MappingError> {
    let value = required_number(form, name)?;
    if value < 0.0 || value.fract() != 0.0 || value > u32::MAX as f64 {
        return Err(MappingError::InvalidNumber {
            field: name.to_string(),
            value: value.to_string(),
        });
    }
    Ok(value as u32)
}

pub fn required_date(form: &FormState, name: &str) -> Result<NaiveDate, MappingError> {
    form.date(name)
        .ok_or_else(|| MappingError::Missing(name.to_string()))
}

/// Parse a select value through the enum's `from_code`.
pub fn required_choice<T>(
    form: &FormState,
    name: &str,
    from_code: fn(&str) -> Option<T>,
) -> Result<T, MappingError> {
    let code = required_text(form, name)?;
    from_code(&code).ok_or(MappingError::InvalidOption {
        field: name.to_string(),
        value: code,
    })
}

/// Metadata of the single attached file.
pub fn file_meta(form: &FormState, name: &str) -> Result<FileMetaDto, MappingError> {
    let file = form
        .files(name)
        .first()
        .ok_or_else(|| MappingError::Missing(name.to_string()))?;
    Ok(FileMetaDto {
        file_name: file.name.clone(),
        content_type: file.content_type.clone(),
        size_bytes: file.size_bytes,
    })
}

/// Non-blank entries of a list field.
pub fn filled_entries<'a>(form: &'a FormState, name: &str) -> impl Iterator<Item = &'a Entry> {
    form.list(name).iter().filter(|entry| !entry_is_blank(entry))
}

pub fn entry_text(entry: &Entry, column: &str) -> String {
    entry
        .get(column)
        .and_then(FieldValue::as_text)
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

pub fn entry_number(entry: &Entry, column: &str) -> Option<f64> {
    entry.get(column).and_then(FieldValue::as_number)
}

/// Tax list with blank rows dropped.
pub fn tax_entries(form: &FormState, name: &str) -> Result<Vec<TaxEntryDto>, MappingError> {
    filled_entries(form, name)
        .enumerate()
        .map(|(i, entry)| {
            let tax_type = entry_text(entry, "type");
            if tax_type.is_empty() {
                return Err(MappingError::Missing(format!("{}[{}].type", name, i)));
            }
            let rate = entry_number(entry, "rate")
                .ok_or_else(|| MappingError::Missing(format!("{}[{}].rate", name, i)))?;
            Ok(TaxEntryDto { tax_type, rate })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::wizard::form_state::FileRef;

    fn tax_row(tax_type: &str, rate: Option<f64>) -> Entry {
        let mut entry = Entry::new();
        entry.insert("type".into(), FieldValue::text(tax_type));
        entry.insert("rate".into(), FieldValue::Number(rate));
        entry
    }

    fn form() -> FormState {
        FormState::new([
            ("name", FieldValue::text("  Rand Reef  ")),
            ("notes", FieldValue::text("   ")),
            ("guards", FieldValue::number(12.0)),
            ("ratio", FieldValue::number(2.5)),
            ("date", FieldValue::Date(None)),
            ("doc", FieldValue::Files(vec![])),
            (
                "taxes",
                FieldValue::List(vec![
                    tax_row("royalty", Some(3.0)),
                    tax_row("", Some(0.0)),
                    tax_row("vat", Some(15.0)),
                ]),
            ),
        ])
    }

    #[test]
    fn test_text_helpers_trim() {
        let form = form();
        assert_eq!(required_text(&form, "name").unwrap(), "Rand Reef");
        assert_eq!(optional_text(&form, "notes"), None);
        assert!(matches!(
            required_text(&form, "notes"),
            Err(MappingError::Missing(f)) if f == "notes"
        ));
    }

    #[test]
    fn test_required_count_rejects_fractions() {
        let form = form();
        assert_eq!(required_count(&form, "guards").unwrap(), 12);
        assert!(matches!(
            required_count(&form, "ratio"),
            Err(MappingError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn test_missing_date_and_file_are_reported() {
        let form = form();
        assert!(required_date(&form, "date").is_err());
        assert!(file_meta(&form, "doc").is_err());
    }

    #[test]
    fn test_file_meta_takes_first_file() {
        let mut form = form();
        form.set_field(
            "doc",
            FieldValue::Files(vec![FileRef {
                name: "cert.pdf".into(),
                content_type: "application/pdf".into(),
                size_bytes: 2048,
            }]),
        )
        .unwrap();
        let meta = file_meta(&form, "doc").unwrap();
        assert_eq!(meta.file_name, "cert.pdf");
        assert_eq!(meta.size_bytes, 2048);
    }

    #[test]
    fn test_tax_entries_drop_blank_rows() {
        let taxes = tax_entries(&form(), "taxes").unwrap();
        assert_eq!(taxes.len(), 2);
        assert_eq!(taxes[0].tax_type, "royalty");
        assert_eq!(taxes[1].rate, 15.0);
    }

    #[test]
    fn test_required_choice_rejects_unknown_code() {
        let form = FormState::new([("kind", FieldValue::text("meteor"))]);
        let parse = |code: &str| (code == "theft").then_some(());
        assert!(matches!(
            required_choice(&form, "kind", parse),
            Err(MappingError::InvalidOption { .. })
        ));
    }
}
