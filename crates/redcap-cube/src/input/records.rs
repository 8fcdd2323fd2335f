//! Typed records for each input file.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// REDCap field type, as written in the `Field Type` column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    Text,
    Notes,
    Dropdown,
    Radio,
    YesNo,
    TrueFalse,
    Checkbox,
    Calc,
    Slider,
    Descriptive,
    File,
    Other(String),
}

impl FieldType {
    /// Categorical types whose values are codes in a code list.
    pub fn is_coded(&self) -> bool {
        matches!(self, FieldType::Dropdown | FieldType::Radio | FieldType::YesNo)
    }

    /// Choices implied by REDCap when the dictionary leaves them blank.
    pub fn implicit_choices(&self) -> Option<&'static str> {
        match self {
            FieldType::YesNo => Some("1,Yes|0,No"),
            _ => None,
        }
    }
}

impl From<String> for FieldType {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "text" => FieldType::Text,
            "notes" => FieldType::Notes,
            "dropdown" => FieldType::Dropdown,
            "radio" => FieldType::Radio,
            "yesno" => FieldType::YesNo,
            "truefalse" => FieldType::TrueFalse,
            "checkbox" => FieldType::Checkbox,
            "calc" => FieldType::Calc,
            "slider" => FieldType::Slider,
            "descriptive" => FieldType::Descriptive,
            "file" => FieldType::File,
            _ => FieldType::Other(value),
        }
    }
}

impl From<FieldType> for String {
    fn from(value: FieldType) -> Self {
        match value {
            FieldType::Text => "text".to_string(),
            FieldType::Notes => "notes".to_string(),
            FieldType::Dropdown => "dropdown".to_string(),
            FieldType::Radio => "radio".to_string(),
            FieldType::YesNo => "yesno".to_string(),
            FieldType::TrueFalse => "truefalse".to_string(),
            FieldType::Checkbox => "checkbox".to_string(),
            FieldType::Calc => "calc".to_string(),
            FieldType::Slider => "slider".to_string(),
            FieldType::Descriptive => "descriptive".to_string(),
            FieldType::File => "file".to_string(),
            FieldType::Other(other) => other,
        }
    }
}

/// One row of the data dictionary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Field {
    #[serde(rename = "Variable / Field Name")]
    pub name: String,
    #[serde(rename = "Form Name", default)]
    pub form: Option<String>,
    #[serde(rename = "Field Type")]
    pub field_type: FieldType,
    #[serde(rename = "Field Label", default)]
    pub label: Option<String>,
    #[serde(rename = "Choices, Calculations, OR Slider Labels", default)]
    pub choices: Option<String>,
    #[serde(rename = "Text Validation Type OR Show Slider Number", default)]
    pub text_validation: Option<String>,
    #[serde(rename = "Text Validation Min", default)]
    pub text_min: Option<String>,
    #[serde(rename = "Text Validation Max", default)]
    pub text_max: Option<String>,
}

impl Field {
    /// Minimal field for programmatic construction.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            form: None,
            field_type,
            label: None,
            choices: None,
            text_validation: None,
            text_min: None,
            text_max: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_choices(mut self, choices: impl Into<String>) -> Self {
        self.choices = Some(choices.into());
        self
    }

    pub fn with_validation(mut self, validation: impl Into<String>) -> Self {
        self.text_validation = Some(validation.into());
        self
    }
}

/// Per-field overrides from the mapping file. Empty cells are absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MappingEntry {
    #[serde(rename = "Variable / Field Name")]
    pub field: String,
    #[serde(default)]
    pub dimension: Option<String>,
    #[serde(default)]
    pub concept: Option<String>,
    #[serde(default)]
    pub categories: Option<String>,
    #[serde(default)]
    pub statistic: Option<String>,
    #[serde(default)]
    pub units: Option<String>,
    #[serde(default)]
    pub range: Option<String>,
}

impl MappingEntry {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            ..Self::default()
        }
    }

    pub fn is_dimension(&self) -> bool {
        self.dimension.as_deref() == Some("y")
    }
}

/// Mapping entries keyed by field name.
pub type Mapping = IndexMap<String, MappingEntry>;

/// Collect mapping rows into a lookup; a later row for the same field wins.
pub fn mapping_from_entries(entries: impl IntoIterator<Item = MappingEntry>) -> Mapping {
    entries
        .into_iter()
        .map(|entry| (entry.field.clone(), entry))
        .collect()
}

/// Dataset-level metadata row.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatasetMetadata {
    pub dataset_id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub issued: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
}

/// Label and comment for a derived slice name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SliceDefinition {
    pub slice: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub label_lang: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub comment_lang: Option<String>,
}

/// Slice definitions keyed by slice name.
pub type SliceDefinitions = IndexMap<String, SliceDefinition>;

pub fn slices_from_definitions(
    definitions: impl IntoIterator<Item = SliceDefinition>,
) -> SliceDefinitions {
    definitions
        .into_iter()
        .map(|definition| (definition.slice.clone(), definition))
        .collect()
}

/// One observation row: column name to raw value, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationRow {
    pub values: IndexMap<String, String>,
}

impl ObservationRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(column.into(), value.into());
        self
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.values.get(column).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ObservationRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_type_parsing() {
        assert_eq!(FieldType::from("dropdown".to_string()), FieldType::Dropdown);
        assert_eq!(FieldType::from(" YesNo ".to_string()), FieldType::YesNo);
        assert_eq!(
            FieldType::from("sql".to_string()),
            FieldType::Other("sql".to_string())
        );
        assert!(FieldType::Radio.is_coded());
        assert!(!FieldType::Calc.is_coded());
        assert!(!FieldType::TrueFalse.is_coded());
        assert_eq!(FieldType::TrueFalse.implicit_choices(), None);
    }

    #[test]
    fn test_mapping_dimension_flag() {
        let mut entry = MappingEntry::new("visit");
        assert!(!entry.is_dimension());
        entry.dimension = Some("y".to_string());
        assert!(entry.is_dimension());
        entry.dimension = Some("yes".to_string());
        assert!(!entry.is_dimension());
    }
}
