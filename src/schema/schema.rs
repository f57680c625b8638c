use std::collections::BTreeMap;
use chrono::{DateTime, NaiveDate, Utc};
use log::warn;
use serde::{Serialize, Deserialize};
use crate::analysis::analyzer::{Analyzer, AnalyzerConfig, AnalyzerRegistry, STANDARD_ANALYZER};
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::{DocId, Document, FieldValue, Fields};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Keyword,
    Date,
    Float,
}

impl FieldType {
    /// Has a numeric or time ordering usable by range filters.
    pub fn is_comparable(&self) -> bool {
        matches!(self, FieldType::Date | FieldType::Float)
    }

    /// Can be used as a sort key. Analyzed text cannot.
    pub fn is_sortable(&self) -> bool {
        !matches!(self, FieldType::Text)
    }
}

/// Field definition with analyzer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analyzer: Option<String>,  // Analyzer name for Text fields
}

impl FieldDefinition {
    pub fn new(field_type: FieldType) -> Self {
        FieldDefinition {
            field_type,
            analyzer: None,
        }
    }

    /// Analyzer used for this field, if it is a Text field.
    pub fn analyzer_name(&self) -> Option<&str> {
        match self.field_type {
            FieldType::Text => Some(self.analyzer.as_deref().unwrap_or(STANDARD_ANALYZER)),
            _ => None,
        }
    }
}

/// Index mapping: declared fields plus the analyzers they may reference.
/// Immutable once an index has been created from it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    pub fields: BTreeMap<String, FieldDefinition>,
    pub analyzers: BTreeMap<String, AnalyzerConfig>,
}

/// Index creation body: `{"settings": {"analysis": {"analyzer": {..}}}, "mappings": {"properties": {..}}}`.
/// Other unrecognized keys are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct IndexBody {
    settings: IndexSettings,
    mappings: Mappings,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct IndexSettings {
    analysis: Analysis,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Analysis {
    analyzer: BTreeMap<String, AnalyzerConfig>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Mappings {
    dynamic: Option<serde_json::Value>,
    properties: BTreeMap<String, FieldDefinition>,
}

/// Undeclared fields are always rejected at write time, so `true` and
/// `"runtime"` are downgraded to strict with a warning.
fn check_dynamic(dynamic: Option<&serde_json::Value>) -> Result<()> {
    use serde_json::Value;

    let enabled = match dynamic {
        None | Some(Value::Bool(false)) => false,
        Some(Value::Bool(true)) => true,
        Some(Value::String(mode)) => match mode.as_str() {
            "false" | "strict" => false,
            "true" | "runtime" => true,
            _ => return Err(Error::invalid_input(format!("unsupported mappings.dynamic value \"{}\"", mode))),
        },
        Some(other) => {
            return Err(Error::invalid_input(format!("unsupported mappings.dynamic value {}", other)));
        }
    };

    if enabled {
        warn!("dynamic mapping is not supported; undeclared fields will be rejected");
    }
    Ok(())
}

impl Schema {
    pub fn new() -> Self {
        Schema::default()
    }

    /// Decode an index creation body. Fails with `InvalidInput` on a
    /// `mappings.dynamic` value other than a boolean, `"true"`, `"false"`,
    /// `"strict"` or `"runtime"`. Undeclared fields are rejected at write
    /// time whichever of these is given.
    pub fn from_json(body: &serde_json::Value) -> Result<Self> {
        let body: IndexBody = serde_json::from_value(body.clone())?;
        check_dynamic(body.mappings.dynamic.as_ref())?;
        Ok(Schema {
            fields: body.mappings.properties,
            analyzers: body.settings.analysis.analyzer,
        })
    }

    pub fn add_field(mut self, name: &str, definition: FieldDefinition) -> Self {
        self.fields.insert(name.to_string(), definition);
        self
    }

    pub fn add_text_field(self, name: &str, analyzer: Option<&str>) -> Self {
        self.add_field(name, FieldDefinition {
            field_type: FieldType::Text,
            analyzer: analyzer.map(str::to_string),
        })
    }

    pub fn add_keyword_field(self, name: &str) -> Self {
        self.add_field(name, FieldDefinition::new(FieldType::Keyword))
    }

    pub fn add_date_field(self, name: &str) -> Self {
        self.add_field(name, FieldDefinition::new(FieldType::Date))
    }

    pub fn add_float_field(self, name: &str) -> Self {
        self.add_field(name, FieldDefinition::new(FieldType::Float))
    }

    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.get(name)
    }

    /// Like [`Schema::field`] but failing with `UnknownField`.
    pub fn require_field(&self, name: &str) -> Result<&FieldDefinition> {
        self.fields.get(name).ok_or_else(|| Error::unknown_field(name))
    }

    pub fn get_analyzer_for_field(&self, field_name: &str) -> Option<&str> {
        self.fields.get(field_name).and_then(|f| f.analyzer_name())
    }

    /// Check field/analyzer bindings and build the analyzers. Fails with
    /// `UnknownAnalyzer` when a Text field names an analyzer that is neither
    /// declared nor built in.
    pub fn build_analyzers(&self, max_token_length: usize) -> Result<AnalyzerRegistry> {
        let mut registry = AnalyzerRegistry::new(max_token_length);
        for (name, config) in &self.analyzers {
            registry.register(name, Analyzer::from_config(name, config, max_token_length)?);
        }

        for (field_name, definition) in &self.fields {
            match (&definition.field_type, &definition.analyzer) {
                (FieldType::Text, Some(analyzer)) if !registry.contains(analyzer) => {
                    return Err(Error::new(
                        ErrorKind::UnknownAnalyzer,
                        format!("field [{}] references unknown analyzer [{}]", field_name, analyzer),
                    ));
                }
                (FieldType::Text, _) | (_, None) => {}
                (field_type, Some(_)) => {
                    return Err(Error::invalid_input(format!(
                        "field [{}] of type {:?} cannot have an analyzer", field_name, field_type
                    )));
                }
            }
        }

        Ok(registry)
    }

    /// Write-time type check of a single field value.
    pub fn check_value(&self, field: &str, value: &FieldValue) -> Result<()> {
        let definition = self.fields.get(field).ok_or_else(|| Error::new(
            ErrorKind::SchemaMismatch,
            format!("field [{}] is not declared in the mapping", field),
        ))?;

        if definition.field_type != value.field_type() {
            return Err(Error::new(
                ErrorKind::SchemaMismatch,
                format!("field [{}] is {:?} but got a {:?} value",
                        field, definition.field_type, value.field_type()),
            ));
        }

        if let FieldValue::Float(v) = value {
            if !v.is_finite() {
                return Err(Error::new(
                    ErrorKind::SchemaMismatch,
                    format!("field [{}] needs a finite number, got {}", field, v),
                ));
            }
        }

        Ok(())
    }

    pub fn check_fields(&self, fields: &Fields) -> Result<()> {
        for (name, value) in fields {
            self.check_value(name, value)?;
        }
        Ok(())
    }

    /// Convert a loosely typed JSON value into the field's declared type.
    pub fn coerce_value(&self, field: &str, value: &serde_json::Value) -> Result<FieldValue> {
        let definition = self.fields.get(field).ok_or_else(|| Error::new(
            ErrorKind::SchemaMismatch,
            format!("field [{}] is not declared in the mapping", field),
        ))?;

        let mismatch = || Error::new(
            ErrorKind::SchemaMismatch,
            format!("field [{}] of type {:?} cannot take value {}", field, definition.field_type, value),
        );

        match (definition.field_type, value) {
            (FieldType::Text, serde_json::Value::String(s)) => Ok(FieldValue::Text(s.clone())),
            (FieldType::Keyword, serde_json::Value::String(s)) => Ok(FieldValue::Keyword(s.clone())),
            (FieldType::Keyword, serde_json::Value::Number(n)) => Ok(FieldValue::Keyword(n.to_string())),
            (FieldType::Keyword, serde_json::Value::Bool(b)) => Ok(FieldValue::Keyword(b.to_string())),
            (FieldType::Float, serde_json::Value::Number(n)) => {
                n.as_f64().filter(|v| v.is_finite()).map(FieldValue::Float).ok_or_else(mismatch)
            }
            (FieldType::Float, serde_json::Value::String(s)) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(FieldValue::Float)
                .ok_or_else(mismatch),
            (FieldType::Date, serde_json::Value::String(s)) => {
                parse_date(s).map(FieldValue::Date).ok_or_else(mismatch)
            }
            (FieldType::Date, serde_json::Value::Number(n)) => n
                .as_i64()
                .and_then(DateTime::<Utc>::from_timestamp_millis)
                .map(FieldValue::Date)
                .ok_or_else(mismatch),
            _ => Err(mismatch()),
        }
    }

    /// Typed fields from a JSON object. `null` members are skipped.
    pub fn fields_from_json(&self, source: &serde_json::Value) -> Result<Fields> {
        let object = source.as_object().ok_or_else(|| {
            Error::new(ErrorKind::SchemaMismatch, format!("document source must be an object, got {}", source))
        })?;

        let mut fields = Fields::with_capacity(object.len());
        for (name, value) in object {
            if value.is_null() {
                continue;
            }
            fields.insert(name.clone(), self.coerce_value(name, value)?);
        }
        Ok(fields)
    }

    pub fn document_from_json(&self, id: DocId, source: &serde_json::Value) -> Result<Document> {
        Ok(Document::with_fields(id, self.fields_from_json(source)?))
    }
}

/// RFC 3339 timestamps or plain `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_date(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(date_time) = DateTime::parse_from_rfc3339(text) {
        return Some(date_time.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
