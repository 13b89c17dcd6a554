//! Prediction Forms
//!
//! The four forms the page knows about, their field schemas, and the
//! conversion of raw field values into the JSON payload sent to the API.
//!
//! Field values arrive as strings (that is all a DOM input holds). Checkboxes
//! become booleans, number inputs become floats, everything else stays text.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::error::FormError;

/// Identity of a prediction form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FormId {
    Packaging,
    Carbon,
    Product,
    Esg,
}

impl FormId {
    pub const ALL: [FormId; 4] = [FormId::Packaging, FormId::Carbon, FormId::Product, FormId::Esg];

    /// Resolve a form element id (`packagingForm`, ...)
    pub fn from_element_id(id: &str) -> Result<Self, FormError> {
        match id {
            "packagingForm" => Ok(FormId::Packaging),
            "carbonForm" => Ok(FormId::Carbon),
            "productForm" => Ok(FormId::Product),
            "esgForm" => Ok(FormId::Esg),
            other => Err(FormError::UnknownForm(other.to_string())),
        }
    }

    /// The form element id
    pub fn element_id(&self) -> &'static str {
        match self {
            FormId::Packaging => "packagingForm",
            FormId::Carbon => "carbonForm",
            FormId::Product => "productForm",
            FormId::Esg => "esgForm",
        }
    }

    /// Id of the element that receives the rendered result
    pub fn result_target(&self) -> &'static str {
        match self {
            FormId::Packaging => "packagingResult",
            FormId::Carbon => "carbonResult",
            FormId::Product => "productResult",
            FormId::Esg => "esgResult",
        }
    }

    /// API route the form posts to
    pub fn endpoint(&self) -> &'static str {
        match self {
            FormId::Packaging => "/api/predict/packaging",
            FormId::Carbon => "/api/predict/carbon-footprint",
            FormId::Product => "/api/predict/product-recommendation",
            FormId::Esg => "/api/predict/esg-score",
        }
    }

    /// Model backing this form
    pub fn model(&self) -> ModelKind {
        match self {
            FormId::Packaging => ModelKind::Packaging,
            FormId::Carbon => ModelKind::CarbonFootprint,
            FormId::Product => ModelKind::ProductRecommendation,
            FormId::Esg => ModelKind::EsgScore,
        }
    }

    /// Heading shown above the form
    pub fn title(&self) -> &'static str {
        match self {
            FormId::Packaging => "Packaging Recommendation",
            FormId::Carbon => "Carbon Footprint",
            FormId::Product => "Product Recommendation",
            FormId::Esg => "ESG Score Analysis",
        }
    }

    /// Short name accepted on the command line
    pub fn slug(&self) -> &'static str {
        match self {
            FormId::Packaging => "packaging",
            FormId::Carbon => "carbon",
            FormId::Product => "product",
            FormId::Esg => "esg",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.slug() == slug)
    }

    /// Field schema for this form
    pub fn fields(&self) -> &'static [FieldSpec] {
        match self {
            FormId::Packaging => PACKAGING_FIELDS,
            FormId::Carbon => CARBON_FIELDS,
            FormId::Product => PRODUCT_FIELDS,
            FormId::Esg => ESG_FIELDS,
        }
    }

    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields().iter().find(|f| f.name == name)
    }
}

impl fmt::Display for FormId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.element_id())
    }
}

/// Backend models, named the way `/api/models/*` names them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelKind {
    Packaging,
    CarbonFootprint,
    ProductRecommendation,
    EsgScore,
}

impl ModelKind {
    pub const ALL: [ModelKind; 4] = [
        ModelKind::Packaging,
        ModelKind::CarbonFootprint,
        ModelKind::ProductRecommendation,
        ModelKind::EsgScore,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::Packaging => "packaging",
            ModelKind::CarbonFootprint => "carbon_footprint",
            ModelKind::ProductRecommendation => "product_recommendation",
            ModelKind::EsgScore => "esg_score",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == name)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ModelKind::Packaging => "Packaging",
            ModelKind::CarbonFootprint => "Carbon Footprint",
            ModelKind::ProductRecommendation => "Product Recommendation",
            ModelKind::EsgScore => "ESG Analysis",
        }
    }
}

// ============ Schema ============

/// How a field is entered
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    Number {
        min: Option<f64>,
        max: Option<f64>,
        step: f64,
    },
    Select(&'static [&'static str]),
    Checkbox,
}

impl FieldKind {
    pub fn input_kind(&self) -> InputKind {
        match self {
            FieldKind::Number { .. } => InputKind::Number,
            FieldKind::Select(_) => InputKind::Select,
            FieldKind::Checkbox => InputKind::Checkbox,
        }
    }
}

/// Static description of one form field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    /// Initial value placed in the input
    pub default: &'static str,
}

impl FieldSpec {
    const fn number(
        name: &'static str,
        label: &'static str,
        min: Option<f64>,
        max: Option<f64>,
        step: f64,
        default: &'static str,
    ) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Number { min, max, step },
            required: true,
            default,
        }
    }

    const fn select(
        name: &'static str,
        label: &'static str,
        options: &'static [&'static str],
        default: &'static str,
    ) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Select(options),
            required: true,
            default,
        }
    }

    /// Check a raw value the way native constraint validation would.
    ///
    /// Returns the browser-style message for the first failed constraint.
    pub fn validate(&self, raw: &RawField) -> Result<(), FormError> {
        let invalid = |message: String| FormError::InvalidField {
            field: self.name.to_string(),
            message,
        };
        let value = raw.value.trim();

        match self.kind {
            FieldKind::Checkbox => Ok(()),
            _ if value.is_empty() => {
                if self.required {
                    Err(invalid(format!("{} is required", self.label)))
                } else {
                    Ok(())
                }
            }
            FieldKind::Number { min, max, .. } => {
                let number: f64 = value.parse().map_err(|_| FormError::InvalidNumber {
                    field: self.name.to_string(),
                    value: value.to_string(),
                })?;
                if let Some(min) = min {
                    if number < min {
                        return Err(invalid(format!(
                            "{} must be greater than or equal to {}",
                            self.label, min
                        )));
                    }
                }
                if let Some(max) = max {
                    if number > max {
                        return Err(invalid(format!(
                            "{} must be less than or equal to {}",
                            self.label, max
                        )));
                    }
                }
                Ok(())
            }
            FieldKind::Select(options) => {
                if options.contains(&value) {
                    Ok(())
                } else {
                    Err(invalid(format!("Please select a valid {}", self.label)))
                }
            }
        }
    }
}

const PACKAGING_FIELDS: &[FieldSpec] = &[
    FieldSpec::number("product_weight", "Product Weight (kg)", Some(0.1), Some(100.0), 0.1, "5"),
    FieldSpec::select("fragility", "Fragility", &["low", "medium", "high"], "medium"),
    FieldSpec::select(
        "material_type",
        "Material Type",
        &["plastic", "glass", "metal", "organic"],
        "plastic",
    ),
    FieldSpec::select("transport_mode", "Transport Mode", &["ground", "air", "sea"], "ground"),
];

const CARBON_FIELDS: &[FieldSpec] = &[
    FieldSpec::number("age", "Age", Some(18.0), Some(100.0), 1.0, "35"),
    FieldSpec::number("income", "Annual Income ($)", Some(0.0), None, 1000.0, "50000"),
    FieldSpec::select("location", "Location", &["urban", "suburban", "rural"], "urban"),
    FieldSpec::select(
        "transport_preference",
        "Transport Preference",
        &["car", "public_transport", "bike", "walk"],
        "car",
    ),
];

const PRODUCT_FIELDS: &[FieldSpec] = &[
    FieldSpec::select(
        "category",
        "Category",
        &["electronics", "clothing", "food", "home", "beauty"],
        "electronics",
    ),
    FieldSpec::number("budget", "Budget ($)", Some(0.0), None, 10.0, "500"),
    FieldSpec {
        name: "eco_priority",
        label: "Prioritize eco-friendly products",
        kind: FieldKind::Checkbox,
        required: false,
        default: "on",
    },
];

const ESG_FIELDS: &[FieldSpec] = &[
    FieldSpec::number("carbon_emissions", "Carbon Emissions (tons)", Some(0.0), None, 100.0, "5000"),
    FieldSpec::number("renewable_energy", "Renewable Energy (%)", Some(0.0), Some(100.0), 1.0, "30"),
    FieldSpec::number("waste_management", "Waste Management (1-10)", Some(1.0), Some(10.0), 0.5, "5"),
    FieldSpec::number("employee_satisfaction", "Employee Satisfaction (1-10)", Some(1.0), Some(10.0), 0.5, "7"),
    FieldSpec::number("diversity_score", "Diversity Score (1-10)", Some(1.0), Some(10.0), 0.5, "6"),
    FieldSpec::number("community_impact", "Community Impact (1-10)", Some(1.0), Some(10.0), 0.5, "6"),
    FieldSpec::number("board_independence", "Board Independence (%)", Some(0.0), Some(100.0), 1.0, "60"),
    FieldSpec::number("transparency_score", "Transparency (1-10)", Some(1.0), Some(10.0), 0.5, "7"),
    FieldSpec::number("ethics_score", "Ethics (1-10)", Some(1.0), Some(10.0), 0.5, "7"),
];

// ============ Raw fields and payload ============

/// The input type of a field as the DOM reports it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Text,
    Number,
    Select,
    Checkbox,
}

/// One field value as read from a form element
#[derive(Debug, Clone, PartialEq)]
pub struct RawField {
    pub name: String,
    pub kind: InputKind,
    pub value: String,
    pub checked: bool,
}

impl RawField {
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: InputKind::Text,
            value: value.into(),
            checked: false,
        }
    }

    pub fn number(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: InputKind::Number,
            ..Self::text(name, value)
        }
    }

    pub fn select(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: InputKind::Select,
            ..Self::text(name, value)
        }
    }

    pub fn checkbox(name: impl Into<String>, checked: bool) -> Self {
        Self {
            name: name.into(),
            kind: InputKind::Checkbox,
            value: if checked { "on".to_string() } else { String::new() },
            checked,
        }
    }

    /// Build a raw field for `name` using the form schema to pick its kind.
    ///
    /// Names missing from the schema are sent as text. For checkboxes the
    /// value is read as a flag (`true`/`on`/`yes`/`1`).
    pub fn from_schema(form: FormId, name: &str, value: &str) -> Self {
        match form.field(name).map(|spec| spec.kind.input_kind()) {
            Some(InputKind::Checkbox) => {
                let checked = matches!(
                    value.trim().to_ascii_lowercase().as_str(),
                    "true" | "on" | "yes" | "1"
                );
                Self::checkbox(name, checked)
            }
            Some(InputKind::Number) => Self::number(name, value),
            Some(InputKind::Select) => Self::select(name, value),
            _ => Self::text(name, value),
        }
    }
}

/// A JSON scalar in the request body
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Number(f64),
    Text(String),
}

/// The JSON object posted to a prediction endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FormPayload(BTreeMap<String, FieldValue>);

impl FormPayload {
    /// Coerce raw fields into a payload.
    ///
    /// Checkboxes always produce a boolean. Non-empty number inputs must parse
    /// as a float; empty ones are left out so the backend default applies.
    /// A later field with the same name replaces an earlier one.
    pub fn from_fields(fields: &[RawField]) -> Result<Self, FormError> {
        let mut values = BTreeMap::new();

        for field in fields {
            let value = match field.kind {
                InputKind::Checkbox => FieldValue::Flag(field.checked),
                InputKind::Number => {
                    let trimmed = field.value.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    let number: f64 = trimmed.parse().map_err(|_| FormError::InvalidNumber {
                        field: field.name.clone(),
                        value: field.value.clone(),
                    })?;
                    if !number.is_finite() {
                        return Err(FormError::InvalidNumber {
                            field: field.name.clone(),
                            value: field.value.clone(),
                        });
                    }
                    FieldValue::Number(number)
                }
                InputKind::Text | InputKind::Select => FieldValue::Text(field.value.clone()),
            };
            values.insert(field.name.clone(), value);
        }

        Ok(Self(values))
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// Run schema validation over a set of raw fields.
///
/// Returns the first invalid field, in schema order. Schema fields that are
/// missing from `fields` are validated as empty.
pub fn validate_fields(form: FormId, fields: &[RawField]) -> Result<(), FormError> {
    for spec in form.fields() {
        let missing = RawField {
            name: spec.name.to_string(),
            kind: spec.kind.input_kind(),
            value: String::new(),
            checked: false,
        };
        let raw = fields.iter().find(|f| f.name == spec.name).unwrap_or(&missing);
        spec.validate(raw)?;
    }
    Ok(())
}

/// Raw fields holding every schema default
pub fn default_fields(form: FormId) -> Vec<RawField> {
    form.fields()
        .iter()
        .map(|spec| match spec.kind {
            FieldKind::Checkbox => RawField::checkbox(spec.name, !spec.default.is_empty()),
            FieldKind::Number { .. } => RawField::number(spec.name, spec.default),
            FieldKind::Select(_) => RawField::select(spec.name, spec.default),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_id_round_trip() {
        for form in FormId::ALL {
            assert_eq!(FormId::from_element_id(form.element_id()), Ok(form));
            assert_eq!(FormId::from_slug(form.slug()), Some(form));
        }
    }

    #[test]
    fn test_unknown_form() {
        let err = FormId::from_element_id("newsletterForm").unwrap_err();
        assert_eq!(err, FormError::UnknownForm("newsletterForm".to_string()));
    }

    #[test]
    fn test_endpoint_table() {
        assert_eq!(FormId::Packaging.endpoint(), "/api/predict/packaging");
        assert_eq!(FormId::Carbon.endpoint(), "/api/predict/carbon-footprint");
        assert_eq!(FormId::Product.endpoint(), "/api/predict/product-recommendation");
        assert_eq!(FormId::Esg.endpoint(), "/api/predict/esg-score");
    }

    #[test]
    fn test_result_target_replaces_form_suffix() {
        for form in FormId::ALL {
            assert_eq!(
                form.result_target(),
                form.element_id().replace("Form", "Result")
            );
        }
    }

    #[test]
    fn test_payload_coercion() {
        let fields = vec![
            RawField::select("category", "clothing"),
            RawField::number("budget", "120.5"),
            RawField::checkbox("eco_priority", false),
        ];
        let payload = FormPayload::from_fields(&fields).unwrap();

        assert_eq!(payload.get("category"), Some(&FieldValue::Text("clothing".into())));
        assert_eq!(payload.get("budget"), Some(&FieldValue::Number(120.5)));
        assert_eq!(payload.get("eco_priority"), Some(&FieldValue::Flag(false)));

        let json = payload.to_json();
        assert!(json["budget"].is_f64());
        assert!(json["eco_priority"].is_boolean());
        assert!(json["category"].is_string());
    }

    #[test]
    fn test_invalid_number_rejected() {
        let fields = vec![RawField::number("age", "thirty")];
        let err = FormPayload::from_fields(&fields).unwrap_err();
        assert_eq!(err.field(), Some("age"));
        assert!(matches!(err, FormError::InvalidNumber { .. }));

        let fields = vec![RawField::number("age", "NaN")];
        assert!(FormPayload::from_fields(&fields).is_err());
    }

    #[test]
    fn test_empty_number_omitted() {
        let fields = vec![RawField::number("budget", "  ")];
        let payload = FormPayload::from_fields(&fields).unwrap();
        assert!(payload.get("budget").is_none());
        assert!(payload.is_empty());
    }

    #[test]
    fn test_from_schema_picks_kind() {
        let field = RawField::from_schema(FormId::Product, "eco_priority", "yes");
        assert_eq!(field.kind, InputKind::Checkbox);
        assert!(field.checked);

        let field = RawField::from_schema(FormId::Product, "budget", "200");
        assert_eq!(field.kind, InputKind::Number);

        let field = RawField::from_schema(FormId::Product, "notes", "hello");
        assert_eq!(field.kind, InputKind::Text);
    }

    #[test]
    fn test_validate_fields() {
        assert!(validate_fields(FormId::Carbon, &default_fields(FormId::Carbon)).is_ok());

        let mut fields = default_fields(FormId::Carbon);
        fields[0].value = "12".to_string();
        let err = validate_fields(FormId::Carbon, &fields).unwrap_err();
        assert_eq!(err.field(), Some("age"));
        assert_eq!(err.to_string(), "Age must be greater than or equal to 18");

        let mut fields = default_fields(FormId::Packaging);
        fields[1].value = "extreme".to_string();
        let err = validate_fields(FormId::Packaging, &fields).unwrap_err();
        assert_eq!(err.field(), Some("fragility"));
    }

    #[test]
    fn test_missing_required_field() {
        let err = validate_fields(FormId::Packaging, &[]).unwrap_err();
        assert_eq!(err.field(), Some("product_weight"));
        assert_eq!(err.to_string(), "Product Weight (kg) is required");
    }

    #[test]
    fn test_defaults_are_valid_for_every_form() {
        for form in FormId::ALL {
            let fields = default_fields(form);
            assert_eq!(fields.len(), form.fields().len());
            assert!(validate_fields(form, &fields).is_ok(), "{form}");
            assert!(FormPayload::from_fields(&fields).is_ok());
        }
    }
}
