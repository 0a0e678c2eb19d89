//! Movie Payload Validation Module
//!
//! This module checks create and update payloads before they reach the
//! collection. Every failing field is reported, each issue carrying the path
//! of the offending value so the whole list can be returned to API callers
//! as-is.

use chrono::{Datelike, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use url::Url;

use crate::movie::{Genre, MovieDraft, MoviePatch};

/// Earliest release year accepted
pub const MIN_YEAR: i32 = 1900;

/// Rating applied when a create payload omits `rate`
pub const DEFAULT_RATE: f64 = 0.0;

/// Inclusive rating bounds
pub const MIN_RATE: f64 = 0.0;
pub const MAX_RATE: f64 = 10.0;

/// Payload keys the validator looks at. Anything else is ignored.
pub const RECOGNIZED_FIELDS: &[&str] = &[
    "title", "year", "director", "duration", "poster", "genre", "rate",
];

/// Largest float that still converts to an integer without precision loss
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Machine-readable reason attached to each issue.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    Required,
    InvalidType,
    TooSmall,
    TooBig,
    InvalidUrl,
    InvalidEnumValue,
    EmptyPatch,
    InvalidJson,
}

/// One step of an issue path: a field name or an array index.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum PathSegment {
    Field(String),
    Index(usize),
}

impl From<&str> for PathSegment {
    fn from(name: &str) -> Self {
        PathSegment::Field(name.to_string())
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

/// A single field-addressable validation failure.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ValidationIssue {
    pub code: IssueCode,
    /// Location of the offending value; empty for payload-level issues
    pub path: Vec<PathSegment>,
    pub message: String,
}

impl ValidationIssue {
    /// Issue attached to a top-level field.
    pub fn field(field: &str, code: IssueCode, message: impl Into<String>) -> Self {
        Self {
            code,
            path: vec![field.into()],
            message: message.into(),
        }
    }

    /// Issue about the payload as a whole.
    pub fn root(code: IssueCode, message: impl Into<String>) -> Self {
        Self {
            code,
            path: Vec::new(),
            message: message.into(),
        }
    }

    /// The top-level field this issue belongs to, if any.
    pub fn field_name(&self) -> Option<&str> {
        match self.path.first() {
            Some(PathSegment::Field(name)) => Some(name),
            _ => None,
        }
    }
}

/// Validation failure carrying every issue found in the payload.
#[derive(Error, Debug, Clone, Serialize, PartialEq)]
#[serde(transparent)]
#[error("payload failed validation with {} issue(s)", .issues.len())]
pub struct ValidationErrors {
    issues: Vec<ValidationIssue>,
}

impl ValidationErrors {
    pub fn new(issues: Vec<ValidationIssue>) -> Self {
        Self { issues }
    }

    /// Shorthand for a failure with a single payload-level issue.
    pub fn root(code: IssueCode, message: impl Into<String>) -> Self {
        Self::new(vec![ValidationIssue::root(code, message)])
    }

    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    /// Names of the top-level fields that failed, in report order.
    pub fn fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = Vec::new();
        for name in self.issues.iter().filter_map(ValidationIssue::field_name) {
            if !fields.contains(&name) {
                fields.push(name);
            }
        }
        fields
    }

    /// Whether `field` has at least one issue.
    pub fn has_field(&self, field: &str) -> bool {
        self.issues.iter().any(|issue| issue.field_name() == Some(field))
    }
}

/// Configuration for the movie validator
#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    /// Earliest accepted release year
    pub min_year: i32,
    /// Latest accepted release year. `None` tracks the calendar: next year,
    /// evaluated on every check.
    pub max_year: Option<i32>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            min_year: MIN_YEAR,
            max_year: None,
        }
    }
}

/// Schema checker for full and partial movie payloads
#[derive(Debug, Clone)]
pub struct MovieValidator {
    min_year: i32,
    max_year: Option<i32>,
}

impl MovieValidator {
    /// Create a validator accepting years up to next year
    pub fn new() -> Self {
        Self::with_config(ValidatorConfig::default())
    }

    pub fn with_config(config: ValidatorConfig) -> Self {
        Self {
            min_year: config.min_year,
            max_year: config.max_year,
        }
    }

    /// Latest accepted release year as of now
    pub fn max_year(&self) -> i32 {
        self.max_year.unwrap_or_else(|| Utc::now().year() + 1)
    }

    /// Validate a create payload. All fields except `rate` are required.
    pub fn validate(&self, payload: &Value) -> Result<MovieDraft, ValidationErrors> {
        let object = expect_object(payload)?;
        let mut issues = Vec::new();
        let fields = self.check_fields(object, true, &mut issues);

        match (
            fields.title,
            fields.year,
            fields.director,
            fields.duration,
            fields.poster,
            fields.genre,
        ) {
            (Some(title), Some(year), Some(director), Some(duration), Some(poster), Some(genre))
                if issues.is_empty() =>
            {
                Ok(MovieDraft {
                    title,
                    year,
                    director,
                    duration,
                    poster,
                    genre,
                    rate: fields.rate.unwrap_or(DEFAULT_RATE),
                })
            }
            _ => Err(ValidationErrors::new(issues)),
        }
    }

    /// Validate an update payload. Every field is optional, but at least one
    /// recognized field must be present and every present field must pass.
    pub fn validate_partial(&self, payload: &Value) -> Result<MoviePatch, ValidationErrors> {
        let object = expect_object(payload)?;
        let mut issues = Vec::new();
        let patch = self.check_fields(object, false, &mut issues);

        if !issues.is_empty() {
            return Err(ValidationErrors::new(issues));
        }
        if patch.is_empty() {
            return Err(ValidationErrors::root(
                IssueCode::EmptyPatch,
                format!(
                    "payload must contain at least one of: {}",
                    RECOGNIZED_FIELDS.join(", ")
                ),
            ));
        }
        Ok(patch)
    }

    /// Run every field rule in schema order, collecting issues.
    fn check_fields(
        &self,
        object: &Map<String, Value>,
        required: bool,
        issues: &mut Vec<ValidationIssue>,
    ) -> MoviePatch {
        MoviePatch {
            title: check(object, "title", required, issues, |v| non_empty_string("title", v)),
            year: check(object, "year", required, issues, |v| self.check_year(v)),
            director: check(object, "director", required, issues, |v| {
                non_empty_string("director", v)
            }),
            duration: check(object, "duration", required, issues, check_duration),
            poster: check(object, "poster", required, issues, check_poster),
            genre: check(object, "genre", required, issues, check_genre),
            // rate is optional even on create; the default is applied by the caller
            rate: check(object, "rate", false, issues, check_rate),
        }
    }

    fn check_year(&self, value: &Value) -> Result<i32, Vec<ValidationIssue>> {
        let year = integer("year", value)?;
        if year < i64::from(self.min_year) {
            return Err(vec![ValidationIssue::field(
                "year",
                IssueCode::TooSmall,
                format!("year must be {} or later", self.min_year),
            )]);
        }
        let max_year = self.max_year();
        if year > i64::from(max_year) {
            return Err(vec![ValidationIssue::field(
                "year",
                IssueCode::TooBig,
                format!("year must be {} or earlier", max_year),
            )]);
        }
        // bounded by the i32 range check above
        Ok(year as i32)
    }
}

impl Default for MovieValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience function to validate a create payload with default settings
pub fn validate_movie(payload: &Value) -> Result<MovieDraft, ValidationErrors> {
    MovieValidator::new().validate(payload)
}

/// Convenience function to validate an update payload with default settings
pub fn validate_partial_movie(payload: &Value) -> Result<MoviePatch, ValidationErrors> {
    MovieValidator::new().validate_partial(payload)
}

fn expect_object(payload: &Value) -> Result<&Map<String, Value>, ValidationErrors> {
    payload.as_object().ok_or_else(|| {
        ValidationErrors::root(
            IssueCode::InvalidType,
            format!("expected object, received {}", kind_of(payload)),
        )
    })
}

/// Apply `rule` to `field` if present. A missing required field records a
/// `required` issue.
fn check<T>(
    object: &Map<String, Value>,
    field: &str,
    required: bool,
    issues: &mut Vec<ValidationIssue>,
    rule: impl FnOnce(&Value) -> Result<T, Vec<ValidationIssue>>,
) -> Option<T> {
    match object.get(field) {
        Some(value) => match rule(value) {
            Ok(parsed) => Some(parsed),
            Err(mut found) => {
                issues.append(&mut found);
                None
            }
        },
        None => {
            if required {
                issues.push(ValidationIssue::field(
                    field,
                    IssueCode::Required,
                    format!("{} is required", field),
                ));
            }
            None
        }
    }
}

fn non_empty_string(field: &str, value: &Value) -> Result<String, Vec<ValidationIssue>> {
    match value {
        Value::String(s) if s.is_empty() => Err(vec![ValidationIssue::field(
            field,
            IssueCode::TooSmall,
            format!("{} must not be empty", field),
        )]),
        Value::String(s) => Ok(s.clone()),
        other => Err(vec![invalid_type(field, "string", other)]),
    }
}

fn integer(field: &str, value: &Value) -> Result<i64, Vec<ValidationIssue>> {
    if let Some(n) = value.as_i64() {
        return Ok(n);
    }
    match value.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() <= MAX_SAFE_INTEGER => Ok(f as i64),
        _ => Err(vec![invalid_type(field, "integer", value)]),
    }
}

fn check_duration(value: &Value) -> Result<u32, Vec<ValidationIssue>> {
    let minutes = integer("duration", value)?;
    if minutes <= 0 {
        return Err(vec![ValidationIssue::field(
            "duration",
            IssueCode::TooSmall,
            "duration must be a positive number of minutes",
        )]);
    }
    u32::try_from(minutes).map_err(|_| {
        vec![ValidationIssue::field(
            "duration",
            IssueCode::TooBig,
            format!("duration must be at most {} minutes", u32::MAX),
        )]
    })
}

fn check_poster(value: &Value) -> Result<String, Vec<ValidationIssue>> {
    let Value::String(raw) = value else {
        return Err(vec![invalid_type("poster", "string", value)]);
    };
    let well_formed = Url::parse(raw)
        .map(|url| url.host_str().is_some_and(|host| !host.is_empty()))
        .unwrap_or(false);
    if well_formed {
        Ok(raw.clone())
    } else {
        Err(vec![ValidationIssue::field(
            "poster",
            IssueCode::InvalidUrl,
            "poster must be a valid URL",
        )])
    }
}

fn check_genre(value: &Value) -> Result<Vec<Genre>, Vec<ValidationIssue>> {
    let Value::Array(items) = value else {
        return Err(vec![invalid_type("genre", "array", value)]);
    };
    if items.is_empty() {
        return Err(vec![ValidationIssue::field(
            "genre",
            IssueCode::TooSmall,
            "genre must contain at least one entry",
        )]);
    }

    let mut genres = Vec::with_capacity(items.len());
    let mut issues = Vec::new();
    for (index, item) in items.iter().enumerate() {
        let path = vec![PathSegment::from("genre"), PathSegment::from(index)];
        match item {
            Value::String(name) => match name.parse::<Genre>() {
                Ok(genre) => genres.push(genre),
                Err(_) => issues.push(ValidationIssue {
                    code: IssueCode::InvalidEnumValue,
                    path,
                    message: format!(
                        "expected one of {}, received '{}'",
                        allowed_genres(),
                        name
                    ),
                }),
            },
            other => issues.push(ValidationIssue {
                code: IssueCode::InvalidType,
                path,
                message: format!("expected string, received {}", kind_of(other)),
            }),
        }
    }

    if issues.is_empty() {
        Ok(genres)
    } else {
        Err(issues)
    }
}

fn check_rate(value: &Value) -> Result<f64, Vec<ValidationIssue>> {
    let Some(rate) = value.as_f64() else {
        return Err(vec![invalid_type("rate", "number", value)]);
    };
    if rate < MIN_RATE {
        Err(vec![ValidationIssue::field(
            "rate",
            IssueCode::TooSmall,
            format!("rate must be at least {}", MIN_RATE),
        )])
    } else if rate > MAX_RATE {
        Err(vec![ValidationIssue::field(
            "rate",
            IssueCode::TooBig,
            format!("rate must be at most {}", MAX_RATE),
        )])
    } else {
        Ok(rate)
    }
}

fn invalid_type(field: &str, expected: &str, received: &Value) -> ValidationIssue {
    ValidationIssue::field(
        field,
        IssueCode::InvalidType,
        format!("expected {}, received {}", expected, kind_of(received)),
    )
}

fn allowed_genres() -> String {
    Genre::ALL
        .iter()
        .map(|genre| format!("'{}'", genre))
        .collect::<Vec<_>>()
        .join(" | ")
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn validator() -> MovieValidator {
        MovieValidator::with_config(ValidatorConfig {
            min_year: MIN_YEAR,
            max_year: Some(2026),
        })
    }

    fn dune() -> Value {
        json!({
            "title": "Dune",
            "year": 2021,
            "director": "Denis Villeneuve",
            "duration": 155,
            "poster": "http://x/d.jpg",
            "genre": ["Sci-Fi"],
            "rate": 8
        })
    }

    #[test]
    fn test_valid_payload() {
        let draft = validator().validate(&dune()).unwrap();
        assert_eq!(draft.title, "Dune");
        assert_eq!(draft.year, 2021);
        assert_eq!(draft.duration, 155);
        assert_eq!(draft.genre, vec![Genre::SciFi]);
        assert_eq!(draft.rate, 8.0);
    }

    #[test]
    fn test_rate_defaults_to_zero() {
        let mut payload = dune();
        payload.as_object_mut().unwrap().remove("rate");

        let draft = validator().validate(&payload).unwrap();
        assert_eq!(draft.rate, DEFAULT_RATE);
    }

    #[test]
    fn test_missing_title_is_required() {
        let mut payload = dune();
        payload.as_object_mut().unwrap().remove("title");

        let err = validator().validate(&payload).unwrap_err();
        assert_eq!(err.fields(), vec!["title"]);
        assert_eq!(err.issues()[0].code, IssueCode::Required);
    }

    #[test]
    fn test_year_must_be_a_number() {
        let mut payload = dune();
        payload["year"] = json!("not-a-number");

        let err = validator().validate(&payload).unwrap_err();
        assert!(err.has_field("year"));
        assert_eq!(err.issues()[0].code, IssueCode::InvalidType);
        assert_eq!(err.issues()[0].message, "expected integer, received string");
    }

    #[test]
    fn test_year_range() {
        let mut payload = dune();
        payload["year"] = json!(1899);
        let err = validator().validate(&payload).unwrap_err();
        assert_eq!(err.issues()[0].code, IssueCode::TooSmall);

        payload["year"] = json!(2027);
        let err = validator().validate(&payload).unwrap_err();
        assert_eq!(err.issues()[0].code, IssueCode::TooBig);

        payload["year"] = json!(2026);
        assert!(validator().validate(&payload).is_ok());
    }

    #[test]
    fn test_default_max_year_is_next_year() {
        assert_eq!(MovieValidator::new().max_year(), Utc::now().year() + 1);
        assert_eq!(ValidatorConfig::default().max_year, None);
    }

    #[test]
    fn test_fixed_max_year() {
        let validator = validator();
        assert_eq!(validator.max_year(), 2026);

        let mut payload = dune();
        payload["year"] = json!(2027);
        let err = validator.validate(&payload).unwrap_err();
        assert_eq!(err.issues()[0].code, IssueCode::TooBig);
        assert_eq!(err.issues()[0].message, "year must be 2026 or earlier");
    }

    #[test]
    fn test_integral_float_is_accepted() {
        let mut payload = dune();
        payload["year"] = json!(2021.0);
        payload["duration"] = json!(155.0);
        assert!(validator().validate(&payload).is_ok());

        payload["duration"] = json!(155.5);
        let err = validator().validate(&payload).unwrap_err();
        assert_eq!(err.fields(), vec!["duration"]);
    }

    #[test]
    fn test_duration_must_be_positive() {
        let mut payload = dune();
        payload["duration"] = json!(0);
        let err = validator().validate(&payload).unwrap_err();
        assert_eq!(err.issues()[0].code, IssueCode::TooSmall);
    }

    #[test]
    fn test_empty_genre_list() {
        let mut payload = dune();
        payload["genre"] = json!([]);

        let err = validator().validate(&payload).unwrap_err();
        assert_eq!(err.fields(), vec!["genre"]);
        assert_eq!(err.issues()[0].code, IssueCode::TooSmall);
    }

    #[test]
    fn test_unknown_genre_points_at_element() {
        let mut payload = dune();
        payload["genre"] = json!(["Drama", "Romance"]);

        let err = validator().validate(&payload).unwrap_err();
        let issue = &err.issues()[0];
        assert_eq!(issue.code, IssueCode::InvalidEnumValue);
        assert_eq!(issue.path, vec![PathSegment::from("genre"), PathSegment::from(1)]);
        assert!(issue.message.contains("Romance"));
    }

    #[test]
    fn test_genre_names_are_case_sensitive_on_input() {
        let mut payload = dune();
        payload["genre"] = json!(["sci-fi"]);
        assert!(validator().validate(&payload).is_err());
    }

    #[test]
    fn test_poster_must_be_absolute_url() {
        let mut payload = dune();
        for bad in [
            "not a url",
            "/relative/poster.jpg",
            "",
            "http://x:99999/p.jpg",
            "mailto:posters@example.com",
        ] {
            payload["poster"] = json!(bad);
            let err = validator().validate(&payload).unwrap_err();
            assert_eq!(err.issues()[0].code, IssueCode::InvalidUrl, "accepted {:?}", bad);
        }

        for good in [
            "https://images.example.com/posters/dune.jpg",
            "http://x:8080/p.jpg",
            "https://例え.jp/p.jpg",
        ] {
            payload["poster"] = json!(good);
            assert!(validator().validate(&payload).is_ok(), "rejected {:?}", good);
        }
    }

    #[test]
    fn test_rate_bounds() {
        let mut payload = dune();
        payload["rate"] = json!(10.5);
        let err = validator().validate(&payload).unwrap_err();
        assert_eq!(err.issues()[0].code, IssueCode::TooBig);

        payload["rate"] = json!(-1);
        let err = validator().validate(&payload).unwrap_err();
        assert_eq!(err.issues()[0].code, IssueCode::TooSmall);

        payload["rate"] = json!("9");
        let err = validator().validate(&payload).unwrap_err();
        assert_eq!(err.issues()[0].code, IssueCode::InvalidType);
    }

    #[test]
    fn test_all_failing_fields_are_reported() {
        let payload = json!({
            "title": "",
            "year": "soon",
            "duration": -3,
            "poster": 42,
            "genre": "Drama"
        });

        let err = validator().validate(&payload).unwrap_err();
        assert_eq!(
            err.fields(),
            vec!["title", "year", "director", "duration", "poster", "genre"]
        );
    }

    #[test]
    fn test_non_object_payload() {
        let err = validator().validate(&json!([1, 2, 3])).unwrap_err();
        assert_eq!(err.issues().len(), 1);
        assert!(err.issues()[0].path.is_empty());
        assert_eq!(err.issues()[0].code, IssueCode::InvalidType);
    }

    #[test]
    fn test_unrecognized_keys_are_ignored() {
        let mut payload = dune();
        payload["id"] = json!("forged");
        payload["studio"] = json!("Legendary");
        assert!(validator().validate(&payload).is_ok());
    }

    #[test]
    fn test_partial_accepts_single_field() {
        let patch = validator().validate_partial(&json!({ "rate": 9.5 })).unwrap();
        assert_eq!(patch.rate, Some(9.5));
        assert!(patch.title.is_none());
        assert!(patch.year.is_none());
    }

    #[test]
    fn test_partial_does_not_default_rate() {
        let patch = validator().validate_partial(&json!({ "title": "Dune: Part One" })).unwrap();
        assert!(patch.rate.is_none());
    }

    #[test]
    fn test_partial_applies_field_rules() {
        let err = validator()
            .validate_partial(&json!({ "year": 1800, "title": "ok" }))
            .unwrap_err();
        assert_eq!(err.fields(), vec!["year"]);
    }

    #[test]
    fn test_partial_rejects_null() {
        let err = validator().validate_partial(&json!({ "director": null })).unwrap_err();
        assert_eq!(err.issues()[0].code, IssueCode::InvalidType);
    }

    #[test]
    fn test_partial_without_recognized_fields() {
        for payload in [json!({}), json!({ "id": "x", "studio": "A24" })] {
            let err = validator().validate_partial(&payload).unwrap_err();
            assert_eq!(err.issues()[0].code, IssueCode::EmptyPatch);
            assert!(err.issues()[0].path.is_empty());
        }
    }

    #[test]
    fn test_errors_serialize_as_issue_array() {
        let err = validator().validate_partial(&json!({ "genre": [] })).unwrap_err();
        let json = serde_json::to_value(&err).unwrap();

        assert_eq!(
            json,
            json!([{
                "code": "too_small",
                "path": ["genre"],
                "message": "genre must contain at least one entry"
            }])
        );
    }

    #[test]
    fn test_convenience_functions() {
        assert!(validate_movie(&dune()).is_ok());
        assert!(validate_partial_movie(&json!({ "duration": 120 })).is_ok());
    }
}
