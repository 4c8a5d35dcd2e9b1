//! Payload validation for entity schemas
//!
//! Entities are built from an untyped payload, either a JSON value or a set
//! of submitted form fields. Readers collect every offending field instead
//! of stopping at the first one, so a rejected request lists all of them.

use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use std::{collections::HashMap, fmt, sync::OnceLock};

/// Field name reported when the payload itself has the wrong shape
pub const BODY_FIELD: &str = "body";

/// Category of a field validation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// A required field was absent or null
    MissingField,
    /// The field was present with the wrong type
    TypeMismatch,
    /// The field had the right type but an invalid value
    InvalidFormat,
}

/// A single offending field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Dotted path of the field, e.g. `events[0].title`
    pub field: String,
    pub kind: ErrorKind,
    pub message: String,
}

/// Every field that failed validation, in the order they were checked
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, kind: ErrorKind, message: impl Into<String>) {
        self.0.push(FieldError {
            field: field.into(),
            kind,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    /// Kind of the first error reported for `field`, if any
    pub fn kind_of(&self, field: &str) -> Option<ErrorKind> {
        self.0.iter().find(|e| e.field == field).map(|e| e.kind)
    }

    /// Re-root errors from a nested entity under `prefix`
    fn extend_nested(&mut self, prefix: &str, nested: ValidationErrors) {
        for mut error in nested.0 {
            error.field = if error.field == BODY_FIELD {
                prefix.to_string()
            } else {
                format!("{}.{}", prefix, error.field)
            };
            self.0.push(error);
        }
    }

    /// `Ok(())` when nothing was reported
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for error in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", error.field, error.message)?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// An entity that can be validated from a JSON payload
pub trait Schema: Sized {
    fn from_json(value: &Value) -> Result<Self, ValidationErrors>;
}

/// An entity that can be validated from submitted form fields
pub trait FormSchema: Sized {
    fn from_form(form: &FormFields) -> Result<Self, ValidationErrors>;
}

/// An email address that passed [`validate_email`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    pub fn parse(value: &str) -> Result<Self, String> {
        validate_email(value)?;
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email must not be empty".to_string());
    }

    if email.len() > 254 {
        return Err("Email must be at most 254 characters long".to_string());
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(concat!(
            r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*",
            r"@(?:[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?\.)+[A-Za-z]{2,}$",
        ))
        .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Validate that a text field carries something besides whitespace
pub fn validate_non_empty(value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err("Value must not be empty".to_string());
    }
    Ok(())
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn mismatch(expected: &str, found: &Value) -> String {
    format!("Expected {}, found {}", expected, json_type_name(found))
}

/// Field-by-field reader over a JSON object payload
///
/// Each accessor returns `None` exactly when it recorded an error, so a
/// caller holding all `Some` values and an empty [`JsonFields::finish`]
/// result has a valid entity.
pub struct JsonFields<'a> {
    object: Option<&'a Map<String, Value>>,
    errors: ValidationErrors,
}

impl<'a> JsonFields<'a> {
    pub fn new(value: &'a Value) -> Self {
        let mut errors = ValidationErrors::new();
        let object = match value {
            Value::Object(map) => Some(map),
            other => {
                errors.push(BODY_FIELD, ErrorKind::TypeMismatch, mismatch("an object", other));
                None
            }
        };
        Self { object, errors }
    }

    fn lookup(&self, name: &str) -> Option<&'a Value> {
        self.object
            .and_then(|map| map.get(name))
            .filter(|value| !value.is_null())
    }

    fn required(&mut self, name: &str) -> Option<&'a Value> {
        // A non-object body already reported the payload as a whole.
        self.object?;
        let value = self.lookup(name);
        if value.is_none() {
            self.errors
                .push(name, ErrorKind::MissingField, "Field required");
        }
        value
    }

    pub fn string(&mut self, name: &str) -> Option<String> {
        match self.required(name)? {
            Value::String(s) => Some(s.clone()),
            other => {
                self.errors
                    .push(name, ErrorKind::TypeMismatch, mismatch("a string", other));
                None
            }
        }
    }

    pub fn non_empty_string(&mut self, name: &str) -> Option<String> {
        let value = self.string(name)?;
        match validate_non_empty(&value) {
            Ok(()) => Some(value),
            Err(message) => {
                self.errors.push(name, ErrorKind::InvalidFormat, message);
                None
            }
        }
    }

    pub fn email(&mut self, name: &str) -> Option<Email> {
        let value = self.string(name)?;
        match Email::parse(&value) {
            Ok(email) => Some(email),
            Err(message) => {
                self.errors.push(name, ErrorKind::InvalidFormat, message);
                None
            }
        }
    }

    pub fn integer(&mut self, name: &str) -> Option<i64> {
        let value = self.required(name)?;
        self.as_integer(name, value)
    }

    /// `Some(None)` when absent, `None` when present but not an integer
    pub fn optional_integer(&mut self, name: &str) -> Option<Option<i64>> {
        match self.lookup(name) {
            None => Some(None),
            Some(value) => self.as_integer(name, value).map(Some),
        }
    }

    fn as_integer(&mut self, name: &str, value: &Value) -> Option<i64> {
        match value.as_i64() {
            Some(n) => Some(n),
            None => {
                self.errors
                    .push(name, ErrorKind::TypeMismatch, mismatch("an integer", value));
                None
            }
        }
    }

    /// Required list of strings, order preserved
    pub fn string_list(&mut self, name: &str) -> Option<Vec<String>> {
        let items = match self.required(name)? {
            Value::Array(items) => items,
            other => {
                self.errors
                    .push(name, ErrorKind::TypeMismatch, mismatch("an array", other));
                return None;
            }
        };

        let mut strings = Vec::with_capacity(items.len());
        let mut valid = true;
        for (index, item) in items.iter().enumerate() {
            match item {
                Value::String(s) => strings.push(s.clone()),
                other => {
                    self.errors.push(
                        format!("{}[{}]", name, index),
                        ErrorKind::TypeMismatch,
                        mismatch("a string", other),
                    );
                    valid = false;
                }
            }
        }
        valid.then_some(strings)
    }

    /// Optional list of nested entities; absent or null yields an empty list
    pub fn optional_list<T: Schema>(&mut self, name: &str) -> Option<Vec<T>> {
        let items = match self.lookup(name) {
            None => return Some(Vec::new()),
            Some(Value::Array(items)) => items,
            Some(other) => {
                self.errors
                    .push(name, ErrorKind::TypeMismatch, mismatch("an array", other));
                return None;
            }
        };

        let mut entities = Vec::with_capacity(items.len());
        let mut valid = true;
        for (index, item) in items.iter().enumerate() {
            match T::from_json(item) {
                Ok(entity) => entities.push(entity),
                Err(nested) => {
                    self.errors
                        .extend_nested(&format!("{}[{}]", name, index), nested);
                    valid = false;
                }
            }
        }
        valid.then_some(entities)
    }

    pub fn finish(self) -> ValidationErrors {
        self.errors
    }

    /// Turn the value assembled from this reader into the validation
    /// outcome.
    pub fn conclude<T>(self, value: Option<T>) -> Result<T, ValidationErrors> {
        conclude(self.errors, value)
    }
}

fn conclude<T>(errors: ValidationErrors, value: Option<T>) -> Result<T, ValidationErrors> {
    match value {
        Some(value) if errors.is_empty() => Ok(value),
        _ => Err(errors),
    }
}

/// Independently submitted named form values
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields(HashMap<String, String>);

impl FormFields {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn reader(&self) -> FormReader<'_> {
        FormReader {
            form: self,
            errors: ValidationErrors::new(),
        }
    }
}

impl FromIterator<(String, String)> for FormFields {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'k, 'v> FromIterator<(&'k str, &'v str)> for FormFields {
    fn from_iter<I: IntoIterator<Item = (&'k str, &'v str)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}

/// Field-by-field reader over form values, with the same contract as
/// [`JsonFields`]. Every form value is text, so there is no type mismatch.
pub struct FormReader<'a> {
    form: &'a FormFields,
    errors: ValidationErrors,
}

impl FormReader<'_> {
    pub fn string(&mut self, name: &str) -> Option<String> {
        match self.form.get(name) {
            Some(value) => Some(value.to_string()),
            None => {
                self.errors
                    .push(name, ErrorKind::MissingField, "Field required");
                None
            }
        }
    }

    pub fn non_empty_string(&mut self, name: &str) -> Option<String> {
        let value = self.string(name)?;
        match validate_non_empty(&value) {
            Ok(()) => Some(value),
            Err(message) => {
                self.errors.push(name, ErrorKind::InvalidFormat, message);
                None
            }
        }
    }

    pub fn email(&mut self, name: &str) -> Option<Email> {
        let value = self.string(name)?;
        match Email::parse(&value) {
            Ok(email) => Some(email),
            Err(message) => {
                self.errors.push(name, ErrorKind::InvalidFormat, message);
                None
            }
        }
    }

    pub fn finish(self) -> ValidationErrors {
        self.errors
    }

    /// See [`JsonFields::conclude`]
    pub fn conclude<T>(self, value: Option<T>) -> Result<T, ValidationErrors> {
        conclude(self.errors, value)
    }
}
