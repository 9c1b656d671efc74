//! Schema validation entry points.
//!
//! A [`Schema`] is the caller-supplied capability that checks untyped JSON
//! against a shape, collecting every violation before failing. The three
//! entry points differ only in how they source the untyped input: the
//! request body, the query string, or resolved route parameters.

use std::collections::HashMap;
use std::future::Future;
use std::marker::PhantomData;

use axum::body::{to_bytes, Body};
use axum::http::{Request, Uri};
use serde::de::DeserializeOwned;
use serde_json::map::Entry;
use serde_json::{Map, Value};
use thiserror::Error;
use url::form_urlencoded;

use crate::error::{join_violations, ApiError, ApiResult, FieldError};

/// Raw schema violations, before they are wrapped into an [`ApiError`].
///
/// A schema (or caller code using one directly) raises this; the error
/// classifier converts it to a 422 when it crosses the wrapper boundary
/// unwrapped.
#[derive(Debug, Clone, Error)]
#[error("{}", join_violations(.0))]
pub struct SchemaViolations(pub Vec<FieldError>);

impl SchemaViolations {
    /// A single violation at the given dot-path (empty path means the
    /// whole request).
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self(vec![FieldError::new(field, message)])
    }
}

/// A caller-supplied validator: typed output or the full violation list.
///
/// Implementations must collect all violations rather than failing on the
/// first one.
pub trait Schema {
    type Output;

    fn parse(&self, value: Value) -> Result<Self::Output, SchemaViolations>;
}

/// Bridges any `serde`-deserializable type into a [`Schema`].
///
/// Serde deserialization is fail-fast, so this reports a single violation
/// at the request root; implement [`Schema`] directly when per-field
/// detail matters.
pub struct SerdeSchema<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> SerdeSchema<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for SerdeSchema<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: DeserializeOwned> Schema for SerdeSchema<T> {
    type Output = T;

    fn parse(&self, value: Value) -> Result<T, SchemaViolations> {
        serde_json::from_value(value).map_err(|e| SchemaViolations::single("", e.to_string()))
    }
}

fn run_schema<S: Schema>(value: Value, schema: &S) -> ApiResult<S::Output> {
    schema
        .parse(value)
        .map_err(|violations| ApiError::validation(violations.0))
}

/// Validate the request body as JSON.
///
/// A malformed payload is a transport-level failure and raises
/// `BadRequest("Invalid or missing JSON body")`, never a validation error;
/// schema-rule violations raise `ApiError::Validation`.
pub async fn validate_body<S: Schema>(
    request: &mut Request<Body>,
    schema: &S,
) -> ApiResult<S::Output> {
    let body = std::mem::replace(request.body_mut(), Body::empty());
    let bytes = to_bytes(body, usize::MAX)
        .await
        .map_err(|_| ApiError::bad_request("Invalid or missing JSON body"))?;

    let value: Value = serde_json::from_slice(&bytes)
        .map_err(|_| ApiError::bad_request("Invalid or missing JSON body"))?;

    run_schema(value, schema)
}

/// Validate the query string.
///
/// The multi-map is flattened into a plain object: the first occurrence
/// of a key stays a scalar, a second occurrence promotes it to an ordered
/// two-element array, and later occurrences append. Multi-valued filters
/// rely on this promotion order.
pub fn validate_query<S: Schema>(uri: &Uri, schema: &S) -> ApiResult<S::Output> {
    run_schema(flatten_query(uri.query().unwrap_or("")), schema)
}

fn flatten_query(query: &str) -> Value {
    let mut object = Map::new();

    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        let value = Value::String(value.into_owned());
        match object.entry(key.into_owned()) {
            Entry::Vacant(slot) => {
                slot.insert(value);
            }
            Entry::Occupied(mut slot) => match slot.get_mut() {
                Value::Array(items) => items.push(value),
                existing => {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, value]);
                }
            },
        }
    }

    Value::Object(object)
}

/// Validate already-resolved route parameters.
pub fn validate_params<S: Schema>(
    params: &HashMap<String, String>,
    schema: &S,
) -> ApiResult<S::Output> {
    let object = params
        .iter()
        .map(|(k, v)| (k.clone(), Value::String(v.clone())))
        .collect();
    run_schema(Value::Object(object), schema)
}

/// Validate route parameters that are still being resolved.
pub async fn validate_deferred_params<S, F>(params: F, schema: &S) -> ApiResult<S::Output>
where
    S: Schema,
    F: Future<Output = HashMap<String, String>>,
{
    validate_params(&params.await, schema)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, serde::Deserialize)]
    struct Filters {
        tag: Value,
        #[serde(default)]
        page: Option<String>,
    }

    /// Hand-written schema that collects every violation.
    struct SignupSchema;

    #[derive(Debug, PartialEq)]
    struct Signup {
        email: String,
        age: i64,
    }

    impl Schema for SignupSchema {
        type Output = Signup;

        fn parse(&self, value: Value) -> Result<Signup, SchemaViolations> {
            let mut violations = Vec::new();

            let email = match value.get("email").and_then(Value::as_str) {
                Some(e) if e.contains('@') => Some(e.to_string()),
                _ => {
                    violations.push(FieldError::new("email", "Invalid email"));
                    None
                }
            };
            let age = match value.get("profile").and_then(|p| p.get("age")) {
                Some(v) => v.as_i64().filter(|a| *a >= 0),
                None => None,
            };
            if age.is_none() {
                violations.push(FieldError::new("profile.age", "Must be a non-negative integer"));
            }

            match (email, age) {
                (Some(email), Some(age)) if violations.is_empty() => Ok(Signup { email, age }),
                _ => Err(SchemaViolations(violations)),
            }
        }
    }

    #[tokio::test]
    async fn test_validate_body_ok() {
        let mut request = Request::builder()
            .uri("/signup")
            .body(Body::from(
                r#"{"email":"a@b.io","profile":{"age":30}}"#,
            ))
            .unwrap();

        let signup = validate_body(&mut request, &SignupSchema).await.unwrap();
        assert_eq!(
            signup,
            Signup {
                email: "a@b.io".to_string(),
                age: 30
            }
        );
    }

    #[tokio::test]
    async fn test_validate_body_malformed_json_is_bad_request() {
        let mut request = Request::builder()
            .uri("/signup")
            .body(Body::from("{not json"))
            .unwrap();

        let err = validate_body(&mut request, &SignupSchema).await.unwrap_err();
        assert_eq!(
            err,
            ApiError::bad_request("Invalid or missing JSON body")
        );
        // transport failure, not a field-level one
        assert!(!matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn test_validate_body_collects_all_violations() {
        let mut request = Request::builder()
            .uri("/signup")
            .body(Body::from(r#"{"email":"nope","profile":{}}"#))
            .unwrap();

        let err = validate_body(&mut request, &SignupSchema).await.unwrap_err();
        match err {
            ApiError::Validation(violations) => {
                assert_eq!(violations.len(), 2);
                assert_eq!(violations[0].field, "email");
                assert_eq!(violations[1].field, "profile.age");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_query_repeated_key_promotion() {
        let flattened = flatten_query("tag=a&tag=b&tag=c");
        assert_eq!(
            flattened["tag"],
            Value::Array(vec!["a".into(), "b".into(), "c".into()])
        );
    }

    #[test]
    fn test_query_single_key_stays_scalar() {
        let flattened = flatten_query("tag=a&page=2");
        assert_eq!(flattened["tag"], Value::String("a".to_string()));
        assert_eq!(flattened["page"], Value::String("2".to_string()));
    }

    #[test]
    fn test_validate_query_through_schema() {
        let uri: Uri = "/items?tag=a&tag=b&page=2".parse().unwrap();
        let filters = validate_query(&uri, &SerdeSchema::<Filters>::new()).unwrap();
        assert_eq!(
            filters.tag,
            Value::Array(vec!["a".into(), "b".into()])
        );
        assert_eq!(filters.page, Some("2".to_string()));
    }

    #[test]
    fn test_serde_schema_mismatch_reports_request_root() {
        let uri: Uri = "/items?page=2".parse().unwrap();
        let err = validate_query(&uri, &SerdeSchema::<Filters>::new()).unwrap_err();
        match err {
            ApiError::Validation(violations) => {
                assert_eq!(violations.len(), 1);
                assert_eq!(violations[0].field, "request");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_params_resolved_map() {
        let mut params = HashMap::new();
        params.insert("id".to_string(), "42".to_string());

        #[derive(serde::Deserialize)]
        struct IdParams {
            id: String,
        }

        let parsed = validate_params(&params, &SerdeSchema::<IdParams>::new()).unwrap();
        assert_eq!(parsed.id, "42");
    }

    #[tokio::test]
    async fn test_validate_deferred_params() {
        let mut params = HashMap::new();
        params.insert("id".to_string(), "42".to_string());

        #[derive(serde::Deserialize)]
        struct IdParams {
            id: String,
        }

        let parsed = validate_deferred_params(
            std::future::ready(params),
            &SerdeSchema::<IdParams>::new(),
        )
        .await
        .unwrap();
        assert_eq!(parsed.id, "42");
    }

    #[test]
    fn test_schema_violations_display() {
        let violations = SchemaViolations(vec![
            FieldError::new("a", "one"),
            FieldError::new("b", "two"),
        ]);
        assert_eq!(violations.to_string(), "a: one\nb: two");
        assert_eq!(SchemaViolations(vec![]).to_string(), "Validation failed");
    }
}
