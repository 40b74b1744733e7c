use crate::assertion::model::{ComparisonType, Expectation, Subject};
use crate::http::HttpResult;
use crate::json_path::utils::evaluate_expression;
use crate::run::model::Failure;
use regex::Regex;
use serde_json::{Number, Value};

const MAX_SHOWN_CHARS: usize = 200;

trait ValueSupplier {
    fn supply(&self, response: &HttpResult) -> Result<Vec<Value>, Failure>;
}

impl ValueSupplier for Subject {
    fn supply(&self, response: &HttpResult) -> Result<Vec<Value>, Failure> {
        match self {
            Subject::Json { path } => {
                let document = response.res_body.json().map_err(Failure::Parse)?;
                evaluate_expression(document, path).map_err(|message| Failure::Assertion {
                    subject: self.to_string(),
                    message,
                })
            }
            Subject::Body => Ok(vec![Value::String(response.res_body.raw().to_string())]),
            Subject::Header { name } => Ok(response
                .header_values(name)
                .into_iter()
                .map(|value| Value::String(value.to_string()))
                .collect()),
        }
    }
}

pub fn check_expectation(expectation: &Expectation, response: &HttpResult) -> Result<(), Failure> {
    let actual = expectation.subject.supply(response)?;
    check(expectation, &actual).map_err(|message| Failure::Assertion {
        subject: expectation.subject.to_string(),
        message,
    })
}

fn as_string(values: &[Value]) -> String {
    let joined = values
        .iter()
        .map(|value| match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect::<Vec<String>>()
        .join(",");
    if joined.chars().count() > MAX_SHOWN_CHARS {
        let shown: String = joined.chars().take(MAX_SHOWN_CHARS).collect();
        format!("{}...", shown)
    } else {
        joined
    }
}

/// Structural equality in which numbers compare by value at any depth, so `1`
/// equals `1.0` inside objects and arrays too.
fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => numbers_equal(l, r),
        (Value::Array(l), Value::Array(r)) => {
            l.len() == r.len() && l.iter().zip(r).all(|(a, b)| values_equal(a, b))
        }
        (Value::Object(l), Value::Object(r)) => {
            l.len() == r.len()
                && l.iter()
                    .all(|(key, a)| r.get(key).is_some_and(|b| values_equal(a, b)))
        }
        _ => left == right,
    }
}

/// Integers compare exactly; `f64` is used only when one side is a float.
fn numbers_equal(left: &Number, right: &Number) -> bool {
    if let (Some(l), Some(r)) = (left.as_i64(), right.as_i64()) {
        return l == r;
    }
    if let (Some(l), Some(r)) = (left.as_u64(), right.as_u64()) {
        return l == r;
    }
    if left.is_f64() || right.is_f64() {
        return matches!((left.as_f64(), right.as_f64()), (Some(l), Some(r)) if l == r);
    }
    false
}

fn single(actual: &[Value]) -> Option<&Value> {
    match actual {
        [value] => Some(value),
        _ => None,
    }
}

/// A path with no match fails a plain comparison but satisfies a negated one:
/// an absent field is not equal to, does not contain, and does not match anything.
fn check(expectation: &Expectation, actual: &[Value]) -> Result<(), String> {
    let not = if expectation.negate { "not " } else { "" };
    if expectation.comparison == ComparisonType::Exists {
        return if actual.is_empty() == expectation.negate {
            Ok(())
        } else {
            Err(format!("expected value to {}exist", not))
        };
    }
    if actual.is_empty() {
        return if expectation.negate {
            Ok(())
        } else {
            Err("no value found".to_string())
        };
    }
    let expected = &expectation.expected;
    let holds = match expectation.comparison {
        ComparisonType::EqualTo => match single(actual) {
            Some(value) => values_equal(value, expected),
            None => values_equal(&Value::Array(actual.to_vec()), expected),
        },
        ComparisonType::Contains => check_contains(actual, expected)?,
        ComparisonType::Matches => {
            let regex = pattern_of(expected)?;
            actual.iter().all(|value| match value {
                Value::String(s) => regex.is_match(s),
                other => regex.is_match(&other.to_string()),
            })
        }
        ComparisonType::LengthEqualTo => length_of(actual)? == expected_length(expected)?,
        ComparisonType::GreaterThan => compare_numbers(actual, expected, true, false)?,
        ComparisonType::GreaterThanOrEqualTo => compare_numbers(actual, expected, true, true)?,
        ComparisonType::LessThan => compare_numbers(actual, expected, false, false)?,
        ComparisonType::LessThanOrEqualTo => compare_numbers(actual, expected, false, true)?,
        ComparisonType::Exists => !actual.is_empty(),
    };
    if holds ^ expectation.negate {
        Ok(())
    } else {
        describe_failure(expectation, actual)
    }
}

fn describe_failure(expectation: &Expectation, actual: &[Value]) -> Result<(), String> {
    let expected = &expectation.expected;
    let not = if expectation.negate { "not " } else { "" };
    let does = if expectation.negate { "" } else { " not" };
    let message = match expectation.comparison {
        ComparisonType::EqualTo => format!(
            "{}expected: {}, but got: {}",
            not,
            as_string(std::slice::from_ref(expected)),
            as_string(actual)
        ),
        ComparisonType::Contains => format!(
            "{} does{} contain {}",
            as_string(actual),
            does,
            as_string(std::slice::from_ref(expected))
        ),
        ComparisonType::Matches => format!(
            "{} does{} match /{}/",
            as_string(actual),
            does,
            expected.as_str().unwrap_or_default()
        ),
        ComparisonType::LengthEqualTo => format!(
            "{}expected length: {}, but got: {}",
            not,
            expected,
            length_of(actual)?
        ),
        ComparisonType::Exists => format!("expected value to {}exist", not),
        ComparisonType::GreaterThan
        | ComparisonType::GreaterThanOrEqualTo
        | ComparisonType::LessThan
        | ComparisonType::LessThanOrEqualTo => {
            let greater = matches!(
                expectation.comparison,
                ComparisonType::GreaterThan | ComparisonType::GreaterThanOrEqualTo
            );
            let or_equal = matches!(
                expectation.comparison,
                ComparisonType::GreaterThanOrEqualTo | ComparisonType::LessThanOrEqualTo
            );
            format!(
                "{} is{} {} than{} {}",
                as_string(actual),
                does,
                if greater { "greater" } else { "less" },
                if or_equal { " or equal to" } else { "" },
                as_string(std::slice::from_ref(expected))
            )
        }
    };
    Err(message)
}

fn pattern_of(expected: &Value) -> Result<Regex, String> {
    let pattern = expected
        .as_str()
        .ok_or_else(|| format!("pattern must be a string, got {}", expected))?;
    Regex::new(pattern).map_err(|err| format!("invalid pattern /{}/: {}", pattern, err))
}

fn expected_length(expected: &Value) -> Result<u64, String> {
    expected
        .as_u64()
        .ok_or_else(|| format!("expected length must be a non-negative integer, got {}", expected))
}

fn check_contains(actual: &[Value], expected: &Value) -> Result<bool, String> {
    match single(actual) {
        Some(Value::String(s)) => match expected {
            Value::String(needle) => Ok(s.contains(needle.as_str())),
            other => Ok(s.contains(&other.to_string())),
        },
        Some(Value::Array(items)) => Ok(items.iter().any(|item| values_equal(item, expected))),
        Some(Value::Object(map)) if expected.is_string() => {
            Ok(expected.as_str().is_some_and(|key| map.contains_key(key)))
        }
        Some(_) => Err(format!(
            "{} and {} cannot be compared with contains",
            as_string(actual),
            as_string(std::slice::from_ref(expected))
        )),
        None => Ok(actual.iter().any(|value| values_equal(value, expected))),
    }
}

fn length_of(actual: &[Value]) -> Result<u64, String> {
    match single(actual) {
        Some(Value::Array(items)) => Ok(items.len() as u64),
        Some(Value::Object(map)) => Ok(map.len() as u64),
        Some(Value::String(s)) => Ok(s.chars().count() as u64),
        Some(other) => Err(format!("{} has no length", other)),
        None => Ok(actual.len() as u64),
    }
}

fn compare_numbers(
    actual: &[Value],
    expected: &Value,
    greater: bool,
    or_equal: bool,
) -> Result<bool, String> {
    match (single(actual).and_then(Value::as_f64), expected.as_f64()) {
        (Some(left), Some(right)) => Ok(match (greater, or_equal) {
            (true, true) => left >= right,
            (true, false) => left > right,
            (false, true) => left <= right,
            (false, false) => left < right,
        }),
        _ => Err(format!(
            "{} and {} cannot be compared as numbers",
            as_string(actual),
            as_string(std::slice::from_ref(expected))
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{ReqParam, ResBody};
    use serde_json::json;

    fn response(body: Value) -> HttpResult {
        HttpResult::new(200, vec![], ResBody::new(body.to_string()))
    }

    fn raw_response(body: &str) -> HttpResult {
        HttpResult::new(
            500,
            vec![ReqParam::new("content-type", "text/html; charset=utf-8")],
            ResBody::new(body.to_string()),
        )
    }

    #[test]
    fn equality_check() {
        let result = check_expectation(
            &Expectation::json_eq("$.output.message", "a message"),
            &response(json!({"output": {"message": "a message"}, "location": "Menlo Park, CA"})),
        );
        assert_eq!(result, Ok(()));
    }

    #[test]
    fn negate_equality_check() {
        let result = check_expectation(
            &Expectation::json_eq("$.output.message", "a message").negated(),
            &response(json!({"output": {"message": "a message"}})),
        );
        let failure = result.unwrap_err();
        assert_eq!(
            failure,
            Failure::Assertion {
                subject: "json $.output.message".to_string(),
                message: "not expected: a message, but got: a message".to_string(),
            }
        );
    }

    #[test]
    fn equality_mismatch_message() {
        let failure = check_expectation(
            &Expectation::json_eq("title", "foo"),
            &response(json!({"title": "bar"})),
        )
        .unwrap_err();
        assert_eq!(failure.to_string(), "json title: expected: foo, but got: bar");
    }

    #[test]
    fn numbers_compare_numerically() {
        let result = check_expectation(
            &Expectation::json_eq("userId", 1),
            &response(json!({"userId": 1.0})),
        );
        assert_eq!(result, Ok(()));
    }

    #[test]
    fn string_contains() {
        let result = check_expectation(
            &Expectation::json("$.message", ComparisonType::Contains, json!("message")),
            &response(json!({"message": "a message"})),
        );
        assert_eq!(result, Ok(()));
    }

    #[test]
    fn list_contains() {
        let result = check_expectation(
            &Expectation::json("$.messages", ComparisonType::Contains, json!("a message")),
            &response(json!({"messages": ["a message", "another message"]})),
        );
        assert_eq!(result, Ok(()));
    }

    #[test]
    fn greater_than() {
        let result = check_expectation(
            &Expectation::json("$.count", ComparisonType::GreaterThan, json!(5)),
            &response(json!({"count": 17})),
        );
        assert_eq!(result, Ok(()));
    }

    #[test]
    fn less_than_fail_case() {
        let failure = check_expectation(
            &Expectation::json("$.count", ComparisonType::LessThanOrEqualTo, json!(5)),
            &response(json!({"count": 17})),
        )
        .unwrap_err();
        assert_eq!(failure.to_string(), "json $.count: 17 is not less than or equal to 5");
    }

    #[test]
    fn strings_cannot_be_compared_as_numbers() {
        let failure = check_expectation(
            &Expectation::json("$.name", ComparisonType::GreaterThan, json!(5)),
            &response(json!({"name": "pikachu"})),
        )
        .unwrap_err();
        assert!(failure.to_string().contains("cannot be compared as numbers"));
    }

    #[test]
    fn root_array_length() {
        let posts: Vec<Value> = (1..=100).map(|id| json!({"id": id})).collect();
        let result =
            check_expectation(&Expectation::json_len("$", 100), &response(Value::Array(posts)));
        assert_eq!(result, Ok(()));

        let failure = check_expectation(&Expectation::json_len("$", 100), &response(json!([1, 2])))
            .unwrap_err();
        assert_eq!(failure.to_string(), "json $: expected length: 100, but got: 2");
    }

    #[test]
    fn empty_object_equality() {
        assert_eq!(
            check_expectation(&Expectation::json_eq("$", json!({})), &response(json!({}))),
            Ok(())
        );
        assert_eq!(check_expectation(&Expectation::json_len("$", 0), &response(json!({}))), Ok(()));
    }

    #[test]
    fn missing_path_is_assertion_failure() {
        let failure = check_expectation(
            &Expectation::json_eq("author", "x"),
            &response(json!({"title": "foo"})),
        )
        .unwrap_err();
        assert_eq!(
            failure,
            Failure::Assertion {
                subject: "json author".to_string(),
                message: "no value found".to_string(),
            }
        );
    }

    #[test]
    fn exists_and_negated_exists() {
        let body = response(json!({"title": "foo"}));
        assert_eq!(check_expectation(&Expectation::json_exists("title"), &body), Ok(()));
        assert_eq!(check_expectation(&Expectation::json_exists("author").negated(), &body), Ok(()));
        assert!(check_expectation(&Expectation::json_exists("author"), &body).is_err());
    }

    #[test]
    fn malformed_json_is_parse_failure() {
        let failure = check_expectation(
            &Expectation::json_eq("title", "foo"),
            &raw_response("<pre>oops</pre>"),
        )
        .unwrap_err();
        assert!(matches!(failure, Failure::Parse(_)));
    }

    #[test]
    fn invalid_path_is_assertion_failure() {
        let failure = check_expectation(&Expectation::json_eq("$[", "foo"), &response(json!({})))
            .unwrap_err();
        assert!(matches!(failure, Failure::Assertion { .. }));
    }

    #[test]
    fn raw_body_contains_and_matches() {
        let body = raw_response("TypeError: Cannot read properties of undefined (reading 'id')");
        assert_eq!(
            check_expectation(
                &Expectation::body_contains("Cannot read properties of undefined"),
                &body
            ),
            Ok(())
        );
        assert_eq!(check_expectation(&Expectation::body_matches(r"reading '\w+'"), &body), Ok(()));
        assert!(check_expectation(&Expectation::body_matches("^\\{"), &body).is_err());
    }

    #[test]
    fn invalid_pattern_fails_even_when_negated() {
        let body = raw_response("text");
        assert!(check_expectation(&Expectation::body_matches("(").negated(), &body).is_err());
    }

    #[test]
    fn header_contains_ignores_name_case() {
        let body = raw_response("");
        assert_eq!(
            check_expectation(&Expectation::header_contains("Content-Type", "text/html"), &body),
            Ok(())
        );
        let failure =
            check_expectation(&Expectation::header_contains("x-missing", "a"), &body).unwrap_err();
        assert_eq!(failure.to_string(), "header x-missing: no value found");
    }

    #[test]
    fn large_integers_compare_exactly() {
        let failure = check_expectation(
            &Expectation::json_eq("id", 9007199254740993u64),
            &response(json!({"id": 9007199254740992u64})),
        );
        assert!(failure.is_err());
        assert_eq!(
            check_expectation(
                &Expectation::json_eq("id", 9007199254740993u64),
                &response(json!({"id": 9007199254740993u64})),
            ),
            Ok(())
        );
        assert!(check_expectation(&Expectation::json_eq("n", -1), &response(json!({"n": u64::MAX})))
            .is_err());
    }

    #[test]
    fn nested_numbers_compare_numerically() {
        let result = check_expectation(
            &Expectation::json_eq("a", json!({"userId": 1, "tags": [2, 3]})),
            &response(json!({"a": {"userId": 1.0, "tags": [2.0, 3]}})),
        );
        assert_eq!(result, Ok(()));

        let failure = check_expectation(
            &Expectation::json_eq("a", json!({"userId": 1})),
            &response(json!({"a": {"userId": 1.5}})),
        );
        assert!(failure.is_err());
    }

    #[test]
    fn wildcard_match_list_compares_numerically() {
        let result = check_expectation(
            &Expectation::json_eq("$[*].id", json!([1, 2])),
            &response(json!([{"id": 1.0}, {"id": 2}])),
        );
        assert_eq!(result, Ok(()));

        let failure = check_expectation(
            &Expectation::json_eq("$[*].id", json!([1, 2, 3])),
            &response(json!([{"id": 1}, {"id": 2}])),
        );
        assert!(failure.is_err());
    }

    #[test]
    fn negated_comparison_on_missing_path_passes() {
        let body = response(json!({"title": "foo"}));
        assert_eq!(
            check_expectation(&Expectation::json_eq("author", "x").negated(), &body),
            Ok(())
        );
        assert_eq!(
            check_expectation(
                &Expectation::json("tags", ComparisonType::Contains, json!("a")).negated(),
                &body
            ),
            Ok(())
        );
        assert!(check_expectation(&Expectation::json_eq("author", "x"), &body).is_err());
    }
}
