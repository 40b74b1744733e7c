use crate::json_path::model::Expression;
use serde_json::Value;
use serde_json_path::JsonPath;

pub fn normalize(expression: &str) -> String {
    let trimmed = expression.trim();
    if trimmed.is_empty() {
        "$".to_string()
    } else if trimmed.starts_with('$') {
        trimmed.to_string()
    } else if trimmed.starts_with('[') {
        format!("${}", trimmed)
    } else {
        format!("$.{}", trimmed)
    }
}

pub fn evaluate_expression(context: &Value, exp: &Expression) -> Result<Vec<Value>, String> {
    let path = normalize(&exp.value);
    let json_path = JsonPath::parse(&path)
        .map_err(|err| format!("invalid path \"{}\": {}", exp.value, err))?;
    Ok(json_path.query(context).all().into_iter().cloned().collect())
}
