use serde_json::Value;

/// Replace every `{{ path.to.value }}` in `template` with the value found
/// in `vars`. Missing values and `null` render as an empty string; objects
/// and arrays render as JSON. An unterminated `{{` is kept verbatim.
///
/// ```
/// use serde_json::json;
/// use qrfaktura::notify::render_template;
///
/// let vars = json!({ "order": { "code": "ORD123" } });
/// assert_eq!(
///     render_template("Rechnung für Bestellung #{{ order.code }}", &vars),
///     "Rechnung für Bestellung #ORD123"
/// );
/// ```
pub fn render_template(template: &str, vars: &Value) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };
        if let Some(value) = lookup(vars, after[..end].trim()) {
            push_value(&mut out, value);
        }
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    out
}

/// Resolve a dotted path; numeric segments index into arrays.
pub fn lookup<'a>(vars: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return None;
    }
    path.split('.').try_fold(vars, |value, segment| match value {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

fn push_value(out: &mut String, value: &Value) {
    match value {
        Value::Null => {}
        Value::String(s) => out.push_str(s),
        other => out.push_str(&other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn substitutes_nested_values() {
        let vars = json!({ "order": { "code": "ORD1", "lines": [{ "quantity": 2 }] }, "ok": true });
        assert_eq!(
            render_template("{{order.code}}/{{ order.lines.0.quantity }}/{{ ok }}", &vars),
            "ORD1/2/true"
        );
    }

    #[test]
    fn missing_values_render_empty() {
        let vars = json!({ "order": { "code": null } });
        assert_eq!(render_template("[{{ order.code }}][{{ nope.x }}]", &vars), "[][]");
    }

    #[test]
    fn unterminated_placeholder_is_literal() {
        assert_eq!(render_template("a {{ b", &json!({})), "a {{ b");
    }

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(render_template("Passwort zurücksetzen", &json!({})), "Passwort zurücksetzen");
    }
}
