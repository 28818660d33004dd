use crate::error::NotifyError;
use crate::severity::{classify_severity, Severity};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// Event action sent with every notification.
const EVENT_ACTION: &str = "trigger";
/// Static client identity carried in the event body.
const CLIENT_NAME: &str = "Firewatch Monitoring Service";
const CLIENT_URL: &str = "https://firewatch.dev";

#[derive(Debug, Serialize)]
struct EventBody {
    routing_key: String,
    event_action: &'static str,
    payload: EventDetails,
    client: &'static str,
    client_url: &'static str,
}

#[derive(Debug, Serialize)]
struct EventDetails {
    summary: String,
    timestamp: String,
    source: String,
    severity: Severity,
    group: String,
    custom_details: Value,
}

/// Transform one alert document into the serialized notification body.
///
/// The alert must carry a numeric `rule.level` and a `rule.groups`
/// collection; `rule.description` is optional and defaults to `"N/A"`.
/// Every top-level key of a non-empty `options` object overwrites the
/// corresponding top-level key of the built event (shallow merge, one level
/// deep) -- including `routing_key`.
pub fn build_payload(
    alert: &Value,
    options: &Value,
    routing_key: &str,
) -> Result<String, NotifyError> {
    let rule = alert
        .get("rule")
        .ok_or_else(|| NotifyError::MalformedAlert("alert has no rule object".to_string()))?;

    let level = rule
        .get("level")
        .and_then(Value::as_i64)
        .ok_or_else(|| NotifyError::MalformedAlert("rule has no numeric level".to_string()))?;

    let groups = rule
        .get("groups")
        .and_then(Value::as_array)
        .ok_or_else(|| NotifyError::MalformedAlert("rule has no groups collection".to_string()))?;

    let mut names = Vec::with_capacity(groups.len());
    for group in groups {
        let name = group.as_str().ok_or_else(|| {
            NotifyError::MalformedAlert("rule group name is not a string".to_string())
        })?;
        names.push(name);
    }

    let summary = rule
        .get("description")
        .and_then(Value::as_str)
        .unwrap_or("N/A")
        .to_string();

    let timestamp = alert
        .get("timestamp")
        .and_then(Value::as_str)
        .ok_or_else(|| NotifyError::MalformedAlert("alert has no timestamp".to_string()))?
        .to_string();

    let source = alert
        .get("agent")
        .and_then(|agent| agent.get("location"))
        .and_then(Value::as_str)
        .ok_or_else(|| NotifyError::MalformedAlert("alert has no agent location".to_string()))?
        .to_string();

    let severity = classify_severity(level);
    debug!("Classified level {} as {}", level, severity);

    let event = EventBody {
        routing_key: routing_key.to_string(),
        event_action: EVENT_ACTION,
        payload: EventDetails {
            summary,
            timestamp,
            source,
            severity,
            group: names.join(", "),
            custom_details: alert.clone(),
        },
        client: CLIENT_NAME,
        client_url: CLIENT_URL,
    };

    let mut body = serde_json::to_value(&event)?;
    if let (Some(map), Some(overlay)) = (body.as_object_mut(), options.as_object()) {
        for (key, value) in overlay {
            map.insert(key.clone(), value.clone());
        }
    }

    let text = serde_json::to_string(&body)?;
    if text.is_empty() {
        return Err(NotifyError::EmptyPayload);
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_alert() -> Value {
        json!({
            "rule": {
                "level": 8,
                "groups": ["auth", "fail"],
                "description": "Login failed"
            },
            "timestamp": "2024-01-01T00:00:00Z",
            "agent": {"location": "host1"}
        })
    }

    #[test]
    fn test_payload_carries_alert_fields() {
        let text = build_payload(&sample_alert(), &Value::Null, "abc123").unwrap();
        let body: Value = serde_json::from_str(&text).unwrap();

        assert_eq!(body["routing_key"], "abc123");
        assert_eq!(body["event_action"], "trigger");
        assert_eq!(body["payload"]["summary"], "Login failed");
        assert_eq!(body["payload"]["severity"], "warning");
        assert_eq!(body["payload"]["group"], "auth, fail");
        assert_eq!(body["payload"]["source"], "host1");
        assert_eq!(body["payload"]["custom_details"], sample_alert());
    }

    #[test]
    fn test_group_order_is_preserved() {
        let mut alert = sample_alert();
        alert["rule"]["groups"] = json!(["z", "a", "m"]);

        let text = build_payload(&alert, &Value::Null, "key").unwrap();
        let body: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(body["payload"]["group"], "z, a, m");
    }

    #[test]
    fn test_missing_description_defaults_to_na() {
        let mut alert = sample_alert();
        alert["rule"].as_object_mut().unwrap().remove("description");

        let text = build_payload(&alert, &Value::Null, "key").unwrap();
        let body: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(body["payload"]["summary"], "N/A");
    }

    #[test]
    fn test_missing_level_fails_construction() {
        let mut alert = sample_alert();
        alert["rule"].as_object_mut().unwrap().remove("level");

        let err = build_payload(&alert, &Value::Null, "key").unwrap_err();
        assert!(matches!(err, NotifyError::MalformedAlert(_)));
    }

    #[test]
    fn test_missing_groups_fails_construction() {
        let mut alert = sample_alert();
        alert["rule"].as_object_mut().unwrap().remove("groups");

        let err = build_payload(&alert, &Value::Null, "key").unwrap_err();
        assert!(matches!(err, NotifyError::MalformedAlert(_)));
    }

    #[test]
    fn test_missing_timestamp_fails_construction() {
        let mut alert = sample_alert();
        alert.as_object_mut().unwrap().remove("timestamp");

        let err = build_payload(&alert, &Value::Null, "key").unwrap_err();
        assert!(matches!(err, NotifyError::MalformedAlert(_)));
    }

    #[test]
    fn test_overlay_wins_over_computed_fields() {
        let options = json!({"severity": "custom"});

        let text = build_payload(&sample_alert(), &options, "abc123").unwrap();
        let body: Value = serde_json::from_str(&text).unwrap();

        // The overlay writes the top level; the computed classification
        // stays nested under payload.
        assert_eq!(body["severity"], "custom");
        assert_eq!(body["payload"]["severity"], "warning");
    }

    #[test]
    fn test_overlay_can_overwrite_routing_key() {
        let options = json!({"routing_key": "overridden"});

        let text = build_payload(&sample_alert(), &options, "abc123").unwrap();
        let body: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(body["routing_key"], "overridden");
    }

    #[test]
    fn test_merge_is_shallow() {
        let options = json!({"payload": {"summary": "replaced"}});

        let text = build_payload(&sample_alert(), &options, "abc123").unwrap();
        let body: Value = serde_json::from_str(&text).unwrap();

        // One level deep: the whole nested block is replaced, not merged.
        assert_eq!(body["payload"], json!({"summary": "replaced"}));
    }

    #[test]
    fn test_empty_options_change_nothing() {
        let with_empty = build_payload(&sample_alert(), &json!({}), "abc123").unwrap();
        let with_null = build_payload(&sample_alert(), &Value::Null, "abc123").unwrap();
        assert_eq!(with_empty, with_null);
    }

    #[test]
    fn test_construction_is_deterministic() {
        let first = build_payload(&sample_alert(), &Value::Null, "abc123").unwrap();
        let second = build_payload(&sample_alert(), &Value::Null, "abc123").unwrap();
        assert_eq!(first, second);
    }
}
