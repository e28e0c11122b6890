//! Field-level serde helpers for rows coming back from the backend.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

/// Deserialize an optional string, treating `""` (and whitespace) as absent.
///
/// Form inputs submit empty strings for untouched optional fields; the
/// listing must still see them as unset.
pub fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

/// Deserialize a row timestamp.
///
/// Accepts RFC 3339 and the zone-less `timestamp` forms (`T` or space
/// separated, optional fraction), the latter read as UTC. Anything else
/// decodes as absent instead of failing the row.
pub fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.as_deref().map(str::trim).and_then(parse_timestamp))
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f%#z") {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct DateOnly {
        #[serde(default, deserialize_with = "empty_string_as_none")]
        date: Option<String>,
    }

    #[test]
    fn test_empty_string_as_none() {
        let p: DateOnly = serde_json::from_str(r#"{"date": ""}"#).unwrap();
        assert_eq!(p.date, None);
        let p: DateOnly = serde_json::from_str(r#"{"date": null}"#).unwrap();
        assert_eq!(p.date, None);
        let p: DateOnly = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(p.date, None);
        let p: DateOnly = serde_json::from_str(r#"{"date": "2025-03-01"}"#).unwrap();
        assert_eq!(p.date.as_deref(), Some("2025-03-01"));
    }

    #[derive(Deserialize)]
    struct Stamped {
        #[serde(default, deserialize_with = "lenient_timestamp")]
        created_at: Option<DateTime<Utc>>,
    }

    fn stamped(raw: serde_json::Value) -> Option<String> {
        let s: Stamped = serde_json::from_value(serde_json::json!({ "created_at": raw })).unwrap();
        s.created_at.map(|dt| dt.to_rfc3339())
    }

    #[test]
    fn test_lenient_timestamp() {
        use serde_json::json;
        assert_eq!(
            stamped(json!("2024-01-01T00:00:00.123")).as_deref(),
            Some("2024-01-01T00:00:00.123+00:00")
        );
        assert_eq!(
            stamped(json!("2024-01-01 08:30:00")).as_deref(),
            Some("2024-01-01T08:30:00+00:00")
        );
        assert_eq!(
            stamped(json!("2024-01-01T02:00:00+02:00")).as_deref(),
            Some("2024-01-01T00:00:00+00:00")
        );
        assert_eq!(
            stamped(json!("2024-01-01 02:00:00.5+02")).as_deref(),
            Some("2024-01-01T00:00:00.500+00:00")
        );
        assert_eq!(stamped(json!("yesterday")), None);
        assert_eq!(stamped(json!(null)), None);
    }
}
