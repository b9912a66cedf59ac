//! JSON output formatting
//!
//! Every JSON document orgform prints is wrapped as `{ "data": ..., "meta": ... }`
//! so scripts can tell which version produced it.

use chrono::Utc;
use serde::Serialize;

use crate::error::Result;

/// Envelope around a JSON result
#[derive(Debug, Serialize)]
pub struct JsonOutput<'a, T: ?Sized> {
    pub data: &'a T,
    pub meta: Metadata,
}

/// Provenance of a JSON result
#[derive(Debug, Serialize)]
pub struct Metadata {
    /// RFC 3339 time the document was produced
    pub timestamp: String,
    /// orgform version
    pub version: &'static str,
}

impl<'a, T: ?Sized> JsonOutput<'a, T> {
    pub fn new(data: &'a T) -> Self {
        Self {
            data,
            meta: Metadata {
                timestamp: Utc::now().to_rfc3339(),
                version: env!("CARGO_PKG_VERSION"),
            },
        }
    }
}

/// Wrap `data` and render it as pretty-printed JSON
pub fn format_json<T: Serialize + ?Sized>(data: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(&JsonOutput::new(data))?)
}

/// Wrap `data` and print it to stdout
pub fn print_json<T: Serialize + ?Sized>(data: &T) -> Result<()> {
    println!("{}", format_json(data)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::RecordView;
    use crate::resource::{Plan, ResourceData};

    #[test]
    fn test_record_is_wrapped_with_meta() {
        let mut data = ResourceData::with_id("o-a1b2c3d4e5");
        data.set("feature_set", Some("ALL"));

        let out = format_json(&RecordView::new("aws_organization.main", &data)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();

        assert_eq!(value["data"]["id"], "o-a1b2c3d4e5");
        assert_eq!(value["data"]["attributes"]["feature_set"], "ALL");
        assert_eq!(value["meta"]["version"], env!("CARGO_PKG_VERSION"));
        assert!(
            chrono::DateTime::parse_from_rfc3339(value["meta"]["timestamp"].as_str().unwrap())
                .is_ok()
        );
    }

    #[test]
    fn test_replace_plan_lists_fields() {
        let plan = Plan::Replace {
            fields: vec!["feature_set".to_string()],
        };
        let value: serde_json::Value = serde_json::from_str(&format_json(&plan).unwrap()).unwrap();

        assert_eq!(value["data"]["action"], "replace");
        assert_eq!(value["data"]["fields"], serde_json::json!(["feature_set"]));
    }

    #[test]
    fn test_empty_state_is_empty_array() {
        let entries: Vec<crate::state::StateEntry> = vec![];
        let out = format_json(&entries).unwrap();
        assert!(out.contains("\"data\": []"));
    }
}
