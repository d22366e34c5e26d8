use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::domain::query::Query;

pub const NO_NEWS_DATA: &str = "NO_NEWS_DATA";
pub const INVALID_PAYLOAD: &str = "INVALID_PAYLOAD";

/// One queue-delivered unit of work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkItem {
    pub id: String,
    pub payload: Value,
}

#[derive(Deserialize)]
struct NewsPayload {
    #[serde(rename = "Name")]
    name: Vec<String>,
}

#[derive(Error, Debug, PartialEq)]
pub enum InputError {
    #[error("Invalid payload format: {0}")]
    Malformed(String),
    #[error("Payload contains no search phrases")]
    Empty,
    #[error("Invalid search phrase at position {index}: {reason}")]
    InvalidQuery { index: usize, reason: String },
}

impl WorkItem {
    /// Ordered search phrases carried in the payload's `Name` field.
    pub fn queries(&self) -> Result<Vec<Query>, InputError> {
        let payload = NewsPayload::deserialize(&self.payload)
            .map_err(|e| InputError::Malformed(format!("{} ({})", self.payload, e)))?;

        if payload.name.is_empty() {
            return Err(InputError::Empty);
        }

        payload
            .name
            .iter()
            .enumerate()
            .map(|(index, phrase)| {
                Query::parse(phrase).map_err(|reason| InputError::InvalidQuery { index, reason })
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExceptionType {
    Application,
    Business,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemException {
    #[serde(rename = "type")]
    pub kind: ExceptionType,
    pub code: Option<String>,
    pub message: String,
}

/// Terminal state of a unit of work, reported back to the queue once.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemState {
    Done,
    Failed(ItemException),
}

impl ItemState {
    pub fn failed(kind: ExceptionType, code: Option<&str>, message: impl Into<String>) -> Self {
        ItemState::Failed(ItemException {
            kind,
            code: code.map(str::to_string),
            message: message.into(),
        })
    }

    pub fn no_news_data() -> Self {
        ItemState::failed(
            ExceptionType::Application,
            Some(NO_NEWS_DATA),
            "No news data found",
        )
    }

    pub fn invalid_payload(error: &InputError) -> Self {
        ItemState::failed(
            ExceptionType::Business,
            Some(INVALID_PAYLOAD),
            error.to_string(),
        )
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{InputError, WorkItem};

    fn item(payload: serde_json::Value) -> WorkItem {
        WorkItem {
            id: "item-1".to_string(),
            payload,
        }
    }

    #[test]
    fn queries_keep_payload_order() {
        let queries = item(json!({"index": 0, "Name": ["NBA", "Subway", "Mayor"]}))
            .queries()
            .unwrap();

        let phrases: Vec<&str> = queries.iter().map(|q| q.as_ref()).collect();
        assert_eq!(phrases, vec!["NBA", "Subway", "Mayor"]);
    }

    #[test]
    fn missing_name_field_is_malformed() {
        let result = item(json!({"titles": ["NBA"]})).queries();
        assert!(matches!(result, Err(InputError::Malformed(_))));
    }

    #[test]
    fn non_object_payload_is_malformed() {
        let result = item(json!("NBA")).queries();
        assert!(matches!(result, Err(InputError::Malformed(_))));
    }

    #[test]
    fn empty_name_list_is_rejected() {
        assert_eq!(item(json!({"Name": []})).queries(), Err(InputError::Empty));
    }

    #[test]
    fn blank_phrase_is_rejected_with_position() {
        let result = item(json!({"Name": ["NBA", "  "]})).queries();
        assert!(matches!(result, Err(InputError::InvalidQuery { index: 1, .. })));
    }
}
