//! Message shapes exchanged with the data service.
//!
//! A request names an action and carries a payload; the reply is exactly one
//! of [`ActionResult`] or [`ActionFailure`].

use derive_more::derive::Display;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

/// Failure codes. The set is closed; application outcomes such as a missing
/// page are results, not codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    #[display("NO_ACTION_SPECIFIED")]
    NoActionSpecified,
    #[display("BAD_ACTION")]
    BadAction,
    #[display("DB_ERROR")]
    DbError,
}

impl ErrorCode {
    /// Numeric form used as the message-bus failure code.
    pub fn ordinal(self) -> i32 {
        match self {
            Self::NoActionSpecified => 0,
            Self::BadAction => 1,
            Self::DbError => 2,
        }
    }
}

/// The single failure reply to a request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {cause}")]
pub struct ActionFailure {
    pub code: ErrorCode,
    pub cause: String,
}

impl ActionFailure {
    pub fn new(code: ErrorCode, cause: impl Into<String>) -> Self {
        Self {
            code,
            cause: cause.into(),
        }
    }

    pub fn no_action() -> Self {
        Self::new(ErrorCode::NoActionSpecified, "No action header specified")
    }

    pub fn bad_action(action: &str) -> Self {
        Self::new(ErrorCode::BadAction, format!("Bad action: {}", action))
    }

    pub fn db(err: &anyhow::Error) -> Self {
        // alternate form keeps the whole context chain, including the driver's message
        Self::new(ErrorCode::DbError, format!("{:#}", err))
    }
}

impl Serialize for ActionFailure {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("ActionFailure", 3)?;
        state.serialize_field("code", &self.code)?;
        state.serialize_field("ordinal", &self.code.ordinal())?;
        state.serialize_field("cause", &self.cause)?;
        state.end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetPagePayload {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePagePayload {
    pub name: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavePagePayload {
    pub id: i64,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletePagePayload {
    pub id: i64,
}

/// A recognized action together with its decoded payload, or the raw token
/// of an action nobody handles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    ListPages,
    GetPage(GetPagePayload),
    CreatePage(CreatePagePayload),
    SavePage(SavePagePayload),
    DeletePage(DeletePagePayload),
    Unrecognized(String),
}

impl Action {
    pub const LIST_PAGES: &'static str = "list-pages";
    pub const GET_PAGE: &'static str = "get-page";
    pub const CREATE_PAGE: &'static str = "create-page";
    pub const SAVE_PAGE: &'static str = "save-page";
    pub const DELETE_PAGE: &'static str = "delete-page";

    /// Wire token for this action.
    pub fn as_str(&self) -> &str {
        match self {
            Self::ListPages => Self::LIST_PAGES,
            Self::GetPage(_) => Self::GET_PAGE,
            Self::CreatePage(_) => Self::CREATE_PAGE,
            Self::SavePage(_) => Self::SAVE_PAGE,
            Self::DeletePage(_) => Self::DELETE_PAGE,
            Self::Unrecognized(token) => token,
        }
    }

    /// Decodes an action token and its payload.
    ///
    /// Unknown tokens become [`Action::Unrecognized`]. A known token whose
    /// payload does not have the expected shape is rejected as `BAD_ACTION`.
    pub fn decode(token: &str, payload: Value) -> Result<Self, ActionFailure> {
        fn payload_of<T: serde::de::DeserializeOwned>(
            token: &str,
            payload: Value,
        ) -> Result<T, ActionFailure> {
            serde_json::from_value(payload).map_err(|e| {
                ActionFailure::new(
                    ErrorCode::BadAction,
                    format!("Bad payload for action {}: {}", token, e),
                )
            })
        }

        let action = match token {
            Self::LIST_PAGES => Self::ListPages,
            Self::GET_PAGE => Self::GetPage(payload_of(token, payload)?),
            Self::CREATE_PAGE => Self::CreatePage(payload_of(token, payload)?),
            Self::SAVE_PAGE => Self::SavePage(payload_of(token, payload)?),
            Self::DELETE_PAGE => Self::DeletePage(payload_of(token, payload)?),
            other => Self::Unrecognized(other.to_string()),
        };

        Ok(action)
    }
}

/// An in-flight request. `action` is `None` when the sender did not name one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRequest {
    pub id: Uuid,
    pub action: Option<Action>,
}

#[derive(Deserialize)]
struct RawEnvelope {
    action: Option<String>,
    #[serde(default)]
    payload: Value,
}

impl ActionRequest {
    pub fn new(action: Action) -> Self {
        Self {
            id: Uuid::new_v4(),
            action: Some(action),
        }
    }

    /// A request that names no action at all.
    pub fn without_action() -> Self {
        Self {
            id: Uuid::new_v4(),
            action: None,
        }
    }

    /// Builds a request from a `{"action": "...", "payload": {...}}`
    /// envelope.
    pub fn from_json(envelope: Value) -> Result<Self, ActionFailure> {
        let raw: RawEnvelope = serde_json::from_value(envelope).map_err(|e| {
            ActionFailure::new(ErrorCode::BadAction, format!("Malformed request: {}", e))
        })?;

        match raw.action {
            None => Ok(Self::without_action()),
            Some(token) => Ok(Self::new(Action::decode(&token, raw.payload)?)),
        }
    }
}

/// Outcome of `get-page`. Absence is an ordinary result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLookup {
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub content: Option<String>,
}

impl PageLookup {
    pub fn found(id: i64, content: String) -> Self {
        Self {
            found: true,
            id: Some(id),
            content: Some(content),
        }
    }

    pub fn missing() -> Self {
        Self {
            found: false,
            id: None,
            content: None,
        }
    }
}

/// The single success reply to a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ActionResult {
    Pages { pages: Vec<String> },
    Page(PageLookup),
    Ack(Ack),
}

/// Opaque acknowledgement for write actions; serializes as `"ok"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Ack {
    #[serde(rename = "ok")]
    Ok,
}

pub type ActionReply = Result<ActionResult, ActionFailure>;
