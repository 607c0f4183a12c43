//! Validation of real-time control-plane actions.
//!
//! Pure and total: any JSON value yields either a [`LiveAction`] or an
//! [`ActionValidationError`], never a panic.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use livehub_core::error::AppError;
use livehub_entity::action::{ActionKind, LiveAction};

/// Why an action was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionValidationError {
    #[error("Action must be an object")]
    NotAnObject,
    #[error("Action type is required")]
    MissingType,
    #[error("Invalid action type: {0}")]
    UnknownType(String),
    #[error("{field} is required for {kind} actions")]
    MissingField {
        kind: ActionKind,
        field: &'static str,
    },
}

impl From<ActionValidationError> for AppError {
    fn from(err: ActionValidationError) -> Self {
        AppError::validation(err.to_string())
    }
}

/// Validate an action payload into its tagged form.
pub fn validate(action: &Value) -> Result<LiveAction, ActionValidationError> {
    let object = action.as_object().ok_or(ActionValidationError::NotAnObject)?;

    let type_name = object
        .get("type")
        .and_then(Value::as_str)
        .ok_or(ActionValidationError::MissingType)?;

    let kind = ActionKind::from_wire(type_name)
        .ok_or_else(|| ActionValidationError::UnknownType(type_name.to_string()))?;

    if let Some(field) = kind
        .required_fields()
        .iter()
        .copied()
        .find(|f| object.get(*f).is_none_or(Value::is_null))
    {
        return Err(ActionValidationError::MissingField { kind, field });
    }

    Ok(LiveAction::from_parts(kind, object))
}

/// Boolean-style validation result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionValidation {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ActionValidation {
    pub fn of(action: &Value) -> Self {
        match validate(action) {
            Ok(_) => Self {
                valid: true,
                error: None,
            },
            Err(e) => Self {
                valid: false,
                error: Some(e.to_string()),
            },
        }
    }
}
