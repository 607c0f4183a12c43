//! Validated live actions as a tagged union.
//!
//! Required fields are kept as raw JSON: the room clients own their shape,
//! this side only guarantees presence. Any other keys ride along in `extra`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::kind::ActionKind;

/// Keys beyond the ones a kind requires.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionExtras {
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollAction {
    pub question: Value,
    pub options: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnouncementAction {
    pub message: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadAction {
    pub url: Value,
    pub filename: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Action aimed at one chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageRefAction {
    #[serde(rename = "messageId")]
    pub message_id: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStatusAction {
    pub status: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Action aimed at one participant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRefAction {
    #[serde(rename = "userId")]
    pub user_id: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactionAction {
    pub emoji: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A live action that passed validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum LiveAction {
    Poll(PollAction),
    Announcement(AnnouncementAction),
    Download(DownloadAction),
    ChatMute(ActionExtras),
    ChatUnmute(ActionExtras),
    ChatDelete(MessageRefAction),
    ChatDisabled(ActionExtras),
    RecordingStarted(ActionExtras),
    RecordingStopped(ActionExtras),
    SessionStatus(SessionStatusAction),
    HandRaise(ActionExtras),
    Promote(UserRefAction),
    Demote(UserRefAction),
    Reaction(ReactionAction),
}

impl LiveAction {
    /// Build the variant for `kind` from an object already checked for
    /// the kind's required fields.
    pub fn from_parts(kind: ActionKind, object: &Map<String, Value>) -> Self {
        let mut rest = object.clone();
        rest.remove("type");
        let mut take = |field: &str| rest.remove(field).unwrap_or(Value::Null);

        match kind {
            ActionKind::Poll => {
                let question = take("question");
                let options = take("options");
                Self::Poll(PollAction {
                    question,
                    options,
                    extra: rest,
                })
            }
            ActionKind::Announcement => {
                let message = take("message");
                Self::Announcement(AnnouncementAction {
                    message,
                    extra: rest,
                })
            }
            ActionKind::Download => {
                let url = take("url");
                let filename = take("filename");
                Self::Download(DownloadAction {
                    url,
                    filename,
                    extra: rest,
                })
            }
            ActionKind::ChatDelete => {
                let message_id = take("messageId");
                Self::ChatDelete(MessageRefAction {
                    message_id,
                    extra: rest,
                })
            }
            ActionKind::SessionStatus => {
                let status = take("status");
                Self::SessionStatus(SessionStatusAction {
                    status,
                    extra: rest,
                })
            }
            ActionKind::Promote => {
                let user_id = take("userId");
                Self::Promote(UserRefAction {
                    user_id,
                    extra: rest,
                })
            }
            ActionKind::Demote => {
                let user_id = take("userId");
                Self::Demote(UserRefAction {
                    user_id,
                    extra: rest,
                })
            }
            ActionKind::Reaction => {
                let emoji = take("emoji");
                Self::Reaction(ReactionAction { emoji, extra: rest })
            }
            ActionKind::ChatMute => Self::ChatMute(ActionExtras { extra: rest }),
            ActionKind::ChatUnmute => Self::ChatUnmute(ActionExtras { extra: rest }),
            ActionKind::ChatDisabled => Self::ChatDisabled(ActionExtras { extra: rest }),
            ActionKind::RecordingStarted => Self::RecordingStarted(ActionExtras { extra: rest }),
            ActionKind::RecordingStopped => Self::RecordingStopped(ActionExtras { extra: rest }),
            ActionKind::HandRaise => Self::HandRaise(ActionExtras { extra: rest }),
        }
    }

    pub fn kind(&self) -> ActionKind {
        match self {
            Self::Poll(_) => ActionKind::Poll,
            Self::Announcement(_) => ActionKind::Announcement,
            Self::Download(_) => ActionKind::Download,
            Self::ChatMute(_) => ActionKind::ChatMute,
            Self::ChatUnmute(_) => ActionKind::ChatUnmute,
            Self::ChatDelete(_) => ActionKind::ChatDelete,
            Self::ChatDisabled(_) => ActionKind::ChatDisabled,
            Self::RecordingStarted(_) => ActionKind::RecordingStarted,
            Self::RecordingStopped(_) => ActionKind::RecordingStopped,
            Self::SessionStatus(_) => ActionKind::SessionStatus,
            Self::HandRaise(_) => ActionKind::HandRaise,
            Self::Promote(_) => ActionKind::Promote,
            Self::Demote(_) => ActionKind::Demote,
            Self::Reaction(_) => ActionKind::Reaction,
        }
    }

    /// The wire object, `type` included.
    pub fn to_payload(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}
