//! Live control action entities.

pub mod kind;
pub mod live;
pub mod model;

pub use kind::ActionKind;
pub use live::{
    ActionExtras, AnnouncementAction, DownloadAction, LiveAction, MessageRefAction, PollAction,
    ReactionAction, SessionStatusAction, UserRefAction,
};
pub use model::{ActionRecord, CreateActionRecord};
