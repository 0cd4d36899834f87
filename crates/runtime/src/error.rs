//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination, repositories, and action
//! providers so clients can bubble them up with consistent context.

use thiserror::Error;
use tokio::sync::oneshot;

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The engine refused or failed the submitted action. Non-fatal; the
    /// state is unchanged and the caller may re-prompt.
    #[error(transparent)]
    Action(#[from] game_core::ExecuteError),

    #[error("no action provider configured")]
    ProviderNotSet,

    #[error("scripted provider ran out of actions")]
    ScriptExhausted,

    #[error("simulation worker command channel closed")]
    CommandChannelClosed,

    #[error("simulation worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("simulation worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
