//! Session state machine and controller.
//!
//! [`SessionController`] runs as a tokio task, owned end to end by the
//! [`spawn`] helper; everything outside talks to it through
//! [`SessionHandle`] (commands in, [`SessionSnapshot`] out).

pub mod controller;
pub mod state;

pub use controller::{spawn, SessionController, SessionHandle, TranscriptSourceFactory};
pub use state::{
    new_shared_snapshot, SessionCommand, SessionPhase, SessionSnapshot, SharedSnapshot,
};
