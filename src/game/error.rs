use thiserror::Error;

use crate::cave::RoomId;

use super::Mode;

/// Rejected player actions. None of these touch the session beyond its
/// status message.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionError {
    #[error("Invalid move! Choose an adjacent room.")]
    InvalidMove { from: RoomId, to: RoomId },

    #[error("Invalid room for arrow path. Must be adjacent.")]
    InvalidPathStep { room: RoomId },

    #[error("No rooms selected for shooting.")]
    EmptyPath,

    #[error("You're out of arrows!")]
    OutOfArrows,

    #[error("Switch to {expected} mode first.")]
    WrongMode { expected: Mode },

    #[error("The game is over. Press R to restart.")]
    GameOver,
}
