pub mod dice;
pub mod error;
pub mod rules;
pub mod session;

use bracket_random::prelude::RandomNumberGenerator;
use log::info;

use crate::{
    cave::{CaveGraph, RoomId},
    config::GameConfig,
};

pub use self::{
    dice::Dice,
    error::ActionError,
    session::{Layout, Mode, Session, Warning},
};

pub const PIT_ROOMS: usize = 2;
pub const BAT_ROOMS: usize = 2;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LossCause {
    Wumpus,
    Pit,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TurnStatus {
    Continue,
    Won,
    Lost(LossCause),
}

/// Something the presentation layer may animate or play a cue for, in the
/// order it happened.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    Walked { from: RoomId, to: RoomId },
    CarriedByBats { from: RoomId, to: RoomId },
    DroppedIntoHazard { from: RoomId, to: RoomId },
    FoundArrow { room: RoomId },
    ArrowFlew { path: Vec<RoomId>, deflections: usize },
    WumpusSlain { room: RoomId },
    WumpusMoved,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Turn {
    pub status: TurnStatus,
    pub events: Vec<GameEvent>,
}

impl Turn {
    fn new() -> Self {
        Self {
            status: TurnStatus::Continue,
            events: Vec::new(),
        }
    }
}

/// The single live game: cave, tuning, current session and the two dice
/// streams driving placement and in-play events.
pub struct Game<D: Dice = RandomNumberGenerator> {
    cave: CaveGraph,
    config: GameConfig,
    session: Session,
    placement: D,
    events: D,
}

impl Game<RandomNumberGenerator> {
    pub fn new(config: &GameConfig) -> Self {
        Self::with_dice(
            config,
            dice::seeded_or_entropy(config.placement_seed),
            dice::seeded_or_entropy(config.event_seed),
        )
    }
}

impl<D: Dice> Game<D> {
    pub fn with_dice(config: &GameConfig, mut placement: D, events: D) -> Self {
        let cave = config.cave();
        let session = Self::fresh_session(&cave, config, &mut placement);
        Self {
            cave,
            config: config.clone(),
            session,
            placement,
            events,
        }
    }

    #[cfg(test)]
    pub fn from_session(config: &GameConfig, session: Session, placement: D, events: D) -> Self {
        Self {
            cave: config.cave(),
            config: config.clone(),
            session,
            placement,
            events,
        }
    }

    fn fresh_session(cave: &CaveGraph, config: &GameConfig, placement: &mut D) -> Session {
        let layout = Layout::place(cave, config.start(), placement);
        Session::new(layout, config.start(), config.starting_arrows)
    }

    pub fn reset(&mut self) {
        self.session = Self::fresh_session(&self.cave, &self.config, &mut self.placement);
        info!("new session, player in room {}", self.session.player);
    }

    pub fn cave(&self) -> &CaveGraph {
        &self.cave
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }
}
