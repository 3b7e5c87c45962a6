use std::{collections::BTreeSet, fmt};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::cave::{CaveGraph, RoomId};

use super::{BAT_ROOMS, PIT_ROOMS, dice::Dice};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    Move,
    Shoot,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Move => "MOVE",
            Mode::Shoot => "SHOOT",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hazard proximity hints, ordered the way they are reported.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Warning {
    Stench,
    Draft,
    Flapping,
}

impl Warning {
    pub fn text(&self) -> &'static str {
        match self {
            Warning::Stench => "You smell a terrible stench.",
            Warning::Draft => "A cold wind blows from a pit.",
            Warning::Flapping => "You hear flapping nearby.",
        }
    }
}

/// Where the hazards sit at the start of a session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    pub wumpus: RoomId,
    pub pits: [RoomId; PIT_ROOMS],
    pub bats: [RoomId; BAT_ROOMS],
}

impl Layout {
    /// Draws the wumpus, then the pits, then the bats, each without
    /// replacement from the rooms outside the safe start.
    pub fn place<D: Dice>(cave: &CaveGraph, start: RoomId, dice: &mut D) -> Self {
        let safe = cave.safe_start(start);
        let mut pool: Vec<RoomId> = cave.rooms().filter(|room| !safe.contains(room)).collect();
        debug_assert!(pool.len() >= 1 + PIT_ROOMS + BAT_ROOMS);

        let mut draw = |pool: &mut Vec<RoomId>| {
            let idx = dice.index(pool.len());
            pool.swap_remove(idx)
        };
        let wumpus = draw(&mut pool);
        let pits = [draw(&mut pool), draw(&mut pool)];
        let bats = [draw(&mut pool), draw(&mut pool)];
        debug!("placed wumpus {wumpus}, pits {pits:?}, bats {bats:?}");

        Self { wumpus, pits, bats }
    }
}

/// Everything the presentation layer reads back after each action.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub player: RoomId,
    pub wumpus: RoomId,
    pub pits: [RoomId; PIT_ROOMS],
    pub bats: [RoomId; BAT_ROOMS],
    pub arrows: u32,
    pub mode: Mode,
    pub shoot_path: Vec<RoomId>,
    pub game_over: bool,
    pub last_message: String,
}

impl Session {
    pub fn new(layout: Layout, start: RoomId, arrows: u32) -> Self {
        Self {
            player: start,
            wumpus: layout.wumpus,
            pits: layout.pits,
            bats: layout.bats,
            arrows,
            mode: Mode::Move,
            shoot_path: Vec::new(),
            game_over: false,
            last_message: "Welcome! (M)ove or (S)hoot. Click an adjacent room to move.".to_string(),
        }
    }

    pub fn is_pit(&self, room: RoomId) -> bool {
        self.pits.contains(&room)
    }

    pub fn is_bat_room(&self, room: RoomId) -> bool {
        self.bats.contains(&room)
    }

    /// The rooms bats may drop the player into.
    pub fn deadly_rooms(&self) -> Vec<RoomId> {
        let mut rooms = self.pits.to_vec();
        rooms.push(self.wumpus);
        rooms
    }

    pub fn warnings(&self, cave: &CaveGraph, room: RoomId) -> BTreeSet<Warning> {
        let mut warnings = BTreeSet::new();
        for neighbor in cave.neighbors(room) {
            if *neighbor == self.wumpus {
                warnings.insert(Warning::Stench);
            }
            if self.is_pit(*neighbor) {
                warnings.insert(Warning::Draft);
            }
            if self.is_bat_room(*neighbor) {
                warnings.insert(Warning::Flapping);
            }
        }
        warnings
    }

    /// Rooms the next click may target: neighbours of the player when
    /// moving, neighbours of the arrow path's tip when aiming.
    pub fn selectable_rooms<'a>(&self, cave: &'a CaveGraph) -> &'a [RoomId] {
        match self.mode {
            Mode::Move => cave.neighbors(self.player),
            Mode::Shoot => cave.neighbors(self.path_anchor()),
        }
    }

    pub fn path_anchor(&self) -> RoomId {
        self.shoot_path.last().copied().unwrap_or(self.player)
    }
}
