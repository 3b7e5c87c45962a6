use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    cave::{CaveGraph, DEFAULT_COLS, DEFAULT_ROWS, MAX_ROOMS, RoomId},
    game::{BAT_ROOMS, PIT_ROOMS},
};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read config '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{field} must be a percentage between 0 and 100, got {value}")]
    Percent { field: &'static str, value: u32 },

    #[error("cave of {rows}x{cols} rooms is not a connected grid")]
    Disconnected { rows: i32, cols: i32 },

    #[error("cave of {rows}x{cols} rooms exceeds the {max} room limit")]
    TooManyRooms { rows: i32, cols: i32, max: i32 },

    #[error("start room {0} is outside the cave")]
    StartRoom(u16),

    #[error("only {available} rooms lie outside the safe start, {needed} are needed for hazards")]
    TooFewRooms { available: usize, needed: usize },
}

/// Rule tuning and cave shape, read from an optional JSON file. Missing
/// fields fall back to the classic 4x5 cave.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub rows: i32,
    pub cols: i32,
    pub start_room: u16,
    pub starting_arrows: u32,
    pub bat_drop_percent: u32,
    pub arrow_find_percent: u32,
    pub wumpus_move_percent: u32,
    pub placement_seed: Option<u64>,
    pub event_seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            start_room: 1,
            starting_arrows: 2,
            bat_drop_percent: 10,
            arrow_find_percent: 15,
            wumpus_move_percent: 75,
            placement_seed: None,
            event_seed: None,
        }
    }
}

impl GameConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config: GameConfig =
            serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.placement_seed = Some(seed);
        self.event_seed = Some(seed.rotate_left(32) ^ 0x5eed_ca4e);
        self
    }

    pub fn start(&self) -> RoomId {
        RoomId(self.start_room)
    }

    pub fn cave(&self) -> CaveGraph {
        CaveGraph::grid(self.rows, self.cols)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("bat_drop_percent", self.bat_drop_percent),
            ("arrow_find_percent", self.arrow_find_percent),
            ("wumpus_move_percent", self.wumpus_move_percent),
        ] {
            if value > 100 {
                return Err(ConfigError::Percent { field, value });
            }
        }

        if self.rows < 1 || self.cols < 1 {
            return Err(ConfigError::Disconnected {
                rows: self.rows,
                cols: self.cols,
            });
        }
        match self.rows.checked_mul(self.cols) {
            Some(rooms) if rooms <= MAX_ROOMS => {}
            _ => {
                return Err(ConfigError::TooManyRooms {
                    rows: self.rows,
                    cols: self.cols,
                    max: MAX_ROOMS,
                });
            }
        }
        let cave = self.cave();
        if cave.has_isolated_rooms() || !cave.is_connected() {
            return Err(ConfigError::Disconnected {
                rows: self.rows,
                cols: self.cols,
            });
        }
        if !cave.contains(self.start()) {
            return Err(ConfigError::StartRoom(self.start_room));
        }

        let available = cave.room_count() - cave.safe_start(self.start()).len();
        let needed = 1 + PIT_ROOMS + BAT_ROOMS;
        if available < needed {
            return Err(ConfigError::TooFewRooms { available, needed });
        }
        Ok(())
    }
}
