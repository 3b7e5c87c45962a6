use log::{debug, info};

use crate::cave::RoomId;

use super::{ActionError, Dice, Game, GameEvent, LossCause, Mode, Turn, TurnStatus, Warning};

impl<D: Dice> Game<D> {
    pub fn attempt_move(&mut self, destination: RoomId) -> Result<Turn, ActionError> {
        self.ensure_playing(Mode::Move)?;
        let from = self.session.player;
        if !self.cave.is_adjacent(from, destination) {
            return self.reject(ActionError::InvalidMove {
                from,
                to: destination,
            });
        }

        let mut turn = Turn::new();
        turn.events.push(GameEvent::Walked {
            from,
            to: destination,
        });
        self.session.player = destination;
        self.resolve_arrival(&mut turn);
        Ok(turn)
    }

    /// Settles the player's current room, following bat flights until the
    /// player lands somewhere that ends the chain.
    fn resolve_arrival(&mut self, turn: &mut Turn) {
        loop {
            let room = self.session.player;
            if room == self.session.wumpus {
                self.lose(turn, LossCause::Wumpus);
                return;
            }
            if self.session.is_pit(room) {
                self.lose(turn, LossCause::Pit);
                return;
            }
            if self.session.is_bat_room(room) {
                let (landing, event) = if self.events.chance(self.config.bat_drop_percent) {
                    let deadly = self.session.deadly_rooms();
                    let to = self.events.pick(&deadly).unwrap_or(self.session.wumpus);
                    self.session.last_message = "Bats throw you into a hazard!".to_string();
                    (to, GameEvent::DroppedIntoHazard { from: room, to })
                } else {
                    let idx = self.events.index(self.cave.room_count());
                    let to = RoomId(idx as u16 + 1);
                    self.session.last_message = "Bats whisk you away!".to_string();
                    (to, GameEvent::CarriedByBats { from: room, to })
                };
                debug!("bats in room {room} move the player to {landing}");
                turn.events.push(event);
                self.session.player = landing;
                continue;
            }

            self.settle_safe_room(turn);
            return;
        }
    }

    fn settle_safe_room(&mut self, turn: &mut Turn) {
        let room = self.session.player;
        let mut message = format!("You are in room {room}. Arrows left: {}", self.session.arrows);
        let warnings = self.session.warnings(&self.cave, room);
        if !warnings.is_empty() {
            let lines: Vec<&str> = warnings.iter().map(Warning::text).collect();
            message.push_str(" | ");
            message.push_str(&lines.join(" "));
        }
        if self.events.chance(self.config.arrow_find_percent) {
            self.session.arrows += 1;
            message.push_str(" | You found an arrow!");
            turn.events.push(GameEvent::FoundArrow { room });
        }
        self.session.last_message = message;
    }

    fn lose(&mut self, turn: &mut Turn, cause: LossCause) {
        self.session.game_over = true;
        self.session.last_message = match cause {
            LossCause::Wumpus => "Oh no! You encountered the Wumpus! Game Over.",
            LossCause::Pit => "You fell into a pit! Game Over.",
        }
        .to_string();
        turn.status = TurnStatus::Lost(cause);
        info!("player lost in room {}: {cause:?}", self.session.player);
    }

    pub fn set_mode(&mut self, mode: Mode) -> Result<(), ActionError> {
        if self.session.game_over {
            return self.reject(ActionError::GameOver).map(|_| ());
        }
        self.session.mode = mode;
        self.session.shoot_path.clear();
        self.session.last_message = match mode {
            Mode::Move => "Move mode: Click an adjacent highlighted room to move.",
            Mode::Shoot => {
                "Shoot mode: Click adjacent rooms to add to arrow path. Press Enter to fire."
            }
        }
        .to_string();
        Ok(())
    }

    pub fn append_shoot_path(&mut self, room: RoomId) -> Result<Turn, ActionError> {
        self.ensure_playing(Mode::Shoot)?;
        let anchor = self.session.path_anchor();
        if !self.cave.is_adjacent(anchor, room) {
            return self.reject(ActionError::InvalidPathStep { room });
        }
        self.session.shoot_path.push(room);
        self.session.last_message =
            format!("Added room {room} to arrow path. Press Enter when done.");
        Ok(Turn::new())
    }

    pub fn fire_arrow(&mut self) -> Result<Turn, ActionError> {
        self.ensure_playing(Mode::Shoot)?;
        if self.session.shoot_path.is_empty() {
            return self.reject(ActionError::EmptyPath);
        }
        if self.session.arrows == 0 {
            return self.reject(ActionError::OutOfArrows);
        }

        self.session.arrows -= 1;
        let planned = std::mem::take(&mut self.session.shoot_path);
        self.session.mode = Mode::Move;

        let mut turn = Turn::new();
        let mut flown = Vec::with_capacity(planned.len());
        let mut deflections = 0;
        let mut current = self.session.player;
        let mut hit = false;
        for mut room in planned {
            if !self.cave.is_adjacent(current, room) {
                room = self
                    .events
                    .pick(self.cave.neighbors(current))
                    .unwrap_or(current);
                deflections += 1;
            }
            current = room;
            flown.push(room);
            if current == self.session.wumpus {
                hit = true;
                break;
            }
        }
        turn.events.push(GameEvent::ArrowFlew {
            path: flown,
            deflections,
        });

        if hit {
            self.session.game_over = true;
            self.session.last_message = "Your arrow hit the Wumpus! You win the gold!".to_string();
            turn.events.push(GameEvent::WumpusSlain { room: current });
            turn.status = TurnStatus::Won;
            info!("wumpus slain in room {current}");
            return Ok(turn);
        }

        let mut message = "Your arrow missed. The Wumpus is still out there!".to_string();
        // A relocated wumpus may share the player's room; that only bites on
        // the next arrival.
        if self.events.chance(self.config.wumpus_move_percent) {
            let idx = self.events.index(self.cave.room_count());
            self.session.wumpus = RoomId(idx as u16 + 1);
            message.push_str(" The Wumpus has moved!");
            turn.events.push(GameEvent::WumpusMoved);
            debug!("wumpus relocated to room {}", self.session.wumpus);
        }
        self.session.last_message = message;
        Ok(turn)
    }

    fn ensure_playing(&mut self, expected: Mode) -> Result<(), ActionError> {
        if self.session.game_over {
            return self.reject(ActionError::GameOver).map(|_| ());
        }
        if self.session.mode != expected {
            return self.reject(ActionError::WrongMode { expected }).map(|_| ());
        }
        Ok(())
    }

    /// A finished game keeps its outcome as the status message.
    fn reject(&mut self, err: ActionError) -> Result<Turn, ActionError> {
        debug!("rejected action: {err:?}");
        if err != ActionError::GameOver {
            self.session.last_message = err.to_string();
        }
        Err(err)
    }
}
