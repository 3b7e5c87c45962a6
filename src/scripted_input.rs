use std::{fs, path::Path};

use chrono::Local;
use log::{info, warn};
use thiserror::Error;

use crate::{
    cave::RoomId,
    game::{Dice, Game, Mode, TurnStatus},
};

#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("could not read script '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: unknown command '{word}'")]
    UnknownCommand { line: usize, word: String },

    #[error("line {line}: '{word}' is not a room number")]
    BadRoom { line: usize, word: String },

    #[error("line {line}: '{command}' needs at least one room")]
    MissingRoom { line: usize, command: &'static str },

    #[error("could not encode session: {0}")]
    Snapshot(#[from] serde_json::Error),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Move(RoomId),
    Shoot,
    Walk,
    Path(Vec<RoomId>),
    Fire,
    Reset,
    Quit,
}

/// Commands read from a text script, replayed against a game without a
/// window attached.
pub struct ScriptedInput {
    script_commands: Vec<Command>,
    current_command_index: usize,
}

impl ScriptedInput {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ScriptError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ScriptError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, ScriptError> {
        let mut script_commands = Vec::new();
        for (idx, raw) in text.lines().enumerate() {
            let line = idx + 1;
            let trimmed_line = raw.split('#').next().unwrap_or("").trim();
            if trimmed_line.is_empty() {
                continue;
            }

            let mut words = trimmed_line.split_whitespace();
            let Some(verb) = words.next() else {
                continue;
            };
            let rooms = words
                .map(|word| parse_room(line, word))
                .collect::<Result<Vec<_>, _>>()?;
            let command = match verb.to_ascii_lowercase().as_str() {
                "move" | "m" => match rooms.first() {
                    Some(room) => Command::Move(*room),
                    None => {
                        return Err(ScriptError::MissingRoom {
                            line,
                            command: "move",
                        });
                    }
                },
                "path" | "p" => {
                    if rooms.is_empty() {
                        return Err(ScriptError::MissingRoom {
                            line,
                            command: "path",
                        });
                    }
                    Command::Path(rooms)
                }
                "shoot" | "s" => Command::Shoot,
                "walk" | "w" => Command::Walk,
                "fire" | "f" => Command::Fire,
                "reset" | "r" => Command::Reset,
                "quit" | "q" => Command::Quit,
                other => {
                    return Err(ScriptError::UnknownCommand {
                        line,
                        word: other.to_string(),
                    });
                }
            };
            script_commands.push(command);
        }

        Ok(Self {
            script_commands,
            current_command_index: 0,
        })
    }

    pub fn next_command(&mut self) -> Option<Command> {
        let command = self.script_commands.get(self.current_command_index)?.clone();
        self.current_command_index += 1;
        Some(command)
    }

    /// Applies every command in order and returns the transcript. Rejected
    /// actions are logged and play continues.
    pub fn play<D: Dice>(
        &mut self,
        game: &mut Game<D>,
        dump_state: bool,
    ) -> Result<Vec<String>, ScriptError> {
        let mut transcript = vec![format!(
            "# wumpus-cave transcript {}",
            Local::now().format("%Y-%m-%d %H:%M:%S")
        )];

        while let Some(command) = self.next_command() {
            let outcome = match &command {
                Command::Move(room) => game.attempt_move(*room).map(|turn| turn.status),
                Command::Shoot => game.set_mode(Mode::Shoot).map(|_| TurnStatus::Continue),
                Command::Walk => game.set_mode(Mode::Move).map(|_| TurnStatus::Continue),
                Command::Path(rooms) => rooms
                    .iter()
                    .try_for_each(|room| game.append_shoot_path(*room).map(|_| ()))
                    .map(|_| TurnStatus::Continue),
                Command::Fire => game.fire_arrow().map(|turn| turn.status),
                Command::Reset => {
                    game.reset();
                    Ok(TurnStatus::Continue)
                }
                Command::Quit => break,
            };
            if let Err(err) = outcome {
                warn!("{command:?} rejected: {err}");
            }

            transcript.push(format!("> {command:?}"));
            transcript.push(game.session().last_message.clone());
            if dump_state {
                transcript.push(serde_json::to_string(game.session())?);
            }
        }

        info!("script finished after {} commands", self.current_command_index);
        Ok(transcript)
    }
}

fn parse_room(line: usize, word: &str) -> Result<RoomId, ScriptError> {
    word.parse::<u16>()
        .map(RoomId)
        .map_err(|_| ScriptError::BadRoom {
            line,
            word: word.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;

    #[test]
    fn parses_commands_and_skips_comments() {
        let mut script = ScriptedInput::parse(
            "# opening\nmove 2\n\nshoot  # aim\npath 3 4\nfire\nwalk\nreset\nquit\n",
        )
        .unwrap();
        let mut seen = Vec::new();
        while let Some(command) = script.next_command() {
            seen.push(command);
        }
        assert_eq!(
            seen,
            vec![
                Command::Move(RoomId(2)),
                Command::Shoot,
                Command::Path(vec![RoomId(3), RoomId(4)]),
                Command::Fire,
                Command::Walk,
                Command::Reset,
                Command::Quit,
            ]
        );
    }

    #[test]
    fn reports_line_of_unknown_command() {
        let err = ScriptError::UnknownCommand {
            line: 2,
            word: "dance".to_string(),
        };
        let parsed = ScriptedInput::parse("move 2\ndance\n").err().unwrap();
        assert_eq!(parsed.to_string(), err.to_string());
    }

    #[test]
    fn rejects_bad_room_numbers() {
        let parsed = ScriptedInput::parse("m two").err().unwrap();
        assert!(matches!(parsed, ScriptError::BadRoom { line: 1, .. }));
        let missing = ScriptedInput::parse("path").err().unwrap();
        assert!(matches!(
            missing,
            ScriptError::MissingRoom {
                line: 1,
                command: "path"
            }
        ));
    }

    #[test]
    fn playback_records_messages_and_stops_at_quit() {
        let mut game = Game::new(&GameConfig::default().with_seed(99));
        let mut script = ScriptedInput::parse("move 7\nshoot\nquit\nwalk\n").unwrap();
        let transcript = script.play(&mut game, false).unwrap();
        // Header, then two lines per command before quit.
        assert_eq!(transcript.len(), 5);
        assert_eq!(transcript[2], "Invalid move! Choose an adjacent room.");
        assert_eq!(game.session().mode, Mode::Shoot);
    }

    #[test]
    fn playback_can_dump_state() {
        let mut game = Game::new(&GameConfig::default().with_seed(3));
        let mut script = ScriptedInput::parse("shoot\n").unwrap();
        let transcript = script.play(&mut game, true).unwrap();
        assert!(transcript[3].contains("\"mode\":\"Shoot\""));
    }
}
