mod cave;
mod config;
mod data;
mod game;
mod render;
mod scripted_input;

use std::collections::VecDeque;

use bracket_terminal::prelude::*;
use clap::Parser;
use log::{debug, info};

use cave::RoomId;
use config::GameConfig;
use game::{ActionError, Game, Mode, Turn};
use render::{Hud, Tween, draw_cave, draw_game_over, draw_log, draw_title, room_at, tweens_for};
use scripted_input::ScriptedInput;

const SCREEN_HEIGHT: i32 = 50;
const LOG_PANEL_START: i32 = SCREEN_HEIGHT - 6;
const LOG_MAX_ENTRIES: usize = 8;

/// Hunt the Wumpus in a terminal window
#[derive(Parser, Debug)]
#[command(name = "wumpus-cave")]
#[command(author, version, about = "Hunt the Wumpus across a 4x5 cave", long_about = None)]
struct Args {
    /// JSON file with rule tuning and cave shape
    #[arg(short = 'c', long = "config")]
    config: Option<String>,

    /// Seed both the hazard placement and the in-play dice
    #[arg(short = 's', long = "seed")]
    seed: Option<u64>,

    /// Replay a command script without opening a window
    #[arg(long = "script")]
    script: Option<String>,

    /// With --script, print the session as JSON after every command
    #[arg(long = "dump-state")]
    dump_state: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Screen {
    Title,
    Playing,
}

struct WumpusState {
    game: Game,
    screen: Screen,
    hud: Hud,
    frame: u64,
    message_log: Vec<String>,
    tweens: VecDeque<Tween>,
    typed_room: String,
}

impl WumpusState {
    fn new(config: &GameConfig) -> Self {
        let game = Game::new(config);
        let mut state = Self {
            game,
            screen: Screen::Title,
            hud: Hud::new(),
            frame: 0,
            message_log: Vec::new(),
            tweens: VecDeque::new(),
            typed_room: String::new(),
        };
        state.push_log_entry(state.game.session().last_message.clone());
        state
    }
}

impl GameState for WumpusState {
    fn tick(&mut self, ctx: &mut BTerm) {
        self.frame = self.frame.wrapping_add(1);
        ctx.cls();
        match self.screen {
            Screen::Title => {
                if ctx.key.is_some() || ctx.left_click {
                    self.screen = Screen::Playing;
                }
                draw_title(ctx, self.game.config());
            }
            Screen::Playing => {
                self.advance_tweens();
                if self.tweens.is_empty() {
                    self.handle_input(ctx);
                }
                self.draw_scene(ctx);
            }
        }
    }
}

impl WumpusState {
    fn handle_input(&mut self, ctx: &mut BTerm) {
        if self.game.session().game_over {
            match ctx.key {
                Some(key) if restart_or_quit(key) => {}
                _ => return,
            }
        }

        if ctx.left_click {
            if let Some(room) = room_at(self.game.cave(), ctx.mouse_point()) {
                self.select_room(room);
            }
        }

        let Some(key) = ctx.key else {
            return;
        };
        match key {
            VirtualKeyCode::Q | VirtualKeyCode::Escape => {
                info!("quit requested");
                ctx.quit();
            }
            VirtualKeyCode::R => {
                self.game.reset();
                self.tweens.clear();
                self.typed_room.clear();
                self.push_log_entry(self.game.session().last_message.clone());
            }
            VirtualKeyCode::M => self.switch_mode(Mode::Move),
            VirtualKeyCode::S => self.switch_mode(Mode::Shoot),
            VirtualKeyCode::Return | VirtualKeyCode::NumpadEnter => {
                let origin = self.game.session().player;
                let result = self.game.fire_arrow();
                self.apply(origin, result);
            }
            VirtualKeyCode::Space => {
                if let Ok(number) = self.typed_room.parse::<u16>() {
                    self.select_room(RoomId(number));
                }
                self.typed_room.clear();
            }
            VirtualKeyCode::Back => {
                self.typed_room.pop();
            }
            other => {
                if let Some(digit) = digit_for(other) {
                    if self.typed_room.len() < room_digits(self.game.cave().room_count()) {
                        self.typed_room.push(digit);
                    }
                }
            }
        }
    }

    /// A room click means "walk there" or "aim through there" depending on
    /// the mode.
    fn select_room(&mut self, room: RoomId) {
        let origin = self.game.session().player;
        let result = match self.game.session().mode {
            Mode::Move => self.game.attempt_move(room),
            Mode::Shoot => self.game.append_shoot_path(room),
        };
        self.apply(origin, result);
    }

    fn switch_mode(&mut self, mode: Mode) {
        if let Err(err) = self.game.set_mode(mode) {
            debug!("mode switch refused: {err}");
        }
        self.push_log_entry(self.game.session().last_message.clone());
    }

    fn apply(&mut self, origin: RoomId, result: Result<Turn, ActionError>) {
        match result {
            Ok(turn) => {
                self.tweens
                    .extend(tweens_for(self.game.cave(), origin, &turn.events));
                debug!("turn ended {:?} after {} events", turn.status, turn.events.len());
            }
            Err(err) => debug!("action refused: {err:?}"),
        }
        self.push_log_entry(self.game.session().last_message.clone());
    }

    fn advance_tweens(&mut self) {
        if let Some(tween) = self.tweens.front_mut() {
            if tween.advance() {
                self.tweens.pop_front();
            }
        }
    }

    fn draw_scene(&self, ctx: &mut BTerm) {
        let session = self.game.session();
        self.hud.draw(ctx, session, self.frame, &self.typed_room);
        let animating = !self.tweens.is_empty();
        draw_cave(
            ctx,
            self.game.cave(),
            session,
            self.tweens.front(),
            session.game_over && !animating,
        );
        draw_log(ctx, &self.message_log, LOG_PANEL_START);
        if session.game_over && !animating {
            draw_game_over(ctx, &session.last_message);
        }
    }

    fn push_log_entry<S: Into<String>>(&mut self, entry: S) {
        self.message_log.insert(0, entry.into());
        self.message_log.truncate(LOG_MAX_ENTRIES);
    }
}

/// The only keys the game-over overlay listens to.
fn restart_or_quit(key: VirtualKeyCode) -> bool {
    matches!(
        key,
        VirtualKeyCode::R | VirtualKeyCode::Q | VirtualKeyCode::Escape
    )
}

fn room_digits(room_count: usize) -> usize {
    room_count.max(1).ilog10() as usize + 1
}

fn digit_for(key: VirtualKeyCode) -> Option<char> {
    let digit = match key {
        VirtualKeyCode::Key0 | VirtualKeyCode::Numpad0 => '0',
        VirtualKeyCode::Key1 | VirtualKeyCode::Numpad1 => '1',
        VirtualKeyCode::Key2 | VirtualKeyCode::Numpad2 => '2',
        VirtualKeyCode::Key3 | VirtualKeyCode::Numpad3 => '3',
        VirtualKeyCode::Key4 | VirtualKeyCode::Numpad4 => '4',
        VirtualKeyCode::Key5 | VirtualKeyCode::Numpad5 => '5',
        VirtualKeyCode::Key6 | VirtualKeyCode::Numpad6 => '6',
        VirtualKeyCode::Key7 | VirtualKeyCode::Numpad7 => '7',
        VirtualKeyCode::Key8 | VirtualKeyCode::Numpad8 => '8',
        VirtualKeyCode::Key9 | VirtualKeyCode::Numpad9 => '9',
        _ => return None,
    };
    Some(digit)
}

fn main() -> BError {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    config.validate()?;

    if let Some(path) = &args.script {
        let mut game = Game::new(&config);
        let mut script = ScriptedInput::from_file(path)?;
        for line in script.play(&mut game, args.dump_state)? {
            println!("{line}");
        }
        return Ok(());
    }

    let context = BTermBuilder::simple80x50()
        .with_title("Hunt the Wumpus")
        .build()?;
    let game_state = WumpusState::new(&config);
    main_loop(context, game_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bracket_random::prelude::RandomNumberGenerator;

    use crate::game::{Layout, Session};

    #[test]
    fn digits_map_from_both_rows() {
        assert_eq!(digit_for(VirtualKeyCode::Key7), Some('7'));
        assert_eq!(digit_for(VirtualKeyCode::Numpad0), Some('0'));
        assert_eq!(digit_for(VirtualKeyCode::M), None);
    }

    #[test]
    fn game_over_overlay_only_hears_restart_and_quit() {
        assert!(restart_or_quit(VirtualKeyCode::R));
        assert!(restart_or_quit(VirtualKeyCode::Q));
        assert!(restart_or_quit(VirtualKeyCode::Escape));
        assert!(!restart_or_quit(VirtualKeyCode::M));
        assert!(!restart_or_quit(VirtualKeyCode::S));
        assert!(!restart_or_quit(VirtualKeyCode::Return));
    }

    #[test]
    fn typed_room_width_follows_cave_size() {
        assert_eq!(room_digits(20), 2);
        assert_eq!(room_digits(9), 1);
        assert_eq!(room_digits(100), 3);
        assert_eq!(room_digits(65_535), 5);
    }

    #[test]
    fn finished_game_keeps_outcome_in_log() {
        let config = GameConfig::default();
        let layout = Layout {
            wumpus: RoomId(20),
            pits: [RoomId(2), RoomId(19)],
            bats: [RoomId(17), RoomId(18)],
        };
        let session = Session::new(layout, config.start(), config.starting_arrows);
        let mut state = WumpusState::new(&config);
        state.game = Game::from_session(
            &config,
            session,
            RandomNumberGenerator::seeded(3),
            RandomNumberGenerator::seeded(4),
        );
        state.select_room(RoomId(2));
        assert!(state.game.session().game_over);
        let outcome = state.message_log[0].clone();

        state.switch_mode(Mode::Shoot);
        state.select_room(RoomId(1));
        assert_eq!(state.game.session().last_message, outcome);
        assert_eq!(state.message_log[0], outcome);
    }

    #[test]
    fn clicking_a_room_in_shoot_mode_extends_path() {
        let mut state = WumpusState::new(&GameConfig::default().with_seed(8));
        state.switch_mode(Mode::Shoot);
        state.select_room(RoomId(2));
        assert_eq!(state.game.session().shoot_path, vec![RoomId(2)]);
        assert!(state.message_log[0].starts_with("Added room 2"));
    }

    #[test]
    fn move_queues_animation() {
        let mut state = WumpusState::new(&GameConfig::default().with_seed(8));
        state.select_room(RoomId(2));
        assert!(!state.tweens.is_empty());
        // Room 2 neighbours the start and never holds a hazard.
        assert_eq!(state.game.session().player, RoomId(2));
    }

    #[test]
    fn log_keeps_newest_first() {
        let mut state = WumpusState::new(&GameConfig::default().with_seed(1));
        for idx in 0..12 {
            state.push_log_entry(format!("entry {idx}"));
        }
        assert_eq!(state.message_log.len(), LOG_MAX_ENTRIES);
        assert_eq!(state.message_log[0], "entry 11");
    }
}
