use std::collections::VecDeque;

use bracket_geometry::prelude::{Point, line2d_bresenham};
use bracket_terminal::prelude::*;

use crate::{
    cave::{CaveGraph, RoomId},
    config::GameConfig,
    data::{GAME_TITLE, hazard_notes, instructions},
    game::{GameEvent, Mode, Session},
};

pub const MAP_ORIGIN_X: i32 = 10;
pub const MAP_ORIGIN_Y: i32 = 10;
pub const ROOM_SPACING_X: i32 = 15;
pub const ROOM_SPACING_Y: i32 = 7;

const TWEEN_STRIDE: usize = 1;
const LOG_ROWS: i32 = 5;

/// Screen cell where a room's label starts (the digit column after `[`).
pub fn room_anchor(cave: &CaveGraph, room: RoomId) -> Point {
    let grid = cave.grid_position(room);
    Point::new(
        MAP_ORIGIN_X + grid.x * ROOM_SPACING_X,
        MAP_ORIGIN_Y + grid.y * ROOM_SPACING_Y,
    )
}

fn in_label(anchor: Point, point: Point) -> bool {
    point.y == anchor.y && point.x >= anchor.x - 1 && point.x <= anchor.x + 2
}

/// The room whose `[NN]` label covers `point`, if any.
pub fn room_at(cave: &CaveGraph, point: Point) -> Option<RoomId> {
    cave.rooms()
        .find(|room| in_label(room_anchor(cave, *room), point))
}

/// A glyph sliding along a screen path, one cell per frame.
#[derive(Clone, Debug)]
pub struct Tween {
    pub path: Vec<Point>,
    pub step: usize,
    pub glyph: FontCharType,
    pub color: RGB,
}

impl Tween {
    pub fn through(waypoints: &[Point], glyph: char, color: RGB) -> Self {
        let mut path = Vec::new();
        for pair in waypoints.windows(2) {
            let segment = line2d_bresenham(pair[0], pair[1]);
            let skip = usize::from(!path.is_empty());
            path.extend(segment.into_iter().skip(skip));
        }
        if path.is_empty() {
            path.extend(waypoints.first().copied());
        }
        Self {
            path,
            step: 0,
            glyph: to_cp437(glyph),
            color,
        }
    }

    pub fn point(&self) -> Option<Point> {
        self.path.get(self.step).copied()
    }

    /// Moves one stride along; true once the end has been passed.
    pub fn advance(&mut self) -> bool {
        self.step += TWEEN_STRIDE;
        self.step >= self.path.len()
    }
}

/// Turns a turn's events into the animations the player watches, starting
/// from the room the player stood in before acting.
pub fn tweens_for(cave: &CaveGraph, origin: RoomId, events: &[GameEvent]) -> VecDeque<Tween> {
    let mut tweens = VecDeque::new();
    for event in events {
        match event {
            GameEvent::Walked { from, to } => tweens.push_back(Tween::through(
                &[room_anchor(cave, *from), room_anchor(cave, *to)],
                '@',
                RGB::named(LIGHT_GREEN),
            )),
            GameEvent::CarriedByBats { from, to } | GameEvent::DroppedIntoHazard { from, to } => {
                tweens.push_back(Tween::through(
                    &[room_anchor(cave, *from), room_anchor(cave, *to)],
                    'B',
                    RGB::named(MAGENTA),
                ))
            }
            GameEvent::ArrowFlew { path, .. } => {
                let mut waypoints = vec![room_anchor(cave, origin)];
                waypoints.extend(path.iter().map(|room| room_anchor(cave, *room)));
                tweens.push_back(Tween::through(&waypoints, '>', RGB::named(YELLOW)));
            }
            GameEvent::FoundArrow { .. } | GameEvent::WumpusSlain { .. } | GameEvent::WumpusMoved => {}
        }
    }
    tweens
}

pub struct Hud;

impl Hud {
    pub const fn new() -> Self {
        Self
    }

    pub fn draw(&self, ctx: &mut BTerm, session: &Session, frame: u64, typed_room: &str) {
        let (width, _) = ctx.get_char_size();
        ctx.draw_box(0, 0, width as i32 - 1, 6, RGB::named(GRAY), RGB::named(BLACK));
        ctx.print_color(
            2,
            1,
            RGB::named(GOLD),
            RGB::named(BLACK),
            format!("{GAME_TITLE} · Room {}", session.player),
        );

        let mode_color = match session.mode {
            Mode::Move => RGB::named(LIGHT_GREEN),
            Mode::Shoot => RGB::named(ORANGE),
        };
        ctx.print_color(
            2,
            2,
            mode_color,
            RGB::named(BLACK),
            format!("Mode: {}", session.mode),
        );
        ctx.print_color(
            2,
            3,
            RGB::named(WHITE),
            RGB::named(BLACK),
            format!("Arrows: {}", session.arrows),
        );

        if !session.shoot_path.is_empty() {
            let path: Vec<String> = session.shoot_path.iter().map(RoomId::to_string).collect();
            ctx.print_color(
                2,
                4,
                RGB::named(ORANGE),
                RGB::named(BLACK),
                format!("Arrow path: {}", path.join(" > ")),
            );
        }
        if !typed_room.is_empty() {
            let cursor = if frame % 30 < 15 { '_' } else { ' ' };
            ctx.print_color(
                40,
                2,
                RGB::named(LIGHT_CYAN),
                RGB::named(BLACK),
                format!("Room #{typed_room}{cursor}"),
            );
        }
        ctx.print_color(
            40,
            4,
            RGB::named(DARK_GRAY),
            RGB::named(BLACK),
            "M move · S shoot · Enter fire · R reset",
        );
    }
}

/// Draws edges, room labels and the player. While a tween is playing the
/// player glyph is left to the tween.
pub fn draw_cave(
    ctx: &mut BTerm,
    cave: &CaveGraph,
    session: &Session,
    tween: Option<&Tween>,
    reveal: bool,
) {
    for room in cave.rooms() {
        let from = room_anchor(cave, room);
        for neighbor in cave.neighbors(room).iter().filter(|n| **n > room) {
            let to = room_anchor(cave, *neighbor);
            let glyph = if from.y == to.y { '-' } else { '|' };
            for point in line2d_bresenham(from, to) {
                if in_label(from, point) || in_label(to, point) {
                    continue;
                }
                ctx.set(
                    point.x,
                    point.y,
                    RGB::named(DARK_GRAY),
                    RGB::named(BLACK),
                    to_cp437(glyph),
                );
            }
        }
    }

    let selectable = if session.game_over {
        &[][..]
    } else {
        session.selectable_rooms(cave)
    };
    for room in cave.rooms() {
        let anchor = room_anchor(cave, room);
        let color = if session.shoot_path.contains(&room) {
            RGB::named(ORANGE)
        } else if selectable.contains(&room) {
            RGB::named(GOLD)
        } else {
            RGB::named(TAN)
        };
        ctx.print_color(
            anchor.x - 1,
            anchor.y,
            color,
            RGB::named(BLACK),
            format!("[{:>2}]", room.0),
        );

        if reveal {
            let marks = [
                (room == session.wumpus, 'W', RGB::named(RED)),
                (session.is_pit(room), 'P', RGB::named(LIGHT_BLUE)),
                (session.is_bat_room(room), 'B', RGB::named(MAGENTA)),
            ];
            if let Some((_, glyph, fg)) = marks.iter().find(|(hit, _, _)| *hit) {
                ctx.set(anchor.x, anchor.y + 1, *fg, RGB::named(BLACK), to_cp437(*glyph));
            }
        }
    }

    if let Some((active, point)) = tween.and_then(|t| t.point().map(|point| (t, point))) {
        ctx.set(point.x, point.y - 1, active.color, RGB::named(BLACK), active.glyph);
    } else {
        let anchor = room_anchor(cave, session.player);
        ctx.set(
            anchor.x + 1,
            anchor.y - 1,
            RGB::named(LIGHT_GREEN),
            RGB::named(BLACK),
            to_cp437('@'),
        );
    }
}

/// Breaks a log entry into lines no wider than `width`, splitting on
/// spaces and hard-cutting words that are longer than a line.
pub fn wrap_entry(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            lines.push(word.drain(..width).collect());
        }
        if word.is_empty() {
            continue;
        }
        let needed = if line.is_empty() {
            word.len()
        } else {
            line.chars().count() + 1 + word.len()
        };
        if needed > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.extend(word);
    }
    if !line.is_empty() || lines.is_empty() {
        lines.push(line);
    }
    lines
}

/// Newest entry first, in white; older entries fade to gray. Long entries
/// wrap inside the panel and push older ones out.
pub fn draw_log(ctx: &mut BTerm, log: &[String], start_y: i32) {
    let (width, screen_height) = ctx.get_char_size();
    let top = (start_y - 1).max(0);
    let room = (screen_height as i32 - top - 3).clamp(0, LOG_ROWS);
    let text_width = (width as usize).saturating_sub(4);

    let mut lines: Vec<(bool, String)> = Vec::new();
    for (age, entry) in log.iter().enumerate() {
        if lines.len() >= room as usize {
            break;
        }
        lines.extend(wrap_entry(entry, text_width).into_iter().map(|line| (age == 0, line)));
    }
    lines.truncate(room as usize);

    ctx.draw_box(
        0,
        top,
        width as i32 - 1,
        lines.len() as i32 + 2,
        RGB::named(DARK_GRAY),
        RGB::named(BLACK),
    );
    ctx.print_color(
        2,
        top + 1,
        RGB::named(WHITE),
        RGB::named(BLACK),
        "Event Log",
    );
    for (row, (newest, line)) in lines.iter().enumerate() {
        let fg = if *newest {
            RGB::named(WHITE)
        } else {
            RGB::named(GRAY)
        };
        ctx.print_color(2, top + 2 + row as i32, fg, RGB::named(BLACK), line);
    }
}

pub fn draw_title(ctx: &mut BTerm, config: &GameConfig) {
    ctx.print_color_centered(6, RGB::named(GOLD), RGB::named(BLACK), GAME_TITLE);
    let mut y = 10;
    for line in instructions() {
        ctx.print_color(10, y, RGB::named(WHITE), RGB::named(BLACK), line);
        y += 2;
    }

    y += 1;
    ctx.print_color(10, y, RGB::named(WHITE), RGB::named(BLACK), "RULES:");
    y += 2;
    for note in hazard_notes(config.bat_drop_percent, config.arrow_find_percent) {
        ctx.set(12, y, RGB::named(ORANGE), RGB::named(BLACK), to_cp437(note.glyph));
        ctx.print_color(
            14,
            y,
            RGB::named(WHITE),
            RGB::named(BLACK),
            format!("{}: {}", note.name, note.notes),
        );
        y += 2;
    }

    ctx.print_color_centered(
        y + 2,
        RGB::named(LIGHT_CYAN),
        RGB::named(BLACK),
        "Press any key to begin...",
    );
}

pub fn draw_game_over(ctx: &mut BTerm, message: &str) {
    let (width, height) = ctx.get_char_size();
    let (width, height) = (width as i32, height as i32);
    let box_width = (message.len() as i32 + 6).clamp(40, width - 2);
    let left = (width - box_width) / 2;
    let top = height / 2 - 4;
    ctx.draw_box(
        left,
        top,
        box_width,
        6,
        RGB::named(RED),
        RGB::named(BLACK),
    );
    ctx.print_color_centered(top + 2, RGB::named(RED), RGB::named(BLACK), "GAME OVER");
    ctx.print_color_centered(top + 3, RGB::named(WHITE), RGB::named(BLACK), message);
    ctx.print_color_centered(
        top + 5,
        RGB::named(GRAY),
        RGB::named(BLACK),
        "Press R to restart or Q to quit.",
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_entry_stays_on_one_line() {
        assert_eq!(wrap_entry("You are in room 7.", 40), vec!["You are in room 7."]);
    }

    #[test]
    fn long_entry_wraps_on_spaces() {
        let text = "You smell a wumpus! You feel a draft! You hear flapping!";
        let lines = wrap_entry(text, 20);
        assert_eq!(
            lines,
            vec!["You smell a wumpus!", "You feel a draft!", "You hear flapping!"]
        );
        assert!(lines.iter().all(|line| line.chars().count() <= 20));
    }

    #[test]
    fn oversized_word_is_cut() {
        assert_eq!(wrap_entry("abcdefghij kl", 4), vec!["abcd", "efgh", "ij", "kl"]);
    }

    #[test]
    fn empty_entry_keeps_a_blank_line() {
        assert_eq!(wrap_entry("", 10), vec![String::new()]);
    }

    #[test]
    fn anchors_follow_grid_spacing() {
        let cave = CaveGraph::default();
        assert_eq!(room_anchor(&cave, RoomId(1)), Point::new(MAP_ORIGIN_X, MAP_ORIGIN_Y));
        assert_eq!(
            room_anchor(&cave, RoomId(8)),
            Point::new(MAP_ORIGIN_X + 2 * ROOM_SPACING_X, MAP_ORIGIN_Y + ROOM_SPACING_Y)
        );
    }

    #[test]
    fn clicks_hit_room_labels() {
        let cave = CaveGraph::default();
        let anchor = room_anchor(&cave, RoomId(13));
        assert_eq!(room_at(&cave, anchor), Some(RoomId(13)));
        assert_eq!(room_at(&cave, Point::new(anchor.x - 1, anchor.y)), Some(RoomId(13)));
        assert_eq!(room_at(&cave, Point::new(anchor.x + 2, anchor.y)), Some(RoomId(13)));
        assert_eq!(room_at(&cave, Point::new(anchor.x + 3, anchor.y)), None);
        assert_eq!(room_at(&cave, Point::new(anchor.x, anchor.y + 1)), None);
    }

    #[test]
    fn tween_runs_edge_to_edge() {
        let cave = CaveGraph::default();
        let from = room_anchor(&cave, RoomId(1));
        let to = room_anchor(&cave, RoomId(2));
        let mut tween = Tween::through(&[from, to], '@', RGB::named(WHITE));
        assert_eq!(tween.point(), Some(from));
        let mut frames = 1;
        while !tween.advance() {
            frames += 1;
        }
        assert_eq!(frames, tween.path.len());
        assert_eq!(tween.path.last().copied(), Some(to));
    }

    #[test]
    fn events_become_tweens() {
        let cave = CaveGraph::default();
        let events = vec![
            GameEvent::Walked {
                from: RoomId(1),
                to: RoomId(2),
            },
            GameEvent::CarriedByBats {
                from: RoomId(2),
                to: RoomId(20),
            },
            GameEvent::FoundArrow { room: RoomId(20) },
        ];
        let tweens = tweens_for(&cave, RoomId(1), &events);
        assert_eq!(tweens.len(), 2);
        assert_eq!(tweens[1].path.last().copied(), Some(room_anchor(&cave, RoomId(20))));
    }

    #[test]
    fn arrow_tween_starts_at_shooter() {
        let cave = CaveGraph::default();
        let events = vec![GameEvent::ArrowFlew {
            path: vec![RoomId(2), RoomId(3)],
            deflections: 0,
        }];
        let tweens = tweens_for(&cave, RoomId(1), &events);
        assert_eq!(tweens[0].point(), Some(room_anchor(&cave, RoomId(1))));
        assert_eq!(tweens[0].path.last().copied(), Some(room_anchor(&cave, RoomId(3))));
    }
}
