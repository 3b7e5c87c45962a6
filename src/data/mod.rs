pub const GAME_TITLE: &str = "HUNT THE WUMPUS";

#[derive(Clone, Debug)]
pub struct HazardNote {
    pub glyph: char,
    pub name: &'static str,
    pub notes: String,
}

/// Lines shown on the title screen, before the hazard legend.
pub fn instructions() -> Vec<&'static str> {
    vec![
        "INSTRUCTIONS:",
        " - Press 'M' to move: click a highlighted adjacent room.",
        " - Press 'S' to shoot: select adjacent rooms for the arrow path,",
        "   then press Enter.",
        " - Or type a room number and press Space to select it.",
        " - Press 'R' to reset the game, 'Q' to quit.",
        "",
        "GOAL:",
        " - Hunt the Wumpus with your arrows before it catches you!",
    ]
}

pub fn hazard_notes(bat_drop_percent: u32, arrow_find_percent: u32) -> Vec<HazardNote> {
    vec![
        HazardNote {
            glyph: 'P',
            name: "Pits",
            notes: "instant defeat.".to_string(),
        },
        HazardNote {
            glyph: 'B',
            name: "Bats",
            notes: format!("{bat_drop_percent}% chance to drop you into a pit or the Wumpus."),
        },
        HazardNote {
            glyph: 'W',
            name: "Wumpus",
            notes: "entering its room loses the game.".to_string(),
        },
        HazardNote {
            glyph: '^',
            name: "Arrows",
            notes: format!("{arrow_find_percent}% chance to find one in a safe room."),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hazard_notes_quote_tuning() {
        let notes = hazard_notes(10, 15);
        assert_eq!(notes.len(), 4);
        assert!(notes[1].notes.starts_with("10%"));
        assert!(notes[3].notes.starts_with("15%"));
    }
}
