use bracket_random::prelude::RandomNumberGenerator;

/// Source of every random decision the rules make. Placement and in-play
/// events each own one, so either stream can be seeded or scripted alone.
pub trait Dice {
    /// True with `percent` in 100 odds.
    fn chance(&mut self, percent: u32) -> bool;

    /// Uniform index in `0..len`. `len` is never zero.
    fn index(&mut self, len: usize) -> usize;

    fn pick<T: Copy>(&mut self, items: &[T]) -> Option<T> {
        if items.is_empty() {
            return None;
        }
        let idx = self.index(items.len());
        items.get(idx).copied()
    }
}

impl Dice for RandomNumberGenerator {
    fn chance(&mut self, percent: u32) -> bool {
        self.range(0, 100) < percent as i32
    }

    fn index(&mut self, len: usize) -> usize {
        self.range(0, len as i32) as usize
    }
}

pub fn seeded_or_entropy(seed: Option<u64>) -> RandomNumberGenerator {
    match seed {
        Some(seed) => RandomNumberGenerator::seeded(seed),
        None => RandomNumberGenerator::new(),
    }
}

#[cfg(test)]
pub use self::scripted::ScriptedDice;
