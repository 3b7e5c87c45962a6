use std::fmt;

use bracket_geometry::prelude::Point;
use bracket_pathfinding::prelude::{BaseMap, DijkstraMap};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

pub const DEFAULT_ROWS: i32 = 4;
pub const DEFAULT_COLS: i32 = 5;
/// Room ids are `u16`, numbered from 1.
pub const MAX_ROOMS: i32 = u16::MAX as i32;

/// A node of the cave graph, numbered from 1 in row-major order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub u16);

impl RoomId {
    fn index(self) -> usize {
        self.0 as usize - 1
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub type Neighbors = SmallVec<[RoomId; 4]>;

/// Fixed adjacency over a rows x cols grid of rooms. Edges join horizontal
/// and vertical grid neighbours only, never diagonals and never wrapping.
#[derive(Clone, Debug)]
pub struct CaveGraph {
    pub rows: i32,
    pub cols: i32,
    adjacency: Vec<Neighbors>,
}

impl Default for CaveGraph {
    fn default() -> Self {
        Self::grid(DEFAULT_ROWS, DEFAULT_COLS)
    }
}

impl CaveGraph {
    /// Builds the grid graph. Shapes past `MAX_ROOMS` are shrunk row-wise
    /// so every room keeps a distinct id.
    pub fn grid(rows: i32, cols: i32) -> Self {
        let cols = cols.clamp(1, MAX_ROOMS);
        let rows = rows.clamp(1, MAX_ROOMS / cols);
        let mut adjacency = Vec::with_capacity((rows * cols) as usize);
        for idx in 0..rows * cols {
            let row = idx / cols;
            let col = idx % cols;
            let room = idx + 1;
            let mut candidates = SmallVec::<[i32; 4]>::new();
            if col > 0 {
                candidates.push(room - 1);
            }
            if col < cols - 1 {
                candidates.push(room + 1);
            }
            if row > 0 {
                candidates.push(room - cols);
            }
            if row < rows - 1 {
                candidates.push(room + cols);
            }
            let neighbors = candidates
                .into_iter()
                .filter_map(|room| u16::try_from(room).ok().map(RoomId))
                .collect::<Neighbors>();
            adjacency.push(neighbors);
        }

        Self {
            rows,
            cols,
            adjacency,
        }
    }

    pub fn room_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn rooms(&self) -> impl Iterator<Item = RoomId> + '_ {
        (1..=self.adjacency.len()).filter_map(|room| u16::try_from(room).ok().map(RoomId))
    }

    pub fn contains(&self, room: RoomId) -> bool {
        room.0 >= 1 && room.index() < self.adjacency.len()
    }

    /// Rooms reachable in one step from `room`. Unknown rooms have none.
    pub fn neighbors(&self, room: RoomId) -> &[RoomId] {
        if !self.contains(room) {
            return &[];
        }
        &self.adjacency[room.index()]
    }

    pub fn is_adjacent(&self, from: RoomId, to: RoomId) -> bool {
        self.neighbors(from).contains(&to)
    }

    /// The start room plus everything adjacent to it. Hazards never spawn
    /// here, so the first turn carries no warnings.
    pub fn safe_start(&self, start: RoomId) -> Vec<RoomId> {
        let mut safe = vec![start];
        safe.extend_from_slice(self.neighbors(start));
        safe
    }

    pub fn grid_position(&self, room: RoomId) -> Point {
        let idx = room.index() as i32;
        Point::new(idx % self.cols, idx / self.cols)
    }

    pub fn has_isolated_rooms(&self) -> bool {
        self.room_count() > 1 && self.adjacency.iter().any(|neighbors| neighbors.is_empty())
    }

    /// Floods the graph from room 1 and checks every room was reached.
    pub fn is_connected(&self) -> bool {
        match self.room_count() {
            0 => return false,
            1 => return true,
            _ => {}
        }
        let flood = DijkstraMap::new(
            self.cols,
            self.rows,
            &[0],
            self,
            self.room_count() as f32 * 2.0,
        );
        flood
            .map
            .iter()
            .enumerate()
            .all(|(idx, depth)| idx == 0 || *depth < f32::MAX)
    }
}

impl BaseMap for CaveGraph {
    fn is_opaque(&self, _idx: usize) -> bool {
        false
    }

    fn get_available_exits(&self, idx: usize) -> SmallVec<[(usize, f32); 10]> {
        self.adjacency
            .get(idx)
            .map(|neighbors| {
                neighbors
                    .iter()
                    .map(|room| (room.index(), 1.0))
                    .collect::<SmallVec<[(usize, f32); 10]>>()
            })
            .unwrap_or_default()
    }

    fn get_pathing_distance(&self, _idx1: usize, _idx2: usize) -> f32 {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ids(rooms: &[u16]) -> Vec<RoomId> {
        rooms.iter().copied().map(RoomId).collect()
    }

    #[test]
    fn corner_room_has_two_neighbors() {
        let cave = CaveGraph::default();
        assert_eq!(cave.neighbors(RoomId(1)), ids(&[2, 6]).as_slice());
    }

    #[test]
    fn interior_room_has_four_neighbors() {
        let cave = CaveGraph::default();
        let mut neighbors = cave.neighbors(RoomId(8)).to_vec();
        neighbors.sort();
        assert_eq!(neighbors, ids(&[3, 7, 9, 13]));
    }

    #[test]
    fn edges_do_not_wrap_between_rows() {
        let cave = CaveGraph::default();
        assert!(!cave.is_adjacent(RoomId(5), RoomId(6)));
        assert!(!cave.is_adjacent(RoomId(6), RoomId(5)));
        assert!(!cave.is_adjacent(RoomId(1), RoomId(7)));
    }

    #[test]
    fn safe_start_covers_start_and_its_neighbors() {
        let cave = CaveGraph::default();
        assert_eq!(cave.safe_start(RoomId(1)), ids(&[1, 2, 6]));
    }

    #[test]
    fn unknown_rooms_have_no_neighbors() {
        let cave = CaveGraph::default();
        assert!(cave.neighbors(RoomId(0)).is_empty());
        assert!(cave.neighbors(RoomId(21)).is_empty());
        assert!(!cave.contains(RoomId(21)));
    }

    #[test]
    fn default_grid_is_connected() {
        let cave = CaveGraph::default();
        assert_eq!(cave.room_count(), 20);
        assert!(cave.is_connected());
        assert!(!cave.has_isolated_rooms());
    }

    #[test]
    fn grid_position_is_row_major() {
        let cave = CaveGraph::default();
        assert_eq!(cave.grid_position(RoomId(1)), Point::new(0, 0));
        assert_eq!(cave.grid_position(RoomId(8)), Point::new(2, 1));
        assert_eq!(cave.grid_position(RoomId(20)), Point::new(4, 3));
    }

    #[test]
    fn single_room_cave_is_connected() {
        let cave = CaveGraph::grid(1, 1);
        assert_eq!(cave.room_count(), 1);
        assert!(cave.is_connected());
        assert!(!cave.has_isolated_rooms());
    }

    #[test]
    fn oversized_grid_keeps_distinct_ids() {
        let cave = CaveGraph::grid(300, 300);
        assert!(cave.room_count() <= MAX_ROOMS as usize);
        let last = cave.rooms().last().unwrap();
        assert_eq!(last.0 as usize, cave.room_count());
        assert!(cave.rooms().all(|room| room.0 >= 1 && cave.contains(room)));
        for room in cave.rooms().take(50) {
            for neighbor in cave.neighbors(room) {
                assert!(cave.is_adjacent(*neighbor, room));
            }
        }
    }

    #[test]
    fn huge_dimensions_do_not_overflow() {
        let cave = CaveGraph::grid(100_000, 100_000);
        assert!(cave.room_count() <= MAX_ROOMS as usize);
        assert_eq!(cave.cols, MAX_ROOMS);
        assert_eq!(cave.rows, 1);
    }

    proptest! {
        #[test]
        fn adjacency_is_symmetric(rows in 1i32..8, cols in 1i32..8) {
            let cave = CaveGraph::grid(rows, cols);
            for room in cave.rooms() {
                for neighbor in cave.neighbors(room) {
                    prop_assert!(cave.is_adjacent(*neighbor, room));
                }
            }
        }

        #[test]
        fn every_grid_is_connected(rows in 1i32..8, cols in 1i32..8) {
            let cave = CaveGraph::grid(rows, cols);
            prop_assert!(cave.is_connected());
            prop_assert!(!cave.has_isolated_rooms());
        }
    }
}
