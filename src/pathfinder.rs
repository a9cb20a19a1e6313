//! Grid-based A* search over an 8-connected [`Grid`], using an
//! [`IndexedMinHeap`] as the open set.
//!
//! # Arena, not borrowed handles
//!
//! The heap in `heap.rs` is deliberately arena-agnostic: it owns whatever
//! payload it's given by value and never reaches back into a caller's
//! bookkeeping. The authoritative per-cell state for a search — parent
//! chain, accumulated cost, open/closed status — lives here instead, in a
//! persistent `Vec<CellInfo>` arena indexed by cell id, the same
//! index-instead-of-pointer idiom `heap.rs` and `pool.rs` use. Parent
//! links are `Option<usize>` cell ids, not references, so they stay valid
//! across searches without borrow-checker gymnastics.
//!
//! # Keeping a cell's heap slot in sync
//!
//! Decrease-key requires knowing a cell's *current* heap slot, and that
//! slot moves every time the heap swaps two payloads — including swaps
//! triggered by some unrelated cell's bubble, not just this one's. Caching
//! a cell's heap slot in the arena and only refreshing it when this
//! module touches that cell directly would go stale the moment the heap
//! moves it for an unrelated reason. Instead, [`OpenHandle::set_heap_index`]
//! (called by the heap on every swap, for both payloads involved) writes
//! through to a `cell_id -> heap_index` table shared by every handle the
//! heap currently holds, so the table is always current no matter which
//! cell's bubble caused the move.
//!
//! # Epoch stamping
//!
//! The arena is never cleared between searches — at grid sizes worth
//! pathfinding over, a full `O(n)` reset per search would dominate. Each
//! arena slot instead carries the epoch it was last touched in; a search
//! bumps a single counter and treats any slot stamped with an older epoch
//! as fresh, regardless of what it happened to hold from a prior search.

use crate::grid::Grid;
use crate::heap::{HeapPayload, IndexedMinHeap};
use std::cell::RefCell;
use std::rc::Rc;

const CARDINAL_COST: i32 = 10;
const DIAGONAL_COST: i32 = 14;

const DIRECTIONS: [(i32, i32, i32); 8] = [
    (1, 0, CARDINAL_COST),
    (-1, 0, CARDINAL_COST),
    (0, 1, CARDINAL_COST),
    (0, -1, CARDINAL_COST),
    (1, 1, DIAGONAL_COST),
    (1, -1, DIAGONAL_COST),
    (-1, 1, DIAGONAL_COST),
    (-1, -1, DIAGONAL_COST),
];

/// Octile heuristic ("diagonal shortcut"): cheapest possible cost from one
/// cell to another assuming no obstacles, crediting every diagonal step
/// that shortens the straight-line cardinal distance.
fn heuristic(x0: i32, y0: i32, x1: i32, y1: i32) -> i32 {
    let dx = (x0 - x1).abs();
    let dy = (y0 - y1).abs();
    DIAGONAL_COST * dx.min(dy) + CARDINAL_COST * (dx - dy).abs()
}

#[derive(Debug, Clone, Copy)]
struct CellInfo {
    epoch: u32,
    g_cost: i32,
    h_cost: i32,
    parent: Option<usize>,
    in_open: bool,
    closed: bool,
}

impl Default for CellInfo {
    fn default() -> Self {
        Self {
            epoch: 0,
            g_cost: 0,
            h_cost: 0,
            parent: None,
            in_open: false,
            closed: false,
        }
    }
}

/// The open-set payload pushed into the heap. Carries just enough to
/// order itself (`cost = g + h`) and to write its own moves through to
/// the shared `cell_id -> heap_index` table described above.
struct OpenHandle {
    cell_id: usize,
    cost: i32,
    heap_index: usize,
    index_table: Rc<RefCell<Vec<usize>>>,
}

impl HeapPayload for OpenHandle {
    fn value(&self) -> i32 {
        self.cost
    }

    fn heap_index(&self) -> usize {
        self.heap_index
    }

    fn set_heap_index(&mut self, index: usize) {
        self.heap_index = index;
        self.index_table.borrow_mut()[self.cell_id] = index;
    }
}

/// The outcome of [`Pathfinder::find_path`].
///
/// `path` is `None` only when the call was rejected outright (degenerate
/// coordinates, see [`Pathfinder::find_path`]). On every other outcome —
/// success or failure to reach the target — `path` is `Some`: on failure
/// it holds the best-effort route to the closest cell the search reached,
/// which may itself be empty if the start had no walkable neighbour at
/// all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathOutcome {
    /// `true` iff the target was reached.
    pub found: bool,
    /// The reconstructed path, start-to-end inclusive; see the type docs
    /// for when this is `None` versus an empty `Some`.
    pub path: Option<Vec<(i32, i32)>>,
}

/// An A* search over a [`Grid`], reusable across many `find_path` calls.
pub struct Pathfinder {
    grid: Grid,
    arena: Vec<CellInfo>,
    epoch: u32,
    heap: IndexedMinHeap<OpenHandle>,
    index_table: Rc<RefCell<Vec<usize>>>,
}

impl Pathfinder {
    /// Build a pathfinder over `grid`. The arena is sized once, up front,
    /// to `grid.cols() * grid.rows()`.
    pub fn new(grid: Grid) -> Self {
        let len = grid.cols() * grid.rows();
        Self {
            grid,
            arena: vec![CellInfo::default(); len],
            epoch: 0,
            heap: IndexedMinHeap::new(),
            index_table: Rc::new(RefCell::new(vec![0; len])),
        }
    }

    /// Shared, read-only access to the underlying grid.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Mutable access to the underlying grid, e.g. to toggle walkability
    /// between searches.
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    fn cell_coords(&self, cell_id: usize) -> (i32, i32) {
        let cols = self.grid.cols();
        ((cell_id % cols) as i32, (cell_id / cols) as i32)
    }

    /// Reset a cell's bookkeeping in place if it's stale from a previous
    /// search, without touching any other cell.
    fn touch(&mut self, cell_id: usize) {
        if self.arena[cell_id].epoch != self.epoch {
            self.arena[cell_id] = CellInfo {
                epoch: self.epoch,
                ..CellInfo::default()
            };
        }
    }

    /// The four cardinal neighbours, then the four diagonals, each
    /// in-range, walkable, and (for diagonals) not cutting a corner past
    /// an unwalkable flanking cell.
    fn neighbours(&self, x: i32, y: i32) -> impl Iterator<Item = (i32, i32, i32)> + '_ {
        DIRECTIONS.iter().filter_map(move |&(dx, dy, cost)| {
            let nx = x + dx;
            let ny = y + dy;
            if !self.grid.in_bounds(nx, ny) || !self.grid.is_walkable(nx, ny) {
                return None;
            }
            if dx != 0
                && dy != 0
                && (!self.grid.is_walkable(x + dx, y) || !self.grid.is_walkable(x, y + dy))
            {
                return None;
            }
            Some((nx, ny, cost))
        })
    }

    fn reconstruct_path(&self, cell_id: usize) -> Vec<(i32, i32)> {
        let mut path = Vec::new();
        let mut current = Some(cell_id);
        while let Some(id) = current {
            path.push(self.cell_coords(id));
            current = self.arena[id].parent;
        }
        path.reverse();
        path
    }

    fn push_open(&mut self, cell_id: usize, g_cost: i32, h_cost: i32, parent: Option<usize>) {
        self.arena[cell_id].g_cost = g_cost;
        self.arena[cell_id].h_cost = h_cost;
        self.arena[cell_id].parent = parent;
        self.arena[cell_id].in_open = true;
        self.heap.insert(OpenHandle {
            cell_id,
            cost: g_cost + h_cost,
            heap_index: 0,
            index_table: self.index_table.clone(),
        });
    }

    /// Process every in-range, walkable, non-corner-cutting neighbour of
    /// `current_id` — inserting first-visit neighbours into the open set,
    /// relaxing already-open ones, and tracking `closest` (the
    /// lowest-`h_cost` cell seen so far, used for the best-effort result
    /// if the search never reaches the target).
    fn expand(
        &mut self,
        current_id: usize,
        tx: i32,
        ty: i32,
        closest: &mut Option<usize>,
        closest_h: &mut i32,
    ) {
        let (cx, cy) = self.cell_coords(current_id);
        let current_g = self.arena[current_id].g_cost;
        let steps: Vec<(i32, i32, i32)> = self.neighbours(cx, cy).collect();
        for (nx, ny, step_cost) in steps {
            let neighbour_id = self.grid.cell_id(nx, ny);
            self.touch(neighbour_id);
            if self.arena[neighbour_id].closed {
                continue;
            }

            let tentative_g = current_g + step_cost;
            if self.arena[neighbour_id].in_open {
                if tentative_g < self.arena[neighbour_id].g_cost {
                    self.arena[neighbour_id].g_cost = tentative_g;
                    self.arena[neighbour_id].parent = Some(current_id);
                    let new_cost = tentative_g + self.arena[neighbour_id].h_cost;
                    let heap_index = self.index_table.borrow()[neighbour_id];
                    if let Some(handle) = self.heap.get_mut(heap_index) {
                        handle.cost = new_cost;
                    }
                    self.heap.update(heap_index);
                }
            } else {
                let h_cost = heuristic(nx, ny, tx, ty);
                self.push_open(neighbour_id, tentative_g, h_cost, Some(current_id));
            }

            let h = self.arena[neighbour_id].h_cost;
            if h < *closest_h {
                *closest_h = h;
                *closest = Some(neighbour_id);
            }
        }
    }

    /// Find the lowest-cost 8-connected path from `(sx, sy)` to `(tx,
    /// ty)`, honoring [`Grid`] walkability and forbidding diagonal moves
    /// that would cut a corner past an unwalkable cell.
    ///
    /// `(sx, sy) == (tx, ty)`, or either coordinate outside the grid,
    /// yields `PathOutcome { found: false, path: None }` without running
    /// a search. Otherwise `path` is always `Some`: on success it's the
    /// start-to-target route inclusive of both endpoints; on failure it's
    /// the best-effort route to the lowest-heuristic cell the search
    /// reached (empty if the start had no walkable neighbour at all).
    pub fn find_path(&mut self, sx: i32, sy: i32, tx: i32, ty: i32) -> PathOutcome {
        if (sx == tx && sy == ty) || !self.grid.in_bounds(sx, sy) || !self.grid.in_bounds(tx, ty) {
            return PathOutcome {
                found: false,
                path: None,
            };
        }

        self.epoch += 1;
        self.heap.clear();

        let start_id = self.grid.cell_id(sx, sy);
        let target_id = self.grid.cell_id(tx, ty);

        self.touch(start_id);
        self.arena[start_id].g_cost = 0;
        self.arena[start_id].h_cost = heuristic(sx, sy, tx, ty);
        self.arena[start_id].parent = None;

        let mut closest: Option<usize> = None;
        let mut closest_h = i32::MAX;

        // Seed: the start cell's successors go straight into the open
        // set with the start as their parent; the start itself is never
        // pushed onto the heap.
        self.expand(start_id, tx, ty, &mut closest, &mut closest_h);
        self.arena[start_id].closed = true;

        while let Some(current) = self.heap.pop() {
            let current_id = current.cell_id;
            self.arena[current_id].in_open = false;

            if current_id == target_id {
                self.arena[current_id].closed = true;
                return PathOutcome {
                    found: true,
                    path: Some(self.reconstruct_path(target_id)),
                };
            }

            self.expand(current_id, tx, ty, &mut closest, &mut closest_h);
            self.arena[current_id].closed = true;
        }

        let path = match closest {
            Some(id) => self.reconstruct_path(id),
            None => Vec::new(),
        };
        PathOutcome {
            found: false,
            path: Some(path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_grid(cols: usize, rows: usize) -> Grid {
        Grid::new(cols, rows).unwrap()
    }

    #[test]
    fn start_equals_target_returns_false_and_no_path() {
        let mut pf = Pathfinder::new(open_grid(5, 5));
        let outcome = pf.find_path(2, 2, 2, 2);
        assert!(!outcome.found);
        assert!(outcome.path.is_none());
    }

    #[test]
    fn out_of_bounds_start_returns_false_and_no_path() {
        let mut pf = Pathfinder::new(open_grid(5, 5));
        let outcome = pf.find_path(-1, 0, 2, 2);
        assert!(!outcome.found);
        assert!(outcome.path.is_none());
    }

    #[test]
    fn out_of_bounds_target_returns_false_and_no_path() {
        let mut pf = Pathfinder::new(open_grid(5, 5));
        let outcome = pf.find_path(0, 0, 99, 99);
        assert!(!outcome.found);
        assert!(outcome.path.is_none());
    }

    #[test]
    fn unwalkable_target_yields_best_effort_path_to_closest() {
        let mut grid = open_grid(5, 5);
        grid.set_walkable(4, 4, false);
        let mut pf = Pathfinder::new(grid);
        let outcome = pf.find_path(0, 0, 4, 4);
        assert!(!outcome.found);
        assert!(!outcome.path.unwrap().is_empty());
    }

    #[test]
    fn straight_diagonal_path_costs_diagonal_steps() {
        let mut pf = Pathfinder::new(open_grid(5, 5));
        let outcome = pf.find_path(0, 0, 4, 4);
        assert!(outcome.found);
        let path = outcome.path.unwrap();
        assert_eq!(path.first(), Some(&(0, 0)));
        assert_eq!(path.last(), Some(&(4, 4)));
        // 4 diagonal steps, each costing 14.
        assert_eq!(path.len(), 5);
        let cost: i32 = path
            .windows(2)
            .map(|w| {
                let (dx, dy) = (w[1].0 - w[0].0, w[1].1 - w[0].1);
                if dx != 0 && dy != 0 {
                    DIAGONAL_COST
                } else {
                    CARDINAL_COST
                }
            })
            .sum();
        assert_eq!(cost, 4 * DIAGONAL_COST);
    }

    #[test]
    fn fully_isolated_start_yields_empty_best_effort_path() {
        let mut grid = open_grid(5, 5);
        for (dx, dy) in [
            (-1, -1),
            (0, -1),
            (1, -1),
            (-1, 0),
            (1, 0),
            (-1, 1),
            (0, 1),
            (1, 1),
        ] {
            grid.set_walkable(2 + dx, 2 + dy, false);
        }
        let mut pf = Pathfinder::new(grid);
        let outcome = pf.find_path(2, 2, 0, 0);
        assert!(!outcome.found);
        assert_eq!(outcome.path, Some(Vec::new()));
    }

    #[test]
    fn diagonal_move_blocked_by_corner_cutting() {
        // Walls at (1,0) and (0,1): moving (0,0) -> (1,1) diagonally would
        // cut the corner between them and must be forbidden, forcing a
        // longer route around.
        let mut grid = open_grid(3, 3);
        grid.set_walkable(1, 0, false);
        grid.set_walkable(0, 1, false);
        let mut pf = Pathfinder::new(grid);
        let outcome = pf.find_path(0, 0, 1, 1);
        assert!(outcome.found);
        let path = outcome.path.unwrap();
        assert!(!path.contains(&(1, 0)));
        assert!(!path.contains(&(0, 1)));
        assert!(path.len() > 2);
    }

    #[test]
    fn reused_pathfinder_does_not_leak_state_across_searches() {
        let mut pf = Pathfinder::new(open_grid(6, 6));
        let first = pf.find_path(0, 0, 5, 5).path.unwrap();
        assert_eq!(first.last(), Some(&(5, 5)));
        // A second, unrelated search must not be influenced by the first's
        // leftover arena/heap state (the epoch stamp is the mechanism that
        // prevents this without an O(n) reset).
        let second = pf.find_path(5, 0, 0, 5).path.unwrap();
        assert_eq!(second.first(), Some(&(5, 0)));
        assert_eq!(second.last(), Some(&(0, 5)));
    }

    #[test]
    fn decrease_key_finds_cheaper_route_through_a_later_neighbour() {
        // A corridor where the direct cardinal route is blocked, forcing
        // a path that revisits and relaxes an already-open cell.
        let mut grid = open_grid(4, 3);
        grid.set_walkable(1, 0, false);
        grid.set_walkable(1, 1, false);
        let mut pf = Pathfinder::new(grid);
        let outcome = pf.find_path(0, 0, 3, 0);
        assert!(outcome.found);
        let path = outcome.path.unwrap();
        assert_eq!(path.first(), Some(&(0, 0)));
        assert_eq!(path.last(), Some(&(3, 0)));
    }

    #[test]
    fn heuristic_is_admissible_on_a_sample_of_cell_pairs() {
        for (x0, y0, x1, y1) in [(0, 0, 5, 5), (0, 0, 5, 0), (0, 0, 0, 5), (2, 7, 9, 1)] {
            let dx = (x0 - x1).abs();
            let dy = (y0 - y1).abs();
            let diagonal_steps = dx.min(dy);
            let cardinal_steps = (dx - dy).abs();
            let true_cost = diagonal_steps * DIAGONAL_COST + cardinal_steps * CARDINAL_COST;
            assert!(heuristic(x0, y0, x1, y1) <= true_cost);
        }
    }
}
