//! A* shortest-path search over a [`Field`].

use std::collections::{BinaryHeap, HashSet};

use ophid_core::{Direction, Field, Pos};

use crate::distance::manhattan;
use crate::frontier::FrontierEntry;
use crate::observer::SearchObserver;

/// Shortest-path engine for four-directional, unit-cost movement.
///
/// The finder owns its frontier and visited set, so repeated queries reuse
/// their allocations. A search writes only the transient metadata of the
/// field's cells; occupancy kinds are never touched. The field must not be
/// mutated while a call is in flight, which the `&mut Field` borrow enforces.
pub struct PathFinder {
    open: BinaryHeap<FrontierEntry>,
    visited: HashSet<Pos>,
}

impl PathFinder {
    /// Create a new path finder.
    pub fn new() -> Self {
        Self {
            open: BinaryHeap::new(),
            visited: HashSet::new(),
        }
    }

    /// Compute a minimum-length route of moves from `from` to `to`.
    ///
    /// Unsafe cells (walls and agent segments) are never entered. The result
    /// is empty when either endpoint is not interior, when `from == to`, and
    /// when the goal is unreachable. All three are expected outcomes for the
    /// caller, not errors.
    pub fn find_path(&mut self, field: &mut Field, from: Pos, to: Pos) -> Vec<Direction> {
        self.search(field, from, to, None)
    }

    /// Like [`find_path`](PathFinder::find_path), additionally reporting
    /// each expanded position to `observer` as the search runs.
    pub fn find_path_observed(
        &mut self,
        field: &mut Field,
        from: Pos,
        to: Pos,
        observer: &mut dyn SearchObserver,
    ) -> Vec<Direction> {
        self.search(field, from, to, Some(observer))
    }

    fn search(
        &mut self,
        field: &mut Field,
        from: Pos,
        to: Pos,
        mut observer: Option<&mut dyn SearchObserver>,
    ) -> Vec<Direction> {
        if !field.is_inside(from) || !field.is_inside(to) || from == to {
            return Vec::new();
        }

        // Metadata left over from an earlier run means nothing now.
        field.reset_search();
        self.open.clear();
        self.visited.clear();

        let h0 = manhattan(from, to);
        {
            let start = field.cell_mut(from);
            start.g = 0;
            start.h = h0;
        }
        self.open.push(FrontierEntry {
            f: h0,
            h: h0,
            pos: from,
        });

        while let Some(entry) = self.open.pop() {
            let cur = entry.pos;

            // Lazy deletion: a cheaper duplicate was pushed when this entry
            // went stale, so drop it here instead of repairing the heap.
            if self.visited.contains(&cur) {
                continue;
            }

            if let Some(obs) = observer.as_deref_mut() {
                obs.visited(cur);
            }

            if cur == to {
                log::trace!("path found from {from} to {to}, cost {}", field.cell(cur).g);
                return reconstruct(field, from, to).unwrap_or_default();
            }

            self.visited.insert(cur);

            let cur_g = field.cell(cur).g;
            for adj in cur.neighbors_4() {
                if field.is_unsafe(adj) || self.visited.contains(&adj) {
                    continue;
                }
                let cell = field.cell_mut(adj);
                if cur_g + 1 < cell.g {
                    cell.parent = Some(cur);
                    cell.g = cur_g + 1;
                    cell.h = manhattan(adj, to);
                    let f = cell.g + cell.h;
                    let h = cell.h;
                    self.open.push(FrontierEntry { f, h, pos: adj });
                }
            }
        }

        log::trace!("no path from {from} to {to}");
        Vec::new()
    }
}

impl Default for PathFinder {
    fn default() -> Self {
        Self::new()
    }
}

/// Walk predecessor links back from `to` and reverse them into a
/// from → to move sequence. `None` on an inconsistent parent chain.
fn reconstruct(field: &Field, from: Pos, to: Pos) -> Option<Vec<Direction>> {
    let mut path = Vec::new();
    let mut cur = to;
    while cur != from {
        let parent = field.cell(cur).parent?;
        path.push(Direction::between(parent, cur)?);
        cur = parent;
    }
    path.reverse();
    Some(path)
}
