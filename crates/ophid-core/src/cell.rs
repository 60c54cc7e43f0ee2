//! The cell model: occupancy [`Kind`]s and the searchable [`SearchCell`].

use crate::geom::Pos;

/// Identifies the agent owning a head/body cell (index into the owning
/// game's agent table).
pub type AgentId = usize;

/// Cost-from-start sentinel for cells not yet discovered by a search.
pub const UNREACHABLE: i32 = i32::MAX;

// ---------------------------------------------------------------------------
// Kind
// ---------------------------------------------------------------------------

/// What occupies a single cell of the playing field.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Kind {
    /// Nothing. The default for interior cells.
    #[default]
    Empty,
    /// Impassable wall. The border ring of a field is always `Wall`.
    Wall,
    /// The edible item.
    Item,
    /// The head segment of an agent.
    AgentHead(AgentId),
    /// A body segment of an agent.
    AgentBody(AgentId),
}

impl Kind {
    /// Whether this is an agent head or body cell.
    #[inline]
    pub const fn is_occupant(self) -> bool {
        matches!(self, Self::AgentHead(_) | Self::AgentBody(_))
    }

    /// Whether this is the item cell.
    #[inline]
    pub const fn is_item(self) -> bool {
        matches!(self, Self::Item)
    }

    /// Whether an agent may move onto a cell of this kind.
    #[inline]
    pub const fn is_traversable(self) -> bool {
        matches!(self, Self::Empty | Self::Item)
    }
}

// ---------------------------------------------------------------------------
// SearchCell
// ---------------------------------------------------------------------------

/// A cell plus transient shortest-path metadata.
///
/// The `g`, `h` and `parent` fields are owned by the search engine: they are
/// meaningful only during and immediately after a search call, and are
/// rewritten on every run. Only `kind` carries state between searches.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SearchCell {
    /// Occupancy state.
    pub kind: Kind,
    /// Tentative cost from the search origin, [`UNREACHABLE`] until discovered.
    pub g: i32,
    /// Heuristic estimate of the remaining cost to the goal.
    pub h: i32,
    /// Predecessor on the cheapest known path from the origin.
    pub parent: Option<Pos>,
}

impl SearchCell {
    /// Reset the search metadata to its pre-search state, leaving `kind`
    /// untouched.
    #[inline]
    pub fn clear_search(&mut self) {
        self.g = UNREACHABLE;
        self.h = 0;
        self.parent = None;
    }
}

impl Default for SearchCell {
    fn default() -> Self {
        Self {
            kind: Kind::Empty,
            g: UNREACHABLE,
            h: 0,
            parent: None,
        }
    }
}
