//! The [`Field`] — a bounded rectangular grid of cells with a fixed wall
//! border, occupancy queries and item placement.

use std::fmt;

use rand::{Rng, RngExt};

use crate::cell::{Kind, SearchCell};
use crate::geom::Pos;

// ---------------------------------------------------------------------------
// FieldError
// ---------------------------------------------------------------------------

/// Errors that can occur when constructing a [`Field`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// The requested dimensions leave no interior: each must be at least 3.
    TooSmall { rows: i32, cols: i32 },
    /// The cell storage could not be allocated. The field is never left
    /// partially constructed; callers treat this as fatal.
    OutOfMemory,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooSmall { rows, cols } => {
                write!(f, "field of {rows}x{cols} has no interior (need at least 3x3)")
            }
            Self::OutOfMemory => write!(f, "failed to allocate field cell storage"),
        }
    }
}

impl std::error::Error for FieldError {}

// ---------------------------------------------------------------------------
// Field
// ---------------------------------------------------------------------------

/// A bounded playing field.
///
/// Cells are stored in a single contiguous row-major buffer. The outermost
/// ring of cells is permanently [`Kind::Wall`]; everything strictly inside it
/// is the *interior*, the only region agents and the item may occupy.
///
/// The field holds at most one item at a time, and `item()` is `Some` exactly
/// when a cell of kind [`Kind::Item`] exists.
///
/// Occupancy updates (agent movement) go through [`cell_mut`](Field::cell_mut);
/// the transient search metadata carried by each [`SearchCell`] belongs to the
/// path search engine.
pub struct Field {
    rows: i32,
    cols: i32,
    cells: Vec<SearchCell>,
    item: Option<Pos>,
}

impl Field {
    /// Create a field of the given dimensions with its border set to wall.
    ///
    /// Fails with [`FieldError::TooSmall`] when either dimension is below 3
    /// and with [`FieldError::OutOfMemory`] when the cell buffer cannot be
    /// allocated.
    pub fn new(rows: i32, cols: i32) -> Result<Self, FieldError> {
        if rows < 3 || cols < 3 {
            return Err(FieldError::TooSmall { rows, cols });
        }
        let len = rows as usize * cols as usize;
        let mut cells = Vec::new();
        cells
            .try_reserve_exact(len)
            .map_err(|_| FieldError::OutOfMemory)?;
        cells.resize(len, SearchCell::default());

        let mut field = Self {
            rows,
            cols,
            cells,
            item: None,
        };
        for row in 0..rows {
            for col in 0..cols {
                if row == 0 || row == rows - 1 || col == 0 || col == cols - 1 {
                    field.cell_mut(Pos::new(row, col)).kind = Kind::Wall;
                }
            }
        }
        Ok(field)
    }

    /// Number of rows, border included.
    #[inline]
    pub fn rows(&self) -> i32 {
        self.rows
    }

    /// Number of columns, border included.
    #[inline]
    pub fn cols(&self) -> i32 {
        self.cols
    }

    /// Whether `p` lies within the grid, border included.
    #[inline]
    pub fn contains(&self, p: Pos) -> bool {
        p.row >= 0 && p.col >= 0 && p.row < self.rows && p.col < self.cols
    }

    /// Whether `p` lies strictly inside the border ring.
    #[inline]
    pub fn is_inside(&self, p: Pos) -> bool {
        p.row > 0 && p.col > 0 && p.row < self.rows - 1 && p.col < self.cols - 1
    }

    /// Whether the cell at `p` is not safely traversable: a wall or any
    /// agent head/body segment.
    ///
    /// # Panics
    ///
    /// Panics if `p` is outside the grid.
    #[inline]
    pub fn is_unsafe(&self, p: Pos) -> bool {
        let kind = self.cell(p).kind;
        kind == Kind::Wall || kind.is_occupant()
    }

    #[inline]
    fn idx(&self, p: Pos) -> usize {
        assert!(
            self.contains(p),
            "position {p} out of bounds for {}x{} field",
            self.rows,
            self.cols
        );
        (p.row * self.cols + p.col) as usize
    }

    /// The cell at `p`.
    ///
    /// # Panics
    ///
    /// Panics if `p` is outside the grid; use [`contains`](Field::contains)
    /// to check first when the position is not known to be valid.
    #[inline]
    pub fn cell(&self, p: Pos) -> &SearchCell {
        &self.cells[self.idx(p)]
    }

    /// Mutable access to the cell at `p`.
    ///
    /// # Panics
    ///
    /// Panics if `p` is outside the grid.
    #[inline]
    pub fn cell_mut(&mut self, p: Pos) -> &mut SearchCell {
        let i = self.idx(p);
        &mut self.cells[i]
    }

    /// Row-major iterator over the interior positions.
    pub fn interior(&self) -> impl Iterator<Item = Pos> + use<> {
        let (rows, cols) = (self.rows, self.cols);
        (1..rows - 1).flat_map(move |row| (1..cols - 1).map(move |col| Pos::new(row, col)))
    }

    /// Whether no interior cell remains that an item could land on, i.e.
    /// every interior cell is a wall or an agent segment.
    pub fn is_interior_full(&self) -> bool {
        self.interior().all(|p| !self.cell(p).kind.is_traversable())
    }

    /// Reset every cell's search metadata, leaving occupancy untouched.
    ///
    /// The search engine calls this at the start of every run; the metadata
    /// carries no meaning across runs.
    pub fn reset_search(&mut self) {
        for cell in &mut self.cells {
            cell.clear_search();
        }
    }

    // -----------------------------------------------------------------------
    // Item placement
    // -----------------------------------------------------------------------

    /// Place the item on a uniformly random empty interior cell.
    ///
    /// Any previously placed item is removed first, so at most one item ever
    /// exists. When the interior is full this is a no-op: a board with no
    /// room left is an expected steady state, not an error.
    ///
    /// Sampling is by rejection: positions are drawn uniformly from the
    /// interior until an empty cell comes up. The expected number of draws
    /// grows as the board fills, and the full-interior guard above is what
    /// guarantees termination.
    pub fn place_item(&mut self, rng: &mut impl Rng) {
        self.remove_item();
        if self.is_interior_full() {
            return;
        }
        loop {
            let p = Pos::new(
                rng.random_range(1..self.rows - 1),
                rng.random_range(1..self.cols - 1),
            );
            if self.cell(p).kind == Kind::Empty {
                self.cell_mut(p).kind = Kind::Item;
                self.item = Some(p);
                log::trace!("item placed at {p}");
                return;
            }
        }
    }

    /// Remove the item if present, resetting its cell to empty. Idempotent.
    pub fn remove_item(&mut self) {
        if let Some(p) = self.item.take() {
            self.cell_mut(p).kind = Kind::Empty;
        }
    }

    /// Whether an item is currently on the field.
    #[inline]
    pub fn has_item(&self) -> bool {
        self.item.is_some()
    }

    /// Position of the current item, if any.
    #[inline]
    pub fn item(&self) -> Option<Pos> {
        self.item
    }
}

// ---------------------------------------------------------------------------
// Serde
// ---------------------------------------------------------------------------

// Only dimensions, occupancy and the item position are serialized; search
// metadata is transient and rebuilt fresh on deserialization.
#[cfg(feature = "serde")]
mod serde_impl {
    use super::*;

    #[derive(serde::Serialize, serde::Deserialize)]
    struct FieldRepr {
        rows: i32,
        cols: i32,
        kinds: Vec<Kind>,
        item: Option<Pos>,
    }

    impl serde::Serialize for Field {
        fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            FieldRepr {
                rows: self.rows,
                cols: self.cols,
                kinds: self.cells.iter().map(|c| c.kind).collect(),
                item: self.item,
            }
            .serialize(serializer)
        }
    }

    impl<'de> serde::Deserialize<'de> for Field {
        fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            use serde::de::Error;

            let repr = FieldRepr::deserialize(deserializer)?;
            let mut field = Field::new(repr.rows, repr.cols).map_err(D::Error::custom)?;
            if repr.kinds.len() != field.cells.len() {
                return Err(D::Error::invalid_length(
                    repr.kinds.len(),
                    &"one kind per grid cell",
                ));
            }
            for (cell, kind) in field.cells.iter_mut().zip(repr.kinds) {
                cell.kind = kind;
            }
            field.item = repr.item;
            Ok(field)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::UNREACHABLE;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn border_is_wall_interior_is_empty() {
        let field = Field::new(6, 9).unwrap();
        for row in 0..field.rows() {
            for col in 0..field.cols() {
                let p = Pos::new(row, col);
                let on_border =
                    row == 0 || col == 0 || row == field.rows() - 1 || col == field.cols() - 1;
                if on_border {
                    assert_eq!(field.cell(p).kind, Kind::Wall, "border cell {p}");
                } else {
                    assert_eq!(field.cell(p).kind, Kind::Empty, "interior cell {p}");
                }
            }
        }
    }

    #[test]
    fn too_small_dimensions_are_rejected() {
        assert!(matches!(
            Field::new(2, 10),
            Err(FieldError::TooSmall { rows: 2, cols: 10 })
        ));
        assert!(matches!(Field::new(5, 0), Err(FieldError::TooSmall { .. })));
    }

    #[test]
    fn is_inside_means_strictly_interior() {
        let field = Field::new(5, 7).unwrap();
        for row in -1..=field.rows() {
            for col in -1..=field.cols() {
                let p = Pos::new(row, col);
                let interior =
                    row > 0 && col > 0 && row < field.rows() - 1 && col < field.cols() - 1;
                assert_eq!(field.is_inside(p), interior, "{p}");
            }
        }
    }

    #[test]
    fn is_unsafe_exactly_for_walls_and_occupants() {
        let mut field = Field::new(5, 5).unwrap();
        field.cell_mut(Pos::new(1, 1)).kind = Kind::AgentHead(0);
        field.cell_mut(Pos::new(1, 2)).kind = Kind::AgentBody(0);
        field.cell_mut(Pos::new(2, 2)).kind = Kind::AgentBody(1);
        field.cell_mut(Pos::new(3, 3)).kind = Kind::Item;

        assert!(field.is_unsafe(Pos::new(0, 0)));
        assert!(field.is_unsafe(Pos::new(1, 1)));
        assert!(field.is_unsafe(Pos::new(1, 2)));
        assert!(field.is_unsafe(Pos::new(2, 2)));
        assert!(!field.is_unsafe(Pos::new(3, 3)));
        assert!(!field.is_unsafe(Pos::new(2, 1)));
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn cell_out_of_range_panics() {
        let field = Field::new(4, 4).unwrap();
        field.cell(Pos::new(4, 0));
    }

    #[test]
    fn place_item_lands_on_an_empty_interior_cell() {
        let mut rng = SmallRng::seed_from_u64(7);
        let mut field = Field::new(8, 8).unwrap();
        field.cell_mut(Pos::new(3, 3)).kind = Kind::AgentHead(0);
        field.cell_mut(Pos::new(3, 4)).kind = Kind::AgentBody(0);

        field.place_item(&mut rng);

        let p = field.item().expect("item placed");
        assert!(field.is_inside(p));
        assert_eq!(field.cell(p).kind, Kind::Item);
        assert!(field.has_item());
    }

    #[test]
    fn place_item_keeps_at_most_one_item() {
        let mut rng = SmallRng::seed_from_u64(11);
        let mut field = Field::new(6, 6).unwrap();
        for _ in 0..20 {
            field.place_item(&mut rng);
            let items = field
                .interior()
                .filter(|&p| field.cell(p).kind == Kind::Item)
                .count();
            assert_eq!(items, 1);
            assert_eq!(field.cell(field.item().unwrap()).kind, Kind::Item);
        }
    }

    #[test]
    fn place_item_on_full_interior_is_a_noop() {
        // Scenario: the agent covers the whole 3x3 interior.
        let mut rng = SmallRng::seed_from_u64(3);
        let mut field = Field::new(5, 5).unwrap();
        let interior: Vec<Pos> = field.interior().collect();
        for (i, p) in interior.iter().enumerate() {
            field.cell_mut(*p).kind = if i == 0 {
                Kind::AgentHead(0)
            } else {
                Kind::AgentBody(0)
            };
        }
        assert!(field.is_interior_full());

        field.place_item(&mut rng);
        assert!(!field.has_item());
    }

    #[test]
    fn interior_full_counts_walls_and_foreign_agents() {
        // No empty or item cell left, but the occupants are a mix of walls
        // and two agents: placement must still treat the board as full.
        let mut field = Field::new(5, 5).unwrap();
        let interior: Vec<Pos> = field.interior().collect();
        for (i, p) in interior.iter().enumerate() {
            field.cell_mut(*p).kind = match i % 3 {
                0 => Kind::Wall,
                1 => Kind::AgentBody(0),
                _ => Kind::AgentBody(1),
            };
        }
        assert!(field.is_interior_full());

        let mut rng = SmallRng::seed_from_u64(5);
        field.place_item(&mut rng);
        assert!(!field.has_item());
    }

    #[test]
    fn remove_item_is_idempotent() {
        let mut rng = SmallRng::seed_from_u64(21);
        let mut field = Field::new(6, 6).unwrap();
        field.place_item(&mut rng);
        let p = field.item().unwrap();

        field.remove_item();
        assert!(!field.has_item());
        assert_eq!(field.cell(p).kind, Kind::Empty);

        field.remove_item();
        assert!(!field.has_item());
        assert_eq!(field.cell(p).kind, Kind::Empty);
    }

    #[test]
    fn reset_search_clears_metadata_only() {
        let mut field = Field::new(5, 5).unwrap();
        let p = Pos::new(2, 2);
        field.cell_mut(p).kind = Kind::Item;
        field.cell_mut(p).g = 3;
        field.cell_mut(p).parent = Some(Pos::new(2, 1));

        field.reset_search();
        assert_eq!(field.cell(p).kind, Kind::Item);
        assert_eq!(field.cell(p).g, UNREACHABLE);
        assert_eq!(field.cell(p).parent, None);
    }
}
