use super::{
    color::Rgb,
    piece::{Piece, PieceKind},
};

/// A single cell of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Block {
    /// Empty cell (no piece).
    #[default]
    Empty,
    /// Locked cell of a specific piece type.
    Piece(PieceKind),
}

impl Block {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Block::Empty
    }

    /// Display color of the cell, `None` for empty cells.
    #[must_use]
    pub fn color(self) -> Option<Rgb> {
        match self {
            Block::Empty => None,
            Block::Piece(kind) => Some(kind.color()),
        }
    }
}

/// Outcome of writing a piece into the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockResult {
    /// Full rows after the write, ascending.
    pub full_rows: Vec<usize>,
    /// Set when any cell of the piece was still above the board.
    pub game_over: bool,
}

/// A non-empty cell removed by a line clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearedCell {
    pub x: usize,
    pub y: usize,
    pub block: Block,
}

/// Grid of locked blocks.
///
/// The board is `rows × cols` cells, row 0 at the top. Coordinates passed to
/// queries are signed so that pieces partially above the board (negative
/// `y`) or pushed past a wall can be tested without special casing.
///
/// # Example
///
/// ```
/// use orbtris_engine::Board;
///
/// let board = Board::from_ascii(
///     "
///     ....
///     T...
///     ",
/// );
/// assert!(board.is_cell_occupied(0, 1));
/// assert!(!board.is_cell_occupied(0, -1));
/// assert!(board.is_cell_occupied(4, 0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: usize,
    cols: usize,
    cells: Vec<Block>,
}

impl Board {
    /// Creates an empty board.
    #[must_use]
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![Block::Empty; rows * cols],
        }
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[expect(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
    pub(crate) fn cols_i32(&self) -> i32 {
        self.cols as i32
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        (x < self.cols && y < self.rows).then_some(y * self.cols + x)
    }

    /// Returns the block at `(x, y)`, or `None` outside the board.
    #[must_use]
    pub fn block(&self, x: i32, y: i32) -> Option<Block> {
        self.index(x, y).map(|i| self.cells[i])
    }

    /// Whether `(x, y)` is on the board and empty.
    #[must_use]
    pub fn is_vacant(&self, x: usize, y: usize) -> bool {
        x < self.cols && y < self.rows && self.cells[y * self.cols + x].is_empty()
    }

    /// Collision query used for every piece move.
    ///
    /// Cells past the side walls or below the floor are always blocked, even
    /// above the board. Within the walls, cells above the board (`y < 0`) are
    /// vacant.
    #[must_use]
    pub fn is_cell_occupied(&self, x: i32, y: i32) -> bool {
        if !usize::try_from(x).is_ok_and(|x| x < self.cols) {
            return true;
        }
        if y < 0 {
            return false;
        }
        self.index(x, y).is_none_or(|i| !self.cells[i].is_empty())
    }

    /// Returns an iterator over the rows, top to bottom.
    pub fn block_rows(&self) -> impl Iterator<Item = &[Block]> {
        self.cells.chunks(self.cols.max(1))
    }

    /// Writes the piece into the board.
    ///
    /// Cells above the board are not written; their presence means the stack
    /// has topped out and is reported through [`LockResult::game_over`].
    pub fn lock_piece(&mut self, piece: &Piece) -> LockResult {
        let block = Block::Piece(piece.kind());
        let mut game_over = false;
        for (x, y) in piece.cells() {
            if y < 0 {
                game_over = true;
                continue;
            }
            if let Some(i) = self.index(x, y) {
                self.cells[i] = block;
            }
        }
        LockResult {
            full_rows: self.find_full_rows(),
            game_over,
        }
    }

    fn is_row_full(&self, y: usize) -> bool {
        self.cells[y * self.cols..][..self.cols]
            .iter()
            .all(|b| !b.is_empty())
    }

    /// Returns the indices of full rows, ascending.
    #[must_use]
    pub fn find_full_rows(&self) -> Vec<usize> {
        (0..self.rows).filter(|&y| self.is_row_full(y)).collect()
    }

    /// Clears the given rows and compacts the board.
    ///
    /// Returns every non-empty cell of the cleared rows before compaction.
    /// Rows need not be contiguous: each surviving row moves down by the
    /// number of cleared rows beneath it and the top rows are refilled empty.
    pub fn clear_rows(&mut self, rows: &[usize]) -> Vec<ClearedCell> {
        let cols = self.cols;
        let is_cleared = |y: usize| rows.contains(&y);

        let mut cleared = vec![];
        for y in (0..self.rows).filter(|&y| is_cleared(y)) {
            for x in 0..cols {
                let block = self.cells[y * cols + x];
                if !block.is_empty() {
                    cleared.push(ClearedCell { x, y, block });
                }
            }
        }

        let mut count = 0;
        for y in (0..self.rows).rev() {
            if is_cleared(y) {
                count += 1;
                continue;
            }
            if count > 0 {
                self.cells
                    .copy_within(y * cols..(y + 1) * cols, (y + count) * cols);
            }
        }
        self.cells[..count * cols].fill(Block::Empty);
        cleared
    }

    /// Force-clears a single cell, returning what was there.
    ///
    /// Returns `None` when the cell was already empty or is outside the board.
    pub fn disintegrate_cell(&mut self, x: usize, y: usize) -> Option<Block> {
        if x >= self.cols || y >= self.rows {
            return None;
        }
        let cell = &mut self.cells[y * self.cols + x];
        let block = std::mem::take(cell);
        (!block.is_empty()).then_some(block)
    }

    /// Returns the rows that have a block in column `x`, top to bottom.
    #[must_use]
    pub fn occupied_rows_in_column(&self, x: usize) -> Vec<usize> {
        if x >= self.cols {
            return vec![];
        }
        (0..self.rows)
            .filter(|&y| !self.cells[y * self.cols + x].is_empty())
            .collect()
    }

    /// Builds a board from ASCII art.
    ///
    /// Each non-blank line is a row; `.` is an empty cell and a piece letter
    /// (`I`, `O`, `S`, `Z`, `J`, `L`, `T`) is a locked block of that kind.
    /// Whitespace is ignored.
    ///
    /// # Panics
    ///
    /// Panics if rows have different widths.
    #[must_use]
    pub fn from_ascii(art: &str) -> Self {
        let lines: Vec<Vec<Block>> = art
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                line.chars()
                    .filter_map(|c| match c {
                        '.' => Some(Block::Empty),
                        c => PieceKind::from_char(c).map(Block::Piece),
                    })
                    .collect()
            })
            .collect();

        let cols = lines.first().map_or(0, Vec::len);
        let mut board = Self::new(lines.len(), cols);
        for (y, line) in lines.iter().enumerate() {
            assert_eq!(
                line.len(),
                cols,
                "Each row must have exactly {cols} cells, got {} at row {y}",
                line.len(),
            );
            board.cells[y * cols..][..cols].copy_from_slice(line);
        }
        board
    }
}

/// Score awarded for clearing `rows` rows at once.
///
/// The table covers one to four rows; any other count scores nothing.
///
/// ```
/// use orbtris_engine::line_clear_score;
///
/// assert_eq!(line_clear_score(2), 20);
/// assert_eq!(line_clear_score(5), 0);
/// ```
#[must_use]
pub fn line_clear_score(rows: usize) -> u32 {
    const LINE_CLEAR_SCORES: [u32; 5] = [0, 10, 20, 40, 80];
    LINE_CLEAR_SCORES.get(rows).copied().unwrap_or(0)
}
