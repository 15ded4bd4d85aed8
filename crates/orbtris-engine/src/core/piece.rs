use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

use super::{board::Board, color::Rgb};

pub(crate) const PIECE_SPAWN_X: i32 = 3;
pub(crate) const PIECE_SPAWN_Y: i32 = -2;

/// A falling piece (tetromino) with position, rotation, and type.
///
/// Pieces are immutable values: movement and rotation return new `Piece`
/// instances, or `None` when the candidate would collide with the board.
///
/// # Coordinate System
///
/// - The anchor is the top-left corner of the piece's bounding box
/// - X increases rightward (columns), Y increases downward (rows)
/// - Y may be negative while the piece is still above the visible board
///
/// # Example
///
/// ```
/// use orbtris_engine::{Board, Piece, PieceKind};
///
/// let board = Board::new(20, 10);
/// let piece = Piece::new(PieceKind::T);
/// let moved = piece.moved_right(&board).unwrap();
/// assert_eq!(moved.position().x(), piece.position().x() + 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    position: PiecePosition,
    rotation: PieceRotation,
    kind: PieceKind,
}

impl Piece {
    /// Creates a piece of the given kind at the spawn position, above the board.
    #[must_use]
    pub fn new(kind: PieceKind) -> Self {
        Self::at(kind, PIECE_SPAWN_X, PIECE_SPAWN_Y)
    }

    /// Creates a piece of the given kind with its anchor at `(x, y)`.
    #[must_use]
    pub fn at(kind: PieceKind, x: i32, y: i32) -> Self {
        Self {
            position: PiecePosition::new(x, y),
            rotation: PieceRotation::default(),
            kind,
        }
    }

    #[must_use]
    pub fn position(&self) -> PiecePosition {
        self.position
    }

    #[must_use]
    pub fn rotation(&self) -> PieceRotation {
        self.rotation
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub fn color(&self) -> Rgb {
        self.kind.color()
    }

    /// Returns the absolute board cells occupied by the piece.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.cells_with(0, 0, self.rotation)
    }

    fn cells_with(
        &self,
        dx: i32,
        dy: i32,
        rotation: PieceRotation,
    ) -> impl Iterator<Item = (i32, i32)> + '_ {
        let x0 = self.position.x + dx;
        let y0 = self.position.y + dy;
        self.kind
            .occupied_offsets(rotation)
            .map(move |(cx, cy)| (x0 + cx, y0 + cy))
    }

    /// Checks whether the piece, shifted by `(dx, dy)` and shown in `rotation`,
    /// would overlap a locked cell or leave the board.
    #[must_use]
    pub fn collides(&self, board: &Board, dx: i32, dy: i32, rotation: PieceRotation) -> bool {
        self.cells_with(dx, dy, rotation)
            .any(|(x, y)| board.is_cell_occupied(x, y))
    }

    fn shifted(self, board: &Board, dx: i32, dy: i32) -> Option<Self> {
        if self.collides(board, dx, dy, self.rotation) {
            return None;
        }
        Some(Self {
            position: PiecePosition::new(self.position.x + dx, self.position.y + dy),
            ..self
        })
    }

    #[must_use]
    pub fn moved_left(self, board: &Board) -> Option<Self> {
        self.shifted(board, -1, 0)
    }

    #[must_use]
    pub fn moved_right(self, board: &Board) -> Option<Self> {
        self.shifted(board, 1, 0)
    }

    /// Returns the piece one row lower, or `None` if it has landed.
    #[must_use]
    pub fn moved_down(self, board: &Board) -> Option<Self> {
        self.shifted(board, 0, 1)
    }

    /// Returns the horizontal kick a rotation would use.
    ///
    /// `0` when the plain rotation fits. Otherwise the kick points away from
    /// the nearer wall: `-1` on the right half of the board, `+1` on the left.
    #[must_use]
    pub fn rotation_kick(&self, board: &Board) -> i32 {
        let next = self.rotation.rotated(self.kind);
        if !self.collides(board, 0, 0, next) {
            return 0;
        }
        if 2 * self.position.x > board.cols_i32() {
            -1
        } else {
            1
        }
    }

    /// Rotates clockwise, trying a single one-cell wall kick if needed.
    ///
    /// Returns `None` when both the plain and the kicked rotation collide.
    #[must_use]
    pub fn rotated(self, board: &Board) -> Option<Self> {
        let next = self.rotation.rotated(self.kind);
        let kick = self.rotation_kick(board);
        if self.collides(board, kick, 0, next) {
            return None;
        }
        Some(Self {
            position: PiecePosition::new(self.position.x + kick, self.position.y),
            rotation: next,
            kind: self.kind,
        })
    }
}

/// Anchor position of a piece on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PiecePosition {
    x: i32,
    y: i32,
}

impl PiecePosition {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn x(self) -> i32 {
        self.x
    }

    #[must_use]
    pub const fn y(self) -> i32 {
        self.y
    }
}

/// Rotation state of a piece.
///
/// Most kinds cycle through four states (`0`: spawn orientation, then 90°
/// clockwise steps). The O-piece has a single state.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PieceRotation(u8);

impl PieceRotation {
    #[must_use]
    pub fn rotated(self, kind: PieceKind) -> Self {
        PieceRotation((self.0 + 1) % kind.rotation_count())
    }

    #[must_use]
    pub const fn index(self) -> u8 {
        self.0
    }

    const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

/// Enum representing the type of piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 0,
    /// O-piece.
    O = 1,
    /// S-piece.
    S = 2,
    /// Z-piece.
    Z = 3,
    /// J-piece.
    J = 4,
    /// L-piece.
    L = 5,
    /// T-piece.
    T = 6,
}

impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        match rng.random_range(0..=6) {
            0 => PieceKind::I,
            1 => PieceKind::O,
            2 => PieceKind::S,
            3 => PieceKind::Z,
            4 => PieceKind::J,
            5 => PieceKind::L,
            _ => PieceKind::T,
        }
    }
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    pub const ALL: [PieceKind; Self::LEN] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
        PieceKind::T,
    ];

    /// Number of distinct rotation states.
    #[must_use]
    pub const fn rotation_count(self) -> u8 {
        match self {
            PieceKind::O => 1,
            _ => 4,
        }
    }

    /// Fixed display color of the kind.
    #[must_use]
    pub const fn color(self) -> Rgb {
        match self {
            PieceKind::Z => Rgb::RED,
            PieceKind::S => Rgb::GREEN,
            PieceKind::T => Rgb::YELLOW,
            PieceKind::O => Rgb::BLUE,
            PieceKind::L => Rgb::PURPLE,
            PieceKind::I => Rgb::CYAN,
            PieceKind::J => Rgb::ORANGE,
        }
    }

    /// Returns an iterator of occupied offsets inside the bounding box.
    pub fn occupied_offsets(self, rotation: PieceRotation) -> impl Iterator<Item = (i32, i32)> {
        let shape = &PIECE_SHAPES[self as usize][rotation.as_usize()];
        (0..4_i32).flat_map(move |dy| {
            (0..4_i32).filter_map(move |dx| shape[dy as usize][dx as usize].then_some((dx, dy)))
        })
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use orbtris_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::O => 'O',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
            PieceKind::T => 'T',
        }
    }

    /// Parses a piece kind from a single character.
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'O' => Some(PieceKind::O),
            'S' => Some(PieceKind::S),
            'Z' => Some(PieceKind::Z),
            'J' => Some(PieceKind::J),
            'L' => Some(PieceKind::L),
            'T' => Some(PieceKind::T),
            _ => None,
        }
    }
}

/// Piece shape as a 4×4 occupancy grid, indexed `[row][column]`.
type PieceShape = [[bool; 4]; 4];

/// Generates all 4 rotation states of a piece shape by rotating 90° clockwise.
///
/// # Arguments
///
/// * `size` - Effective size of the piece (3 for most pieces, 4 for I, 2 for O)
/// * `shape` - Initial piece shape at 0° rotation
const fn shape_rotations(size: usize, shape: &PieceShape) -> [PieceShape; 4] {
    let mut rotates = [*shape; 4];
    let mut i = 1;
    while i < 4 {
        let mut new_shape = [[false; 4]; 4];
        let mut y = 0;
        while y < size {
            let mut x = 0;
            while x < size {
                new_shape[y][x] = rotates[i - 1][size - 1 - x][y];
                x += 1;
            }
            y += 1;
        }
        rotates[i] = new_shape;
        i += 1;
    }
    rotates
}

const PIECE_SHAPES: [[PieceShape; 4]; PieceKind::LEN] = {
    const C: bool = true;
    const E: bool = false;
    const EEEE: [bool; 4] = [E; 4];
    [
        // I-piece
        shape_rotations(4, &[EEEE, [C, C, C, C], EEEE, EEEE]),
        // O-piece
        shape_rotations(2, &[[C, C, E, E], [C, C, E, E], EEEE, EEEE]),
        // S-piece
        shape_rotations(3, &[[E, C, C, E], [C, C, E, E], EEEE, EEEE]),
        // Z-piece
        shape_rotations(3, &[[C, C, E, E], [E, C, C, E], EEEE, EEEE]),
        // J-piece
        shape_rotations(3, &[[C, E, E, E], [C, C, C, E], EEEE, EEEE]),
        // L-piece
        shape_rotations(3, &[[E, E, C, E], [C, C, C, E], EEEE, EEEE]),
        // T-piece
        shape_rotations(3, &[[E, C, E, E], [C, C, C, E], EEEE, EEEE]),
    ]
};
