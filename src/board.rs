//! Othello board state, move legality, and disc flipping.
//!
//! The board is an NxN grid of `Option<Color>` stored row-major. Any even
//! N >= 4 is supported; all geometry (corners, X-squares, C-squares) is
//! derived from the size at runtime.
//!
//! Moves are applied in place and return a [`Capture`] record that
//! [`Board::undo`] replays backwards, so search can mutate and restore a
//! single board instead of copying it at every node.

use std::fmt;
use std::str::FromStr;

use crate::config::ConfigError;
use crate::constants::{COLUMN_LETTERS, DEFAULT_SIZE, DIRECTIONS, MIN_SIZE};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    Black,
    White,
}

impl Color {
    #[inline]
    pub fn opponent(self) -> Color {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    /// Character used for this color in board text.
    pub fn symbol(self) -> char {
        match self {
            Color::Black => 'X',
            Color::White => 'O',
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Black => write!(f, "Black"),
            Color::White => write!(f, "White"),
        }
    }
}

/// A cell on the board, zero-based from the top-left corner.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Prints `a1` notation: column letter, then the 1-based row from the top.
impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match COLUMN_LETTERS.get(self.col) {
            Some(&letter) => write!(f, "{}{}", letter as char, self.row + 1),
            None => write!(f, "({},{})", self.row, self.col),
        }
    }
}

impl FromStr for Pos {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let bad = || ParseError::BadCoordinate(s.to_string());
        let mut chars = s.chars();
        let letter = chars.next().ok_or_else(bad)?.to_ascii_lowercase();
        let col = COLUMN_LETTERS
            .iter()
            .position(|&c| c as char == letter)
            .ok_or_else(bad)?;
        let row: usize = chars.as_str().parse().map_err(|_| bad())?;
        if row == 0 {
            return Err(bad());
        }
        Ok(Pos::new(row - 1, col))
    }
}

/// Why a move was rejected. The board is never modified when this is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    /// Position lies outside the grid
    OutOfBounds(Pos),
    /// Cell already holds a disc
    Occupied(Pos),
    /// Placing here brackets no opponent discs
    NoCapture { pos: Pos, color: Color },
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveError::OutOfBounds(pos) => write!(f, "illegal move {pos}: off the board"),
            MoveError::Occupied(pos) => write!(f, "illegal move {pos}: cell not empty"),
            MoveError::NoCapture { pos, color } => {
                write!(f, "illegal move {pos} for {color}: captures nothing")
            }
        }
    }
}

impl std::error::Error for MoveError {}

/// Error from reading coordinates or board text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    BadCoordinate(String),
    BadCell(char),
    /// A row length differs from the row count
    BadShape { rows: usize, row: usize, len: usize },
    BadSize(usize),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::BadCoordinate(s) => write!(f, "bad coordinate '{s}'"),
            ParseError::BadCell(c) => write!(f, "bad cell character '{c}'"),
            ParseError::BadShape { rows, row, len } => {
                write!(f, "row {row} has {len} cells, expected {rows}")
            }
            ParseError::BadSize(n) => {
                write!(f, "board size {n} is not an even number >= {MIN_SIZE}")
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// Replayable effect of one applied move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Capture {
    /// Where the disc was placed
    pub pos: Pos,
    /// Color that moved
    pub color: Color,
    /// Opponent discs turned to `color`
    pub flipped: Vec<Pos>,
}

impl Capture {
    #[inline]
    pub fn flip_count(&self) -> usize {
        self.flipped.len()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    size: usize,
    cells: Vec<Option<Color>>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Standard 8x8 starting position.
    pub fn new() -> Self {
        Self::start(DEFAULT_SIZE)
    }

    /// Starting position on an NxN board. N must be even and at least 4.
    pub fn with_size(size: usize) -> Result<Self, ConfigError> {
        if !valid_size(size) {
            return Err(ConfigError::InvalidBoardSize(size));
        }
        Ok(Self::start(size))
    }

    fn start(size: usize) -> Self {
        let mut board = Self::empty(size);
        let mid = size / 2;
        board.set(Pos::new(mid - 1, mid - 1), Some(Color::White));
        board.set(Pos::new(mid, mid), Some(Color::White));
        board.set(Pos::new(mid - 1, mid), Some(Color::Black));
        board.set(Pos::new(mid, mid - 1), Some(Color::Black));
        board
    }

    fn empty(size: usize) -> Self {
        Self {
            size,
            cells: vec![None; size * size],
        }
    }

    /// Build a position from text rows: `X` Black, `O` White, `.` or `-` empty.
    /// Whitespace inside a row is ignored.
    pub fn from_rows(rows: &[&str]) -> Result<Self, ParseError> {
        let size = rows.len();
        if !valid_size(size) {
            return Err(ParseError::BadSize(size));
        }
        let mut board = Self::empty(size);
        for (row, text) in rows.iter().enumerate() {
            let cells: Vec<char> = text.chars().filter(|c| !c.is_whitespace()).collect();
            if cells.len() != size {
                return Err(ParseError::BadShape {
                    rows: size,
                    row,
                    len: cells.len(),
                });
            }
            for (col, ch) in cells.into_iter().enumerate() {
                let cell = match ch {
                    'X' | 'x' | 'B' | 'b' => Some(Color::Black),
                    'O' | 'o' | 'W' | 'w' => Some(Color::White),
                    '.' | '-' => None,
                    other => return Err(ParseError::BadCell(other)),
                };
                board.set(Pos::new(row, col), cell);
            }
        }
        Ok(board)
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    fn idx(&self, pos: Pos) -> usize {
        pos.row * self.size + pos.col
    }

    #[inline]
    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.row < self.size && pos.col < self.size
    }

    /// Disc at `pos`; `None` for empty or off-board cells.
    #[inline]
    pub fn get(&self, pos: Pos) -> Option<Color> {
        if !self.in_bounds(pos) {
            return None;
        }
        self.cells[self.idx(pos)]
    }

    #[inline]
    fn set(&mut self, pos: Pos, cell: Option<Color>) {
        let i = self.idx(pos);
        self.cells[i] = cell;
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (Pos, Option<Color>)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, &cell)| (Pos::new(i / self.size, i % self.size), cell))
    }

    #[inline]
    fn neighbor(&self, pos: Pos, (dr, dc): (isize, isize)) -> Option<Pos> {
        let row = pos.row.checked_add_signed(dr)?;
        let col = pos.col.checked_add_signed(dc)?;
        let next = Pos::new(row, col);
        self.in_bounds(next).then_some(next)
    }

    /// Number of opponent discs bracketed from `pos` in one direction.
    ///
    /// Walks outward over opponent discs; the run only counts if it ends on
    /// a disc of `color`. An empty cell or the edge yields 0.
    fn bracketed(&self, pos: Pos, dir: (isize, isize), color: Color) -> usize {
        let opp = Some(color.opponent());
        let own = Some(color);
        let mut run = 0;
        let mut cur = pos;
        while let Some(next) = self.neighbor(cur, dir) {
            let cell = self.cells[self.idx(next)];
            if cell == opp {
                run += 1;
                cur = next;
            } else if cell == own {
                return run;
            } else {
                return 0;
            }
        }
        0
    }

    /// Whether `color` may place a disc at `pos`.
    pub fn is_legal(&self, pos: Pos, color: Color) -> bool {
        if !self.in_bounds(pos) || self.cells[self.idx(pos)].is_some() {
            return false;
        }
        DIRECTIONS
            .iter()
            .any(|&dir| self.bracketed(pos, dir, color) > 0)
    }

    /// Discs that a move at `pos` would flip, without playing it.
    /// Empty when the move is illegal.
    pub fn flips(&self, pos: Pos, color: Color) -> Vec<Pos> {
        let mut out = Vec::new();
        if !self.in_bounds(pos) || self.cells[self.idx(pos)].is_some() {
            return out;
        }
        for &dir in &DIRECTIONS {
            let run = self.bracketed(pos, dir, color);
            let mut cur = pos;
            for _ in 0..run {
                // bracketed() already walked these cells, so they are on the board
                if let Some(next) = self.neighbor(cur, dir) {
                    out.push(next);
                    cur = next;
                }
            }
        }
        out
    }

    /// Number of discs a move at `pos` would flip.
    pub fn flip_count(&self, pos: Pos, color: Color) -> usize {
        if !self.in_bounds(pos) || self.cells[self.idx(pos)].is_some() {
            return 0;
        }
        DIRECTIONS
            .iter()
            .map(|&dir| self.bracketed(pos, dir, color))
            .sum()
    }

    /// Legal moves for `color` in row-major order. Empty means `color` must pass.
    pub fn legal_moves(&self, color: Color) -> Vec<Pos> {
        self.cells()
            .filter(|&(pos, cell)| cell.is_none() && self.is_legal(pos, color))
            .map(|(pos, _)| pos)
            .collect()
    }

    pub fn has_legal_move(&self, color: Color) -> bool {
        self.cells()
            .any(|(pos, cell)| cell.is_none() && self.is_legal(pos, color))
    }

    /// Number of legal moves for `color`.
    pub fn mobility(&self, color: Color) -> usize {
        self.cells()
            .filter(|&(pos, cell)| cell.is_none() && self.is_legal(pos, color))
            .count()
    }

    /// Place a disc for `color` at `pos` and flip every bracketed run.
    ///
    /// # Errors
    /// Returns [`MoveError`] if the move is not legal for `color`; the board
    /// is left untouched in that case.
    pub fn apply_move(&mut self, pos: Pos, color: Color) -> Result<Capture, MoveError> {
        if !self.in_bounds(pos) {
            return Err(MoveError::OutOfBounds(pos));
        }
        if self.cells[self.idx(pos)].is_some() {
            return Err(MoveError::Occupied(pos));
        }
        let flipped = self.flips(pos, color);
        if flipped.is_empty() {
            return Err(MoveError::NoCapture { pos, color });
        }
        Ok(self.place(pos, color, flipped))
    }

    /// Play a move taken from [`Board::legal_moves`] on this same position.
    ///
    /// Skips the checks of [`Board::apply_move`]; debug builds still assert
    /// that the move captures.
    pub(crate) fn play_legal(&mut self, pos: Pos, color: Color) -> Capture {
        let flipped = self.flips(pos, color);
        debug_assert!(!flipped.is_empty(), "{pos} is not a legal move for {color}");
        self.place(pos, color, flipped)
    }

    fn place(&mut self, pos: Pos, color: Color, flipped: Vec<Pos>) -> Capture {
        self.set(pos, Some(color));
        for &p in &flipped {
            self.set(p, Some(color));
        }
        Capture {
            pos,
            color,
            flipped,
        }
    }

    /// Reverse a move previously returned by [`Board::apply_move`].
    ///
    /// Captures must be undone in the reverse order they were applied.
    pub fn undo(&mut self, capture: &Capture) {
        debug_assert_eq!(self.get(capture.pos), Some(capture.color));
        self.set(capture.pos, None);
        let opp = Some(capture.color.opponent());
        for &p in &capture.flipped {
            self.set(p, opp);
        }
    }

    /// True when neither color has a legal move.
    pub fn is_terminal(&self) -> bool {
        !self.has_legal_move(Color::Black) && !self.has_legal_move(Color::White)
    }

    /// Raw disc tally as (black, white).
    pub fn score(&self) -> (usize, usize) {
        self.cells.iter().fold((0, 0), |(b, w), cell| match cell {
            Some(Color::Black) => (b + 1, w),
            Some(Color::White) => (b, w + 1),
            None => (b, w),
        })
    }

    pub fn count(&self, color: Color) -> usize {
        self.cells.iter().filter(|&&c| c == Some(color)).count()
    }

    pub fn disc_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// The four corner cells: top-left, top-right, bottom-left, bottom-right.
    pub fn corners(&self) -> [Pos; 4] {
        let last = self.size - 1;
        [
            Pos::new(0, 0),
            Pos::new(0, last),
            Pos::new(last, 0),
            Pos::new(last, last),
        ]
    }

    /// Each corner paired with its diagonally adjacent X-square.
    pub fn x_squares(&self) -> [(Pos, Pos); 4] {
        let last = self.size - 1;
        [
            (Pos::new(0, 0), Pos::new(1, 1)),
            (Pos::new(0, last), Pos::new(1, last - 1)),
            (Pos::new(last, 0), Pos::new(last - 1, 1)),
            (Pos::new(last, last), Pos::new(last - 1, last - 1)),
        ]
    }

    /// Each corner paired with the two edge cells orthogonally adjacent to it.
    pub fn c_squares(&self) -> [(Pos, Pos); 8] {
        let last = self.size - 1;
        [
            (Pos::new(0, 0), Pos::new(0, 1)),
            (Pos::new(0, 0), Pos::new(1, 0)),
            (Pos::new(0, last), Pos::new(0, last - 1)),
            (Pos::new(0, last), Pos::new(1, last)),
            (Pos::new(last, 0), Pos::new(last - 1, 0)),
            (Pos::new(last, 0), Pos::new(last, 1)),
            (Pos::new(last, last), Pos::new(last, last - 1)),
            (Pos::new(last, last), Pos::new(last - 1, last)),
        ]
    }
}

fn valid_size(size: usize) -> bool {
    size >= MIN_SIZE && size % 2 == 0 && size <= COLUMN_LETTERS.len()
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "   ")?;
        for col in 0..self.size {
            write!(f, "{} ", COLUMN_LETTERS[col] as char)?;
        }
        writeln!(f)?;
        for row in 0..self.size {
            write!(f, "{:>2} ", row + 1)?;
            for col in 0..self.size {
                let ch = match self.get(Pos::new(row, col)) {
                    Some(color) => color.symbol(),
                    None => '.',
                };
                write!(f, "{ch} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
