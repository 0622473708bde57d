use serde::{Deserialize, Serialize};

use super::{SelectionError, BOARD_SIZE, DRAW_SIZE, MAX_PICKS, PREVIEW_SIZE};

/// A validated, sorted set of distinct board numbers chosen by a player.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct Selection(Vec<u8>);

impl Selection {
    /// Validate `picks` (1..=10 distinct numbers in `1..=40`).
    pub fn new(picks: &[u8]) -> Result<Self, SelectionError> {
        if picks.is_empty() {
            return Err(SelectionError::Empty);
        }
        Self::with_empty(picks)
    }

    /// Like [`Selection::new`] but accepts an empty selection.
    pub fn with_empty(picks: &[u8]) -> Result<Self, SelectionError> {
        if picks.len() > MAX_PICKS {
            return Err(SelectionError::TooMany {
                got: picks.len(),
                max: MAX_PICKS,
            });
        }
        let mut numbers = picks.to_vec();
        numbers.sort_unstable();
        for (idx, &number) in numbers.iter().enumerate() {
            if number == 0 || number > BOARD_SIZE {
                return Err(SelectionError::OutOfRange {
                    number,
                    max: BOARD_SIZE,
                });
            }
            if idx > 0 && numbers[idx - 1] == number {
                return Err(SelectionError::Duplicate { number });
            }
        }
        Ok(Self(numbers))
    }

    /// The empty selection (k = 0).
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Selection size `k` as used by the paytable.
    pub fn picks(&self) -> u8 {
        self.0.len() as u8
    }

    pub fn numbers(&self) -> &[u8] {
        &self.0
    }

    pub fn contains(&self, number: u8) -> bool {
        self.0.binary_search(&number).is_ok()
    }

    /// Board numbers not in the selection, ascending.
    pub fn complement(&self) -> Vec<u8> {
        (1..=BOARD_SIZE).filter(|n| !self.contains(*n)).collect()
    }
}

impl TryFrom<Vec<u8>> for Selection {
    type Error = SelectionError;

    fn try_from(value: Vec<u8>) -> Result<Self, Self::Error> {
        Self::with_empty(&value)
    }
}

impl From<Selection> for Vec<u8> {
    fn from(value: Selection) -> Self {
        value.0
    }
}

/// Ten distinct board numbers in reveal order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Draw([u8; DRAW_SIZE]);

impl Draw {
    /// Wrap `numbers`, returning `None` unless they are ten distinct values in `1..=40`.
    pub fn new(numbers: [u8; DRAW_SIZE]) -> Option<Self> {
        let mut seen = 0u64;
        for &n in &numbers {
            if n == 0 || n > BOARD_SIZE || seen & (1 << n) != 0 {
                return None;
            }
            seen |= 1 << n;
        }
        Some(Self(numbers))
    }

    /// Wrap numbers the caller already knows to be distinct and on the board.
    pub fn from_distinct(numbers: [u8; DRAW_SIZE]) -> Self {
        debug_assert!(Self::new(numbers).is_some(), "invalid draw {numbers:?}");
        Self(numbers)
    }

    pub fn numbers(&self) -> &[u8; DRAW_SIZE] {
        &self.0
    }

    /// Positions exposed before the decision.
    pub fn preview(&self) -> [u8; PREVIEW_SIZE] {
        let mut out = [0u8; PREVIEW_SIZE];
        out.copy_from_slice(&self.0[..PREVIEW_SIZE]);
        out
    }

    /// Positions exposed on resolution.
    pub fn remainder(&self) -> &[u8] {
        &self.0[PREVIEW_SIZE..]
    }

    /// Number of drawn values that are in `selection`.
    pub fn hits_against(&self, selection: &Selection) -> u8 {
        self.0.iter().filter(|n| selection.contains(**n)).count() as u8
    }
}
