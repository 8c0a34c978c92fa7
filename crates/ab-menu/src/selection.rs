use ab_core::traits::Direction;

/// Current choice in a catalog: silence, or one of its entries.
///
/// A catalog of `len` entries gives a cycle of `len + 1` slots. The numeric
/// cursor is `0` for [`Selection::Silence`] and `i + 1` for `Entry(i)`.
///
/// # Example
/// ```
/// use ab_core::traits::Direction;
/// use ab_menu::selection::Selection;
/// let s = Selection::Silence.step(Direction::Previous, 2);
/// assert_eq!(s, Selection::Entry(1));
/// assert_eq!(s.cursor(), 2);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Selection {
    /// Nothing selected: music stopped, no effect.
    #[default]
    Silence,
    /// Index into the catalog.
    Entry(usize),
}

impl Selection {
    /// Numeric cursor, `0` meaning silence.
    #[must_use]
    pub fn cursor(self) -> usize {
        match self {
            Self::Silence => 0,
            Self::Entry(i) => i + 1,
        }
    }

    /// Inverse of [`Selection::cursor`], wrapping into `[0, len]`.
    #[must_use]
    pub fn from_cursor(cursor: usize, len: usize) -> Self {
        match cursor % (len + 1) {
            0 => Self::Silence,
            c => Self::Entry(c - 1),
        }
    }

    /// Move one slot in `direction` over a catalog of `len` entries.
    ///
    /// Forward past the last entry wraps to silence; backward from silence
    /// wraps to the last entry. An empty catalog always stays silent.
    #[must_use]
    pub fn step(self, direction: Direction, len: usize) -> Self {
        let slots = len + 1;
        let cursor = self.cursor() % slots;
        let next = match direction {
            Direction::Next => (cursor + 1) % slots,
            Direction::Previous => (cursor + slots - 1) % slots,
        };
        Self::from_cursor(next, len)
    }

    /// Index de l'entrée sélectionnée, `None` pour le silence.
    #[must_use]
    pub fn index(self) -> Option<usize> {
        match self {
            Self::Silence => None,
            Self::Entry(i) => Some(i),
        }
    }
}
