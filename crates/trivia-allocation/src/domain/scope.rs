//! Request scopes over the category × difficulty table.

use trivia_core::model::{CategoryId, Difficulty, GameSetting};

/// The set of (category, difficulty) cells a request or query can draw from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// One category at one difficulty.
    Cell {
        /// The category.
        category: CategoryId,
        /// The difficulty.
        difficulty: Difficulty,
    },
    /// One category at any difficulty.
    Row {
        /// The category.
        category: CategoryId,
    },
    /// Any category at one difficulty.
    Column {
        /// The difficulty.
        difficulty: Difficulty,
    },
    /// Any category at any difficulty.
    Table,
}

impl Scope {
    /// The scope of a (category, difficulty) choice; `None` is a wildcard.
    #[must_use]
    pub fn of(category: Option<CategoryId>, difficulty: Option<Difficulty>) -> Self {
        match (category, difficulty) {
            (Some(category), Some(difficulty)) => Scope::Cell {
                category,
                difficulty,
            },
            (Some(category), None) => Scope::Row { category },
            (None, Some(difficulty)) => Scope::Column { difficulty },
            (None, None) => Scope::Table,
        }
    }

    /// The scope a game setting draws from.
    #[must_use]
    pub fn of_setting(setting: &GameSetting) -> Self {
        Self::of(setting.category_id(), setting.difficulty)
    }

    /// Returns `true` if every cell of `other` is also a cell of `self`.
    #[must_use]
    pub fn contains(self, other: Scope) -> bool {
        match (self, other) {
            (Scope::Table, _) => true,
            (Scope::Row { category: a }, Scope::Row { category: b } | Scope::Cell { category: b, .. }) => {
                a == b
            }
            (
                Scope::Column { difficulty: a },
                Scope::Column { difficulty: b } | Scope::Cell { difficulty: b, .. },
            ) => a == b,
            (Scope::Cell { .. }, Scope::Cell { .. }) => self == other,
            _ => false,
        }
    }

    /// This scope followed by every strictly larger scope containing it.
    #[must_use]
    pub fn enclosing(self) -> Vec<Scope> {
        match self {
            Scope::Cell {
                category,
                difficulty,
            } => vec![
                self,
                Scope::Row { category },
                Scope::Column { difficulty },
                Scope::Table,
            ],
            Scope::Row { .. } | Scope::Column { .. } => vec![self, Scope::Table],
            Scope::Table => vec![Scope::Table],
        }
    }

    /// 0 for cells, 1 for rows and columns, 2 for the table.
    #[must_use]
    pub fn breadth(self) -> u8 {
        match self {
            Scope::Cell { .. } => 0,
            Scope::Row { .. } | Scope::Column { .. } => 1,
            Scope::Table => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CELL: Scope = Scope::Cell {
        category: 9,
        difficulty: Difficulty::Easy,
    };

    #[test]
    fn test_of_maps_wildcards_to_scope_kinds() {
        assert_eq!(Scope::of(Some(9), Some(Difficulty::Easy)), CELL);
        assert_eq!(Scope::of(Some(9), None), Scope::Row { category: 9 });
        assert_eq!(
            Scope::of(None, Some(Difficulty::Hard)),
            Scope::Column {
                difficulty: Difficulty::Hard
            }
        );
        assert_eq!(Scope::of(None, None), Scope::Table);
    }

    #[test]
    fn test_row_and_column_contain_their_cells_only() {
        let row = Scope::Row { category: 9 };
        let other_row = Scope::Row { category: 10 };
        let column = Scope::Column {
            difficulty: Difficulty::Easy,
        };

        assert!(row.contains(CELL));
        assert!(column.contains(CELL));
        assert!(!other_row.contains(CELL));
        assert!(!row.contains(column));
        assert!(!column.contains(row));
        assert!(Scope::Table.contains(row));
        assert!(!CELL.contains(row));
    }

    #[test]
    fn test_enclosing_lists_self_first_and_table_last() {
        let enclosing = CELL.enclosing();

        assert_eq!(enclosing.first(), Some(&CELL));
        assert_eq!(enclosing.last(), Some(&Scope::Table));
        assert!(enclosing.iter().all(|s| s.contains(CELL)));
    }
}
