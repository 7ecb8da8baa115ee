use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors reported by [`BracketTable::validate`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BracketTableError {
    #[error("bracket table '{0}' has no brackets")]
    Empty(String),

    #[error("bracket table '{table}' starts at {min} instead of 0")]
    DoesNotStartAtZero { table: String, min: Decimal },

    #[error("bracket {order_index} of table '{table}' has min {min} above max {max}")]
    InvertedRange {
        table: String,
        order_index: u32,
        min: Decimal,
        max: Decimal,
    },

    #[error("bracket {order_index} of table '{table}' repeats or reverses the order index")]
    UnorderedIndex { table: String, order_index: u32 },

    #[error("bracket {order_index} of table '{table}' starts at {min}, previous bracket ends at {previous_max}")]
    NotContiguous {
        table: String,
        order_index: u32,
        min: Decimal,
        previous_max: Decimal,
    },
}

/// One progressive bracket of the bracket regime.
///
/// The range is inclusive on both ends. Adjacent brackets share their
/// boundary value and the lower-index bracket owns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bracket {
    pub order_index: u32,
    pub min_revenue: Decimal,
    pub max_revenue: Decimal,
    pub nominal_rate: Decimal,
    pub deduction: Decimal,
}

impl Bracket {
    /// Whether `trailing_revenue` falls inside `[min_revenue, max_revenue]`.
    pub fn contains(
        &self,
        trailing_revenue: Decimal,
    ) -> bool {
        trailing_revenue >= self.min_revenue && trailing_revenue <= self.max_revenue
    }
}

/// A named, ordered progressive-bracket table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketTable {
    pub id: String,
    brackets: Vec<Bracket>,
}

impl BracketTable {
    /// Creates a table, ordering the brackets by `order_index`.
    pub fn new(
        id: impl Into<String>,
        mut brackets: Vec<Bracket>,
    ) -> Self {
        brackets.sort_by_key(|b| b.order_index);
        Self {
            id: id.into(),
            brackets,
        }
    }

    pub fn brackets(&self) -> &[Bracket] {
        &self.brackets
    }

    pub fn first(&self) -> Option<&Bracket> {
        self.brackets.first()
    }

    /// Upper bound of the covered trailing-revenue domain.
    pub fn upper_bound(&self) -> Option<Decimal> {
        self.brackets.last().map(|b| b.max_revenue)
    }

    /// Checks that the brackets cover `[0, upper_bound]` without gaps or
    /// overlaps and that order indices strictly increase.
    pub fn validate(&self) -> Result<(), BracketTableError> {
        let first = self
            .brackets
            .first()
            .ok_or_else(|| BracketTableError::Empty(self.id.clone()))?;

        if first.min_revenue != Decimal::ZERO {
            return Err(BracketTableError::DoesNotStartAtZero {
                table: self.id.clone(),
                min: first.min_revenue,
            });
        }

        let mut previous: Option<&Bracket> = None;
        for bracket in &self.brackets {
            if bracket.min_revenue > bracket.max_revenue {
                return Err(BracketTableError::InvertedRange {
                    table: self.id.clone(),
                    order_index: bracket.order_index,
                    min: bracket.min_revenue,
                    max: bracket.max_revenue,
                });
            }

            if let Some(prev) = previous {
                if bracket.order_index <= prev.order_index {
                    return Err(BracketTableError::UnorderedIndex {
                        table: self.id.clone(),
                        order_index: bracket.order_index,
                    });
                }
                if bracket.min_revenue != prev.max_revenue {
                    return Err(BracketTableError::NotContiguous {
                        table: self.id.clone(),
                        order_index: bracket.order_index,
                        min: bracket.min_revenue,
                        previous_max: prev.max_revenue,
                    });
                }
            }
            previous = Some(bracket);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn bracket(
        order_index: u32,
        min: Decimal,
        max: Decimal,
    ) -> Bracket {
        Bracket {
            order_index,
            min_revenue: min,
            max_revenue: max,
            nominal_rate: dec!(0.06),
            deduction: dec!(0),
        }
    }

    #[test]
    fn new_orders_brackets_by_index() {
        let table = BracketTable::new(
            "III",
            vec![
                bracket(2, dec!(180000), dec!(360000)),
                bracket(1, dec!(0), dec!(180000)),
            ],
        );

        let indices: Vec<u32> = table.brackets().iter().map(|b| b.order_index).collect();
        assert_eq!(indices, vec![1, 2]);
        assert_eq!(table.upper_bound(), Some(dec!(360000)));
    }

    #[test]
    fn validate_accepts_contiguous_table() {
        let table = BracketTable::new(
            "III",
            vec![
                bracket(1, dec!(0), dec!(180000)),
                bracket(2, dec!(180000), dec!(360000)),
            ],
        );

        assert_eq!(table.validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_empty_table() {
        let table = BracketTable::new("III", vec![]);

        assert_eq!(
            table.validate(),
            Err(BracketTableError::Empty("III".to_string()))
        );
    }

    #[test]
    fn validate_rejects_gap() {
        let table = BracketTable::new(
            "III",
            vec![
                bracket(1, dec!(0), dec!(180000)),
                bracket(2, dec!(200000), dec!(360000)),
            ],
        );

        assert_eq!(
            table.validate(),
            Err(BracketTableError::NotContiguous {
                table: "III".to_string(),
                order_index: 2,
                min: dec!(200000),
                previous_max: dec!(180000),
            })
        );
    }

    #[test]
    fn validate_rejects_nonzero_start() {
        let table = BracketTable::new("III", vec![bracket(1, dec!(10), dec!(180000))]);

        assert!(matches!(
            table.validate(),
            Err(BracketTableError::DoesNotStartAtZero { .. })
        ));
    }

    #[test]
    fn validate_rejects_duplicate_index() {
        let table = BracketTable::new(
            "III",
            vec![
                bracket(1, dec!(0), dec!(180000)),
                bracket(1, dec!(180000), dec!(360000)),
            ],
        );

        assert!(matches!(
            table.validate(),
            Err(BracketTableError::UnorderedIndex { order_index: 1, .. })
        ));
    }

    #[test]
    fn contains_is_inclusive_on_both_ends() {
        let b = bracket(1, dec!(0), dec!(180000));

        assert!(b.contains(dec!(0)));
        assert!(b.contains(dec!(180000)));
        assert!(!b.contains(dec!(180000.01)));
    }
}
