//! Production weight tables

use fg_rng::{SelectorResult, WeightTable};

use crate::types::{PopularityBracket, Role};

/// Role chances: 10% main, 70% supporting, 20% background
pub fn default_role_table() -> SelectorResult<WeightTable<Role>> {
    WeightTable::from_pairs([
        (10, Role::Main),
        (70, Role::Supporting),
        (20, Role::Background),
    ])
}

/// The five popularity brackets and their chances
pub fn default_bracket_table() -> SelectorResult<WeightTable<PopularityBracket>> {
    WeightTable::from_pairs([
        (6, PopularityBracket::new(0, 50_000)),
        (50, PopularityBracket::new(50_000, 100_000)),
        (40, PopularityBracket::new(100_000, 200_000)),
        (3, PopularityBracket::new(200_000, 400_000)),
        (1, PopularityBracket::unbounded(400_000)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tables_are_valid() {
        assert_eq!(default_role_table().unwrap().len(), 3);
        assert_eq!(default_bracket_table().unwrap().len(), 5);
    }

    #[test]
    fn test_brackets_are_ordered_and_contiguous() {
        let table = default_bracket_table().unwrap();
        let brackets: Vec<_> = table.values().copied().collect();

        assert_eq!(brackets[0].lower, 0);
        for pair in brackets.windows(2) {
            assert_eq!(pair[0].upper, Some(pair[1].lower));
        }
        assert_eq!(brackets.last().and_then(|b| b.upper), None);
    }

    #[test]
    fn test_bracket_keys_are_unique() {
        let table = default_bracket_table().unwrap();
        let mut keys: Vec<String> = table.values().map(|b| b.key()).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), 5);
    }
}
