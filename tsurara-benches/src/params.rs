//! Benchmark parameter labels.

use std::fmt;

/// Shape of a balanced synthetic tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TreeBenchParams {
    /// Number of binary splits between the root and every leaf.
    pub depth: u32,
    /// Points owned by each leaf cluster.
    pub points_per_leaf: u64,
}

impl fmt::Display for TreeBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "depth={},points_per_leaf={}",
            self.depth, self.points_per_leaf
        )
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::TreeBenchParams;

    #[rstest]
    fn display_names_both_parameters() {
        let params = TreeBenchParams {
            depth: 4,
            points_per_leaf: 8,
        };
        assert_eq!(params.to_string(), "depth=4,points_per_leaf=8");
    }
}
