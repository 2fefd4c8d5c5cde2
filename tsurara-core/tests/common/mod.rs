#![allow(dead_code, reason = "each integration test binary uses a subset")]

use proptest::test_runner::Config as ProptestConfig;
use test_strategy::Arbitrary;
use tsurara_core::{CondensedTree, CondensedTreeRecord};
use tsurara_test_support::{
    fixtures::{Row, random_tree_rows, two_level_rows},
    profile::ProptestRunProfile,
};

#[must_use]
pub fn tree_from_rows(rows: Vec<Row>) -> CondensedTree {
    CondensedTree::from_records(rows.into_iter().map(CondensedTreeRecord::from).collect())
        .expect("fixture rows must form a valid tree")
}

#[must_use]
pub fn two_level_tree() -> CondensedTree {
    tree_from_rows(two_level_rows())
}

/// Shape parameters for a seeded random condensed tree.
#[derive(Clone, Copy, Debug, Arbitrary)]
pub struct TreeSpec {
    pub seed: u64,
    #[strategy(1usize..96)]
    pub max_clusters: usize,
    #[strategy(8u64..600)]
    pub max_points: u64,
}

impl TreeSpec {
    #[must_use]
    pub fn build(self) -> CondensedTree {
        tree_from_rows(random_tree_rows(
            self.seed,
            self.max_clusters,
            self.max_points,
        ))
    }
}

/// Builds the proptest configuration shared by the property suites, honouring
/// `PROPTEST_CASES` and `TSURARA_PBT_FORK`.
#[must_use]
pub fn suite_proptest_config(default_cases: u32) -> ProptestConfig {
    let profile = ProptestRunProfile::load(default_cases, false);
    ProptestConfig {
        cases: profile.cases(),
        fork: profile.fork(),
        ..ProptestConfig::default()
    }
}
