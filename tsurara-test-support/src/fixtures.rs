//! Condensed tree fixtures in raw row form.
//!
//! Rows are `(parent, child, lambda, child_size)`. Point ids count up from
//! zero and cluster ids start at the number of points, matching the
//! numbering HDBSCAN implementations emit.

use rand::{Rng, SeedableRng, rngs::SmallRng};

/// One condensed tree row: `(parent, child, lambda, child_size)`.
pub type Row = (u64, u64, f64, u64);

/// Root of [`two_level_rows`].
pub const TWO_LEVEL_ROOT: u64 = 100;

/// A 100-point tree with root `100` splitting at lambda 0.5 into `101`
/// (40 points) and `102` (60 points); `101` splits again at lambda 1.0 into
/// `103` (15 points) and `104` (25 points).
///
/// Points leave `102` in two waves (30 at 0.8, 30 at 1.2), all of `103` at
/// 1.5, and all of `104` at 2.0.
///
/// # Examples
/// ```
/// use tsurara_test_support::fixtures::two_level_rows;
///
/// let rows = two_level_rows();
/// assert_eq!(rows.iter().filter(|row| row.3 > 1).count(), 4);
/// ```
#[must_use]
pub fn two_level_rows() -> Vec<Row> {
    let mut rows = vec![
        (100, 101, 0.5, 40),
        (100, 102, 0.5, 60),
        (101, 103, 1.0, 15),
        (101, 104, 1.0, 25),
    ];
    rows.extend(points(103, 0..15, 1.5));
    rows.extend(points(104, 15..40, 2.0));
    rows.extend(points(102, 40..70, 0.8));
    rows.extend(points(102, 70..100, 1.2));
    rows
}

fn points(parent: u64, ids: std::ops::Range<u64>, lambda: f64) -> impl Iterator<Item = Row> {
    ids.map(move |id| (parent, id, lambda, 1))
}

/// A degenerate chain of `depth` single-child splits below the root.
///
/// Every cluster sheds one point at the lambda it splits, then continues
/// into its only cluster child; the last cluster drops its final two points.
/// The root is `depth + 2`, the number of points.
///
/// # Examples
/// ```
/// use tsurara_test_support::fixtures::chain_rows;
///
/// let rows = chain_rows(3);
/// assert_eq!(rows.iter().filter(|row| row.3 > 1).count(), 3);
/// assert_eq!(rows.iter().map(|row| row.0).min(), Some(5));
/// ```
#[must_use]
pub fn chain_rows(depth: u32) -> Vec<Row> {
    let points_total = u64::from(depth) + 2;
    let root = points_total;
    let mut rows = Vec::new();
    for level in 0..depth {
        let step = u64::from(level);
        let cluster = root + step;
        let lambda = f64::from(level + 1);
        rows.push((cluster, step, lambda, 1));
        rows.push((cluster, cluster + 1, lambda, points_total - step - 1));
    }
    let last = root + u64::from(depth);
    rows.extend(points(
        last,
        u64::from(depth)..points_total,
        f64::from(depth) + 1.0,
    ));
    rows
}

const CLUSTER_ID_BASE: u64 = 1 << 32;
const MIN_ROOT_SIZE: u64 = 8;
const SPLIT_PROBABILITY: f64 = 0.75;
const SINGLE_CHILD_PROBABILITY: f64 = 0.15;

/// Generates a valid condensed tree with at most `max_clusters` clusters,
/// deterministically from `seed`.
///
/// Clusters split into two children most of the time and occasionally
/// continue into a single child; points may leave a cluster before it
/// splits. Lambdas are drawn so children are never born before their parent.
/// Cluster ids start at `2^32`, so the root is always `2^32`.
///
/// # Examples
/// ```
/// use tsurara_test_support::fixtures::random_tree_rows;
///
/// let rows = random_tree_rows(7, 16, 200);
/// assert_eq!(rows, random_tree_rows(7, 16, 200));
/// ```
#[must_use]
pub fn random_tree_rows(seed: u64, max_clusters: usize, max_points: u64) -> Vec<Row> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let root_size = rng.gen_range(MIN_ROOT_SIZE..=max_points.max(MIN_ROOT_SIZE));
    let mut generator = TreeGenerator {
        rng,
        rows: Vec::new(),
        next_cluster: CLUSTER_ID_BASE + 1,
        next_point: 0,
        clusters: 1,
        max_clusters: max_clusters.max(1),
    };
    let mut pending = vec![(CLUSTER_ID_BASE, 0.0, root_size)];
    while let Some((cluster, birth, size)) = pending.pop() {
        pending.extend(generator.expand(cluster, birth, size));
    }
    generator.rows
}

struct TreeGenerator {
    rng: SmallRng,
    rows: Vec<Row>,
    next_cluster: u64,
    next_point: u64,
    clusters: usize,
    max_clusters: usize,
}

impl TreeGenerator {
    /// Emits the rows owned by `cluster` and returns the child clusters that
    /// still need expanding.
    fn expand(&mut self, cluster: u64, birth: f64, size: u64) -> Vec<(u64, f64, u64)> {
        let split = birth + self.rng.gen_range(0.05..1.0);
        let shed = self.rng.gen_range(0..=size / 4);
        let remaining = size - shed;
        let room = self.max_clusters.saturating_sub(self.clusters);
        let wants_split = self.rng.gen_bool(SPLIT_PROBABILITY);

        if wants_split && room >= 2 && remaining >= 4 {
            self.shed_points(cluster, shed, birth, split);
            let left = self.rng.gen_range(2..=remaining - 2);
            return vec![
                self.child(cluster, split, left),
                self.child(cluster, split, remaining - left),
            ];
        }
        if wants_split
            && room >= 1
            && remaining >= 3
            && self.rng.gen_bool(SINGLE_CHILD_PROBABILITY)
        {
            self.shed_points(cluster, shed + 1, birth, split);
            return vec![self.child(cluster, split, remaining - 1)];
        }

        let death = birth + self.rng.gen_range(0.1..2.0);
        self.shed_points(cluster, size, birth, death);
        Vec::new()
    }

    fn child(&mut self, parent: u64, lambda: f64, size: u64) -> (u64, f64, u64) {
        let id = self.next_cluster;
        self.next_cluster += 1;
        self.clusters += 1;
        self.rows.push((parent, id, lambda, size));
        (id, lambda, size)
    }

    fn shed_points(&mut self, parent: u64, count: u64, from: f64, until: f64) {
        for _ in 0..count {
            let lambda = self.rng.gen_range(from..=until);
            self.rows.push((parent, self.next_point, lambda, 1));
            self.next_point += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, BTreeSet};

    use rstest::rstest;

    use super::*;

    #[rstest]
    fn two_level_rows_sum_to_their_cluster_sizes() {
        let rows = two_level_rows();
        let mut totals: BTreeMap<u64, u64> = BTreeMap::new();
        for &(parent, _, _, size) in &rows {
            *totals.entry(parent).or_default() += size;
        }
        assert_eq!(totals[&TWO_LEVEL_ROOT], 100);
        assert_eq!(totals[&101], 40);
        assert_eq!(totals[&102], 60);
        assert_eq!(totals[&103], 15);
        assert_eq!(totals[&104], 25);
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(12)]
    fn chain_rows_shed_one_point_per_level(#[case] depth: u32) {
        let rows = chain_rows(depth);
        let root = u64::from(depth) + 2;
        let mut totals: BTreeMap<u64, u64> = BTreeMap::new();
        for &(parent, _, _, size) in &rows {
            *totals.entry(parent).or_default() += size;
        }
        assert_eq!(totals.len(), depth as usize + 1);
        for (&cluster, &total) in &totals {
            assert_eq!(total, root - (cluster - root), "size of cluster {cluster}");
        }
    }

    #[rstest]
    #[case(1, 1)]
    #[case(2, 8)]
    #[case(3, 64)]
    fn random_rows_respect_structure(#[case] seed: u64, #[case] max_clusters: usize) {
        let rows = random_tree_rows(seed, max_clusters, 300);
        let cluster_rows: Vec<&Row> = rows.iter().filter(|row| row.3 > 1).collect();
        assert!(cluster_rows.len() < max_clusters);

        let mut births = BTreeMap::from([(CLUSTER_ID_BASE, 0.0)]);
        for row in &cluster_rows {
            births.insert(row.1, row.2);
        }
        let parents: BTreeSet<u64> = rows.iter().map(|row| row.0).collect();
        for &(parent, _, lambda, size) in &rows {
            assert!(size > 0);
            assert!(lambda >= births[&parent]);
        }
        for cluster in births.keys() {
            assert!(parents.contains(cluster), "cluster {cluster} owns no rows");
        }
    }
}
