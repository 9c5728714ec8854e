//! Multi-way split of a set of items by their distance to a vantage point.

/// Distances closer than this are treated as equal when placing group
/// boundaries. Fixed, not configurable: a boundary never falls between
/// two distances within this tolerance of each other.
pub const TIE_EPSILON: f64 = 1e-6;

/// Items split into groups of increasing distance, with the distance
/// thresholds between consecutive groups.
#[derive(Debug, Clone, PartialEq)]
pub struct Partition<T> {
    pub groups: Vec<Vec<T>>,
    pub cutoffs: Vec<f64>,
}

fn tied(a: f64, b: f64) -> bool {
    (a - b).abs() < TIE_EPSILON
}

/// Boundary positions for splitting `sorted` into at most `ways` groups.
///
/// Each returned index `k` satisfies `0 < k < sorted.len()`, the indices
/// are strictly increasing, and `sorted[k - 1]` and `sorted[k]` are never
/// tied.
///
/// ```
/// use mvptree::partition::cut_indices;
/// assert_eq!(cut_indices(&[1.0, 2.0, 3.0, 4.0], 2), vec![2]);
/// assert_eq!(cut_indices(&[1.0, 2.0, 2.0, 4.0], 2), vec![3]);
/// assert!(cut_indices(&[2.0, 2.0, 2.0, 2.0], 2).is_empty());
/// ```
pub fn cut_indices(sorted: &[f64], ways: usize) -> Vec<usize> {
    let n = sorted.len();
    if ways < 2 || n < 2 {
        return Vec::new();
    }
    // half-way sizes round to even
    let size = (n as f64 / ways as f64).round_ties_even() as usize;
    if size == 0 {
        return Vec::new();
    }

    // once size >= 1 the loop stops within n steps, whatever `ways` is
    let mut cuts: Vec<usize> = Vec::with_capacity((ways - 1).min(n));
    for w in 1..ways {
        let mut k = w * size;
        if k == 0 {
            continue;
        }
        while k < n && tied(sorted[k - 1], sorted[k]) {
            k += 1;
        }
        if k >= n {
            break;
        }
        if cuts.last() != Some(&k) {
            cuts.push(k);
        }
    }
    cuts
}

/// Sort `items` by `distances` and split them into up to `ways` groups.
///
/// The sort is stable: items at equal distance keep their input order.
/// Each cutoff is the midpoint of the distances on either side of its
/// boundary. When no boundary can be placed, every item lands in one
/// group and the single cutoff is the largest distance.
pub fn partition_by_distance<T>(items: Vec<T>, distances: Vec<f64>, ways: usize) -> Partition<T> {
    debug_assert_eq!(items.len(), distances.len());

    let mut tagged: Vec<(f64, T)> = distances.into_iter().zip(items).collect();
    tagged.sort_by(|a, b| a.0.total_cmp(&b.0));
    let (sorted, mut rest): (Vec<f64>, Vec<T>) = tagged.into_iter().unzip();

    if rest.is_empty() {
        return Partition {
            groups: Vec::new(),
            cutoffs: Vec::new(),
        };
    }

    let cuts = cut_indices(&sorted, ways);
    if cuts.is_empty() {
        let max = sorted[sorted.len() - 1];
        return Partition {
            groups: vec![rest],
            cutoffs: vec![max],
        };
    }

    let cutoffs = cuts
        .iter()
        .map(|&k| (sorted[k - 1] + sorted[k]) / 2.0)
        .collect();

    let mut groups = Vec::with_capacity(cuts.len() + 1);
    for &k in cuts.iter().rev() {
        groups.push(rest.split_off(k));
    }
    groups.push(rest);
    groups.reverse();
    groups.retain(|g| !g.is_empty());

    Partition { groups, cutoffs }
}
