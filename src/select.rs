//! Vantage point selection.
use std::fmt;
use std::str::FromStr;

use rand::seq::index;
use rand::Rng;

use crate::error::{Result, VPTreeError};
use crate::metric::Metric;

/// Number of candidate vantage points examined by `MaxSpread`.
pub const MAX_SPREAD_CANDIDATES: usize = 50;
/// Number of reference points each candidate is measured against.
pub const MAX_SPREAD_SAMPLES: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SelectingMode {
    /// Uniformly random element.
    #[default]
    Random,
    /// Sampled candidate whose distances to a random sub-sample have
    /// the largest standard deviation.
    MaxSpread,
}

impl SelectingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectingMode::Random => "random",
            SelectingMode::MaxSpread => "max_spread",
        }
    }
}

impl fmt::Display for SelectingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SelectingMode {
    type Err = VPTreeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "random" => Ok(SelectingMode::Random),
            "max_spread" | "maxspread" => Ok(SelectingMode::MaxSpread),
            other => Err(VPTreeError::InvalidConfiguration(format!(
                "unknown selecting mode '{other}'"
            ))),
        }
    }
}

/// `amount` distinct indices in `0..population`.
pub fn sample_indices<R: Rng + ?Sized>(
    rng: &mut R,
    population: usize,
    amount: usize,
) -> Result<Vec<usize>> {
    if amount > population {
        return Err(VPTreeError::SampleSizeError {
            requested: amount,
            population,
        });
    }
    Ok(index::sample(rng, population, amount).into_vec())
}

/// Pick a vantage point in `items` and return its index.
///
/// Only the index is returned; the element is `items[index]`. The caller
/// removes exactly that index, so duplicate values elsewhere in `items`
/// are left alone.
pub fn select_vantage_point<T, M, R>(
    items: &[T],
    metric: &M,
    mode: SelectingMode,
    rng: &mut R,
) -> Result<usize>
where
    M: Metric<T>,
    R: Rng + ?Sized,
{
    if items.is_empty() {
        return Err(VPTreeError::EmptyData);
    }
    match mode {
        SelectingMode::Random => Ok(rng.random_range(0..items.len())),
        SelectingMode::MaxSpread => max_spread(items, metric, rng),
    }
}

fn max_spread<T, M, R>(items: &[T], metric: &M, rng: &mut R) -> Result<usize>
where
    M: Metric<T>,
    R: Rng + ?Sized,
{
    let n = items.len();
    let candidates = sample_indices(rng, n, MAX_SPREAD_CANDIDATES.min(n))?;
    let sample_size = MAX_SPREAD_SAMPLES.min(n - 1);

    let mut best: Option<(usize, f64)> = None;
    for candidate in candidates {
        // Sample from the n - 1 other positions, then skip over the candidate.
        let others = sample_indices(rng, n - 1, sample_size)?;
        let mut distances = Vec::with_capacity(others.len());
        for i in others {
            let j = if i >= candidate { i + 1 } else { i };
            distances.push(metric.distance(&items[candidate], &items[j])?);
        }
        let spread = std_dev(&distances);
        match best {
            Some((_, s)) if spread <= s => {}
            _ => best = Some((candidate, spread)),
        }
    }
    // candidates is never empty since n > 0
    Ok(best.map_or(0, |(i, _)| i))
}

/// Population standard deviation; 0 for an empty slice.
pub fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    var.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metric::Euclidean;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn parse_modes() {
        assert_eq!("random".parse::<SelectingMode>(), Ok(SelectingMode::Random));
        assert_eq!("Max-Spread".parse::<SelectingMode>(), Ok(SelectingMode::MaxSpread));
        assert!(matches!(
            "median".parse::<SelectingMode>(),
            Err(VPTreeError::InvalidConfiguration(_))
        ));
        assert_eq!(SelectingMode::MaxSpread.to_string(), "max_spread");
    }

    #[test]
    fn std_dev_values() {
        assert_eq!(std_dev(&[]), 0.0);
        assert_eq!(std_dev(&[3.0, 3.0, 3.0]), 0.0);
        assert_eq!(std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]), 2.0);
    }

    #[test]
    fn oversampling_is_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            sample_indices(&mut rng, 3, 4),
            Err(VPTreeError::SampleSizeError {
                requested: 4,
                population: 3
            })
        );
        let mut picked = sample_indices(&mut rng, 10, 10).unwrap();
        picked.sort();
        assert_eq!(picked, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn random_index_in_range() {
        let items: Vec<Vec<f64>> = (0..7).map(|i| vec![i as f64]).collect();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let i = select_vantage_point(&items, &Euclidean, SelectingMode::Random, &mut rng)
                .unwrap();
            assert!(i < items.len());
        }
    }

    #[test]
    fn single_item() {
        let items = vec![vec![1.0, 2.0]];
        let mut rng = StdRng::seed_from_u64(3);
        for mode in [SelectingMode::Random, SelectingMode::MaxSpread] {
            assert_eq!(select_vantage_point(&items, &Euclidean, mode, &mut rng), Ok(0));
        }
    }

    #[test]
    fn empty_items() {
        let items: Vec<Vec<f64>> = Vec::new();
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(
            select_vantage_point(&items, &Euclidean, SelectingMode::MaxSpread, &mut rng),
            Err(VPTreeError::EmptyData)
        );
    }

    #[test]
    fn max_spread_prefers_an_end_of_the_line() {
        // On a line with few enough points that every candidate and every
        // other point gets sampled, the end points have the most spread.
        let items: Vec<Vec<f64>> = (0..9).map(|i| vec![i as f64]).collect();
        let mut rng = StdRng::seed_from_u64(11);
        let i = select_vantage_point(&items, &Euclidean, SelectingMode::MaxSpread, &mut rng)
            .unwrap();
        assert!(i == 0 || i == 8, "picked {i}");
    }
}
