//! Distance functions the tree can be built over.
//!
//! A metric must be non-negative, symmetric and satisfy the triangle
//! inequality, otherwise range search may prune true matches. Squared
//! Euclidean distance is *not* a metric.
use num::traits::AsPrimitive;

use crate::error::{Result, VPTreeError};

pub trait Metric<T: ?Sized> {
    /// Distance between `a` and `b`.
    fn distance(&self, a: &T, b: &T) -> Result<f64>;
}

/// Plain functions and closures are infallible metrics.
impl<T: ?Sized, F> Metric<T> for F
where
    F: Fn(&T, &T) -> f64,
{
    fn distance(&self, a: &T, b: &T) -> Result<f64> {
        Ok(self(a, b))
    }
}

/// L2 distance between equal-length numeric vectors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Euclidean;

impl<N: AsPrimitive<f64>> Metric<[N]> for Euclidean {
    fn distance(&self, a: &[N], b: &[N]) -> Result<f64> {
        if a.len() != b.len() {
            return Err(VPTreeError::DimensionMismatch {
                left: a.len(),
                right: b.len(),
            });
        }
        let sum: f64 = a
            .iter()
            .zip(b)
            .map(|(x, y)| {
                let d = x.as_() - y.as_();
                d * d
            })
            .sum();
        Ok(sum.sqrt())
    }
}

impl<N: AsPrimitive<f64>> Metric<Vec<N>> for Euclidean {
    fn distance(&self, a: &Vec<N>, b: &Vec<N>) -> Result<f64> {
        Metric::<[N]>::distance(self, a.as_slice(), b.as_slice())
    }
}

/// Edit distance with unit insertion and deletion and a substitution
/// cost of 2, so a substitution is never cheaper than delete + insert.
///
/// ```
/// use mvptree::{EditDistance, Metric};
/// assert_eq!(EditDistance.distance("kitten", "sitting").unwrap(), 5.0);
/// assert_eq!(EditDistance.distance("", "abc").unwrap(), 3.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EditDistance;

pub const INSERT_COST: u32 = 1;
pub const DELETE_COST: u32 = 1;
pub const SUBSTITUTE_COST: u32 = 2;

impl EditDistance {
    /// Two-row dynamic program over Unicode scalar values.
    pub fn compute(a: &str, b: &str) -> u32 {
        let b: Vec<char> = b.chars().collect();
        let mut prev: Vec<u32> = (0..=b.len() as u32).collect();
        let mut curr = vec![0u32; b.len() + 1];

        for (i, ca) in a.chars().enumerate() {
            curr[0] = (i as u32 + 1) * DELETE_COST;
            for (j, &cb) in b.iter().enumerate() {
                curr[j + 1] = if ca == cb {
                    prev[j]
                } else {
                    (prev[j + 1] + DELETE_COST)
                        .min(curr[j] + INSERT_COST)
                        .min(prev[j] + SUBSTITUTE_COST)
                };
            }
            std::mem::swap(&mut prev, &mut curr);
        }
        prev[b.len()]
    }
}

impl Metric<str> for EditDistance {
    fn distance(&self, a: &str, b: &str) -> Result<f64> {
        Ok(f64::from(EditDistance::compute(a, b)))
    }
}

impl Metric<String> for EditDistance {
    fn distance(&self, a: &String, b: &String) -> Result<f64> {
        Ok(f64::from(EditDistance::compute(a, b)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn euclidean_points() {
        let a = vec![0.0, 0.0];
        let b = vec![3.0, 4.0];
        assert_eq!(Euclidean.distance(&a, &b), Ok(5.0));
        assert_eq!(Euclidean.distance(&b, &a), Ok(5.0));
    }

    #[test]
    fn euclidean_integer_vectors() {
        let a: Vec<u8> = vec![1, 2, 3];
        let b: Vec<u8> = vec![4, 2, 3];
        assert_eq!(Euclidean.distance(&a, &b), Ok(3.0));
    }

    #[test]
    fn euclidean_dimension_mismatch() {
        let a = vec![1.0f32, 2.0];
        let b = vec![1.0f32];
        assert_eq!(
            Euclidean.distance(&a, &b),
            Err(VPTreeError::DimensionMismatch { left: 2, right: 1 })
        );
    }

    #[test]
    fn edit_distance_cost_model() {
        // classic Levenshtein would give 3
        assert_eq!(EditDistance::compute("kitten", "sitting"), 5);
        assert_eq!(EditDistance::compute("kitten", "bitten"), 2);
        assert_eq!(EditDistance::compute("sitting", "bitten"), 5);
        assert_eq!(EditDistance::compute("abc", "abc"), 0);
        assert_eq!(EditDistance::compute("abc", ""), 3);
        assert_eq!(EditDistance::compute("", ""), 0);
        assert_eq!(EditDistance::compute("a", "b"), 2);
    }

    #[test]
    fn edit_distance_symmetric() {
        for (a, b) in [("flaw", "lawn"), ("intention", "execution"), ("ß", "ss")] {
            assert_eq!(EditDistance::compute(a, b), EditDistance::compute(b, a));
        }
    }

    #[test]
    fn closure_metric() {
        let abs = |a: &i64, b: &i64| (a - b).abs() as f64;
        assert_eq!(abs.distance(&3, &-4), Ok(7.0));
    }
}
