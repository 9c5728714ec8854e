//! Vantage point trees with n-way branching, for range search under an
//! arbitrary metric.
//!
//! ```
//! use mvptree::{Euclidean, SelectingMode, VPTree, VPTreeConfig};
//!
//! let points = vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![0.0, 1.0], vec![5.0, 5.0]];
//! let config = VPTreeConfig::new(3, 1, SelectingMode::MaxSpread).with_seed(42);
//! let tree = VPTree::build(points, Euclidean, config).unwrap();
//!
//! let found = tree.search(&vec![0.0, 0.0], 1.5).unwrap();
//! assert_eq!(found.len(), 3);
//! ```
pub mod config;
pub mod error;
pub mod metric;
pub mod partition;
pub mod select;
pub mod vptree;

pub use config::VPTreeConfig;
pub use error::{Result, VPTreeError};
pub use metric::{EditDistance, Euclidean, Metric};
pub use select::SelectingMode;
pub use vptree::{sequential_search, SearchResult, VPNode, VPTree};
