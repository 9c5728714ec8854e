//! n-way vantage point trees for range search in metric spaces.
use std::borrow::Borrow;
use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

use crate::config::VPTreeConfig;
use crate::error::{Result, VPTreeError};
use crate::metric::Metric;
use crate::partition::{partition_by_distance, Partition};
use crate::select::{select_vantage_point, SelectingMode};

/// A node of the tree. Children are owned; nodes are never modified
/// after the tree is built.
#[derive(Debug, Clone, PartialEq)]
pub enum VPNode<T> {
    /// Between 1 and `leaf_capacity` elements, scanned linearly.
    Leaf(Vec<T>),
    /// `children[i]` holds the elements whose distance to `vantage_point`
    /// lies between `cutoffs[i - 1]` and `cutoffs[i]`. Normally
    /// `children.len() == cutoffs.len() + 1`; a node whose elements could
    /// not be split has one child and one cutoff, the largest distance.
    Internal {
        vantage_point: T,
        cutoffs: Vec<f64>,
        children: Vec<VPNode<T>>,
    },
}

/// A node whose children are still being built, referred to by slot.
enum Pending<T> {
    Leaf(Vec<T>),
    Internal {
        vantage_point: T,
        cutoffs: Vec<f64>,
        children: Vec<usize>,
    },
}

impl<T> VPNode<T> {
    /// Builds top-down with an explicit work stack, then assembles the
    /// owned tree bottom-up. Data full of duplicates yields chains as deep
    /// as the data is long, so nothing here recurses per level.
    fn build<M, R>(
        items: Vec<T>,
        metric: &M,
        config: &VPTreeConfig,
        rng: &mut R,
    ) -> Result<Self>
    where
        M: Metric<T>,
        R: Rng + ?Sized,
    {
        let mut slots: Vec<Pending<T>> = vec![Pending::Leaf(Vec::new())];
        let mut work: Vec<(Vec<T>, usize)> = vec![(items, 0)];

        while let Some((mut items, slot)) = work.pop() {
            if items.len() <= config.leaf_capacity {
                slots[slot] = Pending::Leaf(items);
                continue;
            }

            let sel_index = select_vantage_point(&items, metric, config.selecting_mode, rng)?;
            let vantage_point = items.remove(sel_index);

            let mut distances = Vec::with_capacity(items.len());
            for item in &items {
                distances.push(metric.distance(&vantage_point, item)?);
            }

            let Partition { groups, cutoffs } =
                partition_by_distance(items, distances, config.tree_ways);
            trace!(
                groups = ?groups.iter().map(Vec::len).collect::<Vec<_>>(),
                cutoffs = ?cutoffs,
                "partitioned node"
            );

            let first = slots.len();
            let children: Vec<usize> = (first..first + groups.len()).collect();
            slots.extend(groups.iter().map(|_| Pending::Leaf(Vec::new())));
            // pushed in reverse so the nearest group is built first
            for (group, &child) in groups.into_iter().zip(&children).rev() {
                work.push((group, child));
            }

            slots[slot] = Pending::Internal {
                vantage_point,
                cutoffs,
                children,
            };
        }

        // children always sit in later slots than their parent
        let mut built: Vec<Option<VPNode<T>>> = Vec::with_capacity(slots.len());
        built.resize_with(slots.len(), || None);
        for (slot, pending) in slots.into_iter().enumerate().rev() {
            let node = match pending {
                Pending::Leaf(items) => VPNode::Leaf(items),
                Pending::Internal {
                    vantage_point,
                    cutoffs,
                    children,
                } => VPNode::Internal {
                    vantage_point,
                    cutoffs,
                    children: children.into_iter().filter_map(|c| built[c].take()).collect(),
                },
            };
            built[slot] = Some(node);
        }
        built
            .into_iter()
            .next()
            .flatten()
            .ok_or(VPTreeError::EmptyData)
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, VPNode::Leaf(_))
    }

    /// A leaf has height 1.
    pub fn height(&self) -> u32 {
        let mut max = 0;
        let mut stack = vec![(self, 1u32)];
        while let Some((node, depth)) = stack.pop() {
            max = max.max(depth);
            if let VPNode::Internal { children, .. } = node {
                stack.extend(children.iter().map(|c| (c, depth + 1)));
            }
        }
        max
    }

    /// Leaf elements plus one per vantage point.
    pub fn element_count(&self) -> u64 {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match node {
                VPNode::Leaf(items) => count += items.len() as u64,
                VPNode::Internal { children, .. } => {
                    count += 1;
                    stack.extend(children);
                }
            }
        }
        count
    }

    /// Children that may hold elements within `radius` of a query lying
    /// at `distance` from this node's vantage point.
    fn reachable_children(&self, distance: f64, radius: f64) -> impl Iterator<Item = &VPNode<T>> {
        let (cutoffs, children) = match self {
            VPNode::Leaf(_) => (&[] as &[f64], &[] as &[VPNode<T>]),
            VPNode::Internal {
                cutoffs, children, ..
            } => (cutoffs.as_slice(), children.as_slice()),
        };
        children.iter().enumerate().filter_map(move |(i, child)| {
            let above_lower = i == 0 || distance + radius > cutoffs[i - 1];
            let below_upper = cutoffs.get(i).map_or(true, |&c| distance - radius <= c);
            if above_lower && below_upper {
                Some(child)
            } else {
                None
            }
        })
    }
}

impl<T> Drop for VPNode<T> {
    fn drop(&mut self) {
        let mut stack = match self {
            VPNode::Leaf(_) => return,
            VPNode::Internal { children, .. } => std::mem::take(children),
        };
        while let Some(mut node) = stack.pop() {
            if let VPNode::Internal { children, .. } = &mut node {
                stack.append(children);
            }
        }
    }
}

/// Elements within the search radius, borrowed from the tree, with their
/// distances to the query.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult<'a, T> {
    pub neighbors: Vec<(&'a T, f64)>,
    /// Number of metric evaluations the search performed.
    pub distance_evaluations: u64,
}

impl<'a, T> Default for SearchResult<'a, T> {
    fn default() -> Self {
        SearchResult {
            neighbors: Vec::new(),
            distance_evaluations: 0,
        }
    }
}

impl<'a, T> SearchResult<'a, T> {
    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    /// Order neighbors by increasing distance; ties keep traversal order.
    pub fn sort_by_distance(&mut self) {
        self.neighbors.sort_by(|a, b| a.1.total_cmp(&b.1));
    }

    pub fn objects(&self) -> impl Iterator<Item = &'a T> + '_ {
        self.neighbors.iter().map(|&(item, _)| item)
    }

    fn consider<Q, M>(&mut self, item: &'a T, query: &Q, radius: f64, metric: &M) -> Result<f64>
    where
        T: Borrow<Q>,
        Q: ?Sized,
        M: Metric<Q>,
    {
        let d = metric.distance(item.borrow(), query)?;
        self.distance_evaluations += 1;
        if d <= radius {
            self.neighbors.push((item, d));
        }
        Ok(d)
    }
}

fn check_radius(radius: f64) -> Result<()> {
    if radius >= 0.0 {
        Ok(())
    } else {
        Err(VPTreeError::InvalidConfiguration(format!(
            "search radius must be non-negative, got {radius}"
        )))
    }
}

/// Linear scan of `data` for elements within `radius` of `query`.
pub fn sequential_search<'a, T, Q, M>(
    data: &'a [T],
    metric: &M,
    query: &Q,
    radius: f64,
) -> Result<SearchResult<'a, T>>
where
    T: Borrow<Q>,
    Q: ?Sized,
    M: Metric<Q>,
{
    check_radius(radius)?;
    let mut result = SearchResult::default();
    for item in data {
        result.consider(item, query, radius, metric)?;
    }
    Ok(result)
}

/// Depth-first iterator over every element stored in a tree.
pub struct Iter<'a, T> {
    stack: Vec<&'a VPNode<T>>,
    leaf: std::slice::Iter<'a, T>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        loop {
            if let Some(item) = self.leaf.next() {
                return Some(item);
            }
            match self.stack.pop()? {
                VPNode::Leaf(items) => self.leaf = items.iter(),
                VPNode::Internal {
                    vantage_point,
                    children,
                    ..
                } => {
                    self.stack.extend(children.iter().rev());
                    return Some(vantage_point);
                }
            }
        }
    }
}

/// Vantage point tree over elements of type `T` under metric `M`.
#[derive(Debug, Clone)]
pub struct VPTree<T, M> {
    root: VPNode<T>,
    metric: M,
    config: VPTreeConfig,
}

impl<T, M: Metric<T>> VPTree<T, M> {
    /// Build a binary tree with one element per leaf and random vantage
    /// points.
    pub fn new(items: Vec<T>, metric: M) -> Result<VPTree<T, M>> {
        VPTree::build(items, metric, VPTreeConfig::default())
    }

    /// Construct a tree from a set of elements. Vantage points are drawn
    /// from `config.seed` when set, otherwise from the thread RNG.
    pub fn build(items: Vec<T>, metric: M, config: VPTreeConfig) -> Result<VPTree<T, M>> {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        VPTree::build_with_rng(items, metric, config, &mut rng)
    }

    /// Construct a tree drawing all randomness from `rng`.
    pub fn build_with_rng<R: Rng + ?Sized>(
        items: Vec<T>,
        metric: M,
        config: VPTreeConfig,
        rng: &mut R,
    ) -> Result<VPTree<T, M>> {
        config.validate()?;
        if items.is_empty() {
            return Err(VPTreeError::EmptyData);
        }
        let n = items.len();
        let root = VPNode::build(items, &metric, &config, rng)?;
        debug!(
            elements = n,
            height = root.height(),
            tree_ways = config.tree_ways,
            leaf_capacity = config.leaf_capacity,
            selecting_mode = %config.selecting_mode,
            "built vantage point tree"
        );
        Ok(VPTree { root, metric, config })
    }
}

impl<T, M> VPTree<T, M> {
    /// All elements within `radius` of `query`, skipping subtrees that the
    /// triangle inequality rules out.
    pub fn search<Q>(&self, query: &Q, radius: f64) -> Result<SearchResult<'_, T>>
    where
        T: Borrow<Q>,
        Q: ?Sized,
        M: Metric<Q>,
    {
        check_radius(radius)?;
        let mut result = SearchResult::default();
        let mut queue = VecDeque::new();
        queue.push_back(&self.root);

        while let Some(node) = queue.pop_front() {
            match node {
                VPNode::Leaf(items) => {
                    for item in items {
                        result.consider(item, query, radius, &self.metric)?;
                    }
                }
                VPNode::Internal { vantage_point, .. } => {
                    let d = result.consider(vantage_point, query, radius, &self.metric)?;
                    queue.extend(node.reachable_children(d, radius));
                }
            }
        }
        trace!(
            neighbors = result.neighbors.len(),
            distance_evaluations = result.distance_evaluations,
            "range search"
        );
        Ok(result)
    }

    /// Same contract as `search`, but measures every element. Used as a
    /// reference for checking pruning.
    pub fn brute_force_search<Q>(&self, query: &Q, radius: f64) -> Result<SearchResult<'_, T>>
    where
        T: Borrow<Q>,
        Q: ?Sized,
        M: Metric<Q>,
    {
        check_radius(radius)?;
        let mut result = SearchResult::default();
        for item in self.iter() {
            result.consider(item, query, radius, &self.metric)?;
        }
        Ok(result)
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            stack: vec![&self.root],
            leaf: Default::default(),
        }
    }

    pub fn root(&self) -> &VPNode<T> {
        &self.root
    }

    pub fn metric(&self) -> &M {
        &self.metric
    }

    pub fn height(&self) -> u32 {
        self.root.height()
    }

    pub fn element_count(&self) -> u64 {
        self.root.element_count()
    }

    pub fn config(&self) -> &VPTreeConfig {
        &self.config
    }

    pub fn tree_ways(&self) -> usize {
        self.config.tree_ways
    }

    pub fn leaf_capacity(&self) -> usize {
        self.config.leaf_capacity
    }

    pub fn selecting_mode(&self) -> SelectingMode {
        self.config.selecting_mode
    }
}

impl<'a, T, M> IntoIterator for &'a VPTree<T, M> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}
