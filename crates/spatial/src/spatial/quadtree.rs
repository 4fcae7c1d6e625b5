//! QuadTree for spatial indexing.
//!
//! Each node owns a region, up to four children and the entries that could
//! not be pushed further down. Children are created on first descent.

use std::collections::VecDeque;
use std::fmt;

use geometry::{Aabb, Position};
use tracing::{debug, trace, warn};

use super::quadrants::{Quadrant, Quadrants};
use crate::{SpatialError, TreeConfig};

/// Subdivision depth used by `QuadTree::default`.
pub const DEFAULT_MAX_DEPTH: u32 = 8;

/// An object stored directly at a node.
#[derive(Debug, Clone)]
struct Entry<T> {
    item: T,
    position: Position,
}

/// Region quadtree storing objects at points or boxes.
///
/// Every entry lives at the deepest node whose region is the only quadrant
/// containing it, so each object is stored exactly once and its node depends
/// only on its position and the tree's root region and depth.
///
/// Stored objects are never dropped implicitly; call [`QuadTree::remove`] to
/// release them. Removal leaves emptied children in place.
///
/// The tree has no internal synchronization. Share it behind a `RwLock` to
/// let queries run in parallel with each other but not with insertions.
#[derive(Clone)]
pub struct QuadTree<T> {
    region: Aabb,
    /// Remaining levels of subdivision below this node.
    max_depth: u32,
    children: Option<Box<[QuadTree<T>; 4]>>,
    entries: Vec<Entry<T>>,
}

impl<T> QuadTree<T> {
    /// Create an empty tree over `region`.
    pub fn new(region: Aabb, max_depth: u32) -> Self {
        Self {
            region,
            max_depth,
            children: None,
            entries: Vec::new(),
        }
    }

    /// Create an empty tree from configuration.
    pub fn from_config(config: &TreeConfig) -> Result<Self, SpatialError> {
        config.validate()?;
        Ok(Self::new(config.region(), config.max_depth))
    }

    /// Build a tree over the smallest box enclosing every position.
    ///
    /// Pairs with NaN coordinates are skipped. Returns `None` when no pair
    /// remains or when the enclosing box has zero or infinite area. Pairs are
    /// inserted in input order.
    pub fn from_pairs<I, P>(pairs: I, max_depth: u32) -> Option<Self>
    where
        I: IntoIterator<Item = (P, T)>,
        P: Into<Position>,
    {
        let pairs: Vec<(Position, T)> = pairs
            .into_iter()
            .map(|(p, item)| (p.into(), item))
            .filter(|(position, _)| {
                if position.is_nan() {
                    warn!(%position, "Skipping pair with NaN coordinates");
                }
                !position.is_nan()
            })
            .collect();

        let Some(region) = pairs
            .iter()
            .map(|(position, _)| position.bounds())
            .reduce(|a, b| a.union(&b))
        else {
            debug!("No pairs to build a quadtree from");
            return None;
        };

        let area = region.area();
        if area == 0.0 || !area.is_finite() {
            debug!(%region, area, "Rejecting degenerate quadtree region");
            return None;
        }

        let count = pairs.len();
        let mut tree = Self::new(region, max_depth);
        for (position, item) in pairs {
            if !tree.region.contains(&position) {
                warn!(%position, "Skipping pair outside its own bounding region");
                continue;
            }
            tree.add(item, position);
        }
        debug!(%region, count, max_depth, "Built quadtree from pairs");
        Some(tree)
    }

    #[inline]
    pub fn region(&self) -> &Aabb {
        &self.region
    }

    /// Remaining subdivision levels below this node.
    #[inline]
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    #[inline]
    pub fn is_subdivided(&self) -> bool {
        self.children.is_some()
    }

    /// Child nodes in quadrant order, if this node has been subdivided.
    pub fn children(&self) -> Option<&[QuadTree<T>; 4]> {
        self.children.as_deref()
    }

    pub fn child(&self, quadrant: Quadrant) -> Option<&QuadTree<T>> {
        self.children.as_ref().map(|c| &c[quadrant.index()])
    }

    /// Objects stored directly at this node, excluding descendants.
    pub fn local_items(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|e| &e.item)
    }

    /// Insert `item` at `position`.
    ///
    /// Returns `false` when the position has a NaN coordinate or lies outside
    /// the tree's region; the item is dropped in that case. Use
    /// [`QuadTree::try_add`] to get it back.
    pub fn add(&mut self, item: T, position: impl Into<Position>) -> bool {
        self.try_add(item, position).is_ok()
    }

    /// Insert `item` at `position`, handing the item back if no node of the
    /// tree can contain the position.
    pub fn try_add(&mut self, item: T, position: impl Into<Position>) -> Result<(), T> {
        let position = position.into();
        if position.is_nan() {
            warn!(%position, "Rejecting position with NaN coordinates");
            return Err(item);
        }
        if !self.region.contains(&position) {
            trace!(%position, region = %self.region, "Position outside tree region");
            return Err(item);
        }

        let mut node = self;
        while let Some(quadrant) = node.fitting_child(&position) {
            node = &mut node.subdivide()[quadrant.index()];
        }
        trace!(%position, region = %node.region, depth_left = node.max_depth, "Placed entry");
        node.entries.push(Entry { item, position });
        Ok(())
    }

    /// The single quadrant that can hold `position`, if subdivision is
    /// still allowed here.
    fn fitting_child(&self, position: &Position) -> Option<Quadrant> {
        if self.max_depth == 0 {
            return None;
        }
        let quadrants = Quadrants::new(&self.region);
        let mut fitting = quadrants
            .iter()
            .filter(|(_, region)| region.contains(position))
            .map(|(quadrant, _)| quadrant);
        match (fitting.next(), fitting.next()) {
            (Some(quadrant), None) => Some(quadrant),
            _ => None,
        }
    }

    /// Children of this node, created on first use.
    fn subdivide(&mut self) -> &mut [QuadTree<T>; 4] {
        let region = self.region;
        let depth = self.max_depth.saturating_sub(1);
        &mut **self.children.get_or_insert_with(|| {
            Box::new(Quadrants::new(&region).into_array().map(|r| QuadTree::new(r, depth)))
        })
    }

    /// All objects matching `query`.
    ///
    /// Subtrees whose region cannot touch the query are skipped. Each
    /// remaining entry is then tested exactly: two points match when they
    /// are approximately equal; otherwise `overlap` selects boundary-inclusive
    /// overlap, and without it the entry and query must share interior.
    ///
    /// Results come breadth-first: shallower nodes before deeper ones, and
    /// quadrants in upper-left, upper-right, lower-left, lower-right order.
    pub fn get_items(&self, query: impl Into<Position>, overlap: bool) -> Vec<&T> {
        let query = query.into();
        let search = query.search_bounds();

        let mut candidates = Vec::new();
        let mut queue = VecDeque::from([self]);
        while let Some(node) = queue.pop_front() {
            if !node.region.touches_box(&search) {
                continue;
            }
            candidates.extend(node.entries.iter());
            if let Some(children) = &node.children {
                queue.extend(children.iter());
            }
        }

        let scanned = candidates.len();
        let items: Vec<&T> = candidates
            .into_iter()
            .filter(|entry| entry.position.matches(&query, overlap))
            .map(|entry| &entry.item)
            .collect();
        trace!(%query, overlap, scanned, found = items.len(), "Quadtree query");
        items
    }

    /// Total entries in this node and all descendants.
    pub fn item_count(&self) -> usize {
        self.entries.len()
            + self
                .children
                .iter()
                .flat_map(|c| c.iter())
                .map(QuadTree::item_count)
                .sum::<usize>()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.item_count()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
            && self
                .children
                .iter()
                .flat_map(|c| c.iter())
                .all(QuadTree::is_empty)
    }

    /// Number of nodes, this one included.
    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .flat_map(|c| c.iter())
            .map(QuadTree::node_count)
            .sum::<usize>()
    }

    /// Every stored `(item, position)` pair, depth-first.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            stack: vec![self],
            current: Default::default(),
        }
    }

    /// Drop every entry and child node.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.children = None;
    }
}

impl<T: PartialEq> QuadTree<T> {
    /// Position `item` was stored under.
    pub fn position_of(&self, item: &T) -> Option<&Position> {
        self.iter()
            .find(|(stored, _)| *stored == item)
            .map(|(_, position)| position)
    }

    pub fn contains_item(&self, item: &T) -> bool {
        self.position_of(item).is_some()
    }

    /// Remove the first entry equal to `item`, searching the whole tree.
    pub fn remove(&mut self, item: &T) -> bool {
        let removed = self.remove_entry(item);
        debug!(removed, "Quadtree remove");
        removed
    }

    fn remove_entry(&mut self, item: &T) -> bool {
        if let Some(idx) = self.entries.iter().position(|e| e.item == *item) {
            self.entries.remove(idx);
            return true;
        }
        self.children
            .as_mut()
            .is_some_and(|children| children.iter_mut().any(|c| c.remove_entry(item)))
    }

    /// Remove `item` stored at `position`, visiting only the node that
    /// position is placed in.
    pub fn remove_at(&mut self, item: &T, position: impl Into<Position>) -> bool {
        let position = position.into();
        if !self.region.contains(&position) {
            return false;
        }

        let mut node = self;
        while let Some(quadrant) = node.fitting_child(&position) {
            if !node.is_subdivided() {
                break;
            }
            node = &mut node.subdivide()[quadrant.index()];
        }

        let idx = node
            .entries
            .iter()
            .position(|e| e.item == *item && e.position == position);
        let removed = idx.map(|i| node.entries.remove(i)).is_some();
        debug!(%position, removed, "Quadtree remove_at");
        removed
    }
}

impl<T> Default for QuadTree<T> {
    fn default() -> Self {
        Self::new(Aabb::unit(), DEFAULT_MAX_DEPTH)
    }
}

impl<'a, T> IntoIterator for &'a QuadTree<T> {
    type Item = (&'a T, &'a Position);
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Depth-first iterator over a tree's entries.
pub struct Iter<'a, T> {
    stack: Vec<&'a QuadTree<T>>,
    current: std::slice::Iter<'a, Entry<T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (&'a T, &'a Position);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.current.next() {
                return Some((&entry.item, &entry.position));
            }
            let node = self.stack.pop()?;
            self.current = node.entries.iter();
            if let Some(children) = &node.children {
                self.stack.extend(children.iter().rev());
            }
        }
    }
}

impl<T> fmt::Display for QuadTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QuadTree({}) / Level {}", self.region, self.max_depth)
    }
}

impl<T> fmt::Debug for QuadTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuadTree")
            .field("region", &self.region)
            .field("max_depth", &self.max_depth)
            .field("items", &self.item_count())
            .field("subdivided", &self.is_subdivided())
            .finish()
    }
}
