//! Point quadtree with bounding-box leaves.
//!
//! A leaf keeps accepting points while the bounding box of its points stays
//! within `eps` in both dimensions. Once an insert pushes the box past that
//! threshold the leaf splits into four equal quarters and its points are
//! re-inserted, recursively if needed.

use cs_core::{Arena, Rect};

use crate::error::{SimError, SimResult};

/// A stored point together with its payload.
#[derive(Debug, Clone, PartialEq)]
struct IndexedPoint<T> {
    x: f64,
    y: f64,
    item: T,
}

/// Read-only summary of one leaf, used to check the settling invariant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeafInfo {
    /// Region covered by the leaf.
    pub rect: Rect,
    /// Bounding box of the leaf's points, `None` when the leaf is empty.
    pub bounds: Option<Rect>,
    /// Number of points stored in the leaf.
    pub len: usize,
}

#[derive(Debug, Clone)]
struct Node {
    rect: Rect,
    bounds: Rect,
    points: Vec<usize>,
    children: Option<[usize; 4]>,
}

impl Node {
    fn new(rect: Rect) -> Self {
        Self {
            rect,
            bounds: Rect::point(rect.x_min, rect.y_min),
            points: Vec::new(),
            children: None,
        }
    }
}

/// Quadtree over the half-open region `[0, width) x [0, height)`.
///
/// Nodes live in a flat arena; a node is either a leaf holding point
/// indices or an internal node with exactly four children ordered
/// south-west, south-east, north-west, north-east.
#[derive(Debug, Clone)]
pub struct SpatialIndex<T> {
    eps: f64,
    nodes: Vec<Node>,
    points: Vec<IndexedPoint<T>>,
}

impl<T> SpatialIndex<T> {
    /// Whether a split threshold asks for indexing at all.
    pub fn is_enabled(eps: f64) -> bool {
        eps > 0.0
    }

    /// Create an empty index over `[0, width) x [0, height)`.
    pub fn new(width: f64, height: f64, eps: f64) -> SimResult<Self> {
        if !Self::is_enabled(eps) || !eps.is_finite() {
            return Err(SimError::Config(format!(
                "quadtree split threshold must be positive, got {eps}"
            )));
        }
        if !(width.is_finite() && width > 0.0 && height.is_finite() && height > 0.0) {
            return Err(SimError::Config(format!(
                "quadtree region must be non-empty, got {width}x{height}"
            )));
        }
        Ok(Self {
            eps,
            nodes: vec![Node::new(Rect::new(0.0, width, 0.0, height))],
            points: Vec::new(),
        })
    }

    /// Index covering every circle that fits in `arena`, or `None` when
    /// `eps` disables indexing.
    ///
    /// The region is one unit larger than the arena in each dimension so
    /// points on the far border stay inside the half-open root.
    pub fn covering(arena: Arena, eps: f64) -> Option<Self> {
        Self::new(arena.width + 1.0, arena.height + 1.0, eps).ok()
    }

    /// The split threshold.
    pub fn eps(&self) -> f64 {
        self.eps
    }

    /// The region covered by the root.
    pub fn region(&self) -> Rect {
        self.nodes[0].rect
    }

    /// Number of stored points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if no points are stored.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of nodes, leaves and internal nodes together.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Drop all points and collapse back to a single empty root.
    pub fn clear(&mut self) {
        self.nodes.truncate(1);
        let root = &mut self.nodes[0];
        *root = Node::new(root.rect);
        self.points.clear();
    }

    // -----------------------------------------------------------------------
    // Insertion
    // -----------------------------------------------------------------------

    /// Insert a point. The point must lie inside [`Self::region`].
    pub fn insert(&mut self, x: f64, y: f64, item: T) {
        debug_assert!(
            self.region().contains(x, y),
            "point ({x}, {y}) outside quadtree region {}",
            self.region()
        );
        let index = self.points.len();
        self.points.push(IndexedPoint { x, y, item });
        self.insert_at(0, index);
    }

    fn insert_at(&mut self, start: usize, point: usize) {
        let (x, y) = (self.points[point].x, self.points[point].y);
        let mut node = start;
        while let Some(children) = self.nodes[node].children {
            node = children[self.quadrant(&children, x, y)];
        }

        let eps = self.eps;
        let leaf = &mut self.nodes[node];
        if leaf.points.is_empty() {
            leaf.bounds = Rect::point(x, y);
            leaf.points.push(point);
            return;
        }
        leaf.bounds.extend(x, y);
        leaf.points.push(point);
        if leaf.bounds.width() > eps || leaf.bounds.height() > eps {
            self.split(node);
        }
    }

    fn quadrant(&self, children: &[usize; 4], x: f64, y: f64) -> usize {
        let east = x >= self.nodes[children[1]].rect.x_min;
        let north = y >= self.nodes[children[2]].rect.y_min;
        usize::from(north) * 2 + usize::from(east)
    }

    fn split(&mut self, node: usize) {
        let r = self.nodes[node].rect;
        let x_mid = r.x_min + (r.x_max - r.x_min) / 2.0;
        let y_mid = r.y_min + (r.y_max - r.y_min) / 2.0;

        let first = self.nodes.len();
        self.nodes.extend([
            Node::new(Rect::new(r.x_min, x_mid, r.y_min, y_mid)),
            Node::new(Rect::new(x_mid, r.x_max, r.y_min, y_mid)),
            Node::new(Rect::new(r.x_min, x_mid, y_mid, r.y_max)),
            Node::new(Rect::new(x_mid, r.x_max, y_mid, r.y_max)),
        ]);
        let children = [first, first + 1, first + 2, first + 3];

        let parent = &mut self.nodes[node];
        parent.children = Some(children);
        let points = std::mem::take(&mut parent.points);
        for point in points {
            self.insert_at(node, point);
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Payloads of all points inside the half-open rectangle `area`.
    pub fn query(&self, area: &Rect) -> Vec<&T> {
        let mut hits = Vec::new();
        let mut stack = vec![0];
        while let Some(n) = stack.pop() {
            let node = &self.nodes[n];
            if !node.rect.intersects(area) {
                continue;
            }
            match node.children {
                Some(children) => stack.extend(children),
                None => hits.extend(
                    node.points
                        .iter()
                        .map(|&p| &self.points[p])
                        .filter(|p| area.contains(p.x, p.y))
                        .map(|p| &p.item),
                ),
            }
        }
        hits
    }

    /// Summaries of every leaf.
    pub fn leaves(&self) -> impl Iterator<Item = LeafInfo> + '_ {
        self.nodes
            .iter()
            .filter(|n| n.children.is_none())
            .map(|n| LeafInfo {
                rect: n.rect,
                bounds: (!n.points.is_empty()).then_some(n.bounds),
                len: n.points.len(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn brute_force(points: &[(f64, f64)], area: &Rect) -> Vec<usize> {
        points
            .iter()
            .enumerate()
            .filter(|(_, (x, y))| area.contains(*x, *y))
            .map(|(i, _)| i)
            .collect()
    }

    fn build(points: &[(f64, f64)], eps: f64) -> SpatialIndex<usize> {
        let mut index = SpatialIndex::new(1000.0, 1000.0, eps).unwrap();
        for (i, &(x, y)) in points.iter().enumerate() {
            index.insert(x, y, i);
        }
        index
    }

    fn sorted_query(index: &SpatialIndex<usize>, area: &Rect) -> Vec<usize> {
        let mut hits: Vec<usize> = index.query(area).into_iter().copied().collect();
        hits.sort_unstable();
        hits
    }

    #[test]
    fn rejects_non_positive_threshold() {
        assert!(SpatialIndex::<usize>::new(100.0, 100.0, 0.0).is_err());
        assert!(SpatialIndex::<usize>::new(100.0, 100.0, -5.0).is_err());
        assert!(SpatialIndex::<usize>::new(0.0, 100.0, 5.0).is_err());
        assert!(!SpatialIndex::<usize>::is_enabled(0.0));
        assert!(SpatialIndex::<usize>::covering(Arena::new(10.0, 10.0), 0.0).is_none());
    }

    #[test]
    fn covering_pads_the_arena() {
        let index = SpatialIndex::<usize>::covering(Arena::new(800.0, 600.0), 10.0).unwrap();
        assert_eq!(index.region(), Rect::new(0.0, 801.0, 0.0, 601.0));
    }

    #[test]
    fn close_points_share_a_leaf() {
        let index = build(&[(10.0, 10.0), (12.0, 11.0), (10.5, 13.0)], 5.0);
        assert_eq!(index.node_count(), 1);
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn distant_points_force_a_split() {
        let index = build(&[(10.0, 10.0), (900.0, 900.0)], 5.0);
        assert!(index.node_count() > 1);
        for leaf in index.leaves() {
            assert!(leaf.len <= 1);
        }
    }

    #[test]
    fn coincident_points_never_split() {
        let index = build(&[(250.0, 250.0); 50], 0.5);
        assert_eq!(index.node_count(), 1);
        let around = Rect::around(cs_core::Vec2::new(250.0, 250.0), 1.0);
        assert_eq!(sorted_query(&index, &around).len(), 50);
    }

    #[test]
    fn query_is_half_open() {
        let index = build(&[(100.0, 100.0), (200.0, 200.0)], 10.0);
        assert_eq!(sorted_query(&index, &Rect::new(100.0, 200.0, 100.0, 200.0)), vec![0]);
        assert_eq!(sorted_query(&index, &Rect::new(100.0, 200.1, 100.0, 200.1)), vec![0, 1]);
    }

    #[test]
    fn midline_points_go_east_and_north() {
        let index = build(&[(500.0, 500.0), (0.0, 0.0)], 1.0);
        assert_eq!(sorted_query(&index, &Rect::new(500.0, 1000.0, 500.0, 1000.0)), vec![0]);
        assert_eq!(sorted_query(&index, &Rect::new(0.0, 500.0, 0.0, 500.0)), vec![1]);
    }

    #[test]
    fn clear_resets_to_single_root() {
        let mut index = build(&[(10.0, 10.0), (900.0, 900.0), (400.0, 20.0)], 5.0);
        index.clear();
        assert!(index.is_empty());
        assert_eq!(index.node_count(), 1);
        assert!(index.query(&Rect::new(0.0, 1000.0, 0.0, 1000.0)).is_empty());
        index.insert(3.0, 4.0, 7);
        assert_eq!(index.query(&Rect::new(0.0, 10.0, 0.0, 10.0)), vec![&7]);
    }

    fn coordinate() -> impl Strategy<Value = f64> {
        prop_oneof![
            0.0..1000.0f64,
            (0u32..8).prop_map(|k| f64::from(k) * 125.0),
        ]
    }

    fn area() -> impl Strategy<Value = Rect> {
        (coordinate(), coordinate(), 0.0..400.0f64, 0.0..400.0f64)
            .prop_map(|(x, y, w, h)| Rect::new(x, x + w, y, y + h))
    }

    proptest! {
        #[test]
        fn query_matches_brute_force(
            points in prop::collection::vec((coordinate(), coordinate()), 0..200),
            eps in 0.5..300.0f64,
            areas in prop::collection::vec(area(), 1..10),
        ) {
            let index = build(&points, eps);
            prop_assert_eq!(index.len(), points.len());
            for area in &areas {
                prop_assert_eq!(sorted_query(&index, area), brute_force(&points, area));
            }
        }

        #[test]
        fn leaves_settle_within_threshold(
            points in prop::collection::vec((coordinate(), coordinate()), 1..200),
            eps in 0.5..300.0f64,
        ) {
            let index = build(&points, eps);
            let mut stored = 0;
            for leaf in index.leaves() {
                stored += leaf.len;
                if let Some(bounds) = leaf.bounds {
                    prop_assert!(bounds.width() <= eps);
                    prop_assert!(bounds.height() <= eps);
                    prop_assert!(leaf.rect.contains(bounds.x_min, bounds.y_min));
                }
            }
            prop_assert_eq!(stored, points.len());
        }
    }
}
