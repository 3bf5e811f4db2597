//! Balanced k-d tree over arbitrary objects.
//!
//! Objects are not required to carry coordinates: a [`PointMap`] supplies one
//! extraction function per dimension, and the tree keeps each object next to
//! the coordinates read from it. Queries hand back the objects themselves.

type CoordinateFn<'a, O> = Box<dyn Fn(&O) -> f64 + 'a>;

/// Ordered list of per-dimension coordinate functions.
pub struct PointMap<'a, O> {
    coordinates: Vec<CoordinateFn<'a, O>>,
}

impl<O> Default for PointMap<'_, O> {
    fn default() -> Self {
        Self {
            coordinates: Vec::new(),
        }
    }
}

impl<'a, O> PointMap<'a, O> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the next dimension.
    pub fn with_axis(mut self, coordinate: impl Fn(&O) -> f64 + 'a) -> Self {
        self.coordinates.push(Box::new(coordinate));
        self
    }

    pub fn dimensions(&self) -> usize {
        self.coordinates.len()
    }

    pub fn position(&self, object: &O, dimension: usize) -> f64 {
        (self.coordinates[dimension])(object)
    }

    fn locate(&self, object: &O) -> Vec<f64> {
        self.coordinates.iter().map(|coordinate| coordinate(object)).collect()
    }
}

/// `{ p : normal · p >= offset }`
#[derive(Clone, Debug, PartialEq)]
pub struct HalfSpace {
    pub normal: Vec<f64>,
    pub offset: f64,
}

impl HalfSpace {
    pub fn new(normal: Vec<f64>, offset: f64) -> Self {
        Self { normal, offset }
    }

    pub fn contains(&self, point: &[f64]) -> bool {
        let dot = self
            .normal
            .iter()
            .zip(point)
            .filter(|(n, _)| **n != 0.0)
            .map(|(n, p)| n * p)
            .sum::<f64>();
        dot >= self.offset
    }

    /// Smallest and largest value of `normal · p` over the box.
    fn range_over(&self, min: &[f64], max: &[f64]) -> (f64, f64) {
        let mut low = 0.0;
        let mut high = 0.0;
        for (d, &n) in self.normal.iter().enumerate().take(min.len()) {
            if n > 0.0 {
                low += n * min[d];
                high += n * max[d];
            } else if n < 0.0 {
                low += n * max[d];
                high += n * min[d];
            }
        }
        (low, high)
    }
}

/// Intersection of half-spaces.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConvexPolytope {
    half_spaces: Vec<HalfSpace>,
}

impl ConvexPolytope {
    pub fn new(half_spaces: Vec<HalfSpace>) -> Self {
        Self { half_spaces }
    }

    /// Closed box between two opposite corners given in any order.
    pub fn rectangle(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self::axis_aligned(&[x1.min(x2), y1.min(y2)], &[x1.max(x2), y1.max(y2)])
    }

    /// Closed box `min <= p <= max`, one pair of half-spaces per dimension.
    pub fn axis_aligned(min: &[f64], max: &[f64]) -> Self {
        let dimensions = min.len().min(max.len());
        let mut half_spaces = Vec::with_capacity(2 * dimensions);
        for d in 0..dimensions {
            let mut lower = vec![0.0; dimensions];
            lower[d] = 1.0;
            half_spaces.push(HalfSpace::new(lower, min[d]));

            let mut upper = vec![0.0; dimensions];
            upper[d] = -1.0;
            half_spaces.push(HalfSpace::new(upper, -max[d]));
        }
        Self { half_spaces }
    }

    pub fn half_spaces(&self) -> &[HalfSpace] {
        &self.half_spaces
    }

    pub fn contains(&self, point: &[f64]) -> bool {
        self.half_spaces.iter().all(|half_space| half_space.contains(point))
    }
}

/// Implicit balanced k-d tree: the node of a slot range is its middle slot,
/// split along `depth % dimensions`, with smaller-or-equal values to the left.
///
/// Objects with a NaN coordinate cannot be ordered; they are counted by
/// [`KdTree::len`] but never returned by a query.
#[derive(Clone, Debug)]
pub struct KdTree<O> {
    dimensions: usize,
    objects: Vec<O>,
    coordinates: Vec<f64>,
    unplaced: Vec<O>,
    min: Vec<f64>,
    max: Vec<f64>,
}

impl<O> Default for KdTree<O> {
    fn default() -> Self {
        Self {
            dimensions: 0,
            objects: Vec::new(),
            coordinates: Vec::new(),
            unplaced: Vec::new(),
            min: Vec::new(),
            max: Vec::new(),
        }
    }
}

impl<O> KdTree<O> {
    pub fn build(objects: impl IntoIterator<Item = O>, map: &PointMap<'_, O>) -> Self {
        let dimensions = map.dimensions();
        let mut entries = Vec::new();
        let mut unplaced = Vec::new();
        for object in objects {
            let point = map.locate(&object);
            if point.iter().any(|c| c.is_nan()) {
                unplaced.push(object);
            } else {
                entries.push((object, point));
            }
        }

        partition(&mut entries, 0, dimensions);

        let mut min = vec![f64::INFINITY; dimensions];
        let mut max = vec![f64::NEG_INFINITY; dimensions];
        let mut objects = Vec::with_capacity(entries.len());
        let mut coordinates = Vec::with_capacity(entries.len() * dimensions);
        for (object, point) in entries {
            for (d, &c) in point.iter().enumerate() {
                min[d] = min[d].min(c);
                max[d] = max[d].max(c);
            }
            coordinates.extend_from_slice(&point);
            objects.push(object);
        }

        Self {
            dimensions,
            objects,
            coordinates,
            unplaced,
            min,
            max,
        }
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Number of indexed objects, including those that could not be placed.
    pub fn len(&self) -> usize {
        self.objects.len() + self.unplaced.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn placed_len(&self) -> usize {
        self.objects.len()
    }

    fn point(&self, slot: usize) -> &[f64] {
        &self.coordinates[slot * self.dimensions..(slot + 1) * self.dimensions]
    }

    /// Objects whose point lies in every half-space of `polytope`.
    pub fn clip(&self, polytope: &ConvexPolytope) -> Vec<&O> {
        let mut inside = Vec::new();
        if self.objects.is_empty() {
            return inside;
        }

        let half_spaces = polytope.half_spaces();
        let active = (0..half_spaces.len()).collect::<Vec<_>>();
        let mut min = self.min.clone();
        let mut max = self.max.clone();
        self.clip_range(
            0..self.objects.len(),
            0,
            half_spaces,
            &active,
            (&mut min, &mut max),
            &mut inside,
        );
        inside
    }

    fn clip_range<'s>(
        &'s self,
        slots: std::ops::Range<usize>,
        depth: usize,
        half_spaces: &[HalfSpace],
        active: &[usize],
        bounds: (&mut [f64], &mut [f64]),
        inside: &mut Vec<&'s O>,
    ) {
        if slots.is_empty() {
            return;
        }
        let (min, max) = bounds;

        let mut undecided = Vec::with_capacity(active.len());
        for &index in active {
            let half_space = &half_spaces[index];
            let (low, high) = half_space.range_over(min, max);
            if high < half_space.offset {
                return;
            }
            if low < half_space.offset {
                undecided.push(index);
            }
        }

        if undecided.is_empty() {
            inside.extend(&self.objects[slots]);
            return;
        }

        let mid = slots.start + slots.len() / 2;
        let point = self.point(mid);
        if undecided
            .iter()
            .all(|&index| half_spaces[index].contains(point))
        {
            inside.push(&self.objects[mid]);
        }

        if self.dimensions == 0 {
            return;
        }
        let axis = depth % self.dimensions;
        let split = point[axis];

        let saved = max[axis];
        max[axis] = split;
        self.clip_range(
            slots.start..mid,
            depth + 1,
            half_spaces,
            &undecided,
            (&mut *min, &mut *max),
            inside,
        );
        max[axis] = saved;

        let saved = min[axis];
        min[axis] = split;
        self.clip_range(
            mid + 1..slots.end,
            depth + 1,
            half_spaces,
            &undecided,
            (&mut *min, &mut *max),
            inside,
        );
        min[axis] = saved;
    }

    /// The placed object closest to `query` (Euclidean).
    pub fn nearest(&self, query: &[f64]) -> Option<&O> {
        if self.objects.is_empty()
            || query.len() != self.dimensions
            || query.iter().any(|c| c.is_nan())
        {
            return None;
        }

        let mut best = None;
        self.nearest_range(0..self.objects.len(), 0, query, &mut best);
        best.map(|(slot, _)| &self.objects[slot])
    }

    fn nearest_range(
        &self,
        slots: std::ops::Range<usize>,
        depth: usize,
        query: &[f64],
        best: &mut Option<(usize, f64)>,
    ) {
        if slots.is_empty() {
            return;
        }

        let mid = slots.start + slots.len() / 2;
        let point = self.point(mid);
        let distance_sq = point
            .iter()
            .zip(query)
            .map(|(p, q)| (p - q) * (p - q))
            .sum::<f64>();
        if best.is_none_or(|(_, best_sq)| distance_sq < best_sq) {
            *best = Some((mid, distance_sq));
        }

        if self.dimensions == 0 {
            return;
        }
        let axis = depth % self.dimensions;
        let delta = query[axis] - point[axis];
        let (near, far) = if delta < 0.0 {
            (slots.start..mid, mid + 1..slots.end)
        } else {
            (mid + 1..slots.end, slots.start..mid)
        };

        self.nearest_range(near, depth + 1, query, best);
        if best.is_none_or(|(_, best_sq)| delta * delta <= best_sq) {
            self.nearest_range(far, depth + 1, query, best);
        }
    }
}

fn partition<O>(entries: &mut [(O, Vec<f64>)], depth: usize, dimensions: usize) {
    if entries.len() <= 1 || dimensions == 0 {
        return;
    }

    let axis = depth % dimensions;
    let mid = entries.len() / 2;
    entries.select_nth_unstable_by(mid, |a, b| a.1[axis].total_cmp(&b.1[axis]));

    let (left, rest) = entries.split_at_mut(mid);
    partition(left, depth + 1, dimensions);
    partition(&mut rest[1..], depth + 1, dimensions);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::stable_pair;

    fn scattered(count: usize) -> Vec<[f64; 2]> {
        (0..count)
            .map(|i| {
                let (x, y) = stable_pair(("point", i));
                [(x * 50.0).round(), (y * 50.0).round()]
            })
            .collect()
    }

    fn planar_map(points: &[[f64; 2]]) -> PointMap<'_, usize> {
        PointMap::new()
            .with_axis(move |&i: &usize| points[i][0])
            .with_axis(move |&i: &usize| points[i][1])
    }

    fn sorted(mut found: Vec<usize>) -> Vec<usize> {
        found.sort_unstable();
        found
    }

    #[test]
    fn clip_matches_brute_force() {
        let points = scattered(500);
        let tree = KdTree::build(0..points.len(), &planar_map(&points));
        assert_eq!(tree.len(), 500);

        for (x1, y1, x2, y2) in [
            (-10.0, -10.0, 10.0, 10.0),
            (0.0, -50.0, 50.0, 0.0),
            (-50.0, -50.0, 50.0, 50.0),
            (3.0, 3.0, 3.0, 3.0),
            (60.0, 60.0, 70.0, 70.0),
        ] {
            let polytope = ConvexPolytope::rectangle(x1, y1, x2, y2);
            let found = sorted(tree.clip(&polytope).into_iter().copied().collect());
            let expected = (0..points.len())
                .filter(|&i| {
                    let [x, y] = points[i];
                    x >= x1 && x <= x2 && y >= y1 && y <= y2
                })
                .collect::<Vec<_>>();
            assert_eq!(found, expected, "box ({x1}, {y1}) - ({x2}, {y2})");
        }
    }

    #[test]
    fn rectangle_corner_order_does_not_matter() {
        assert_eq!(
            ConvexPolytope::rectangle(4.0, 9.0, -2.0, 1.0),
            ConvexPolytope::rectangle(-2.0, 1.0, 4.0, 9.0)
        );
    }

    #[test]
    fn boundaries_are_inclusive() {
        let points = vec![[0.0, 0.0], [1.0, 1.0], [2.0, 2.0]];
        let tree = KdTree::build(0..points.len(), &planar_map(&points));
        let found = sorted(
            tree.clip(&ConvexPolytope::rectangle(0.0, 0.0, 1.0, 1.0))
                .into_iter()
                .copied()
                .collect(),
        );
        assert_eq!(found, vec![0, 1]);
    }

    #[test]
    fn nan_points_are_counted_but_never_found() {
        let points = vec![[0.0, 0.0], [f64::NAN, 1.0], [1.0, 1.0]];
        let tree = KdTree::build(0..points.len(), &planar_map(&points));

        assert_eq!(tree.len(), 3);
        assert_eq!(tree.placed_len(), 2);
        let everything = ConvexPolytope::rectangle(
            f64::NEG_INFINITY,
            f64::NEG_INFINITY,
            f64::INFINITY,
            f64::INFINITY,
        );
        assert_eq!(sorted(tree.clip(&everything).into_iter().copied().collect()), vec![0, 2]);
    }

    #[test]
    fn duplicate_points_are_all_returned() {
        let points = vec![[1.0, 1.0]; 40];
        let tree = KdTree::build(0..points.len(), &planar_map(&points));
        let found = tree.clip(&ConvexPolytope::rectangle(1.0, 1.0, 1.0, 1.0));
        assert_eq!(found.len(), 40);
    }

    #[test]
    fn three_dimensional_clip() {
        let points = (0..200)
            .map(|i| {
                let (x, y) = stable_pair(("xy", i));
                let (z, _) = stable_pair(("z", i));
                [x, y, z]
            })
            .collect::<Vec<_>>();
        let map = PointMap::new()
            .with_axis(|&i: &usize| points[i][0])
            .with_axis(|&i: &usize| points[i][1])
            .with_axis(|&i: &usize| points[i][2]);
        let tree = KdTree::build(0..points.len(), &map);
        assert_eq!(tree.dimensions(), 3);

        let polytope = ConvexPolytope::axis_aligned(&[-0.5, -0.5, 0.0], &[0.5, 0.5, 1.0]);
        let found = sorted(tree.clip(&polytope).into_iter().copied().collect());
        let expected = (0..points.len())
            .filter(|&i| polytope.contains(&points[i]))
            .collect::<Vec<_>>();
        assert_eq!(found, expected);
    }

    #[test]
    fn diagonal_half_space() {
        let points = scattered(300);
        let tree = KdTree::build(0..points.len(), &planar_map(&points));
        // x + y >= 10
        let polytope = ConvexPolytope::new(vec![HalfSpace::new(vec![1.0, 1.0], 10.0)]);

        let found = sorted(tree.clip(&polytope).into_iter().copied().collect());
        let expected = (0..points.len())
            .filter(|&i| points[i][0] + points[i][1] >= 10.0)
            .collect::<Vec<_>>();
        assert_eq!(found, expected);
    }

    #[test]
    fn nearest_matches_brute_force() {
        let points = scattered(400);
        let tree = KdTree::build(0..points.len(), &planar_map(&points));

        for query in [[0.0, 0.0], [49.0, -49.0], [12.3, 7.7], [-80.0, 5.0]] {
            let found = tree.nearest(&query).copied().expect("tree is not empty");
            let distance = |i: usize| {
                (points[i][0] - query[0]).powi(2) + (points[i][1] - query[1]).powi(2)
            };
            let best = (0..points.len())
                .map(distance)
                .fold(f64::INFINITY, f64::min);
            assert_eq!(distance(found), best);
        }
    }

    #[test]
    fn empty_tree_answers_nothing() {
        let tree = KdTree::<usize>::default();
        assert!(tree.is_empty());
        assert!(tree.clip(&ConvexPolytope::rectangle(0.0, 0.0, 1.0, 1.0)).is_empty());
        assert!(tree.nearest(&[]).is_none());
    }
}
