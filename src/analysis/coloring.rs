//! Color refinement (1-dimensional Weisfeiler-Leman).
//!
//! Color refinement partitions the nodes of a graph into classes ("colors") such that two
//! nodes of the same color have, for every color, the same number of neighbours of that
//! color. The result is the coarsest such *stable* partition finer than the initial one.
//!
//! Isomorphic graphs receive identical color histograms, which makes refinement the
//! pruning step of the isomorphism search in [`crate::analysis::isomorphism`].
//!
//! # Algorithm
//!
//! The initial partition groups nodes by degree (out- and in-degree for directed graphs),
//! with every individualized pair placed in a class of its own. Refinement then follows
//! Hopcroft's "process the smaller half" strategy:
//!
//! 1. Queue every initial class except the largest
//! 2. Pop a class `c` and count, for every node, its neighbours in `c`
//! 3. Split every class whose members disagree on that count; the largest part keeps the
//!    class id, all other parts get fresh ids and are queued
//! 4. Repeat until the queue is empty
//!
//! Directed graphs count successors and predecessors in `c` separately. Members without a
//! neighbour in `c` are never visited: a split moves only the counted members, so its cost
//! is bounded by the work of counting.
//!
//! # Complexity
//!
//! - Time: O((V + E) log² V); each node moves to a fresh class O(log V) times, and the
//!   parts of every split are sorted to keep color ids deterministic
//! - Space: O(V)
//!
//! # Examples
//!
//! ```rust
//! use graphscope::analysis::find_coloring;
//! use graphscope::graph::Graph;
//!
//! // A path 1 - 2 - 3: the two ends share a color, the middle does not
//! let mut graph = Graph::undirected();
//! graph.add_edge_by_name("1", "2");
//! graph.add_edge_by_name("2", "3");
//!
//! let colors = find_coloring(&graph);
//! let one = graph.node_id("1").unwrap();
//! let two = graph.node_id("2").unwrap();
//! let three = graph.node_id("3").unwrap();
//! assert_eq!(colors[&one], colors[&three]);
//! assert_ne!(colors[&one], colors[&two]);
//! ```

use std::collections::{BTreeMap, HashMap, VecDeque};

use tracing::{debug, instrument};

use crate::{
    error::invalid_argument,
    graph::{Graph, NodeId},
    Result,
};

/// A partition of the nodes of a graph into color classes.
///
/// Colors are dense: they range over `0..color_count()`. Members of a class are listed in
/// node slot order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coloring {
    colors: HashMap<NodeId, usize>,
    classes: Vec<Vec<NodeId>>,
}

impl Coloring {
    /// The color of `node`, or `None` if the node was not colored.
    pub fn color_of(&self, node: NodeId) -> Option<usize> {
        self.colors.get(&node).copied()
    }

    /// The members of color class `color`.
    pub fn class(&self, color: usize) -> Option<&[NodeId]> {
        self.classes.get(color).map(Vec::as_slice)
    }

    /// All color classes, indexed by color.
    pub fn classes(&self) -> impl Iterator<Item = &[NodeId]> + '_ {
        self.classes.iter().map(Vec::as_slice)
    }

    /// Number of distinct colors.
    pub fn color_count(&self) -> usize {
        self.classes.len()
    }

    /// Number of colored nodes.
    pub fn node_count(&self) -> usize {
        self.colors.len()
    }

    /// Returns `true` if every node has a color of its own.
    pub fn is_discrete(&self) -> bool {
        self.classes.len() == self.colors.len()
    }

    /// The node to color mapping.
    pub fn colors(&self) -> &HashMap<NodeId, usize> {
        &self.colors
    }

    /// Consumes the coloring, returning the node to color mapping.
    pub fn into_colors(self) -> HashMap<NodeId, usize> {
        self.colors
    }
}

/// Degree signature used to build the initial partition: (individualization rank,
/// prior color, out-degree, in-degree).
type InitialKey = (usize, usize, usize, usize);

/// Configurable color refinement over a single graph.
///
/// # Examples
///
/// ```rust
/// use graphscope::analysis::ColorRefinement;
/// use graphscope::graph::Graph;
///
/// // A 4-cycle is vertex-transitive: one color until a pair is individualized
/// let mut graph = Graph::undirected();
/// for (a, b) in [("a", "b"), ("b", "c"), ("c", "d"), ("d", "a")] {
///     graph.add_edge_by_name(a, b);
/// }
/// assert_eq!(ColorRefinement::new(&graph).refine().color_count(), 1);
///
/// let a = graph.node_id("a").unwrap();
/// let mut refinement = ColorRefinement::new(&graph);
/// refinement.individualize(a, a).unwrap();
/// // {a}, {b, d}, {c}
/// assert_eq!(refinement.refine().color_count(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct ColorRefinement<'g> {
    graph: &'g Graph,
    /// Individualization rank per node slot, starting at 1
    ranks: HashMap<usize, usize>,
    next_rank: usize,
    prior: Option<Coloring>,
}

impl<'g> ColorRefinement<'g> {
    /// Creates a refinement starting from the degree partition of `graph`.
    pub fn new(graph: &'g Graph) -> Self {
        ColorRefinement {
            graph,
            ranks: HashMap::new(),
            next_rank: 1,
            prior: None,
        }
    }

    /// Creates a refinement starting from an existing coloring of `graph`.
    ///
    /// Nodes the coloring does not cover share one extra color. Resuming from a stable
    /// coloring without individualizing anything reproduces the same partition.
    pub fn resume(graph: &'g Graph, coloring: &Coloring) -> Self {
        ColorRefinement {
            prior: Some(coloring.clone()),
            ..Self::new(graph)
        }
    }

    /// Forces `a` and `b` into a color class of their own.
    ///
    /// Every call creates a new class; individualizing the same node again moves it to the
    /// newest class. `a` and `b` may be the same node.
    ///
    /// # Errors
    ///
    /// Fails if either node does not resolve to a live node of the graph.
    pub fn individualize(&mut self, a: NodeId, b: NodeId) -> Result<&mut Self> {
        self.graph.ensure_node(a)?;
        self.graph.ensure_node(b)?;

        let rank = self.next_rank;
        self.next_rank += 1;
        self.ranks.insert(a.index(), rank);
        self.ranks.insert(b.index(), rank);
        Ok(self)
    }

    fn initial_key(&self, node: NodeId) -> InitialKey {
        let rank = self.ranks.get(&node.index()).copied().unwrap_or(0);
        let prior = match &self.prior {
            Some(coloring) => coloring
                .color_of(node)
                .unwrap_or_else(|| coloring.color_count()),
            None => 0,
        };
        let (out_degree, in_degree) = if self.graph.is_directed() {
            (self.graph.out_degree(node), self.graph.in_degree(node))
        } else {
            (self.graph.out_degree(node), 0)
        };
        (rank, prior, out_degree, in_degree)
    }

    /// Refines the initial partition until it is stable.
    #[instrument(skip(self), fields(individualized = self.next_rank - 1))]
    pub fn refine(&self) -> Coloring {
        let mut state = RefinementState::new(self.graph, |node| self.initial_key(node));
        state.run();
        let coloring = state.finish();

        debug!(
            nodes = coloring.node_count(),
            colors = coloring.color_count(),
            "color refinement stable"
        );
        coloring
    }
}

/// Working partition over node slots.
struct RefinementState<'g> {
    graph: &'g Graph,
    /// Color per node slot; `None` for vacant slots
    color: Vec<Option<usize>>,
    /// Members per color, as node slots
    classes: Vec<Vec<usize>>,
    /// Index of each node slot within its class member list
    position: Vec<usize>,
    queue: VecDeque<usize>,
    queued: Vec<bool>,
}

impl<'g> RefinementState<'g> {
    fn new<K>(graph: &'g Graph, key: K) -> Self
    where
        K: Fn(NodeId) -> InitialKey,
    {
        let mut groups: BTreeMap<InitialKey, Vec<usize>> = BTreeMap::new();
        for node in graph.node_ids() {
            groups.entry(key(node)).or_default().push(node.index());
        }

        let mut color = vec![None; graph.node_bound()];
        let mut position = vec![0; graph.node_bound()];
        let mut classes = Vec::with_capacity(groups.len());
        for members in groups.into_values() {
            for (at, &slot) in members.iter().enumerate() {
                color[slot] = Some(classes.len());
                position[slot] = at;
            }
            classes.push(members);
        }

        let mut state = RefinementState {
            graph,
            color,
            position,
            queued: vec![false; classes.len()],
            classes,
            queue: VecDeque::new(),
        };

        let largest = state.largest(0..state.classes.len());
        for c in 0..state.classes.len() {
            if Some(c) != largest {
                state.enqueue(c);
            }
        }
        state
    }

    /// The largest class among `colors`; ties go to the first one.
    fn largest(&self, colors: impl Iterator<Item = usize>) -> Option<usize> {
        let mut best: Option<usize> = None;
        for c in colors {
            match best {
                Some(b) if self.classes[c].len() <= self.classes[b].len() => {}
                _ => best = Some(c),
            }
        }
        best
    }

    fn enqueue(&mut self, color: usize) {
        if !self.queued[color] {
            self.queued[color] = true;
            self.queue.push_back(color);
        }
    }

    fn node(&self, slot: usize) -> Option<NodeId> {
        self.graph.node_at(slot).ok()
    }

    /// Per-slot (successors in `splitter`, predecessors in `splitter`) counts for every
    /// node with at least one neighbour in the splitter.
    fn count_neighbours(&self, splitter: usize) -> HashMap<usize, (usize, usize)> {
        let mut counts: HashMap<usize, (usize, usize)> = HashMap::new();
        let directed = self.graph.is_directed();

        for &slot in &self.classes[splitter] {
            let Some(member) = self.node(slot) else {
                continue;
            };
            if directed {
                // An edge v -> member gives v a successor in the splitter
                for v in self.graph.predecessors(member) {
                    counts.entry(v.index()).or_default().0 += 1;
                }
                for v in self.graph.successors(member) {
                    counts.entry(v.index()).or_default().1 += 1;
                }
            } else {
                for v in self.graph.successors(member) {
                    counts.entry(v.index()).or_default().0 += 1;
                }
            }
        }
        counts
    }

    fn run(&mut self) {
        while let Some(splitter) = self.queue.pop_front() {
            self.queued[splitter] = false;

            let mut touched: BTreeMap<usize, Vec<(usize, (usize, usize))>> = BTreeMap::new();
            for (slot, key) in self.count_neighbours(splitter) {
                if let Some(class) = self.color[slot] {
                    touched.entry(class).or_default().push((slot, key));
                }
            }

            for (class, counted) in touched {
                self.split(class, &counted);
            }
        }
    }

    /// Splits `class` by the neighbour counts of its `counted` members. Members without a
    /// count form the zero part and are only touched if that part loses the class id.
    fn split(&mut self, class: usize, counted: &[(usize, (usize, usize))]) {
        let remainder = self.move_to_back(class, counted.iter().map(|&(slot, _)| slot));

        let mut parts: BTreeMap<(usize, usize), Vec<usize>> = BTreeMap::new();
        for &(slot, key) in counted {
            parts.entry(key).or_default().push(slot);
        }
        if remainder == 0 && parts.len() < 2 {
            return;
        }

        // Part sizes in key order; the zero part sorts first
        let zero = usize::from(remainder > 0);
        let mut sizes = Vec::with_capacity(parts.len() + zero);
        if remainder > 0 {
            sizes.push(remainder);
        }
        sizes.extend(parts.values().map(Vec::len));
        let mut keep = 0;
        for (index, &size) in sizes.iter().enumerate() {
            if size > sizes[keep] {
                keep = index;
            }
        }

        self.classes[class].truncate(remainder);
        if remainder > 0 && keep != 0 {
            let rest = std::mem::take(&mut self.classes[class]);
            self.push_class(rest);
        }
        for (index, part) in parts.into_values().enumerate() {
            if index + zero == keep {
                for (at, &slot) in part.iter().enumerate() {
                    self.position[slot] = at;
                }
                self.classes[class] = part;
            } else {
                self.push_class(part);
            }
        }
    }

    /// Moves `slots` to the back of the member list of `class` and returns how many members
    /// remain in front of them.
    fn move_to_back(&mut self, class: usize, slots: impl Iterator<Item = usize>) -> usize {
        let mut front = self.classes[class].len();
        for slot in slots {
            front -= 1;
            let at = self.position[slot];
            let displaced = self.classes[class][front];
            self.classes[class].swap(at, front);
            self.position[displaced] = at;
            self.position[slot] = front;
        }
        front
    }

    fn push_class(&mut self, members: Vec<usize>) {
        let fresh = self.classes.len();
        for (at, &slot) in members.iter().enumerate() {
            self.color[slot] = Some(fresh);
            self.position[slot] = at;
        }
        self.classes.push(members);
        self.queued.push(false);
        self.enqueue(fresh);
    }

    fn finish(self) -> Coloring {
        let mut colors = HashMap::new();
        let mut classes = Vec::with_capacity(self.classes.len());
        for (color, mut members) in self.classes.into_iter().enumerate() {
            members.sort_unstable();
            let nodes: Vec<NodeId> = members
                .into_iter()
                .filter_map(|slot| self.graph.node_at(slot).ok())
                .collect();
            for &node in &nodes {
                colors.insert(node, color);
            }
            classes.push(nodes);
        }
        Coloring { colors, classes }
    }
}

/// Computes the stable coloring of `graph` from its degree partition.
pub fn find_coloring(graph: &Graph) -> HashMap<NodeId, usize> {
    ColorRefinement::new(graph).refine().into_colors()
}

/// Computes one stable coloring across several graphs.
///
/// The graphs are colored as parts of their disjoint union, so equal colors in different
/// graphs are comparable. The returned map is keyed by each graph's own node ids.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`](crate::Error::InvalidArgument) if the graphs do not
/// all share the same directedness.
pub fn find_union_coloring(graphs: &[&Graph]) -> Result<HashMap<NodeId, usize>> {
    let Some(first) = graphs.first() else {
        return Ok(HashMap::new());
    };
    if graphs.iter().any(|g| g.is_directed() != first.is_directed()) {
        return Err(invalid_argument!(
            "cannot color directed and undirected graphs together"
        ));
    }

    let mut union = Graph::new(first.is_directed());
    let mut origin = HashMap::new();
    for (index, graph) in graphs.iter().enumerate() {
        let mapping = union.disjoint_union_with(graph, &format!("{index}_"))?;
        origin.extend(mapping.into_iter().map(|(own, copy)| (copy, own)));
    }

    let coloring = ColorRefinement::new(&union).refine();
    Ok(coloring
        .into_colors()
        .into_iter()
        .filter_map(|(copy, color)| origin.get(&copy).map(|&own| (own, color)))
        .collect())
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeSet, HashSet};

    use super::*;
    use crate::Error;

    fn undirected(edges: &[(&str, &str)]) -> Graph {
        let mut graph = Graph::undirected();
        for (a, b) in edges {
            graph.add_edge_by_name(a, b);
        }
        graph
    }

    fn distinct(colors: &HashMap<NodeId, usize>) -> usize {
        colors.values().collect::<HashSet<_>>().len()
    }

    /// Every pair of same-colored nodes has the same neighbour count in every class.
    fn assert_stable(graph: &Graph, coloring: &Coloring) {
        for class in coloring.classes() {
            for target in 0..coloring.color_count() {
                let count = |node: NodeId| {
                    graph
                        .successors(node)
                        .filter(|&n| coloring.color_of(n) == Some(target))
                        .count()
                };
                let expected = count(class[0]);
                assert!(class.iter().all(|&n| count(n) == expected));
            }
        }
    }

    fn assert_same_color_by_name(g: &Graph, h: &Graph, colors: &HashMap<NodeId, usize>) {
        for node in g.node_ids() {
            let name = g.name(node).unwrap();
            assert_eq!(colors[&node], colors[&h.node_id(name).unwrap()]);
        }
    }

    #[test]
    fn test_coloring_path_union() {
        let g = undirected(&[("1", "2"), ("2", "3")]);
        let h = undirected(&[("3", "2"), ("2", "1")]);

        let colors = find_union_coloring(&[&g, &h]).unwrap();
        assert_eq!(colors.len(), 6);
        assert_eq!(distinct(&colors), 2);
        assert_same_color_by_name(&g, &h, &colors);
    }

    #[test]
    fn test_coloring_branching_union() {
        let g = undirected(&[("1", "2"), ("2", "4"), ("1", "3"), ("3", "4")]);
        let h = undirected(&[("4", "2"), ("2", "1"), ("4", "3"), ("3", "1")]);

        let colors = find_union_coloring(&[&g, &h]).unwrap();
        assert_eq!(colors.len(), 8);
        assert_eq!(distinct(&colors), 1);
    }

    #[test]
    fn test_coloring_tree_union() {
        let edges = [("1", "2"), ("2", "3"), ("2", "4"), ("1", "5")];
        let g = undirected(&edges);
        let h = undirected(&edges);

        let colors = find_union_coloring(&[&g, &h]).unwrap();
        assert_eq!(colors.len(), 10);
        assert_eq!(distinct(&colors), 4);
        assert_same_color_by_name(&g, &h, &colors);
    }

    #[test]
    fn test_coloring_is_stable_and_dense() {
        let graph = undirected(&[
            ("a", "b"),
            ("b", "c"),
            ("c", "d"),
            ("d", "e"),
            ("e", "f"),
            ("c", "g"),
        ]);
        let coloring = ColorRefinement::new(&graph).refine();

        assert_stable(&graph, &coloring);
        assert_eq!(coloring.node_count(), graph.node_count());
        let mut seen: Vec<usize> = coloring.colors().values().copied().collect();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen, (0..coloring.color_count()).collect::<Vec<_>>());
    }

    #[test]
    fn test_resume_from_stable_is_fixed_point() {
        let graph = undirected(&[("1", "2"), ("2", "3"), ("3", "4"), ("2", "5")]);
        let coloring = ColorRefinement::new(&graph).refine();
        let again = ColorRefinement::resume(&graph, &coloring).refine();

        let partition = |c: &Coloring| {
            let mut classes: Vec<Vec<NodeId>> = c.classes().map(<[NodeId]>::to_vec).collect();
            classes.sort();
            classes
        };
        assert_eq!(partition(&coloring), partition(&again));
    }

    #[test]
    fn test_individualize_breaks_symmetry() {
        let graph = undirected(&[("a", "b"), ("b", "c"), ("c", "d"), ("d", "a")]);
        let a = graph.node_id("a").unwrap();
        let b = graph.node_id("b").unwrap();
        let d = graph.node_id("d").unwrap();

        let mut refinement = ColorRefinement::new(&graph);
        refinement.individualize(a, a).unwrap();
        let coloring = refinement.refine();

        assert_eq!(coloring.color_count(), 3);
        assert_eq!(coloring.class(coloring.color_of(a).unwrap()).unwrap(), &[a]);
        assert_eq!(coloring.color_of(b), coloring.color_of(d));

        refinement.individualize(b, b).unwrap();
        assert!(refinement.refine().is_discrete());
    }

    #[test]
    fn test_directed_colors_distinguish_direction() {
        // a -> b -> c: source, middle and sink all differ
        let mut graph = Graph::directed();
        graph.add_edge_by_name("a", "b");
        graph.add_edge_by_name("b", "c");
        let coloring = ColorRefinement::new(&graph).refine();
        assert!(coloring.is_discrete());

        // Directed 3-cycle is uniform
        graph.add_edge_by_name("c", "a");
        assert_eq!(ColorRefinement::new(&graph).refine().color_count(), 1);
    }

    #[test]
    fn test_directed_refinement_uses_predecessors() {
        // x, y and z all have out-degree 1 and in-degree 1, but x's predecessor is a source
        let mut graph = Graph::directed();
        graph.add_edge_by_name("s", "x");
        graph.add_edge_by_name("x", "t");
        graph.add_edge_by_name("y", "z");
        graph.add_edge_by_name("z", "y");
        let x = graph.node_id("x").unwrap();
        let y = graph.node_id("y").unwrap();

        let colors = find_coloring(&graph);
        assert_ne!(colors[&x], colors[&y]);
    }

    #[test]
    fn test_individualize_rejects_foreign_node() {
        let graph = undirected(&[("a", "b")]);
        let other = undirected(&[("a", "b")]);
        let foreign = other.node_id("a").unwrap();
        let a = graph.node_id("a").unwrap();

        let mut refinement = ColorRefinement::new(&graph);
        assert!(matches!(
            refinement.individualize(a, foreign),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_union_coloring_mixed_directedness() {
        let g = undirected(&[("a", "b")]);
        let h = Graph::directed();
        assert!(matches!(
            find_union_coloring(&[&g, &h]),
            Err(Error::InvalidArgument(_))
        ));
        assert!(find_union_coloring(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_empty_graph() {
        let coloring = ColorRefinement::new(&Graph::undirected()).refine();
        assert_eq!(coloring.color_count(), 0);
        assert!(coloring.is_discrete());
    }

    /// Stable partition by rounds of (own color, successor colors, predecessor colors).
    fn round_based_classes(graph: &Graph) -> HashSet<Vec<NodeId>> {
        let mut color: HashMap<NodeId, usize> = graph.node_ids().map(|n| (n, 0)).collect();
        loop {
            let signature = |n: NodeId| {
                let mut succ: Vec<usize> = graph.successors(n).map(|m| color[&m]).collect();
                let mut pred: Vec<usize> = graph.predecessors(n).map(|m| color[&m]).collect();
                succ.sort_unstable();
                pred.sort_unstable();
                (color[&n], succ, pred)
            };
            let signatures: BTreeSet<_> = graph.node_ids().map(signature).collect();
            let next: HashMap<NodeId, usize> = graph
                .node_ids()
                .map(|n| {
                    let own = signature(n);
                    (n, signatures.iter().position(|s| *s == own).unwrap())
                })
                .collect();
            let stable = signatures.len() == distinct(&color);
            color = next;
            if stable {
                break;
            }
        }

        let mut classes: BTreeMap<usize, Vec<NodeId>> = BTreeMap::new();
        for (node, c) in color {
            classes.entry(c).or_default().push(node);
        }
        classes
            .into_values()
            .map(|mut members| {
                members.sort_unstable();
                members
            })
            .collect()
    }

    fn refined_classes(graph: &Graph) -> HashSet<Vec<NodeId>> {
        ColorRefinement::new(graph)
            .refine()
            .classes()
            .map(<[NodeId]>::to_vec)
            .collect()
    }

    #[test]
    fn test_small_splitters_leave_large_class_intact() {
        // A broom: twenty leaves on a hub, a handle of six nodes and a few isolated nodes
        let mut graph = Graph::undirected();
        for i in 0..20 {
            graph.add_edge_by_name("hub", &format!("leaf{i}"));
        }
        let mut previous = "hub".to_string();
        for i in 0..6 {
            let next = format!("handle{i}");
            graph.add_edge_by_name(&previous, &next);
            previous = next;
        }
        for i in 0..4 {
            graph.add_node(&format!("isolated{i}"));
        }

        let coloring = ColorRefinement::new(&graph).refine();
        assert_stable(&graph, &coloring);
        let leaf = graph.node_id("leaf0").unwrap();
        assert_eq!(coloring.class(coloring.color_of(leaf).unwrap()).unwrap().len(), 20);
        assert_eq!(refined_classes(&graph), round_based_classes(&graph));
    }

    #[test]
    fn test_directed_refinement_matches_rounds() {
        let mut graph = Graph::directed();
        for i in 0..12 {
            graph.add_edge_by_name(&format!("c{i}"), &format!("c{}", (i + 1) % 12));
        }
        graph.add_edge_by_name("c0", "c6");
        graph.add_edge_by_name("t0", "t1");
        graph.add_edge_by_name("t1", "c3");
        for i in 0..5 {
            graph.add_edge_by_name("c9", &format!("out{i}"));
        }

        assert_eq!(refined_classes(&graph), round_based_classes(&graph));
    }
}
