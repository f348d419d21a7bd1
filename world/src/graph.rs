//! Mutable grid graph that every agent walks on.

use graph_chase_core::{CellCoord, Direction, NodeId, Position};

/// Edge flags carried by a single node, one per cardinal direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct EdgeFlags {
    north: bool,
    east: bool,
    south: bool,
    west: bool,
}

impl EdgeFlags {
    fn get(&self, direction: Direction) -> bool {
        match direction {
            Direction::North => self.north,
            Direction::East => self.east,
            Direction::South => self.south,
            Direction::West => self.west,
        }
    }

    fn set(&mut self, direction: Direction, present: bool) {
        match direction {
            Direction::North => self.north = present,
            Direction::East => self.east = present,
            Direction::South => self.south = present,
            Direction::West => self.west = present,
        }
    }
}

/// Graph vertex with a fixed draw position and up to four edges.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    position: Position,
    edges: EdgeFlags,
}

impl Node {
    /// Draw-space position of the node.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Reports whether an edge currently leaves the node in the direction.
    #[must_use]
    pub fn has_edge(&self, direction: Direction) -> bool {
        self.edges.get(direction)
    }

    /// Directions that currently carry an edge.
    pub fn open_directions(&self) -> impl Iterator<Item = Direction> + '_ {
        Direction::ALL
            .into_iter()
            .filter(move |direction| self.has_edge(*direction))
    }

    /// Number of edges currently attached to the node.
    #[must_use]
    pub fn degree(&self) -> usize {
        self.open_directions().count()
    }
}

/// Row-major arena of nodes whose adjacency is derived from index arithmetic.
///
/// Edges are stored as per-node flags, but the graph only ever toggles them in
/// symmetric pairs, so a flag on one endpoint always implies the opposite flag
/// on the other.
#[derive(Clone, Debug)]
pub struct Graph {
    columns: u32,
    rows: u32,
    nodes: Vec<Node>,
}

impl Graph {
    /// Builds a fully connected rectangular lattice.
    #[must_use]
    pub fn lattice(columns: u32, rows: u32, cell_length: f32) -> Self {
        let capacity = usize::try_from(u64::from(columns) * u64::from(rows)).unwrap_or(0);
        let mut nodes = Vec::with_capacity(capacity);
        for row in 0..rows {
            for column in 0..columns {
                let edges = EdgeFlags {
                    north: row > 0,
                    east: column + 1 < columns,
                    south: row + 1 < rows,
                    west: column > 0,
                };
                nodes.push(Node {
                    position: Position::new(
                        (column as f32 + 0.5) * cell_length,
                        (row as f32 + 0.5) * cell_length,
                    ),
                    edges,
                });
            }
        }

        Self {
            columns,
            rows,
            nodes,
        }
    }

    /// Number of node columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of node rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Total number of nodes in the arena.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Iterator over every node identifier in arena order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len() as u32).map(NodeId::new)
    }

    /// Retrieves a node by identifier.
    #[must_use]
    pub fn node(&self, node: NodeId) -> Option<&Node> {
        self.nodes.get(node.index())
    }

    /// Identifier of the node at the provided grid coordinate.
    #[must_use]
    pub fn node_at(&self, cell: CellCoord) -> Option<NodeId> {
        if cell.column() < self.columns && cell.row() < self.rows {
            Some(NodeId::new(cell.row() * self.columns + cell.column()))
        } else {
            None
        }
    }

    /// Grid coordinate of the node.
    #[must_use]
    pub fn coord(&self, node: NodeId) -> Option<CellCoord> {
        if node.index() >= self.nodes.len() || self.columns == 0 {
            return None;
        }
        Some(CellCoord::new(
            node.get() % self.columns,
            node.get() / self.columns,
        ))
    }

    /// Draw-space position of the node.
    #[must_use]
    pub fn position(&self, node: NodeId) -> Option<Position> {
        self.node(node).map(Node::position)
    }

    /// Number of edges attached to the node; unknown nodes report zero.
    #[must_use]
    pub fn degree(&self, node: NodeId) -> usize {
        self.node(node).map_or(0, Node::degree)
    }

    /// Node that sits next to `node` in the direction, ignoring edges.
    ///
    /// Returns `None` when the step would leave the grid.
    #[must_use]
    pub fn structural_neighbor(&self, node: NodeId, direction: Direction) -> Option<NodeId> {
        let coord = self.coord(node)?;
        let (column, row) = (coord.column(), coord.row());
        let neighbor = match direction {
            Direction::North if row > 0 => CellCoord::new(column, row - 1),
            Direction::South if row + 1 < self.rows => CellCoord::new(column, row + 1),
            Direction::West if column > 0 => CellCoord::new(column - 1, row),
            Direction::East if column + 1 < self.columns => CellCoord::new(column + 1, row),
            _ => return None,
        };
        self.node_at(neighbor)
    }

    /// Node reachable from `node` through an existing edge in the direction.
    #[must_use]
    pub fn neighbor_in_direction(&self, node: NodeId, direction: Direction) -> Option<NodeId> {
        if !self.node(node)?.has_edge(direction) {
            return None;
        }
        self.structural_neighbor(node, direction)
    }

    /// Reports whether a new edge may be laid from `node` in the direction.
    ///
    /// The far endpoint must exist on the grid and the edge must be absent.
    #[must_use]
    pub fn can_place_edge(&self, node: NodeId, direction: Direction) -> bool {
        let Some(current) = self.node(node) else {
            return false;
        };
        !current.has_edge(direction) && self.structural_neighbor(node, direction).is_some()
    }

    /// Every node reachable from `node` through a single existing edge.
    pub fn neighbors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(move |direction| self.neighbor_in_direction(node, direction))
    }

    /// Direction leading from `from` to the structurally adjacent `to`.
    #[must_use]
    pub fn direction_between(&self, from: NodeId, to: NodeId) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|direction| self.structural_neighbor(from, *direction) == Some(to))
    }

    /// Every existing edge, reported once with its lower-indexed endpoint first.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.node_ids().flat_map(move |node| {
            [Direction::East, Direction::South]
                .into_iter()
                .filter_map(move |direction| self.neighbor_in_direction(node, direction))
                .map(move |neighbor| (node, neighbor))
        })
    }

    /// Sets or clears the edge leaving `node` in the direction on both endpoints.
    ///
    /// Returns the far endpoint, or `None` without touching either node when
    /// the direction leads off the grid.
    pub(crate) fn set_edge(
        &mut self,
        node: NodeId,
        direction: Direction,
        present: bool,
    ) -> Option<NodeId> {
        let neighbor = self.structural_neighbor(node, direction)?;
        self.nodes[node.index()].edges.set(direction, present);
        self.nodes[neighbor.index()]
            .edges
            .set(direction.opposite(), present);
        Some(neighbor)
    }
}
