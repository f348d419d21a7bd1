//! Interpolated travel between graph nodes shared by every agent.

use graph_chase_core::{Direction, NodeId, Position};

use crate::graph::Graph;

const AXES: usize = 2;

/// Completed walk along a single edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Traversal {
    pub(crate) from: NodeId,
    pub(crate) to: NodeId,
    pub(crate) direction: Direction,
}

#[derive(Clone, Debug)]
struct Leg {
    from: NodeId,
    destination: NodeId,
    direction: Direction,
    target: [f32; AXES],
    remaining: [f32; AXES],
}

/// Position and travel state of an agent snapped to the graph at rest.
///
/// An agent without a leg rests on `current`; with a leg it is en route and
/// each axis keeps its own signed remaining offset.
#[derive(Clone, Debug)]
pub(crate) struct Motion {
    current: NodeId,
    position: [f32; AXES],
    speed: f32,
    leg: Option<Leg>,
}

impl Motion {
    pub(crate) fn at(node: NodeId, position: Position, speed: f32) -> Self {
        Self {
            current: node,
            position: [position.x(), position.y()],
            speed,
            leg: None,
        }
    }

    pub(crate) fn current(&self) -> NodeId {
        self.current
    }

    pub(crate) fn destination(&self) -> Option<NodeId> {
        self.leg.as_ref().map(|leg| leg.destination)
    }

    pub(crate) fn is_at_node(&self) -> bool {
        self.leg.is_none()
    }

    pub(crate) fn position(&self) -> Position {
        Position::new(self.position[0], self.position[1])
    }

    /// Starts walking toward `destination`; ignored while already en route.
    ///
    /// Returns whether a leg was started.
    pub(crate) fn begin_travel(
        &mut self,
        graph: &Graph,
        destination: NodeId,
        direction: Direction,
    ) -> bool {
        if self.leg.is_some() || destination == self.current {
            return false;
        }
        let Some(target) = graph.position(destination) else {
            return false;
        };

        let target = [target.x(), target.y()];
        let remaining = [
            target[0] - self.position[0],
            target[1] - self.position[1],
        ];
        self.leg = Some(Leg {
            from: self.current,
            destination,
            direction,
            target,
            remaining,
        });
        true
    }

    /// Moves the agent by one tick and reports the traversal on arrival.
    ///
    /// Each axis steps by `speed` toward zero remaining offset; the final step
    /// is clamped so the axis lands exactly on the destination coordinate.
    pub(crate) fn advance(&mut self) -> Option<Traversal> {
        let leg = self.leg.as_mut()?;

        for axis in 0..AXES {
            let remaining = leg.remaining[axis];
            if remaining == 0.0 {
                continue;
            }
            if remaining.abs() <= self.speed {
                leg.remaining[axis] = 0.0;
                self.position[axis] = leg.target[axis];
            } else {
                let step = self.speed.copysign(remaining);
                leg.remaining[axis] = remaining - step;
                self.position[axis] += step;
            }
        }

        if leg.remaining.iter().any(|remaining| *remaining != 0.0) {
            return None;
        }

        let traversal = Traversal {
            from: leg.from,
            to: leg.destination,
            direction: leg.direction,
        };
        self.position = leg.target;
        self.current = leg.destination;
        self.leg = None;
        Some(traversal)
    }
}
