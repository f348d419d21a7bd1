//! Input-driven player agent and the edge pick-up/placement protocol.

use graph_chase_core::{Event, NodeId, PlayerInput, PlayerSnapshot, Position};
use tracing::debug;

use crate::{enemy::Sighting, graph::Graph, motion::Motion};

/// Distance covered by the player on every tick.
pub const PLAYER_SPEED: f32 = 2.0;

/// Distance below which an enemy catches the player.
pub const LETHAL_RADIUS: f32 = 3.0;

/// Request captured from input and consumed exactly once by a later tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum Latch {
    #[default]
    Idle,
    Pending,
}

impl Latch {
    fn raise(&mut self) {
        *self = Self::Pending;
    }

    fn is_pending(self) -> bool {
        self == Self::Pending
    }

    fn take(&mut self) -> bool {
        std::mem::take(self).is_pending()
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Player {
    motion: Motion,
    edge_tokens: u32,
    grab: Latch,
    place: Latch,
    alive: bool,
}

impl Player {
    pub(crate) fn new(node: NodeId, position: Position) -> Self {
        Self {
            motion: Motion::at(node, position, PLAYER_SPEED),
            edge_tokens: 0,
            grab: Latch::Idle,
            place: Latch::Idle,
            alive: true,
        }
    }

    pub(crate) fn node(&self) -> NodeId {
        self.motion.current()
    }

    pub(crate) fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            node: self.motion.current(),
            destination: self.motion.destination(),
            position: self.motion.position(),
            edge_tokens: self.edge_tokens,
            grab_pending: self.grab.is_pending(),
            place_pending: self.place.is_pending(),
            alive: self.alive,
        }
    }

    /// Runs one tick of the player's state machine.
    ///
    /// Movement and placement are only decided at rest; a grab is latched
    /// while en route and resolved on arrival. The graph is only touched
    /// through its symmetric edge toggle.
    pub(crate) fn update(
        &mut self,
        graph: &mut Graph,
        input: PlayerInput,
        enemies: &[Sighting],
        out_events: &mut Vec<Event>,
    ) {
        if !self.alive {
            return;
        }

        if self.motion.is_at_node() {
            self.steer(graph, input, out_events);
        } else if input.grab {
            self.grab.raise();
        }

        if let Some(traversal) = self.motion.advance() {
            out_events.push(Event::PlayerArrived {
                from: traversal.from,
                to: traversal.to,
            });

            if self.grab.take() {
                if graph.degree(traversal.from) >= 2 && graph.degree(traversal.to) >= 2 {
                    let _ = graph.set_edge(traversal.from, traversal.direction, false);
                    self.edge_tokens += 1;
                    debug!(
                        from = traversal.from.get(),
                        to = traversal.to.get(),
                        tokens = self.edge_tokens,
                        "edge_removed"
                    );
                    out_events.push(Event::EdgeRemoved {
                        from: traversal.from,
                        to: traversal.to,
                    });
                } else {
                    debug!(
                        from = traversal.from.get(),
                        to = traversal.to.get(),
                        "grab_dropped"
                    );
                    out_events.push(Event::GrabDropped {
                        from: traversal.from,
                        to: traversal.to,
                    });
                }
            }
        }

        let position = self.motion.position();
        if let Some(hunter) = enemies
            .iter()
            .find(|enemy| enemy.position.distance(position) < LETHAL_RADIUS)
        {
            self.alive = false;
            out_events.push(Event::PlayerCaught {
                enemy: hunter.enemy,
            });
        }
    }

    fn steer(&mut self, graph: &mut Graph, input: PlayerInput, out_events: &mut Vec<Event>) {
        if input.place {
            self.place.raise();
        }

        let Some(direction) = input.direction() else {
            return;
        };
        let from = self.motion.current();

        if let Some(to) = graph.neighbor_in_direction(from, direction) {
            if self.motion.begin_travel(graph, to, direction) {
                out_events.push(Event::PlayerDeparted { from, to });
            }
            return;
        }

        let affordable = self.place.is_pending() && self.edge_tokens > 0;
        if !affordable || !graph.can_place_edge(from, direction) {
            return;
        }
        let Some(to) = graph.set_edge(from, direction, true) else {
            return;
        };

        self.edge_tokens -= 1;
        let _ = self.place.take();
        debug!(
            from = from.get(),
            to = to.get(),
            tokens = self.edge_tokens,
            "edge_placed"
        );
        out_events.push(Event::EdgePlaced { from, to });
        if self.motion.begin_travel(graph, to, direction) {
            out_events.push(Event::PlayerDeparted { from, to });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use graph_chase_core::{CellCoord, Direction, EnemyId};

    fn player_at(graph: &Graph, column: u32, row: u32) -> Player {
        let node = graph.node_at(CellCoord::new(column, row)).unwrap();
        Player::new(node, graph.position(node).unwrap())
    }

    fn node(graph: &Graph, column: u32, row: u32) -> NodeId {
        graph.node_at(CellCoord::new(column, row)).unwrap()
    }

    fn held(direction: Direction, grab: bool, place: bool) -> PlayerInput {
        PlayerInput {
            grab,
            place,
            ..PlayerInput::toward(direction)
        }
    }

    /// Drives the player until it rests again, collecting the emitted events.
    fn walk(graph: &mut Graph, player: &mut Player, input: PlayerInput) -> Vec<Event> {
        let mut events = Vec::new();
        player.update(graph, input, &[], &mut events);
        while !player.motion.is_at_node() {
            let carry = PlayerInput {
                grab: input.grab,
                ..PlayerInput::default()
            };
            player.update(graph, carry, &[], &mut events);
        }
        events
    }

    #[test]
    fn place_with_existing_edge_moves_normally() {
        let mut graph = Graph::lattice(3, 3, 100.0);
        let mut player = player_at(&graph, 1, 1);
        let mut events = Vec::new();

        let place = PlayerInput {
            place: true,
            ..PlayerInput::default()
        };
        player.update(&mut graph, place, &[], &mut events);
        player.update(&mut graph, PlayerInput::toward(Direction::East), &[], &mut events);

        let snapshot = player.snapshot();
        assert_eq!(snapshot.destination, Some(node(&graph, 2, 1)));
        assert_eq!(snapshot.edge_tokens, 0);
        assert!(snapshot.place_pending);
        assert_eq!(
            events,
            vec![Event::PlayerDeparted {
                from: node(&graph, 1, 1),
                to: node(&graph, 2, 1),
            }]
        );
        assert_eq!(graph.edges().count(), 12);
    }

    #[test]
    fn grab_removes_traversed_edge_and_earns_token() {
        let mut graph = Graph::lattice(3, 3, 100.0);
        let mut player = player_at(&graph, 1, 1);
        let from = node(&graph, 1, 1);
        let to = node(&graph, 2, 1);

        let events = walk(&mut graph, &mut player, held(Direction::East, true, false));

        assert_eq!(player.snapshot().edge_tokens, 1);
        assert!(!player.snapshot().grab_pending);
        assert_eq!(graph.neighbor_in_direction(from, Direction::East), None);
        assert_eq!(graph.neighbor_in_direction(to, Direction::West), None);
        assert_eq!(events.last(), Some(&Event::EdgeRemoved { from, to }));
    }

    #[test]
    fn single_grab_press_en_route_is_applied_on_arrival() {
        let mut graph = Graph::lattice(3, 3, 100.0);
        let mut player = player_at(&graph, 1, 1);
        let from = node(&graph, 1, 1);
        let to = node(&graph, 2, 1);
        let mut events = Vec::new();

        player.update(&mut graph, PlayerInput::toward(Direction::East), &[], &mut events);
        let grab = PlayerInput {
            grab: true,
            ..PlayerInput::default()
        };
        player.update(&mut graph, grab, &[], &mut events);
        assert!(player.snapshot().grab_pending);

        while !player.motion.is_at_node() {
            player.update(&mut graph, PlayerInput::default(), &[], &mut events);
        }

        assert_eq!(player.snapshot().edge_tokens, 1);
        assert!(!player.snapshot().grab_pending);
        assert_eq!(graph.neighbor_in_direction(from, Direction::East), None);
        assert_eq!(events.last(), Some(&Event::EdgeRemoved { from, to }));
    }

    #[test]
    fn grab_is_not_latched_while_standing_still() {
        let mut graph = Graph::lattice(3, 3, 100.0);
        let mut player = player_at(&graph, 1, 1);

        let grab = PlayerInput {
            grab: true,
            ..PlayerInput::default()
        };
        player.update(&mut graph, grab, &[], &mut Vec::new());

        assert!(!player.snapshot().grab_pending);
    }

    #[test]
    fn grab_that_would_strand_the_departed_node_is_dropped() {
        let mut graph = Graph::lattice(3, 3, 100.0);
        let corner = node(&graph, 0, 0);
        let right = node(&graph, 1, 0);
        let _ = graph.set_edge(corner, Direction::South, false);
        assert_eq!(graph.degree(corner), 1);
        let mut player = player_at(&graph, 0, 0);

        let events = walk(&mut graph, &mut player, held(Direction::East, true, false));

        assert_eq!(player.snapshot().edge_tokens, 0);
        assert_eq!(graph.neighbor_in_direction(corner, Direction::East), Some(right));
        assert_eq!(
            events.last(),
            Some(&Event::GrabDropped {
                from: corner,
                to: right,
            })
        );
    }

    #[test]
    fn grab_that_would_strand_the_arrival_node_is_dropped() {
        let mut graph = Graph::lattice(3, 3, 100.0);
        let corner = node(&graph, 2, 2);
        let _ = graph.set_edge(corner, Direction::West, false);
        let mut player = player_at(&graph, 2, 1);

        let _ = walk(&mut graph, &mut player, held(Direction::South, true, false));

        assert_eq!(player.snapshot().edge_tokens, 0);
        assert_eq!(graph.degree(corner), 1);
    }

    #[test]
    fn placement_spends_a_token_and_travels_the_new_edge() {
        let mut graph = Graph::lattice(3, 3, 100.0);
        let mut player = player_at(&graph, 1, 1);
        let centre = node(&graph, 1, 1);
        let east = node(&graph, 2, 1);

        let _ = walk(&mut graph, &mut player, held(Direction::East, true, false));
        let _ = walk(&mut graph, &mut player, PlayerInput::toward(Direction::South));
        let _ = walk(&mut graph, &mut player, PlayerInput::toward(Direction::West));
        let _ = walk(&mut graph, &mut player, PlayerInput::toward(Direction::North));
        assert_eq!(player.node(), centre);
        assert_eq!(player.snapshot().edge_tokens, 1);

        let mut events = Vec::new();
        player.update(&mut graph, held(Direction::East, false, true), &[], &mut events);

        let snapshot = player.snapshot();
        assert_eq!(snapshot.edge_tokens, 0);
        assert!(!snapshot.place_pending);
        assert_eq!(snapshot.destination, Some(east));
        assert_eq!(graph.neighbor_in_direction(east, Direction::West), Some(centre));
        assert_eq!(
            events,
            vec![
                Event::EdgePlaced {
                    from: centre,
                    to: east,
                },
                Event::PlayerDeparted {
                    from: centre,
                    to: east,
                },
            ]
        );
    }

    #[test]
    fn placement_without_tokens_is_ignored() {
        let mut graph = Graph::lattice(3, 3, 100.0);
        let centre = node(&graph, 1, 1);
        let _ = graph.set_edge(centre, Direction::East, false);
        let mut player = player_at(&graph, 1, 1);
        let mut events = Vec::new();

        player.update(&mut graph, held(Direction::East, false, true), &[], &mut events);

        assert!(events.is_empty());
        assert!(player.motion.is_at_node());
        assert!(player.snapshot().place_pending);
        assert!(graph.can_place_edge(centre, Direction::East));
    }

    #[test]
    fn placement_off_the_grid_is_ignored() {
        let mut graph = Graph::lattice(2, 2, 100.0);
        let mut player = player_at(&graph, 0, 0);
        player.edge_tokens = 3;
        let mut events = Vec::new();

        player.update(&mut graph, held(Direction::North, false, true), &[], &mut events);

        assert!(events.is_empty());
        assert_eq!(player.snapshot().edge_tokens, 3);
    }

    #[test]
    fn enemy_within_lethal_radius_catches_player() {
        let mut graph = Graph::lattice(2, 2, 100.0);
        let mut player = player_at(&graph, 0, 0);
        let position = player.snapshot().position;
        let enemies = [Sighting {
            enemy: EnemyId::new(2),
            position: Position::new(position.x() + 2.5, position.y()),
        }];
        let mut events = Vec::new();

        player.update(&mut graph, PlayerInput::default(), &enemies, &mut events);
        assert!(!player.snapshot().alive);
        assert_eq!(
            events,
            vec![Event::PlayerCaught {
                enemy: EnemyId::new(2)
            }]
        );

        player.update(&mut graph, PlayerInput::toward(Direction::East), &[], &mut events);
        assert!(player.motion.is_at_node());
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn enemy_outside_lethal_radius_is_harmless() {
        let mut graph = Graph::lattice(2, 2, 100.0);
        let mut player = player_at(&graph, 0, 0);
        let position = player.snapshot().position;
        let enemies = [Sighting {
            enemy: EnemyId::new(0),
            position: Position::new(position.x(), position.y() + 3.0),
        }];

        player.update(&mut graph, PlayerInput::default(), &enemies, &mut Vec::new());

        assert!(player.snapshot().alive);
    }

    #[test]
    fn latch_is_consumed_once() {
        let mut latch = Latch::default();
        assert!(!latch.take());
        latch.raise();
        latch.raise();
        assert!(latch.take());
        assert!(!latch.take());
    }
}
