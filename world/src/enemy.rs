//! Random-walking enemies with decaying life.

use graph_chase_core::{EnemyId, EnemySnapshot, Event, NodeId, Position};
use rand::{seq::SliceRandom, Rng};
use tracing::debug;

use crate::{graph::Graph, motion::Motion, WorldError};

/// Life an enemy starts with and is restored to by a rescue.
pub const ENEMY_MAX_LIFE: u32 = 25;

/// Distance below which a peer restores an enemy's life.
pub const RESCUE_RADIUS: f32 = 25.0;

/// Position of an enemy captured before the enemy phase of a tick.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Sighting {
    pub(crate) enemy: EnemyId,
    pub(crate) position: Position,
}

#[derive(Clone, Debug)]
pub(crate) struct Enemy {
    id: EnemyId,
    motion: Motion,
    life: u32,
    max_life: u32,
    alive: bool,
}

impl Enemy {
    pub(crate) fn new(id: EnemyId, node: NodeId, position: Position, speed: f32) -> Self {
        Self {
            id,
            motion: Motion::at(node, position, speed),
            life: ENEMY_MAX_LIFE,
            max_life: ENEMY_MAX_LIFE,
            alive: true,
        }
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.alive
    }

    pub(crate) fn sighting(&self) -> Sighting {
        Sighting {
            enemy: self.id,
            position: self.motion.position(),
        }
    }

    pub(crate) fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            node: self.motion.current(),
            destination: self.motion.destination(),
            position: self.motion.position(),
            life: self.life,
            max_life: self.max_life,
        }
    }

    /// Runs one tick of the enemy's state machine.
    ///
    /// Life decays whenever the enemy rests on a node; a peer in `peers`
    /// within [`RESCUE_RADIUS`] restores it before death is decided. A living
    /// enemy at rest then heads for a uniformly chosen neighbor.
    pub(crate) fn update<R>(
        &mut self,
        graph: &Graph,
        peers: &[Sighting],
        rng: &mut R,
        out_events: &mut Vec<Event>,
    ) -> Result<(), WorldError>
    where
        R: Rng + ?Sized,
    {
        if !self.alive {
            return Ok(());
        }

        let at_node = self.motion.is_at_node();
        if at_node {
            self.life = self.life.saturating_sub(1);
        }

        self.apply_rescue(peers, out_events);

        if at_node {
            let node = self.motion.current();
            if self.life == 0 {
                self.alive = false;
                debug!(enemy = self.id.get(), node = node.get(), "enemy_died");
                out_events.push(Event::EnemyDied {
                    enemy: self.id,
                    node,
                });
                return Ok(());
            }

            let candidates: Vec<NodeId> = graph.neighbors(node).collect();
            let Some(&next) = candidates.choose(rng) else {
                return Err(WorldError::StrandedNode { node });
            };
            let direction = graph
                .direction_between(node, next)
                .ok_or(WorldError::StrandedNode { node })?;
            let _ = self.motion.begin_travel(graph, next, direction);
        }

        let _ = self.motion.advance();
        Ok(())
    }

    fn apply_rescue(&mut self, peers: &[Sighting], out_events: &mut Vec<Event>) {
        let position = self.motion.position();
        let rescued = peers.iter().any(|peer| {
            peer.enemy != self.id && peer.position.distance(position) < RESCUE_RADIUS
        });
        if !rescued {
            return;
        }

        if self.life != self.max_life {
            debug!(enemy = self.id.get(), life = self.life, "enemy_rescued");
            out_events.push(Event::EnemyRescued { enemy: self.id });
        }
        self.life = self.max_life;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use graph_chase_core::{CellCoord, Direction};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn spawn(graph: &Graph, id: u32, column: u32, row: u32, speed: f32) -> Enemy {
        let node = graph.node_at(CellCoord::new(column, row)).unwrap();
        Enemy::new(
            EnemyId::new(id),
            node,
            graph.position(node).unwrap(),
            speed,
        )
    }

    fn sightings(enemies: &[&Enemy]) -> Vec<Sighting> {
        enemies.iter().map(|enemy| enemy.sighting()).collect()
    }

    #[test]
    fn first_decision_decrements_life_and_walks_to_a_neighbor() {
        let graph = Graph::lattice(4, 4, 100.0);
        let mut enemy = spawn(&graph, 0, 1, 1, 1.2);
        let start = enemy.snapshot().node;
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut events = Vec::new();

        enemy
            .update(&graph, &[], &mut rng, &mut events)
            .expect("lattice has neighbors");
        let snapshot = enemy.snapshot();
        let destination = snapshot.destination.expect("enemy left its node");
        assert_eq!(snapshot.life, ENEMY_MAX_LIFE - 1);
        assert!(graph.neighbors(start).any(|node| node == destination));

        for _ in 1..83 {
            enemy.update(&graph, &[], &mut rng, &mut events).unwrap();
        }
        assert_eq!(enemy.snapshot().destination, Some(destination));

        enemy.update(&graph, &[], &mut rng, &mut events).unwrap();
        let snapshot = enemy.snapshot();
        assert_eq!(snapshot.destination, None);
        assert_eq!(snapshot.node, destination);
        assert_eq!(snapshot.position, graph.position(destination).unwrap());
        assert_eq!(snapshot.life, ENEMY_MAX_LIFE - 1);
        assert!(events.is_empty());
    }

    #[test]
    fn walk_choices_cover_every_neighbor() {
        let graph = Graph::lattice(3, 3, 100.0);
        let centre = graph.node_at(CellCoord::new(1, 1)).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut seen = std::collections::BTreeSet::new();

        for _ in 0..200 {
            let mut enemy = spawn(&graph, 0, 1, 1, 1.0);
            enemy.update(&graph, &[], &mut rng, &mut Vec::new()).unwrap();
            let _ = seen.insert(enemy.snapshot().destination.unwrap());
        }

        let expected: std::collections::BTreeSet<NodeId> = graph.neighbors(centre).collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn enemy_dies_when_life_runs_out_at_a_node() {
        let graph = Graph::lattice(2, 1, 1.0);
        let mut enemy = spawn(&graph, 4, 0, 0, 1.0);
        enemy.life = 1;
        let mut events = Vec::new();

        enemy
            .update(&graph, &[], &mut ChaCha8Rng::seed_from_u64(0), &mut events)
            .unwrap();

        assert!(!enemy.is_alive());
        assert_eq!(enemy.snapshot().destination, None);
        assert_eq!(
            events,
            vec![Event::EnemyDied {
                enemy: EnemyId::new(4),
                node: NodeId::new(0),
            }]
        );
    }

    #[test]
    fn nearby_peers_rescue_each_other_at_the_decrement_point() {
        let graph = Graph::lattice(3, 3, 100.0);
        let mut first = spawn(&graph, 0, 1, 1, 1.0);
        let mut second = spawn(&graph, 1, 1, 1, 1.0);
        first.life = 1;
        second.life = 1;
        let peers = sightings(&[&first, &second]);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut events = Vec::new();

        first.update(&graph, &peers, &mut rng, &mut events).unwrap();
        second.update(&graph, &peers, &mut rng, &mut events).unwrap();

        for enemy in [&first, &second] {
            assert!(enemy.is_alive());
            assert_eq!(enemy.snapshot().life, ENEMY_MAX_LIFE);
        }
        assert_eq!(
            events,
            vec![
                Event::EnemyRescued {
                    enemy: EnemyId::new(0)
                },
                Event::EnemyRescued {
                    enemy: EnemyId::new(1)
                },
            ]
        );
    }

    #[test]
    fn rescue_at_full_life_is_idempotent() {
        let graph = Graph::lattice(3, 3, 100.0);
        let mut enemy = spawn(&graph, 0, 1, 1, 1.0);
        let peer = spawn(&graph, 1, 1, 1, 1.0);
        let begin = enemy.motion.begin_travel(
            &graph,
            graph.node_at(CellCoord::new(2, 1)).unwrap(),
            Direction::East,
        );
        assert!(begin);
        let mut events = Vec::new();

        enemy
            .update(
                &graph,
                &sightings(&[&peer]),
                &mut ChaCha8Rng::seed_from_u64(1),
                &mut events,
            )
            .unwrap();

        assert_eq!(enemy.snapshot().life, ENEMY_MAX_LIFE);
        assert!(events.is_empty());
    }

    #[test]
    fn an_enemy_does_not_rescue_itself() {
        let graph = Graph::lattice(3, 3, 100.0);
        let mut enemy = spawn(&graph, 0, 1, 1, 1.0);
        let peers = sightings(&[&enemy]);

        enemy
            .update(&graph, &peers, &mut ChaCha8Rng::seed_from_u64(1), &mut Vec::new())
            .unwrap();

        assert_eq!(enemy.snapshot().life, ENEMY_MAX_LIFE - 1);
    }

    #[test]
    fn distant_peers_do_not_rescue() {
        let graph = Graph::lattice(3, 3, 100.0);
        let mut enemy = spawn(&graph, 0, 0, 0, 1.0);
        let peer = spawn(&graph, 1, 1, 0, 1.0);

        enemy
            .update(
                &graph,
                &sightings(&[&peer]),
                &mut ChaCha8Rng::seed_from_u64(1),
                &mut Vec::new(),
            )
            .unwrap();

        assert_eq!(enemy.snapshot().life, ENEMY_MAX_LIFE - 1);
    }

    #[test]
    fn isolated_node_is_an_invariant_violation() {
        let mut graph = Graph::lattice(2, 2, 1.0);
        let corner = graph.node_at(CellCoord::new(0, 0)).unwrap();
        let _ = graph.set_edge(corner, Direction::East, false);
        let _ = graph.set_edge(corner, Direction::South, false);
        let mut enemy = spawn(&graph, 0, 0, 0, 1.0);

        let result = enemy.update(
            &graph,
            &[],
            &mut ChaCha8Rng::seed_from_u64(9),
            &mut Vec::new(),
        );

        assert!(matches!(
            result,
            Err(WorldError::StrandedNode { node }) if node == corner
        ));
    }
}
