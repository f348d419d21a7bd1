#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Graph Chase.
//!
//! The world owns the level's [`Graph`], the player and the enemies. Every
//! mutation flows through [`apply`]; within a tick the player moves (and may
//! reshape the graph) before any enemy, and enemies that died are only
//! removed once every enemy has updated.

mod enemy;
mod graph;
mod motion;
mod player;

use graph_chase_core::{
    CellCoord, Command, EnemyId, Event, LevelConfig, NodeId, PlayerInput, WELCOME_BANNER,
};
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use tracing::info;

pub use enemy::{ENEMY_MAX_LIFE, RESCUE_RADIUS};
pub use graph::{Graph, Node};
pub use player::{LETHAL_RADIUS, PLAYER_SPEED};

use enemy::{Enemy, Sighting};
use player::Player;

/// Slowest speed assigned to an enemy spawned with the level.
pub const ENEMY_MIN_SPEED: f32 = 1.0;

/// Exclusive upper bound of the speed assigned to an enemy spawned with the level.
pub const ENEMY_MAX_SPEED: f32 = 1.6;

/// Failures surfaced by [`apply`].
#[derive(Clone, Debug, PartialEq, Error)]
pub enum WorldError {
    /// A node lost every edge, leaving an agent resting on it with nowhere to go.
    #[error("node {} has no remaining edges", node.get())]
    StrandedNode {
        /// Node whose degree dropped to zero.
        node: NodeId,
    },
    /// The level configuration cannot produce a connected graph.
    #[error("invalid level: {reason}")]
    InvalidLevel {
        /// Human readable explanation of the rejected parameter.
        reason: &'static str,
    },
    /// A command referenced a node outside the graph.
    #[error("node {} is outside the graph", node.get())]
    UnknownNode {
        /// Node that was requested.
        node: NodeId,
    },
    /// A spawn requested a speed that is not a positive finite number.
    #[error("enemy speed {speed} must be positive and finite")]
    InvalidSpeed {
        /// Speed that was requested.
        speed: f32,
    },
}

/// Represents the authoritative Graph Chase world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    config: LevelConfig,
    graph: Graph,
    player: Player,
    enemies: Vec<Enemy>,
    rng: ChaCha8Rng,
    next_enemy_id: u32,
    tick_index: u64,
}

impl World {
    /// Creates a world populated with the default level.
    #[must_use]
    pub fn new() -> Self {
        let config = LevelConfig::default();
        let graph = Graph::lattice(config.columns, config.rows, config.cell_length);
        let player = spawn_player(&graph);
        let mut world = Self {
            banner: WELCOME_BANNER,
            config,
            graph,
            player,
            enemies: Vec::new(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            next_enemy_id: 0,
            tick_index: 0,
        };
        world.populate_enemies(&mut Vec::new());
        world
    }

    fn configure(
        &mut self,
        config: LevelConfig,
        out_events: &mut Vec<Event>,
    ) -> Result<(), WorldError> {
        validate_level(&config)?;

        self.graph = Graph::lattice(config.columns, config.rows, config.cell_length);
        self.player = spawn_player(&self.graph);
        self.enemies.clear();
        self.rng = ChaCha8Rng::seed_from_u64(config.seed);
        self.next_enemy_id = 0;
        self.tick_index = 0;
        self.config = config;

        info!(
            columns = config.columns,
            rows = config.rows,
            enemies = config.enemy_count,
            seed = config.seed,
            "level_configured"
        );
        out_events.push(Event::LevelConfigured { config });
        self.populate_enemies(out_events);
        Ok(())
    }

    /// Scatters the configured enemies over nodes that are neither the
    /// player's node nor structurally adjacent to it.
    fn populate_enemies(&mut self, out_events: &mut Vec<Event>) {
        let start = self.player.node();
        let Some(start_cell) = self.graph.coord(start) else {
            return;
        };

        let mut candidates: Vec<NodeId> = self
            .graph
            .node_ids()
            .filter(|node| {
                self.graph
                    .coord(*node)
                    .map_or(false, |cell| cell.manhattan_distance(start_cell) > 1)
            })
            .collect();
        candidates.shuffle(&mut self.rng);

        let count = usize::try_from(self.config.enemy_count).unwrap_or(usize::MAX);
        for node in candidates.into_iter().take(count) {
            let speed = self.rng.gen_range(ENEMY_MIN_SPEED..ENEMY_MAX_SPEED);
            self.spawn_enemy(node, speed, out_events);
        }
    }

    fn spawn_enemy(&mut self, node: NodeId, speed: f32, out_events: &mut Vec<Event>) {
        let Some(position) = self.graph.position(node) else {
            return;
        };
        let id = EnemyId::new(self.next_enemy_id);
        self.next_enemy_id = self.next_enemy_id.saturating_add(1);
        self.enemies.push(Enemy::new(id, node, position, speed));
        out_events.push(Event::EnemySpawned { enemy: id, node });
    }

    fn tick(&mut self, input: PlayerInput, out_events: &mut Vec<Event>) -> Result<(), WorldError> {
        self.tick_index = self.tick_index.saturating_add(1);
        out_events.push(Event::TimeAdvanced {
            tick: self.tick_index,
        });

        // The player moves first and never displaces enemies, so one snapshot
        // serves both the lethal check and the enemies' rescue checks.
        let sightings: Vec<Sighting> = self.enemies.iter().map(Enemy::sighting).collect();
        self.player
            .update(&mut self.graph, input, &sightings, out_events);

        for enemy in &mut self.enemies {
            enemy.update(&self.graph, &sightings, &mut self.rng, out_events)?;
        }
        self.enemies.retain(Enemy::is_alive);
        Ok(())
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// # Errors
///
/// Returns [`WorldError::StrandedNode`] when an enemy rests on a node without
/// edges, which leaves the level in an unrecoverable state. Setup commands
/// report invalid parameters without touching the current level.
pub fn apply(
    world: &mut World,
    command: Command,
    out_events: &mut Vec<Event>,
) -> Result<(), WorldError> {
    match command {
        Command::ConfigureLevel { config } => world.configure(config, out_events),
        Command::SpawnEnemy { node, speed } => {
            if world.graph.node(node).is_none() {
                return Err(WorldError::UnknownNode { node });
            }
            if !speed.is_finite() || speed <= 0.0 {
                return Err(WorldError::InvalidSpeed { speed });
            }
            world.spawn_enemy(node, speed, out_events);
            Ok(())
        }
        Command::Tick { input } => world.tick(input, out_events),
    }
}

fn validate_level(config: &LevelConfig) -> Result<(), WorldError> {
    if config.columns == 0 || config.rows == 0 {
        return Err(WorldError::InvalidLevel {
            reason: "grid dimensions must be positive",
        });
    }
    if u64::from(config.columns) * u64::from(config.rows) < 2 {
        return Err(WorldError::InvalidLevel {
            reason: "grid needs at least two nodes",
        });
    }
    if u64::from(config.columns) * u64::from(config.rows) > u64::from(u32::MAX) {
        return Err(WorldError::InvalidLevel {
            reason: "grid exceeds the node index range",
        });
    }
    if !config.cell_length.is_finite() || config.cell_length <= 0.0 {
        return Err(WorldError::InvalidLevel {
            reason: "cell length must be positive and finite",
        });
    }
    Ok(())
}

fn spawn_player(graph: &Graph) -> Player {
    let centre = graph
        .node_at(CellCoord::new(graph.columns() / 2, graph.rows() / 2))
        .unwrap_or(NodeId::new(0));
    let position = graph.position(centre).unwrap_or_default();
    Player::new(centre, position)
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use graph_chase_core::{EnemyView, LevelConfig, PlayerSnapshot};

    use super::{Enemy, Graph, World};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Configuration the current level was built from.
    #[must_use]
    pub fn level_config(world: &World) -> LevelConfig {
        world.config
    }

    /// Provides read-only access to the level's graph.
    #[must_use]
    pub fn graph(world: &World) -> &Graph {
        &world.graph
    }

    /// Number of ticks simulated since the level was configured.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Captures the player's current state.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        world.player.snapshot()
    }

    /// Captures a read-only view of the enemies still in play.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(world.enemies.iter().map(Enemy::snapshot).collect())
    }
}
