#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Graph Chase engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams and query
//! immutable snapshots such as [`PlayerSnapshot`] and [`EnemyView`].

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Graph Chase.";

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Discards the current level and builds a fresh one from the configuration.
    ConfigureLevel {
        /// Dimensions, spacing, enemy count and seed of the new level.
        config: LevelConfig,
    },
    /// Adds an enemy resting on the provided node.
    SpawnEnemy {
        /// Node the enemy occupies when it appears.
        node: NodeId,
        /// Distance covered by the enemy on every tick.
        speed: f32,
    },
    /// Advances the simulation by a single fixed tick.
    Tick {
        /// Keys held by the player while the tick was sampled.
        input: PlayerInput,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Announces that a new level replaced the previous one.
    LevelConfigured {
        /// Configuration the level was built from.
        config: LevelConfig,
    },
    /// Confirms that an enemy entered the level.
    EnemySpawned {
        /// Identifier allocated to the enemy.
        enemy: EnemyId,
        /// Node the enemy rests on.
        node: NodeId,
    },
    /// Indicates that the simulation clock advanced by one tick.
    TimeAdvanced {
        /// Index of the tick that was just simulated.
        tick: u64,
    },
    /// Reports that the player left a node along an edge.
    PlayerDeparted {
        /// Node the player left.
        from: NodeId,
        /// Node the player is travelling toward.
        to: NodeId,
    },
    /// Reports that the player landed on a node.
    PlayerArrived {
        /// Node the player left.
        from: NodeId,
        /// Node the player now occupies.
        to: NodeId,
    },
    /// Confirms that the player picked up the edge it just traversed.
    EdgeRemoved {
        /// Endpoint the player departed from.
        from: NodeId,
        /// Endpoint the player arrived at.
        to: NodeId,
    },
    /// Confirms that the player laid down a new edge.
    EdgePlaced {
        /// Endpoint the player stood on.
        from: NodeId,
        /// Endpoint on the far side of the new edge.
        to: NodeId,
    },
    /// Reports that a latched grab was discarded because an endpoint would be stranded.
    GrabDropped {
        /// Endpoint the player departed from.
        from: NodeId,
        /// Endpoint the player arrived at.
        to: NodeId,
    },
    /// Reports that an enemy's life was restored by a nearby peer.
    EnemyRescued {
        /// Identifier of the rescued enemy.
        enemy: EnemyId,
    },
    /// Reports that an enemy ran out of life and left the level.
    EnemyDied {
        /// Identifier of the enemy that died.
        enemy: EnemyId,
        /// Node the enemy occupied when it died.
        node: NodeId,
    },
    /// Reports that an enemy touched the player.
    PlayerCaught {
        /// Identifier of the enemy that caught the player.
        enemy: EnemyId,
    },
}

/// Cardinal directions along which edges run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// Every direction in flag order.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Returns the direction pointing the other way along the same axis.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }
}

/// Index of a node inside the row-major graph arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(u32);

impl NodeId {
    /// Creates a new node identifier with the provided arena index.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric arena index.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Arena index widened for slice access.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single node expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }
}

/// Point in draw space measured in world units.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
    x: f32,
    y: f32,
}

impl Position {
    /// Creates a position from explicit coordinates.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical coordinate, growing downward.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Euclidean distance between two positions.
    #[must_use]
    pub fn distance(self, other: Position) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Parameters supplied once when a level starts.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    /// Number of node columns.
    pub columns: u32,
    /// Number of node rows.
    pub rows: u32,
    /// Distance between structurally adjacent nodes in world units.
    pub cell_length: f32,
    /// Number of enemies spawned with the level.
    pub enemy_count: u32,
    /// Seed feeding the level's random source.
    pub seed: u64,
}

impl LevelConfig {
    /// Seed used when no explicit seed is supplied.
    pub const DEFAULT_SEED: u64 = 0x42f0_e1eb_d4a5_3c21;

    /// Total width of the level measured in world units.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.columns as f32 * self.cell_length
    }

    /// Total height of the level measured in world units.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.rows as f32 * self.cell_length
    }
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            columns: 6,
            rows: 6,
            cell_length: 100.0,
            enemy_count: 4,
            seed: Self::DEFAULT_SEED,
        }
    }
}

/// Keys held by the player during a tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlayerInput {
    /// Whether the north movement key is held.
    pub north: bool,
    /// Whether the east movement key is held.
    pub east: bool,
    /// Whether the south movement key is held.
    pub south: bool,
    /// Whether the west movement key is held.
    pub west: bool,
    /// Whether the edge pick-up key is held.
    pub grab: bool,
    /// Whether the edge placement key is held.
    pub place: bool,
}

impl PlayerInput {
    /// Input holding a single movement key.
    #[must_use]
    pub fn toward(direction: Direction) -> Self {
        let mut input = Self::default();
        match direction {
            Direction::North => input.north = true,
            Direction::East => input.east = true,
            Direction::South => input.south = true,
            Direction::West => input.west = true,
        }
        input
    }

    /// Requested movement direction.
    ///
    /// When several movement keys are held, north wins over south, south over
    /// west, and west over east.
    #[must_use]
    pub const fn direction(&self) -> Option<Direction> {
        if self.north {
            Some(Direction::North)
        } else if self.south {
            Some(Direction::South)
        } else if self.west {
            Some(Direction::West)
        } else if self.east {
            Some(Direction::East)
        } else {
            None
        }
    }
}

/// Immutable representation of the player's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerSnapshot {
    /// Node the player occupies or most recently departed.
    pub node: NodeId,
    /// Node the player is travelling toward, if en route.
    pub destination: Option<NodeId>,
    /// Current draw-space position.
    pub position: Position,
    /// Edges available for placement.
    pub edge_tokens: u32,
    /// Whether a grab is latched and waiting for arrival.
    pub grab_pending: bool,
    /// Whether a placement is latched and waiting for a legal direction.
    pub place_pending: bool,
    /// Whether the player is still in play.
    pub alive: bool,
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Node the enemy occupies or most recently departed.
    pub node: NodeId,
    /// Node the enemy is travelling toward, if en route.
    pub destination: Option<NodeId>,
    /// Current draw-space position.
    pub position: Position,
    /// Remaining life.
    pub life: u32,
    /// Life restored by a rescue.
    pub max_life: u32,
}

/// Read-only snapshot describing all enemies within the level.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Number of enemies captured in the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether every enemy is gone.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}
