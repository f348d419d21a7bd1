//! Fixed-step session that drives the world, the referee and the scene.

use std::time::Duration;

use anyhow::{Context, Result};
use glam::Vec2;
use graph_chase_core::{Command, Event, LevelConfig, NodeId, PlayerInput};
use graph_chase_rendering::{
    enemy_color, Color, FrameInput, HudLine, Scene, SceneAgent, SceneEdge, SceneStyle,
};
use graph_chase_system_referee::{Outcome, Referee};
use graph_chase_world::{self as world, query, World};
use tracing::{error, info};

/// Duration of one simulation tick.
pub(crate) const TICK: Duration = Duration::from_nanos(16_666_667);

/// Most ticks simulated for a single rendered frame.
pub(crate) const MAX_TICKS_PER_FRAME: u32 = 8;

const HUD_TEXT_SCALE: f32 = 0.28;
const HUD_LINES: f32 = 2.6;

const PLAYER_COLOR: Color = Color::from_rgb_u8(90, 210, 140);
const CAUGHT_COLOR: Color = Color::from_rgb_u8(120, 120, 120);
const HUD_COLOR: Color = Color::from_rgb_u8(230, 230, 235);

/// Owns one running game: the world, its referee and the tick clock.
#[derive(Debug)]
pub(crate) struct Session {
    world: World,
    referee: Referee,
    outcome: Outcome,
    config: LevelConfig,
    accumulator: Duration,
}

impl Session {
    /// Starts a session on a freshly configured level.
    pub(crate) fn new(config: LevelConfig) -> Result<Self> {
        let mut session = Self {
            world: World::new(),
            referee: Referee::new(),
            outcome: Outcome::InProgress,
            config,
            accumulator: Duration::ZERO,
        };
        session
            .configure(config)
            .context("failed to configure the initial level")?;
        Ok(session)
    }

    /// Outcome of the current level.
    pub(crate) fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Ticks simulated since the current level started.
    pub(crate) fn tick_index(&self) -> u64 {
        query::tick_index(&self.world)
    }

    /// Creates an empty scene sized for the session's level and HUD.
    pub(crate) fn scene(&self) -> Result<Scene> {
        let cell = self.config.cell_length;
        let style = SceneStyle {
            edge_thickness: cell * 0.04,
            node_radius: cell * 0.05,
            ..SceneStyle::default()
        };
        let hud_height = cell * HUD_TEXT_SCALE * HUD_LINES;
        Scene::new(self.config.width(), self.config.height() + hud_height, style)
            .context("level does not fit a scene")
    }

    /// Feeds one rendered frame into the fixed-step clock.
    ///
    /// The frame's held keys are applied to every tick it runs. Returns the
    /// number of ticks simulated.
    pub(crate) fn advance(&mut self, frame: Duration, input: FrameInput) -> u32 {
        if input.restart && self.outcome.is_decided() {
            self.restart();
        }

        self.accumulator += frame;
        let input = PlayerInput::from(input);
        let mut ticks = 0;
        while self.accumulator >= TICK && ticks < MAX_TICKS_PER_FRAME {
            self.accumulator -= TICK;
            ticks += 1;
            self.step(input);
        }
        if ticks == MAX_TICKS_PER_FRAME {
            self.accumulator = Duration::ZERO;
        }
        ticks
    }

    fn step(&mut self, input: PlayerInput) {
        let mut events = Vec::new();
        if let Err(error) = world::apply(&mut self.world, Command::Tick { input }, &mut events) {
            error!(%error, tick = self.tick_index(), "world_invariant_violated");
            self.restart();
            return;
        }
        self.judge(&events);
    }

    fn configure(&mut self, config: LevelConfig) -> Result<()> {
        let mut events = Vec::new();
        world::apply(
            &mut self.world,
            Command::ConfigureLevel { config },
            &mut events,
        )?;
        self.config = config;
        self.accumulator = Duration::ZERO;
        self.judge(&events);
        Ok(())
    }

    /// Starts the next level with the following seed.
    fn restart(&mut self) {
        let config = LevelConfig {
            seed: self.config.seed.wrapping_add(1),
            ..self.config
        };
        info!(seed = config.seed, "level_restarted");
        if let Err(error) = self.configure(config) {
            error!(error = %error, "level_restart_failed");
        }
    }

    fn judge(&mut self, events: &[Event]) {
        let outcome = self.referee.handle(
            events,
            &query::player(&self.world),
            &query::enemy_view(&self.world),
        );
        if outcome != self.outcome && outcome.is_decided() {
            info!(?outcome, tick = self.tick_index(), "level_decided");
        }
        self.outcome = outcome;
    }

    /// Rebuilds the scene from the current world state.
    pub(crate) fn populate_scene(&self, scene: &mut Scene) {
        scene.clear();
        let cell = self.config.cell_length;
        let graph = query::graph(&self.world);
        let position = |node: NodeId| {
            graph
                .position(node)
                .map(|position| Vec2::new(position.x(), position.y()))
        };

        scene.edges.extend(
            graph
                .edges()
                .filter_map(|(from, to)| Some(SceneEdge::new(position(from)?, position(to)?))),
        );
        scene.nodes.extend(graph.node_ids().filter_map(position));
        scene
            .enemies
            .extend(query::enemy_view(&self.world).iter().map(|enemy| {
                SceneAgent::new(
                    Vec2::new(enemy.position.x(), enemy.position.y()),
                    cell * 0.12,
                    enemy_color(enemy.life, enemy.max_life),
                )
            }));

        let player = query::player(&self.world);
        let player_color = if player.alive {
            PLAYER_COLOR
        } else {
            CAUGHT_COLOR
        };
        scene.player = Some(SceneAgent::new(
            Vec2::new(player.position.x(), player.position.y()),
            cell * 0.16,
            player_color,
        ));

        let text_size = cell * HUD_TEXT_SCALE;
        let left = text_size * 0.5;
        let first_baseline = self.config.height() + text_size * 1.1;
        let status = format!(
            "Tokens: {}   Enemies: {}   Tick: {}",
            player.edge_tokens,
            query::enemy_view(&self.world).len(),
            self.tick_index()
        );
        scene.hud.push(HudLine::new(
            status,
            Vec2::new(left, first_baseline),
            text_size,
            HUD_COLOR,
        ));
        if let Some(banner) = outcome_banner(self.outcome) {
            scene.hud.push(HudLine::new(
                banner,
                Vec2::new(left, first_baseline + text_size * 1.2),
                text_size,
                HUD_COLOR,
            ));
        }
    }
}

fn outcome_banner(outcome: Outcome) -> Option<&'static str> {
    match outcome {
        Outcome::InProgress => None,
        Outcome::Won => Some("Every enemy faded away! Press R for the next level."),
        Outcome::Lost => Some("Caught! Press R to try again."),
    }
}
