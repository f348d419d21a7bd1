#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Graph Chase adapters.

use anyhow::Result as AnyResult;
use glam::Vec2;
use graph_chase_core::PlayerInput;
use std::{error::Error, fmt, time::Duration};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Linearly interpolates every channel towards `other`.
    ///
    /// `amount` is clamped to 0.0..=1.0, where 0.0 yields `self`.
    #[must_use]
    pub fn lerp(self, other: Self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lerp_channel(self.red, other.red, amount),
            green: lerp_channel(self.green, other.green, amount),
            blue: lerp_channel(self.blue, other.blue, amount),
            alpha: lerp_channel(self.alpha, other.alpha, amount),
        }
    }
}

fn lerp_channel(from: f32, to: f32, amount: f32) -> f32 {
    from * (1.0 - amount) + to * amount
}

/// Color of an enemy about to expire.
pub const ENEMY_DIM_COLOR: Color = Color::from_rgb_u8(70, 30, 40);

/// Color of an enemy at full life.
pub const ENEMY_BRIGHT_COLOR: Color = Color::from_rgb_u8(235, 70, 90);

/// Fill color for an enemy with `life` out of `max_life` remaining.
#[must_use]
pub fn enemy_color(life: u32, max_life: u32) -> Color {
    if max_life == 0 {
        return ENEMY_DIM_COLOR;
    }
    let ratio = life.min(max_life) as f32 / max_life as f32;
    ENEMY_DIM_COLOR.lerp(ENEMY_BRIGHT_COLOR, ratio)
}

/// Input snapshot gathered by adapters before updating the scene.
///
/// Every flag reports whether the key is held during the frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct FrameInput {
    /// Whether an upward movement key is held.
    pub north: bool,
    /// Whether a rightward movement key is held.
    pub east: bool,
    /// Whether a downward movement key is held.
    pub south: bool,
    /// Whether a leftward movement key is held.
    pub west: bool,
    /// Whether the grab key is held.
    pub grab: bool,
    /// Whether the place key is held.
    pub place: bool,
    /// Whether the restart key is held.
    pub restart: bool,
}

impl From<FrameInput> for PlayerInput {
    fn from(input: FrameInput) -> Self {
        Self {
            north: input.north,
            east: input.east,
            south: input.south,
            west: input.west,
            grab: input.grab,
            place: input.place,
        }
    }
}

/// Immediate-mode drawing operations a backend must provide.
///
/// Coordinates are scene units with the origin in the top-left corner.
pub trait DrawSurface {
    /// Draws a straight line segment.
    fn line(&mut self, from: Vec2, to: Vec2, thickness: f32, color: Color);

    /// Draws a filled circle.
    fn circle(&mut self, center: Vec2, radius: f32, color: Color);

    /// Draws text with its baseline starting at `position`.
    fn text(&mut self, text: &str, position: Vec2, size: f32, color: Color);
}

/// Edge drawn between the centres of two nodes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneEdge {
    /// Position of the first endpoint.
    pub from: Vec2,
    /// Position of the second endpoint.
    pub to: Vec2,
}

impl SceneEdge {
    /// Creates a new edge descriptor.
    #[must_use]
    pub const fn new(from: Vec2, to: Vec2) -> Self {
        Self { from, to }
    }
}

/// Agent rendered as a filled circle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneAgent {
    /// Centre of the agent.
    pub position: Vec2,
    /// Radius of the agent's body.
    pub radius: f32,
    /// Fill color of the agent's body.
    pub color: Color,
}

impl SceneAgent {
    /// Creates a new agent descriptor.
    #[must_use]
    pub const fn new(position: Vec2, radius: f32, color: Color) -> Self {
        Self {
            position,
            radius,
            color,
        }
    }
}

/// Line of heads-up display text.
#[derive(Clone, Debug, PartialEq)]
pub struct HudLine {
    /// Text to display.
    pub text: String,
    /// Baseline origin of the text.
    pub position: Vec2,
    /// Font size in scene units.
    pub size: f32,
    /// Text color.
    pub color: Color,
}

impl HudLine {
    /// Creates a new HUD line descriptor.
    #[must_use]
    pub fn new<T>(text: T, position: Vec2, size: f32, color: Color) -> Self
    where
        T: Into<String>,
    {
        Self {
            text: text.into(),
            position,
            size,
            color,
        }
    }
}

/// Colors and sizes shared by every element of a scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneStyle {
    /// Color of edge lines.
    pub edge_color: Color,
    /// Thickness of edge lines.
    pub edge_thickness: f32,
    /// Color of node dots.
    pub node_color: Color,
    /// Radius of node dots.
    pub node_radius: f32,
}

impl Default for SceneStyle {
    fn default() -> Self {
        Self {
            edge_color: Color::from_rgb_u8(110, 120, 140),
            edge_thickness: 3.0,
            node_color: Color::from_rgb_u8(180, 190, 210),
            node_radius: 4.0,
        }
    }
}

/// Scene description combining the graph, its agents and the HUD.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    width: f32,
    height: f32,
    /// Style applied to the graph.
    pub style: SceneStyle,
    /// Edges currently present in the graph.
    pub edges: Vec<SceneEdge>,
    /// Node centres.
    pub nodes: Vec<Vec2>,
    /// Enemies still in play.
    pub enemies: Vec<SceneAgent>,
    /// Player, if one is shown.
    pub player: Option<SceneAgent>,
    /// HUD text drawn on top of everything else.
    pub hud: Vec<HudLine>,
}

impl Scene {
    /// Creates an empty scene of the provided size.
    ///
    /// Returns an error when either dimension is not a positive finite number.
    pub fn new(width: f32, height: f32, style: SceneStyle) -> Result<Self, RenderingError> {
        let valid = |value: f32| value.is_finite() && value > 0.0;
        if !valid(width) || !valid(height) {
            return Err(RenderingError::InvalidSceneSize { width, height });
        }

        Ok(Self {
            width,
            height,
            style,
            edges: Vec::new(),
            nodes: Vec::new(),
            enemies: Vec::new(),
            player: None,
            hud: Vec::new(),
        })
    }

    /// Width of the scene in scene units.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Height of the scene in scene units.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Removes every element while keeping the size and style.
    pub fn clear(&mut self) {
        self.edges.clear();
        self.nodes.clear();
        self.enemies.clear();
        self.player = None;
        self.hud.clear();
    }

    /// Draws the scene back to front: edges, nodes, enemies, player, HUD.
    pub fn draw<S>(&self, surface: &mut S)
    where
        S: DrawSurface + ?Sized,
    {
        let style = self.style;
        for edge in &self.edges {
            surface.line(edge.from, edge.to, style.edge_thickness, style.edge_color);
        }
        for node in &self.nodes {
            surface.circle(*node, style.node_radius, style.node_color);
        }
        for enemy in &self.enemies {
            surface.circle(enemy.position, enemy.radius, enemy.color);
        }
        if let Some(player) = &self.player {
            surface.circle(player.position, player.radius, player.color);
        }
        for line in &self.hud {
            surface.text(&line.text, line.position, line.size, line.color);
        }
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Graph Chase scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the real frame delta,
    /// per-frame input captured by the adapter, and may mutate the scene before
    /// it is rendered.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Scenes must cover a positive, finite area.
    InvalidSceneSize {
        /// Requested width.
        width: f32,
        /// Requested height.
        height: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSceneSize { width, height } => {
                write!(
                    f,
                    "scene size must be positive and finite (received {width}x{height})"
                )
            }
        }
    }
}

impl Error for RenderingError {}
