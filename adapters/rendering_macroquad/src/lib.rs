#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Graph Chase.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature.

use anyhow::Result;
use glam::Vec2;
use graph_chase_rendering::{
    Color, DrawSurface, FrameInput, Presentation, RenderingBackend, Scene,
};
use macroquad::input::{is_key_down, is_key_pressed, KeyCode};
use std::time::Duration;

/// Longest side of the window when it opens.
const WINDOW_EXTENT: f32 = 900.0;

/// Snapshot of held keys observed during a single frame.
#[derive(Clone, Copy, Debug, Default)]
struct Keyboard {
    /// `Q` or `Escape` to quit the game loop.
    quit_requested: bool,
    input: FrameInput,
}

impl Keyboard {
    fn poll() -> Self {
        let held = |keys: &[KeyCode]| keys.iter().any(|key| is_key_down(*key));
        let input = FrameInput {
            north: held(&[KeyCode::Up, KeyCode::W]),
            east: held(&[KeyCode::Right, KeyCode::D]),
            south: held(&[KeyCode::Down, KeyCode::S]),
            west: held(&[KeyCode::Left, KeyCode::A]),
            grab: held(&[KeyCode::Space]),
            place: held(&[KeyCode::LeftShift, KeyCode::E]),
            restart: held(&[KeyCode::R]),
        };

        Self {
            quit_requested: is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q),
            input,
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend prints frame timing metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }
}

/// Tracks the average frames-per-second produced by the render loop.
#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
}

impl FpsCounter {
    /// Records a rendered frame and returns the average rate once one second has elapsed.
    fn record_frame(&mut self, frame: Duration) -> Option<f32> {
        self.elapsed += frame;
        self.frames = self.frames.saturating_add(1);

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let per_second = self.frames as f32 / self.elapsed.as_secs_f32();
        self.elapsed = Duration::ZERO;
        self.frames = 0;
        Some(per_second)
    }
}

/// Uniform scale and offset that letterboxes a scene inside the screen.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Viewport {
    scale: f32,
    offset: Vec2,
}

impl Viewport {
    fn fit(scene: &Scene, screen_width: f32, screen_height: f32) -> Self {
        let scale = (screen_width / scene.width())
            .min(screen_height / scene.height())
            .max(0.0);
        let offset = Vec2::new(
            (screen_width - scene.width() * scale) * 0.5,
            (screen_height - scene.height() * scale) * 0.5,
        );
        Self { scale, offset }
    }

    fn project(&self, point: Vec2) -> Vec2 {
        self.offset + point * self.scale
    }
}

/// Draw surface that forwards scene primitives to macroquad's immediate-mode API.
struct MacroquadSurface {
    viewport: Viewport,
}

impl DrawSurface for MacroquadSurface {
    fn line(&mut self, from: Vec2, to: Vec2, thickness: f32, color: Color) {
        let from = self.viewport.project(from);
        let to = self.viewport.project(to);
        macroquad::shapes::draw_line(
            from.x,
            from.y,
            to.x,
            to.y,
            thickness * self.viewport.scale,
            to_macroquad_color(color),
        );
    }

    fn circle(&mut self, center: Vec2, radius: f32, color: Color) {
        let center = self.viewport.project(center);
        macroquad::shapes::draw_circle(
            center.x,
            center.y,
            radius * self.viewport.scale,
            to_macroquad_color(color),
        );
    }

    fn text(&mut self, text: &str, position: Vec2, size: f32, color: Color) {
        let position = self.viewport.project(position);
        let _ = macroquad::text::draw_text(
            text,
            position.x,
            position.y,
            size * self.viewport.scale,
            to_macroquad_color(color),
        );
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let (window_width, window_height) = window_size(&scene);
        let mut config = macroquad::window::Conf {
            window_title,
            window_width,
            window_height,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let background = to_macroquad_color(clear_color);
            let mut fps_counter = FpsCounter::default();

            loop {
                let keyboard = Keyboard::poll();
                if keyboard.quit_requested {
                    break;
                }

                macroquad::window::clear_background(background);

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                update_scene(frame_dt, keyboard.input, &mut scene);

                let mut surface = MacroquadSurface {
                    viewport: Viewport::fit(
                        &scene,
                        macroquad::window::screen_width(),
                        macroquad::window::screen_height(),
                    ),
                };
                scene.draw(&mut surface);

                if let Some(per_second) = fps_counter.record_frame(frame_dt) {
                    if show_fps {
                        println!("FPS: {per_second:.2}");
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

/// Window size that keeps the scene's aspect ratio with its longest side at
/// [`WINDOW_EXTENT`].
fn window_size(scene: &Scene) -> (i32, i32) {
    let scale = WINDOW_EXTENT / scene.width().max(scene.height());
    (
        (scene.width() * scale).round() as i32,
        (scene.height() * scale).round() as i32,
    )
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}
