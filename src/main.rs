// SDL2 host for the platformer core
//
// Opens a window, samples the keyboard once per frame, ticks the game at a
// fixed ~60 Hz and draws whatever the active mode asks for.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use sdl2::event::Event;
use sdl2::image::LoadTexture;
use sdl2::keyboard::Scancode;
use sdl2::pixels::Color;
use sdl2::rect::Rect;
use sdl2::render::{BlendMode, Canvas, Texture, TextureCreator};
use sdl2::video::{Window, WindowContext};
use thiserror::Error;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use platformer::font::text_pixels;
use platformer::{
    FrameTarget, Game, GameConfig, ImageDesc, InputState, Key, LevelError, Rgba,
};

const TEXT_SCALE: u32 = 2;
const TEXT_COLOR: Color = Color::RGB(255, 255, 255);
const FRAME_TIME: Duration = Duration::new(0, 1_000_000_000u32 / 60);

#[derive(Debug, Error)]
enum HostError {
    #[error("SDL error: {0}")]
    Sdl(String),

    #[error(transparent)]
    Level(#[from] LevelError),
}

impl From<String> for HostError {
    fn from(message: String) -> Self {
        HostError::Sdl(message)
    }
}

fn sdl_err(e: impl ToString) -> HostError {
    HostError::Sdl(e.to_string())
}

fn to_color(color: Rgba) -> Color {
    Color::RGBA(color.r, color.g, color.b, color.a)
}

/// Game keys for a physical key, if the game uses it.
fn map_scancode(scancode: Scancode) -> Option<Key> {
    let key = match scancode {
        Scancode::Left => Key::Left,
        Scancode::Right => Key::Right,
        Scancode::Up => Key::Up,
        Scancode::Down => Key::Down,
        Scancode::A => Key::A,
        Scancode::D => Key::D,
        Scancode::S => Key::S,
        Scancode::W => Key::W,
        Scancode::Q => Key::Q,
        Scancode::Space => Key::Space,
        Scancode::Return | Scancode::KpEnter => Key::Enter,
        Scancode::Escape => Key::Escape,
        _ => return None,
    };
    Some(key)
}

/// Image files decoded on first use and kept for the whole session.
struct TextureCache<'t> {
    creator: &'t TextureCreator<WindowContext>,
    textures: HashMap<PathBuf, Texture<'t>>,
}

impl<'t> TextureCache<'t> {
    fn new(creator: &'t TextureCreator<WindowContext>) -> Self {
        TextureCache {
            creator,
            textures: HashMap::new(),
        }
    }

    fn get(&mut self, path: &Path) -> Result<&Texture<'t>, String> {
        if !self.textures.contains_key(path) {
            let texture = self
                .creator
                .load_texture(path)
                .map_err(|e| format!("Failed to load {}: {}", path.display(), e))?;
            info!("loaded texture {}", path.display());
            self.textures.insert(path.to_path_buf(), texture);
        }
        self.textures
            .get(path)
            .ok_or_else(|| format!("texture {} missing from cache", path.display()))
    }
}

/// One frame's worth of drawing onto the SDL canvas.
struct SdlFrame<'c, 't> {
    canvas: &'c mut Canvas<Window>,
    textures: &'c mut TextureCache<'t>,
}

impl SdlFrame<'_, '_> {
    fn draw_image_checked(
        &mut self,
        image: &ImageDesc,
        x: f64,
        y: f64,
        flip_horizontal: bool,
    ) -> Result<(), String> {
        let (width, height) = image.size();
        let dst = Rect::new(x.round() as i32, y.round() as i32, width, height);
        match image {
            ImageDesc::Solid { color, .. } => {
                self.canvas.set_draw_color(to_color(*color));
                self.canvas.fill_rect(dst)
            }
            ImageDesc::File { path, .. } => {
                let texture = self.textures.get(path)?;
                self.canvas
                    .copy_ex(texture, None, Some(dst), 0.0, None, flip_horizontal, false)
            }
        }
    }

    fn draw_text_checked(&mut self, text: &str, x: i32, y: i32) -> Result<(), String> {
        self.canvas.set_draw_color(TEXT_COLOR);
        for (px, py) in text_pixels(text, x, y, TEXT_SCALE) {
            self.canvas
                .fill_rect(Rect::new(px, py, TEXT_SCALE, TEXT_SCALE))?;
        }
        Ok(())
    }

    fn fill_overlay_checked(&mut self, color: Rgba) -> Result<(), String> {
        self.canvas.set_blend_mode(BlendMode::Blend);
        self.canvas.set_draw_color(to_color(color));
        let result = self.canvas.fill_rect(None);
        self.canvas.set_blend_mode(BlendMode::None);
        result
    }
}

fn report(result: Result<(), String>) {
    if let Err(e) = result {
        warn!("draw failed: {}", e);
    }
}

impl FrameTarget for SdlFrame<'_, '_> {
    fn clear(&mut self, color: Rgba) {
        self.canvas.set_draw_color(to_color(color));
        self.canvas.clear();
    }

    fn draw_image(&mut self, image: &ImageDesc, x: f64, y: f64, flip_horizontal: bool) {
        report(self.draw_image_checked(image, x, y, flip_horizontal));
    }

    fn fill_overlay(&mut self, color: Rgba) {
        report(self.fill_overlay_checked(color));
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32) {
        report(self.draw_text_checked(text, x, y));
    }
}

fn run() -> Result<(), HostError> {
    let config = GameConfig::load_or_default(&GameConfig::search_paths());
    let mut game = Game::new(config)?;
    let (width, height) = game.layout();

    let sdl_context = sdl2::init()?;
    let video_subsystem = sdl_context.video()?;
    let _image_context = sdl2::image::init(sdl2::image::InitFlag::PNG)?;

    let window = video_subsystem
        .window(&game.config().window.title, width, height)
        .position_centered()
        .build()
        .map_err(sdl_err)?;

    let mut canvas = window.into_canvas().build().map_err(sdl_err)?;
    canvas.set_logical_size(width, height).map_err(sdl_err)?;

    let texture_creator = canvas.texture_creator();
    let mut textures = TextureCache::new(&texture_creator);
    let mut event_pump = sdl_context.event_pump()?;
    let mut input = InputState::new();

    info!("window {}x{} open, starting main loop", width, height);

    'running: loop {
        for event in event_pump.poll_iter() {
            if let Event::Quit { .. } = event {
                break 'running;
            }
        }

        let held = event_pump
            .keyboard_state()
            .pressed_scancodes()
            .filter_map(map_scancode)
            .collect::<Vec<_>>();
        input.begin_frame(held);

        game.tick(&input);

        let mut frame = SdlFrame {
            canvas: &mut canvas,
            textures: &mut textures,
        };
        // Clear to black first; overlay-only modes draw over it
        frame.clear(Rgba::rgb(0, 0, 0));
        game.render(&mut frame);
        canvas.present();

        std::thread::sleep(FRAME_TIME);
    }

    info!("exiting after {} ticks", game.ticks());
    Ok(())
}

fn main() -> Result<(), String> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    run().map_err(|e| {
        error!("{}", e);
        e.to_string()
    })
}
