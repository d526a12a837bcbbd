/// Render pass
///
/// The core never talks to a graphics library. It issues draw calls against
/// a `FrameTarget` supplied by the host, and looks sprite images up in the
/// `AssetStore`.
///
/// # Usage Example
///
/// ```ignore
/// render_entities(&mut frame, &store, &assets);
/// ```
use tracing::trace;

use crate::assets::{AssetStore, ImageDesc, Rgba};
use crate::ecs::{ComponentKind, ComponentTables, EntityStore};

/// Drawing surface for one frame.
pub trait FrameTarget {
    /// Fills the whole frame with `color`.
    fn clear(&mut self, color: Rgba);

    /// Draws `image` with its top-left corner at `(x, y)`.
    fn draw_image(&mut self, image: &ImageDesc, x: f64, y: f64, flip_horizontal: bool);

    /// Blends a translucent `color` over the whole frame.
    fn fill_overlay(&mut self, color: Rgba);

    /// Debug text at screen position `(x, y)`; `\n` starts a new line.
    fn draw_text(&mut self, text: &str, x: i32, y: i32);
}

/// Draws every entity with a `Position` and a `Sprite`.
///
/// Entities are drawn in ascending id order, so later-spawned entities
/// appear on top. Sprites whose image key is not registered are skipped.
/// Players facing left are drawn mirrored.
pub fn render_entities(frame: &mut dyn FrameTarget, store: &EntityStore, assets: &AssetStore) {
    let ComponentTables {
        positions,
        sprites,
        players,
        ..
    } = store.tables();

    for entity in store.entities_with(&[ComponentKind::Position, ComponentKind::Sprite]) {
        let (Some(position), Some(sprite)) = (positions.get(entity), sprites.get(entity)) else {
            unreachable!("entity {} matched render query without its components", entity);
        };

        let Some(image) = assets.image(&sprite.image_key) else {
            trace!("no image '{}' for entity {}, skipping", sprite.image_key, entity);
            continue;
        };

        let flip = players.get(entity).is_some_and(|p| !p.facing_right);
        frame.draw_image(
            image,
            position.x + sprite.offset_x,
            position.y + sprite.offset_y,
            flip,
        );
    }
}

/// Frame target that records draw calls, for tests and headless runs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordingFrame {
    pub commands: Vec<DrawCommand>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Rgba),
    Image {
        image: ImageDesc,
        x: f64,
        y: f64,
        flip_horizontal: bool,
    },
    Overlay(Rgba),
    Text(String),
}

impl RecordingFrame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn image_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Image { .. }))
            .count()
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text(text) => Some(text.as_str()),
            _ => None,
        })
    }
}

impl FrameTarget for RecordingFrame {
    fn clear(&mut self, color: Rgba) {
        self.commands.push(DrawCommand::Clear(color));
    }

    fn draw_image(&mut self, image: &ImageDesc, x: f64, y: f64, flip_horizontal: bool) {
        self.commands.push(DrawCommand::Image {
            image: image.clone(),
            x,
            y,
            flip_horizontal,
        });
    }

    fn fill_overlay(&mut self, color: Rgba) {
        self.commands.push(DrawCommand::Overlay(color));
    }

    fn draw_text(&mut self, text: &str, _x: i32, _y: i32) {
        self.commands.push(DrawCommand::Text(text.to_string()));
    }
}
