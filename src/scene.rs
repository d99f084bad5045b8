//! Renderable registry shared between the simulation and the presentation layer.

use crate::types::EntityId;
use macroquad::math::Vec3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderableKind {
    Tree,
    Coin,
    Goal,
    Wall { size: Vec3 },
}

/// Drawable description of a world entity. `anchor` is the entity's
/// representative point (trunk centre, coin centre, goal base, wall centre).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Renderable {
    pub id: EntityId,
    pub kind: RenderableKind,
    pub anchor: Vec3,
}

/// Scene the presentation layer draws from. The core only adds and removes.
pub trait SceneRegistry {
    fn add_renderable(&mut self, renderable: Renderable);
    fn remove_renderable(&mut self, id: EntityId);
}

#[cfg(test)]
pub use recording::RecordingScene;
