use crate::config::{
    GOAL_OFFSET_MIN, GOAL_OFFSET_RANGE, PLAYFIELD_SIZE, WALL_HEIGHT, WALL_THICKNESS, WorldLayout,
};
use crate::scene::{Renderable, RenderableKind, SceneRegistry};
use crate::types::{Aabb, Cuboid, EntityId, WallSide};
use ::rand::prelude::*;
use ::rand::rngs::StdRng;
use macroquad::math::Vec3;

// Tree geometry
pub const TRUNK_HEIGHT: f32 = 5.0;
pub const TRUNK_RADIUS_TOP: f32 = 0.3;
pub const TRUNK_RADIUS_BOTTOM: f32 = 0.4;
pub const CANOPY_RADIUS: f32 = 1.5;

// Coin geometry: an upright disc facing +Z
pub const COIN_RADIUS: f32 = 1.0;
pub const COIN_THICKNESS: f32 = 0.3;
pub const COIN_HEIGHT: f32 = 1.0; // Centre height above ground
pub const COIN_SIZE: Vec3 = Vec3::new(COIN_RADIUS * 2.0, COIN_RADIUS * 2.0, COIN_THICKNESS);

// Goal geometry
pub const GOAL_BASE_RADIUS: f32 = 2.0;
pub const GOAL_BASE_HEIGHT: f32 = 1.0;
pub const GOAL_POLE_RADIUS: f32 = 0.3;
pub const GOAL_POLE_HEIGHT: f32 = 12.0;
pub const GOAL_FLAG_SIZE: Vec3 = Vec3::new(5.0, 3.0, 0.2);
pub const GOAL_FLAG_OFFSET: Vec3 = Vec3::new(5.0, 8.5, 0.0); // From the base anchor

/// A tree. Immutable once generated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub id: EntityId,
    pub anchor: Vec3, // Trunk centre
}

impl Obstacle {
    pub fn new(id: EntityId, x: f32, z: f32) -> Self {
        Obstacle {
            id,
            anchor: Vec3::new(x, TRUNK_HEIGHT / 2.0, z),
        }
    }

    pub fn canopy_center(&self) -> Vec3 {
        Vec3::new(
            self.anchor.x,
            TRUNK_HEIGHT + CANOPY_RADIUS,
            self.anchor.z,
        )
    }

    pub fn trunk(&self) -> Cuboid {
        let width = TRUNK_RADIUS_BOTTOM * 2.0;
        Cuboid::new(self.anchor, Vec3::new(width, TRUNK_HEIGHT, width))
    }

    pub fn bounds(&self) -> Aabb {
        let canopy = Aabb::from_center_size(self.canopy_center(), Vec3::splat(CANOPY_RADIUS * 2.0));
        self.trunk().aabb().union(&canopy)
    }

    fn renderable(&self) -> Renderable {
        Renderable {
            id: self.id,
            kind: RenderableKind::Tree,
            anchor: self.anchor,
        }
    }
}

/// A collectible. Lives in the world until the airplane touches it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coin {
    pub id: EntityId,
    pub position: Vec3,
}

impl Coin {
    pub fn new(id: EntityId, x: f32, z: f32) -> Self {
        Coin {
            id,
            position: Vec3::new(x, COIN_HEIGHT, z),
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_size(self.position, COIN_SIZE)
    }

    fn renderable(&self) -> Renderable {
        Renderable {
            id: self.id,
            kind: RenderableKind::Coin,
            anchor: self.position,
        }
    }
}

/// Level exit: base disc, pole and flag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Goal {
    pub id: EntityId,
    pub anchor: Vec3, // Base centre
}

impl Goal {
    pub fn new(id: EntityId, x: f32, z: f32) -> Self {
        Goal {
            id,
            anchor: Vec3::new(x, GOAL_BASE_HEIGHT / 2.0, z),
        }
    }

    /// Base, pole and flag boxes in world space.
    pub fn parts(&self) -> [Cuboid; 3] {
        let ground = Vec3::new(self.anchor.x, 0.0, self.anchor.z);
        [
            Cuboid::new(
                self.anchor,
                Vec3::new(
                    GOAL_BASE_RADIUS * 2.0,
                    GOAL_BASE_HEIGHT,
                    GOAL_BASE_RADIUS * 2.0,
                ),
            ),
            Cuboid::new(
                ground + Vec3::Y * (GOAL_POLE_HEIGHT / 2.0),
                Vec3::new(
                    GOAL_POLE_RADIUS * 2.0,
                    GOAL_POLE_HEIGHT,
                    GOAL_POLE_RADIUS * 2.0,
                ),
            ),
            Cuboid::new(self.anchor + GOAL_FLAG_OFFSET, GOAL_FLAG_SIZE),
        ]
    }

    pub fn bounds(&self) -> Aabb {
        let [base, pole, flag] = self.parts();
        base.aabb().union(&pole.aabb()).union(&flag.aabb())
    }

    fn renderable(&self) -> Renderable {
        Renderable {
            id: self.id,
            kind: RenderableKind::Goal,
            anchor: self.anchor,
        }
    }
}

/// One side of the playfield perimeter. Persists for the whole session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wall {
    pub id: EntityId,
    pub side: WallSide,
    pub center: Vec3,
    pub size: Vec3,
}

impl Wall {
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_size(self.center, self.size)
    }

    fn renderable(&self) -> Renderable {
        Renderable {
            id: self.id,
            kind: RenderableKind::Wall { size: self.size },
            anchor: self.center,
        }
    }
}

/// Obstacles, coins and goal of the current level.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct World {
    pub obstacles: Vec<Obstacle>,
    pub coins: Vec<Coin>,
    pub goal: Option<Goal>,
}

impl World {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Removes a coin from the active set. Returns `None` if it is already gone.
    pub fn remove_coin(&mut self, id: EntityId) -> Option<Coin> {
        let index = self.coins.iter().position(|c| c.id == id)?;
        Some(self.coins.swap_remove(index))
    }

    pub fn entity_ids(&self) -> Vec<EntityId> {
        self.obstacles
            .iter()
            .map(|o| o.id)
            .chain(self.coins.iter().map(|c| c.id))
            .chain(self.goal.iter().map(|g| g.id))
            .collect()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty() && self.coins.is_empty() && self.goal.is_none()
    }
}

/// True when a cell centre falls inside the square safe zone around spawn.
pub fn in_safe_zone(x: f32, z: f32, safe_radius: f32) -> bool {
    x.abs() < safe_radius && z.abs() < safe_radius
}

/// Maps a unit sample in [0, 1) to a whole goal coordinate in [30, 89].
/// Floor before adding the offset: `u * 60 + 30` rounds up to 90 for the
/// largest samples, in f32 and in f64 alike.
fn goal_coordinate(u: f64) -> f32 {
    (u * GOAL_OFFSET_RANGE as f64).floor() as f32 + GOAL_OFFSET_MIN
}

/// Procedural level builder. Owns the RNG and the id counter, so ids are
/// never reused across regenerations.
#[derive(Debug)]
pub struct WorldGenerator {
    rng: StdRng,
    next_id: u32,
    tree_probability: f64,
    coin_probability: f64,
}

impl WorldGenerator {
    pub fn new(seed: Option<u64>, layout: &WorldLayout) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        WorldGenerator {
            rng,
            next_id: 1,
            tree_probability: layout.tree_probability,
            coin_probability: layout.coin_probability,
        }
    }

    fn allocate_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Fills a `rows` x `cols` grid around the origin with trees and coins,
    /// skipping the safe zone, then places exactly one goal.
    pub fn generate(
        &mut self,
        rows: u32,
        cols: u32,
        spacing: f32,
        safe_radius: f32,
        scene: &mut dyn SceneRegistry,
    ) -> World {
        let mut world = World::empty();

        for i in 0..cols {
            let x = (i as f32 - cols as f32 / 2.0) * spacing;
            for j in 0..rows {
                let z = (j as f32 - rows as f32 / 2.0) * spacing;
                if in_safe_zone(x, z, safe_radius) {
                    continue;
                }

                if self.rng.r#gen::<f64>() < self.tree_probability {
                    let tree = Obstacle::new(self.allocate_id(), x, z);
                    scene.add_renderable(tree.renderable());
                    world.obstacles.push(tree);
                } else if self.rng.r#gen::<f64>() < self.coin_probability {
                    let coin = Coin::new(self.allocate_id(), x, z);
                    scene.add_renderable(coin.renderable());
                    world.coins.push(coin);
                }
            }
        }

        let goal = self.place_goal(scene);
        if let Some(tree) = world
            .obstacles
            .iter()
            .find(|o| o.bounds().intersects(&goal.bounds()))
        {
            log::debug!(
                target: "world",
                "Goal {} at ({:.0}, {:.0}) overlaps tree {}",
                goal.id,
                goal.anchor.x,
                goal.anchor.z,
                tree.id
            );
        }
        world.goal = Some(goal);

        log::debug!(
            target: "world",
            "Generated {} trees and {} coins on a {}x{} grid",
            world.obstacles.len(),
            world.coins.len(),
            rows,
            cols
        );
        world
    }

    fn place_goal(&mut self, scene: &mut dyn SceneRegistry) -> Goal {
        let gx = goal_coordinate(self.rng.r#gen::<f64>());
        let gz = goal_coordinate(self.rng.r#gen::<f64>());
        let goal = Goal::new(self.allocate_id(), gx, gz);
        scene.add_renderable(goal.renderable());
        goal
    }

    /// Unregisters every obstacle, coin and the goal and empties the world.
    /// Walls are not part of the world and stay put.
    pub fn clear(&self, world: &mut World, scene: &mut dyn SceneRegistry) {
        for id in world.entity_ids() {
            scene.remove_renderable(id);
        }
        world.obstacles.clear();
        world.coins.clear();
        world.goal = None;
    }

    /// Builds and registers the four perimeter walls.
    pub fn build_walls(&mut self, scene: &mut dyn SceneRegistry) -> Vec<Wall> {
        let half = PLAYFIELD_SIZE / 2.0;
        let y = WALL_HEIGHT / 2.0;
        let along_x = Vec3::new(PLAYFIELD_SIZE, WALL_HEIGHT, WALL_THICKNESS);
        let along_z = Vec3::new(WALL_THICKNESS, WALL_HEIGHT, PLAYFIELD_SIZE);
        let layout = [
            (WallSide::North, Vec3::new(0.0, y, -half), along_x),
            (WallSide::South, Vec3::new(0.0, y, half), along_x),
            (WallSide::West, Vec3::new(-half, y, 0.0), along_z),
            (WallSide::East, Vec3::new(half, y, 0.0), along_z),
        ];

        layout
            .into_iter()
            .map(|(side, center, size)| {
                let wall = Wall {
                    id: self.allocate_id(),
                    side,
                    center,
                    size,
                };
                scene.add_renderable(wall.renderable());
                wall
            })
            .collect()
    }
}
