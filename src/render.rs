use crate::config::{
    CAMERA_DISTANCE, CAMERA_FOV_DEGREES, CAMERA_HEIGHT, NOTICE_DURATION, PLAYFIELD_SIZE,
    RADAR_MARGIN,
};
use crate::flight::{AIRFRAME, Airplane};
use crate::radar::{self, DrawCommand, RadarProjector, RadarSurface};
use crate::scene::{Renderable, RenderableKind, SceneRegistry};
use crate::types::{CrashCause, Cuboid, EntityId, GameEvent};
use crate::world::{
    CANOPY_RADIUS, COIN_SIZE, GOAL_BASE_HEIGHT, GOAL_BASE_RADIUS,
    GOAL_POLE_HEIGHT, GOAL_POLE_RADIUS, Goal, Obstacle, TRUNK_HEIGHT, TRUNK_RADIUS_BOTTOM,
    TRUNK_RADIUS_TOP,
};
use macroquad::prelude::*;
use std::collections::{HashMap, VecDeque};

const SKY_COLOR: Color = Color::new(0.53, 0.81, 0.92, 1.0);
const GROUND_COLOR: Color = Color::new(0.13, 0.55, 0.13, 1.0);
const WALL_COLOR: Color = Color::new(0.5, 0.5, 0.5, 1.0);
const TRUNK_COLOR: Color = Color::new(0.55, 0.27, 0.07, 1.0);
const CANOPY_COLOR: Color = Color::new(0.13, 0.55, 0.13, 1.0);
const COIN_COLOR: Color = Color::new(1.0, 0.84, 0.0, 1.0);
const GOAL_BASE_COLOR: Color = Color::new(1.0, 0.0, 0.0, 1.0);
const GOAL_POLE_COLOR: Color = Color::new(0.55, 0.0, 0.0, 1.0);
const GOAL_FLAG_COLOR: Color = Color::new(1.0, 0.84, 0.0, 1.0);
const AIRFRAME_COLORS: [Color; 3] = [
    Color::new(0.0, 1.0, 0.0, 1.0),   // fuselage
    Color::new(0.33, 0.33, 1.0, 1.0), // wing
    Color::new(1.0, 0.33, 0.33, 1.0), // tail
];
const RADAR_BACKGROUND: Color = Color::new(0.0, 0.0, 0.0, 0.55);

// A banner shown for a few seconds after a game event
#[derive(Debug, Clone)]
struct Notice {
    text: String,
    color: Color,
    remaining: f32,
}

/// Radar canvas placed in screen space.
struct ScreenRadar {
    origin: Vec2,
    size: Vec2,
}

impl RadarSurface for ScreenRadar {
    fn clear(&mut self) {
        draw_rectangle(self.origin.x, self.origin.y, self.size.x, self.size.y, RADAR_BACKGROUND);
    }

    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: Color) {
        draw_circle(self.origin.x + x, self.origin.y + y, radius, color);
    }

    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        draw_rectangle_lines(self.origin.x + x, self.origin.y + y, w, h, 2.0, color);
    }
}

// Escape held or the window's close button
fn close_requested(escape_down: bool, quit_requested: bool) -> bool {
    escape_down || quit_requested
}

// Handles drawing the scene, the radar and the HUD using macroquad
pub struct Renderer {
    scene: HashMap<EntityId, Renderable>,
    coin_count: u32,
    level: u32,
    notices: VecDeque<Notice>,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneRegistry for Renderer {
    fn add_renderable(&mut self, renderable: Renderable) {
        self.scene.insert(renderable.id, renderable);
    }

    fn remove_renderable(&mut self, id: EntityId) {
        if self.scene.remove(&id).is_none() {
            log::warn!("Tried to remove unknown renderable {}", id);
        }
    }
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            scene: HashMap::new(),
            coin_count: 0,
            level: 1,
            notices: VecDeque::new(),
        }
    }

    pub fn window_should_close() -> bool {
        close_requested(is_key_down(KeyCode::Escape), is_quit_requested())
    }

    pub fn renderable_count(&self) -> usize {
        self.scene.len()
    }

    pub fn set_coin_count(&mut self, count: u32) {
        self.coin_count = count;
    }

    pub fn set_level(&mut self, level: u32) {
        self.level = level;
    }

    /// Queues a banner for the event; never blocks.
    pub fn notify(&mut self, event: &GameEvent) {
        let color = match event {
            GameEvent::CoinCollected { total, .. } => {
                self.set_coin_count(*total);
                return;
            }
            GameEvent::Crashed {
                cause: CrashCause::Obstacle,
                ..
            } => ORANGE,
            GameEvent::Crashed {
                cause: CrashCause::Wall,
                ..
            } => RED,
            GameEvent::LevelCleared { level } => {
                self.set_level(level + 1);
                GOLD
            }
        };
        self.notices.push_back(Notice {
            text: event.message(),
            color,
            remaining: NOTICE_DURATION,
        });
    }

    /// Ages banners by real frame time and drops expired ones.
    pub fn update_notices(&mut self, frame_time: f32) {
        for notice in self.notices.iter_mut() {
            notice.remaining -= frame_time;
        }
        self.notices.retain(|n| n.remaining > 0.0);
    }

    pub fn active_notices(&self) -> usize {
        self.notices.len()
    }

    pub fn draw_frame(&self, airplane: &Airplane, radar_frame: &[DrawCommand]) {
        clear_background(SKY_COLOR);

        set_camera(&Self::follow_camera(airplane));
        draw_plane(
            vec3(0.0, 0.0, 0.0),
            vec2(PLAYFIELD_SIZE / 2.0, PLAYFIELD_SIZE / 2.0),
            None,
            GROUND_COLOR,
        );
        for renderable in self.scene.values() {
            Self::draw_renderable(renderable);
        }
        Self::draw_airplane(airplane);

        set_default_camera();
        let size = RadarProjector::default().size();
        let mut surface = ScreenRadar {
            origin: vec2(screen_width() - size.x - RADAR_MARGIN, RADAR_MARGIN),
            size,
        };
        radar::replay(radar_frame, &mut surface);
        self.draw_hud();
        self.draw_notices();
    }

    // Chase camera: behind the airplane along its heading, a fixed height above it
    fn follow_camera(airplane: &Airplane) -> Camera3D {
        let position = airplane.pose.position;
        let mut offset = -airplane.heading() * CAMERA_DISTANCE;
        offset.y = CAMERA_HEIGHT;
        Camera3D {
            position: position + offset,
            target: position,
            up: Vec3::Y,
            fovy: CAMERA_FOV_DEGREES.to_radians(),
            ..Default::default()
        }
    }

    fn draw_renderable(renderable: &Renderable) {
        let anchor = renderable.anchor;
        match renderable.kind {
            RenderableKind::Wall { size } => draw_cube(anchor, size, None, WALL_COLOR),
            RenderableKind::Tree => {
                let tree = Obstacle {
                    id: renderable.id,
                    anchor,
                };
                draw_cylinder(
                    tree.trunk().base(),
                    TRUNK_RADIUS_TOP,
                    TRUNK_RADIUS_BOTTOM,
                    TRUNK_HEIGHT,
                    None,
                    TRUNK_COLOR,
                );
                draw_sphere(tree.canopy_center(), CANOPY_RADIUS, None, CANOPY_COLOR);
            }
            RenderableKind::Coin => draw_cube(anchor, COIN_SIZE, None, COIN_COLOR),
            RenderableKind::Goal => {
                let goal = Goal {
                    id: renderable.id,
                    anchor,
                };
                let [base, pole, flag] = goal.parts();
                // macroquad cylinders grow upward from their position
                draw_cylinder(
                    base.base(),
                    GOAL_BASE_RADIUS,
                    GOAL_BASE_RADIUS,
                    GOAL_BASE_HEIGHT,
                    None,
                    GOAL_BASE_COLOR,
                );
                draw_cylinder(
                    pole.base(),
                    GOAL_POLE_RADIUS,
                    GOAL_POLE_RADIUS,
                    GOAL_POLE_HEIGHT,
                    None,
                    GOAL_POLE_COLOR,
                );
                draw_cube(flag.center, flag.size, None, GOAL_FLAG_COLOR);
            }
        }
    }

    fn draw_airplane(airplane: &Airplane) {
        let yaw = airplane.rotation();
        // Same spins the collision bounds use
        for ((part, spin), color) in AIRFRAME.iter().zip(airplane.part_spins()).zip(AIRFRAME_COLORS) {
            Self::draw_oriented_box(part, yaw, spin, airplane.pose.position, color);
        }
    }

    fn draw_oriented_box(part: &Cuboid, frame: Quat, local: Quat, origin: Vec3, color: Color) {
        let rotation = frame * local;
        let offset = origin + frame * (part.center + local * (-part.size * 0.5));
        draw_affine_parallelepiped(
            offset,
            rotation * (Vec3::X * part.size.x),
            rotation * (Vec3::Y * part.size.y),
            rotation * (Vec3::Z * part.size.z),
            None,
            color,
        );
    }

    fn draw_hud(&self) {
        draw_text(&format!("Coins: {}", self.coin_count), 20.0, 40.0, 36.0, WHITE);
        draw_text(&format!("Level {}", self.level), 20.0, 76.0, 28.0, WHITE);
        draw_text(&format!("FPS: {}", get_fps()), 20.0, 104.0, 20.0, LIGHTGRAY);
        draw_text(
            "Arrows: steer / climb   Space: thrust   Esc: quit",
            20.0,
            screen_height() - 20.0,
            20.0,
            LIGHTGRAY,
        );
    }

    fn draw_notices(&self) {
        let font_size = 40.0;
        let mut y = screen_height() / 3.0;
        for notice in &self.notices {
            let alpha = (notice.remaining / NOTICE_DURATION).clamp(0.0, 1.0);
            let mut color = notice.color;
            color.a *= alpha;
            let dims = measure_text(&notice.text, None, font_size as u16, 1.0);
            let x = (screen_width() - dims.width) / 2.0;
            draw_rectangle(
                x - 16.0,
                y - dims.height - 12.0,
                dims.width + 32.0,
                dims.height + 24.0,
                Color::new(0.0, 0.0, 0.0, 0.5 * alpha),
            );
            draw_text(&notice.text, x, y, font_size, color);
            y += dims.height + 36.0;
        }
    }
}
