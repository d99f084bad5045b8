//! Top-down radar: projects world X/Z onto a small 2D canvas.
//!
//! Altitude is dropped entirely. Coins are not shown.

use crate::config::{RADAR_SCALE, RADAR_SIZE};
use crate::flight::Airplane;
use crate::world::World;
use macroquad::color::Color;
use macroquad::math::{Vec2, Vec3};

pub const AIRPLANE_MARKER: (f32, Color) = (5.0, Color::new(0.0, 1.0, 0.0, 1.0)); // lime
pub const OBSTACLE_MARKER: (f32, Color) = (2.0, Color::new(0.0, 0.5, 0.0, 1.0)); // green
pub const GOAL_MARKER: (f32, Color) = (4.0, Color::new(1.0, 0.0, 0.0, 1.0)); // red
pub const BORDER_COLOR: Color = Color::new(1.0, 1.0, 1.0, 1.0);

/// One 2D drawing instruction in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    Clear,
    FillCircle {
        x: f32,
        y: f32,
        radius: f32,
        color: Color,
    },
    StrokeRect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: Color,
    },
}

/// 2D surface the radar is painted on.
pub trait RadarSurface {
    fn clear(&mut self);
    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: Color);
    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadarProjector {
    width: f32,
    height: f32,
    scale: f32,
}

impl Default for RadarProjector {
    fn default() -> Self {
        RadarProjector::new(RADAR_SIZE, RADAR_SIZE, RADAR_SCALE)
    }
}

impl RadarProjector {
    pub fn new(width: f32, height: f32, scale: f32) -> Self {
        RadarProjector {
            width,
            height,
            scale,
        }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Canvas position of a world point: centre + (x, z) * scale.
    pub fn to_screen(&self, world: Vec3) -> Vec2 {
        Vec2::new(
            self.width / 2.0 + world.x * self.scale,
            self.height / 2.0 + world.z * self.scale,
        )
    }

    fn marker(&self, at: Vec3, (radius, color): (f32, Color)) -> DrawCommand {
        let p = self.to_screen(at);
        DrawCommand::FillCircle {
            x: p.x,
            y: p.y,
            radius,
            color,
        }
    }

    /// Builds the full radar frame from the current state.
    pub fn project(&self, airplane: &Airplane, world: &World) -> Vec<DrawCommand> {
        let mut commands = Vec::with_capacity(world.obstacles.len() + 4);
        commands.push(DrawCommand::Clear);
        commands.push(self.marker(airplane.pose.position, AIRPLANE_MARKER));
        commands.extend(
            world
                .obstacles
                .iter()
                .map(|o| self.marker(o.anchor, OBSTACLE_MARKER)),
        );
        if let Some(goal) = &world.goal {
            commands.push(self.marker(goal.anchor, GOAL_MARKER));
        }
        commands.push(DrawCommand::StrokeRect {
            x: 0.0,
            y: 0.0,
            w: self.width,
            h: self.height,
            color: BORDER_COLOR,
        });
        commands
    }
}

/// Paints a projected frame onto a surface, in order.
pub fn replay(commands: &[DrawCommand], surface: &mut dyn RadarSurface) {
    for command in commands {
        match *command {
            DrawCommand::Clear => surface.clear(),
            DrawCommand::FillCircle {
                x,
                y,
                radius,
                color,
            } => surface.fill_circle(x, y, radius, color),
            DrawCommand::StrokeRect { x, y, w, h, color } => surface.stroke_rect(x, y, w, h, color),
        }
    }
}
