use macroquad::math::{Quat, Vec3};
use std::fmt;

/// Identifier shared by the simulation and the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Axis-aligned bounding box in world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Aabb { min, max }
    }

    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size * 0.5;
        Aabb {
            min: center - half,
            max: center + half,
        }
    }

    /// Smallest box containing every point. Panics on an empty slice.
    pub fn from_points(points: &[Vec3]) -> Self {
        let first = points[0];
        points[1..].iter().fold(Aabb::new(first, first), |acc, p| Aabb {
            min: acc.min.min(*p),
            max: acc.max.max(*p),
        })
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Inclusive overlap test: boxes that only touch still intersect.
    pub fn intersects(&self, other: &Aabb) -> bool {
        !(other.max.x < self.min.x
            || other.min.x > self.max.x
            || other.max.y < self.min.y
            || other.min.y > self.max.y
            || other.max.z < self.min.z
            || other.min.z > self.max.z)
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

/// Box-shaped part of a composite entity, positioned in its local frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cuboid {
    pub center: Vec3,
    pub size: Vec3,
}

impl Cuboid {
    pub const fn new(center: Vec3, size: Vec3) -> Self {
        Cuboid { center, size }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_center_size(self.center, self.size)
    }

    /// Centre of the bottom face; cylinders are drawn up from here.
    pub fn base(&self) -> Vec3 {
        self.center - Vec3::Y * (self.size.y * 0.5)
    }

    /// World-space corners. `local` spins the part about its own centre,
    /// `frame` rotates the whole assembly about `origin`.
    pub fn corners(&self, frame: Quat, local: Quat, origin: Vec3) -> [Vec3; 8] {
        let h = self.size * 0.5;
        let mut corners = [Vec3::ZERO; 8];
        for (i, corner) in corners.iter_mut().enumerate() {
            let offset = Vec3::new(
                if i & 1 == 0 { -h.x } else { h.x },
                if i & 2 == 0 { -h.y } else { h.y },
                if i & 4 == 0 { -h.z } else { h.z },
            );
            *corner = origin + frame * (self.center + local * offset);
        }
        corners
    }

    /// World-space AABB of the rotated part.
    pub fn world_aabb(&self, frame: Quat, local: Quat, origin: Vec3) -> Aabb {
        Aabb::from_points(&self.corners(frame, local, origin))
    }
}

/// Discrete pilot controls, sampled once per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    YawLeft,
    YawRight,
    Climb,
    Descend,
    Thrust,
}

impl Control {
    pub const ALL: [Control; 5] = [
        Control::YawLeft,
        Control::YawRight,
        Control::Climb,
        Control::Descend,
        Control::Thrust,
    ];
}

/// Which edge of the playfield a wall guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallSide {
    North, // -Z
    South, // +Z
    West,  // -X
    East,  // +X
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrashCause {
    Obstacle,
    Wall,
}

/// Notifications handed from the simulation to the presentation layer.
/// The core never waits for them to be acknowledged.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Crashed { cause: CrashCause, level: u32 },
    LevelCleared { level: u32 },
    CoinCollected { id: EntityId, total: u32 },
}

impl GameEvent {
    pub fn message(&self) -> String {
        match self {
            GameEvent::Crashed {
                cause: CrashCause::Obstacle,
                ..
            } => "Crashed into a tree! Back to the start.".to_string(),
            GameEvent::Crashed {
                cause: CrashCause::Wall,
                ..
            } => "Crashed into a wall! Back to the start.".to_string(),
            GameEvent::LevelCleared { level } => {
                format!("Level {} cleared! On to level {}!", level, level + 1)
            }
            GameEvent::CoinCollected { total, .. } => format!("Coin! ({} total)", total),
        }
    }
}
