use crate::flight::Airplane;
use crate::types::{EntityId, WallSide};
use crate::world::{Wall, World};

/// Classified result of one tick's collision check.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    NoCollision,
    HitObstacle(EntityId),
    ReachedGoal(EntityId),
    HitWall(WallSide),
    /// Every coin touched this tick, each listed once.
    CollectedCoins(Vec<EntityId>),
}

impl Outcome {
    /// Crashes and level clears end the tick's checks; coins do not.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Outcome::HitObstacle(_) | Outcome::ReachedGoal(_) | Outcome::HitWall(_)
        )
    }
}

/// Tests the airplane against the world in fixed priority order:
/// obstacles, goal, walls, then coins. Bounds are computed fresh from the
/// current pose and entity anchors on every call.
pub fn check_collisions(airplane: &Airplane, world: &World, walls: &[Wall]) -> Outcome {
    let hull = airplane.bounds();

    if let Some(tree) = world.obstacles.iter().find(|o| hull.intersects(&o.bounds())) {
        return Outcome::HitObstacle(tree.id);
    }

    if let Some(goal) = world.goal.as_ref().filter(|g| hull.intersects(&g.bounds())) {
        return Outcome::ReachedGoal(goal.id);
    }

    if let Some(wall) = walls.iter().find(|w| hull.intersects(&w.bounds())) {
        return Outcome::HitWall(wall.side);
    }

    let coins: Vec<EntityId> = world
        .coins
        .iter()
        .filter(|c| hull.intersects(&c.bounds()))
        .map(|c| c.id)
        .collect();
    if coins.is_empty() {
        Outcome::NoCollision
    } else {
        Outcome::CollectedCoins(coins)
    }
}
