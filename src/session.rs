use crate::collision::{Outcome, check_collisions};
use crate::config::GameConfig;
use crate::error::ConfigError;
use crate::flight::{Airplane, FlightModel};
use crate::input::{ControlState, InputSource};
use crate::radar::{DrawCommand, RadarProjector};
use crate::scene::SceneRegistry;
use crate::types::{CrashCause, GameEvent};
use crate::world::{Wall, World, WorldGenerator};
use log::info;

/// Everything one tick produced, handed to the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub tick: u64,
    pub outcome: Outcome,
    pub events: Vec<GameEvent>,
    pub radar: Vec<DrawCommand>,
}

/// Owns the world, the airplane and the counters for one play session.
#[derive(Debug)]
pub struct SessionState {
    config: GameConfig,
    generator: WorldGenerator,
    flight: FlightModel,
    radar: RadarProjector,
    airplane: Airplane,
    world: World,
    walls: Vec<Wall>,
    coin_count: u32, // Carried across levels
    level: u32,
    tick: u64,
}

impl SessionState {
    /// Validates the config, builds the walls and the first level.
    pub fn new(config: GameConfig, scene: &mut dyn SceneRegistry) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut generator = WorldGenerator::new(config.seed, &config.layout);
        let walls = generator.build_walls(scene);
        let layout = &config.layout;
        let world = generator.generate(
            layout.rows,
            layout.cols,
            layout.spacing,
            layout.safe_radius,
            scene,
        );
        info!(
            "Level 1 ready: {} trees, {} coins, seed {:?}",
            world.obstacles.len(),
            world.coins.len(),
            config.seed
        );

        Ok(SessionState {
            flight: FlightModel::new(config.flight),
            radar: RadarProjector::default(),
            config,
            generator,
            airplane: Airplane::new(),
            world,
            walls,
            coin_count: 0,
            level: 1,
            tick: 0,
        })
    }

    pub fn airplane(&self) -> &Airplane {
        &self.airplane
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    #[cfg(test)]
    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    pub fn coin_count(&self) -> u32 {
        self.coin_count
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Radar frame for the current state without advancing the simulation.
    pub fn project_radar(&self) -> Vec<DrawCommand> {
        self.radar.project(&self.airplane, &self.world)
    }

    /// Runs one tick: input, flight, collisions, consequences, radar.
    pub fn tick(
        &mut self,
        input: &dyn InputSource,
        dt: f32,
        scene: &mut dyn SceneRegistry,
    ) -> TickReport {
        self.tick += 1;

        let controls = ControlState::sample(input);
        let pose = self.flight.step(&mut self.airplane, &controls, dt);
        crate::debug_flight!(
            self.level,
            self.tick,
            "pos=({:.2}, {:.2}, {:.2}) yaw={:.3} speed={:.3}",
            pose.position.x,
            pose.position.y,
            pose.position.z,
            pose.yaw,
            pose.speed
        );

        let outcome = check_collisions(&self.airplane, &self.world, &self.walls);
        if outcome != Outcome::NoCollision {
            crate::debug_collision!(self.level, self.tick, "{:?}", outcome);
        }
        let events = self.apply_outcome(&outcome, scene);

        let radar = self.project_radar();
        crate::debug_radar!(self.level, self.tick, "{} radar commands", radar.len());

        TickReport {
            tick: self.tick,
            outcome,
            events,
            radar,
        }
    }

    fn apply_outcome(&mut self, outcome: &Outcome, scene: &mut dyn SceneRegistry) -> Vec<GameEvent> {
        match outcome {
            Outcome::NoCollision => Vec::new(),
            Outcome::HitObstacle(id) => {
                info!("Level {} crash: hit tree {}", self.level, id);
                self.airplane.reset();
                vec![GameEvent::Crashed {
                    cause: CrashCause::Obstacle,
                    level: self.level,
                }]
            }
            Outcome::HitWall(side) => {
                info!("Level {} crash: hit {:?} wall", self.level, side);
                self.airplane.reset();
                vec![GameEvent::Crashed {
                    cause: CrashCause::Wall,
                    level: self.level,
                }]
            }
            Outcome::ReachedGoal(_) => {
                let cleared = self.level;
                self.advance_level(scene);
                vec![GameEvent::LevelCleared { level: cleared }]
            }
            Outcome::CollectedCoins(ids) => ids
                .iter()
                .filter_map(|id| {
                    // Gone already means it was counted already
                    let coin = self.world.remove_coin(*id)?;
                    scene.remove_renderable(coin.id);
                    self.coin_count += 1;
                    crate::debug_session!(
                        self.level,
                        self.tick,
                        "Collected coin {}, total {}",
                        coin.id,
                        self.coin_count
                    );
                    Some(GameEvent::CoinCollected {
                        id: coin.id,
                        total: self.coin_count,
                    })
                })
                .collect(),
        }
    }

    // Clear, reset, regenerate. Walls and the coin count carry over.
    fn advance_level(&mut self, scene: &mut dyn SceneRegistry) {
        info!("Level {} cleared after {} ticks", self.level, self.tick);
        self.generator.clear(&mut self.world, scene);
        self.airplane.reset();

        let layout = &self.config.layout;
        self.world = self.generator.generate(
            layout.rows,
            layout.cols,
            layout.spacing,
            layout.safe_radius,
            scene,
        );
        self.level += 1;
        crate::debug_world!(
            self.level,
            self.tick,
            "Regenerated: {} trees, {} coins, goal at {:?}",
            self.world.obstacles.len(),
            self.world.coins.len(),
            self.world.goal.map(|g| (g.anchor.x, g.anchor.z))
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FlightParams, WorldLayout};
    use crate::flight::Pose;
    use crate::scene::{RecordingScene, RenderableKind};
    use crate::types::{Control, EntityId, WallSide};
    use crate::world::{Coin, Goal};
    use macroquad::math::Vec3;
    use std::collections::HashSet;

    const DT: f32 = 1.0 / 60.0;

    fn config(seed: u64) -> GameConfig {
        GameConfig::new(WorldLayout::default(), FlightParams::default(), Some(seed))
    }

    fn session(seed: u64) -> (SessionState, RecordingScene) {
        let mut scene = RecordingScene::new();
        let session = SessionState::new(config(seed), &mut scene).expect("valid config");
        (session, scene)
    }

    fn idle() -> ControlState {
        ControlState::default()
    }

    #[test]
    fn test_new_session_registers_world_and_walls() {
        let (session, scene) = session(1);
        assert_eq!(session.level(), 1);
        assert_eq!(session.coin_count(), 0);
        assert!(session.airplane().is_at_spawn());
        assert_eq!(session.walls().len(), 4);
        assert_eq!(scene.count(|k| *k == RenderableKind::Goal), 1);
        assert_eq!(
            scene.live.len(),
            session.world().entity_ids().len() + session.walls().len()
        );
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut scene = RecordingScene::new();
        let mut bad = config(1);
        bad.layout.spacing = -1.0;
        let err = SessionState::new(bad, &mut scene).unwrap_err();
        assert_eq!(err, ConfigError::InvalidSpacing(-1.0));
        assert!(scene.live.is_empty());
    }

    #[test]
    fn test_idle_tick_at_spawn() {
        let (mut session, mut scene) = session(2);
        let report = session.tick(&idle(), DT, &mut scene);
        assert_eq!(report.tick, 1);
        assert_eq!(report.outcome, Outcome::NoCollision);
        assert!(report.events.is_empty());
        assert_eq!(report.radar, session.project_radar());
    }

    #[test]
    fn test_wall_hit_resets_pose_and_keeps_world() {
        let (mut session, mut scene) = session(3);
        session.world.obstacles.clear();
        let before = session.world.clone();
        session.airplane.pose.position = Vec3::new(99.5, 2.0, 0.0);
        session.airplane.pose.speed = 3.0;

        let report = session.tick(&idle(), DT, &mut scene);
        assert_eq!(report.outcome, Outcome::HitWall(WallSide::East));
        assert_eq!(
            report.events,
            vec![GameEvent::Crashed {
                cause: CrashCause::Wall,
                level: 1
            }]
        );
        assert_eq!(session.airplane().pose, Pose::SPAWN);
        assert_eq!(session.world(), &before);
        assert_eq!(session.level(), 1);
    }

    #[test]
    fn test_tree_hit_resets_pose() {
        let (mut session, mut scene) = session(4);
        let tree = session.world.obstacles[0];
        let before = session.world.clone();
        session.airplane.pose.position = Vec3::new(tree.anchor.x, 3.0, tree.anchor.z);

        let report = session.tick(&idle(), DT, &mut scene);
        assert_eq!(report.outcome, Outcome::HitObstacle(tree.id));
        assert!(session.airplane().is_at_spawn());
        assert_eq!(session.world(), &before);
        assert_eq!(scene.count(|k| *k == RenderableKind::Tree), before.obstacles.len());
    }

    #[test]
    fn test_reaching_goal_regenerates_world() {
        let (mut session, mut scene) = session(5);
        session.world.obstacles.clear();
        session.world.coins.push(Coin::new(EntityId(9_000), -50.0, -50.0));
        session.coin_count = 3;
        let old_ids: HashSet<EntityId> = session.world.entity_ids().into_iter().collect();
        let goal = session.world.goal.expect("goal");
        session.airplane.pose.position = Vec3::new(goal.anchor.x, 2.0, goal.anchor.z);
        session.airplane.pose.yaw = 1.0;

        let report = session.tick(&idle(), DT, &mut scene);
        assert_eq!(report.outcome, Outcome::ReachedGoal(goal.id));
        assert_eq!(report.events, vec![GameEvent::LevelCleared { level: 1 }]);

        assert_eq!(session.level(), 2);
        assert_eq!(session.airplane().pose, Pose::SPAWN);
        assert_eq!(session.coin_count(), 3);
        assert!(session.world().goal.is_some());
        assert!(
            session
                .world()
                .entity_ids()
                .iter()
                .all(|id| !old_ids.contains(id))
        );
        for id in &old_ids {
            assert!(!scene.live.contains_key(id));
        }
        assert_eq!(scene.count(|k| *k == RenderableKind::Goal), 1);
        assert_eq!(scene.count(|k| matches!(k, RenderableKind::Wall { .. })), 4);
    }

    #[test]
    fn test_coin_collection_is_idempotent() {
        let (mut session, mut scene) = session(6);
        session.world.obstacles.clear();
        for (n, x) in [(1, 0.0), (2, 0.5)] {
            let coin = Coin::new(EntityId(10_000 + n), x, 0.0);
            session.world.coins.push(coin);
        }
        let coins_before = session.world.coins.len();

        let report = session.tick(&idle(), DT, &mut scene);
        assert_eq!(
            report.outcome,
            Outcome::CollectedCoins(vec![EntityId(10_001), EntityId(10_002)])
        );
        assert_eq!(session.coin_count(), 2);
        assert_eq!(report.events.len(), 2);
        assert_eq!(session.world().coins.len(), coins_before - 2);
        assert_eq!(scene.removed, vec![EntityId(10_001), EntityId(10_002)]);

        // Hovering over the same spot again counts nothing
        let report = session.tick(&idle(), DT, &mut scene);
        assert_eq!(report.outcome, Outcome::NoCollision);
        assert_eq!(session.coin_count(), 2);
    }

    #[test]
    fn test_duplicate_coin_ids_in_outcome_count_once() {
        let (mut session, mut scene) = session(7);
        session.world.coins.push(Coin::new(EntityId(20_000), 0.0, 0.0));
        let outcome = Outcome::CollectedCoins(vec![EntityId(20_000), EntityId(20_000)]);
        let events = session.apply_outcome(&outcome, &mut scene);
        assert_eq!(events.len(), 1);
        assert_eq!(session.coin_count(), 1);
    }

    #[test]
    fn test_terminal_outcome_skips_coins() {
        let (mut session, mut scene) = session(8);
        session.world.obstacles.clear();
        session.world.goal = Some(Goal::new(EntityId(30_000), 0.0, 0.0));
        session.world.coins.push(Coin::new(EntityId(30_001), 0.0, 0.0));

        let report = session.tick(&idle(), DT, &mut scene);
        assert_eq!(report.outcome, Outcome::ReachedGoal(EntityId(30_000)));
        assert_eq!(session.coin_count(), 0);
    }

    #[test]
    fn test_single_goal_across_many_levels() {
        let (mut session, mut scene) = session(9);
        for level in 1..=5 {
            session.world.obstacles.clear();
            let goal = session.world.goal.expect("goal");
            session.airplane.pose.position = Vec3::new(goal.anchor.x, 2.0, goal.anchor.z);
            let report = session.tick(&idle(), DT, &mut scene);
            assert_eq!(report.events, vec![GameEvent::LevelCleared { level }]);
            assert_eq!(scene.count(|k| *k == RenderableKind::Goal), 1);
        }
        assert_eq!(session.level(), 6);
        assert_eq!(scene.duplicate_adds, 0);
    }

    #[test]
    fn test_thrust_through_session() {
        let (mut session, mut scene) = session(10);
        session.world.obstacles.clear();
        session.world.coins.clear();
        let thrust = ControlState::default().with(Control::Thrust);
        let mut last_z = session.airplane().pose.position.z;
        for _ in 0..120 {
            let report = session.tick(&thrust, DT, &mut scene);
            assert_eq!(report.outcome, Outcome::NoCollision);
            let z = session.airplane().pose.position.z;
            assert!(z <= last_z);
            last_z = z;
        }
        assert!(last_z < -10.0);
        assert_eq!(session.tick_count(), 120);
    }

    #[test]
    fn test_same_seed_same_session() {
        let (a, _) = session(11);
        let (b, _) = session(11);
        assert_eq!(a.world(), b.world());
        assert_eq!(a.project_radar(), b.project_radar());
    }
}
