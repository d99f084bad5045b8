use crate::config::{FlightParams, SPAWN_POSITION};
use crate::input::ControlState;
use crate::types::{Aabb, Cuboid};
use crate::utils;
use macroquad::math::{Quat, Vec3};

/// Airframe parts in the airplane's local frame: fuselage, wing, tail.
pub const AIRFRAME: [Cuboid; 3] = [
    Cuboid::new(Vec3::ZERO, Vec3::new(0.6, 0.6, 3.0)),
    Cuboid::new(Vec3::new(0.0, 0.3, 0.0), Vec3::new(3.0, 0.1, 1.0)),
    Cuboid::new(Vec3::new(0.0, 0.3, -1.2), Vec3::new(1.0, 0.1, 0.5)),
];

pub const WING_FLAP_RATE: f32 = 5.0; // rad/s of the flap oscillation
pub const WING_FLAP_ANGLE: f32 = 0.1; // Peak roll of the wing, radians

/// Position, heading and airspeed of the airplane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub yaw: f32,   // Radians about +Y, wrapped to (-PI, PI]
    pub speed: f32, // Units per second, never negative
}

impl Pose {
    pub const SPAWN: Pose = Pose {
        position: SPAWN_POSITION,
        yaw: 0.0,
        speed: 0.0,
    };
}

impl Default for Pose {
    fn default() -> Self {
        Pose::SPAWN
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Airplane {
    pub pose: Pose,
    clock: f32, // Seconds flown; drives the wing flap and survives resets
}

impl Airplane {
    pub fn new() -> Self {
        Self::default()
    }

    /// Back to spawn: position (0, 2, 0), no rotation, no speed.
    pub fn reset(&mut self) {
        self.pose = Pose::SPAWN;
    }

    pub fn is_at_spawn(&self) -> bool {
        self.pose == Pose::SPAWN
    }

    pub fn rotation(&self) -> Quat {
        utils::yaw_rotation(self.pose.yaw)
    }

    pub fn heading(&self) -> Vec3 {
        utils::heading(self.pose.yaw)
    }

    /// Current wing roll about the fuselage axis.
    pub fn wing_flap(&self) -> f32 {
        (self.clock * WING_FLAP_RATE).sin() * WING_FLAP_ANGLE
    }

    /// Rotation of each airframe part about its own centre.
    pub fn part_spins(&self) -> [Quat; 3] {
        [
            Quat::IDENTITY,
            Quat::from_rotation_z(self.wing_flap()),
            Quat::IDENTITY,
        ]
    }

    /// World-space AABB of the rotated airframe, flapped wing included,
    /// computed from the current pose.
    pub fn bounds(&self) -> Aabb {
        let rotation = self.rotation();
        let spins = self.part_spins();
        AIRFRAME
            .iter()
            .zip(spins)
            .map(|(part, spin)| part.world_aabb(rotation, spin, self.pose.position))
            .reduce(|acc, b| acc.union(&b))
            .unwrap_or_else(|| Aabb::new(self.pose.position, self.pose.position))
    }
}

/// Integrates the airplane pose from discrete controls.
#[derive(Debug, Clone, Copy)]
pub struct FlightModel {
    params: FlightParams,
}

impl FlightModel {
    pub fn new(params: FlightParams) -> Self {
        FlightModel { params }
    }

    /// Advances the airplane by `dt` seconds and returns the new pose.
    pub fn step(&self, airplane: &mut Airplane, controls: &ControlState, dt: f32) -> Pose {
        let p = &self.params;
        airplane.clock += dt;
        let pose = &mut airplane.pose;

        // Rotation: instant, no inertia
        if controls.yaw_left {
            pose.yaw += p.yaw_rate * dt;
        }
        if controls.yaw_right {
            pose.yaw -= p.yaw_rate * dt;
        }
        pose.yaw = utils::wrap_angle(pose.yaw);

        // Altitude
        if controls.climb {
            pose.position.y = (pose.position.y + p.climb_rate * dt).min(p.max_altitude);
        }
        if controls.descend {
            pose.position.y = (pose.position.y - p.climb_rate * dt).max(p.min_altitude);
        }
        pose.position.y = pose.position.y.clamp(p.min_altitude, p.max_altitude);

        // Thrust, or decay toward a stop. No reverse flight.
        let target = if controls.thrust { p.max_speed } else { 0.0 };
        pose.speed = utils::approach(pose.speed, target, p.acceleration * dt).clamp(0.0, p.max_speed);

        // Velocity follows the heading exactly, no sideways drift
        pose.position += utils::heading(pose.yaw) * pose.speed * dt;

        *pose
    }
}

impl Default for FlightModel {
    fn default() -> Self {
        Self::new(FlightParams::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MAX_ALTITUDE, MAX_SPEED, MIN_ALTITUDE};
    use crate::types::Control;
    use ::rand::prelude::*;
    use ::rand::rngs::StdRng;
    use assert_approx_eq::assert_approx_eq;
    use std::f32::consts::FRAC_PI_2;

    const DT: f32 = 1.0 / 60.0;

    fn thrust() -> ControlState {
        ControlState::default().with(Control::Thrust)
    }

    #[test]
    fn test_spawn_pose() {
        let airplane = Airplane::new();
        assert_eq!(airplane.pose.position, Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(airplane.pose.yaw, 0.0);
        assert_eq!(airplane.pose.speed, 0.0);
        assert!(airplane.is_at_spawn());
    }

    #[test]
    fn test_clamping_under_arbitrary_input() {
        let model = FlightModel::default();
        let mut airplane = Airplane::new();
        let mut rng = StdRng::seed_from_u64(1234);

        for _ in 0..5_000 {
            let mut controls = ControlState::default();
            for control in Control::ALL {
                controls.set(control, rng.r#gen::<bool>());
            }
            let pose = model.step(&mut airplane, &controls, DT);
            assert!(pose.position.y >= MIN_ALTITUDE && pose.position.y <= MAX_ALTITUDE);
            assert!(pose.speed >= 0.0 && pose.speed <= MAX_SPEED);
        }
    }

    #[test]
    fn test_altitude_saturates() {
        let model = FlightModel::default();
        let mut airplane = Airplane::new();
        let climb = ControlState::default().with(Control::Climb);
        for _ in 0..200 {
            model.step(&mut airplane, &climb, DT);
        }
        assert_approx_eq!(airplane.pose.position.y, MAX_ALTITUDE);

        let descend = ControlState::default().with(Control::Descend);
        for _ in 0..200 {
            model.step(&mut airplane, &descend, DT);
        }
        assert_approx_eq!(airplane.pose.position.y, MIN_ALTITUDE);
    }

    #[test]
    fn test_climb_increment_per_tick() {
        let model = FlightModel::default();
        let mut airplane = Airplane::new();
        let pose = model.step(&mut airplane, &ControlState::default().with(Control::Climb), DT);
        assert_approx_eq!(pose.position.y, 2.1, 1e-5);
    }

    #[test]
    fn test_thrust_moves_along_negative_z() {
        let model = FlightModel::default();
        let mut airplane = Airplane::new();
        let ticks = 300;
        let mut last_displacement = 0.0;

        for _ in 0..ticks {
            let pose = model.step(&mut airplane, &thrust(), DT);
            let displacement = -pose.position.z;
            assert!(displacement >= last_displacement);
            assert_approx_eq!(pose.position.x, 0.0);
            last_displacement = displacement;
        }

        // Speed saturates after 100 ticks, so the trip falls short of the
        // full-speed distance by roughly half the ramp.
        let full_speed_distance = ticks as f32 * MAX_SPEED * DT;
        assert_approx_eq!(airplane.pose.speed, MAX_SPEED, 1e-4);
        assert!(last_displacement < full_speed_distance);
        assert!(last_displacement > full_speed_distance - 100.0 * MAX_SPEED * DT);
        assert_approx_eq!(airplane.pose.position.y, 2.0);
    }

    #[test]
    fn test_speed_decays_without_thrust() {
        let model = FlightModel::default();
        let mut airplane = Airplane::new();
        for _ in 0..10 {
            model.step(&mut airplane, &thrust(), DT);
        }
        assert_approx_eq!(airplane.pose.speed, 1.2, 1e-4);

        let coast = ControlState::default();
        for _ in 0..50 {
            model.step(&mut airplane, &coast, DT);
        }
        assert_eq!(airplane.pose.speed, 0.0);
    }

    #[test]
    fn test_yaw_turns_heading() {
        let model = FlightModel::default();
        let mut airplane = Airplane::new();
        let left = ControlState::default().with(Control::YawLeft);
        let pose = model.step(&mut airplane, &left, DT);
        assert_approx_eq!(pose.yaw, 0.03, 1e-6);

        // Opposing inputs cancel
        let both = left.with(Control::YawRight);
        let pose = model.step(&mut airplane, &both, DT);
        assert_approx_eq!(pose.yaw, 0.03, 1e-6);

        airplane.pose.yaw = FRAC_PI_2;
        airplane.pose.speed = MAX_SPEED;
        let start = airplane.pose.position;
        let pose = model.step(&mut airplane, &thrust(), DT);
        assert!(pose.position.x < start.x);
        assert_approx_eq!(pose.position.z, start.z, 1e-5);
    }

    #[test]
    fn test_bounds_follow_pose() {
        let mut airplane = Airplane::new();
        let level = airplane.bounds();
        assert_approx_eq!(level.min.x, -1.5);
        assert_approx_eq!(level.max.x, 1.5);
        assert_approx_eq!(level.min.z, -1.5);
        assert_approx_eq!(level.max.z, 1.5);
        assert_approx_eq!(level.min.y, 1.7);
        assert_approx_eq!(level.max.y, 2.35);

        airplane.pose.yaw = FRAC_PI_2;
        airplane.pose.position = Vec3::new(50.0, 4.0, 0.0);
        let turned = airplane.bounds();
        assert_approx_eq!(turned.center().x, 50.0, 1e-4);
        assert_approx_eq!(turned.size().z, 3.0, 1e-4);
        assert_approx_eq!(turned.min.y, 3.7, 1e-5);
    }

    #[test]
    fn test_flapped_wing_widens_bounds() {
        let model = FlightModel::default();
        let mut airplane = Airplane::new();
        let level = airplane.bounds();

        // sin(5t) peaks at t = PI/10
        let peak = std::f32::consts::PI / 10.0;
        model.step(&mut airplane, &ControlState::default(), peak);
        assert_approx_eq!(airplane.wing_flap(), WING_FLAP_ANGLE, 1e-5);

        let flapped = airplane.bounds();
        // Wing tip rises by 1.5 * sin(0.1)
        assert!(flapped.max.y > level.max.y + 0.1);
        assert_approx_eq!(flapped.max.y, 2.3 + 1.5 * 0.1f32.sin() + 0.05 * 0.1f32.cos(), 1e-4);
        assert_approx_eq!(flapped.min.y, level.min.y, 1e-5);
    }

    #[test]
    fn test_reset_keeps_flap_clock() {
        let model = FlightModel::default();
        let mut airplane = Airplane::new();
        model.step(&mut airplane, &thrust(), 0.2);
        let flap = airplane.wing_flap();
        airplane.reset();
        assert!(airplane.is_at_spawn());
        assert_eq!(airplane.wing_flap(), flap);
    }

    #[test]
    fn test_reset_restores_spawn() {
        let model = FlightModel::default();
        let mut airplane = Airplane::new();
        let controls = thrust().with(Control::Climb).with(Control::YawLeft);
        for _ in 0..30 {
            model.step(&mut airplane, &controls, DT);
        }
        assert!(!airplane.is_at_spawn());
        airplane.reset();
        assert!(airplane.is_at_spawn());
    }
}
