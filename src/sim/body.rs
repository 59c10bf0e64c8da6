//! Kinematic body: pose, velocity and commanded intents
//!
//! Integration is closed-form per step. Within one `step` the heading is
//! advanced first, then velocity (using the new heading), then position
//! (using the new velocity).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::normalize_heading;

/// Position plus heading (radians, kept in [0, 2π))
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    pub x: f32,
    pub y: f32,
    pub heading: f32,
}

impl Pose {
    pub fn new(x: f32, y: f32, heading: f32) -> Self {
        Self {
            x,
            y,
            heading: normalize_heading(heading),
        }
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

impl TryFrom<&[f32]> for Pose {
    type Error = SimError;

    fn try_from(components: &[f32]) -> Result<Self, Self::Error> {
        match *components {
            [x, y, heading] => Ok(Pose::new(x, y, heading)),
            _ => Err(SimError::MalformedPose(components.len())),
        }
    }
}

/// Commanded turn direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Turn {
    Left,
    #[default]
    Straight,
    Right,
}

impl Turn {
    /// Signed multiplier applied to the angular speed
    pub fn sign(self) -> f32 {
        match self {
            Turn::Left => -1.0,
            Turn::Straight => 0.0,
            Turn::Right => 1.0,
        }
    }
}

impl TryFrom<i32> for Turn {
    type Error = SimError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Turn::Left),
            0 => Ok(Turn::Straight),
            1 => Ok(Turn::Right),
            _ => Err(SimError::InvalidIntent {
                control: "turn",
                value,
            }),
        }
    }
}

/// Commanded thrust (reverse is accepted but no controller issues it)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Thrust {
    Reverse,
    #[default]
    Off,
    Forward,
}

impl Thrust {
    pub fn sign(self) -> f32 {
        match self {
            Thrust::Reverse => -1.0,
            Thrust::Off => 0.0,
            Thrust::Forward => 1.0,
        }
    }
}

impl TryFrom<i32> for Thrust {
    type Error = SimError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Thrust::Reverse),
            0 => Ok(Thrust::Off),
            1 => Ok(Thrust::Forward),
            _ => Err(SimError::InvalidIntent {
                control: "thrust",
                value,
            }),
        }
    }
}

/// Newtonian body driven by thrust/turn intents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KinematicBody {
    pose: Pose,
    pub velocity: Vec2,
    /// Linear acceleration magnitude while thrusting
    pub acceleration: f32,
    /// Turn rate magnitude (radians/sec)
    pub angular_speed: f32,
    thrust: Thrust,
    turn: Turn,
    sin_heading: f32,
    cos_heading: f32,
}

impl KinematicBody {
    pub fn new(pose: Pose, velocity: Vec2, acceleration: f32, angular_speed: f32) -> Self {
        let pose = Pose::new(pose.x, pose.y, pose.heading);
        let (sin_heading, cos_heading) = pose.heading.sin_cos();
        Self {
            pose,
            velocity,
            acceleration,
            angular_speed,
            thrust: Thrust::Off,
            turn: Turn::Straight,
            sin_heading,
            cos_heading,
        }
    }

    #[inline]
    pub fn pose(&self) -> Pose {
        self.pose
    }

    /// Replace the whole pose (heading is normalized, trig cache refreshed)
    pub fn set_pose(&mut self, pose: Pose) {
        self.pose = Pose::new(pose.x, pose.y, pose.heading);
        let (sin, cos) = self.pose.heading.sin_cos();
        self.sin_heading = sin;
        self.cos_heading = cos;
    }

    /// Move without touching heading or the trig cache
    pub(crate) fn set_position(&mut self, x: f32, y: f32) {
        self.pose.x = x;
        self.pose.y = y;
    }

    #[inline]
    pub fn thrust(&self) -> Thrust {
        self.thrust
    }

    pub fn set_thrust(&mut self, thrust: Thrust) {
        self.thrust = thrust;
    }

    #[inline]
    pub fn turn(&self) -> Turn {
        self.turn
    }

    pub fn set_turn(&mut self, turn: Turn) {
        self.turn = turn;
    }

    /// Unit vector along the current heading (cached)
    #[inline]
    pub fn forward(&self) -> Vec2 {
        Vec2::new(self.cos_heading, self.sin_heading)
    }

    /// Advance heading, then velocity, then position by `dt`
    pub fn step(&mut self, dt: f32) {
        if self.turn != Turn::Straight {
            let heading = self.pose.heading + self.turn.sign() * self.angular_speed * dt;
            self.pose.heading = normalize_heading(heading);
            let (sin, cos) = self.pose.heading.sin_cos();
            self.sin_heading = sin;
            self.cos_heading = cos;
        }

        if self.thrust != Thrust::Off {
            self.velocity += self.forward() * (self.thrust.sign() * self.acceleration * dt);
        }

        self.pose.x += self.velocity.x * dt;
        self.pose.y += self.velocity.y * dt;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f32::consts::{PI, TAU};

    const EPS: f32 = 1e-4;

    fn body_at(x: f32, y: f32, heading: f32) -> KinematicBody {
        KinematicBody::new(Pose::new(x, y, heading), Vec2::ZERO, 1.5, 0.1 * PI)
    }

    #[test]
    fn test_thrust_increases_velocity() {
        let mut body = KinematicBody::new(Pose::default(), Vec2::ZERO, 10.0, 0.1 * PI);
        body.set_thrust(Thrust::Forward);
        body.step(0.1);
        assert!((body.velocity.x - 1.0).abs() < EPS);
        assert!(body.velocity.y.abs() < EPS);
    }

    #[test]
    fn test_reverse_thrust_slows_along_heading() {
        let mut body = KinematicBody::new(Pose::new(0.0, 0.0, PI / 2.0), Vec2::new(0.0, 5.0), 10.0, 0.0);
        body.set_thrust(Thrust::Reverse);
        body.step(0.1);
        assert!((body.velocity.y - 4.0).abs() < EPS);
        assert!(body.velocity.x.abs() < EPS);
        assert!((body.pose().y - 0.4).abs() < EPS);
    }

    #[test]
    fn test_turn_advances_heading() {
        let mut body = body_at(0.0, 0.0, 0.0);
        body.set_turn(Turn::Right);
        body.step(0.1);
        assert!((body.pose().heading - 0.1 * 0.1 * PI).abs() < EPS);
    }

    #[test]
    fn test_turn_left_wraps_below_zero() {
        let mut body = KinematicBody::new(Pose::default(), Vec2::ZERO, 1.5, PI / 4.0);
        body.set_turn(Turn::Left);
        body.step(1.0);
        assert!((body.pose().heading - (TAU - PI / 4.0)).abs() < EPS);
    }

    #[test]
    fn test_turn_and_thrust_share_new_heading() {
        // Heading reaches π/2 this step, so thrust must push along +y
        let mut body = KinematicBody::new(Pose::default(), Vec2::ZERO, 2.0, PI / 2.0);
        body.set_turn(Turn::Right);
        body.set_thrust(Thrust::Forward);
        body.step(1.0);
        assert!(body.velocity.x.abs() < EPS);
        assert!((body.velocity.y - 2.0).abs() < EPS);
        assert!((body.pose().y - 2.0).abs() < EPS);
    }

    #[test]
    fn test_multi_phase_trajectory() {
        let angular = 0.1 * PI;
        let mut body = KinematicBody::new(Pose::new(1.0, 2.0, PI / 2.0), Vec2::ZERO, 1.5, angular);

        body.set_thrust(Thrust::Forward);
        body.step(1.0);
        assert!((body.pose().x - 1.0).abs() < EPS);
        assert!((body.pose().y - 3.5).abs() < EPS);

        body.set_thrust(Thrust::Off);
        body.set_turn(Turn::Right);
        body.step(3.0);
        let heading = PI / 2.0 + angular * 3.0;
        assert!((body.pose().y - 8.0).abs() < EPS);
        assert!((body.pose().heading - heading).abs() < EPS);

        body.set_turn(Turn::Straight);
        body.set_thrust(Thrust::Forward);
        body.step(1.0);
        let vx = 1.5 * heading.cos();
        let vy = 1.5 + 1.5 * heading.sin();
        assert!((body.pose().x - (1.0 + vx)).abs() < EPS);
        assert!((body.pose().y - (8.0 + vy)).abs() < EPS);
    }

    #[test]
    fn test_spin_with_start_velocity() {
        let mut body = KinematicBody::new(Pose::default(), Vec2::new(1.0, 2.0), 1.5, PI / 4.0);
        body.set_turn(Turn::Left);
        body.step(1.5);
        let pose = body.pose();
        assert!((pose.x - 1.5).abs() < EPS);
        assert!((pose.y - 3.0).abs() < EPS);
        assert!((pose.heading - (-PI / 4.0 * 1.5).rem_euclid(TAU)).abs() < EPS);
    }

    #[test]
    fn test_pose_from_slice() {
        let pose = Pose::try_from([1.0f32, 2.0, 0.0].as_slice()).unwrap();
        assert_eq!(pose, Pose::new(1.0, 2.0, 0.0));

        let err = Pose::try_from([1.0f32, 2.0].as_slice()).unwrap_err();
        assert_eq!(err, SimError::MalformedPose(2));
        let err = Pose::try_from([1.0f32, 2.0, 3.0, 4.0].as_slice()).unwrap_err();
        assert_eq!(err, SimError::MalformedPose(4));
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_set_pose_refreshes_forward() {
        let mut body = body_at(0.0, 0.0, 0.0);
        body.set_pose(Pose::new(5.0, 5.0, PI / 2.0));
        assert!(body.forward().x.abs() < EPS);
        assert!((body.forward().y - 1.0).abs() < EPS);
    }

    #[test]
    fn test_intent_conversions() {
        assert_eq!(Turn::try_from(-1).unwrap(), Turn::Left);
        assert_eq!(Turn::try_from(1).unwrap(), Turn::Right);
        assert_eq!(Thrust::try_from(0).unwrap(), Thrust::Off);
        assert_eq!(Thrust::try_from(-1).unwrap(), Thrust::Reverse);
    }

    proptest! {
        #[test]
        fn prop_heading_stays_normalized(
            heading in -100.0f32..100.0,
            turn in -1i32..=1,
            angular in 0.0f32..20.0,
            dt in 0.0f32..5.0,
        ) {
            let mut body = KinematicBody::new(Pose::new(0.0, 0.0, heading), Vec2::ZERO, 1.0, angular);
            body.set_turn(Turn::try_from(turn).unwrap());
            body.step(dt);
            let h = body.pose().heading;
            prop_assert!((0.0..TAU).contains(&h));
        }

        #[test]
        fn prop_idle_body_moves_uniformly(
            x in -500.0f32..500.0,
            y in -500.0f32..500.0,
            vx in -50.0f32..50.0,
            vy in -50.0f32..50.0,
            dt in 0.0f32..2.0,
        ) {
            let mut body = KinematicBody::new(Pose::new(x, y, 1.0), Vec2::new(vx, vy), 3.0, 2.0);
            body.step(dt);
            prop_assert_eq!(body.velocity, Vec2::new(vx, vy));
            prop_assert!((body.pose().x - (x + vx * dt)).abs() < 1e-3);
            prop_assert!((body.pose().y - (y + vy * dt)).abs() < 1e-3);
            prop_assert_eq!(body.pose().heading, normalize_heading(1.0));
        }

        #[test]
        fn prop_out_of_range_intents_rejected(value in any::<i32>()) {
            prop_assume!(!(-1..=1).contains(&value));
            let turn_err = Turn::try_from(value).unwrap_err();
            let thrust_err = Thrust::try_from(value).unwrap_err();
            prop_assert!(turn_err.is_invalid_argument());
            prop_assert!(thrust_err.is_invalid_argument());
        }
    }
}
