// src/device.rs - Sensor device handle and a simulated stand-in
use crate::reading::{ArmSample, BoneSample, BoneType, FingerSample, FingerType, HandSample, Reading};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DevicePolicy {
    #[default]
    Default,
    /// Lets the controller be paused and resumed from the host.
    AllowPauseResume,
    BackgroundFrames,
}

/// What the tracker needs from a hand-tracking controller.
pub trait DeviceHandle {
    /// Physical/driver connection. Read-only from our side.
    fn is_connected(&self) -> bool;
    fn is_paused(&self) -> bool;
    fn set_paused(&mut self, paused: bool);
    fn set_policy(&mut self, policy: DevicePolicy);
    /// Latest frame, or `None` when the controller has nothing to give.
    fn current_reading(&mut self) -> Option<Reading>;
}

impl<D: DeviceHandle + ?Sized> DeviceHandle for Box<D> {
    fn is_connected(&self) -> bool {
        (**self).is_connected()
    }

    fn is_paused(&self) -> bool {
        (**self).is_paused()
    }

    fn set_paused(&mut self, paused: bool) {
        (**self).set_paused(paused)
    }

    fn set_policy(&mut self, policy: DevicePolicy) {
        (**self).set_policy(policy)
    }

    fn current_reading(&mut self) -> Option<Reading> {
        (**self).current_reading()
    }
}

// Rough adult hand proportions in millimetres, thumb first
const BONE_LENGTHS: [[f64; 4]; 5] = [
    [0.0, 40.0, 30.0, 25.0],
    [65.0, 40.0, 25.0, 18.0],
    [62.0, 45.0, 28.0, 19.0],
    [58.0, 42.0, 27.0, 19.0],
    [53.0, 33.0, 19.0, 17.0],
];
const FINGER_SPACING: f64 = 18.0;
const FOREARM_LENGTH: f64 = 250.0;

/// Device that animates one or two hands over an internal clock instead of
/// talking to hardware. The clock advances once per served reading.
pub struct SimulatedDevice {
    connected: bool,
    paused: bool,
    policy: DevicePolicy,
    hand_count: usize,
    sim_time: f64,
    frames_served: u64,
}

impl SimulatedDevice {
    pub fn new(hand_count: usize) -> Self {
        Self {
            connected: true,
            paused: false,
            policy: DevicePolicy::Default,
            hand_count: hand_count.min(2),
            sim_time: 0.0,
            frames_served: 0,
        }
    }

    pub fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
    }

    pub fn policy(&self) -> DevicePolicy {
        self.policy
    }

    pub fn frames_served(&self) -> u64 {
        self.frames_served
    }

    fn generate_hand(&self, slot: usize) -> HandSample {
        let t = self.sim_time;
        let side = if slot == 0 { -1.0 } else { 1.0 };

        let palm_position = Vector3::new(
            side * 80.0 + 10.0 * t.sin(),
            200.0 + 20.0 * (t * 0.5).cos(),
            5.0 * (t + side).sin(),
        );
        let palm_direction = Vector3::new(0.1 * (t * 0.3).sin(), 0.0, -1.0).normalize();
        let palm_normal = Vector3::new(0.0, -1.0, 0.0);

        // Curl oscillates between flat and half-closed
        let curl = 0.4 * (0.5 + 0.5 * (t * 0.8).sin());
        let lateral = palm_direction.cross(&palm_normal).normalize();

        let fingers = FingerType::ALL
            .iter()
            .enumerate()
            .map(|(i, &kind)| {
                let offset = (i as f64 - 2.0) * FINGER_SPACING * side;
                let mut joint = palm_position + lateral * offset + palm_direction * 10.0;
                let mut heading = palm_direction;

                let bones = BoneType::ALL
                    .iter()
                    .zip(BONE_LENGTHS[i].iter())
                    .map(|(&bone, &length)| {
                        let next = joint + heading * length;
                        let sample = BoneSample::between(bone, joint, next);
                        joint = next;
                        heading = (heading + palm_normal * curl).normalize();
                        sample
                    })
                    .collect();

                FingerSample { kind, bones }
            })
            .collect();

        let wrist_position = palm_position - palm_direction * 50.0;
        let elbow_position = wrist_position - palm_direction * FOREARM_LENGTH;

        HandSample {
            id: slot as i32 + 1,
            palm_position,
            palm_direction,
            palm_normal,
            palm_width: 82.0,
            fingers,
            arm: Some(ArmSample {
                elbow_position,
                wrist_position,
                direction: palm_direction,
                width: 58.0,
            }),
        }
    }
}

impl DeviceHandle for SimulatedDevice {
    fn is_connected(&self) -> bool {
        self.connected
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    fn set_policy(&mut self, policy: DevicePolicy) {
        debug!(?policy, "simulated device policy set");
        self.policy = policy;
    }

    fn current_reading(&mut self) -> Option<Reading> {
        if !self.connected || self.paused {
            return None;
        }

        let hands = (0..self.hand_count).map(|slot| self.generate_hand(slot)).collect();
        self.frames_served += 1;
        let reading = Reading {
            id: self.frames_served,
            timestamp: self.sim_time,
            hands,
        };
        self.sim_time += 0.033;

        Some(reading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulated_reading_shape() {
        let mut device = SimulatedDevice::new(2);
        let reading = device.current_reading().expect("connected device gives a reading");

        assert_eq!(reading.hands.len(), 2);
        for hand in &reading.hands {
            assert_eq!(hand.fingers.len(), 5);
            assert!(hand.fingers.iter().all(|f| f.bones.len() == 4));
            assert!(hand.arm.is_some());
        }
    }

    #[test]
    fn test_simulated_hand_count_is_capped() {
        let mut device = SimulatedDevice::new(5);
        let reading = device.current_reading().unwrap();
        assert_eq!(reading.hands.len(), 2);
    }

    #[test]
    fn test_no_reading_while_paused_or_disconnected() {
        let mut device = SimulatedDevice::new(1);
        device.set_paused(true);
        assert!(device.current_reading().is_none());

        device.set_paused(false);
        device.set_connected(false);
        assert!(device.current_reading().is_none());
        assert_eq!(device.frames_served(), 0);
    }

    #[test]
    fn test_boxed_device_forwards() {
        let mut device: Box<dyn DeviceHandle> = Box::new(SimulatedDevice::new(1));
        device.set_paused(true);
        assert!(device.is_paused());
        assert!(device.current_reading().is_none());
        device.set_paused(false);
        assert!(device.current_reading().is_some());
    }

    #[test]
    fn test_readings_advance() {
        let mut device = SimulatedDevice::new(1);
        let a = device.current_reading().unwrap();
        let b = device.current_reading().unwrap();
        assert_eq!(b.id, a.id + 1);
        assert!(b.timestamp > a.timestamp);
        assert_ne!(a.hands[0].palm_position, b.hands[0].palm_position);
    }
}
