// src/reading.rs - One sensor snapshot: hands, fingers, bones, arms
use nalgebra::Vector3;

/// Bones of a finger, ordered from the wrist outwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoneType {
    Metacarpal,
    Proximal,
    Intermediate,
    Distal,
}

impl BoneType {
    pub const ALL: [BoneType; 4] = [
        BoneType::Metacarpal,
        BoneType::Proximal,
        BoneType::Intermediate,
        BoneType::Distal,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FingerType {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl FingerType {
    pub const ALL: [FingerType; 5] = [
        FingerType::Thumb,
        FingerType::Index,
        FingerType::Middle,
        FingerType::Ring,
        FingerType::Pinky,
    ];
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoneSample {
    pub kind: BoneType,
    pub prev_joint: Vector3<f64>,
    pub next_joint: Vector3<f64>,
    pub direction: Vector3<f64>,
}

impl BoneSample {
    /// Builds a bone between two joints, direction pointing away from the wrist.
    pub fn between(kind: BoneType, prev_joint: Vector3<f64>, next_joint: Vector3<f64>) -> Self {
        let span = next_joint - prev_joint;
        let direction = if span.norm() > 0.0 {
            span.normalize()
        } else {
            Vector3::zeros()
        };

        Self {
            kind,
            prev_joint,
            next_joint,
            direction,
        }
    }

    pub fn center(&self) -> Vector3<f64> {
        (self.prev_joint + self.next_joint) / 2.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FingerSample {
    pub kind: FingerType,
    pub bones: Vec<BoneSample>,
}

impl FingerSample {
    pub fn bone(&self, kind: BoneType) -> Option<&BoneSample> {
        self.bones.iter().find(|b| b.kind == kind)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArmSample {
    pub elbow_position: Vector3<f64>,
    pub wrist_position: Vector3<f64>,
    pub direction: Vector3<f64>,
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HandSample {
    /// Device-side id. Not the 1-based `hand` attribute, which the mapper
    /// assigns from traversal order.
    pub id: i32,
    pub palm_position: Vector3<f64>,
    pub palm_direction: Vector3<f64>,
    pub palm_normal: Vector3<f64>,
    pub palm_width: f64,
    pub fingers: Vec<FingerSample>,
    pub arm: Option<ArmSample>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reading {
    pub id: u64,
    pub timestamp: f64,
    pub hands: Vec<HandSample>,
}

/// Straight hand pointing down -z, fingers spaced along x.
#[cfg(test)]
pub(crate) fn test_hand(finger_count: usize, with_arm: bool) -> HandSample {
    let fingers = FingerType::ALL
        .iter()
        .cycle()
        .take(finger_count)
        .enumerate()
        .map(|(i, kind)| {
            let mut joint = Vector3::new(i as f64 * 20.0, 0.0, 0.0);
            let bones = BoneType::ALL
                .iter()
                .map(|&bone| {
                    let next = joint + Vector3::new(0.0, 0.0, -10.0);
                    let sample = BoneSample::between(bone, joint, next);
                    joint = next;
                    sample
                })
                .collect();
            FingerSample { kind: *kind, bones }
        })
        .collect();

    HandSample {
        id: 7,
        palm_position: Vector3::new(40.0, 0.0, 10.0),
        palm_direction: Vector3::new(0.0, 0.0, -1.0),
        palm_normal: Vector3::new(0.0, -1.0, 0.0),
        palm_width: 80.0,
        fingers,
        arm: with_arm.then(|| ArmSample {
            elbow_position: Vector3::new(40.0, 0.0, 300.0),
            wrist_position: Vector3::new(40.0, 0.0, 50.0),
            direction: Vector3::new(0.0, 0.0, -1.0),
            width: 60.0,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bone_center_is_midpoint() {
        let bone = BoneSample::between(
            BoneType::Proximal,
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(0.0, 4.0, 0.0),
        );
        assert_eq!(bone.center(), Vector3::new(0.0, 2.0, 0.0));
        assert_eq!(bone.direction, Vector3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_degenerate_bone_has_zero_direction() {
        let p = Vector3::new(1.0, 1.0, 1.0);
        let bone = BoneSample::between(BoneType::Distal, p, p);
        assert_eq!(bone.direction, Vector3::zeros());
    }

    #[test]
    fn test_finger_bone_lookup() {
        let hand = test_hand(5, false);
        let thumb = &hand.fingers[0];
        assert_eq!(thumb.kind, FingerType::Thumb);
        assert_eq!(thumb.bone(BoneType::Intermediate).map(|b| b.kind), Some(BoneType::Intermediate));

        let mut clipped = thumb.clone();
        clipped.bones.retain(|b| b.kind != BoneType::Metacarpal);
        assert!(clipped.bone(BoneType::Metacarpal).is_none());
    }
}
