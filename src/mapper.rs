// src/mapper.rs - Flattens a reading's hand/finger/bone/arm hierarchy into points and polylines
use crate::error::TrackError;
use crate::geometry::{AttribValue, GeometryBuffer, Group, PointRecord, PolylineRecord};
use crate::reading::{BoneSample, BoneType, HandSample, Reading};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Which bones make up a finger chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BonePolicy {
    /// Proximal, intermediate, distal for every finger.
    WithoutMetacarpal,
    /// Metacarpal first for every finger, thumb included.
    WithMetacarpal,
    /// Metacarpal for every finger except the thumb (finger 0).
    SkipThumbMetacarpal,
}

const FOUR_BONES: &[BoneType] = &BoneType::ALL;
const THREE_BONES: &[BoneType] = &[BoneType::Proximal, BoneType::Intermediate, BoneType::Distal];

impl BonePolicy {
    pub fn bones_for(&self, finger_index: usize) -> &'static [BoneType] {
        let with_metacarpal = match self {
            Self::WithoutMetacarpal => false,
            Self::WithMetacarpal => true,
            Self::SkipThumbMetacarpal => finger_index > 0,
        };
        if with_metacarpal {
            FOUR_BONES
        } else {
            THREE_BONES
        }
    }
}

/// Where bones are sampled, and whether a finger tip gets its own point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TipPolicy {
    /// One point per bone at its proximal joint, plus one at the distal
    /// joint of the last bone.
    EmitTipPoint,
    /// One point per bone at its center.
    None,
}

/// Order of the two arm points and which of them carries `arm_width`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArmLayout {
    /// Wrist {hand, dir, arm_width}, then elbow {hand, dir}.
    WristToElbow,
    /// Elbow {hand, dir, arm_width}, then wrist {hand}.
    ElbowToWrist,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingRules {
    pub bone_policy: BonePolicy,
    pub tip_policy: TipPolicy,
    pub arm_layout: ArmLayout,
    pub palm_width: bool,
}

impl MappingRules {
    /// Joint-sampled fingers with tips; thumbs skip the metacarpal.
    pub fn joints() -> Self {
        Self {
            bone_policy: BonePolicy::SkipThumbMetacarpal,
            tip_policy: TipPolicy::EmitTipPoint,
            arm_layout: ArmLayout::WristToElbow,
            palm_width: true,
        }
    }

    /// Center-sampled fingers, all with metacarpals, no tips.
    pub fn centers() -> Self {
        Self {
            bone_policy: BonePolicy::WithMetacarpal,
            tip_policy: TipPolicy::None,
            arm_layout: ArmLayout::ElbowToWrist,
            palm_width: false,
        }
    }
}

impl Default for MappingRules {
    fn default() -> Self {
        Self::joints()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InclusionFlags {
    pub track_hands: bool,
    pub track_arms: bool,
    pub rules: MappingRules,
}

pub const ATTR_DIR: &str = "dir";
pub const ATTR_PALM_NORMAL: &str = "palm_N";
pub const ATTR_PALM_WIDTH: &str = "palm_width";
pub const ATTR_ARM_WIDTH: &str = "arm_width";
pub const ATTR_HAND: &str = "hand";
pub const ATTR_FINGER: &str = "finger";
pub const ATTR_BONE: &str = "bone";

/// Maps every hand of `reading`. Pure: nothing outside the returned buffer
/// is touched, so a failure here never leaves partial geometry behind.
pub fn map(reading: &Reading, flags: &InclusionFlags) -> Result<GeometryBuffer, TrackError> {
    let mut buffer = GeometryBuffer::default();

    for (i, hand) in reading.hands.iter().enumerate() {
        map_hand(&mut buffer, hand, i + 1, flags)?;
    }

    debug!(
        reading = reading.id,
        hands = reading.hands.len(),
        points = buffer.points.len(),
        polylines = buffer.polylines.len(),
        "reading mapped"
    );
    Ok(buffer)
}

fn map_hand(
    buffer: &mut GeometryBuffer,
    hand: &HandSample,
    hand_index: usize,
    flags: &InclusionFlags,
) -> Result<(), TrackError> {
    let rules = &flags.rules;
    let hand_attr = AttribValue::Int(hand_index as i64);

    if flags.track_hands {
        let mut palm = PointRecord::new(hand.palm_position)
            .with_attrib(ATTR_DIR, AttribValue::Vector(hand.palm_direction))
            .with_attrib(ATTR_PALM_NORMAL, AttribValue::Vector(hand.palm_normal));
        if rules.palm_width {
            palm = palm.with_attrib(ATTR_PALM_WIDTH, AttribValue::Float(hand.palm_width));
        }
        buffer.push_point(palm.with_attrib(ATTR_HAND, hand_attr.clone()).in_group(Group::Hands));
    }

    for (finger_index, finger) in hand.fingers.iter().enumerate() {
        // Resolve the whole chain first so a missing bone adds nothing
        let bones = rules
            .bone_policy
            .bones_for(finger_index)
            .iter()
            .map(|&kind| {
                finger.bone(kind).ok_or(TrackError::MissingBone {
                    hand: hand_index,
                    finger: finger_index,
                    bone: kind,
                })
            })
            .collect::<Result<Vec<&BoneSample>, TrackError>>()?;

        let mut chain = PolylineRecord::default();
        let last = bones.len() - 1;

        for (bone_index, bone) in bones.iter().enumerate() {
            let sample = match rules.tip_policy {
                TipPolicy::EmitTipPoint => bone.prev_joint,
                TipPolicy::None => bone.center(),
            };
            let point = finger_point(sample, finger_index, bone_index, &hand_attr, bone.direction);
            chain.vertices.push(buffer.push_point(point));

            if bone_index == last && rules.tip_policy == TipPolicy::EmitTipPoint {
                let tip = finger_point(bone.next_joint, finger_index, bone_index, &hand_attr, bone.direction)
                    .in_group(Group::Tips);
                chain.vertices.push(buffer.push_point(tip));
            }
        }

        buffer.polylines.push(chain);
    }

    if flags.track_arms {
        match &hand.arm {
            Some(arm) => {
                let dir = AttribValue::Vector(arm.direction);
                let width = AttribValue::Float(arm.width);

                let (first, second) = match rules.arm_layout {
                    ArmLayout::WristToElbow => (
                        PointRecord::new(arm.wrist_position)
                            .with_attrib(ATTR_HAND, hand_attr.clone())
                            .with_attrib(ATTR_DIR, dir.clone())
                            .with_attrib(ATTR_ARM_WIDTH, width),
                        PointRecord::new(arm.elbow_position)
                            .with_attrib(ATTR_HAND, hand_attr)
                            .with_attrib(ATTR_DIR, dir),
                    ),
                    ArmLayout::ElbowToWrist => (
                        PointRecord::new(arm.elbow_position)
                            .with_attrib(ATTR_HAND, hand_attr.clone())
                            .with_attrib(ATTR_DIR, dir)
                            .with_attrib(ATTR_ARM_WIDTH, width),
                        PointRecord::new(arm.wrist_position).with_attrib(ATTR_HAND, hand_attr),
                    ),
                };

                let a = buffer.push_point(first.in_group(Group::Arms));
                let b = buffer.push_point(second.in_group(Group::Arms));
                buffer.polylines.push(PolylineRecord { vertices: vec![a, b] });
            }
            None => debug!(hand = hand_index, "no arm in reading, skipped"),
        }
    }

    Ok(())
}

fn finger_point(
    position: Vector3<f64>,
    finger_index: usize,
    bone_index: usize,
    hand: &AttribValue,
    direction: Vector3<f64>,
) -> PointRecord {
    PointRecord::new(position)
        .with_attrib(ATTR_FINGER, AttribValue::Int(finger_index as i64))
        .with_attrib(ATTR_BONE, AttribValue::Int(bone_index as i64))
        .with_attrib(ATTR_HAND, hand.clone())
        .with_attrib(ATTR_DIR, AttribValue::Vector(direction))
        .in_group(Group::Fingers)
}
