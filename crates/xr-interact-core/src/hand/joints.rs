//! Hand skeleton definition

use serde::{Deserialize, Serialize};

/// Which hand a device or template belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    pub fn opposite(self) -> Self {
        match self {
            Handedness::Left => Handedness::Right,
            Handedness::Right => Handedness::Left,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Handedness::Left => "left",
            Handedness::Right => "right",
        }
    }
}

/// Joints of a tracked hand in buffer order. The wrist comes first and is
/// the reference frame for every other joint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum HandJoint {
    Wrist,
    ThumbMetacarpal,
    ThumbPhalanxProximal,
    ThumbPhalanxDistal,
    ThumbTip,
    IndexFingerMetacarpal,
    IndexFingerPhalanxProximal,
    IndexFingerPhalanxIntermediate,
    IndexFingerPhalanxDistal,
    IndexFingerTip,
    MiddleFingerMetacarpal,
    MiddleFingerPhalanxProximal,
    MiddleFingerPhalanxIntermediate,
    MiddleFingerPhalanxDistal,
    MiddleFingerTip,
    RingFingerMetacarpal,
    RingFingerPhalanxProximal,
    RingFingerPhalanxIntermediate,
    RingFingerPhalanxDistal,
    RingFingerTip,
    PinkyFingerMetacarpal,
    PinkyFingerPhalanxProximal,
    PinkyFingerPhalanxIntermediate,
    PinkyFingerPhalanxDistal,
    PinkyFingerTip,
}

impl HandJoint {
    pub const COUNT: usize = 25;

    pub const ALL: [HandJoint; Self::COUNT] = [
        HandJoint::Wrist,
        HandJoint::ThumbMetacarpal,
        HandJoint::ThumbPhalanxProximal,
        HandJoint::ThumbPhalanxDistal,
        HandJoint::ThumbTip,
        HandJoint::IndexFingerMetacarpal,
        HandJoint::IndexFingerPhalanxProximal,
        HandJoint::IndexFingerPhalanxIntermediate,
        HandJoint::IndexFingerPhalanxDistal,
        HandJoint::IndexFingerTip,
        HandJoint::MiddleFingerMetacarpal,
        HandJoint::MiddleFingerPhalanxProximal,
        HandJoint::MiddleFingerPhalanxIntermediate,
        HandJoint::MiddleFingerPhalanxDistal,
        HandJoint::MiddleFingerTip,
        HandJoint::RingFingerMetacarpal,
        HandJoint::RingFingerPhalanxProximal,
        HandJoint::RingFingerPhalanxIntermediate,
        HandJoint::RingFingerPhalanxDistal,
        HandJoint::RingFingerTip,
        HandJoint::PinkyFingerMetacarpal,
        HandJoint::PinkyFingerPhalanxProximal,
        HandJoint::PinkyFingerPhalanxIntermediate,
        HandJoint::PinkyFingerPhalanxDistal,
        HandJoint::PinkyFingerTip,
    ];

    /// Position in the joint buffer
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Joint name as used by XR runtimes
    pub fn name(self) -> &'static str {
        match self {
            HandJoint::Wrist => "wrist",
            HandJoint::ThumbMetacarpal => "thumb-metacarpal",
            HandJoint::ThumbPhalanxProximal => "thumb-phalanx-proximal",
            HandJoint::ThumbPhalanxDistal => "thumb-phalanx-distal",
            HandJoint::ThumbTip => "thumb-tip",
            HandJoint::IndexFingerMetacarpal => "index-finger-metacarpal",
            HandJoint::IndexFingerPhalanxProximal => "index-finger-phalanx-proximal",
            HandJoint::IndexFingerPhalanxIntermediate => "index-finger-phalanx-intermediate",
            HandJoint::IndexFingerPhalanxDistal => "index-finger-phalanx-distal",
            HandJoint::IndexFingerTip => "index-finger-tip",
            HandJoint::MiddleFingerMetacarpal => "middle-finger-metacarpal",
            HandJoint::MiddleFingerPhalanxProximal => "middle-finger-phalanx-proximal",
            HandJoint::MiddleFingerPhalanxIntermediate => "middle-finger-phalanx-intermediate",
            HandJoint::MiddleFingerPhalanxDistal => "middle-finger-phalanx-distal",
            HandJoint::MiddleFingerTip => "middle-finger-tip",
            HandJoint::RingFingerMetacarpal => "ring-finger-metacarpal",
            HandJoint::RingFingerPhalanxProximal => "ring-finger-phalanx-proximal",
            HandJoint::RingFingerPhalanxIntermediate => "ring-finger-phalanx-intermediate",
            HandJoint::RingFingerPhalanxDistal => "ring-finger-phalanx-distal",
            HandJoint::RingFingerTip => "ring-finger-tip",
            HandJoint::PinkyFingerMetacarpal => "pinky-finger-metacarpal",
            HandJoint::PinkyFingerPhalanxProximal => "pinky-finger-phalanx-proximal",
            HandJoint::PinkyFingerPhalanxIntermediate => "pinky-finger-phalanx-intermediate",
            HandJoint::PinkyFingerPhalanxDistal => "pinky-finger-phalanx-distal",
            HandJoint::PinkyFingerTip => "pinky-finger-tip",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indices_match_order() {
        for (i, joint) in HandJoint::ALL.iter().enumerate() {
            assert_eq!(joint.index(), i);
            assert_eq!(HandJoint::from_index(i), Some(*joint));
        }
        assert_eq!(HandJoint::from_index(HandJoint::COUNT), None);
    }

    #[test]
    fn test_wrist_first() {
        assert_eq!(HandJoint::ALL[0], HandJoint::Wrist);
        assert_eq!(HandJoint::PinkyFingerTip.name(), "pinky-finger-tip");
    }

    #[test]
    fn test_opposite() {
        assert_eq!(Handedness::Left.opposite(), Handedness::Right);
        assert_eq!(Handedness::Right.opposite().opposite(), Handedness::Right);
    }
}
