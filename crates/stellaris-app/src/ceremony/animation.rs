//! # Animation Binder
//!
//! Declarative animation targets for the two limbs and the two coins, bound
//! per stage. The renderer interpolates toward these targets; the binder only
//! says where things should end up and how they should move.

use serde::Serialize;

use super::stage::CeremonyStage;

/// Planar offset in scene units
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Offset {
    /// Horizontal offset
    pub x: f32,
    /// Vertical offset (negative is up)
    pub y: f32,
}

impl Offset {
    /// Create an offset
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// No offset
    pub const ZERO: Offset = Offset::new(0.0, 0.0);
}

/// Drop shadow under an extended limb
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DropShadow {
    /// Vertical shadow offset
    pub y: f32,
    /// Blur radius
    pub blur: f32,
    /// Shadow alpha in [0, 1]
    pub alpha: f32,
}

/// How a target is approached
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Motion {
    /// Physical spring
    Spring {
        /// Spring stiffness
        stiffness: f32,
        /// Spring damping
        damping: f32,
    },
    /// Fixed-duration tween
    Tween {
        /// Duration in milliseconds
        duration_ms: u32,
    },
}

/// Target for one limb
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LimbTarget {
    /// Offset from the rest position
    pub offset: Offset,
    /// Uniform scale
    pub scale: f32,
    /// Shadow, if the limb is lifted
    pub shadow: Option<DropShadow>,
    /// Motion toward the target
    pub motion: Motion,
}

/// Position, scale and opacity of a coin at one point of its animation
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CoinKeyframe {
    /// Offset relative to the holding limb
    pub offset: Offset,
    /// Uniform scale
    pub scale: f32,
    /// Opacity in [0, 1]
    pub opacity: f32,
}

/// Target for one coin
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CoinTarget {
    /// Whether the coin exists in the scene
    pub mounted: bool,
    /// Keyframe to animate toward while mounted
    pub keyframe: CoinKeyframe,
    /// Motion toward the keyframe
    pub motion: Motion,
}

/// Complete pose of the scene for one stage
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CeremonyPose {
    /// Limb holding the given coin
    pub left_limb: LimbTarget,
    /// Limb offering the received coin
    pub right_limb: LimbTarget,
    /// Given coin
    pub left_coin: CoinTarget,
    /// Received coin
    pub right_coin: CoinTarget,
}

/// Scene side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Side {
    /// Give side
    Left,
    /// Receive side
    Right,
}

/// Horizontal distance of an extended limb
pub const EXTEND_X: f32 = 50.0;
/// Vertical lift of an extended limb
pub const EXTEND_Y: f32 = -50.0;
/// Scale of an extended limb
pub const EXTEND_SCALE: f32 = 1.08;
/// Shadow of a lifted limb
pub const LIFT_SHADOW: DropShadow = DropShadow {
    y: 12.0,
    blur: 24.0,
    alpha: 0.12,
};
/// Limb spring
pub const LIMB_SPRING: Motion = Motion::Spring {
    stiffness: 120.0,
    damping: 16.0,
};
/// Left coin tween duration
pub const LEFT_COIN_MS: u32 = 450;
/// Right coin tween duration
pub const RIGHT_COIN_MS: u32 = 600;
/// Right coin tween duration while fading out
pub const RIGHT_COIN_FADE_MS: u32 = 1500;
/// Vertical push of the presented coin
pub const PRESENT_PUSH_Y: f32 = -30.0;

const REST: LimbTarget = LimbTarget {
    offset: Offset::ZERO,
    scale: 1.0,
    shadow: None,
    motion: LIMB_SPRING,
};

fn extended(side: Side, shadow: bool) -> LimbTarget {
    let x = match side {
        Side::Left => -EXTEND_X,
        Side::Right => EXTEND_X,
    };
    LimbTarget {
        offset: Offset::new(x, EXTEND_Y),
        scale: EXTEND_SCALE,
        shadow: shadow.then_some(LIFT_SHADOW),
        motion: LIMB_SPRING,
    }
}

fn settled(opacity: f32, scale: f32) -> CoinKeyframe {
    CoinKeyframe {
        offset: Offset::ZERO,
        scale,
        opacity,
    }
}

fn coin_motion(side: Side) -> Motion {
    match side {
        Side::Left => Motion::Tween {
            duration_ms: LEFT_COIN_MS,
        },
        Side::Right => Motion::Tween {
            duration_ms: RIGHT_COIN_MS,
        },
    }
}

fn unmounted(side: Side) -> CoinTarget {
    CoinTarget {
        mounted: false,
        keyframe: coin_exit(side),
        motion: coin_motion(side),
    }
}

/// Keyframe a coin starts from when it mounts
pub fn coin_enter(side: Side) -> CoinKeyframe {
    match side {
        Side::Left => CoinKeyframe {
            offset: Offset::new(0.0, 8.0),
            scale: 0.98,
            opacity: 0.0,
        },
        Side::Right => CoinKeyframe {
            offset: Offset::new(0.0, 10.0),
            scale: 0.96,
            opacity: 0.0,
        },
    }
}

/// Keyframe a coin animates to before it unmounts
pub fn coin_exit(side: Side) -> CoinKeyframe {
    match side {
        Side::Left => CoinKeyframe {
            offset: Offset::new(0.0, -10.0),
            scale: 1.0,
            opacity: 0.0,
        },
        Side::Right => settled(0.0, 1.0),
    }
}

/// Bind a stage and the secondary coin flag to a pose.
pub fn bind(stage: CeremonyStage, secondary_coin_visible: bool) -> CeremonyPose {
    use CeremonyStage::*;

    let left_limb = match stage {
        AwaitingGiveChoice => extended(Side::Left, true),
        _ => REST,
    };

    let right_limb = match stage {
        AwaitingReceiveChoice => extended(Side::Right, true),
        PresentingReceive | Complete => extended(Side::Right, false),
        _ => REST,
    };

    let left_coin = match stage {
        AwaitingGiveChoice => CoinTarget {
            mounted: true,
            keyframe: settled(1.0, 1.0),
            motion: coin_motion(Side::Left),
        },
        RetractingGive => CoinTarget {
            mounted: true,
            keyframe: settled(0.9, 0.96),
            motion: coin_motion(Side::Left),
        },
        _ => unmounted(Side::Left),
    };

    let right_coin = match stage {
        AwaitingReceiveChoice => CoinTarget {
            mounted: true,
            keyframe: settled(if secondary_coin_visible { 1.0 } else { 0.0 }, 1.0),
            motion: if secondary_coin_visible {
                coin_motion(Side::Right)
            } else {
                Motion::Tween {
                    duration_ms: RIGHT_COIN_FADE_MS,
                }
            },
        },
        PresentingReceive => CoinTarget {
            mounted: true,
            keyframe: CoinKeyframe {
                offset: Offset::new(0.0, PRESENT_PUSH_Y),
                scale: 1.15,
                opacity: 0.0,
            },
            motion: coin_motion(Side::Right),
        },
        _ => unmounted(Side::Right),
    };

    CeremonyPose {
        left_limb,
        right_limb,
        left_coin,
        right_coin,
    }
}
