//! # sidekick-blend
//!
//! Blend math for body shapes: interpolating stored rig movements by a
//! body-shape scalar and turning slider values into per-blend-shape weights.
//!
//! All functions are pure. Joint identity never enters the math; callers
//! pick the movements for a joint and combine them with [`JointAdjustment`].

pub mod interpolate;
pub mod joint;
pub mod weights;

pub use interpolate::{
    blended_offset, blended_rotation, blended_scale, euler_degrees_from_quat,
    quat_from_euler_degrees,
};
pub use joint::JointAdjustment;
pub use weights::BlendWeights;
