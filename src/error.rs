use crate::skeleton::BoneId;
use thiserror::Error;

/// Errors raised while configuring or running the rig.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RigError {
    #[error("bone {id} bound as {role} is not present in the scene graph")]
    MissingBone { role: &'static str, id: BoneId },

    #[error("invalid configuration for `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("{stage}: look direction has no usable length")]
    DegenerateDirection { stage: &'static str },

    #[error("frame pipeline stages out of order: {0}")]
    StageOrder(String),

    #[error("skeleton already holds the maximum of {max} bones")]
    SkeletonFull { max: usize },
}

pub type Result<T> = std::result::Result<T, RigError>;
