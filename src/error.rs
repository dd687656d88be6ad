// src/error.rs
use crate::reading::BoneType;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackError {
    #[error("Leap not initialized")]
    NotInitialized,

    #[error("Leap Device not enabled")]
    DeviceDisabled,

    #[error("Can't read frame")]
    NoReading,

    #[error("Missing point group '{0}'")]
    MissingGroup(&'static str),

    /// A finger came back from the device without a bone the active
    /// bone policy needs. Points at a broken device, not at the caller.
    #[error("hand {hand} finger {finger} has no {bone:?} bone")]
    MissingBone {
        hand: usize,
        finger: usize,
        bone: BoneType,
    },

    #[error("unknown command '{0}'")]
    UnknownCommand(String),
}
