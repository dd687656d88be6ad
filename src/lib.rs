//! Hand-tracking sensor adapter.
//!
//! Polls a hand-tracking controller once per host tick and flattens each
//! reading (hands, fingers, bones, arms) into points and open polylines with
//! attributes and named groups, ready for a host geometry container.
//!
//! The host owns a [`session::SessionSlot`] and passes it, together with its
//! clock, parameters and geometry, into every call.

pub mod config;
pub mod device;
pub mod error;
pub mod frame_cache;
pub mod geometry;
pub mod host;
pub mod mapper;
pub mod reading;
pub mod session;
pub mod state;
pub mod status;

pub use config::TrackerConfig;
pub use device::{DeviceHandle, DevicePolicy, SimulatedDevice};
pub use error::TrackError;
pub use geometry::{GeometryBuffer, MemoryGeometry, SceneSink};
pub use mapper::{map, ArmLayout, BonePolicy, InclusionFlags, MappingRules, TipPolicy};
pub use reading::Reading;
pub use session::{Command, SessionSlot, TrackSummary, TrackerSession};
