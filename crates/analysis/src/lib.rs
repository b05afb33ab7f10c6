//! Telemetry normalization: fastest-lap selection, track-frame rotation,
//! decimation and lap-relative timing for comparative telemetry views.

mod align;
mod assemble;
mod error;
mod geometry;
mod laps;
mod resample;
mod response;

pub use align::{align, ElapsedSample};
pub use assemble::{build_driver_record, project};
pub use error::{AnalysisError, Result};
pub use geometry::{apply, rotate_samples, rotation_matrix, Rotation};
pub use laps::select_fastest;
pub use resample::decimate;
pub use response::{annotate_corners, build_response};

#[cfg(test)]
pub(crate) mod fixtures;
