pub mod job;
pub mod plan;
pub mod runner;

use serde::Serialize;

pub use self::job::CheckJob;
pub use self::plan::CheckPlan;

/// Status of a single reference/current comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum SnapshotStatus {
    Pass {
        percentage: f64,
    },
    Fail {
        mismatch_count: u64,
        percentage: f64,
    },
    /// Reference and current have different effective dimensions.
    Resized {
        reference: (u32, u32),
        current: (u32, u32),
    },
    New,
    Error {
        message: String,
    },
}
