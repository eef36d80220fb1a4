//! Snapshot-to-snapshot drift comparison

pub mod command;
pub mod comparator;
pub mod differ;

pub use command::{CommandError, CommandOutput, SystemCommandExecutor};
pub use comparator::{
    DeviceComparison, DeviceDrift, DriftComparator, DriftError, DriftReport, DriftRequest,
};
pub use differ::{DiffOutcome, ExternalDiff, LineDiffer};
