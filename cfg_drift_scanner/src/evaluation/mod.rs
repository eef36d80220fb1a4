//! Category evaluation: policies, outcomes and violation handling

pub mod evaluator;
pub mod outcome;
pub mod policy;

pub use evaluator::{CategorySpec, ComplianceEvaluator, EvaluationError};
pub use outcome::{CategoryKind, CategoryOutcome, CategoryTally, Violation, ViolationKind};
pub use policy::ViolationPolicy;
