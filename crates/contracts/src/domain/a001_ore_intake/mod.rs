pub mod aggregate;

pub use aggregate::{MillAssignmentDto, OreIntake, OreIntakeDto, SampleDecisionDto, SampleStatus};

/// REST collection name
pub const RESOURCE: &str = "ore-intakes";
