pub mod aggregate;

pub use aggregate::{ShaftCondition, ShaftInspection, ShaftInspectionDto, ShaftStatus};

pub const RESOURCE: &str = "shaft-inspections";
