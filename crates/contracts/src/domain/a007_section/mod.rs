pub mod aggregate;

pub use aggregate::Section;

pub const RESOURCE: &str = "sections";
