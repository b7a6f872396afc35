pub mod aggregate;

pub use aggregate::{SecurityCompany, SecurityCompanyDto};

pub const RESOURCE: &str = "security-companies";
