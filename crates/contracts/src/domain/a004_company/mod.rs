pub mod aggregate;

pub use aggregate::{Company, CompanyRegistrationDto};

pub const RESOURCE: &str = "companies";
