pub mod aggregate;

pub use aggregate::{Incident, IncidentDto, IncidentType, PersonInvolvedDto};

pub const RESOURCE: &str = "incidents";
