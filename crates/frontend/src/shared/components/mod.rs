pub mod pagination_controls;
pub mod record_details;
