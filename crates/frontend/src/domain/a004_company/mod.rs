pub mod api;
pub mod ui;
pub mod wizard;
