pub mod aggregate;

pub use aggregate::{GoldPayout, GoldPayoutDto, PaymentMethod};

pub const RESOURCE: &str = "gold-payouts";
