pub mod a001_ore_intake;
pub mod a002_gold_payout;
pub mod a003_incident;
pub mod a004_company;
pub mod a005_security_company;
pub mod a006_shaft_inspection;
pub mod a007_section;
