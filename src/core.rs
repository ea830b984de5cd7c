pub mod composite;
pub mod configuration;
pub mod grid;
pub mod grouping;
pub mod interval;
pub mod label;
pub mod rule;
pub mod tariff;
