pub mod contract;
pub mod defaults;
pub mod stock;
