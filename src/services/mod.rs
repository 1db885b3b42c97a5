pub mod pricing;
pub mod quote;
pub mod registration;
pub mod sizing_engine;
