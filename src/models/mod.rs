pub mod location;
pub mod project;
pub mod quote;
