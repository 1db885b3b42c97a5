pub mod location_controller;
pub mod quote_controller;
pub mod registration_controller;
