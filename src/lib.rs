pub mod analysis;
pub mod capture;
pub mod configuration;
pub mod controller;
pub mod error_handling;
pub mod inference;
pub mod storage;
pub mod web_interface;
