// Web Interface module root
pub mod probe;
pub mod routes;
pub mod web_server;

// Re-export commonly used items
pub use probe::status_service_responding;
pub use routes::*;
pub use web_server::*;
