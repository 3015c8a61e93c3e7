pub mod page;
pub mod routes;
pub mod slider;
pub mod state;
