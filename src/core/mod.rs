pub mod errors;
pub mod models;
pub mod retry;
pub mod services;
pub mod sync;
pub mod transaction;
