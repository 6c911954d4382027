/// Record-store abstraction consumed by the lifecycle services.
pub mod match_store;
/// Persisted entity definitions.
pub mod models;
/// Storage error types shared by every backend.
pub mod storage;
