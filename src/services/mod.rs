/// OpenAPI documentation generation.
pub mod documentation;
/// Field registration and listing.
pub mod field_service;
/// Health check service.
pub mod health_service;
/// Live event publishing onto the topic families.
pub mod live_events;
/// Match lifecycle orchestration.
pub mod match_service;
/// Push notification dispatch queue and worker.
pub mod push_service;
/// Region subscriptions and recipient resolution.
pub mod region_service;
/// SSE bridge onto the in-process live transport.
pub mod sse_service;
/// User registration and device-token management.
pub mod user_service;
