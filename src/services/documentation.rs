use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Matchday Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::users::create_user,
        crate::routes::users::list_users,
        crate::routes::users::register_device_token,
        crate::routes::fields::create_field,
        crate::routes::fields::list_fields,
        crate::routes::matches::create_match,
        crate::routes::matches::list_matches,
        crate::routes::matches::join_match,
        crate::routes::matches::start_match,
        crate::routes::matches::update_score,
        crate::routes::subscriptions::subscribe_region,
        crate::routes::subscriptions::unsubscribe_region,
        crate::routes::sse::region_stream,
        crate::routes::sse::match_stream,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::users::CreateUserRequest,
            crate::dto::users::UserSummary,
            crate::dto::users::DeviceTokenRequest,
            crate::dto::fields::CreateFieldRequest,
            crate::dto::fields::FieldSummary,
            crate::dto::matches::CreateMatchRequest,
            crate::dto::matches::MatchSummary,
            crate::dto::matches::JoinMatchRequest,
            crate::dto::matches::MatchJoinedResponse,
            crate::dto::matches::StartMatchRequest,
            crate::dto::matches::UpdateScoreRequest,
            crate::dto::subscriptions::RegionSubscriptionRequest,
            crate::dto::subscriptions::RegionSubscriptionResponse,
            crate::dto::events::LiveEvent,
            crate::dto::events::MatchSummaryData,
            crate::dto::events::PlayerJoinedEvent,
            crate::dto::events::MatchStartedEvent,
            crate::dto::events::ScoreUpdateEvent,
            crate::state::lifecycle::MatchStatus,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "users", description = "User registration and device tokens"),
        (name = "fields", description = "Field management"),
        (name = "matches", description = "Match lifecycle operations"),
        (name = "subscriptions", description = "Region notification subscriptions"),
        (name = "live", description = "Server-sent live event streams"),
    )
)]
pub struct ApiDoc;
