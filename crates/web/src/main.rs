use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use domain::SystemClock;
use storage::Database;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod error;
mod features;
mod middleware;
mod state;

use config::Config;
use features::{catches, competitions, participants};
use middleware::auth::ApiKeys;
use state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        competitions::handlers::get_competition,
        competitions::handlers::create_competition,
        competitions::handlers::update_competition,
        competitions::handlers::add_category,
        competitions::handlers::set_category_enabled,
        competitions::handlers::change_status,
        participants::handlers::register,
        participants::handlers::add_guest,
        participants::handlers::add_official,
        participants::handlers::approve,
        participants::handlers::reject,
        participants::handlers::assign_placement,
        catches::handlers::record_fish_catch,
        catches::handlers::remove_fish_catch,
    ),
    components(
        schemas(
            storage::dto::competition::CreateCompetitionRequest,
            storage::dto::competition::UpdateCompetitionRequest,
            storage::dto::competition::CategoryRequest,
            storage::dto::competition::AddCategoryRequest,
            storage::dto::competition::SetCategoryEnabledRequest,
            storage::dto::competition::StatusChangeRequest,
            storage::dto::competition::CompetitionResponse,
            storage::dto::competition::CategoryResponse,
            storage::dto::participant::AddGuestRequest,
            storage::dto::participant::AddOfficialRequest,
            storage::dto::participant::RejectParticipantRequest,
            storage::dto::participant::AssignPlacementRequest,
            storage::dto::participant::ParticipantResponse,
            storage::dto::fish_catch::RecordFishCatchRequest,
            storage::dto::fish_catch::FishCatchResponse,
        )
    ),
    tags(
        (name = "competitions", description = "Competition lifecycle and category configuration"),
        (name = "participants", description = "Registration and participant review"),
        (name = "catches", description = "Fish-catch recording"),
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("API Key")
                        .build(),
                ),
            )
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting fishing competitions API");

    let config = Config::from_env().context("Failed to load API configuration")?;
    tracing::info!(
        "Configuration loaded successfully (approval policy: {:?})",
        config.approval_policy
    );

    tracing::info!(
        "Connecting to database at: {}",
        config
            .database_url
            .split('@')
            .next_back()
            .unwrap_or("unknown")
    );
    let db = Database::new(&config.database_url)
        .await
        .context("Failed to initialize database")?;
    tracing::info!("Database connection established");

    tracing::info!("Running database migrations");
    db.run_migrations()
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Database migrations completed successfully");

    let api_keys =
        ApiKeys::from_comma_separated(&config.api_keys).context("Failed to parse API_KEYS")?;
    tracing::info!("Loaded {} API keys", api_keys.len());
    if api_keys.is_empty() {
        tracing::warn!("No API keys configured, every protected route will answer 401");
    }

    let state = AppState {
        db,
        clock: Arc::new(SystemClock),
        approval_policy: config.approval_policy.build(),
    };

    let api = competitions::routes::routes(api_keys.clone())
        .merge(participants::routes::routes(api_keys.clone()))
        .merge(catches::routes::routes(api_keys));

    let app = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api/competitions", api)
        .layer(CorsLayer::permissive())
        .with_state(state);

    let bind_address = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!(
        "Swagger UI available at http://{}/swagger-ui/",
        bind_address
    );

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;
    axum::serve(listener, app).await?;

    Ok(())
}
