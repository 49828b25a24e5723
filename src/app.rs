use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::{AuthError, CredentialStore, SessionIssuer};
use crate::config::AppConfig;
use crate::database::models::{AboutSection, ContactInfo, HeroSection, Project, Skill};
use crate::database::PortfolioStore;
use crate::handlers::{admin, portfolio, system};
use crate::services::PortfolioService;

/// Process-wide services, built once in `main` and handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub credentials: CredentialStore,
    pub sessions: Arc<SessionIssuer>,
    pub portfolio: PortfolioService,
    store: Arc<dyn PortfolioStore>,
}

impl AppState {
    pub async fn new(config: AppConfig, store: Arc<dyn PortfolioStore>) -> Result<Self, AuthError> {
        let credentials = CredentialStore::new(store.clone(), config.security.bcrypt_cost).await?;
        let sessions = Arc::new(SessionIssuer::from_config(&config.security));
        let portfolio = PortfolioService::new(store.clone(), config.portfolio.list_limit);

        Ok(Self {
            config: Arc::new(config),
            credentials,
            sessions,
            portfolio,
            store,
        })
    }

    /// Release the store's resources. Called once the server has drained.
    pub async fn shutdown(&self) {
        self.store.close().await;
    }
}

pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.server.cors_origins);

    Router::new()
        // Public
        .route("/", get(system::root))
        .route("/health", get(system::health))
        .merge(admin_routes())
        .merge(portfolio_routes())
        // Global middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/api/admin/setup", post(admin::setup))
        .route("/api/admin/login", post(admin::login))
}

fn portfolio_routes() -> Router<AppState> {
    use portfolio::{add_item, delete_item, get_section, list_items, replace_item, replace_section};

    Router::new()
        // Singleton sections
        .route(
            "/api/portfolio/hero",
            get(get_section::<HeroSection>).put(replace_section::<HeroSection>),
        )
        .route(
            "/api/portfolio/about",
            get(get_section::<AboutSection>).put(replace_section::<AboutSection>),
        )
        .route(
            "/api/portfolio/contact",
            get(get_section::<ContactInfo>).put(replace_section::<ContactInfo>),
        )
        // Collections
        .route(
            "/api/portfolio/skills",
            get(list_items::<Skill>).post(add_item::<Skill>),
        )
        .route(
            "/api/portfolio/skills/:id",
            put(replace_item::<Skill>).delete(delete_item::<Skill>),
        )
        .route(
            "/api/portfolio/projects",
            get(list_items::<Project>).post(add_item::<Project>),
        )
        .route(
            "/api/portfolio/projects/:id",
            put(replace_item::<Project>).delete(delete_item::<Project>),
        )
}

/// `*` (or an empty list) allows any origin; otherwise only the listed ones.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() || origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        let parsed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|o| HeaderValue::from_str(o).ok())
            .collect();
        if parsed.is_empty() {
            AllowOrigin::any()
        } else {
            AllowOrigin::list(parsed)
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
}
