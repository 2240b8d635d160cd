//! Server construction and middleware wiring.

mod config;
#[cfg(feature = "metrics")]
pub mod metrics;

pub use config::ServerConfig;

#[cfg(feature = "metrics")]
use metrics::MetricsLayer;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::info;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use crate::Trace;
#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::inbound::graphql::{SocialSchema, build_schema, graphql};
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::operations::execute_operation;
use crate::inbound::http::posts::list_posts;
use crate::inbound::http::session_config::SessionSettings;
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::inbound::http::users::{current_user, list_users, login, logout};
use crate::inbound::ws;
use crate::inbound::ws::origin::OriginPolicy;
use crate::inbound::ws::state::WsState;

/// Shared state handed to every worker's [`App`].
#[derive(Clone)]
pub struct AppDependencies {
    pub health_state: web::Data<HealthState>,
    pub http_state: web::Data<HttpState>,
    pub schema: web::Data<SocialSchema>,
    pub ws_state: web::Data<WsState>,
    pub session: SessionSettings,
}

impl AppDependencies {
    /// Build the services once; workers share them through `web::Data`.
    pub fn new(
        ports: HttpStatePorts,
        session: SessionSettings,
        origins: OriginPolicy,
        health_state: web::Data<HealthState>,
    ) -> Self {
        let http_state = HttpState::from(ports);
        let schema = build_schema(&http_state);
        let ws_state = WsState::new(
            http_state.registry.clone(),
            http_state.queries.clone(),
            http_state.mutations.clone(),
            origins,
        );
        Self {
            health_state,
            http_state: web::Data::new(http_state),
            schema: web::Data::new(schema),
            ws_state: web::Data::new(ws_state),
            session,
        }
    }
}

/// Assemble routes and middleware.
///
/// GraphiQL and Swagger UI are only mounted in debug builds.
pub fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        schema,
        ws_state,
        session,
    } = deps;

    let api = web::scope("/api/v1")
        .service(login)
        .service(logout)
        .service(current_user)
        .service(list_users)
        .service(list_posts)
        .service(execute_operation);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(schema)
        .app_data(ws_state)
        .wrap(session.middleware())
        .wrap(Trace)
        .service(api)
        .service(graphql)
        .service(ws::ws_entry)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app
        .service(crate::inbound::graphql::graphiql)
        .service(SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server from a [`ServerConfig`].
///
/// Readiness flips once the listener is bound.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let ServerConfig {
        ports,
        session,
        origins,
        bind_addr,
        #[cfg(feature = "metrics")]
        prometheus,
    } = config;
    let deps = AppDependencies::new(ports, session, origins, health_state.clone());

    #[cfg(feature = "metrics")]
    let metrics_layer = MetricsLayer::from_option(prometheus);

    let server = HttpServer::new(move || {
        let app = build_app(deps.clone());

        #[cfg(feature = "metrics")]
        let app = app.wrap(metrics_layer.clone());

        app
    })
    .bind(bind_addr)?
    .run();

    info!(%bind_addr, "server listening");
    health_state.mark_ready();
    Ok(server)
}
