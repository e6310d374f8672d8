//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;

use state_builders::build_http_state;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use hr_assistant::Trace;
#[cfg(debug_assertions)]
use hr_assistant::doc::ApiDoc;
use hr_assistant::inbound::http::auth::{current_employee, login, logout, register};
use hr_assistant::inbound::http::chats::{
    create_chat, delete_chat, list_chats, list_messages, send_message,
};
use hr_assistant::inbound::http::employees::{get_employee, list_employees};
use hr_assistant::inbound::http::error::json_error_handler;
use hr_assistant::inbound::http::health::{HealthState, live, ready};
use hr_assistant::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
    ttl_hours: i64,
}

fn build_app(
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
        key,
        cookie_secure,
        same_site,
        ttl_hours,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(
            PersistentSession::default()
                .session_ttl(actix_web::cookie::time::Duration::hours(ttl_hours)),
        )
        .build();

    let api = web::scope("/api/v1")
        .wrap(session)
        .service(login)
        .service(logout)
        .service(register)
        .service(current_employee)
        .service(list_employees)
        .service(get_employee)
        .service(list_chats)
        .service(create_chat)
        .service(delete_chat)
        .service(list_messages)
        .service(send_message);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct the HTTP server and mark the process ready.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let ServerConfig {
        session,
        bind_addr,
        db_pool,
        assistant,
    } = config;
    let http_state = build_http_state(&db_pool, assistant);
    let cookie_secure = session.cookie_secure;
    let same_site = session.same_site;
    let ttl_hours = session.ttl_hours;
    let key = session.key;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
            ttl_hours,
        })
    })
    .bind(bind_addr)?
    .disable_signals()
    .run();

    health_state.mark_ready();
    Ok(server)
}
