//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpResponse, test, web};

use crate::domain::ports::{
    MockChatCommand, MockChatQuery, MockEmployeesQuery, MockLoginService,
    MockRegistrationCommand,
};
use crate::domain::{EmployeeId, Error};
use crate::inbound::http::error::json_error_handler;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::{auth, chats, employees};

/// Cookie session middleware with a throwaway key and `Secure` disabled.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// The `session` cookie set by `res`, if any.
pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(|cookie| cookie.into_owned())
}

/// One mock per driving port; set expectations, then call [`Self::into_state`].
#[derive(Default)]
pub struct MockPorts {
    pub login: MockLoginService,
    pub registration: MockRegistrationCommand,
    pub employees: MockEmployeesQuery,
    pub chats: MockChatCommand,
    pub chat_query: MockChatQuery,
}

impl MockPorts {
    pub fn into_state(self) -> HttpState {
        HttpState {
            login: Arc::new(self.login),
            registration: Arc::new(self.registration),
            employees: Arc::new(self.employees),
            chats: Arc::new(self.chats),
            chat_query: Arc::new(self.chat_query),
        }
    }
}

async fn force_login(session: SessionContext, path: web::Path<String>) -> Result<HttpResponse, Error> {
    let id = EmployeeId::new(path.into_inner())
        .map_err(|err| Error::invalid_request(err.to_string()))?;
    session.persist_employee(&id)?;
    Ok(HttpResponse::Ok().finish())
}

/// Every `/api/v1` route over `state`, plus `GET /test/login/{id}` which
/// opens a session without going through the login port.
pub fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .wrap(test_session_middleware())
        .route("/test/login/{id}", web::get().to(force_login))
        .service(
            web::scope("/api/v1")
                .service(auth::login)
                .service(auth::logout)
                .service(auth::register)
                .service(auth::current_employee)
                .service(employees::list_employees)
                .service(employees::get_employee)
                .service(chats::list_chats)
                .service(chats::create_chat)
                .service(chats::delete_chat)
                .service(chats::list_messages)
                .service(chats::send_message),
        )
}

/// Session cookie for `employee`, obtained through the test login route.
pub async fn login_cookie<S, B>(app: &S, employee: &str) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
{
    let res = test::call_service(
        app,
        test::TestRequest::get()
            .uri(&format!("/test/login/{employee}"))
            .to_request(),
    )
    .await;
    session_cookie(&res).unwrap_or_else(|| panic!("no session cookie for {employee}"))
}
