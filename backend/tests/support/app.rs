//! Shared in-memory backend for HTTP integration tests.
#![allow(dead_code, reason = "each test binary uses a subset of the helpers")]

use std::sync::Arc;

use actix_http::Request;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, test, web};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;

use hr_assistant::Trace;
use hr_assistant::domain::ports::AssistantCapability;
use hr_assistant::domain::{
    AccountService, AnnualLeave, ChatService, Department, DirectoryService, Employee,
    EmployeeDraft, EmployeeId,
};
use hr_assistant::inbound::http::error::json_error_handler;
use hr_assistant::inbound::http::state::HttpState;
use hr_assistant::inbound::http::{auth, chats, employees};
use hr_assistant::test_support::{
    FixedClock, InMemoryChatRepository, InMemoryEmployeeRepository, PlaintextPasswordHasher,
};

pub const PASSWORD: &str = "secret123";

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0)
        .single()
        .expect("fixture instant")
}

pub fn employee(
    id: &str,
    first: &str,
    last: &str,
    department: Department,
    title: &str,
    manager: Option<&str>,
) -> EmployeeDraft {
    let mut draft = EmployeeDraft::new(EmployeeId::new(id).expect("id"), id);
    draft.password_hash = format!("plain:{PASSWORD}");
    draft.first_name = first.to_owned();
    draft.last_name = last.to_owned();
    draft.email = format!("{}.{}@company.com", first.to_lowercase(), last.to_lowercase());
    draft.department = Some(department);
    draft.job_title = title.to_owned();
    draft.manager_id = manager.map(|m| EmployeeId::new(m).expect("manager id"));
    draft
}

/// Marie manages Paul; Julie reports to nobody.
pub fn staff() -> Vec<Employee> {
    let mut marie = employee("EMP001", "Marie", "Dupont", Department::Rh, "Directrice RH", None);
    marie.is_manager = true;
    marie.annual_leave = AnnualLeave {
        entitlement: 25.0,
        used: 8.0,
        planned: 2.0,
        remaining: 15.0,
    };
    marie.compensation.salary = 68_000.0;

    let mut paul = employee(
        "EMP002",
        "Paul",
        "Martin",
        Department::Finance,
        "Analyste financier",
        Some("EMP001"),
    );
    paul.annual_leave.remaining = 21.0;
    paul.compensation.salary = 45_000.0;

    let mut julie = employee(
        "EMP003",
        "Julie",
        "Bernard",
        Department::Marketing,
        "Chargée de communication",
        None,
    );
    julie.compensation.salary = 52_000.0;

    [marie, paul, julie]
        .into_iter()
        .map(|draft| Employee::new(draft).expect("valid employee"))
        .collect()
}

pub struct Backend {
    pub employees: Arc<InMemoryEmployeeRepository>,
    pub chats: Arc<InMemoryChatRepository>,
    pub state: HttpState,
}

pub fn backend(assistant: AssistantCapability) -> Backend {
    let employees = Arc::new(InMemoryEmployeeRepository::with_employees(staff()));
    let chats = Arc::new(InMemoryChatRepository::default());
    let accounts = Arc::new(AccountService::new(
        Arc::clone(&employees),
        Arc::new(PlaintextPasswordHasher),
    ));
    let conversations = Arc::new(ChatService::new(
        Arc::clone(&employees),
        Arc::clone(&chats),
        assistant,
        Arc::new(FixedClock::new(fixed_now())),
    ));
    let state = HttpState {
        login: accounts.clone(),
        registration: accounts,
        employees: Arc::new(DirectoryService::new(Arc::clone(&employees))),
        chats: conversations.clone(),
        chat_query: conversations,
    };
    Backend {
        employees,
        chats,
        state,
    }
}

/// The production route table over `state`, with an insecure test cookie.
pub fn app(
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
    let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build();
    App::new()
        .app_data(web::Data::new(state))
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .wrap(Trace)
        .service(
            web::scope("/api/v1")
                .wrap(session)
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

/// Log in through `POST /api/v1/login` and return the session cookie.
pub async fn login<S, B>(app: &S, username: &str) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
{
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({"username": username, "password": PASSWORD}))
            .to_request(),
    )
    .await;
    assert!(res.status().is_success(), "login failed: {}", res.status());
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie")
}
