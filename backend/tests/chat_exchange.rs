//! End-to-end chat exchanges over HTTP against in-memory stores.

#[path = "support/app.rs"]
mod app_support;

use std::sync::Arc;

use actix_http::Request;
use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use rstest::rstest;
use serde_json::{Value, json};

use app_support::{Backend, app, backend, login};
use hr_assistant::domain::ports::{AssistantCapability, EmployeeRepository};
use hr_assistant::domain::{EmployeeId, FallbackResponder, TRACE_ID_HEADER};
use hr_assistant::test_support::{FailingAssistantGateway, StaticAssistantGateway};

async fn create_chat<S, B>(app: &S, cookie: &Cookie<'static>) -> String
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: actix_web::body::MessageBody,
{
    let res = test::call_service(
        app,
        TestRequest::post()
            .uri("/api/v1/chats")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(res).await;
    body["id"].as_str().expect("chat id").to_owned()
}

async fn send<S, B>(app: &S, cookie: &Cookie<'static>, chat_id: &str, content: &str) -> Value
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: actix_web::body::MessageBody,
{
    let res = test::call_service(
        app,
        TestRequest::post()
            .uri(&format!("/api/v1/chats/{chat_id}/messages"))
            .cookie(cookie.clone())
            .set_json(json!({ "content": content }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    test::read_body_json(res).await
}

fn reply(exchange: &Value) -> &str {
    exchange["assistantMessage"]["content"]
        .as_str()
        .expect("assistant content")
}

#[actix_web::test]
async fn first_message_sets_the_title_and_later_ones_keep_it() {
    let Backend { state, .. } = backend(AssistantCapability::Unconfigured);
    let app = test::init_service(app(state)).await;
    let cookie = login(&app, "EMP001").await;
    let chat_id = create_chat(&app, &cookie).await;

    let first = send(&app, &cookie, &chat_id, "  Combien de jours   de congés ?  ").await;
    assert_eq!(first["chat"]["title"], "Combien de jours de congés ?");

    let second = send(&app, &cookie, &chat_id, "Et mon salaire ?").await;
    assert_eq!(second["chat"]["title"], "Combien de jours de congés ?");

    let res = test::call_service(
        &app,
        TestRequest::get()
            .uri(&format!("/api/v1/chats/{chat_id}/messages"))
            .cookie(cookie)
            .to_request(),
    )
    .await;
    let messages: Value = test::read_body_json(res).await;
    let senders: Vec<&str> = messages
        .as_array()
        .expect("messages")
        .iter()
        .filter_map(|message| message["sender"].as_str())
        .collect();
    assert_eq!(senders, ["user", "assistant", "user", "assistant"]);
}

#[actix_web::test]
async fn leave_questions_answer_with_the_requesters_own_balance() {
    let Backend { state, .. } = backend(AssistantCapability::Unconfigured);
    let app = test::init_service(app(state)).await;
    let cookie = login(&app, "EMP001").await;
    let chat_id = create_chat(&app, &cookie).await;

    let exchange = send(&app, &cookie, &chat_id, "mes congés").await;
    let text = reply(&exchange);
    assert!(text.contains("15 jours"), "{text}");
    assert!(!text.contains("21"), "leaked a colleague's balance: {text}");
    assert!(!text.contains("Paul"), "{text}");
}

#[actix_web::test]
async fn empty_departments_are_reported_explicitly() {
    let Backend { state, .. } = backend(AssistantCapability::Unconfigured);
    let app = test::init_service(app(state)).await;
    let cookie = login(&app, "EMP002").await;
    let chat_id = create_chat(&app, &cookie).await;

    let exchange = send(&app, &cookie, &chat_id, "qui est dans le département IT").await;
    assert!(
        reply(&exchange).contains("Aucun employé trouvé dans le département IT"),
        "{}",
        reply(&exchange)
    );
}

#[actix_web::test]
async fn failing_gateway_persists_the_rule_based_reply() {
    let Backend {
        state, employees, ..
    } = backend(AssistantCapability::Configured(Arc::new(FailingAssistantGateway)));
    let app = test::init_service(app(state)).await;
    let cookie = login(&app, "EMP002").await;
    let chat_id = create_chat(&app, &cookie).await;

    send(&app, &cookie, &chat_id, "quel est mon salaire").await;

    let requester = employees
        .find_by_id(&EmployeeId::new("EMP002").expect("id"))
        .await
        .expect("lookup")
        .expect("seeded");
    let expected = FallbackResponder::new(Arc::clone(&employees))
        .respond("quel est mon salaire", Some(&requester))
        .await
        .expect("fallback reply");

    let res = test::call_service(
        &app,
        TestRequest::get()
            .uri(&format!("/api/v1/chats/{chat_id}/messages"))
            .cookie(cookie)
            .to_request(),
    )
    .await;
    let messages: Value = test::read_body_json(res).await;
    assert_eq!(messages[1]["content"], expected.as_str());
}

#[actix_web::test]
async fn configured_gateway_receives_the_briefing_and_answers() {
    let gateway = Arc::new(StaticAssistantGateway::new("Bonjour Paul, il vous reste 21 jours."));
    let Backend { state, .. } = backend(AssistantCapability::Configured(gateway.clone()));
    let app = test::init_service(app(state)).await;
    let cookie = login(&app, "EMP002").await;
    let chat_id = create_chat(&app, &cookie).await;

    let exchange = send(&app, &cookie, &chat_id, "mes congés").await;
    assert_eq!(reply(&exchange), "Bonjour Paul, il vous reste 21 jours.");

    let prompts = gateway.prompts();
    assert_eq!(prompts.len(), 1);
    let prompt = prompts.first().expect("prompt");
    assert!(prompt.contains("EMP002"));
    assert!(prompt.trim_end().ends_with("mes congés"));
    // Julie is neither Paul's manager nor his report.
    assert!(!prompt.contains("52000"), "private data leaked into the briefing");
}

#[rstest]
#[case("toutes mes informations")]
#[case("qui est Julie Bernard")]
#[case("statistiques par département")]
#[actix_web::test]
async fn rule_based_replies_are_deterministic(#[case] message: &str) {
    let Backend { state, .. } = backend(AssistantCapability::Unconfigured);
    let app = test::init_service(app(state)).await;
    let cookie = login(&app, "EMP001").await;

    let first_chat = create_chat(&app, &cookie).await;
    let second_chat = create_chat(&app, &cookie).await;
    let first = send(&app, &cookie, &first_chat, message).await;
    let second = send(&app, &cookie, &second_chat, message).await;
    assert_eq!(reply(&first), reply(&second));
    assert!(!reply(&first).trim().is_empty());
}

#[actix_web::test]
async fn chats_of_other_employees_are_not_found() {
    let Backend { state, .. } = backend(AssistantCapability::Unconfigured);
    let app = test::init_service(app(state)).await;
    let owner = login(&app, "EMP001").await;
    let stranger = login(&app, "EMP003").await;
    let chat_id = create_chat(&app, &owner).await;

    for request in [
        TestRequest::get().uri(&format!("/api/v1/chats/{chat_id}/messages")),
        TestRequest::delete().uri(&format!("/api/v1/chats/{chat_id}")),
        TestRequest::post()
            .uri(&format!("/api/v1/chats/{chat_id}/messages"))
            .set_json(json!({"content": "bonjour"})),
    ] {
        let res = test::call_service(&app, request.cookie(stranger.clone()).to_request()).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    let res = test::call_service(
        &app,
        TestRequest::get().uri("/api/v1/chats").cookie(owner).to_request(),
    )
    .await;
    let chats: Value = test::read_body_json(res).await;
    assert_eq!(chats.as_array().map(Vec::len), Some(1));
}

#[actix_web::test]
async fn blank_messages_are_rejected_with_a_traced_error() {
    let Backend { state, .. } = backend(AssistantCapability::Unconfigured);
    let app = test::init_service(app(state)).await;
    let cookie = login(&app, "EMP001").await;
    let chat_id = create_chat(&app, &cookie).await;

    let res = test::call_service(
        &app,
        TestRequest::post()
            .uri(&format!("/api/v1/chats/{chat_id}/messages"))
            .cookie(cookie)
            .set_json(json!({"content": "   "}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let header = res
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
        .expect("trace-id header");
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["details"]["code"], "empty_message");
    assert_eq!(body["traceId"], header.as_str());
}
