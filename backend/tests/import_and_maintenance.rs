//! Spreadsheet import and name simplification against the in-memory store,
//! followed by the HTTP view of the imported records.

#[path = "support/app.rs"]
mod app_support;

use std::sync::Arc;

use actix_web::test::{self, TestRequest};
use rstest::rstest;
use serde_json::{Value, json};

use app_support::app;
use hr_assistant::domain::ports::{AssistantCapability, EmployeeRepository};
use hr_assistant::domain::{
    AccountService, ChatService, Department, DirectoryService, EmployeeId, EmployeeImporter,
    NameSimplifier,
};
use hr_assistant::inbound::http::state::HttpState;
use hr_assistant::test_support::{
    InMemoryChatRepository, InMemoryEmployeeRepository, PlaintextPasswordHasher,
};
use mockable::DefaultClock;

const EXPORT: &str = "\
id;nom;email;departement;Manager;poste;responsable;date_embauche;conges.droit_annuel;conges.utilises;conges.planifies;conges.restants;remuneration.salaire;remuneration.eligible_prime;avantages.regime_sante
EMP010;Anne-Sophie Lefèvre;;Ressources Humaines;OUI;Responsable RH;;15/09/2018;25;10;0;15;61000,50;oui;Premium
EMP011;Luc Moreau Dubois;luc.moreau@company.com;IT;non;Développeur;EMP010;31/02/2021;25;3;2;20;48000;non;Famille
;Sans Identifiant;x@company.com;IT;non;Stagiaire;;;;;;;;;
";

fn importer(
    employees: &Arc<InMemoryEmployeeRepository>,
) -> EmployeeImporter<InMemoryEmployeeRepository, PlaintextPasswordHasher> {
    EmployeeImporter::new(
        Arc::clone(employees),
        Arc::new(PlaintextPasswordHasher),
        "bienvenue",
    )
}

fn id(raw: &str) -> EmployeeId {
    EmployeeId::new(raw).expect("employee id")
}

#[rstest]
#[tokio::test]
async fn import_creates_then_updates_without_touching_passwords() {
    let employees = Arc::new(InMemoryEmployeeRepository::default());

    let first = importer(&employees).import(EXPORT.as_bytes()).await.expect("import");
    assert_eq!((first.created, first.updated, first.skipped), (2, 0, 1));
    assert_eq!(first.total, 3);
    assert_eq!(first.errors, 0);

    let anne = employees
        .find_by_id(&id("EMP010"))
        .await
        .expect("lookup")
        .expect("imported");
    assert_eq!(anne.first_name(), "Anne-Sophie");
    assert_eq!(anne.email(), "emp010@company.com");
    assert_eq!(anne.department(), Some(Department::Rh));
    assert_eq!(anne.password_hash(), "plain:bienvenue");

    let again = EmployeeImporter::new(
        Arc::clone(&employees),
        Arc::new(PlaintextPasswordHasher),
        "autre",
    )
    .import(EXPORT.as_bytes())
    .await
    .expect("re-import");
    assert_eq!((again.created, again.updated), (0, 2));
    let anne = employees
        .find_by_id(&id("EMP010"))
        .await
        .expect("lookup")
        .expect("still there");
    assert_eq!(anne.password_hash(), "plain:bienvenue");
}

#[rstest]
#[tokio::test]
async fn windows_1252_exports_are_decoded() {
    let employees = Arc::new(InMemoryEmployeeRepository::default());
    let mut bytes = b"id,nom,poste\nEMP020,Ren".to_vec();
    bytes.push(0xE9); // é in Windows-1252
    bytes.extend_from_slice(b" Petit,Comptable\n");

    let summary = importer(&employees).import(&bytes).await.expect("import");
    assert_eq!(summary.created, 1);
    let rene = employees
        .find_by_id(&id("EMP020"))
        .await
        .expect("lookup")
        .expect("imported");
    assert_eq!(rene.first_name(), "René");
}

#[rstest]
#[tokio::test]
async fn name_simplification_plans_then_applies() {
    let employees = Arc::new(InMemoryEmployeeRepository::default());
    importer(&employees).import(EXPORT.as_bytes()).await.expect("import");

    let simplifier = NameSimplifier::new(Arc::clone(&employees));
    let plan = simplifier.plan().await.expect("plan");
    let planned: Vec<(&str, &str)> = plan
        .iter()
        .map(|change| (change.id.as_str(), change.after.as_str()))
        .collect();
    assert_eq!(planned, [("EMP010", "Anne Lefèvre"), ("EMP011", "Luc Moreau")]);

    // Planning alone writes nothing.
    let luc = employees
        .find_by_id(&id("EMP011"))
        .await
        .expect("lookup")
        .expect("imported");
    assert_eq!(luc.last_name(), "Moreau Dubois");

    assert_eq!(simplifier.apply(&plan).await.expect("apply"), 2);
    let luc = employees
        .find_by_id(&id("EMP011"))
        .await
        .expect("lookup")
        .expect("imported");
    assert_eq!(luc.last_name(), "Moreau");
    assert!(simplifier.plan().await.expect("replan").is_empty());
}

#[actix_web::test]
async fn imported_accounts_log_in_and_see_their_reports() {
    let employees = Arc::new(InMemoryEmployeeRepository::default());
    importer(&employees).import(EXPORT.as_bytes()).await.expect("import");

    let accounts = Arc::new(AccountService::new(
        Arc::clone(&employees),
        Arc::new(PlaintextPasswordHasher),
    ));
    let chats = Arc::new(ChatService::new(
        Arc::clone(&employees),
        Arc::new(InMemoryChatRepository::default()),
        AssistantCapability::Unconfigured,
        Arc::new(DefaultClock),
    ));
    let state = HttpState {
        login: accounts.clone(),
        registration: accounts,
        employees: Arc::new(DirectoryService::new(Arc::clone(&employees))),
        chats: chats.clone(),
        chat_query: chats,
    };
    let app = test::init_service(app(state)).await;

    let res = test::call_service(
        &app,
        TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({"username": "emp010", "password": "bienvenue"}))
            .to_request(),
    )
    .await;
    assert!(res.status().is_success());
    let cookie = res
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(|cookie| cookie.into_owned())
        .expect("session cookie");

    let res = test::call_service(
        &app,
        TestRequest::get()
            .uri("/api/v1/employees/EMP011")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["disclosure"], "full");
    assert_eq!(body["private"]["compensation"]["benefitsTier"], "Famille");
    assert_eq!(body["private"]["annualLeave"]["remaining"], 20.0);
}
