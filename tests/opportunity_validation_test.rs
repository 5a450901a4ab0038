mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::json;

use common::{get, json_request, offline_app, send};

fn raw_json(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn health_reports_ok() {
    let app = offline_app();
    let (resp, body) = send(&app, get("/health")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn statuses_are_listed_with_labels() {
    let app = offline_app();
    let (resp, body) = send(&app, get("/api/opportunities/statuses")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let values: Vec<&str> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["value"].as_str().unwrap())
        .collect();
    assert_eq!(
        values,
        vec!["APPLIED", "WAITING", "INTERVIEW_SCHEDULED", "REJECTED"]
    );
    assert_eq!(body["items"][2]["label"], "Interview scheduled");
}

#[tokio::test]
async fn create_rejects_invalid_submission_with_field_errors() {
    let app = offline_app();
    let payload = json!({
        "company_name": "",
        "company_website": "foo.com.br",
        "company_mobile_phone": "11987653201",
        "job_title": "Backend developer",
        "reference_site": "https://vagas.com.br/1",
        "status": "WAITING",
        "interview_datetime": "32/02/2022 09:03",
    });

    let (resp, body) = send(&app, json_request("POST", "/api/opportunities", &payload)).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body["error"],
        "An error occurred while registering the entry. Please check the submitted fields."
    );
    assert_eq!(body["fields"]["company_name"][0]["code"], "REQUIRED");
    assert_eq!(
        body["fields"]["company_name"][0]["message"],
        "The Company name field is required."
    );
    assert_eq!(body["fields"]["company_website"][0]["code"], "INVALID_FORMAT");
    assert_eq!(body["fields"]["company_mobile_phone"][0]["code"], "INVALID_FORMAT");
    assert_eq!(body["fields"]["interview_datetime"][0]["code"], "INVALID_FORMAT");
    assert!(body["fields"].get("job_title").is_none());
}

#[tokio::test]
async fn create_accepts_portuguese_field_names() {
    let app = offline_app();
    let payload = json!({
        "empresa_nome": "X".repeat(101),
        "empresa_site": "https://foo.com",
        "cargo_titulo": "Dev",
        "site_referencia": "https://foo.com/vaga",
        "situacao": "INTERVIEW_SCHEDULED",
        "data_hora_entrevista": "",
    });

    let (resp, body) = send(&app, json_request("POST", "/api/opportunities", &payload)).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["fields"]["company_name"][0]["code"], "TOO_LONG");
    assert_eq!(body["fields"]["interview_datetime"][0]["code"], "MUST_BE_PRESENT");
    assert!(body["fields"].get("company_website").is_none());
}

#[tokio::test]
async fn create_reports_non_text_values() {
    let app = offline_app();
    let payload = json!({
        "company_name": 7,
        "company_website": "https://foo.com",
        "job_title": "Dev",
        "reference_site": "https://foo.com/vaga",
        "status": "SOMETHING",
    });

    let (resp, body) = send(&app, json_request("POST", "/api/opportunities", &payload)).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["fields"]["company_name"][0]["code"], "INVALID_FORMAT");
    assert_eq!(body["fields"]["status"][0]["code"], "INVALID_CHOICE");
}

#[tokio::test]
async fn malformed_id_is_rejected_before_lookup() {
    let app = offline_app();
    let (resp, _) = send(&app, get("/api/opportunities/not-a-uuid")).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn list_rejects_page_past_addressable_range() {
    let app = offline_app();
    let (resp, body) = send(&app, get("/api/opportunities?page=9223372036854775807")).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("out of range"));
}

#[tokio::test]
async fn create_reports_duplicate_field_aliases_as_rejected_submission() {
    let app = offline_app();
    let body = r#"{"company_name":"A","empresa_nome":"B","company_website":"https://a.com","job_title":"Dev","reference_site":"https://a.com/v"}"#;

    let (resp, body) = send(&app, raw_json("POST", "/api/opportunities", body)).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body["error"],
        "An error occurred while registering the entry. Please check the submitted fields."
    );
    assert_eq!(body["fields"]["non_field_errors"][0]["code"], "INVALID_FORMAT");
}

#[tokio::test]
async fn update_reports_malformed_body_before_lookup() {
    let app = offline_app();
    let uri = format!("/api/opportunities/{}", uuid::Uuid::new_v4());

    let (resp, body) = send(&app, raw_json("PUT", &uri, "{\"company_name\": ")).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body["error"],
        "An error occurred while updating the entry. Please check the submitted fields."
    );
    assert_eq!(body["fields"]["non_field_errors"][0]["code"], "INVALID_FORMAT");
}
