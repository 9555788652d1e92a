//! End-to-end tests of the builder and dispatcher against a wiremock server.

use courier::{ApiClient, Configuration, Credential, Error, Parameters};
use serde::{Deserialize, Serialize};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, body_string, body_string_contains, header, method, path, query_param},
};

#[derive(Debug, Clone, Serialize)]
struct CompanyBody {
    #[serde(rename = "companyId")]
    company_id: String,
    name: String,
}

#[derive(Parameters)]
struct BookingRequest {
    #[http("keyword,form")]
    keyword: String,
    #[http("uuid,path")]
    uuid: String,
    #[http("access-token,authorizationType")]
    access_token: String,
    #[http("bookingCode,query")]
    booking_code: String,
    #[http("body,body")]
    body: CompanyBody,
}

fn booking_request() -> BookingRequest {
    BookingRequest {
        keyword: "ho chi minh".to_string(),
        uuid: "c68c5133-6463-49ed-9fef-4f945f5152d7".to_string(),
        access_token: "ABC.xyz.123".to_string(),
        booking_code: "12736".to_string(),
        body: CompanyBody {
            company_id: "cae9753a-ea8a-4ac4-acab-674ca7e673ca".to_string(),
            name: "Phuc dep trai".to_string(),
        },
    }
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
struct PostResponse {
    #[serde(rename = "statusCode")]
    status_code: i32,
    message: String,
}

#[derive(Debug, Deserialize)]
struct Company {
    uuid: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct CommonResult {
    #[serde(rename = "statusCode")]
    status_code: i32,
    message: String,
    data: Vec<Company>,
}

fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::new(Configuration::new().base_path(server.uri()))
}

#[tokio::test]
async fn test_record_routes_into_every_bucket() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/booking/detail/c68c5133-6463-49ed-9fef-4f945f5152d7"))
        .and(query_param("bookingCode", "12736"))
        .and(header("Authorization", "access-token ABC.xyz.123"))
        .and(header("Content-Type", "application/x-www-form-urlencoded"))
        .and(body_string("keyword=ho+chi+minh"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"{"statusCode":1,"message":"ok"}"#, "application/json"),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let response = client
        .builder("/booking/detail/:uuid")
        .post()
        .build_request(&booking_request())
        .call::<PostResponse>(None)
        .await
        .expect("response");

    assert_eq!(response.status(), 200);
    assert_eq!(
        response.body(),
        &PostResponse {
            status_code: 1,
            message: "ok".to_string(),
        }
    );
}

#[tokio::test]
async fn test_body_field_is_sent_explicitly() {
    let mock_server = MockServer::start().await;
    let record = booking_request();

    Mock::given(method("POST"))
        .and(path("/company"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(serde_json::json!({
            "companyId": "cae9753a-ea8a-4ac4-acab-674ca7e673ca",
            "name": "Phuc dep trai",
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "statusCode": 1,
            "message": "created",
            "data": [{ "uuid": "cae9753a-ea8a-4ac4-acab-674ca7e673ca", "name": "Phuc dep trai" }],
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let response = client
        .builder("/company")
        .post()
        .build_header(&record)
        .body(record.body.clone())
        .call::<CommonResult>(None)
        .await
        .expect("response");

    let result = response.into_body();
    assert_eq!(result.status_code, 1);
    assert_eq!(result.message, "created");
    assert_eq!(result.data.len(), 1);
    assert_eq!(result.data[0].uuid, "cae9753a-ea8a-4ac4-acab-674ca7e673ca");
    assert_eq!(result.data[0].name, "Phuc dep trai");
}

#[tokio::test]
async fn test_explicit_header_overrides_record() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(header("Authorization", "Bearer override"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    client
        .builder("/booking/detail/:uuid")
        .bearer_auth("override")
        .build_header(&booking_request())
        .call::<()>(None)
        .await
        .expect("response");
}

#[tokio::test]
async fn test_unmatched_path_tokens_stay_verbatim() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/hotels/42/rooms/:room"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("null", "application/json"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let response = client
        .builder("/hotels/:hotel/rooms/:room")
        .path("hotel", 42)
        .call::<Option<PostResponse>>(None)
        .await
        .expect("response");

    assert!(response.body().is_none());
}

#[tokio::test]
async fn test_not_found_is_an_http_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/booking/detail/unknown"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_raw(r#"{"statusCode":404,"message":"not found"}"#, "application/json"),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client
        .builder("/booking/detail/:uuid")
        .path("uuid", "unknown")
        .call::<PostResponse>(None)
        .await
        .expect_err("404 must fail");

    assert!(err.is_not_found());
    assert!(err.is_client_error());
    let Error::Http {
        status,
        message,
        body,
    } = &err
    else {
        panic!("expected an HTTP error, got {err:?}");
    };
    assert_eq!(*status, 404);
    assert_eq!(message, "404 Not Found");
    assert_eq!(body.as_ref(), br#"{"statusCode":404,"message":"not found"}"#);

    let decoded: PostResponse = err.decode_body().expect("body").expect("json");
    assert_eq!(decoded.message, "not found");
}

#[tokio::test]
async fn test_server_error_is_classified() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client
        .builder("/booking/1")
        .delete()
        .send(None)
        .await
        .expect_err("503 must fail");

    assert!(err.is_server_error());
    assert_eq!(err.status(), Some(503));
    assert_eq!(err.body().map(|body| &body[..]), Some(&b"maintenance"[..]));
}

#[tokio::test]
async fn test_malformed_json_is_a_decode_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"{"statusCode":"one","message":"ok"}"#, "application/json"),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client
        .builder("/")
        .call::<PostResponse>(None)
        .await
        .expect_err("decode must fail");

    assert!(err.is_decode());
    assert_eq!(err.status(), Some(200));
    assert!(err.to_string().contains("statusCode"));
}

#[tokio::test]
async fn test_builders_from_one_client_are_independent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(204))
        .expect(2)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let first = client.builder("/first").header("X-Trace", "1");
    let second = client.builder("/second");

    first.send(None).await.expect("first");
    second.send(None).await.expect("second");

    let requests = mock_server.received_requests().await.expect("recording");
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].url.path(), "/first");
    assert!(requests[0].headers.contains_key("x-trace"));
    assert_eq!(requests[1].url.path(), "/second");
    assert!(!requests[1].headers.contains_key("x-trace"));
}

#[tokio::test]
async fn test_default_headers_user_agent_and_accept() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(header("X-API-Key", "abcdefgh123456789"))
        .and(header("User-Agent", "booking-app/2.0"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(
        Configuration::new()
            .base_path(mock_server.uri())
            .default_header("X-API-Key", "abcdefgh123456789")
            .user_agent("booking-app/2.0"),
    );
    client
        .builder_with_accept("/", ["application/xml"])
        .send(None)
        .await
        .expect("response");

    let requests = mock_server.received_requests().await.expect("recording");
    let accept = requests[0]
        .headers
        .get("accept")
        .and_then(|value| value.to_str().ok());
    assert_eq!(accept, Some("application/json, application/xml"));
}

#[tokio::test]
async fn test_auth_argument_fills_missing_header_only() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ambient"))
        .and(header("X-API-Key", "abcdefgh123456789"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/explicit"))
        .and(header("X-API-Key", "explicit"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let credential = Credential::api_key("X-API-Key", "abcdefgh123456789");

    client
        .builder("/ambient")
        .send(Some(&credential))
        .await
        .expect("ambient");
    client
        .builder("/explicit")
        .api_key("X-API-Key", "explicit")
        .send(Some(&credential))
        .await
        .expect("explicit");
}

#[tokio::test]
async fn test_basic_auth_header() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(header("Authorization", "Basic dXNlcjpwYXNz"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    client
        .builder("/")
        .basic_auth("user", "pass")
        .send(None)
        .await
        .expect("response");
}

#[tokio::test]
async fn test_multipart_upload() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/upload"))
        .and(body_string_contains("name=\"keyword\"\r\n\r\nho chi minh\r\n"))
        .and(body_string_contains(
            "name=\"ticket\"; filename=\"ticket.txt\"\r\nContent-Type: text/plain\r\n\r\nseat 12A\r\n",
        ))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    client
        .builder("/upload")
        .post()
        .build_form(&booking_request())
        .form_file_name("ticket")
        .file_name("ticket.txt")
        .file_bytes(&b"seat 12A"[..])
        .send(None)
        .await
        .expect("response");

    let requests = mock_server.received_requests().await.expect("recording");
    let content_type = requests[0]
        .headers
        .get("content-type")
        .and_then(|value| value.to_str().ok())
        .expect("content type");
    assert!(content_type.starts_with("multipart/form-data; boundary="));
}

#[tokio::test]
async fn test_body_and_form_conflict_never_reaches_server() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client
        .builder("/booking")
        .post()
        .build_request(&booking_request())
        .body(booking_request().body)
        .send(None)
        .await
        .expect_err("conflict");

    assert!(matches!(err, Error::InvalidRequest(_)));
}

#[tokio::test]
async fn test_xml_body_and_response() {
    #[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
    struct Ticket {
        code: String,
        seats: u32,
    }

    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(header("Content-Type", "application/xml"))
        .and(body_string_contains("<code>BK-7</code>"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            "<Ticket><code>BK-7</code><seats>3</seats></Ticket>",
            "application/xml",
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let response = client
        .builder("/tickets")
        .put()
        .use_application_xml()
        .body(Ticket {
            code: "BK-7".to_string(),
            seats: 3,
        })
        .call::<Ticket>(None)
        .await
        .expect("response");

    assert_eq!(response.body().seats, 3);
}

#[tokio::test]
async fn test_custom_parser() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("12736"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let response = client
        .builder("/booking/code")
        .call_with(None, |body: &[u8]| -> Result<u64, String> {
            let text = std::str::from_utf8(body).map_err(|e| e.to_string())?;
            text.trim().parse::<u64>().map_err(|e| e.to_string())
        })
        .await
        .expect("response");
    assert_eq!(*response.body(), 12736);

    let text = client
        .builder("/booking/code")
        .call_with(None, courier::parser::Text)
        .await
        .expect("response");
    assert_eq!(text.body(), "12736");
}

#[tokio::test]
async fn test_programmatic_parameters() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/booking/detail/BK-9"))
        .and(query_param("lang", "vi"))
        .and(header("X-Trace", "abc"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let params = Parameters::new()
        .path("uuid", "BK-9")
        .query("lang", "vi")
        .header("X-Trace", "abc");

    let client = client_for(&mock_server);
    client
        .builder("/booking/detail/:uuid")
        .build_request(&params)
        .send(None)
        .await
        .expect("response");
}

#[tokio::test]
async fn test_connection_error() {
    let client = ApiClient::new(Configuration::new().base_path("http://127.0.0.1:1"));
    let err = client
        .builder("/")
        .send(None)
        .await
        .expect_err("nothing listens on port 1");

    assert!(err.is_connection());
}
