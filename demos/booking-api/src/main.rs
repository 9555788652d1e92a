//! Booking API Example
//!
//! Demonstrates courier's tagged-record request composition.

// Example-specific lint allowances
#![allow(missing_docs)]
#![allow(clippy::print_stdout)]
#![allow(dead_code)]

use std::collections::HashMap;

use courier::prelude::*;

// ============================================================================
// Data Types
// ============================================================================

/// Company payload sent in request bodies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    #[serde(rename = "companyId")]
    pub company_id: String,
    pub name: String,
}

/// Everything needed to look up or update a booking.
#[derive(Debug, Clone, Parameters)]
pub struct BookingRequest {
    #[http("keyword,form")]
    pub keyword: String,
    #[http("uuid,path")]
    pub uuid: String,
    #[http("access-token,authorizationType")]
    pub access_token: String,
    #[http("bookingCode,query")]
    pub booking_code: String,
    #[http("body,body")]
    pub body: Company,
}

/// Answer to a write.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PostResponse {
    #[serde(rename = "statusCode")]
    pub status_code: i32,
    pub message: String,
}

/// A booked company.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BookedCompany {
    pub uuid: String,
    pub name: String,
}

/// Answer to a read.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommonResult {
    #[serde(rename = "statusCode")]
    pub status_code: i32,
    pub message: String,
    pub data: Vec<BookedCompany>,
}

// ============================================================================
// API wrapper
// ============================================================================

/// Booking service client.
#[derive(Debug, Clone)]
pub struct BookingApi {
    client: ApiClient,
    api_key: Credential,
}

impl BookingApi {
    /// Client for the booking service at `base_path`.
    #[must_use]
    pub fn new(base_path: impl Into<String>, api_key: &str) -> Self {
        let config = Configuration::new()
            .base_path(base_path)
            .user_agent("booking-api-example/0.1.0");
        Self {
            client: ApiClient::new(config),
            api_key: Credential::api_key("X-API-Key", api_key),
        }
    }

    /// Fetch the companies of a booking.
    pub async fn detail(&self, request: &BookingRequest) -> courier::Result<CommonResult> {
        let response = self
            .client
            .builder("/booking/detail/:uuid")
            .build_header(request)
            .build_path(request)
            .build_query(request)
            .call::<CommonResult>(Some(&self.api_key))
            .await?;
        Ok(response.into_body())
    }

    /// Search bookings with the form fields of `request`.
    pub async fn search(&self, request: &BookingRequest) -> courier::Result<CommonResult> {
        let response = self
            .client
            .builder("/booking/search")
            .post()
            .build_header(request)
            .build_form(request)
            .call::<CommonResult>(Some(&self.api_key))
            .await?;
        Ok(response.into_body())
    }

    /// Attach the company of `request` to its booking.
    pub async fn attach_company(&self, request: &BookingRequest) -> courier::Result<PostResponse> {
        let response = self
            .client
            .builder("/booking/detail/:uuid/company")
            .post()
            .build_header(request)
            .build_path(request)
            .body(request.body.clone())
            .call::<PostResponse>(Some(&self.api_key))
            .await?;
        Ok(response.into_body())
    }
}

// ============================================================================
// Main: Demonstrate usage
// ============================================================================

fn sample_request() -> BookingRequest {
    BookingRequest {
        keyword: "ho chi minh".to_string(),
        uuid: "c68c5133-6463-49ed-9fef-4f945f5152d7".to_string(),
        access_token: "ABC.xyz.123".to_string(),
        booking_code: "12736".to_string(),
        body: Company {
            company_id: "cae9753a-ea8a-4ac4-acab-674ca7e673ca".to_string(),
            name: "Phuc dep trai".to_string(),
        },
    }
}

#[tokio::main]
async fn main() -> courier::Result<()> {
    let servers = Configuration::new().servers([ServerConfiguration::new(
        "https://{environment}.booking.example.com/api",
    )
    .with_description("Booking service")
    .with_variable(
        "environment",
        ServerVariable::new("prod").with_enum_values(["prod", "staging"]),
    )]);

    let variables = HashMap::from([("environment".to_string(), "staging".to_string())]);
    let base_path = servers.server_url(0, &variables)?;
    println!("Booking API base path: {base_path}");

    let api = BookingApi::new(base_path, "abcdefgh123456789");
    let request = sample_request();
    let parts = courier::decompose(&request);

    println!("\n=== Decomposed request ===");
    println!("headers: {:?}", parts.header);
    println!("path:    {:?}", parts.path);
    println!("query:   {:?}", parts.query);
    println!("form:    {:?}", parts.form);

    // These calls would work against a real booking service
    println!("\n=== Example API calls (would require real API) ===");
    println!("api.detail(&request).await?");
    println!("api.search(&request).await?");
    println!("api.attach_company(&request).await?");
    println!("\n{api:?}");

    Ok(())
}

// ============================================================================
// Tests using wiremock
// ============================================================================
