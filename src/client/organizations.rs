//! AWS Organizations client over the JSON 1.1 protocol

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::{Client as HttpClient, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::models::{CreateOrganizationRequest, FeatureSet, Organization, OrganizationResponse};
use super::sigv4::{self, Credentials, SignableRequest, SignedHeaders, SigningParams};
use super::{ApiResult, OrganizationsApi};
use crate::error::ApiError;

/// Service name used in the signing scope
const SERVICE: &str = "organizations";

/// Prefix of the X-Amz-Target header
const TARGET_PREFIX: &str = "AWSOrganizationsV20161128";

const CONTENT_TYPE: &str = "application/x-amz-json-1.1";

/// Client-side request budget. Organizations throttles control-plane calls
/// well below this, so a single CLI invocation never hits it.
const RATE_LIMIT_PER_SECOND: u32 = 5;

/// Error codes reported as throttling
const THROTTLING_CODES: [&str; 2] = ["TooManyRequestsException", "ThrottlingException"];

/// Organizations is a global service with one endpoint per partition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub url: String,
    pub signing_region: String,
}

impl Endpoint {
    /// Resolve the partition endpoint for a configured region
    pub fn for_region(region: &str) -> Self {
        let (host, signing_region) = if region.starts_with("us-gov-") {
            ("organizations.us-gov-west-1.amazonaws.com", "us-gov-west-1")
        } else if region.starts_with("cn-") {
            ("organizations.cn-northwest-1.amazonaws.com.cn", "cn-northwest-1")
        } else {
            ("organizations.us-east-1.amazonaws.com", "us-east-1")
        };

        Self {
            url: format!("https://{}", host),
            signing_region: signing_region.to_string(),
        }
    }

    /// Use a custom endpoint URL, signing for the partition of `region`
    pub fn custom(url: impl Into<String>, region: &str) -> Self {
        Self {
            url: url.into(),
            signing_region: Self::for_region(region).signing_region,
        }
    }
}

/// A signed request ready to send
struct PreparedRequest {
    url: Url,
    target: String,
    signed: SignedHeaders,
}

/// AWS Organizations API client
pub struct OrganizationsClient {
    http: HttpClient,
    endpoint: Endpoint,
    credentials: Credentials,
    rate_limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl OrganizationsClient {
    /// Create a client, optionally overriding the endpoint URL.
    ///
    /// The override is used for local testing against a stub server.
    pub fn with_endpoint(
        credentials: Credentials,
        region: &str,
        endpoint: Option<String>,
    ) -> ApiResult<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let quota = Quota::per_second(
            NonZeroU32::new(RATE_LIMIT_PER_SECOND).unwrap_or(NonZeroU32::MIN),
        );

        let endpoint = match endpoint {
            Some(url) => Endpoint::custom(url.trim_end_matches('/'), region),
            None => Endpoint::for_region(region),
        };

        Ok(Self {
            http,
            endpoint,
            credentials,
            rate_limiter: Arc::new(RateLimiter::direct(quota)),
        })
    }

    /// Resolved endpoint
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Build the request URL and sign it for `operation` at `time`.
    ///
    /// The signature covers the exact path the request is sent to, so an
    /// endpoint override with a path prefix signs correctly.
    fn prepare(
        &self,
        operation: &str,
        body: &[u8],
        time: DateTime<Utc>,
    ) -> ApiResult<PreparedRequest> {
        let url = Url::parse(&format!("{}/", self.endpoint.url))
            .map_err(|e| ApiError::Network(format!("Invalid endpoint URL: {}", e)))?;
        let host = match (url.host_str(), url.port()) {
            (Some(host), Some(port)) => format!("{}:{}", host, port),
            (Some(host), None) => host.to_string(),
            (None, _) => {
                return Err(ApiError::Network(format!(
                    "Endpoint URL has no host: {}",
                    self.endpoint.url
                )));
            }
        };
        let target = format!("{}.{}", TARGET_PREFIX, operation);

        let signed = sigv4::sign(
            &SignableRequest {
                method: "POST",
                path: url.path(),
                query: url.query().unwrap_or(""),
                headers: vec![
                    ("content-type".to_string(), CONTENT_TYPE.to_string()),
                    ("host".to_string(), host),
                    ("x-amz-target".to_string(), target.clone()),
                ],
                payload: body,
            },
            &SigningParams {
                credentials: &self.credentials,
                region: &self.endpoint.signing_region,
                service: SERVICE,
                time,
            },
        );

        Ok(PreparedRequest {
            url,
            target,
            signed,
        })
    }

    /// Invoke an operation and return the raw response body
    async fn send(&self, operation: &str, body: Vec<u8>) -> ApiResult<String> {
        self.rate_limiter.until_ready().await;

        let PreparedRequest {
            url,
            target,
            signed,
        } = self.prepare(operation, &body, Utc::now())?;

        log::debug!("POST {} ({})", url, target);

        let mut request = self
            .http
            .post(url)
            .header("content-type", CONTENT_TYPE)
            .header("x-amz-target", &target);
        for (name, value) in signed.into_pairs() {
            request = request.header(name, value);
        }

        let response = request.body(body).send().await.map_err(ApiError::from)?;

        let status = response.status();
        let error_type = response
            .headers()
            .get("x-amzn-errortype")
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to read response: {}", e)))?;

        if status.is_success() {
            Ok(text)
        } else {
            Err(parse_error(status.as_u16(), error_type.as_deref(), &text))
        }
    }

    async fn call<T: DeserializeOwned>(&self, operation: &str, body: Vec<u8>) -> ApiResult<T> {
        let text = self.send(operation, body).await?;
        serde_json::from_str(&text).map_err(|e| {
            ApiError::InvalidResponse(format!(
                "Failed to parse {} response: {}. Body was: {}",
                operation, e, text
            ))
        })
    }
}

#[async_trait]
impl OrganizationsApi for OrganizationsClient {
    async fn create_organization(&self, feature_set: FeatureSet) -> ApiResult<Organization> {
        let body = serde_json::to_vec(&CreateOrganizationRequest { feature_set })
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))?;
        let response: OrganizationResponse = self.call("CreateOrganization", body).await?;
        Ok(response.organization)
    }

    async fn describe_organization(&self) -> ApiResult<Organization> {
        let response: OrganizationResponse =
            self.call("DescribeOrganization", b"{}".to_vec()).await?;
        Ok(response.organization)
    }

    async fn delete_organization(&self) -> ApiResult<()> {
        self.send("DeleteOrganization", b"{}".to_vec()).await?;
        Ok(())
    }
}

/// Error body of the JSON 1.1 protocol
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(rename = "__type")]
    error_type: Option<String>,
    #[serde(alias = "Message")]
    message: Option<String>,
}

/// Turn a non-2xx response into an `ApiError`
fn parse_error(status: u16, header_type: Option<&str>, body: &str) -> ApiError {
    let parsed: Option<ErrorBody> = serde_json::from_str(body).ok();
    let (body_type, message) = match parsed {
        Some(b) => (b.error_type, b.message),
        None => (None, None),
    };

    let code = body_type
        .as_deref()
        .or(header_type)
        .map(sanitize_error_code)
        .filter(|c| !c.is_empty());

    let message = message.unwrap_or_else(|| body.trim().to_string());

    match code {
        Some(code) if THROTTLING_CODES.contains(&code.as_str()) => ApiError::Throttled(message),
        Some(code) => ApiError::Service {
            code,
            message,
            status,
        },
        None => ApiError::InvalidResponse(format!("HTTP {} without error code: {}", status, message)),
    }
}

/// Strip the namespace prefix and any `:` suffix from an error type
fn sanitize_error_code(raw: &str) -> String {
    let code = raw.rsplit('#').next().unwrap_or(raw);
    let code = code.split(':').next().unwrap_or(code);
    code.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use mockito::Matcher;

    fn credentials() -> Credentials {
        Credentials {
            access_key_id: "AKIDTEST".to_string(),
            secret_access_key: "secret".to_string(),
            session_token: None,
        }
    }

    fn client_for(server: &mockito::ServerGuard) -> OrganizationsClient {
        OrganizationsClient::with_endpoint(credentials(), "us-east-1", Some(server.url())).unwrap()
    }

    const DESCRIBE_BODY: &str = r#"{
        "Organization": {
            "Id": "o-a1b2c3d4e5",
            "Arn": "arn:aws:organizations::111111111111:organization/o-a1b2c3d4e5",
            "FeatureSet": "ALL",
            "MasterAccountArn": "arn:aws:organizations::111111111111:account/o-a1b2c3d4e5/111111111111",
            "MasterAccountId": "111111111111",
            "MasterAccountEmail": "admin@example.com"
        }
    }"#;

    #[test]
    fn test_partition_endpoints() {
        let default = Endpoint::for_region("eu-west-1");
        assert_eq!(default.url, "https://organizations.us-east-1.amazonaws.com");
        assert_eq!(default.signing_region, "us-east-1");

        let gov = Endpoint::for_region("us-gov-east-1");
        assert_eq!(gov.signing_region, "us-gov-west-1");

        let china = Endpoint::for_region("cn-north-1");
        assert!(china.url.ends_with(".amazonaws.com.cn"));
        assert_eq!(china.signing_region, "cn-northwest-1");
    }

    #[test]
    fn test_custom_endpoint_trims_slash() {
        let client = OrganizationsClient::with_endpoint(
            credentials(),
            "us-east-1",
            Some("http://localhost:4566/".to_string()),
        )
        .unwrap();
        assert_eq!(client.endpoint().url, "http://localhost:4566");
        assert_eq!(client.endpoint().signing_region, "us-east-1");
    }

    #[test]
    fn test_sanitize_error_code() {
        assert_eq!(
            sanitize_error_code("com.amazonaws.organizations#AWSOrganizationsNotInUseException"),
            "AWSOrganizationsNotInUseException"
        );
        assert_eq!(
            sanitize_error_code("AccessDeniedException:http://internal.amazon.com/"),
            "AccessDeniedException"
        );
        assert_eq!(sanitize_error_code("ServiceException"), "ServiceException");
    }

    #[test]
    fn test_parse_error_from_body() {
        let err = parse_error(
            400,
            None,
            r#"{"__type":"AWSOrganizationsNotInUseException","Message":"Your account is not a member of an organization."}"#,
        );
        assert!(err.is_not_in_use());
        assert!(err.to_string().contains("not a member"));
    }

    #[test]
    fn test_parse_error_lowercase_message() {
        let err = parse_error(
            400,
            None,
            r#"{"__type":"AlreadyInOrganizationException","message":"already a member"}"#,
        );
        match err {
            ApiError::Service { code, message, status } => {
                assert_eq!(code, "AlreadyInOrganizationException");
                assert_eq!(message, "already a member");
                assert_eq!(status, 400);
            }
            other => panic!("Expected ApiError::Service, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_error_from_header() {
        let err = parse_error(403, Some("AccessDeniedException"), "");
        assert_eq!(err.code(), Some("AccessDeniedException"));
    }

    #[test]
    fn test_parse_error_throttling() {
        let err = parse_error(
            400,
            None,
            r#"{"__type":"TooManyRequestsException","Message":"Rate exceeded"}"#,
        );
        assert!(matches!(err, ApiError::Throttled(ref m) if m == "Rate exceeded"));
    }

    #[test]
    fn test_parse_error_without_code() {
        let err = parse_error(502, None, "Bad Gateway");
        match err {
            ApiError::InvalidResponse(msg) => {
                assert!(msg.contains("502"));
                assert!(msg.contains("Bad Gateway"));
            }
            other => panic!("Expected ApiError::InvalidResponse, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_describe_organization() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .match_header(
                "x-amz-target",
                "AWSOrganizationsV20161128.DescribeOrganization",
            )
            .match_header("content-type", CONTENT_TYPE)
            .match_header(
                "authorization",
                Matcher::Regex(r"^AWS4-HMAC-SHA256 Credential=AKIDTEST/\d{8}/us-east-1/organizations/aws4_request".to_string()),
            )
            .match_header("x-amz-date", Matcher::Any)
            .match_body(Matcher::Exact("{}".to_string()))
            .with_status(200)
            .with_header("content-type", CONTENT_TYPE)
            .with_body(DESCRIBE_BODY)
            .create_async()
            .await;

        let org = client_for(&server).describe_organization().await.unwrap();

        assert_eq!(org.id, "o-a1b2c3d4e5");
        assert_eq!(org.master_account_id.as_deref(), Some("111111111111"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_create_organization_sends_feature_set() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .match_header(
                "x-amz-target",
                "AWSOrganizationsV20161128.CreateOrganization",
            )
            .match_body(Matcher::JsonString(
                r#"{"FeatureSet":"CONSOLIDATED_BILLING"}"#.to_string(),
            ))
            .with_status(200)
            .with_body(DESCRIBE_BODY)
            .create_async()
            .await;

        let org = client_for(&server)
            .create_organization(FeatureSet::ConsolidatedBilling)
            .await
            .unwrap();

        assert_eq!(org.id, "o-a1b2c3d4e5");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_delete_organization_empty_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .match_header(
                "x-amz-target",
                "AWSOrganizationsV20161128.DeleteOrganization",
            )
            .with_status(200)
            .with_body("")
            .create_async()
            .await;

        client_for(&server).delete_organization().await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_describe_not_in_use() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/")
            .with_status(400)
            .with_header("x-amzn-errortype", "AWSOrganizationsNotInUseException")
            .with_body(
                r#"{"__type":"AWSOrganizationsNotInUseException","Message":"Your account is not a member of an organization."}"#,
            )
            .create_async()
            .await;

        let err = client_for(&server).describe_organization().await.unwrap_err();
        assert!(err.is_not_in_use());
    }

    #[tokio::test]
    async fn test_malformed_success_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let err = client_for(&server).describe_organization().await.unwrap_err();
        match err {
            ApiError::InvalidResponse(msg) => assert!(msg.contains("DescribeOrganization")),
            other => panic!("Expected ApiError::InvalidResponse, got {:?}", other),
        }
    }

    #[test]
    fn test_signature_covers_endpoint_path_prefix() {
        let client = OrganizationsClient::with_endpoint(
            credentials(),
            "us-east-1",
            Some("http://proxy.local:8080/orgs".to_string()),
        )
        .unwrap();
        let time = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let body = b"{}".to_vec();

        let prepared = client.prepare("DescribeOrganization", &body, time).unwrap();
        assert_eq!(prepared.url.path(), "/orgs/");

        let target = "AWSOrganizationsV20161128.DescribeOrganization";
        let sign_for = |path: &str| {
            sigv4::sign(
                &SignableRequest {
                    method: "POST",
                    path,
                    query: "",
                    headers: vec![
                        ("content-type".to_string(), CONTENT_TYPE.to_string()),
                        ("host".to_string(), "proxy.local:8080".to_string()),
                        ("x-amz-target".to_string(), target.to_string()),
                    ],
                    payload: &body,
                },
                &SigningParams {
                    credentials: &credentials(),
                    region: "us-east-1",
                    service: SERVICE,
                    time,
                },
            )
        };

        assert_eq!(prepared.signed, sign_for("/orgs/"));
        assert_ne!(prepared.signed.authorization, sign_for("/").authorization);
    }

    #[tokio::test]
    async fn test_endpoint_path_prefix_is_sent() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/orgs/")
            .match_header(
                "x-amz-target",
                "AWSOrganizationsV20161128.DescribeOrganization",
            )
            .with_status(200)
            .with_header("content-type", CONTENT_TYPE)
            .with_body(DESCRIBE_BODY)
            .create_async()
            .await;

        let client = OrganizationsClient::with_endpoint(
            credentials(),
            "us-east-1",
            Some(format!("{}/orgs", server.url())),
        )
        .unwrap();
        let org = client.describe_organization().await.unwrap();

        assert_eq!(org.id, "o-a1b2c3d4e5");
        mock.assert_async().await;
    }
}
