//! Reqwest-backed employee service adapter.
//!
//! This adapter owns transport details only: endpoint construction, request
//! serialisation, timeout and HTTP error mapping, and JSON decoding into
//! domain employees.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode};

use super::dto::{EmployeeBodyDto, EmployeeDto};
use crate::config::ApiBaseUrl;
use crate::domain::ports::{EmployeeGateway, EmployeeGatewayError};
use crate::domain::{Employee, EmployeeId};

const EMPLOYEE_RESOURCE: &str = "Employee";
const CREATE_SEGMENT: &str = "add";

/// Employee gateway that talks JSON over HTTP to one service base URL.
pub struct EmployeeHttpGateway {
    client: Client,
    base: ApiBaseUrl,
}

impl EmployeeHttpGateway {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    /// ```rust,ignore
    /// let gateway = EmployeeHttpGateway::new(base, Duration::from_secs(30))?;
    /// ```
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base: ApiBaseUrl, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base })
    }

    /// Service base URL.
    #[must_use]
    pub const fn base_url(&self) -> &ApiBaseUrl {
        &self.base
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        self.client
            .request(method, self.base.endpoint(segments))
            .header(reqwest::header::ACCEPT, "application/json")
    }

    /// Send `request` and return the body of a success response.
    async fn execute(
        request: RequestBuilder,
        target: Option<EmployeeId>,
    ) -> Result<Vec<u8>, EmployeeGatewayError> {
        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref(), target));
        }
        Ok(body.to_vec())
    }
}

#[async_trait]
impl EmployeeGateway for EmployeeHttpGateway {
    async fn list_employees(&self) -> Result<Vec<Employee>, EmployeeGatewayError> {
        let body = Self::execute(self.request(Method::GET, &[EMPLOYEE_RESOURCE]), None).await?;
        parse_employees(&body)
    }

    async fn create_employee(
        &self,
        employee: &Employee,
    ) -> Result<Employee, EmployeeGatewayError> {
        let request = self
            .request(Method::POST, &[EMPLOYEE_RESOURCE, CREATE_SEGMENT])
            .json(&EmployeeBodyDto::from(employee));
        let body = Self::execute(request, None).await?;
        parse_employee(&body)
    }

    async fn update_employee(
        &self,
        employee_id: EmployeeId,
        employee: &Employee,
    ) -> Result<(), EmployeeGatewayError> {
        let id = employee_id.to_string();
        let request = self
            .request(Method::PUT, &[EMPLOYEE_RESOURCE, id.as_str()])
            .json(&EmployeeBodyDto::from(employee));
        Self::execute(request, Some(employee_id)).await?;
        Ok(())
    }

    async fn delete_employee(&self, employee_id: EmployeeId) -> Result<(), EmployeeGatewayError> {
        let id = employee_id.to_string();
        let request = self.request(Method::DELETE, &[EMPLOYEE_RESOURCE, id.as_str()]);
        Self::execute(request, Some(employee_id)).await?;
        Ok(())
    }
}

fn parse_employees(body: &[u8]) -> Result<Vec<Employee>, EmployeeGatewayError> {
    let decoded: Vec<EmployeeDto> = serde_json::from_slice(body).map_err(|error| {
        EmployeeGatewayError::decode(format!("invalid employee list payload: {error}"))
    })?;
    decoded
        .into_iter()
        .map(EmployeeDto::into_domain)
        .collect::<Result<Vec<_>, _>>()
        .map_err(EmployeeGatewayError::decode)
}

fn parse_employee(body: &[u8]) -> Result<Employee, EmployeeGatewayError> {
    let decoded: EmployeeDto = serde_json::from_slice(body).map_err(|error| {
        EmployeeGatewayError::decode(format!("invalid employee payload: {error}"))
    })?;
    decoded.into_domain().map_err(EmployeeGatewayError::decode)
}

fn map_transport_error(error: reqwest::Error) -> EmployeeGatewayError {
    if error.is_timeout() {
        EmployeeGatewayError::network(format!("request timed out: {error}"))
    } else {
        EmployeeGatewayError::network(error.to_string())
    }
}

fn map_status_error(
    status: StatusCode,
    body: &[u8],
    target: Option<EmployeeId>,
) -> EmployeeGatewayError {
    if let (StatusCode::NOT_FOUND, Some(employee_id)) = (status, target) {
        return EmployeeGatewayError::not_found(employee_id);
    }

    let body_preview = body_preview(body);
    let message = if body_preview.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("no response body")
            .to_owned()
    } else {
        body_preview
    };
    EmployeeGatewayError::service(status.as_u16(), message)
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
#[expect(
    clippy::expect_used,
    reason = "test code uses expect for clear failure messages"
)]
mod tests {
    //! Regression coverage for non-network employee API helpers.

    use super::*;
    use crate::domain::DepartmentId;
    use rstest::rstest;

    #[rstest]
    #[case::update_missing(StatusCode::NOT_FOUND, Some(7), true)]
    #[case::list_route_missing(StatusCode::NOT_FOUND, None, false)]
    #[case::bad_request(StatusCode::BAD_REQUEST, Some(7), false)]
    #[case::server_error(StatusCode::INTERNAL_SERVER_ERROR, None, false)]
    #[case::waking(StatusCode::SERVICE_UNAVAILABLE, None, false)]
    fn maps_http_statuses_to_gateway_errors(
        #[case] status: StatusCode,
        #[case] target: Option<i64>,
        #[case] not_found: bool,
    ) {
        let error = map_status_error(status, b"{\"title\":\"nope\"}", target.map(EmployeeId::new));
        if not_found {
            assert_eq!(
                error,
                EmployeeGatewayError::not_found(EmployeeId::new(7)),
                "404 on a targeted call should map to NotFound",
            );
        } else {
            assert!(
                matches!(error, EmployeeGatewayError::Service { status: code, .. } if code == status.as_u16()),
                "other statuses should map to Service with the status code",
            );
        }
    }

    #[test]
    fn empty_error_body_falls_back_to_reason_phrase() {
        let error = map_status_error(StatusCode::BAD_GATEWAY, b"", None);
        assert_eq!(error, EmployeeGatewayError::service(502_u16, "Bad Gateway"));
    }

    #[test]
    fn previews_are_compacted_and_truncated() {
        let body = format!("<html>\n  {}\n</html>", "x".repeat(400));
        let preview = body_preview(body.as_bytes());
        assert!(preview.starts_with("<html> xxx"));
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), 163);
    }

    #[test]
    fn parses_employee_list_in_service_order() {
        let body = r#"[
            { "employeeId": 3, "name": "C", "age": 41, "salary": 72000.5,
              "departmentId": 20, "managerId": "1" },
            { "employeeId": 1, "name": "A", "age": 30, "salary": 50000,
              "departmentId": 10, "managerId": "" }
        ]"#;

        let employees = parse_employees(body.as_bytes()).expect("JSON should decode");
        assert_eq!(employees.len(), 2);
        let first = employees.first().expect("first employee");
        let second = employees.get(1).expect("second employee");
        assert_eq!(first.employee_id, EmployeeId::new(3));
        assert_eq!(first.manager_id, Some(EmployeeId::new(1)));
        assert_eq!(first.department_id, DepartmentId::new(20));
        assert_eq!(second.manager_id, None);
    }

    #[rstest]
    #[case::not_json("<html>waking up</html>")]
    #[case::not_a_list(r#"{ "employeeId": 1 }"#)]
    #[case::bad_salary(
        r#"[{ "employeeId": 1, "name": "A", "age": 30, "salary": -5, "departmentId": 10 }]"#
    )]
    fn rejects_undecodable_lists(#[case] body: &str) {
        let error = parse_employees(body.as_bytes()).expect_err("decode should fail");
        assert!(
            matches!(error, EmployeeGatewayError::Decode { .. }),
            "bad payloads should map to Decode errors",
        );
    }

    #[test]
    fn parses_created_employee() {
        let body = r#"{ "employeeId": 2, "name": "B", "age": 25, "salary": 40000,
                        "departmentId": 10, "managerId": null }"#;
        let employee = parse_employee(body.as_bytes()).expect("JSON should decode");
        assert_eq!(employee.employee_id, EmployeeId::new(2));
        assert_eq!(employee.name, "B");
    }
}
