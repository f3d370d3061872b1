//! Mapping helpers from gateway errors into attributed domain errors.
//!
//! Raw transport detail is logged here and replaced by a summary so callers
//! never see reqwest internals or response bodies.

use tracing::debug;

use crate::domain::ports::EmployeeGatewayError;
use crate::domain::{DomainError, EmployeeId, RosterOperation};

pub(super) fn map_gateway_error(
    error: &EmployeeGatewayError,
    operation: RosterOperation,
    employee_id: Option<EmployeeId>,
) -> DomainError {
    debug!(%operation, ?employee_id, error = %error, "employee gateway call failed");
    let mapped = match error {
        EmployeeGatewayError::Network { .. } => {
            DomainError::network("employee service is unreachable")
        }
        EmployeeGatewayError::Service { status, .. } => {
            DomainError::service(format!("employee service returned status {status}"))
        }
        EmployeeGatewayError::NotFound { employee_id } => DomainError::not_found(format!(
            "employee {employee_id} no longer exists on the server"
        )),
        EmployeeGatewayError::Decode { .. } => {
            DomainError::malformed_response("employee service returned an unreadable response")
        }
    };
    mapped.for_operation(operation, employee_id)
}

#[cfg(test)]
mod tests {
    //! Regression coverage for gateway error mapping.

    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case::network(EmployeeGatewayError::network("dns error: no such host"), ErrorCode::Network)]
    #[case::service(EmployeeGatewayError::service(503_u16, "<html>asleep</html>"), ErrorCode::Service)]
    #[case::decode(EmployeeGatewayError::decode("expected array"), ErrorCode::MalformedResponse)]
    #[case::not_found(EmployeeGatewayError::not_found(EmployeeId::new(3)), ErrorCode::NotFound)]
    fn maps_gateway_errors_to_domain_codes(
        #[case] error: EmployeeGatewayError,
        #[case] expected: ErrorCode,
    ) {
        let mapped = map_gateway_error(&error, RosterOperation::Update, Some(EmployeeId::new(3)));
        assert_eq!(mapped.code(), expected);
        assert_eq!(mapped.operation(), Some(RosterOperation::Update));
    }

    #[test]
    fn undecodable_payloads_are_not_retryable() {
        let mapped = map_gateway_error(
            &EmployeeGatewayError::decode("employee 3: salary must not be negative"),
            RosterOperation::Load,
            None,
        );
        assert!(!mapped.is_retryable());
        assert_eq!(
            mapped.to_string(),
            "load roster failed: employee service returned an unreadable response"
        );
    }

    #[test]
    fn hides_transport_detail_from_message() {
        let mapped = map_gateway_error(
            &EmployeeGatewayError::service(500_u16, "stack trace at Foo.Bar()"),
            RosterOperation::Create,
            Some(EmployeeId::new(2)),
        );
        assert_eq!(
            mapped.to_string(),
            "create employee 2 failed: employee service returned status 500"
        );
    }
}
