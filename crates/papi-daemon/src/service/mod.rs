//! Resource services
//!
//! One service per API resource, each holding a shared handle to the models
//! store. Handlers stay thin; identifier resolution, pseudo-version
//! handling, and the deletion rules live here.

pub mod guard;
pub mod integrity;
pub mod policy;
pub mod policy_type;

pub use guard::GuardPolicyService;
pub use policy::PolicyService;
pub use policy_type::PolicyTypeService;

use crate::error::{ApiError, ApiResult};

/// Validate that some text represents a number, failing with the supplied
/// message as a bad request otherwise
pub(crate) fn valid_number(text: &str, error_message: &str) -> ApiResult<()> {
    text.parse::<i32>()
        .map(|_| ())
        .map_err(|_| ApiError::BadRequest(error_message.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_number_accepts_signed_integers() {
        assert!(valid_number("3", "bad").is_ok());
        assert!(valid_number("-7", "bad").is_ok());
    }

    #[test]
    fn valid_number_reports_the_caller_message() {
        let err = valid_number("1.0.0", "legacy policy version is not an integer").unwrap_err();
        assert_eq!(
            err.to_string(),
            "legacy policy version is not an integer"
        );
    }
}
