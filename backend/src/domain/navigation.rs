//! Navigation targets attached to errors and responses as `redirect` hints.

use super::Error;

/// Login page.
pub const LOGIN_PATH: &str = "/login";
/// Course catalog page.
pub const CATALOG_PATH: &str = "/courses";
/// Enrollment form page.
pub const ENROLL_PATH: &str = "/enroll";
/// Enrollment confirmation page.
pub const WELCOME_PATH: &str = "/welcome";

/// Detail key carrying the navigation target.
pub const REDIRECT_DETAIL: &str = "redirect";

/// `Unauthorized` error sending the caller to the login page.
pub fn login_required() -> Error {
    Error::unauthorized("Please login first").with_detail(REDIRECT_DETAIL, LOGIN_PATH)
}

/// `NotFound` error sending the caller back to the catalog.
pub fn back_to_catalog(message: impl Into<String>) -> Error {
    Error::not_found(message).with_detail(REDIRECT_DETAIL, CATALOG_PATH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;

    #[test]
    fn login_required_redirects_to_login() {
        let error = login_required();
        assert_eq!(error.code(), ErrorCode::Unauthorized);
        assert_eq!(error.detail_str(REDIRECT_DETAIL), Some(LOGIN_PATH));
    }

    #[test]
    fn back_to_catalog_redirects_to_courses() {
        let error = back_to_catalog("Enrollment information not found");
        assert_eq!(error.code(), ErrorCode::NotFound);
        assert_eq!(error.detail_str(REDIRECT_DETAIL), Some(CATALOG_PATH));
    }
}
