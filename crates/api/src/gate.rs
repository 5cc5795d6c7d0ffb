//! Route access decisions.
//!
//! [`check`] is evaluated on every request by the binaries' auth extractors
//! and is never cached.

use coloring_bliss_core::UserRole;

/// What a route needs from the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Anyone.
    Public,
    /// Any signed-in account.
    Session,
    /// A signed-in account with the admin role.
    Admin,
}

/// Result of a gate check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Granted,
    /// Not signed in; come back to `redirect` after login.
    RedirectToLogin { redirect: String },
    /// Signed in without the required role.
    RedirectHome,
}

/// Decide whether a session with `role` (`None` when signed out) may view
/// `path`.
#[must_use]
pub fn check(role: Option<UserRole>, requirement: Requirement, path: &str) -> Access {
    match (requirement, role) {
        (Requirement::Public, _)
        | (Requirement::Session, Some(_))
        | (Requirement::Admin, Some(UserRole::Admin)) => Access::Granted,
        (Requirement::Session | Requirement::Admin, None) => Access::RedirectToLogin {
            redirect: path.to_string(),
        },
        (Requirement::Admin, Some(UserRole::User)) => Access::RedirectHome,
    }
}

/// `/login` URL that returns to `redirect` afterwards.
#[must_use]
pub fn login_url(redirect: &str) -> String {
    let redirect = safe_redirect(Some(redirect));
    if redirect == "/" {
        return "/login".to_string();
    }
    let encoded: String = url::form_urlencoded::byte_serialize(redirect.as_bytes()).collect();
    format!("/login?redirect={encoded}")
}

/// Local path to send the browser to after login. Anything that is not a
/// same-site absolute path falls back to `/`.
#[must_use]
pub fn safe_redirect(redirect: Option<&str>) -> &str {
    match redirect {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => {
            path
        }
        _ => "/",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_always_granted() {
        assert_eq!(check(None, Requirement::Public, "/shop"), Access::Granted);
        assert_eq!(
            check(Some(UserRole::User), Requirement::Public, "/shop"),
            Access::Granted
        );
    }

    #[test]
    fn test_session_required() {
        assert_eq!(
            check(None, Requirement::Session, "/account/orders"),
            Access::RedirectToLogin {
                redirect: "/account/orders".to_string()
            }
        );
        assert_eq!(
            check(Some(UserRole::User), Requirement::Session, "/account"),
            Access::Granted
        );
    }

    #[test]
    fn test_admin_required() {
        assert_eq!(
            check(None, Requirement::Admin, "/orders"),
            Access::RedirectToLogin {
                redirect: "/orders".to_string()
            }
        );
        assert_eq!(
            check(Some(UserRole::User), Requirement::Admin, "/orders"),
            Access::RedirectHome
        );
        assert_eq!(
            check(Some(UserRole::Admin), Requirement::Admin, "/orders"),
            Access::Granted
        );
    }

    #[test]
    fn test_login_url_encodes_redirect() {
        assert_eq!(login_url("/checkout"), "/login?redirect=%2Fcheckout");
        assert_eq!(
            login_url("/account/orders?status=shipped"),
            "/login?redirect=%2Faccount%2Forders%3Fstatus%3Dshipped"
        );
        assert_eq!(login_url("/"), "/login");
    }

    #[test]
    fn test_safe_redirect_rejects_offsite() {
        assert_eq!(safe_redirect(Some("/cart")), "/cart");
        assert_eq!(safe_redirect(Some("//evil.example")), "/");
        assert_eq!(safe_redirect(Some("https://evil.example")), "/");
        assert_eq!(safe_redirect(Some("/\\evil.example")), "/");
        assert_eq!(safe_redirect(None), "/");
    }
}
