use std::future::{ready, Ready};

use actix_web::{dev::Payload, FromRequest, HttpRequest};
use uuid::Uuid;

use crate::errors::AppError;

/// Identity headers set by the API gateway after it authenticates the caller.
/// This service trusts them; it never sees credentials itself.
pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Customer,
    Owner,
}

#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub role: Role,
}

impl AuthenticatedUser {
    pub fn require_customer(&self) -> Result<(), AppError> {
        match self.role {
            Role::Customer => Ok(()),
            Role::Owner => Err(AppError::Forbidden),
        }
    }

    pub fn require_owner(&self) -> Result<(), AppError> {
        match self.role {
            Role::Owner => Ok(()),
            Role::Customer => Err(AppError::Forbidden),
        }
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(extract_user(req))
    }
}

fn extract_user(req: &HttpRequest) -> Result<AuthenticatedUser, AppError> {
    let id = header_value(req, USER_ID_HEADER).ok_or(AppError::Unauthorized)?;
    let id = Uuid::parse_str(id).map_err(|_| AppError::Unauthorized)?;
    let role = match header_value(req, USER_ROLE_HEADER) {
        // The gateway omits the role header for plain customers.
        None | Some("customer") => Role::Customer,
        Some("owner") => Role::Owner,
        Some(_) => return Err(AppError::Unauthorized),
    };
    Ok(AuthenticatedUser { id, role })
}

fn header_value<'r>(req: &'r HttpRequest, name: &str) -> Option<&'r str> {
    req.headers().get(name).and_then(|v| v.to_str().ok())
}

#[cfg(test)]
mod tests {
    use actix_web::test::TestRequest;

    use super::*;

    fn request(headers: &[(&str, &str)]) -> HttpRequest {
        let mut req = TestRequest::default();
        for (name, value) in headers {
            req = req.insert_header((name.to_string(), value.to_string()));
        }
        req.to_http_request()
    }

    #[test]
    fn missing_user_header_is_unauthorized() {
        let err = extract_user(&request(&[])).expect_err("no identity must fail");
        assert!(matches!(err, AppError::Unauthorized));
    }

    #[test]
    fn malformed_user_id_is_unauthorized() {
        let req = request(&[(USER_ID_HEADER, "not-a-uuid")]);
        let err = extract_user(&req).expect_err("bad uuid must fail");
        assert!(matches!(err, AppError::Unauthorized));
    }

    #[test]
    fn role_defaults_to_customer() {
        let id = Uuid::new_v4();
        let req = request(&[(USER_ID_HEADER, &id.to_string())]);
        let user = extract_user(&req).expect("valid identity");
        assert_eq!(user.id, id);
        assert_eq!(user.role, Role::Customer);
    }

    #[test]
    fn owner_role_is_recognised() {
        let id = Uuid::new_v4();
        let req = request(&[(USER_ID_HEADER, &id.to_string()), (USER_ROLE_HEADER, "owner")]);
        let user = extract_user(&req).expect("valid identity");
        assert_eq!(user.role, Role::Owner);
    }

    #[test]
    fn unknown_role_is_unauthorized() {
        let id = Uuid::new_v4();
        let req = request(&[(USER_ID_HEADER, &id.to_string()), (USER_ROLE_HEADER, "admin")]);
        let err = extract_user(&req).expect_err("unknown role must fail");
        assert!(matches!(err, AppError::Unauthorized));
    }

    #[test]
    fn role_gates_reject_the_other_role() {
        let customer = AuthenticatedUser {
            id: Uuid::new_v4(),
            role: Role::Customer,
        };
        let owner = AuthenticatedUser {
            id: Uuid::new_v4(),
            role: Role::Owner,
        };

        assert!(customer.require_customer().is_ok());
        assert!(matches!(
            customer.require_owner(),
            Err(AppError::Forbidden)
        ));
        assert!(owner.require_owner().is_ok());
        assert!(matches!(
            owner.require_customer(),
            Err(AppError::Forbidden)
        ));
    }
}
