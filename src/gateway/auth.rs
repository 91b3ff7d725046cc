//! Allow-list check.

use teletask_core::error::TeletaskError;

/// Check a sender against the allow-list.
///
/// An empty list lets everyone through. Pure: no store or session access.
pub(super) fn check_auth(allowed_users: &[i64], sender_id: &str) -> Result<(), TeletaskError> {
    if allowed_users.is_empty() {
        return Ok(());
    }
    match sender_id.parse::<i64>() {
        Ok(id) if allowed_users.contains(&id) => Ok(()),
        Ok(_) => Err(TeletaskError::Unauthorized(format!(
            "user {sender_id} not in allowed_users"
        ))),
        Err(_) => Err(TeletaskError::Unauthorized(format!(
            "sender id {sender_id:?} is not a user id"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_list_allows_everyone() {
        assert!(check_auth(&[], "1").is_ok());
        assert!(check_auth(&[], "not-a-number").is_ok());
    }

    #[test]
    fn test_listed_user_allowed() {
        assert!(check_auth(&[1, 2], "2").is_ok());
    }

    #[test]
    fn test_unlisted_user_denied() {
        let err = check_auth(&[1, 2], "3").unwrap_err();
        assert!(matches!(&err, TeletaskError::Unauthorized(r) if r.contains("not in allowed_users")));
        assert_eq!(err.to_string(), "unauthorized: user 3 not in allowed_users");
    }

    #[test]
    fn test_non_numeric_sender_denied() {
        assert!(matches!(
            check_auth(&[1], "abc"),
            Err(TeletaskError::Unauthorized(_))
        ));
    }
}
