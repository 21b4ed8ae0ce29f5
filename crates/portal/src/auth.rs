use argon2::{Argon2, PasswordHash, PasswordVerifier};

/// Verify the admin credential against the configured Argon2 PHC hash.
///
/// This is the whole gate: there is no session state, every admin request
/// re-presents the credential. A malformed stored hash denies everything
/// (and is logged, since that is an operator mistake).
pub fn check_credential(stored_phc: &str, candidate: &str) -> bool {
    let parsed = match PasswordHash::new(stored_phc) {
        Ok(parsed) => parsed,
        Err(err) => {
            tracing::error!(%err, "ADMIN_PASSWORD_HASH is not a valid PHC string");
            return false;
        }
    };
    Argon2::default()
        .verify_password(candidate.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
pub(crate) fn hash_for_tests(password: &str) -> String {
    use argon2::password_hash::{rand_core::OsRng, PasswordHasher, SaltString};

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .unwrap()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_the_right_password_and_nothing_else() {
        let hash = hash_for_tests("letmein");
        assert!(check_credential(&hash, "letmein"));
        assert!(!check_credential(&hash, "letmein "));
        assert!(!check_credential(&hash, ""));
    }

    #[test]
    fn malformed_stored_hash_denies() {
        assert!(!check_credential("not-a-phc-string", "anything"));
    }
}
