use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;

const ITERATIONS: u32 = 100_000;
const SALT_LEN: usize = 16;
const HASH_LEN: usize = 32;

/// PBKDF2-HMAC-SHA256 with a fresh random salt per account.
/// Stored form: `pbkdf2-sha256$<iterations>$<salt hex>$<digest hex>`.
pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    hash_with_salt(password, &salt, ITERATIONS)
}

fn hash_with_salt(password: &str, salt: &[u8], iterations: u32) -> String {
    let mut digest = [0u8; HASH_LEN];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut digest);
    format!(
        "pbkdf2-sha256${}${}${}",
        iterations,
        hex::encode(salt),
        hex::encode(digest)
    )
}

pub fn verify_password(password: &str, stored: &str) -> bool {
    let mut parts = stored.split('$');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("pbkdf2-sha256"), Some(iterations), Some(salt)) => {
            let iterations = match iterations.parse::<u32>() {
                Ok(n) => n,
                Err(_) => return false,
            };
            let salt = match hex::decode(salt) {
                Ok(salt) => salt,
                Err(_) => return false,
            };
            hash_with_salt(password, &salt, iterations) == stored
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_accepts_the_original_password() {
        let stored = hash_password("matkhau123");
        assert!(verify_password("matkhau123", &stored));
    }

    #[test]
    fn verify_rejects_a_wrong_password() {
        let stored = hash_password("matkhau123");
        assert!(!verify_password("matkhau124", &stored));
    }

    #[test]
    fn salts_differ_between_hashes() {
        assert_ne!(hash_password("matkhau123"), hash_password("matkhau123"));
    }

    #[test]
    fn verify_rejects_malformed_stored_values() {
        assert!(!verify_password("x", ""));
        assert!(!verify_password("x", "md5$abcd"));
        assert!(!verify_password("x", "pbkdf2-sha256$notanumber$00$00"));
        assert!(!verify_password("x", "pbkdf2-sha256$1000$zz$00"));
    }
}
