use sha2::{Digest, Sha256};

/// Derives the stored password hash.
///
/// SHA-256 over the application salt, the length-prefixed username and the
/// password. The same inputs always produce the same hex digest, which keeps
/// sign-in an equality lookup on `(username, password_hash)`.
#[derive(Clone)]
pub struct PasswordHasher {
    salt: String,
}

impl PasswordHasher {
    pub fn new(salt: impl Into<String>) -> Self {
        Self { salt: salt.into() }
    }

    pub fn hash(&self, username: &str, password: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.salt.as_bytes());
        hasher.update((username.len() as u64).to_be_bytes());
        hasher.update(username.as_bytes());
        hasher.update(password.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}
