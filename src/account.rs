//! Current-identity seam.
//!
//! Session/token management lives outside this crate; the pipeline only
//! needs the opaque authorization token that accompanies each upload.

pub trait IdentityProvider: Send + Sync {
    /// Opaque API token attached to every upload request.
    fn token(&self) -> String;
}

/// Fixed-token identity, for tests and single-account wiring.
#[derive(Debug, Clone)]
pub struct StaticIdentity {
    token: String,
}

impl StaticIdentity {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl IdentityProvider for StaticIdentity {
    fn token(&self) -> String {
        self.token.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_identity() {
        let identity = StaticIdentity::new("secret-token");
        assert_eq!(identity.token(), "secret-token");
    }
}
