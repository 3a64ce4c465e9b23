use secrecy::{ExposeSecret, Secret};

/// Bearer credential handed to the data source on every call.
///
/// The session that issues it lives outside this crate; the controller only
/// ever sees the value it was constructed with (or later given).
#[derive(Clone, Debug)]
pub struct Credential {
    token: Secret<String>,
}

impl Credential {
    pub fn new(token: Secret<String>) -> Self {
        Self { token }
    }

    pub fn bearer(token: impl Into<String>) -> Self {
        Self::new(Secret::new(token.into()))
    }

    /// A blank token is treated like no credential at all.
    pub fn is_blank(&self) -> bool {
        self.token.expose_secret().trim().is_empty()
    }

    pub fn expose(&self) -> &str {
        self.token.expose_secret()
    }
}

impl From<Secret<String>> for Credential {
    fn from(token: Secret<String>) -> Self {
        Self::new(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_redacts_token() {
        let credential = Credential::bearer("super-secret");
        assert!(!format!("{credential:?}").contains("super-secret"));
        assert_eq!(credential.expose(), "super-secret");
    }

    #[test]
    fn blank_token() {
        assert!(Credential::bearer("  ").is_blank());
        assert!(!Credential::bearer("t").is_blank());
    }
}
