//! Request wrapper that records whether it has already been replayed.

use std::fmt;

/// A request plus its replay state and the credential it was last sent with.
///
/// A request is replayed after a credential refresh at most once:
/// [`AttemptedRequest::into_retry`] refuses to hand out a second replay.
#[derive(Clone, PartialEq, Eq)]
pub struct AttemptedRequest<R> {
    request: R,
    retried: bool,
    credential: Option<String>,
}

impl<R> AttemptedRequest<R> {
    /// Fresh, never-replayed request.
    pub fn new(request: R) -> Self {
        Self { request, retried: false, credential: None }
    }

    /// Record the credential this attempt carries.
    #[must_use]
    pub fn with_credential(mut self, credential: Option<String>) -> Self {
        self.credential = credential;
        self
    }

    #[must_use]
    pub fn is_retried(&self) -> bool {
        self.retried
    }

    /// Credential the last attempt was sent with, if any.
    #[must_use]
    pub fn credential(&self) -> Option<&str> {
        self.credential.as_deref()
    }

    #[must_use]
    pub fn request(&self) -> &R {
        &self.request
    }

    /// Mark the request as replayed. Returns `None` if it already was.
    #[must_use]
    pub fn into_retry(self) -> Option<Self> {
        if self.retried {
            None
        } else {
            Some(self.mark_retried())
        }
    }

    /// Mark the request as replayed unconditionally.
    #[must_use]
    pub fn mark_retried(mut self) -> Self {
        self.retried = true;
        self
    }

    pub fn into_inner(self) -> R {
        self.request
    }
}

impl<R: fmt::Debug> fmt::Debug for AttemptedRequest<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttemptedRequest")
            .field("request", &self.request)
            .field("retried", &self.retried)
            .field("credential", &self.credential.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retry_is_granted_once() {
        let attempt = AttemptedRequest::new("GET /users");
        assert!(!attempt.is_retried());

        let replay = attempt.into_retry().expect("first replay is allowed");
        assert!(replay.is_retried());
        assert!(replay.into_retry().is_none());
    }

    #[test]
    fn credential_is_carried_but_not_printed() {
        let attempt = AttemptedRequest::new(1).with_credential(Some("secret".into()));

        assert_eq!(attempt.credential(), Some("secret"));
        assert!(!format!("{attempt:?}").contains("secret"));
    }
}
