//! Claim-based caller identity.
//!
//! Every [`RequestInfo`](crate::RequestInfo) carries a [`ClaimIdentity`]. Host
//! adapters or authentication layers replace the anonymous default before the
//! request reaches the dispatcher; controllers receive it as a neutral
//! argument.

use serde::{Deserialize, Serialize};

/// Well-known claim types.
pub mod claim_types {
    /// Display name of the caller.
    pub const NAME: &str = "name";
    /// Role membership.
    pub const ROLE: &str = "role";
    /// Stable subject identifier.
    pub const SUBJECT: &str = "sub";
    /// E-mail address.
    pub const EMAIL: &str = "email";
}

/// A single `(type, value)` assertion about the caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Claim {
    /// Claim type, e.g. [`claim_types::ROLE`].
    pub claim_type: String,
    /// Claim value.
    pub value: String,
}

impl Claim {
    /// Creates a new claim.
    #[must_use]
    pub fn new(claim_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            claim_type: claim_type.into(),
            value: value.into(),
        }
    }
}

/// The identity of a caller, expressed as a set of claims.
///
/// # Example
///
/// ```
/// use hydrant_core::{ClaimIdentity, claim_types};
///
/// let identity = ClaimIdentity::authenticated("alice", "Bearer")
///     .with_claim(claim_types::ROLE, "admin");
///
/// assert!(identity.is_authenticated());
/// assert!(identity.is_in_role("admin"));
/// assert_eq!(identity.log_id(), "user:alice");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimIdentity {
    authentication_type: Option<String>,
    claims: Vec<Claim>,
}

impl ClaimIdentity {
    /// Returns the anonymous identity.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Creates an authenticated identity with a name claim.
    #[must_use]
    pub fn authenticated(name: impl Into<String>, authentication_type: impl Into<String>) -> Self {
        Self {
            authentication_type: Some(authentication_type.into()),
            claims: vec![Claim::new(claim_types::NAME, name)],
        }
    }

    /// Adds a claim.
    #[must_use]
    pub fn with_claim(mut self, claim_type: impl Into<String>, value: impl Into<String>) -> Self {
        self.claims.push(Claim::new(claim_type, value));
        self
    }

    /// Returns `true` unless this is the anonymous identity.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.authentication_type.is_some()
    }

    /// Returns the authentication scheme that produced this identity.
    #[must_use]
    pub fn authentication_type(&self) -> Option<&str> {
        self.authentication_type.as_deref()
    }

    /// Returns the caller name, if a name claim is present.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.find_first(claim_types::NAME)
    }

    /// Returns all claims.
    #[must_use]
    pub fn claims(&self) -> &[Claim] {
        &self.claims
    }

    /// Returns the value of the first claim of the given type.
    #[must_use]
    pub fn find_first(&self, claim_type: &str) -> Option<&str> {
        self.claims
            .iter()
            .find(|c| c.claim_type == claim_type)
            .map(|c| c.value.as_str())
    }

    /// Returns `true` if a claim with this exact type and value exists.
    #[must_use]
    pub fn has_claim(&self, claim_type: &str, value: &str) -> bool {
        self.claims
            .iter()
            .any(|c| c.claim_type == claim_type && c.value == value)
    }

    /// Returns `true` if the caller holds the given role.
    #[must_use]
    pub fn is_in_role(&self, role: &str) -> bool {
        self.has_claim(claim_types::ROLE, role)
    }

    /// Returns a string identifier suitable for logging.
    #[must_use]
    pub fn log_id(&self) -> String {
        match (self.is_authenticated(), self.name()) {
            (true, Some(name)) => format!("user:{name}"),
            (true, None) => "user:unknown".to_string(),
            (false, _) => "anonymous".to_string(),
        }
    }
}
