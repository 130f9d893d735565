use crate::claim_types;
use crate::claims::Claim;
use crate::principal::{ClaimsPrincipal, PrincipalError};

/// `ClaimsIdentity` is the claims-bearing identity of a request.
///
/// Built by the hosting layer after authentication and handed explicitly to
/// the diagnostics. An identity without an authentication type is anonymous.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct ClaimsIdentity {
    /// Authentication scheme (e.g. "Negotiate", "Federation"). `None` means anonymous.
    authentication_type: Option<String>,
    /// Claims in the order the identity provider issued them.
    #[serde(default)]
    claims: Vec<Claim>,
    /// Claim type that carries the display name.
    #[serde(default = "default_name_claim_type")]
    name_claim_type: String,
}

fn default_name_claim_type() -> String {
    claim_types::NAME.to_owned()
}

impl ClaimsIdentity {
    /// Create a new `ClaimsIdentity` builder
    #[must_use]
    pub fn builder() -> ClaimsIdentityBuilder {
        ClaimsIdentityBuilder::default()
    }

    /// Create an anonymous identity with no authentication type and no claims
    #[must_use]
    pub fn anonymous() -> Self {
        ClaimsIdentityBuilder::default().build()
    }

    #[must_use]
    pub fn authentication_type(&self) -> Option<&str> {
        self.authentication_type.as_deref()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.authentication_type
            .as_deref()
            .is_some_and(|t| !t.is_empty())
    }

    #[must_use]
    pub fn claims(&self) -> &[Claim] {
        &self.claims
    }

    /// Value of the first claim whose type matches the configured name claim type.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.find_first(&self.name_claim_type)
    }

    #[must_use]
    pub fn find_first(&self, claim_type: &str) -> Option<&str> {
        self.claims
            .iter()
            .find(|c| c.claim_type == claim_type)
            .map(|c| c.value.as_str())
    }
}

impl ClaimsPrincipal for ClaimsIdentity {
    fn is_authenticated(&self) -> bool {
        ClaimsIdentity::is_authenticated(self)
    }

    fn authentication_type(&self) -> Option<&str> {
        ClaimsIdentity::authentication_type(self)
    }

    fn claims(&self) -> Result<Vec<Claim>, PrincipalError> {
        Ok(self.claims.clone())
    }
}

#[derive(Default)]
pub struct ClaimsIdentityBuilder {
    authentication_type: Option<String>,
    claims: Vec<Claim>,
    name_claim_type: Option<String>,
}

impl ClaimsIdentityBuilder {
    #[must_use]
    pub fn authentication_type(mut self, authentication_type: &str) -> Self {
        self.authentication_type = Some(authentication_type.to_owned());
        self
    }

    #[must_use]
    pub fn claim(mut self, claim_type: &str, value: &str) -> Self {
        self.claims.push(Claim::new(claim_type, value));
        self
    }

    #[must_use]
    pub fn claims(mut self, claims: Vec<Claim>) -> Self {
        self.claims.extend(claims);
        self
    }

    #[must_use]
    pub fn name_claim_type(mut self, claim_type: &str) -> Self {
        self.name_claim_type = Some(claim_type.to_owned());
        self
    }

    #[must_use]
    pub fn build(self) -> ClaimsIdentity {
        ClaimsIdentity {
            authentication_type: self.authentication_type,
            claims: self.claims,
            name_claim_type: self.name_claim_type.unwrap_or_else(default_name_claim_type),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_claims_identity_builder_full() {
        let identity = ClaimsIdentity::builder()
            .authentication_type("Federation")
            .claim(claim_types::NAME, "alice")
            .claim(claim_types::ROLE, "admin")
            .build();

        assert!(identity.is_authenticated());
        assert_eq!(identity.authentication_type(), Some("Federation"));
        assert_eq!(identity.claims().len(), 2);
        assert_eq!(identity.name(), Some("alice"));
        assert_eq!(identity.find_first(claim_types::ROLE), Some("admin"));
    }

    #[test]
    fn test_claims_identity_anonymous() {
        let identity = ClaimsIdentity::anonymous();

        assert!(!identity.is_authenticated());
        assert!(identity.authentication_type().is_none());
        assert!(identity.claims().is_empty());
        assert!(identity.name().is_none());
    }

    #[test]
    fn test_empty_authentication_type_is_not_authenticated() {
        let identity = ClaimsIdentity::builder().authentication_type("").build();

        assert!(!identity.is_authenticated());
    }

    #[test]
    fn test_custom_name_claim_type() {
        let identity = ClaimsIdentity::builder()
            .authentication_type("Negotiate")
            .name_claim_type(claim_types::UPN)
            .claim(claim_types::NAME, "alice")
            .claim(claim_types::UPN, "alice@contoso.com")
            .build();

        assert_eq!(identity.name(), Some("alice@contoso.com"));
    }

    #[test]
    fn test_name_returns_first_of_duplicates() {
        let identity = ClaimsIdentity::builder()
            .authentication_type("Negotiate")
            .claim(claim_types::NAME, "first")
            .claim(claim_types::NAME, "second")
            .build();

        assert_eq!(identity.name(), Some("first"));
    }

    #[test]
    fn test_principal_claims_preserve_source_order_and_duplicates() {
        let identity = ClaimsIdentity::builder()
            .authentication_type("Negotiate")
            .claim("A", "1")
            .claim("A", "2")
            .claim("B", "x")
            .build();
        let principal: &dyn ClaimsPrincipal = &identity;

        let claims = principal.claims().unwrap();
        assert_eq!(
            claims,
            vec![Claim::new("A", "1"), Claim::new("A", "2"), Claim::new("B", "x")]
        );
    }

    #[test]
    fn test_claims_identity_serialize_deserialize() {
        let original = ClaimsIdentity::builder()
            .authentication_type("Federation")
            .claim(claim_types::NAME, "alice")
            .build();

        let serialized = serde_json::to_string(&original).unwrap();
        let deserialized: ClaimsIdentity = serde_json::from_str(&serialized).unwrap();

        assert_eq!(deserialized.authentication_type(), Some("Federation"));
        assert_eq!(deserialized.claims(), original.claims());
        assert_eq!(deserialized.name(), Some("alice"));
    }

    #[test]
    fn test_deserialize_defaults_name_claim_type() {
        let identity: ClaimsIdentity =
            serde_json::from_str(r#"{"authentication_type":"Negotiate"}"#).unwrap();

        assert!(identity.is_authenticated());
        assert!(identity.claims().is_empty());
        assert!(identity.name().is_none());
    }
}
