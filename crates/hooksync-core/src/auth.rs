//! Authentication scheme resolution.
//!
//! Schemes live in a flat dispatch table keyed by name; supporting a new
//! scheme means registering one more entry, not growing a trait hierarchy.
//! Resolvers are plain function pointers returning boxed futures so the
//! table itself stays a simple `HashMap`.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::LazyLock;

use hooksync_types::credentials::{AuthMaterial, CredentialSet};
use hooksync_types::error::SubscriptionError;

/// Credential field the `apiKey` scheme reads.
const SHARED_SECRET_FIELD: &str = "sharedSecret";

/// Resolves credential material for one authentication scheme.
///
/// Resolution is async because host credential lookups may suspend.
pub type SchemeResolver = for<'a> fn(
    &'a CredentialSet,
) -> Pin<Box<dyn Future<Output = Result<AuthMaterial, SubscriptionError>> + Send + 'a>>;

fn resolve_api_key<'a>(
    credentials: &'a CredentialSet,
) -> Pin<Box<dyn Future<Output = Result<AuthMaterial, SubscriptionError>> + Send + 'a>> {
    Box::pin(async move {
        let secret = credentials
            .field(SHARED_SECRET_FIELD)
            .cloned()
            .ok_or_else(|| {
                SubscriptionError::Configuration(format!(
                    "credential field `{SHARED_SECRET_FIELD}` is not set"
                ))
            })?;
        Ok(AuthMaterial::ApiKey(secret))
    })
}

/// Table of authentication schemes known to this process.
///
/// Built once at startup and treated as immutable afterwards; hosts that
/// need an extra scheme build their own registry with [`with_builtins`]
/// and [`register`] before handing it to the client.
///
/// [`with_builtins`]: AuthSchemeRegistry::with_builtins
/// [`register`]: AuthSchemeRegistry::register
#[derive(Clone)]
pub struct AuthSchemeRegistry {
    schemes: HashMap<&'static str, SchemeResolver>,
}

static BUILTIN: LazyLock<AuthSchemeRegistry> = LazyLock::new(AuthSchemeRegistry::with_builtins);

impl AuthSchemeRegistry {
    /// Registry containing every built-in scheme.
    ///
    /// Currently that is `apiKey`, which reads the `sharedSecret`
    /// credential field.
    pub fn with_builtins() -> Self {
        let mut registry = Self {
            schemes: HashMap::new(),
        };
        registry.register("apiKey", resolve_api_key);
        registry
    }

    /// Shared registry of built-in schemes.
    pub fn builtin() -> &'static AuthSchemeRegistry {
        &BUILTIN
    }

    /// Add a scheme. Registering a name twice replaces the earlier entry.
    pub fn register(&mut self, scheme: &'static str, resolver: SchemeResolver) {
        self.schemes.insert(scheme, resolver);
    }

    /// Look up the resolver for a scheme name.
    ///
    /// `None` means the scheme is unsupported; the lookup itself never
    /// fails.
    pub fn resolver_for(&self, scheme: &str) -> Option<SchemeResolver> {
        self.schemes.get(scheme).copied()
    }

    /// Resolve authentication material for a credential set using its
    /// declared scheme.
    pub async fn material_for(
        &self,
        credentials: &CredentialSet,
    ) -> Result<AuthMaterial, SubscriptionError> {
        let resolver = self.resolver_for(credentials.scheme()).ok_or_else(|| {
            SubscriptionError::Configuration(format!(
                "unsupported authentication scheme `{}`",
                credentials.scheme()
            ))
        })?;
        resolver(credentials).await
    }
}
