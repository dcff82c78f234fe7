//! Resolver configuration.
//!
//! All previously process-global toggles (versioned pinning, overlay name
//! prefix) are explicit fields here, passed into the resolver at
//! construction. The configuration also doubles as the `global` section of
//! the template context, so placeholder paths such as
//! `.global.ingressGatewayName` resolve against it.

use serde::Serialize;

/// Configuration consumed by [`crate::OverlayResolver`].
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolverConfig {
    /// Namespace holding system-wide overlay documents, tried after the
    /// resource's own namespace.
    pub system_namespace: String,
    /// Name of the shared ingress gateway, exposed to templates.
    pub ingress_gateway_name: String,
    /// Namespace of the shared ingress gateway, exposed to templates.
    pub ingress_gateway_namespace: String,
    /// Prefix prepended to every well-known overlay suffix to form the
    /// concrete overlay name.
    pub overlay_prefix: String,
    /// Whether well-known overlay names are pinned per resource. When
    /// disabled, pin attachment is a no-op and pin resolution is the
    /// identity function.
    pub versioned_overlays: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            system_namespace: "llm-system".into(),
            ingress_gateway_name: "llm-ingress-gateway".into(),
            ingress_gateway_namespace: "llm-system".into(),
            overlay_prefix: "llmsvc-".into(),
            versioned_overlays: true,
        }
    }
}
