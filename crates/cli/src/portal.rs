//! Analytics portal deep-link builder
//!
//! Pure string transform: gzip-compresses the query text, base64- and
//! URL-encodes it, and embeds it in a portal URL that opens the
//! analytics blade with the query pre-populated.

use std::io::Write;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use flate2::write::GzEncoder;
use flate2::Compression;

use contracts::{ContractError, PortalConfig};

// URL constants
const PORTAL_DOMAIN: &str = "ms.portal.azure.com";
const BLADE_IDENTIFIER: &str =
    "/blade/Microsoft_OperationsManagementSuite_Workspace/AnalyticsBlade";
const INITIATOR: &str = "/initiator/AnalyticsShareLinkToQuery";
const OPTIONS: &str = "/isQueryEditorVisible/true";

/// Builds portal URLs that pre-populate an analytics query
pub struct PortalUrlBuilder {
    portal: PortalConfig,
}

impl PortalUrlBuilder {
    pub fn new(portal: PortalConfig) -> Self {
        Self { portal }
    }

    /// Build a URL that opens the analytics blade with the query
    /// editor visible and the given query pre-populated
    pub fn build_navigation_url(&self, query: &str) -> Result<String, ContractError> {
        Ok(format!(
            "https://{PORTAL_DOMAIN}#@{tenant}{BLADE_IDENTIFIER}{INITIATOR}{OPTIONS}{scope}{query}",
            tenant = self.portal.tenant_id,
            scope = self.scope(),
            query = self.query_segment(query)?,
        ))
    }

    // Encode the query
    fn query_segment(&self, query: &str) -> Result<String, ContractError> {
        let encoded = compress_and_encode(query)?;
        Ok(format!(
            "/query/{}/isQueryBase64Compressed/true",
            urlencoding::encode(&encoded)
        ))
    }

    // Resource scope definition
    fn scope(&self) -> String {
        let scope_json = format!(
            "{{\"resources\":[{{\"resourceId\":\"{}\"}}]}}",
            self.resource_id()
        );
        format!("/scope/{}", urlencoding::encode(&scope_json))
    }

    // Resource ID embedded in the scope
    fn resource_id(&self) -> String {
        format!(
            "/subscriptions/{}/resourcegroups/{}/providers/microsoft.insights/components/{}",
            self.portal.subscription_id, self.portal.resource_group, self.portal.component_name
        )
    }
}

/// Gzip compress and then base64 encode text
fn compress_and_encode(text: &str) -> Result<String, ContractError> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(text.as_bytes())?;
    let compressed = encoder
        .finish()
        .map_err(|e| ContractError::serialization(format!("gzip error: {e}")))?;
    Ok(BASE64.encode(compressed))
}
