//! Graph traversal operations over component resources.
//!
//! Each operation is a thin composition of resolver calls with a specific
//! edge-case policy. The two fan-out points spawn their sub-requests
//! concurrently and zip results back by input index, so output order always
//! matches input order regardless of completion order.

use crate::client::HubClient;
use crate::resolver::PAGE_SIZE_PARAM;
use crate::transport::RequestOptions;
use hublens_core::{relations, Page, Resource};
use serde_json::Value;
use tracing::{debug, instrument, warn};

/// Fixed component search endpoint. Search has no originating resource to
/// hold a link, so it is the one operation that bypasses the resolver.
pub const COMPONENT_SEARCH_PATH: &str = "/api/components";

/// External NVD search URL template for vulnerability details.
const NVD_SEARCH_URL: &str = "https://web.nvd.nist.gov/view/vuln/search-results";

impl HubClient {
    /// Searches the Hub's component catalog by forge coordinate.
    ///
    /// The search takes one composite parameter `q` of the form
    /// `{forge}:{external_id}`. Soft-fails to an empty list.
    #[instrument(skip(self))]
    pub async fn find_external_components(
        &self,
        forge: &str,
        hub_external_id: &str,
    ) -> Vec<Resource> {
        let options = RequestOptions::new()
            .query("q", &format!("{forge}:{hub_external_id}"))
            .query(PAGE_SIZE_PARAM, &self.config().page_size.to_string());
        match self.transport().get(COMPONENT_SEARCH_PATH, options).await {
            Ok(value) => Page::from_value(&value).items,
            Err(error) => {
                debug!(error = %error, "component search failed");
                Vec::new()
            }
        }
    }

    /// Resolves the projects whose BOMs reference a component version.
    ///
    /// Fetches the `references` relation list, then fetches every
    /// reference's `projectVersionUrl` concurrently. Each fetched project
    /// version is decorated with the reference's `projectName`; a reference
    /// whose fetch fails contributes `None` in its input position. Callers
    /// filter; the partial-failure shape is deliberate.
    #[instrument(skip_all)]
    pub async fn component_version_reference_projects(
        &self,
        component_version: &Resource,
    ) -> Vec<Option<Resource>> {
        let references = self
            .get_list_relation(component_version, relations::REFERENCES)
            .await;

        let mut handles = Vec::with_capacity(references.len());
        for (idx, reference) in references.iter().enumerate() {
            let client = self.clone();
            let project_version_url = reference.str_field("projectVersionUrl").map(String::from);
            let project_name = reference.str_field("projectName").map(String::from);
            let handle = tokio::spawn(async move {
                let url = project_version_url?;
                match client.transport().get(&url, RequestOptions::new()).await {
                    Ok(value) => {
                        let mut project_version = Resource::new(value);
                        if let Some(name) = project_name {
                            project_version.set_field("projectName", Value::String(name));
                        }
                        Some(project_version)
                    }
                    Err(error) => {
                        debug!(error = %error, "reference project fetch failed");
                        None
                    }
                }
            });
            handles.push((idx, handle));
        }

        let mut results: Vec<Option<Resource>> = vec![None; references.len()];
        for (idx, handle) in handles {
            match handle.await {
                Ok(result) => results[idx] = result,
                Err(e) => warn!("reference fetch task panicked: {e}"),
            }
        }
        results
    }

    /// Matches an external component across project-version BOMs.
    ///
    /// For each project version (concurrently), fetches its `components`
    /// relation list and keeps the entries whose `componentVersion` equals
    /// the external component's `version` by exact string equality, with no
    /// normalization. The flattened result preserves the input
    /// project-version order.
    #[instrument(skip_all)]
    pub async fn matching_bom_components(
        &self,
        external_component: &Resource,
        project_versions: &[Resource],
    ) -> Vec<Resource> {
        let Some(target) = external_component.str_field("version").map(String::from) else {
            return Vec::new();
        };

        let mut handles = Vec::with_capacity(project_versions.len());
        for (idx, project_version) in project_versions.iter().enumerate() {
            let client = self.clone();
            let project_version = project_version.clone();
            let target = target.clone();
            let handle = tokio::spawn(async move {
                client
                    .get_list_relation(&project_version, relations::COMPONENTS)
                    .await
                    .into_iter()
                    .filter(|entry| entry.str_field("componentVersion") == Some(target.as_str()))
                    .collect::<Vec<_>>()
            });
            handles.push((idx, handle));
        }

        let mut per_project: Vec<Vec<Resource>> = vec![Vec::new(); project_versions.len()];
        for (idx, handle) in handles {
            match handle.await {
                Ok(matched) => per_project[idx] = matched,
                Err(e) => warn!("BOM fetch task panicked: {e}"),
            }
        }
        per_project.into_iter().flatten().collect()
    }

    /// Fetches a component version's vulnerabilities, each enriched with a
    /// source-dependent `detailsUrl` (NVD search, VULNDB view on the
    /// configured origin, or empty for unknown sources).
    #[instrument(skip_all)]
    pub async fn component_vulnerabilities(&self, component_version: &Resource) -> Vec<Resource> {
        let mut vulnerabilities = self
            .get_list_relation(component_version, relations::VULNERABILITIES)
            .await;
        for vulnerability in &mut vulnerabilities {
            let details_url = self.vulnerability_details_url(vulnerability);
            vulnerability.set_field("detailsUrl", Value::String(details_url));
        }
        vulnerabilities
    }

    fn vulnerability_details_url(&self, vulnerability: &Resource) -> String {
        let name = vulnerability.str_field("vulnerabilityName").unwrap_or_default();
        match vulnerability.str_field("source") {
            Some("NVD") => {
                format!("{NVD_SEARCH_URL}?query={name}&search_type=all&cves=on")
            }
            Some("VULNDB") => match self.config().origin_str() {
                Some(origin) => format!("{origin}/#vulnerabilities/id:{name}/view:overview"),
                None => String::new(),
            },
            _ => String::new(),
        }
    }

    /// Fetches the policy rules a component version violates.
    pub async fn component_policy_violations(
        &self,
        component_version: &Resource,
    ) -> Option<Resource> {
        self.get_relation(component_version, relations::POLICY_RULES)
            .await
            .map(Resource::new)
    }

    /// Fetches a component version's aggregated risk profile.
    pub async fn component_risk_profile(&self, component_version: &Resource) -> Option<Resource> {
        self.get_relation(component_version, relations::RISK_PROFILE)
            .await
            .map(Resource::new)
    }

    /// Fetches a project version's BOM component list.
    pub async fn project_version_components(&self, project_version: &Resource) -> Vec<Resource> {
        self.get_list_relation(project_version, relations::COMPONENTS)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{collection, mock_client, resource_with_links};
    use serde_json::json;

    #[tokio::test]
    async fn test_find_external_components_sends_composite_query() {
        let (client, exchange) = mock_client("https://hub.example.com");
        exchange.respond_json(
            "https://hub.example.com/api/components",
            collection(vec![json!({ "componentName": "lodash" })]),
        );

        let items = client
            .find_external_components("npm", "lodash/4.17.11")
            .await;

        assert_eq!(items.len(), 1);
        let requests = exchange.requests();
        assert_eq!(
            requests[0].url.query(),
            Some("q=npm%3Alodash%2F4.17.11&limit=10000")
        );
    }

    #[tokio::test]
    async fn test_find_external_components_soft_fails_to_empty() {
        let (client, exchange) = mock_client("https://hub.example.com");
        exchange.respond_status("https://hub.example.com/api/components", 500, "");

        assert!(client
            .find_external_components("maven", "org.example:lib/1.0")
            .await
            .is_empty());
    }

    #[tokio::test]
    async fn test_reference_projects_partial_failure_keeps_positions() {
        let (client, exchange) = mock_client("https://hub.example.com");
        exchange.respond_json(
            "https://hub.example.com/api/refs",
            collection(vec![
                json!({
                    "projectName": "alpha",
                    "projectVersionUrl": "https://hub.example.com/api/pv/1"
                }),
                json!({
                    "projectName": "beta",
                    "projectVersionUrl": "https://hub.example.com/api/pv/2"
                }),
            ]),
        );
        exchange.respond_json(
            "https://hub.example.com/api/pv/1",
            json!({ "versionName": "1.0.0" }),
        );
        exchange.respond_status("https://hub.example.com/api/pv/2", 500, "");

        let component_version =
            resource_with_links(&[("references", "https://hub.example.com/api/refs")]);
        let projects = client
            .component_version_reference_projects(&component_version)
            .await;

        assert_eq!(projects.len(), 2);
        let alpha = projects[0].as_ref().expect("first reference resolves");
        assert_eq!(alpha.str_field("projectName"), Some("alpha"));
        assert_eq!(alpha.str_field("versionName"), Some("1.0.0"));
        assert!(projects[1].is_none());
    }

    #[tokio::test]
    async fn test_reference_without_url_contributes_none() {
        let (client, exchange) = mock_client("https://hub.example.com");
        exchange.respond_json(
            "https://hub.example.com/api/refs",
            collection(vec![json!({ "projectName": "orphan" })]),
        );

        let component_version =
            resource_with_links(&[("references", "https://hub.example.com/api/refs")]);
        let projects = client
            .component_version_reference_projects(&component_version)
            .await;

        assert_eq!(projects.len(), 1);
        assert!(projects[0].is_none());
    }

    #[tokio::test]
    async fn test_matching_bom_components_filters_and_preserves_order() {
        let (client, exchange) = mock_client("https://hub.example.com");
        exchange.respond_json(
            "https://hub.example.com/api/pv/1/components",
            collection(vec![
                json!({ "componentName": "a", "componentVersion": "V1" }),
                json!({ "componentName": "b", "componentVersion": "V2" }),
            ]),
        );
        exchange.respond_json(
            "https://hub.example.com/api/pv/2/components",
            collection(vec![
                json!({ "componentName": "c", "componentVersion": "V1" }),
            ]),
        );

        let external = Resource::new(json!({ "version": "V1" }));
        let pv1 =
            resource_with_links(&[("components", "https://hub.example.com/api/pv/1/components")]);
        let pv2 =
            resource_with_links(&[("components", "https://hub.example.com/api/pv/2/components")]);

        let matched = client.matching_bom_components(&external, &[pv1, pv2]).await;

        assert_eq!(matched.len(), 2);
        assert_eq!(matched[0].str_field("componentName"), Some("a"));
        assert_eq!(matched[1].str_field("componentName"), Some("c"));
    }

    #[tokio::test]
    async fn test_matching_bom_components_without_version_matches_nothing() {
        let (client, _exchange) = mock_client("https://hub.example.com");
        let external = Resource::new(json!({ "componentName": "versionless" }));
        let pv =
            resource_with_links(&[("components", "https://hub.example.com/api/pv/1/components")]);

        assert!(client.matching_bom_components(&external, &[pv]).await.is_empty());
    }

    #[tokio::test]
    async fn test_vulnerability_details_url_by_source() {
        let (client, exchange) = mock_client("https://hub.example.com");
        exchange.respond_json(
            "https://hub.example.com/api/vulns",
            collection(vec![
                json!({ "vulnerabilityName": "CVE-2020-1", "source": "NVD" }),
                json!({ "vulnerabilityName": "CVE-2020-1", "source": "VULNDB" }),
                json!({ "vulnerabilityName": "CVE-2020-1", "source": "OTHER" }),
            ]),
        );
        let component_version =
            resource_with_links(&[("vulnerabilities", "https://hub.example.com/api/vulns")]);

        let vulnerabilities = client.component_vulnerabilities(&component_version).await;

        assert_eq!(
            vulnerabilities[0].str_field("detailsUrl"),
            Some(
                "https://web.nvd.nist.gov/view/vuln/search-results?query=CVE-2020-1&search_type=all&cves=on"
            )
        );
        assert_eq!(
            vulnerabilities[1].str_field("detailsUrl"),
            Some("https://hub.example.com/#vulnerabilities/id:CVE-2020-1/view:overview")
        );
        assert_eq!(vulnerabilities[2].str_field("detailsUrl"), Some(""));
    }

    #[tokio::test]
    async fn test_policy_violations_and_risk_profile_are_singular() {
        let (client, exchange) = mock_client("https://hub.example.com");
        exchange.respond_json(
            "https://hub.example.com/api/policy",
            json!({ "inViolation": true }),
        );
        let component_version = resource_with_links(&[
            ("policy-rules", "https://hub.example.com/api/policy"),
        ]);

        let violations = client
            .component_policy_violations(&component_version)
            .await
            .unwrap();
        assert_eq!(violations.field("inViolation"), Some(&json!(true)));

        // risk-profile is absent on this resource: no call, no value.
        let before = exchange.request_count();
        assert!(client.component_risk_profile(&component_version).await.is_none());
        assert_eq!(exchange.request_count(), before);
    }

    #[tokio::test]
    async fn test_project_version_components() {
        let (client, exchange) = mock_client("https://hub.example.com");
        exchange.respond_json(
            "https://hub.example.com/api/pv/1/components",
            collection(vec![json!({ "componentName": "a" })]),
        );
        let project_version =
            resource_with_links(&[("components", "https://hub.example.com/api/pv/1/components")]);

        let components = client.project_version_components(&project_version).await;
        assert_eq!(components.len(), 1);
    }
}
