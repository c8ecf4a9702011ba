//! Relation names the client navigates by.
//!
//! Lookup against a resource's link collection is case-sensitive; these
//! constants are the exact spellings the Hub uses.

/// BOM entries of a project version, or version list of a component.
pub const COMPONENTS: &str = "components";

/// Vulnerabilities affecting a component version.
pub const VULNERABILITIES: &str = "vulnerabilities";

/// Policy rules a component version violates.
pub const POLICY_RULES: &str = "policy-rules";

/// Projects whose BOMs reference a component version.
pub const REFERENCES: &str = "references";

/// Aggregated risk counts for a component version.
pub const RISK_PROFILE: &str = "risk-profile";
