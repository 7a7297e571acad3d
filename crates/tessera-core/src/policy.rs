//! Authorization policy types and the bootstrap defaults.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PolicyRule {
    pub verbs: Vec<String>,
    pub resources: Vec<String>,
}

impl PolicyRule {
    fn new(verbs: &[&str], resources: &[&str]) -> Self {
        Self {
            verbs: verbs.iter().map(|v| v.to_string()).collect(),
            resources: resources.iter().map(|r| r.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Role {
    pub name: String,
    pub rules: Vec<PolicyRule>,
}

/// Serialized form written by `create-bootstrap-policy-file` and pushed by
/// `overwrite-bootstrap-policy`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PolicyFile {
    pub api_version: String,
    pub kind: String,
    pub roles: Vec<Role>,
}

pub const POLICY_FILE_KIND: &str = "PolicyList";

impl PolicyFile {
    pub fn bootstrap() -> Self {
        Self {
            api_version: "v1".to_string(),
            kind: POLICY_FILE_KIND.to_string(),
            roles: bootstrap_roles(),
        }
    }
}

/// The roles every new cluster starts with.
pub fn bootstrap_roles() -> Vec<Role> {
    vec![
        Role {
            name: "cluster-admin".to_string(),
            rules: vec![PolicyRule::new(&["*"], &["*"])],
        },
        Role {
            name: "admin".to_string(),
            rules: vec![
                PolicyRule::new(
                    &["get", "list", "watch", "create", "update", "delete"],
                    &["projects", "rolebindings", "builds", "deployments", "routes"],
                ),
                PolicyRule::new(&["get", "list", "watch"], &["policies", "roles"]),
            ],
        },
        Role {
            name: "edit".to_string(),
            rules: vec![PolicyRule::new(
                &["get", "list", "watch", "create", "update", "delete"],
                &["builds", "deployments", "routes"],
            )],
        },
        Role {
            name: "view".to_string(),
            rules: vec![PolicyRule::new(
                &["get", "list", "watch"],
                &["projects", "builds", "deployments", "routes"],
            )],
        },
        Role {
            name: "basic-user".to_string(),
            rules: vec![PolicyRule::new(&["get"], &["users/~"])],
        },
        Role {
            name: "self-provisioner".to_string(),
            rules: vec![PolicyRule::new(&["create"], &["projectrequests"])],
        },
    ]
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SubjectKind {
    User,
    Group,
}

impl fmt::Display for SubjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubjectKind::User => write!(f, "User"),
            SubjectKind::Group => write!(f, "Group"),
        }
    }
}

/// A single add/remove mutation against a namespace's role bindings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoleBindingChange {
    pub role: String,
    pub subject_kind: SubjectKind,
    pub subject_name: String,
}

/// Answer to `policy who-can VERB RESOURCE`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct WhoCanResult {
    #[serde(default)]
    pub users: Vec<String>,
    #[serde(default)]
    pub groups: Vec<String>,
}
