//! Project types and the bootstrap project template.

use serde::{Deserialize, Serialize};

/// Request body for creating a project.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRequest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_selector: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TemplateParameter {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub required: bool,
}

/// Template instantiated by the server for each new project.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectTemplate {
    pub api_version: String,
    pub kind: String,
    pub parameters: Vec<TemplateParameter>,
    pub objects: Vec<serde_yaml::Value>,
}

fn object(yaml: &str) -> serde_yaml::Value {
    serde_yaml::from_str(yaml).expect("static template object")
}

/// The default template: the namespace itself plus an admin role binding for
/// the requesting user.
pub fn bootstrap_project_template() -> ProjectTemplate {
    ProjectTemplate {
        api_version: "v1".to_string(),
        kind: "Template".to_string(),
        parameters: vec![
            TemplateParameter {
                name: "PROJECT_NAME".to_string(),
                description: Some("Name of the project".to_string()),
                required: true,
            },
            TemplateParameter {
                name: "PROJECT_DISPLAYNAME".to_string(),
                description: Some("Display name shown in consoles".to_string()),
                required: false,
            },
            TemplateParameter {
                name: "PROJECT_DESCRIPTION".to_string(),
                description: None,
                required: false,
            },
            TemplateParameter {
                name: "PROJECT_REQUESTING_USER".to_string(),
                description: Some("User who requested the project".to_string()),
                required: false,
            },
        ],
        objects: vec![
            object(
                r#"
apiVersion: v1
kind: Project
metadata:
  name: ${PROJECT_NAME}
  annotations:
    tessera.io/display-name: ${PROJECT_DISPLAYNAME}
    tessera.io/description: ${PROJECT_DESCRIPTION}
"#,
            ),
            object(
                r#"
apiVersion: v1
kind: RoleBinding
metadata:
  name: admins
  namespace: ${PROJECT_NAME}
role: admin
users:
  - ${PROJECT_REQUESTING_USER}
"#,
            ),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bootstrap_template_requires_project_name() {
        let template = bootstrap_project_template();
        let name = template
            .parameters
            .iter()
            .find(|p| p.name == "PROJECT_NAME")
            .unwrap();
        assert!(name.required);
        assert_eq!(template.objects.len(), 2);
    }

    #[test]
    fn test_bootstrap_template_serializes_to_yaml() {
        let template = bootstrap_project_template();
        let yaml = serde_yaml::to_string(&template).unwrap();
        assert!(yaml.contains("kind: Template"));
        assert!(yaml.contains("${PROJECT_NAME}"));
    }

    #[test]
    fn test_project_request_omits_unset_fields() {
        let request = ProjectRequest {
            name: "web".to_string(),
            ..ProjectRequest::default()
        };
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(json, "{\"name\":\"web\"}");
    }
}
