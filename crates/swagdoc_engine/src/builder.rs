/* 📖 # Why build response documents as snapshots?

Every view is assembled from copies taken under one read lock, then serialized. The
registry itself is never modified by a request, so building the index twice yields
byte-identical JSON and a slow client cannot hold up anyone else.

Field names follow the Swagger 1.x resource listing (`apiVersion`, `swaggerVersion`,
`basePath`, ...), so serde renames them to camelCase on output.
*/

use serde::Serialize;
use serde_json::Value;

use swagdoc_base::SwagdocResult;

use crate::config::Config;
use crate::model::Models;
use crate::store::RegistryHandle;

/// Global settings of the documented API, fixed at start-up.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiDescriptor {
    pub base_path: String,
    pub api_version: String,
    pub swagger_version: String,
    pub browser_url: String,
    pub json_url: String,
    /// Request path of the index JSON.
    pub full_json_path: String,
    pub single_page_path: Option<String>,
    pub info: Option<Value>,
}

impl ApiDescriptor {
    pub fn from_config(config: &Config) -> SwagdocResult<Self> {
        Ok(Self {
            base_path: config.base_path()?.to_string(),
            api_version: config.api_version.clone(),
            swagger_version: config.swagger_version.clone(),
            browser_url: config.browser_url.trim_end_matches('/').to_string(),
            json_url: config.json_url.clone(),
            full_json_path: config.full_json_path()?,
            single_page_path: config
                .single_page_path
                .as_ref()
                .map(|p| p.trim_matches('/').to_string())
                .filter(|p| !p.is_empty()),
            info: config.info.clone(),
        })
    }
}

/// One line of the index: where to fetch a resource and what it is about.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexEntry {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexDocument {
    pub api_version: String,
    pub swagger_version: String,
    pub base_path: String,
    pub apis: Vec<IndexEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDocument {
    pub api_version: String,
    pub swagger_version: String,
    pub base_path: String,
    pub resource_path: String,
    pub apis: Vec<Value>,
    pub models: Models,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<Value>,
}

/// Every operation and model of every resource in one document, under the global
/// settings of the API.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsolidatedDocument {
    pub api_version: String,
    pub swagger_version: String,
    pub base_path: String,
    pub apis: Vec<Value>,
    pub models: Models,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<Value>,
}

/// Builds the JSON views served over HTTP.
#[derive(Debug, Clone)]
pub struct DocumentBuilder {
    descriptor: ApiDescriptor,
    registry: RegistryHandle,
}

impl DocumentBuilder {
    pub fn new(descriptor: ApiDescriptor, registry: RegistryHandle) -> Self {
        Self {
            descriptor,
            registry,
        }
    }

    pub fn descriptor(&self) -> &ApiDescriptor {
        &self.descriptor
    }

    pub fn registry(&self) -> &RegistryHandle {
        &self.registry
    }

    /// The resource listing, in index order.
    pub fn build_index(&self) -> SwagdocResult<IndexDocument> {
        let apis = self
            .registry
            .summaries()?
            .into_iter()
            .map(|summary| IndexEntry {
                path: format!("{}{}", self.descriptor.json_url, summary.resource_path),
                description: summary.description,
            })
            .collect();
        Ok(IndexDocument {
            api_version: self.descriptor.api_version.clone(),
            swagger_version: self.descriptor.swagger_version.clone(),
            base_path: self.descriptor.base_path.clone(),
            apis,
            info: self.descriptor.info.clone(),
        })
    }

    /// The resource registered under `"/" + name`, if any.
    pub fn build_resource(&self, name: &str) -> SwagdocResult<Option<ResourceDocument>> {
        let resource_path = format!("/{}", name);
        Ok(self
            .registry
            .get(&resource_path)?
            .map(|resource| ResourceDocument {
                api_version: self.descriptor.api_version.clone(),
                swagger_version: self.descriptor.swagger_version.clone(),
                base_path: self.descriptor.base_path.clone(),
                resource_path: resource.resource_path,
                apis: resource.apis,
                models: resource.models,
                info: self.descriptor.info.clone(),
            }))
    }

    /// All operations in registry order; models merged with later resources winning.
    pub fn build_consolidated(&self) -> SwagdocResult<ConsolidatedDocument> {
        let mut apis = Vec::new();
        let mut models = Models::new();
        for resource in self.registry.list()? {
            apis.extend(resource.apis);
            models.extend(resource.models);
        }
        Ok(ConsolidatedDocument {
            api_version: self.descriptor.api_version.clone(),
            swagger_version: self.descriptor.swagger_version.clone(),
            base_path: self.descriptor.base_path.clone(),
            apis,
            models,
            info: self.descriptor.info.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Resource, ResourceSummary};
    use crate::store::InMemoryRegistry;
    use expect_test::expect;
    use serde_json::json;

    fn descriptor() -> ApiDescriptor {
        let config = Config::from_toml(
            r#"
base_path = "http://x/"
browser_dir = "public"
sources = ["a.js"]

[info]
title = "Test API"
"#,
        )
        .unwrap();
        ApiDescriptor::from_config(&config).unwrap()
    }

    fn registry() -> RegistryHandle {
        let registry = RegistryHandle::new(InMemoryRegistry::new());
        registry
            .write(|store| -> SwagdocResult<()> {
                let mut login = Resource::new("/login", Some("All about API".to_string()));
                login.apis.push(json!({"path": "/login", "operations": [{"nickname": "login"}]}));
                login.models.insert("User".to_string(), json!({"id": "User", "v": 1}));
                store.register_summary(login.summary())?;
                store.commit(login)?;

                let mut users = Resource::new("/users", None);
                users.apis.push(json!({"path": "/users"}));
                users.models.insert("User".to_string(), json!({"id": "User", "v": 2}));
                users.models.insert("Group".to_string(), json!({"id": "Group"}));
                store.register_summary(ResourceSummary {
                    resource_path: "/users".to_string(),
                    description: None,
                })?;
                store.commit(users)?;
                Ok(())
            })
            .unwrap();
        registry
    }

    #[test]
    fn test_descriptor_from_config() {
        let descriptor = descriptor();
        assert_eq!(descriptor.base_path, "http://x/");
        assert_eq!(descriptor.full_json_path, "/api-docs.json");
        assert_eq!(descriptor.browser_url, "/swagger");
        assert_eq!(descriptor.single_page_path, None);
    }

    #[test]
    fn test_build_index() {
        let builder = DocumentBuilder::new(descriptor(), registry());
        let index = builder.build_index().unwrap();
        expect![[r#"
            {
              "apiVersion": "1.0",
              "swaggerVersion": "1.0",
              "basePath": "http://x/",
              "apis": [
                {
                  "path": "/api-docs.json/login",
                  "description": "All about API"
                },
                {
                  "path": "/api-docs.json/users"
                }
              ],
              "info": {
                "title": "Test API"
              }
            }
        "#]]
        .assert_eq(&format!("{}\n", serde_json::to_string_pretty(&index).unwrap()));
    }

    #[test]
    fn test_build_index_is_idempotent() {
        let builder = DocumentBuilder::new(descriptor(), registry());
        let first = serde_json::to_vec(&builder.build_index().unwrap()).unwrap();
        let second = serde_json::to_vec(&builder.build_index().unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_build_resource() {
        let builder = DocumentBuilder::new(descriptor(), registry());
        let login = builder.build_resource("login").unwrap().unwrap();
        expect![[r#"
            {
              "apiVersion": "1.0",
              "swaggerVersion": "1.0",
              "basePath": "http://x/",
              "resourcePath": "/login",
              "apis": [
                {
                  "path": "/login",
                  "operations": [
                    {
                      "nickname": "login"
                    }
                  ]
                }
              ],
              "models": {
                "User": {
                  "id": "User",
                  "v": 1
                }
              },
              "info": {
                "title": "Test API"
              }
            }
        "#]]
        .assert_eq(&format!("{}\n", serde_json::to_string_pretty(&login).unwrap()));

        assert_eq!(builder.build_resource("unknown").unwrap(), None);
        assert_eq!(builder.build_resource("/login").unwrap(), None);
    }

    #[test]
    fn test_build_consolidated() {
        let registry = registry();
        let builder = DocumentBuilder::new(descriptor(), registry.clone());
        let consolidated = builder.build_consolidated().unwrap();

        let expected_apis: Vec<Value> = registry
            .list()
            .unwrap()
            .into_iter()
            .flat_map(|r| r.apis)
            .collect();
        assert_eq!(consolidated.apis, expected_apis);
        assert_eq!(consolidated.api_version, "1.0");
        assert_eq!(consolidated.swagger_version, "1.0");
        assert_eq!(consolidated.base_path, "http://x/");
        assert_eq!(consolidated.info, Some(json!({"title": "Test API"})));
        assert_eq!(consolidated.models["User"], json!({"id": "User", "v": 2}));
        assert!(consolidated.models.contains_key("Group"));

        // Building never touches the registry.
        assert_eq!(registry.get("/login").unwrap().unwrap().models["User"]["v"], 1);
    }
}
