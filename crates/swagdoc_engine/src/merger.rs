/* 📖 # How declarations from one source location are folded into the registry

Declarations are applied in order through an accumulator that is private to the source
location:

- A resource declaration opens (or re-opens) a resource. If the path is already
  registered, the registered resource becomes the accumulator, so a second file can add
  operations to `/login` instead of replacing it. Operations or models declared before
  any resource header are folded into the opened resource.
- The index entry is registered once per path; the first registration wins, and so does
  its description.
- A resource declaration for a different path commits the current accumulator first.
- Models are shallow-merged (later keys overwrite), operations are appended.

At the end of the location the accumulator is committed under its path. An accumulator
that never saw a resource declaration has nowhere to go and is dropped with a warning.
*/

use serde_json::Value;
use tracing::{debug, warn};

use swagdoc_base::{FilePath, SwagdocResult};

use crate::declaration::{Declaration, ResourceDeclaration};
use crate::model::{Models, Resource, ResourceSummary};
use crate::store::ResourceStore;

#[derive(Debug, Default)]
struct Accumulator {
    resource_path: Option<String>,
    description: Option<String>,
    apis: Vec<Value>,
    models: Models,
}

impl Accumulator {
    fn from_resource(resource: Resource) -> Self {
        Self {
            resource_path: Some(resource.resource_path),
            description: resource.description,
            apis: resource.apis,
            models: resource.models,
        }
    }

    fn absorb(&mut self, pending: Accumulator) {
        self.apis.extend(pending.apis);
        self.models.extend(pending.models);
    }

    fn is_empty(&self) -> bool {
        self.apis.is_empty() && self.models.is_empty()
    }
}

/// Resource paths committed while merging one source location.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    pub committed: Vec<String>,
    /// Number of operations discarded because no resource was declared for them.
    pub dropped_operations: usize,
}

/// Merge the declarations of one source location into the store.
pub fn merge(
    store: &mut dyn ResourceStore,
    source: &FilePath,
    declarations: Vec<Declaration>,
) -> SwagdocResult<MergeOutcome> {
    let mut outcome = MergeOutcome::default();
    let mut accumulator = Accumulator::default();

    for declaration in declarations {
        match declaration {
            Declaration::Resource(header) => {
                accumulator = open_resource(store, accumulator, header, &mut outcome)?;
            }
            Declaration::Models(models) => accumulator.models.extend(models),
            Declaration::Operation(operation) => accumulator.apis.push(operation),
        }
    }

    commit(store, source, accumulator, &mut outcome)?;
    debug!(%source, committed = ?outcome.committed, "merged source location");
    Ok(outcome)
}

fn open_resource(
    store: &mut dyn ResourceStore,
    mut accumulator: Accumulator,
    header: ResourceDeclaration,
    outcome: &mut MergeOutcome,
) -> SwagdocResult<Accumulator> {
    let ResourceDeclaration {
        resource_path,
        description,
        apis,
        models,
    } = header;

    if accumulator.resource_path.as_deref() != Some(resource_path.as_str()) {
        let pending = match accumulator.resource_path.take() {
            Some(previous) => {
                store.commit(into_resource(previous.clone(), accumulator))?;
                outcome.committed.push(previous);
                Accumulator::default()
            }
            None => accumulator,
        };
        accumulator = match store.get(&resource_path)? {
            Some(existing) => Accumulator::from_resource(existing),
            None => Accumulator {
                resource_path: Some(resource_path.clone()),
                description: description.clone(),
                ..Accumulator::default()
            },
        };
        accumulator.absorb(pending);
    }

    store.register_summary(ResourceSummary {
        resource_path,
        description,
    })?;
    accumulator.apis.extend(apis);
    accumulator.models.extend(models);
    Ok(accumulator)
}

fn commit(
    store: &mut dyn ResourceStore,
    source: &FilePath,
    mut accumulator: Accumulator,
    outcome: &mut MergeOutcome,
) -> SwagdocResult<()> {
    match accumulator.resource_path.take() {
        Some(path) => {
            store.commit(into_resource(path.clone(), accumulator))?;
            outcome.committed.push(path);
        }
        None if !accumulator.is_empty() => {
            warn!(
                %source,
                operations = accumulator.apis.len(),
                models = accumulator.models.len(),
                "declarations without a resourcePath were dropped"
            );
            outcome.dropped_operations += accumulator.apis.len();
        }
        None => {}
    }
    Ok(())
}

fn into_resource(resource_path: String, accumulator: Accumulator) -> Resource {
    Resource {
        resource_path,
        description: accumulator.description,
        apis: accumulator.apis,
        models: accumulator.models,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryRegistry;
    use serde_json::json;

    fn resource(path: &str, description: &str) -> Declaration {
        Declaration::Resource(ResourceDeclaration {
            resource_path: path.to_string(),
            description: Some(description.to_string()),
            apis: vec![],
            models: Models::new(),
        })
    }

    fn operation(nickname: &str) -> Declaration {
        Declaration::Operation(json!({"path": "/login", "operations": [{"nickname": nickname}]}))
    }

    fn models(entries: &[(&str, Value)]) -> Declaration {
        Declaration::Models(
            entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        )
    }

    fn source() -> FilePath {
        FilePath::from("api.js")
    }

    #[test]
    fn test_operations_keep_declared_order() {
        let mut registry = InMemoryRegistry::new();
        let outcome = merge(
            &mut registry,
            &source(),
            vec![
                resource("/login", "All about API"),
                operation("login"),
                operation("logout"),
            ],
        )
        .unwrap();

        assert_eq!(outcome.committed, vec!["/login"]);
        let login = registry.get("/login").unwrap().unwrap();
        assert_eq!(
            login.apis,
            vec![
                json!({"path": "/login", "operations": [{"nickname": "login"}]}),
                json!({"path": "/login", "operations": [{"nickname": "logout"}]}),
            ]
        );
        assert_eq!(login.description.as_deref(), Some("All about API"));
    }

    #[test]
    fn test_second_location_extends_existing_resource() {
        let mut registry = InMemoryRegistry::new();
        merge(
            &mut registry,
            &FilePath::from("a.js"),
            vec![resource("/login", "first"), operation("login")],
        )
        .unwrap();
        merge(
            &mut registry,
            &FilePath::from("b.js"),
            vec![resource("/login", "second"), operation("logout")],
        )
        .unwrap();

        assert_eq!(registry.len().unwrap(), 1);
        let login = registry.get("/login").unwrap().unwrap();
        assert_eq!(login.apis.len(), 2);
        assert_eq!(login.description.as_deref(), Some("first"));
        let summaries = registry.summaries().unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].description.as_deref(), Some("first"));
    }

    #[test]
    fn test_pending_declarations_fold_into_opened_resource() {
        let mut registry = InMemoryRegistry::new();
        merge(
            &mut registry,
            &source(),
            vec![
                operation("early"),
                models(&[("User", json!({"id": "User"}))]),
                resource("/login", "All about API"),
                operation("late"),
            ],
        )
        .unwrap();

        let login = registry.get("/login").unwrap().unwrap();
        assert_eq!(login.apis.len(), 2);
        assert_eq!(login.apis[0]["operations"][0]["nickname"], "early");
        assert!(login.models.contains_key("User"));
    }

    #[test]
    fn test_switching_resources_commits_previous() {
        let mut registry = InMemoryRegistry::new();
        let outcome = merge(
            &mut registry,
            &source(),
            vec![
                resource("/login", "login"),
                operation("login"),
                resource("/users", "users"),
                operation("list"),
                operation("create"),
            ],
        )
        .unwrap();

        assert_eq!(outcome.committed, vec!["/login", "/users"]);
        assert_eq!(registry.get("/login").unwrap().unwrap().apis.len(), 1);
        assert_eq!(registry.get("/users").unwrap().unwrap().apis.len(), 2);
    }

    #[test]
    fn test_models_shallow_merge_overwrites() {
        let mut registry = InMemoryRegistry::new();
        merge(
            &mut registry,
            &source(),
            vec![
                resource("/login", "login"),
                models(&[("User", json!({"v": 1})), ("Token", json!({"v": 1}))]),
                models(&[("User", json!({"v": 2}))]),
            ],
        )
        .unwrap();

        let login = registry.get("/login").unwrap().unwrap();
        assert_eq!(login.models["User"], json!({"v": 2}));
        assert_eq!(login.models["Token"], json!({"v": 1}));
        assert_eq!(login.models.keys().collect::<Vec<_>>(), vec!["User", "Token"]);
    }

    #[test]
    fn test_declarations_without_resource_are_dropped() {
        let mut registry = InMemoryRegistry::new();
        let outcome = merge(
            &mut registry,
            &source(),
            vec![operation("orphan"), operation("orphan2")],
        )
        .unwrap();

        assert!(outcome.committed.is_empty());
        assert_eq!(outcome.dropped_operations, 2);
        assert!(registry.is_empty().unwrap());
        assert!(registry.summaries().unwrap().is_empty());
    }

    #[test]
    fn test_inline_apis_and_models() {
        let mut registry = InMemoryRegistry::new();
        let header = Declaration::Resource(ResourceDeclaration {
            resource_path: "/pets".to_string(),
            description: None,
            apis: vec![json!({"path": "/pets"})],
            models: [("Pet".to_string(), json!({"id": "Pet"}))]
                .into_iter()
                .collect(),
        });
        merge(&mut registry, &FilePath::from("pets.yml"), vec![header]).unwrap();

        let pets = registry.get("/pets").unwrap().unwrap();
        assert_eq!(pets.apis, vec![json!({"path": "/pets"})]);
        assert!(pets.models.contains_key("Pet"));
        assert_eq!(pets.description, None);
    }
}
