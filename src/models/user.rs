use serde::{Deserialize, Serialize};

use crate::store::{DocumentStore, StoreError};

pub const COLLECTION: &str = "users";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Driver,
    Manager,
    Admin,
}

/// Outcome of looking a caller's role up in the users collection. The store
/// is schemaless, so an absent document (or an absent/unknown role field) is
/// a valid state that resolves to Driver rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleResolution {
    Found(Role),
    DefaultedDriver,
}

impl RoleResolution {
    pub fn role(self) -> Role {
        match self {
            RoleResolution::Found(role) => role,
            RoleResolution::DefaultedDriver => Role::Driver,
        }
    }
}

pub async fn resolve_role(
    store: &dyn DocumentStore,
    uid: &str,
) -> Result<RoleResolution, StoreError> {
    let Some(doc) = store.get(COLLECTION, uid).await? else {
        return Ok(RoleResolution::DefaultedDriver);
    };
    let role = doc
        .data
        .get("role")
        .cloned()
        .and_then(|value| serde_json::from_value::<Role>(value).ok());
    Ok(match role {
        Some(role) => RoleResolution::Found(role),
        None => RoleResolution::DefaultedDriver,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::store::memory::MemoryStore;

    #[tokio::test]
    async fn missing_user_document_defaults_to_driver() {
        let store = MemoryStore::new();
        let resolution = resolve_role(&store, "nobody").await.unwrap();
        assert_eq!(resolution, RoleResolution::DefaultedDriver);
        assert_eq!(resolution.role(), Role::Driver);
    }

    #[tokio::test]
    async fn unknown_role_value_defaults_to_driver() {
        let store = MemoryStore::new();
        store
            .set(COLLECTION, "u1", json!({ "role": "Employee" }))
            .await
            .unwrap();
        let resolution = resolve_role(&store, "u1").await.unwrap();
        assert_eq!(resolution, RoleResolution::DefaultedDriver);
    }

    #[tokio::test]
    async fn stored_role_is_found() {
        let store = MemoryStore::new();
        store
            .set(COLLECTION, "u1", json!({ "role": "Manager" }))
            .await
            .unwrap();
        let resolution = resolve_role(&store, "u1").await.unwrap();
        assert_eq!(resolution, RoleResolution::Found(Role::Manager));
    }
}
