//! Client-side credential store.
//!
//! Holds the signed-in [`Session`] and the active tenant slug. In the
//! browser both live in local storage so they survive reloads; native
//! clients keep them in memory. The request pipeline only reads from the
//! store; login, logout and auth-failure handling are the only writers.

use shared::Session;
use std::cell::RefCell;

pub const SESSION_KEY: &str = "session";
pub const TENANT_SLUG_KEY: &str = "tenant_slug";

pub trait SessionStore {
    /// Current session; anonymous when nothing is stored.
    fn load(&self) -> Session;

    /// Replaces the stored session wholesale.
    fn save(&self, session: &Session);

    /// Drops the stored session. The tenant slug is kept so the login
    /// screen stays scoped to the same academy.
    fn clear(&self);

    fn tenant_slug(&self) -> Option<String>;

    fn set_tenant_slug(&self, slug: Option<&str>);
}

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: RefCell<Session>,
    tenant_slug: RefCell<Option<String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tenant(slug: &str) -> Self {
        let store = Self::default();
        store.set_tenant_slug(Some(slug));
        store
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Session {
        self.session.borrow().clone()
    }

    fn save(&self, session: &Session) {
        *self.session.borrow_mut() = session.clone();
    }

    fn clear(&self) {
        *self.session.borrow_mut() = Session::anonymous();
    }

    fn tenant_slug(&self) -> Option<String> {
        self.tenant_slug.borrow().clone()
    }

    fn set_tenant_slug(&self, slug: Option<&str>) {
        *self.tenant_slug.borrow_mut() = slug.map(str::to_string);
    }
}

#[cfg(target_arch = "wasm32")]
pub use local::LocalSessionStore;

#[cfg(target_arch = "wasm32")]
mod local {
    use super::{SessionStore, SESSION_KEY, TENANT_SLUG_KEY};
    use gloo_storage::{LocalStorage, Storage};
    use log::error;
    use shared::Session;

    /// Session store backed by `window.localStorage`.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct LocalSessionStore;

    impl SessionStore for LocalSessionStore {
        fn load(&self) -> Session {
            LocalStorage::get::<Session>(SESSION_KEY).unwrap_or_default()
        }

        fn save(&self, session: &Session) {
            if let Err(e) = LocalStorage::set(SESSION_KEY, session) {
                error!("Failed to store session in local storage: {}", e);
            }
        }

        fn clear(&self) {
            LocalStorage::delete(SESSION_KEY);
        }

        fn tenant_slug(&self) -> Option<String> {
            LocalStorage::get::<String>(TENANT_SLUG_KEY)
                .ok()
                .filter(|slug| !slug.is_empty())
        }

        fn set_tenant_slug(&self, slug: Option<&str>) {
            match slug {
                Some(slug) => {
                    if let Err(e) = LocalStorage::set(TENANT_SLUG_KEY, slug) {
                        error!("Failed to store tenant slug in local storage: {}", e);
                    }
                }
                None => LocalStorage::delete(TENANT_SLUG_KEY),
            }
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{Role, User};

    #[test]
    fn test_memory_store_lifecycle() {
        let store = MemorySessionStore::with_tenant("acme");
        assert!(!store.load().is_authenticated());

        let user = User {
            id: 9,
            login_id: "owner".to_string(),
            name: "Owner".to_string(),
            role: Role::Owner,
            tenant_slug: "acme".to_string(),
            tenant_id: 1,
        };
        store.save(&Session::authenticated(user));
        assert!(store.load().is_authenticated());

        store.clear();
        let session = store.load();
        assert!(session.user().is_none());
        assert!(!session.is_authenticated());
        assert_eq!(store.tenant_slug().as_deref(), Some("acme"));
    }
}
