use std::sync::Arc;
use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use sha2::{Digest, Sha512};

use crate::{
    config::Settings,
    service::ServiceContext,
    web::uploads::ImageStore,
};

#[derive(Clone)]
pub struct AppState {
    pub service_context: Arc<ServiceContext>,
    pub settings: Arc<Settings>,
    pub image_store: ImageStore,
    cookie_key: Key,
}

impl AppState {
    pub fn new(
        service_context: Arc<ServiceContext>,
        settings: Arc<Settings>,
    ) -> Self {
        let cookie_key = derive_cookie_key(&settings.auth.session_secret);
        let image_store = ImageStore::new(&settings.uploads);
        Self {
            service_context,
            settings,
            image_store,
            cookie_key,
        }
    }
}

// SignedCookieJar pulls its key out of the router state.
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

/// `Key::from` needs 64 bytes; stretch whatever secret was configured.
fn derive_cookie_key(secret: &str) -> Key {
    let digest = Sha512::digest(secret.as_bytes());
    Key::from(digest.as_slice())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_key_is_deterministic() {
        let a = derive_cookie_key("short");
        let b = derive_cookie_key("short");
        let c = derive_cookie_key("different");
        assert_eq!(a.master(), b.master());
        assert_ne!(a.master(), c.master());
    }
}
