use crate::services::link_service::LinkService;

/// Shared per-worker state; the store handle inside is injected at start-up.
#[derive(Clone)]
pub struct AppState {
    pub links: LinkService,
}

impl AppState {
    pub fn new(links: LinkService) -> Self {
        Self { links }
    }
}
