// Application state module
// Everything a request handler needs, built once before serving begins

use super::types::Config;
use crate::handler::Router;
use crate::page::PageStore;
use crate::template::Templates;

/// Application state
///
/// Read-only after construction; shared with every connection through an `Arc`.
pub struct AppState {
    pub config: Config,
    pub store: PageStore,
    pub templates: Templates,
    pub router: Router,
}

impl AppState {
    pub fn new(config: Config, templates: Templates) -> Self {
        let store = PageStore::new(&config.storage.dir);
        Self {
            config,
            store,
            templates,
            router: Router::new(),
        }
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::path::Path;
    use std::sync::Arc;

    pub const VIEW_SOURCE: &str = "<h1>{{ title }}</h1><div>{{ body }}</div>";
    pub const EDIT_SOURCE: &str =
        "<h1>Editing {{ title }}</h1><form action=\"/save/{{ title }}\" method=\"POST\"><textarea name=\"body\">{{ body }}</textarea></form>";

    /// State backed by `storage_dir` with small inline templates
    pub fn state_with_templates(storage_dir: &Path, templates: Templates) -> Arc<AppState> {
        let mut config = crate::config::test_config();
        config.storage.dir = storage_dir.to_string_lossy().into_owned();
        Arc::new(AppState::new(config, templates))
    }

    pub fn state(storage_dir: &Path) -> Arc<AppState> {
        let templates = Templates::from_sources(VIEW_SOURCE, EDIT_SOURCE)
            .expect("test templates parse");
        state_with_templates(storage_dir, templates)
    }
}
