use std::sync::Arc;

use adforge_db::Store;
use adforge_pipeline::{
    CompletionWatcher, GenerationDispatcher, GenerationTrigger, ScriptVersionChain, SelectionSet,
};
use tokio_util::sync::CancellationToken;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything is behind an `Arc` or is already `Clone`.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: Arc<ServerConfig>,
    pub dispatcher: Arc<GenerationDispatcher>,
    pub scripts: Arc<ScriptVersionChain>,
    pub selection: Arc<SelectionSet>,
    pub watcher: Arc<CompletionWatcher>,
    /// Cancelled when the server begins shutting down; ends long-poll waits.
    pub shutdown: CancellationToken,
}

impl AppState {
    /// Wire the workflow components around one store and one trigger.
    pub fn new(
        store: Arc<dyn Store>,
        trigger: Arc<dyn GenerationTrigger>,
        config: ServerConfig,
    ) -> Self {
        let dispatcher = Arc::new(GenerationDispatcher::new(Arc::clone(&store), trigger));
        Self {
            scripts: Arc::new(ScriptVersionChain::new(Arc::clone(&dispatcher))),
            selection: Arc::new(SelectionSet::new(Arc::clone(&store))),
            watcher: Arc::new(CompletionWatcher::new(
                Arc::clone(&store),
                config.poll_policy(),
            )),
            dispatcher,
            store,
            config: Arc::new(config),
            shutdown: CancellationToken::new(),
        }
    }
}
