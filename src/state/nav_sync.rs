use crate::models::NavId;
use crate::state::{AppContext, NavStore};
use leptos::logging::log;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// Runs the network side of nav editing against the shared [`NavStore`].
///
/// Responsibilities:
/// - initial load and discard reloads
/// - save of the whole tree
/// - best-effort move tracking, always after the local reorder
///
/// Completions that arrive after the store is gone are dropped; requests are
/// never cancelled.
#[derive(Clone, Copy)]
pub(crate) struct NavSyncController {
    nav: RwSignal<NavStore>,
    api_client: RwSignal<crate::api::NavApiClient>,
}

impl NavSyncController {
    pub fn new(app_state: &AppContext) -> Self {
        Self {
            nav: app_state.0.nav,
            api_client: app_state.0.api_client,
        }
    }

    pub fn load(&self) {
        let Some(seq) = self.nav.try_update(|s| s.begin_load()) else {
            return;
        };
        let api_client = self.api_client.get_untracked();
        let nav = self.nav;
        spawn_local(async move {
            let result = api_client.load_tree().await;
            nav.try_update(|s| s.finish_load(seq, result));
        });
    }

    pub fn save(&self) {
        let Some(tree) = self.nav.try_update(|s| s.begin_save()).flatten() else {
            return;
        };
        log!("Saving nav ({} top-level entries)", tree.len());
        let api_client = self.api_client.get_untracked();
        let nav = self.nav;
        spawn_local(async move {
            let result = api_client.save_tree(&tree).await;
            nav.try_update(|s| s.finish_save(result));
        });
    }

    pub fn discard(&self) {
        let Some(seq) = self.nav.try_update(|s| s.begin_discard()).flatten() else {
            return;
        };
        let api_client = self.api_client.get_untracked();
        let nav = self.nav;
        spawn_local(async move {
            let result = api_client.load_tree().await;
            nav.try_update(|s| s.finish_discard(seq, result));
        });
    }

    /// Reorder locally, then report it. The report cannot change the tree.
    pub fn move_item(&self, parent: Option<&NavId>, from: usize, to: usize) {
        let Some(mv) = self
            .nav
            .try_update(|s| s.move_item(parent, from, to))
            .flatten()
        else {
            return;
        };
        let api_client = self.api_client.get_untracked();
        spawn_local(async move {
            api_client.track_move(&mv).await;
        });
    }
}
