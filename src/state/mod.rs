mod nav_store;
mod nav_sync;

pub(crate) use nav_store::{NavStore, Pending};
pub(crate) use nav_sync::NavSyncController;

use crate::api::NavApiClient;
use leptos::prelude::*;

#[derive(Clone)]
pub(crate) struct AppState {
    pub api_client: RwSignal<NavApiClient>,

    /// Nav tree plus edit-mode state. Owned here, shared by every nav panel.
    pub nav: RwSignal<NavStore>,

    /// Mobile drawer.
    pub mobile_nav_open: RwSignal<bool>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            api_client: RwSignal::new(NavApiClient::from_env()),
            nav: RwSignal::new(NavStore::default()),
            mobile_nav_open: RwSignal::new(false),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
pub(crate) struct AppContext(pub AppState);
