use crate::api::ApiResult;
use crate::models::{NavId, NavMove, NavNode};
use crate::tree;
use leptos::logging::{error, log};
use std::collections::BTreeSet;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum::AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub(crate) enum EditMode {
    #[default]
    Viewing,
    Editing,
}

/// The one node whose title is being typed, if any.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct TitleDraft {
    pub id: NavId,
    pub value: String,
}

/// Network work the store is waiting on. Only one save/discard at a time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum Pending {
    #[default]
    Idle,
    Saving,
    Discarding,
}

/// State container for the nav panel.
///
/// Every user action and every network completion is a method here; the
/// components only read the store and call these.
#[derive(Clone, Debug, Default)]
pub(crate) struct NavStore {
    tree: Vec<NavNode>,
    mode: EditMode,

    /// Set once the first load settles, either way. Gates rendering.
    loaded: bool,

    title_draft: Option<TitleDraft>,
    expanded: BTreeSet<NavId>,
    pending: Pending,
    last_error: Option<String>,

    /// Load guard: completions older than the latest request are ignored.
    load_seq: u64,
}

impl NavStore {
    #[cfg(test)]
    pub fn tree(&self) -> &[NavNode] {
        &self.tree
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn is_editing(&self) -> bool {
        self.mode == EditMode::Editing
    }

    /// Edits are accepted only in edit mode with no save or discard in flight.
    pub fn can_edit(&self) -> bool {
        self.is_editing() && self.pending == Pending::Idle
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn pending(&self) -> Pending {
        self.pending
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn title_draft(&self) -> Option<&TitleDraft> {
        self.title_draft.as_ref()
    }

    pub fn is_expanded(&self, id: &NavId) -> bool {
        self.expanded.contains(id)
    }

    pub fn node(&self, id: &NavId) -> Option<&NavNode> {
        tree::find_node(&self.tree, id)
    }

    fn siblings(&self, parent: Option<&NavId>) -> &[NavNode] {
        match parent {
            None => &self.tree,
            Some(id) => self.node(id).map(|n| &n.children[..]).unwrap_or_default(),
        }
    }

    /// Sibling list under `parent` (top level for `None`), filtered for the
    /// current mode.
    pub fn displayed(&self, parent: Option<&NavId>) -> Vec<NavNode> {
        tree::displayed(self.siblings(parent), self.is_editing())
            .into_iter()
            .cloned()
            .collect()
    }

    /// Position of `id` in the full (unfiltered) sibling list.
    pub fn sibling_index(&self, parent: Option<&NavId>, id: &NavId) -> Option<usize> {
        self.siblings(parent).iter().position(|n| &n.id == id)
    }

    /// Settings button. Leaving this way keeps local edits in memory without
    /// saving them.
    pub fn toggle_edit(&mut self) {
        if self.pending != Pending::Idle {
            return;
        }
        self.mode = match self.mode {
            EditMode::Viewing => EditMode::Editing,
            EditMode::Editing => EditMode::Viewing,
        };
        self.title_draft = None;
    }

    pub fn toggle_expanded(&mut self, id: &NavId) {
        if !self.expanded.remove(id) {
            self.expanded.insert(id.clone());
        }
    }

    pub fn dismiss_error(&mut self) {
        self.last_error = None;
    }

    pub fn update_title(&mut self, id: &NavId, title: &str) -> bool {
        self.can_edit() && tree::update_title(&mut self.tree, id, title)
    }

    pub fn update_visibility(&mut self, id: &NavId, visible: bool) -> bool {
        self.can_edit() && tree::update_visibility(&mut self.tree, id, visible)
    }

    pub fn toggle_visibility(&mut self, id: &NavId) -> bool {
        match self.node(id).map(NavNode::is_visible) {
            Some(visible) => self.update_visibility(id, !visible),
            None => false,
        }
    }

    /// Open the rename input for `id`. Any other open draft is dropped.
    pub fn begin_title_edit(&mut self, id: &NavId) {
        if !self.can_edit() {
            return;
        }
        if let Some(n) = self.node(id) {
            self.title_draft = Some(TitleDraft {
                id: id.clone(),
                value: n.title.clone(),
            });
        }
    }

    pub fn set_title_draft(&mut self, value: String) {
        if let Some(d) = self.title_draft.as_mut() {
            d.value = value;
        }
    }

    pub fn cancel_title_edit(&mut self) {
        self.title_draft = None;
    }

    pub fn commit_title_edit(&mut self) -> bool {
        match self.title_draft.take() {
            Some(d) => self.update_title(&d.id, &d.value),
            None => false,
        }
    }

    /// Reorder inside the sibling list owned by `parent`. The local tree is
    /// updated before this returns; the returned move is what to report.
    pub fn move_item(&mut self, parent: Option<&NavId>, from: usize, to: usize) -> Option<NavMove> {
        if !self.can_edit() || from == to {
            return None;
        }
        let siblings = tree::siblings_mut(&mut self.tree, parent)?;
        if from >= siblings.len() || to >= siblings.len() {
            return None;
        }
        let id = siblings[from].id.clone();
        let next = tree::move_item(siblings, from, to);
        *siblings = next;
        Some(NavMove { id, from, to })
    }

    pub fn begin_load(&mut self) -> u64 {
        self.load_seq += 1;
        self.load_seq
    }

    /// Apply a load result. On failure the current tree is kept.
    pub fn finish_load(&mut self, seq: u64, result: ApiResult<Vec<NavNode>>) {
        if seq != self.load_seq {
            log!("Dropping stale nav load #{seq}");
            return;
        }
        self.loaded = true;
        match result {
            Ok(tree) => {
                self.tree = tree;
                self.last_error = None;
            }
            Err(e) => {
                error!("Error fetching nav: {e}");
                self.last_error = Some(format!("Could not load navigation: {e}"));
            }
        }
    }

    /// Start a save. Returns the tree to send, with top-level `order`
    /// rewritten from position, or `None` when nothing can be saved now.
    pub fn begin_save(&mut self) -> Option<Vec<NavNode>> {
        if !self.can_edit() {
            return None;
        }
        if self.title_draft.is_some() {
            self.commit_title_edit();
        }
        self.tree = tree::stamp_order(&self.tree);
        self.pending = Pending::Saving;
        Some(self.tree.clone())
    }

    /// Edit mode ends whether or not the backend accepted the tree.
    pub fn finish_save(&mut self, result: ApiResult<()>) {
        self.pending = Pending::Idle;
        self.mode = EditMode::Viewing;
        self.title_draft = None;
        match result {
            Ok(()) => {
                log!("Nav saved");
                self.last_error = None;
            }
            Err(e) => {
                error!("Error saving nav: {e}");
                self.last_error = Some(format!("Could not save navigation: {e}"));
            }
        }
    }

    pub fn begin_discard(&mut self) -> Option<u64> {
        if !self.can_edit() {
            return None;
        }
        self.pending = Pending::Discarding;
        Some(self.begin_load())
    }

    /// Replace local edits with the backend copy. If the reload fails the
    /// edits stay and edit mode stays open.
    pub fn finish_discard(&mut self, seq: u64, result: ApiResult<Vec<NavNode>>) {
        self.pending = Pending::Idle;
        if seq != self.load_seq {
            log!("Dropping stale nav discard #{seq}");
            return;
        }
        self.loaded = true;
        match result {
            Ok(tree) => {
                self.tree = tree;
                self.mode = EditMode::Viewing;
                self.title_draft = None;
                self.last_error = None;
            }
            Err(e) => {
                error!("Error discarding changes: {e}");
                self.last_error = Some(format!("Could not reload navigation: {e}"));
            }
        }
    }
}
