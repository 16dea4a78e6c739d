use crate::components::ui::{
    Alert, AlertDescription, Button, ButtonSize, ButtonVariant, Input, Spinner,
};
use crate::models::{NavId, NavNode};
use crate::state::{AppContext, NavSyncController, Pending};
use crate::tree::drag::{DragItem, DragSession, HoverGeometry, ReorderGestures};
use icons::{Check, ChevronDown, ChevronUp, Eye, EyeOff, GripVertical, Pencil, Settings, X};
use leptos::prelude::*;
use leptos_router::components::A;
use wasm_bindgen::JsCast;

/// Per-panel drag state. Each panel drags independently; the tree is shared.
#[derive(Clone, Copy)]
struct DragCtx {
    session: StoredValue<DragSession>,
    dragging: RwSignal<Option<NavId>>,
}

#[derive(Clone, Copy)]
struct PanelCtx {
    on_navigate: Option<Callback<()>>,
}

/// Sidebar navigation: header with the edit toggle, the tree, and Save/Discard
/// while editing.
#[component]
pub fn NavPanel(#[prop(into, optional)] on_navigate: Option<Callback<()>>) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let sync = expect_context::<NavSyncController>();
    let nav = app_state.0.nav;

    provide_context(DragCtx {
        session: StoredValue::new(DragSession::default()),
        dragging: RwSignal::new(None),
    });
    provide_context(PanelCtx { on_navigate });

    let editing = move || nav.with(|s| s.is_editing());
    let pending = move || nav.with(|s| s.pending());
    let busy = move || pending() != Pending::Idle;

    view! {
        <Show
            when=move || nav.with(|s| s.is_loaded())
            fallback=|| view! { <div class="p-4 text-sm text-muted-foreground">"Loading..."</div> }
        >
            <div class="p-4" data-mode=move || nav.with(|s| s.mode().as_ref().to_string())>
                <div class="mb-4 flex items-center justify-between">
                    <h2 class="text-xl font-bold">"Navigation"</h2>
                    <Button
                        variant=ButtonVariant::Outline
                        size=ButtonSize::Icon
                        attr:aria-label="Edit navigation"
                        attr:aria-pressed=move || editing().to_string()
                        attr:disabled=busy
                        on:click=move |_| nav.update(|s| s.toggle_edit())
                    >
                        <Settings class="size-5" />
                    </Button>
                </div>

                <Show when=move || nav.with(|s| s.last_error().is_some()) fallback=|| ().into_view()>
                    <Alert class="mb-3">
                        <AlertDescription>
                            {move || nav.with(|s| s.last_error().unwrap_or_default().to_string())}
                        </AlertDescription>
                        <button
                            class="shrink-0"
                            aria-label="Dismiss"
                            on:click=move |_| nav.update(|s| s.dismiss_error())
                        >
                            <X class="size-4" />
                        </button>
                    </Alert>
                </Show>

                <NavList parent=None depth=0 />

                <Show when=editing fallback=|| ().into_view()>
                    <div class="mt-4 flex gap-2">
                        <Button attr:disabled=busy on:click=move |_| sync.save()>
                            <Show when=move || pending() == Pending::Saving fallback=|| ().into_view()>
                                <Spinner label="Saving" />
                            </Show>
                            "Save"
                        </Button>
                        <Button
                            variant=ButtonVariant::Secondary
                            attr:disabled=busy
                            on:click=move |_| sync.discard()
                        >
                            <Show when=move || pending() == Pending::Discarding fallback=|| ().into_view()>
                                <Spinner label="Discarding" />
                            </Show>
                            "Discard"
                        </Button>
                    </div>
                </Show>
            </div>
        </Show>
    }
}

/// One sibling list. Recurses through [`NavItemRow`] for expanded children.
#[component]
fn NavList(parent: Option<NavId>, depth: usize) -> impl IntoView {
    let nav = expect_context::<AppContext>().0.nav;

    let parent_for_items = parent.clone();
    let items = Memo::new(move |_| nav.with(|s| s.displayed(parent_for_items.as_ref())));
    let parent_sv = StoredValue::new(parent);

    view! {
        <div data-depth=depth.to_string()>
            <For
                each=move || items.get()
                key=|n: &NavNode| n.id.clone()
                children=move |n: NavNode| {
                    view! {
                        <div class="mb-2">
                            <NavItemRow id=n.id parent=parent_sv.get_value() depth=depth />
                        </div>
                    }
                }
            />
        </div>
    }
}

#[component]
fn NavItemRow(id: NavId, parent: Option<NavId>, depth: usize) -> impl IntoView {
    let nav = expect_context::<AppContext>().0.nav;
    let sync = expect_context::<NavSyncController>();
    let drag = expect_context::<DragCtx>();
    let panel = expect_context::<PanelCtx>();

    let id_sv = StoredValue::new(id);
    let parent_sv = StoredValue::new(parent);

    let node = Memo::new(move |_| nav.with(|s| id_sv.with_value(|id| s.node(id).cloned())));
    let editing = move || nav.with(|s| s.is_editing());
    // False while a save or discard is in flight.
    let can_edit = move || nav.with(|s| s.can_edit());
    let has_children = move || node.with(|n| n.as_ref().is_some_and(|n| n.has_children()));
    let expanded = move || nav.with(|s| id_sv.with_value(|id| s.is_expanded(id)));
    let title_editing = move || {
        nav.with(|s| {
            s.title_draft()
                .is_some_and(|d| id_sv.with_value(|id| &d.id == id))
        })
    };
    let title = move || node.with(|n| n.as_ref().map(|n| n.title.clone()).unwrap_or_default());
    let visible = move || node.with(|n| n.as_ref().map_or(true, |n| n.is_visible()));
    let is_dragging = move || drag.dragging.with(|d| d.as_ref() == Some(&id_sv.get_value()));

    let toggle_expanded = move || nav.update(|s| id_sv.with_value(|id| s.toggle_expanded(id)));

    let current_index = move || {
        nav.with_untracked(|s| {
            parent_sv.with_value(|p| id_sv.with_value(|id| s.sibling_index(p.as_ref(), id)))
        })
    };

    let on_dragstart = move |ev: web_sys::DragEvent| {
        let Some(index) = current_index() else {
            return;
        };
        if let Some(dt) = ev.data_transfer() {
            let _ = dt.set_data("text/plain", &id_sv.get_value().to_string());
            dt.set_effect_allowed("move");
        }
        drag.session.update_value(|s| {
            s.on_drag_start(DragItem {
                id: id_sv.get_value(),
                parent: parent_sv.get_value(),
                index,
            })
        });
        drag.dragging.set(Some(id_sv.get_value()));
    };

    let on_dragover = move |ev: web_sys::DragEvent| {
        ev.prevent_default();
        if let Some(dt) = ev.data_transfer() {
            dt.set_drop_effect("move");
        }
        let Some(index) = current_index() else {
            return;
        };
        let Some(rect) = ev
            .current_target()
            .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
            .map(|el| el.get_bounding_client_rect())
        else {
            return;
        };
        let geometry = HoverGeometry {
            pointer_y: ev.client_y() as f64,
            top: rect.top(),
            height: rect.height(),
        };

        let reorder = drag
            .session
            .try_update_value(|s| {
                parent_sv.with_value(|p| s.on_hover_crossing(p.as_ref(), index, geometry))
            })
            .flatten();
        if let Some(r) = reorder {
            parent_sv.with_value(|p| sync.move_item(p.as_ref(), r.from, r.to));
        }
    };

    let end_drag = move || {
        drag.session.update_value(|s| s.on_drag_end());
        drag.dragging.set(None);
    };

    let row_class = move || {
        let base = "flex-1 rounded border bg-white p-2";
        if is_dragging() {
            format!("{base} opacity-50")
        } else {
            format!("{base} opacity-100")
        }
    };

    let edit_row = move || {
        view! {
            <div class="flex items-center justify-between gap-2">
                <div class="flex min-w-0 flex-1 items-center gap-2">
                    <span
                        class=move || if can_edit() { "cursor-grab text-muted-foreground" } else { "cursor-not-allowed text-muted-foreground opacity-50" }
                        aria-hidden="true"
                    >
                        <GripVertical class="size-4" />
                    </span>
                    {move || {
                        if title_editing() {
                            view! {
                                <Input
                                    class="w-[90%]"
                                    aria_label="Title"
                                    value=Signal::derive(move || {
                                        nav.with(|s| {
                                            s.title_draft().map(|d| d.value.clone()).unwrap_or_default()
                                        })
                                    })
                                    on_input=Callback::new(move |v: String| nav.update(|s| s.set_title_draft(v)))
                                    on_commit=Callback::new(move |_| {
                                        nav.update(|s| {
                                            s.commit_title_edit();
                                        })
                                    })
                                    on_cancel=Callback::new(move |_| nav.update(|s| s.cancel_title_edit()))
                                    autofocus=true
                                />
                            }
                            .into_any()
                        } else {
                            view! {
                                <span class=move || if visible() { "truncate" } else { "truncate text-muted-foreground line-through" }>
                                    {title}
                                </span>
                            }
                            .into_any()
                        }
                    }}
                </div>
                <div class="flex items-center gap-1">
                    <Button
                        variant=ButtonVariant::Ghost
                        size=ButtonSize::Icon
                        attr:aria-label="Toggle Visibility"
                        attr:disabled=move || !can_edit()
                        on:click=move |_| {
                            nav.update(|s| {
                                id_sv.with_value(|id| s.toggle_visibility(id));
                            })
                        }
                    >
                        {move || if visible() {
                            view! { <Eye class="size-5" /> }.into_any()
                        } else {
                            view! { <EyeOff class="size-5" /> }.into_any()
                        }}
                    </Button>
                    {move || if title_editing() {
                        view! {
                            <Button
                                variant=ButtonVariant::Ghost
                                size=ButtonSize::Icon
                                attr:aria-label="Save Title"
                                attr:disabled=move || !can_edit()
                                on:click=move |_| nav.update(|s| {
                                    s.commit_title_edit();
                                })
                            >
                                <Check class="size-5" />
                            </Button>
                        }
                        .into_any()
                    } else {
                        view! {
                            <Button
                                variant=ButtonVariant::Ghost
                                size=ButtonSize::Icon
                                attr:aria-label="Edit Title"
                                attr:disabled=move || !can_edit()
                                on:click=move |_| nav.update(|s| id_sv.with_value(|id| s.begin_title_edit(id)))
                            >
                                <Pencil class="size-5" />
                            </Button>
                        }
                        .into_any()
                    }}
                </div>
            </div>
        }
    };

    let view_row = move || {
        match node.with(|n| n.as_ref().and_then(NavNode::link)) {
            None => view! {
                <span class="cursor-pointer" on:click=move |_| toggle_expanded()>
                    {title}
                </span>
            }
            .into_any(),
            Some(href) => view! {
                <span on:click=move |_| {
                    if let Some(cb) = panel.on_navigate {
                        cb.run(());
                    }
                }>
                    <A href=href>
                        <span>{title}</span>
                    </A>
                </span>
            }
            .into_any(),
        }
    };

    view! {
        <div>
            <div class="flex items-center justify-between">
                <div
                    class=row_class
                    draggable=move || if can_edit() { "true" } else { "false" }
                    on:dragstart=move |ev| {
                        if can_edit() {
                            on_dragstart(ev);
                        }
                    }
                    on:dragover=move |ev| {
                        if can_edit() {
                            on_dragover(ev);
                        }
                    }
                    on:drop=move |ev: web_sys::DragEvent| {
                        ev.prevent_default();
                        end_drag();
                    }
                    on:dragend=move |_| end_drag()
                >
                    {move || if editing() { edit_row().into_any() } else { view_row() }}
                </div>
                <Show when=has_children fallback=|| ().into_view()>
                    <button
                        class="ml-2"
                        aria-label=move || if expanded() { "Collapse" } else { "Expand" }
                        on:click=move |_| toggle_expanded()
                    >
                        {move || if expanded() {
                            view! { <ChevronUp class="size-4" /> }.into_any()
                        } else {
                            view! { <ChevronDown class="size-4" /> }.into_any()
                        }}
                    </button>
                </Show>
            </div>
            {move || {
                if expanded() && has_children() {
                    view! {
                        <div class="pl-4">
                            <NavList parent=Some(id_sv.get_value()) depth=depth + 1 />
                        </div>
                    }
                    .into_any()
                } else {
                    ().into_any()
                }
            }}
        </div>
    }
}
