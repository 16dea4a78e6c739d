use crate::nav::NavPanel;
use crate::pages::{EmptyPage, HomePage};
use crate::state::{AppContext, AppState, NavSyncController};
use icons::Menu;
use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

#[component]
pub fn App() -> impl IntoView {
    let app_state = AppContext(AppState::new());
    let sync = NavSyncController::new(&app_state);
    provide_context(app_state);
    provide_context(sync);

    // One load per app mount; desktop and mobile panels share the result.
    sync.load();

    // IMPORTANT:
    // - Leptos CSR requires the `csr` feature on `leptos`.
    // - router hooks (and <A>) require a <Router> context.
    view! {
        <Router>
            <div class="flex min-h-screen text-[#404040] antialiased">
                <aside class="hidden w-[400px] border-r py-4 md:block">
                    <NavPanel />
                </aside>
                <main class="flex-1 p-4">
                    <Routes fallback=|| view! { <div class="px-4 py-8 text-xs text-muted-foreground">"Not found"</div> }>
                        <Route path=path!("") view=HomePage />
                        <Route path=path!("empty") view=EmptyPage />
                    </Routes>
                </main>
                <MobileNav />
            </div>
        </Router>
    }
}

/// Hamburger button plus a full-screen drawer holding the same nav panel.
#[component]
fn MobileNav() -> impl IntoView {
    let open = expect_context::<AppContext>().0.mobile_nav_open;

    // The drawer is always mounted; only its classes change.
    let overlay_class = move || {
        let base = "fixed inset-0 z-50 flex justify-end bg-gray-800/75 transition-opacity duration-300";
        if open.get() {
            format!("{base} opacity-100")
        } else {
            format!("{base} opacity-0 pointer-events-none")
        }
    };
    let drawer_class = move || {
        let base = "h-full w-full transform bg-white pt-4 transition-transform duration-300";
        if open.get() {
            format!("{base} translate-x-0")
        } else {
            format!("{base} translate-x-full")
        }
    };

    view! {
        <div class="p-4 md:hidden">
            <div class="flex justify-end p-4">
                <button class="p-2" aria-label="Open Menu" on:click=move |_| open.set(true)>
                    <Menu class="size-6" />
                </button>
            </div>
            <div class=overlay_class>
                <div class=drawer_class>
                    <NavPanel on_navigate=Callback::new(move |_| open.set(false)) />
                </div>
            </div>
        </div>
    }
}
