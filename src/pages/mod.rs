use leptos::prelude::*;

#[component]
pub fn HomePage() -> impl IntoView {
    view! {
        <div class="flex-1">
            <h1 class="mb-4 text-2xl font-bold">"Dashboard"</h1>
            <p>"Welcome to the Dashboard!"</p>
        </div>
    }
}

/// Landing spot for every nav entry that has no page of its own yet.
#[component]
pub fn EmptyPage() -> impl IntoView {
    view! {
        <div class="flex-1">
            <h1 class="mb-4 text-2xl font-bold">"Coming soon"</h1>
            <p class="text-sm text-muted-foreground">"This section has no content yet."</p>
        </div>
    }
}
