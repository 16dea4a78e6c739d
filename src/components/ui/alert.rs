use leptos::prelude::*;
use leptos_ui::clx;

mod components {
    use super::*;
    clx! {Alert, div, "relative flex w-full items-start justify-between gap-2 rounded-lg border border-red-300 bg-red-50 px-3 py-2 text-sm text-red-700"}
    clx! {AlertDescription, p, "min-w-0 flex-1 text-xs leading-relaxed"}
}

pub use components::*;
