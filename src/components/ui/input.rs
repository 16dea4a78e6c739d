use leptos::html;
use leptos::prelude::*;
use tw_merge::tw_merge;
use wasm_bindgen::JsCast;

/// Single-line text input that reports every keystroke and treats Enter and
/// Escape as commit and cancel.
#[component]
pub fn Input(
    #[prop(into, optional)] class: String,
    #[prop(into, optional)] aria_label: String,

    /// Current text; the input mirrors it.
    #[prop(into)] value: Signal<String>,
    #[prop(into)] on_input: Callback<String>,
    #[prop(into, optional)] on_commit: Option<Callback<()>>,
    #[prop(into, optional)] on_cancel: Option<Callback<()>>,

    #[prop(optional)] autofocus: bool,
) -> impl IntoView {
    let merged_class = tw_merge!(
        "placeholder:text-muted-foreground border-input flex h-8 w-full min-w-0 rounded-md border bg-transparent px-2 py-1 text-sm shadow-xs outline-none",
        "focus-visible:border-ring focus-visible:ring-2 focus-visible:ring-ring/50",
        class
    );

    let input_ref: NodeRef<html::Input> = NodeRef::new();

    // `autofocus` only works on page load; focus by hand once mounted.
    // The same panel is mounted twice (sidebar and drawer); only the one on
    // screen takes focus.
    Effect::new(move |_| {
        if autofocus {
            if let Some(el) = input_ref.get() {
                if is_rendered(&el) {
                    let _ = el.focus();
                }
            }
        }
    });

    let handle_input = move |ev: web_sys::Event| {
        if let Some(input) = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
        {
            on_input.run(input.value());
        }
    };

    let handle_keydown = move |ev: web_sys::KeyboardEvent| match ev.key().as_str() {
        "Enter" => {
            ev.prevent_default();
            if let Some(cb) = on_commit {
                cb.run(());
            }
        }
        "Escape" => {
            if let Some(cb) = on_cancel {
                cb.run(());
            }
        }
        _ => {}
    };

    view! {
        <input
            data-name="Input"
            type="text"
            class=merged_class
            aria-label=aria_label
            prop:value=move || value.get()
            on:input=handle_input
            on:keydown=handle_keydown
            node_ref=input_ref
        />
    }
}

/// False when the element or an ancestor is `display: none`.
fn is_rendered(el: &web_sys::HtmlElement) -> bool {
    el.offset_parent().is_some()
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn mount_input(wrapper_style: &str) -> web_sys::HtmlElement {
        let document = web_sys::window().unwrap().document().unwrap();
        let wrapper = document.create_element("div").unwrap();
        wrapper.set_attribute("style", wrapper_style).unwrap();
        let input = document.create_element("input").unwrap();
        wrapper.append_child(&input).unwrap();
        document.body().unwrap().append_child(&wrapper).unwrap();
        input.dyn_into::<web_sys::HtmlElement>().unwrap()
    }

    #[wasm_bindgen_test]
    fn test_hidden_panel_input_is_not_rendered() {
        assert!(!is_rendered(&mount_input("display: none")));
        assert!(is_rendered(&mount_input("display: block")));
    }
}
