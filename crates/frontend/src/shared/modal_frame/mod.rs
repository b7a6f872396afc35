use gloo_timers::future::TimeoutFuture;
use leptos::ev;
use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

/// Overlay plus positioned surface. Content draws its own header and buttons.
#[component]
pub fn ModalFrame(
    /// Overlay click or host-initiated close
    on_close: Callback<()>,
    #[prop(optional)] z_index: Option<i32>,
    /// Extra class for `div.modal`
    #[prop(optional)]
    modal_class: Option<String>,
    /// Extra style for `div.modal`
    #[prop(optional)]
    modal_style: Option<String>,
    children: Children,
) -> impl IntoView {
    let z_index = z_index.unwrap_or(1000);
    let pressed_on_overlay = RwSignal::new(false);

    fn on_overlay_itself(ev: &ev::MouseEvent) -> bool {
        matches!((ev.target(), ev.current_target()), (Some(t), Some(ct)) if t == ct)
    }

    // Press and release must both land on the overlay, otherwise selecting
    // text inside the dialog and releasing outside would close it.
    let handle_mouse_down = move |ev: ev::MouseEvent| {
        pressed_on_overlay.set(on_overlay_itself(&ev));
    };

    let handle_click = move |ev: ev::MouseEvent| {
        let should_close = pressed_on_overlay.get_untracked() && on_overlay_itself(&ev);
        pressed_on_overlay.set(false);
        if should_close {
            // Next tick: the overlay must not be removed during its own click dispatch.
            spawn_local(async move {
                TimeoutFuture::new(0).await;
                on_close.run(());
            });
        }
    };

    let surface_class = match modal_class {
        Some(cls) if !cls.is_empty() => format!("modal {cls}"),
        _ => "modal".to_string(),
    };
    let surface_style = format!(
        "position: relative; {}",
        modal_style.unwrap_or_default()
    );

    view! {
        <div
            class="modal-overlay"
            style=format!("z-index: {z_index};")
            on:mousedown=handle_mouse_down
            on:click=handle_click
        >
            <div
                class=surface_class
                style=surface_style
                on:click=|ev: ev::MouseEvent| ev.stop_propagation()
            >
                {children()}
            </div>
        </div>
    }
}
