use crate::layout::global_context::{AppGlobalContext, Tab as TabData};
use leptos::ev;
use leptos::prelude::*;

/// Tab strip over the tab pages.
#[component]
pub fn Center(children: Children) -> impl IntoView {
    let tabs_store = leptos::context::use_context::<AppGlobalContext>()
        .expect("AppGlobalContext context not found");

    view! {
        <div data-zone="center" class="app-tabs">
            <div class="tabs__bar">
                <For
                    each=move || tabs_store.opened.get()
                    key=|tab| tab.key.clone()
                    children=move |tab| view! { <TabHandle tab=tab /> }
                />
                <Show when=move || tabs_store.opened.with(|tabs| tabs.is_empty())>
                    <span class="tabs__hint">"Pick a register in the menu"</span>
                </Show>
            </div>
            <div class="tabs__content">{children()}</div>
        </div>
    }
}

#[component]
fn TabHandle(tab: TabData) -> impl IntoView {
    let tabs_store = leptos::context::use_context::<AppGlobalContext>()
        .expect("AppGlobalContext context not found");

    let key_for_active = tab.key.clone();
    let is_active =
        Memo::new(move |_| tabs_store.active.get().as_deref() == Some(&key_for_active));

    let key_for_click = tab.key.clone();
    let key_for_close = tab.key.clone();
    let on_close = move |ev: ev::MouseEvent| {
        ev.stop_propagation();
        tabs_store.close_tab(&key_for_close);
    };

    view! {
        <div
            class="tabs__handle"
            class:tabs__handle--active=is_active
            on:click=move |_| tabs_store.activate_tab(&key_for_click)
        >
            <span>{tab.title}</span>
            <button class="tabs__close" title="Close" on:click=on_close>"×"</button>
        </div>
    }
}
