//! Navigation menu: groups of registers, each opening a tab.

use crate::layout::global_context::AppGlobalContext;
use crate::layout::tabs::tab_label_for_key;
use crate::shared::icons::icon;
use leptos::prelude::*;

#[derive(Clone, Debug, PartialEq)]
struct MenuGroup {
    id: &'static str,
    label: &'static str,
    items: Vec<(&'static str, &'static str)>, // (tab key, icon)
}

fn menu_groups() -> Vec<MenuGroup> {
    vec![
        MenuGroup {
            id: "operations",
            label: "Operations",
            items: vec![
                ("a001_ore_intake", "ore"),
                ("a002_gold_payout", "payout"),
                ("a006_shaft_inspection", "shaft"),
            ],
        },
        MenuGroup {
            id: "compliance",
            label: "Compliance",
            items: vec![("a003_incident", "incident")],
        },
        MenuGroup {
            id: "registry",
            label: "Registry",
            items: vec![
                ("a004_company", "company"),
                ("a005_security_company", "shield"),
                ("a007_section", "map"),
            ],
        },
    ]
}

#[component]
pub fn Sidebar() -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");

    // All groups start expanded; the menu is short.
    let collapsed = RwSignal::new(Vec::<&'static str>::new());

    view! {
        <nav class="app-sidebar__content">
            {menu_groups()
                .into_iter()
                .map(|group| {
                    let gid = group.id;
                    let is_expanded = move || collapsed.with(|c| !c.contains(&gid));
                    view! {
                        <div class="app-sidebar__group">
                            <div
                                class="app-sidebar__group-title"
                                on:click=move |_| {
                                    collapsed.update(|c| {
                                        if let Some(pos) = c.iter().position(|x| *x == gid) {
                                            c.remove(pos);
                                        } else {
                                            c.push(gid);
                                        }
                                    })
                                }
                            >
                                <span>{group.label}</span>
                                <div
                                    class="app-sidebar__chevron"
                                    class:app-sidebar__chevron--expanded=is_expanded
                                >
                                    {icon("chevron-right")}
                                </div>
                            </div>
                            <Show when=is_expanded>
                                <div class="app-sidebar__children">
                                    {group
                                        .items
                                        .iter()
                                        .map(|&(key, icon_name)| {
                                            let label = tab_label_for_key(key);
                                            view! {
                                                <div
                                                    class="app-sidebar__item"
                                                    class:app-sidebar__item--active=move || {
                                                        ctx.active.with(|a| a.as_deref() == Some(key))
                                                    }
                                                    on:click=move |_| ctx.open_tab(key, label)
                                                >
                                                    <div class="app-sidebar__item-content">
                                                        {icon(icon_name)}
                                                        <span>{label}</span>
                                                    </div>
                                                </div>
                                            }
                                        })
                                        .collect_view()}
                                </div>
                            </Show>
                        </div>
                    }
                })
                .collect_view()}
        </nav>
    }
}
