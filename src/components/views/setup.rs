use crate::components::{CatalogSignal, Flow, Icon};
use dioxus::prelude::*;
use songauth::api::CatalogSearch;
use songauth::flow::SearchTicket;

#[cfg(not(target_arch = "wasm32"))]
async fn search_delay_ms(ms: u64) {
    tokio::time::sleep(std::time::Duration::from_millis(ms)).await;
}

#[cfg(target_arch = "wasm32")]
async fn search_delay_ms(ms: u64) {
    gloo_timers::future::TimeoutFuture::new(ms as u32).await;
}

#[component]
pub fn SetupView() -> Element {
    let mut flow = use_context::<Signal<Flow>>();
    let CatalogSignal(catalog) = use_context::<CatalogSignal>();

    let mut search_query = use_signal(String::new);
    let mut in_flight = use_signal(|| None::<SearchTicket>);
    let mut drag_source_index = use_signal(|| None::<usize>);

    // Debounce typing, then run the search; the controller drops stale results.
    // Re-runs once the catalog connects so an early query is not lost.
    use_effect(move || {
        let query = search_query();
        let backend = catalog();
        let Some(ticket) = flow.write().begin_search(&query) else {
            in_flight.set(None);
            return;
        };

        in_flight.set(Some(ticket.clone()));
        let Some(backend) = backend else {
            return;
        };

        spawn(async move {
            search_delay_ms(220).await;
            if !flow.peek().is_current(&ticket) {
                return;
            }

            let outcome = backend.search(ticket.query()).await;
            if flow.write().finish_search(ticket, outcome) {
                in_flight.set(None);
            }
        });
    });

    let on_save = move |_: MouseEvent| {
        if flow.write().complete_setup() {
            search_query.set(String::new());
        }
    };

    let (results, playlist) = {
        let state = flow.read();
        (state.search_results().to_vec(), state.playlist().to_vec())
    };
    // A ticket made stale by a newer search or a reset no longer shows.
    let searching = in_flight
        .read()
        .as_ref()
        .is_some_and(|ticket| flow.read().is_current(ticket));
    let playlist_len = playlist.len();

    rsx! {
        div { class: "search-box",
            Icon { name: "search".to_string(), class: "search-icon".to_string() }
            input {
                class: "search-input",
                r#type: "text",
                placeholder: "Search for a song...",
                value: search_query,
                oninput: move |e| {
                    search_query.set(e.value());
                },
            }
        }

        if searching {
            div { class: "loading-row",
                Icon { name: "loader".to_string(), class: "loading-icon".to_string() }
            }
        } else if !results.is_empty() {
            div { class: "search-results",
                for song in results {
                    {
                        let already_added = playlist.contains(&song);
                        let item_class = if already_added { "search-item added" } else { "search-item" };
                        let icon_name = if already_added { "check" } else { "plus" };
                        rsx! {
                            button {
                                key: "{song}",
                                r#type: "button",
                                class: "{item_class}",
                                onclick: {
                                    let song = song.clone();
                                    move |_| {
                                        flow.write().add_candidate(song.clone());
                                    }
                                },
                                span { "{song}" }
                                Icon { name: icon_name.to_string(), class: "button-icon".to_string() }
                            }
                        }
                    }
                }
            }
        }

        h2 { class: "section-title", "Your Playlist" }
        if playlist.is_empty() {
            p { class: "empty-hint", "Pick songs above. Their order is your secret." }
        }
        div { class: "playlist",
            for (index , song) in playlist.iter().enumerate() {
                {
                    let row_class = if drag_source_index() == Some(index) {
                        "draggable-item dragging"
                    } else {
                        "draggable-item"
                    };
                    let can_move_up = index > 0;
                    let can_move_down = index + 1 < playlist_len;
                    rsx! {
                        div {
                            key: "{index}:{song}",
                            draggable: true,
                            class: "{row_class}",
                            ondragstart: move |_| {
                                drag_source_index.set(Some(index));
                            },
                            ondragend: move |_| {
                                drag_source_index.set(None);
                            },
                            ondragover: move |evt| {
                                evt.prevent_default();
                            },
                            ondrop: move |evt| {
                                evt.prevent_default();
                                let Some(source_index) = drag_source_index() else {
                                    return;
                                };
                                drag_source_index.set(None);
                                flow.write().reorder(source_index, index);
                            },
                            span { class: "order-number", "{index + 1}." }
                            span { class: "song-name", "{song}" }
                            button {
                                r#type: "button",
                                class: "icon-button",
                                title: "Move up",
                                disabled: !can_move_up,
                                onclick: move |_| {
                                    if index > 0 {
                                        flow.write().reorder(index, index - 1);
                                    }
                                },
                                Icon { name: "chevron-up".to_string(), class: "button-icon".to_string() }
                            }
                            button {
                                r#type: "button",
                                class: "icon-button",
                                title: "Move down",
                                disabled: !can_move_down,
                                onclick: move |_| {
                                    flow.write().reorder(index, index + 1);
                                },
                                Icon { name: "chevron-down".to_string(), class: "button-icon".to_string() }
                            }
                            button {
                                r#type: "button",
                                class: "icon-button",
                                title: "Remove",
                                onclick: {
                                    let song = song.clone();
                                    move |_| {
                                        flow.write().remove_candidate(&song);
                                    }
                                },
                                Icon { name: "x".to_string(), class: "button-icon".to_string() }
                            }
                        }
                    }
                }
            }
        }

        button {
            class: "action-button",
            disabled: playlist.is_empty(),
            onclick: on_save,
            "Save Sequence"
        }
    }
}
