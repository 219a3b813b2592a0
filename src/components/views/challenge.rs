use crate::components::{Flow, Icon};
use dioxus::prelude::*;
use songauth::flow::{Outcome, Phase};

#[component]
pub fn ChallengeView() -> Element {
    let mut flow = use_context::<Signal<Flow>>();

    let (order, attempt, status, phase, attempts_remaining, can_select) = {
        let state = flow.read();
        (
            state.presentation_order().to_vec(),
            state.attempt().to_vec(),
            state.status(),
            state.phase(),
            state.attempts_remaining(),
            state.accepts_selection(),
        )
    };
    let resolved = phase.is_resolved();
    let status_class = match phase {
        Phase::Resolved(Outcome::Success) => "status-message success",
        Phase::Resolved(Outcome::Locked) => "status-message locked",
        _ => "status-message",
    };
    let status_text = status.map(|status| status.to_string());
    let can_verify = !resolved && !attempt.is_empty();

    rsx! {
        if let Some(status) = status_text {
            p { class: "{status_class}", "{status}" }
        }

        h3 { class: "section-title", "Select Songs in the Correct Order" }
        if !resolved {
            p { class: "page-subtitle", "Attempts left: {attempts_remaining}" }
        }

        div { class: "grid",
            for (index , song) in order.iter().enumerate() {
                {
                    let picked = attempt.iter().filter(|pick| *pick == song).count();
                    let button_class = match (picked > 0, can_select) {
                        (true, _) => "song-button selected",
                        (false, true) => "song-button",
                        (false, false) => "song-button disabled-button",
                    };
                    rsx! {
                        button {
                            key: "{index}",
                            r#type: "button",
                            class: "{button_class}",
                            disabled: !can_select,
                            onclick: {
                                let song = song.clone();
                                move |_| {
                                    flow.write().select_candidate(&song);
                                }
                            },
                            span { "{song}" }
                            if picked > 1 {
                                span { class: "order-number", "x{picked}" }
                            }
                        }
                    }
                }
            }
        }

        if !attempt.is_empty() {
            ol { class: "attempt-list",
                for (index , pick) in attempt.iter().enumerate() {
                    li { key: "{index}", "{pick}" }
                }
            }
        }

        div { class: "button-row",
            button {
                class: "action-button",
                disabled: !can_verify,
                onclick: move |_| {
                    flow.write().verify();
                },
                Icon { name: "check".to_string(), class: "button-icon".to_string() }
                "Authenticate"
            }
            button {
                class: "secondary-button",
                disabled: resolved || attempt.is_empty(),
                onclick: move |_| {
                    flow.write().clear_attempt();
                },
                Icon { name: "x".to_string(), class: "button-icon".to_string() }
                "Clear"
            }
        }
    }
}
