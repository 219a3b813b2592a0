use crate::components::{Flow, Icon};
use dioxus::prelude::*;

#[component]
pub fn LoginView() -> Element {
    let mut flow = use_context::<Signal<Flow>>();
    let mut username = use_signal(String::new);
    let mut password = use_signal(String::new);

    let on_login = move |_: MouseEvent| {
        let accepted = flow.write().login(&username(), &password());
        if accepted {
            password.set(String::new());
        }
    };

    let status = flow.read().status().map(|status| status.to_string());

    rsx! {
        if let Some(status) = status {
            p { class: "status-message", "{status}" }
        }

        div { class: "login-form",
            label { class: "field-label", "Username" }
            input {
                class: "text-input",
                r#type: "text",
                autocomplete: "username",
                value: username,
                oninput: move |e| username.set(e.value()),
            }
            label { class: "field-label", "Password" }
            input {
                class: "text-input",
                r#type: "password",
                autocomplete: "current-password",
                value: password,
                oninput: move |e| password.set(e.value()),
            }
            button { class: "action-button", onclick: on_login,
                Icon { name: "lock".to_string(), class: "button-icon".to_string() }
                "Continue"
            }
        }
    }
}
