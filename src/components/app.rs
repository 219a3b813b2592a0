use crate::components::views::{ChallengeView, LoginView, SetupView};
use crate::components::Icon;
use dioxus::prelude::*;
use songauth::api::CatalogBackend;
use songauth::config::{FlowConfig, SpotifyCredentials};
use songauth::db::{open_store_or_memory, SecretStore};
use songauth::flow::{FlowController, Phase};

/// The controller as held by the UI: the store is picked at runtime.
pub type Flow = FlowController<Box<dyn SecretStore>>;

/// Catalog for this session. `None` while the token handshake is pending.
#[derive(Clone, Copy)]
pub struct CatalogSignal(pub Signal<Option<CatalogBackend>>);

#[component]
pub fn AppShell() -> Element {
    let flow = use_signal(|| FlowController::restore(open_store_or_memory(), FlowConfig::load()));
    let catalog = use_signal(|| None::<CatalogBackend>);

    use_context_provider(|| flow);
    use_context_provider(|| CatalogSignal(catalog));

    // Acquire the catalog token once on mount
    {
        let mut catalog = catalog.clone();
        use_effect(move || {
            let config = flow.peek().config().clone();
            spawn(async move {
                let backend = CatalogBackend::connect(SpotifyCredentials::load(), &config).await;
                tracing::info!(catalog = backend.label(), "catalog ready");
                catalog.set(Some(backend));
            });
        });
    }

    let on_reset = {
        let mut flow = flow.clone();
        move |_: MouseEvent| {
            flow.write().reset();
        }
    };

    let phase = flow.read().phase();
    let title = phase.title();
    let catalog_label = catalog()
        .as_ref()
        .map(|backend| backend.label())
        .unwrap_or("Connecting...");

    rsx! {
        div { class: "container",
            header { class: "page-header",
                Icon { name: "lock".to_string(), class: "header-icon".to_string() }
                h1 { class: "page-title", "{title}" }
            }

            {
                match phase {
                    Phase::Setup => rsx! {
                        p { class: "page-subtitle", "Search: {catalog_label}" }
                        SetupView {}
                    },
                    Phase::Login => rsx! {
                        LoginView {}
                    },
                    Phase::Challenge | Phase::Resolved(_) => rsx! {
                        ChallengeView {}
                    },
                }
            }

            button { class: "reset-button", onclick: on_reset,
                Icon { name: "trash".to_string(), class: "button-icon".to_string() }
                "Reset"
            }
        }
    }
}
