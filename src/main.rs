use dioxus::prelude::*;

mod components;

use components::AppShell;

const APP_CSS: Asset = asset!("/assets/styling/app.css");

fn main() {
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    rsx! {
        document::Meta { name: "theme-color", content: "#a38449" }
        document::Meta { name: "mobile-web-app-capable", content: "yes" }
        document::Meta { name: "apple-mobile-web-app-title", content: "SongAuth" }
        document::Title { "SongAuth" }

        document::Stylesheet { href: APP_CSS }

        AppShell {}
    }
}
