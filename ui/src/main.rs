//! Entry point for the Quad campus board web app.

mod components;

fn main() {
    dioxus::logger::initialize_default();
    tracing::info!("Starting Quad");
    dioxus::launch(components::app::App);
}
