use dioxus::prelude::*;

/// Banner flavor. Error and success are mutually exclusive; showing one
/// hides the other.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Error,
    Success,
}

/// The transient banner, if one is showing.
///
/// Each show bumps a generation counter, and a scheduled clear only
/// fires if the generation still matches. Overlapping banners therefore
/// reset the display window instead of being cut short by an older
/// timer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NoticeState {
    current: Option<(NoticeKind, String)>,
    generation: u64,
}

impl NoticeState {
    pub fn current(&self) -> Option<(NoticeKind, &str)> {
        self.current
            .as_ref()
            .map(|(kind, message)| (*kind, message.as_str()))
    }

    fn show(&mut self, kind: NoticeKind, message: String) -> u64 {
        self.generation += 1;
        self.current = Some((kind, message));
        self.generation
    }

    fn clear_if(&mut self, generation: u64) {
        if self.generation == generation {
            self.current = None;
        }
    }

    /// Hide whatever is showing and invalidate scheduled clears. Used
    /// on tab switches.
    pub fn dismiss(&mut self) {
        self.generation += 1;
        self.current = None;
    }
}

pub fn use_notices() -> Signal<NoticeState> {
    use_context::<Signal<NoticeState>>()
}

/// Show an error banner for five seconds.
pub fn show_error(mut notices: Signal<NoticeState>, message: impl Into<String>) {
    let generation = notices.write().show(NoticeKind::Error, message.into());
    schedule_clear(notices, generation, 5_000);
}

/// Show a success banner for three seconds.
pub fn show_success(mut notices: Signal<NoticeState>, message: impl Into<String>) {
    let generation = notices.write().show(NoticeKind::Success, message.into());
    schedule_clear(notices, generation, 3_000);
}

fn schedule_clear(notices: Signal<NoticeState>, generation: u64, delay_ms: u32) {
    #[cfg(target_family = "wasm")]
    {
        let mut notices = notices;
        spawn(async move {
            gloo_timers::future::TimeoutFuture::new(delay_ms).await;
            notices.write().clear_if(generation);
        });
    }
    #[cfg(not(target_family = "wasm"))]
    let _ = (notices, generation, delay_ms);
}

/// The banner strip. Mounted in the auth card and above the dashboard.
#[component]
pub fn NoticeBanners() -> Element {
    let notices = use_notices();
    let current = notices
        .read()
        .current()
        .map(|(kind, message)| (kind, message.to_string()));

    match current {
        Some((NoticeKind::Error, message)) => rsx! {
            div { class: "message error-message", "{message}" }
        },
        Some((NoticeKind::Success, message)) => rsx! {
            div { class: "message success-message", "{message}" }
        },
        None => rsx! {},
    }
}
