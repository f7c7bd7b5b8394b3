use leptos::*;
use leptos_meta::*;
use window_runtime::{
    profiles::profile_catalog, use_window_runtime, OpenWindowRequest, Taskbar, WindowLayer,
    WindowRecord, WindowRuntimeProvider,
};

#[component]
pub fn SiteApp() -> impl IntoView {
    provide_meta_context();

    view! {
        <Title text="Window Desk" />
        <Meta name="description" content="Floating windows with a taskbar, in the browser." />

        <main class="site-root">
            <DesktopEntry />
        </main>
    }
}

#[component]
pub fn DesktopEntry() -> impl IntoView {
    let render_content = Callback::new(|record: WindowRecord| {
        view! { <DemoPanel record=record /> }.into_view()
    });

    view! {
        <WindowRuntimeProvider restore_session=true>
            <div class="desktop">
                <Launcher />
                <WindowLayer render_content=render_content />
            </div>
            <Taskbar />
        </WindowRuntimeProvider>
    }
}

#[component]
fn Launcher() -> impl IntoView {
    let runtime = use_window_runtime();

    view! {
        <ul class="desktop-launcher" aria-label="Open a window">
            {profile_catalog()
                .iter()
                .map(|profile| {
                    let kind = profile.kind.clone();
                    view! {
                        <li>
                            <button
                                class="desktop-launcher-item"
                                data-icon=profile.icon.clone()
                                on:click=move |_| {
                                    let request = OpenWindowRequest::new(kind.clone());
                                    runtime.open_window_with_persisted(request);
                                }
                            >
                                {profile.label.clone()}
                            </button>
                        </li>
                    }
                })
                .collect_view()}
        </ul>
    }
}

#[component]
fn DemoPanel(record: WindowRecord) -> impl IntoView {
    let lines = create_rw_signal(1usize);
    let heading = format!("{} window #{}", record.title, record.id.0);
    let fit_content = record.config.fit_content;

    view! {
        <article class="demo-panel">
            <p>{heading}</p>
            <Show when=move || fit_content fallback=|| ()>
                <button on:click=move |_| lines.update(|n| *n += 1)>"Add line"</button>
                <For
                    each=move || 0..lines.get()
                    key=|line| *line
                    children=|line| view! { <p>{format!("Line {}", line + 1)}</p> }
                />
            </Show>
        </article>
    }
}
