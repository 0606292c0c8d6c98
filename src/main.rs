//! Escape Ring entry point
//!
//! Handles platform-specific initialization and drives the frame chain.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::HtmlCanvasElement;

    use escape_ring::audio::AudioManager;
    use escape_ring::canvas_px_for_window;
    use escape_ring::renderer::{RenderState, build_frame};
    use escape_ring::settings::Settings;
    use escape_ring::sim::Session;

    /// How long the "copied" note stays visible
    const COPIED_MSG_MS: i32 = 1400;

    // JS binding for the clipboard
    #[wasm_bindgen(inline_js = "
        export function copy_to_clipboard(text) {
            if (navigator.clipboard) {
                navigator.clipboard.writeText(text).catch(e => console.error('Copy failed:', e));
            }
        }
    ")]
    extern "C" {
        fn copy_to_clipboard(text: &str);
    }

    /// Application instance holding all state
    struct App {
        session: Session,
        audio: AudioManager,
        settings: Settings,
        render_state: Option<RenderState>,
        canvas: HtmlCanvasElement,
    }

    impl App {
        /// Run one frame step and draw it; returns whether to schedule another
        fn frame(&mut self) -> bool {
            let Self {
                session,
                audio,
                settings,
                render_state,
                ..
            } = self;

            let (_, schedule_next) = session.frame(audio);

            if let Some(render_state) = render_state {
                let vertices = build_frame(
                    &session.sim,
                    settings,
                    render_state.size,
                    &mut rand::rng(),
                );
                match render_state.render(&vertices) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }

            schedule_next
        }

        /// Resize canvas and boundary to the current window
        fn fit_to_window(&mut self) {
            let px = window_canvas_px();
            self.canvas.set_width(px);
            self.canvas.set_height(px);
            self.session.resize(px as f32, px as f32);
            if let Some(render_state) = &mut self.render_state {
                render_state.resize(px, px);
            }
        }
    }

    /// Canvas side for the current window size, in whole pixels
    fn window_canvas_px() -> u32 {
        let window = web_sys::window().unwrap();
        let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(800.0);
        let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(800.0);
        canvas_px_for_window(w as f32, h as f32)
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Escape Ring starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let px = window_canvas_px();
        let side = px as f32;
        canvas.set_width(px);
        canvas.set_height(px);

        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        let app = Rc::new(RefCell::new(App {
            session: Session::new(seed, side, side),
            audio: AudioManager::new(&settings),
            settings,
            render_state: None,
            canvas: canvas.clone(),
        }));

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => {
                let adapter = instance
                    .request_adapter(&wgpu::RequestAdapterOptions {
                        power_preference: wgpu::PowerPreference::HighPerformance,
                        compatible_surface: Some(&surface),
                        force_fallback_adapter: false,
                    })
                    .await;
                match adapter {
                    Ok(adapter) => {
                        log::info!("Using adapter: {:?}", adapter.get_info().name);
                        match RenderState::new(surface, &adapter, px, px).await
                        {
                            Ok(render_state) => app.borrow_mut().render_state = Some(render_state),
                            Err(e) => log::warn!("No GPU device, running without rendering: {}", e),
                        }
                    }
                    Err(e) => log::warn!("No GPU adapter, running without rendering: {}", e),
                }
            }
            Err(e) => log::warn!("Failed to create surface, running without rendering: {}", e),
        }

        setup_restart_button(app.clone());
        setup_share_button();
        setup_resize(app.clone());
        setup_keyboard(app.clone());

        // Session starts Running: kick off the frame chain
        request_animation_frame(app);

        log::info!("Escape Ring running!");
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |_time: f64| {
            frame_loop(app);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame_loop(app: Rc<RefCell<App>>) {
        let schedule_next = app.borrow_mut().frame();
        if schedule_next {
            request_animation_frame(app);
        }
    }

    fn setup_restart_button(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let needs_kick = {
                    let mut a = app.borrow_mut();
                    a.audio.resume();
                    a.session.restart()
                };
                if needs_kick {
                    request_animation_frame(app.clone());
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Copy the page URL and flash the "copied" note
    fn copy_share_link() {
        let window = web_sys::window().unwrap();
        let Ok(href) = window.location().href() else {
            log::warn!("No page URL to share");
            return;
        };
        copy_to_clipboard(&href);

        let Some(msg) = window.document().and_then(|d| d.get_element_by_id("copiedMsg")) else {
            return;
        };
        let _ = msg.set_attribute("style", "display:inline");
        let hide = Closure::once(move || {
            let _ = msg.set_attribute("style", "display:none");
        });
        let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            hide.as_ref().unchecked_ref(),
            COPIED_MSG_MS,
        );
        hide.forget();
    }

    fn setup_share_button() {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        if let Some(btn) = document.get_element_by_id("share-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                copy_share_link();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// M toggles mute, T toggles trails; both persist
    fn setup_keyboard(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
            let mut a = app.borrow_mut();
            match event.key().as_str() {
                "m" | "M" => {
                    a.settings.muted = !a.settings.muted;
                    log::info!("Muted: {}", a.settings.muted);
                }
                "t" | "T" => {
                    a.settings.trails = !a.settings.trails;
                    log::info!("Trails: {}", a.settings.trails);
                }
                _ => return,
            }
            let App {
                audio, settings, ..
            } = &mut *a;
            audio.apply_settings(settings);
            settings.save();
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_resize(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            app.borrow_mut().fit_to_window();
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_app::run().await;
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Native: headless run of a seeded session, logging population statistics
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use escape_ring::sim::Session;

    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0)
        });
    let frames = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(3600);

    log::info!("Escape Ring (native, headless) seed {} for {} frames", seed, frames);

    let side = escape_ring::canvas_px_for_window(800.0, 800.0) as f32;
    let mut session = Session::new(seed, side, side);
    let (mut escapes, mut bounces, mut dropped, mut peak) = (0usize, 0usize, 0usize, 0usize);

    while session.frame_count < frames {
        let (report, schedule_next) = session.frame(&mut ());
        escapes += report.escaped;
        bounces += report.bounces;
        dropped += report.dropped;
        peak = peak.max(report.population);

        if session.frame_count % 600 == 0 {
            log::info!(
                "frame {}: {} balls, {} escapes, {} bounces",
                session.frame_count,
                report.population,
                escapes,
                bounces
            );
        }
        if !schedule_next {
            break;
        }
    }

    println!(
        "seed {}: {} frames, final population {}, peak {}, {} escapes, {} bounces, {} spawns dropped at cap",
        seed,
        session.frame_count,
        session.sim.balls.len(),
        peak,
        escapes,
        bounces,
        dropped
    );
}
