#![cfg(target_arch = "wasm32")]
//! Browser front-end: WebGPU fireplace scene with crackling-fire audio.
//!
//! Rendering and audio both start on the first click (browsers gate audio
//! behind a user gesture). Later clicks toggle the crackle audio on and off.

mod audio;
mod dom;
mod frame;
mod input;
mod render;

use audio::CrackleAudio;
use frame::FrameContext;
use hearth_core::SceneState;
use input::{PointerState, TiltState};
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

const SCENE_SEED: u64 = 42;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("hearth-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;

    let canvas_el = document
        .get_element_by_id("hearth-canvas")
        .ok_or_else(|| anyhow::anyhow!("missing #hearth-canvas"))?;
    let canvas: web::HtmlCanvasElement = canvas_el
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;

    // Keep the backing store matched to CSS size * devicePixelRatio.
    dom::sync_canvas_backing_size(&canvas);
    {
        let canvas_resize = canvas.clone();
        let resize_closure = Closure::wrap(Box::new(move || {
            dom::sync_canvas_backing_size(&canvas_resize);
        }) as Box<dyn FnMut()>);
        window
            .add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref())
            .ok();
        resize_closure.forget();
    }

    let pointer = Rc::new(RefCell::new(PointerState::default()));
    let tilt = Rc::new(RefCell::new(TiltState::default()));
    let audio = Rc::new(RefCell::new(CrackleAudio::new()));

    // Pointer drive for the orbit camera.
    {
        let pointer_m = pointer.clone();
        let canvas_m = canvas.clone();
        let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
            let px = input::pointer_canvas_px(&ev, &canvas_m);
            let mut p = pointer_m.borrow_mut();
            p.x = px.x;
            p.y = px.y;
        }) as Box<dyn FnMut(_)>);
        canvas
            .add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref())
            .ok();
        closure.forget();
    }

    // Device tilt takes over from the pointer once events arrive.
    {
        let tilt_m = tilt.clone();
        let closure = Closure::wrap(Box::new(move |ev: web::DeviceOrientationEvent| {
            if let (Some(beta), Some(gamma)) = (ev.beta(), ev.gamma()) {
                let mut t = tilt_m.borrow_mut();
                t.beta_deg = beta as f32;
                t.gamma_deg = gamma as f32;
                t.available = true;
            }
        }) as Box<dyn FnMut(_)>);
        window
            .add_event_listener_with_callback(
                "deviceorientation",
                closure.as_ref().unchecked_ref(),
            )
            .ok();
        closure.forget();
    }

    // First click starts everything; later clicks toggle audio.
    static STARTED: AtomicBool = AtomicBool::new(false);
    {
        let canvas_for_click = canvas.clone();
        let pointer_c = pointer.clone();
        let tilt_c = tilt.clone();
        let audio_c = audio.clone();
        let closure = Closure::wrap(Box::new(move || {
            let now_ms = web::window()
                .and_then(|w| w.performance())
                .map(|p| p.now())
                .unwrap_or(0.0);
            if STARTED.swap(true, Ordering::SeqCst) {
                let mut a = audio_c.borrow_mut();
                if a.is_running() {
                    a.stop();
                } else {
                    a.start(now_ms);
                }
                return;
            }
            log::info!("[gesture] starting systems after click");
            audio_c.borrow_mut().start(now_ms);

            let canvas_for_click = canvas_for_click.clone();
            let pointer_c = pointer_c.clone();
            let tilt_c = tilt_c.clone();
            let audio_c = audio_c.clone();
            spawn_local(async move {
                let scene = match SceneState::build(SCENE_SEED) {
                    Ok(s) => s,
                    Err(e) => {
                        log::error!("scene build error: {}", e);
                        return;
                    }
                };
                let gpu = match frame::init_gpu(&canvas_for_click).await {
                    Some(g) => g,
                    None => return,
                };
                let now = Instant::now();
                let frame_ctx = Rc::new(RefCell::new(FrameContext {
                    scene,
                    canvas: canvas_for_click,
                    pointer: pointer_c,
                    tilt: tilt_c,
                    audio: audio_c,
                    gpu,
                    start_instant: now,
                    last_instant: now,
                }));
                frame::start_loop(frame_ctx);
            });
        }) as Box<dyn FnMut()>);
        canvas
            .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
            .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
        closure.forget();
    }

    Ok(())
}
