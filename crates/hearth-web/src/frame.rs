//! Per-frame driver: gathers input, steps the scene, fires pending audio and
//! renders, all from a requestAnimationFrame loop.

use crate::audio::CrackleAudio;
use crate::input::{self, PointerState, TiltState};
use crate::render::GpuState;
use hearth_core::{ControlInput, SceneState};
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext {
    pub scene: SceneState,
    pub canvas: web::HtmlCanvasElement,
    pub pointer: Rc<RefCell<PointerState>>,
    pub tilt: Rc<RefCell<TiltState>>,
    pub audio: Rc<RefCell<CrackleAudio>>,
    pub gpu: GpuState<'static>,
    pub start_instant: Instant,
    pub last_instant: Instant,
}

impl FrameContext {
    pub fn frame(&mut self) {
        let now = Instant::now();
        let t = (now - self.start_instant).as_secs_f32();
        let dt = (now - self.last_instant).as_secs_f32();
        self.last_instant = now;

        let input = {
            let pointer = self.pointer.borrow();
            let tilt = self.tilt.borrow();
            ControlInput {
                pointer: input::pointer_norm(&self.canvas, &pointer),
                tilt: input::tilt_norm(&tilt),
            }
        };

        let w = self.canvas.width();
        let h = self.canvas.height();
        self.gpu.resize_if_needed(w, h);
        self.scene.set_resolution(w as f32, h as f32);
        self.scene.update(t, dt, &input);

        if let Some(perf) = web::window().and_then(|w| w.performance()) {
            self.audio.borrow_mut().tick(perf.now());
        }

        if let Err(e) = self.gpu.render(&self.scene) {
            log::error!("render error: {:?}", e);
        }
    }
}

pub async fn init_gpu(canvas: &web::HtmlCanvasElement) -> Option<GpuState<'static>> {
    // leak a canvas clone to satisfy 'static lifetime for surface
    let leaked_canvas = Box::leak(Box::new(canvas.clone()));
    match GpuState::new(leaked_canvas).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("WebGPU init error: {:?}", e);
            None
        }
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let frame_ctx_tick = frame_ctx.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx_tick.borrow_mut().frame();
        if let Some(w) = web::window() {
            let _ = w.request_animation_frame(
                tick_clone
                    .borrow()
                    .as_ref()
                    .unwrap()
                    .as_ref()
                    .unchecked_ref(),
            );
        }
    }) as Box<dyn FnMut()>));
    if let Some(w) = web::window() {
        let _ = w.request_animation_frame(tick.borrow().as_ref().unwrap().as_ref().unchecked_ref());
    }
}
