//! Pointer and device-tilt input, normalized to the [-1,1]² drive signal the
//! orbit camera consumes.

use glam::Vec2;
use web_sys as web;

#[derive(Default, Clone, Copy)]
pub struct PointerState {
    pub x: f32,
    pub y: f32,
}

/// Latest device-orientation reading. `available` flips once the first event
/// arrives; until then (or if permission is denied and no event ever fires)
/// the pointer drives the camera.
#[derive(Default, Clone, Copy)]
pub struct TiltState {
    pub beta_deg: f32,
    pub gamma_deg: f32,
    pub available: bool,
}

// Degrees of tilt mapped to full camera deflection.
const TILT_GAMMA_RANGE: f32 = 30.0;
const TILT_BETA_CENTER: f32 = 45.0;
const TILT_BETA_RANGE: f32 = 25.0;

#[inline]
pub fn pointer_norm(canvas: &web::HtmlCanvasElement, pointer: &PointerState) -> Vec2 {
    let w = canvas.width().max(1) as f32;
    let h = canvas.height().max(1) as f32;
    Vec2::new(
        (pointer.x / w) * 2.0 - 1.0,
        (pointer.y / h) * 2.0 - 1.0,
    )
    .clamp(Vec2::splat(-1.0), Vec2::splat(1.0))
}

#[inline]
pub fn tilt_norm(tilt: &TiltState) -> Option<Vec2> {
    if !tilt.available {
        return None;
    }
    Some(Vec2::new(
        (tilt.gamma_deg / TILT_GAMMA_RANGE).clamp(-1.0, 1.0),
        ((tilt.beta_deg - TILT_BETA_CENTER) / TILT_BETA_RANGE).clamp(-1.0, 1.0),
    ))
}

#[inline]
pub fn pointer_canvas_px(ev: &web::PointerEvent, canvas: &web::HtmlCanvasElement) -> Vec2 {
    let rect = canvas.get_bounding_client_rect();
    let x_css = ev.client_x() as f32 - rect.left() as f32;
    let y_css = ev.client_y() as f32 - rect.top() as f32;
    let sx = (x_css / rect.width().max(1.0) as f32) * canvas.width() as f32;
    let sy = (y_css / rect.height().max(1.0) as f32) * canvas.height() as f32;
    Vec2::new(sx, sy)
}
