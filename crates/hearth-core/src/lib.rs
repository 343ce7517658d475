pub mod camera;
pub mod constants;
pub mod flame;
pub mod garland;
pub mod lights;
pub mod noise;
pub mod presents;
pub mod scene;
pub mod snow;

pub static FLAME_WGSL: &str = include_str!("../shaders/flame.wgsl");
pub static SCENE_WGSL: &str = include_str!("../shaders/scene.wgsl");
pub static SPRITE_WGSL: &str = include_str!("../shaders/sprite.wgsl");

pub use camera::*;
pub use constants::*;
pub use flame::*;
pub use garland::*;
pub use lights::*;
pub use presents::*;
pub use scene::*;
pub use snow::*;

/// Mix a subsystem index into the scene seed so each placement pass gets an
/// independent but reproducible RNG stream.
#[inline]
pub fn derive_seed(base: u64, stream: u64) -> u64 {
    base ^ stream.wrapping_mul(0x9E37_79B9_7F4A_7C15)
}
