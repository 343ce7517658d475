//! WebGPU renderer: instanced lambert boxes for the static scene, round
//! sprites for snow and bulbs, and one alpha-blended quad per flame surface.

use glam::{Mat4, Quat, Vec3};
use hearth_core::{FlameSurface, SceneState};
use web_sys as web;
use wgpu::util::DeviceExt;

const MESH_CAPACITY: usize = 1024;
const SPRITE_CAPACITY: usize = 1024;
const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24Plus;

const AMBIENT: [f32; 4] = [0.16, 0.12, 0.1, 0.0];
const FOVY: f32 = std::f32::consts::FRAC_PI_4;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct SceneUniforms {
    view_proj: [[f32; 4]; 4],
    light_pos: [f32; 4],
    ambient: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct SpriteUniforms {
    view_proj: [[f32; 4]; 4],
    cam_right: [f32; 4],
    cam_up: [f32; 4],
}

// Must match the FlameUniforms struct in flame.wgsl field for field.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct FlameUniforms {
    mvp: [[f32; 4]; 4],
    fire_min: [f32; 2],
    fire_max: [f32; 2],
    resolution: [f32; 2],
    time: f32,
    alpha_scale: f32,
    cone_center: [f32; 2],
    cone_boost: f32,
    cone_spread: f32,
    round_center: [f32; 2],
    round_scale: [f32; 2],
    base_params: [f32; 2],
    intensity_cap: f32,
    _pad0: f32,
    fade_top: [f32; 2],
    fade_bottom: [f32; 2],
    fade_side: [f32; 2],
    _pad1: [f32; 2],
}

impl FlameUniforms {
    fn from_surface(surface: &FlameSurface, view_proj: Mat4) -> Self {
        let cfg = &surface.config;
        Self {
            mvp: (view_proj * surface.model_matrix()).to_cols_array_2d(),
            fire_min: cfg.fire_min.to_array(),
            fire_max: cfg.fire_max.to_array(),
            resolution: surface.resolution.to_array(),
            time: surface.time,
            alpha_scale: cfg.alpha_scale,
            cone_center: cfg.cone_center.to_array(),
            cone_boost: cfg.cone_boost,
            cone_spread: cfg.cone_spread,
            round_center: cfg.round_center.to_array(),
            round_scale: cfg.round_scale.to_array(),
            base_params: cfg.base_params.to_array(),
            intensity_cap: cfg.intensity_cap,
            _pad0: 0.0,
            fade_top: cfg.fade_top.to_array(),
            fade_bottom: cfg.fade_bottom.to_array(),
            fade_side: cfg.fade_side.to_array(),
            _pad1: [0.0; 2],
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct MeshInstance {
    model: [[f32; 4]; 4],
    color: [f32; 4],
    emissive: f32,
    _pad: [f32; 3],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct SpriteInstance {
    pos: [f32; 3],
    scale: f32,
    color: [f32; 4],
    glow: f32,
    _pad: [f32; 3],
}

// Unit cube centered at the origin: position + normal per vertex.
#[rustfmt::skip]
const CUBE_VERTICES: [[f32; 6]; 24] = [
    // +X
    [0.5, -0.5, -0.5, 1.0, 0.0, 0.0], [0.5, 0.5, -0.5, 1.0, 0.0, 0.0],
    [0.5, 0.5, 0.5, 1.0, 0.0, 0.0], [0.5, -0.5, 0.5, 1.0, 0.0, 0.0],
    // -X
    [-0.5, -0.5, 0.5, -1.0, 0.0, 0.0], [-0.5, 0.5, 0.5, -1.0, 0.0, 0.0],
    [-0.5, 0.5, -0.5, -1.0, 0.0, 0.0], [-0.5, -0.5, -0.5, -1.0, 0.0, 0.0],
    // +Y
    [-0.5, 0.5, -0.5, 0.0, 1.0, 0.0], [-0.5, 0.5, 0.5, 0.0, 1.0, 0.0],
    [0.5, 0.5, 0.5, 0.0, 1.0, 0.0], [0.5, 0.5, -0.5, 0.0, 1.0, 0.0],
    // -Y
    [-0.5, -0.5, 0.5, 0.0, -1.0, 0.0], [-0.5, -0.5, -0.5, 0.0, -1.0, 0.0],
    [0.5, -0.5, -0.5, 0.0, -1.0, 0.0], [0.5, -0.5, 0.5, 0.0, -1.0, 0.0],
    // +Z
    [-0.5, -0.5, 0.5, 0.0, 0.0, 1.0], [0.5, -0.5, 0.5, 0.0, 0.0, 1.0],
    [0.5, 0.5, 0.5, 0.0, 0.0, 1.0], [-0.5, 0.5, 0.5, 0.0, 0.0, 1.0],
    // -Z
    [0.5, -0.5, -0.5, 0.0, 0.0, -1.0], [-0.5, -0.5, -0.5, 0.0, 0.0, -1.0],
    [-0.5, 0.5, -0.5, 0.0, 0.0, -1.0], [0.5, 0.5, -0.5, 0.0, 0.0, -1.0],
];

#[rustfmt::skip]
const CUBE_INDICES: [u16; 36] = [
    0, 1, 2, 0, 2, 3,
    4, 5, 6, 4, 6, 7,
    8, 9, 10, 8, 10, 11,
    12, 13, 14, 12, 14, 15,
    16, 17, 18, 16, 18, 19,
    20, 21, 22, 20, 22, 23,
];

const QUAD_VERTICES: [f32; 12] = [
    -0.5, -0.5, 0.5, -0.5, 0.5, 0.5, -0.5, -0.5, 0.5, 0.5, -0.5, 0.5,
];

pub struct GpuState<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,

    mesh_pipeline: wgpu::RenderPipeline,
    sprite_pipeline: wgpu::RenderPipeline,
    flame_pipeline: wgpu::RenderPipeline,

    scene_uniform_buffer: wgpu::Buffer,
    scene_bind_group: wgpu::BindGroup,
    sprite_uniform_buffer: wgpu::Buffer,
    sprite_bind_group: wgpu::BindGroup,
    flame_bgl: wgpu::BindGroupLayout,
    flame_slots: Vec<(wgpu::Buffer, wgpu::BindGroup)>,

    cube_vb: wgpu::Buffer,
    cube_ib: wgpu::Buffer,
    quad_vb: wgpu::Buffer,
    mesh_instance_vb: wgpu::Buffer,
    sprite_instance_vb: wgpu::Buffer,

    depth_view: wgpu::TextureView,
    width: u32,
    height: u32,
}

fn uniform_bgl(device: &wgpu::Device, label: &str) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    })
}

fn create_depth(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let tex = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    tex.create_view(&wgpu::TextureViewDescriptor::default())
}

impl<'a> GpuState<'a> {
    pub async fn new(canvas: &'a web::HtmlCanvasElement) -> anyhow::Result<Self> {
        let width = canvas.width();
        let height = canvas.height();

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
        let caps = surface.get_capabilities(&adapter);
        let format = caps.formats[0];
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let scene_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene shader"),
            source: wgpu::ShaderSource::Wgsl(hearth_core::SCENE_WGSL.into()),
        });
        let sprite_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("sprite shader"),
            source: wgpu::ShaderSource::Wgsl(hearth_core::SPRITE_WGSL.into()),
        });
        let flame_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("flame shader"),
            source: wgpu::ShaderSource::Wgsl(hearth_core::FLAME_WGSL.into()),
        });

        let scene_bgl = uniform_bgl(&device, "scene bgl");
        let sprite_bgl = uniform_bgl(&device, "sprite bgl");
        let flame_bgl = uniform_bgl(&device, "flame bgl");

        let scene_uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("scene uniforms"),
            size: std::mem::size_of::<SceneUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let sprite_uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("sprite uniforms"),
            size: std::mem::size_of::<SpriteUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let scene_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("scene bg"),
            layout: &scene_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: scene_uniform_buffer.as_entire_binding(),
            }],
        });
        let sprite_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("sprite bg"),
            layout: &sprite_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: sprite_uniform_buffer.as_entire_binding(),
            }],
        });

        let cube_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cube_vb"),
            contents: bytemuck::cast_slice(&CUBE_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let cube_ib = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cube_ib"),
            contents: bytemuck::cast_slice(&CUBE_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });
        let quad_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad_vb"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let mesh_instance_vb = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("mesh instances"),
            size: (std::mem::size_of::<MeshInstance>() * MESH_CAPACITY) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let sprite_instance_vb = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("sprite instances"),
            size: (std::mem::size_of::<SpriteInstance>() * SPRITE_CAPACITY) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let cube_layout = wgpu::VertexBufferLayout {
            array_stride: (std::mem::size_of::<f32>() * 6) as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 0,
                    shader_location: 0,
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 12,
                    shader_location: 1,
                },
            ],
        };
        let mesh_instance_layout = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute { format: wgpu::VertexFormat::Float32x4, offset: 0, shader_location: 2 },
                wgpu::VertexAttribute { format: wgpu::VertexFormat::Float32x4, offset: 16, shader_location: 3 },
                wgpu::VertexAttribute { format: wgpu::VertexFormat::Float32x4, offset: 32, shader_location: 4 },
                wgpu::VertexAttribute { format: wgpu::VertexFormat::Float32x4, offset: 48, shader_location: 5 },
                wgpu::VertexAttribute { format: wgpu::VertexFormat::Float32x4, offset: 64, shader_location: 6 },
                wgpu::VertexAttribute { format: wgpu::VertexFormat::Float32, offset: 80, shader_location: 7 },
            ],
        };
        let quad_layout = wgpu::VertexBufferLayout {
            array_stride: (std::mem::size_of::<f32>() * 2) as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x2,
                offset: 0,
                shader_location: 0,
            }],
        };
        let sprite_instance_layout = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SpriteInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute { format: wgpu::VertexFormat::Float32x3, offset: 0, shader_location: 1 },
                wgpu::VertexAttribute { format: wgpu::VertexFormat::Float32, offset: 12, shader_location: 2 },
                wgpu::VertexAttribute { format: wgpu::VertexFormat::Float32x4, offset: 16, shader_location: 3 },
                wgpu::VertexAttribute { format: wgpu::VertexFormat::Float32, offset: 32, shader_location: 4 },
            ],
        };

        let make_pipeline = |label: &str,
                             shader: &wgpu::ShaderModule,
                             bgl: &wgpu::BindGroupLayout,
                             buffers: &[wgpu::VertexBufferLayout],
                             blend: Option<wgpu::BlendState>,
                             depth_write: bool| {
            let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some(label),
                bind_group_layouts: &[bgl],
                push_constant_ranges: &[],
            });
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&layout),
                vertex: wgpu::VertexState {
                    module: shader,
                    entry_point: Some("vs_main"),
                    buffers,
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                primitive: wgpu::PrimitiveState::default(),
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: depth_write,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                fragment: Some(wgpu::FragmentState {
                    module: shader,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format,
                        blend,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                cache: None,
                multiview: None,
            })
        };

        let mesh_pipeline = make_pipeline(
            "mesh pipeline",
            &scene_shader,
            &scene_bgl,
            &[cube_layout.clone(), mesh_instance_layout],
            None,
            true,
        );
        let sprite_pipeline = make_pipeline(
            "sprite pipeline",
            &sprite_shader,
            &sprite_bgl,
            &[quad_layout.clone(), sprite_instance_layout],
            Some(wgpu::BlendState::ALPHA_BLENDING),
            false,
        );
        let flame_pipeline = make_pipeline(
            "flame pipeline",
            &flame_shader,
            &flame_bgl,
            &[quad_layout],
            Some(wgpu::BlendState::ALPHA_BLENDING),
            false,
        );

        let depth_view = create_depth(&device, width, height);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            mesh_pipeline,
            sprite_pipeline,
            flame_pipeline,
            scene_uniform_buffer,
            scene_bind_group,
            sprite_uniform_buffer,
            sprite_bind_group,
            flame_bgl,
            flame_slots: Vec::new(),
            cube_vb,
            cube_ib,
            quad_vb,
            mesh_instance_vb,
            sprite_instance_vb,
            depth_view,
            width,
            height,
        })
    }

    pub fn resize_if_needed(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
            self.depth_view = create_depth(&self.device, width, height);
        }
    }

    fn ensure_flame_slots(&mut self, count: usize) {
        while self.flame_slots.len() < count {
            let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("flame uniforms"),
                size: std::mem::size_of::<FlameUniforms>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            let bg = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("flame bg"),
                layout: &self.flame_bgl,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                }],
            });
            self.flame_slots.push((buffer, bg));
        }
    }

    fn view_proj(&self, scene: &SceneState) -> Mat4 {
        let cam = hearth_core::Camera {
            eye: scene.camera.eye,
            target: scene.camera.target,
            up: Vec3::Y,
            aspect: self.width as f32 / self.height.max(1) as f32,
            fovy_radians: FOVY,
            znear: 0.1,
            zfar: 100.0,
        };
        cam.projection_matrix() * cam.view_matrix()
    }

    fn gather_mesh_instances(scene: &SceneState, out: &mut Vec<MeshInstance>) {
        for b in &scene.decor {
            out.push(MeshInstance {
                model: (Mat4::from_translation(b.center)
                    * Mat4::from_scale(b.half_extents * 2.0))
                .to_cols_array_2d(),
                color: [b.color[0], b.color[1], b.color[2], 1.0],
                emissive: 0.0,
                _pad: [0.0; 3],
            });
        }
        for p in &scene.presents {
            out.push(MeshInstance {
                model: (Mat4::from_translation(p.position)
                    * Mat4::from_scale(p.half_extents * 2.0))
                .to_cols_array_2d(),
                color: [p.color[0], p.color[1], p.color[2], 1.0],
                emissive: 0.0,
                _pad: [0.0; 3],
            });
        }
        for g in &scene.garlands {
            for leaf in &g.leaves {
                let rot = Quat::from_euler(
                    glam::EulerRot::XYZ,
                    leaf.rotation.x,
                    leaf.rotation.y,
                    leaf.rotation.z,
                );
                out.push(MeshInstance {
                    model: Mat4::from_scale_rotation_translation(
                        Vec3::new(leaf.scale, leaf.scale * 0.4, leaf.scale),
                        rot,
                        leaf.position,
                    )
                    .to_cols_array_2d(),
                    color: [0.1, 0.34, 0.16, 1.0],
                    emissive: 0.0,
                    _pad: [0.0; 3],
                });
            }
        }
    }

    fn gather_sprite_instances(scene: &SceneState, out: &mut Vec<SpriteInstance>) {
        for f in &scene.snow.flakes {
            out.push(SpriteInstance {
                pos: f.position.to_array(),
                scale: 0.045,
                color: [0.95, 0.96, 1.0, 0.9],
                glow: 0.0,
                _pad: [0.0; 3],
            });
        }
        for b in &scene.bulbs {
            out.push(SpriteInstance {
                pos: b.position.to_array(),
                scale: 0.07,
                color: [b.current_color.x, b.current_color.y, b.current_color.z, 0.95],
                glow: b.intensity,
                _pad: [0.0; 3],
            });
        }
    }

    pub fn render(&mut self, scene: &SceneState) -> Result<(), wgpu::SurfaceError> {
        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let view_proj = self.view_proj(scene);
        let forward = (scene.camera.target - scene.camera.eye).normalize();
        let right = forward.cross(Vec3::Y).normalize();
        let up = right.cross(forward);

        self.queue.write_buffer(
            &self.scene_uniform_buffer,
            0,
            bytemuck::bytes_of(&SceneUniforms {
                view_proj: view_proj.to_cols_array_2d(),
                light_pos: [
                    scene.fire_light.position.x,
                    scene.fire_light.position.y,
                    scene.fire_light.position.z,
                    scene.fire_light.intensity,
                ],
                ambient: AMBIENT,
            }),
        );
        self.queue.write_buffer(
            &self.sprite_uniform_buffer,
            0,
            bytemuck::bytes_of(&SpriteUniforms {
                view_proj: view_proj.to_cols_array_2d(),
                cam_right: [right.x, right.y, right.z, 0.0],
                cam_up: [up.x, up.y, up.z, 0.0],
            }),
        );

        let mut meshes = Vec::with_capacity(MESH_CAPACITY);
        Self::gather_mesh_instances(scene, &mut meshes);
        if meshes.len() > MESH_CAPACITY {
            log::warn!("mesh instances truncated: {} > {}", meshes.len(), MESH_CAPACITY);
            meshes.truncate(MESH_CAPACITY);
        }
        let mut sprites = Vec::with_capacity(SPRITE_CAPACITY);
        Self::gather_sprite_instances(scene, &mut sprites);
        if sprites.len() > SPRITE_CAPACITY {
            log::warn!("sprite instances truncated: {} > {}", sprites.len(), SPRITE_CAPACITY);
            sprites.truncate(SPRITE_CAPACITY);
        }
        self.queue
            .write_buffer(&self.mesh_instance_vb, 0, bytemuck::cast_slice(&meshes));
        self.queue
            .write_buffer(&self.sprite_instance_vb, 0, bytemuck::cast_slice(&sprites));

        self.ensure_flame_slots(scene.flames.len());
        for (surface, (buffer, _)) in scene.flames.iter().zip(&self.flame_slots) {
            self.queue.write_buffer(
                buffer,
                0,
                bytemuck::bytes_of(&FlameUniforms::from_surface(surface, view_proj)),
            );
        }

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("rpass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.016,
                            g: 0.02,
                            b: 0.045,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            rpass.set_pipeline(&self.mesh_pipeline);
            rpass.set_bind_group(0, &self.scene_bind_group, &[]);
            rpass.set_vertex_buffer(0, self.cube_vb.slice(..));
            rpass.set_vertex_buffer(1, self.mesh_instance_vb.slice(..));
            rpass.set_index_buffer(self.cube_ib.slice(..), wgpu::IndexFormat::Uint16);
            rpass.draw_indexed(0..36, 0, 0..(meshes.len() as u32));

            rpass.set_pipeline(&self.sprite_pipeline);
            rpass.set_bind_group(0, &self.sprite_bind_group, &[]);
            rpass.set_vertex_buffer(0, self.quad_vb.slice(..));
            rpass.set_vertex_buffer(1, self.sprite_instance_vb.slice(..));
            rpass.draw(0..6, 0..(sprites.len() as u32));

            rpass.set_pipeline(&self.flame_pipeline);
            rpass.set_vertex_buffer(0, self.quad_vb.slice(..));
            for (i, _) in scene.flames.iter().enumerate() {
                rpass.set_bind_group(0, &self.flame_slots[i].1, &[]);
                rpass.draw(0..6, 0..1);
            }
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}
