use std::collections::BTreeMap;

use glam::Mat4;
use glbview_common::{NodeId, Viewport};
use glbview_render::{PerspectiveCamera, Renderer, RendererSettings};
use glbview_scene::{Scene, SceneNode};
use wgpu::util::DeviceExt;

use crate::RenderError;
use crate::shaders;
use crate::uniforms::{
    Globals, InstanceData, Vertex, mesh_indices, mesh_vertices, shader_encodes_srgb,
};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const INITIAL_INSTANCE_CAPACITY: u64 = 64;

/// Geometry of one mesh, uploaded once per model.
struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

/// wgpu renderer drawing into a window surface.
///
/// Owns the surface, device and queue. Model geometry is uploaded the first
/// time a model is seen and dropped when the model leaves the scene.
pub struct WgpuRenderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    settings: RendererSettings,
    viewport: Viewport,
    encode_srgb: bool,
    pipeline: wgpu::RenderPipeline,
    globals_buffer: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,
    instance_buffer: wgpu::Buffer,
    instance_capacity: u64,
    msaa_view: Option<wgpu::TextureView>,
    depth_view: wgpu::TextureView,
    meshes: BTreeMap<NodeId, Vec<GpuMesh>>,
}

impl WgpuRenderer {
    /// Create a renderer for `target`, sized to `viewport`.
    pub fn new(
        target: impl Into<wgpu::SurfaceTarget<'static>>,
        viewport: Viewport,
        settings: RendererSettings,
    ) -> Result<Self, RenderError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(target)?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or(RenderError::NoAdapter)?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("glbview_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))?;

        let caps = surface.get_capabilities(&adapter);
        let want_srgb = settings.output_color_space == glbview_render::ColorSpace::Srgb;
        let format = caps
            .formats
            .iter()
            .find(|f| f.is_srgb() == want_srgb)
            .or_else(|| caps.formats.first())
            .copied()
            .ok_or(RenderError::NoSurfaceFormat)?;
        let alpha_mode = if settings.alpha
            && caps
                .alpha_modes
                .contains(&wgpu::CompositeAlphaMode::PreMultiplied)
        {
            wgpu::CompositeAlphaMode::PreMultiplied
        } else {
            caps.alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto)
        };

        let size = viewport.clamped();
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width,
            height: size.height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let samples = settings.msaa_samples();
        let globals_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("globals_buffer"),
            size: std::mem::size_of::<Globals>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("globals_bind_group_layout"),
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
        });

        let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("globals_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("model_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("model_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::MODEL_SHADER.into()),
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("model_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<Vertex>() as u64,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![
                            0 => Float32x3,
                            1 => Float32x3,
                        ],
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<InstanceData>() as u64,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &wgpu::vertex_attr_array![
                            2 => Float32x4,
                            3 => Float32x4,
                            4 => Float32x4,
                            5 => Float32x4,
                            6 => Float32x4,
                            7 => Float32x4,
                            8 => Float32x4,
                            9 => Float32x4,
                        ],
                    },
                ],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                // glTF materials are frequently double-sided.
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: samples,
                ..Default::default()
            },
            multiview: None,
            cache: None,
        });

        let instance_buffer = Self::create_instance_buffer(&device, INITIAL_INSTANCE_CAPACITY);
        let depth_view = Self::create_depth_texture(&device, &config, samples);
        let msaa_view = Self::create_msaa_texture(&device, &config, samples);

        tracing::info!(
            backend = adapter.get_info().backend.to_str(),
            ?format,
            ?alpha_mode,
            samples,
            "GPU initialized"
        );

        Ok(Self {
            surface,
            device,
            queue,
            encode_srgb: shader_encodes_srgb(&settings, config.format),
            config,
            settings,
            viewport: size,
            pipeline,
            globals_buffer,
            globals_bind_group,
            instance_buffer,
            instance_capacity: INITIAL_INSTANCE_CAPACITY,
            msaa_view,
            depth_view,
            meshes: BTreeMap::new(),
        })
    }

    fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
        let samples = self.settings.msaa_samples();
        self.depth_view = Self::create_depth_texture(&self.device, &self.config, samples);
        self.msaa_view = Self::create_msaa_texture(&self.device, &self.config, samples);
    }

    /// Upload geometry for models not seen before and forget removed ones.
    fn sync_meshes(&mut self, scene: &Scene) {
        self.meshes.retain(|id, _| scene.model(*id).is_some());
        for (id, node) in scene.models() {
            if self.meshes.contains_key(id) {
                continue;
            }
            let meshes = self.upload_model(node);
            tracing::debug!(model = %node.name, meshes = meshes.len(), "uploaded model geometry");
            self.meshes.insert(*id, meshes);
        }
    }

    fn upload_model(&self, node: &SceneNode) -> Vec<GpuMesh> {
        let mut out = Vec::new();
        node.visit_meshes(Mat4::IDENTITY, &mut |mesh, _| {
            if mesh.positions.is_empty() {
                return;
            }
            let vertices = mesh_vertices(mesh);
            let indices = mesh_indices(mesh);
            let vertex_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("mesh_vertex_buffer"),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
            let index_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("mesh_index_buffer"),
                contents: bytemuck::cast_slice(&indices),
                usage: wgpu::BufferUsages::INDEX,
            });
            out.push(GpuMesh {
                vertex_buffer,
                index_buffer,
                index_count: indices.len() as u32,
            });
        });
        out
    }

    /// One instance per mesh, in the same order the geometry was uploaded.
    fn collect_instances(scene: &Scene) -> Vec<InstanceData> {
        let mut instances = Vec::new();
        for (_, node) in scene.models() {
            node.visit_meshes(Mat4::IDENTITY, &mut |mesh, world| {
                if !mesh.positions.is_empty() {
                    instances.push(InstanceData::new(world, mesh.base_color));
                }
            });
        }
        instances
    }

    fn write_instances(&mut self, instances: &[InstanceData]) {
        let needed = instances.len() as u64;
        if needed > self.instance_capacity {
            self.instance_capacity = needed.next_power_of_two();
            self.instance_buffer =
                Self::create_instance_buffer(&self.device, self.instance_capacity);
        }
        if !instances.is_empty() {
            self.queue
                .write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(instances));
        }
    }

    fn create_instance_buffer(device: &wgpu::Device, capacity: u64) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("instance_buffer"),
            size: capacity * std::mem::size_of::<InstanceData>() as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    fn create_depth_texture(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        samples: u32,
    ) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
            size: wgpu::Extent3d {
                width: config.width,
                height: config.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: samples,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }

    fn create_msaa_texture(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        samples: u32,
    ) -> Option<wgpu::TextureView> {
        if samples <= 1 {
            return None;
        }
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("msaa_texture"),
            size: wgpu::Extent3d {
                width: config.width,
                height: config.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: samples,
            dimension: wgpu::TextureDimension::D2,
            format: config.format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        Some(texture.create_view(&Default::default()))
    }
}

impl Renderer for WgpuRenderer {
    type Output = Result<(), RenderError>;

    fn set_size(&mut self, viewport: Viewport) {
        let size = viewport.clamped();
        if size.width == self.config.width && size.height == self.config.height {
            self.viewport = size;
            return;
        }
        self.viewport = size;
        self.config.width = size.width;
        self.config.height = size.height;
        self.reconfigure();
    }

    fn size(&self) -> Viewport {
        self.viewport
    }

    /// Draw one frame. A lost or outdated surface is reconfigured and the
    /// frame skipped; the next frame draws normally.
    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<(), RenderError> {
        let output = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                tracing::debug!("surface lost or outdated; reconfiguring");
                self.reconfigure();
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                tracing::warn!("surface timed out; skipping frame");
                return Ok(());
            }
            Err(e) => return Err(RenderError::Surface(e)),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.sync_meshes(scene);
        let instances = Self::collect_instances(scene);
        self.write_instances(&instances);

        let globals = Globals::new(scene, camera, &self.settings, self.encode_srgb);
        self.queue
            .write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals));

        let [r, g, b, a] = self.settings.clear_rgba();
        let (color_view, resolve_target) = match &self.msaa_view {
            Some(msaa) => (msaa, Some(&view)),
            None => (&view, None),
        };

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame_encoder"),
            });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("model_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: color_view,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
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
                ..Default::default()
            });

            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &self.globals_bind_group, &[]);
            pass.set_vertex_buffer(1, self.instance_buffer.slice(..));

            let mut instance = 0u32;
            for (id, _) in scene.models() {
                let Some(meshes) = self.meshes.get(id) else {
                    continue;
                };
                for mesh in meshes {
                    pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                    pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                    pass.draw_indexed(0..mesh.index_count, 0, instance..instance + 1);
                    instance += 1;
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}
