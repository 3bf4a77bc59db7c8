//! Frame buffer object holding the particle simulation
//!
//! What's going on:
//! - A full-screen plane is drawn with the simulation shader into an off-screen
//!   RGBA32F render target that is never presented.
//! - Every texel of that target is one particle; its RGB channels are the
//!   particle's position.
//! - The points pipeline then binds the target as a texture and reads the
//!   positions from its vertex shader.
//!
//! Two targets are kept. Without feedback the simulation always reads the
//! initial data texture and writes target A. With feedback it reads whichever
//! target was written last and writes the other one.

use wgpu::util::DeviceExt;

use fbo_core::{lookup_coordinates, PositionData};

use super::types::{PlaneVertex, SimulationUniforms, PLANE_VERTICES};
use crate::support::{check_support, SupportError, POSITION_FORMAT};

/// Bytes per RGBA32F texel
const TEXEL_SIZE: u32 = 16;

/// Failure reading positions back to the CPU
#[derive(Debug)]
pub enum ReadbackError {
    /// No simulation step has run yet
    NothingRendered,
    /// Buffer mapping failed
    Map(String),
}

impl std::fmt::Display for ReadbackError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReadbackError::NothingRendered => write!(f, "FBO has not been rendered yet"),
            ReadbackError::Map(msg) => write!(f, "Readback mapping failed: {}", msg),
        }
    }
}

impl std::error::Error for ReadbackError {}

/// Off-screen simulation of particle positions
#[allow(dead_code)] // Textures must outlive the views and bind groups built from them
pub struct SimulationPipeline {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    plane_buffer: wgpu::Buffer,
    uniform_buffer: wgpu::Buffer,
    /// Initial positions
    data_texture: wgpu::Texture,
    /// Ping-pong render targets
    targets: [wgpu::Texture; 2],
    target_views: [wgpu::TextureView; 2],
    /// Bind groups reading from data, target A, target B
    source_bind_groups: [wgpu::BindGroup; 3],
    /// Point-cloud lookup coordinates, one per particle
    lookup_buffer: wgpu::Buffer,
    width: u32,
    height: u32,
    /// Target written by the most recent step
    current: Option<usize>,
    feedback: bool,
}

impl SimulationPipeline {
    /// Create the FBO for `data`
    ///
    /// Fails if the adapter cannot render to and sample float textures from the
    /// vertex stage.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        adapter: &wgpu::Adapter,
        data: &PositionData,
    ) -> Result<Self, SupportError> {
        let (width, height) = (data.width(), data.height());
        check_support(adapter, width, height)?;

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Simulation Bind Group Layout"),
            entries: &[
                // Source positions
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: false },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                // Simulation uniforms
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Simulation Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let shader_source = include_str!("../shaders/simulation.wgsl");
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Simulation Shader"),
            source: wgpu::ShaderSource::Wgsl(shader_source.into()),
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Simulation Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Self::vertex_buffer_layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: POSITION_FORMAT,
                    // Float32 targets are not blendable
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let plane_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Simulation Plane Buffer"),
            contents: bytemuck::cast_slice(&PLANE_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Simulation Uniform Buffer"),
            contents: bytemuck::bytes_of(&SimulationUniforms::default()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let data_texture = Self::create_position_texture(device, "FBO Data Texture", width, height);
        Self::write_positions(queue, &data_texture, data);

        let targets = [
            Self::create_position_texture(device, "FBO Target A", width, height),
            Self::create_position_texture(device, "FBO Target B", width, height),
        ];
        let target_views = [
            targets[0].create_view(&wgpu::TextureViewDescriptor::default()),
            targets[1].create_view(&wgpu::TextureViewDescriptor::default()),
        ];
        let data_view = data_texture.create_view(&wgpu::TextureViewDescriptor::default());

        let make_bind_group = |label: &str, view: &wgpu::TextureView| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout: &bind_group_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: uniform_buffer.as_entire_binding(),
                    },
                ],
            })
        };
        let source_bind_groups = [
            make_bind_group("Simulation Source Data", &data_view),
            make_bind_group("Simulation Source A", &target_views[0]),
            make_bind_group("Simulation Source B", &target_views[1]),
        ];

        let lookups = lookup_coordinates(width, height);
        let lookup_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Particle Lookup Buffer"),
            contents: bytemuck::cast_slice(&lookups),
            usage: wgpu::BufferUsages::VERTEX,
        });

        log::info!(
            "FBO {}x{} created ({} particles)",
            width, height, data.particle_count()
        );

        Ok(Self {
            pipeline,
            bind_group_layout,
            plane_buffer,
            uniform_buffer,
            data_texture,
            targets,
            target_views,
            source_bind_groups,
            lookup_buffer,
            width,
            height,
            current: None,
            feedback: false,
        })
    }

    fn create_position_texture(device: &wgpu::Device, label: &str, width: u32, height: u32) -> wgpu::Texture {
        device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: POSITION_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                | wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_SRC
                | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        })
    }

    fn write_positions(queue: &wgpu::Queue, texture: &wgpu::Texture, data: &PositionData) {
        queue.write_texture(
            texture.as_image_copy(),
            data.as_bytes(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(data.width() * TEXEL_SIZE),
                rows_per_image: Some(data.height()),
            },
            wgpu::Extent3d {
                width: data.width(),
                height: data.height(),
                depth_or_array_layers: 1,
            },
        );
    }

    /// Get the vertex buffer layout for PlaneVertex
    fn vertex_buffer_layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<PlaneVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                // position: vec3<f32>
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 0,
                    shader_location: 0,
                },
                // uv: vec2<f32>
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x2,
                    offset: 12,
                    shader_location: 1,
                },
            ],
        }
    }

    /// Read last frame's output instead of the initial data
    pub fn set_feedback(&mut self, enabled: bool) {
        self.feedback = enabled;
    }

    /// Start again from the initial data on the next step
    pub fn reset(&mut self) {
        self.current = None;
    }

    /// Update simulation uniforms
    pub fn update_uniforms(&self, queue: &wgpu::Queue, uniforms: &SimulationUniforms) {
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniforms));
    }

    /// Run one simulation step into the next render target
    ///
    /// After this call [`current_target`](Self::current_target) names the
    /// texture the points pipeline should read.
    pub fn update(&mut self, encoder: &mut wgpu::CommandEncoder) {
        let (source, target) = next_step(self.current, self.feedback);

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Simulation Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &self.target_views[target],
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.source_bind_groups[source], &[]);
        pass.set_vertex_buffer(0, self.plane_buffer.slice(..));
        pass.draw(0..PLANE_VERTICES.len() as u32, 0..1);

        self.current = Some(target);
    }

    /// Index of the target written last, or 0 before the first step
    pub fn current_target(&self) -> usize {
        self.current.unwrap_or(0)
    }

    /// Views of both render targets, indexed like [`current_target`](Self::current_target)
    pub fn target_views(&self) -> &[wgpu::TextureView; 2] {
        &self.target_views
    }

    /// Per-particle lookup coordinates for the points pipeline
    pub fn lookup_buffer(&self) -> &wgpu::Buffer {
        &self.lookup_buffer
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of particles (`width * height`)
    pub fn particle_count(&self) -> u32 {
        self.width * self.height
    }

    /// Copy the current target back to the CPU
    ///
    /// Blocks until the GPU has finished all submitted work.
    pub fn read_positions(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
    ) -> Result<Vec<[f32; 4]>, ReadbackError> {
        let current = self.current.ok_or(ReadbackError::NothingRendered)?;

        let unpadded_row = self.width * TEXEL_SIZE;
        let padded_row = padded_bytes_per_row(unpadded_row);

        let staging = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("FBO Readback Buffer"),
            size: padded_row as u64 * self.height as u64,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("FBO Readback Encoder"),
        });
        encoder.copy_texture_to_buffer(
            self.targets[current].as_image_copy(),
            wgpu::TexelCopyBufferInfo {
                buffer: &staging,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_row),
                    rows_per_image: Some(self.height),
                },
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );
        queue.submit(std::iter::once(encoder.finish()));

        let slice = staging.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        let _ = device.poll(wgpu::Maintain::Wait);

        rx.recv()
            .map_err(|e| ReadbackError::Map(e.to_string()))?
            .map_err(|e| ReadbackError::Map(e.to_string()))?;

        let texels = {
            let mapped = slice.get_mapped_range();
            mapped
                .chunks_exact(padded_row as usize)
                .flat_map(|row| {
                    row[..unpadded_row as usize]
                        .chunks_exact(TEXEL_SIZE as usize)
                        .map(bytemuck::pod_read_unaligned::<[f32; 4]>)
                })
                .collect()
        };
        staging.unmap();

        Ok(texels)
    }
}

/// Choose (source bind group, target) for the next step.
///
/// Source indices: 0 = initial data, 1 = target A, 2 = target B.
fn next_step(current: Option<usize>, feedback: bool) -> (usize, usize) {
    match (current, feedback) {
        (Some(last), true) => (last + 1, 1 - last),
        _ => (0, 0),
    }
}

/// Row pitch rounded up to wgpu's copy alignment
fn padded_bytes_per_row(unpadded: u32) -> u32 {
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    unpadded.div_ceil(align) * align
}
