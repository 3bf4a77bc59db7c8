//! Render pipeline for drawing the particles
//!
//! Each particle is one instance. Its only vertex attribute is the lookup
//! coordinate into the FBO; the vertex shader fetches the position from the
//! FBO texture and expands it into a screen-aligned quad of `point_size` pixels.

use wgpu::util::DeviceExt;

use super::types::{PointUniforms, POINT_QUAD_VERTICES};

/// Points pipeline for on-screen display
#[allow(dead_code)] // layouts kept so position bind groups can be rebuilt
pub struct PointsPipeline {
    pipeline: wgpu::RenderPipeline,
    /// Bind group layout for uniforms
    uniform_layout: wgpu::BindGroupLayout,
    /// Bind group layout for the FBO position texture
    positions_layout: wgpu::BindGroupLayout,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    /// One bind group per FBO target
    positions_bind_groups: Vec<wgpu::BindGroup>,
    depth_texture: Option<wgpu::TextureView>,
    depth_size: (u32, u32),
}

impl PointsPipeline {
    /// Create a new points pipeline
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat) -> Self {
        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Points Uniform Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let positions_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Points Positions Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                // Positions are read in the vertex stage
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: false },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Points Pipeline Layout"),
            bind_group_layouts: &[&uniform_layout, &positions_layout],
            push_constant_ranges: &[],
        });

        let shader_source = include_str!("../shaders/points.wgsl");
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Points Shader"),
            source: wgpu::ShaderSource::Wgsl(shader_source.into()),
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Points Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Self::instance_buffer_layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
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
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Points Uniform Buffer"),
            contents: bytemuck::bytes_of(&PointUniforms::default()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Points Uniform Bind Group"),
            layout: &uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        Self {
            pipeline,
            uniform_layout,
            positions_layout,
            uniform_buffer,
            uniform_bind_group,
            positions_bind_groups: Vec::new(),
            depth_texture: None,
            depth_size: (0, 0),
        }
    }

    /// Lookup coordinates advance once per particle instance
    fn instance_buffer_layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                // lookup: vec3<f32>
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 0,
                    shader_location: 0,
                },
            ],
        }
    }

    /// Build one position bind group per FBO target view
    pub fn bind_positions(&mut self, device: &wgpu::Device, views: &[wgpu::TextureView]) {
        self.positions_bind_groups = views
            .iter()
            .enumerate()
            .map(|(i, view)| {
                device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some(&format!("Points Positions Bind Group {}", i)),
                    layout: &self.positions_layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(view),
                    }],
                })
            })
            .collect();
    }

    /// Update uniforms
    pub fn update_uniforms(&self, queue: &wgpu::Queue, uniforms: &PointUniforms) {
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniforms));
    }

    /// Ensure depth texture exists and is the right size
    pub fn ensure_depth_texture(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        let (width, height) = (width.max(1), height.max(1));
        if self.depth_texture.is_none() || self.depth_size != (width, height) {
            let depth_texture = device.create_texture(&wgpu::TextureDescriptor {
                label: Some("Depth Texture"),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Depth32Float,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                view_formats: &[],
            });

            self.depth_texture = Some(depth_texture.create_view(&wgpu::TextureViewDescriptor::default()));
            self.depth_size = (width, height);
        }
    }

    /// Draw `particle_count` particles reading positions from FBO target `target`
    pub fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        lookup_buffer: &wgpu::Buffer,
        particle_count: u32,
        target: usize,
        clear_color: wgpu::Color,
    ) {
        let depth_view = self
            .depth_texture
            .as_ref()
            .expect("Depth texture not created. Call ensure_depth_texture first.");
        let positions = self
            .positions_bind_groups
            .get(target)
            .expect("Positions not bound. Call bind_positions first.");

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Points Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear_color),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
        render_pass.set_bind_group(1, positions, &[]);
        render_pass.set_vertex_buffer(0, lookup_buffer.slice(..));
        render_pass.draw(0..POINT_QUAD_VERTICES, 0..particle_count);
    }
}

/// Convert an `[r, g, b, a]` config colour to a clear colour
pub fn clear_color(rgba: [f32; 4]) -> wgpu::Color {
    wgpu::Color {
        r: rgba[0] as f64,
        g: rgba[1] as f64,
        b: rgba[2] as f64,
        a: rgba[3] as f64,
    }
}

/// Convert a `0xRRGGBB` hex value to an opaque `[r, g, b, a]` colour
pub fn hex_to_rgba(hex: u32) -> [f32; 4] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
        1.0,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_layout_stride() {
        let layout = PointsPipeline::instance_buffer_layout();
        assert_eq!(layout.array_stride, 12);
        assert_eq!(layout.step_mode, wgpu::VertexStepMode::Instance);
    }

    #[test]
    fn test_hex_to_rgba() {
        let c = hex_to_rgba(0x263339);
        assert!((c[0] - 38.0 / 255.0).abs() < 1e-6);
        assert!((c[1] - 51.0 / 255.0).abs() < 1e-6);
        assert!((c[2] - 57.0 / 255.0).abs() < 1e-6);
        assert_eq!(c[3], 1.0);
    }

    #[test]
    fn test_clear_color() {
        let c = clear_color([0.5, 0.25, 0.0, 1.0]);
        assert_eq!(c.r, 0.5);
        assert_eq!(c.g, 0.25);
        assert_eq!(c.a, 1.0);
    }
}
