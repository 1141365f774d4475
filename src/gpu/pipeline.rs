//! Effect render pipeline

use crate::assets::{DepthImage, Image};
use crate::effects::Effect;
use crate::error::{CompositorError, Result};
use crate::shaders;

use super::{FrameUniforms, GpuContext};

/// Textures, uniforms and the render pipeline for one effect.
///
/// Built once at startup; only the uniform buffer changes per frame.
pub struct EffectPipeline {
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    uniform_buffer: wgpu::Buffer,
}

impl EffectPipeline {
    /// Upload both images and build the pipeline for `effect`.
    ///
    /// Images larger than the device's 2D texture limit are rejected with
    /// `TextureTooLarge` before any texture is created.
    pub fn new(
        ctx: &GpuContext,
        image: &Image,
        depth: &DepthImage,
        effect: &Effect,
    ) -> Result<Self> {
        let device = &ctx.device;
        let max = device.limits().max_texture_dimension_2d;
        check_texture_size("image", image.width(), image.height(), max)?;
        check_texture_size("depth map", depth.width(), depth.height(), max)?;

        let image_view = upload_texture(
            ctx,
            "Image Texture",
            wgpu::TextureFormat::Rgba8Unorm,
            image.width(),
            image.height(),
            4,
            image.as_bytes(),
        );
        let depth_view = upload_texture(
            ctx,
            "Depth Texture",
            wgpu::TextureFormat::R8Unorm,
            depth.width(),
            depth.height(),
            1,
            depth.as_bytes(),
        );

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Effect Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Frame Uniforms"),
            size: std::mem::size_of::<FrameUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Effect Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
                // Photo
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                // Depth map
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 3,
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

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Effect Bind Group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&image_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(&depth_view),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: uniform_buffer.as_entire_binding(),
                },
            ],
        });

        let source = shaders::assemble(effect);
        log::debug!("Assembled {} shader ({} bytes)", effect.effect_type(), source.len());

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Effect Shader"),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Effect Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Effect Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.format(),
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        log::info!("Pipeline ready: {}", effect.display_name());

        Ok(Self {
            pipeline,
            bind_group,
            uniform_buffer,
        })
    }

    /// Upload `uniforms` and draw one frame into `view`.
    pub fn render(&self, ctx: &GpuContext, view: &wgpu::TextureView, uniforms: &FrameUniforms) {
        ctx.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniforms));

        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Effect Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Effect Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.bind_group, &[]);
            render_pass.draw(0..6, 0..1);
        }

        ctx.queue.submit(std::iter::once(encoder.finish()));
    }
}

/// Reject textures wgpu would refuse to create.
pub fn check_texture_size(label: &'static str, width: u32, height: u32, max: u32) -> Result<()> {
    if width > max || height > max {
        return Err(CompositorError::TextureTooLarge {
            label,
            width,
            height,
            max,
        });
    }
    Ok(())
}

fn upload_texture(
    ctx: &GpuContext,
    label: &str,
    format: wgpu::TextureFormat,
    width: u32,
    height: u32,
    bytes_per_pixel: u32,
    data: &[u8],
) -> wgpu::TextureView {
    let size = wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    };
    let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    ctx.queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        data,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(bytes_per_pixel * width),
            rows_per_image: Some(height),
        },
        size,
    );

    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_texture_within_limit() {
        assert!(check_texture_size("image", 8192, 8192, 8192).is_ok());
        assert!(check_texture_size("image", 1, 1, 2048).is_ok());
    }

    #[test]
    fn test_oversized_texture_is_rejected() {
        match check_texture_size("depth map", 9000, 600, 8192) {
            Err(CompositorError::TextureTooLarge {
                label,
                width,
                height,
                max,
            }) => {
                assert_eq!(label, "depth map");
                assert_eq!((width, height, max), (9000, 600, 8192));
            }
            other => panic!("expected TextureTooLarge, got {other:?}"),
        }
        assert!(check_texture_size("image", 600, 8193, 8192).is_err());
    }

    #[test]
    fn test_oversized_texture_message() {
        let err = check_texture_size("image", 16384, 100, 8192).unwrap_err();
        assert_eq!(
            err.to_string(),
            "image is 16384x100, larger than the GPU texture limit of 8192"
        );
    }
}
