//! Texture resource management for wgpu
//!
//! The depth buffer and the sampled skybox cubemap.

use super::cubemap::CubemapImage;

/// GPU texture resource containing texture, view, and sampler
///
/// Bundles the three main components needed for texture operations:
/// - Texture: The actual GPU memory allocation
/// - View: Interface for shader access
/// - Sampler: Filtering and addressing configuration
pub struct TextureResource {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

/// Depth attachment sized to the surface
///
/// Only ever bound as a render attachment, so it carries no sampler.
pub struct DepthTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
}

impl DepthTexture {
    /// Standard depth buffer format used throughout the renderer
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
    const USAGE: wgpu::TextureUsages = wgpu::TextureUsages::RENDER_ATTACHMENT;

    /// Creates a depth texture matching the surface configuration
    ///
    /// # Arguments
    /// * `device` - WGPU device for creating resources
    /// * `config` - Surface configuration to match dimensions
    /// * `label` - Debug label for the texture
    pub fn new(device: &wgpu::Device, config: &wgpu::SurfaceConfiguration, label: &str) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: Self::extent(config),
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: Self::USAGE,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self { texture, view }
    }

    /// Surface size, with zero sides raised to 1
    fn extent(config: &wgpu::SurfaceConfiguration) -> wgpu::Extent3d {
        wgpu::Extent3d {
            width: config.width.max(1),
            height: config.height.max(1),
            depth_or_array_layers: 1,
        }
    }
}

impl TextureResource {
    /// Uploads a decoded cubemap, every face and mip level, as a cube texture
    ///
    /// Edges clamp on all three axes; minification blends between mip levels.
    ///
    /// # Arguments
    /// * `device` - WGPU device for creating resources
    /// * `queue` - WGPU queue for uploading data
    /// * `cubemap` - Decoded faces in +X, -X, +Y, -Y, +Z, -Z order
    /// * `label` - Debug label for the texture
    pub fn create_cubemap(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        cubemap: &CubemapImage,
        label: &str,
    ) -> Self {
        let mip_level_count = cubemap.mip_level_count();

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: cubemap.face_size,
                height: cubemap.face_size,
                depth_or_array_layers: 6,
            },
            mip_level_count,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: cubemap.texture_format(),
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        for (layer, face) in cubemap.faces.iter().enumerate() {
            for (level, mip) in face.mips.iter().enumerate() {
                let (width, height) = mip.dimensions();
                queue.write_texture(
                    wgpu::TexelCopyTextureInfo {
                        texture: &texture,
                        mip_level: level as u32,
                        origin: wgpu::Origin3d {
                            x: 0,
                            y: 0,
                            z: layer as u32,
                        },
                        aspect: wgpu::TextureAspect::All,
                    },
                    mip.as_raw(),
                    wgpu::TexelCopyBufferLayout {
                        offset: 0,
                        bytes_per_row: Some(4 * width),
                        rows_per_image: Some(height),
                    },
                    wgpu::Extent3d {
                        width,
                        height,
                        depth_or_array_layers: 1,
                    },
                );
            }
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some(&format!("{} View", label)),
            dimension: Some(wgpu::TextureViewDimension::Cube),
            ..Default::default()
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(&format!("{} Sampler", label)),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        log::info!(
            "Cubemap '{}' uploaded: {}x{} faces, {} mip levels",
            label,
            cubemap.face_size,
            cubemap.face_size,
            mip_level_count
        );

        Self {
            texture,
            view,
            sampler,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface_config(width: u32, height: u32) -> wgpu::SurfaceConfiguration {
        wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: wgpu::TextureFormat::Bgra8UnormSrgb,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            desired_maximum_frame_latency: 2,
            alpha_mode: wgpu::CompositeAlphaMode::Auto,
            view_formats: vec![],
        }
    }

    #[test]
    fn test_depth_extent_follows_surface() {
        let extent = DepthTexture::extent(&surface_config(800, 600));
        assert_eq!((extent.width, extent.height), (800, 600));
        assert_eq!(extent.depth_or_array_layers, 1);
    }

    #[test]
    fn test_depth_extent_never_zero() {
        let extent = DepthTexture::extent(&surface_config(0, 0));
        assert_eq!((extent.width, extent.height), (1, 1));
    }

    #[test]
    fn test_depth_is_attachment_only() {
        assert_eq!(DepthTexture::USAGE, wgpu::TextureUsages::RENDER_ATTACHMENT);
        assert!(!DepthTexture::USAGE.contains(wgpu::TextureUsages::TEXTURE_BINDING));
    }
}
