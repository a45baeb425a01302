//! Cubemap face loading
//!
//! Decodes the six face images, checks their channel layout and size, and
//! builds the full RGBA8 mip chain on the CPU so the GPU upload is a plain
//! copy.

use std::path::{Path, PathBuf};

use image::{imageops::FilterType, DynamicImage, RgbaImage};
use thiserror::Error;

/// Face file names in GPU layer order: +X, -X, +Y, -Y, +Z, -Z.
pub const FACE_FILE_NAMES: [&str; 6] = [
    "right.png",
    "left.png",
    "top.png",
    "bottom.png",
    "front.png",
    "back.png",
];

#[derive(Debug, Error)]
pub enum CubemapError {
    #[error("failed to read image file {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("unexpected image format: {} has {channels} components", .path.display())]
    UnexpectedFormat { path: PathBuf, channels: u8 },

    #[error(
        "cubemap face {} is {width}x{height}, expected {expected}x{expected}",
        .path.display()
    )]
    FaceSizeMismatch {
        path: PathBuf,
        width: u32,
        height: u32,
        expected: u32,
    },
}

/// Channel layout of a decoded face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceFormat {
    /// Single channel, sampled as (r, 0, 0, 1)
    Red,
    Rgb,
    Rgba,
}

impl FaceFormat {
    pub fn from_channels(channels: u8) -> Option<Self> {
        match channels {
            1 => Some(Self::Red),
            3 => Some(Self::Rgb),
            4 => Some(Self::Rgba),
            _ => None,
        }
    }

    fn expand(self, image: &DynamicImage) -> RgbaImage {
        match self {
            Self::Red => {
                let red = image.to_luma8();
                RgbaImage::from_fn(red.width(), red.height(), |x, y| {
                    image::Rgba([red.get_pixel(x, y).0[0], 0, 0, 255])
                })
            }
            Self::Rgb | Self::Rgba => image.to_rgba8(),
        }
    }
}

pub struct CubemapFace {
    pub path: PathBuf,
    pub format: FaceFormat,
    /// Level 0 first, each level half the size of the previous one.
    pub mips: Vec<RgbaImage>,
}

pub struct CubemapImage {
    pub face_size: u32,
    pub faces: Vec<CubemapFace>,
}

/// Number of mip levels down to 1x1.
pub fn mip_level_count(size: u32) -> u32 {
    (u32::BITS - size.leading_zeros()).max(1)
}

impl CubemapImage {
    /// Loads six faces in GPU layer order.
    pub fn load(paths: &[PathBuf; 6]) -> Result<Self, CubemapError> {
        let mut faces = Vec::with_capacity(paths.len());
        let mut face_size = None;

        for path in paths {
            let (format, base) = load_face(path)?;
            let (width, height) = base.dimensions();

            let expected = *face_size.get_or_insert(width);
            if width != height || width != expected {
                return Err(CubemapError::FaceSizeMismatch {
                    path: path.clone(),
                    width,
                    height,
                    expected,
                });
            }

            faces.push(CubemapFace {
                path: path.clone(),
                format,
                mips: build_mip_chain(base),
            });
        }

        Ok(Self {
            face_size: face_size.unwrap_or(0),
            faces,
        })
    }

    pub fn mip_level_count(&self) -> u32 {
        mip_level_count(self.face_size)
    }

    /// All six faces share one format on the GPU.
    pub fn texture_format(&self) -> wgpu::TextureFormat {
        wgpu::TextureFormat::Rgba8Unorm
    }
}

fn load_face(path: &Path) -> Result<(FaceFormat, RgbaImage), CubemapError> {
    let image = image::open(path).map_err(|source| CubemapError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let channels = image.color().channel_count();
    log::info!(
        "{} ({} x {}, {} components)",
        path.display(),
        image.width(),
        image.height(),
        channels
    );

    let format = FaceFormat::from_channels(channels).ok_or_else(|| {
        CubemapError::UnexpectedFormat {
            path: path.to_path_buf(),
            channels,
        }
    })?;

    Ok((format, format.expand(&image)))
}

fn build_mip_chain(base: RgbaImage) -> Vec<RgbaImage> {
    let levels = mip_level_count(base.width().max(base.height()));
    let mut mips = Vec::with_capacity(levels as usize);
    mips.push(base);

    for _ in 1..levels {
        let Some(previous) = mips.last() else { break };
        let width = (previous.width() / 2).max(1);
        let height = (previous.height() / 2).max(1);
        let next = image::imageops::resize(previous, width, height, FilterType::Triangle);
        mips.push(next);
    }

    mips
}
