//! # Canonical Raster
//!
//! The output of every decoder: an owned, row-padded 2D pixel buffer in one of two layouts.
//!
//! - [`RasterFormat::Argb32`]: one [`Argb32`] per pixel.
//! - [`RasterFormat::Ci8`]: one palette index per pixel, plus a 256-entry [`Argb32`] palette
//!   and an optional transparent index.
//!
//! ## Memory Layout
//!
//! Rows are `stride` bytes apart, where `stride` is the row size rounded up to a multiple of
//! 16 bytes. Padding pixels are zero and never visible through the row accessors.
//!
//! ```text
//! |<-------- stride -------->|
//! [ px px px px px .. px pad ]  row 0
//! [ px px px px px .. px pad ]  row 1
//! ```

use crate::argb32::{self, argb, Argb32};
use crate::error::{check_dimensions, DecodeError};
use crate::pixel_format::Sbit;

/// Alignment of the start of every row, in bytes.
pub const ROW_ALIGNMENT: usize = 16;

/// Number of palette entries of a [`RasterFormat::Ci8`] raster.
pub const CI8_PALETTE_LEN: usize = 256;

/// Pixel layout of a [`CanonicalRaster`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RasterFormat {
    /// 32-bit direct color with alpha.
    Argb32,
    /// 8-bit palette indices.
    Ci8,
}

impl RasterFormat {
    /// Size of one pixel in bytes.
    #[inline]
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            RasterFormat::Argb32 => 4,
            RasterFormat::Ci8 => 1,
        }
    }
}

/// An owned, decoded image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalRaster {
    width: u32,
    height: u32,
    stride: usize,
    format: RasterFormat,
    /// Pixels of an [`RasterFormat::Argb32`] raster; empty otherwise.
    argb: Vec<Argb32>,
    /// Indices of a [`RasterFormat::Ci8`] raster; empty otherwise.
    indices: Vec<u8>,
    palette: Vec<Argb32>,
    tr_idx: Option<u8>,
    sbit: Option<Sbit>,
}

/// Row pitch in bytes for a row of `width` pixels of `bytes_per_pixel` bytes.
#[inline]
pub const fn padded_stride(width: u32, bytes_per_pixel: usize) -> usize {
    let row = width as usize * bytes_per_pixel;
    (row + ROW_ALIGNMENT - 1) & !(ROW_ALIGNMENT - 1)
}

impl CanonicalRaster {
    /// Allocates a zeroed (transparent black) ARGB32 raster.
    pub fn new_argb32(width: u32, height: u32) -> Result<Self, DecodeError> {
        check_dimensions(width, height)?;
        let stride = padded_stride(width, 4);
        Ok(Self {
            width,
            height,
            stride,
            format: RasterFormat::Argb32,
            argb: vec![0; stride / 4 * height as usize],
            indices: Vec::new(),
            palette: Vec::new(),
            tr_idx: None,
            sbit: None,
        })
    }

    /// Allocates a CI8 raster with all indices 0 and an all-zero 256-entry palette.
    pub fn new_ci8(width: u32, height: u32) -> Result<Self, DecodeError> {
        check_dimensions(width, height)?;
        let stride = padded_stride(width, 1);
        Ok(Self {
            width,
            height,
            stride,
            format: RasterFormat::Ci8,
            argb: Vec::new(),
            indices: vec![0; stride * height as usize],
            palette: vec![0; CI8_PALETTE_LEN],
            tr_idx: None,
            sbit: None,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row pitch in bytes. Always a multiple of [`ROW_ALIGNMENT`].
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Row pitch in pixels.
    #[inline]
    pub fn stride_pixels(&self) -> usize {
        self.stride / self.format.bytes_per_pixel()
    }

    #[inline]
    pub fn format(&self) -> RasterFormat {
        self.format
    }

    /// Significant-bit metadata, if the decoder set any.
    #[inline]
    pub fn sbit(&self) -> Option<Sbit> {
        self.sbit
    }

    pub fn set_sbit(&mut self, sbit: Sbit) {
        self.sbit = Some(sbit);
    }

    /// Palette of a CI8 raster. Empty for ARGB32.
    #[inline]
    pub fn palette(&self) -> &[Argb32] {
        &self.palette
    }

    /// Mutable palette of a CI8 raster. Empty for ARGB32.
    #[inline]
    pub fn palette_mut(&mut self) -> &mut [Argb32] {
        &mut self.palette
    }

    /// Index of the first fully transparent palette entry, if any.
    #[inline]
    pub fn tr_idx(&self) -> Option<u8> {
        self.tr_idx
    }

    pub fn set_tr_idx(&mut self, tr_idx: Option<u8>) {
        self.tr_idx = tr_idx;
    }

    /// The whole ARGB32 pixel buffer, padding included. Empty for CI8.
    #[inline]
    pub fn argb32_data(&self) -> &[Argb32] {
        &self.argb
    }

    /// The whole ARGB32 pixel buffer, padding included. Empty for CI8.
    #[inline]
    pub fn argb32_data_mut(&mut self) -> &mut [Argb32] {
        &mut self.argb
    }

    /// The visible pixels of row `y` of an ARGB32 raster.
    ///
    /// Returns an empty slice for CI8 rasters and for `y >= height`.
    #[inline]
    pub fn argb32_row(&self, y: u32) -> &[Argb32] {
        let start = y as usize * self.stride_pixels();
        self.argb
            .get(start..start + self.width as usize)
            .unwrap_or(&[])
    }

    /// The visible pixels of row `y` of an ARGB32 raster.
    ///
    /// Returns an empty slice for CI8 rasters and for `y >= height`.
    #[inline]
    pub fn argb32_row_mut(&mut self, y: u32) -> &mut [Argb32] {
        let start = y as usize * self.stride_pixels();
        let end = start + self.width as usize;
        self.argb.get_mut(start..end).unwrap_or(&mut [])
    }

    /// Iterates over the visible pixels of each row of an ARGB32 raster.
    pub fn argb32_rows_mut(&mut self) -> impl Iterator<Item = &mut [Argb32]> {
        let width = self.width as usize;
        let stride = self.stride_pixels();
        self.argb
            .chunks_exact_mut(stride)
            .map(move |row| &mut row[..width])
    }

    /// The visible indices of row `y` of a CI8 raster.
    ///
    /// Returns an empty slice for ARGB32 rasters and for `y >= height`.
    #[inline]
    pub fn ci8_row(&self, y: u32) -> &[u8] {
        let start = y as usize * self.stride;
        self.indices
            .get(start..start + self.width as usize)
            .unwrap_or(&[])
    }

    /// The visible indices of row `y` of a CI8 raster.
    ///
    /// Returns an empty slice for ARGB32 rasters and for `y >= height`.
    #[inline]
    pub fn ci8_row_mut(&mut self, y: u32) -> &mut [u8] {
        let start = y as usize * self.stride;
        let end = start + self.width as usize;
        self.indices.get_mut(start..end).unwrap_or(&mut [])
    }

    /// Iterates over the visible indices of each row of a CI8 raster.
    pub fn ci8_rows_mut(&mut self) -> impl Iterator<Item = &mut [u8]> {
        let width = self.width as usize;
        self.indices
            .chunks_exact_mut(self.stride)
            .map(move |row| &mut row[..width])
    }

    /// The canonical color of pixel `(x, y)`, resolving CI8 indices through the palette.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Argb32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        match self.format {
            RasterFormat::Argb32 => self.argb32_row(y).get(x as usize).copied(),
            RasterFormat::Ci8 => {
                let index = *self.ci8_row(y).get(x as usize)?;
                self.palette.get(index as usize).copied()
            }
        }
    }

    /// Copies the image into a tightly packed `width * height` ARGB32 vector, resolving
    /// CI8 indices through the palette.
    pub fn to_packed_argb32(&self) -> Vec<Argb32> {
        let mut out = Vec::with_capacity(self.width as usize * self.height as usize);
        for y in 0..self.height {
            match self.format {
                RasterFormat::Argb32 => out.extend_from_slice(self.argb32_row(y)),
                RasterFormat::Ci8 => out.extend(
                    self.ci8_row(y)
                        .iter()
                        .map(|&i| self.palette.get(i as usize).copied().unwrap_or(0)),
                ),
            }
        }
        out
    }

    /// Writes a `tile_width` x `tile_height` block of row-major pixels with its top-left
    /// corner at `(x, y)`, clipping whatever falls outside the image.
    ///
    /// Does nothing for CI8 rasters.
    pub fn blit_tile(
        &mut self,
        x: u32,
        y: u32,
        tile_width: usize,
        tile_height: usize,
        tile: &[Argb32],
    ) {
        debug_assert!(tile.len() >= tile_width * tile_height);
        if x >= self.width || y >= self.height {
            return;
        }
        let copy_width = tile_width.min((self.width - x) as usize);
        let copy_height = tile_height.min((self.height - y) as usize);
        let stride = self.stride_pixels();
        for (row, src) in tile.chunks_exact(tile_width).take(copy_height).enumerate() {
            let start = (y as usize + row) * stride + x as usize;
            if let Some(dst) = self.argb.get_mut(start..start + copy_width) {
                dst.copy_from_slice(&src[..copy_width]);
            }
        }
    }

    /// Writes a tile of row-major palette indices, clipping like [`Self::blit_tile`].
    ///
    /// Does nothing for ARGB32 rasters.
    pub fn blit_ci8_tile(
        &mut self,
        x: u32,
        y: u32,
        tile_width: usize,
        tile_height: usize,
        tile: &[u8],
    ) {
        debug_assert!(tile.len() >= tile_width * tile_height);
        if x >= self.width || y >= self.height {
            return;
        }
        let copy_width = tile_width.min((self.width - x) as usize);
        let copy_height = tile_height.min((self.height - y) as usize);
        for (row, src) in tile.chunks_exact(tile_width).take(copy_height).enumerate() {
            let start = (y as usize + row) * self.stride + x as usize;
            if let Some(dst) = self.indices.get_mut(start..start + copy_width) {
                dst.copy_from_slice(&src[..copy_width]);
            }
        }
    }

    /// Applies `f` to every visible ARGB32 pixel and to every palette entry.
    fn map_colors(&mut self, f: impl Fn(Argb32) -> Argb32) {
        for row in self.argb32_rows_mut() {
            for px in row {
                *px = f(*px);
            }
        }
        for px in &mut self.palette {
            *px = f(*px);
        }
    }

    /// Converts premultiplied alpha to straight alpha. Used for DXT2 and DXT4.
    pub fn un_premultiply(&mut self) {
        self.map_colors(argb32::un_premultiply_pixel);
    }

    /// Turns a red-only image into opaque luminance by copying red into green and blue.
    pub fn red8_to_l8(&mut self) {
        self.map_colors(|px| {
            let r = argb32::red(px);
            argb(0xFF, r, r, r)
        });
        if let Some(sbit) = &mut self.sbit {
            sbit.green = sbit.red;
            sbit.blue = sbit.red;
            sbit.gray = sbit.red;
            sbit.alpha = 0;
        }
    }

    /// Turns a red/green image into luminance with alpha: green becomes alpha and red is
    /// copied into green and blue.
    pub fn rg8_to_la8(&mut self) {
        self.map_colors(|px| {
            let r = argb32::red(px);
            argb(argb32::green(px), r, r, r)
        });
        if let Some(sbit) = &mut self.sbit {
            sbit.alpha = sbit.green;
            sbit.green = sbit.red;
            sbit.blue = sbit.red;
            sbit.gray = sbit.red;
        }
    }
}
