use nom::{
    combinator::map_res,
    number::complete::{be_u32, u8},
    sequence::tuple,
    IResult,
};

use super::{frame_chunk, ParseableChunk};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub(crate) struct IHDRChunk {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) bit_depth: u8,
    pub(crate) color_type: ColorType,
    pub(crate) interlace_method: Interlacing,
}
impl IHDRChunk {
    /// Header for a non-interlaced 8-bit RGBA image.
    pub(crate) fn rgba8(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bit_depth: 8,
            color_type: ColorType::TruecolorWithAlpha,
            interlace_method: Interlacing::None,
        }
    }

    /// Bytes per complete pixel, rounded up to 1; the `bpp` of the filter algorithms.
    pub(crate) fn filter_width(&self) -> usize {
        let sample_width = usize::max(self.bit_depth as usize / 8, 1);
        self.color_type.channel_count() as usize * sample_width
    }

    /// Length of one unfiltered scanline, without the filter type byte.
    pub(crate) fn row_length(&self) -> usize {
        let bits = self.width as usize * self.color_type.channel_count() as usize
            * self.bit_depth as usize;
        bits.div_ceil(8)
    }
}
impl<'a> ParseableChunk<'a> for IHDRChunk {
    type Output = Vec<u8>;

    const HEADER: &'static [u8; 4] = b"IHDR";

    fn from_bytes(chunk_data: &'a [u8]) -> IResult<&'a [u8], Self> {
        let (rest, (width, height, bit_depth, color_type, _compression, _filter, interlace_method)) =
            tuple((
                be_u32,
                be_u32,
                u8,
                map_res(u8, ColorType::try_from),
                u8,
                u8,
                map_res(u8, Interlacing::try_from),
            ))(chunk_data)?;
        Ok((
            rest,
            IHDRChunk {
                width,
                height,
                bit_depth,
                color_type,
                interlace_method,
            },
        ))
    }

    fn to_bytes(&self) -> Self::Output {
        let mut data = Vec::with_capacity(13);
        data.extend(self.width.to_be_bytes());
        data.extend(self.height.to_be_bytes());
        // compression method and filter method are always 0
        data.extend([
            self.bit_depth,
            self.color_type as u8,
            0,
            0,
            self.interlace_method as u8,
        ]);
        frame_chunk(Self::HEADER, &data)
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub(crate) enum ColorType {
    Greyscale = 0,
    Truecolor = 2,
    IndexedColor = 3,
    GreyscaleWithAlpha = 4,
    TruecolorWithAlpha = 6,
}
impl TryFrom<u8> for ColorType {
    type Error = anyhow::Error;
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Greyscale),
            2 => Ok(Self::Truecolor),
            3 => Ok(Self::IndexedColor),
            4 => Ok(Self::GreyscaleWithAlpha),
            6 => Ok(Self::TruecolorWithAlpha),
            i => Err(anyhow::anyhow!("Unknown color type {i}")),
        }
    }
}
impl ColorType {
    pub(crate) fn channel_count(&self) -> u8 {
        match self {
            Self::Greyscale | Self::IndexedColor => 1,
            Self::GreyscaleWithAlpha => 2,
            Self::Truecolor => 3,
            Self::TruecolorWithAlpha => 4,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub(crate) enum Interlacing {
    None = 0,
    Adam7 = 1,
}
impl TryFrom<u8> for Interlacing {
    type Error = anyhow::Error;
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::None),
            1 => Ok(Self::Adam7),
            i => Err(anyhow::anyhow!("Unknown interlace method {i}")),
        }
    }
}
