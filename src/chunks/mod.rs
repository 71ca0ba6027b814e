use nom::{
    bytes::complete::{tag, take},
    combinator::{map, map_res},
    multi::length_data,
    number::complete::be_u32,
    sequence::{terminated, tuple},
    IResult,
};

mod crc;
pub(crate) mod idat;
pub(crate) mod iend;
pub(crate) mod ihdr;

use crc::{calculate_crc, Crc32};

#[allow(clippy::upper_case_acronyms)]
#[derive(Debug)]
pub(crate) enum Chunk<'a> {
    IHDR(ihdr::IHDRChunk),
    IDAT(idat::IDATChunk<'a>),
    IEND,
    Unknown(RawChunk<'a>),
}

pub(crate) fn parse_chunk(input: &[u8]) -> IResult<&[u8], Chunk<'_>> {
    let (rest, (header, chunk_data)) = valid_chunk(input)?;
    match header {
        ihdr::IHDRChunk::HEADER => Ok((
            rest,
            Chunk::IHDR(ihdr::IHDRChunk::from_bytes(chunk_data)?.1),
        )),
        idat::IDATChunk::HEADER => Ok((
            rest,
            Chunk::IDAT(idat::IDATChunk::from_bytes(chunk_data)?.1),
        )),
        iend::IENDChunk::HEADER => Ok((rest, Chunk::IEND)),
        _ => Ok((
            rest,
            Chunk::Unknown(RawChunk {
                chunk_type: header,
                _chunk_data: chunk_data,
            }),
        )),
    }
}

#[derive(Debug)]
pub(crate) struct RawChunk<'a> {
    pub(crate) chunk_type: &'a [u8; 4],
    _chunk_data: &'a [u8],
}
impl RawChunk<'_> {
    /// Lowercase first letter: decoders may skip the chunk if they don't know it.
    pub(crate) fn is_ancillary(&self) -> bool {
        self.chunk_type[0].is_ascii_lowercase()
    }
}

/// Splits off one length-prefixed chunk, rejecting it if the CRC doesn't match.
fn valid_chunk(input: &[u8]) -> IResult<&[u8], (&[u8; 4], &[u8])> {
    let (header_length, crc_length) = (4, 4);
    let (input, chunk_data) =
        length_data(map(be_u32, |v: u32| v.saturating_add(header_length + crc_length)))(input)?;
    let crc = calculate_crc(&chunk_data[..chunk_data.len() - crc_length as usize]).to_be_bytes();
    let (_, (chunk_type, body)): (&[u8], (&[u8; 4], &[u8])) = tuple((
        map_res(take(header_length), <&[u8; 4]>::try_from),
        terminated(
            take(chunk_data.len() - (header_length + crc_length) as usize),
            tag(&crc[..]),
        ),
    ))(chunk_data)?;
    Ok((input, (chunk_type, body)))
}

/// Lays out `length | type | data | crc` for a chunk body.
pub(crate) fn frame_chunk(header: &[u8; 4], data: &[u8]) -> Vec<u8> {
    let crc = Crc32::new().update(header).update(data).finish();
    let mut bytes = Vec::with_capacity(data.len() + 12);
    bytes.extend((data.len() as u32).to_be_bytes());
    bytes.extend(header);
    bytes.extend(data);
    bytes.extend(crc.to_be_bytes());
    bytes
}

pub(crate) trait ParseableChunk<'a>: Sized {
    type Output: AsRef<[u8]>;
    const HEADER: &'static [u8; 4];

    fn from_bytes(chunk_data: &'a [u8]) -> IResult<&'a [u8], Self>;
    fn to_bytes(&self) -> Self::Output;
}
