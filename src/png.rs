use anyhow::{anyhow, bail, ensure};
use miniz_oxide::deflate::compress_to_vec_zlib;
use nom::{bytes::complete::tag, IResult};

use crate::{
    chunks::{iend::IENDChunk, idat::IDATChunk, ihdr::IHDRChunk, parse_chunk, Chunk, ParseableChunk},
    filters::filter_scanlines,
};

const SIGNATURE: &[u8; 8] = b"\x89PNG\x0d\x0a\x1a\x0a";

/// zlib level handed to miniz; 9 is the highest standard level.
const COMPRESSION_LEVEL: u8 = 9;

/// Encodes 8-bit RGBA pixels, row-major with no padding, into a PNG file.
pub fn encode_rgba(width: u32, height: u32, pixels: &[u8]) -> anyhow::Result<Vec<u8>> {
    ensure!(
        width > 0 && height > 0,
        "PNG dimensions must be non-zero, got {width}x{height}"
    );
    let header = IHDRChunk::rgba8(width, height);
    let expected = header.row_length() * height as usize;
    ensure!(
        pixels.len() == expected,
        "Expected {expected} bytes of RGBA data for {width}x{height}, got {}",
        pixels.len()
    );

    let filtered = filter_scanlines(pixels, &header);
    let compressed = compress_to_vec_zlib(&filtered, COMPRESSION_LEVEL);
    log::debug!(
        "Compressed {width}x{height} image data from {} to {} bytes",
        filtered.len(),
        compressed.len()
    );

    let mut output = Vec::with_capacity(compressed.len() + 57);
    output.extend(SIGNATURE);
    output.extend(header.to_bytes());
    output.extend(IDATChunk { data: &compressed }.to_bytes());
    output.extend(IENDChunk.to_bytes());
    Ok(output)
}

/// Walks the chunk sequence of a PNG file (IHDR, then IDAT and ancillary
/// chunks, then IEND) and returns the width and height from its header.
pub fn read_dimensions(bytes: &[u8]) -> anyhow::Result<(u32, u32)> {
    let (mut rest, _) =
        parse_signature(bytes).map_err(|_| anyhow!("input doesn't start with expected signature"))?;
    let header = match next_chunk(&mut rest)? {
        Chunk::IHDR(ihdr) => ihdr,
        other => bail!("Expected IHDR as first chunk, found {other:?}"),
    };

    let mut image_data = 0;
    loop {
        match next_chunk(&mut rest)? {
            Chunk::IHDR(_) => bail!("Duplicate IHDR chunk"),
            Chunk::IDAT(idat) => image_data += idat.data.len(),
            Chunk::IEND => break,
            Chunk::Unknown(raw) if raw.is_ancillary() => {}
            Chunk::Unknown(raw) => bail!(
                "Unsupported critical chunk {}",
                String::from_utf8_lossy(raw.chunk_type)
            ),
        }
    }
    ensure!(image_data > 0, "PNG has no image data");
    ensure!(rest.is_empty(), "{} bytes after IEND", rest.len());
    log::debug!(
        "{}x{} PNG with {image_data} bytes of image data",
        header.width,
        header.height
    );
    Ok((header.width, header.height))
}

fn next_chunk<'a>(input: &mut &'a [u8]) -> anyhow::Result<Chunk<'a>> {
    let (rest, chunk) = parse_chunk(*input).map_err(|e| anyhow!("Invalid chunk: {e}"))?;
    *input = rest;
    Ok(chunk)
}

fn parse_signature(input: &[u8]) -> IResult<&[u8], &[u8]> {
    tag(&SIGNATURE[..])(input)
}
