use super::{crc::calculate_crc, ParseableChunk};

pub(crate) struct IENDChunk;
impl<'a> ParseableChunk<'a> for IENDChunk {
    type Output = [u8; 12];

    const HEADER: &'static [u8; 4] = b"IEND";

    fn from_bytes(chunk_data: &[u8]) -> nom::IResult<&[u8], Self> {
        Ok((chunk_data, Self))
    }

    fn to_bytes(&self) -> Self::Output {
        let mut data = [0; 12];
        data[4..8].copy_from_slice(Self::HEADER);
        data[8..].copy_from_slice(&calculate_crc(Self::HEADER).to_be_bytes());
        data
    }
}
