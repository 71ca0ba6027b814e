use crate::chunks::ihdr::IHDRChunk;

/// The five scanline filters of PNG filter method 0.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub(crate) enum Filter {
    None = 0,
    Sub = 1,
    Up = 2,
    Average = 3,
    Paeth = 4,
}
impl Filter {
    pub(crate) const ALL: [Filter; 5] = [
        Filter::None,
        Filter::Sub,
        Filter::Up,
        Filter::Average,
        Filter::Paeth,
    ];

    /// `x` is the current byte, `a` the byte one pixel to the left, `b` the byte
    /// above and `c` the byte above and to the left.
    pub(crate) fn filter(&self, x: u8, a: u8, b: u8, c: u8) -> u8 {
        match self {
            Filter::None => x,
            Filter::Sub => x.wrapping_sub(a),
            Filter::Up => x.wrapping_sub(b),
            Filter::Average => x.wrapping_sub(((a as u16 + b as u16) / 2) as u8),
            Filter::Paeth => x.wrapping_sub(paeth_predictor(a, b, c)),
        }
    }

    fn filter_row(&self, row: &[u8], prior: Option<&[u8]>, bpp: usize, out: &mut Vec<u8>) {
        out.clear();
        out.push(*self as u8);
        for i in 0..row.len() {
            let a = if i >= bpp { row[i - bpp] } else { 0 };
            let b = prior.map_or(0, |p| p[i]);
            let c = match prior {
                Some(p) if i >= bpp => p[i - bpp],
                _ => 0,
            };
            out.push(self.filter(row[i], a, b, c));
        }
    }
}

fn paeth_predictor(a: u8, b: u8, c: u8) -> u8 {
    let p = a as i16 + b as i16 - c as i16;
    let pa = (p - a as i16).abs();
    let pb = (p - b as i16).abs();
    let pc = (p - c as i16).abs();
    if pa <= pb && pa <= pc {
        a
    } else if pb <= pc {
        b
    } else {
        c
    }
}

/// Sum of the residuals read as signed bytes; smaller tends to deflate better.
fn score(filtered: &[u8]) -> u64 {
    filtered[1..]
        .iter()
        .map(|&v| (v as i8).unsigned_abs() as u64)
        .sum()
}

/// Filters every scanline of `data`, picking per row the filter with the lowest score.
/// The output has one leading filter-type byte per row, ready for compression.
pub(crate) fn filter_scanlines(data: &[u8], header: &IHDRChunk) -> Vec<u8> {
    let row_length = header.row_length();
    let bpp = header.filter_width();
    let mut output = Vec::with_capacity((row_length + 1) * header.height as usize);
    let mut best = Vec::with_capacity(row_length + 1);
    let mut candidate = Vec::with_capacity(row_length + 1);
    let mut prior: Option<&[u8]> = None;
    let mut counts = [0usize; 5];

    for row in data.chunks(row_length) {
        let mut best_score = u64::MAX;
        for filter in Filter::ALL {
            filter.filter_row(row, prior, bpp, &mut candidate);
            let candidate_score = score(&candidate);
            if candidate_score < best_score {
                best_score = candidate_score;
                std::mem::swap(&mut best, &mut candidate);
            }
        }
        counts[best[0] as usize] += 1;
        output.extend_from_slice(&best);
        prior = Some(row);
    }
    log::debug!(
        "Filter usage (none/sub/up/average/paeth): {:?} over {} rows",
        counts,
        header.height
    );
    output
}
