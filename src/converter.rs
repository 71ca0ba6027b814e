use std::{
    fs, io,
    path::{Path, PathBuf},
};

use anyhow::ensure;
use image::{imageops::FilterType, DynamicImage, Rgba, Rgba32FImage, RgbaImage};

use crate::{
    error::{ConvertError, Result},
    png,
    sizes::{SizeSpec, FAVICON_SIZES},
};

/// Encoded PNG bytes for one entry of the size table.
#[derive(Debug)]
pub struct Artifact {
    pub spec: SizeSpec,
    pub bytes: Vec<u8>,
}

/// Loads `input_path` and writes every favicon variant into `output_dir`,
/// creating the directory if needed. Existing files are overwritten.
///
/// All variants are rendered before anything is written, so a bad input never
/// leaves partial output behind. Returns the written paths in table order.
pub fn convert(input_path: impl AsRef<Path>, output_dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let input_path = input_path.as_ref();
    let output_dir = output_dir.as_ref();

    let source = load_source(input_path)?;
    println!(
        "✓ Loaded {} ({}x{})",
        input_path.display(),
        source.width(),
        source.height()
    );
    let source = normalize(source);

    let artifacts = FAVICON_SIZES
        .iter()
        .map(|spec| {
            render(&source, spec).map(|bytes| Artifact {
                spec: *spec,
                bytes,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    fs::create_dir_all(output_dir).map_err(|source| ConvertError::CreateDir {
        path: output_dir.to_owned(),
        source,
    })?;

    println!(
        "\nGenerating favicon variants in '{}':",
        output_dir.display()
    );
    let written = write_artifacts(&artifacts, output_dir)?;
    println!("\n✓ All favicon variants created successfully!");
    Ok(written)
}

/// Reads and decodes an image, guessing the format from its contents.
pub fn load_source(path: &Path) -> Result<DynamicImage> {
    let bytes = fs::read(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => ConvertError::NotFound {
            path: path.to_owned(),
        },
        _ => ConvertError::Read {
            path: path.to_owned(),
            source,
        },
    })?;
    let image = image::load_from_memory(&bytes).map_err(|source| ConvertError::Decode {
        path: path.to_owned(),
        source,
    })?;
    log::info!(
        "Decoded {} as {:?} ({}x{})",
        path.display(),
        image.color(),
        image.width(),
        image.height()
    );
    Ok(image)
}

/// Converts to 8-bit RGBA; sources without alpha become fully opaque.
pub fn normalize(image: DynamicImage) -> RgbaImage {
    match image {
        DynamicImage::ImageRgba8(rgba) => rgba,
        other => {
            log::info!("Converting {:?} to RGBA8", other.color());
            other.into_rgba8()
        }
    }
}

/// Resizes `source` to `spec` and encodes it as PNG.
pub fn render(source: &RgbaImage, spec: &SizeSpec) -> Result<Vec<u8>> {
    let encode_error = |source: anyhow::Error| ConvertError::Encode {
        file_name: spec.file_name,
        source,
    };
    let resized = resize_premultiplied(source, spec.width, spec.height);
    let bytes =
        png::encode_rgba(resized.width(), resized.height(), resized.as_raw()).map_err(encode_error)?;

    let dimensions = png::read_dimensions(&bytes).map_err(encode_error)?;
    check_dimensions(dimensions, spec).map_err(encode_error)?;
    log::debug!("Encoded {} in {} bytes", spec.file_name, bytes.len());
    Ok(bytes)
}

/// Lanczos3 resize on alpha-premultiplied samples, so the colour of fully
/// transparent pixels cannot bleed into visible edges.
fn resize_premultiplied(source: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    let premultiplied = Rgba32FImage::from_fn(source.width(), source.height(), |x, y| {
        let [r, g, b, a] = source.get_pixel(x, y).0.map(|c| c as f32 / 255.0);
        Rgba([r * a, g * a, b * a, a])
    });
    let resized = image::imageops::resize(&premultiplied, width, height, FilterType::Lanczos3);
    RgbaImage::from_fn(width, height, |x, y| {
        let [r, g, b, a] = resized.get_pixel(x, y).0;
        let alpha = a.clamp(0.0, 1.0);
        if alpha * 255.0 < 0.5 {
            return Rgba([0, 0, 0, 0]);
        }
        let unpremultiply = |c: f32| ((c / alpha).clamp(0.0, 1.0) * 255.0).round() as u8;
        Rgba([
            unpremultiply(r),
            unpremultiply(g),
            unpremultiply(b),
            (alpha * 255.0).round() as u8,
        ])
    })
}

fn check_dimensions(actual: (u32, u32), spec: &SizeSpec) -> anyhow::Result<()> {
    ensure!(
        actual == spec.dimensions(),
        "Encoded image is {}x{}, expected {}x{}",
        actual.0,
        actual.1,
        spec.width,
        spec.height
    );
    Ok(())
}

/// Writes each artifact into `output_dir`, stopping at the first failure.
pub fn write_artifacts(artifacts: &[Artifact], output_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(artifacts.len());
    for artifact in artifacts {
        let path = output_dir.join(artifact.spec.file_name);
        fs::write(&path, &artifact.bytes).map_err(|source| ConvertError::Write {
            path: path.clone(),
            source,
        })?;
        log::info!("Wrote {} ({} bytes)", path.display(), artifact.bytes.len());
        println!(
            "  ✓ {} ({}x{})",
            artifact.spec.file_name, artifact.spec.width, artifact.spec.height
        );
        written.push(path);
    }
    Ok(written)
}
