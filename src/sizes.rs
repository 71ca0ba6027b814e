/// A single favicon output: the file it is written to and its pixel size.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct SizeSpec {
    pub file_name: &'static str,
    pub width: u32,
    pub height: u32,
}
impl SizeSpec {
    pub const fn new(file_name: &'static str, width: u32, height: u32) -> Self {
        Self {
            file_name,
            width,
            height,
        }
    }

    pub const fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Every variant produced by [`crate::convert`], in the order they are written.
pub const FAVICON_SIZES: [SizeSpec; 5] = [
    SizeSpec::new("favicon-16x16.png", 16, 16),
    SizeSpec::new("favicon-32x32.png", 32, 32),
    SizeSpec::new("apple-touch-icon.png", 180, 180),
    SizeSpec::new("android-chrome-192x192.png", 192, 192),
    SizeSpec::new("android-chrome-512x512.png", 512, 512),
];
