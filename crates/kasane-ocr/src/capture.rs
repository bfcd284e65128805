use std::path::Path;

use anyhow::{Context, Result, bail};
use image::RgbaImage;
use kasane_types::{CaptureRegion, RawImage};
use xcap::Monitor;

/// Regions smaller than this in either dimension are treated as a misclick
pub const MIN_REGION_SIZE: u32 = 10;

/// Capture the entire primary monitor as raw RGBA
pub fn capture_primary_screen() -> Result<RawImage> {
    let monitors = Monitor::all().context("Failed to get monitors")?;
    let monitor = monitors.first().context("No monitor found")?;

    let image = monitor.capture_image().context("Failed to capture screen")?;
    Ok(RawImage {
        width: image.width(),
        height: image.height(),
        data: image.into_raw(),
    })
}

/// Capture a region of the screen from the monitor containing it
pub fn capture_screen_region(region: CaptureRegion) -> Result<RawImage> {
    validate_region(&region)?;

    let monitors = Monitor::all().context("Failed to get monitors")?;

    let monitor = monitors
        .iter()
        .find(|m| {
            region.x >= m.x()
                && region.y >= m.y()
                && region.x + region.width as i32 <= m.x() + m.width() as i32
                && region.y + region.height as i32 <= m.y() + m.height() as i32
        })
        .or(monitors.first())
        .context("No monitor found")?;

    let image = monitor.capture_image().context("Failed to capture screen")?;
    let full = RawImage {
        width: image.width(),
        height: image.height(),
        data: image.into_raw(),
    };

    crop(
        &full,
        (region.x - monitor.x()).max(0) as u32,
        (region.y - monitor.y()).max(0) as u32,
        region.width,
        region.height,
    )
}

pub fn validate_region(region: &CaptureRegion) -> Result<()> {
    if region.width < MIN_REGION_SIZE || region.height < MIN_REGION_SIZE {
        bail!(
            "Capture region {}x{} is too small (minimum {MIN_REGION_SIZE}x{MIN_REGION_SIZE})",
            region.width,
            region.height
        );
    }
    Ok(())
}

/// Cut a rectangle out of an image, clamped to its bounds
pub fn crop(image: &RawImage, x: u32, y: u32, width: u32, height: u32) -> Result<RawImage> {
    let buffer = to_rgba(image)?;
    let cropped = image::imageops::crop_imm(&buffer, x, y, width, height).to_image();
    if cropped.width() == 0 || cropped.height() == 0 {
        bail!("Capture region lies outside the screen");
    }

    Ok(RawImage {
        width: cropped.width(),
        height: cropped.height(),
        data: cropped.into_raw(),
    })
}

/// Read an image file from disk
pub fn load_image(path: &Path) -> Result<RawImage> {
    let image = image::open(path)
        .with_context(|| format!("Failed to open image {}", path.display()))?
        .to_rgba8();

    Ok(RawImage {
        width: image.width(),
        height: image.height(),
        data: image.into_raw(),
    })
}

fn to_rgba(image: &RawImage) -> Result<RgbaImage> {
    RgbaImage::from_raw(image.width, image.height, image.data.clone())
        .context("Image buffer does not match its dimensions")
}
