use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use kanal::AsyncReceiver;
use kasane_config::overlay::OverlayConfig;
use kasane_core::{OverlayLayout, Renderer, ScaleContext, paint_overlay};
use kasane_render::{SvgCanvas, error_report, text_report};
use kasane_types::{AppEvent, OverlayResult, RawImage};

use crate::status::AppStatus;

pub const OVERLAY_FILE: &str = "overlay.svg";
pub const REPORT_FILE: &str = "result.txt";

/// Files written for the latest result
#[derive(Debug, Clone)]
pub struct Presented {
    pub overlay: Option<PathBuf>,
    pub report: PathBuf,
}

/// Result surface: the latest run replaces whatever was shown before
pub struct Presenter {
    output_dir: PathBuf,
    canvas_width: u32,
    canvas_height: u32,
}

impl Presenter {
    pub fn new(config: &OverlayConfig) -> Self {
        Self {
            output_dir: config.output_dir.clone(),
            canvas_width: config.canvas_width,
            canvas_height: config.canvas_height,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn show_overlay(&self, result: &OverlayResult) -> anyhow::Result<Presented> {
        self.clear()?;

        let mut canvas = SvgCanvas::new(self.canvas_width, self.canvas_height);
        let layout = paint_overlay(
            &mut canvas,
            &result.image,
            &result.lines,
            &result.translated_text,
            self.canvas_width,
            self.canvas_height,
        );

        let overlay = match layout {
            Some(layout) => {
                log_layout(&layout);
                Some(self.write(OVERLAY_FILE, &canvas.finish())?)
            }
            None => {
                tracing::warn!(
                    "Canvas {}x{} too small, skipping overlay",
                    self.canvas_width,
                    self.canvas_height
                );
                None
            }
        };

        let report = self.write(
            REPORT_FILE,
            &text_report(&result.lines, &result.translated_text),
        )?;

        Ok(Presented { overlay, report })
    }

    pub fn show_notice(&self, message: &str, image: &RawImage) -> anyhow::Result<Presented> {
        self.clear()?;
        let overlay = self.write_plain_image(image)?;
        let report = self.write(REPORT_FILE, &text_report(&[], message))?;
        Ok(Presented { overlay, report })
    }

    pub fn show_error(&self, message: &str, image: Option<&RawImage>) -> anyhow::Result<Presented> {
        self.clear()?;
        let overlay = match image {
            Some(image) => self.write_plain_image(image)?,
            None => None,
        };
        let report = self.write(REPORT_FILE, &error_report(message))?;
        Ok(Presented { overlay, report })
    }

    /// Overlay with the capture only, no text boxes
    fn write_plain_image(&self, image: &RawImage) -> anyhow::Result<Option<PathBuf>> {
        let Some(scale) =
            ScaleContext::fit(image.width, image.height, self.canvas_width, self.canvas_height)
        else {
            return Ok(None);
        };
        let mut canvas = SvgCanvas::new(self.canvas_width, self.canvas_height);
        canvas.draw_image(image, &scale);
        self.write(OVERLAY_FILE, &canvas.finish()).map(Some)
    }

    /// Drop the previous result before showing a new one
    fn clear(&self) -> anyhow::Result<()> {
        fs::create_dir_all(&self.output_dir)
            .with_context(|| format!("Failed to create {}", self.output_dir.display()))?;

        for name in [OVERLAY_FILE, REPORT_FILE] {
            let path = self.output_dir.join(name);
            match fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(e).with_context(|| format!("Failed to remove {}", path.display()));
                }
            }
        }
        Ok(())
    }

    fn write(&self, name: &str, contents: &str) -> anyhow::Result<PathBuf> {
        let path = self.output_dir.join(name);
        fs::write(&path, contents).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }
}

fn log_layout(layout: &OverlayLayout) {
    match layout {
        OverlayLayout::Lines(boxes) => {
            tracing::debug!("Placed {} overlay boxes", boxes.len());
        }
        OverlayLayout::Mismatch {
            ocr_lines,
            translated_lines,
            ..
        } => {
            tracing::info!(
                "Showing whole translation: {ocr_lines} OCR lines vs {translated_lines} translated lines"
            );
        }
    }
}

/// Display side of the app: consumes results and status updates
pub async fn presenter_loop(
    app_to_ui_rx: AsyncReceiver<AppEvent>,
    presenter: Presenter,
    status: Arc<AppStatus>,
) -> anyhow::Result<()> {
    while let Ok(event) = app_to_ui_rx.recv().await {
        match event {
            AppEvent::StatusUpdate { status: message, busy } => {
                tracing::info!("Status: {message}");
                status.set_message(&message, busy).await;
            }
            AppEvent::ShowOverlay(result) => match presenter.show_overlay(&result) {
                Ok(shown) => {
                    if let Some(overlay) = &shown.overlay {
                        tracing::info!("Overlay written to {}", overlay.display());
                    }
                    tracing::info!("Report written to {}", shown.report.display());
                }
                Err(e) => {
                    status.record_error().await;
                    tracing::error!("Failed to show result: {e:#}");
                }
            },
            AppEvent::ShowNotice { message, image } => {
                if let Err(e) = presenter.show_notice(&message, &image) {
                    tracing::error!("Failed to show notice: {e:#}");
                }
            }
            AppEvent::ShowError { message, image } => {
                status.record_error().await;
                tracing::warn!("Run failed: {message}");
                if let Err(e) = presenter.show_error(&message, image.as_ref()) {
                    tracing::error!("Failed to show error: {e:#}");
                }
            }
            AppEvent::Shutdown => break,
            _ => {}
        }
    }

    tracing::info!("Presenter stopping");
    Ok(())
}
