use std::io::{ErrorKind, Write};
use std::path::Path;
use std::process::{Command, Output};

use kasane_types::{OcrWord, RawImage};

use crate::error::OcrError;
use crate::tsv::parse_words;

/// Recognizes words in a raster image
pub trait OcrEngine: Send + Sync {
    fn recognize(&self, image: &RawImage, language: &str) -> Result<Vec<OcrWord>, OcrError>;
}

/// Runs the tesseract command line tool
pub struct TesseractEngine {
    command: String,
}

impl TesseractEngine {
    /// `command` is a path to the executable or a name looked up on PATH
    pub fn new(command: impl Into<String>) -> Result<Self, OcrError> {
        let command = command.into();
        let looks_like_path = command.contains('/') || command.contains('\\');
        if looks_like_path && !Path::new(&command).is_file() {
            return Err(OcrError::EngineNotFound(command));
        }

        Ok(Self { command })
    }

    pub fn list_languages(&self) -> Result<Vec<String>, OcrError> {
        let output = self.run(|cmd| {
            cmd.arg("--list-langs");
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::RecognitionFailed(format!(
                "tesseract --list-langs failed: {}",
                stderr.trim()
            )));
        }

        Ok(parse_language_list(&String::from_utf8_lossy(&output.stdout)))
    }

    /// Every `+`-joined language must be installed.
    /// If tesseract can't list its languages the check is skipped.
    fn check_language(&self, language: &str) -> Result<(), OcrError> {
        let available = match self.list_languages() {
            Ok(list) => list,
            Err(OcrError::EngineNotFound(path)) => return Err(OcrError::EngineNotFound(path)),
            Err(e) => {
                tracing::warn!("Skipping OCR language check: {e}");
                return Ok(());
            }
        };

        let missing: Vec<&str> = language
            .split('+')
            .map(str::trim)
            .filter(|lang| !lang.is_empty() && !available.iter().any(|a| a == lang))
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(OcrError::LanguageUnavailable {
                language: missing.join("+"),
                available: available.join(", "),
            })
        }
    }

    fn run(&self, configure: impl FnOnce(&mut Command)) -> Result<Output, OcrError> {
        let mut cmd = Command::new(&self.command);
        configure(&mut cmd);
        cmd.output().map_err(|e| match e.kind() {
            ErrorKind::NotFound | ErrorKind::PermissionDenied => {
                OcrError::EngineNotFound(self.command.clone())
            }
            _ => OcrError::Io(e),
        })
    }
}

impl OcrEngine for TesseractEngine {
    fn recognize(&self, image: &RawImage, language: &str) -> Result<Vec<OcrWord>, OcrError> {
        let language = language.trim();
        if language.is_empty() {
            return Err(OcrError::LanguageUnavailable {
                language: String::new(),
                available: String::new(),
            });
        }
        self.check_language(language)?;

        let png = image.encode_png().map_err(|e| OcrError::Image(e.to_string()))?;
        let mut input = tempfile::Builder::new()
            .prefix("kasane-capture-")
            .suffix(".png")
            .tempfile()?;
        input.write_all(&png)?;
        input.flush()?;

        tracing::debug!(
            "Running {} on {}x{} image (lang: {language})",
            self.command,
            image.width,
            image.height
        );

        let output = self.run(|cmd| {
            cmd.arg(input.path())
                .arg("stdout")
                .arg("-l")
                .arg(language)
                .arg("tsv");
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(classify_failure(language, stderr.trim()));
        }

        let words = parse_words(&String::from_utf8_lossy(&output.stdout));
        tracing::debug!("tesseract returned {} words", words.len());
        Ok(words)
    }
}

fn classify_failure(language: &str, stderr: &str) -> OcrError {
    if stderr.contains("Failed loading language") || stderr.contains("Error opening data file") {
        OcrError::LanguageUnavailable {
            language: language.to_string(),
            available: String::new(),
        }
    } else {
        OcrError::RecognitionFailed(stderr.to_string())
    }
}

/// `--list-langs` prints a header line, then one language per line
fn parse_language_list(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .skip(1)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_engine_path_is_reported() {
        let result = TesseractEngine::new("/definitely/not/here/tesseract");
        assert!(matches!(result, Err(OcrError::EngineNotFound(_))));
    }

    #[test]
    fn bare_command_name_is_accepted() {
        assert!(TesseractEngine::new("tesseract").is_ok());
    }

    #[test]
    fn unknown_command_fails_as_engine_not_found() {
        let engine = TesseractEngine::new("kasane-no-such-ocr-binary").unwrap();
        let image = RawImage {
            data: vec![255; 4 * 4 * 4],
            width: 4,
            height: 4,
        };
        assert!(matches!(
            engine.recognize(&image, "eng"),
            Err(OcrError::EngineNotFound(_))
        ));
    }

    #[test]
    fn parses_language_list() {
        let stdout = "List of available languages in \"/usr/share/tessdata/\" (3):\neng\nkor\nosd\n";
        assert_eq!(parse_language_list(stdout), vec!["eng", "kor", "osd"]);
    }

    #[test]
    fn classifies_missing_language_pack() {
        let stderr = "Error opening data file /usr/share/tessdata/xyz.traineddata\nFailed loading language 'xyz'";
        assert!(matches!(
            classify_failure("xyz", stderr),
            OcrError::LanguageUnavailable { .. }
        ));
        assert!(matches!(
            classify_failure("eng", "Leptonica error"),
            OcrError::RecognitionFailed(_)
        ));
    }
}
