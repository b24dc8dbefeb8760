use anyhow::{Context, Result};
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;

/// Line-level text recognizer. Lines come back in reading order.
pub trait OcrEngine: Send + Sync {
    fn recognize_lines(&self, image: &DynamicImage) -> Result<Vec<String>>;
}

pub(crate) fn encode_png(image: &DynamicImage) -> Result<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageFormat::Png)
        .context("Failed to encode PNG")?;
    Ok(buffer.into_inner())
}

/// Create the platform OCR engine for a BCP-47 language tag
pub fn init_ocr_engine(language_code: &str) -> Result<Box<dyn OcrEngine>> {
    #[cfg(windows)]
    {
        Ok(Box::new(windows_ocr::WindowsOcrEngine::new(language_code)?))
    }

    #[cfg(not(windows))]
    {
        anyhow::bail!("No OCR engine available on this platform for language '{language_code}'")
    }
}

#[cfg(windows)]
mod windows_ocr {
    use anyhow::{Context, Result};
    use image::DynamicImage;
    use windows::{
        Globalization::Language,
        Graphics::Imaging::BitmapDecoder,
        Media::Ocr::OcrEngine as WinOcrEngine,
        Storage::Streams::{DataWriter, InMemoryRandomAccessStream},
        core::HSTRING,
    };

    use super::{OcrEngine, encode_png};
    use crate::com::ComGuard;

    pub struct WindowsOcrEngine {
        engine: WinOcrEngine,
    }

    impl WindowsOcrEngine {
        pub fn new(language_code: &str) -> Result<Self> {
            let _com = ComGuard::initialize()?;
            let language = Language::CreateLanguage(&HSTRING::from(language_code))
                .context("Failed to create language")?;

            let engine = WinOcrEngine::TryCreateFromLanguage(&language)
                .with_context(|| format!("No OCR engine for language '{language_code}'"))?;

            tracing::info!(
                "Windows OCR ready for {}",
                engine
                    .RecognizerLanguage()
                    .and_then(|l| l.LanguageTag())
                    .map(|tag| tag.to_string())
                    .unwrap_or_else(|_| language_code.to_string())
            );
            Ok(Self { engine })
        }
    }

    impl OcrEngine for WindowsOcrEngine {
        fn recognize_lines(&self, image: &DynamicImage) -> Result<Vec<String>> {
            let _com = ComGuard::initialize()?;
            let png = encode_png(image)?;

            let stream = InMemoryRandomAccessStream::new().context("Failed to create stream")?;
            let writer =
                DataWriter::CreateDataWriter(&stream).context("Failed to create writer")?;
            writer
                .WriteBytes(&png)
                .context("Failed to write image bytes")?;
            writer
                .StoreAsync()
                .context("Failed to store async")?
                .get()
                .context("Failed to store data")?;
            writer.FlushAsync().context("Failed to flush")?.get()?;
            stream.Seek(0).context("Failed to seek")?;

            let bitmap = BitmapDecoder::CreateAsync(&stream)
                .context("Failed to create decoder async")?
                .get()
                .context("Failed to get decoder")?
                .GetSoftwareBitmapAsync()
                .context("Failed to get bitmap async")?
                .get()
                .context("Failed to get software bitmap")?;

            let result = self
                .engine
                .RecognizeAsync(&bitmap)
                .context("Failed to recognize async")?
                .get()
                .context("Failed to get OCR result")?;

            let detected = result.Lines().context("Failed to get lines")?;
            let count = detected.Size().context("Failed to count lines")?;
            (0..count)
                .map(|i| {
                    let line = detected.GetAt(i).context("Failed to get line")?;
                    Ok(line.Text().context("Failed to get line text")?.to_string())
                })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use image::{GrayImage, Luma};

    use super::*;

    #[test]
    fn test_encode_png_roundtrips_size() {
        let image = DynamicImage::ImageLuma8(GrayImage::from_pixel(7, 3, Luma([255])));
        let png = encode_png(&image).unwrap();
        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (7, 3));
    }

    #[cfg(not(windows))]
    #[test]
    fn test_engine_unavailable_off_windows() {
        assert!(init_ocr_engine("en").is_err());
    }
}
