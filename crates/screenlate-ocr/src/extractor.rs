use screenlate_config::capture::PreprocessConfig;
use screenlate_core::{RecognitionError, TextExtractor};
use screenlate_types::Frame;

use crate::ocr::OcrEngine;
use crate::preprocess::preprocess;

/// Preprocessing plus OCR behind the pipeline's extractor contract
pub struct OcrTextExtractor {
    engine: Box<dyn OcrEngine>,
    preprocess: PreprocessConfig,
}

impl OcrTextExtractor {
    pub fn new(engine: Box<dyn OcrEngine>, preprocess: PreprocessConfig) -> Self {
        Self { engine, preprocess }
    }
}

impl TextExtractor for OcrTextExtractor {
    fn extract(&self, frame: &Frame) -> Result<String, RecognitionError> {
        let Some(image) = preprocess(frame, &self.preprocess) else {
            tracing::debug!("Skipping empty frame {}x{}", frame.width, frame.height);
            return Ok(String::new());
        };

        let lines = self
            .engine
            .recognize_lines(&image)
            .map_err(|e| RecognitionError::Engine(format!("{e:#}")))?;
        Ok(join_lines(&lines))
    }
}

fn join_lines(lines: &[String]) -> String {
    lines
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use image::DynamicImage;

    use super::*;

    struct FixedEngine {
        lines: Option<Vec<String>>,
        calls: Arc<AtomicUsize>,
    }

    impl OcrEngine for FixedEngine {
        fn recognize_lines(&self, _image: &DynamicImage) -> anyhow::Result<Vec<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.lines
                .clone()
                .ok_or_else(|| anyhow::anyhow!("engine crashed"))
        }
    }

    fn extractor(lines: Option<Vec<&str>>) -> (OcrTextExtractor, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let engine = FixedEngine {
            lines: lines.map(|l| l.into_iter().map(String::from).collect()),
            calls: calls.clone(),
        };
        (
            OcrTextExtractor::new(Box::new(engine), PreprocessConfig::default()),
            calls,
        )
    }

    fn frame() -> Frame {
        Frame::new(2, 2, vec![255; 16])
    }

    #[test]
    fn test_lines_joined_in_order() {
        let (extractor, _) = extractor(Some(vec!["  Hello ", "", "world"]));
        assert_eq!(extractor.extract(&frame()).unwrap(), "Hello\nworld");
    }

    #[test]
    fn test_engine_failure_is_reported() {
        let (extractor, calls) = extractor(None);
        match extractor.extract(&frame()) {
            Err(RecognitionError::Engine(message)) => assert!(message.contains("engine crashed")),
            other => panic!("expected a recognition error, got {other:?}"),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_empty_frame_skips_engine() {
        let (extractor, calls) = extractor(Some(vec!["text"]));
        assert_eq!(extractor.extract(&Frame::new(0, 0, Vec::new())).unwrap(), "");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
