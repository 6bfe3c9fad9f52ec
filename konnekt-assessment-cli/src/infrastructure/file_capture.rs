use async_trait::async_trait;
use konnekt_assessment_core::{CaptureDevice, CaptureError, CaptureStream};
use std::io::ErrorKind;
use std::path::PathBuf;

/// Capture device that replays a pre-recorded audio file
#[derive(Debug, Clone)]
pub struct FileCaptureDevice {
    path: PathBuf,
    mime_type: String,
}

impl FileCaptureDevice {
    pub fn new(path: PathBuf) -> Self {
        let mime_type = mime_for(&path).to_string();
        Self { path, mime_type }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }
}

fn mime_for(path: &std::path::Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("wav") => "audio/wav",
        Some("ogg") | Some("oga") => "audio/ogg",
        Some("mp3") => "audio/mpeg",
        Some("m4a") | Some("mp4") => "audio/mp4",
        _ => "audio/webm",
    }
}

#[async_trait(?Send)]
impl CaptureDevice for FileCaptureDevice {
    async fn open(&self) -> Result<Box<dyn CaptureStream>, CaptureError> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|e| match e.kind() {
            ErrorKind::PermissionDenied => CaptureError::PermissionDenied,
            _ => CaptureError::DeviceUnavailable(format!("{}: {}", self.path.display(), e)),
        })?;

        tracing::debug!("Opened {} ({} bytes)", self.path.display(), bytes.len());
        Ok(Box::new(FileStream {
            bytes,
            mime_type: self.mime_type.clone(),
        }))
    }
}

struct FileStream {
    bytes: Vec<u8>,
    mime_type: String,
}

impl CaptureStream for FileStream {
    fn mime_type(&self) -> String {
        self.mime_type.clone()
    }

    fn finish(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.bytes)
    }

    fn release(&mut self) {
        self.bytes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_from_extension() {
        assert_eq!(FileCaptureDevice::new("take.wav".into()).mime_type(), "audio/wav");
        assert_eq!(FileCaptureDevice::new("take".into()).mime_type(), "audio/webm");
    }

    #[tokio::test]
    async fn test_missing_file_is_unavailable() {
        let device = FileCaptureDevice::new("/nonexistent/konnekt/take.webm".into());
        let result = device.open().await;
        assert!(matches!(result, Err(CaptureError::DeviceUnavailable(_))));
    }
}
