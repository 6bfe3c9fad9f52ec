use crate::domain::encoding::encode_audio_data_url;
use crate::domain::ItemId;
use crate::error::CaptureError;
use async_trait::async_trait;
use uuid::Uuid;

/// Source of microphone streams
#[async_trait(?Send)]
pub trait CaptureDevice {
    /// Ask for permission and open a stream
    async fn open(&self) -> Result<Box<dyn CaptureStream>, CaptureError>;
}

/// An open capture stream
pub trait CaptureStream {
    fn mime_type(&self) -> String;

    /// Stop capturing and hand back the recorded bytes
    fn finish(&mut self) -> Vec<u8>;

    /// Give the device back; called exactly once per stream
    fn release(&mut self);
}

/// One finalized recording
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedTake {
    pub id: Uuid,
    pub item_id: ItemId,
    pub mime_type: String,
    pub duration_ms: u64,
    /// `data:<mime>;base64,<payload>`
    pub data_url: String,
}

impl CapturedTake {
    pub fn new(item_id: ItemId, mime_type: String, bytes: &[u8], duration_ms: u64) -> Self {
        let data_url = encode_audio_data_url(&mime_type, bytes);
        Self {
            id: Uuid::new_v4(),
            item_id,
            mime_type,
            duration_ms,
            data_url,
        }
    }
}
