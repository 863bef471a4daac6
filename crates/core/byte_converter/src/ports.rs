use async_trait::async_trait;
use mockall::automock;

/// Where the converter pulls its encoded bytes from.
#[automock]
#[async_trait]
pub trait ByteSource: Send + Sync {
    /// Read the next byte, or `None` once the stream is exhausted.
    ///
    /// After `None` the converter never calls this method again.
    async fn read_byte(&self) -> Option<u8>;
}

/// Where the converter pushes decoded values, one text per call.
///
/// Failures are the sink's own concern and are not reported back to the converter.
#[automock]
#[async_trait]
pub trait TextSink: Send + Sync {
    async fn write(&self, text: String);
}
