use crate::ports::ByteSource;
use crate::ports::TextSink;
use async_trait::async_trait;
use std::io::ErrorKind;
use tokio::io::AsyncRead;
use tokio::io::AsyncReadExt;
use tokio::io::AsyncWrite;
use tokio::io::AsyncWriteExt;
use tokio::io::BufReader;
use tokio::sync::Mutex;
use tracing::error;
use tracing::warn;

/// A [ByteSource] reading from any tokio reader, e.g. a file or stdin.
///
/// Read errors end the stream, as the end of the input does.
pub struct ReaderSource<R> {
    reader: Mutex<BufReader<R>>,
}

impl<R: AsyncRead + Unpin + Send> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        ReaderSource {
            reader: Mutex::new(BufReader::new(reader)),
        }
    }
}

#[async_trait]
impl<R: AsyncRead + Unpin + Send> ByteSource for ReaderSource<R> {
    async fn read_byte(&self) -> Option<u8> {
        match self.reader.lock().await.read_u8().await {
            Ok(byte) => Some(byte),
            Err(err) if err.kind() == ErrorKind::UnexpectedEof => None,
            Err(err) => {
                warn!("Failed to read from the byte source, closing the stream: {err}");
                None
            }
        }
    }
}

/// A [TextSink] writing one text per line to any tokio writer, e.g. a file or stdout.
pub struct WriterSink<W> {
    writer: Mutex<W>,
}

impl<W: AsyncWrite + Unpin + Send> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        WriterSink {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

#[async_trait]
impl<W: AsyncWrite + Unpin + Send> TextSink for WriterSink<W> {
    async fn write(&self, text: String) {
        let mut writer = self.writer.lock().await;
        let line = format!("{text}\n");
        let written = match writer.write_all(line.as_bytes()).await {
            Ok(()) => writer.flush().await,
            Err(err) => Err(err),
        };
        if let Err(err) = written {
            error!("Failed to write {text:?} to the text sink: {err}");
        }
    }
}
