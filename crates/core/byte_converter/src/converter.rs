use crate::error::ConverterError;
use crate::ports::ByteSource;
use crate::ports::TextSink;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing::info;
use tracing::trace;
use tracing::warn;

/// Why a worker stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerExit {
    /// The source has no more bytes.
    EndOfStream,
    /// The worker has been asked to stop.
    Cancelled,
}

/// What a worker did before exiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerReport {
    pub exit: WorkerExit,
    /// Number of texts pushed to the sink.
    pub emitted: usize,
    /// Number of reserved bytes that produced nothing.
    pub skipped: usize,
}

/// Reads bytes from a [ByteSource], decodes them and writes their text to a [TextSink].
///
/// The work is done by a single background task, started with [Converter::start].
/// After each emitted value the task pauses, until either [Converter::resume]
/// lets it process the next byte or [Converter::stop] ends it.
///
/// The source and the sink are shared with the caller, who keeps them alive.
pub struct Converter {
    source: Arc<dyn ByteSource>,
    sink: Arc<dyn TextSink>,
    worker: Option<WorkerHandle>,
}

struct WorkerHandle {
    cancellation: CancellationToken,
    resume: mpsc::Sender<()>,
    task: JoinHandle<WorkerReport>,
}

impl Converter {
    pub fn new(source: Arc<dyn ByteSource>, sink: Arc<dyn TextSink>) -> Self {
        Converter {
            source,
            sink,
            worker: None,
        }
    }

    /// Spawn the background worker.
    ///
    /// Does nothing if a worker has already been started and not yet stopped,
    /// even if this worker reached the end of the stream.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&mut self) {
        if self.worker.is_some() {
            return;
        }

        let cancellation = CancellationToken::new();
        // A single slot: a resume sent before the worker pauses is kept, extra ones are merged.
        let (resume_sender, resume_receiver) = mpsc::channel(1);
        let worker = Worker {
            source: self.source.clone(),
            sink: self.sink.clone(),
            cancellation: cancellation.clone(),
            resume: resume_receiver,
            emitted: 0,
            skipped: 0,
        };

        info!("Starting the converter worker");
        let task = tokio::spawn(worker.run());
        self.worker = Some(WorkerHandle {
            cancellation,
            resume: resume_sender,
            task,
        });
    }

    /// Let a paused worker process the next byte.
    ///
    /// The signal is kept if the worker is still busy, so it is consumed by the next pause.
    /// Returns `false` if there is no worker to resume.
    pub fn resume(&self) -> bool {
        match &self.worker {
            Some(worker) if !worker.task.is_finished() => match worker.resume.try_send(()) {
                // A full slot means a resume is already pending.
                Ok(()) | Err(TrySendError::Full(())) => true,
                Err(TrySendError::Closed(())) => false,
            },
            _ => false,
        }
    }

    /// Stop the worker and wait for its termination.
    ///
    /// A worker waiting for its next byte gives up the read.
    /// Once a byte is read, the worker is not interrupted before the decoded text
    /// has been written: it then exits at its pause.
    ///
    /// Returns `Ok(None)` if the converter is already stopped.
    pub async fn stop(&mut self) -> Result<Option<WorkerReport>, ConverterError> {
        let Some(worker) = self.worker.take() else {
            return Ok(None);
        };

        worker.cancellation.cancel();
        let report = worker.task.await?;
        info!(
            "Converter worker stopped: {:?}, {} emitted, {} skipped",
            report.exit, report.emitted, report.skipped
        );
        Ok(Some(report))
    }

    /// Wait for the worker to terminate on its own, i.e. at the end of the stream.
    ///
    /// Contrary to [Converter::stop], the worker is not cancelled:
    /// this never returns while the worker is paused and nobody resumes it.
    pub async fn wait(&mut self) -> Result<Option<WorkerReport>, ConverterError> {
        let Some(worker) = self.worker.take() else {
            return Ok(None);
        };

        let report = worker.task.await?;
        Ok(Some(report))
    }

    /// Stop the worker, if any, and release the converter.
    ///
    /// This is the way to dispose of a converter: dropping it aborts the worker instead.
    pub async fn shutdown(mut self) -> Result<Option<WorkerReport>, ConverterError> {
        self.stop().await
    }

    /// True if a worker has been started and is still processing the stream.
    pub fn is_running(&self) -> bool {
        self.worker
            .as_ref()
            .is_some_and(|worker| !worker.task.is_finished())
    }
}

impl Drop for Converter {
    fn drop(&mut self) {
        if let Some(worker) = self.worker.take() {
            if !worker.task.is_finished() {
                warn!("Converter dropped with a running worker, aborting it");
            }
            worker.cancellation.cancel();
            worker.task.abort();
        }
    }
}

struct Worker {
    source: Arc<dyn ByteSource>,
    sink: Arc<dyn TextSink>,
    cancellation: CancellationToken,
    resume: mpsc::Receiver<()>,
    emitted: usize,
    skipped: usize,
}

impl Worker {
    async fn run(mut self) -> WorkerReport {
        let exit = loop {
            if self.cancellation.is_cancelled() {
                break WorkerExit::Cancelled;
            }

            // Only a pending read is given up, never a byte already read.
            let read = tokio::select! {
                biased;
                _ = self.cancellation.cancelled() => None,
                read = self.source.read_byte() => Some(read),
            };
            let Some(read) = read else {
                break WorkerExit::Cancelled;
            };
            let Some(byte) = read else {
                debug!("End of the byte stream");
                break WorkerExit::EndOfStream;
            };

            let Some(value) = byte_codec::decode(byte) else {
                trace!("Skipping reserved byte {byte:#010b}");
                self.skipped += 1;
                continue;
            };

            let text = value.to_string();
            debug!("Decoded {byte:#010b} as {value:?}");
            self.sink.write(text).await;
            self.emitted += 1;

            if !self.pause().await {
                break WorkerExit::Cancelled;
            }
        };

        WorkerReport {
            exit,
            emitted: self.emitted,
            skipped: self.skipped,
        }
    }

    /// Block till resumed. Returns `false` if the worker has to stop instead.
    async fn pause(&mut self) -> bool {
        tokio::select! {
            biased;
            _ = self.cancellation.cancelled() => false,
            resumed = self.resume.recv() => resumed.is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::MockByteSource;
    use crate::ports::MockTextSink;
    use std::time::Duration;
    use tokio::time::timeout;

    const TIMEOUT: Duration = Duration::from_secs(10);

    #[tokio::test]
    async fn stopping_a_stopped_converter_is_a_no_op() {
        let mut converter = Converter::new(
            Arc::new(MockByteSource::new()),
            Arc::new(MockTextSink::new()),
        );

        assert!(converter.stop().await.unwrap().is_none());
        assert!(converter.stop().await.unwrap().is_none());
        assert!(!converter.is_running());
    }

    #[tokio::test]
    async fn resuming_without_worker_is_refused() {
        let converter = Converter::new(
            Arc::new(MockByteSource::new()),
            Arc::new(MockTextSink::new()),
        );

        assert!(!converter.resume());
    }

    #[tokio::test]
    async fn end_of_stream_on_first_read_exits_without_writes() {
        let mut source = MockByteSource::new();
        source.expect_read_byte().times(1).returning(|| None);
        let mut sink = MockTextSink::new();
        sink.expect_write().never();

        let mut converter = Converter::new(Arc::new(source), Arc::new(sink));
        converter.start();

        let report = timeout(TIMEOUT, converter.wait())
            .await
            .expect("worker to exit")
            .unwrap();
        assert_eq!(
            report,
            Some(WorkerReport {
                exit: WorkerExit::EndOfStream,
                emitted: 0,
                skipped: 0,
            })
        );
    }

    #[tokio::test]
    async fn reserved_bytes_are_skipped_without_pausing() {
        let mut bytes = vec![0b1111_1111, 0b1100_0001, 0b1100_0010].into_iter();
        let mut source = MockByteSource::new();
        source
            .expect_read_byte()
            .times(4)
            .returning(move || bytes.next());
        let mut sink = MockTextSink::new();
        sink.expect_write().never();

        let mut converter = Converter::new(Arc::new(source), Arc::new(sink));
        converter.start();

        // No resume is ever sent: reaching the end proves that no pause occurred.
        let report = timeout(TIMEOUT, converter.wait())
            .await
            .expect("worker to exit")
            .unwrap()
            .unwrap();
        assert_eq!(report.exit, WorkerExit::EndOfStream);
        assert_eq!(report.skipped, 3);
    }

    #[tokio::test]
    async fn stop_after_end_of_stream_returns_the_report() {
        let mut source = MockByteSource::new();
        source.expect_read_byte().times(1).returning(|| None);

        let mut converter = Converter::new(Arc::new(source), Arc::new(MockTextSink::new()));
        converter.start();
        while converter.is_running() {
            tokio::task::yield_now().await;
        }

        let report = timeout(TIMEOUT, converter.stop())
            .await
            .expect("stop not to block")
            .unwrap();
        assert_eq!(report.map(|r| r.exit), Some(WorkerExit::EndOfStream));
        assert!(converter.stop().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn resuming_a_finished_worker_is_refused() {
        let mut source = MockByteSource::new();
        source.expect_read_byte().times(1).returning(|| None);

        let mut converter = Converter::new(Arc::new(source), Arc::new(MockTextSink::new()));
        converter.start();
        while converter.is_running() {
            tokio::task::yield_now().await;
        }

        assert!(!converter.resume());
    }
}
