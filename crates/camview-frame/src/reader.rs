use std::io::{ErrorKind, Read};
use std::time::{Duration, Instant};

use bytes::BytesMut;
use camview_transport::Transport;
use tracing::trace;

use crate::codec::Frame;
use crate::error::{FrameError, Result};
use crate::geometry::FrameGeometry;

pub use camview_transport::DEFAULT_READ_TIMEOUT;

/// Configuration for the frame reader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameConfig {
    /// Grid dimensions; one frame is `geometry.frame_size()` bytes.
    pub geometry: FrameGeometry,
    /// Overall deadline for collecting one frame.
    pub read_timeout: Duration,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            geometry: FrameGeometry::default(),
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }
}

/// How short an incomplete read fell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortfall {
    /// Nothing arrived before the deadline or end of stream.
    Empty,
    /// Some bytes arrived, but not a whole frame.
    Partial,
}

impl Shortfall {
    pub fn as_str(self) -> &'static str {
        match self {
            Shortfall::Empty => "empty",
            Shortfall::Partial => "partial",
        }
    }
}

/// A read that ended before a whole frame arrived. The bytes are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IncompleteFrame {
    /// Bytes actually received.
    pub received: usize,
    /// Bytes one frame needs.
    pub expected: usize,
}

impl IncompleteFrame {
    pub fn shortfall(&self) -> Shortfall {
        if self.received == 0 {
            Shortfall::Empty
        } else {
            Shortfall::Partial
        }
    }
}

/// Result of one frame read attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    Complete(Frame),
    Incomplete(IncompleteFrame),
}

/// Reads fixed-size frames from a [`Transport`].
///
/// Each call collects exactly `frame_size` bytes or gives up when the
/// deadline passes, the stream times out, or the stream ends. Every
/// underlying read is bounded by the time left until the deadline. Short
/// reads are reported, never carried over into the next frame.
pub struct FrameReader<T> {
    inner: T,
    buf: BytesMut,
    config: FrameConfig,
}

impl<T: Transport> FrameReader<T> {
    /// Create a new frame reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new frame reader with explicit configuration.
    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(config.geometry.frame_size()),
            config,
        }
    }

    /// Attempt to read the next frame (blocking up to the read timeout).
    ///
    /// Transport failures and I/O errors other than `TimedOut`,
    /// `WouldBlock`, and `Interrupted` are returned as `Err`.
    pub fn read_frame(&mut self) -> Result<ReadOutcome> {
        let expected = self.config.geometry.frame_size();
        let deadline = Instant::now() + self.config.read_timeout;

        self.buf.clear();
        self.buf.resize(expected, 0);

        let mut filled = 0usize;
        while filled < expected {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                trace!(filled, "frame deadline elapsed");
                break;
            }
            self.inner.set_read_timeout(remaining)?;

            match self.inner.read(&mut self.buf[filled..]) {
                Ok(0) => {
                    trace!(filled, "end of stream");
                    break;
                }
                Ok(n) => filled += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if matches!(err.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock) => {
                    trace!(filled, "read timed out");
                    break;
                }
                Err(err) => return Err(FrameError::Io(err)),
            }
        }

        if filled < expected {
            return Ok(ReadOutcome::Incomplete(IncompleteFrame {
                received: filled,
                expected,
            }));
        }

        let pixels = self.buf.split_to(expected).freeze();
        Frame::from_bytes(self.config.geometry, pixels).map(ReadOutcome::Complete)
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Current frame reader configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::thread;

    use camview_transport::TransportError;

    use super::*;

    fn config(width: usize, height: usize) -> FrameConfig {
        FrameConfig {
            geometry: FrameGeometry::new(width, height).unwrap(),
            read_timeout: Duration::from_secs(5),
        }
    }

    /// Replays a fixed script of read results, then reports end of stream.
    struct ScriptedReader {
        steps: VecDeque<std::io::Result<Vec<u8>>>,
        timeouts: Vec<Duration>,
    }

    impl ScriptedReader {
        fn new(steps: Vec<std::io::Result<Vec<u8>>>) -> Self {
            Self {
                steps: steps.into(),
                timeouts: Vec::new(),
            }
        }

        fn bytes(data: Vec<u8>) -> Self {
            Self::new(vec![Ok(data)])
        }
    }

    impl Read for ScriptedReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            match self.steps.pop_front() {
                None => Ok(0),
                Some(Err(err)) => Err(err),
                Some(Ok(mut chunk)) => {
                    let n = chunk.len().min(buf.len());
                    buf[..n].copy_from_slice(&chunk[..n]);
                    if n < chunk.len() {
                        self.steps.push_front(Ok(chunk.split_off(n)));
                    }
                    Ok(n)
                }
            }
        }
    }

    impl Transport for ScriptedReader {
        fn describe(&self) -> &str {
            "scripted"
        }

        fn close(&mut self) -> camview_transport::Result<()> {
            Ok(())
        }

        fn is_closed(&self) -> bool {
            false
        }

        fn set_read_timeout(&mut self, timeout: Duration) -> camview_transport::Result<()> {
            self.timeouts.push(timeout);
            Ok(())
        }
    }

    /// A line that delivers one byte per `delay` and honours its read timeout.
    struct TricklingPort {
        delay: Duration,
        timeout: Duration,
    }

    impl Read for TricklingPort {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.timeout < self.delay {
                thread::sleep(self.timeout);
                return Err(std::io::Error::from(ErrorKind::TimedOut));
            }
            thread::sleep(self.delay);
            buf[0] = 0xAA;
            Ok(1)
        }
    }

    impl Transport for TricklingPort {
        fn describe(&self) -> &str {
            "trickling"
        }

        fn close(&mut self) -> camview_transport::Result<()> {
            Ok(())
        }

        fn is_closed(&self) -> bool {
            false
        }

        fn set_read_timeout(&mut self, timeout: Duration) -> camview_transport::Result<()> {
            self.timeout = timeout;
            Ok(())
        }
    }

    /// Refuses every timeout change, like a port that was closed underneath.
    struct ClosedPort;

    impl Read for ClosedPort {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Ok(0)
        }
    }

    impl Transport for ClosedPort {
        fn describe(&self) -> &str {
            "closed"
        }

        fn close(&mut self) -> camview_transport::Result<()> {
            Ok(())
        }

        fn is_closed(&self) -> bool {
            true
        }

        fn set_read_timeout(&mut self, _timeout: Duration) -> camview_transport::Result<()> {
            Err(TransportError::Closed)
        }
    }

    #[test]
    fn read_single_frame() {
        let mut reader = FrameReader::with_config(ScriptedReader::bytes(vec![10, 20, 30, 40]), config(2, 2));
        let outcome = reader.read_frame().unwrap();

        match outcome {
            ReadOutcome::Complete(frame) => {
                assert_eq!(frame.to_grid(), vec![vec![10, 20], vec![30, 40]]);
            }
            other => panic!("expected frame, got {other:?}"),
        }
    }

    #[test]
    fn read_consecutive_frames() {
        let wire: Vec<u8> = (0..8).collect();
        let mut reader = FrameReader::with_config(ScriptedReader::bytes(wire), config(2, 2));

        let ReadOutcome::Complete(f1) = reader.read_frame().unwrap() else {
            panic!("first frame should be complete");
        };
        let ReadOutcome::Complete(f2) = reader.read_frame().unwrap() else {
            panic!("second frame should be complete");
        };

        assert_eq!(f1.as_bytes(), &[0, 1, 2, 3]);
        assert_eq!(f2.as_bytes(), &[4, 5, 6, 7]);
    }

    #[test]
    fn frame_assembled_from_chunks() {
        let script = ScriptedReader::new(vec![Ok(vec![1]), Ok(vec![2, 3]), Ok(vec![4])]);
        let mut reader = FrameReader::with_config(script, config(2, 2));

        let ReadOutcome::Complete(frame) = reader.read_frame().unwrap() else {
            panic!("chunks should assemble into one frame");
        };
        assert_eq!(frame.as_bytes(), &[1, 2, 3, 4]);
    }

    #[test]
    fn empty_stream_is_empty_shortfall() {
        let mut reader = FrameReader::new(ScriptedReader::new(Vec::new()));
        let outcome = reader.read_frame().unwrap();

        let ReadOutcome::Incomplete(incomplete) = outcome else {
            panic!("expected incomplete read");
        };
        assert_eq!(incomplete.received, 0);
        assert_eq!(incomplete.expected, 3600);
        assert_eq!(incomplete.shortfall(), Shortfall::Empty);
    }

    #[test]
    fn one_byte_short_is_incomplete() {
        let mut reader = FrameReader::new(ScriptedReader::bytes(vec![7u8; 3599]));
        let outcome = reader.read_frame().unwrap();

        assert_eq!(
            outcome,
            ReadOutcome::Incomplete(IncompleteFrame {
                received: 3599,
                expected: 3600,
            })
        );
    }

    #[test]
    fn empty_and_one_short_are_both_incomplete() {
        let mut empty = FrameReader::new(ScriptedReader::new(Vec::new()));
        let mut short = FrameReader::new(ScriptedReader::bytes(vec![0u8; 3599]));

        assert!(matches!(
            empty.read_frame().unwrap(),
            ReadOutcome::Incomplete(_)
        ));
        assert!(matches!(
            short.read_frame().unwrap(),
            ReadOutcome::Incomplete(_)
        ));
    }

    #[test]
    fn timeout_ends_read_with_partial_shortfall() {
        let script = ScriptedReader::new(vec![
            Ok(vec![1, 2]),
            Err(std::io::Error::from(ErrorKind::TimedOut)),
            Ok(vec![3, 4]),
        ]);
        let mut reader = FrameReader::with_config(script, config(2, 2));

        let ReadOutcome::Incomplete(incomplete) = reader.read_frame().unwrap() else {
            panic!("timeout should end the read");
        };
        assert_eq!(incomplete.received, 2);
        assert_eq!(incomplete.shortfall(), Shortfall::Partial);

        // Leftover bytes start a fresh frame; nothing is carried over.
        let ReadOutcome::Incomplete(next) = reader.read_frame().unwrap() else {
            panic!("only two bytes remain");
        };
        assert_eq!(next.received, 2);
    }

    #[test]
    fn would_block_counts_as_timeout() {
        let script = ScriptedReader::new(vec![Err(std::io::Error::from(ErrorKind::WouldBlock))]);
        let mut reader = FrameReader::with_config(script, config(2, 2));
        assert!(matches!(
            reader.read_frame().unwrap(),
            ReadOutcome::Incomplete(IncompleteFrame { received: 0, .. })
        ));
    }

    #[test]
    fn interrupted_read_retries() {
        let script = ScriptedReader::new(vec![
            Err(std::io::Error::from(ErrorKind::Interrupted)),
            Ok(vec![5, 6, 7, 8]),
        ]);
        let mut reader = FrameReader::with_config(script, config(2, 2));

        let ReadOutcome::Complete(frame) = reader.read_frame().unwrap() else {
            panic!("interrupted read should be retried");
        };
        assert_eq!(frame.as_bytes(), &[5, 6, 7, 8]);
    }

    #[test]
    fn other_io_errors_propagate() {
        let script = ScriptedReader::new(vec![Err(std::io::Error::from(
            ErrorKind::PermissionDenied,
        ))]);
        let mut reader = FrameReader::with_config(script, config(2, 2));
        let err = reader.read_frame().unwrap_err();
        assert!(matches!(err, FrameError::Io(e) if e.kind() == ErrorKind::PermissionDenied));
    }

    #[test]
    fn zero_deadline_reads_nothing() {
        let script = ScriptedReader::new(vec![Ok(vec![1]), Ok(vec![2]), Ok(vec![3])]);
        let cfg = FrameConfig {
            read_timeout: Duration::ZERO,
            ..config(2, 2)
        };
        let mut reader = FrameReader::with_config(script, cfg);

        let ReadOutcome::Incomplete(incomplete) = reader.read_frame().unwrap() else {
            panic!("zero deadline should not read at all");
        };
        assert_eq!(incomplete.shortfall(), Shortfall::Empty);
        assert!(reader.get_ref().timeouts.is_empty());
    }

    #[test]
    fn each_read_is_bounded_by_remaining_time() {
        let script = ScriptedReader::new(vec![Ok(vec![1]), Ok(vec![2]), Ok(vec![3, 4])]);
        let cfg = config(2, 2);
        let limit = cfg.read_timeout;
        let mut reader = FrameReader::with_config(script, cfg);

        assert!(matches!(
            reader.read_frame().unwrap(),
            ReadOutcome::Complete(_)
        ));

        let timeouts = &reader.get_ref().timeouts;
        assert_eq!(timeouts.len(), 3);
        assert!(timeouts.iter().all(|t| *t <= limit && !t.is_zero()));
        assert!(timeouts.windows(2).all(|pair| pair[1] <= pair[0]));
    }

    #[test]
    fn trickling_line_does_not_overrun_deadline() {
        let read_timeout = Duration::from_millis(300);
        let port = TricklingPort {
            delay: Duration::from_millis(250),
            timeout: read_timeout,
        };
        let cfg = FrameConfig {
            read_timeout,
            ..config(2, 2)
        };
        let mut reader = FrameReader::with_config(port, cfg);

        let started = Instant::now();
        let outcome = reader.read_frame().unwrap();
        let elapsed = started.elapsed();

        assert_eq!(
            outcome,
            ReadOutcome::Incomplete(IncompleteFrame {
                received: 1,
                expected: 4,
            })
        );
        assert!(
            elapsed < read_timeout + Duration::from_millis(120),
            "frame read took {elapsed:?}"
        );
    }

    #[test]
    fn transport_refusing_timeout_is_error() {
        let mut reader = FrameReader::with_config(ClosedPort, config(2, 2));
        assert!(matches!(
            reader.read_frame(),
            Err(FrameError::Transport(TransportError::Closed))
        ));
    }

    #[test]
    fn default_deadline_matches_serial_timeout() {
        assert_eq!(
            FrameConfig::default().read_timeout,
            camview_transport::SerialConfig::default().read_timeout
        );
    }

    #[test]
    fn accessors_and_into_inner() {
        let mut reader = FrameReader::new(ScriptedReader::new(Vec::new()));
        assert_eq!(reader.config().geometry.frame_size(), 3600);
        let _ = reader.get_ref();
        let _ = reader.get_mut();
        let _inner = reader.into_inner();
    }
}
