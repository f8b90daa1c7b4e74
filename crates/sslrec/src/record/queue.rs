//! Outbound record queue.
//!
//! Fully framed records wait here in write order until the transport has
//! taken every byte. Entries are appended at the tail and drained from the
//! head; partial transport writes are recorded on the head entry.

use std::collections::VecDeque;
use std::io::{ErrorKind, Write};

use tracing::trace;

use crate::buffer::SslBuffer;
use crate::RecordError;

/// Default maximum number of records waiting for the transport.
pub const DEFAULT_MAX_QUEUED_RECORDS: usize = 64;

/// A framed record and how much of it has been sent.
#[derive(Debug)]
pub struct QueuedRecord {
    sent: usize,
    buffer: SslBuffer,
}

impl QueuedRecord {
    pub fn new(buffer: SslBuffer) -> Self {
        Self { sent: 0, buffer }
    }

    /// Total framed length.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Bytes already handed to the transport.
    pub fn sent(&self) -> usize {
        self.sent
    }

    /// The bytes still to be sent.
    pub fn remaining(&self) -> &[u8] {
        &self.buffer[self.sent..]
    }

    pub fn is_complete(&self) -> bool {
        self.sent == self.buffer.len()
    }

    /// The full framed record.
    pub fn bytes(&self) -> &[u8] {
        &self.buffer
    }
}

/// FIFO of framed records awaiting transport.
#[derive(Debug)]
pub struct OutboundQueue {
    entries: VecDeque<QueuedRecord>,
    max_records: usize,
}

impl OutboundQueue {
    pub fn new(max_records: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            max_records,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if another record can be queued.
    pub fn has_room(&self) -> bool {
        self.entries.len() < self.max_records
    }

    /// Number of records that can still be queued.
    pub fn free_slots(&self) -> usize {
        self.max_records.saturating_sub(self.entries.len())
    }

    /// Append a framed record at the tail.
    pub fn push(&mut self, buffer: SslBuffer) -> Result<(), RecordError> {
        if !self.has_room() {
            return Err(RecordError::RecordOverflow(format!(
                "outbound queue full ({} records)",
                self.max_records
            )));
        }
        self.entries.push_back(QueuedRecord::new(buffer));
        Ok(())
    }

    /// The record the transport should send next.
    pub fn front(&self) -> Option<&QueuedRecord> {
        self.entries.front()
    }

    /// Unsent bytes across all entries.
    pub fn pending_bytes(&self) -> usize {
        self.entries.iter().map(|e| e.remaining().len()).sum()
    }

    /// Record that `n` bytes of the head entry were sent, removing it once
    /// complete. `n` is clamped to what the head entry has left.
    pub fn advance(&mut self, n: usize) {
        let Some(head) = self.entries.front_mut() else {
            return;
        };
        head.sent = (head.sent + n).min(head.buffer.len());
        if head.is_complete() {
            self.entries.pop_front();
        }
    }

    /// Remove and return the head entry.
    pub fn pop_front(&mut self) -> Option<QueuedRecord> {
        self.entries.pop_front()
    }

    /// Write queued records to `transport` until the queue is empty.
    ///
    /// Returns the number of bytes written. If the transport would block,
    /// progress so far is kept and the `WouldBlock` error is returned; the
    /// next call resumes where this one stopped.
    pub fn flush<W: Write + ?Sized>(&mut self, transport: &mut W) -> Result<usize, RecordError> {
        let mut written = 0;
        while let Some(head) = self.entries.front() {
            if head.is_complete() {
                self.entries.pop_front();
                continue;
            }
            match transport.write(head.remaining()) {
                Ok(0) => {
                    return Err(RecordError::Io(std::io::Error::new(
                        ErrorKind::WriteZero,
                        "transport accepted no bytes",
                    )))
                }
                Ok(n) => {
                    written += n;
                    self.advance(n);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        transport.flush()?;
        trace!(bytes = written, "outbound queue drained");
        Ok(written)
    }
}

impl Default for OutboundQueue {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_QUEUED_RECORDS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Accepts at most `chunk` bytes per write and blocks after `budget`.
    struct Trickle {
        out: Vec<u8>,
        chunk: usize,
        budget: usize,
    }

    impl Write for Trickle {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if self.budget == 0 {
                return Err(ErrorKind::WouldBlock.into());
            }
            let n = buf.len().min(self.chunk).min(self.budget);
            self.out.extend_from_slice(&buf[..n]);
            self.budget -= n;
            Ok(n)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_fifo_order() {
        let mut q = OutboundQueue::default();
        q.push(SslBuffer::from_slice(b"first")).unwrap();
        q.push(SslBuffer::from_slice(b"second")).unwrap();
        let mut out = Vec::new();
        let n = q.flush(&mut out).unwrap();
        assert_eq!(n, 11);
        assert_eq!(out, b"firstsecond");
        assert!(q.is_empty());
    }

    #[test]
    fn test_partial_progress_survives_would_block() {
        let mut q = OutboundQueue::default();
        q.push(SslBuffer::from_slice(b"abcdef")).unwrap();
        q.push(SslBuffer::from_slice(b"ghij")).unwrap();

        let mut t = Trickle {
            out: Vec::new(),
            chunk: 4,
            budget: 7,
        };
        let err = q.flush(&mut t).unwrap_err();
        assert!(!err.is_fatal());
        assert_eq!(q.len(), 1);
        assert_eq!(q.front().unwrap().sent(), 1);
        assert_eq!(q.pending_bytes(), 3);

        t.budget = 100;
        q.flush(&mut t).unwrap();
        assert_eq!(t.out, b"abcdefghij");
        assert!(q.is_empty());
    }

    #[test]
    fn test_advance_removes_only_when_complete() {
        let mut q = OutboundQueue::default();
        q.push(SslBuffer::from_slice(b"abc")).unwrap();
        q.advance(2);
        assert_eq!(q.front().unwrap().remaining(), b"c");
        q.advance(5);
        assert!(q.is_empty());
        q.advance(1);
    }

    #[test]
    fn test_queue_limit() {
        let mut q = OutboundQueue::new(1);
        q.push(SslBuffer::from_slice(b"a")).unwrap();
        assert!(!q.has_room());
        assert!(matches!(
            q.push(SslBuffer::from_slice(b"b")),
            Err(RecordError::RecordOverflow(_))
        ));
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn test_write_zero_is_fatal() {
        struct Closed;
        impl Write for Closed {
            fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
                Ok(0)
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }
        let mut q = OutboundQueue::default();
        q.push(SslBuffer::from_slice(b"a")).unwrap();
        assert!(q.flush(&mut Closed).unwrap_err().is_fatal());
    }
}
