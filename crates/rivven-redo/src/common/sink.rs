//! Byte sinks receiving serialized messages
//!
//! The output buffer calls [`ByteSink::append`] with one complete serialized
//! message and then [`ByteSink::commit`] to mark the message boundary. When
//! either call fails the buffer calls [`ByteSink::abort`], and the sink must
//! drop whatever was appended since the last successful commit.
//! Transport concerns (delivery guarantees, offsets, retry) belong to the
//! sink implementation, not to this crate.

use crate::common::{OutputFormat, Result};
use bytes::{BufMut, Bytes, BytesMut};
use std::io::{self, Write};

/// Destination for serialized messages
pub trait ByteSink {
    /// Append bytes to the message being delivered
    fn append(&mut self, data: &[u8]) -> Result<()>;

    /// Mark the end of one logical message
    fn commit(&mut self) -> Result<()>;

    /// Discard bytes appended since the last commit
    fn abort(&mut self) {}
}

impl<S: ByteSink + ?Sized> ByteSink for Box<S> {
    fn append(&mut self, data: &[u8]) -> Result<()> {
        (**self).append(data)
    }

    fn commit(&mut self) -> Result<()> {
        (**self).commit()
    }

    fn abort(&mut self) {
        (**self).abort()
    }
}

/// Collects committed messages in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    pending: BytesMut,
    messages: Vec<Bytes>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Committed messages, oldest first
    pub fn messages(&self) -> &[Bytes] {
        &self.messages
    }

    /// Bytes appended since the last commit
    pub fn pending(&self) -> &[u8] {
        &self.pending
    }

    /// Take all committed messages, leaving the sink empty
    pub fn drain(&mut self) -> Vec<Bytes> {
        std::mem::take(&mut self.messages)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl ByteSink for MemorySink {
    fn append(&mut self, data: &[u8]) -> Result<()> {
        self.pending.extend_from_slice(data);
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        let message = self.pending.split().freeze();
        self.messages.push(message);
        Ok(())
    }

    fn abort(&mut self) {
        self.pending.clear();
    }
}

/// How [`WriterSink`] separates messages on a byte stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Framing {
    /// 4-byte big-endian length before every message
    #[default]
    LengthPrefixed,
    /// `\n` after every message; only for compact JSON
    NewlineDelimited,
}

impl Framing {
    /// Default framing for a serializer format
    pub fn for_format(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Protobuf => Self::LengthPrefixed,
            OutputFormat::Json => Self::NewlineDelimited,
        }
    }

    /// Frame overhead in bytes
    pub fn overhead(&self) -> usize {
        match self {
            Self::LengthPrefixed => 4,
            Self::NewlineDelimited => 1,
        }
    }
}

/// Writes framed messages to an [`std::io::Write`].
///
/// Appended bytes are held until [`ByteSink::commit`], which writes the whole
/// frame with a single `write_all` and flushes. Nothing reaches the writer
/// for a message that is aborted before its commit.
#[derive(Debug)]
pub struct WriterSink<W: Write> {
    writer: W,
    framing: Framing,
    pending: BytesMut,
    committed: u64,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W, framing: Framing) -> Self {
        Self {
            writer,
            framing,
            pending: BytesMut::new(),
            committed: 0,
        }
    }

    /// Sink framed the way `format` is usually read back
    pub fn for_format(writer: W, format: OutputFormat) -> Self {
        Self::new(writer, Framing::for_format(format))
    }

    pub fn framing(&self) -> Framing {
        self.framing
    }

    /// Number of commits seen
    pub fn committed(&self) -> u64 {
        self.committed
    }

    /// Bytes appended since the last commit
    pub fn pending(&self) -> &[u8] {
        &self.pending
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn frame(&mut self) -> Result<BytesMut> {
        let body = self.pending.split();
        let mut frame = BytesMut::with_capacity(body.len() + self.framing.overhead());
        match self.framing {
            Framing::LengthPrefixed => {
                let len = u32::try_from(body.len()).map_err(|_| {
                    io::Error::new(
                        io::ErrorKind::InvalidInput,
                        format!("message of {} bytes exceeds frame limit", body.len()),
                    )
                })?;
                frame.put_u32(len);
                frame.extend_from_slice(&body);
            }
            Framing::NewlineDelimited => {
                frame.extend_from_slice(&body);
                frame.put_u8(b'\n');
            }
        }
        Ok(frame)
    }
}

impl<W: Write> ByteSink for WriterSink<W> {
    fn append(&mut self, data: &[u8]) -> Result<()> {
        self.pending.extend_from_slice(data);
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        let frame = self.frame()?;
        self.writer.write_all(&frame)?;
        self.writer.flush()?;
        self.committed += 1;
        Ok(())
    }

    fn abort(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_splits_on_commit() {
        let mut sink = MemorySink::new();
        sink.append(b"ab").unwrap();
        sink.append(b"c").unwrap();
        assert_eq!(sink.pending(), b"abc");
        assert!(sink.is_empty());

        sink.commit().unwrap();
        sink.append(b"d").unwrap();
        sink.commit().unwrap();

        assert_eq!(sink.len(), 2);
        assert_eq!(&sink.messages()[0][..], b"abc");
        assert_eq!(&sink.messages()[1][..], b"d");
        assert!(sink.pending().is_empty());

        let drained = sink.drain();
        assert_eq!(drained.len(), 2);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_memory_sink_abort() {
        let mut sink = MemorySink::new();
        sink.append(b"lost").unwrap();
        sink.abort();
        sink.append(b"kept").unwrap();
        sink.commit().unwrap();
        assert_eq!(sink.len(), 1);
        assert_eq!(&sink.messages()[0][..], b"kept");
    }

    #[test]
    fn test_writer_sink_length_prefixed() {
        let mut sink = WriterSink::new(Vec::new(), Framing::LengthPrefixed);
        sink.append(b"hello").unwrap();
        assert!(sink.get_ref().is_empty());
        sink.commit().unwrap();
        sink.append(b"ab").unwrap();
        sink.append(b"c").unwrap();
        sink.commit().unwrap();

        assert_eq!(sink.committed(), 2);
        assert_eq!(
            sink.into_inner(),
            b"\x00\x00\x00\x05hello\x00\x00\x00\x03abc".to_vec()
        );
    }

    #[test]
    fn test_writer_sink_newline_delimited() {
        let mut sink = WriterSink::for_format(Vec::new(), OutputFormat::Json);
        assert_eq!(sink.framing(), Framing::NewlineDelimited);
        for doc in [&b"{\"a\":1}"[..], b"{\"b\":2}"] {
            sink.append(doc).unwrap();
            sink.commit().unwrap();
        }
        assert_eq!(sink.into_inner(), b"{\"a\":1}\n{\"b\":2}\n".to_vec());
    }

    #[test]
    fn test_writer_sink_abort_writes_nothing() {
        let mut sink = WriterSink::for_format(Vec::new(), OutputFormat::Protobuf);
        sink.append(b"partial").unwrap();
        sink.abort();
        assert!(sink.pending().is_empty());
        assert_eq!(sink.committed(), 0);
        assert!(sink.into_inner().is_empty());
    }

    #[test]
    fn test_boxed_sink() {
        let mut sink: Box<MemorySink> = Box::default();
        sink.append(b"x").unwrap();
        sink.abort();
        sink.append(b"y").unwrap();
        sink.commit().unwrap();
        assert_eq!(sink.len(), 1);
        assert_eq!(&sink.messages()[0][..], b"y");
    }
}
