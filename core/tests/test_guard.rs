// Ownership guard: close must never end the caller's stream, and every
// other operation must reach the wrapped stream unchanged.

#[cfg(test)]
mod tests {

    use std::io::{self, BufRead, Cursor, Read, Seek, SeekFrom, Write};

    use objio::codec::{BinaryCodec, Codec, TextCodec};
    use objio::guard::{CloseableRead, CloseableWrite, NonClosingReader, NonClosingWriter};
    use objio::io::ObjectIo;
    use objio::config::CodecConfig;

    /// Sink that records flushes and refuses writes once closed.
    #[derive(Debug, Default, PartialEq)]
    struct TrackingSink {
        data: Vec<u8>,
        flushes: usize,
        closed: bool,
    }

    impl Write for TrackingSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.closed {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"));
            }
            self.data.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            self.flushes += 1;
            Ok(())
        }
    }

    impl CloseableWrite for TrackingSink {
        fn close(mut self) -> io::Result<()> {
            self.closed = true;
            Ok(())
        }
    }

// ## 1️⃣ Writer guard

    #[test]
    fn writer_close_flushes_and_keeps_sink_usable() {
        let mut sink = TrackingSink::default();
        {
            let mut guard = NonClosingWriter::new(&mut sink);
            guard.write_all(b"abc").unwrap();
            guard.close().unwrap();
        }
        assert_eq!(sink.flushes, 1);
        assert!(!sink.closed);

        sink.write_all(b"def").unwrap();
        assert_eq!(sink.data, b"abcdef");
    }

    #[test]
    fn writer_forwards_seek() {
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut guard = NonClosingWriter::new(&mut cursor);
            guard.write_all(b"hello").unwrap();
            guard.seek(SeekFrom::Start(0)).unwrap();
            guard.write_all(b"J").unwrap();
            assert_eq!(guard.stream_position().unwrap(), 1);
        }
        assert_eq!(cursor.into_inner(), b"Jello");
    }

    #[test]
    fn writer_forwards_debug_and_equality() {
        let mut sink = vec![1u8, 2, 3];
        let expected_debug = format!("{:?}", sink);
        let guard = NonClosingWriter::new(&mut sink);

        assert_eq!(format!("{:?}", guard), expected_debug);
        assert!(guard == vec![1u8, 2, 3]);
        assert!(guard != vec![9u8]);
    }

    #[test]
    fn writer_identity_is_the_wrapped_stream() {
        let mut a = Vec::<u8>::new();
        let b = Vec::<u8>::new();
        let a_ptr: *const Vec<u8> = &a;
        let guard = NonClosingWriter::new(&mut a);

        assert!(std::ptr::eq(guard.get_ref() as *const Vec<u8>, a_ptr));
        assert!(!guard.is_wrapping(&b));
    }

// ## 2️⃣ Reader guard

    #[test]
    fn reader_close_is_noop_and_keeps_position() {
        let mut cursor = Cursor::new(b"0123456789".to_vec());
        {
            let mut guard = NonClosingReader::new(&mut cursor);
            let mut buf = [0u8; 4];
            guard.read_exact(&mut buf).unwrap();
            assert_eq!(&buf, b"0123");
            guard.close().unwrap();
        }
        let mut rest = String::new();
        cursor.read_to_string(&mut rest).unwrap();
        assert_eq!(rest, "456789");
    }

    #[test]
    fn reader_forwards_skip_and_buffered_reads() {
        let mut cursor = Cursor::new(b"skip-me\nline two\n".to_vec());
        let mut guard = NonClosingReader::new(&mut cursor);

        guard.seek(SeekFrom::Current(5)).unwrap();
        let mut line = String::new();
        guard.read_line(&mut line).unwrap();
        assert_eq!(line, "me\n");

        let buf = guard.fill_buf().unwrap().to_vec();
        assert_eq!(buf, b"line two\n");
        guard.consume(4);
        let mut rest = String::new();
        guard.read_to_string(&mut rest).unwrap();
        assert_eq!(rest, " two\n");
    }

// ## 3️⃣ Codecs close what they are given; the guard absorbs it

    #[test]
    fn codec_closes_an_owned_sink() {
        let mut codec = BinaryCodec::default();
        let mut sink = TrackingSink::default();
        codec.encode(&42i64, NonClosingWriter::new(&mut sink)).unwrap();
        assert!(!sink.closed);

        // Handing the sink over directly lets the codec close it.
        codec.encode(&7i64, sink).unwrap();
    }

    #[test]
    fn stream_stays_open_across_facade_calls() {
        for format in ["text", "binary"] {
            let mut sink = TrackingSink::default();
            match format {
                "text" => {
                    let mut io = ObjectIo::text(CodecConfig::default()).unwrap();
                    io.write(&"first".to_string(), &mut sink).unwrap();
                    io.write(&"second".to_string(), &mut sink).unwrap();
                }
                _ => {
                    let mut io = ObjectIo::binary(CodecConfig::default()).unwrap();
                    io.write(&"first".to_string(), &mut sink).unwrap();
                    io.write(&"second".to_string(), &mut sink).unwrap();
                }
            }
            assert!(!sink.closed, "{format}");
            assert!(sink.flushes >= 2, "{format}");
            sink.write_all(b"tail").unwrap();
            assert!(sink.data.ends_with(b"tail"));
        }
    }

    #[test]
    fn failed_write_leaves_the_sink_open() {
        let mut sink = TrackingSink::default();

        let mut text = ObjectIo::text(CodecConfig::default()).unwrap();
        assert!(text.write(&f64::NAN, &mut sink).is_err());
        assert!(!sink.closed);

        let small = CodecConfig { max_document_len: 8, ..CodecConfig::default() };
        let mut binary = ObjectIo::binary(small).unwrap();
        assert!(binary.write(&"x".repeat(64), &mut sink).is_err());
        assert!(!sink.closed);

        sink.write_all(b"still open").unwrap();
        binary.write(&1u8, &mut sink).unwrap();
        text.write(&2u8, &mut sink).unwrap();
        assert!(!sink.closed);
        assert!(sink.data.starts_with(b"still open"));
    }

    #[test]
    fn failed_read_leaves_the_source_positioned_at_the_next_document() {
        for format in ["text", "binary"] {
            let mut io = match format {
                "text" => ObjectIo::new(objio::codec::AnyCodec::from(TextCodec::default())),
                _ => ObjectIo::new(objio::codec::AnyCodec::from(BinaryCodec::default())),
            };
            let mut bytes = Vec::new();
            io.write(&"first".to_string(), &mut bytes).unwrap();
            io.write(&2u32, &mut bytes).unwrap();

            let mut cursor = Cursor::new(bytes);
            assert!(io.read::<i64, _>(&mut cursor).is_err(), "{format}");
            let second: u32 = io.read(&mut cursor).unwrap();
            assert_eq!(second, 2, "{format}");
        }
    }

    #[test]
    fn reader_guard_lets_text_codec_read_twice() {
        let mut codec = TextCodec::default();
        let mut bytes = Vec::new();
        codec.encode(&1u8, NonClosingWriter::new(&mut bytes)).unwrap();
        codec.encode(&2u8, NonClosingWriter::new(&mut bytes)).unwrap();

        let mut cursor = Cursor::new(bytes);
        let a: u8 = codec.decode(NonClosingReader::new(&mut cursor)).unwrap();
        let b: u8 = codec.decode(NonClosingReader::new(&mut cursor)).unwrap();
        assert_eq!((a, b), (1, 2));
    }
}
