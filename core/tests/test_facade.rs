// Facade: stream forms leave the caller's stream open, path forms own their
// file for exactly one call, and normalized sources/sinks dispatch to both.

#[cfg(test)]
mod tests {

    use std::collections::BTreeMap;
    use std::fs;
    use std::io::{Cursor, Read, Write};

    use objio::codec::{AnyCodec, Codec, Format};
    use objio::config::CodecConfig;
    use objio::constants::format_ids;
    use objio::io::{InputSource, ObjectIo, OutputSink};
    use objio::persist_record;
    use objio::types::ObjioError;
    use tempfile::tempdir;

    #[derive(Debug, Clone, PartialEq, Default)]
    struct Config {
        name: String,
        retries: u8,
        limits: BTreeMap<String, u64>,
    }
    persist_record!(Config => "config" { name, retries, limits });

    fn sample() -> Config {
        let mut limits = BTreeMap::new();
        limits.insert("cpu".to_string(), 4);
        limits.insert("mem".to_string(), 1 << 30);
        Config { name: "worker".into(), retries: 3, limits }
    }

    fn both() -> Vec<ObjectIo<AnyCodec>> {
        [format_ids::TEXT, format_ids::BINARY]
            .into_iter()
            .map(|id| ObjectIo::for_format(id, CodecConfig::default()).unwrap())
            .collect()
    }

// ## 1️⃣ Path forms

    #[test]
    fn path_roundtrip() {
        let dir = tempdir().unwrap();
        for mut io in both() {
            let path = dir.path().join(format!("sample.{}", io.format().name()));
            io.write_path(&sample(), &path).unwrap();
            assert!(fs::metadata(&path).unwrap().len() > 0);

            let back: Config = io.read_path(&path).unwrap();
            assert_eq!(back, sample());
        }
    }

    #[test]
    fn path_write_replaces_previous_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("twice.bin");
        let mut io = ObjectIo::binary(CodecConfig::default()).unwrap();

        io.write_path(&"a much longer first payload".to_string(), &path).unwrap();
        io.write_path(&"short".to_string(), &path).unwrap();
        let back: String = io.read_path(&path).unwrap();
        assert_eq!(back, "short");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempdir().unwrap();
        for mut io in both() {
            let err = io.read_path::<Config, _>(dir.path().join("absent")).unwrap_err();
            assert!(matches!(err, ObjioError::Io(_)), "{err}");
        }
    }

    #[test]
    fn failed_path_read_releases_the_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("wrong-type.txt");
        let mut io = ObjectIo::text(CodecConfig::default()).unwrap();
        io.write_path(&sample(), &path).unwrap();

        let err = io.read_path::<Vec<u8>, _>(&path).unwrap_err();
        assert!(matches!(err, ObjioError::TypeMismatch { .. }), "{err}");

        // Nothing holds the file: it can be removed and rewritten.
        fs::remove_file(&path).unwrap();
        io.write_path(&1u8, &path).unwrap();
        assert_eq!(io.read_path::<u8, _>(&path).unwrap(), 1);
    }

// ## 2️⃣ Stream forms

    #[test]
    fn caller_keeps_writing_after_a_document() {
        for mut io in both() {
            let mut stream = Vec::new();
            io.write(&sample(), &mut stream).unwrap();
            stream.write_all(b"TRAILER").unwrap();

            let mut cursor = Cursor::new(stream);
            let back: Config = io.read(&mut cursor).unwrap();
            assert_eq!(back, sample());

            let mut rest = String::new();
            cursor.read_to_string(&mut rest).unwrap();
            assert_eq!(rest.trim_start(), "TRAILER");
        }
    }

    #[test]
    fn many_documents_in_one_stream() {
        for mut io in both() {
            let mut stream = Vec::new();
            for i in 0..10u32 {
                io.write(&vec![i; i as usize], &mut stream).unwrap();
            }

            let mut input = stream.as_slice();
            for i in 0..10u32 {
                let back: Vec<u32> = io.read(&mut input).unwrap();
                assert_eq!(back, vec![i; i as usize]);
            }
            assert!(input.iter().all(|b| b.is_ascii_whitespace()));
        }
    }

// ## 3️⃣ Normalized sources and sinks

    #[test]
    fn sources_and_sinks_dispatch() {
        let dir = tempdir().unwrap();
        for mut io in both() {
            let mut buf = Vec::new();
            io.write_to(&sample(), OutputSink::Writer(&mut buf)).unwrap();

            let from_memory: Config = io.read_from(InputSource::Memory(&buf)).unwrap();
            assert_eq!(from_memory, sample());

            let mut cursor = Cursor::new(buf.clone());
            let from_reader: Config = io.read_from(InputSource::Reader(&mut cursor)).unwrap();
            assert_eq!(from_reader, sample());

            let path = dir.path().join(format!("sink.{}", io.format().name()));
            io.write_to(&sample(), OutputSink::File(path.clone())).unwrap();
            let from_file: Config = io.read_from(InputSource::File(path.clone())).unwrap();
            assert_eq!(from_file, sample());
            assert_eq!(fs::read(&path).unwrap(), buf);
        }
    }

    #[test]
    fn unknown_format_id_is_rejected() {
        let err = ObjectIo::for_format(0x7777, CodecConfig::default()).unwrap_err();
        assert!(matches!(err, ObjioError::UnsupportedFormat { format_id: 0x7777 }));
        assert_eq!(err.to_string(), "unsupported format: 0x7777");
    }

    #[test]
    fn counters_follow_the_facade() {
        let mut io = ObjectIo::text(CodecConfig::default()).unwrap();
        assert_eq!(io.format(), Format::Text);

        let bytes = io.to_bytes(&sample()).unwrap();
        let _: Config = io.from_bytes(&bytes).unwrap();
        let _ = io.from_bytes::<u8>(&bytes);

        let snap = io.counters();
        assert_eq!(snap.documents_written, 1);
        assert_eq!(snap.documents_read, 1);
        assert_eq!(snap.failed_reads, 1);
        assert_eq!(snap.bytes_written, bytes.len() as u64);
        assert_eq!(snap.session_resets, 3);
        assert_eq!(io.codec().counters(), snap);
    }
}
