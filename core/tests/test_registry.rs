// Format registry, detection and header codec.

#[cfg(test)]
mod tests {

    use objio::codec::{
        create_codec, decode_header_le, detect_format, encode_header_le, resolve, Codec, DocumentFlags,
        DocumentHeader, Format,
    };
    use objio::config::CodecConfig;
    use objio::constants::format_ids;
    use objio::io::ObjectIo;
    use objio::types::{DecodeError, ObjioError};
    use objio::utils::enum_name_or_hex;

// ## 1️⃣ Registry

    #[test]
    fn format_verify_accepts_known() {
        for f in [Format::Text, Format::Binary] {
            Format::verify(f as u16).unwrap();
        }
        assert!(matches!(Format::verify(0xFFFF), Err(ObjioError::UnsupportedFormat { format_id: 0xFFFF })));
    }

    #[test]
    fn resolve_describes_capabilities() {
        let text = resolve(format_ids::TEXT).unwrap();
        assert_eq!(text.format, Format::Text);
        assert!(text.human_readable);
        assert!(!text.preserves_identity);

        let binary = resolve(format_ids::BINARY).unwrap();
        assert_eq!(binary.name, "binary");
        assert!(binary.preserves_identity && binary.supports_cycles);

        assert!(resolve(0).is_err());
    }

    #[test]
    fn create_codec_honours_id_and_config() {
        let codec = create_codec(format_ids::BINARY, CodecConfig::default()).unwrap();
        assert_eq!(codec.format(), Format::Binary);

        let text = create_codec(format_ids::TEXT, CodecConfig::default()).unwrap();
        assert_eq!(text.format(), Format::Text);
        // Text documents are capped below the JSON reader's nesting limit.
        assert!(text.config().max_depth < CodecConfig::default().max_depth);

        let bad = CodecConfig { max_nodes: 0, ..CodecConfig::default() };
        assert!(matches!(create_codec(format_ids::TEXT, bad), Err(ObjioError::Config(_))));
    }

    #[test]
    fn enum_names_render_for_diagnostics() {
        assert_eq!(enum_name_or_hex::<Format>(format_ids::TEXT), "Text");
        assert_eq!(enum_name_or_hex::<Format>(0xBEEF), "0xbeef");
    }

// ## 2️⃣ Detection

    #[test]
    fn detect_from_document_prefix() {
        let mut text = ObjectIo::text(CodecConfig::default()).unwrap();
        let mut binary = ObjectIo::binary(CodecConfig::default()).unwrap();

        let t = text.to_bytes(&"x".to_string()).unwrap();
        let b = binary.to_bytes(&"x".to_string()).unwrap();
        assert_eq!(detect_format(&t), Some(Format::Text));
        assert_eq!(detect_format(&b), Some(Format::Binary));
        assert_eq!(detect_format(b"  \n {"), Some(Format::Text));
        assert_eq!(detect_format(b"PK\x03\x04"), None);
        assert_eq!(detect_format(b""), None);
    }

// ## 3️⃣ Header codec

    #[test]
    fn header_encode_decode_is_stable() {
        let header = DocumentHeader::new(DocumentFlags::HAS_CHECKSUM | DocumentFlags::HAS_NODES, 1234, 0xDEAD_BEEF);
        let bytes = encode_header_le(&header);
        assert_eq!(bytes.len(), DocumentHeader::LEN);
        assert_eq!(&bytes[8..12], &1234u32.to_le_bytes());
        assert_eq!(decode_header_le(&bytes).unwrap(), header);
    }

    #[test]
    fn header_rejects_unknown_flags() {
        let mut bytes = encode_header_le(&DocumentHeader::new(DocumentFlags::empty(), 0, 0));
        bytes[6] = 0x40;
        assert!(matches!(decode_header_le(&bytes), Err(DecodeError::Malformed(_))));
    }
}
