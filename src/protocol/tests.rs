//! Tests for the response protocol.
//!
//! Responses are decoded back with `FrameReader` the way the client walks
//! them, so every declared count is checked against what was emitted.

use super::*;
use bytes::BytesMut;

fn int_column(name: &str) -> ColumnDescriptor {
    ColumnDescriptor {
        name: name.to_string(),
        table: String::new(),
        driver_type: DriverType::MySql(types::mysql_type::LONGLONG),
        declared_length: 1,
    }
}

fn select_one(value: i64) -> StatementOutcome {
    StatementOutcome::Succeeded(StatementResult {
        affected_rows: 0,
        insert_id: 0,
        columns: vec![int_column(&value.to_string())],
        rows: vec![vec![Some(Scalar::Int(value))]],
    })
}

fn read_echo_header(reader: &mut FrameReader<'_>) -> u32 {
    assert_eq!(reader.read_u32().unwrap(), MAGIC);
    assert_eq!(reader.read_u16().unwrap(), PROTOCOL_VERSION);
    let code = reader.read_u32().unwrap();
    reader.skip(6).unwrap();
    code
}

fn read_result_set_header(reader: &mut FrameReader<'_>) -> ResultSetHeader {
    let header = ResultSetHeader {
        error_code: reader.read_u32().unwrap(),
        affected_rows: reader.read_u32().unwrap(),
        insert_id: reader.read_u32().unwrap(),
        field_count: reader.read_u32().unwrap(),
        row_count: reader.read_u32().unwrap(),
    };
    reader.skip(12).unwrap();
    header
}

// ============================================================================
// Fixed-size frames
// ============================================================================

mod fixed_frames {
    use super::*;

    #[test]
    fn test_echo_header_layout() {
        for code in [0u32, 202, 2003, u32::MAX] {
            let encoded = EchoHeader::new(code).encode();
            assert_eq!(encoded.len(), EchoHeader::LEN);
            assert_eq!(&encoded[0..4], &1111u32.to_be_bytes());
            assert_eq!(&encoded[4..6], &202u16.to_be_bytes());
            assert_eq!(&encoded[6..10], &code.to_be_bytes());
            assert_eq!(&encoded[10..16], &[0u8; 6]);
        }
    }

    #[test]
    fn test_result_set_header_layout() {
        let header = ResultSetHeader {
            error_code: 1,
            affected_rows: 2,
            insert_id: 3,
            field_count: 4,
            row_count: 5,
        };
        let encoded = header.encode();
        assert_eq!(encoded.len(), ResultSetHeader::LEN);

        let mut reader = FrameReader::new(&encoded);
        assert_eq!(read_result_set_header(&mut reader), header);
        assert!(reader.is_empty());
    }

    #[test]
    fn test_failed_header_zeroes_counts() {
        let header = ResultSetHeader::failed(1064);
        assert_eq!(header.error_code, 1064);
        assert_eq!(header.affected_rows + header.insert_id, 0);
        assert_eq!(header.field_count + header.row_count, 0);
    }

    #[test]
    fn test_separator_bytes() {
        assert_eq!(&StatementSeparator::new(false).encode()[..], &[0x01]);
        assert_eq!(&StatementSeparator::new(true).encode()[..], &[0x00]);
    }
}

// ============================================================================
// Variable-size frames
// ============================================================================

mod variable_frames {
    use super::*;

    #[test]
    fn test_connection_info_blocks() {
        let info = ConnectionInfo {
            host_info: "db.local via TCP/IP".to_string(),
            protocol_version: "10".to_string(),
            server_version: "8.0.36".to_string(),
        };
        let encoded = info.encode();

        let mut reader = FrameReader::new(&encoded);
        assert_eq!(reader.read_block_string().unwrap(), "db.local via TCP/IP");
        assert_eq!(reader.read_block_string().unwrap(), "10");
        assert_eq!(reader.read_block_string().unwrap(), "8.0.36");
        assert!(reader.is_empty());
    }

    #[test]
    fn test_field_descriptor_maps_type() {
        let columns = vec![
            ColumnDescriptor {
                name: "id".to_string(),
                table: "users".to_string(),
                driver_type: DriverType::MySql(types::mysql_type::LONG),
                declared_length: 11,
            },
            ColumnDescriptor {
                name: "payload".to_string(),
                table: "users".to_string(),
                driver_type: DriverType::MySql(245),
                declared_length: 0,
            },
        ];
        let encoded = FieldDescriptors::new(&columns).encode();

        let mut reader = FrameReader::new(&encoded);
        let mut seen = Vec::new();
        while !reader.is_empty() {
            let name = reader.read_block_string().unwrap();
            let table = reader.read_block_string().unwrap();
            let code = reader.read_u32().unwrap();
            let flags = reader.read_u32().unwrap();
            let length = reader.read_u32().unwrap();
            seen.push((name, table, code, flags, length));
        }
        assert_eq!(
            seen,
            vec![
                ("id".to_string(), "users".to_string(), 3, 0, 11),
                ("payload".to_string(), "users".to_string(), 253, 0, 0),
            ]
        );
    }

    #[test]
    fn test_row_data_values() {
        let rows = vec![
            vec![
                Some(Scalar::Int(-7)),
                None,
                Some(Scalar::Double(1.5)),
                Some(Scalar::Text("héllo".to_string())),
            ],
            vec![
                Some(Scalar::UInt(u64::MAX)),
                Some(Scalar::Bytes(vec![0xFF, 0x00])),
                Some(Scalar::Float(0.25)),
                None,
            ],
        ];
        let encoded = RowData::new(&rows, 4).encode();

        let mut reader = FrameReader::new(&encoded);
        let mut values = Vec::new();
        while !reader.is_empty() {
            values.push(reader.read_value().unwrap().map(<[u8]>::to_vec));
        }
        assert_eq!(
            values,
            vec![
                Some(b"-7".to_vec()),
                None,
                Some(b"1.5".to_vec()),
                Some("héllo".as_bytes().to_vec()),
                Some(b"18446744073709551615".to_vec()),
                Some(vec![0xFF, 0x00]),
                Some(b"0.25".to_vec()),
                None,
            ]
        );
    }

    #[test]
    fn test_float_text_is_shortest_round_trip() {
        assert_eq!(Scalar::Double(1.0).to_text(), &b"1"[..]);
        assert_eq!(Scalar::Double(-0.5).to_text(), &b"-0.5"[..]);
        assert_eq!(
            Scalar::Double(1e21).to_text(),
            &b"1000000000000000000000"[..]
        );
        assert_eq!(Scalar::Float(0.1).to_text(), &b"0.1"[..]);
    }

    #[test]
    fn test_null_is_single_marker_byte() {
        let rows = vec![vec![None]];
        let encoded = RowData::new(&rows, 1).encode();
        assert_eq!(&encoded[..], &[NULL_MARKER]);
    }

    #[test]
    fn test_long_text_value_uses_escape() {
        let text = "x".repeat(300);
        let rows = vec![vec![Some(Scalar::Text(text.clone()))]];
        let encoded = RowData::new(&rows, 1).encode();
        assert_eq!(encoded.len(), 5 + 300);

        let (payload, next) = decode_block(&encoded, 0).unwrap();
        assert_eq!(payload, text.as_bytes());
        assert_eq!(next, encoded.len());
    }
}

// ============================================================================
// Whole responses
// ============================================================================

mod responses {
    use super::*;

    #[test]
    fn test_connection_failure_length() {
        let text = "Can't connect to MySQL server on 'nowhere' (111)";
        let body = error_response(2003, text);
        assert_eq!(body.len(), 16 + 1 + text.len());

        let mut reader = FrameReader::new(&body);
        assert_eq!(read_echo_header(&mut reader), 2003);
        assert_eq!(reader.read_block_string().unwrap(), text);
        assert!(reader.is_empty());
    }

    #[test]
    fn test_two_selects_batch() {
        let mut response = ResponseBuilder::new();
        response.push(&EchoHeader::ok());
        response.push_statement(&select_one(1), false);
        response.push_statement(&select_one(2), true);
        let body = response.finish();

        let mut reader = FrameReader::new(&body);
        assert_eq!(read_echo_header(&mut reader), 0);

        for (expected, separator) in [(b"1", 0x01u8), (b"2", 0x00u8)] {
            let header = read_result_set_header(&mut reader);
            assert_eq!(
                header,
                ResultSetHeader {
                    error_code: 0,
                    affected_rows: 0,
                    insert_id: 0,
                    field_count: 1,
                    row_count: 1,
                }
            );
            // field descriptor
            reader.read_block().unwrap();
            reader.read_block().unwrap();
            assert_eq!(reader.read_u32().unwrap(), ProtocolType::BigInt.code());
            reader.skip(8).unwrap();
            // row data
            assert_eq!(reader.read_value().unwrap(), Some(&expected[..]));
            assert_eq!(reader.read_u8().unwrap(), separator);
        }
        assert!(reader.is_empty());
    }

    #[test]
    fn test_update_then_failure_does_not_abort() {
        let mut response = ResponseBuilder::new();
        response.push(&EchoHeader::ok());
        response.push_statement(
            &StatementOutcome::Succeeded(StatementResult::modified(3, 0)),
            false,
        );
        response.push_statement(
            &StatementOutcome::Failed {
                code: 1064,
                message: "You have an error in your SQL syntax".to_string(),
            },
            true,
        );
        let body = response.finish();

        let mut reader = FrameReader::new(&body);
        assert_eq!(read_echo_header(&mut reader), 0);

        let first = read_result_set_header(&mut reader);
        assert_eq!((first.error_code, first.affected_rows), (0, 3));
        assert_eq!((first.field_count, first.row_count), (0, 0));
        assert_eq!(reader.read_block_string().unwrap(), "Rows matched: 3");
        assert_eq!(reader.read_u8().unwrap(), 0x01);

        let second = read_result_set_header(&mut reader);
        assert_eq!(second, ResultSetHeader::failed(1064));
        assert_eq!(
            reader.read_block_string().unwrap(),
            "You have an error in your SQL syntax"
        );
        assert_eq!(reader.read_u8().unwrap(), 0x00);
        assert!(reader.is_empty());
    }

    #[test]
    fn test_empty_select_keeps_field_descriptors() {
        let outcome = StatementOutcome::Succeeded(StatementResult {
            columns: vec![int_column("id")],
            ..StatementResult::default()
        });
        let encoded = outcome.encode();

        let mut reader = FrameReader::new(&encoded);
        let header = read_result_set_header(&mut reader);
        assert_eq!((header.field_count, header.row_count), (1, 0));
        assert_eq!(reader.read_block_string().unwrap(), "id");
        reader.read_block().unwrap();
        reader.skip(12).unwrap();
        assert!(reader.is_empty());
    }

    #[test]
    fn test_oversized_counts_saturate() {
        let result = StatementResult::modified(u64::MAX, 1 << 40);
        let header = result.header();
        assert_eq!(header.affected_rows, u32::MAX);
        assert_eq!(header.insert_id, u32::MAX);
    }

    #[test]
    fn test_builder_tracks_length() {
        let mut response = ResponseBuilder::new();
        assert!(response.is_empty());
        response.push(&EchoHeader::ok()).push(&DiagnosticMessage::new("ok"));
        assert_eq!(response.len(), 16 + 3);
    }
}

// ============================================================================
// Properties
// ============================================================================

mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn block_round_trip(data in proptest::collection::vec(any::<u8>(), 0..600)) {
            let encoded = encode_block(&data);
            let (payload, next) = decode_block(&encoded, 0).unwrap();
            prop_assert_eq!(payload, &data[..]);
            prop_assert_eq!(next, encoded.len());
            prop_assert_eq!(encoded.len(), block::encoded_len(data.len()));
        }

        #[test]
        fn block_never_starts_with_null_marker(data in proptest::collection::vec(any::<u8>(), 0..600)) {
            let encoded = encode_block(&data);
            prop_assert_ne!(encoded[0], NULL_MARKER);
        }

        #[test]
        fn batch_has_one_separator_per_statement(
            outcomes in proptest::collection::vec((any::<bool>(), 0u64..1000), 1..8)
        ) {
            let mut buf = BytesMut::new();
            let total = outcomes.len();
            for (i, (failed, affected)) in outcomes.iter().enumerate() {
                let outcome = if *failed {
                    StatementOutcome::Failed { code: 1146, message: "missing table".to_string() }
                } else {
                    StatementOutcome::Succeeded(StatementResult::modified(*affected, 0))
                };
                outcome.encode_to(&mut buf);
                StatementSeparator::new(i + 1 == total).encode_to(&mut buf);
            }

            let mut reader = FrameReader::new(&buf);
            let mut separators = Vec::new();
            while !reader.is_empty() {
                read_result_set_header(&mut reader);
                reader.read_block().unwrap();
                separators.push(reader.read_u8().unwrap());
            }
            prop_assert_eq!(separators.len(), total);
            prop_assert_eq!(separators[total - 1], 0x00);
            prop_assert!(separators[..total - 1].iter().all(|b| *b == 0x01));
        }
    }
}
