use subrecon_domain::RecordType;
use subrecon_infrastructure::dns::forwarding::{MessageBuilder, ResponseParser};

// ============================================================================
// Query Building Tests
// ============================================================================

#[test]
fn test_encode_a_query() {
    let query = MessageBuilder::encode("example.com", &RecordType::A).unwrap();
    let bytes = &query.bytes;

    assert!(bytes.len() >= 12, "DNS message too short: {} bytes", bytes.len());
    assert_eq!(bytes[2] & 0x01, 0x01, "RD flag should be set");
    assert_eq!(bytes[2] & 0x80, 0, "QR bit must be clear on a query");
    assert_eq!(u16::from_be_bytes([bytes[4], bytes[5]]), 1, "exactly one question");
}

#[test]
fn test_encode_ptr_query() {
    let query = MessageBuilder::encode("34.216.184.93.in-addr.arpa", &RecordType::PTR).unwrap();
    assert!(query.bytes.len() > 12);
}

#[test]
fn test_encode_with_id_writes_header_id() {
    let query = MessageBuilder::encode_with_id("example.com", &RecordType::NS, 0xBEEF).unwrap();

    assert_eq!(query.id, 0xBEEF);
    assert_eq!(u16::from_be_bytes([query.bytes[0], query.bytes[1]]), 0xBEEF);
    assert!(query.matches(0xBEEF));
    assert!(!query.matches(0xBEEE));
}

#[test]
fn test_random_ids_vary() {
    let ids: std::collections::HashSet<u16> = (0..32)
        .map(|_| MessageBuilder::encode("example.com", &RecordType::A).unwrap().id)
        .collect();
    assert!(ids.len() > 1);
}

#[test]
fn test_encode_rejects_oversized_label() {
    let label = "a".repeat(70);
    let result = MessageBuilder::encode(&format!("{}.example.com", label), &RecordType::A);
    assert!(result.is_err());
}

// ============================================================================
// Response Parsing Tests
// ============================================================================

#[test]
fn test_parse_rejects_garbage() {
    assert!(ResponseParser::parse(&[0x12, 0x34]).is_err());
}

#[test]
fn test_parse_own_query_has_no_answers() {
    let query = MessageBuilder::encode_with_id("example.com", &RecordType::A, 7).unwrap();
    let parsed = ResponseParser::parse(&query.bytes).unwrap();

    assert_eq!(parsed.id, 7);
    assert!(parsed.addresses.is_empty());
    assert!(parsed.names.is_empty());
    assert!(!parsed.truncated);
    assert!(!parsed.is_nxdomain());
}
