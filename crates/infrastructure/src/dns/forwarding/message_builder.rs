use super::record_type_map::RecordTypeMapper;
use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::{DNSClass, Name};
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use std::str::FromStr;
use subrecon_domain::{DomainError, RecordType};

/// Wire bytes of a single-question query plus the ID its answer must echo.
#[derive(Debug, Clone)]
pub struct EncodedQuery {
    pub id: u16,
    pub bytes: Vec<u8>,
}

impl EncodedQuery {
    /// True when `response_id` belongs to this query.
    pub fn matches(&self, response_id: u16) -> bool {
        self.id == response_id
    }
}

/// Encodes recursive `IN` class questions for the stub resolver.
pub struct MessageBuilder;

impl MessageBuilder {
    pub fn encode(name: &str, record_type: &RecordType) -> Result<EncodedQuery, DomainError> {
        Self::encode_with_id(name, record_type, fastrand::u16(..))
    }

    pub fn encode_with_id(
        name: &str,
        record_type: &RecordType,
        id: u16,
    ) -> Result<EncodedQuery, DomainError> {
        let owner = Name::from_str(name)
            .map_err(|e| DomainError::InvalidInput(format!("bad query name '{}': {}", name, e)))?;

        let mut question = Query::query(owner, RecordTypeMapper::to_hickory(record_type));
        question.set_query_class(DNSClass::IN);

        let mut message = Message::new(id, MessageType::Query, OpCode::Query);
        message.set_recursion_desired(true);
        message.add_query(question);

        // Names are capped at 255 octets, so a single question stays well under 512.
        let mut bytes = Vec::with_capacity(512);
        message
            .emit(&mut BinEncoder::new(&mut bytes))
            .map_err(|e| DomainError::Serialization(format!("encode {} {}: {}", record_type, name, e)))?;

        Ok(EncodedQuery { id, bytes })
    }
}
