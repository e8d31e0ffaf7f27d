use super::error::ProtocolError;
use super::layout;

/// Splits a datagram into fixed-size records after validating its length.
pub struct DatagramReader<'a> {
    payload: &'a [u8],
}

impl<'a> DatagramReader<'a> {
    pub fn new(payload: &'a [u8]) -> Result<Self, ProtocolError> {
        if payload.len() % layout::RECORD_LEN != 0 {
            return Err(ProtocolError::MalformedPacket {
                len: payload.len(),
            });
        }
        Ok(Self { payload })
    }

    pub fn records(&self) -> impl Iterator<Item = RecordReader<'a>> + use<'a> {
        self.payload
            .chunks_exact(layout::RECORD_LEN)
            .filter_map(|chunk| <&[u8; layout::RECORD_LEN]>::try_from(chunk).ok())
            .map(RecordReader::new)
    }
}

/// Field access into one complete record.
pub struct RecordReader<'a> {
    record: &'a [u8; layout::RECORD_LEN],
}

impl<'a> RecordReader<'a> {
    pub fn new(record: &'a [u8; layout::RECORD_LEN]) -> Self {
        Self { record }
    }

    pub fn tag(&self) -> u8 {
        self.record[layout::TAG_OFFSET]
    }

    pub fn x(&self) -> u8 {
        self.record[layout::X_OFFSET]
    }

    pub fn y(&self) -> u8 {
        self.record[layout::Y_OFFSET]
    }

    pub fn red(&self) -> u8 {
        self.record[layout::RED_OFFSET]
    }

    pub fn green(&self) -> u8 {
        self.record[layout::GREEN_OFFSET]
    }

    pub fn blue(&self) -> u8 {
        self.record[layout::BLUE_OFFSET]
    }

    pub fn white(&self) -> u8 {
        self.record[layout::WHITE_OFFSET]
    }
}

#[cfg(test)]
mod tests {
    use super::{DatagramReader, RecordReader};
    use crate::protocol::error::ProtocolError;

    #[test]
    fn rejects_partial_record() {
        let payload = [0u8; 8];
        let err = DatagramReader::new(&payload).err().unwrap();
        assert_eq!(err, ProtocolError::MalformedPacket { len: 8 });
    }

    #[test]
    fn empty_datagram_has_no_records() {
        let reader = DatagramReader::new(&[]).unwrap();
        assert_eq!(reader.records().count(), 0);
    }

    #[test]
    fn splits_into_records() {
        let payload: Vec<u8> = (0..14).collect();
        let reader = DatagramReader::new(&payload).unwrap();
        let tags: Vec<u8> = reader.records().map(|r| r.tag()).collect();
        assert_eq!(tags, vec![0, 7]);
    }

    #[test]
    fn fields_follow_wire_offsets() {
        let record = [1u8, 2, 3, 4, 5, 6, 7];
        let reader = RecordReader::new(&record);
        assert_eq!((reader.tag(), reader.x(), reader.y()), (1, 2, 3));
        assert_eq!(
            (reader.red(), reader.green(), reader.blue(), reader.white()),
            (4, 5, 6, 7)
        );
    }
}
