use super::error::ProtocolError;
use super::layout;
use super::reader::{DatagramReader, RecordReader};
use crate::color::Rgb;

/// One decoded 7-byte record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Push the whole framebuffer to the LED chain.
    Flush,
    /// Store one pixel. `w` travels on the wire but is not part of the
    /// stored color.
    SetPixel {
        x: u8,
        y: u8,
        r: u8,
        g: u8,
        b: u8,
        w: u8,
    },
}

impl Command {
    pub fn set_pixel(x: u8, y: u8, color: Rgb) -> Self {
        Command::SetPixel {
            x,
            y,
            r: color.r,
            g: color.g,
            b: color.b,
            w: 0,
        }
    }

    /// Encodes the command as a single wire record.
    pub fn encode(&self) -> [u8; layout::RECORD_LEN] {
        let mut record = [0u8; layout::RECORD_LEN];
        match *self {
            Command::Flush => record[layout::TAG_OFFSET] = layout::TAG_FLUSH,
            Command::SetPixel { x, y, r, g, b, w } => {
                record[layout::TAG_OFFSET] = layout::TAG_SET_PIXEL;
                record[layout::X_OFFSET] = x;
                record[layout::Y_OFFSET] = y;
                record[layout::RED_OFFSET] = r;
                record[layout::GREEN_OFFSET] = g;
                record[layout::BLUE_OFFSET] = b;
                record[layout::WHITE_OFFSET] = w;
            }
        }
        record
    }
}

/// Concatenates commands into one datagram body.
pub fn encode_commands(commands: &[Command]) -> Vec<u8> {
    let mut out = Vec::with_capacity(commands.len() * layout::RECORD_LEN);
    for command in commands {
        out.extend_from_slice(&command.encode());
    }
    out
}

/// Decode a single record.
///
/// Returns `None` for tags this protocol version does not know.
pub fn parse_record(record: &RecordReader<'_>) -> Option<Command> {
    match record.tag() {
        layout::TAG_FLUSH => Some(Command::Flush),
        layout::TAG_SET_PIXEL => Some(Command::SetPixel {
            x: record.x(),
            y: record.y(),
            r: record.red(),
            g: record.green(),
            b: record.blue(),
            w: record.white(),
        }),
        _ => None,
    }
}

/// Decode a datagram into its records, in arrival order.
///
/// The length check happens up front, so a malformed datagram yields no
/// records at all.
pub fn parse_datagram(
    payload: &[u8],
) -> Result<impl Iterator<Item = Option<Command>> + '_, ProtocolError> {
    let reader = DatagramReader::new(payload)?;
    Ok(reader.records().map(|record| parse_record(&record)))
}
