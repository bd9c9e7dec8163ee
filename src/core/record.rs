// Book record schema and the pipe-delimited line codec.
use serde::Serialize;

use crate::core::error::{Error, ErrorKind};

pub const FIELD_SEPARATOR: char = '|';
const FIELD_COUNT: usize = 5;

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct BookRecord {
    pub id: u64,
    pub title: String,
    pub author: String,
    pub issued: bool,
    pub issued_to: String,
}

impl BookRecord {
    pub fn new(id: u64, title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            author: author.into(),
            issued: false,
            issued_to: String::new(),
        }
    }

    /// Encodes the record as one `id|title|author|flag|issued_to` line,
    /// without a trailing newline. Title and author must not contain the
    /// separator or line breaks; the codec does not escape them.
    pub fn encode_line(&self) -> String {
        format!(
            "{}{sep}{}{sep}{}{sep}{}{sep}{}",
            self.id,
            self.title,
            self.author,
            u8::from(self.issued),
            self.issued_to,
            sep = FIELD_SEPARATOR,
        )
    }

    /// Decodes one record line. The line splits into exactly five fields;
    /// the fifth (holder) field takes the rest of the line, so a holder
    /// name containing the separator still round-trips. The issued flag is
    /// any integer, nonzero meaning issued; a holder stored next to a zero
    /// flag is discarded so `issued == false` implies an empty holder.
    pub fn decode_line(line: &str) -> Result<Self, Error> {
        let fields: Vec<&str> = line.splitn(FIELD_COUNT, FIELD_SEPARATOR).collect();
        if fields.len() != FIELD_COUNT {
            return Err(Error::new(ErrorKind::Corrupt)
                .with_message(format!("record line has {} fields, expected 5", fields.len())));
        }

        let id = fields[0].parse::<u64>().map_err(|err| {
            Error::new(ErrorKind::Corrupt)
                .with_message("record id is not an unsigned integer")
                .with_source(err)
        })?;
        if id == 0 {
            return Err(Error::new(ErrorKind::Corrupt).with_message("record id must be positive"));
        }

        let flag = fields[3].parse::<i64>().map_err(|err| {
            Error::new(ErrorKind::Corrupt)
                .with_message("issued flag is not an integer")
                .with_id(id)
                .with_source(err)
        })?;
        let issued = flag != 0;

        Ok(Self {
            id,
            title: fields[1].to_string(),
            author: fields[2].to_string(),
            issued,
            issued_to: if issued {
                fields[4].to_string()
            } else {
                String::new()
            },
        })
    }
}
