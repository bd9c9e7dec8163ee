// In-memory catalog engine: id allocation, the six operations, text codec.
// Lookup stays a linear scan; catalogs are small and order is insertion order.
use crate::core::error::{Error, ErrorKind};
use crate::core::record::BookRecord;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Catalog {
    records: Vec<BookRecord>,
    next_id: u64,
}

impl Catalog {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            next_id: 1,
        }
    }

    pub fn books(&self) -> &[BookRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    /// Appends a new available record and returns its id. Ids are assigned
    /// from a counter that only moves forward, so deletions never free an id
    /// for reuse.
    pub fn add_book(&mut self, title: impl Into<String>, author: impl Into<String>) -> u64 {
        let id = self.next_id;
        self.records.push(BookRecord::new(id, title, author));
        self.next_id += 1;
        id
    }

    pub fn find_book(&self, id: u64) -> Result<&BookRecord, Error> {
        self.records
            .iter()
            .find(|record| record.id == id)
            .ok_or_else(|| not_found(id))
    }

    /// Marks a record as issued to `holder`. Issuing an issued record is a
    /// no-op apart from the error, which reports the current holder.
    pub fn issue_book(&mut self, id: u64, holder: &str) -> Result<&BookRecord, Error> {
        let record = self
            .records
            .iter_mut()
            .find(|record| record.id == id)
            .ok_or_else(|| not_found(id))?;
        if record.issued {
            return Err(Error::new(ErrorKind::AlreadyIssued)
                .with_message(format!("already issued to {}", record.issued_to))
                .with_id(id));
        }
        record.issued = true;
        record.issued_to = holder.to_string();
        Ok(&*record)
    }

    /// Clears a record's issued state. Returning an available record is a
    /// no-op apart from the error.
    pub fn return_book(&mut self, id: u64) -> Result<&BookRecord, Error> {
        let record = self
            .records
            .iter_mut()
            .find(|record| record.id == id)
            .ok_or_else(|| not_found(id))?;
        if !record.issued {
            return Err(Error::new(ErrorKind::NotIssued)
                .with_message("book is not issued")
                .with_id(id));
        }
        record.issued = false;
        record.issued_to = String::new();
        Ok(&*record)
    }

    /// Removes a record, preserving the relative order of the survivors.
    /// The id counter is untouched, so the removed id is never reassigned.
    pub fn delete_book(&mut self, id: u64) -> Result<BookRecord, Error> {
        let index = self
            .records
            .iter()
            .position(|record| record.id == id)
            .ok_or_else(|| not_found(id))?;
        Ok(self.records.remove(index))
    }

    /// Encodes the whole catalog, one record line per entry in catalog
    /// order, each terminated by a newline.
    pub fn encode(&self) -> String {
        let mut text = String::new();
        for record in &self.records {
            text.push_str(&record.encode_line());
            text.push('\n');
        }
        text
    }

    /// Decodes a whole catalog. Completely empty lines are skipped; any
    /// malformed or invariant-breaking line (bad layout, unparseable id or
    /// flag, id 0, duplicate id, id at the u64 ceiling) fails the entire
    /// load rather than producing a partial catalog. `next_id` is recovered
    /// as one past the largest id seen, or 1 for an empty catalog.
    pub fn decode(text: &str) -> Result<Self, Error> {
        let mut records: Vec<BookRecord> = Vec::new();
        let mut max_id = 0u64;

        for (index, line) in text.lines().enumerate() {
            if line.is_empty() {
                continue;
            }
            let record = BookRecord::decode_line(line).map_err(|err| {
                Error::new(ErrorKind::Corrupt)
                    .with_message(format!("malformed record on line {}", index + 1))
                    .with_source(err)
            })?;
            if records.iter().any(|existing| existing.id == record.id) {
                return Err(Error::new(ErrorKind::Corrupt)
                    .with_message(format!("duplicate record id on line {}", index + 1))
                    .with_id(record.id));
            }
            // An id at the u64 ceiling would leave next_id unrepresentable.
            if record.id == u64::MAX {
                return Err(Error::new(ErrorKind::Corrupt)
                    .with_message(format!("record id too large on line {}", index + 1))
                    .with_id(record.id));
            }
            max_id = max_id.max(record.id);
            records.push(record);
        }

        Ok(Self {
            records,
            next_id: max_id + 1,
        })
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

fn not_found(id: u64) -> Error {
    Error::new(ErrorKind::NotFound)
        .with_message("no book with this id")
        .with_id(id)
}
