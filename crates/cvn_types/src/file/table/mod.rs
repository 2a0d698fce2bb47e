//! `.cv1` record table support.
//!
//! A record table is a text container (same XOR obfuscation, same encoding
//! handling) whose plaintext is comma separated rows:
//!
//! ```text
//! # comment lines are dropped
//! id,name,"text, with a comma"\r\n
//! 1,reimu,hakurei\r\n
//! ```
//!
//! Blank lines and comment lines are skipped when parsing and are not written
//! back; saving always re-serializes the parsed records, one CRLF-terminated
//! line per record.
//!
//! # Examples
//!
//! ```no_run
//! use cvn_types::file::{Container, Record, TableFile};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut table = TableFile::open("character.cv1")?;
//! for record in table.records() {
//!     println!("{:?}", record.fields());
//! }
//!
//! let mut records = table.records().to_vec();
//! records.push(Record::from(["99", "new"]));
//! table.set_records(records);
//! table.save("character_new.cv1")?;
//! # Ok(())
//! # }
//! ```

mod record;

use std::io::{Read, Write};
use std::path::Path;

use encoding_rs::Encoding;
use log::debug;

pub use self::record::{COMMENT_MARKER, DELIMITER, LINE_BREAK, QUOTE, Record};

use super::text::{DEFAULT_ENCODING, File as TextFile};
use super::{Container, CvnError, FileType};

/// Parses table text into records, skipping blank and comment lines.
///
/// Rows end at [`LINE_BREAK`] only; a bare `\n` is part of its field.
pub fn parse(text: &str) -> Vec<Record> {
	text.split(LINE_BREAK)
		.filter(|line| !line.is_empty() && !line.starts_with(COMMENT_MARKER))
		.map(Record::parse)
		.collect()
}

/// Serializes records, terminating every row with CRLF.
pub fn serialize(records: &[Record]) -> String {
	let mut text = String::new();
	for record in records {
		text.push_str(&record.to_line());
		text.push_str(LINE_BREAK);
	}
	text
}

/// Record table layered on a text container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct File {
	/// Underlying text container holding the raw table text
	text: TextFile,

	/// Parsed records
	records: Vec<Record>,
}

impl File {
	/// Creates an empty record table.
	pub fn new() -> Self {
		Self::default()
	}

	/// Opens a record table from `path` using the default encoding.
	pub fn open(path: impl AsRef<Path>) -> Result<Self, CvnError> {
		Self::open_with_encoding(path, DEFAULT_ENCODING)
	}

	/// Opens a record table from `path` using `encoding`.
	pub fn open_with_encoding(
		path: impl AsRef<Path>,
		encoding: &'static Encoding,
	) -> Result<Self, CvnError> {
		let file = std::fs::File::open(path)?;
		Self::from_reader(file, encoding)
	}

	/// Reads a whole record table from `reader`.
	pub fn from_reader<R: Read>(reader: R, encoding: &'static Encoding) -> Result<Self, CvnError> {
		let mut table = Self::new();
		table.load(reader, encoding)?;
		Ok(table)
	}

	/// Parses an in-memory (obfuscated) record table.
	pub fn from_bytes(data: &[u8], encoding: &'static Encoding) -> Self {
		let mut table = Self {
			text: TextFile::from_bytes(data, encoding),
			records: Vec::new(),
		};
		table.reload_records();
		table
	}

	/// Reads a table into this instance, replacing its contents.
	///
	/// On failure the instance is left empty.
	pub fn load<R: Read>(&mut self, reader: R, encoding: &'static Encoding) -> Result<(), CvnError> {
		if let Err(e) = self.text.load(reader, encoding) {
			self.records.clear();
			return Err(e);
		}
		self.reload_records();
		debug!("Parsed {} records", self.records.len());
		Ok(())
	}

	/// Returns the parsed records.
	pub fn records(&self) -> &[Record] {
		&self.records
	}

	/// Returns the record at `index`.
	pub fn get(&self, index: usize) -> Option<&Record> {
		self.records.get(index)
	}

	/// Number of records.
	pub fn len(&self) -> usize {
		self.records.len()
	}

	/// Returns `true` if the table has no records.
	pub fn is_empty(&self) -> bool {
		self.records.is_empty()
	}

	/// Replaces all records.
	///
	/// The raw text is regenerated and parsed again, so the stored records
	/// are always exactly what a save followed by an open would produce.
	pub fn set_records(&mut self, records: Vec<Record>) {
		self.records = records;
		self.update_raw_text();
		self.reload_records();
	}

	/// Serializes the current records.
	pub fn serialize(&self) -> String {
		serialize(&self.records)
	}

	/// Returns the raw text held by the underlying text container.
	pub fn raw_text(&self) -> std::borrow::Cow<'_, str> {
		self.text.text()
	}

	/// Returns the encoding used to interpret the table.
	pub fn encoding(&self) -> &'static Encoding {
		self.text.encoding()
	}

	/// Re-interprets the current bytes with `encoding` and parses them again.
	pub fn set_encoding(&mut self, encoding: &'static Encoding) {
		self.text.set_encoding(encoding);
		self.reload_records();
	}

	/// Re-encodes the current records into `encoding`.
	///
	/// Unlike [`File::set_encoding`] the records are preserved and the bytes
	/// change.
	pub fn convert_encoding(&mut self, encoding: &'static Encoding) {
		self.text.set_text_with_encoding(&self.serialize(), encoding);
		self.reload_records();
	}

	fn update_raw_text(&mut self) {
		let text = self.serialize();
		self.text.set_text(&text);
	}

	fn reload_records(&mut self) {
		self.records = parse(&self.text.text());
	}
}

impl Container for File {
	type Data = Vec<Record>;

	fn file_type(&self) -> FileType {
		FileType::Table
	}

	fn is_loaded(&self) -> bool {
		self.text.is_loaded()
	}

	fn data(&self) -> Option<&Vec<Record>> {
		self.is_loaded().then_some(&self.records)
	}

	fn set_data(&mut self, data: Vec<Record>) -> Result<(), CvnError> {
		self.set_records(data);
		Ok(())
	}

	fn write_to<W: Write>(&mut self, writer: &mut W) -> Result<(), CvnError> {
		if !self.is_loaded() {
			return Err(CvnError::NotLoaded {
				file_type: FileType::Table,
			});
		}
		self.update_raw_text();
		self.text.write_to(writer)
	}

	fn extract(&mut self, path: impl AsRef<Path>) -> Result<(), CvnError> {
		if !self.is_loaded() {
			return Err(CvnError::NotLoaded {
				file_type: FileType::Table,
			});
		}
		self.update_raw_text();
		self.text.extract(path)
	}

	fn close(&mut self) {
		self.records.clear();
		self.text.close();
	}
}

impl std::fmt::Display for File {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.serialize())
	}
}
