//! Single row of a record table and its line syntax.

use std::fmt;

/// Field delimiter.
pub const DELIMITER: char = ',';

/// Quote placed around fields that contain [`DELIMITER`].
pub const QUOTE: char = '"';

/// Lines starting with this marker are comments and are dropped on parse.
pub const COMMENT_MARKER: char = '#';

/// Row terminator used when serializing.
pub const LINE_BREAK: &str = "\r\n";

/// One row of a record table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Record {
	fields: Vec<String>,
}

impl Record {
	/// Creates a record from its fields.
	pub fn new(fields: Vec<String>) -> Self {
		Self {
			fields,
		}
	}

	/// Parses one line (without its line break) into fields.
	///
	/// A field that starts with a quote and ends with a quote right before
	/// a delimiter (or the end of the line) is a quoted field. Its quotes are
	/// stripped only if the text between them contains a delimiter, which is
	/// exactly the case [`Record::to_line`] quotes. Any other quote characters
	/// are kept as written; there is no escape syntax.
	pub fn parse(line: &str) -> Self {
		let mut fields = Vec::new();
		let mut rest = line;

		loop {
			if let Some((inner, after)) = split_quoted(rest) {
				fields.push(inner.to_string());
				match after {
					Some(after) => rest = after,
					None => break,
				}
				continue;
			}

			match rest.find(DELIMITER) {
				Some(pos) => {
					fields.push(rest[..pos].to_string());
					rest = &rest[pos + DELIMITER.len_utf8()..];
				}
				None => {
					fields.push(rest.to_string());
					break;
				}
			}
		}

		Self {
			fields,
		}
	}

	/// Serializes the record into one line (without a line break).
	pub fn to_line(&self) -> String {
		let mut line = String::new();
		for (i, field) in self.fields.iter().enumerate() {
			if i > 0 {
				line.push(DELIMITER);
			}
			if field.contains(DELIMITER) {
				line.push(QUOTE);
				line.push_str(field);
				line.push(QUOTE);
			} else {
				line.push_str(field);
			}
		}
		line
	}

	/// Returns the fields.
	pub fn fields(&self) -> &[String] {
		&self.fields
	}

	/// Returns the fields mutably.
	pub fn fields_mut(&mut self) -> &mut Vec<String> {
		&mut self.fields
	}

	/// Returns the field at `index`.
	pub fn get(&self, index: usize) -> Option<&str> {
		self.fields.get(index).map(String::as_str)
	}

	/// Number of fields.
	pub fn len(&self) -> usize {
		self.fields.len()
	}

	/// Returns `true` if the record has no fields.
	pub fn is_empty(&self) -> bool {
		self.fields.is_empty()
	}

	/// Consumes the record, returning its fields.
	pub fn into_fields(self) -> Vec<String> {
		self.fields
	}
}

/// Tries to read a quoted field at the start of `text`.
///
/// Returns the unquoted content and the text after the following delimiter
/// (`None` at end of line).
fn split_quoted(text: &str) -> Option<(&str, Option<&str>)> {
	let body = text.strip_prefix(QUOTE)?;

	for (pos, _) in body.match_indices(QUOTE) {
		let inner = &body[..pos];
		let after = &body[pos + QUOTE.len_utf8()..];
		let rest = if after.is_empty() {
			None
		} else if let Some(rest) = after.strip_prefix(DELIMITER) {
			Some(rest)
		} else {
			continue;
		};

		if inner.contains(DELIMITER) {
			return Some((inner, rest));
		}
		// Quotes around delimiter-free text are literal content.
		return None;
	}
	None
}

impl fmt::Display for Record {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.to_line())
	}
}

impl From<Vec<String>> for Record {
	fn from(fields: Vec<String>) -> Self {
		Self::new(fields)
	}
}

impl From<&[&str]> for Record {
	fn from(fields: &[&str]) -> Self {
		Self::new(fields.iter().map(|f| (*f).to_string()).collect())
	}
}

impl<const N: usize> From<[&str; N]> for Record {
	fn from(fields: [&str; N]) -> Self {
		Self::new(fields.iter().map(|f| (*f).to_string()).collect())
	}
}
