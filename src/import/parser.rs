use crate::models::{RawRow, RowError, FIELD_COUNT};

/// The single field delimiter of the source format.
pub const FIELD_DELIMITER: u8 = b'|';

const FIELD_DELIMITER_STR: &str = "|";
const QUOTE: char = '"';

const HEADER_PREFIX: [&str; 3] = ["sn", "date", "trackingnumber"];

/// Splits one source line into its nine raw fields.
///
/// Fields are trimmed. A field is quoted only when it both starts and ends
/// with `"`; a quoted field may span delimiters and uses `""` for a literal
/// quote, which is how exported item names survive a round trip. Any other
/// field is kept exactly as written.
pub struct RecordParser;

impl RecordParser {
    pub fn parse(line: &str) -> Result<RawRow, RowError> {
        let fields = Self::split(line);

        if fields.len() != FIELD_COUNT {
            return Err(RowError::malformed(fields.len()));
        }

        let mut fields = fields.into_iter();
        let fields: [String; FIELD_COUNT] = std::array::from_fn(|_| fields.next().unwrap_or_default());

        Ok(RawRow::from_fields(fields))
    }

    /// Whether `line` is the column header (`SN|date|tracking_number|...`).
    pub fn is_header(line: &str) -> bool {
        let fields = Self::split(line);

        fields.len() >= HEADER_PREFIX.len() && fields.iter()
            .zip(HEADER_PREFIX)
            .all(|(field, expected)| field.replace('_', "").eq_ignore_ascii_case(expected))
    }

    fn split(line: &str) -> Vec<String> {
        let pieces: Vec<&str> = line.split(FIELD_DELIMITER_STR).collect();
        let mut fields = Vec::with_capacity(FIELD_COUNT);
        let mut index = 0;

        while index < pieces.len() {
            let piece = pieces[index].trim();

            if !piece.starts_with(QUOTE) {
                fields.push(piece.to_string());
                index += 1;
                continue;
            }

            //NOTE: An opening quote without a matching closing piece is plain text
            let closing = (index..pieces.len()).find(|&end| {
                let candidate = pieces[end].trim();
                if end == index { is_quoted(candidate) } else { candidate.ends_with(QUOTE) }
            });

            match closing {
                Some(end) => {
                    let joined = pieces[index..=end].join(FIELD_DELIMITER_STR);
                    fields.push(unquote(joined.trim()));
                    index = end + 1;
                }
                None => {
                    fields.push(piece.to_string());
                    index += 1;
                }
            }
        }

        fields
    }
}

fn is_quoted(field: &str) -> bool {
    field.len() >= 2 && field.starts_with(QUOTE) && field.ends_with(QUOTE)
}

fn unquote(field: &str) -> String {
    field[1..field.len() - 1].replace("\"\"", "\"")
}
