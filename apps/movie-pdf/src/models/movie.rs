use std::fmt;

use serde::Deserialize;
use serde_json::Value;

use crate::errors::AppError;

/// Placeholder rendered for a field the record does not carry.
pub const MISSING_FIELD: &str = "N/A";

/// Extension of every generated document.
pub const OUTPUT_EXTENSION: &str = "pdf";

/// A loosely typed metadata value: the movie files mix strings, numbers and lists.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(serde_json::Number),
    Flag(bool),
    List(Vec<FieldValue>),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Number(n) => write!(f, "{n}"),
            FieldValue::Flag(b) => write!(f, "{b}"),
            FieldValue::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
        }
    }
}

/// Wire shape of one entry in the movie file. Unknown keys are ignored.
#[derive(Debug, Deserialize)]
struct RawMovie {
    title: Option<String>,
    year: Option<FieldValue>,
    genres: Option<FieldValue>,
    cast: Option<FieldValue>,
    link: Option<FieldValue>,
    thumbnail: Option<Value>,
    extract: Option<FieldValue>,
}

/// A validated movie record. One record becomes one PDF.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieRecord {
    pub title: String,
    pub year: Option<FieldValue>,
    pub genres: Option<FieldValue>,
    pub cast: Option<FieldValue>,
    pub link: Option<FieldValue>,
    /// Kept untyped: a malformed thumbnail only costs the image, not the record.
    pub thumbnail: Option<Value>,
    pub extract: Option<FieldValue>,
}

impl MovieRecord {
    /// Validates the `index`-th element of the movie file against the record schema.
    pub fn from_value(index: usize, value: Value) -> Result<Self, AppError> {
        let raw: RawMovie = serde_json::from_value(value)
            .map_err(|source| AppError::InvalidRecord { index, source })?;

        let title = raw
            .title
            .filter(|t| !t.trim().is_empty())
            .ok_or(AppError::MissingTitle { index })?;

        Ok(MovieRecord {
            title,
            year: raw.year,
            genres: raw.genres,
            cast: raw.cast,
            link: raw.link,
            thumbnail: raw.thumbnail,
            extract: raw.extract,
        })
    }

    /// Thumbnail URL. `Ok(None)` when the field is absent, null or blank;
    /// `Err` with the offending value when it is not a string.
    pub fn thumbnail_url(&self) -> Result<Option<&str>, &Value> {
        match &self.thumbnail {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(url)) => Ok(Some(url.trim()).filter(|url| !url.is_empty())),
            Some(other) => Err(other),
        }
    }

    pub fn description(&self) -> String {
        self.extract
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default()
    }

    pub fn file_name(&self) -> String {
        output_file_name(&self.title)
    }
}

/// Renders an optional field, falling back to [`MISSING_FIELD`].
pub fn display_field(value: Option<&FieldValue>) -> String {
    value.map_or_else(|| MISSING_FIELD.to_string(), ToString::to_string)
}

/// Derives the output file name from a title: every character outside
/// `[A-Za-z0-9]` becomes `_`, then the document extension is appended.
pub fn output_file_name(title: &str) -> String {
    let stem: String = title
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("{stem}.{OUTPUT_EXTENSION}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_full_record() {
        let value = json!({
            "title": "Inception",
            "year": 2010,
            "genres": ["Science Fiction", "Action"],
            "cast": ["Leonardo DiCaprio", "Elliot Page"],
            "link": "https://www.youtube.com/watch?v=YoHD9XEInc0",
            "thumbnail": "https://example.org/inception.jpg",
            "extract": "A thief who steals corporate secrets.",
            "href": "Inception"
        });
        let record = MovieRecord::from_value(0, value).unwrap();
        assert_eq!(record.title, "Inception");
        assert_eq!(display_field(record.year.as_ref()), "2010");
        assert_eq!(
            display_field(record.genres.as_ref()),
            "Science Fiction, Action"
        );
        assert_eq!(
            record.thumbnail_url(),
            Ok(Some("https://example.org/inception.jpg"))
        );
    }

    #[test]
    fn test_missing_title_is_rejected() {
        let err = MovieRecord::from_value(4, json!({ "year": 2010 })).unwrap_err();
        assert!(matches!(err, AppError::MissingTitle { index: 4 }));
    }

    #[test]
    fn test_blank_title_is_rejected() {
        let err = MovieRecord::from_value(1, json!({ "title": "   " })).unwrap_err();
        assert!(matches!(err, AppError::MissingTitle { index: 1 }));
    }

    #[test]
    fn test_non_object_record_is_invalid() {
        let err = MovieRecord::from_value(2, json!("Inception")).unwrap_err();
        assert!(matches!(err, AppError::InvalidRecord { index: 2, .. }));
    }

    #[test]
    fn test_wrongly_typed_title_is_invalid() {
        let err = MovieRecord::from_value(0, json!({ "title": { "en": "Inception" } })).unwrap_err();
        assert!(matches!(err, AppError::InvalidRecord { .. }));
    }

    #[test]
    fn test_missing_fields_render_placeholder() {
        let record = MovieRecord::from_value(0, json!({ "title": "Heat", "cast": null })).unwrap();
        assert_eq!(display_field(record.cast.as_ref()), MISSING_FIELD);
        assert_eq!(record.description(), "");
        assert_eq!(record.thumbnail_url(), Ok(None));
    }

    #[test]
    fn test_non_string_thumbnail_keeps_the_record() {
        let record =
            MovieRecord::from_value(0, json!({ "title": "Inception", "thumbnail": 42 })).unwrap();
        assert_eq!(record.thumbnail_url(), Err(&json!(42)));

        let listed = MovieRecord::from_value(0, json!({ "title": "Heat", "thumbnail": ["a", "b"] }))
            .unwrap();
        assert!(listed.thumbnail_url().is_err());
    }

    #[test]
    fn test_blank_thumbnail_is_absent() {
        let record =
            MovieRecord::from_value(0, json!({ "title": "Heat", "thumbnail": "  " })).unwrap();
        assert_eq!(record.thumbnail_url(), Ok(None));
    }

    #[test]
    fn test_extract_renders_through_string_conversion() {
        let numeric = MovieRecord::from_value(0, json!({ "title": "Heat", "extract": 1995 })).unwrap();
        assert_eq!(numeric.description(), "1995");

        let text = MovieRecord::from_value(0, json!({ "title": "Heat", "extract": "A heist." })).unwrap();
        assert_eq!(text.description(), "A heist.");
    }

    #[test]
    fn test_year_as_string_or_number() {
        let as_text = MovieRecord::from_value(0, json!({ "title": "A", "year": "1999" })).unwrap();
        let as_number = MovieRecord::from_value(0, json!({ "title": "A", "year": 1999 })).unwrap();
        assert_eq!(display_field(as_text.year.as_ref()), "1999");
        assert_eq!(display_field(as_number.year.as_ref()), "1999");
    }

    #[test]
    fn test_output_file_name_sanitizes() {
        assert_eq!(output_file_name("Inception"), "Inception.pdf");
        assert_eq!(
            output_file_name("Spider-Man: No Way Home"),
            "Spider_Man__No_Way_Home.pdf"
        );
        assert_eq!(output_file_name("Amélie"), "Am_lie.pdf");
    }

    #[test]
    fn test_output_file_name_charset_and_determinism() {
        for title in ["WALL·E", "8½", "Se7en", "  spaced  ", "a/b\\c..d"] {
            let name = output_file_name(title);
            let stem = name.strip_suffix(".pdf").unwrap();
            assert!(
                stem.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'),
                "unexpected character in {name}"
            );
            assert_eq!(stem.chars().count(), title.chars().count());
            assert_eq!(name, output_file_name(title));
        }
    }
}
