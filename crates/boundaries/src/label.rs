//! Choosing which attribute field labels a ward.

/// Keys tried against field names when no others are configured.
pub const DEFAULT_LABEL_KEYS: &[&str] = &["name_3"];

/// Name of the geometry column, never used as a label.
const GEOMETRY_FIELD: &str = "geometry";

/// Picks the label field of a boundary dataset.
///
/// Field names are scanned in file order and the first whose lowercase
/// name contains any of the keys wins. Without a match the first field
/// other than `geometry` is used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelFieldRule {
    keys: Vec<String>,
}

impl Default for LabelFieldRule {
    fn default() -> Self {
        Self::new(DEFAULT_LABEL_KEYS.iter().copied())
    }
}

impl LabelFieldRule {
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keys: keys
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Select the label field from `fields`, or `None` if there is no
    /// usable field at all.
    pub fn select<'a>(&self, fields: &'a [String]) -> Option<&'a str> {
        let by_key = fields.iter().find(|field| {
            let lower = field.to_lowercase();
            self.keys.iter().any(|key| lower.contains(key.as_str()))
        });

        by_key
            .or_else(|| {
                fields
                    .iter()
                    .find(|field| !field.eq_ignore_ascii_case(GEOMETRY_FIELD))
            })
            .map(String::as_str)
    }
}

/// Select a label field with the default keys.
pub fn select_label_field(fields: &[String]) -> Option<&str> {
    LabelFieldRule::default().select(fields)
}
