//! Moving tag columns out of a field set.

use std::collections::BTreeMap;

use super::row::FieldSet;

/// Tag values of one row, keyed by column name.
pub type TagSet = BTreeMap<String, String>;

/// Move a single column from `fields` into `tags`.
///
/// Non-text values are stored in their display form. Does nothing when the
/// column is not in `fields`.
pub fn use_field_as_tag(key: &str, fields: &mut FieldSet, tags: &mut TagSet) {
    if let Some(value) = fields.remove(key) {
        tags.insert(key.to_string(), value.to_string());
    }
}

/// Split the configured tag columns off `fields`, in configured order.
pub fn extract_tags<S: AsRef<str>>(tag_names: &[S], fields: &mut FieldSet) -> TagSet {
    let mut tags = TagSet::new();
    for name in tag_names {
        use_field_as_tag(name.as_ref(), fields, &mut tags);
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metric::FieldValue;
    use rstest::{fixture, rstest};

    #[fixture]
    fn fields() -> FieldSet {
        let mut fields = FieldSet::new();
        fields.insert("field_integer".into(), FieldValue::Integer(10));
        fields.insert("field_string".into(), FieldValue::Text("helloworld".into()));
        fields.insert("tag_1".into(), FieldValue::Text("tagValue1".into()));
        fields.insert("tag_2".into(), FieldValue::Text("tagValue2".into()));
        fields
    }

    #[rstest]
    fn test_extract_tags_moves_columns(mut fields: FieldSet) {
        let tags = extract_tags(&["tag_1", "tag_2"], &mut fields);

        assert_eq!(tags.len(), 2);
        assert_eq!(tags["tag_1"], "tagValue1");
        assert_eq!(tags["tag_2"], "tagValue2");
        assert_eq!(fields.len(), 2);
        assert!(!fields.contains_key("tag_1"));
        assert!(!fields.contains_key("tag_2"));
    }

    #[rstest]
    fn test_missing_tag_names_are_ignored(mut fields: FieldSet) {
        let tags = extract_tags(&["tag_1", "no_such_column"], &mut fields);

        assert_eq!(tags.len(), 1);
        assert_eq!(fields.len(), 3);
    }

    #[rstest]
    fn test_extraction_is_idempotent(mut fields: FieldSet) {
        let mut tags = TagSet::new();
        use_field_as_tag("tag_1", &mut fields, &mut tags);
        let after_first = fields.clone();

        use_field_as_tag("tag_1", &mut fields, &mut tags);

        assert_eq!(fields, after_first);
        assert_eq!(tags.len(), 1);
    }

    #[rstest]
    fn test_numeric_tag_is_stringified(mut fields: FieldSet) {
        let tags = extract_tags(&["field_integer"], &mut fields);

        assert_eq!(tags["field_integer"], "10");
        assert!(!fields.contains_key("field_integer"));
    }

    #[rstest]
    fn test_float_tag_is_stringified() {
        let mut fields = FieldSet::new();
        fields.insert("ratio".into(), FieldValue::Float(0.25));

        let tags = extract_tags(&["ratio"], &mut fields);

        assert_eq!(tags["ratio"], "0.25");
    }

    #[rstest]
    fn test_all_columns_as_tags_leaves_no_fields() {
        let mut fields = FieldSet::new();
        fields.insert("tag_1".into(), FieldValue::Text("a".into()));
        fields.insert("tag_2".into(), FieldValue::Text("b".into()));

        let tags = extract_tags(&["tag_1", "tag_2"], &mut fields);

        assert!(fields.is_empty());
        assert_eq!(tags.len(), 2);
    }

    #[rstest]
    fn test_no_tag_names(mut fields: FieldSet) {
        let tags = extract_tags::<&str>(&[], &mut fields);

        assert!(tags.is_empty());
        assert_eq!(fields.len(), 4);
    }
}
