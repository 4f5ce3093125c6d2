//! Field-by-field comparison against a stored snapshot.

use std::collections::BTreeSet;

use crate::diff::model::{ChangeStatus, FieldValue, Tracked};
use crate::model::localized::field_name;

/// Whether importing `candidate` would create or modify a record
///
/// `existing` is the stored snapshot for the same identity, taken before the
/// candidate was populated.
pub fn will_change<T: Tracked>(existing: Option<&T>, candidate: &T) -> bool {
    match existing {
        None => true,
        Some(before) => !changed_fields(before, candidate).is_empty(),
    }
}

/// Classify `candidate` relative to `existing`
pub fn classify<T: Tracked>(existing: Option<&T>, candidate: &T) -> (ChangeStatus, Vec<String>) {
    match existing {
        None => (ChangeStatus::New, Vec::new()),
        Some(before) => {
            let fields = changed_fields(before, candidate);
            if fields.is_empty() {
                (ChangeStatus::Unchanged, fields)
            } else {
                (ChangeStatus::Changed, fields)
            }
        }
    }
}

/// Names of the tracked fields whose values differ, in table order
///
/// A field either side cannot report is listed as changed. Localized fields
/// expand to one `{field}_{lang}` entry per differing language.
pub fn changed_fields<T: Tracked>(before: &T, after: &T) -> Vec<String> {
    let mut changed = Vec::new();

    for &name in T::FIELDS {
        match (before.field(name), after.field(name)) {
            (Some(FieldValue::Localized(a)), Some(FieldValue::Localized(b))) => {
                let languages: BTreeSet<&str> = a.languages().chain(b.languages()).collect();
                for lang in languages {
                    if a.get(lang) != b.get(lang) {
                        changed.push(field_name(name, lang));
                    }
                }
            }
            (Some(a), Some(b)) if a == b => {}
            (Some(_), Some(_)) => changed.push(name.to_string()),
            _ => {
                tracing::debug!(field = name, "field not reportable, treating as changed");
                changed.push(name.to_string());
            }
        }
    }

    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LocalizedText;

    #[derive(Clone)]
    struct Sample {
        label: String,
        parent: Option<String>,
        title: LocalizedText,
        opaque: bool,
    }

    impl Tracked for Sample {
        const FIELDS: &'static [&'static str] = &["label", "parent", "title", "extra"];

        fn field(&self, name: &str) -> Option<FieldValue<'_>> {
            match name {
                "label" => Some(FieldValue::Text(&self.label)),
                "parent" => Some(FieldValue::Ref(self.parent.as_deref())),
                "title" => Some(FieldValue::Localized(&self.title)),
                // Polymorphic records may not expose this one
                "extra" if !self.opaque => Some(FieldValue::Flag(true)),
                _ => None,
            }
        }
    }

    fn sample() -> Sample {
        Sample {
            label: "a".to_string(),
            parent: Some("http://a/domain/p".to_string()),
            title: LocalizedText::new().with("en", "Age").with("de", "Alter"),
            opaque: false,
        }
    }

    #[test]
    fn test_new_record_always_changes() {
        assert!(will_change(None, &sample()));
        assert_eq!(classify(None, &sample()).0, ChangeStatus::New);
    }

    #[test]
    fn test_identical_record_is_unchanged() {
        let before = sample();
        assert!(!will_change(Some(&before), &sample()));
        assert_eq!(classify(Some(&before), &sample()), (ChangeStatus::Unchanged, vec![]));
    }

    #[test]
    fn test_reference_change_is_detected() {
        let before = sample();
        let mut after = sample();
        after.parent = None;
        assert_eq!(changed_fields(&before, &after), vec!["parent".to_string()]);
    }

    #[test]
    fn test_localized_changes_are_reported_per_language() {
        let before = sample();
        let mut after = sample();
        after.title.set("de", "Lebensalter");
        after.title.set("fr", "Âge");
        assert_eq!(
            changed_fields(&before, &after),
            vec!["title_de".to_string(), "title_fr".to_string()]
        );
    }

    #[test]
    fn test_unreportable_field_counts_as_changed() {
        let before = sample();
        let mut after = sample();
        after.opaque = true;
        assert!(will_change(Some(&before), &after));
        assert_eq!(changed_fields(&before, &after), vec!["extra".to_string()]);
    }

    #[test]
    fn test_changed_fields_follow_field_table_order() {
        let before = sample();
        let mut after = sample();
        after.opaque = true;
        after.title.set("en", "Years");
        after.parent = None;
        assert_eq!(
            changed_fields(&before, &after),
            vec!["parent".to_string(), "title_en".to_string(), "extra".to_string()]
        );
    }
}
