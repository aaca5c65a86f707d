//! Date/value field inference for list-of-records payloads.
//!
//! Upstream services don't declare a schema, so roles are inferred from the
//! first record's field names:
//!
//! 1. case-insensitive alias match, highest-priority alias first
//! 2. positional fallback (date = first field, value = second field), never
//!    assigning one field to both roles

use crate::domain::FieldMapping;

/// Date aliases, highest priority first.
pub const DATE_ALIASES: [&str; 3] = ["date", "ds", "day"];

/// Value aliases, highest priority first.
pub const VALUE_ALIASES: [&str; 5] = ["value", "y", "tickets", "count", "volume"];

/// Infer which fields hold the date and the value.
///
/// `names` must be in record order; that order defines the positional fallback.
pub fn infer_fields<'a>(names: impl IntoIterator<Item = &'a str>) -> FieldMapping {
    let names: Vec<&str> = names.into_iter().collect();

    let date_alias = find_alias(&names, &DATE_ALIASES);
    let value_alias = find_alias(&names, &VALUE_ALIASES);

    let date_field = date_alias.or_else(|| positional(&names, 0, value_alias));
    let value_field = value_alias.or_else(|| positional(&names, 1, date_field));

    FieldMapping {
        date_field: date_field.map(str::to_string),
        value_field: value_field.map(str::to_string),
    }
}

fn find_alias<'a>(names: &[&'a str], aliases: &[&str]) -> Option<&'a str> {
    aliases.iter().find_map(|alias| {
        names
            .iter()
            .copied()
            .find(|name| normalize_field_name(name) == *alias)
    })
}

fn positional<'a>(names: &[&'a str], position: usize, claimed: Option<&str>) -> Option<&'a str> {
    let is_free = |name: &str| Some(name) != claimed;
    match names.get(position) {
        Some(name) if is_free(*name) => Some(*name),
        _ => names.iter().copied().find(|name| is_free(*name)),
    }
}

fn normalize_field_name(name: &str) -> String {
    // JSON exported from spreadsheets occasionally keeps a BOM on the first key.
    name.trim().trim_start_matches('\u{feff}').to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn infer(names: &[&str]) -> (Option<String>, Option<String>) {
        let mapping = infer_fields(names.iter().copied());
        (mapping.date_field, mapping.value_field)
    }

    fn some(a: &str, b: &str) -> (Option<String>, Option<String>) {
        (Some(a.to_string()), Some(b.to_string()))
    }

    #[test]
    fn each_date_alias_is_recognized() {
        for alias in DATE_ALIASES {
            assert_eq!(infer(&["value", alias]), some(alias, "value"), "{alias}");
        }
    }

    #[test]
    fn each_value_alias_is_recognized() {
        for alias in VALUE_ALIASES {
            assert_eq!(infer(&[alias, "date"]), some("date", alias), "{alias}");
        }
    }

    #[test]
    fn alias_match_is_case_insensitive_and_keeps_original_name() {
        assert_eq!(infer(&["DS", "Tickets"]), some("DS", "Tickets"));
        assert_eq!(infer(&["\u{feff}Date", "Y"]), some("\u{feff}Date", "Y"));
    }

    #[test]
    fn higher_priority_alias_wins_regardless_of_field_order() {
        assert_eq!(infer(&["day", "count", "date", "value"]), some("date", "value"));
        assert_eq!(infer(&["ds", "volume", "y"]), some("ds", "y"));
    }

    #[test]
    fn positional_fallback_uses_first_two_fields() {
        assert_eq!(infer(&["when", "how_many", "extra"]), some("when", "how_many"));
    }

    #[test]
    fn positional_fallback_skips_the_field_claimed_by_the_other_role() {
        // Date alias sits in second position: the value falls back to the first field.
        assert_eq!(infer(&["amount", "date"]), some("date", "amount"));
        // Value alias sits in first position: the date falls back to the next field.
        assert_eq!(infer(&["value", "when"]), some("when", "value"));
    }

    #[test]
    fn single_field_records_have_no_value_field() {
        assert_eq!(infer(&["date"]), (Some("date".to_string()), None));
        assert_eq!(infer(&["tickets"]), (None, Some("tickets".to_string())));
        assert_eq!(infer(&[]), (None, None));
    }
}
