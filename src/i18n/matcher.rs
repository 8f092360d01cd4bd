//! Fuzzy locale matching over caller-owned localized records.
//!
//! A "localized record" is anything the caller can derive a locale from, for
//! example one row of a `title_i18n` table. The matcher never owns or mutates
//! the records; callers pass accessor closures instead of implementing a trait,
//! so the same record type can be matched on different fields.
//!
//! Priority, from strongest to weakest:
//!
//! 1. exact locale match (returned as soon as it is seen)
//! 2. Chinese script match (traditional vs simplified)
//! 3. same two-letter language prefix (non-Chinese requests only)
//! 4. the record flagged as default

use crate::i18n::locale::{is_chinese, is_traditional_chinese, language_prefix, normalize};

/// Locale of the record treated as default by the convenience variants.
pub const DEFAULT_RECORD_LOCALE: &str = "en";

/// Pick the record that best fits `locale`.
///
/// # Arguments
/// * `records` - Candidate records, in caller order
/// * `locale` - Requested locale, any case, `-` or `_` separated
/// * `is_default` - Marks the fallback record; eligibility is not required for it
/// * `get_locale` - Locale of a record; `None` or blank skips locale comparison
/// * `is_eligible` - Extra predicate, e.g. "the wanted field is not blank"
///
/// # Returns
/// The matched record, or `None` when nothing matches and no default exists.
///
/// When several records qualify for the same rule, the Chinese rule keeps the
/// first one seen while the prefix and default rules keep the last one.
pub fn fuzzy_match<'a, T, D, L, E>(
    records: &'a [T],
    locale: &str,
    is_default: D,
    get_locale: L,
    is_eligible: E,
) -> Option<&'a T>
where
    D: Fn(&'a T) -> bool,
    L: Fn(&'a T) -> Option<&'a str>,
    E: Fn(&'a T) -> bool,
{
    let requested = normalize(locale);
    let requested_prefix = language_prefix(&requested);

    let mut default_record = None;
    let mut prefix_match = None;
    let mut traditional_match = None;
    let mut simplified_match = None;

    for record in records {
        if is_default(record) {
            default_record = Some(record);
        }

        let Some(current) = get_locale(record)
            .filter(|l| !l.trim().is_empty())
            .map(normalize)
        else {
            continue;
        };

        if !is_eligible(record) {
            continue;
        }

        if current == requested {
            return Some(record);
        }

        if language_prefix(&current) == requested_prefix {
            prefix_match = Some(record);
        }

        if is_chinese(&current) {
            if is_traditional_chinese(&current) {
                traditional_match.get_or_insert(record);
            } else {
                simplified_match.get_or_insert(record);
            }
        }
    }

    if is_chinese(&requested) {
        let chinese_match = if is_traditional_chinese(&requested) {
            traditional_match
        } else {
            simplified_match
        };
        if chinese_match.is_some() {
            return chinese_match;
        }
    } else if prefix_match.is_some() {
        return prefix_match;
    }

    default_record
}

/// [`fuzzy_match`] with every record eligible.
pub fn fuzzy_match_with_default<'a, T, D, L>(
    records: &'a [T],
    locale: &str,
    is_default: D,
    get_locale: L,
) -> Option<&'a T>
where
    D: Fn(&'a T) -> bool,
    L: Fn(&'a T) -> Option<&'a str>,
{
    fuzzy_match(records, locale, is_default, get_locale, |_| true)
}

/// [`fuzzy_match`] with every record eligible and the `en` record as default.
pub fn fuzzy_match_by_locale<'a, T, L>(records: &'a [T], locale: &str, get_locale: L) -> Option<&'a T>
where
    L: Fn(&'a T) -> Option<&'a str>,
{
    fuzzy_match(
        records,
        locale,
        |record| is_default_locale(get_locale(record)),
        &get_locale,
        |_| true,
    )
}

/// Match on a single field: a record is eligible only when `get_field`
/// yields a non-blank value, and that value is what gets returned.
///
/// The `en` record is the default.
pub fn fuzzy_field_match<'a, T, L, F, R>(
    records: &'a [T],
    locale: &str,
    get_locale: L,
    get_field: F,
) -> Option<R>
where
    L: Fn(&'a T) -> Option<&'a str>,
    F: Fn(&'a T) -> Option<R>,
    R: AsRef<str>,
{
    fuzzy_field_match_with_default(
        records,
        locale,
        |record| is_default_locale(get_locale(record)),
        &get_locale,
        get_field,
    )
}

/// [`fuzzy_field_match`] with a caller-supplied default predicate.
pub fn fuzzy_field_match_with_default<'a, T, D, L, F, R>(
    records: &'a [T],
    locale: &str,
    is_default: D,
    get_locale: L,
    get_field: F,
) -> Option<R>
where
    D: Fn(&'a T) -> bool,
    L: Fn(&'a T) -> Option<&'a str>,
    F: Fn(&'a T) -> Option<R>,
    R: AsRef<str>,
{
    let record = fuzzy_match(records, locale, is_default, get_locale, |record| {
        get_field(record).is_some_and(|field| is_present(&field))
    })?;

    // The default record is picked without the eligibility check.
    get_field(record).filter(is_present)
}

fn is_default_locale(locale: Option<&str>) -> bool {
    locale.is_some_and(|l| l.trim().eq_ignore_ascii_case(DEFAULT_RECORD_LOCALE))
}

fn is_present<R: AsRef<str>>(field: &R) -> bool {
    !field.as_ref().trim().is_empty()
}
