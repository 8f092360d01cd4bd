//! Integration tests for the shared service library
//!
//! These tests exercise the public API the way a service does: declare
//! error-code enums, scan them into a registry, resolve a request locale,
//! localize messages and render response envelopes.

use axum::http::{HeaderMap, HeaderValue};
use proptest::prelude::*;
use serde_json::json;
use service_commons::error_code::{
    i18n_exception, CommonErrorCode, ErrorCode, ErrorCodeEnum, ErrorCodeRegistry,
    ScanDiagnostic, ScanError, SharedRegistry, StaticDiscovery, TypeHandle,
};
use service_commons::i18n::{
    fuzzy_field_match, fuzzy_match, fuzzy_match_by_locale, message_named, parse_to_fuzzy_locale,
    LocaleResolver, LocaleSource, SimpleLocaleCustomizer, StaticMessageSource,
};
use service_commons::page::PageQuery;
use service_commons::response::{ApiResponse, ErrorResponder};
use std::collections::HashMap;

// ==================== Test Fixtures ====================

mod orders {
    service_commons::error_codes! {
        pub enum OrderErrorCode {
            E0000000400 => ("訂單請求錯誤", "Bad order request"),
            E0001000001 => ("訂單不存在", "Order {} not found"),
        }
    }
}

mod payments {
    service_commons::error_codes! {
        pub enum PaymentErrorCode {
            E0002000001 => ("支付失敗", "Payment failed"),
            XABC => ("broken"),
        }
    }
}

use orders::OrderErrorCode;
use payments::PaymentErrorCode;

#[derive(Debug, Clone, PartialEq)]
struct Banner {
    locale: Option<String>,
    text: String,
    default: bool,
}

fn banner(locale: &str, text: &str) -> Banner {
    Banner {
        locale: Some(locale.to_string()),
        text: text.to_string(),
        default: false,
    }
}

fn default_banner(locale: &str, text: &str) -> Banner {
    Banner {
        default: true,
        ..banner(locale, text)
    }
}

fn pick<'a>(records: &'a [Banner], locale: &str) -> Option<&'a str> {
    fuzzy_match(
        records,
        locale,
        |b| b.default,
        |b| b.locale.as_deref(),
        |b| !b.text.is_empty(),
    )
    .map(|b| b.text.as_str())
}

// ==================== Locale Matcher Tests ====================

#[test]
fn test_traditional_request_prefers_traditional_record() {
    let records = vec![banner("zh_CN", "简体"), banner("zh_HK", "繁體")];
    assert_eq!(pick(&records, "zh_tw"), Some("繁體"));
}

#[test]
fn test_simplified_request_excludes_traditional_record() {
    let records = vec![banner("zh_hant", "繁體"), default_banner("en", "English")];
    assert_eq!(pick(&records, "zh_cn"), Some("English"));

    let records = vec![
        banner("zh_hant", "繁體"),
        banner("zh_sg", "新加坡"),
        default_banner("en", "English"),
    ];
    assert_eq!(pick(&records, "zh_cn"), Some("新加坡"));
}

#[test]
fn test_prefix_match_beats_default() {
    let records = vec![default_banner("en", "English"), banner("fr_FR", "Français")];
    assert_eq!(pick(&records, "fr_CA"), Some("Français"));
}

#[test]
fn test_default_when_nothing_matches() {
    let records = vec![default_banner("en", "English"), banner("es", "Español")];
    assert_eq!(pick(&records, "de"), Some("English"));
}

#[test]
fn test_empty_records_match_nothing() {
    assert_eq!(pick(&[], "en"), None);
}

#[test]
fn test_field_match_skips_blank_translation() {
    let records = vec![banner("en", "Hello"), banner("ja_JP", " ")];
    let text = fuzzy_field_match(&records, "ja", |b| b.locale.as_deref(), |b| {
        Some(b.text.as_str())
    });
    assert_eq!(text, Some("Hello"));
}

#[test]
fn test_parse_to_fuzzy_locale() {
    assert_eq!(parse_to_fuzzy_locale("zh-Hant"), "zh_hk");
    assert_eq!(parse_to_fuzzy_locale("ZH_TW"), "zh_hk");
    assert_eq!(parse_to_fuzzy_locale("zh_SG"), "zh_cn");
    assert_eq!(parse_to_fuzzy_locale("en_US"), "en");
}

fn locale_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "en", "en_us", "fr", "fr_fr", "de", "ja", "zh", "zh_cn", "zh_hk", "zh_tw", "zh_sg",
        "zh_hant", "es", "",
    ])
    .prop_map(str::to_string)
}

proptest! {
    #[test]
    fn prop_exact_match_wins_regardless_of_order(
        others in prop::collection::vec(locale_strategy(), 0..8),
        position in any::<prop::sample::Index>(),
    ) {
        let wanted = "pt_br";
        let mut records: Vec<Banner> = others.iter().map(|l| banner(l, l)).collect();
        let at = position.index(records.len() + 1);
        records.insert(at, banner("PT-BR", "exact"));

        prop_assert_eq!(pick(&records, wanted), Some("exact"));
    }

    #[test]
    fn prop_match_is_idempotent(
        locales in prop::collection::vec(locale_strategy(), 0..8),
        requested in locale_strategy(),
    ) {
        let records: Vec<Banner> = locales
            .iter()
            .enumerate()
            .map(|(i, l)| Banner { default: i == 0, ..banner(l, l) })
            .collect();

        let first = fuzzy_match_by_locale(&records, &requested, |b| b.locale.as_deref());
        let second = fuzzy_match_by_locale(&records, &requested, |b| b.locale.as_deref());
        prop_assert_eq!(first, second);
    }
}

// ==================== Registry Tests ====================

#[test]
fn test_duplicate_code_keeps_first_registration() {
    let discovery = StaticDiscovery::new()
        .register::<CommonErrorCode>()
        .register::<OrderErrorCode>();
    let registry = ErrorCodeRegistry::scan(&[""], &discovery).unwrap();

    let entry = registry.get(400).unwrap();
    assert_eq!(entry.type_name, CommonErrorCode::TYPE_NAME);

    let duplicates: Vec<_> = registry
        .diagnostics()
        .iter()
        .filter(|d| matches!(d, ScanDiagnostic::DuplicateErrorCode { code: 400, .. }))
        .collect();
    assert_eq!(duplicates.len(), 1);
    assert!(registry.contains(1_000_001));
}

#[test]
fn test_malformed_name_fails_scan() {
    let discovery = StaticDiscovery::new().register::<PaymentErrorCode>();
    let err = ErrorCodeRegistry::scan(&[""], &discovery).unwrap_err();
    let ScanError::MalformedErrorCodeName { type_name, source } = err;
    assert_eq!(type_name, PaymentErrorCode::TYPE_NAME);
    assert_eq!(source.name, "XABC");
}

#[test]
fn test_unreadable_type_is_skipped() {
    let discovery = StaticDiscovery::new()
        .with_candidate(TypeHandle::without_values("integration_tests::Dynamic"))
        .with_candidate(TypeHandle::other("integration_tests::Unrelated"))
        .register::<OrderErrorCode>();
    let registry = ErrorCodeRegistry::scan(&[""], &discovery).unwrap();

    assert_eq!(registry.len(), OrderErrorCode::VALUES.len());
    assert_eq!(registry.diagnostics().len(), 1);
    assert!(matches!(
        registry.diagnostics()[0],
        ScanDiagnostic::EnumerationAccessFailure { .. }
    ));
}

#[test]
fn test_scan_is_idempotent() {
    let discovery = StaticDiscovery::new()
        .register::<CommonErrorCode>()
        .register::<OrderErrorCode>();
    let first = ErrorCodeRegistry::scan(&[""], &discovery).unwrap();
    let second = ErrorCodeRegistry::scan(&[""], &discovery).unwrap();

    assert_eq!(first.codes().collect::<Vec<_>>(), second.codes().collect::<Vec<_>>());
    assert_eq!(first.diagnostics(), second.diagnostics());
}

#[test]
fn test_roots_select_by_module_path() {
    let discovery = StaticDiscovery::new()
        .register::<CommonErrorCode>()
        .register::<OrderErrorCode>();
    let registry = ErrorCodeRegistry::scan(&["integration_tests::orders"], &discovery).unwrap();

    assert_eq!(registry.len(), 2);
    assert!(registry.diagnostics().is_empty());
}

#[test]
fn test_shared_registry_failed_rescan_keeps_previous() {
    let shared = SharedRegistry::default();
    let good = StaticDiscovery::new().register::<OrderErrorCode>();
    shared.rescan(&[""], &good).unwrap();

    let bad = StaticDiscovery::new().register::<PaymentErrorCode>();
    assert!(shared.rescan(&[""], &bad).is_err());
    assert_eq!(shared.load().len(), 2);
}

// ==================== Request Flow Tests ====================

#[test]
fn test_localized_error_for_request() {
    let resolver = LocaleResolver::new("en").with_customizer(SimpleLocaleCustomizer::new());
    let messages = StaticMessageSource::new()
        .with_message("zh_hk", "Order {} not found", "找不到訂單 {0}")
        .with_message("en", "Order {} not found", "Order {0} not found");

    let mut headers = HeaderMap::new();
    headers.insert("accept-language", HeaderValue::from_static("zh-TW,zh;q=0.9"));
    let locale = resolver.for_request(&headers).current_locale();
    assert_eq!(locale, "zh_hk");

    let err = i18n_exception(&OrderErrorCode::E0001000001, &messages, &locale, &[&"A-17"]);
    assert_eq!(err.code(), 1_000_001);
    assert_eq!(err.message(), "找不到訂單 A-17");
}

#[test]
fn test_named_message_lookup() {
    let messages = StaticMessageSource::new().with_message("en", "greeting", "Hi {name}!");
    let values = HashMap::from([("name", "Ada".to_string())]);
    assert_eq!(message_named(&messages, "en_GB", "greeting", &values), "Hi Ada!");
    assert_eq!(message_named(&messages, "en", "missing", &values), "missing");
}

#[test]
fn test_error_envelope_for_business_error() {
    let err: anyhow::Error = OrderErrorCode::E0001000001
        .exception_with("Order A-17 not found")
        .into();
    let response = ErrorResponder::new().unexpected(&err);
    let json = serde_json::to_value(response).unwrap();
    assert_eq!(
        json,
        json!({"code": 1_000_001, "message": "Order A-17 not found", "data": null})
    );
}

#[test]
fn test_page_envelope_from_query() {
    let query = PageQuery {
        page: Some("2".to_string()),
        size: Some("9999".to_string()),
    };
    let response = ApiResponse::page(vec![1, 2, 3], query.safe_page(), query.safe_size(), Some(503));
    let json = serde_json::to_value(response).unwrap();
    assert_eq!(json["code"], 200);
    assert_eq!(json["data"]["pager"]["size"], 500);
}
