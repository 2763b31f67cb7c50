use greenwall::calendar::{merge_by_date, parse_request, Calendar, CalendarDay};
use greenwall::model::ContributionDay;
use greenwall::GreenwallError;
use pretty_assertions::assert_eq;

fn day(date: &str, count: i64) -> ContributionDay {
    ContributionDay::new(date, count)
}

#[test]
fn normalize_sorts_and_drops_empty_days() {
    let cal = Calendar::normalize(&[day("2024-01-03", 1), day("2024-01-02", 0), day("2024-01-01", 2)])
        .unwrap();
    assert_eq!(
        cal.days(),
        &[
            CalendarDay { date: "2024-01-01".into(), count: 2 },
            CalendarDay { date: "2024-01-03".into(), count: 1 },
        ]
    );
    assert_eq!(cal.total_units(), 3);
    assert_eq!(cal.first_date(), "2024-01-01");
    assert_eq!(cal.last_date(), "2024-01-03");
}

#[test]
fn zero_total_is_empty_input() {
    let err = Calendar::normalize(&[day("2024-02-05", 0)]).unwrap_err();
    assert!(matches!(err, GreenwallError::EmptyInput(_)));

    let err = Calendar::normalize(&[]).unwrap_err();
    assert!(matches!(err, GreenwallError::EmptyInput(_)));
}

#[test]
fn negative_count_is_rejected() {
    let err = Calendar::normalize(&[day("2024-01-01", 3), day("2024-01-02", -1)]).unwrap_err();
    assert!(matches!(err, GreenwallError::Validation(_)));
    assert!(err.to_string().contains("2024-01-02"));
}

#[test]
fn count_beyond_one_day_is_rejected() {
    let err = Calendar::normalize(&[day("2024-01-01", 43_201)]).unwrap_err();
    assert!(matches!(err, GreenwallError::Validation(_)));
    assert!(Calendar::normalize(&[day("2024-01-01", 43_200)]).is_ok());
}

#[test]
fn duplicates_keep_input_order_and_merge_on_request() {
    let input = [day("2024-01-01", 2), day("2023-12-31", 1), day("2024-01-01", 3)];

    let cal = Calendar::normalize(&input).unwrap();
    let counts: Vec<u32> = cal.days().iter().map(|d| d.count).collect();
    assert_eq!(counts, vec![1, 2, 3]);

    assert_eq!(
        merge_by_date(&input).unwrap(),
        vec![day("2023-12-31", 1), day("2024-01-01", 5)]
    );

    let daily = cal.daily_counts().unwrap();
    assert_eq!(daily.values().copied().collect::<Vec<_>>(), vec![1, 5]);
}

#[test]
fn parse_request_accepts_bare_array_and_request_object() {
    let bare = parse_request(br#"[{"date":"2024-01-01","count":2}]"#).unwrap();
    assert_eq!(bare.contributions, vec![day("2024-01-01", 2)]);
    assert!(bare.username.is_none());

    let full = parse_request(
        br#"{"year":2024,"username":"octo","email":"o@example.com","repoName":"wall",
             "contributions":[{"date":"2024-01-01","count":1}]}"#,
    )
    .unwrap();
    assert_eq!(full.year, Some(2024));
    assert_eq!(full.username.as_deref(), Some("octo"));
    assert_eq!(full.repo_name.as_deref(), Some("wall"));
}

#[test]
fn parse_request_rejects_unknown_and_missing_fields() {
    assert!(parse_request(br#"[{"date":"2024-01-01","count":1,"color":"green"}]"#).is_err());
    assert!(parse_request(br#"[{"date":"2024-01-01"}]"#).is_err());
    assert!(parse_request(br#"{"username":"octo"}"#).is_err());
    assert!(parse_request(br#"{"contributions":[],"remote":true}"#).is_err());
}

#[test]
fn merge_rejects_negative_duplicates() {
    let input = [day("2024-01-01", 3), day("2024-01-01", -1)];
    let err = merge_by_date(&input).unwrap_err();
    assert!(matches!(err, GreenwallError::Validation(_)));
    assert!(err.to_string().contains("2024-01-01: -1"));

    // a negative entry on its own date is rejected the same way
    let err = merge_by_date(&[day("2024-01-01", 1), day("2024-01-02", -4)]).unwrap_err();
    assert!(matches!(err, GreenwallError::Validation(_)));
}

#[test]
fn merge_reports_overflow_instead_of_wrapping() {
    let err = merge_by_date(&[day("2024-01-01", i64::MAX), day("2024-01-01", 1)]).unwrap_err();
    assert!(matches!(err, GreenwallError::Validation(_)));
    assert!(err.to_string().contains("overflows"));
}

#[test]
fn merged_sum_above_daily_bound_is_rejected_by_normalize() {
    let merged = merge_by_date(&[day("2024-01-01", 40_000), day("2024-01-01", 4_000)]).unwrap();
    assert_eq!(merged, vec![day("2024-01-01", 44_000)]);
    let err = Calendar::normalize(&merged).unwrap_err();
    assert!(matches!(err, GreenwallError::Validation(_)));
}
