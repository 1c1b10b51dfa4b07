use super::common::*;
use crate::catalog::sample_catalog;
use crate::classification::domain::{AppType, ApprovalStatus, ManagementType, RiskLevel};
use crate::classification::table::{RecordQuery, SortDirection, SortKey};

fn urls(query: &RecordQuery) -> Vec<String> {
    query
        .apply(sample_catalog())
        .into_iter()
        .map(|record| record.url)
        .collect()
}

#[test]
fn default_query_keeps_catalog_order() {
    let all = urls(&RecordQuery::default());
    assert_eq!(all.len(), sample_catalog().len());
    assert_eq!(all[0], "google.com");
    assert_eq!(all[1], "facebook.com");
}

#[test]
fn search_is_case_insensitive_substring() {
    let query = RecordQuery {
        search: Some("  SPOT ".to_string()),
        ..RecordQuery::default()
    };
    assert_eq!(urls(&query), vec!["hubspot.com".to_string()]);
}

#[test]
fn filters_combine() {
    let query = RecordQuery {
        risk: Some(RiskLevel::High),
        saas_only: true,
        ..RecordQuery::default()
    };
    assert_eq!(urls(&query), vec!["dropbox.com".to_string()]);

    let query = RecordQuery {
        approval: Some(ApprovalStatus::UnderAnalysis),
        ..RecordQuery::default()
    };
    assert!(urls(&query).iter().any(|url| url == "coursera.org"));
}

#[test]
fn access_count_sorts_in_both_directions() {
    let ascending = RecordQuery {
        sort: Some(SortKey::AccessCount),
        ..RecordQuery::default()
    };
    let rows = ascending.apply(sample_catalog());
    assert!(rows
        .windows(2)
        .all(|pair| pair[0].access_count <= pair[1].access_count));

    let descending = RecordQuery {
        direction: SortDirection::Descending,
        ..ascending
    };
    assert_eq!(urls(&descending)[0], "google.com");
}

#[test]
fn risk_sort_puts_high_first_and_is_stable() {
    let records = vec![
        record(1, "low.com", AppType::Crm, ManagementType::ItManaged, RiskLevel::Low),
        record(2, "high-a.com", AppType::Crm, ManagementType::ItManaged, RiskLevel::High),
        record(3, "medium.com", AppType::Crm, ManagementType::ItManaged, RiskLevel::Medium),
        record(4, "high-b.com", AppType::Crm, ManagementType::ItManaged, RiskLevel::High),
    ];
    let query = RecordQuery {
        sort: Some(SortKey::RiskLevel),
        ..RecordQuery::default()
    };

    let sorted: Vec<String> = query
        .apply(records)
        .into_iter()
        .map(|record| record.url)
        .collect();
    assert_eq!(sorted, vec!["high-a.com", "high-b.com", "medium.com", "low.com"]);
}

#[test]
fn url_sort_ignores_case() {
    let records = vec![
        record(1, "Zoom.us", AppType::MessagingAndCommunication, ManagementType::ItManaged, RiskLevel::Low),
        record(2, "asana.com", AppType::Productivity, ManagementType::ItManaged, RiskLevel::Low),
    ];
    let query = RecordQuery {
        sort: Some(SortKey::Url),
        ..RecordQuery::default()
    };
    let sorted = query.apply(records);
    assert_eq!(sorted[0].url, "asana.com");
}

#[test]
fn search_and_sort_fold_non_ascii_hosts() {
    let records = vec![
        record(1, "ÖBB.at", AppType::NavigationAndMaps, ManagementType::NonItManaged, RiskLevel::Low),
        record(2, "öamtc.at", AppType::NavigationAndMaps, ManagementType::NonItManaged, RiskLevel::Low),
        record(3, "maps.com", AppType::NavigationAndMaps, ManagementType::NonItManaged, RiskLevel::Low),
    ];

    let search = RecordQuery {
        search: Some("öbb".to_string()),
        ..RecordQuery::default()
    };
    let found: Vec<String> = search
        .apply(records.clone())
        .into_iter()
        .map(|record| record.url)
        .collect();
    assert_eq!(found, vec!["ÖBB.at"]);

    let sorted = RecordQuery {
        sort: Some(SortKey::Url),
        ..RecordQuery::default()
    }
    .apply(records);
    assert_eq!(sorted[1].url, "öamtc.at");
    assert_eq!(sorted[2].url, "ÖBB.at");
}
