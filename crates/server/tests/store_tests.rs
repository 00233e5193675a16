//! User store tests against both backends.
//!
//! The PostgreSQL half requires Docker. Set SKIP_POSTGRES_TESTS=1 to skip.

mod common;

use common::run_store_test_both;
use roster_core::{AgeBucket, UserRecord};
use roster_store::{ReportRepo, StoreError, UserRepo, UserStore, age_distribution};
use serde_json::json;
use std::collections::HashMap;

fn user(name: &str, age: Option<&str>) -> UserRecord {
    UserRecord {
        name: name.to_string(),
        age: age.map(str::to_string),
        address: json!({ "city": "Springfield" }),
        additional_info: json!({ "gender": "female" }),
    }
}

#[tokio::test]
async fn test_batch_insert_commits_every_row() {
    run_store_test_both(|store| async move {
        let users = [user("Jane Doe", Some("30")), user("John Roe", Some("41"))];

        let inserted = store.insert_users(&users).await.unwrap();

        assert_eq!(inserted, 2);
        assert_eq!(store.count_users().await.unwrap(), 2);
    })
    .await;
}

#[tokio::test]
async fn test_failing_row_rolls_back_batch() {
    run_store_test_both(|store| async move {
        store.insert_users(&[user("Kept", Some("20"))]).await.unwrap();

        let batch = [
            user("First", Some("30")),
            user("Second", Some("not a number")),
            user("Third", Some("50")),
        ];
        let err = store.insert_users(&batch).await.unwrap_err();

        assert!(matches!(err, StoreError::Insert { row: 1, .. }), "{err:?}");
        assert_eq!(store.count_users().await.unwrap(), 1);
    })
    .await;
}

#[tokio::test]
async fn test_distribution_over_persisted_users() {
    run_store_test_both(|store| async move {
        let users = [
            user("A", Some("15")),
            user("B", Some("25")),
            user("C", Some("65")),
            user("D", None),
        ];
        store.insert_users(&users).await.unwrap();

        let distribution = age_distribution(store.as_ref()).await.unwrap();
        let got: Vec<(&str, u64, &str)> = distribution
            .iter()
            .map(|e| (e.bucket.label(), e.count, e.percentage.as_str()))
            .collect();

        assert_eq!(
            got,
            vec![
                ("20 to 40", 1, "33.33"),
                ("< 20", 1, "33.33"),
                ("> 60", 1, "33.33"),
            ]
        );
    })
    .await;
}

#[tokio::test]
async fn test_bucket_edges() {
    run_store_test_both(|store| async move {
        let users = [
            user("a", Some("19")),
            user("b", Some("20")),
            user("c", Some("40")),
            user("d", Some("60")),
        ];
        store.insert_users(&users).await.unwrap();

        let distribution = age_distribution(store.as_ref()).await.unwrap();
        let got: Vec<(&str, u64)> = distribution
            .iter()
            .map(|e| (e.bucket.label(), e.count))
            .collect();

        assert_eq!(got, vec![("20 to 40", 2), ("40 to 60", 1), ("< 20", 1)]);
    })
    .await;
}

#[tokio::test]
async fn test_sql_buckets_agree_with_age_bucket() {
    run_store_test_both(|store| async move {
        let ages: Vec<String> = (0..=150).map(|age: i64| age.to_string()).collect();
        let users: Vec<UserRecord> = ages.iter().map(|age| user("u", Some(age.as_str()))).collect();
        store.insert_users(&users).await.unwrap();

        let mut expected: HashMap<AgeBucket, i64> = HashMap::new();
        for age in 0..=150 {
            *expected.entry(AgeBucket::for_age(age)).or_default() += 1;
        }

        let rows = store.age_group_counts().await.unwrap();
        let got: HashMap<AgeBucket, i64> = rows
            .into_iter()
            .map(|row| (row.age_group.parse().unwrap(), row.count))
            .collect();

        assert_eq!(got, expected);
    })
    .await;
}

#[tokio::test]
async fn test_health_check_on_both_backends() {
    run_store_test_both(|store| async move {
        store.health_check().await.unwrap();
        store.migrate().await.unwrap();
    })
    .await;
}
