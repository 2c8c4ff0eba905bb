//! Integration tests for `MongoUserRepository` against a live document store.
//!
//! Each test writes to its own collection so runs never observe each other.
//! Without `USERS_TEST_MONGO_URI` every test prints a skip marker and passes.

use rstest::rstest;
use user_registry::domain::ports::{UserPersistenceError, UserRepository};
use user_registry::domain::{UserDetails, UserPatch, validate_user_input};
use user_registry::outbound::persistence::{MongoConfig, MongoHandle, MongoUserRepository};
use user_registry::test_support::user_input;
use uuid::Uuid;

mod support;

use support::test_mongo_uri;

async fn repository(test_name: &str) -> Option<MongoUserRepository> {
    let uri = test_mongo_uri(test_name)?;
    let collection = format!("users_{}", Uuid::new_v4().simple());
    let config = MongoConfig::new(uri, "user_registry_tests").with_collection(collection);
    let handle = MongoHandle::connect(&config)
        .await
        .expect("test document store reachable");
    Some(MongoUserRepository::new(&handle))
}

fn details(name: &str, email: &str) -> UserDetails {
    validate_user_input(user_input(name, email)).expect("valid details")
}

#[rstest]
#[tokio::test]
async fn insert_then_find_by_id_and_email() {
    let Some(repo) = repository("insert_then_find_by_id_and_email").await else {
        return;
    };

    let ana = repo.insert(&details("Ana", "ana@x.com")).await.expect("insert");
    let by_id = repo.find_by_id(ana.id()).await.expect("find").expect("present");
    let by_email = repo
        .find_by_email(ana.details().email())
        .await
        .expect("find")
        .expect("present");

    assert_eq!(by_id, ana);
    assert_eq!(by_email, ana);
}

#[rstest]
#[tokio::test]
async fn unique_index_rejects_second_email() {
    let Some(repo) = repository("unique_index_rejects_second_email").await else {
        return;
    };

    repo.insert(&details("Ana", "ana@x.com")).await.expect("first insert");
    let err = repo
        .insert(&details("Ana Again", "ana@x.com"))
        .await
        .expect_err("duplicate");

    assert!(matches!(err, UserPersistenceError::DuplicateKey { .. }));
}

#[rstest]
#[tokio::test]
async fn find_all_returns_insertion_order() {
    let Some(repo) = repository("find_all_returns_insertion_order").await else {
        return;
    };

    let ana = repo.insert(&details("Ana", "ana@x.com")).await.expect("ana");
    let bo = repo.insert(&details("Bo", "bo@x.com")).await.expect("bo");

    let all = repo.find_all().await.expect("list");
    assert_eq!(all, vec![ana, bo]);
}

#[rstest]
#[tokio::test]
async fn update_sets_fields_and_reports_missing_records() {
    let Some(repo) = repository("update_sets_fields_and_reports_missing_records").await else {
        return;
    };

    let ana = repo.insert(&details("Ana", "ana@x.com")).await.expect("ana");
    let renamed = UserPatch {
        name: Some("Ana B".to_owned()),
        ..UserPatch::default()
    }
    .validate()
    .expect("valid changes");
    let updated = repo.update(ana.id(), &renamed).await.expect("update");
    assert_eq!(updated.details().name(), "Ana B");
    assert_eq!(updated.details().email(), ana.details().email());
    assert_eq!(updated.created_at(), ana.created_at());
    assert!(updated.updated_at() >= ana.updated_at());

    let removed = repo.delete_by_id(ana.id()).await.expect("delete");
    assert!(removed.is_some());
    assert!(repo.delete_by_id(ana.id()).await.expect("delete").is_none());

    let err = repo.update(ana.id(), &renamed).await.expect_err("missing");
    assert!(matches!(err, UserPersistenceError::Missing { .. }));
}

#[rstest]
#[tokio::test]
async fn concurrent_updates_to_different_fields_both_survive() {
    let Some(repo) = repository("concurrent_updates_to_different_fields_both_survive").await
    else {
        return;
    };

    let ana = repo.insert(&details("Ana", "ana@x.com")).await.expect("ana");
    let company = UserPatch {
        company: Some("Acme".to_owned()),
        ..UserPatch::default()
    }
    .validate()
    .expect("valid changes");
    let phone = UserPatch {
        phone: Some("999".to_owned()),
        ..UserPatch::default()
    }
    .validate()
    .expect("valid changes");

    let (first, second) = tokio::join!(
        repo.update(ana.id(), &company),
        repo.update(ana.id(), &phone)
    );
    first.expect("company update");
    second.expect("phone update");

    let stored = repo.find_by_id(ana.id()).await.expect("find").expect("present");
    assert_eq!(stored.details().company(), Some("Acme"));
    assert_eq!(stored.details().phone(), "999");
}

#[rstest]
#[tokio::test]
async fn update_to_taken_email_is_a_duplicate_key() {
    let Some(repo) = repository("update_to_taken_email_is_a_duplicate_key").await else {
        return;
    };

    repo.insert(&details("Ana", "ana@x.com")).await.expect("ana");
    let bo = repo.insert(&details("Bo", "bo@x.com")).await.expect("bo");
    let taken = UserPatch {
        email: Some("ana@x.com".to_owned()),
        ..UserPatch::default()
    }
    .validate()
    .expect("valid changes");

    let err = repo.update(bo.id(), &taken).await.expect_err("duplicate");
    assert!(matches!(err, UserPersistenceError::DuplicateKey { .. }));
}
