mod common;

use common::*;
use fcrepo_client::{Error, HttpResponse, Repository, Resource, StatusCode};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

fn tx_transport() -> MockTransport {
    MockTransport::new(|req| match (req.method.as_str(), req.path()) {
        ("POST", "/fcr:tx") => {
            HttpResponse::new(StatusCode::CREATED).with_header("Location", &uri("/tx:abc"))
        }
        ("POST", "/tx:abc/fcr:tx/fcr:commit") => HttpResponse::new(StatusCode::NO_CONTENT),
        ("POST", "/tx:abc/fcr:tx/fcr:rollback") => HttpResponse::new(StatusCode::NO_CONTENT),
        ("PUT", _) => HttpResponse::new(StatusCode::CREATED),
        ("HEAD", _) => HttpResponse::new(StatusCode::OK),
        (_, path) => turtle(object_turtle(path)),
    })
}

#[test]
fn test_start_and_commit() {
    let transport = tx_transport();
    let repo = repository(&transport);
    let tx = repo.start_transaction().unwrap();
    assert_eq!(tx.token(), Some("tx:abc"));

    let object = tx.create_object("/foo").unwrap();
    assert_eq!(object.path(), "/tx:abc/foo");
    assert!(tx.exists("bar").unwrap());
    tx.commit().unwrap();

    let paths: Vec<String> = transport
        .requests()
        .iter()
        .map(|r| format!("{} {}", r.method, r.path()))
        .collect();
    assert_eq!(
        paths,
        vec![
            "POST /fcr:tx",
            "PUT /tx:abc/foo",
            "GET /tx:abc/foo",
            "HEAD /tx:abc/bar",
            "POST /tx:abc/fcr:tx/fcr:commit",
        ]
    );
}

#[test]
fn test_rollback() {
    let transport = tx_transport();
    let repo = repository(&transport);
    let tx = repo.start_transaction().unwrap();
    tx.rollback().unwrap();
    assert_eq!(
        transport.requests().last().unwrap().path(),
        "/tx:abc/fcr:tx/fcr:rollback"
    );
}

#[test]
fn test_location_with_trailing_slash() {
    let transport = MockTransport::new(|req| match (req.method.as_str(), req.path()) {
        ("POST", "/fcr:tx") => {
            HttpResponse::new(StatusCode::CREATED).with_header("Location", &uri("/tx:abc/"))
        }
        ("POST", _) => HttpResponse::new(StatusCode::NO_CONTENT),
        (_, path) => turtle(object_turtle(path)),
    });
    let repo = repository(&transport);
    let tx = repo.start_transaction().unwrap();
    assert_eq!(tx.token(), Some("tx:abc"));
    let object = tx.get_object("/foo").unwrap();
    assert_eq!(object.path(), "/tx:abc/foo");
    tx.rollback().unwrap();

    let paths: Vec<String> = transport.requests().iter().map(|r| r.path().to_string()).collect();
    assert_eq!(paths, vec!["/fcr:tx", "/tx:abc/foo", "/tx:abc/fcr:tx/fcr:rollback"]);
}

#[test]
fn test_repository_outside_transaction_is_unscoped() {
    let transport = tx_transport();
    let repo = repository(&transport);
    let tx = repo.start_transaction().unwrap();
    repo.get_object("/foo").unwrap();
    tx.get_object("/tx:abc/foo").unwrap();
    tx.commit().unwrap();

    let requests = transport.requests();
    assert_eq!(requests[1].path(), "/foo");
    // already scoped paths are not scoped twice
    assert_eq!(requests[2].path(), "/tx:abc/foo");
}

#[test]
fn test_failed_commit_still_finishes() {
    let transport = MockTransport::new(|req| match req.path() {
        "/fcr:tx" => {
            HttpResponse::new(StatusCode::CREATED).with_header("Location", &uri("/tx:abc"))
        }
        _ => HttpResponse::new(StatusCode::GONE).with_reason("Gone"),
    });
    let repo = repository(&transport);
    let tx = repo.start_transaction().unwrap();
    match tx.commit() {
        Err(Error::Protocol { status, .. }) => assert_eq!(status, StatusCode::GONE),
        other => panic!("unexpected result: {other:?}"),
    }
    // only open and commit were sent; nothing is retried on drop
    assert_eq!(transport.count(), 2);
}

#[test]
fn test_start_transaction_errors() {
    let transport = MockTransport::new(|_| HttpResponse::new(StatusCode::CREATED));
    let repo = repository(&transport);
    assert!(matches!(repo.start_transaction(), Err(Error::MissingHeader { .. })));

    let transport = MockTransport::new(|_| HttpResponse::new(StatusCode::FORBIDDEN));
    let repo = repository(&transport);
    assert!(matches!(repo.start_transaction(), Err(Error::Forbidden { .. })));
}

#[test]
fn test_read_only_cannot_start_transaction() {
    let transport = tx_transport();
    let repo = read_only_repository(&transport);
    assert!(matches!(repo.start_transaction(), Err(Error::ReadOnly { .. })));
    assert_eq!(transport.count(), 0);
}

#[test]
fn test_concurrent_transactions_are_isolated() {
    let opened = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&opened);
    let transport = MockTransport::new(move |req| match (req.method.as_str(), req.path()) {
        ("POST", "/fcr:tx") => {
            // token derived from the request order
            let token = format!("tx:{}", counter.fetch_add(1, Ordering::SeqCst));
            HttpResponse::new(StatusCode::CREATED)
                .with_header("Location", &uri(&format!("/{token}")))
        }
        ("POST", _) => HttpResponse::new(StatusCode::NO_CONTENT),
        (_, path) => turtle(object_turtle(path)),
    });
    let repo = repository(&transport);

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let repo = repo.clone();
            thread::spawn(move || {
                let tx = repo.start_transaction().unwrap();
                let token = tx.token().unwrap().to_string();
                let object = tx.get_object(&format!("/item{i}")).unwrap();
                assert!(object.path().starts_with(&format!("/{token}/")));
                // plain repository calls on the same thread stay unscoped
                let plain = repo.get_object(&format!("/plain{i}")).unwrap();
                assert_eq!(plain.path(), format!("/plain{i}"));
                tx.commit().unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let requests = transport.requests();
    assert_eq!(requests.len(), 16);
    assert_eq!(opened.load(Ordering::SeqCst), 4);
    let mut scoped: Vec<&str> = requests
        .iter()
        .filter(|r| r.method == "GET" && r.path().starts_with("/tx:"))
        .map(|r| r.path().split('/').nth(1).unwrap())
        .collect();
    scoped.sort();
    scoped.dedup();
    assert_eq!(scoped.len(), 4);
    assert!(requests
        .iter()
        .filter(|r| r.path().starts_with("/plain"))
        .all(|r| !r.path().contains("tx:")));
}
