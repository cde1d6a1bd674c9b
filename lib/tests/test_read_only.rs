mod common;

use common::*;
use fcrepo_client::{Error, FedoraContent, HttpResponse, Repository, Resource, StatusCode};

fn read_only() -> (MockTransport, fcrepo_client::FedoraRepository) {
    let transport = MockTransport::new(|req| match req.method.as_str() {
        "HEAD" => HttpResponse::new(StatusCode::OK),
        _ if req.path().ends_with("/fcr:metadata") => {
            turtle(datastream_turtle(req.path().trim_end_matches("/fcr:metadata")))
        }
        _ => turtle(object_turtle(req.path())),
    });
    let repo = read_only_repository(&transport);
    (transport, repo)
}

fn assert_read_only<T: std::fmt::Debug>(result: fcrepo_client::Result<T>) {
    match result {
        Err(Error::ReadOnly { .. }) => {}
        other => panic!("expected a read-only refusal, got {other:?}"),
    }
}

#[test]
fn test_reads_are_allowed() {
    let (transport, repo) = read_only();
    assert!(repo.exists("/test").unwrap());
    let object = repo.get_object("/test").unwrap();
    assert!(object.is_writable());
    repo.get_datastream("/test/image").unwrap();
    assert_eq!(transport.count(), 3);
}

#[test]
fn test_repository_writes_are_refused() {
    let (transport, repo) = read_only();
    assert_read_only(repo.create_object("/new"));
    assert_read_only(repo.create_datastream("/new/ds", FedoraContent::new().with_bytes("x")));
    assert_read_only(repo.create_or_update_redirect_datastream("/new/link", "http://example.org/"));
    assert_read_only(repo.create_resource(None));
    assert_eq!(transport.count(), 0);
}

#[test]
fn test_resource_writes_are_refused() {
    let (transport, repo) = read_only();
    let mut object = repo.get_object("/test").unwrap();
    let mut ds = repo.get_datastream("/test/image").unwrap();
    let loads = transport.count();

    assert_read_only(object.update_properties("INSERT DATA {}"));
    assert_read_only(object.replace_properties(std::io::empty(), "text/turtle"));
    assert_read_only(object.delete());
    assert_read_only(object.copy("/copy"));
    assert_read_only(object.move_to("/moved"));
    assert_read_only(object.create_version("v1"));
    assert_read_only(ds.update_content(FedoraContent::new().with_bytes("x")));
    assert_eq!(transport.count(), loads);
}

#[test]
fn test_find_or_create_on_missing_resource() {
    let transport = MockTransport::new(|_| HttpResponse::new(StatusCode::NOT_FOUND));
    let repo = read_only_repository(&transport);
    assert_read_only(repo.find_or_create_object("/missing"));
    // the lookup went out, the create did not
    let methods: Vec<String> = transport.requests().into_iter().map(|r| r.method).collect();
    assert_eq!(methods, vec!["GET"]);
}
