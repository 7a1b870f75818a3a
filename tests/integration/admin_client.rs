//! Integration tests for the admin client over the public transport trait

use super::test_utils::ScriptedTransport;
use registry_admin::transport::Method;
use registry_admin::{AdminClient, ErrorKind, Role};
use serde_json::json;

const ROLES_URL: &str = "https://registry.example.com/api/roles";

#[test]
fn test_role_lifecycle() {
    let transport = ScriptedTransport::new()
        .on(Method::Get, ROLES_URL, 200, json!({"results": []}))
        .on(
            Method::Post,
            ROLES_URL,
            200,
            json!({"id": "1234-1234", "name": "test", "arn": "asdf123"}),
        )
        .on(
            Method::Put,
            "https://registry.example.com/api/roles/1234-1234",
            200,
            json!({"id": "1234-1234", "name": "renamed", "arn": "qwer456"}),
        )
        .on(
            Method::Get,
            ROLES_URL,
            200,
            json!({"results": [{"id": "1234-1234", "name": "renamed", "arn": "qwer456"}]}),
        )
        .on_raw(
            Method::Delete,
            "https://registry.example.com/api/roles/1234-1234",
            204,
            "",
        );
    let admin = AdminClient::new(&transport, "registry.example.com").unwrap();

    assert!(admin.list_roles().unwrap().is_empty());

    let created = admin.create_role("test", "asdf123").unwrap();
    assert_eq!(created.id, "1234-1234");

    let edited = admin.edit_role(&created.id, "renamed", "qwer456").unwrap();
    assert_eq!(
        admin.list_roles().unwrap(),
        vec![Role {
            id: created.id.clone(),
            name: edited.name.clone(),
            arn: edited.arn.clone(),
        }]
    );

    admin.delete_role(&created.id).unwrap();

    let methods: Vec<Method> = transport.seen().iter().map(|r| r.method).collect();
    assert_eq!(
        methods,
        vec![
            Method::Get,
            Method::Post,
            Method::Put,
            Method::Get,
            Method::Delete
        ]
    );
}

#[test]
fn test_server_message_is_surfaced() {
    let transport = ScriptedTransport::new().on(
        Method::Post,
        "https://registry.example.com/api/users/set_role",
        404,
        json!({"message": "No role exists by the provided name."}),
    );
    let admin = AdminClient::new(&transport, "https://registry.example.com").unwrap();

    let err = admin.set_role("alice", "ghost").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AdminRequest);
    assert_eq!(err.status(), Some(404));
    assert!(err
        .to_string()
        .contains("No role exists by the provided name."));
}

#[test]
fn test_invalid_registry_url_is_rejected() {
    let transport = ScriptedTransport::new();
    let err = AdminClient::new(&transport, "registry.example.com:70000")
        .err()
        .unwrap();
    assert_eq!(err.kind(), ErrorKind::Settings);
    assert!(transport.seen().is_empty());
}
