//! GraphQL API Integration Tests
//!
//! Drives the schema end to end against the in-memory store.

use std::sync::Arc;

use graphql_gateway::{build_schema, GraphQlBody, QueryEngine};
use memberhub_store::MemoryStore;
use serde_json::{json, Value};
use uuid::Uuid;

fn engine() -> QueryEngine {
    QueryEngine::new(build_schema(), Arc::new(MemoryStore::new()))
}

async fn run(engine: &QueryEngine, query: &str, variables: Value) -> Value {
    let reply = engine
        .execute(GraphQlBody::new(query).with_variables(variables))
        .await;
    serde_json::to_value(&reply).unwrap()
}

async fn create_user(engine: &QueryEngine, name: &str) -> String {
    let res = run(
        engine,
        "mutation($dto: CreateUserInput!) { createUser(dto: $dto) { id } }",
        json!({ "dto": { "name": name, "balance": 0 } }),
    )
    .await;
    res["data"]["createUser"]["id"].as_str().unwrap().to_string()
}

fn error_codes(res: &Value) -> Vec<String> {
    res["errors"]
        .as_array()
        .map(|errors| {
            errors
                .iter()
                .filter_map(|e| e["extensions"]["code"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

#[tokio::test]
async fn test_create_user_then_fetch_by_id() {
    let engine = engine();

    let created = run(
        &engine,
        r#"mutation { createUser(dto: { name: "Ann", balance: 10 }) { id name balance } }"#,
        json!({}),
    )
    .await;
    assert!(created.get("errors").is_none(), "{created}");

    let user = &created["data"]["createUser"];
    let id = user["id"].as_str().unwrap();
    assert!(Uuid::try_parse(id).is_ok());
    assert_eq!(id.len(), 36);
    assert_eq!(user["name"], "Ann");
    assert_eq!(user["balance"], 10.0);

    let fetched = run(
        &engine,
        "query($id: UUID!) { user(id: $id) { id name balance } }",
        json!({ "id": id }),
    )
    .await;
    assert_eq!(fetched["data"]["user"], *user);
}

#[tokio::test]
async fn test_missing_user_is_null_without_errors() {
    let engine = engine();
    let res = run(
        &engine,
        "query($id: UUID!) { user(id: $id) { id } }",
        json!({ "id": Uuid::new_v4().to_string() }),
    )
    .await;

    assert_eq!(res, json!({ "data": { "user": null } }));
}

#[tokio::test]
async fn test_list_queries_start_empty() {
    let engine = engine();
    let res = run(&engine, "{ users { id } posts { id } profiles { id } }", json!({})).await;
    assert_eq!(
        res,
        json!({ "data": { "users": [], "posts": [], "profiles": [] } })
    );
}

#[tokio::test]
async fn test_member_types_are_reference_data() {
    let engine = engine();
    let res = run(
        &engine,
        "{ memberTypes { id } memberType(id: business) { id discount postsLimitPerMonth } }",
        json!({}),
    )
    .await;

    let ids: Vec<&str> = res["data"]["memberTypes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["basic", "business"]);
    assert_eq!(res["data"]["memberType"]["id"], "business");
    assert_eq!(res["data"]["memberType"]["postsLimitPerMonth"], 100);
}

#[tokio::test]
async fn test_depth_limit() {
    let engine = engine();
    create_user(&engine, "Ann").await;

    // Top-level fields sit at depth 0, so six nested levels reach depth 5.
    let depth_five = "{ users { userSubscribedTo { userSubscribedTo { userSubscribedTo { userSubscribedTo { id } } } } } }";
    let res = run(&engine, depth_five, json!({})).await;
    assert!(res.get("errors").is_none(), "{res}");
    assert_eq!(res["data"]["users"][0]["userSubscribedTo"], json!([]));

    let depth_six = "{ users { userSubscribedTo { userSubscribedTo { userSubscribedTo { userSubscribedTo { profile { id } } } } } } }";
    let res = run(&engine, depth_six, json!({})).await;
    assert!(res.get("data").is_none(), "{res}");
    assert!(!res["errors"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_lone_failed_mutation_is_null_at_its_path() {
    let engine = engine();
    let res = run(
        &engine,
        "mutation($id: UUID!) { deleteUser(id: $id) }",
        json!({ "id": Uuid::new_v4().to_string() }),
    )
    .await;

    assert_eq!(res["data"], json!({ "deleteUser": null }));
    assert_eq!(res["errors"][0]["path"], json!(["deleteUser"]));
    assert_eq!(error_codes(&res), vec!["NOT_FOUND"]);
}

#[tokio::test]
async fn test_change_missing_post_is_not_found_before_reference_check() {
    let engine = engine();
    let res = run(
        &engine,
        "mutation($id: UUID!, $author: UUID!) { changePost(id: $id, dto: { authorId: $author }) { id } }",
        json!({ "id": Uuid::new_v4().to_string(), "author": Uuid::new_v4().to_string() }),
    )
    .await;

    assert_eq!(res["data"], json!({ "changePost": null }));
    assert_eq!(error_codes(&res), vec!["NOT_FOUND"]);
}

#[tokio::test]
async fn test_unknown_field_rejects_whole_document() {
    let engine = engine();
    let res = run(&engine, "{ users { id } doesNotExist }", json!({})).await;
    assert!(res.get("data").is_none());
    assert_eq!(res["errors"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_malformed_uuid_is_a_graphql_error() {
    let engine = engine();

    let literal = run(&engine, r#"{ user(id: "12345") { id } }"#, json!({})).await;
    assert!(!literal["errors"].as_array().unwrap().is_empty());
    assert!(literal["data"]["user"].is_null());

    let variable = run(
        &engine,
        "query($id: UUID!) { user(id: $id) { id } }",
        json!({ "id": "6f1c4d1e2b8a4c5e9f3a1d2e3f4a5b6c" }),
    )
    .await;
    assert!(!variable["errors"].as_array().unwrap().is_empty());
    assert!(variable["data"]["user"].is_null());
}

#[tokio::test]
async fn test_second_profile_fails_and_keeps_the_first() {
    let engine = engine();
    let user_id = create_user(&engine, "Ann").await;

    let create = "mutation($dto: CreateProfileInput!) { \
                  createProfile(dto: $dto) { id isMale yearOfBirth memberTypeId memberType { id } } }";

    let first = run(
        &engine,
        create,
        json!({ "dto": { "isMale": false, "yearOfBirth": 1990, "memberTypeId": "basic", "userId": user_id } }),
    )
    .await;
    assert!(first.get("errors").is_none(), "{first}");
    let profile = first["data"]["createProfile"].clone();
    assert_eq!(profile["memberType"]["id"], "basic");

    let second = run(
        &engine,
        create,
        json!({ "dto": { "isMale": true, "yearOfBirth": 2001, "memberTypeId": "business", "userId": user_id } }),
    )
    .await;
    assert_eq!(second["data"], json!({ "createProfile": null }));
    assert_eq!(second["errors"][0]["path"], json!(["createProfile"]));
    assert_eq!(error_codes(&second), vec!["CONFLICT"]);

    let current = run(
        &engine,
        "query($id: UUID!) { user(id: $id) { profile { id isMale yearOfBirth memberTypeId memberType { id } } } }",
        json!({ "id": user_id }),
    )
    .await;
    assert_eq!(current["data"]["user"]["profile"], profile);
}

#[tokio::test]
async fn test_subscribe_and_unsubscribe() {
    let engine = engine();
    let ann = create_user(&engine, "Ann").await;
    let bob = create_user(&engine, "Bob").await;

    let subscribed = run(
        &engine,
        "mutation($u: UUID!, $a: UUID!) { subscribeTo(userId: $u, authorId: $a) { id name } }",
        json!({ "u": ann, "a": bob }),
    )
    .await;
    assert_eq!(subscribed["data"]["subscribeTo"]["id"], ann.as_str());
    assert_eq!(subscribed["data"]["subscribeTo"]["name"], "Ann");

    let relations = "query($u: UUID!, $a: UUID!) { \
                     ann: user(id: $u) { userSubscribedTo { id } } \
                     bob: user(id: $a) { subscribedToUser { id } } }";
    let res = run(&engine, relations, json!({ "u": ann, "a": bob })).await;
    assert_eq!(res["data"]["ann"]["userSubscribedTo"], json!([{ "id": bob }]));
    assert_eq!(res["data"]["bob"]["subscribedToUser"], json!([{ "id": ann }]));

    let again = run(
        &engine,
        "mutation($u: UUID!, $a: UUID!) { subscribeTo(userId: $u, authorId: $a) { id } }",
        json!({ "u": ann, "a": bob }),
    )
    .await;
    assert_eq!(error_codes(&again), vec!["CONFLICT"]);

    let removed = run(
        &engine,
        "mutation($u: UUID!, $a: UUID!) { unsubscribeFrom(userId: $u, authorId: $a) }",
        json!({ "u": ann, "a": bob }),
    )
    .await;
    assert_eq!(removed, json!({ "data": { "unsubscribeFrom": true } }));

    let res = run(&engine, relations, json!({ "u": ann, "a": bob })).await;
    assert_eq!(res["data"]["ann"]["userSubscribedTo"], json!([]));
    assert_eq!(res["data"]["bob"]["subscribedToUser"], json!([]));
}

#[tokio::test]
async fn test_delete_post_then_fetch_is_null() {
    let engine = engine();
    let author = create_user(&engine, "Ann").await;

    let created = run(
        &engine,
        "mutation($dto: CreatePostInput!) { createPost(dto: $dto) { id authorId } }",
        json!({ "dto": { "title": "Hello", "content": "World", "authorId": author } }),
    )
    .await;
    let post_id = created["data"]["createPost"]["id"].as_str().unwrap().to_string();
    assert_eq!(created["data"]["createPost"]["authorId"], author.as_str());

    let deleted = run(
        &engine,
        "mutation($id: UUID!) { deletePost(id: $id) }",
        json!({ "id": post_id }),
    )
    .await;
    assert_eq!(deleted, json!({ "data": { "deletePost": true } }));

    let fetched = run(
        &engine,
        "query($id: UUID!) { post(id: $id) { id } }",
        json!({ "id": post_id }),
    )
    .await;
    assert_eq!(fetched, json!({ "data": { "post": null } }));

    let again = run(
        &engine,
        "mutation($id: UUID!) { deletePost(id: $id) }",
        json!({ "id": post_id }),
    )
    .await;
    assert_eq!(again["data"], json!({ "deletePost": null }));
    assert_eq!(error_codes(&again), vec!["NOT_FOUND"]);
}

#[tokio::test]
async fn test_change_user_leaves_omitted_fields() {
    let engine = engine();
    let id = create_user(&engine, "Ann").await;

    let res = run(
        &engine,
        "mutation($id: UUID!) { changeUser(id: $id, dto: { balance: 99.5 }) { name balance } }",
        json!({ "id": id }),
    )
    .await;
    assert_eq!(res["data"]["changeUser"], json!({ "name": "Ann", "balance": 99.5 }));
}

#[tokio::test]
async fn test_failed_mutation_keeps_sibling_results() {
    let engine = engine();
    let res = run(
        &engine,
        "mutation($missing: UUID!) { \
         ok: createUser(dto: { name: \"Eve\", balance: 1 }) { name } \
         bad: changeUser(id: $missing, dto: { name: \"x\" }) { name } }",
        json!({ "missing": Uuid::new_v4().to_string() }),
    )
    .await;

    assert_eq!(res["data"]["ok"]["name"], "Eve");
    assert_eq!(res["data"], json!({ "ok": { "name": "Eve" }, "bad": null }));
    assert_eq!(res["errors"][0]["path"], json!(["bad"]));
    assert_eq!(error_codes(&res), vec!["NOT_FOUND"]);
}

#[tokio::test]
async fn test_post_for_unknown_author_is_invalid_reference() {
    let engine = engine();
    let res = run(
        &engine,
        "mutation($dto: CreatePostInput!) { createPost(dto: $dto) { id } }",
        json!({ "dto": { "title": "t", "content": "c", "authorId": Uuid::new_v4().to_string() } }),
    )
    .await;
    assert_eq!(res["data"], json!({ "createPost": null }));
    assert_eq!(error_codes(&res), vec!["INVALID_REFERENCE"]);
}

#[tokio::test]
async fn test_delete_user_cascades_to_profile_and_posts() {
    let engine = engine();
    let user_id = create_user(&engine, "Ann").await;

    let setup = run(
        &engine,
        "mutation($profile: CreateProfileInput!, $post: CreatePostInput!) { \
         createProfile(dto: $profile) { id } createPost(dto: $post) { id } }",
        json!({
            "profile": { "isMale": false, "yearOfBirth": 1990, "memberTypeId": "basic", "userId": user_id },
            "post": { "title": "t", "content": "c", "authorId": user_id }
        }),
    )
    .await;
    assert!(setup.get("errors").is_none(), "{setup}");
    let profile_id = setup["data"]["createProfile"]["id"].as_str().unwrap().to_string();

    let deleted = run(
        &engine,
        "mutation($id: UUID!) { deleteUser(id: $id) }",
        json!({ "id": user_id }),
    )
    .await;
    assert_eq!(deleted["data"]["deleteUser"], true);

    let res = run(
        &engine,
        "query($u: UUID!, $p: UUID!) { user(id: $u) { id } profile(id: $p) { id } posts { id } }",
        json!({ "u": user_id, "p": profile_id }),
    )
    .await;
    assert_eq!(
        res,
        json!({ "data": { "user": null, "profile": null, "posts": [] } })
    );
}

#[tokio::test]
async fn test_change_profile_switches_member_type() {
    let engine = engine();
    let user_id = create_user(&engine, "Ann").await;
    let created = run(
        &engine,
        "mutation($dto: CreateProfileInput!) { createProfile(dto: $dto) { id } }",
        json!({ "dto": { "isMale": true, "yearOfBirth": 1980, "memberTypeId": "basic", "userId": user_id } }),
    )
    .await;
    let profile_id = created["data"]["createProfile"]["id"].as_str().unwrap().to_string();

    let changed = run(
        &engine,
        "mutation($id: UUID!) { changeProfile(id: $id, dto: { memberTypeId: business }) { \
         isMale yearOfBirth memberType { discount } } }",
        json!({ "id": profile_id }),
    )
    .await;
    assert_eq!(
        changed["data"]["changeProfile"],
        json!({ "isMale": true, "yearOfBirth": 1980, "memberType": { "discount": 7.7 } })
    );
}

#[tokio::test]
async fn test_change_post_and_delete_profile() {
    let engine = engine();
    let ann = create_user(&engine, "Ann").await;
    let bob = create_user(&engine, "Bob").await;

    let setup = run(
        &engine,
        "mutation($profile: CreateProfileInput!, $post: CreatePostInput!) { \
         createProfile(dto: $profile) { id } createPost(dto: $post) { id } }",
        json!({
            "profile": { "isMale": true, "yearOfBirth": 1970, "memberTypeId": "business", "userId": ann },
            "post": { "title": "draft", "content": "body", "authorId": ann }
        }),
    )
    .await;
    let profile_id = setup["data"]["createProfile"]["id"].as_str().unwrap().to_string();
    let post_id = setup["data"]["createPost"]["id"].as_str().unwrap().to_string();

    let changed = run(
        &engine,
        "mutation($id: UUID!, $author: UUID!) { \
         changePost(id: $id, dto: { title: \"final\", authorId: $author }) { title content authorId } }",
        json!({ "id": post_id, "author": bob }),
    )
    .await;
    assert_eq!(
        changed["data"]["changePost"],
        json!({ "title": "final", "content": "body", "authorId": bob })
    );

    let deleted = run(
        &engine,
        "mutation($id: UUID!) { deleteProfile(id: $id) }",
        json!({ "id": profile_id }),
    )
    .await;
    assert_eq!(deleted, json!({ "data": { "deleteProfile": true } }));

    let res = run(
        &engine,
        "query($u: UUID!, $b: UUID!) { ann: user(id: $u) { profile { id } posts { id } } \
         bob: user(id: $b) { posts { title } } }",
        json!({ "u": ann, "b": bob }),
    )
    .await;
    assert_eq!(
        res["data"],
        json!({
            "ann": { "profile": null, "posts": [] },
            "bob": { "posts": [{ "title": "final" }] }
        })
    );
}
