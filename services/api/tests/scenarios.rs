//! End-to-end scenarios against a real PostgreSQL database
//!
//! Run with `DATABASE_URL` pointing at a server where the test user may
//! create databases, then `cargo test -- --ignored`.

mod support;

use api::{models::user::NewUser, repositories::UserRepository};
use auth::Role;
use reqwest::StatusCode;
use serde_json::{Value, json};
use sqlx::PgPool;
use support::{TestApp, spawn_app};

async fn create_user(pool: &PgPool, username: &str, role: Role) -> i64 {
    UserRepository::new(pool.clone())
        .create(&NewUser {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            first_name: String::new(),
            last_name: String::new(),
            bio: String::new(),
            role,
            confirmation_code: None,
        })
        .await
        .unwrap()
        .id
}

async fn bearer(app: &TestApp, pool: &PgPool, username: &str, role: Role) -> String {
    let id = create_user(pool, username, role).await;
    app.token_for(id, username)
}

async fn post(app: &TestApp, path: &str, token: &str, body: Value) -> reqwest::Response {
    app.client
        .post(app.url(path))
        .bearer_auth(token)
        .json(&body)
        .send()
        .await
        .unwrap()
}

/// Seed a category, a genre and one title; returns the title ID
async fn seed_title(app: &TestApp, admin: &str) -> i64 {
    let response = post(app, "/v1/categories", admin, json!({"name": "Books", "slug": "books"})).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let response = post(app, "/v1/genres", admin, json!({"name": "Sci-Fi", "slug": "sci-fi"})).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = post(
        app,
        "/v1/titles",
        admin,
        json!({
            "name": "Dune",
            "year": 1965,
            "description": "Desert planet",
            "genre": ["sci-fi"],
            "category": "books"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let title: Value = response.json().await.unwrap();
    assert_eq!(title["category"]["slug"], "books");
    assert_eq!(title["genre"][0]["slug"], "sci-fi");
    assert!(title["rating"].is_null());
    title["id"].as_i64().unwrap()
}

#[sqlx::test(migrator = "common::database::MIGRATOR")]
#[ignore = "requires a PostgreSQL server at DATABASE_URL"]
async fn signup_then_token(pool: PgPool) {
    let app = spawn_app(pool.clone()).await;
    let payload = json!({"email": "reader@example.com", "username": "reader"});

    let response = app
        .client
        .post(app.url("/v1/auth/signup"))
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, payload);

    // Signing up again re-sends a code instead of creating a second account.
    let response = app
        .client
        .post(app.url("/v1/auth/signup"))
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);

    let sent = app.mailer.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].subject, "YaMDb registration");
    let code = app.mailer.last_code_for("reader@example.com").unwrap();
    assert_eq!(code.len(), 6);

    let response = app
        .client
        .post(app.url("/v1/auth/token"))
        .json(&json!({"username": "reader", "confirmation_code": "not-it"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .client
        .post(app.url("/v1/auth/token"))
        .json(&json!({"username": "nobody", "confirmation_code": code}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .client
        .post(app.url("/v1/auth/token"))
        .json(&json!({"username": "reader", "confirmation_code": code}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.unwrap();
    let token = body["token"].as_str().unwrap().to_string();

    // The code is single use.
    let response = app
        .client
        .post(app.url("/v1/auth/token"))
        .json(&json!({"username": "reader", "confirmation_code": code}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .client
        .get(app.url("/v1/users/me"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let me: Value = response.json().await.unwrap();
    assert_eq!(me["username"], "reader");
    assert_eq!(me["role"], "user");
}

#[sqlx::test(migrator = "common::database::MIGRATOR")]
#[ignore = "requires a PostgreSQL server at DATABASE_URL"]
async fn signup_rejects_taken_email(pool: PgPool) {
    let app = spawn_app(pool.clone()).await;
    create_user(&pool, "first", Role::User).await;

    let response = app
        .client
        .post(app.url("/v1/auth/signup"))
        .json(&json!({"email": "first@example.com", "username": "second"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert!(body["fields"]["email"].is_array());
    assert!(app.mailer.sent().is_empty());
}

#[sqlx::test(migrator = "common::database::MIGRATOR")]
#[ignore = "requires a PostgreSQL server at DATABASE_URL"]
async fn rating_is_the_mean_score(pool: PgPool) {
    let app = spawn_app(pool.clone()).await;
    let admin = bearer(&app, &pool, "admin", Role::Admin).await;
    let alice = bearer(&app, &pool, "alice", Role::User).await;
    let bob = bearer(&app, &pool, "bob", Role::User).await;
    let title_id = seed_title(&app, &admin).await;
    let reviews = format!("/v1/titles/{}/reviews", title_id);

    let response = post(&app, &reviews, &alice, json!({"text": "Great", "score": 8})).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let review: Value = response.json().await.unwrap();
    assert_eq!(review["author"], "alice");

    let response = post(&app, &reviews, &bob, json!({"text": "Masterpiece", "score": 10})).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = post(&app, &reviews, &alice, json!({"text": "Again", "score": 1})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body["fields"]["non_field_errors"][0],
        "You can leave only one review per title"
    );

    let response = post(&app, &reviews, &bob, json!({"text": "Out of range", "score": 11})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let title: Value = app
        .client
        .get(app.url(&format!("/v1/titles/{}", title_id)))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(title["rating"], 9.0);

    let page: Value = app
        .client
        .get(app.url(&reviews))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(page["count"], 2);
    assert!(page["next"].is_null());
}

#[sqlx::test(migrator = "common::database::MIGRATOR")]
#[ignore = "requires a PostgreSQL server at DATABASE_URL"]
async fn only_authors_and_staff_edit_content(pool: PgPool) {
    let app = spawn_app(pool.clone()).await;
    let admin = bearer(&app, &pool, "admin", Role::Admin).await;
    let author = bearer(&app, &pool, "author", Role::User).await;
    let stranger = bearer(&app, &pool, "stranger", Role::User).await;
    let moderator = bearer(&app, &pool, "moderator", Role::Moderator).await;
    let title_id = seed_title(&app, &admin).await;

    let response = post(
        &app,
        &format!("/v1/titles/{}/reviews", title_id),
        &author,
        json!({"text": "Mine", "score": 7}),
    )
    .await;
    let review: Value = response.json().await.unwrap();
    let review_path = format!("/v1/titles/{}/reviews/{}", title_id, review["id"]);

    let response = app
        .client
        .patch(app.url(&review_path))
        .bearer_auth(&stranger)
        .json(&json!({"text": "Hijacked"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .client
        .delete(app.url(&review_path))
        .bearer_auth(&stranger)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .client
        .patch(app.url(&review_path))
        .bearer_auth(&author)
        .json(&json!({"score": 9}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated: Value = response.json().await.unwrap();
    assert_eq!(updated["score"], 9);
    assert_eq!(updated["text"], "Mine");

    let comments_path = format!("{}/comments", review_path);
    let response = post(&app, &comments_path, &stranger, json!({"text": "Agreed"})).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    // A review under another title is not found.
    let response = app
        .client
        .get(app.url(&format!("/v1/titles/{}/reviews/{}", title_id + 1000, review["id"])))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .client
        .delete(app.url(&review_path))
        .bearer_auth(&moderator)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let comments: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comments")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(comments, 0);
}

#[sqlx::test(migrator = "common::database::MIGRATOR")]
#[ignore = "requires a PostgreSQL server at DATABASE_URL"]
async fn catalog_writes_are_admin_only(pool: PgPool) {
    let app = spawn_app(pool.clone()).await;
    let admin = bearer(&app, &pool, "admin", Role::Admin).await;
    let moderator = bearer(&app, &pool, "moderator", Role::Moderator).await;

    let response = post(&app, "/v1/genres", &moderator, json!({"name": "Drama", "slug": "drama"})).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = post(&app, "/v1/genres", &admin, json!({"name": "Drama", "slug": "drama"})).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = post(&app, "/v1/genres", &admin, json!({"name": "Drama", "slug": "drama"})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post(
        &app,
        "/v1/titles",
        &admin,
        json!({"name": "Future", "year": 3000, "genre": ["drama"], "category": "missing"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert!(body["fields"]["year"].is_array());
    assert!(body["fields"]["category"].is_array());

    let page: Value = app
        .client
        .get(app.url("/v1/genres?search=DRA"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(page["count"], 1);
    assert_eq!(page["results"][0], json!({"name": "Drama", "slug": "drama"}));

    let response = app
        .client
        .get(app.url("/v1/genres?page=5"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrator = "common::database::MIGRATOR")]
#[ignore = "requires a PostgreSQL server at DATABASE_URL"]
async fn deleting_a_category_keeps_its_titles(pool: PgPool) {
    let app = spawn_app(pool.clone()).await;
    let admin = bearer(&app, &pool, "admin", Role::Admin).await;
    let title_id = seed_title(&app, &admin).await;

    let response = app
        .client
        .delete(app.url("/v1/categories/books"))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let title: Value = app
        .client
        .get(app.url(&format!("/v1/titles/{}", title_id)))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(title["category"].is_null());

    let filtered: Value = app
        .client
        .get(app.url("/v1/titles?genre=SCI&year=1965"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(filtered["count"], 1);
}

#[sqlx::test(migrator = "common::database::MIGRATOR")]
#[ignore = "requires a PostgreSQL server at DATABASE_URL"]
async fn admins_manage_users(pool: PgPool) {
    let app = spawn_app(pool.clone()).await;
    let admin = bearer(&app, &pool, "admin", Role::Admin).await;
    let reader = bearer(&app, &pool, "reader", Role::User).await;

    let response = app
        .client
        .get(app.url("/v1/users"))
        .bearer_auth(&reader)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = post(
        &app,
        "/v1/users",
        &admin,
        json!({"username": "critic", "email": "critic@example.com", "role": "moderator"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = post(
        &app,
        "/v1/users",
        &admin,
        json!({"username": "critic", "email": "other@example.com"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .client
        .patch(app.url("/v1/users/critic"))
        .bearer_auth(&admin)
        .json(&json!({"bio": "Writes about films"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let critic: Value = response.json().await.unwrap();
    assert_eq!(critic["bio"], "Writes about films");
    assert_eq!(critic["role"], "moderator");

    // Users cannot promote themselves.
    let response = app
        .client
        .patch(app.url("/v1/users/me"))
        .bearer_auth(&reader)
        .json(&json!({"role": "admin", "first_name": "Rea"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let me: Value = response.json().await.unwrap();
    assert_eq!(me["role"], "user");
    assert_eq!(me["first_name"], "Rea");

    let response = app
        .client
        .delete(app.url("/v1/users/critic"))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .client
        .get(app.url("/v1/users/critic"))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

async fn patch(app: &TestApp, path: &str, token: &str, body: Value) -> reqwest::Response {
    app.client
        .patch(app.url(path))
        .bearer_auth(token)
        .json(&body)
        .send()
        .await
        .unwrap()
}

async fn get_json(app: &TestApp, path: &str) -> Value {
    let response = app.client.get(app.url(path)).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK, "{}", path);
    response.json().await.unwrap()
}

async fn count(pool: &PgPool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(pool)
        .await
        .unwrap()
}

#[sqlx::test(migrator = "common::database::MIGRATOR")]
#[ignore = "requires a PostgreSQL server at DATABASE_URL"]
async fn title_filters_match_literally(pool: PgPool) {
    let app = spawn_app(pool.clone()).await;
    let admin = bearer(&app, &pool, "admin", Role::Admin).await;
    seed_title(&app, &admin).await;

    let response = post(&app, "/v1/categories", &admin, json!({"name": "Films", "slug": "films"})).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    for (name, category) in [
        ("50% Off", "books"),
        ("500 Days", "films"),
        ("a_b", "films"),
        ("axb", "books"),
    ] {
        let response = post(
            &app,
            "/v1/titles",
            &admin,
            json!({"name": name, "year": 2001, "genre": [], "category": category}),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED, "{}", name);
    }

    let page = get_json(&app, "/v1/titles?name=50%25").await;
    assert_eq!(page["count"], 1);
    assert_eq!(page["results"][0]["name"], "50% Off");

    let page = get_json(&app, "/v1/titles?name=a_b").await;
    assert_eq!(page["count"], 1);
    assert_eq!(page["results"][0]["name"], "a_b");

    let page = get_json(&app, "/v1/titles?category=BOO").await;
    assert_eq!(page["count"], 3);

    let page = get_json(&app, "/v1/titles?category=films&name=500").await;
    assert_eq!(page["count"], 1);
    assert_eq!(page["results"][0]["category"]["slug"], "films");
}

#[sqlx::test(migrator = "common::database::MIGRATOR")]
#[ignore = "requires a PostgreSQL server at DATABASE_URL"]
async fn patching_a_title_replaces_its_genres(pool: PgPool) {
    let app = spawn_app(pool.clone()).await;
    let admin = bearer(&app, &pool, "admin", Role::Admin).await;
    let title_id = seed_title(&app, &admin).await;
    let path = format!("/v1/titles/{}", title_id);

    let response = post(&app, "/v1/genres", &admin, json!({"name": "Drama", "slug": "drama"})).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = patch(&app, &path, &admin, json!({"genre": ["drama"], "year": 1966})).await;
    assert_eq!(response.status(), StatusCode::OK);
    let title: Value = response.json().await.unwrap();
    assert_eq!(title["name"], "Dune");
    assert_eq!(title["year"], 1966);
    assert_eq!(title["genre"], json!([{"name": "Drama", "slug": "drama"}]));
    assert_eq!(title["category"]["slug"], "books");

    let response = patch(&app, &path, &admin, json!({"name": "Dune Messiah"})).await;
    assert_eq!(response.status(), StatusCode::OK);
    let title: Value = response.json().await.unwrap();
    assert_eq!(title["name"], "Dune Messiah");
    assert_eq!(title["genre"][0]["slug"], "drama");

    let response = patch(&app, &path, &admin, json!({"genre": ["missing"]})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert!(body["fields"]["genre"].is_array());

    let reader = bearer(&app, &pool, "reader", Role::User).await;
    let response = patch(&app, &path, &reader, json!({"name": "Mine now"})).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = patch(&app, "/v1/titles/999999", &admin, json!({"name": "Ghost"})).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrator = "common::database::MIGRATOR")]
#[ignore = "requires a PostgreSQL server at DATABASE_URL"]
async fn deleting_a_title_removes_its_reviews_and_comments(pool: PgPool) {
    let app = spawn_app(pool.clone()).await;
    let admin = bearer(&app, &pool, "admin", Role::Admin).await;
    let reader = bearer(&app, &pool, "reader", Role::User).await;
    let title_id = seed_title(&app, &admin).await;

    let response = post(
        &app,
        &format!("/v1/titles/{}/reviews", title_id),
        &reader,
        json!({"text": "Spice", "score": 8}),
    )
    .await;
    let review: Value = response.json().await.unwrap();
    let response = post(
        &app,
        &format!("/v1/titles/{}/reviews/{}/comments", title_id, review["id"]),
        &admin,
        json!({"text": "Indeed"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .client
        .delete(app.url(&format!("/v1/titles/{}", title_id)))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    assert_eq!(count(&pool, "titles").await, 0);
    assert_eq!(count(&pool, "reviews").await, 0);
    assert_eq!(count(&pool, "comments").await, 0);
    assert_eq!(count(&pool, "genre_title").await, 0);
    assert_eq!(count(&pool, "genres").await, 1);
    assert_eq!(count(&pool, "categories").await, 1);
}

#[sqlx::test(migrator = "common::database::MIGRATOR")]
#[ignore = "requires a PostgreSQL server at DATABASE_URL"]
async fn deleting_a_user_removes_their_content(pool: PgPool) {
    let app = spawn_app(pool.clone()).await;
    let admin = bearer(&app, &pool, "admin", Role::Admin).await;
    let leaving = bearer(&app, &pool, "leaving", Role::User).await;
    let staying = bearer(&app, &pool, "staying", Role::User).await;
    let title_id = seed_title(&app, &admin).await;
    let reviews = format!("/v1/titles/{}/reviews", title_id);

    let leaving_review: Value = post(&app, &reviews, &leaving, json!({"text": "Bye", "score": 3}))
        .await
        .json()
        .await
        .unwrap();
    let staying_review: Value = post(&app, &reviews, &staying, json!({"text": "Hi", "score": 9}))
        .await
        .json()
        .await
        .unwrap();

    // A comment by someone else on the leaving user's review, and one by the
    // leaving user on a review that stays.
    let response = post(
        &app,
        &format!("{}/{}/comments", reviews, leaving_review["id"]),
        &staying,
        json!({"text": "Why so low?"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let response = post(
        &app,
        &format!("{}/{}/comments", reviews, staying_review["id"]),
        &leaving,
        json!({"text": "Too generous"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let response = post(
        &app,
        &format!("{}/{}/comments", reviews, staying_review["id"]),
        &staying,
        json!({"text": "Thanks"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .client
        .delete(app.url("/v1/users/leaving"))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    assert_eq!(count(&pool, "reviews").await, 1);
    assert_eq!(count(&pool, "comments").await, 1);

    let remaining = get_json(&app, &format!("{}/{}/comments", reviews, staying_review["id"])).await;
    assert_eq!(remaining["count"], 1);
    assert_eq!(remaining["results"][0]["author"], "staying");

    // The deleted account's token no longer authenticates.
    let response = app
        .client
        .get(app.url("/v1/users/me"))
        .bearer_auth(&leaving)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrator = "common::database::MIGRATOR")]
#[ignore = "requires a PostgreSQL server at DATABASE_URL"]
async fn only_authors_and_staff_edit_comments(pool: PgPool) {
    let app = spawn_app(pool.clone()).await;
    let admin = bearer(&app, &pool, "admin", Role::Admin).await;
    let author = bearer(&app, &pool, "author", Role::User).await;
    let stranger = bearer(&app, &pool, "stranger", Role::User).await;
    let title_id = seed_title(&app, &admin).await;

    let review: Value = post(
        &app,
        &format!("/v1/titles/{}/reviews", title_id),
        &stranger,
        json!({"text": "Fine", "score": 6}),
    )
    .await
    .json()
    .await
    .unwrap();
    let comments = format!("/v1/titles/{}/reviews/{}/comments", title_id, review["id"]);

    let comment: Value = post(&app, &comments, &author, json!({"text": "First"}))
        .await
        .json()
        .await
        .unwrap();
    let comment_path = format!("{}/{}", comments, comment["id"]);

    let response = patch(&app, &comment_path, &stranger, json!({"text": "Edited"})).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .client
        .delete(app.url(&comment_path))
        .bearer_auth(&stranger)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .client
        .delete(app.url(&comment_path))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = patch(&app, &comment_path, &author, json!({"text": "Edited"})).await;
    assert_eq!(response.status(), StatusCode::OK);
    let edited: Value = response.json().await.unwrap();
    assert_eq!(edited["text"], "Edited");
    assert_eq!(edited["author"], "author");

    let response = app
        .client
        .delete(app.url(&comment_path))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.client.get(app.url(&comment_path)).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrator = "common::database::MIGRATOR")]
#[ignore = "requires a PostgreSQL server at DATABASE_URL"]
async fn profile_edits_ignore_the_role(pool: PgPool) {
    let app = spawn_app(pool.clone()).await;
    let reader = bearer(&app, &pool, "reader", Role::User).await;

    let response = patch(
        &app,
        "/v1/users/me",
        &reader,
        json!({"role": "superadmin", "bio": "b"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let me: Value = response.json().await.unwrap();
    assert_eq!(me["bio"], "b");
    assert_eq!(me["role"], "user");
}
