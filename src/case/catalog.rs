//! Built-in suites for the JSONPlaceholder blog mock and PokeAPI.
//!
//! Several expectations pin quirks of the public JSONPlaceholder mock rather than
//! general REST behaviour: writes are echoed but never stored, a `PUT` on an
//! unknown post fails with the server's own `TypeError` text, and `DELETE`
//! answers `200 {}` for any id. They are kept as regression fixtures.

use crate::assertion::model::Expectation;
use crate::case::model::{Suite, TestCase};
use crate::config::Config;
use crate::http::HttpMethod;
use serde_json::json;

pub const BLOG_SUITE: &str = "jsonplaceholder";
pub const POKEMON_SUITE: &str = "pokeapi";

pub const DEFAULT_BLOG_URL: &str = "https://jsonplaceholder.typicode.com";
pub const DEFAULT_POKEMON_URL: &str = "https://pokeapi.co/api/v2";

/// Number of posts served by the blog mock.
pub const POST_FIXTURE_SIZE: u64 = 100;

/// `body` of post 1 in the blog mock's fixture data; a partial update of the
/// title must leave it untouched.
pub const POST_ONE_BODY: &str = "quia et suscipit\n\
    suscipit recusandae consequuntur expedita et cum\n\
    reprehenderit molestiae ut ut quas totam\n\
    nostrum rerum est autem sunt rem eveniet architecto";

pub fn builtin_suites(config: &Config) -> Vec<Suite> {
    vec![
        Suite::new(BLOG_SUITE, config.blog_url.clone(), blog_cases()),
        Suite::new(POKEMON_SUITE, config.pokemon_url.clone(), pokemon_cases()),
    ]
}

pub fn blog_cases() -> Vec<TestCase> {
    vec![
        TestCase::builder()
            .name("list posts")
            .method(HttpMethod::GET)
            .path("/posts")
            .expected_status(200)
            .expectations(vec![
                Expectation::json_len("$", POST_FIXTURE_SIZE),
                Expectation::json_eq("$[0].id", 1),
            ])
            .build(),
        TestCase::builder()
            .name("create post")
            .method(HttpMethod::POST)
            .path("/posts")
            .body(json!({"title": "foo", "body": "bar", "userId": 1}).to_string())
            .expected_status(201)
            .expectations(vec![
                Expectation::json_eq("title", "foo"),
                Expectation::json_eq("body", "bar"),
                Expectation::json_eq("userId", 1),
                Expectation::json_exists("id"),
            ])
            .build(),
        TestCase::builder()
            .name("update post")
            .method(HttpMethod::PUT)
            .path("/posts/1")
            .body(
                json!({"id": 1, "title": "foo updated", "body": "bar updated", "userId": 1})
                    .to_string(),
            )
            .expected_status(200)
            .expectations(vec![
                Expectation::json_eq("id", 1),
                Expectation::json_eq("title", "foo updated"),
                Expectation::json_eq("body", "bar updated"),
                Expectation::json_eq("userId", 1),
            ])
            .build(),
        TestCase::builder()
            .name("update missing post")
            .method(HttpMethod::PUT)
            .path(format!("/posts/{}", POST_FIXTURE_SIZE + 1))
            .body(
                json!({"id": POST_FIXTURE_SIZE + 1, "title": "foo", "body": "bar", "userId": 1})
                    .to_string(),
            )
            .expected_status(500)
            .expectations(vec![Expectation::body_contains(
                "Cannot read properties of undefined",
            )])
            .build(),
        TestCase::builder()
            .name("patch post title")
            .method(HttpMethod::PATCH)
            .path("/posts/1")
            .body(json!({"title": "foo partially updated"}).to_string())
            .expected_status(200)
            .expectations(vec![
                Expectation::json_eq("title", "foo partially updated"),
                Expectation::json_eq("id", 1),
                Expectation::json_eq("userId", 1),
                Expectation::json_eq("body", POST_ONE_BODY),
            ])
            .build(),
        TestCase::builder()
            .name("delete post")
            .method(HttpMethod::DELETE)
            .path("/posts/1")
            .expected_status(200)
            .expectations(vec![Expectation::json_eq("$", json!({}))])
            .build(),
        TestCase::builder()
            .name("delete missing post")
            .method(HttpMethod::DELETE)
            .path("/posts/9999")
            .expected_status(200)
            .expectations(vec![Expectation::json_eq("$", json!({}))])
            .build(),
    ]
}

pub fn pokemon_cases() -> Vec<TestCase> {
    vec![
        TestCase::builder()
            .name("get pikachu")
            .method(HttpMethod::GET)
            .path("/pokemon/pikachu")
            .expected_status(200)
            .expectations(vec![
                Expectation::json_eq("name", "pikachu"),
                Expectation::json_eq("id", 25),
                Expectation::header_contains("content-type", "application/json"),
            ])
            .build(),
        TestCase::builder()
            .name("get unknown pokemon")
            .method(HttpMethod::GET)
            .path("/pokemon/missingno")
            .expected_status(404)
            .expectations(vec![Expectation::body_matches("^Not Found")])
            .build(),
    ]
}
