#![deny(missing_docs)]

//! # Person Service
//!
//! A small in-memory person service exercising all three boundaries:
//!
//! * `GET /greet?required=Karl&omittable=...` echoes how the omittable
//!   parameter resolved,
//! * `GET /people?nickname=...` filters tri-state: no parameter lists
//!   everyone, a bare `?nickname` lists people without one, a value matches
//!   it,
//! * `PATCH /people/{id}` applies a JSON patch where `null` clears a field
//!   and an omitted key leaves it alone; `POST /people/{id}` does the same
//!   from an url-encoded form,
//! * `GET /openapi.json` serves the document after startup annotation.
//!
//! Run with `cargo run --example person_service`, then for example:
//!
//! ```text
//! curl 'http://127.0.0.1:8080/people?nickname'
//! curl -X PATCH 'http://127.0.0.1:8080/people/2' \
//!      -H 'content-type: application/json' -d '{"nickname":null}'
//! ```

use std::net::TcpListener;
use std::sync::Mutex;

use actix_web::dev::Server;
use actix_web::web::{self, Data};
use actix_web::{get, patch, post, App, HttpResponse, HttpServer};
use omittable::{FormParameters, Omittable, QueryParameters, SchemaRegistry};
use serde::{Deserialize, Serialize};
use utoipa::openapi::OpenApi;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Person {
    id: u32,
    name: String,
    nickname: Option<String>,
    age: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct PersonPatch {
    #[serde(default, skip_serializing_if = "Omittable::is_absent")]
    nickname: Omittable<Option<String>>,
    #[serde(default, skip_serializing_if = "Omittable::is_absent")]
    age: Omittable<Option<u32>>,
}

fn apply_patch(person: &mut Person, patch: PersonPatch) {
    if let Omittable::Present(nickname) = patch.nickname {
        person.nickname = nickname;
    }
    if let Omittable::Present(age) = patch.age {
        person.age = age;
    }
}

fn seed_people() -> Vec<Person> {
    vec![
        Person {
            id: 1,
            name: String::from("Karl"),
            nickname: Some(String::from("Kalle")),
            age: Some(30),
        },
        Person {
            id: 2,
            name: String::from("Heinz"),
            nickname: None,
            age: Some(44),
        },
        Person {
            id: 3,
            name: String::from("J\u{fc}rgen"),
            nickname: Some(String::from("Charlie")),
            age: None,
        },
    ]
}

type People = Data<Mutex<Vec<Person>>>;

fn people_lock(people: &People) -> actix_web::Result<std::sync::MutexGuard<'_, Vec<Person>>> {
    people
        .lock()
        .map_err(|_| actix_web::error::ErrorInternalServerError("person store poisoned"))
}

#[get("/greet")]
async fn greet(params: QueryParameters) -> actix_web::Result<String> {
    let Omittable::Present(Some(required)) = params.resolve::<String>("required")? else {
        return Err(actix_web::error::ErrorBadRequest(
            "parameter 'required' must carry a value",
        ));
    };
    let omittable = params.resolve::<String>("omittable")?;
    Ok(format!("required={required}, omittable={omittable:?}"))
}

#[get("/people")]
async fn list_people(params: QueryParameters, people: People) -> actix_web::Result<HttpResponse> {
    let filter = params.resolve::<String>("nickname")?;
    let people = people_lock(&people)?;
    let matching: Vec<&Person> = people
        .iter()
        .filter(|person| match &filter {
            Omittable::Absent => true,
            Omittable::Present(None) => person.nickname.is_none(),
            Omittable::Present(Some(nickname)) => person.nickname.as_deref() == Some(nickname),
        })
        .collect();
    Ok(HttpResponse::Ok().json(matching))
}

#[patch("/people/{id}")]
async fn patch_person(
    path: web::Path<u32>,
    patch: web::Json<PersonPatch>,
    people: People,
) -> actix_web::Result<HttpResponse> {
    update_person(*path, patch.into_inner(), &people)
}

#[post("/people/{id}")]
async fn post_person(
    path: web::Path<u32>,
    params: FormParameters,
    people: People,
) -> actix_web::Result<HttpResponse> {
    let patch = PersonPatch {
        nickname: params.resolve::<String>("nickname")?,
        age: params.resolve::<u32>("age")?,
    };
    update_person(*path, patch, &people)
}

fn update_person(id: u32, patch: PersonPatch, people: &People) -> actix_web::Result<HttpResponse> {
    let mut people = people_lock(people)?;
    let Some(person) = people.iter_mut().find(|person| person.id == id) else {
        return Ok(HttpResponse::NotFound().finish());
    };
    apply_patch(person, patch);
    Ok(HttpResponse::Ok().json(&*person))
}

#[get("/openapi.json")]
async fn openapi_json(document: Data<OpenApi>) -> HttpResponse {
    HttpResponse::Ok().json(document.get_ref())
}

fn build_document() -> OpenApi {
    let base = serde_json::json!({
        "openapi": "3.1.0",
        "info": { "title": "Person Service", "version": "0.1.0" },
        "paths": {
            "/greet": {
                "get": {
                    "parameters": [
                        {
                            "name": "required",
                            "in": "query",
                            "required": true,
                            "schema": { "type": "string" }
                        },
                        {
                            "name": "omittable",
                            "in": "query",
                            "required": true,
                            "schema": { "type": "string" }
                        }
                    ],
                    "responses": { "200": { "description": "greeting" } }
                }
            },
            "/people": {
                "get": {
                    "parameters": [
                        {
                            "name": "nickname",
                            "in": "query",
                            "required": true,
                            "schema": { "type": "string" }
                        }
                    ],
                    "responses": { "200": { "description": "matching people" } }
                }
            },
            "/people/{id}": {
                "patch": {
                    "parameters": [
                        {
                            "name": "id",
                            "in": "path",
                            "required": true,
                            "schema": { "type": "integer" }
                        }
                    ],
                    "requestBody": {
                        "content": {
                            "application/json": {
                                "schema": { "$ref": "#/components/schemas/PersonPatch" }
                            }
                        }
                    },
                    "responses": {
                        "200": { "description": "updated person" },
                        "404": { "description": "no such person" }
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "PersonPatch": {
                    "type": "object",
                    "required": ["nickname", "age"],
                    "properties": {
                        "nickname": { "type": "string" },
                        "age": { "type": "integer" }
                    }
                }
            }
        }
    });
    serde_json::from_value(base).expect("demo document is valid OpenAPI")
}

fn build_registry() -> SchemaRegistry {
    let mut registry = SchemaRegistry::new();
    registry.register_parameter_at::<String>("/greet", "omittable");
    registry.register_parameter::<String>("nickname");
    registry.register_field::<Option<String>>("PersonPatch", "nickname");
    registry.register_field::<Option<u32>>("PersonPatch", "age");
    registry
}

fn build_server(
    listener: TcpListener,
    people: People,
    document: Data<OpenApi>,
) -> std::io::Result<Server> {
    Ok(HttpServer::new(move || {
        App::new()
            .app_data(people.clone())
            .app_data(document.clone())
            .service(greet)
            .service(list_people)
            .service(patch_person)
            .service(post_person)
            .service(openapi_json)
    })
    .listen(listener)?
    .run())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let people: People = Data::new(Mutex::new(seed_people()));

    let mut document = build_document();
    build_registry().apply(&mut document);
    let document = Data::new(document);

    let bind_addr = std::env::var("OMITTABLE_DEMO_BIND")
        .unwrap_or_else(|_| String::from("127.0.0.1:8080"));
    let listener = TcpListener::bind(&bind_addr)?;
    println!("person service listening on http://{bind_addr}");

    build_server(listener, people, document)?.await
}
