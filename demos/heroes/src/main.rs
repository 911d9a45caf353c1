//! Example slimrest application: a paginated heroes API.
//!
//! Serves three endpoints under `/heroes`:
//!
//! - `GET /heroes/` - paginated collection, two heroes per page
//! - `GET /heroes/{id}` - single hero, 404 when the id misses
//! - `POST /heroes/` - create a hero from a JSON body

mod db;

use std::sync::Arc;

use http::StatusCode;

use slimrest::prelude::*;

use crate::db::{Hero, HeroDatabase, HeroNotFound, NewHero};

fn hero_namespace(db: Arc<HeroDatabase>) -> Namespace {
    let collection_db = db.clone();
    let details_db = db.clone();
    let post_db = db;

    Namespace::builder("/heroes", "HeroNamespace")
        .endpoint(
            Endpoint::builder("/", "hero_collection")
                .stage(SerializeStage::single(JsonSchema::<Hero>::new()).paginated())
                .stage(PaginateStage::per_page(2))
                .handler(handler_fn(move |_ctx| {
                    Ok(payload_seq(collection_db.heroes()))
                })),
        )
        .endpoint(
            Endpoint::builder("/{id}", "hero_details")
                .stage(
                    CatchStage::new::<HeroNotFound>("No hero with this ID found.")
                        .with_status(StatusCode::NOT_FOUND),
                )
                .stage(SerializeStage::single(JsonSchema::<Hero>::new()))
                .handler(handler_fn(move |ctx| {
                    // A non-numeric id cannot name any hero.
                    let id = ctx
                        .param("id")
                        .and_then(|raw| raw.parse::<u64>().ok())
                        .ok_or(HeroNotFound)?;
                    Ok(payload(details_db.hero(id)?))
                })),
        )
        .endpoint(
            Endpoint::builder("/", "hero_post")
                .methods([http::Method::POST])
                .stage(
                    SerializeStage::single(JsonSchema::<Hero>::new())
                        .with_status(StatusCode::CREATED),
                )
                .stage(DeserializeStage::new(JsonSchema::<NewHero>::new()))
                .handler(handler_fn(move |ctx| {
                    let new = ctx
                        .take_arg()
                        .and_then(|arg| arg.downcast::<NewHero>().ok())
                        .ok_or_else(|| anyhow::anyhow!("deserialized hero payload missing"))?;
                    Ok(payload(post_db.add(*new)))
                })),
        )
        .build()
}

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let db = Arc::new(HeroDatabase::new());

    let server = Server::new(
        ServerConfig::builder()
            .http_addr("127.0.0.1:5000")
            .base_url("http://localhost:5000")
            .build(),
    );

    let mut registry = Registry::new();
    registry.declare(hero_namespace(db));
    registry.bind(server.clone());

    tracing::info!(routes = server.route_count(), "heroes API ready");

    server.serve().await
}
