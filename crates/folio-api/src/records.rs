//! Generic record handlers, instantiated once per collection.
//!
//! | Method   | Path              | Notes |
//! |----------|-------------------|-------|
//! | `GET`    | `/{list}`         | Optional `?include_hidden=true` (authenticated) |
//! | `POST`   | `/{list}`         | Body: payload; 201 + record |
//! | `PUT`    | `/{list}/{id}`    | Body: payload; 404 if absent |
//! | `DELETE` | `/{list}/{id}`    | 204; 404 if absent |
//! | `GET`    | `/{singleton}`    | Record or `null` |
//! | `PUT`    | `/{singleton}`    | Upsert |

use axum::{
  Json,
  extract::{Path, Query, State, rejection::JsonRejection},
  http::{HeaderMap, StatusCode},
  response::IntoResponse,
};
use folio_core::{Entity, Listed, Record, RecordId, Singleton, store::ContentStore};
use serde::Deserialize;

use crate::{AppState, auth::Authenticated, error::ApiError};

type Payload<E> = Result<Json<E>, JsonRejection>;

// ─── Reads ────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
  #[serde(default)]
  pub include_hidden: bool,
}

/// `GET /{list}[?include_hidden=true]`
pub async fn list<S, E>(
  State(state): State<AppState<S>>,
  Query(params): Query<ListParams>,
  headers: HeaderMap,
) -> Result<Json<Vec<Record<E>>>, ApiError>
where
  S: ContentStore,
  E: Listed,
{
  if params.include_hidden {
    state.authorize(&headers)?;
  }
  let records = state
    .store
    .list::<E>(params.include_hidden)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(records))
}

/// `GET /{singleton}`
pub async fn get_singleton<S, E>(
  State(state): State<AppState<S>>,
) -> Result<Json<Option<Record<E>>>, ApiError>
where
  S: ContentStore,
  E: Singleton,
{
  let record = state
    .store
    .get_singleton::<E>()
    .await
    .map_err(ApiError::store)?;
  Ok(Json(record))
}

// ─── Writes ───────────────────────────────────────────────────────────────────

/// `POST /{list}`
pub async fn create<S, E>(
  State(state): State<AppState<S>>,
  _auth: Authenticated,
  payload: Payload<E>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ContentStore + 'static,
  E: Listed,
{
  let Json(payload) = payload?;
  let record = state.store.insert(payload).await.map_err(ApiError::store)?;
  tracing::info!(collection = %E::COLLECTION, id = %record.id, "created record");
  Ok((StatusCode::CREATED, Json(record)))
}

/// `PUT /{collection}/{id}`
pub async fn update<S, E>(
  State(state): State<AppState<S>>,
  _auth: Authenticated,
  Path(id): Path<String>,
  payload: Payload<E>,
) -> Result<Json<Record<E>>, ApiError>
where
  S: ContentStore + 'static,
  E: Entity,
{
  let Json(payload) = payload?;
  let record = state
    .store
    .update(RecordId::from(id), payload)
    .await
    .map_err(ApiError::store)?;
  tracing::info!(collection = %E::COLLECTION, id = %record.id, "updated record");
  Ok(Json(record))
}

/// `PUT /{singleton}`
pub async fn upsert<S, E>(
  State(state): State<AppState<S>>,
  _auth: Authenticated,
  payload: Payload<E>,
) -> Result<Json<Record<E>>, ApiError>
where
  S: ContentStore + 'static,
  E: Singleton,
{
  let Json(payload) = payload?;
  let record = state.store.upsert(payload).await.map_err(ApiError::store)?;
  tracing::info!(collection = %E::COLLECTION, id = %record.id, "saved singleton");
  Ok(Json(record))
}

/// `DELETE /{list}/{id}`
pub async fn remove<S, E>(
  State(state): State<AppState<S>>,
  _auth: Authenticated,
  Path(id): Path<String>,
) -> Result<StatusCode, ApiError>
where
  S: ContentStore + 'static,
  E: Listed,
{
  let id = RecordId::from(id);
  state
    .store
    .delete::<E>(id.clone())
    .await
    .map_err(ApiError::store)?;
  tracing::info!(collection = %E::COLLECTION, %id, "deleted record");
  Ok(StatusCode::NO_CONTENT)
}
