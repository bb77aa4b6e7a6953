//! CMake file-API client plumbing: query setup and reply discovery.
//!
//! The file API is a drop-box protocol: a client writes an empty query file
//! under `<build>/.cmake/api/v1/query/client-<name>/`, the next CMake
//! configure answers with JSON documents under `.../reply`, and the newest
//! `index-*.json` there is the entry point to everything else.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::debug;

use cmgraph_error::{Error, Result};

use crate::schema::ObjectReference;

/// Client name under which cmgraph registers its query.
pub const API_CLIENT_NAME: &str = "cmgraph";

/// Relative location of the file API inside a build tree.
pub const API_PATH: &str = ".cmake/api/v1";

/// The one object kind this tool queries.
pub const CODEMODEL_KIND: &str = "codemodel-v2";

/// Register the codemodel query so the next configure writes a reply.
///
/// Returns the path of the created query file. Idempotent.
pub fn setup_query(build_dir: &Path) -> Result<PathBuf> {
    let query_dir = build_dir
        .join(API_PATH)
        .join("query")
        .join(format!("client-{API_CLIENT_NAME}"));
    fs::create_dir_all(&query_dir)
        .map_err(|e| Error::from(e).with_operation("api::setup_query"))?;

    let query_file = query_dir.join(CODEMODEL_KIND);
    fs::write(&query_file, b"").map_err(|e| Error::from(e).with_operation("api::setup_query"))?;

    debug!(path = %query_file.display(), "query registered");
    Ok(query_file)
}

/// The reply directory of a build tree, which must already exist.
pub fn reply_dir(build_dir: &Path) -> Result<PathBuf> {
    let dir = build_dir.join(API_PATH).join("reply");
    if !dir.is_dir() {
        return Err(Error::missing_input_document(dir.display().to_string())
            .with_operation("api::reply_dir")
            .with_context("hint", "run `cmgraph setup` and re-run cmake"));
    }
    Ok(dir)
}

/// Find the newest `index-*.json` in the reply directory.
///
/// CMake keeps older indexes around for a while; the newest one describes
/// the current reply. Equal timestamps fall back to name order so the pick
/// stays deterministic.
pub fn find_reply_index(reply: &Path) -> Result<PathBuf> {
    let mut newest: Option<(SystemTime, PathBuf)> = None;

    for entry in fs::read_dir(reply).map_err(|e| Error::from(e).with_operation("api::find_reply_index"))? {
        let entry = entry.map_err(|e| Error::from(e).with_operation("api::find_reply_index"))?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if !name.starts_with("index-") || !name.ends_with(".json") {
            continue;
        }
        let metadata = entry
            .metadata()
            .map_err(|e| Error::from(e).with_operation("api::find_reply_index"))?;
        if !metadata.is_file() {
            continue;
        }
        let modified = metadata
            .modified()
            .map_err(|e| Error::from(e).with_operation("api::find_reply_index"))?;
        let path = entry.path();

        let replace = match &newest {
            None => true,
            Some((when, which)) => modified > *when || (modified == *when && path > *which),
        };
        if replace {
            newest = Some((modified, path));
        }
    }

    newest.map(|(_, path)| path).ok_or_else(|| {
        Error::missing_input_document(reply.join("index-*.json").display().to_string())
            .with_operation("api::find_reply_index")
    })
}

/// Resolve the codemodel document referenced by a reply index.
pub fn codemodel_path(reply: &Path, index_file: &Path) -> Result<PathBuf> {
    let index: crate::schema::ReplyIndex = read_json(index_file)?;

    let client = format!("client-{API_CLIENT_NAME}");
    let reference = index
        .reply
        .get(&client)
        .and_then(|value| value.get(CODEMODEL_KIND))
        .ok_or_else(|| {
            Error::missing_input_document(index_file.display().to_string())
                .with_operation("api::codemodel_path")
                .with_context("client", client.clone())
                .with_context("kind", CODEMODEL_KIND)
        })?;

    let reference: ObjectReference = serde_json::from_value(reference.clone()).map_err(|e| {
        Error::deserialize_failed(index_file.display().to_string())
            .with_operation("api::codemodel_path")
            .set_source(e)
    })?;

    let path = reply.join(&reference.json_file);
    if !path.is_file() {
        return Err(Error::missing_input_document(path.display().to_string())
            .with_operation("api::codemodel_path"));
    }
    Ok(path)
}

/// Read and deserialize one file-API JSON document.
pub fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.is_file() {
        return Err(Error::missing_input_document(path.display().to_string())
            .with_operation("api::read_json"));
    }
    let bytes = fs::read(path).map_err(|e| Error::from(e).with_operation("api::read_json"))?;
    serde_json::from_slice(&bytes).map_err(|e| {
        Error::deserialize_failed(path.display().to_string())
            .with_operation("api::read_json")
            .set_source(e)
    })
}
