use std::path::PathBuf;

use anyhow::Context;

use crate::foundation::error::{PurikuraError, PurikuraResult};

/// A frame or badge template persisted outside the compositor.
///
/// `image_data` is a PNG data URI; records are immutable once created —
/// save/delete only, never in-place mutation.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedAsset {
    pub id: String,
    pub name: String,
    pub image_data: String,
}

/// The two persisted asset collections.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum AssetKind {
    Frame,
    Badge,
}

impl AssetKind {
    /// Remote collection path segment.
    pub fn collection(self) -> &'static str {
        match self {
            AssetKind::Frame => "frames",
            AssetKind::Badge => "badges",
        }
    }

    /// Local collection key (also the JSON file stem).
    pub fn storage_key(self) -> &'static str {
        match self {
            AssetKind::Frame => "customFrames",
            AssetKind::Badge => "customBadges",
        }
    }

    fn slug(self) -> &'static str {
        match self {
            AssetKind::Frame => "frame",
            AssetKind::Badge => "badge",
        }
    }
}

/// Uniform persistence capability the composer core depends on.
///
/// The core is agnostic to which backend is active; both the local key-value
/// store and the remote HTTP service implement this, and [`FallbackStore`]
/// composes them.
pub trait AssetStore {
    fn list(&self, kind: AssetKind) -> PurikuraResult<Vec<SavedAsset>>;
    fn save(&mut self, kind: AssetKind, name: &str, image_data: &str) -> PurikuraResult<SavedAsset>;
    fn delete(&mut self, kind: AssetKind, id: &str) -> PurikuraResult<()>;
}

fn validate_new_asset(name: &str, image_data: &str) -> PurikuraResult<()> {
    if name.trim().is_empty() {
        return Err(PurikuraError::validation("asset name must be non-empty"));
    }
    if !image_data.starts_with("data:image/") {
        return Err(PurikuraError::validation(
            "asset image data must be an image data URI",
        ));
    }
    Ok(())
}

/// Process-local store: one JSON file per collection under a root directory.
#[derive(Clone, Debug)]
pub struct LocalAssetStore {
    root: PathBuf,
}

impl LocalAssetStore {
    pub fn new(root: impl Into<PathBuf>) -> PurikuraResult<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)
            .with_context(|| format!("create asset store root '{}'", root.display()))?;
        Ok(Self { root })
    }

    fn collection_path(&self, kind: AssetKind) -> PathBuf {
        self.root.join(format!("{}.json", kind.storage_key()))
    }

    fn read_collection(&self, kind: AssetKind) -> PurikuraResult<Vec<SavedAsset>> {
        let path = self.collection_path(kind);
        let bytes = match std::fs::read(&path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(PurikuraError::persistence(format!(
                    "read '{}': {e}",
                    path.display()
                )));
            }
        };
        serde_json::from_slice(&bytes)
            .map_err(|e| PurikuraError::persistence(format!("parse '{}': {e}", path.display())))
    }

    fn write_collection(&self, kind: AssetKind, assets: &[SavedAsset]) -> PurikuraResult<()> {
        let path = self.collection_path(kind);
        let bytes = serde_json::to_vec_pretty(assets)
            .map_err(|e| PurikuraError::persistence(format!("serialize assets: {e}")))?;
        std::fs::write(&path, bytes)
            .with_context(|| format!("write '{}'", path.display()))
            .map_err(PurikuraError::from)
    }

    fn next_id(kind: AssetKind, assets: &[SavedAsset]) -> String {
        let next = assets
            .iter()
            .filter_map(|a| a.id.rsplit('-').next()?.parse::<u64>().ok())
            .max()
            .map_or(1, |n| n + 1);
        format!("{}-{next}", kind.slug())
    }
}

impl AssetStore for LocalAssetStore {
    fn list(&self, kind: AssetKind) -> PurikuraResult<Vec<SavedAsset>> {
        self.read_collection(kind)
    }

    fn save(&mut self, kind: AssetKind, name: &str, image_data: &str) -> PurikuraResult<SavedAsset> {
        validate_new_asset(name, image_data)?;
        let mut assets = self.read_collection(kind)?;
        let asset = SavedAsset {
            id: Self::next_id(kind, &assets),
            name: name.trim().to_string(),
            image_data: image_data.to_string(),
        };
        assets.push(asset.clone());
        self.write_collection(kind, &assets)?;
        Ok(asset)
    }

    fn delete(&mut self, kind: AssetKind, id: &str) -> PurikuraResult<()> {
        let mut assets = self.read_collection(kind)?;
        let before = assets.len();
        assets.retain(|a| a.id != id);
        if assets.len() == before {
            return Err(PurikuraError::persistence(format!("unknown asset id '{id}'")));
        }
        self.write_collection(kind, &assets)
    }
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct SaveBody<'a> {
    name: &'a str,
    image_data: &'a str,
}

#[derive(serde::Deserialize)]
struct ListResponse {
    #[serde(default)]
    assets: Vec<SavedAsset>,
}

/// HTTP asset service client: `GET/POST /frames`, `GET/POST /badges`,
/// `DELETE /{collection}/{id}`, authenticated with a static `x-api-key`
/// header.
#[derive(Clone)]
pub struct RemoteAssetStore {
    base_url: String,
    api_key: String,
    agent: ureq::Agent,
}

impl std::fmt::Debug for RemoteAssetStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The api key stays out of logs.
        f.debug_struct("RemoteAssetStore")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl RemoteAssetStore {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            api_key: api_key.into(),
            agent: ureq::Agent::new_with_defaults(),
        }
    }

    fn collection_url(&self, kind: AssetKind) -> String {
        format!("{}/{}", self.base_url, kind.collection())
    }
}

impl AssetStore for RemoteAssetStore {
    fn list(&self, kind: AssetKind) -> PurikuraResult<Vec<SavedAsset>> {
        let url = self.collection_url(kind);
        let mut resp = self
            .agent
            .get(&url)
            .header("x-api-key", &self.api_key)
            .call()
            .map_err(|e| PurikuraError::persistence(format!("GET {url}: {e}")))?;
        let parsed: ListResponse = resp
            .body_mut()
            .read_json()
            .map_err(|e| PurikuraError::persistence(format!("parse {url} response: {e}")))?;
        Ok(parsed.assets)
    }

    fn save(&mut self, kind: AssetKind, name: &str, image_data: &str) -> PurikuraResult<SavedAsset> {
        validate_new_asset(name, image_data)?;
        let url = self.collection_url(kind);
        let mut resp = self
            .agent
            .post(&url)
            .header("x-api-key", &self.api_key)
            .send_json(SaveBody {
                name: name.trim(),
                image_data,
            })
            .map_err(|e| PurikuraError::persistence(format!("POST {url}: {e}")))?;
        resp.body_mut()
            .read_json()
            .map_err(|e| PurikuraError::persistence(format!("parse {url} response: {e}")))
    }

    fn delete(&mut self, kind: AssetKind, id: &str) -> PurikuraResult<()> {
        let url = format!("{}/{id}", self.collection_url(kind));
        self.agent
            .delete(&url)
            .header("x-api-key", &self.api_key)
            .call()
            .map_err(|e| PurikuraError::persistence(format!("DELETE {url}: {e}")))?;
        Ok(())
    }
}

/// Remote-first store that silently falls back to the local library when the
/// asset service is unreachable.
///
/// Persistence failures are never surfaced as hard errors to the composer;
/// the fallback only logs a warning and keeps working locally.
#[derive(Debug)]
pub struct FallbackStore {
    remote: RemoteAssetStore,
    local: LocalAssetStore,
}

impl FallbackStore {
    pub fn new(remote: RemoteAssetStore, local: LocalAssetStore) -> Self {
        Self { remote, local }
    }
}

impl AssetStore for FallbackStore {
    fn list(&self, kind: AssetKind) -> PurikuraResult<Vec<SavedAsset>> {
        match self.remote.list(kind) {
            Ok(assets) => Ok(assets),
            Err(e) => {
                tracing::warn!(error = %e, "asset service unreachable, serving local library");
                self.local.list(kind)
            }
        }
    }

    fn save(&mut self, kind: AssetKind, name: &str, image_data: &str) -> PurikuraResult<SavedAsset> {
        match self.remote.save(kind, name, image_data) {
            Ok(asset) => Ok(asset),
            Err(PurikuraError::Validation(e)) => Err(PurikuraError::Validation(e)),
            Err(e) => {
                tracing::warn!(error = %e, "asset service unreachable, saving locally");
                self.local.save(kind, name, image_data)
            }
        }
    }

    fn delete(&mut self, kind: AssetKind, id: &str) -> PurikuraResult<()> {
        match self.remote.delete(kind, id) {
            Ok(()) => Ok(()),
            Err(e) => {
                tracing::warn!(error = %e, "asset service unreachable, deleting locally");
                self.local.delete(kind, id)
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
