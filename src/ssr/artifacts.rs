//! Build artifacts consumed by the renderer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Client manifest: which built files the page needs.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientManifest {
    /// URL prefix for every asset.
    pub public_path: String,
    /// Every emitted file.
    pub all: Vec<String>,
    /// Files needed on first load.
    pub initial: Vec<String>,
    /// Files loaded on demand.
    #[serde(rename = "async")]
    pub async_files: Vec<String>,
    /// Module id to file indices.
    pub modules: BTreeMap<String, serde_json::Value>,
}

impl ClientManifest {
    /// Initial stylesheets, with the public path applied.
    pub fn initial_styles(&self) -> impl Iterator<Item = String> + '_ {
        self.initial
            .iter()
            .filter(|f| f.ends_with(".css"))
            .map(|f| self.asset_url(f))
    }

    /// Initial scripts, with the public path applied.
    pub fn initial_scripts(&self) -> impl Iterator<Item = String> + '_ {
        self.initial
            .iter()
            .filter(|f| f.ends_with(".js"))
            .map(|f| self.asset_url(f))
    }

    pub fn asset_url(&self, file: &str) -> String {
        if self.public_path.is_empty() {
            return file.to_string();
        }
        format!(
            "{}/{}",
            self.public_path.trim_end_matches('/'),
            file.trim_start_matches('/')
        )
    }
}

/// Server bundle: the rendering program, keyed by file name.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ServerBundle {
    /// File rendered when no view-specific file exists.
    pub entry: String,
    pub files: BTreeMap<String, String>,
    #[serde(default)]
    pub maps: BTreeMap<String, serde_json::Value>,
}

impl ServerBundle {
    pub fn entry_source(&self) -> Option<&str> {
        self.files.get(&self.entry).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_from_bundler_output() {
        let manifest: ClientManifest = serde_json::from_str(
            r#"{
                "publicPath": "/dist/",
                "all": ["app.js", "app.css", "0.js"],
                "initial": ["app.js", "app.css"],
                "async": ["0.js"],
                "modules": {"a1b2": [0, 1]}
            }"#,
        )
        .unwrap();

        assert_eq!(manifest.async_files, vec!["0.js".to_string()]);
        assert_eq!(manifest.initial_scripts().collect::<Vec<_>>(), vec!["/dist/app.js"]);
        assert_eq!(manifest.initial_styles().collect::<Vec<_>>(), vec!["/dist/app.css"]);
    }

    #[test]
    fn bundle_entry_lookup() {
        let bundle: ServerBundle =
            serde_json::from_str(r#"{"entry":"main.js","files":{"main.js":"<p>hi</p>"}}"#).unwrap();
        assert_eq!(bundle.entry_source(), Some("<p>hi</p>"));

        let broken = ServerBundle {
            entry: "missing.js".into(),
            ..bundle
        };
        assert_eq!(broken.entry_source(), None);
    }
}
