//! Artwork loaders.
//!
//! A loader is handed a URL and a [`CompletionSender`]; it must eventually send exactly one
//! [`crate::Completion::ArtLoaded`] for that URL. Loads are never cancelled: a card that goes
//! away only stops listening.

use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::assets::decode::{ArtImage, decode_image};
use crate::engine::jobs::CompletionSender;
use crate::foundation::error::{CardSkinError, CardSkinResult};

/// Starts artwork loads on behalf of the engine.
pub trait ArtLoader: Send {
    fn start(&mut self, url: &str, done: CompletionSender);
}

/// Map an artwork URL to a root-relative path.
///
/// Leading `/` is stripped, `\` becomes `/`, `.` segments are dropped and `..` is rejected.
pub fn normalize_art_url(url: &str) -> CardSkinResult<String> {
    let s = url.trim().replace('\\', "/");
    let s = s.split(['?', '#']).next().unwrap_or_default();

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(CardSkinError::validation(format!(
                "artwork url '{url}' must not contain '..'"
            )));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(CardSkinError::validation(format!(
            "artwork url '{url}' has no file name"
        )));
    }
    Ok(out.join("/"))
}

/// Loads artwork files from a directory.
#[derive(Clone, Debug)]
pub struct FsArtLoader {
    root: PathBuf,
    background: bool,
}

impl FsArtLoader {
    /// Decode on the rayon pool.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            background: true,
        }
    }

    /// Decode on the calling thread; the result is still delivered through the channel.
    pub fn inline(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            background: false,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resolve(&self, url: &str) -> CardSkinResult<PathBuf> {
        Ok(self.root.join(normalize_art_url(url)?))
    }
}

fn load_file(path: &Path) -> CardSkinResult<ArtImage> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read artwork '{}'", path.display()))?;
    decode_image(&bytes)
}

impl ArtLoader for FsArtLoader {
    #[tracing::instrument(level = "debug", skip(self, done))]
    fn start(&mut self, url: &str, done: CompletionSender) {
        let url = url.to_string();
        let path = match self.resolve(&url) {
            Ok(path) => path,
            Err(err) => {
                done.art_loaded(url, Err(err));
                return;
            }
        };

        if self.background {
            rayon::spawn(move || {
                let result = load_file(&path);
                done.art_loaded(url, result);
            });
        } else {
            let result = load_file(&path);
            done.art_loaded(url, result);
        }
    }
}

/// Fails every load; cards keep their placeholder art.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullArtLoader;

impl ArtLoader for NullArtLoader {
    fn start(&mut self, url: &str, done: CompletionSender) {
        done.art_loaded(
            url,
            Err(CardSkinError::asset(format!("no artwork loader for '{url}'"))),
        );
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/loader.rs"]
mod tests;
