use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::mpsc;

use crate::assets::decode::ArtImage;
use crate::card::arena::CardId;
use crate::foundation::core::Tier;
use crate::foundation::error::CardSkinResult;
use crate::render::texture::Texture;
use crate::snapshot::markup::SnapshotMarkup;
use crate::snapshot::raster::SnapshotFailure;

/// Where a texture job gets its pixels from.
#[derive(Clone, Debug)]
pub(crate) enum SkinSource {
    Compose,
    Snapshot(Arc<SnapshotMarkup>),
}

/// A deferred texture build, tagged with the tier token current when it was scheduled.
#[derive(Clone, Debug)]
pub(crate) struct TextureJob {
    pub(crate) card: CardId,
    pub(crate) tier: Tier,
    pub(crate) token: u64,
    pub(crate) source: SkinSource,
}

#[derive(Debug)]
pub(crate) enum TextureOutcome {
    Ready(Texture),
    SnapshotFailed(SnapshotFailure),
    ComposeFailed(String),
}

/// Result of asynchronous work, applied on the engine thread during the next tick.
#[derive(Debug)]
pub enum Completion {
    /// An artwork load finished.
    ArtLoaded {
        url: String,
        result: CardSkinResult<ArtImage>,
    },
    #[doc(hidden)]
    Texture(TextureCompletion),
}

#[doc(hidden)]
#[derive(Debug)]
pub struct TextureCompletion {
    pub(crate) card: CardId,
    pub(crate) tier: Tier,
    pub(crate) token: u64,
    pub(crate) outcome: TextureOutcome,
}

/// Cloneable handle for delivering [`Completion`]s to an engine from any thread.
#[derive(Clone, Debug)]
pub struct CompletionSender {
    tx: mpsc::Sender<Completion>,
}

impl CompletionSender {
    /// Deliver an artwork load result. Returns `false` when the engine is gone.
    pub fn art_loaded(&self, url: impl Into<String>, result: CardSkinResult<ArtImage>) -> bool {
        self.send(Completion::ArtLoaded {
            url: url.into(),
            result,
        })
    }

    pub fn send(&self, completion: Completion) -> bool {
        self.tx.send(completion).is_ok()
    }
}

pub(crate) fn completion_channel() -> (CompletionSender, mpsc::Receiver<Completion>) {
    let (tx, rx) = mpsc::channel();
    (CompletionSender { tx }, rx)
}

/// FIFO of pending texture jobs.
#[derive(Debug, Default)]
pub(crate) struct JobQueue {
    jobs: VecDeque<TextureJob>,
}

impl JobQueue {
    pub(crate) fn push(&mut self, job: TextureJob) {
        // A newer job for the same tier supersedes the queued one.
        self.jobs
            .retain(|queued| !(queued.card == job.card && queued.tier == job.tier));
        self.jobs.push_back(job);
    }

    pub(crate) fn pop(&mut self) -> Option<TextureJob> {
        self.jobs.pop_front()
    }

    pub(crate) fn remove_card(&mut self, card: CardId) {
        self.jobs.retain(|job| job.card != card);
    }

    pub(crate) fn is_pending(&self, card: CardId, tier: Tier) -> bool {
        self.jobs.iter().any(|j| j.card == card && j.tier == tier)
    }

    pub(crate) fn len(&self) -> usize {
        self.jobs.len()
    }

    pub(crate) fn clear(&mut self) {
        self.jobs.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/jobs.rs"]
mod tests;
