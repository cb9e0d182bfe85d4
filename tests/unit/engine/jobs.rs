use super::*;
use crate::card::arena::CardArena;

fn ids() -> (CardId, CardId) {
    let mut arena = CardArena::new();
    (arena.insert(()), arena.insert(()))
}

fn job(card: CardId, tier: Tier, token: u64) -> TextureJob {
    TextureJob {
        card,
        tier,
        token,
        source: SkinSource::Compose,
    }
}

#[test]
fn newer_job_for_same_tier_replaces_queued_one() {
    let (a, b) = ids();
    let mut q = JobQueue::default();
    q.push(job(a, Tier::Large, 1));
    q.push(job(b, Tier::Large, 1));
    q.push(job(a, Tier::Large, 2));
    assert_eq!(q.len(), 2);

    let first = q.pop().unwrap();
    assert_eq!(first.card, b);
    let second = q.pop().unwrap();
    assert_eq!((second.card, second.token), (a, 2));
    assert!(q.pop().is_none());
}

#[test]
fn remove_card_drops_all_its_jobs() {
    let (a, b) = ids();
    let mut q = JobQueue::default();
    q.push(job(a, Tier::Small, 1));
    q.push(job(a, Tier::Large, 1));
    q.push(job(b, Tier::Small, 1));
    q.remove_card(a);
    assert!(!q.is_pending(a, Tier::Small));
    assert!(q.is_pending(b, Tier::Small));
    assert_eq!(q.len(), 1);
}

#[test]
fn sender_reports_a_dropped_receiver() {
    let (tx, rx) = completion_channel();
    assert!(tx.art_loaded("/a.png", Err(crate::CardSkinError::asset("nope"))));
    assert!(matches!(rx.try_recv(), Ok(Completion::ArtLoaded { .. })));
    drop(rx);
    assert!(!tx.art_loaded("/a.png", Err(crate::CardSkinError::asset("nope"))));
}
