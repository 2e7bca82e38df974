use crate::tally::Tally;
use crossbeam::channel::{unbounded, Receiver, Sender};
use std::hash::Hash;

/// Join-side collection point for finished worker tallies.
///
/// Workers submit through cloned [`TallyHandle`]s; the dispatcher drains
/// after its join barrier. Because submission happens as each worker
/// finishes, tallies from workers that completed are preserved even when a
/// sibling is lost before the join.
pub struct TallyCollector<K> {
    tx: Sender<Tally<K>>,
    rx: Receiver<Tally<K>>,
}

impl<K> Default for TallyCollector<K>
where
    K: Hash + Eq,
{
    fn default() -> Self {
        TallyCollector::new()
    }
}

impl<K> TallyCollector<K>
where
    K: Hash + Eq,
{
    pub fn new() -> TallyCollector<K> {
        let (tx, rx) = unbounded();
        TallyCollector { tx, rx }
    }

    pub fn handle(&self) -> TallyHandle<K> {
        TallyHandle {
            sender: self.tx.clone(),
        }
    }

    /// Take every tally submitted so far.
    pub fn drain(&self) -> Vec<Tally<K>> {
        let mut tallies = Vec::new();
        while let Ok(t) = self.rx.try_recv() {
            tallies.push(t);
        }
        tallies
    }
}

pub struct TallyHandle<K> {
    sender: Sender<Tally<K>>,
}

impl<K> Clone for TallyHandle<K> {
    fn clone(&self) -> TallyHandle<K> {
        TallyHandle {
            sender: self.sender.clone(),
        }
    }
}

impl<K> TallyHandle<K>
where
    K: Hash + Eq,
{
    pub fn submit(&self, tally: Tally<K>) {
        // The receiver half lives in the dispatcher until after the join,
        // so a send can only fail once the run is already being torn down.
        let _ = self.sender.try_send(tally);
    }
}
