//! The URL frontier: an ordered pending queue plus a seen-set. Both are
//! guarded by one lock.

use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;

use url::Url;

#[derive(Debug, Clone)]
pub struct FrontierItem {
    pub url: Url,
    pub remaining_depth: u32,
}

struct State {
    pending: VecDeque<FrontierItem>,
    seen: HashSet<String>,
}

pub struct Frontier {
    state: Mutex<State>,
    depth_first: bool,
}

impl Frontier {
    pub fn new(depth_first: bool) -> Self {
        Frontier {
            state: Mutex::new(State {
                pending: VecDeque::new(),
                seen: HashSet::new(),
            }),
            depth_first,
        }
    }

    /// Inserts `url` at `remaining_depth` unless it is already in `seen`.
    /// Returns `false` if the URL was already seen (not re-inserted).
    pub fn submit(&self, url: Url, remaining_depth: u32) -> bool {
        let mut state = self.state.lock().unwrap();
        let key = url.as_str().to_string();
        if state.seen.contains(&key) {
            return false;
        }
        let item = FrontierItem {
            url,
            remaining_depth,
        };
        if self.depth_first {
            state.pending.push_front(item);
        } else {
            state.pending.push_back(item);
        }
        true
    }

    /// Pulls up to `limit` items not yet in `seen`, marking each `seen` as it
    /// is pulled.
    pub fn dispatch(&self, limit: usize) -> Vec<FrontierItem> {
        let mut state = self.state.lock().unwrap();
        let mut out = Vec::with_capacity(limit);
        while out.len() < limit {
            match state.pending.pop_front() {
                Some(item) => {
                    state.seen.insert(item.url.as_str().to_string());
                    out.push(item);
                }
                None => break,
            }
        }
        out
    }

    /// Atomically swaps out all of `pending`, leaving it empty (used by soft-stop).
    pub fn drain(&self) -> Vec<FrontierItem> {
        let mut state = self.state.lock().unwrap();
        state.pending.drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().unwrap().pending.is_empty()
    }

    /// Cloudflare requeue: re-insert `url` at `remaining_depth` and remove it
    /// from `seen` so a later admission check does not treat it as a duplicate.
    pub fn requeue(&self, url: Url, remaining_depth: u32) {
        let mut state = self.state.lock().unwrap();
        state.seen.remove(url.as_str());
        let item = FrontierItem {
            url,
            remaining_depth,
        };
        if self.depth_first {
            state.pending.push_front(item);
        } else {
            state.pending.push_back(item);
        }
    }

    pub fn has_seen(&self, url: &Url) -> bool {
        self.state.lock().unwrap().seen.contains(url.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn u(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn fifo_preserves_insertion_order() {
        let f = Frontier::new(false);
        f.submit(u("http://a.test/1"), 1);
        f.submit(u("http://a.test/2"), 1);
        let items = f.dispatch(2);
        assert_eq!(items[0].url.as_str(), "http://a.test/1");
        assert_eq!(items[1].url.as_str(), "http://a.test/2");
    }

    #[test]
    fn lifo_reverses_insertion_order() {
        let f = Frontier::new(true);
        f.submit(u("http://a.test/1"), 1);
        f.submit(u("http://a.test/2"), 1);
        let items = f.dispatch(2);
        assert_eq!(items[0].url.as_str(), "http://a.test/2");
        assert_eq!(items[1].url.as_str(), "http://a.test/1");
    }

    #[test]
    fn duplicate_submit_is_rejected_once_seen() {
        let f = Frontier::new(false);
        f.submit(u("http://a.test/1"), 1);
        f.dispatch(1);
        assert!(!f.submit(u("http://a.test/1"), 1));
    }

    #[test]
    fn requeue_clears_seen_and_reinserts() {
        let f = Frontier::new(false);
        f.submit(u("http://a.test/1"), 1);
        f.dispatch(1);
        assert!(f.has_seen(&u("http://a.test/1")));
        f.requeue(u("http://a.test/1"), 1);
        assert!(!f.has_seen(&u("http://a.test/1")));
        assert!(!f.is_empty());
    }

    #[test]
    fn drain_empties_pending_and_returns_items() {
        let f = Frontier::new(false);
        f.submit(u("http://a.test/1"), 1);
        f.submit(u("http://a.test/2"), 1);
        let drained = f.drain();
        assert_eq!(drained.len(), 2);
        assert!(f.is_empty());
    }
}
