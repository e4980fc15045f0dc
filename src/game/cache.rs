//! A small LRU cache for generated move lists.
//!
//! Keyed by the position, the deploy-session fingerprint, and the query
//! filters; cleared wholesale on every successful apply, undo, or board
//! edit.

use std::collections::{HashMap, VecDeque};

use super::types::{Color, MoveList, PieceKind, Square};

const CACHE_CAPACITY: usize = 64;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct CacheKey {
    pub position: String,
    /// (stack square, session turn, executed command count)
    pub session: Option<(Square, Color, usize)>,
    pub square: Option<Square>,
    pub kind: Option<PieceKind>,
}

#[derive(Clone, Debug)]
pub(crate) struct MoveCache {
    map: HashMap<CacheKey, MoveList>,
    order: VecDeque<CacheKey>,
}

impl MoveCache {
    pub(crate) fn new() -> Self {
        MoveCache {
            map: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    pub(crate) fn get(&mut self, key: &CacheKey) -> Option<MoveList> {
        let hit = self.map.get(key).cloned();
        if hit.is_some() {
            // refresh recency
            if let Some(pos) = self.order.iter().position(|k| k == key) {
                let key = self.order.remove(pos).expect("position just found");
                self.order.push_back(key);
            }
        }
        hit
    }

    pub(crate) fn insert(&mut self, key: CacheKey, moves: MoveList) {
        if self.map.contains_key(&key) {
            self.map.insert(key, moves);
            return;
        }
        while self.map.len() >= CACHE_CAPACITY {
            match self.order.pop_front() {
                Some(oldest) => {
                    self.map.remove(&oldest);
                }
                None => break,
            }
        }
        self.order.push_back(key.clone());
        self.map.insert(key, moves);
    }

    pub(crate) fn clear(&mut self) {
        self.map.clear();
        self.order.clear();
    }
}
