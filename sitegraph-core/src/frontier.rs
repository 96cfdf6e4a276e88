use crate::error::{CrawlError, Result};
use std::collections::VecDeque;

/// FIFO of URLs waiting to be fetched at one BFS depth.
///
/// Order is discovery order and is kept exactly: it decides node layout in
/// the rendered graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frontier {
    items: VecDeque<String>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, url: impl Into<String>) {
        self.items.push_back(url.into());
    }

    pub fn dequeue(&mut self) -> Result<String> {
        self.items.pop_front().ok_or(CrawlError::EmptyQueue)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Snapshot of the pending URLs, front first.
    pub fn items(&self) -> Vec<&str> {
        self.items.iter().map(String::as_str).collect()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Remove every URL, front first.
    pub fn drain(&mut self) -> impl Iterator<Item = String> + '_ {
        self.items.drain(..)
    }
}

impl FromIterator<String> for Frontier {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Frontier {
    type Item = String;
    type IntoIter = std::collections::vec_deque::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
