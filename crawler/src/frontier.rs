//! Breadth-first frontier shared by the web crawl and the directory scan.
//!
//! A location is marked seen the moment it is discovered, before it is queued,
//! so two parents linking to the same page can never enqueue it twice.

use std::collections::{HashSet, VecDeque};
use std::hash::Hash;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<K> {
    pub location: K,
    pub depth: usize,
}

pub struct Frontier<K> {
    seen: HashSet<K>,
    queue: VecDeque<Entry<K>>,
    discovered: Vec<Entry<K>>,
    max_depth: Option<usize>,
}

impl<K: Clone + Eq + Hash> Frontier<K> {
    /// Start at `seed` (depth 0). `max_depth: None` walks without a bound.
    pub fn new(seed: K, max_depth: Option<usize>) -> Self {
        let mut frontier = Self { seen: HashSet::new(), queue: VecDeque::new(), discovered: Vec::new(), max_depth };
        frontier.discover(seed, 0);
        frontier
    }

    /// Record `location` at `depth` unless it was seen before. Returns whether it was new.
    pub fn discover(&mut self, location: K, depth: usize) -> bool {
        if !self.seen.insert(location.clone()) {
            return false;
        }
        let entry = Entry { location, depth };
        self.discovered.push(entry.clone());
        self.queue.push_back(entry);
        true
    }

    /// Whether links found at `depth` may still be followed.
    pub fn expands(&self, depth: usize) -> bool { self.max_depth.map_or(true, |max| depth < max) }

    pub fn pop(&mut self) -> Option<Entry<K>> { self.queue.pop_front() }

    /// Take every queued entry of the shallowest depth, in discovery order.
    pub fn next_level(&mut self) -> Vec<Entry<K>> {
        let Some(depth) = self.queue.front().map(|e| e.depth) else { return Vec::new() };
        let mut level = Vec::new();
        while self.queue.front().is_some_and(|e| e.depth == depth) {
            level.extend(self.queue.pop_front());
        }
        level
    }

    pub fn is_empty(&self) -> bool { self.queue.is_empty() }

    pub fn discovered(&self) -> &[Entry<K>] { &self.discovered }

    pub fn into_discovered(self) -> Vec<Entry<K>> { self.discovered }
}

/// Synchronous bounded BFS driven by a neighbor function.
///
/// `neighbors` is only called for entries whose depth may still expand.
pub fn walk<K, F, I>(seed: K, max_depth: Option<usize>, mut neighbors: F) -> Vec<Entry<K>>
where
    K: Clone + Eq + Hash,
    F: FnMut(&Entry<K>) -> I,
    I: IntoIterator<Item = K>,
{
    let mut frontier = Frontier::new(seed, max_depth);
    while let Some(entry) = frontier.pop() {
        if !frontier.expands(entry.depth) {
            continue;
        }
        for next in neighbors(&entry) {
            frontier.discover(next, entry.depth + 1);
        }
    }
    frontier.into_discovered()
}

/// Collect files under `root` whose extension is in `extensions`, in walk order.
///
/// Directories are listed in file-name order. Unreadable subdirectories are
/// logged and skipped; an unreadable root is an error.
pub fn scan_documents(root: &Path, extensions: &[&str]) -> std::io::Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} is not a directory", root.display()),
        ));
    }
    let entries = walk(root.to_path_buf(), None, |entry: &Entry<PathBuf>| list_dir(&entry.location));
    let files = entries
        .into_iter()
        .map(|e| e.location)
        .filter(|p| p.is_file())
        .filter(|p| {
            p.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| extensions.iter().any(|want| ext.eq_ignore_ascii_case(want)))
        })
        .collect();
    Ok(files)
}

/// Children of `dir` in file-name order. Symlinked directories are left out so
/// a link back up the tree cannot make the walk revisit it.
fn list_dir(dir: &Path) -> Vec<PathBuf> {
    if !dir.is_dir() {
        return Vec::new();
    }
    let mut children = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(false).sort_by_file_name() {
        match entry {
            Ok(entry) if entry.path_is_symlink() && entry.path().is_dir() => {
                tracing::debug!(path = %entry.path().display(), "skipping symlinked directory");
            }
            Ok(entry) => children.push(entry.into_path()),
            Err(err) => tracing::warn!(dir = %dir.display(), %err, "skipping unreadable entry"),
        }
    }
    children
}
