//! Word-level diff engine.
//!
//! Text is split into alternating word and whitespace tokens, so the token
//! stream concatenates back to the input byte-for-byte. The edit script is the
//! longest common subsequence of tokens; everything between two unchanged
//! stretches is reported as one `removed` run followed by one `added` run.
//!
//! Invariants (checked by the tests below):
//! - unchanged + removed runs concatenate to the original text
//! - unchanged + added runs concatenate to the optimized text
//! - no two adjacent runs share a kind, and no run is empty
//! - the output depends only on the input pair

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunKind {
    Unchanged,
    Added,
    Removed,
}

/// A maximal span of text tagged relative to the original.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffRun {
    pub text: String,
    pub kind: RunKind,
}

impl DiffRun {
    fn new(kind: RunKind, text: String) -> Self {
        Self { text, kind }
    }
}

/// Computes the word-level edit script turning `original` into `optimized`.
///
/// Total over all inputs: any two strings, including empty ones, produce a
/// run sequence. Two empty inputs produce no runs.
pub fn diff_words(original: &str, optimized: &str) -> Vec<DiffRun> {
    let old_tokens = tokenize(original);
    let new_tokens = tokenize(optimized);

    // Common prefix and suffix never enter the LCS table.
    let prefix = old_tokens
        .iter()
        .zip(&new_tokens)
        .take_while(|(a, b)| a == b)
        .count();
    let suffix = old_tokens[prefix..]
        .iter()
        .rev()
        .zip(new_tokens[prefix..].iter().rev())
        .take_while(|(a, b)| a == b)
        .count();

    let old_mid = &old_tokens[prefix..old_tokens.len() - suffix];
    let new_mid = &new_tokens[prefix..new_tokens.len() - suffix];

    let mut builder = RunBuilder::default();
    for token in &old_tokens[..prefix] {
        builder.push(RunKind::Unchanged, token);
    }
    for (kind, token) in lcs_script(old_mid, new_mid) {
        builder.push(kind, token);
    }
    for token in &old_tokens[old_tokens.len() - suffix..] {
        builder.push(RunKind::Unchanged, token);
    }
    builder.finish()
}

/// Concatenates the runs visible in the original text.
pub fn reconstruct_original(runs: &[DiffRun]) -> String {
    runs.iter()
        .filter(|r| r.kind != RunKind::Added)
        .map(|r| r.text.as_str())
        .collect()
}

/// Concatenates the runs visible in the optimized text.
pub fn reconstruct_optimized(runs: &[DiffRun]) -> String {
    runs.iter()
        .filter(|r| r.kind != RunKind::Removed)
        .map(|r| r.text.as_str())
        .collect()
}

/// Splits text into maximal runs of whitespace and non-whitespace.
fn tokenize(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut in_space: Option<bool> = None;

    for (idx, ch) in text.char_indices() {
        let is_space = ch.is_whitespace();
        match in_space {
            Some(prev) if prev != is_space => {
                tokens.push(&text[start..idx]);
                start = idx;
            }
            _ => {}
        }
        in_space = Some(is_space);
    }
    if start < text.len() {
        tokens.push(&text[start..]);
    }
    tokens
}

/// Edit script over two token slices via a suffix-LCS table.
/// On ties a removal is taken before an addition, which keeps the walk deterministic.
fn lcs_script<'a>(old: &[&'a str], new: &[&'a str]) -> Vec<(RunKind, &'a str)> {
    let (n, m) = (old.len(), new.len());
    let width = m + 1;
    // table[i * width + j] = LCS length of old[i..] and new[j..]
    let mut table = vec![0u32; (n + 1) * width];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            table[i * width + j] = if old[i] == new[j] {
                table[(i + 1) * width + j + 1] + 1
            } else {
                table[(i + 1) * width + j].max(table[i * width + j + 1])
            };
        }
    }

    let mut script = Vec::with_capacity(n + m);
    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if old[i] == new[j] {
            script.push((RunKind::Unchanged, old[i]));
            i += 1;
            j += 1;
        } else if table[(i + 1) * width + j] >= table[i * width + j + 1] {
            script.push((RunKind::Removed, old[i]));
            i += 1;
        } else {
            script.push((RunKind::Added, new[j]));
            j += 1;
        }
    }
    script.extend(old[i..].iter().map(|t| (RunKind::Removed, *t)));
    script.extend(new[j..].iter().map(|t| (RunKind::Added, *t)));
    script
}

/// Accumulates tokens into runs. Changes between two unchanged stretches are
/// buffered so each hunk comes out as removed-then-added.
#[derive(Default)]
struct RunBuilder {
    runs: Vec<DiffRun>,
    removed: String,
    added: String,
}

impl RunBuilder {
    fn push(&mut self, kind: RunKind, token: &str) {
        match kind {
            RunKind::Removed => self.removed.push_str(token),
            RunKind::Added => self.added.push_str(token),
            RunKind::Unchanged => {
                self.flush_hunk();
                match self.runs.last_mut() {
                    Some(last) if last.kind == RunKind::Unchanged => last.text.push_str(token),
                    _ => self
                        .runs
                        .push(DiffRun::new(RunKind::Unchanged, token.to_string())),
                }
            }
        }
    }

    fn flush_hunk(&mut self) {
        if !self.removed.is_empty() {
            let text = std::mem::take(&mut self.removed);
            self.runs.push(DiffRun::new(RunKind::Removed, text));
        }
        if !self.added.is_empty() {
            let text = std::mem::take(&mut self.added);
            self.runs.push(DiffRun::new(RunKind::Added, text));
        }
    }

    fn finish(mut self) -> Vec<DiffRun> {
        self.flush_hunk();
        self.runs
    }
}
