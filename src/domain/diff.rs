// Line-level diff between the local and remote renderings of a dashboard
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffKind {
    Added,
    Removed,
    Unchanged,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
    pub kind: DiffKind,
    pub text: String,
}

impl DiffLine {
    fn new(kind: DiffKind, text: &str) -> Self {
        Self {
            kind,
            text: text.to_string(),
        }
    }

    pub fn is_change(&self) -> bool {
        self.kind != DiffKind::Unchanged
    }
}

/// A group of nearby changes with surrounding context, unified-diff style.
#[derive(Debug, Clone, PartialEq)]
pub struct Hunk {
    pub old_start: usize,
    pub old_len: usize,
    pub new_start: usize,
    pub new_len: usize,
    pub lines: Vec<DiffLine>,
}

impl fmt::Display for Hunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "@@ -{},{} +{},{} @@",
            self.old_start, self.old_len, self.new_start, self.new_len
        )
    }
}

/// Diffs two texts line by line using a longest-common-subsequence table.
///
/// The common prefix and suffix are peeled off first, so the quadratic table
/// only covers the region that actually differs.
pub fn render_diff(local_text: &str, remote_text: &str) -> Vec<DiffLine> {
    let old: Vec<&str> = local_text.lines().collect();
    let new: Vec<&str> = remote_text.lines().collect();

    let prefix = old
        .iter()
        .zip(new.iter())
        .take_while(|(a, b)| a == b)
        .count();
    let suffix = old[prefix..]
        .iter()
        .rev()
        .zip(new[prefix..].iter().rev())
        .take_while(|(a, b)| a == b)
        .count();

    let old_mid = &old[prefix..old.len() - suffix];
    let new_mid = &new[prefix..new.len() - suffix];

    let mut out = Vec::with_capacity(old.len().max(new.len()));
    out.extend(old[..prefix].iter().map(|l| DiffLine::new(DiffKind::Unchanged, l)));
    diff_middle(old_mid, new_mid, &mut out);
    out.extend(
        old[old.len() - suffix..]
            .iter()
            .map(|l| DiffLine::new(DiffKind::Unchanged, l)),
    );
    out
}

fn diff_middle(old: &[&str], new: &[&str], out: &mut Vec<DiffLine>) {
    let (n, m) = (old.len(), new.len());
    let width = m + 1;

    // lcs[i * width + j] = LCS length of old[i..] and new[j..]
    let mut lcs = vec![0u32; (n + 1) * width];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            lcs[i * width + j] = if old[i] == new[j] {
                lcs[(i + 1) * width + j + 1] + 1
            } else {
                lcs[(i + 1) * width + j].max(lcs[i * width + j + 1])
            };
        }
    }

    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if old[i] == new[j] {
            out.push(DiffLine::new(DiffKind::Unchanged, old[i]));
            i += 1;
            j += 1;
        } else if lcs[(i + 1) * width + j] >= lcs[i * width + j + 1] {
            out.push(DiffLine::new(DiffKind::Removed, old[i]));
            i += 1;
        } else {
            out.push(DiffLine::new(DiffKind::Added, new[j]));
            j += 1;
        }
    }
    out.extend(old[i..].iter().map(|l| DiffLine::new(DiffKind::Removed, l)));
    out.extend(new[j..].iter().map(|l| DiffLine::new(DiffKind::Added, l)));
}

/// Groups diff records into hunks keeping `context` unchanged lines around
/// every change. Overlapping or touching windows are merged.
pub fn hunks(lines: &[DiffLine], context: usize) -> Vec<Hunk> {
    let mut ranges: Vec<(usize, usize)> = Vec::new();
    for (i, _) in lines.iter().enumerate().filter(|(_, l)| l.is_change()) {
        let start = i.saturating_sub(context);
        let end = (i + context + 1).min(lines.len());
        match ranges.last_mut() {
            Some(last) if start <= last.1 => last.1 = last.1.max(end),
            _ => ranges.push((start, end)),
        }
    }

    // Line numbers consumed on each side before index i.
    let mut old_before = Vec::with_capacity(lines.len() + 1);
    let mut new_before = Vec::with_capacity(lines.len() + 1);
    let (mut o, mut n) = (0, 0);
    for line in lines {
        old_before.push(o);
        new_before.push(n);
        if line.kind != DiffKind::Added {
            o += 1;
        }
        if line.kind != DiffKind::Removed {
            n += 1;
        }
    }
    old_before.push(o);
    new_before.push(n);

    ranges
        .into_iter()
        .map(|(start, end)| {
            let old_len = old_before[end] - old_before[start];
            let new_len = new_before[end] - new_before[start];
            Hunk {
                old_start: if old_len == 0 { old_before[start] } else { old_before[start] + 1 },
                old_len,
                new_start: if new_len == 0 { new_before[start] } else { new_before[start] + 1 },
                new_len,
                lines: lines[start..end].to_vec(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(lines: &[DiffLine]) -> Vec<(DiffKind, &str)> {
        lines.iter().map(|l| (l.kind, l.text.as_str())).collect()
    }

    #[test]
    fn test_identical_texts_have_no_changes() {
        let diff = render_diff("a\nb\nc\n", "a\nb\nc\n");
        assert_eq!(diff.len(), 3);
        assert!(diff.iter().all(|l| !l.is_change()));
        assert!(hunks(&diff, 3).is_empty());
    }

    #[test]
    fn test_replaced_line() {
        let diff = render_diff("a\nb\nc", "a\nx\nc");
        assert_eq!(
            kinds(&diff),
            vec![
                (DiffKind::Unchanged, "a"),
                (DiffKind::Removed, "b"),
                (DiffKind::Added, "x"),
                (DiffKind::Unchanged, "c"),
            ]
        );
    }

    #[test]
    fn test_empty_local_is_all_added() {
        let diff = render_diff("", "{\n  \"title\": \"CPU\"\n}");
        assert_eq!(diff.len(), 3);
        assert!(diff.iter().all(|l| l.kind == DiffKind::Added));

        let hunks = hunks(&diff, 3);
        assert_eq!(hunks.len(), 1);
        assert_eq!(hunks[0].to_string(), "@@ -0,0 +1,3 @@");
    }

    #[test]
    fn test_interleaved_changes_keep_common_lines() {
        let diff = render_diff("a\nb\nc\nd\ne", "b\nc\nx\ne\nf");
        let unchanged: Vec<&str> = diff
            .iter()
            .filter(|l| l.kind == DiffKind::Unchanged)
            .map(|l| l.text.as_str())
            .collect();
        assert_eq!(unchanged, vec!["b", "c", "e"]);

        let removed = diff.iter().filter(|l| l.kind == DiffKind::Removed).count();
        let added = diff.iter().filter(|l| l.kind == DiffKind::Added).count();
        assert_eq!((removed, added), (2, 2));
    }

    #[test]
    fn test_distant_changes_split_into_hunks() {
        let old: Vec<String> = (0..20).map(|i| i.to_string()).collect();
        let mut new = old.clone();
        new[2] = "two".to_string();
        new[17] = "seventeen".to_string();

        let diff = render_diff(&old.join("\n"), &new.join("\n"));
        let hunks = hunks(&diff, 2);
        assert_eq!(hunks.len(), 2);
        assert_eq!(hunks[0].to_string(), "@@ -1,5 +1,5 @@");
        assert_eq!(hunks[1].to_string(), "@@ -16,5 +16,5 @@");
    }

    #[test]
    fn test_nearby_changes_merge() {
        let diff = render_diff("a\nb\nc\nd\ne", "A\nb\nc\nd\nE");
        assert_eq!(hunks(&diff, 2).len(), 1);
    }
}
