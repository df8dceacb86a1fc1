//! Batch matching of thumbnail candidates to pose markers.
//!
//! Candidates are bare names (typically image file stems); producing and
//! scanning them is the host's job. Matching is pure: it reports (pose index,
//! candidate index) pairs and never touches files.

use hashbrown::HashMap;

use crate::library::PoseMarker;

/// How candidates are mapped to poses.
#[derive(Clone, Debug, PartialEq)]
pub enum MatchStrategy {
    /// Match candidate names against pose names, tolerating `fuzzyness` in
    /// [0, 1]: a candidate is accepted when its similarity ratio is at least
    /// `1.0 - fuzzyness`. Zero means exact matches only.
    Name { fuzzyness: f32 },
    /// The i-th candidate goes to the i-th pose. With `numbered`, instead
    /// pick the candidate whose first embedded number equals the pose's
    /// position counted from the given start.
    Index { numbered: Option<u32> },
    /// Candidates go to poses in frame order. With `numbered`, instead pick
    /// the candidate whose first embedded number equals the marker frame.
    Frame { numbered: bool },
}

/// One resolved pairing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThumbnailMatch {
    pub pose: usize,
    pub candidate: usize,
}

/// First run of digits in `name`, scanning from the left.
fn leading_number(name: &str) -> Option<u64> {
    let start = name.find(|c: char| c.is_ascii_digit())?;
    let digits: String = name[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Similarity ratio in [0, 1] based on the longest common subsequence:
/// `2 * lcs / (len_a + len_b)`. 1.0 means equal strings.
fn similarity(a: &str, b: &str) -> f32 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut row = vec![0usize; b.len() + 1];
    for ca in &a {
        let mut prev_diag = 0;
        for (j, cb) in b.iter().enumerate() {
            let up = row[j + 1];
            row[j + 1] = if ca == cb {
                prev_diag + 1
            } else {
                up.max(row[j])
            };
            prev_diag = up;
        }
    }
    let lcs = row[b.len()] as f32;
    2.0 * lcs / (a.len() + b.len()) as f32
}

fn candidate_with_number(candidates: &[String], number: u64) -> Option<usize> {
    candidates
        .iter()
        .position(|name| leading_number(name) == Some(number))
}

fn match_by_name(markers: &[PoseMarker], candidates: &[String], fuzzyness: f32) -> Vec<ThumbnailMatch> {
    let cutoff = (1.0 - fuzzyness).clamp(0.0, 1.0);
    let by_name: HashMap<&str, usize> = candidates
        .iter()
        .enumerate()
        .map(|(idx, name)| (name.as_str(), idx))
        .collect();

    let mut matches = Vec::new();
    for (pose, marker) in markers.iter().enumerate() {
        // Exact hits short-circuit the scoring pass.
        if let Some(&candidate) = by_name.get(marker.name.as_str()) {
            matches.push(ThumbnailMatch { pose, candidate });
            continue;
        }
        let best = candidates
            .iter()
            .enumerate()
            .map(|(idx, name)| (idx, similarity(&marker.name, name)))
            .filter(|(_, score)| *score >= cutoff)
            .max_by(|(_, a), (_, b)| a.total_cmp(b));
        if let Some((candidate, _)) = best {
            matches.push(ThumbnailMatch { pose, candidate });
        }
    }
    matches
}

fn match_by_index(
    markers: &[PoseMarker],
    candidates: &[String],
    numbered: Option<u32>,
) -> Vec<ThumbnailMatch> {
    match numbered {
        Some(start) => (0..markers.len())
            .filter_map(|pose| {
                candidate_with_number(candidates, start as u64 + pose as u64)
                    .map(|candidate| ThumbnailMatch { pose, candidate })
            })
            .collect(),
        None => (0..markers.len().min(candidates.len()))
            .map(|i| ThumbnailMatch {
                pose: i,
                candidate: i,
            })
            .collect(),
    }
}

fn match_by_frame(
    markers: &[PoseMarker],
    candidates: &[String],
    numbered: bool,
) -> Vec<ThumbnailMatch> {
    if numbered {
        return markers
            .iter()
            .enumerate()
            .filter_map(|(pose, marker)| {
                candidate_with_number(candidates, u64::from(marker.frame))
                    .map(|candidate| ThumbnailMatch { pose, candidate })
            })
            .collect();
    }
    let mut frame_order: Vec<usize> = (0..markers.len()).collect();
    frame_order.sort_by_key(|&i| markers[i].frame);
    frame_order
        .into_iter()
        .zip(0..candidates.len())
        .map(|(pose, candidate)| ThumbnailMatch { pose, candidate })
        .collect()
}

/// Pair thumbnail candidates with pose markers using the given strategy.
///
/// Candidates are considered in the order given; hosts that want the
/// classic sorted-directory behavior sort before calling.
pub fn match_thumbnails(
    markers: &[PoseMarker],
    candidates: &[String],
    strategy: &MatchStrategy,
) -> Vec<ThumbnailMatch> {
    match strategy {
        MatchStrategy::Name { fuzzyness } => match_by_name(markers, candidates, *fuzzyness),
        MatchStrategy::Index { numbered } => match_by_index(markers, candidates, *numbered),
        MatchStrategy::Frame { numbered } => match_by_frame(markers, candidates, *numbered),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_number_scans_from_left() {
        assert_eq!(leading_number("pose_012_final"), Some(12));
        assert_eq!(leading_number("no digits"), None);
        assert_eq!(leading_number("v2_frame30"), Some(2));
    }

    #[test]
    fn similarity_bounds() {
        assert_eq!(similarity("crouch", "crouch"), 1.0);
        assert_eq!(similarity("abc", "xyz"), 0.0);
        let near = similarity("crouch", "crouch_01");
        assert!(near > 0.7 && near < 1.0, "near={near}");
    }
}
