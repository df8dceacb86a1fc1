//! Naming conventions for bilateral symmetry.

use serde::{Deserialize, Serialize};

/// Side-marker naming convention used to find a bone's mirror counterpart.
///
/// Marker pairs are tried in order; single-character markers only match next
/// to a separator ("arm.L", "R_hand"), word markers also match bare
/// ("LeftFoot"). The default covers the common `.L`/`.R` family.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MirrorConventions {
    /// Characters that may separate a side marker from the bone name.
    pub separators: Vec<char>,
    /// (left, right) marker pairs, longest first.
    pub markers: Vec<(String, String)>,
}

impl Default for MirrorConventions {
    fn default() -> Self {
        Self {
            separators: vec!['.', '_', '-', ' '],
            markers: vec![
                ("Left".to_string(), "Right".to_string()),
                ("left".to_string(), "right".to_string()),
                ("LEFT".to_string(), "RIGHT".to_string()),
                ("L".to_string(), "R".to_string()),
                ("l".to_string(), "r".to_string()),
            ],
        }
    }
}

impl MirrorConventions {
    /// Map a bone name to its bilateral counterpart.
    ///
    /// Returns `None` when no recognizable side marker is present; callers
    /// decide whether that is an error or a self-mirror. The mapping is an
    /// involution on recognized names: `mirror_name(mirror_name(n)) == n`.
    pub fn mirror_name(&self, name: &str) -> Option<String> {
        for (left, right) in &self.markers {
            for (this, other) in [(left, right), (right, left)] {
                // Suffix with separator: "arm.L" -> "arm.R"
                for sep in &self.separators {
                    let suffix = format!("{sep}{this}");
                    if let Some(stem) = name.strip_suffix(suffix.as_str()) {
                        return Some(format!("{stem}{sep}{other}"));
                    }
                    let prefix = format!("{this}{sep}");
                    if let Some(rest) = name.strip_prefix(prefix.as_str()) {
                        return Some(format!("{other}{sep}{rest}"));
                    }
                }
                // Bare word markers: "LeftFoot" -> "RightFoot". Single
                // letters would false-positive on ordinary names.
                if this.len() > 1 {
                    if let Some(stem) = name.strip_suffix(this.as_str()) {
                        return Some(format!("{stem}{other}"));
                    }
                    if let Some(rest) = name.strip_prefix(this.as_str()) {
                        return Some(format!("{other}{rest}"));
                    }
                }
            }
        }
        None
    }
}
