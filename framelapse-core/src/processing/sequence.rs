//! Natural ordering of source images into a shooting sequence.
//!
//! Cameras and intervalometers name files with a running counter
//! (`IMG_0009.JPG`, `IMG_0010.JPG`, `frame2.png`, `frame10.png`). Sorting those
//! as plain strings puts `frame10` before `frame2`, so the sort key is the
//! first run of digits in the file name, compared numerically.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

/// Sorts image paths into shooting order.
///
/// Two files that both carry a number compare by that number. Files without a
/// number sort after all numbered files. On equal numbers, and between two
/// unnumbered files, the file name decides (case-insensitively first, then
/// exactly), and finally the full path, so the order is always total.
///
/// A numbered name against an unnumbered one is not compared as text: that
/// pairwise rule is not transitive, and `sort_by` needs a total order. The
/// exact tie-break is byte order, so `A.jpg` sorts before `a.jpg`; locale
/// collation would put the lowercase name first.
///
/// # Examples
///
/// ```rust
/// use framelapse_core::processing::sequence::sort_sequence;
/// use std::path::PathBuf;
///
/// let mut files = vec![PathBuf::from("frame10.jpg"), PathBuf::from("frame2.jpg")];
/// sort_sequence(&mut files);
/// assert_eq!(files, vec![PathBuf::from("frame2.jpg"), PathBuf::from("frame10.jpg")]);
/// ```
pub fn sort_sequence(paths: &mut [PathBuf]) {
    paths.sort_by(|a, b| compare_sequence(a, b));
}

/// Comparison used by [`sort_sequence`].
#[must_use]
pub fn compare_sequence(a: &Path, b: &Path) -> Ordering {
    let name_a = file_name(a);
    let name_b = file_name(b);

    let by_number = match (sequence_number(&name_a), sequence_number(&name_b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };

    by_number
        .then_with(|| compare_names(&name_a, &name_b))
        .then_with(|| a.cmp(b))
}

/// First run of ASCII digits in `name`, if it fits in a `u64`.
#[must_use]
pub fn sequence_number(name: &str) -> Option<u64> {
    let start = name.find(|c: char| c.is_ascii_digit())?;
    let digits: &str = {
        let rest = &name[start..];
        let end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        &rest[..end]
    };
    digits.parse().ok()
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(names: &[&str]) -> Vec<String> {
        let mut paths: Vec<PathBuf> = names.iter().map(PathBuf::from).collect();
        sort_sequence(&mut paths);
        paths
            .iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_numeric_order() {
        assert_eq!(
            sorted(&["frame10.jpg", "frame2.jpg", "frame1.jpg"]),
            vec!["frame1.jpg", "frame2.jpg", "frame10.jpg"]
        );
    }

    #[test]
    fn test_zero_padded_and_unpadded_mix() {
        assert_eq!(
            sorted(&["IMG_0010.JPG", "IMG_9.JPG", "IMG_0100.JPG"]),
            vec!["IMG_9.JPG", "IMG_0010.JPG", "IMG_0100.JPG"]
        );
    }

    #[test]
    fn test_non_numeric_names_are_lexicographic() {
        assert_eq!(
            sorted(&["sunset.jpg", "Dawn.jpg", "noon.jpg"]),
            vec!["Dawn.jpg", "noon.jpg", "sunset.jpg"]
        );
    }

    #[test]
    fn test_only_first_digit_run_counts() {
        // 2024 vs 2024: tie on the key, so names decide.
        assert_eq!(
            sorted(&["2024_shot_5.jpg", "2024_shot_10.jpg"]),
            vec!["2024_shot_10.jpg", "2024_shot_5.jpg"]
        );
    }

    #[test]
    fn test_numbered_files_come_first() {
        assert_eq!(
            sorted(&["cover.jpg", "z1.jpg", "m.jpg", "a2.jpg"]),
            vec!["z1.jpg", "a2.jpg", "cover.jpg", "m.jpg"]
        );
    }

    #[test]
    fn test_case_tie_breaks_uppercase_first() {
        assert_eq!(sorted(&["a.jpg", "A.jpg"]), vec!["A.jpg", "a.jpg"]);
    }

    #[test]
    fn test_same_name_in_different_directories_is_stable() {
        assert_eq!(
            sorted(&["z/img1.jpg", "a/img1.jpg"]),
            vec!["a/img1.jpg", "z/img1.jpg"]
        );
    }

    #[test]
    fn test_sequence_number() {
        assert_eq!(sequence_number("IMG_0042.jpg"), Some(42));
        assert_eq!(sequence_number("photo.jpg"), None);
        assert_eq!(sequence_number("x99999999999999999999999.jpg"), None);
    }
}
