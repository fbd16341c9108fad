//! Nearest-ancestor template lookup.
//!
//! Any directory in the content tree may hold a `.template` file. A source
//! file uses the template in its own directory if there is one, otherwise the
//! one in the closest parent, stopping at (and including) the input root:
//!
//! ```text
//! content/
//! ├── .template            ← used by index.md and about/me.md
//! ├── index.md
//! ├── about/
//! │   └── me.md
//! └── blog/
//!     ├── .template        ← used by everything under blog/
//!     └── post.md
//! ```
//!
//! Template files are never part of the site themselves: discovery skips
//! them (see [`crate::scan`]).

use std::path::{Path, PathBuf};

/// File name a template must have to be found.
pub const TEMPLATE_FILENAME: &str = ".template";

/// Find the template for a file living in `start_dir`.
///
/// Returns `None` when no directory between `start_dir` and `input_root`
/// holds a template. A `start_dir` outside the input root is searched for at
/// most as many hops as the input root is deep, and the walk also ends at the
/// filesystem root, so the lookup always terminates.
pub fn resolve_template(start_dir: &Path, input_root: &Path) -> Option<PathBuf> {
    let max_hops = match start_dir.strip_prefix(input_root) {
        Ok(relative) => relative.components().count(),
        Err(_) => input_root.components().count(),
    };

    let mut dir = Some(start_dir);
    for _ in 0..=max_hops {
        let current = dir?;
        let candidate = current.join(TEMPLATE_FILENAME);
        if candidate.is_file() {
            tracing::info!(template = %candidate.display(), "Found template");
            return Some(candidate);
        }
        if current == input_root {
            break;
        }
        dir = current.parent();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "$body$").unwrap();
    }

    #[test]
    fn nearest_template_wins() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("input");
        touch(&input.join(".template"));
        touch(&input.join("blog/.template"));
        touch(&input.join("blog/post.md"));

        let found = resolve_template(&input.join("blog"), &input);
        assert_eq!(found, Some(input.join("blog/.template")));
    }

    #[test]
    fn falls_back_to_parent_template() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("input");
        touch(&input.join(".template"));
        fs::create_dir_all(input.join("a/b/c")).unwrap();

        let found = resolve_template(&input.join("a/b/c"), &input);
        assert_eq!(found, Some(input.join(".template")));
    }

    #[test]
    fn input_root_itself_is_searched() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("input");
        touch(&input.join(".template"));

        assert_eq!(
            resolve_template(&input, &input),
            Some(input.join(".template"))
        );
    }

    #[test]
    fn does_not_search_above_input_root() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("input");
        // A template beside the input root must not be picked up.
        touch(&tmp.path().join(".template"));
        fs::create_dir_all(input.join("blog")).unwrap();

        assert_eq!(resolve_template(&input.join("blog"), &input), None);
    }

    #[test]
    fn none_when_no_template_anywhere() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("input");
        fs::create_dir_all(input.join("deep/er")).unwrap();

        assert_eq!(resolve_template(&input.join("deep/er"), &input), None);
    }

    #[test]
    fn directory_named_template_is_ignored() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("input");
        fs::create_dir_all(input.join("x/.template")).unwrap();

        assert_eq!(resolve_template(&input.join("x"), &input), None);
    }

    #[test]
    fn start_outside_input_root_terminates() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("input");
        let elsewhere = tmp.path().join("elsewhere/nested");
        fs::create_dir_all(&input).unwrap();
        fs::create_dir_all(&elsewhere).unwrap();

        assert_eq!(resolve_template(&elsewhere, &input), None);
    }

    #[test]
    fn relative_paths_terminate() {
        assert_eq!(
            resolve_template(Path::new("no/such/dir"), Path::new("other")),
            None
        );
    }
}
