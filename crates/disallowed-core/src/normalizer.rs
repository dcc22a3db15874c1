//! Canonical forms for symbol names and file paths.
//!
//! Everything here is pure string or lexical path manipulation: nothing
//! touches the filesystem, so results depend only on the inputs.

use std::path::{Component, Path, PathBuf};

/// Namespace separator used in symbol names.
pub const NAMESPACE_SEPARATOR: char = '\\';

/// Separator between a class and one of its members.
pub const MEMBER_SEPARATOR: &str = "::";

/// Strips decoration from a symbol name while keeping its case.
///
/// Removes surrounding whitespace, leading namespace separators and a
/// trailing `()`.
///
/// ```ignore
/// assert_eq!(trim_symbol("\\Foo\\Bar::baz()"), "Foo\\Bar::baz");
/// ```
#[must_use]
pub fn trim_symbol(symbol: &str) -> &str {
    let symbol = symbol.trim().trim_start_matches(NAMESPACE_SEPARATOR);
    symbol.strip_suffix("()").unwrap_or(symbol).trim_end()
}

/// Returns the comparison key of a symbol name.
///
/// `Waldo\Quux\Blade::Run()` and `\waldo\quux\blade::run` produce the same key.
#[must_use]
pub fn normalize_symbol(symbol: &str) -> String {
    trim_symbol(symbol).to_lowercase()
}

/// Converts backslashes to forward slashes.
#[must_use]
pub fn unify_separators(path: &str) -> String {
    path.replace('\\', "/")
}

/// Anchors `path` at `root` and resolves `.` and `..` lexically.
///
/// Absolute paths ignore `root`. `..` never climbs above the filesystem root.
#[must_use]
pub fn normalize_path(root: &Path, path: &str) -> PathBuf {
    let unified = unify_separators(path);
    let candidate = Path::new(&unified);
    let joined = if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        root.join(candidate)
    };
    clean(&joined)
}

/// Lexically removes `.` components and folds `..` into their parent.
#[must_use]
pub fn clean(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let popped = match out.components().next_back() {
                    Some(Component::Normal(_)) => out.pop(),
                    Some(Component::RootDir | Component::Prefix(_)) => true,
                    _ => false,
                };
                if !popped {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Renders a path with `/` separators for glob matching.
#[must_use]
pub fn path_to_slash(path: &Path) -> String {
    unify_separators(&path.to_string_lossy())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trim_symbol_keeps_case() {
        assert_eq!(trim_symbol("\\Foo\\Bar::Baz()"), "Foo\\Bar::Baz");
        assert_eq!(trim_symbol("  exec  "), "exec");
        assert_eq!(trim_symbol("Foo::*"), "Foo::*");
    }

    #[test]
    fn normalize_symbol_is_case_and_decoration_insensitive() {
        assert_eq!(
            normalize_symbol("Waldo\\Quux\\Blade::Run()"),
            normalize_symbol("\\waldo\\quux\\blade::run")
        );
        assert_eq!(normalize_symbol("DateTime::format()"), "datetime::format");
    }

    #[test]
    fn normalize_path_resolves_parent_dirs() {
        let root = Path::new("/project/tests");
        assert_eq!(
            normalize_path(root, "../src/disallowed/methodCalls.php"),
            PathBuf::from("/project/src/disallowed/methodCalls.php")
        );
        assert_eq!(
            normalize_path(root, "./fixtures/./a.php"),
            PathBuf::from("/project/tests/fixtures/a.php")
        );
    }

    #[test]
    fn normalize_path_keeps_absolute_paths() {
        let root = Path::new("/project");
        assert_eq!(
            normalize_path(root, "/elsewhere/../lib/a.php"),
            PathBuf::from("/lib/a.php")
        );
    }

    #[test]
    fn normalize_path_unifies_backslashes() {
        let root = Path::new("/project");
        assert_eq!(
            normalize_path(root, "src\\sub\\a.php"),
            PathBuf::from("/project/src/sub/a.php")
        );
    }

    #[test]
    fn clean_does_not_climb_above_root() {
        assert_eq!(clean(Path::new("/../a")), PathBuf::from("/a"));
        assert_eq!(clean(Path::new("../a")), PathBuf::from("../a"));
    }
}
