//! Reduces section lines to genuine tool invocations
//!
//! arduino-cli echoes the commands it runs but also relays whatever those tools
//! print. A line counts as an invocation when it is a valid shell command line
//! whose first word resolves to an executable.

use std::collections::HashSet;
use std::path::PathBuf;
use tracing::trace;

use crate::util::shell::try_split_line;

/// Decides whether a program name names a runnable executable
pub trait ExecutableResolver {
    fn resolves(&self, program: &str) -> bool;
}

/// Resolves programs against `PATH` (absolute and relative paths are checked directly)
#[derive(Debug, Default, Clone, Copy)]
pub struct PathResolver;

impl ExecutableResolver for PathResolver {
    fn resolves(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }
}

/// Resolver accepting a fixed set of program names, for offline mining and tests
#[derive(Debug, Default, Clone)]
pub struct KnownPrograms {
    programs: HashSet<String>,
}

impl KnownPrograms {
    pub fn new<I, S>(programs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            programs: programs.into_iter().map(Into::into).collect(),
        }
    }
}

impl ExecutableResolver for KnownPrograms {
    fn resolves(&self, program: &str) -> bool {
        self.programs.contains(program)
    }
}

/// Accepts any program name that exists on disk or on `PATH`, looking in extra directories first
#[derive(Debug, Default, Clone)]
pub struct SearchPathResolver {
    extra_dirs: Vec<PathBuf>,
}

impl SearchPathResolver {
    pub fn new(extra_dirs: Vec<PathBuf>) -> Self {
        Self { extra_dirs }
    }
}

impl ExecutableResolver for SearchPathResolver {
    fn resolves(&self, program: &str) -> bool {
        if self.extra_dirs.is_empty() {
            return PathResolver.resolves(program);
        }
        let cwd = std::env::current_dir().unwrap_or_default();
        let path_var = std::env::var_os("PATH").unwrap_or_default();
        let dirs = self
            .extra_dirs
            .iter()
            .cloned()
            .chain(std::env::split_paths(&path_var));
        match std::env::join_paths(dirs) {
            Ok(paths) => which::which_in(program, Some(paths), cwd).is_ok(),
            Err(_) => PathResolver.resolves(program),
        }
    }
}

impl<F> ExecutableResolver for F
where
    F: Fn(&str) -> bool,
{
    fn resolves(&self, program: &str) -> bool {
        self(program)
    }
}

/// Keeps only the lines that are tool invocations
///
/// Lines that fail to tokenize are dropped rather than reported: diagnostic
/// output routinely contains unbalanced quotes.
pub fn invocation_filter<R>(lines: &[String], resolver: &R) -> Vec<String>
where
    R: ExecutableResolver + ?Sized,
{
    lines
        .iter()
        .filter(|line| match try_split_line(line) {
            Some(tokens) => tokens
                .first()
                .map(|program| resolver.resolves(program))
                .unwrap_or(false),
            None => {
                trace!(line = %line, "Dropping line that is not a valid command line");
                false
            }
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_keeps_resolvable_invocations() {
        let resolver = KnownPrograms::new(["avr-gcc"]);
        let input = lines(&[
            "avr-gcc -c -o a.o a.c",
            "Sketch uses 444 bytes (1%) of program storage space.",
            "",
        ]);
        assert_eq!(invocation_filter(&input, &resolver), vec!["avr-gcc -c -o a.o a.c"]);
    }

    #[test]
    fn test_drops_malformed_lines() {
        let resolver = |_: &str| true;
        let input = lines(&["avr-gcc \"unterminated", "warning: it's broken", "avr-gcc ok"]);
        assert_eq!(invocation_filter(&input, &resolver), vec!["avr-gcc ok"]);
    }

    #[test]
    fn test_quoted_program_name() {
        let resolver = KnownPrograms::new(["/opt/tool chain/avr-gcc"]);
        let input = lines(&[r#""/opt/tool chain/avr-gcc" -c x.c"#]);
        assert_eq!(invocation_filter(&input, &resolver).len(), 1);
    }

    #[test]
    fn test_path_resolver_finds_shell() {
        assert!(PathResolver.resolves("sh"));
        assert!(!PathResolver.resolves("definitely-not-a-real-program-4711"));
    }

    #[test]
    fn test_search_path_resolver_without_extra_dirs() {
        let resolver = SearchPathResolver::new(Vec::new());
        assert!(resolver.resolves("sh"));
    }

    #[cfg(unix)]
    #[test]
    fn test_search_path_resolver_extra_dir() {
        use std::fs;
        use std::os::unix::fs::PermissionsExt;
        use tempfile::TempDir;

        let dir = TempDir::new().unwrap();
        let tool = dir.path().join("harvest-avr-gcc-4711");
        fs::write(&tool, "#!/bin/sh\nexit 0\n").unwrap();
        fs::set_permissions(&tool, fs::Permissions::from_mode(0o755)).unwrap();

        let resolver = SearchPathResolver::new(vec![dir.path().to_path_buf()]);
        assert!(resolver.resolves("harvest-avr-gcc-4711"));
        assert!(resolver.resolves(&tool.display().to_string()));
        assert!(!resolver.resolves("harvest-avr-gcc-missing"));
        assert!(resolver.resolves("sh"));

        assert!(!PathResolver.resolves("harvest-avr-gcc-4711"));
    }
}
