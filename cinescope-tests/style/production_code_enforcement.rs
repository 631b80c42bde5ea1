//! Production Code Enforcement
//!
//! Production code propagates errors instead of panicking on them and does not
//! silence dead code warnings. `#[cfg(test)]` items, test-only mock modules
//! and this test crate are exempt.

use std::fs;
use std::path::{Path, PathBuf};

/// Forbidden fragments and why they are rejected.
const FORBIDDEN: &[(&str, &str)] = &[
    (".unwrap()", "propagate the error or handle the None case"),
    (".expect(", "propagate the error with context instead of panicking"),
];

const DEAD_CODE_HINT: &str = "remove unused code instead of hiding it";

/// A forbidden pattern found in production code
#[derive(Debug)]
struct Violation {
    file_path: String,
    line_number: usize,
    context: String,
    hint: &'static str,
}

/// Checker for forbidden patterns in production code
struct ProductionCodeChecker {
    violations: Vec<Violation>,
    files_checked: usize,
}

impl ProductionCodeChecker {
    fn new() -> Self {
        Self {
            violations: Vec::new(),
            files_checked: 0,
        }
    }

    /// Source files of every `cinescope-*` crate except this one
    fn find_rust_files(&self) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
        let mut files = Vec::new();
        for entry in fs::read_dir("..")? {
            let path = entry?.path();
            let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
                continue;
            };
            if !name.starts_with("cinescope-") || name == "cinescope-tests" {
                continue;
            }
            Self::find_rust_files_recursive(&path.join("src"), &mut files, 0)?;
        }
        Ok(files)
    }

    fn find_rust_files_recursive(
        dir: &Path,
        files: &mut Vec<PathBuf>,
        depth: usize,
    ) -> Result<(), Box<dyn std::error::Error>> {
        if depth > 10 || !dir.is_dir() {
            return Ok(());
        }

        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_dir() {
                Self::find_rust_files_recursive(&path, files, depth + 1)?;
            } else if path.extension().is_some_and(|ext| ext == "rs") {
                files.push(path);
            }
        }
        Ok(())
    }

    /// Files that only exist for tests
    fn is_test_file(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy().to_lowercase();
        path_str.ends_with("mock.rs")
            || path_str.ends_with("_test.rs")
            || path_str.ends_with("tests.rs")
            || path_str.contains("/tests/")
    }

    fn check_file(&mut self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        if self.is_test_file(path) {
            return Ok(());
        }

        let content = fs::read_to_string(path)?;
        self.files_checked += 1;
        let found = scan_source(&path.to_string_lossy(), &content);
        self.violations.extend(found);
        Ok(())
    }

    fn check_workspace(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        for file in self.find_rust_files()? {
            self.check_file(&file)?;
        }
        Ok(())
    }

    /// Report violations and return whether the check passed
    fn report_violations(&self) -> bool {
        if self.violations.is_empty() {
            println!(
                "Production code enforcement: {} files checked, no violations found",
                self.files_checked
            );
            return true;
        }

        println!("Production code violations found:");
        println!();
        for violation in &self.violations {
            println!("{}:{}", violation.file_path, violation.line_number);
            println!("  {}", violation.context.trim());
            println!("  hint: {}", violation.hint);
            println!();
        }
        println!(
            "Found {} violation(s) in {} file(s) checked",
            self.violations.len(),
            self.files_checked
        );

        false
    }
}

/// Scans one source file, skipping comments and `#[cfg(test)]` items.
fn scan_source(file_path: &str, content: &str) -> Vec<Violation> {
    let mut violations = Vec::new();
    let mut skip_next_item = false;
    let mut test_depth: Option<i32> = None;

    for (index, line) in content.lines().enumerate() {
        let trimmed = line.trim();

        if let Some(depth) = test_depth.as_mut() {
            *depth += brace_delta(trimmed);
            if *depth <= 0 && trimmed.contains('}') {
                test_depth = None;
            }
            continue;
        }

        if trimmed.starts_with("#[cfg(test)]") {
            skip_next_item = true;
            continue;
        }

        if skip_next_item {
            skip_next_item = false;
            if trimmed.ends_with(';') {
                continue;
            }
            let depth = brace_delta(trimmed);
            if depth > 0 {
                test_depth = Some(depth);
            }
            continue;
        }

        if trimmed.starts_with("//") {
            continue;
        }

        let dead_code = trimmed.contains("#[allow(") && trimmed.contains("dead_code");
        let hints = FORBIDDEN
            .iter()
            .filter(|(pattern, _)| trimmed.contains(pattern))
            .map(|(_, hint)| *hint)
            .chain(dead_code.then_some(DEAD_CODE_HINT));

        for hint in hints {
            violations.push(Violation {
                file_path: file_path.to_string(),
                line_number: index + 1,
                context: line.to_string(),
                hint,
            });
        }
    }

    violations
}

fn brace_delta(line: &str) -> i32 {
    line.chars().fold(0, |acc, c| match c {
        '{' => acc + 1,
        '}' => acc - 1,
        _ => acc,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_test_file() {
        let checker = ProductionCodeChecker::new();

        assert!(checker.is_test_file(Path::new("cinescope-search/src/mock.rs")));
        assert!(checker.is_test_file(Path::new("cinescope-search/src/tests/helpers.rs")));
        assert!(!checker.is_test_file(Path::new("cinescope-search/src/client.rs")));
        assert!(!checker.is_test_file(Path::new("cinescope-cli/src/main.rs")));
    }

    #[test]
    fn test_scan_skips_test_modules_and_comments() {
        let source = r#"
pub fn parse(input: &str) -> Option<u32> {
    // input.parse().unwrap() would panic here
    input.parse().ok()
}

#[cfg(test)]
pub(crate) mod mock;

pub fn first(items: &[u32]) -> u32 {
    *items.first().unwrap()
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_parse() {
        assert_eq!(super::parse("1").expect("number"), 1);
    }
}
"#;
        let violations = scan_source("lib.rs", source);

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].line_number, 11);
    }

    #[test]
    fn test_dead_code_allowance_detected() {
        let source = "#[allow(dead_code)]\nstruct Unused;\n#[allow(clippy::all, dead_code)]\nfn f() {}\n";
        let violations = scan_source("lib.rs", source);

        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].line_number, 1);
        assert_eq!(violations[1].line_number, 3);
    }

    #[test]
    fn production_code_enforcement() {
        let mut checker = ProductionCodeChecker::new();

        checker
            .check_workspace()
            .expect("Failed to check workspace");

        assert!(checker.files_checked > 0, "no source files found");
        assert!(
            checker.report_violations(),
            "Production code violations found - see output above"
        );
    }
}
