//! Layering guardrails: only the CLI and the console reporter talk to the terminal.
//!
//! The library modules report through `WalkReporter`. This test scans their
//! non-test source and fails if a print macro appears.

const LIBRARY_SOURCES: &[(&str, &str)] = &[
    ("src/filter.rs", include_str!("../src/filter.rs")),
    ("src/runner.rs", include_str!("../src/runner.rs")),
    ("src/config.rs", include_str!("../src/config.rs")),
    ("src/walker.rs", include_str!("../src/walker.rs")),
];

const PRINT_MACROS: &[&str] = &["println!", "print!", "eprintln!", "eprint!", "dbg!"];

#[test]
fn library_modules_do_not_print() {
    for (name, source) in LIBRARY_SOURCES {
        // Everything after the test module is test code.
        let production = source.split("#[cfg(test)]").next().unwrap_or("");

        for (lineno, raw_line) in production.lines().enumerate() {
            let line = raw_line.trim();
            if line.starts_with("//") {
                continue;
            }
            for mac in PRINT_MACROS {
                assert!(
                    !line.contains(mac),
                    "{}:{} uses `{}`; route output through WalkReporter instead",
                    name,
                    lineno + 1,
                    mac
                );
            }
        }
    }
}

#[test]
fn library_does_not_depend_on_dev_only_crates() {
    let manifest = include_str!("../Cargo.toml");
    let mut in_dependencies = false;

    for raw_line in manifest.lines() {
        let line = raw_line.trim();
        // Track when we enter/exit the `[dependencies]` table.
        if line.starts_with('[') {
            in_dependencies = line == "[dependencies]";
            continue;
        }

        if !in_dependencies || line.is_empty() || line.starts_with('#') {
            continue;
        }

        let line_no_comment = line.split('#').next().unwrap_or("").trim();
        for dev_only in ["tempfile", "insta", "proptest"] {
            assert!(
                !line_no_comment.starts_with(dev_only),
                "`{}` must stay in [dev-dependencies]",
                dev_only
            );
        }
    }
}
