use std::{
    fs,
    path::{Path, PathBuf},
};

use tempfile::tempdir;

use pscircle::PscircleError;
use pscircle_cli::{Args, run};

/// Sample listings live at the workspace root, not in the crate
fn demos_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("demos")
}

/// Collects all .txt files from a directory
fn collect_listings(dir: PathBuf) -> Vec<PathBuf> {
    let mut files = if let Ok(entries) = fs::read_dir(&dir) {
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("txt")
            })
            .collect()
    } else {
        Vec::new()
    };

    // Sort for consistent test output
    files.sort();
    files
}

fn args(input: &Path, output: &Path, config: Option<&Path>) -> Args {
    Args {
        input: Some(input.to_string_lossy().to_string()),
        output: Some(output.to_string_lossy().to_string()),
        config: config.map(|path| path.to_string_lossy().to_string()),
        log_level: "off".to_string(),
    }
}

#[test]
fn e2e_smoke_test_valid_listings() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let listings = collect_listings(demos_dir());

    assert!(!listings.is_empty(), "No listings found in demos/");

    let mut failed = Vec::new();

    for listing in &listings {
        let output_path = temp_dir.path().join(format!(
            "{}.report",
            listing.file_stem().unwrap().to_string_lossy()
        ));

        match run(&args(listing, &output_path, None)) {
            Ok(()) => {
                let report = fs::read_to_string(&output_path).expect("Report must be written");
                assert!(
                    report.contains("# pid depth x angle radius name"),
                    "{}: {report}",
                    listing.display()
                );
            }
            Err(err) => failed.push((listing.clone(), err)),
        }
    }

    if !failed.is_empty() {
        eprintln!("\nListings that failed:");
        for (path, err) in &failed {
            eprintln!("  - {}: {}", path.display(), err);
        }
        panic!("{} listing(s) failed unexpectedly", failed.len());
    }
}

#[test]
fn e2e_smoke_test_error_listings() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let listings = collect_listings(demos_dir().join("errors"));

    assert!(!listings.is_empty(), "No error listings found in demos/errors/");

    for listing in &listings {
        let output_path = temp_dir.path().join("unexpected.report");

        match run(&args(listing, &output_path, None)) {
            Err(PscircleError::Stream(_)) => {}
            other => panic!(
                "{} should fail with a stream error, got {other:?}",
                listing.display()
            ),
        }
        assert!(!output_path.exists(), "{}", listing.display());
    }
}

#[test]
fn e2e_explicit_config() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "[process]\nmax_children = 1\n").unwrap();

    let output_path = temp_dir.path().join("server.report");
    let listing = demos_dir().join("server.txt");

    run(&args(&listing, &output_path, Some(&config_path))).expect("Failed to run");

    let report = fs::read_to_string(&output_path).unwrap();
    assert!(report.contains("omitted>"), "{report}");
}

#[test]
fn e2e_missing_input() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = temp_dir.path().join("absent.txt");
    let output_path = temp_dir.path().join("absent.report");

    let result = run(&args(&input, &output_path, None));
    assert!(matches!(result, Err(PscircleError::Io(_))), "{result:?}");
}
