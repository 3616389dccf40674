use std::{fs, path::Path};

use tempfile::tempdir;

use archgram::ArchgramError;

use archgram_cli::{Args, run};

fn args_for(output_dir: &Path) -> Args {
    Args {
        output_dir: output_dir.to_string_lossy().to_string(),
        log_level: "off".to_string(),
        ..Args::default()
    }
}

/// Writes a configuration file so the run does not pick up one from the
/// local or platform directories.
fn write_config(dir: &Path, content: &str) -> String {
    let path = dir.join("config.toml");
    fs::write(&path, content).expect("Failed to write config");
    path.to_string_lossy().to_string()
}

fn written_files(dir: &Path) -> Vec<String> {
    let mut files: Vec<String> = fs::read_dir(dir)
        .expect("Failed to read output directory")
        .flatten()
        .map(|entry| entry.file_name().to_string_lossy().to_string())
        .filter(|name| name != "config.toml")
        .collect();
    files.sort();
    files
}

#[test]
fn e2e_smoke_test_default_svg() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let args = Args {
        config: Some(write_config(temp_dir.path(), "")),
        ..args_for(temp_dir.path())
    };

    let path = run(&args).expect("Default run should succeed");

    assert_eq!(path, temp_dir.path().join("aws_vpc_architecture.svg"));
    assert_eq!(written_files(temp_dir.path()), vec!["aws_vpc_architecture.svg"]);

    let svg = fs::read_to_string(&path).unwrap();
    assert!(svg.contains("<svg"));
    for label in [
        "AWS VPC Architecture",
        "Network Firewall",
        "Security Group: SGBastion",
        "Postgres port",
        "port 6443",
        "SSH",
        "Mailgun",
    ] {
        assert!(svg.contains(label), "missing `{label}` in rendered SVG");
    }
}

#[test]
fn e2e_smoke_test_every_engine_and_direction() {
    for engine in ["basic", "sugiyama"] {
        for direction in ["LR", "RL", "TB", "BT"] {
            let temp_dir = tempdir().expect("Failed to create temp directory");
            let config = format!("[layout]\nengine = \"{engine}\"\nedge_style = \"orthogonal\"\n");
            let args = Args {
                direction: Some(direction.to_string()),
                config: Some(write_config(temp_dir.path(), &config)),
                ..args_for(temp_dir.path())
            };

            if let Err(err) = run(&args) {
                panic!("{engine} / {direction} failed: {err}");
            }
            assert!(temp_dir.path().join("aws_vpc_architecture.svg").exists());
        }
    }
}

#[cfg(feature = "graphviz")]
#[test]
fn e2e_smoke_test_dot() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let args = Args {
        format: "dot".to_string(),
        config: Some(write_config(temp_dir.path(), "")),
        ..args_for(temp_dir.path())
    };

    let path = run(&args).expect("DOT run should succeed");
    assert_eq!(path, temp_dir.path().join("aws_vpc_architecture.dot"));

    let dot = fs::read_to_string(&path).unwrap();
    assert!(dot.contains("digraph"));
    assert!(dot.contains("rankdir=LR"));
    assert_eq!(dot.matches("subgraph cluster_").count(), 7);
}

#[test]
fn e2e_smoke_test_invalid_arguments() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let bad_format = Args {
        format: "gif".to_string(),
        ..args_for(temp_dir.path())
    };
    assert!(run(&bad_format).is_err());

    let bad_direction = Args {
        direction: Some("diagonal".to_string()),
        ..args_for(temp_dir.path())
    };
    assert!(run(&bad_direction).is_err());

    let missing_config = Args {
        config: Some(temp_dir.path().join("absent.toml").to_string_lossy().to_string()),
        ..args_for(temp_dir.path())
    };
    assert!(run(&missing_config).is_err());

    let missing_dir = Args {
        config: Some(write_config(temp_dir.path(), "")),
        ..args_for(&temp_dir.path().join("absent"))
    };
    assert!(run(&missing_dir).is_err());

    for config in ["[style]\nfont_size = 0\n", "[layout]\nrank_spacing = -500.0\n"] {
        let out_of_range = Args {
            config: Some(write_config(temp_dir.path(), config)),
            ..args_for(temp_dir.path())
        };
        assert!(
            matches!(run(&out_of_range), Err(ArchgramError::Config(_))),
            "{config:?} should be rejected"
        );
    }

    assert!(written_files(temp_dir.path()).is_empty());
}
