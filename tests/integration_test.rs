use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

const SIZES: [u32; 6] = [512, 256, 128, 64, 32, 16];

/// Runs the generator into `out_dir` and panics with full output on failure.
fn run_generator(out_dir: &Path, extra_args: &[&str]) -> Output {
    let output = Command::new(icon_gen_binary())
        .arg("-o")
        .arg(out_dir)
        .args(extra_args)
        .output()
        .expect("Failed to run krigzis-icon-gen");

    if !output.status.success() {
        eprintln!("Command failed with status: {}", output.status);
        eprintln!("stdout: {}", String::from_utf8_lossy(&output.stdout));
        eprintln!("stderr: {}", String::from_utf8_lossy(&output.stderr));
        panic!("krigzis-icon-gen command failed");
    }

    output
}

/// Gets the path to the krigzis-icon-gen binary built for this test run.
fn icon_gen_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_krigzis-icon-gen"))
}

#[test]
fn generates_every_size_with_exact_dimensions() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let out_dir = temp_dir.path().join("assets");

    run_generator(&out_dir, &[]);

    for size in SIZES {
        let path = out_dir.join(format!("icon_{size}x{size}.png"));
        assert!(path.exists(), "missing {}", path.display());

        let img = image::open(&path)
            .unwrap_or_else(|e| panic!("Failed to load {}: {e}", path.display()));
        assert_eq!(img.width(), size, "width of {}", path.display());
        assert_eq!(img.height(), size, "height of {}", path.display());
    }
}

#[test]
fn primary_duplicates_are_byte_identical() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let out_dir = temp_dir.path().join("assets");

    run_generator(&out_dir, &[]);

    let primary = std::fs::read(out_dir.join("icon_512x512.png")).expect("primary missing");
    let main_icon = std::fs::read(out_dir.join("icon.png")).expect("icon.png missing");
    let retina = std::fs::read(out_dir.join("icon@2x.png")).expect("icon@2x.png missing");

    assert_eq!(primary, main_icon, "icon.png differs from icon_512x512.png");
    assert_eq!(primary, retina, "icon@2x.png differs from icon_512x512.png");
}

#[test]
fn rerun_into_existing_directory_is_deterministic() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let out_dir = temp_dir.path().join("assets");

    run_generator(&out_dir, &[]);
    let first = std::fs::read(out_dir.join("icon.png")).expect("icon.png missing");

    // Second run must survive the already-existing directory and overwrite
    // every file with identical content.
    run_generator(&out_dir, &[]);
    let second = std::fs::read(out_dir.join("icon.png")).expect("icon.png missing after rerun");

    assert_eq!(first, second, "rerun produced different bytes");
}

#[test]
fn custom_letter_and_colors_are_accepted() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let out_dir = temp_dir.path().join("assets");

    run_generator(
        &out_dir,
        &[
            "--letter",
            "z",
            "--edge-color",
            "#ff8800",
            "--center-color",
            "#002266",
        ],
    );

    let img = image::open(out_dir.join("icon_512x512.png")).expect("Failed to load 512x512 icon");
    assert_eq!((img.width(), img.height()), (512, 512));

    // The outermost gradient band must carry the requested edge color, not
    // the default teal.
    let rgba = img.to_rgba8();
    let radius = (512.0_f32 * 0.45) as u32;
    let edge_pixel = rgba.get_pixel(256 + radius - 1, 256);
    assert_eq!(edge_pixel.0, [0xFF, 0x88, 0x00, 0xFF]);
}

#[test]
fn output_set_is_complete() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let out_dir = temp_dir.path().join("assets");

    run_generator(&out_dir, &[]);

    let mut expected: Vec<String> = SIZES
        .iter()
        .map(|size| format!("icon_{size}x{size}.png"))
        .collect();
    expected.push("icon.png".to_string());
    expected.push("icon@2x.png".to_string());

    for name in &expected {
        assert!(out_dir.join(name).exists(), "missing {name}");
    }

    let produced = std::fs::read_dir(&out_dir)
        .expect("Failed to list output directory")
        .count();
    assert_eq!(produced, expected.len(), "unexpected extra files in output");
}
