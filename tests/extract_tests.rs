use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use sherpa_onnx_stt_lib::stt::{
    extract_asset, resolve_model_dir, AssetStore, ExtractError, ModelPathConfig, PathSource,
};

fn scratch(label: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "{label}_{}",
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

fn write_asset(assets: &PathBuf, logical: &str, contents: &[u8]) {
    let path = assets.join(logical);
    fs::create_dir_all(path.parent().unwrap()).expect("parent should be creatable");
    fs::write(path, contents).expect("asset write should succeed");
}

#[test]
fn file_extraction_copies_once_and_short_circuits_afterwards() {
    let base = scratch("extract_file_idempotent");
    let assets = base.join("assets");
    let root = base.join("extracted");
    write_asset(&assets, "test_wavs/0-en.wav", b"RIFFwavedata");
    let store = AssetStore::new(&assets);

    let first = extract_asset(&store, &root, "test_wavs/0-en.wav")
        .expect("first extraction should succeed");
    assert_eq!(first, root.join("test_wavs").join("0-en.wav"));
    assert_eq!(fs::read(&first).unwrap(), b"RIFFwavedata");

    // Removing the source proves the second call never reads the namespace.
    fs::remove_dir_all(&assets).unwrap();
    let second = extract_asset(&store, &root, "test_wavs/0-en.wav")
        .expect("short-circuit must not touch the asset namespace");
    assert_eq!(first, second);

    let _ = fs::remove_dir_all(&base);
}

#[test]
fn directory_extraction_mirrors_nested_subdirectories() {
    let base = scratch("extract_dir_nested");
    let assets = base.join("assets");
    let root = base.join("extracted");
    write_asset(&assets, "models/zipformer-small-en/tokens.txt", b"tokens");
    write_asset(&assets, "models/zipformer-small-en/encoder.onnx", b"enc");
    write_asset(
        &assets,
        "models/zipformer-small-en/test_wavs/0.wav",
        b"wav0",
    );
    write_asset(
        &assets,
        "models/zipformer-small-en/test_wavs/deep/1.wav",
        b"wav1",
    );
    let store = AssetStore::new(&assets);

    let extracted = extract_asset(&store, &root, "models/zipformer-small-en")
        .expect("directory extraction should succeed");

    for leaf in [
        "tokens.txt",
        "encoder.onnx",
        "test_wavs/0.wav",
        "test_wavs/deep/1.wav",
    ] {
        assert!(
            extracted.join(leaf).is_file(),
            "leaf {leaf} missing from mirrored tree"
        );
    }

    // The extracted copy must satisfy a plain file-type resolution.
    let config = ModelPathConfig::new(PathSource::File, extracted.to_string_lossy());
    resolve_model_dir(&store, &root, &config)
        .expect("extracted directory should resolve as a file path");

    // Re-running after the source is gone returns the same directory.
    fs::remove_dir_all(&assets).unwrap();
    let again = extract_asset(&store, &root, "models/zipformer-small-en")
        .expect("short-circuit on existing directory");
    assert_eq!(extracted, again);

    let _ = fs::remove_dir_all(&base);
}

#[test]
fn empty_nested_directories_are_mirrored() {
    let base = scratch("extract_empty_dir");
    let assets = base.join("assets");
    let root = base.join("extracted");
    write_asset(&assets, "models/m/tokens.txt", b"tokens");
    fs::create_dir_all(assets.join("models/m/empty")).unwrap();
    let store = AssetStore::new(&assets);

    let extracted = extract_asset(&store, &root, "models/m").expect("extraction should succeed");
    assert!(extracted.join("empty").is_dir());

    let _ = fs::remove_dir_all(&base);
}

#[test]
fn single_segment_path_lands_in_the_default_bucket() {
    let base = scratch("extract_default_bucket");
    let assets = base.join("assets");
    let root = base.join("extracted");
    write_asset(&assets, "standalone-model/tokens.txt", b"tokens");
    let store = AssetStore::new(&assets);

    let extracted =
        extract_asset(&store, &root, "standalone-model").expect("extraction should succeed");

    assert_eq!(extracted, root.join("models").join("standalone-model"));
    assert!(extracted.join("tokens.txt").is_file());

    let _ = fs::remove_dir_all(&base);
}

#[test]
fn missing_directory_asset_fails_without_creating_the_target() {
    let base = scratch("extract_missing_dir");
    let assets = base.join("assets");
    let root = base.join("extracted");
    fs::create_dir_all(&assets).unwrap();
    let store = AssetStore::new(&assets);

    let err = extract_asset(&store, &root, "models/missing-model")
        .expect_err("missing asset must fail");

    assert!(matches!(err, ExtractError::AssetNotFound { .. }));
    assert!(
        !root.join("models").join("missing-model").exists(),
        "a failed lookup must not leave a target directory behind"
    );

    let _ = fs::remove_dir_all(&base);
}

#[test]
fn missing_file_asset_triggers_parent_recovery_and_reports_both_causes() {
    let base = scratch("extract_parent_recovery");
    let assets = base.join("assets");
    let root = base.join("extracted");
    write_asset(&assets, "models/real.onnx", b"weights");
    let store = AssetStore::new(&assets);

    let err = extract_asset(&store, &root, "models/other.onnx")
        .expect_err("the requested leaf does not exist anywhere");

    match &err {
        ExtractError::MissingAfterRecovery { asset, .. } => {
            assert_eq!(asset, "models/other.onnx");
        }
        other => panic!("expected MissingAfterRecovery, got: {other}"),
    }
    let message = err.to_string();
    assert!(message.contains("models/other.onnx"));
    assert!(message.contains("direct copy failed"));

    // Parent recovery mirrored the siblings before giving up.
    assert!(root.join("models").join("real.onnx").is_file());

    let _ = fs::remove_dir_all(&base);
}

#[test]
fn single_segment_file_with_no_parent_fails_with_copy_error() {
    let base = scratch("extract_lonely_file");
    let assets = base.join("assets");
    let root = base.join("extracted");
    fs::create_dir_all(&assets).unwrap();
    let store = AssetStore::new(&assets);

    let err = extract_asset(&store, &root, "ghost.wav")
        .expect_err("missing single-segment file must fail");

    assert!(matches!(err, ExtractError::Copy { .. }));

    let _ = fs::remove_dir_all(&base);
}

#[test]
fn mirroring_skips_leaves_that_already_exist() {
    let base = scratch("extract_copy_if_absent");
    let assets = base.join("assets");
    let root = base.join("extracted");
    write_asset(&assets, "models/real.onnx", b"weights");
    write_asset(&assets, "models/existing.onnx", b"new contents");
    let store = AssetStore::new(&assets);

    // A previous partial run already materialized one leaf.
    fs::create_dir_all(root.join("models")).unwrap();
    fs::write(root.join("models").join("existing.onnx"), b"keep").unwrap();

    // The requested leaf exists nowhere, so parent recovery mirrors the
    // bucket; the pre-existing leaf must not be overwritten.
    let err = extract_asset(&store, &root, "models/ghost.onnx")
        .expect_err("the requested leaf does not exist");
    assert!(matches!(err, ExtractError::MissingAfterRecovery { .. }));

    assert_eq!(
        fs::read(root.join("models").join("existing.onnx")).unwrap(),
        b"keep",
        "copy-if-absent must leave existing leaves alone"
    );
    assert!(root.join("models").join("real.onnx").is_file());

    let _ = fs::remove_dir_all(&base);
}
