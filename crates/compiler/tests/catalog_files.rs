//! Loading catalogs from disk through `TranslatorConfig`

use idlpy::{MapError, MappingContext, TranslatorConfig};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const NO_KEYS: &[(&str, &str)] = &[];

fn write_catalog(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_catalog_extends_builtins() {
    let dir = TempDir::new().unwrap();
    let path = write_catalog(
        &dir,
        "mylib.toml",
        r#"
[[procedure]]
name = "READ_IMAGE"
target = "read_image"
inpars = [1]
outpars = [2]
outkeys = ["HEADER"]
extra_code = "from mylib import read_image"
"#,
    );

    let config = TranslatorConfig::new().with_catalog(&path);
    let mut ctx = MappingContext::from_config(&config).unwrap();
    assert!(ctx.lookup_routine("WHERE").is_some());

    let read = ctx.lookup_routine("read_image").unwrap();
    let call = ctx
        .synthesize_call(&read, &["'m31.fits'", "img"], &[("head", "hdr")])
        .unwrap();
    assert_eq!(call, "img, hdr = read_image('m31.fits', HEADER=True)");

    let where_ = ctx.lookup_routine("WHERE").unwrap();
    ctx.synthesize_call(&where_, &["img"], NO_KEYS).unwrap();

    let extra = ctx.drain_extra_code();
    assert!(extra.starts_with("from mylib import read_image\n\nimport sys\n"));
}

#[test]
fn test_later_catalog_replaces_earlier() {
    let dir = TempDir::new().unwrap();
    let first = write_catalog(
        &dir,
        "first.toml",
        "[[function]]\nname = \"TOTAL\"\ntarget = \"sum\"\npars = [1]\n",
    );
    let second = write_catalog(
        &dir,
        "second.toml",
        "[[function]]\nname = \"total\"\ntarget = \"numpy.sum\"\npars = [1]\n",
    );

    let config = TranslatorConfig::new()
        .without_builtins()
        .with_catalogs(vec![first, second]);
    let mut ctx = MappingContext::from_config(&config).unwrap();
    let total = ctx.lookup_routine("TOTAL").unwrap();
    assert_eq!(
        ctx.synthesize_call(&total, &["x"], NO_KEYS).unwrap(),
        "numpy.sum(x)"
    );
}

#[test]
fn test_catalog_cannot_replace_read_only_builtin() {
    let dir = TempDir::new().unwrap();
    let path = write_catalog(
        &dir,
        "bad.toml",
        "[[function]]\nname = \"keyword_set\"\npars = [1]\n",
    );

    let config = TranslatorConfig::new().with_catalog(&path);
    let err = MappingContext::from_config(&config).unwrap_err();
    assert!(matches!(err, MapError::DuplicateReadOnlyMapping { .. }));
}

#[test]
fn test_read_only_variable_in_catalog() {
    let dir = TempDir::new().unwrap();
    let path = write_catalog(
        &dir,
        "vars.toml",
        r#"
[[variable]]
name = "!DTOR"
target = "(pi / 180.0)"
extra_code = ["from math import pi"]
readonly = true

[[variable]]
name = "!dtor"
target = "0.0174"
"#,
    );

    let config = TranslatorConfig::new().with_catalog(&path);
    let err = MappingContext::from_config(&config).unwrap_err();
    assert!(err.to_string().contains("read-only mapping for variable"));
}

#[test]
fn test_malformed_catalog_file() {
    let dir = TempDir::new().unwrap();
    let path = write_catalog(&dir, "broken.toml", "[[function]\nname = ");

    let config = TranslatorConfig::new().with_catalog(&path);
    assert!(matches!(
        MappingContext::from_config(&config),
        Err(MapError::Catalog(_))
    ));
}

#[test]
fn test_definition_round_trip_with_catalog_procedure() {
    let dir = TempDir::new().unwrap();
    let path = write_catalog(
        &dir,
        "stats.toml",
        r#"
[[procedure]]
name = "MOMENTS"
inpars = [1]
outpars = [2, 3]
optional = 1
inkeys = ["DOUBLE"]
"#,
    );

    let config = TranslatorConfig::new().without_builtins().with_catalog(&path);
    let mut ctx = MappingContext::from_config(&config).unwrap();
    let moments = ctx.lookup_routine("moments").unwrap();

    let def = ctx
        .synthesize_definition(&moments, &["x", "mean", "var"], &[("DOUBLE", "dbl")])
        .unwrap();
    assert_eq!(def.header, "def MOMENTS(x, var=None, DOUBLE=None):");
    assert!(def.body.starts_with("n_params = 3 - [var].count(None)\nmean = None\ndbl = DOUBLE\n"));

    let call = ctx
        .synthesize_call(&moments, &["data", "m"], &[("d", "1")])
        .unwrap();
    assert_eq!(call, "m = MOMENTS(data, DOUBLE=1)");
}
