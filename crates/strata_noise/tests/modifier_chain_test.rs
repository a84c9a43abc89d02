//! # Modifier Chain Tests
//!
//! Loads noise libraries the way a world config does (TOML) and checks that
//! modifier chains are validated and evaluated deterministically.

use strata_noise::{
    FractalParameter, ModifierOp, NoiseError, NoiseLibrary, SignFilter, WorldSeed,
};

const LIBRARY: &str = r#"
[fields.surface]
amplitude = 12.0
frequency = 6.0
octaves = 4
lacunarity = 2.0
persistence = 0.5

[fields.surface.modifiers.amplitude]
field = "hills"
op = "Multiply"
gate = "Neither"

[fields.surface.modifiers.frequency]
field = "roughness"
op = "Add"
gate = "Negative"
ignore_amplitude = true

[fields.hills]
amplitude = 3.0
frequency = 2.0
discard = "Negative"

[fields.roughness]
amplitude = 5.0
frequency = 40.0
invert = true
"#;

fn library() -> NoiseLibrary {
    toml::from_str(LIBRARY).expect("library should parse")
}

/// Test: TOML maps onto the config types, unspecified keys take defaults.
#[test]
fn test_library_parses() {
    let library = library();
    assert_eq!(library.len(), 3);

    let surface = library.get("surface").unwrap();
    assert_eq!(surface.octaves, 4);
    assert_eq!(surface.weighted_strength, 1.0);
    assert_eq!(surface.discard, SignFilter::Neither);

    let amplitude = surface.modifiers.get(FractalParameter::Amplitude);
    assert_eq!(amplitude.field.as_deref(), Some("hills"));
    assert_eq!(amplitude.op, ModifierOp::Multiply);

    // Untouched slots keep the closed default gate
    let octaves = surface.modifiers.get(FractalParameter::Octaves);
    assert!(octaves.field.is_none());
    assert_eq!(octaves.gate, SignFilter::Both);

    assert!(library.validate().is_ok());
}

/// Test: a chained field samples identically across runs and handles.
#[test]
fn test_chain_is_deterministic() {
    let seed = WorldSeed::new(98_765);
    let first = library();
    let second = library();
    let a = first.field("surface").unwrap();
    let b = second.field("surface").unwrap();

    for x in -128..128 {
        let x = f64::from(x);
        assert_eq!(
            a.sample(x, 0.0, seed, false).unwrap(),
            b.sample(x, 0.0, seed, false).unwrap()
        );
    }
}

/// Test: the hills modifier never pushes surface amplitude negative,
/// since hills discards its negative output.
#[test]
fn test_discarded_modifier_keeps_amplitude_sign() {
    let library = library();
    let surface = library.field("surface").unwrap();
    let seed = WorldSeed::default();

    for x in -256..256 {
        let params = surface.resolve(f64::from(x), 0.0, seed).unwrap();
        assert!(params.amplitude >= 0.0, "amplitude {} at x={x}", params.amplitude);
    }
}

/// Test: broken TOML graphs are rejected before any sampling.
#[test]
fn test_cyclic_toml_rejected() {
    let library: NoiseLibrary = toml::from_str(
        r#"
        [fields.a.modifiers.persistence]
        field = "b"
        gate = "Neither"

        [fields.b.modifiers.octaves]
        field = "a"
        gate = "Neither"
        "#,
    )
    .unwrap();

    assert!(matches!(library.validate(), Err(NoiseError::CycleDetected(_))));
    assert!(matches!(library.field("a"), Err(NoiseError::CycleDetected(_))));
}

/// Test: a slot naming a missing field is reported with its parameter.
#[test]
fn test_dangling_reference_rejected() {
    let library: NoiseLibrary = toml::from_str(
        r#"
        [fields.surface.modifiers.weighted_strength]
        field = "missing"
        "#,
    )
    .unwrap();

    let err = library.field("surface").unwrap_err();
    assert_eq!(
        err,
        NoiseError::UnknownModifierTarget {
            field: "surface".into(),
            parameter: FractalParameter::WeightedStrength,
            target: "missing".into(),
        }
    );
    assert!(err.to_string().contains("missing"));
}
