use mf6input::parser::parse_package;
use mf6input::{Error, How, LoadContext, Package, PerLayer, SchemaRegistry, Value, writer};
use std::io::Write;

const DIS: &str = "\
# structured grid
BEGIN OPTIONS
  LENGTH_UNITS meters
END OPTIONS

BEGIN DIMENSIONS
  NLAY 2
  NROW 2
  NCOL 3
END DIMENSIONS

BEGIN GRIDDATA
  DELR
    CONSTANT 100.0
  DELC
    INTERNAL
      50.0 60.0
  TOP
    INTERNAL FACTOR 1.0
      10.0 10.0 10.0
      11.0 11.0 11.0
  BOTM LAYERED
    CONSTANT 0.0
    OPEN/CLOSE botm2.dat
END GRIDDATA
";

#[test]
fn dis_shapes_come_from_dimensions() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("botm2.dat"), "-5 -5 -5\n-6 -6 -6\n").unwrap();

    let registry = SchemaRegistry::builtin();
    let dis = registry.get("dis").unwrap();
    let package = parse_package(DIS, dis, &LoadContext::new(dir.path())).unwrap();

    assert_eq!(package.get("length_units"), Some(&Value::String("meters".into())));
    let options = package.block("options").unwrap();
    assert_eq!(options.get("xorigin"), None);
    assert_eq!(options.get_or_default("xorigin"), Some(&Value::Double(0.0)));

    let array = |name: &str| package.get(name).and_then(Value::as_array).unwrap().clone();
    assert_eq!(array("delr").shape(), &[3]);
    assert_eq!(array("delc").shape(), &[2]);
    assert_eq!(array("top").shape(), &[2, 3]);

    let botm = array("botm");
    assert_eq!(botm.shape(), &[2, 2, 3]);
    assert_eq!(botm.how(), PerLayer::Layered(vec![How::Constant, How::External]));
    assert_eq!(botm.min().unwrap(), -6.0);
    assert!(package.get("idomain").is_none());

    // write, reload, compare
    let text = writer::to_string(&package).unwrap();
    let reloaded = parse_package(&text, dis, &LoadContext::new(dir.path())).unwrap();
    assert_eq!(reloaded, package);
}

#[test]
fn dis_from_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("botm2.dat"), "-5 -5 -5 -6 -6 -6").unwrap();
    let path = dir.path().join("model.dis");
    std::fs::File::create(&path)
        .unwrap()
        .write_all(DIS.as_bytes())
        .unwrap();

    let registry = SchemaRegistry::builtin();
    let package = Package::load_path(&path, registry.get("dis").unwrap()).unwrap();
    let botm = package.get("botm").and_then(Value::as_array).unwrap();
    assert_eq!(botm.layers().unwrap()[1].raw_values().unwrap(), vec![-5.0, -5.0, -5.0, -6.0, -6.0, -6.0]);

    let mut out = Vec::new();
    package.write(&mut out).unwrap();
    let out = String::from_utf8(out).unwrap();
    assert!(out.starts_with("BEGIN OPTIONS\n  LENGTH_UNITS meters\nEND OPTIONS\n\nBEGIN DIMENSIONS\n"));
    assert!(out.contains("  BOTM LAYERED\n      CONSTANT 0.0\n      OPEN/CLOSE botm2.dat\n"));
}

#[test]
fn griddata_without_dimensions_fails() {
    let registry = SchemaRegistry::builtin();
    let text = "BEGIN GRIDDATA\n  DELR\n    CONSTANT 1.0\nEND GRIDDATA\n";
    let err = parse_package(text, registry.get("dis").unwrap(), &LoadContext::default())
        .unwrap_err();
    assert!(matches!(err, Error::UnresolvedShape { ref param } if param == "delr"));
}

#[test]
fn missing_required_dimension_aborts_load() {
    let registry = SchemaRegistry::builtin();
    let text = "BEGIN DIMENSIONS\n  NLAY 1\n  NROW 1\nEND DIMENSIONS\n";
    let err = parse_package(text, registry.get("dis").unwrap(), &LoadContext::default())
        .unwrap_err();
    assert!(matches!(err, Error::MissingRequiredParameter { ref name, .. } if name == "ncol"));
}
