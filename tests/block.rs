use mf6input::parser::{LineCursor, load_block, parse_block};
use mf6input::writer::block_to_string;
use mf6input::{BlockSpec, Error, How, LoadContext, ParameterSpec, PerLayer, ShapeSpec, Value};
use std::path::Path;
use std::sync::Arc;

fn options() -> Arc<BlockSpec> {
    Arc::new(BlockSpec::new(
        "options",
        vec![
            ParameterSpec::keyword("k"),
            ParameterSpec::integer("i"),
            ParameterSpec::double("d"),
            ParameterSpec::string("s").required(),
            ParameterSpec::filepath("f"),
            ParameterSpec::record(
                "r",
                vec![
                    ParameterSpec::keyword("rk"),
                    ParameterSpec::integer("ri").tagged(),
                    ParameterSpec::double("rd").tagged(),
                ],
            ),
            ParameterSpec::array("a", ShapeSpec::Fixed(vec![3])),
        ],
    ))
}

fn period() -> Arc<BlockSpec> {
    Arc::new(BlockSpec::new(
        "period",
        vec![ParameterSpec::keystring(
            "ocsetting",
            vec![
                ParameterSpec::keyword("all"),
                ParameterSpec::keyword("first"),
                ParameterSpec::integer("frequency"),
            ],
        )],
    ))
}

#[test]
fn full_options_block() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.dat"), "1.0\n2.0\n3.0\n").unwrap();
    let text = "\
BEGIN OPTIONS
  K
  I 1
  D 1.0
  S value
  F FILEIN model.nam
  R RK RI 2 RD 2.0
  A
    OPEN/CLOSE a.dat FACTOR 2.0
END OPTIONS
";
    let ctx = LoadContext::new(dir.path());
    let block = parse_block(text, &options(), &ctx).unwrap();

    assert_eq!(block.get("k"), Some(&Value::Keyword(true)));
    assert_eq!(block.get("I"), Some(&Value::Integer(1)));
    assert_eq!(block.get("f").and_then(Value::as_path), Some(Path::new("model.nam")));
    assert_eq!(block.get("r").and_then(|r| r.get("ri")), Some(&Value::Integer(2)));

    let a = block.get("a").and_then(Value::as_array).unwrap();
    assert_eq!(a.how(), PerLayer::Single(How::External));
    assert_eq!(a.raw_values().unwrap(), vec![1.0, 2.0, 3.0]);
    assert_eq!(a.value().unwrap().to_vec(), vec![2.0, 4.0, 6.0]);

    // write then reload gives an equal block
    let written = block_to_string(&block).unwrap();
    assert!(written.contains("OPEN/CLOSE a.dat FACTOR 2.0"));
    let reloaded = parse_block(&written, &options(), &ctx).unwrap();
    assert_eq!(reloaded, block);
}

#[test]
fn written_order_follows_schema() {
    let text = "BEGIN OPTIONS\n  S value\n  A\n    CONSTANT 4\n  K\nEND OPTIONS\n";
    let block = parse_block(text, &options(), &LoadContext::default()).unwrap();
    assert_eq!(
        block_to_string(&block).unwrap(),
        "BEGIN OPTIONS\n  K\n  S value\n  A\n    CONSTANT 4.0\nEND OPTIONS\n"
    );
}

#[test]
fn indexed_blocks_load_separately() {
    let text = "\
BEGIN PERIOD 1
  FIRST
END PERIOD
BEGIN PERIOD 2
  FREQUENCY 5
  ALL
END PERIOD
";
    let spec = period();
    let ctx = LoadContext::default();
    let mut src = LineCursor::new(text);
    let first = load_block(&mut src, &spec, &ctx).unwrap().unwrap();
    let second = load_block(&mut src, &spec, &ctx).unwrap().unwrap();
    assert!(load_block(&mut src, &spec, &ctx).unwrap().is_none());

    assert_eq!(first.index(), Some(1));
    assert_eq!(second.index(), Some(2));
    assert_eq!(
        first.get("ocsetting").and_then(|v| v.get("first")),
        Some(&Value::Keyword(true))
    );
    let fields = second.get("ocsetting").and_then(Value::as_fields).unwrap();
    assert_eq!(fields.len(), 2);
    assert_eq!(fields["frequency"], Value::Integer(5));

    let reloaded = parse_block(&block_to_string(&second).unwrap(), &spec, &ctx).unwrap();
    assert_eq!(reloaded, second);
}

#[test]
fn record_may_start_with_its_keyword() {
    let text = "BEGIN OPTIONS\n  S x\n  RK RI 7\nEND OPTIONS\n";
    let block = parse_block(text, &options(), &LoadContext::default()).unwrap();
    assert_eq!(block.get("r").and_then(|r| r.get("ri")), Some(&Value::Integer(7)));
}

#[test]
fn load_errors_are_fatal() {
    let ctx = LoadContext::default();
    let err = parse_block("BEGIN OPTIONS\n  S x\n  Q 1\nEND OPTIONS\n", &options(), &ctx)
        .unwrap_err();
    assert!(matches!(err, Error::UnrecognizedParameter { ref name, line: 3, .. } if name == "Q"));

    let err = parse_block("BEGIN OPTIONS\n  K\nEND OPTIONS\n", &options(), &ctx).unwrap_err();
    assert!(matches!(err, Error::MissingRequiredParameter { ref name, .. } if name == "s"));

    let err = parse_block("BEGIN OPTIONS\n  S x\n  I one\nEND OPTIONS\n", &options(), &ctx)
        .unwrap_err();
    assert!(matches!(err, Error::NumericParse { ref token, line: 3 } if token == "one"));

    let err = parse_block(
        "BEGIN OPTIONS\n  S x\n  A\n    BINARY a.bin\nEND OPTIONS\n",
        &options(),
        &ctx,
    )
    .unwrap_err();
    assert!(matches!(err, Error::UnknownArrayRepresentation { .. }));
}

#[test]
fn set_checks_declared_type() {
    let mut block = parse_block("BEGIN OPTIONS\n  S x\nEND OPTIONS\n", &options(), &LoadContext::default())
        .unwrap();
    block.set("d", 3i64).unwrap();
    assert_eq!(block.get("d"), Some(&Value::Double(3.0)));
    assert!(matches!(block.set("i", "text"), Err(Error::TypeMismatch { .. })));
    assert!(matches!(
        block.set("nope", 1i64),
        Err(Error::UnrecognizedParameter { .. })
    ));
}
