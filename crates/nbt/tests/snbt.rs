#![allow(clippy::unwrap_used)]

use stronghold_nbt::{NbtCompound, NbtList, NbtTag, TagType};
use stronghold_nbt::snbt::{SnbtError, parse_any, parse_compound};


#[test]
fn integer_literals() {
    assert_eq!(parse_any("123b").unwrap(), NbtTag::Byte(123));
    assert_eq!(parse_any("-12345s").unwrap(), NbtTag::Short(-12345));
    assert_eq!(parse_any("+123456789").unwrap(), NbtTag::Int(123456789));
    assert_eq!(parse_any("-42").unwrap(), NbtTag::Int(-42));
    assert_eq!(parse_any("123456789012l").unwrap(), NbtTag::Long(123456789012));
    assert_eq!(parse_any("0").unwrap(), NbtTag::Int(0));
}

#[test]
fn integer_literals_wrap_to_their_width() {
    assert_eq!(parse_any("300b").unwrap(), NbtTag::Byte(44));
    assert_eq!(parse_any("32768s").unwrap(), NbtTag::Short(-32768));
    assert_eq!(parse_any("2147483648").unwrap(), NbtTag::Int(-2147483648));
    assert_eq!(
        parse_any("9223372036854775808l").unwrap(),
        NbtTag::Long(i64::MIN),
    );
}

#[test]
fn float_literals() {
    assert_eq!(parse_any("12.34f").unwrap(), NbtTag::Float(12.34));
    assert_eq!(parse_any("-12.34").unwrap(), NbtTag::Double(-12.34));
    assert_eq!(parse_any("12f").unwrap(), NbtTag::Float(12.0));
    assert_eq!(parse_any("3d").unwrap(), NbtTag::Double(3.0));
    assert_eq!(parse_any(".5").unwrap(), NbtTag::Double(0.5));
    assert_eq!(parse_any("4.").unwrap(), NbtTag::Double(4.0));
    assert_eq!(parse_any("1.5e3").unwrap(), NbtTag::Double(1500.0));
    assert_eq!(parse_any("2e-2f").unwrap(), NbtTag::Float(0.02));
    // An exponent qualifies a bare magnitude as a double
    assert_eq!(parse_any("1e5").unwrap(), NbtTag::Double(100000.0));
}

#[test]
fn boolean_literals() {
    assert_eq!(parse_any("true").unwrap(), NbtTag::Byte(1));
    assert_eq!(parse_any("false").unwrap(), NbtTag::Byte(0));
}

#[test]
fn string_literals() {
    assert_eq!(parse_any("hello.world").unwrap(), NbtTag::from("hello.world"));
    assert_eq!(parse_any("0x1p3").unwrap(), NbtTag::from("0x1p3"));
    assert_eq!(parse_any("\"spaced out\"").unwrap(), NbtTag::from("spaced out"));
    assert_eq!(parse_any("'single'").unwrap(), NbtTag::from("single"));
    assert_eq!(parse_any("\"\"").unwrap(), NbtTag::from(""));
    // A quoted number stays a string
    assert_eq!(parse_any("\"123\"").unwrap(), NbtTag::from("123"));
}

#[test]
fn string_escapes() {
    assert_eq!(parse_any(r#""a\"b""#).unwrap(), NbtTag::from("a\"b"));
    assert_eq!(parse_any(r#""a\\b""#).unwrap(), NbtTag::from("a\\b"));
    assert_eq!(parse_any(r#"'it\'s'"#).unwrap(), NbtTag::from("it's"));
    assert!(parse_any(r#""a\nb""#).is_err());
}

#[test]
fn typed_arrays() {
    assert_eq!(
        parse_any("[L; 1l, -2l, 3l]").unwrap(),
        NbtTag::LongArray(vec![1, -2, 3]),
    );
    assert_eq!(
        parse_any("[B;-128b,127b]").unwrap(),
        NbtTag::ByteArray(vec![-128, 127]),
    );
    assert_eq!(parse_any("[I; 7]").unwrap(), NbtTag::IntArray(vec![7]));
    assert_eq!(parse_any("[B;]").unwrap(), NbtTag::ByteArray(Vec::new()));
    assert_eq!(parse_any("[I;]").unwrap(), NbtTag::IntArray(Vec::new()));
    assert_eq!(parse_any("[L;]").unwrap(), NbtTag::LongArray(Vec::new()));
}

#[test]
fn lists() {
    let tag = parse_any("[1, 2, 3]").unwrap();
    let NbtTag::List(list) = &tag else {
        panic!("expected a list, found {tag}");
    };
    assert_eq!(list.element_type(), TagType::Int);
    assert_eq!(list.len(), 3);

    // The element type of an empty list defaults to Int
    let tag = parse_any("[]").unwrap();
    let NbtTag::List(list) = &tag else {
        panic!("expected a list, found {tag}");
    };
    assert_eq!(list.element_type(), TagType::Int);
    assert!(list.is_empty());

    let tag = parse_any("[[1, 2], []]").unwrap();
    let NbtTag::List(outer) = &tag else {
        panic!("expected a list, found {tag}");
    };
    assert_eq!(outer.element_type(), TagType::List);
    assert_eq!(outer.len(), 2);
}

#[test]
fn compounds() {
    let mut expected = NbtCompound::new();
    expected.insert("three", "3");
    assert_eq!(parse_compound("{three:\"3\"}").unwrap(), expected);

    assert_eq!(parse_compound("{}").unwrap(), NbtCompound::new());

    let compound = parse_compound(
        " { name : stronghold , \"quoted key\" : 1b , nested : { depth : 2s } } ",
    )
    .unwrap();
    assert_eq!(compound.get::<&str>("name").unwrap(), "stronghold");
    assert_eq!(compound.get::<i8>("quoted key").unwrap(), 1);
    let nested: &NbtCompound = compound.get("nested").unwrap();
    assert_eq!(nested.get::<i16>("depth").unwrap(), 2);

    // Numeric-looking and empty quoted keys are still keys
    let compound = parse_compound("{123:456,\"\":0b}").unwrap();
    assert_eq!(compound.get::<i32>("123").unwrap(), 456);
    assert_eq!(compound.get::<i8>("").unwrap(), 0);
}

#[test]
fn rejected_inputs() {
    let cases: &[&str] = &[
        "",
        "123 \"and more\"",
        "\"unclosed string",
        "[[],[]",
        "[1,2,]",
        "[?;1,2,3]",
        "[I;1,2b]",
        "{",
        "{bad key:1}",
        "{:\"v\"}",
        "{k:1,noval:}",
        "[B;1,2]",
        "[L;1l,2]",
        "{k:1,,j:2}",
        "{k 1}",
        "[1;2]",
        "[\"B\"; 1b]",
    ];

    for &input in cases {
        assert!(
            parse_any(input).is_err(),
            "input {input:?} parsed but should have been rejected",
        );
    }
}

#[test]
fn rejection_reasons() {
    assert!(matches!(
        parse_any("").unwrap_err(),
        SnbtError::UnexpectedEos { .. },
    ));
    assert!(matches!(
        parse_any("123 \"and more\"").unwrap_err(),
        SnbtError::TrailingData { .. },
    ));
    assert!(matches!(
        parse_any("\"unclosed string").unwrap_err(),
        SnbtError::UnmatchedQuote { .. },
    ));
    assert!(matches!(
        parse_any("[[],[]").unwrap_err(),
        SnbtError::UnmatchedBrace { .. },
    ));
    assert!(matches!(
        parse_any("[1,2,]").unwrap_err(),
        SnbtError::TrailingComma { .. },
    ));
    assert!(matches!(
        parse_any("[?;1,2,3]").unwrap_err(),
        SnbtError::InvalidUnquotedCharacter { ch: '?', .. },
    ));
    assert!(matches!(
        parse_any("[I;1,2b]").unwrap_err(),
        SnbtError::NonHomogenousNumericList { .. },
    ));
    assert!(matches!(
        parse_any("{").unwrap_err(),
        SnbtError::UnmatchedBrace { .. },
    ));
    assert!(matches!(
        parse_any("[1,two]").unwrap_err(),
        SnbtError::NonHomogenousTagList { .. },
    ));
    assert!(matches!(
        parse_any("{a:1,}").unwrap_err(),
        SnbtError::TrailingComma { .. },
    ));
}

fn sample_tree() -> NbtTag {
    let mut doubles = NbtList::new(TagType::Double);
    doubles.push(NbtTag::Double(0.0)).unwrap();
    doubles.push(NbtTag::Double(-1.25)).unwrap();
    doubles.push(NbtTag::Double(100000.0)).unwrap();

    let mut strings = NbtList::new(TagType::String);
    strings.push("plain").unwrap();
    strings.push("with \"quotes\"").unwrap();
    strings.push("back\\slash").unwrap();
    strings.push("ÅÄÖ").unwrap();
    strings.push("true").unwrap();

    let mut inner = NbtCompound::new();
    inner.insert("byte", NbtTag::Byte(-1));
    inner.insert("short", NbtTag::Short(-300));
    inner.insert("long", NbtTag::Long(i64::MIN));
    inner.insert("float", NbtTag::Float(0.5));
    inner.insert("key with space", NbtTag::Int(1));
    inner.insert("empty list", NbtList::new(TagType::Int));
    inner.insert("empty compound", NbtCompound::new());

    let mut root = NbtCompound::new();
    root.insert("doubles", doubles);
    root.insert("strings", strings);
    root.insert("inner", inner);
    root.insert("bytes", NbtTag::ByteArray(vec![-128, 0, 127]));
    root.insert("ints", NbtTag::IntArray(vec![i32::MIN, 0, i32::MAX]));
    root.insert("longs", NbtTag::LongArray(vec![i64::MIN, 0, i64::MAX]));
    NbtTag::Compound(root)
}

#[test]
fn print_parse_round_trip() {
    let tree = sample_tree();
    assert_eq!(parse_any(&tree.to_snbt()).unwrap(), tree);
    assert_eq!(parse_any(&tree.to_pretty_snbt()).unwrap(), tree);
    assert_eq!(parse_any(&tree.to_snbt_sorted()).unwrap(), tree);
}

#[test]
fn parse_print_parse_is_stable() {
    let inputs: &[&str] = &[
        "123b",
        "{three:\"3\"}",
        "[L; 1l, -2l, 3l]",
        "{a:[1,2,3],b:{c:\"d\"},e:[B;1b],f:1.5,g:true}",
        "[{x:1},{x:2}]",
        "\"  spaced  \"",
    ];

    for &input in inputs {
        let tag = parse_any(input).unwrap();
        assert_eq!(
            parse_any(&tag.to_snbt()).unwrap(),
            tag,
            "printing {input:?} did not parse back to the same tag",
        );
    }
}

#[test]
fn printer_output_is_canonical() {
    assert_eq!(NbtTag::Byte(1).to_snbt(), "1b");
    assert_eq!(NbtTag::Short(-5).to_snbt(), "-5s");
    assert_eq!(NbtTag::Int(42).to_snbt(), "42");
    assert_eq!(NbtTag::Long(42).to_snbt(), "42l");
    assert_eq!(NbtTag::Float(0.5).to_snbt(), "0.5f");
    assert_eq!(NbtTag::Double(0.5).to_snbt(), "0.5d");
    // The d suffix keeps integral doubles unambiguous
    assert_eq!(NbtTag::Double(100000.0).to_snbt(), "100000d");
    assert_eq!(NbtTag::from("a\\b\"c").to_snbt(), r#""a\\b\"c""#);
    assert_eq!(NbtTag::ByteArray(vec![1, 2]).to_snbt(), "[B;1b,2b]");
    assert_eq!(NbtTag::IntArray(vec![1, 2]).to_snbt(), "[I;1,2]");
    assert_eq!(NbtTag::LongArray(vec![1, 2]).to_snbt(), "[L;1l,2l]");

    let mut compound = NbtCompound::new();
    compound.insert("plain", NbtTag::Int(1));
    compound.insert("needs quoting", NbtTag::Int(2));
    assert_eq!(
        NbtTag::Compound(compound).to_snbt(),
        "{plain:1,\"needs quoting\":2}",
    );
}

#[test]
fn sorted_printer_orders_keys() {
    let mut compound = NbtCompound::new();
    compound.insert("zebra", NbtTag::Int(1));
    compound.insert("apple", NbtTag::Int(2));
    compound.insert("mango", NbtTag::Int(3));
    let compound = NbtCompound::from_snbt(&compound.to_snbt_sorted()).unwrap();

    // Insertion order of the re-parsed compound is the sorted emission order
    let keys: Vec<&str> = compound.iter().map(|(key, _)| key.as_str()).collect();
    assert_eq!(keys, ["apple", "mango", "zebra"]);
}

#[test]
fn parse_compound_requires_a_compound() {
    assert!(parse_compound("[1,2]").is_err());
    assert!(parse_compound("{a:1} trailing").is_err());
}
