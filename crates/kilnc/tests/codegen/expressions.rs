use anyhow::Result;

use crate::common::gen_ir_for_source;

#[test]
fn division_follows_left_operand_signedness() -> Result<()> {
    let ir = gen_ir_for_source(
        r#"
        fn s(a: i32, b: i32) -> i32 { return a / b; }
        fn u(a: u32, b: u32) -> u32 { return a % b; }
        "#,
    )?;
    assert!(ir.contains("sdiv i32"), "signed '/' should use sdiv:\n{}", ir);
    assert!(ir.contains("urem i32"), "unsigned '%' should use urem:\n{}", ir);
    assert!(!ir.contains("udiv"), "{}", ir);
    assert!(!ir.contains("srem"), "{}", ir);
    Ok(())
}

#[test]
fn compound_division_follows_binding_signedness() -> Result<()> {
    let unsigned = gen_ir_for_source(
        r#"
        fn f(mutable a: u32, b: u32) -> u32 {
            a /= b;
            a %= b;
            return a;
        }
        "#,
    )?;
    assert!(unsigned.contains("udiv"), "{}", unsigned);
    assert!(unsigned.contains("urem"), "{}", unsigned);
    assert!(!unsigned.contains("sdiv") && !unsigned.contains("srem"), "{}", unsigned);

    let signed = gen_ir_for_source(
        r#"
        fn f(mutable a: i64, b: i64) -> i64 {
            a /= b;
            a %= b;
            return a;
        }
        "#,
    )?;
    assert!(signed.contains("sdiv i64"), "{}", signed);
    assert!(signed.contains("srem i64"), "{}", signed);
    assert!(!signed.contains("udiv") && !signed.contains("urem"), "{}", signed);
    Ok(())
}

#[test]
fn comparisons_widen_to_boolean_byte() -> Result<()> {
    let ir = gen_ir_for_source(
        r#"
        fn lt(a: i32, b: i32) -> bool { return a < b; }
        fn ult(a: u32, b: u32) -> bool { return a < b; }
        "#,
    )?;
    assert!(ir.contains("icmp slt i32"), "{}", ir);
    assert!(ir.contains("icmp ult i32"), "{}", ir);
    assert!(ir.contains("zext i1"), "comparison result should be widened:\n{}", ir);
    assert!(ir.contains("define i8 @lt"), "bool returns are one byte:\n{}", ir);
    Ok(())
}

#[test]
fn assignment_reloads_from_storage() -> Result<()> {
    let ir = gen_ir_for_source(
        r#"
        fn f(mutable x: i32) -> i32 {
            return x += 2;
        }
        "#,
    )?;
    let body = ir
        .split("define")
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("no function body in:\n{}", ir))?;
    let store_at = body
        .find("store i32 %add")
        .ok_or_else(|| anyhow::anyhow!("missing store of the sum:\n{}", body))?;
    assert!(
        body[store_at..].contains("load i32"),
        "value should be re-read after the store:\n{}",
        body
    );
    Ok(())
}

#[test]
fn string_literals_become_private_constants() -> Result<()> {
    let ir = gen_ir_for_source(
        r#"
        fn a() -> *i8 { return "hi"; }
        fn b() -> *i8 { return "hi"; }
        "#,
    )?;
    assert!(
        ir.contains(r#"private unnamed_addr constant [3 x i8] c"hi\00""#),
        "{}",
        ir
    );
    assert_eq!(ir.matches(r#"c"hi\00""#).count(), 1, "identical literals share storage");
    Ok(())
}

#[test]
fn conversions_pick_sign_or_zero_extension() -> Result<()> {
    let ir = gen_ir_for_source(
        r#"
        fn s(a: i8) -> i64 { return a as i64; }
        fn u(a: u8) -> i64 { return a as i64; }
        fn t(a: i64) -> i16 { return a as i16; }
        "#,
    )?;
    assert!(ir.contains("sext i8"), "{}", ir);
    assert!(ir.contains("zext i8"), "{}", ir);
    assert!(ir.contains("trunc i64"), "{}", ir);
    Ok(())
}

#[test]
fn address_of_and_deref_go_through_the_slot() -> Result<()> {
    let ir = gen_ir_for_source(
        r#"
        fn f() -> i32 {
            let mutable x: i32 = 3;
            let p: *i32 = &x;
            return *p;
        }
        "#,
    )?;
    assert!(ir.contains("store ptr %x"), "pointer to the slot should be stored:\n{}", ir);
    assert!(ir.contains("%deref = load i32, ptr"), "{}", ir);
    Ok(())
}

#[test]
fn large_literals_widen() -> Result<()> {
    let ir = gen_ir_for_source(
        r#"
        fn big() -> i64 { return 4294967296; }
        fn ubig() -> u64 { return 4294967296u; }
        "#,
    )?;
    assert!(ir.contains("store i64 4294967296"), "{}", ir);
    Ok(())
}

#[test]
fn negation_subtracts_from_zero() -> Result<()> {
    let ir = gen_ir_for_source("fn f(a: i64) -> i64 { return -a; }")?;
    assert!(ir.contains("%neg = sub i64 0, "), "{}", ir);
    Ok(())
}

#[test]
fn pointer_equality_compares_pointers() -> Result<()> {
    let ir = gen_ir_for_source(
        r#"
        fn same(a: *i32, b: *i32) -> bool { return a == b; }
        fn differ(a: *i32, b: *i32) -> bool { return a != b; }
        "#,
    )?;
    assert!(ir.contains("icmp eq ptr"), "{}", ir);
    assert!(ir.contains("icmp ne ptr"), "{}", ir);
    assert!(!ir.contains("ptrtoint"), "{}", ir);
    Ok(())
}
