use anyhow::Result;

use crate::common::gen_ir_for_source;

#[test]
fn void_function_has_single_exit() -> Result<()> {
    let ir = gen_ir_for_source("fn f() -> void { return; }")?;
    assert!(ir.contains("exit:"), "{}", ir);
    assert_eq!(ir.matches("ret void").count(), 1, "{}", ir);
    Ok(())
}

#[test]
fn every_return_goes_through_the_exit_block() -> Result<()> {
    let ir = gen_ir_for_source(
        r#"
        fn sign(x: i32) -> i32 {
            if (x < 0) return -1;
            if (x == 0) return 0;
            return 1;
        }
        "#,
    )?;
    assert_eq!(ir.matches("ret i32").count(), 1, "{}", ir);
    assert!(ir.contains("%retval = alloca i32"), "{}", ir);
    Ok(())
}

#[test]
fn main_falls_through_to_zero() -> Result<()> {
    let ir = gen_ir_for_source("fn main() -> i32 { }")?;
    assert!(ir.contains("store i32 0, ptr %retval"), "{}", ir);

    let other = gen_ir_for_source("fn f() -> i32 { }")?;
    assert!(other.contains("store i32 undef, ptr %retval"), "{}", other);
    Ok(())
}

#[test]
fn linkage_follows_private_marker() -> Result<()> {
    let ir = gen_ir_for_source(
        r#"
        extern puts(s: *i8) -> i32;
        fn private helper() -> i32 { return 1; }
        fn visible() -> i32 { return helper(); }
        "#,
    )?;
    assert!(ir.contains("declare i32 @puts(ptr"), "{}", ir);
    assert!(ir.contains("define internal i32 @helper()"), "{}", ir);
    assert!(ir.contains("define i32 @visible()"), "{}", ir);
    Ok(())
}

#[test]
fn varargs_declaration() -> Result<()> {
    let ir = gen_ir_for_source(
        r#"
        extern printf(fmt: *i8, ...) -> i32;
        fn main() -> i32 {
            printf("%d %d\n", 1, 2);
            return 0;
        }
        "#,
    )?;
    assert!(ir.contains("declare i32 @printf(ptr, ...)"), "{}", ir);
    assert!(ir.contains("call i32 (ptr, ...) @printf"), "{}", ir);
    Ok(())
}

#[test]
fn parameters_are_named_and_spilled() -> Result<()> {
    let ir = gen_ir_for_source("fn id(mutable x: i32) -> i32 { x = x + 1; return x; }")?;
    assert!(ir.contains("define i32 @id(i32 %x)"), "{}", ir);
    assert!(ir.contains("store i32 %x, ptr"), "{}", ir);
    Ok(())
}

#[test]
fn extern_then_definition_reuses_declaration() -> Result<()> {
    let ir = gen_ir_for_source(
        r#"
        extern twice(n: i32) -> i32;
        fn main() -> i32 { return twice(2); }
        fn twice(n: i32) -> i32 { return n * 2; }
        "#,
    )?;
    assert!(ir.contains("define i32 @twice(i32 %n)"), "{}", ir);
    assert!(!ir.contains("declare i32 @twice"), "{}", ir);
    Ok(())
}
