use anyhow::Result;

use crate::common::compile_err_message;

#[test]
fn unknown_variable() -> Result<()> {
    let msg = compile_err_message("fn main() -> i32 {\n  return y;\n}")?;
    assert_eq!(msg, "unknown variable 'y' referenced");
    Ok(())
}

#[test]
fn unknown_function() -> Result<()> {
    let msg = compile_err_message("fn main() -> i32 { return nope(); }")?;
    assert_eq!(msg, "unknown function 'nope' referenced");
    Ok(())
}

#[test]
fn arity_is_checked_before_arguments_are_lowered() -> Result<()> {
    // `y` is undefined; the arity error must win.
    let msg = compile_err_message(
        r#"
        fn g(a: i32) -> i32 { return a; }
        fn main() -> i32 { return g(1, y); }
        "#,
    )?;
    assert_eq!(msg, "incorrect arguments passed");
    Ok(())
}

#[test]
fn argument_type_mismatch_names_position() -> Result<()> {
    let msg = compile_err_message(
        r#"
        fn g(a: i32, b: i64) -> i32 { return a; }
        fn main() -> i32 { return g(1, 2); }
        "#,
    )?;
    assert_eq!(msg, "incompatible type for argument 2 of 'g'");
    Ok(())
}

#[test]
fn redefinition_in_same_block() -> Result<()> {
    let msg = compile_err_message(
        r#"
        fn main() -> i32 {
            let x: i32 = 1;
            let x: i32 = 2;
            return x;
        }
        "#,
    )?;
    assert_eq!(msg, "redefinition of 'x'");
    Ok(())
}

#[test]
fn redefinition_of_function() -> Result<()> {
    let msg = compile_err_message(
        r#"
        fn f() -> void {}
        fn f() -> void {}
        "#,
    )?;
    assert_eq!(msg, "redefinition of 'f'");
    Ok(())
}

#[test]
fn assignment_to_immutable_binding() -> Result<()> {
    let msg = compile_err_message("fn main() -> i32 { let x: i32 = 1; x = 2; return x; }")?;
    assert_eq!(msg, "assignment of read-only variable 'x'");

    let param = compile_err_message("fn f(x: i32) -> void { x += 1; }")?;
    assert_eq!(param, "assignment of read-only variable 'x'");
    Ok(())
}

#[test]
fn assignment_target_must_be_a_variable() -> Result<()> {
    let msg = compile_err_message("fn f() -> void { 1 = 2; }")?;
    assert_eq!(msg, "left-hand side was not a variable");

    let unknown = compile_err_message("fn f() -> void { z = 2; }")?;
    assert_eq!(unknown, "unknown variable name 'z'");
    Ok(())
}

#[test]
fn undefined_types() -> Result<()> {
    assert_eq!(
        compile_err_message("fn f() -> void { let x: float; }")?,
        "variables of undefined type cannot be defined"
    );
    assert_eq!(
        compile_err_message("fn f() -> void { let x: void; }")?,
        "variables of undefined type cannot be defined"
    );
    assert_eq!(
        compile_err_message("extern f(x: float) -> void;")?,
        "arguments of undefined types cannot be declared"
    );
    assert_eq!(
        compile_err_message("extern f() -> float;")?,
        "return type cannot be an undefined type"
    );
    Ok(())
}

#[test]
fn malformed_varargs() -> Result<()> {
    assert_eq!(
        compile_err_message("extern f(...) -> void;")?,
        "requires a named argument before '...'"
    );
    assert_eq!(
        compile_err_message("extern f(a: i32, ..., ...) -> void;")?,
        "cannot have multiple variable arguments"
    );
    assert_eq!(
        compile_err_message("extern f(a: i32, ..., b: i32) -> void;")?,
        "'...' must be the last parameter"
    );
    Ok(())
}

#[test]
fn operand_and_result_type_mismatches() -> Result<()> {
    assert_eq!(
        compile_err_message("fn f(a: i64) -> i64 { return a + 1; }")?,
        "both operands are not of the same type"
    );
    assert_eq!(
        compile_err_message("fn f() -> i64 { return 1; }")?,
        "incompatible type for result type"
    );
    assert_eq!(
        compile_err_message("fn f() -> void { let x: i64 = 1; }")?,
        "incompatible type for initializer"
    );
    assert_eq!(
        compile_err_message("fn f() -> void { let mutable x: i8 = 'a'; x = 1; }")?,
        "incompatible type for assignment"
    );
    Ok(())
}

#[test]
fn pointer_operator_misuse() -> Result<()> {
    assert_eq!(
        compile_err_message("fn f(a: i32) -> i32 { return *a; }")?,
        "unary '*' requires pointer operand"
    );
    assert_eq!(
        compile_err_message("fn f() -> *i32 { return &1; }")?,
        "lvalue required as unary '&' operand"
    );
    Ok(())
}

#[test]
fn void_call_used_as_value() -> Result<()> {
    let msg = compile_err_message(
        r#"
        fn nothing() -> void {}
        fn main() -> i32 { return nothing(); }
        "#,
    )?;
    assert_eq!(msg, "void value used in expression");
    Ok(())
}

#[test]
fn missing_return_value() -> Result<()> {
    let msg = compile_err_message("fn f() -> i32 { return; }")?;
    assert_eq!(msg, "return with no value in function returning 'i32'");
    Ok(())
}

#[test]
fn inner_binding_is_gone_after_its_block() -> Result<()> {
    let msg = compile_err_message(
        r#"
        fn main() -> i32 {
            { let inner: i32 = 1; }
            return inner;
        }
        "#,
    )?;
    assert_eq!(msg, "unknown variable 'inner' referenced");
    Ok(())
}

#[test]
fn failed_body_of_already_called_function() -> Result<()> {
    // `g` calls `f` before `f`'s body is lowered and rejected.
    let msg = compile_err_message(
        r#"
        extern f() -> i32;
        fn g() -> i32 { return f(); }
        fn f() -> i32 { return y; }
        "#,
    )?;
    assert_eq!(msg, "unknown variable 'y' referenced");
    Ok(())
}
