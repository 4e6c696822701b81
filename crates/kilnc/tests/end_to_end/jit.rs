use anyhow::Result;
use inkwell::context::Context;
use kilnc::builder::{CodeGenerator, GeneratorConfig, SourceUnit};

use crate::common::{jit_run, jit_run_opt};

#[test]
fn arithmetic_precedence() -> Result<()> {
    assert_eq!(jit_run("fn main() -> i32 { return 1 + 2 * 3; }")?, 7);
    Ok(())
}

#[test]
fn mutable_parameter() -> Result<()> {
    let src = r#"
        fn id(mutable x: i32) -> i32 { x = x + 1; return x; }
        fn main() -> i32 { return id(5); }
    "#;
    assert_eq!(jit_run(src)?, 6);
    Ok(())
}

#[test]
fn optimized_build_gives_same_result() -> Result<()> {
    let src = r#"
        fn fib(n: i32) -> i32 {
            if (n < 2) return n;
            return fib(n - 1) + fib(n - 2);
        }
        fn main() -> i32 { return fib(10); }
    "#;
    for opt in 0..=3 {
        assert_eq!(jit_run_opt(src, opt)?, 55, "opt level {}", opt);
    }
    Ok(())
}

#[test]
fn compound_assignment_chain() -> Result<()> {
    let src = r#"
        fn main() -> i32 {
            let mutable a: i32 = 20;
            a += 4;
            a -= 2;
            a *= 3;
            a /= 5;
            a %= 7;
            return a;
        }
    "#;
    assert_eq!(jit_run(src)?, 6);
    Ok(())
}

#[test]
fn signed_division_truncates_toward_zero() -> Result<()> {
    let src = r#"
        fn main() -> i32 {
            let mutable a: i32 = -7;
            a /= 2;
            return a;
        }
    "#;
    assert_eq!(jit_run(src)?, -3);
    Ok(())
}

#[test]
fn unsigned_division_does_not_see_a_sign() -> Result<()> {
    let src = r#"
        fn main() -> i32 {
            let mutable a: u32 = 4294967295u;
            a /= 65536u;
            return a as i32;
        }
    "#;
    assert_eq!(jit_run(src)?, 65535);
    Ok(())
}

#[test]
fn loops_with_break_and_continue() -> Result<()> {
    let src = r#"
        fn odd_sum() -> i32 {
            let mutable s: i32 = 0;
            for (let mutable i: i32 = 0; i < 10; i += 1) {
                if (i % 2 == 0) continue;
                s += i;
            }
            return s;
        }
        fn count_to_five() -> i32 {
            let mutable n: i32 = 0;
            while (true) {
                n += 1;
                if (n == 5) break;
            }
            return n;
        }
        fn step_to_ten() -> i32 {
            let mutable n: i32 = 0;
            loop {
                n += 2;
                if (n >= 10) { break; }
            }
            return n;
        }
        fn main() -> i32 {
            return odd_sum() * 100 + count_to_five() * 10 + step_to_ten() - 10;
        }
    "#;
    assert_eq!(jit_run(src)?, 2550);
    Ok(())
}

#[test]
fn name_reused_after_block_ends() -> Result<()> {
    let src = r#"
        fn main() -> i32 {
            {
                let x: i32 = 1;
            }
            let x: i32 = 2;
            return x;
        }
    "#;
    assert_eq!(jit_run(src)?, 2);
    Ok(())
}

#[test]
fn inner_block_writes_are_visible_outside() -> Result<()> {
    let src = r#"
        fn main() -> i32 {
            let mutable x: i32 = 1;
            {
                let y: i32 = 4;
                x = x + y;
            }
            return x;
        }
    "#;
    assert_eq!(jit_run(src)?, 5);
    Ok(())
}

#[test]
fn pointers_and_conversions() -> Result<()> {
    let src = r#"
        fn bump(p: *i32) -> void {
            let v: i32 = *p;
        }
        fn main() -> i32 {
            let mutable x: i32 = 3;
            let p: *i32 = &x;
            bump(p);
            let wide: i64 = *p as i64 + 300 as i64;
            return wide as i32;
        }
    "#;
    assert_eq!(jit_run(src)?, 303);
    Ok(())
}

#[test]
fn break_outside_loop_is_ignored() -> Result<()> {
    assert_eq!(jit_run("fn main() -> i32 { break; continue; return 3; }")?, 3);
    Ok(())
}

#[test]
fn main_without_return_yields_zero() -> Result<()> {
    assert_eq!(jit_run("fn main() -> i32 { let x: i32 = 9; }")?, 0);
    Ok(())
}

#[test]
fn bool_and_char_values() -> Result<()> {
    let src = r#"
        fn is_a(c: i8) -> bool { return c == 'a'; }
        fn main() -> i32 {
            if (is_a('a')) {
                if (is_a('b')) return 2;
                return 1;
            }
            return 0;
        }
    "#;
    assert_eq!(jit_run(src)?, 1);
    Ok(())
}

#[test]
fn units_link_together() -> Result<()> {
    let _diag_guard = kilnc::diagnostics::suppress();
    let context = Context::create();
    let units = [
        SourceUnit::new(
            "main.kn",
            "extern helper() -> i32;\nfn main() -> i32 { return helper() + 1; }",
        ),
        SourceUnit::new("helper.kn", "fn helper() -> i32 { return 41; }"),
    ];
    let generator = CodeGenerator::new(&context, &GeneratorConfig::default(), &units)?;
    assert_eq!(generator.unit_count(), 2);
    assert_eq!(generator.jit_execute()?, 42);
    Ok(())
}

#[test]
fn missing_main_is_a_jit_error() -> Result<()> {
    let err = jit_run("fn helper() -> i32 { return 1; }").unwrap_err();
    assert!(
        err.to_string().contains("symbol main could not be found"),
        "{}",
        err
    );
    Ok(())
}

#[test]
fn main_with_parameters_is_rejected() -> Result<()> {
    let err = jit_run("fn main(a: i32) -> i32 { return a; }").unwrap_err();
    assert!(
        err.to_string().contains("main must take no parameters"),
        "{}",
        err
    );
    Ok(())
}
