use anyhow::Result;

use crate::common::gen_ir_for_source;

#[test]
fn if_else_builds_then_else_and_merge_blocks() -> Result<()> {
    let ir = gen_ir_for_source(
        r#"
        fn pick(c: bool) -> i32 {
            if (c) {
                return 1;
            } else {
                return 2;
            }
        }
        "#,
    )?;
    assert!(ir.contains("if.then:"), "missing then block:\n{}", ir);
    assert!(ir.contains("if.else:"), "missing else block:\n{}", ir);
    assert!(ir.contains("if.merge:"), "missing merge block:\n{}", ir);
    assert!(ir.contains("icmp ne i8"), "condition should compare the boolean byte:\n{}", ir);
    Ok(())
}

#[test]
fn while_loop_has_condition_body_and_exit() -> Result<()> {
    let ir = gen_ir_for_source(
        r#"
        fn count() -> i32 {
            let mutable n: i32 = 0;
            while (n < 10) n += 1;
            return n;
        }
        "#,
    )?;
    for block in ["while.cond:", "while.body:", "while.after:"] {
        assert!(ir.contains(block), "missing {}:\n{}", block, ir);
    }
    Ok(())
}

#[test]
fn for_continue_targets_increment_block() -> Result<()> {
    let ir = gen_ir_for_source(
        r#"
        fn odd_sum() -> i32 {
            let mutable s: i32 = 0;
            for (let mutable i: i32 = 0; i < 10; i += 1) {
                if (i % 2 == 0) continue;
                s += i;
            }
            return s;
        }
        "#,
    )?;
    for block in ["for.cond:", "for.body:", "for.incr:", "for.after:"] {
        assert!(ir.contains(block), "missing {}:\n{}", block, ir);
    }
    assert!(
        ir.contains("br label %for.incr"),
        "continue and fallthrough should branch to the increment block:\n{}",
        ir
    );
    Ok(())
}

#[test]
fn plain_loop_reenters_its_body() -> Result<()> {
    let ir = gen_ir_for_source(
        r#"
        fn spin() -> void {
            loop {
                break;
            }
        }
        "#,
    )?;
    assert!(ir.contains("loop.body:"), "{}", ir);
    assert!(ir.contains("loop.end:"), "{}", ir);
    assert!(ir.contains("br label %loop.end"), "break should exit the loop:\n{}", ir);
    Ok(())
}

#[test]
fn break_outside_loop_emits_nothing() -> Result<()> {
    let with_break = gen_ir_for_source("fn f() -> void { break; continue; }")?;
    let without = gen_ir_for_source("fn f() -> void { }")?;
    assert_eq!(with_break, without);
    Ok(())
}

#[test]
fn code_after_return_is_still_lowered() -> Result<()> {
    let ir = gen_ir_for_source(
        r#"
        fn f() -> i32 {
            return 1;
            return 2;
        }
        "#,
    )?;
    assert!(ir.contains("unreachable:"), "dead code should get its own block:\n{}", ir);
    Ok(())
}
