//! Integration tests for the ArnoldC interpreter
//!
//! Runs whole programs through the full pipeline: lexing, parsing and
//! interpretation, checking the output streams.

use arnoldc::interp::{ErrorKind, Interpreter, RuntimeError, run};
use arnoldc::lexer::{Instruction, Token, tokenize};
use arnoldc::parser::{parse, parse_reader};
use arnoldc::CompileError;
use proptest::prelude::*;

/// Output of a finished run
struct Outcome {
    stdout: String,
    stderr: String,
    result: Result<(), RuntimeError>,
}

fn execute(source: &str) -> Outcome {
    let program = parse(source).expect("Parse should succeed");
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let result = run(&program, &mut stdout, &mut stderr);
    Outcome {
        stdout: String::from_utf8(stdout).unwrap(),
        stderr: String::from_utf8(stderr).unwrap(),
        result,
    }
}

/// Helper to run a program that must succeed, returning its output
fn run_ok(source: &str) -> String {
    let outcome = execute(source);
    assert!(outcome.result.is_ok(), "run failed: {}", outcome.stderr);
    assert!(outcome.stderr.is_empty());
    outcome.stdout
}

// ============================================
// Sample programs
// ============================================

#[test]
fn test_hello_world() {
    let out = run_ok(
        "IT'S SHOWTIME\nTALK TO THE HAND \"hello world\"\nYOU HAVE BEEN TERMINATED\n",
    );
    assert_eq!(out, "hello world\n");
}

#[test]
fn test_hello_variable() {
    let out = run_ok(
        "\
IT'S SHOWTIME
HEY CHRISTMAS TREE variable
YOU SET US UP 10
TALK TO THE HAND variable
YOU HAVE BEEN TERMINATED
",
    );
    insta::assert_snapshot!(out.trim_end(), @"10");
}

#[test]
fn test_hello_math() {
    let out = run_ok(
        "\
IT'S SHOWTIME
HEY CHRISTMAS TREE result
YOU SET US UP 0
GET TO THE CHOPPER result
HERE IS MY INVITATION 10
GET UP 4
YOU'RE FIRED 4
HE HAD TO SPLIT 2
ENOUGH TALK
TALK TO THE HAND result
YOU HAVE BEEN TERMINATED
",
    );
    insta::assert_snapshot!(out.trim_end(), @"28");
}

#[test]
fn test_hello_logic() {
    let out = run_ok(
        "\
IT'S SHOWTIME
HEY CHRISTMAS TREE both
YOU SET US UP @I LIED
HEY CHRISTMAS TREE same
YOU SET US UP @NO PROBLEMO
GET TO THE CHOPPER both
HERE IS MY INVITATION @NO PROBLEMO
KNOCK KNOCK @NO PROBLEMO
ENOUGH TALK
GET TO THE CHOPPER same
HERE IS MY INVITATION 3
YOU ARE NOT YOU YOU ARE ME 4
ENOUGH TALK
TALK TO THE HAND both
TALK TO THE HAND same
YOU HAVE BEEN TERMINATED
",
    );
    insta::assert_snapshot!(out.trim_end(), @r"
    1
    0
    ");
}

#[test]
fn test_hello_conditionals() {
    let out = run_ok(
        "\
IT'S SHOWTIME
BECAUSE I'M GOING TO SAY PLEASE @NO PROBLEMO
TALK TO THE HAND \"true is true\"
YOU HAVE NO RESPECT FOR LOGIC
BECAUSE I'M GOING TO SAY PLEASE @I LIED
TALK TO THE HAND \"false is true\"
BULLSHIT
TALK TO THE HAND \"false is not true\"
YOU HAVE NO RESPECT FOR LOGIC
HEY CHRISTMAS TREE a
YOU SET US UP 7
HEY CHRISTMAS TREE b
YOU SET US UP 3
HEY CHRISTMAS TREE bigger
YOU SET US UP @I LIED
GET TO THE CHOPPER bigger
HERE IS MY INVITATION a
LET OFF SOME STEAM BENNET b
ENOUGH TALK
BECAUSE I'M GOING TO SAY PLEASE bigger
TALK TO THE HAND \"a is greater than b\"
YOU HAVE NO RESPECT FOR LOGIC
YOU HAVE BEEN TERMINATED
",
    );
    insta::assert_snapshot!(out.trim_end(), @r"
    true is true
    false is not true
    a is greater than b
    ");
}

#[test]
fn test_count_to_ten() {
    let out = run_ok(
        "\
IT'S SHOWTIME
HEY CHRISTMAS TREE n
YOU SET US UP 0
HEY CHRISTMAS TREE going
YOU SET US UP @NO PROBLEMO
STICK AROUND going
GET TO THE CHOPPER n
HERE IS MY INVITATION n
GET UP 1
ENOUGH TALK
TALK TO THE HAND n
GET TO THE CHOPPER going
HERE IS MY INVITATION 10
LET OFF SOME STEAM BENNET n
ENOUGH TALK
CHILL
YOU HAVE BEEN TERMINATED
",
    );
    assert_eq!(out, "1\n2\n3\n4\n5\n6\n7\n8\n9\n10\n");
}

#[test]
fn test_declare_print_update_print() {
    let out = run_ok(
        "\
IT'S SHOWTIME
HEY CHRISTMAS TREE x
YOU SET US UP 10
TALK TO THE HAND x
GET TO THE CHOPPER x
HERE IS MY INVITATION x
GET UP 5
ENOUGH TALK
TALK TO THE HAND x
YOU HAVE BEEN TERMINATED
",
    );
    insta::assert_snapshot!(out.trim_end(), @r"
    10
    15
    ");
}

#[test]
fn test_declaration_in_branch_visible_after_block() {
    let out = run_ok(
        "\
IT'S SHOWTIME
BECAUSE I'M GOING TO SAY PLEASE @NO PROBLEMO
HEY CHRISTMAS TREE y
YOU SET US UP 3
YOU HAVE NO RESPECT FOR LOGIC
TALK TO THE HAND y
YOU HAVE BEEN TERMINATED
",
    );
    assert_eq!(out, "3\n");
}

// ============================================
// Methods
// ============================================

const FIBONACCI: &str = "\
IT'S SHOWTIME
HEY CHRISTMAS TREE i
YOU SET US UP 0
HEY CHRISTMAS TREE more
YOU SET US UP @NO PROBLEMO
STICK AROUND more
GET YOUR ASS TO MARS value fib i
TALK TO THE HAND value
GET TO THE CHOPPER i
HERE IS MY INVITATION i
GET UP 1
ENOUGH TALK
GET TO THE CHOPPER more
HERE IS MY INVITATION 8
LET OFF SOME STEAM BENNET i
ENOUGH TALK
CHILL
YOU HAVE BEEN TERMINATED

LISTEN TO ME VERY CAREFULLY fib
I NEED YOUR CLOTHES YOUR BOOTS AND YOUR MOTORCYCLE n
GIVE THESE PEOPLE AIR
HEY CHRISTMAS TREE small
YOU SET US UP 0
GET TO THE CHOPPER small
HERE IS MY INVITATION 2
LET OFF SOME STEAM BENNET n
ENOUGH TALK
BECAUSE I'M GOING TO SAY PLEASE small
I'LL BE BACK n
YOU HAVE NO RESPECT FOR LOGIC
HEY CHRISTMAS TREE a
YOU SET US UP 0
HEY CHRISTMAS TREE b
YOU SET US UP 0
GET TO THE CHOPPER a
HERE IS MY INVITATION n
GET DOWN 1
ENOUGH TALK
GET TO THE CHOPPER b
HERE IS MY INVITATION n
GET DOWN 2
ENOUGH TALK
GET YOUR ASS TO MARS a
DO IT NOW fib a
GET YOUR ASS TO MARS b
DO IT NOW fib b
GET TO THE CHOPPER a
HERE IS MY INVITATION a
GET UP b
ENOUGH TALK
I'LL BE BACK a
HASTA LA VISTA, BABY
";

#[test]
fn test_recursive_fibonacci() {
    let out = run_ok(FIBONACCI);
    insta::assert_snapshot!(out.trim_end(), @r"
    0
    1
    1
    2
    3
    5
    8
    13
    ");
}

#[test]
fn test_void_method_prints() {
    let out = run_ok(
        "\
IT'S SHOWTIME
DO IT NOW greet 3
DO IT NOW greet 4
YOU HAVE BEEN TERMINATED
LISTEN TO ME VERY CAREFULLY greet
I NEED YOUR CLOTHES YOUR BOOTS AND YOUR MOTORCYCLE times
TALK TO THE HAND \"hasta la vista\"
TALK TO THE HAND times
HASTA LA VISTA, BABY
",
    );
    insta::assert_snapshot!(out.trim_end(), @r"
    hasta la vista
    3
    hasta la vista
    4
    ");
}

#[test]
fn test_call_with_return_declares_destination() {
    let out = run_ok(
        "\
IT'S SHOWTIME
GET YOUR ASS TO MARS answer six
TALK TO THE HAND answer
YOU HAVE BEEN TERMINATED
LISTEN TO ME VERY CAREFULLY six
I'LL BE BACK 6
HASTA LA VISTA, BABY
",
    );
    assert_eq!(out, "6\n");
}

#[test]
fn test_method_cannot_see_caller_variables() {
    let outcome = execute(
        "\
IT'S SHOWTIME
HEY CHRISTMAS TREE hidden
YOU SET US UP 1
TALK TO THE HAND \"before\"
DO IT NOW peek
TALK TO THE HAND \"after\"
YOU HAVE BEEN TERMINATED
LISTEN TO ME VERY CAREFULLY peek
TALK TO THE HAND hidden
HASTA LA VISTA, BABY
",
    );
    assert_eq!(outcome.stdout, "before\n");
    assert_eq!(outcome.result.unwrap_err().kind, ErrorKind::UndefinedVariable);
    insta::assert_snapshot!(outcome.stderr.trim_end(), @"Runtime error: undefined variable: hidden");
}

#[test]
fn test_arity_mismatch_reported() {
    let outcome = execute(
        "\
IT'S SHOWTIME
DO IT NOW pair 1
YOU HAVE BEEN TERMINATED
LISTEN TO ME VERY CAREFULLY pair
I NEED YOUR CLOTHES YOUR BOOTS AND YOUR MOTORCYCLE a
I NEED YOUR CLOTHES YOUR BOOTS AND YOUR MOTORCYCLE b
GIVE THESE PEOPLE AIR
HASTA LA VISTA, BABY
",
    );
    assert_eq!(outcome.result.unwrap_err().kind, ErrorKind::ArityMismatch);
    insta::assert_snapshot!(outcome.stderr.trim_end(), @"Runtime error: method pair expects 2 argument(s), got 1");
}

#[test]
fn test_unknown_method_reported() {
    let outcome = execute("IT'S SHOWTIME\nDO IT NOW nowhere\nYOU HAVE BEEN TERMINATED\n");
    assert_eq!(outcome.result.unwrap_err().kind, ErrorKind::UnknownMethod);
}

#[test]
fn test_call_depth_limit() {
    let program = parse(
        "\
IT'S SHOWTIME
DO IT NOW again
YOU HAVE BEEN TERMINATED
LISTEN TO ME VERY CAREFULLY again
DO IT NOW again
HASTA LA VISTA, BABY
",
    )
    .unwrap();
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let result = Interpreter::new(&program, &mut stdout, &mut stderr)
        .with_max_call_depth(200)
        .run();
    assert_eq!(result.unwrap_err().kind, ErrorKind::CallDepthExceeded);
    assert!(String::from_utf8(stderr).unwrap().contains("call depth exceeded"));
}

// ============================================
// Runtime failures
// ============================================

#[test]
fn test_output_before_failure_is_kept() {
    let outcome = execute(
        "\
IT'S SHOWTIME
TALK TO THE HAND 1
TALK TO THE HAND 2
TALK TO THE HAND ghost
TALK TO THE HAND 3
YOU HAVE BEEN TERMINATED
",
    );
    assert_eq!(outcome.stdout, "1\n2\n");
    assert_eq!(outcome.result.unwrap_err().kind, ErrorKind::UndefinedVariable);
}

#[test]
fn test_division_by_zero_is_fatal() {
    let outcome = execute(
        "\
IT'S SHOWTIME
HEY CHRISTMAS TREE x
YOU SET US UP 8
GET TO THE CHOPPER x
HERE IS MY INVITATION x
HE HAD TO SPLIT 0
ENOUGH TALK
TALK TO THE HAND x
YOU HAVE BEEN TERMINATED
",
    );
    assert!(outcome.stdout.is_empty());
    assert_eq!(outcome.result.unwrap_err().kind, ErrorKind::DivisionByZero);
    insta::assert_snapshot!(outcome.stderr.trim_end(), @"Runtime error: division by zero");
}

#[test]
fn test_assign_undeclared_is_fatal() {
    let outcome = execute(
        "\
IT'S SHOWTIME
GET TO THE CHOPPER x
HERE IS MY INVITATION 1
ENOUGH TALK
YOU HAVE BEEN TERMINATED
",
    );
    assert_eq!(outcome.result.unwrap_err().kind, ErrorKind::UndefinedVariable);
}

// ============================================
// Front end
// ============================================

#[test]
fn test_parse_error_has_location() {
    let err = parse(
        "\
IT'S SHOWTIME
TALK TO THE HAND 1
ENOUGH TALK
YOU HAVE BEEN TERMINATED
",
    )
    .unwrap_err();
    assert!(matches!(err, CompileError::Parser { .. }));
    let span = err.span().unwrap();
    assert_eq!((span.line, span.column), (3, 1));
    assert!(err.to_string().starts_with("Parser error on line 3, column 1: unexpected \"ENOUGH TALK\""));
}

#[test]
fn test_lexer_error_has_location() {
    let err = parse("IT'S SHOWTIME\nTALK TO THE HAND @MAYBE\nYOU HAVE BEEN TERMINATED\n").unwrap_err();
    assert!(matches!(err, CompileError::Lexer { .. }));
    insta::assert_snapshot!(err.to_string(), @r#"Lexer error on line 2, column 18: unknown macro "@MAYBE""#);
}

#[test]
fn test_tokenize_hello_world() {
    let tokens: Vec<Token> = tokenize("IT'S SHOWTIME\nTALK TO THE HAND \"hi\"\nYOU HAVE BEEN TERMINATED")
        .unwrap()
        .into_iter()
        .map(|(tok, _)| tok)
        .collect();
    assert_eq!(
        tokens,
        vec![
            Token::Instruction(Instruction::MainOpen),
            Token::Instruction(Instruction::Print),
            Token::String("hi".to_string()),
            Token::Instruction(Instruction::MainClose),
        ]
    );
}

#[test]
fn test_parse_reader_matches_parse() {
    let from_reader = parse_reader(FIBONACCI.as_bytes()).unwrap();
    assert_eq!(from_reader, parse(FIBONACCI).unwrap());
}

#[test]
fn test_ast_json_dump() {
    let program = parse("IT'S SHOWTIME\nTALK TO THE HAND 7\nYOU HAVE BEEN TERMINATED\n").unwrap();
    let json = serde_json::to_value(&program).unwrap();
    assert_eq!(json["main"]["name"], "");
    assert_eq!(json["main"]["body"][0]["Expression"]["op"], "Print");
    assert_eq!(json["main"]["body"][0]["Expression"]["args"][0]["Integer"], 7);
}

proptest! {
    #[test]
    fn prop_print_integer_echoes(n in any::<i64>()) {
        let out = run_ok(&format!("IT'S SHOWTIME\nTALK TO THE HAND {n}\nYOU HAVE BEEN TERMINATED\n"));
        prop_assert_eq!(out, format!("{n}\n"));
    }

    #[test]
    fn prop_fold_add_wraps(a in any::<i64>(), b in any::<i64>()) {
        let source = format!(
            "IT'S SHOWTIME\nHEY CHRISTMAS TREE x\nYOU SET US UP 0\nGET TO THE CHOPPER x\nHERE IS MY INVITATION {a}\nGET UP {b}\nENOUGH TALK\nTALK TO THE HAND x\nYOU HAVE BEEN TERMINATED\n"
        );
        prop_assert_eq!(run_ok(&source), format!("{}\n", a.wrapping_add(b)));
    }

    #[test]
    fn prop_greater_than_is_boolean(a in -1000i64..1000, b in -1000i64..1000) {
        let source = format!(
            "IT'S SHOWTIME\nHEY CHRISTMAS TREE x\nYOU SET US UP 0\nGET TO THE CHOPPER x\nHERE IS MY INVITATION {a}\nLET OFF SOME STEAM BENNET {b}\nENOUGH TALK\nTALK TO THE HAND x\nYOU HAVE BEEN TERMINATED\n"
        );
        prop_assert_eq!(run_ok(&source), format!("{}\n", i64::from(a > b)));
    }
}
