use logo::{compile, BinOp, DiagnosticKind, Instr, Value};

fn push_i(n: i64) -> Instr {
    Instr::Push(Value::Int(n))
}

fn load(name: &str) -> Instr {
    Instr::Load(name.to_string())
}

fn store(name: &str) -> Instr {
    Instr::Store(name.to_string())
}

fn call(name: &str) -> Instr {
    Instr::Call(name.to_string())
}

#[test]
fn arithmetic_program() {
    let source = "
        a = 8
        b = 5 ^ (2 + 1)
        c = 4 * (:a + :b)
        write :c
    ";
    let result = compile(source);
    assert!(!result.has_errors());
    assert!(result.procedures.is_empty());
    assert_eq!(
        result.program,
        vec![
            push_i(8),
            store("a"),
            push_i(5),
            push_i(2),
            push_i(1),
            Instr::BinaryOp(BinOp::Add),
            Instr::BinaryOp(BinOp::Pow),
            store("b"),
            push_i(4),
            load("a"),
            load("b"),
            Instr::BinaryOp(BinOp::Add),
            Instr::BinaryOp(BinOp::Mul),
            store("c"),
            load("c"),
            call("Write"),
        ],
    );
}

#[test]
fn turtle_program_with_procedure() {
    let source = "
        to side :len
          rt 90
          fo :len
        end
        side 50
        home
    ";
    let result = compile(source);
    assert!(!result.has_errors());

    let side = result.procedures.lookup("side").expect("side not recorded");
    assert_eq!(side.params, vec!["len".to_string()]);
    assert_eq!(
        side.body,
        vec![push_i(90), call("Right"), load("len"), call("Forward")],
    );

    // The body appears only inside the definition marker, never inline.
    assert_eq!(
        result.program,
        vec![
            Instr::DefineProcedure(side.clone()),
            call("side"),
            push_i(50),
            call("Home"),
        ],
    );
}

#[test]
fn compilation_is_deterministic() {
    let source = "
        to spiral :n
          fo :n
          rt 92
          spiral :n + 1
        end
        spiral 1
    ";
    let first = compile(source);
    let second = compile(source);
    assert_eq!(first, second);
}

#[test]
fn illegal_character_does_not_stop_compilation() {
    let result = compile("a = 8 # b = 5");
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(
        result.diagnostics[0].kind(),
        DiagnosticKind::IllegalCharacter,
    );
    assert_eq!(result.diagnostics[0].line(), Some(1));
    assert_eq!(
        result.program,
        vec![push_i(8), store("a"), push_i(5), store("b")],
    );
}

#[test]
fn every_illegal_character_is_reported() {
    let result = compile("$ pu %");
    let kinds: Vec<_> = result.diagnostics.iter().map(|d| d.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            DiagnosticKind::IllegalCharacter,
            DiagnosticKind::IllegalCharacter,
        ],
    );
    assert_eq!(result.program, vec![call("PenUp")]);
}

#[test]
fn truncated_input_reports_and_keeps_partial_program() {
    let result = compile("fo 10 to f");
    let kinds: Vec<_> = result.diagnostics.iter().map(|d| d.kind()).collect();
    assert!(kinds.contains(&DiagnosticKind::UnexpectedEndOfInput));
    // Everything before the truncation survives.
    assert_eq!(result.program[..2], [push_i(10), call("Forward")]);
}

#[test]
fn diagnostics_render_messages() {
    let result = compile("a = 8 # b");
    assert_eq!(
        result.diagnostics[0].to_string(),
        "illegal character '#' on line 1",
    );
}
