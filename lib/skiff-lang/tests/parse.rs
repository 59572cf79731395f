use skiff_lang::ast::ast::DeclKind;
use skiff_lang::error::CompileErrorKind;
use skiff_lang::passes::parse::Parser;

#[test]
fn parses_top_level_declarations() {
    let program = Parser::parse(
        r#"
        int limit = 10;
        record Point {
            int x;
            int y;
        }
        int main() {
            return limit;
        }
        "#,
        0,
    )
    .unwrap();

    assert_eq!(program.ast.root.len(), 3);
    let kinds: Vec<_> = program
        .ast
        .root
        .iter()
        .map(|id| &program.ast.decls.get(*id).kind)
        .collect();
    assert!(matches!(kinds[0], DeclKind::Var { init: Some(_), .. }));
    assert!(matches!(kinds[1], DeclKind::Record { fields } if fields.len() == 2));
    assert!(matches!(kinds[2], DeclKind::Fn { params, .. } if params.is_empty()));
}

#[test]
fn function_body_statements_are_direct_children() {
    let program = Parser::parse(
        r#"
        void f(int a) {
            int b;
            b = a;
        }
        "#,
        0,
    )
    .unwrap();

    let DeclKind::Fn { params, body, .. } = &program.ast.decls.get(program.ast.root[0]).kind
    else {
        panic!("expected a function");
    };
    assert_eq!(params.len(), 1);
    assert_eq!(body.len(), 2);
}

#[test]
fn comments_are_skipped() {
    let program = Parser::parse(
        r#"
        // leading comment
        int x; // trailing comment
        "#,
        0,
    )
    .unwrap();
    assert_eq!(program.ast.root.len(), 1);
}

#[test]
fn missing_semicolon_is_a_parse_error() {
    let errors = Parser::parse("int x", 0).unwrap_err();
    assert!(!errors.is_empty());
    assert!(errors
        .iter()
        .all(|e| matches!(e.kind, CompileErrorKind::Parse(_))));
}

#[test]
fn keyword_cannot_be_a_name() {
    assert!(Parser::parse("int while;", 0).is_err());
}

#[test]
fn unlexable_input_is_a_positioned_parse_error() {
    let errors = Parser::parse("int # x;", 0).unwrap_err();
    assert!(!errors.is_empty());
    // The error points at the offending byte, not at end of input.
    assert_eq!(errors.iter().next().map(|e| e.loc.span.start), Some(4));
}

#[test]
fn trailing_garbage_is_rejected() {
    assert!(Parser::parse("int x; }", 0).is_err());
}

#[test]
fn empty_source_is_an_empty_program() {
    let program = Parser::parse("", 0).unwrap();
    assert!(program.ast.root.is_empty());
}
