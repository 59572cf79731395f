mod common;

use common::{annotated, assert_clean};
use skiff_lang::ast::unparse::Unparser;

fn canonical(src: &str) -> String {
    let program = assert_clean(src);
    Unparser::new(&program.ast, &program.interner).unparse()
}

#[test]
fn canonical_layout_is_fixed() {
    // Odd spacing and grouping in the input normalizes away.
    let text = canonical("int   limit=10;\nint twice ( int n ) { return n*2; }");
    assert_eq!(
        text,
        "int limit = 10;\n\
         \n\
         int twice(int n) {\n\
         \x20   return (n * 2);\n\
         }\n"
    );
}

#[test]
fn records_and_control_flow_layout() {
    let text = canonical(
        r#"
        record Point { int x; int y; }
        int get(Point p) {
            if (p.x < 0) { return -p.x; } else { return p.x; }
        }
        "#,
    );
    assert_eq!(
        text,
        "record Point {\n\
         \x20   int x;\n\
         \x20   int y;\n\
         }\n\
         \n\
         int get(Point p) {\n\
         \x20   if ((p.x < 0)) {\n\
         \x20       return (-p.x);\n\
         \x20   }\n\
         \x20   else {\n\
         \x20       return p.x;\n\
         \x20   }\n\
         }\n"
    );
}

#[test]
fn operator_grouping_is_explicit() {
    let text = canonical(
        r#"
        int main() {
            return 1 + 2 * 3;
        }
        "#,
    );
    assert!(text.contains("return (1 + (2 * 3));"), "got:\n{text}");

    let text = canonical(
        r#"
        bool check(int a, int b) {
            return a < b && b < 10 || a == 0;
        }
        "#,
    );
    assert!(
        text.contains("return (((a < b) && (b < 10)) || (a == 0));"),
        "got:\n{text}"
    );
}

#[test]
fn annotations_show_declared_types() {
    let text = annotated(
        r#"
        int limit = 10;
        int twice(int n) {
            return n * 2;
        }
        "#,
    );
    assert_eq!(
        text,
        "int limit{int} = 10;\n\
         \n\
         int twice{(int)->int}(int n{int}) {\n\
         \x20   return (n{int} * 2);\n\
         }\n"
    );
}

#[test]
fn annotations_cover_fields_and_calls() {
    let text = annotated(
        r#"
        record Point {
            int x;
        }
        int get(Point p) {
            return p.x;
        }
        int main() {
            Point origin;
            return get(origin);
        }
        "#,
    );
    assert!(text.contains("record Point {\n    int x{int};\n}"), "got:\n{text}");
    assert!(text.contains("return p{Point}.x{int};"), "got:\n{text}");
    assert!(
        text.contains("return get{(Point)->int}(origin{Point});"),
        "got:\n{text}"
    );
}

#[test]
fn record_names_carry_no_annotation() {
    let text = annotated(
        r#"
        record Point {
            int x;
        }
        Point origin;
        "#,
    );
    assert!(text.contains("record Point {"), "got:\n{text}");
    assert!(text.contains("Point origin{Point};"), "got:\n{text}");
    assert!(!text.contains("Point{"), "got:\n{text}");
}

#[test]
fn while_and_string_literals() {
    let text = canonical(
        r#"
        void spin(int n) {
            string msg = "busy";
            while (0 < n) {
                n = n - 1;
            }
        }
        "#,
    );
    assert!(text.contains("string msg = \"busy\";"), "got:\n{text}");
    assert!(text.contains("while ((0 < n)) {"), "got:\n{text}");
    assert!(text.contains("        n = (n - 1);"), "got:\n{text}");
}
