mod common;

use common::{analyze, annotated, assert_clean, errors_of, is_duplicate, is_undeclared, messages_of};
use skiff_lang::ast::unparse::Unparser;
use skiff_lang::error::CompileErrorKind;
use skiff_lang::passes::resolve::ScopeOwner;

#[test]
fn resolve_global_variable_use() {
    assert_clean(
        r#"
        int counter;
        void bump() {
            counter = counter + 1;
        }
        "#,
    );
}

#[test]
fn resolve_undeclared_identifier() {
    let messages = messages_of(
        r#"
        int main() {
            total = 4;
            return 0;
        }
        "#,
    );
    assert_eq!(messages, vec!["Undeclared identifier 'total'"]);
}

#[test]
fn resolve_duplicate_local() {
    let (errors, interner) = errors_of(
        r#"
        int main() {
            int count;
            int count;
            return 0;
        }
        "#,
    );
    assert_eq!(errors.len(), 1);
    assert!(is_duplicate(&errors[0]));
    assert_eq!(
        errors[0].message(&interner),
        "Multiply declared identifier 'count'"
    );
}

#[test]
fn duplicate_report_carries_both_locations() {
    let src = r#"
        int count;
        bool count;
    "#;
    let (errors, _) = errors_of(src);
    assert_eq!(errors.len(), 1);
    let CompileErrorKind::DuplicateDeclaration { original, .. } = &errors[0].kind else {
        panic!("expected a duplicate declaration, got {:?}", errors[0].kind);
    };
    // The report points at the redeclaration and references the original.
    assert!(original.span.start < errors[0].loc.span.start);
    assert_eq!(&src[original.span.clone()], "count");
    assert_eq!(&src[errors[0].loc.span.clone()], "count");
}

#[test]
fn first_declaration_survives_a_duplicate() {
    // Uses after the duplicate still resolve, to the first declaration.
    let (program, errors) = analyze(
        r#"
        int main() {
            int count;
            bool count;
            count = 1;
            return 0;
        }
        "#,
    );
    assert_eq!(errors.len(), 1);
    let text = Unparser::new(&program.ast, &program.interner)
        .with_resolutions(&program.resolutions)
        .unparse();
    assert!(text.contains("count{int} = 1"), "got:\n{text}");
}

#[test]
fn scope_tables_survive_the_run() {
    // Finished per-scope tables stay queryable after analysis.
    let program = assert_clean(
        r#"
        int limit;
        int twice(int n) {
            return n * 2;
        }
        "#,
    );

    let global = program
        .resolutions
        .scope_table(ScopeOwner::Program)
        .expect("global scope table");
    let limit = program.interner.get("limit").expect("interned name");
    let twice = program.interner.get("twice").expect("interned name");
    assert!(global.resolve_local(limit).is_some());
    assert!(global.resolve_local(twice).is_some());

    let fn_decl = program.ast.root[1];
    let fn_scope = program
        .resolutions
        .scope_table(ScopeOwner::Fn(fn_decl))
        .expect("function scope table");
    let n = program.interner.get("n").expect("interned name");
    assert_eq!(fn_scope.len(), 1);
    assert!(fn_scope.resolve_local(n).is_some());
}

#[test]
fn resolve_mutual_recursion() {
    assert_clean(
        r#"
        int even(int n) {
            if (n == 0) { return 1; }
            return odd(n - 1);
        }
        int odd(int n) {
            if (n == 0) { return 0; }
            return even(n - 1);
        }
        "#,
    );
}

#[test]
fn resolve_call_before_textual_definition() {
    assert_clean(
        r#"
        int main() {
            return helper(2);
        }
        int helper(int n) {
            return n * 2;
        }
        "#,
    );
}

#[test]
fn global_variables_are_not_hoisted() {
    // Unlike functions, a global only becomes visible at its declaration.
    let messages = messages_of(
        r#"
        int main() {
            return limit;
        }
        int limit;
        "#,
    );
    assert_eq!(messages, vec!["Undeclared identifier 'limit'"]);
}

#[test]
fn shadowing_resolves_to_innermost() {
    let text = annotated(
        r#"
        int x;
        void f() {
            string x;
            x = "hi";
        }
        "#,
    );
    // The assignment inside f targets the local string, not the global int.
    assert!(text.contains("x{string} = \"hi\""), "got:\n{text}");
}

#[test]
fn shadow_ends_at_scope_exit() {
    let text = annotated(
        r#"
        int x;
        void f() {
            {
                string x;
                x = "inner";
            }
            x = 3;
        }
        "#,
    );
    assert!(text.contains("x{string} = \"inner\""), "got:\n{text}");
    assert!(text.contains("x{int} = 3"), "got:\n{text}");
}

#[test]
fn self_initializer_is_undeclared() {
    let messages = messages_of(
        r#"
        int main() {
            int x = x;
            return 0;
        }
        "#,
    );
    assert_eq!(messages, vec!["Undeclared identifier 'x'"]);
}

#[test]
fn self_initializer_binds_outer_declaration() {
    let text = annotated(
        r#"
        string x;
        void f() {
            int x = 1;
        }
        "#,
    );
    assert!(text.contains("int x{int} = 1"), "got:\n{text}");

    // With an outer x in scope the initializer refers to it.
    let text = annotated(
        r#"
        int x;
        void f() {
            int y = x;
        }
        "#,
    );
    assert!(text.contains("int y{int} = x{int}"), "got:\n{text}");
}

#[test]
fn fields_are_invisible_as_bare_identifiers() {
    let messages = messages_of(
        r#"
        record Point {
            int x;
            int y;
        }
        int main() {
            return x;
        }
        "#,
    );
    assert_eq!(messages, vec!["Undeclared identifier 'x'"]);
}

#[test]
fn member_access_resolves_to_field() {
    // `p.x` must find the field even with an unrelated outer `x` around.
    let text = annotated(
        r#"
        record Point {
            int x;
        }
        string x;
        int get(Point p) {
            return p.x;
        }
        "#,
    );
    assert!(text.contains("p{Point}.x{int}"), "got:\n{text}");
}

#[test]
fn chained_member_access() {
    assert_clean(
        r#"
        record Inner {
            int value;
        }
        record Outer {
            Inner inner;
        }
        int get(Outer o) {
            return o.inner.value;
        }
        "#,
    );
}

#[test]
fn member_access_on_undeclared_object_reports_once() {
    // The object failure is the whole story; no cascade for the field.
    let messages = messages_of(
        r#"
        record Point {
            int x;
        }
        int main() {
            return q.x;
        }
        "#,
    );
    assert_eq!(messages, vec!["Undeclared identifier 'q'"]);
}

#[test]
fn member_access_on_primitive_reports_the_field() {
    let messages = messages_of(
        r#"
        int main() {
            int n;
            return n.x;
        }
        "#,
    );
    assert_eq!(messages, vec!["Undeclared identifier 'x'"]);
}

#[test]
fn unknown_field_on_known_record() {
    let messages = messages_of(
        r#"
        record Point {
            int x;
        }
        int get(Point p) {
            return p.z;
        }
        "#,
    );
    assert_eq!(messages, vec!["Undeclared identifier 'z'"]);
}

#[test]
fn forward_record_reference() {
    assert_clean(
        r#"
        Point origin;
        record Point {
            int x;
            int y;
        }
        "#,
    );
}

#[test]
fn records_may_reference_each_other() {
    assert_clean(
        r#"
        record A {
            B other;
        }
        record B {
            A other;
        }
        "#,
    );
}

#[test]
fn undeclared_record_type() {
    let messages = messages_of(
        r#"
        Pointt origin;
        "#,
    );
    assert_eq!(messages, vec!["Undeclared identifier 'Pointt'"]);
}

#[test]
fn misspelled_record_type_gets_a_suggestion() {
    let (errors, _) = errors_of(
        r#"
        record Point {
            int x;
        }
        Pointt origin;
        "#,
    );
    assert_eq!(errors.len(), 1);
    assert!(is_undeclared(&errors[0]));
    let notes: Vec<String> = errors[0].suggestions.iter().map(|s| s.format()).collect();
    assert_eq!(notes, vec!["Did you mean 'Point'?"]);
}

#[test]
fn variable_name_in_type_position_is_an_error() {
    let (errors, _) = errors_of(
        r#"
        int size;
        size s;
        "#,
    );
    assert_eq!(errors.len(), 1);
    assert!(is_undeclared(&errors[0]));
}

#[test]
fn duplicate_fields_in_a_record() {
    let (errors, interner) = errors_of(
        r#"
        record Pair {
            int first;
            int first;
        }
        "#,
    );
    assert_eq!(errors.len(), 1);
    assert!(is_duplicate(&errors[0]));
    assert_eq!(
        errors[0].message(&interner),
        "Multiply declared identifier 'first'"
    );
}

#[test]
fn duplicate_top_level_names_clash_across_kinds() {
    // A record and a function share the top-level namespace.
    let (errors, _) = errors_of(
        r#"
        record Thing {
            int x;
        }
        int Thing() {
            return 0;
        }
        "#,
    );
    assert_eq!(errors.len(), 1);
    assert!(is_duplicate(&errors[0]));
}

#[test]
fn global_variable_clashes_with_function() {
    let (errors, _) = errors_of(
        r#"
        int f() {
            return 0;
        }
        bool f;
        "#,
    );
    assert_eq!(errors.len(), 1);
    assert!(is_duplicate(&errors[0]));
}

#[test]
fn parameters_share_the_body_scope() {
    let (errors, _) = errors_of(
        r#"
        int f(int a, int a) {
            return a;
        }
        "#,
    );
    assert_eq!(errors.len(), 1);
    assert!(is_duplicate(&errors[0]));

    let (errors, _) = errors_of(
        r#"
        int f(int a) {
            bool a;
            return 0;
        }
        "#,
    );
    assert_eq!(errors.len(), 1);
    assert!(is_duplicate(&errors[0]));
}

#[test]
fn sibling_blocks_may_reuse_a_name() {
    assert_clean(
        r#"
        void f() {
            {
                int tmp;
            }
            {
                bool tmp;
            }
        }
        "#,
    );
}

#[test]
fn one_run_reports_every_error() {
    let (errors, _) = errors_of(
        r#"
        int main() {
            int count;
            int count;
            total = 1;
            missing();
            return 0;
        }
        "#,
    );
    assert_eq!(errors.len(), 3);
    assert!(is_duplicate(&errors[0]));
    assert!(is_undeclared(&errors[1]));
    assert!(is_undeclared(&errors[2]));
}

#[test]
fn misspelled_variable_gets_a_suggestion() {
    let (errors, _) = errors_of(
        r#"
        int main() {
            int total;
            totla = 1;
            return 0;
        }
        "#,
    );
    assert_eq!(errors.len(), 1);
    let notes: Vec<String> = errors[0].suggestions.iter().map(|s| s.format()).collect();
    assert_eq!(notes, vec!["Did you mean 'total'?"]);
}

#[test]
fn misspelled_field_suggests_a_field() {
    let (errors, _) = errors_of(
        r#"
        record Point {
            int count;
        }
        int get(Point p) {
            return p.cont;
        }
        "#,
    );
    assert_eq!(errors.len(), 1);
    let notes: Vec<String> = errors[0].suggestions.iter().map(|s| s.format()).collect();
    assert_eq!(notes, vec!["Did you mean 'count'?"]);
}

#[test]
fn while_and_if_conditions_are_resolved() {
    let messages = messages_of(
        r#"
        int main() {
            while (flag) {
                int x;
            }
            if (other) {
                return 1;
            } else {
                return 2;
            }
        }
        "#,
    );
    assert_eq!(
        messages,
        vec![
            "Undeclared identifier 'flag'",
            "Undeclared identifier 'other'",
        ]
    );
}

#[test]
fn call_through_return_value_field() {
    // A call's field namespace comes from the callee's declared return type.
    assert_clean(
        r#"
        record Point {
            int x;
        }
        Point make() {
            Point p;
            return p;
        }
        int main() {
            return make().x;
        }
        "#,
    );
}

#[test]
fn bare_function_name_has_no_fields() {
    // Only a call's result carries the return type's fields; the
    // uncalled function name itself is not a record value.
    let messages = messages_of(
        r#"
        record Point {
            int x;
        }
        Point f() {
            Point p;
            return p;
        }
        int main() {
            return f.x;
        }
        "#,
    );
    assert_eq!(messages, vec!["Undeclared identifier 'x'"]);
}

#[test]
fn call_field_resolves_before_callee_definition() {
    assert_clean(
        r#"
        record Point {
            int x;
        }
        int main() {
            return make().x;
        }
        Point make() {
            Point p;
            return p;
        }
        "#,
    );
}
