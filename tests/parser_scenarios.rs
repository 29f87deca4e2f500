//! End-to-end parse scenarios (spec.md §8 "Concrete scenarios", plus the
//! broader coverage named by the reference test suite this crate's grammar
//! was checked against: comments, nested comments, newline-after-keyword
//! layout, qualified identifiers, and the full literal grammar).

use lesfl_frontend::ast::{
    Definition, Expression, Function, InlineModifier, LiteralValue, Variable,
};
use lesfl_frontend::token::{FloatKind, IntKind};
use lesfl_frontend::{Error, Errors, Identifier, Parser, ParserConfig, Source, Tree};
use pretty_assertions::assert_eq;

fn parse_one(text: &str) -> (Tree, Errors) {
    let config = ParserConfig::default();
    let source = Source::new("t.lsf", text);
    let mut tree = Tree::new();
    let mut errors: Errors = Vec::new();
    Parser::new(&config).parse(&[source], &mut tree, &mut errors);
    (tree, errors)
}

fn defs(text: &str) -> Vec<Definition> {
    let (tree, errors) = parse_one(text);
    assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
    tree.iter().cloned().collect()
}

fn var_def(d: &Definition) -> &lesfl_frontend::ast::VariableDefinition {
    match d {
        Definition::VariableDefinition(v) => v,
        other => panic!("expected VariableDefinition, got {other:?}"),
    }
}

fn fun_def(d: &Definition) -> &lesfl_frontend::ast::FunctionDefinition {
    match d {
        Definition::FunctionDefinition(f) => f,
        other => panic!("expected FunctionDefinition, got {other:?}"),
    }
}

// scenario 1
#[test]
fn parses_simple_definitions_with_application_chain() {
    let ds = defs("v = 1\n\nf() = 2\n\ng(x) = f() + v + x\n");
    assert_eq!(ds.len(), 3);

    let v = var_def(&ds[0]);
    assert_eq!(v.ident, "v");
    assert_eq!((v.pos.line, v.pos.column), (1, 1));
    match &v.variable {
        Variable::UserDefinedVariable { value: Some(Expression::Literal(lit, pos)), .. } => {
            assert_eq!(*lit, LiteralValue::IntValue(IntKind::I64, 1));
            assert_eq!((pos.line, pos.column), (1, 5));
        }
        other => panic!("unexpected variable body: {other:?}"),
    }

    let f = fun_def(&ds[1]);
    assert_eq!(f.ident, "f");
    assert_eq!((f.pos.line, f.pos.column), (3, 1));
    match &f.function {
        Function::UserDefinedFunction { body: Some(Expression::Literal(lit, pos)), .. } => {
            assert_eq!(*lit, LiteralValue::IntValue(IntKind::I64, 2));
            assert_eq!((pos.line, pos.column), (3, 7));
        }
        other => panic!("unexpected function body: {other:?}"),
    }

    let g = fun_def(&ds[2]);
    assert_eq!(g.ident, "g");
    match &g.function {
        Function::UserDefinedFunction { body: Some(Expression::NonUniqueApplication { fun, args, .. }), .. } => {
            assert_op_named(fun, "+");
            assert_eq!(args.len(), 2);
            match &args[0] {
                Expression::NonUniqueApplication { fun: inner_fun, args: inner_args, .. } => {
                    assert_op_named(inner_fun, "+");
                    assert_eq!(inner_args.len(), 2);
                    assert!(matches!(&inner_args[0], Expression::NonUniqueApplication { .. }));
                    assert!(matches!(&inner_args[1], Expression::VariableExpression(..)));
                }
                other => panic!("expected nested (+) application, got {other:?}"),
            }
            assert!(matches!(&args[1], Expression::VariableExpression(..)));
        }
        other => panic!("unexpected function body: {other:?}"),
    }
}

fn assert_op_named(fun: &Expression, name: &str) {
    match fun {
        Expression::VariableExpression(Identifier::Relative(rel), _) => {
            assert_eq!(rel.segments(), &[name.to_string()]);
        }
        other => panic!("expected operator variable `{name}`, got {other:?}"),
    }
}

// scenario 2
#[test]
fn semicolons_and_newlines_both_separate_definitions() {
    let ds = defs("a = 1; b = 2;\nc = 3\n");
    assert_eq!(ds.len(), 3);
    let positions: Vec<(u32, u32)> = ds.iter().map(|d| {
        let v = var_def(d);
        (v.pos.line, v.pos.column)
    }).collect();
    assert_eq!(positions, vec![(1, 1), (1, 8), (2, 1)]);
    let names: Vec<&str> = ds.iter().map(|d| var_def(d).ident.as_str()).collect();
    assert_eq!(names, vec!["a", "b", "c"]);
}

// scenario 3
#[test]
fn wide_char_escape_parses_to_code_point() {
    let ds = defs("f() = w'\\U00ab1234'\n");
    let f = fun_def(&ds[0]);
    match &f.function {
        Function::UserDefinedFunction { body: Some(Expression::Literal(LiteralValue::WideCharValue(c), _)), .. } => {
            assert_eq!(*c, 0x00ab1234);
        }
        other => panic!("unexpected body: {other:?}"),
    }
}

// scenario 4 / invariant 8
#[test]
fn chained_negative_literal_subtraction_constant_folds() {
    let ds = defs("e = -102i8 - 1i8\n");
    let v = var_def(&ds[0]);
    match &v.variable {
        Variable::UserDefinedVariable { value: Some(Expression::Literal(lit, pos)), .. } => {
            assert_eq!(*lit, LiteralValue::IntValue(IntKind::I8, -103));
            assert_eq!((pos.line, pos.column), (1, 5));
        }
        other => panic!("unexpected value: {other:?}"),
    }
}

// invariant 8 variant: no whitespace around the operator still folds
#[test]
fn chained_negative_literal_subtraction_folds_without_whitespace() {
    let ds = defs("e = -102i8-1i8\n");
    let v = var_def(&ds[0]);
    match &v.variable {
        Variable::UserDefinedVariable { value: Some(Expression::Literal(lit, _)), .. } => {
            assert_eq!(*lit, LiteralValue::IntValue(IntKind::I8, -103));
        }
        other => panic!("unexpected value: {other:?}"),
    }
}

// scenario 5
#[test]
fn definition_position_is_the_identifier_not_the_modifier() {
    let ds = defs("inline\nf() = 1\n");
    let f = fun_def(&ds[0]);
    assert_eq!(f.inline, InlineModifier::Inline);
    assert_eq!((f.pos.line, f.pos.column), (2, 1));
}

// scenario 6
#[test]
fn imports_distinguish_relative_and_absolute_paths() {
    let ds = defs("import stdlib.somemodule1\nimport .somelib.somemodule2\nimport .;\n");
    assert_eq!(ds.len(), 3);
    match &ds[0] {
        Definition::Import(i) => match &i.target {
            Identifier::Relative(rel) => {
                assert_eq!(rel.segments(), &["stdlib".to_string(), "somemodule1".to_string()]);
            }
            other => panic!("expected relative identifier, got {other:?}"),
        },
        other => panic!("expected Import, got {other:?}"),
    }
    match &ds[1] {
        Definition::Import(i) => match &i.target {
            Identifier::Absolute(abs) => {
                assert_eq!(abs.segments(), &["somelib".to_string(), "somemodule2".to_string()]);
            }
            other => panic!("expected absolute identifier, got {other:?}"),
        },
        other => panic!("expected Import, got {other:?}"),
    }
    match &ds[2] {
        Definition::Import(i) => match &i.target {
            Identifier::Absolute(abs) => assert!(abs.segments().is_empty()),
            other => panic!("expected absolute identifier, got {other:?}"),
        },
        other => panic!("expected Import, got {other:?}"),
    }
}

// invariant 7
#[test]
fn unsuffixed_integer_literal_is_int64() {
    let ds = defs("v = 12345\n");
    let v = var_def(&ds[0]);
    match &v.variable {
        Variable::UserDefinedVariable { value: Some(Expression::Literal(lit, _)), .. } => {
            assert_eq!(*lit, LiteralValue::IntValue(IntKind::I64, 12345));
        }
        other => panic!("unexpected value: {other:?}"),
    }
}

#[test]
fn suffixed_integer_literals_parse_to_the_named_kind() {
    let ds = defs("a = 1i8\nb = 2i16\nc = 3i32\nd = 4i64\n");
    let kinds = [IntKind::I8, IntKind::I16, IntKind::I32, IntKind::I64];
    for (d, kind) in ds.iter().zip(kinds) {
        let v = var_def(d);
        match &v.variable {
            Variable::UserDefinedVariable { value: Some(Expression::Literal(LiteralValue::IntValue(k, _), _)), .. } => {
                assert_eq!(*k, kind);
            }
            other => panic!("unexpected value: {other:?}"),
        }
    }
}

// invariant 9
#[test]
fn infinity_keywords_parse_to_the_named_precision() {
    let ds = defs("a = inff\nb = infd\nc = inf\n");
    let expect = [(FloatKind::Single, true), (FloatKind::Double, true), (FloatKind::Double, true)];
    for (d, (kind, _pos)) in ds.iter().zip(expect) {
        let v = var_def(d);
        match &v.variable {
            Variable::UserDefinedVariable { value: Some(Expression::Literal(LiteralValue::FloatValue(k, f), _)), .. } => {
                assert_eq!(*k, kind);
                assert!(f.is_infinite() && f.is_sign_positive());
            }
            other => panic!("unexpected value: {other:?}"),
        }
    }
}

#[test]
fn nan_keywords_parse_to_nan() {
    let ds = defs("a = nanf\nb = nand\nc = nan\n");
    for d in &ds {
        let v = var_def(d);
        match &v.variable {
            Variable::UserDefinedVariable { value: Some(Expression::Literal(LiteralValue::FloatValue(_, f), _)), .. } => {
                assert!(f.is_nan());
            }
            other => panic!("unexpected value: {other:?}"),
        }
    }
}

#[test]
fn negative_infinity_literal_folds_sign_at_parse_time() {
    let ds = defs("a = -inff\nb = -infd\n");
    for d in &ds {
        let v = var_def(d);
        match &v.variable {
            Variable::UserDefinedVariable { value: Some(Expression::Literal(LiteralValue::FloatValue(_, f), _)), .. } => {
                assert!(f.is_infinite() && f.is_sign_negative());
            }
            other => panic!("unexpected value: {other:?}"),
        }
    }
}

// invariant 10
#[test]
fn nested_block_comments_are_a_single_comment() {
    let ds = defs("v = /* outer /* inner */ still outer */ 1\n");
    let v = var_def(&ds[0]);
    match &v.variable {
        Variable::UserDefinedVariable { value: Some(Expression::Literal(lit, _)), .. } => {
            assert_eq!(*lit, LiteralValue::IntValue(IntKind::I64, 1));
        }
        other => panic!("unexpected value: {other:?}"),
    }
}

#[test]
fn line_comments_run_to_end_of_line() {
    let ds = defs("v = 1 // trailing remark\nw = 2\n");
    assert_eq!(ds.len(), 2);
}

// invariant 11
#[test]
fn newlines_inside_parentheses_do_not_terminate_the_expression() {
    let ds = defs("f(x) = (\n  x\n)\n");
    let f = fun_def(&ds[0]);
    assert!(matches!(
        f.function,
        Function::UserDefinedFunction { body: Some(Expression::VariableExpression(..)), .. }
    ));
}

#[test]
fn expression_survives_a_newline_right_after_an_infix_symbol() {
    // '+' is a line-continuing token (spec.md §4.2), so the newline after it
    // is layout noise, not a statement separator.
    let ds = defs("g(x) = x +\n  1\n");
    assert_eq!(ds.len(), 1);
    let g = fun_def(&ds[0]);
    assert!(matches!(
        g.function,
        Function::UserDefinedFunction { body: Some(Expression::NonUniqueApplication { .. }), .. }
    ));
}

// invariant 12
#[test]
fn prefix_minus_on_a_non_literal_produces_unary_minus_application() {
    let ds = defs("f(x) = -x\n");
    let f = fun_def(&ds[0]);
    match &f.function {
        Function::UserDefinedFunction { body: Some(Expression::NonUniqueApplication { fun, args, .. }), .. } => {
            assert_op_named(fun, "unary_-");
            assert_eq!(args.len(), 1);
        }
        other => panic!("unexpected body: {other:?}"),
    }
}

#[test]
fn expression_without_any_space_separation_still_parses() {
    let ds = defs("g(x,y)=x+y\n");
    assert_eq!(ds.len(), 1);
    let g = fun_def(&ds[0]);
    assert!(matches!(
        g.function,
        Function::UserDefinedFunction { body: Some(Expression::NonUniqueApplication { .. }), .. }
    ));
}

#[test]
fn qualified_identifiers_parse_dotted_segments_in_expression_position() {
    let ds = defs("v = stdlib.io.put_str\n");
    let v = var_def(&ds[0]);
    match &v.variable {
        Variable::UserDefinedVariable { value: Some(Expression::VariableExpression(Identifier::Relative(rel), _)), .. } => {
            assert_eq!(rel.segments(), &["stdlib".to_string(), "io".to_string(), "put_str".to_string()]);
        }
        other => panic!("unexpected value: {other:?}"),
    }
}

#[test]
fn character_and_string_literals_parse_with_escapes() {
    let ds = defs("a = 'x'\nb = '\\n'\nc = \"hi\\tthere\"\n");
    let a = var_def(&ds[0]);
    match &a.variable {
        Variable::UserDefinedVariable { value: Some(Expression::Literal(LiteralValue::CharValue(c), _)), .. } => {
            assert_eq!(*c, b'x');
        }
        other => panic!("unexpected value: {other:?}"),
    }
    let b = var_def(&ds[1]);
    match &b.variable {
        Variable::UserDefinedVariable { value: Some(Expression::Literal(LiteralValue::CharValue(c), _)), .. } => {
            assert_eq!(*c, b'\n');
        }
        other => panic!("unexpected value: {other:?}"),
    }
    let c = var_def(&ds[2]);
    match &c.variable {
        Variable::UserDefinedVariable { value: Some(Expression::Literal(LiteralValue::StringValue(s), _)), .. } => {
            assert_eq!(s, b"hi\tthere");
        }
        other => panic!("unexpected value: {other:?}"),
    }
}

#[test]
fn wide_character_and_wide_string_literals_parse() {
    let ds = defs("a = w'\\uabcd'\nb = w\"hi\"\n");
    let a = var_def(&ds[0]);
    match &a.variable {
        Variable::UserDefinedVariable { value: Some(Expression::Literal(LiteralValue::WideCharValue(c), _)), .. } => {
            assert_eq!(*c, 0xabcd);
        }
        other => panic!("unexpected value: {other:?}"),
    }
    let b = var_def(&ds[1]);
    match &b.variable {
        Variable::UserDefinedVariable { value: Some(Expression::Literal(LiteralValue::WideStringValue(s), _)), .. } => {
            assert_eq!(s, &[b'h' as u32, b'i' as u32]);
        }
        other => panic!("unexpected value: {other:?}"),
    }
}

#[test]
fn floating_point_literal_forms_all_parse() {
    let ds = defs("a = 1.5\nb = 1.\nc = .5\nd = 1e10\ne = 1.5f\nf = 2.5d\n");
    assert_eq!(ds.len(), 6);
    for d in &ds {
        let v = var_def(d);
        assert!(matches!(
            v.variable,
            Variable::UserDefinedVariable { value: Some(Expression::Literal(LiteralValue::FloatValue(..), _)), .. }
        ));
    }
}

#[test]
fn unsuffixed_float_literal_is_double_precision() {
    let ds = defs("v = 1.5\n");
    let v = var_def(&ds[0]);
    match &v.variable {
        Variable::UserDefinedVariable { value: Some(Expression::Literal(LiteralValue::FloatValue(kind, f), _)), .. } => {
            assert_eq!(*kind, FloatKind::Double);
            assert_eq!(*f, 1.5);
        }
        other => panic!("unexpected value: {other:?}"),
    }
}

#[test]
fn negative_float_literal_in_value_position_folds_the_sign() {
    let ds = defs("v = -1.5\n");
    let v = var_def(&ds[0]);
    match &v.variable {
        Variable::UserDefinedVariable { value: Some(Expression::Literal(LiteralValue::FloatValue(_, f), _)), .. } => {
            assert_eq!(*f, -1.5);
        }
        other => panic!("unexpected value: {other:?}"),
    }
}

#[test]
fn syntax_errors_are_collected_and_parsing_continues_past_them() {
    let (tree, errors) = parse_one("v = )\nw = 2\n");
    assert!(!errors.is_empty());
    let names: Vec<&str> = tree
        .iter()
        .filter_map(|d| match d {
            Definition::VariableDefinition(v) => Some(v.ident.as_str()),
            _ => None,
        })
        .collect();
    assert!(names.contains(&"w"), "recovery should still parse `w`: {names:?}");
}

#[test]
fn conflicting_extern_and_native_modifiers_are_rejected() {
    let (_tree, errors) = parse_one("extern native f(): Int = f_impl\n");
    assert!(!errors.is_empty());
    assert!(errors.iter().any(|e: &Error| matches!(
        e.kind,
        lesfl_frontend::ErrorKind::ConflictingModifiers("extern", "native")
            | lesfl_frontend::ErrorKind::ConflictingModifiers("native", "extern")
    )));
}

#[test]
fn duplicate_inline_modifier_is_rejected() {
    let (_tree, errors) = parse_one("inline inline f() = 1\n");
    assert!(!errors.is_empty());
    assert!(errors
        .iter()
        .any(|e: &Error| matches!(e.kind, lesfl_frontend::ErrorKind::DuplicateModifier("inline"))));
}

#[test]
fn module_definition_nests_a_sub_program() {
    let ds = defs("module m { v = 1; w = 2 }\n");
    assert_eq!(ds.len(), 1);
    match &ds[0] {
        Definition::ModuleDefinition(m) => {
            assert_eq!(m.body.len(), 2);
            match &m.target {
                Identifier::Relative(rel) => assert_eq!(rel.segments(), &["m".to_string()]),
                other => panic!("expected relative module path, got {other:?}"),
            }
        }
        other => panic!("expected ModuleDefinition, got {other:?}"),
    }
}

#[test]
fn uppercase_constructor_call_produces_constructor_value() {
    let ds = defs("v = Some(1)\n");
    let v = var_def(&ds[0]);
    match &v.variable {
        Variable::UserDefinedVariable { value: Some(Expression::ConstructorValue { constr_ident, args, .. }), .. } => {
            match constr_ident {
                Identifier::Relative(rel) => assert_eq!(rel.segments(), &["Some".to_string()]),
                other => panic!("expected relative identifier, got {other:?}"),
            }
            assert_eq!(args.len(), 1);
        }
        other => panic!("unexpected value: {other:?}"),
    }
}

#[test]
fn nullary_uppercase_name_is_still_a_constructor_value() {
    let ds = defs("v = None\n");
    let v = var_def(&ds[0]);
    assert!(matches!(
        v.variable,
        Variable::UserDefinedVariable { value: Some(Expression::ConstructorValue { .. }), .. }
    ));
}

#[test]
fn datatype_definition_parses_a_piped_constructor_list() {
    let ds = defs("datatype Opt(a) = None | Some(a)\n");
    assert_eq!(ds.len(), 1);
    match &ds[0] {
        Definition::TypeFunctionDefinition(t) => {
            assert_eq!(t.ident, "Opt");
        }
        other => panic!("expected TypeFunctionDefinition, got {other:?}"),
    }
}

#[test]
fn unique_datatype_with_named_fields_parses() {
    let ds = defs("unique datatype Point = Point { x: Int, y: Int }\n");
    match &ds[0] {
        Definition::TypeVariableDefinition(t) => {
            assert_eq!(t.ident, "Point");
        }
        other => panic!("expected TypeVariableDefinition, got {other:?}"),
    }
}

#[test]
fn extern_function_definition_parses_the_binding_name() {
    let ds = defs("extern add(a: Int, b: Int): Int = native_add\n");
    let f = fun_def(&ds[0]);
    assert_eq!(f.ident, "add");
    match &f.function {
        Function::ExternalFunction { extern_name, .. } => assert_eq!(extern_name, "native_add"),
        other => panic!("unexpected function: {other:?}"),
    }
}

#[test]
fn native_function_definition_parses_the_binding_name() {
    let ds = defs("native add(a: Int, b: Int): Int = native_add\n");
    let f = fun_def(&ds[0]);
    assert_eq!(f.ident, "add");
    match &f.function {
        Function::NativeFunction { native_name, .. } => assert_eq!(native_name, "native_add"),
        other => panic!("unexpected function: {other:?}"),
    }
}

#[test]
fn template_function_with_type_params_sets_instantiation_state() {
    let ds = defs("template(t) id(x: t): t = x\n");
    let f = fun_def(&ds[0]);
    assert!(f.is_template);
    assert_eq!(f.inst_type_params.as_ref().map(Vec::len), Some(1));
}

#[test]
fn instance_wraps_the_specialized_definition() {
    let ds = defs("instance\nf(): Int = 1\n");
    match &ds[0] {
        Definition::FunctionInstanceDefinition(i) => {
            assert_eq!(i.definition.ident, "f");
            assert_eq!((i.pos.line, i.pos.column), (2, 1));
        }
        other => panic!("expected FunctionInstanceDefinition, got {other:?}"),
    }
}

#[test]
fn infix_operator_defining_function_head_parses() {
    let ds = defs("(a: Int) ++ (b: Int): Int = a\n");
    let f = fun_def(&ds[0]);
    assert_eq!(f.ident, "++");
    match &f.function {
        Function::UserDefinedFunction { args, .. } => assert_eq!(args.len(), 2),
        other => panic!("unexpected function: {other:?}"),
    }
}

#[test]
fn prefix_operator_defining_function_head_parses() {
    let ds = defs("-(x: Int): Int = x\n");
    let f = fun_def(&ds[0]);
    assert_eq!(f.ident, "unary_-");
    match &f.function {
        Function::UserDefinedFunction { args, .. } => assert_eq!(args.len(), 1),
        other => panic!("unexpected function: {other:?}"),
    }
}
