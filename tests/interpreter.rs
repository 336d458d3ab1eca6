mod common;

use pretty_assertions::assert_eq;

use rox::interpreter::MAX_CALL_DEPTH;
use rox::lox::Outcome;

fn output_of(source: &str) -> String {
    let result = common::run(source);
    assert_eq!(result.outcome, Outcome::Ok, "errors: {:?}", result.errors);
    result.output
}

fn runtime_error_of(source: &str) -> (String, String) {
    let result = common::run(source);
    assert_eq!(result.outcome, Outcome::RuntimeError, "output: {}", result.output);
    assert_eq!(result.errors.len(), 1);
    (result.errors[0].clone(), result.output)
}

#[test]
fn arithmetic_and_concatenation() {
    assert_eq!(output_of("print 1 + 1;"), "2\n");
    assert_eq!(output_of("print \"a\" + \"b\";"), "ab\n");
    assert_eq!(output_of("print (1 + 2) * 3 - 4 / 2;"), "7\n");
    assert_eq!(output_of("print -(3);"), "-3\n");
}

#[test]
fn number_stringification() {
    assert_eq!(output_of("print 3.0;"), "3\n");
    assert_eq!(output_of("print 3.250;"), "3.25\n");
    assert_eq!(output_of("print 1 / 4;"), "0.25\n");
    assert_eq!(output_of("print 10 / 4 * 4;"), "10\n");
}

#[test]
fn mixed_plus_is_a_runtime_error() {
    let (error, _) = runtime_error_of("print \"a\" + 1;");
    assert_eq!(error, "Operands must be two numbers or two strings.\n[line 1]");
}

#[test]
fn operand_type_checks() {
    assert_eq!(
        runtime_error_of("print -\"x\";").0,
        "Operand must be a number.\n[line 1]"
    );
    assert_eq!(
        runtime_error_of("print 1 < \"2\";").0,
        "Operands must be numbers.\n[line 1]"
    );
    assert_eq!(
        runtime_error_of("\n\nprint nil * 2;").0,
        "Operands must be numbers.\n[line 3]"
    );
}

#[test]
fn equality_and_truthiness() {
    let source = "
        print nil == nil;
        print nil == false;
        print 1 == 1;
        print \"a\" == \"a\";
        print 1 == \"1\";
        print 1 != 2;
        print !nil;
        print !0;
        print !\"\";
        if (0) print \"zero is truthy\";";

    assert_eq!(
        output_of(source),
        "true\nfalse\ntrue\ntrue\nfalse\ntrue\ntrue\nfalse\nfalse\nzero is truthy\n"
    );
}

#[test]
fn logical_operators_short_circuit_and_return_operands() {
    let source = "
        print nil or \"yes\";
        print 1 and 2;
        print false and undefined;
        print true or undefined;";

    assert_eq!(output_of(source), "yes\n2\nfalse\ntrue\n");
}

#[test]
fn variables_blocks_and_shadowing() {
    let source = "
        var a = \"global a\";
        var b = \"global b\";
        {
          var a = \"outer a\";
          {
            var a = \"inner a\";
            print a;
            print b;
          }
          print a;
        }
        print a;
        var c;
        print c;";

    assert_eq!(
        output_of(source),
        "inner a\nglobal b\nouter a\nglobal a\nnil\n"
    );
}

#[test]
fn control_flow() {
    let source = "
        var i = 0;
        while (i < 3) { print i; i = i + 1; }
        for (var j = 0; j < 2; j = j + 1) print j * 10;
        if (i == 3) print \"then\"; else print \"else\";
        if (i != 3) print \"then\"; else print \"else\";";

    assert_eq!(output_of(source), "0\n1\n2\n0\n10\nthen\nelse\n");
}

#[test]
fn undefined_variable() {
    assert_eq!(
        runtime_error_of("print nope;").0,
        "Undefined variable 'nope'.\n[line 1]"
    );
    assert_eq!(
        runtime_error_of("nope = 1;").0,
        "Undefined variable 'nope'.\n[line 1]"
    );
}

#[test]
fn runtime_error_stops_remaining_statements() {
    let (_, output) = runtime_error_of("print 1;\nprint -nil;\nprint 2;");
    assert_eq!(output, "1\n");
}

#[test]
fn static_error_runs_nothing() {
    let result = common::run("print 1;\nprint 2 +;");
    assert_eq!(result.outcome, Outcome::StaticError);
    assert_eq!(result.output, "");
}

#[test]
fn functions_and_recursion() {
    let source = "
        fun fib(n) {
          if (n < 2) return n;
          return fib(n - 2) + fib(n - 1);
        }
        print fib(10);
        fun noReturn() {}
        print noReturn();
        print fib;
        print clock;";

    assert_eq!(output_of(source), "55\nnil\n<fn fib>\n<native fn>\n");
}

#[test]
fn return_unwinds_through_loops_and_blocks() {
    let source = "
        fun find() {
          var i = 0;
          while (true) {
            { if (i == 4) return i; }
            i = i + 1;
          }
        }
        print find();
        var after = \"env restored\";
        print after;";

    assert_eq!(output_of(source), "4\nenv restored\n");
}

#[test]
fn closures_capture_by_reference() {
    let source = "
        fun makeCounter() {
          var count = 0;
          fun inc() { count = count + 1; return count; }
          return inc;
        }
        var c1 = makeCounter();
        print c1();
        print c1();
        var c2 = makeCounter();
        print c2();
        print c1();";

    assert_eq!(output_of(source), "1\n2\n1\n3\n");
}

#[test]
fn closures_share_one_frame() {
    let source = "
        var get; var set;
        fun pair() {
          var value = \"initial\";
          fun g() { return value; }
          fun s(v) { value = v; }
          get = g; set = s;
        }
        pair();
        set(\"updated\");
        print get();";

    assert_eq!(output_of(source), "updated\n");
}

#[test]
fn closure_binds_at_declaration() {
    let source = "
        var a = \"global\";
        {
          fun showA() { print a; }
          showA();
          var a = \"block\";
          showA();
        }";

    assert_eq!(output_of(source), "global\nglobal\n");
}

#[test]
fn arity_is_exact() {
    assert_eq!(
        runtime_error_of("fun f() {}\nf(1);").0,
        "Expected 0 arguments but got 1.\n[line 2]"
    );
    assert_eq!(
        runtime_error_of("fun g(a, b) {} g(1);").0,
        "Expected 2 arguments but got 1.\n[line 1]"
    );
    assert_eq!(
        runtime_error_of("class P { init(x) {} } P();").0,
        "Expected 1 arguments but got 0.\n[line 1]"
    );
}

#[test]
fn only_functions_and_classes_are_callable() {
    assert_eq!(
        runtime_error_of("\"str\"();").0,
        "Can only call functions and classes.\n[line 1]"
    );
}

#[test]
fn classes_fields_and_methods() {
    let source = "
        class Point {
          init(x, y) { this.x = x; this.y = y; }
          sum() { return this.x + this.y; }
        }
        var p = Point(1, 2);
        print p.sum();
        p.x = 10;
        print p.sum();
        p.label = \"free field\";
        print p.label;
        print Point;
        print p;
        var m = p.sum;
        p.y = 0;
        print m();";

    assert_eq!(
        output_of(source),
        "3\n12\nfree field\nPoint\nPoint instance\n10\n"
    );
}

#[test]
fn property_errors() {
    assert_eq!(
        runtime_error_of("class A {} A().missing;").0,
        "Undefined property 'missing'.\n[line 1]"
    );
    assert_eq!(
        runtime_error_of("var x = 1; print x.y;").0,
        "Only instances have properties.\n[line 1]"
    );
    assert_eq!(
        runtime_error_of("var x = 1; x.y = 2;").0,
        "Only instances have fields.\n[line 1]"
    );
}

#[test]
fn initializer_always_yields_instance() {
    let source = "
        class Foo {
          init() { this.ready = true; return; }
        }
        var foo = Foo();
        print foo.ready;
        print foo.init();
        print foo.init() == foo;";

    assert_eq!(output_of(source), "true\nFoo instance\ntrue\n");
}

#[test]
fn inheritance_and_super_dispatch() {
    let source = "
        class A {
          method() { return \"A method\"; }
          who() { return \"A sees \" + this.name; }
        }
        class B < A {
          method() { return \"B method / \" + super.method(); }
        }
        class C < B {}
        var c = C();
        c.name = \"c\";
        print c.method();
        print c.who();
        print B().method();";

    assert_eq!(
        output_of(source),
        "B method / A method\nA sees c\nB method / A method\n"
    );
}

#[test]
fn super_binds_current_instance_not_subclass_method() {
    let source = "
        class Base {
          describe() { return \"base of \" + this.tag(); }
          tag() { return \"base\"; }
        }
        class Derived < Base {
          tag() { return \"derived\"; }
          describe() { return super.describe(); }
        }
        print Derived().describe();";

    assert_eq!(output_of(source), "base of derived\n");
}

#[test]
fn inherited_init_sets_arity() {
    let source = "
        class A { init(n) { this.n = n; } }
        class B < A {}
        print B(7).n;";

    assert_eq!(output_of(source), "7\n");
}

#[test]
fn superclass_must_be_a_class() {
    assert_eq!(
        runtime_error_of("var NotClass = 1;\nclass Sub < NotClass {}").0,
        "Superclass must be a class.\n[line 2]"
    );
}

#[test]
fn undefined_super_method() {
    assert_eq!(
        runtime_error_of("class A {} class B < A { m() { super.nope(); } } B().m();").0,
        "Undefined property 'nope'.\n[line 1]"
    );
}

#[test]
fn runaway_recursion_is_a_runtime_error() {
    let result = common::run("fun down(n) { return down(n + 1); }\ndown(0);");

    assert_eq!(result.outcome, Outcome::RuntimeError);
    assert_eq!(result.errors, vec!["Stack overflow.\n[line 1]"]);
}

#[test]
fn ordinary_deep_recursion_succeeds() {
    let source = "
        fun sum(n) { if (n == 0) return 0; return n + sum(n - 1); }
        print sum(300);
        print sum(3000);";

    assert_eq!(output_of(source), "45150\n4501500\n");
}

#[test]
fn guard_sits_at_max_call_depth() {
    let source = format!(
        "fun down(n) {{ if (n == 0) return \"bottom\"; return down(n - 1); }}\n\
         print down({});\n\
         print down({});",
        MAX_CALL_DEPTH - 1,
        MAX_CALL_DEPTH
    );

    let result = common::run(&source);
    assert_eq!(result.outcome, Outcome::RuntimeError);
    assert_eq!(result.output, "bottom\n");
    assert_eq!(result.errors, vec!["Stack overflow.\n[line 1]"]);
}

#[test]
fn deeply_nested_expression_evaluates() {
    let depth = 5_000;
    let source = format!("print {}1{};", "(".repeat(depth), ")".repeat(depth));

    assert_eq!(output_of(&source), "1\n");
}

#[test]
fn globals_persist_across_runs() {
    let buffer = common::SharedBuffer::default();
    let mut lox = rox::lox::Lox::with_output(Box::new(buffer.clone()));

    assert_eq!(lox.run("var x = 1; fun bump() { x = x + 1; }"), Outcome::Ok);
    assert_eq!(lox.run("print oops +;"), Outcome::StaticError);
    assert!(lox.diagnostics().had_error());
    assert_eq!(lox.run("bump(); print x;"), Outcome::Ok);
    assert!(!lox.diagnostics().had_error());

    assert_eq!(lox.run("print -nil;"), Outcome::RuntimeError);
    assert!(lox.diagnostics().had_runtime_error());
    assert!(!lox.diagnostics().had_error());
    assert_eq!(lox.run("print x;"), Outcome::Ok);
    assert!(!lox.diagnostics().had_runtime_error());

    assert_eq!(buffer.contents(), "2\n2\n");
    assert_eq!(Outcome::RuntimeError.exit_code(), 70);
    assert_eq!(Outcome::StaticError.exit_code(), 65);
}
