//! A small term rewriter assembled from independently declared methods.
//!
//! `rewrite` recurses through the frozen method set it belongs to, `head`
//! is declared exhaustively, and `set` dispatches on the first element of
//! an argument pair. Handlers only hold a weak handle on the method set
//! that owns them.

use polymethod::{
    BuildError, DispatchError, Dispatchable, Method, MethodRegistry, Methods, PolymethodError,
    VariantSet,
};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, OnceLock, Weak},
};

// ============================================================================
// Terms
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct Symbol(String);

fn sym(name: &str) -> Symbol {
    Symbol(name.to_string())
}

#[derive(Clone, Debug, PartialEq)]
struct Complex {
    re: f64,
    im: f64,
}

#[derive(Clone, Debug, PartialEq)]
struct Expression {
    head: Symbol,
    args: Vec<Term>,
}

#[derive(Clone, Debug, PartialEq, Dispatchable)]
enum Term {
    Integer(i64),
    Real(f64),
    Complex(Complex),
    Str(String),
    Symbol(Symbol),
    Expression(Expression),
    List(Vec<Term>),
}

fn expr(head: &str, args: Vec<Term>) -> Term {
    Term::Expression(Expression {
        head: sym(head),
        args,
    })
}

fn symbol(name: &str) -> Term {
    Term::Symbol(sym(name))
}

// ============================================================================
// Interpreter
// ============================================================================

type Symbols = Arc<Mutex<HashMap<Symbol, Term>>>;

struct Interpreter {
    methods: Arc<OnceLock<Methods>>,
}

impl Interpreter {
    fn new() -> Self {
        let methods: Arc<OnceLock<Methods>> = Arc::new(OnceLock::new());
        let symbols: Symbols = Arc::default();
        let mut registry = MethodRegistry::new();

        let rewrite = registry.method::<Term, Term>("rewrite");
        for kind in [
            TermKind::Integer,
            TermKind::Real,
            TermKind::Complex,
            TermKind::Str,
        ] {
            rewrite.declare(kind, |t: &Term| Ok(t.clone())).unwrap();
        }

        let bound = symbols.clone();
        rewrite
            .declare_variant(move |s: &Symbol| {
                let value = bound.lock().unwrap().get(s).cloned();
                Ok(value.unwrap_or_else(|| Term::Symbol(s.clone())))
            })
            .unwrap();

        let inner = Arc::downgrade(&methods);
        rewrite
            .declare_variant(move |e: &Expression| {
                let args = e
                    .args
                    .iter()
                    .map(|arg| rewrite_with(&inner, arg))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(apply(&e.head, args))
            })
            .unwrap();

        let bound = symbols.clone();
        let inner = Arc::downgrade(&methods);
        registry
            .declare::<(Term, Term), Term, _>(
                "set",
                TermKind::Symbol,
                move |(target, value): &(Term, Term)| {
                    let Term::Symbol(name) = target else {
                        return Err(DispatchError::handler("set target is not a symbol"));
                    };
                    let value = rewrite_with(&inner, value)?;
                    bound.lock().unwrap().insert(name.clone(), value.clone());
                    Ok(value)
                },
            )
            .unwrap();

        methods.set(registry.freeze()).unwrap();
        Self { methods }
    }

    fn methods(&self) -> &Methods {
        self.methods.get().unwrap()
    }

    fn rewrite(&self, term: &Term) -> Result<Term, PolymethodError> {
        self.methods().invoke::<Term, Term>("rewrite", term)
    }

    fn set(&self, target: Term, value: Term) -> Result<Term, PolymethodError> {
        self.methods()
            .invoke::<(Term, Term), Term>("set", &(target, value))
    }
}

fn rewrite_with(methods: &Weak<OnceLock<Methods>>, term: &Term) -> Result<Term, DispatchError> {
    let shared = methods
        .upgrade()
        .ok_or_else(|| DispatchError::handler("interpreter already dropped"))?;
    let methods = shared
        .get()
        .ok_or_else(|| DispatchError::handler("rewrite called before freeze"))?;
    methods
        .get::<Term, Term>("rewrite")
        .map_err(DispatchError::handler)?
        .invoke(term)
}

fn apply(head: &Symbol, args: Vec<Term>) -> Term {
    let folded = match head.0.as_str() {
        "Plus" => fold(&args, 0, 0.0, |a, b| a + b, |a, b| a + b),
        "Times" => fold(&args, 1, 1.0, |a, b| a * b, |a, b| a * b),
        _ => None,
    };
    folded.unwrap_or_else(|| {
        Term::Expression(Expression {
            head: head.clone(),
            args,
        })
    })
}

// Integers stay integers; any real argument promotes the result.
fn fold(
    args: &[Term],
    int: i64,
    real: f64,
    on_int: fn(i64, i64) -> i64,
    on_real: fn(f64, f64) -> f64,
) -> Option<Term> {
    if args.iter().all(|a| matches!(a, Term::Integer(_))) {
        let n = args.iter().fold(int, |acc, a| match a {
            Term::Integer(n) => on_int(acc, *n),
            _ => acc,
        });
        return Some(Term::Integer(n));
    }

    let mut acc = real;
    for arg in args {
        acc = match arg {
            Term::Integer(n) => on_real(acc, *n as f64),
            Term::Real(x) => on_real(acc, *x),
            _ => return None,
        };
    }
    Some(Term::Real(acc))
}

fn head_builder() -> polymethod::MethodBuilder<Term, Symbol> {
    let mut head = Method::<Term, Symbol>::builder("head");
    head.declare_variant(|_: &i64| Ok(sym("Integer")))
        .unwrap()
        .declare_variant(|_: &f64| Ok(sym("Real")))
        .unwrap()
        .declare_variant(|_: &Complex| Ok(sym("Complex")))
        .unwrap()
        .declare_variant(|_: &String| Ok(sym("String")))
        .unwrap()
        .declare_variant(|_: &Symbol| Ok(sym("Symbol")))
        .unwrap()
        .declare_variant(|e: &Expression| Ok(e.head.clone()))
        .unwrap();
    head
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn test_literals_rewrite_to_themselves() {
    let interp = Interpreter::new();
    let literals = [
        Term::Integer(7),
        Term::Real(0.5),
        Term::Complex(Complex { re: 1.0, im: -1.0 }),
        Term::Str("plain".to_string()),
    ];

    for literal in literals {
        assert_eq!(interp.rewrite(&literal).unwrap(), literal);
    }
}

#[test]
fn test_plus_of_integers() {
    let interp = Interpreter::new();
    let sum = expr(
        "Plus",
        vec![Term::Integer(1), Term::Integer(2), Term::Integer(3)],
    );

    assert_eq!(interp.rewrite(&sum).unwrap(), Term::Integer(6));
}

#[test]
fn test_nested_expressions_rewrite_inside_out() {
    let interp = Interpreter::new();
    let term = expr(
        "Times",
        vec![
            Term::Integer(2),
            expr("Plus", vec![Term::Integer(1), Term::Real(2.5)]),
        ],
    );

    assert_eq!(interp.rewrite(&term).unwrap(), Term::Real(7.0));
}

#[test]
fn test_unknown_head_keeps_rewritten_arguments() {
    let interp = Interpreter::new();
    let term = expr(
        "f",
        vec![expr("Plus", vec![Term::Integer(1), Term::Integer(1)])],
    );

    assert_eq!(
        interp.rewrite(&term).unwrap(),
        expr("f", vec![Term::Integer(2)])
    );
}

#[test]
fn test_set_binds_a_symbol() {
    let interp = Interpreter::new();

    assert_eq!(interp.rewrite(&symbol("x")).unwrap(), symbol("x"));

    let value = interp
        .set(
            symbol("x"),
            expr("Times", vec![Term::Integer(6), Term::Integer(7)]),
        )
        .unwrap();
    assert_eq!(value, Term::Integer(42));

    assert_eq!(interp.rewrite(&symbol("x")).unwrap(), Term::Integer(42));
    assert_eq!(
        interp
            .rewrite(&expr("Plus", vec![symbol("x"), Term::Integer(1)]))
            .unwrap(),
        Term::Integer(43)
    );
    assert_eq!(interp.rewrite(&symbol("y")).unwrap(), symbol("y"));
}

#[test]
fn test_set_dispatches_on_its_first_argument() {
    let interp = Interpreter::new();

    let err = interp.set(Term::Integer(1), Term::Integer(2)).unwrap_err();
    match err {
        PolymethodError::Dispatch(DispatchError::UnimplementedForType { method, kind }) => {
            assert_eq!(method, "set");
            assert_eq!(kind, "Integer");
        }
        other => panic!("expected UnimplementedForType, got {other:?}"),
    }
}

#[test]
fn test_lists_have_no_rewrite() {
    let interp = Interpreter::new();
    let list = Term::List(vec![Term::Integer(1)]);

    assert!(interp.rewrite(&list).unwrap_err().is_unimplemented());

    // The nested failure surfaces unchanged through the enclosing handler.
    let err = interp
        .rewrite(&expr("Plus", vec![Term::Integer(1), list]))
        .unwrap_err();
    assert!(matches!(
        err,
        PolymethodError::Dispatch(DispatchError::UnimplementedForType { ref method, ref kind })
            if method == "rewrite" && kind == "List"
    ));
}

#[test]
fn test_head_must_cover_every_kind() {
    let err = head_builder().build_exhaustive().unwrap_err();
    assert_eq!(
        err,
        BuildError::MissingVariants {
            method: "head".to_string(),
            kinds: vec!["List".to_string()],
        }
    );

    let mut complete = head_builder();
    complete
        .declare_variant(|_: &Vec<Term>| Ok(sym("List")))
        .unwrap();
    let head = complete.build_exhaustive().unwrap();

    assert_eq!(head.kinds().count(), TermKind::ALL.len());
    assert_eq!(head.invoke(&Term::Integer(1)).unwrap(), sym("Integer"));
    assert_eq!(head.invoke(&Term::List(Vec::new())).unwrap(), sym("List"));
    assert_eq!(head.invoke(&expr("Plus", Vec::new())).unwrap(), sym("Plus"));
}

#[test]
fn test_kind_of_each_term() {
    assert_eq!(Term::Real(1.0).kind(), TermKind::Real);
    assert_eq!(symbol("x").kind(), TermKind::Symbol);
    assert_eq!((symbol("x"), Term::Integer(1)).kind(), TermKind::Symbol);
    assert_eq!(TermKind::Expression.name(), "Expression");
}

#[test]
fn test_interpreter_is_released_on_drop() {
    let interp = Interpreter::new();
    let methods = Arc::downgrade(&interp.methods);

    let sum = expr("Plus", vec![Term::Integer(1), Term::Integer(2)]);
    assert_eq!(interp.rewrite(&sum).unwrap(), Term::Integer(3));

    drop(interp);
    assert!(methods.upgrade().is_none());
}
