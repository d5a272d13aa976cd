use std::any::Any;
use std::borrow::Cow;
use std::cell::RefCell;
use std::fmt;
use std::fmt::Write as _;
use std::rc::Rc;

use lasso::{Rodeo, Spur};

use crate::env::Env;

thread_local! {
    static INTERNER: RefCell<Rodeo> = RefCell::new(Rodeo::default());
}

/// Intern a string, returning its key.
pub fn intern(s: &str) -> Spur {
    INTERNER.with(|i| i.borrow_mut().get_or_intern(s))
}

/// Resolve an interned key back to an owned string.
pub fn resolve(spur: Spur) -> String {
    INTERNER.with(|i| i.borrow().resolve(&spur).to_string())
}

/// Run `f` with the resolved string, without allocating.
pub fn with_resolved<R>(spur: Spur, f: impl FnOnce(&str) -> R) -> R {
    INTERNER.with(|i| f(i.borrow().resolve(&spur)))
}

/// A cons cell. Immutable once built; list constructors assemble the
/// spine before any cell is shared.
pub struct Pair {
    pub car: Value,
    pub cdr: Value,
}

/// A user-defined procedure. `params` is nil, a bare Symbol, or a
/// (possibly improper) list of Symbols; `body` is a `(begin ...)` list;
/// `env` is the environment the lambda was created in, so invocation
/// sees definition-site bindings rather than the caller's.
pub struct Lambda {
    pub params: Value,
    pub body: Value,
    pub env: Env,
}

pub type NativeFnInner = dyn Fn(&Env, &Value) -> Value;

/// A host procedure: called with the current environment and the
/// already-evaluated argument list (a proper list Value).
pub struct NativeFn {
    pub name: String,
    pub func: Box<NativeFnInner>,
}

impl NativeFn {
    pub fn new(name: impl Into<String>, func: impl Fn(&Env, &Value) -> Value + 'static) -> Self {
        Self {
            name: name.into(),
            func: Box::new(func),
        }
    }
}

impl fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeFn({})", self.name)
    }
}

/// Signature shared by procedure application helpers so native functions
/// can apply procedures without depending on the evaluator crate.
pub type ApplyFn = fn(&Env, &Value, &Value) -> Value;

/// Destructor for a foreign payload. Its address doubles as the handle's
/// type tag: a native function only touches handles whose destructor is
/// its own.
pub type ForeignDtor = fn(Box<dyn Any>);

/// An opaque host resource threaded through the language. The payload is
/// inaccessible to interpreted code except through native functions that
/// recognize the destructor.
pub struct Foreign {
    data: Option<Box<dyn Any>>,
    dtor: ForeignDtor,
}

impl Foreign {
    pub fn new(data: Box<dyn Any>, dtor: ForeignDtor) -> Self {
        Self {
            data: Some(data),
            dtor,
        }
    }

    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.data.as_deref().and_then(|d| d.downcast_ref::<T>())
    }

    pub fn dtor(&self) -> ForeignDtor {
        self.dtor
    }

    fn data_ptr(&self) -> *const () {
        match self.data.as_deref() {
            Some(d) => d as *const dyn Any as *const (),
            None => std::ptr::null(),
        }
    }
}

impl Drop for Foreign {
    fn drop(&mut self) {
        if let Some(data) = self.data.take() {
            (self.dtor)(data);
        }
    }
}

/// The tagged value at the heart of the interpreter. `Nil` stands for the
/// empty list and for "no value"; it is the only variant that owns
/// nothing.
#[derive(Clone)]
pub enum Value {
    Nil,
    True,
    False,
    Symbol(Spur),
    Atom(Rc<str>),
    Pair(Rc<Pair>),
    Lambda(Rc<Lambda>),
    NativeFn(Rc<NativeFn>),
    Foreign(Rc<Foreign>),
    Error(Rc<str>),
}

impl Value {
    pub fn symbol(name: &str) -> Self {
        Value::Symbol(intern(name))
    }

    pub fn atom(text: impl Into<Rc<str>>) -> Self {
        Value::Atom(text.into())
    }

    /// A numeric atom, formatted with enough digits to round-trip.
    pub fn number(n: f64) -> Self {
        Value::Atom(format_number(n).into())
    }

    pub fn bool(b: bool) -> Self {
        if b {
            Value::True
        } else {
            Value::False
        }
    }

    pub fn cons(car: Value, cdr: Value) -> Self {
        Value::Pair(Rc::new(Pair { car, cdr }))
    }

    pub fn error(text: impl Into<Rc<str>>) -> Self {
        Value::Error(text.into())
    }

    pub fn native(name: &str, func: impl Fn(&Env, &Value) -> Value + 'static) -> Self {
        Value::NativeFn(Rc::new(NativeFn::new(name, func)))
    }

    pub fn foreign(data: Box<dyn Any>, dtor: ForeignDtor) -> Self {
        Value::Foreign(Rc::new(Foreign::new(data, dtor)))
    }

    /// Build a proper list from `items`.
    pub fn list(items: Vec<Value>) -> Self {
        Self::list_with_tail(items, Value::Nil)
    }

    /// Build a list from `items` ending in `tail` (nil for a proper
    /// list, anything else for a dotted one).
    pub fn list_with_tail(items: Vec<Value>, tail: Value) -> Self {
        items
            .into_iter()
            .rev()
            .fold(tail, |acc, item| Value::cons(item, acc))
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// The car of a pair, nil for anything else.
    pub fn car(&self) -> Value {
        match self {
            Value::Pair(p) => p.car.clone(),
            _ => Value::Nil,
        }
    }

    /// The cdr of a pair, nil for anything else.
    pub fn cdr(&self) -> Value {
        match self {
            Value::Pair(p) => p.cdr.clone(),
            _ => Value::Nil,
        }
    }

    pub fn as_pair(&self) -> Option<&Pair> {
        match self {
            Value::Pair(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<Spur> {
        match self {
            Value::Symbol(s) => Some(*s),
            _ => None,
        }
    }

    /// The numeric value of a numeric atom.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Atom(t) if is_numeric_text(t) => t.parse().ok(),
            _ => None,
        }
    }

    /// Text coercion used by natives that expect a number: the value's
    /// text parsed as a float, 0 when it does not parse.
    pub fn to_f64(&self) -> f64 {
        self.text().parse().unwrap_or(0.0)
    }

    /// Literal text for symbols, atoms, and errors; `"true"`/`"false"`
    /// for the booleans; empty for everything else.
    pub fn text(&self) -> Cow<'_, str> {
        match self {
            Value::True => Cow::Borrowed("true"),
            Value::False => Cow::Borrowed("false"),
            Value::Atom(t) | Value::Error(t) => Cow::Borrowed(&**t),
            Value::Symbol(s) => Cow::Owned(resolve(*s)),
            _ => Cow::Borrowed(""),
        }
    }

    /// Iterate over the cars of the pair spine, stopping at the first
    /// non-pair cdr.
    pub fn iter(&self) -> ListIter<'_> {
        ListIter { cur: self }
    }

    /// Number of pairs along the spine; an improper tail is not counted.
    pub fn list_len(&self) -> usize {
        self.iter().count()
    }

    // ------------------------------------------------------------------
    // Predicates
    // ------------------------------------------------------------------

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn is_pair(&self) -> bool {
        matches!(self, Value::Pair(_))
    }

    pub fn is_symbol(&self) -> bool {
        matches!(self, Value::Symbol(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self, Value::True | Value::False)
    }

    /// Everything except `#f` is truthy, nil included.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::False)
    }

    pub fn is_procedure(&self) -> bool {
        matches!(self, Value::Lambda(_) | Value::NativeFn(_))
    }

    pub fn is_atom(&self) -> bool {
        matches!(self, Value::Atom(_))
    }

    pub fn is_foreign(&self) -> bool {
        matches!(self, Value::Foreign(_))
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Atom(t) if is_numeric_text(t))
    }

    /// Nil, or a pair chain whose every cdr ends in nil.
    pub fn is_list(&self) -> bool {
        let mut cur = self;
        loop {
            match cur {
                Value::Nil => return true,
                Value::Pair(p) => cur = &p.cdr,
                _ => return false,
            }
        }
    }

    /// Pointer identity: singletons by tag, symbols by interned key,
    /// heap values by allocation.
    pub fn identical(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil)
            | (Value::True, Value::True)
            | (Value::False, Value::False) => true,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Atom(a), Value::Atom(b)) => Rc::ptr_eq(a, b),
            (Value::Error(a), Value::Error(b)) => Rc::ptr_eq(a, b),
            (Value::Pair(a), Value::Pair(b)) => Rc::ptr_eq(a, b),
            (Value::Lambda(a), Value::Lambda(b)) => Rc::ptr_eq(a, b),
            (Value::NativeFn(a), Value::NativeFn(b)) => Rc::ptr_eq(a, b),
            (Value::Foreign(a), Value::Foreign(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    // ------------------------------------------------------------------
    // Serialization
    // ------------------------------------------------------------------

    /// Canonical textual form. Every token is followed by a single
    /// space; data built from nil, booleans, atoms, symbols, and pairs
    /// reads back `equal` to the original.
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        self.serialize_into(&mut out);
        out
    }

    fn serialize_into(&self, out: &mut String) {
        match self {
            Value::Nil => out.push_str("'() "),
            Value::True => out.push_str("#t "),
            Value::False => out.push_str("#f "),
            Value::Symbol(s) => {
                with_resolved(*s, |name| out.push_str(name));
                out.push(' ');
            }
            Value::Atom(t) => {
                if is_numeric_text(t) {
                    out.push_str(t);
                    out.push(' ');
                } else {
                    out.push('"');
                    escape_into(t, out);
                    out.push_str("\" ");
                }
            }
            Value::Error(t) => {
                out.push_str("#<error:");
                out.push_str(t);
                out.push_str("> ");
            }
            Value::NativeFn(f) => {
                let _ = write!(out, "#<native:{:p}> ", Rc::as_ptr(f));
            }
            Value::Foreign(f) => {
                let _ = write!(
                    out,
                    "#<foreign:{:p};{:p}> ",
                    f.dtor() as usize as *const (),
                    f.data_ptr()
                );
            }
            Value::Pair(first) => {
                out.push_str("( ");
                let mut pair = first;
                loop {
                    pair.car.serialize_into(out);
                    match &pair.cdr {
                        Value::Nil => break,
                        Value::Pair(next) => pair = next,
                        tail => {
                            out.push_str(". ");
                            tail.serialize_into(out);
                            break;
                        }
                    }
                }
                out.push_str(") ");
            }
            Value::Lambda(l) => {
                out.push_str("(lambda ");
                l.params.serialize_into(out);
                l.body.serialize_into(out);
                out.push_str(") ");
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}

/// Structural equality. Errors never compare equal to anything, their
/// own text included, so `==` is deliberately non-reflexive for them.
impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Error(_), _) | (_, Value::Error(_)) => false,
            (Value::Nil, Value::Nil) => true,
            (Value::True, Value::True) | (Value::False, Value::False) => true,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Atom(a), Value::Atom(b)) => a == b,
            (Value::Pair(a), Value::Pair(b)) => a.car == b.car && a.cdr == b.cdr,
            (Value::Lambda(a), Value::Lambda(b)) => a.params == b.params && a.body == b.body,
            (Value::NativeFn(a), Value::NativeFn(b)) => Rc::ptr_eq(a, b),
            (Value::Foreign(a), Value::Foreign(b)) => {
                a.data_ptr() == b.data_ptr() && std::ptr::fn_addr_eq(a.dtor(), b.dtor())
            }
            _ => false,
        }
    }
}

pub struct ListIter<'a> {
    cur: &'a Value,
}

impl<'a> Iterator for ListIter<'a> {
    type Item = &'a Value;

    fn next(&mut self) -> Option<&'a Value> {
        match self.cur {
            Value::Pair(p) => {
                self.cur = &p.cdr;
                Some(&p.car)
            }
            _ => None,
        }
    }
}

/// The numeric grammar: optional sign, a mantissa with at least one
/// digit and at most one dot, optional exponent with its own optional
/// sign and at least one digit. Every accepted string parses as `f64`.
pub fn is_numeric_text(s: &str) -> bool {
    let b = s.as_bytes();
    let mut i = 0;
    if matches!(b.first(), Some(b'+') | Some(b'-')) {
        i += 1;
    }
    let mut digits = 0;
    let mut dot = false;
    while i < b.len() {
        match b[i] {
            b'0'..=b'9' => digits += 1,
            b'.' if !dot => dot = true,
            _ => break,
        }
        i += 1;
    }
    if digits == 0 {
        return false;
    }
    if i == b.len() {
        return true;
    }
    if b[i] != b'e' && b[i] != b'E' {
        return false;
    }
    i += 1;
    if matches!(b.get(i), Some(b'+') | Some(b'-')) {
        i += 1;
    }
    let mut exp_digits = 0;
    while i < b.len() && b[i].is_ascii_digit() {
        exp_digits += 1;
        i += 1;
    }
    exp_digits > 0 && i == b.len()
}

const SIGNIFICANT_DIGITS: usize = 17;

/// Format a float with 17 significant digits, `%g`-style: scientific
/// notation outside the fixed-point range, trailing zeros trimmed.
pub fn format_number(n: f64) -> String {
    if n == 0.0 {
        return "0".to_string();
    }
    if n.is_nan() {
        return "nan".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let exp = n.abs().log10().floor() as i32;
    if exp < -4 || exp >= SIGNIFICANT_DIGITS as i32 {
        trim_exponential(&format!("{:.*e}", SIGNIFICANT_DIGITS - 1, n))
    } else {
        let decimals = (SIGNIFICANT_DIGITS as i32 - 1 - exp).max(0) as usize;
        trim_fixed(&format!("{n:.decimals$}"))
    }
}

fn trim_fixed(s: &str) -> String {
    if !s.contains('.') {
        return s.to_string();
    }
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn trim_exponential(s: &str) -> String {
    match s.split_once('e') {
        Some((mantissa, exp)) => format!("{}e{}", trim_fixed(mantissa), exp),
        None => s.to_string(),
    }
}

/// Re-escape string text for serialization. A decimal escape is chased
/// by escaping any digit that immediately follows it, since the reader
/// consumes every digit after `\`.
fn escape_into(s: &str, out: &mut String) {
    let mut after_decimal_escape = false;
    for c in s.chars() {
        if after_decimal_escape && c.is_ascii_digit() {
            let _ = write!(out, "\\{}", c as u32);
            continue;
        }
        after_decimal_escape = false;
        match c {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{8}' => out.push_str("\\b"),
            '\u{7}' => out.push_str("\\a"),
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            c if (c as u32) < 0x20 => {
                let _ = write!(out, "\\{}", c as u32);
                after_decimal_escape = true;
            }
            c => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ====== Constructors and accessors ======

    #[test]
    fn symbols_intern_to_the_same_key() {
        assert_eq!(intern("foo"), intern("foo"));
        assert_ne!(intern("foo"), intern("bar"));
        assert_eq!(resolve(intern("foo")), "foo");
    }

    #[test]
    fn list_builds_a_proper_chain() {
        let l = Value::list(vec![Value::number(1.0), Value::number(2.0)]);
        assert!(l.is_list());
        assert_eq!(l.list_len(), 2);
        assert_eq!(l.car(), Value::number(1.0));
        assert_eq!(l.cdr().car(), Value::number(2.0));
        assert!(l.cdr().cdr().is_nil());
    }

    #[test]
    fn list_with_tail_builds_a_dotted_chain() {
        let l = Value::list_with_tail(vec![Value::number(1.0)], Value::number(2.0));
        assert!(!l.is_list());
        assert_eq!(l.list_len(), 1);
        assert_eq!(l.cdr(), Value::number(2.0));
    }

    #[test]
    fn car_and_cdr_of_non_pairs_are_nil() {
        assert!(Value::number(5.0).car().is_nil());
        assert!(Value::Nil.cdr().is_nil());
    }

    #[test]
    fn iter_stops_at_improper_tail() {
        let l = Value::list_with_tail(
            vec![Value::symbol("a"), Value::symbol("b")],
            Value::symbol("c"),
        );
        let items: Vec<String> = l.iter().map(|v| v.text().into_owned()).collect();
        assert_eq!(items, vec!["a", "b"]);
    }

    // ====== Text coercion ======

    #[test]
    fn text_of_each_tag() {
        assert_eq!(Value::symbol("abc").text(), "abc");
        assert_eq!(Value::atom("hi").text(), "hi");
        assert_eq!(Value::error("boom").text(), "boom");
        assert_eq!(Value::True.text(), "true");
        assert_eq!(Value::False.text(), "false");
        assert_eq!(Value::Nil.text(), "");
        assert_eq!(Value::cons(Value::Nil, Value::Nil).text(), "");
    }

    #[test]
    fn to_f64_coerces_text() {
        assert_eq!(Value::atom("42").to_f64(), 42.0);
        assert_eq!(Value::atom("2.5").to_f64(), 2.5);
        assert_eq!(Value::atom("junk").to_f64(), 0.0);
        assert_eq!(Value::Nil.to_f64(), 0.0);
        assert_eq!(Value::True.to_f64(), 0.0);
    }

    // ====== Numeric grammar ======

    #[test]
    fn numeric_grammar_accepts() {
        for s in ["0", "42", "-7", "+7", "3.14", "5.", ".5", "1e6", "1E6", "1.5e-3", "+.5e+2"] {
            assert!(is_numeric_text(s), "{s} should be numeric");
            assert!(s.parse::<f64>().is_ok(), "{s} should parse");
        }
    }

    #[test]
    fn numeric_grammar_rejects() {
        for s in ["", ".", "+", "-", "e5", "5e", "5e+", "1.2.3", "1e2e3", "12a", "a12", "--5"] {
            assert!(!is_numeric_text(s), "{s} should not be numeric");
        }
    }

    #[test]
    fn is_numeric_is_a_derived_predicate() {
        assert!(Value::atom("3.5").is_numeric());
        assert!(!Value::atom("hello").is_numeric());
        assert!(!Value::symbol("3.5").is_numeric());
    }

    // ====== Number formatting ======

    #[test]
    fn format_number_trims_integers() {
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(-3.0), "-3");
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(1000.0), "1000");
    }

    #[test]
    fn format_number_keeps_fractions() {
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(-2.25), "-2.25");
        assert_eq!(format_number(0.1 + 0.2), "0.30000000000000004");
    }

    #[test]
    fn format_number_switches_to_exponential() {
        assert_eq!(format_number(1e-5), "1e-5");
        assert_eq!(format_number(1e20), "1e20");
        assert_eq!(format_number(0.0001), "0.0001");
    }

    #[test]
    fn format_number_round_trips() {
        for n in [1.0 / 3.0, 0.1, 12345.6789, 1e-7, 9.875e19, -42.5] {
            let parsed: f64 = format_number(n).parse().unwrap();
            assert_eq!(parsed, n);
        }
    }

    // ====== Equality ======

    #[test]
    fn atoms_and_symbols_compare_by_text() {
        assert_eq!(Value::atom("x"), Value::atom("x"));
        assert_ne!(Value::atom("x"), Value::atom("y"));
        assert_eq!(Value::symbol("x"), Value::symbol("x"));
        assert_ne!(Value::atom("x"), Value::symbol("x"));
    }

    #[test]
    fn pairs_compare_structurally() {
        let a = Value::list(vec![Value::number(1.0), Value::number(2.0)]);
        let b = Value::list(vec![Value::number(1.0), Value::number(2.0)]);
        assert_eq!(a, b);
        assert!(!a.identical(&b));
        assert!(a.identical(&a.clone()));
    }

    #[test]
    fn errors_never_compare_equal() {
        let e = Value::error("boom");
        assert_ne!(e, Value::error("boom"));
        assert_ne!(e, e.clone());
        assert_ne!(e, Value::Nil);
    }

    #[test]
    fn booleans_are_singletons() {
        assert_eq!(Value::True, Value::True);
        assert_ne!(Value::True, Value::False);
        assert!(Value::bool(true).identical(&Value::True));
    }

    #[test]
    fn natives_compare_by_identity() {
        let f = Value::native("f", |_env, _args| Value::Nil);
        let g = Value::native("f", |_env, _args| Value::Nil);
        assert_eq!(f, f.clone());
        assert_ne!(f, g);
    }

    // ====== Truthiness ======

    #[test]
    fn only_false_is_falsy() {
        assert!(!Value::False.is_truthy());
        assert!(Value::True.is_truthy());
        assert!(Value::Nil.is_truthy());
        assert!(Value::number(0.0).is_truthy());
        assert!(Value::error("boom").is_truthy());
    }

    // ====== Foreign handles ======

    #[test]
    fn foreign_dtor_runs_once_when_last_reference_drops() {
        use std::cell::Cell;
        thread_local! {
            static DROPS: Cell<u32> = const { Cell::new(0) };
        }
        fn count_drop(_data: Box<dyn Any>) {
            DROPS.with(|d| d.set(d.get() + 1));
        }
        DROPS.with(|d| d.set(0));
        let handle = Value::foreign(Box::new(41_u32), count_drop);
        let copy = handle.clone();
        drop(handle);
        DROPS.with(|d| assert_eq!(d.get(), 0));
        drop(copy);
        DROPS.with(|d| assert_eq!(d.get(), 1));
    }

    #[test]
    fn foreign_downcast_and_tag() {
        fn dtor_a(_: Box<dyn Any>) {}
        fn dtor_b(_: Box<dyn Any>) {}
        let h = Value::foreign(Box::new(7_i64), dtor_a);
        let Value::Foreign(f) = &h else { unreachable!() };
        assert_eq!(f.downcast_ref::<i64>(), Some(&7));
        assert_eq!(f.downcast_ref::<String>(), None);
        assert!(std::ptr::fn_addr_eq(f.dtor(), dtor_a as ForeignDtor));
        assert!(!std::ptr::fn_addr_eq(f.dtor(), dtor_b as ForeignDtor));
    }

    // ====== Serialization ======

    #[test]
    fn serialize_simple_values() {
        assert_eq!(Value::Nil.serialize(), "'() ");
        assert_eq!(Value::True.serialize(), "#t ");
        assert_eq!(Value::False.serialize(), "#f ");
        assert_eq!(Value::symbol("foo").serialize(), "foo ");
        assert_eq!(Value::number(42.0).serialize(), "42 ");
        assert_eq!(Value::error("boom").serialize(), "#<error:boom> ");
    }

    #[test]
    fn serialize_quotes_non_numeric_atoms() {
        assert_eq!(Value::atom("hello").serialize(), "\"hello\" ");
        assert_eq!(Value::atom("3.5").serialize(), "3.5 ");
        assert_eq!(Value::atom("").serialize(), "\"\" ");
    }

    #[test]
    fn serialize_escapes_strings() {
        assert_eq!(Value::atom("a\"b").serialize(), "\"a\\\"b\" ");
        assert_eq!(Value::atom("a\\b").serialize(), "\"a\\\\b\" ");
        assert_eq!(Value::atom("a\nb\tc").serialize(), "\"a\\nb\\tc\" ");
        assert_eq!(Value::atom("\u{7}").serialize(), "\"\\a\" ");
        assert_eq!(Value::atom("\u{b}").serialize(), "\"\\11\" ");
    }

    #[test]
    fn serialize_escapes_digits_after_decimal_escape() {
        // "\u{b}8" must not read back as the single char 118 & 0x7F.
        assert_eq!(Value::atom("\u{b}8").serialize(), "\"\\11\\56\" ");
        assert_eq!(Value::atom("\u{b}x8").serialize(), "\"\\11x8\" ");
    }

    #[test]
    fn serialize_lists() {
        let l = Value::list(vec![
            Value::number(1.0),
            Value::number(2.0),
            Value::number(3.0),
        ]);
        assert_eq!(l.serialize(), "( 1 2 3 ) ");
        let nested = Value::list(vec![Value::symbol("a"), Value::list(vec![Value::symbol("b")])]);
        assert_eq!(nested.serialize(), "( a ( b ) ) ");
    }

    #[test]
    fn serialize_dotted_list() {
        let l = Value::list_with_tail(
            vec![Value::number(1.0), Value::number(2.0)],
            Value::number(3.0),
        );
        assert_eq!(l.serialize(), "( 1 2 . 3 ) ");
    }

    #[test]
    fn serialize_opaque_values_are_tagged() {
        let native = Value::native("f", |_env, _args| Value::Nil);
        assert!(native.serialize().starts_with("#<native:"));
        fn dtor(_: Box<dyn Any>) {}
        let foreign = Value::foreign(Box::new(0_u8), dtor);
        assert!(foreign.serialize().starts_with("#<foreign:"));
        assert!(foreign.serialize().contains(';'));
    }

    #[test]
    fn display_matches_serialize() {
        let l = Value::list(vec![Value::symbol("a")]);
        assert_eq!(format!("{l}"), l.serialize());
    }
}
