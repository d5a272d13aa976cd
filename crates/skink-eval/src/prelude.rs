use skink_core::Env;

/// Library functions written in the language itself, loaded at
/// interpreter startup. Everything here builds on the native functions
/// and needs no evaluator support of its own.
pub const PRELUDE: &str = r#"
;; Serialized output
(define (write val) (display (serialize val)))

;; Compound pair accessors
(define (caar x) (car (car x)))
(define (cadr x) (car (cdr x)))
(define (cdar x) (cdr (car x)))
(define (cddr x) (cdr (cdr x)))

;; Type predicates built from the native ones
(define (string? x) (and (atom? x) (not (number? x))))
(define (zero? x) (and (number? x) (= 0 x)))
(define (true? x) (if x #t #f))

;; Folds and list helpers
(define (fold f i l) (if (null? l) i (fold f (f (car l) i) (cdr l))))
(define (fold-right f i l) (if (null? l) i (f (car l) (fold-right f i (cdr l)))))
(define (reverse l) (fold cons '() l))
(define (range a b) (if (= a b) (list b) (cons a (range (+ a 1) b))))
;; nth is 1-based; out-of-range indexes give '()
(define (nth n l) (if (or (null? l) (< n 0)) '() (if (= n 1) (car l) (nth (- n 1) (cdr l)))))

;; String helpers over string-find and string-length
(define (string-contains? h n) (not (null? (string-find h n))))
(define (string-prefix? h n) (true? (zero? (string-find h n))))
(define (string-suffix? h n) (= (string-find h n) (- (string-length h) (string-length n))))
(define (non-empty-string? s) (not (= 0 (string-length s))))

;; Remaining string comparisons in terms of string<? and string=?
(define (string<=? a b) (or (string<? a b) (string=? a b)))
(define (string>? a b) (not (string<=? a b)))
(define (string>=? a b) (not (string<? a b)))
"#;

/// Evaluate the prelude against the global environment. The text is
/// fixed at compile time, so a read failure can only mean the prelude
/// itself is broken; the installation test catches that.
pub(crate) fn install(env: &Env) {
    if let Ok(program) = skink_reader::read_program(PRELUDE) {
        crate::eval::eval(env, &program);
    }
}
