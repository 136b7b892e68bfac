//! Property tests for the script parser.

use proptest::prelude::*;
use qlab_script::syntax::{Expr, Stmt};

proptest! {
    /// Any integer literal survives a let-binding round trip.
    #[test]
    fn parses_integer_lets(value in 0u32..1_000_000) {
        let source = format!("let x = {value};");
        let program = qlab_script::parse(&source).unwrap();
        prop_assert_eq!(program.statements.len(), 1);
        match &program.statements[0] {
            Stmt::Let { name, value: Expr::Number(n) } => {
                prop_assert_eq!(name.as_str(), "x");
                prop_assert!((n - f64::from(value)).abs() < 1e-9);
            }
            other => prop_assert!(false, "unexpected statement {:?}", other),
        }
    }

    /// Identifiers lex as single tokens regardless of shape.
    #[test]
    fn parses_identifier_statements(name in "[a-z_][a-z0-9_]{0,15}") {
        // Skip names that collide with keywords.
        prop_assume!(!matches!(
            name.as_str(),
            "let" | "if" | "else" | "for" | "in" | "pi" | "true" | "false"
        ));
        let source = format!("{name};");
        let program = qlab_script::parse(&source).unwrap();
        prop_assert!(matches!(
            &program.statements[0],
            Stmt::Expr(Expr::Ident(n)) if n == &name
        ));
    }

    /// Chains of binary additions parse without stack issues.
    #[test]
    fn parses_long_addition_chains(n in 1usize..200) {
        let source = format!("let x = {};", vec!["1"; n].join(" + "));
        let program = qlab_script::parse(&source).unwrap();
        prop_assert_eq!(program.statements.len(), 1);
    }
}
