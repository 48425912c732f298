//! # Rate expressions
//!
//! User rate laws and net-rate (`dcdt`) expressions arrive as plain strings such as
//! `"k*C"`, `"-R"` or `"k1*Fe2*O2**0.5"`. They are tokenized with a regex and the
//! token sequence is checked before anything is parsed; valid text is parsed once into a symbolic [`Expr`], and lambdified into
//! a closure whose arguments are bound against an explicit symbol table.
//!
//! Binding never falls back to an implicit scope: every free identifier has to be a
//! species (read from the state vector), a coefficient (frozen as a constant) or,
//! for `dcdt` expressions only, an already evaluated rate law.
use RustedSciThe::symbolic::symbolic_engine::Expr;
use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

/////////////////////ERROR HANDLING////////////////////////////////////////////////////////
#[derive(Debug, Error, Clone, PartialEq)]
pub enum KineticsError {
    #[error("'{0}' is not a valid identifier")]
    InvalidName(String),
    #[error("syntax error in expression '{expression}': {reason}")]
    Syntax { expression: String, reason: String },
    #[error("coefficient {name} = {value} is not finite")]
    InvalidCoefficient { name: String, value: f64 },
    #[error("dcdt is defined for '{0}', which is not a species of the state")]
    UnknownSpecies(String),
    #[error("unresolved name '{name}' in {context}")]
    UnresolvedName { context: String, name: String },
    #[error("name '{0}' is declared more than once (species, rate laws and coefficients share one namespace)")]
    AmbiguousName(String),
}

impl KineticsError {
    /// true for the errors signalling a mismatch between `dcdt`, rates, species and coefficients
    pub fn is_name_resolution(&self) -> bool {
        matches!(
            self,
            KineticsError::UnknownSpecies(_)
                | KineticsError::UnresolvedName { .. }
                | KineticsError::AmbiguousName(_)
        )
    }
}
////////////////////////////////////////////////////////////////////////////////////////////

/// Normalize user input: python-style `**` becomes `^`, surrounding blanks are trimmed.
pub fn normalize_expression(expression: &str) -> String {
    expression.trim().replace("**", "^")
}

/// number, identifier, operator, parenthesis or blank; anything else is unsupported
static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?P<number>(?:\d+\.?\d*|\.\d+)(?:[eE][+\-]?\d+)?)|(?P<name>[A-Za-z_][A-Za-z0-9_]*)|(?P<op>[+\-*/^])|(?P<open>\()|(?P<close>\))|(?P<blank>\s+)",
    )
    .expect("token pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Number,
    Name,
    Operator(char),
    Open,
    Close,
}

fn tokenize(expression: &str) -> Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let mut position = 0;
    for caps in TOKEN.captures_iter(expression) {
        let Some(whole) = caps.get(0) else { continue };
        if whole.start() != position {
            return Err(format!("unsupported character at position {}", position));
        }
        position = whole.end();
        if caps.name("number").is_some() {
            tokens.push(Token::Number);
        } else if caps.name("name").is_some() {
            tokens.push(Token::Name);
        } else if let Some(op) = caps.name("op") {
            tokens.push(Token::Operator(op.as_str().chars().next().unwrap_or('+')));
        } else if caps.name("open").is_some() {
            tokens.push(Token::Open);
        } else if caps.name("close").is_some() {
            tokens.push(Token::Close);
        }
    }
    if position != expression.len() {
        return Err(format!("unsupported character at position {}", position));
    }
    Ok(tokens)
}

/// Check the token sequence of an arithmetic expression: operands and binary operators
/// alternate, a leading `-` (or `+`) is only allowed at the start or after `(`,
/// parentheses are balanced and never empty, and a name directly followed by `(` is a
/// function call.
pub fn check_syntax(expression: &str) -> Result<(), KineticsError> {
    let syntax_error = |reason: &str| KineticsError::Syntax {
        expression: expression.to_string(),
        reason: reason.to_string(),
    };
    let normalized = normalize_expression(expression);
    if normalized.is_empty() {
        return Err(syntax_error("empty expression"));
    }
    let tokens = tokenize(&normalized).map_err(|reason| syntax_error(&reason))?;

    let mut depth: usize = 0;
    // true when the next token has to start an operand
    let mut expect_operand = true;
    let mut previous: Option<Token> = None;
    for &token in &tokens {
        match token {
            Token::Number | Token::Name => {
                if !expect_operand {
                    return Err(syntax_error("missing operator between operands"));
                }
                expect_operand = false;
            }
            Token::Open => {
                let call = matches!(previous, Some(Token::Name));
                if !expect_operand && !call {
                    return Err(syntax_error("missing operator before '('"));
                }
                depth += 1;
                expect_operand = true;
            }
            Token::Close => {
                if matches!(previous, Some(Token::Open)) {
                    return Err(syntax_error("empty parentheses"));
                }
                if expect_operand {
                    return Err(syntax_error("operator before ')'"));
                }
                if depth == 0 {
                    return Err(syntax_error("unbalanced ')'"));
                }
                depth -= 1;
            }
            Token::Operator(op) => {
                if expect_operand {
                    let unary_allowed = matches!(previous, None | Some(Token::Open));
                    if !(unary_allowed && (op == '-' || op == '+')) {
                        return Err(syntax_error(&format!("misplaced operator '{}'", op)));
                    }
                }
                expect_operand = true;
            }
        }
        previous = Some(token);
    }
    if depth != 0 {
        return Err(syntax_error("unbalanced '('"));
    }
    if expect_operand {
        return Err(syntax_error("expression ends with an operator"));
    }
    Ok(())
}

/// Where the value of a free identifier comes from at evaluation time
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Slot {
    /// index into the species state vector
    State(usize),
    /// coefficient value, frozen at compile time
    Constant(f64),
    /// index into the vector of evaluated rate laws
    Rate(usize),
}

/// Names visible to an expression, built once per compilation.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    symbols: HashMap<String, Slot>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, slot: Slot) -> Result<(), KineticsError> {
        if self.symbols.insert(name.to_string(), slot).is_some() {
            return Err(KineticsError::AmbiguousName(name.to_string()));
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Slot> {
        self.symbols.get(name).copied()
    }
}

/// A parsed expression bound to its argument slots.
pub struct CompiledExpression {
    source: String,
    slots: Vec<Slot>,
    function: Box<dyn Fn(Vec<f64>) -> f64>,
}

impl fmt::Debug for CompiledExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledExpression")
            .field("source", &self.source)
            .field("slots", &self.slots)
            .finish()
    }
}

impl CompiledExpression {
    /// Parse `source` and bind its free identifiers against `table`.
    /// `context` names the owner of the expression in error messages ("rate R", "dcdt of C").
    pub fn compile(
        source: &str,
        table: &SymbolTable,
        context: &str,
    ) -> Result<Self, KineticsError> {
        check_syntax(source)?;
        let expr = Expr::parse_expression(&normalize_expression(source));
        let mut arguments: Vec<String> = expr
            .all_arguments_are_variables()
            .iter()
            .map(|v| v.trim().to_string())
            .collect();
        arguments.sort();
        arguments.dedup();

        let mut slots = Vec::with_capacity(arguments.len());
        for name in &arguments {
            let slot = table
                .get(name)
                .ok_or_else(|| KineticsError::UnresolvedName {
                    context: context.to_string(),
                    name: name.clone(),
                })?;
            slots.push(slot);
        }
        let function = expr.lambdify_owned(arguments.iter().map(|s| s.as_str()).collect());
        Ok(Self {
            source: source.to_string(),
            slots,
            function,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn eval(&self, state: &[f64], rates: &[f64]) -> f64 {
        let args: Vec<f64> = self
            .slots
            .iter()
            .map(|slot| match *slot {
                Slot::State(i) => state[i],
                Slot::Constant(value) => value,
                Slot::Rate(j) => rates[j],
            })
            .collect();
        (self.function)(args)
    }
}
