//! A small LDPath evaluator.
//!
//! Context properties are configured as path expressions evaluated against
//! the authority graph, starting at a result's subject. The supported subset:
//!
//! - `<iri>` or `prefix:local` property steps
//! - `/` to chain steps, `|` for alternatives, `( ... )` for grouping
//! - `^` before a property to follow it backwards
//! - a trailing `:: type` selector, accepted and ignored
//!
//! ```ignore
//! let path = LdPath::parse("skos:broader / skos:prefLabel :: xsd:string", &prefixes)?;
//! let labels = path.values(&graph, &RdfNode::uri("http://example.org/c1"));
//! ```

use std::fmt;

use crate::config::PrefixMap;
use crate::error::{LinkedDataError, Result};
use crate::rdf::{RdfGraph, RdfNode};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Expr {
    Property { iri: String, inverse: bool },
    Sequence(Vec<Expr>),
    Alternative(Vec<Expr>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Iri(String),
    Slash,
    Pipe,
    Caret,
    Open,
    Close,
}

/// A parsed path expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LdPath {
    source: String,
    expr: Expr,
}

impl LdPath {
    /// Parses `source`, expanding CURIEs through `prefixes`.
    ///
    /// # Errors
    ///
    /// Returns [`LinkedDataError::InvalidConfiguration`] on a syntax error
    /// or an unknown prefix.
    pub fn parse(source: &str, prefixes: &PrefixMap) -> Result<Self> {
        let path = strip_type_selector(source);
        let tokens = tokenize(path, prefixes).map_err(|msg| invalid(source, &msg))?;
        let mut parser = Parser { tokens, pos: 0 };
        let expr = parser.alternative().map_err(|msg| invalid(source, &msg))?;
        if parser.pos != parser.tokens.len() {
            return Err(invalid(source, "unexpected trailing input"));
        }
        Ok(Self {
            source: source.trim().to_string(),
            expr,
        })
    }

    /// Returns the expression as configured.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Evaluates the path from `subject`, returning the reached nodes in
    /// first-seen order without duplicates.
    #[must_use]
    pub fn evaluate(&self, graph: &RdfGraph, subject: &RdfNode) -> Vec<RdfNode> {
        eval(&self.expr, graph, vec![subject.clone()])
    }

    /// Evaluates the path and returns the string form of each value.
    #[must_use]
    pub fn values(&self, graph: &RdfGraph, subject: &RdfNode) -> Vec<String> {
        self.evaluate(graph, subject)
            .iter()
            .filter(|node| !node.is_blank())
            .map(|node| node.lexical().to_string())
            .collect()
    }
}

impl fmt::Display for LdPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn invalid(source: &str, msg: &str) -> LinkedDataError {
    LinkedDataError::InvalidConfiguration(format!("invalid ldpath '{source}': {msg}"))
}

fn push_unique(nodes: &mut Vec<RdfNode>, node: &RdfNode) {
    if !nodes.contains(node) {
        nodes.push(node.clone());
    }
}

fn eval(expr: &Expr, graph: &RdfGraph, inputs: Vec<RdfNode>) -> Vec<RdfNode> {
    match expr {
        Expr::Property { iri, inverse } => {
            let mut out = Vec::new();
            for node in &inputs {
                if *inverse {
                    for subject in graph.subjects(iri, node) {
                        push_unique(&mut out, subject);
                    }
                } else {
                    for object in graph.objects(node, iri) {
                        push_unique(&mut out, object);
                    }
                }
            }
            out
        },
        Expr::Sequence(steps) => steps
            .iter()
            .fold(inputs, |nodes, step| eval(step, graph, nodes)),
        Expr::Alternative(branches) => {
            let mut out = Vec::new();
            for branch in branches {
                for node in eval(branch, graph, inputs.clone()) {
                    push_unique(&mut out, &node);
                }
            }
            out
        },
    }
}

/// Drops a trailing `:: type` selector that is not inside `<...>`.
fn strip_type_selector(source: &str) -> &str {
    let mut in_iri = false;
    let bytes = source.as_bytes();
    for (i, b) in bytes.iter().enumerate() {
        match b {
            b'<' => in_iri = true,
            b'>' => in_iri = false,
            b':' if !in_iri && bytes.get(i + 1) == Some(&b':') => return &source[..i],
            _ => {},
        }
    }
    source
}

fn tokenize(path: &str, prefixes: &PrefixMap) -> std::result::Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let mut chars = path.char_indices().peekable();
    while let Some((start, c)) = chars.next() {
        match c {
            c if c.is_whitespace() => {},
            '/' => tokens.push(Token::Slash),
            '|' => tokens.push(Token::Pipe),
            '^' => tokens.push(Token::Caret),
            '(' => tokens.push(Token::Open),
            ')' => tokens.push(Token::Close),
            '<' => {
                let mut iri = String::new();
                loop {
                    match chars.next() {
                        Some((_, '>')) => break,
                        Some((_, ch)) => iri.push(ch),
                        None => return Err("unterminated <iri>".into()),
                    }
                }
                tokens.push(Token::Iri(iri));
            },
            _ => {
                let mut end = start + c.len_utf8();
                while let Some(&(i, ch)) = chars.peek() {
                    if ch.is_whitespace() || "/|^()<".contains(ch) {
                        break;
                    }
                    end = i + ch.len_utf8();
                    chars.next();
                }
                let curie = &path[start..end];
                let iri = prefixes.expand(curie).map_err(|e| e.to_string())?;
                tokens.push(Token::Iri(iri));
            },
        }
    }
    if tokens.is_empty() {
        return Err("empty expression".into());
    }
    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn alternative(&mut self) -> std::result::Result<Expr, String> {
        let mut branches = vec![self.sequence()?];
        while self.peek() == Some(&Token::Pipe) {
            self.pos += 1;
            branches.push(self.sequence()?);
        }
        Ok(if branches.len() == 1 {
            branches.remove(0)
        } else {
            Expr::Alternative(branches)
        })
    }

    fn sequence(&mut self) -> std::result::Result<Expr, String> {
        let mut steps = vec![self.unary()?];
        while self.peek() == Some(&Token::Slash) {
            self.pos += 1;
            steps.push(self.unary()?);
        }
        Ok(if steps.len() == 1 {
            steps.remove(0)
        } else {
            Expr::Sequence(steps)
        })
    }

    fn unary(&mut self) -> std::result::Result<Expr, String> {
        if self.peek() == Some(&Token::Caret) {
            self.pos += 1;
            return match self.tokens.get(self.pos).cloned() {
                Some(Token::Iri(iri)) => {
                    self.pos += 1;
                    Ok(Expr::Property { iri, inverse: true })
                },
                _ => Err("'^' must precede a property".into()),
            };
        }
        self.primary()
    }

    fn primary(&mut self) -> std::result::Result<Expr, String> {
        match self.tokens.get(self.pos).cloned() {
            Some(Token::Iri(iri)) => {
                self.pos += 1;
                Ok(Expr::Property {
                    iri,
                    inverse: false,
                })
            },
            Some(Token::Open) => {
                self.pos += 1;
                let expr = self.alternative()?;
                if self.peek() != Some(&Token::Close) {
                    return Err("missing ')'".into());
                }
                self.pos += 1;
                Ok(expr)
            },
            Some(other) => Err(format!("unexpected {other:?}")),
            None => Err("unexpected end of expression".into()),
        }
    }
}
