//! Template tree consumed and produced by the fallback transform.
//!
//! The shapes mirror the Glimmer syntax tree closely enough that a JSON dump of
//! a preprocessed template can be deserialized directly: every node carries a
//! `"type"` tag and an optional `loc`.

use serde::{Deserialize, Serialize};
use std::fmt;

// ═══════════════════════════════════════════════════════════════════════════════
// SOURCE SPANS
// ═══════════════════════════════════════════════════════════════════════════════

/// Line is 1-based, column is 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SourcePosition {
    pub line: u32,
    pub column: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SourceSpan {
    pub start: SourcePosition,
    pub end: SourcePosition,
}

impl SourceSpan {
    pub fn from_coords(start_line: u32, start_column: u32, end_line: u32, end_column: u32) -> Self {
        Self {
            start: SourcePosition {
                line: start_line,
                column: start_column,
            },
            end: SourcePosition {
                line: end_line,
                column: end_column,
            },
        }
    }

    /// Span for nodes that have no origin in the source text.
    pub fn synthetic() -> Self {
        Self::default()
    }

    pub fn is_synthetic(&self) -> bool {
        self.start.line == 0
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// EXPRESSIONS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PathHead {
    #[serde(rename = "ThisHead")]
    This,
    /// `@name`, stored without the sigil.
    #[serde(rename = "AtHead")]
    Arg { name: String },
    /// A bare identifier: a block param, an outer local, or a free name.
    #[serde(rename = "VarHead")]
    Var { name: String },
}

impl PathHead {
    pub fn var(name: impl Into<String>) -> Self {
        PathHead::Var { name: name.into() }
    }

    /// The name of a free-identifier head.
    pub fn var_name(&self) -> Option<&str> {
        match self {
            PathHead::Var { name } => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for PathHead {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathHead::This => f.write_str("this"),
            PathHead::Arg { name } => write!(f, "@{}", name),
            PathHead::Var { name } => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathExpression {
    pub head: PathHead,
    #[serde(default)]
    pub tail: Vec<String>,
    #[serde(default)]
    pub loc: SourceSpan,
}

impl PathExpression {
    /// Dotted source form, e.g. `this.foo.bar` or `@items.length`.
    pub fn original(&self) -> String {
        let mut out = self.head.to_string();
        for segment in &self.tail {
            out.push('.');
            out.push_str(segment);
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubExpression {
    pub path: Box<Expression>,
    #[serde(default)]
    pub params: Vec<Expression>,
    #[serde(default)]
    pub hash: Hash,
    #[serde(default)]
    pub loc: SourceSpan,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Hash {
    #[serde(default)]
    pub pairs: Vec<HashPair>,
    #[serde(default)]
    pub loc: SourceSpan,
}

impl Hash {
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HashPair {
    pub key: String,
    pub value: Expression,
    #[serde(default)]
    pub loc: SourceSpan,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StringLiteral {
    pub value: String,
    #[serde(default)]
    pub loc: SourceSpan,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BooleanLiteral {
    pub value: bool,
    #[serde(default)]
    pub loc: SourceSpan,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberLiteral {
    pub value: f64,
    #[serde(default)]
    pub loc: SourceSpan,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NullLiteral {
    #[serde(default)]
    pub loc: SourceSpan,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Expression {
    #[serde(rename = "PathExpression")]
    Path(PathExpression),
    #[serde(rename = "SubExpression")]
    SubExpression(SubExpression),
    #[serde(rename = "StringLiteral")]
    String(StringLiteral),
    #[serde(rename = "BooleanLiteral")]
    Boolean(BooleanLiteral),
    #[serde(rename = "NumberLiteral")]
    Number(NumberLiteral),
    #[serde(rename = "NullLiteral")]
    Null(NullLiteral),
    #[serde(rename = "UndefinedLiteral")]
    Undefined(NullLiteral),
}

impl Expression {
    pub fn loc(&self) -> SourceSpan {
        match self {
            Expression::Path(p) => p.loc,
            Expression::SubExpression(s) => s.loc,
            Expression::String(s) => s.loc,
            Expression::Boolean(b) => b.loc,
            Expression::Number(n) => n.loc,
            Expression::Null(n) | Expression::Undefined(n) => n.loc,
        }
    }

    pub fn as_path(&self) -> Option<&PathExpression> {
        match self {
            Expression::Path(p) => Some(p),
            _ => None,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// STATEMENTS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MustacheStatement {
    pub path: Expression,
    #[serde(default)]
    pub params: Vec<Expression>,
    #[serde(default)]
    pub hash: Hash,
    /// `{{{triple}}}` curlies.
    #[serde(default)]
    pub trusting: bool,
    #[serde(default)]
    pub loc: SourceSpan,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    #[serde(default)]
    pub body: Vec<Statement>,
    #[serde(default)]
    pub block_params: Vec<String>,
    #[serde(default)]
    pub loc: SourceSpan,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockStatement {
    pub path: Expression,
    #[serde(default)]
    pub params: Vec<Expression>,
    #[serde(default)]
    pub hash: Hash,
    pub program: Block,
    #[serde(default)]
    pub inverse: Option<Block>,
    #[serde(default)]
    pub loc: SourceSpan,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementModifierStatement {
    pub path: Expression,
    #[serde(default)]
    pub params: Vec<Expression>,
    #[serde(default)]
    pub hash: Hash,
    #[serde(default)]
    pub loc: SourceSpan,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextNode {
    pub chars: String,
    #[serde(default)]
    pub loc: SourceSpan,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConcatStatement {
    pub parts: Vec<ConcatPart>,
    #[serde(default)]
    pub loc: SourceSpan,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ConcatPart {
    #[serde(rename = "TextNode")]
    Text(TextNode),
    #[serde(rename = "MustacheStatement")]
    Mustache(MustacheStatement),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AttrValue {
    #[serde(rename = "TextNode")]
    Text(TextNode),
    #[serde(rename = "MustacheStatement")]
    Mustache(MustacheStatement),
    #[serde(rename = "ConcatStatement")]
    Concat(ConcatStatement),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttrNode {
    pub name: String,
    pub value: AttrValue,
    #[serde(default)]
    pub loc: SourceSpan,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementNode {
    pub tag: String,
    #[serde(default)]
    pub self_closing: bool,
    #[serde(default)]
    pub attributes: Vec<AttrNode>,
    #[serde(default)]
    pub modifiers: Vec<ElementModifierStatement>,
    #[serde(default)]
    pub children: Vec<Statement>,
    #[serde(default)]
    pub block_params: Vec<String>,
    #[serde(default)]
    pub loc: SourceSpan,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentStatement {
    pub value: String,
    #[serde(default)]
    pub loc: SourceSpan,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Statement {
    #[serde(rename = "MustacheStatement")]
    Mustache(MustacheStatement),
    #[serde(rename = "BlockStatement")]
    Block(BlockStatement),
    #[serde(rename = "ElementNode")]
    Element(ElementNode),
    #[serde(rename = "TextNode")]
    Text(TextNode),
    #[serde(rename = "MustacheCommentStatement")]
    MustacheComment(CommentStatement),
    #[serde(rename = "CommentStatement")]
    Comment(CommentStatement),
}

impl Statement {
    pub fn loc(&self) -> SourceSpan {
        match self {
            Statement::Mustache(m) => m.loc,
            Statement::Block(b) => b.loc,
            Statement::Element(e) => e.loc,
            Statement::Text(t) => t.loc,
            Statement::MustacheComment(c) | Statement::Comment(c) => c.loc,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    #[serde(default)]
    pub body: Vec<Statement>,
    #[serde(default)]
    pub block_params: Vec<String>,
    #[serde(default)]
    pub loc: SourceSpan,
}
