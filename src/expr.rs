//! Arithmetic/dice expression AST.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary operator. Serialized as its display symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Sub,
    #[serde(rename = "×")]
    Mul,
    #[serde(rename = "÷")]
    Div,
}

impl Operator {
    /// Canonical symbol (`*` and `/` in the source normalize to `×` and `÷`).
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Mul => "×",
            Operator::Div => "÷",
        }
    }

    /// Binding strength: multiplicative operators bind tighter than additive.
    pub fn precedence(self) -> u8 {
        match self {
            Operator::Add | Operator::Sub => 1,
            Operator::Mul | Operator::Div => 2,
        }
    }

    pub(crate) fn from_symbol(s: &str) -> Option<Self> {
        match s {
            "+" => Some(Operator::Add),
            "-" => Some(Operator::Sub),
            "×" | "*" => Some(Operator::Mul),
            "÷" | "/" => Some(Operator::Div),
            _ => None,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Expression tree, serialized internally tagged by `"type"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ExprNode {
    /// Integer literal.
    Num { value: i64 },
    /// Roll `counter` dice with `face` sides each.
    Roll { counter: u32, face: u32 },
    Binary { op: Operator, l: Box<ExprNode>, r: Box<ExprNode> },
}

impl ExprNode {
    pub fn num(value: i64) -> Self {
        ExprNode::Num { value }
    }

    pub fn roll(counter: u32, face: u32) -> Self {
        ExprNode::Roll { counter, face }
    }

    pub fn binary(op: Operator, l: ExprNode, r: ExprNode) -> Self {
        ExprNode::Binary { op, l: Box::new(l), r: Box::new(r) }
    }

    /// Number of levels below the root (a leaf has depth 0).
    pub fn depth(&self) -> usize {
        match self {
            ExprNode::Num { .. } | ExprNode::Roll { .. } => 0,
            ExprNode::Binary { l, r, .. } => 1 + l.depth().max(r.depth()),
        }
    }
}

/// Human-readable rendering, for display and export only.
///
/// Every binary node is parenthesized unless it binds tighter than its
/// parent, so grouping is always explicit:
///
/// ```text
/// 4+2×3   ──▶ (4+2×3)
/// 10-3-2  ──▶ (10-(3-2))
/// 1d20+3  ──▶ (1d20+3)
/// ```
impl fmt::Display for ExprNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_node(f, self, None)
    }
}

fn write_node(f: &mut fmt::Formatter<'_>, node: &ExprNode, parent: Option<Operator>) -> fmt::Result {
    match node {
        ExprNode::Num { value } => write!(f, "{value}"),
        ExprNode::Roll { counter, face } => write!(f, "{counter}d{face}"),
        ExprNode::Binary { op, l, r } => {
            let bare = parent.is_some_and(|p| op.precedence() > p.precedence());
            if !bare {
                f.write_str("(")?;
            }
            write_node(f, l, Some(*op))?;
            f.write_str(op.symbol())?;
            write_node(f, r, Some(*op))?;
            if !bare {
                f.write_str(")")?;
            }
            Ok(())
        }
    }
}

/// Render `node` as text. Equivalent to `node.to_string()`.
pub fn node_to_text(node: &ExprNode) -> String {
    node.to_string()
}
