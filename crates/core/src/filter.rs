//! CQL2-JSON filter expressions.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A node of a [CQL2-JSON](https://docs.ogc.org/DRAFTS/21-065.html) expression tree.
///
/// # Examples
///
/// ```
/// use eo_maxar::filter::Expr;
/// use serde_json::json;
///
/// let expr = Expr::lt(Expr::property("datetime"), "2023-02-06T00:00:00Z");
/// assert_eq!(
///     serde_json::to_value(&expr).unwrap(),
///     json!({"op": "lt", "args": [{"property": "datetime"}, "2023-02-06T00:00:00Z"]})
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Expr {
    /// An operator applied to arguments, e.g. `and`, `in`, `lt`.
    Operation {
        /// The operator.
        op: String,

        /// The operands.
        args: Vec<Expr>,
    },

    /// A reference to a queryable property.
    Property {
        /// The property name.
        property: String,
    },

    /// A list of expressions, e.g. the right-hand side of `in`.
    Array(Vec<Expr>),

    /// A literal value.
    Literal(Value),
}

impl Expr {
    /// A reference to a property.
    pub fn property(name: impl ToString) -> Expr {
        Expr::Property {
            property: name.to_string(),
        }
    }

    /// A literal.
    pub fn literal(value: impl Into<Value>) -> Expr {
        Expr::Literal(value.into())
    }

    /// An operation.
    pub fn op(op: impl ToString, args: impl IntoIterator<Item = Expr>) -> Expr {
        Expr::Operation {
            op: op.to_string(),
            args: args.into_iter().collect(),
        }
    }

    /// `left and right`.
    pub fn and(left: Expr, right: Expr) -> Expr {
        Expr::op("and", [left, right])
    }

    /// `property in (values...)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use eo_maxar::filter::Expr;
    /// use serde_json::json;
    ///
    /// let expr = Expr::in_list("collection", ["an-id"]);
    /// assert_eq!(
    ///     serde_json::to_value(&expr).unwrap(),
    ///     json!({"op": "in", "args": [{"property": "collection"}, ["an-id"]]})
    /// );
    /// ```
    pub fn in_list<I, S>(property: impl ToString, values: I) -> Expr
    where
        I: IntoIterator<Item = S>,
        S: Into<Value>,
    {
        Expr::op(
            "in",
            [
                Expr::property(property),
                Expr::Array(values.into_iter().map(Expr::literal).collect()),
            ],
        )
    }

    /// `left < right`.
    pub fn lt(left: Expr, right: impl Into<Value>) -> Expr {
        Expr::op("lt", [left, Expr::literal(right)])
    }

    /// `left >= right`.
    pub fn ge(left: Expr, right: impl Into<Value>) -> Expr {
        Expr::op("ge", [left, Expr::literal(right)])
    }

    /// Renders this expression as CQL2 text, e.g. for log messages.
    pub fn to_text(&self) -> Result<String> {
        let expr: cql2::Expr = serde_json::from_value(serde_json::to_value(self)?)?;
        expr.to_text().map_err(Error::from)
    }
}
