//! 模式表达式树, 由上游的模式解析器生成, 翻译器只读不写

use serde::{Deserialize, Serialize};
use std::fmt;

/// 表达式树的节点, 一共五种
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Expression {
    /// 叶子节点: 单个字段与单个值的比较
    Comparison(Comparison),
    /// 比较表达式的布尔组合
    CombinedComparison {
        left: Box<Expression>,
        right: Box<Expression>,
        operator: ComparisonOperator,
    },
    /// 一次观测, 包裹一棵比较表达式树
    Observation { comparison: Box<Expression> },
    /// 两个观测的组合
    CombinedObservation {
        left: Box<Expression>,
        right: Box<Expression>,
        operator: ObservationOperator,
    },
    /// 带 START/STOP 时间范围限定的观测
    Qualified {
        inner: Box<Expression>,
        qualifier: Qualifier,
    },
}

impl Expression {
    pub fn comparison(object_path: &str, comparator: Comparator, value: impl Into<Literal>) -> Self {
        Expression::Comparison(Comparison::new(object_path, comparator, value))
    }

    pub fn and(self, right: Expression) -> Self {
        Expression::CombinedComparison {
            left: Box::new(self),
            right: Box::new(right),
            operator: ComparisonOperator::And,
        }
    }

    pub fn or(self, right: Expression) -> Self {
        Expression::CombinedComparison {
            left: Box::new(self),
            right: Box::new(right),
            operator: ComparisonOperator::Or,
        }
    }

    pub fn observe(self) -> Self {
        Expression::Observation {
            comparison: Box::new(self),
        }
    }

    pub fn combine(self, operator: ObservationOperator, right: Expression) -> Self {
        Expression::CombinedObservation {
            left: Box::new(self),
            right: Box::new(right),
            operator,
        }
    }

    pub fn qualify(self, qualifier: impl Into<String>) -> Self {
        Expression::Qualified {
            inner: Box::new(self),
            qualifier: Qualifier(qualifier.into()),
        }
    }
}

/// 比较表达式, `object_path` 形如 `ipv4-addr:value`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub object_path: String,
    pub comparator: Comparator,
    pub value: Literal,
    #[serde(default)]
    pub negated: bool,
}

impl Comparison {
    pub fn new(object_path: &str, comparator: Comparator, value: impl Into<Literal>) -> Self {
        Self {
            object_path: object_path.to_string(),
            comparator,
            value: value.into(),
            negated: false,
        }
    }

    pub fn negated(mut self) -> Self {
        self.negated = true;
        self
    }

    /// 拆分为 (对象类型, 字段), 路径中没有 `:` 时返回 None
    pub fn split_path(&self) -> Option<(&str, &str)> {
        self.object_path.split_once(':')
    }
}

impl From<Comparison> for Expression {
    fn from(comparison: Comparison) -> Self {
        Expression::Comparison(comparison)
    }
}

/// 比较运算符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Comparator {
    Equal,
    NotEqual,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    Like,
    In,
    Matches,
    IsSubSet,
    IsSuperSet,
}

impl Comparator {
    /// 运算符映射表中使用的键
    pub fn lookup_key(&self) -> &'static str {
        match self {
            Comparator::Equal => "ComparisonComparators.Equal",
            Comparator::NotEqual => "ComparisonComparators.NotEqual",
            Comparator::GreaterThan => "ComparisonComparators.GreaterThan",
            Comparator::GreaterThanOrEqual => "ComparisonComparators.GreaterThanOrEqual",
            Comparator::LessThan => "ComparisonComparators.LessThan",
            Comparator::LessThanOrEqual => "ComparisonComparators.LessThanOrEqual",
            Comparator::Like => "ComparisonComparators.Like",
            Comparator::In => "ComparisonComparators.In",
            Comparator::Matches => "ComparisonComparators.Matches",
            Comparator::IsSubSet => "ComparisonComparators.IsSubSet",
            Comparator::IsSuperSet => "ComparisonComparators.IsSuperSet",
        }
    }
}

/// 比较表达式之间的逻辑运算符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonOperator {
    And,
    Or,
}

impl ComparisonOperator {
    pub fn lookup_key(&self) -> &'static str {
        match self {
            ComparisonOperator::And => "ComparisonExpressionOperators.And",
            ComparisonOperator::Or => "ComparisonExpressionOperators.Or",
        }
    }
}

/// 观测之间的运算符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObservationOperator {
    And,
    Or,
    FollowedBy,
}

impl ObservationOperator {
    pub fn lookup_key(&self) -> &'static str {
        match self {
            ObservationOperator::And => "ObservationOperators.And",
            ObservationOperator::Or => "ObservationOperators.Or",
            ObservationOperator::FollowedBy => "ObservationOperators.FollowedBy",
        }
    }
}

/// 时间范围限定, 原样保存解析器给出的文本,
/// 例如：`START t'2020-01-01T00:00:00Z' STOP t'2020-01-02T00:00:00Z'`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Qualifier(pub String);

/// 字面量值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    /// `IN` 运算使用的值集合
    Set(Vec<Literal>),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Boolean(b) => write!(f, "{}", b),
            Literal::Integer(n) => write!(f, "{}", n),
            Literal::Float(x) => write!(f, "{}", x),
            Literal::String(s) => f.write_str(s),
            Literal::Set(values) => {
                f.write_str("(")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", value)?;
                }
                f.write_str(")")
            }
        }
    }
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self {
        Literal::String(s.to_string())
    }
}

impl From<String> for Literal {
    fn from(s: String) -> Self {
        Literal::String(s)
    }
}

impl From<i64> for Literal {
    fn from(n: i64) -> Self {
        Literal::Integer(n)
    }
}

impl From<f64> for Literal {
    fn from(x: f64) -> Self {
        Literal::Float(x)
    }
}

impl From<bool> for Literal {
    fn from(b: bool) -> Self {
        Literal::Boolean(b)
    }
}

impl<T: Into<Literal>> From<Vec<T>> for Literal {
    fn from(values: Vec<T>) -> Self {
        Literal::Set(values.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_object_path() {
        let comparison = Comparison::new("ipv4-addr:value", Comparator::Equal, "10.0.0.1");
        assert_eq!(comparison.split_path(), Some(("ipv4-addr", "value")));

        let comparison = Comparison::new("network-traffic:src_ref.value", Comparator::Equal, "10.0.0.1");
        assert_eq!(comparison.split_path(), Some(("network-traffic", "src_ref.value")));

        let comparison = Comparison::new("novalue", Comparator::Equal, "x");
        assert_eq!(comparison.split_path(), None);
    }

    #[test]
    fn test_deserialize_tree_from_json() {
        let json = r#"{
            "type": "qualified",
            "qualifier": "START t'2020-01-01T00:00:00Z' STOP t'2020-01-02T00:00:00Z'",
            "inner": {
                "type": "observation",
                "comparison": {
                    "type": "combined_comparison",
                    "operator": "And",
                    "left": {
                        "type": "comparison",
                        "object_path": "network-traffic:src_port",
                        "comparator": "In",
                        "value": [80, 443]
                    },
                    "right": {
                        "type": "comparison",
                        "object_path": "file:name",
                        "comparator": "Like",
                        "value": "evil",
                        "negated": true
                    }
                }
            }
        }"#;

        let expected = Expression::comparison("network-traffic:src_port", Comparator::In, vec![80i64, 443])
            .and(Comparison::new("file:name", Comparator::Like, "evil").negated().into())
            .observe()
            .qualify("START t'2020-01-01T00:00:00Z' STOP t'2020-01-02T00:00:00Z'");

        let parsed: Expression = serde_json::from_str(json).unwrap();
        assert_eq!(parsed, expected);
    }

    #[test]
    fn test_literal_display() {
        assert_eq!(Literal::from("abc").to_string(), "abc");
        assert_eq!(Literal::from(42i64).to_string(), "42");
        assert_eq!(Literal::from(true).to_string(), "true");
        assert_eq!(Literal::from(vec![1i64, 2]).to_string(), "(1, 2)");
    }
}
