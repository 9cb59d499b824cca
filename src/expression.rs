use crate::number::{from_integer, Number};
use crate::operators::BinaryOperator;
use crate::parser::{check_token_preconditions, Token};
use crate::{calc_err, format_calc_err, CalcResult};
use num::BigInt;
use std::fmt::{self, Display, Formatter};
use std::mem;

/// Maximal nesting of parentheses and unary minuses. Chains of binary operators on the
/// same level do not count.
pub const MAX_DEPTH: usize = 256;

/// Node of the expression tree of an infix expression.
///
/// Left-associative chains such as `1 + 2 + ... + n` grow along the left children.
/// Evaluation, rendering, comparison, and dropping walk this left spine in a loop, so
/// only parentheses and unary minuses, which are limited by [`MAX_DEPTH`](MAX_DEPTH),
/// lead to recursion.
#[derive(Debug)]
pub enum Node {
    Literal(BigInt),
    BinaryOp(BinaryOperator, Box<Node>, Box<Node>),
    UnaryMinus(Box<Node>),
}

/// Leftmost node that is not a binary operation together with the binary operations
/// above it, in the order they are applied.
struct LeftSpine<'a> {
    head: Head<'a>,
    steps: Vec<(BinaryOperator, &'a Node)>,
}

enum Head<'a> {
    Literal(&'a BigInt),
    UnaryMinus(&'a Node),
}

impl Node {
    fn left_spine(&self) -> LeftSpine<'_> {
        let mut steps = Vec::new();
        let mut node = self;
        let head = loop {
            match node {
                Node::BinaryOp(op, left, right) => {
                    steps.push((*op, &**right));
                    node = &**left;
                }
                Node::Literal(n) => break Head::Literal(n),
                Node::UnaryMinus(operand) => break Head::UnaryMinus(&**operand),
            }
        };
        steps.reverse();
        LeftSpine { head, steps }
    }

    /// Evaluates the tree bottom-up.
    ///
    /// # Errors
    ///
    /// [`DivisionByZero`](crate::ErrorKind::DivisionByZero) if the right operand of any division
    /// evaluates to zero.
    ///
    pub fn eval(&self) -> CalcResult<Number> {
        let LeftSpine { head, steps } = self.left_spine();
        let first = match head {
            Head::Literal(n) => from_integer(n.clone()),
            Head::UnaryMinus(operand) => {
                let minus = BinaryOperator::Sub.operator().unary()?;
                minus(&operand.eval()?)
            }
        };
        steps
            .into_iter()
            .try_fold(first, |acc, (op, right)| op.apply(&acc, &right.eval()?))
    }

    /// Renders the tree in postfix notation such that
    /// [`evaluate_postfix`](crate::evaluate_postfix) computes the same value.
    /// Since postfix notation has no unary operators, `-x` becomes `0 x -`.
    pub fn to_postfix(&self) -> String {
        let LeftSpine { head, steps } = self.left_spine();
        let mut res = match head {
            Head::Literal(n) => n.to_string(),
            Head::UnaryMinus(operand) => format!("0 {} -", operand.to_postfix()),
        };
        for (op, right) in steps {
            res.push_str(&format!(" {} {}", right.to_postfix(), op));
        }
        res
    }

    /// Renders the tree in prefix notation such that
    /// [`evaluate_prefix`](crate::evaluate_prefix) computes the same value.
    pub fn to_prefix(&self) -> String {
        let LeftSpine { head, steps } = self.left_spine();
        let mut res = String::new();
        for (op, _) in steps.iter().rev() {
            res.push_str(&format!("{op} "));
        }
        match head {
            Head::Literal(n) => res.push_str(&n.to_string()),
            Head::UnaryMinus(operand) => res.push_str(&format!("- 0 {}", operand.to_prefix())),
        }
        for (_, right) in steps {
            res.push_str(&format!(" {}", right.to_prefix()));
        }
        res
    }

    fn prio(&self) -> Option<i32> {
        match self {
            Node::BinaryOp(op, _, _) => op.prio().ok(),
            _ => None,
        }
    }

    fn detach_children(&mut self, detached: &mut Vec<Node>) {
        fn take(node: &mut Node) -> Node {
            mem::replace(node, Node::Literal(BigInt::default()))
        }
        match self {
            Node::Literal(_) => (),
            Node::BinaryOp(_, left, right) => {
                detached.push(take(left));
                detached.push(take(right));
            }
            Node::UnaryMinus(operand) => detached.push(take(operand)),
        }
    }
}

impl Drop for Node {
    fn drop(&mut self) {
        let mut detached = Vec::new();
        self.detach_children(&mut detached);
        while let Some(mut node) = detached.pop() {
            node.detach_children(&mut detached);
        }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Node) -> bool {
        let (lhs, rhs) = (self.left_spine(), other.left_spine());
        let heads_eq = match (lhs.head, rhs.head) {
            (Head::Literal(a), Head::Literal(b)) => a == b,
            (Head::UnaryMinus(a), Head::UnaryMinus(b)) => a == b,
            _ => false,
        };
        heads_eq && lhs.steps == rhs.steps
    }
}

impl Eq for Node {}

/// Infix rendering with as few parentheses as possible. Parsing the rendered string
/// gives back the same tree.
impl Display for Node {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let LeftSpine { head, steps } = self.left_spine();
        // the part left of an operator is wrapped if it binds weaker than the operator
        let mut wrap_left = Vec::with_capacity(steps.len());
        let mut prio_left = None;
        for (op, _) in &steps {
            let prio = op.prio().ok();
            wrap_left.push(matches!((prio_left, prio), (Some(pl), Some(p)) if pl < p));
            prio_left = prio;
        }
        for _ in wrap_left.iter().filter(|wrap| **wrap) {
            f.write_str("(")?;
        }
        match head {
            Head::Literal(n) => write!(f, "{n}")?,
            Head::UnaryMinus(operand) => {
                let inner = match operand {
                    Node::BinaryOp(..) => format!("({operand})"),
                    _ => operand.to_string(),
                };
                // `-3` would be read as literal
                if inner.starts_with(|c: char| c.is_ascii_digit()) {
                    write!(f, "- {inner}")?
                } else {
                    write!(f, "-{inner}")?
                }
            }
        }
        for ((op, right), wrap) in steps.into_iter().zip(wrap_left) {
            if wrap {
                f.write_str(")")?;
            }
            let prio = op.prio().ok();
            let wrap_right = matches!((right.prio(), prio), (Some(pr), Some(p)) if pr <= p);
            if wrap_right {
                write!(f, " {op} ({right})")?;
            } else {
                write!(f, " {op} {right}")?;
            }
        }
        Ok(())
    }
}

/// Precedence climbing over the priorities of the operator table. The nesting depth of
/// parentheses and unary minuses is passed down and checked before each descent.
struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos);
        self.pos += 1;
        token
    }

    fn deeper(depth: usize) -> CalcResult<usize> {
        if depth >= MAX_DEPTH {
            Err(format_calc_err!(
                SyntaxError,
                "expression is nested deeper than {} levels",
                MAX_DEPTH
            ))
        } else {
            Ok(depth + 1)
        }
    }

    fn parse_binary(&mut self, min_prio: i32, depth: usize) -> CalcResult<Node> {
        let mut lhs = self.parse_unary(depth)?;
        while let Some(op) = self.peek().and_then(|t| t.bin_operator()) {
            let prio = op.prio()?;
            if prio < min_prio {
                break;
            }
            self.advance();
            // left-associative, hence the right hand side only takes stronger operators
            let rhs = self.parse_binary(prio + 1, depth)?;
            lhs = Node::BinaryOp(op, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self, depth: usize) -> CalcResult<Node> {
        match self.peek().and_then(|t| t.operator()) {
            Some(op) if op.has_unary() => {
                self.advance();
                // right-associative, `- - 3` is `-(-(3))`
                let operand = self.parse_unary(Self::deeper(depth)?)?;
                Ok(Node::UnaryMinus(Box::new(operand)))
            }
            _ => self.parse_primary(depth),
        }
    }

    fn parse_primary(&mut self, depth: usize) -> CalcResult<Node> {
        let pos = self.pos;
        match self.advance() {
            Some(Token::Num(n)) => Ok(Node::Literal(n.clone())),
            Some(Token::LParen) => {
                let node = self.parse_binary(0, Self::deeper(depth)?)?;
                match self.advance() {
                    Some(Token::RParen) => Ok(node),
                    Some(t) => Err(format_calc_err!(
                        SyntaxError,
                        "expected ')' but found '{}' at token {}",
                        t,
                        self.pos - 1
                    )),
                    None => Err(calc_err!(SyntaxError, "missing ')'")),
                }
            }
            Some(t) => Err(format_calc_err!(
                SyntaxError,
                "unexpected '{}' at token {}",
                t,
                pos
            )),
            None => Err(calc_err!(SyntaxError, "unexpected end of expression")),
        }
    }
}

/// Builds the expression tree of a token sequence. An empty sequence is the empty
/// statement and yields `None`.
///
/// # Arguments
///
/// * `tokens` - tokens created with [`tokenize`](crate::tokenize)
///
/// # Errors
///
/// [`SyntaxError`](crate::ErrorKind::SyntaxError) for unmatched parentheses, dangling
/// operators, trailing tokens, or parentheses and unary minuses nested deeper than
/// [`MAX_DEPTH`](MAX_DEPTH).
///
pub fn parse(tokens: &[Token]) -> CalcResult<Option<Node>> {
    if tokens.is_empty() {
        return Ok(None);
    }
    check_token_preconditions(tokens)?;
    let mut parser = Parser { tokens, pos: 0 };
    let node = parser.parse_binary(0, 0)?;
    match parser.peek() {
        Some(t) => Err(format_calc_err!(
            SyntaxError,
            "unexpected '{}' at token {} after a complete expression",
            t,
            parser.pos
        )),
        None => Ok(Some(node)),
    }
}

/// Parses and evaluates a token sequence.
///
/// # Errors
///
/// [`EmptyInputError`](crate::ErrorKind::EmptyInputError) for an empty token sequence and
/// otherwise see [`parse`](parse) and [`Node::eval`](Node::eval).
///
pub fn eval_tokens(tokens: &[Token]) -> CalcResult<Number> {
    match parse(tokens)? {
        Some(node) => node.eval(),
        None => Err(calc_err!(EmptyInputError, "cannot evaluate an empty expression")),
    }
}

#[cfg(test)]
use crate::{parser::tokenize, ErrorKind};

#[cfg(test)]
fn parse_str(text: &str) -> Node {
    parse(&tokenize(text).unwrap()).unwrap().unwrap()
}

#[cfg(test)]
fn lit(n: i64) -> Box<Node> {
    Box::new(Node::Literal(n.into()))
}

#[test]
fn test_tree() {
    use BinaryOperator::*;
    assert_eq!(
        parse_str("2 + 3 * 4"),
        Node::BinaryOp(Add, lit(2), Box::new(Node::BinaryOp(Mul, lit(3), lit(4))))
    );
    assert_eq!(
        parse_str("8 - 2 - 1"),
        Node::BinaryOp(Sub, Box::new(Node::BinaryOp(Sub, lit(8), lit(2))), lit(1))
    );
    assert_eq!(
        parse_str("8 / 2 * 4"),
        Node::BinaryOp(Mul, Box::new(Node::BinaryOp(Div, lit(8), lit(2))), lit(4))
    );
    assert_eq!(
        parse_str("- - 3"),
        Node::UnaryMinus(Box::new(Node::UnaryMinus(lit(3))))
    );
    assert_eq!(parse_str("-3"), Node::Literal((-3).into()));
    assert_eq!(
        parse_str("-(1) * 2"),
        Node::BinaryOp(Mul, Box::new(Node::UnaryMinus(lit(1))), lit(2))
    );
    assert!(parse(&[]).unwrap().is_none());
}

#[test]
fn test_eval() {
    fn test(text: &str, reference: i64) {
        let tokens = tokenize(text).unwrap();
        assert_eq!(eval_tokens(&tokens).unwrap(), from_integer(reference.into()), "{text}");
    }
    test("2 + 3 * 4", 14);
    test("(2 + 3) * 4", 20);
    test("-(3+4)", -7);
    test("-3 + 4", 1);
    test("10 - 4 - 3", 3);
    test("100 / 10 / 5", 2);
    test("2 * (3 + (4 - 1)) / 3", 4);
    test("- - 3", 3);
    test("-(-(2)) * -(3)", -6);
    test("3 - -4", 7);
    test("((((7))))", 7);
    let half = eval_tokens(&tokenize("1 / 2").unwrap()).unwrap();
    assert_eq!(half, Number::new(1.into(), 2.into()));
}

#[test]
fn test_eval_err() {
    fn test(text: &str, kind: ErrorKind) {
        let tokens = tokenize(text).unwrap();
        assert_eq!(eval_tokens(&tokens).unwrap_err().kind, kind, "{text}");
    }
    test("", ErrorKind::EmptyInputError);
    test("1 / 0", ErrorKind::DivisionByZero);
    test("1 / (2 - 2)", ErrorKind::DivisionByZero);
    test("5 + 1 / (3 * 0) * 2", ErrorKind::DivisionByZero);
    test("(1 + 2", ErrorKind::SyntaxError);
    test("1 + 2)", ErrorKind::SyntaxError);
    test("+ 3 4", ErrorKind::SyntaxError);
    test("3-4", ErrorKind::SyntaxError);
    test("1 +", ErrorKind::SyntaxError);
    test("-", ErrorKind::SyntaxError);
}

#[test]
fn test_depth() {
    fn assert_too_deep(text: &str) {
        let err = parse(&tokenize(text).unwrap()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::SyntaxError);
        assert!(err.msg.contains("nested deeper"), "{}", err.msg);
    }
    let nested = |n: usize| format!("{}1{}", "(".repeat(n), ")".repeat(n));
    assert_eq!(parse_str(&nested(MAX_DEPTH)).eval().unwrap(), from_integer(1.into()));
    assert_too_deep(&nested(MAX_DEPTH + 1));
    assert_too_deep(&nested(100_000));

    let minuses = |n: usize| format!("{}1", "- ".repeat(n));
    assert_eq!(parse_str(&minuses(MAX_DEPTH)).eval().unwrap(), from_integer(1.into()));
    assert_too_deep(&minuses(MAX_DEPTH + 1));
    assert_too_deep(&minuses(100_000));
    assert_too_deep(&format!("{}1{}", "-(".repeat(100_000), ")".repeat(100_000)));
}

#[test]
fn test_long_chains() {
    use crate::linear::{evaluate_postfix, evaluate_prefix};
    let n = 100_000;
    for (op, reference) in [("+", n as i64), ("-", 2 - n as i64), ("*", 1), ("/", 1)] {
        let text = vec!["1"; n].join(&format!(" {op} "));
        let node = parse_str(&text);
        let reference = from_integer(reference.into());
        assert_eq!(node.eval().unwrap(), reference, "{op}");
        assert_eq!(evaluate_postfix(&node.to_postfix()).unwrap(), reference, "{op}");
        assert_eq!(evaluate_prefix(&node.to_prefix()).unwrap(), reference, "{op}");
        let rendered = node.to_string();
        assert_eq!(rendered, text);
        assert_eq!(parse_str(&rendered), node);
    }
    let mixed = vec!["2 * 3 - 4 / (2 - -2)"; n / 4].join(" + ");
    let node = parse_str(&mixed);
    assert_eq!(node.eval().unwrap(), from_integer((5 * (n / 4) as i64).into()));
    assert_eq!(parse_str(&node.to_string()), node);
}

#[test]
fn test_display() {
    for text in [
        "2 + 3 * 4",
        "(2 + 3) * 4",
        "8 - (2 - 1)",
        "8 - 2 - 1",
        "-(3 + 4)",
        "- 3",
        "--3",
        "3 - -4",
        "-(1) * 2",
        "1 / (2 * 3)",
        "1 / 2 * 3",
    ] {
        let node = parse_str(text);
        let rendered = node.to_string();
        assert_eq!(parse_str(&rendered), node, "{text} -> {rendered}");
    }
    assert_eq!(parse_str("((2) + (3 * 4))").to_string(), "2 + 3 * 4");
    assert_eq!(parse_str("(2 + 3) * 4").to_string(), "(2 + 3) * 4");
    assert_eq!(parse_str("8 - (2 - 1)").to_string(), "8 - (2 - 1)");
    assert_eq!(parse_str("-(3)").to_string(), "- 3");
}

#[test]
fn test_notations() {
    let node = parse_str("(2 + 3) * -(4)");
    assert_eq!(node.to_postfix(), "2 3 + 0 4 - *");
    assert_eq!(node.to_prefix(), "* + 2 3 - 0 4");
    let node = parse_str("7 - 2 / -2");
    assert_eq!(node.to_postfix(), "7 2 -2 / -");
    assert_eq!(node.to_prefix(), "- 7 / 2 -2");
}
