use super::ast::{ExprKind, Expression};
use crate::error::{Coordinate, CoordinatedError, Error, Result};
use crate::lexer::{Token, TokenKind};

/// What the parser keeps on its work stack: open-list and pending-quote
/// markers, and values still inside an unfinished form.
enum StackItem {
    Open(Coordinate),
    PendingQuote(Coordinate),
    Value(Expression),
}

/// Stack-based parser over a token stream
///
/// Consumes any `Iterator<Item = Result<Token>>` (typically a
/// [`Scanner`](crate::lexer::Scanner)) and implements
/// `Iterator<Item = Result<Expression>>`, yielding each top-level form
/// the moment it is syntactically complete. A single explicit stack
/// holds everything in flight, so nesting depth never touches the call
/// stack and quote sugar resolves as a local rewrite: after every value
/// lands on the stack, any pending `'` markers directly beneath it wrap
/// it, innermost first.
///
/// The first error, whether lexical (propagated from the token stream)
/// or structural, ends the stream; subsequent pulls return `None`.
pub struct Parser<I> {
    tokens: I,
    stack: Vec<StackItem>,
    /// Coordinate of the most recently processed token, for the
    /// end-of-input diagnostic
    last_coord: Option<Coordinate>,
    done: bool,
}

impl<I> Parser<I>
where
    I: Iterator<Item = Result<Token>>,
{
    /// Creates a parser over a token stream
    pub fn new(tokens: I) -> Self {
        Parser {
            tokens,
            stack: Vec::new(),
            last_coord: None,
            done: false,
        }
    }

    /// Parses all remaining forms eagerly, failing on the first error.
    pub fn parse(&mut self) -> Result<Vec<Expression>> {
        self.collect()
    }

    fn process(&mut self, token: Token) -> Result<()> {
        self.last_coord = Some(token.coord.clone());

        match token.kind {
            TokenKind::LeftParen => {
                self.stack.push(StackItem::Open(token.coord));
                return Ok(());
            }
            TokenKind::Quote => {
                self.stack.push(StackItem::PendingQuote(token.coord));
                return Ok(());
            }
            TokenKind::RightParen => self.close_list(token.coord)?,
            TokenKind::Symbol => {
                let value = Expression::new(ExprKind::Symbol(token.lexeme), token.coord);
                self.stack.push(StackItem::Value(value));
            }
            TokenKind::Integer => {
                let value = parse_integer(&token)?;
                self.stack
                    .push(StackItem::Value(Expression::new(
                        ExprKind::Integer(value),
                        token.coord,
                    )));
            }
            TokenKind::Float => {
                let value = parse_float(&token)?;
                self.stack
                    .push(StackItem::Value(Expression::new(
                        ExprKind::Float(value),
                        token.coord,
                    )));
            }
        }

        // A value just landed on the stack; give it to any quote
        // markers waiting beneath it.
        self.resolve_quotes();
        Ok(())
    }

    /// Folds the stack back to the matching `(`, building the list in
    /// reverse pop order and reversing once.
    fn close_list(&mut self, close_coord: Coordinate) -> Result<()> {
        let mut elements = Vec::new();
        loop {
            match self.stack.pop() {
                None => return Err(Error::unbalanced_close(close_coord)),
                Some(StackItem::Open(coord)) => {
                    elements.reverse();
                    self.stack.push(StackItem::Value(Expression::new(
                        ExprKind::SExpression(elements),
                        coord,
                    )));
                    return Ok(());
                }
                Some(StackItem::Value(value)) => elements.push(value),
                // A quote with nothing attached inside the list. The
                // scanner never produces this shape; a hand-built
                // token stream can.
                Some(StackItem::PendingQuote(coord)) => return Err(Error::lexical(coord)),
            }
        }
    }

    fn resolve_quotes(&mut self) {
        while let [.., StackItem::PendingQuote(_), StackItem::Value(_)] = self.stack.as_slice() {
            let top = self.stack.pop();
            let marker = self.stack.pop();
            if let (Some(StackItem::Value(value)), Some(StackItem::PendingQuote(coord))) =
                (top, marker)
            {
                self.stack.push(StackItem::Value(Expression::new(
                    ExprKind::Quoted(Box::new(value)),
                    coord,
                )));
            }
        }
    }

    /// Pops and returns the stack's sole value, if the stack holds
    /// exactly one completed form.
    fn take_completed(&mut self) -> Option<Expression> {
        match self.stack.as_slice() {
            [StackItem::Value(_)] => match self.stack.pop() {
                Some(StackItem::Value(value)) => {
                    tracing::debug!(form = %value, "completed top-level form");
                    Some(value)
                }
                _ => None,
            },
            _ => None,
        }
    }
}

impl<I> Iterator for Parser<I>
where
    I: Iterator<Item = Result<Token>>,
{
    type Item = Result<Expression>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            match self.tokens.next() {
                Some(Ok(token)) => {
                    if let Err(err) = self.process(token) {
                        self.done = true;
                        return Some(Err(err));
                    }
                    if let Some(form) = self.take_completed() {
                        return Some(Ok(form));
                    }
                }
                Some(Err(err)) => {
                    self.done = true;
                    return Some(Err(err));
                }
                None => {
                    self.done = true;
                    if self.stack.is_empty() {
                        return None;
                    }
                    let coord = self.last_coord.take()?;
                    return Some(Err(Error::incomplete_form(coord)));
                }
            }
        }
    }
}

fn parse_integer(token: &Token) -> Result<i64> {
    token.lexeme.parse().map_err(|_| {
        Error::Lexical(CoordinatedError::new(
            "Syntax Error: integer literal out of range",
            token.coord.clone(),
        ))
    })
}

fn parse_float(token: &Token) -> Result<f64> {
    token
        .lexeme
        .parse()
        .map_err(|_| Error::lexical(token.coord.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Scanner;

    fn parser_for(source: &str) -> Parser<Scanner> {
        Parser::new(Scanner::new(source, "test"))
    }

    fn parse_all(source: &str) -> Result<Vec<Expression>> {
        parser_for(source).parse()
    }

    #[test]
    fn test_atoms_yield_one_form_each() {
        let forms = parse_all("a 1 2.5").unwrap();
        assert_eq!(
            forms,
            vec![
                Expression::symbol("a"),
                Expression::integer(1),
                Expression::float(2.5),
            ]
        );
    }

    #[test]
    fn test_forms_carry_their_positions() {
        let forms = parse_all("(a\n  (b))").unwrap();
        let list = &forms[0];
        // The list takes the opening paren's position.
        let coord = list.coord.as_ref().unwrap();
        assert_eq!((coord.line, coord.column), (1, 0));

        match &list.kind {
            ExprKind::SExpression(elements) => {
                let inner = elements[1].coord.as_ref().unwrap();
                assert_eq!((inner.line, inner.column), (2, 2));
            }
            other => panic!("expected list, got {:?}", other),
        }
    }

    #[test]
    fn test_quoted_takes_marker_position() {
        let forms = parse_all("  'x").unwrap();
        let coord = forms[0].coord.as_ref().unwrap();
        assert_eq!((coord.line, coord.column), (1, 2));
    }

    #[test]
    fn test_too_many_closing_parens() {
        match parse_all(")") {
            Err(Error::UnbalancedClose(e)) => {
                assert_eq!((e.coord.line, e.coord.column), (1, 0));
                assert_eq!(e.message, "Syntax Error: too many closing parenthesis");
            }
            other => panic!("expected unbalanced close, got {:?}", other),
        }
    }

    #[test]
    fn test_unclosed_list() {
        match parse_all("(a b") {
            Err(Error::IncompleteForm(e)) => {
                // Anchored at the last token processed.
                assert_eq!((e.coord.line, e.coord.column), (1, 3));
                assert_eq!(e.message, "Syntax Error: incomplete parse");
            }
            other => panic!("expected incomplete form, got {:?}", other),
        }
    }

    #[test]
    fn test_dangling_quote() {
        match parse_all("'") {
            Err(Error::IncompleteForm(e)) => {
                assert_eq!((e.coord.line, e.coord.column), (1, 0));
            }
            other => panic!("expected incomplete form, got {:?}", other),
        }
    }

    #[test]
    fn test_scanner_error_passes_through() {
        match parse_all("(a \" b)") {
            Err(Error::Lexical(e)) => assert_eq!((e.coord.line, e.coord.column), (1, 3)),
            other => panic!("expected lexical error, got {:?}", other),
        }
    }

    #[test]
    fn test_completed_forms_come_before_a_later_error() {
        let mut parser = parser_for("(a) (b");
        assert_eq!(
            parser.next().unwrap().unwrap(),
            Expression::list(vec![Expression::symbol("a")])
        );
        assert!(parser.next().unwrap().is_err());
        assert!(parser.next().is_none());
    }

    #[test]
    fn test_integer_out_of_range() {
        match parse_all("99999999999999999999999999") {
            Err(Error::Lexical(e)) => {
                assert_eq!(e.message, "Syntax Error: integer literal out of range");
            }
            other => panic!("expected lexical error, got {:?}", other),
        }
    }

    #[test]
    fn test_quote_marker_inside_closing_list() {
        // Unreachable from the scanner (it rejects `')`), but the
        // parser accepts arbitrary token streams.
        use crate::error::Coordinate;
        let coord = |column| Coordinate::new("test".into(), 1, column, "(a ')".into());
        let tokens = vec![
            Token::new(TokenKind::LeftParen, "(", coord(0)),
            Token::new(TokenKind::Symbol, "a", coord(1)),
            Token::new(TokenKind::Quote, "'", coord(3)),
            Token::new(TokenKind::RightParen, ")", coord(4)),
        ];
        let mut parser = Parser::new(tokens.into_iter().map(Ok));
        match parser.next() {
            Some(Err(Error::Lexical(e))) => assert_eq!(e.coord.column, 3),
            other => panic!("expected lexical error, got {:?}", other),
        }
    }
}
