use std::fmt;

use logos::Logos;

#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(skip r"[ \t\r\n\f]+", skip r"//.*")]
pub enum Token<'a> {
    /// Sentinel for byte sequences the lexer cannot match. Never produced
    /// by a pattern; the parse pass substitutes it for lex errors so the
    /// parser reports them with a position.
    Error,

    #[token("int")]
    IntType,
    #[token("bool")]
    BoolType,
    #[token("string")]
    StringType,
    #[token("void")]
    VoidType,
    #[token("record")]
    Record,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("while")]
    While,
    #[token("return")]
    Return,
    #[token("true")]
    True,
    #[token("false")]
    False,

    #[token("=")]
    Assign,
    #[token(";")]
    Semi,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("<")]
    Lt,
    #[token("<=")]
    Le,
    #[token(">")]
    Gt,
    #[token(">=")]
    Ge,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("&&")]
    AndAnd,
    #[token("||")]
    OrOr,
    #[token("!")]
    Bang,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice())]
    Identifier(&'a str),

    #[regex(r#""([^"\\]|\\.)*""#, |lex| &lex.slice()[1..(lex.slice().len()-1)])]
    String(&'a str),

    #[regex(r"[0-9]+", |lex| lex.slice().parse().ok())]
    Integer(i64),
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Error => write!(f, "ERROR"),
            Token::IntType => write!(f, "int"),
            Token::BoolType => write!(f, "bool"),
            Token::StringType => write!(f, "string"),
            Token::VoidType => write!(f, "void"),
            Token::Record => write!(f, "record"),
            Token::If => write!(f, "if"),
            Token::Else => write!(f, "else"),
            Token::While => write!(f, "while"),
            Token::Return => write!(f, "return"),
            Token::True => write!(f, "true"),
            Token::False => write!(f, "false"),
            Token::Assign => write!(f, "="),
            Token::Semi => write!(f, ";"),
            Token::Comma => write!(f, ","),
            Token::Dot => write!(f, "."),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::LBrace => write!(f, "{{"),
            Token::RBrace => write!(f, "}}"),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::Lt => write!(f, "<"),
            Token::Le => write!(f, "<="),
            Token::Gt => write!(f, ">"),
            Token::Ge => write!(f, ">="),
            Token::EqEq => write!(f, "=="),
            Token::NotEq => write!(f, "!="),
            Token::AndAnd => write!(f, "&&"),
            Token::OrOr => write!(f, "||"),
            Token::Bang => write!(f, "!"),
            Token::Identifier(s) => write!(f, "ID:{s}"),
            Token::String(s) => write!(f, "STR:\"{s}\""),
            Token::Integer(i) => write!(f, "INT:{i}"),
        }
    }
}

/// Render the token stream one token per line with byte spans, the form
/// the driver writes for the token-dump mode. Unlexable input shows up as
/// `ERROR` tokens rather than aborting the dump.
pub fn dump_tokens(src: &str) -> String {
    let mut out = String::new();
    for (token, span) in Token::lexer(src).spanned() {
        let token = token.unwrap_or(Token::Error);
        out.push_str(&format!("{token} [{},{}]\n", span.start, span.end));
    }
    out.push_str(&format!("EOF [{},{}]\n", src.len(), src.len()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lexes_declaration() {
        let tokens: Vec<_> = Token::lexer("int x = 42;").filter_map(|t| t.ok()).collect();
        assert_eq!(
            tokens,
            vec![
                Token::IntType,
                Token::Identifier("x"),
                Token::Assign,
                Token::Integer(42),
                Token::Semi,
            ]
        );
    }

    #[test]
    fn skips_comments() {
        let tokens: Vec<_> = Token::lexer("// nothing here\nreturn;")
            .filter_map(|t| t.ok())
            .collect();
        assert_eq!(tokens, vec![Token::Return, Token::Semi]);
    }

    #[test]
    fn dump_includes_spans_and_eof() {
        let dump = dump_tokens("int x;");
        assert_eq!(dump, "int [0,3]\nID:x [4,5]\n; [5,6]\nEOF [6,6]\n");
    }

    #[test]
    fn dump_marks_unlexable_input() {
        let dump = dump_tokens("int # x;");
        assert!(dump.contains("ERROR [4,5]"));
    }
}
