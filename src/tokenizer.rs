use std::fmt;

use crate::error::{Error, Result};

/// Represents the smallest meaningful units of the command language.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// A bare run of characters: keyword, table name, `name:type` spec or
    /// unquoted literal (e.g. `users`, `age:int`, `-12`, `true`).
    Word(String),
    /// A quoted literal. The quote character is kept so the literal can be
    /// handed on exactly as typed.
    Quoted { quote: char, text: String },

    // --- Symbols ---
    /// Left parenthesis `(`
    LeftParen,
    /// Right parenthesis `)`
    RightParen,
    /// Comma `,`
    Comma,
    /// Equal sign `=`
    Equal,

    // --- Special ---
    /// Represents the end of the line.
    Eof,
}

impl Token {
    /// The literal as the operator typed it, quotes included.
    pub fn raw(&self) -> Option<String> {
        match self {
            Self::Word(word) => Some(word.clone()),
            Self::Quoted { quote, text } => Some(format!("{quote}{text}{quote}")),
            _ => None,
        }
    }

    /// Whether this is the keyword `keyword`, compared case-insensitively.
    pub fn is_keyword(&self, keyword: &str) -> bool {
        matches!(self, Self::Word(word) if word.eq_ignore_ascii_case(keyword))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Word(word) => f.write_str(word),
            Token::Quoted { quote, text } => write!(f, "{quote}{text}{quote}"),
            Token::LeftParen => f.write_str("'('"),
            Token::RightParen => f.write_str("')'"),
            Token::Comma => f.write_str("','"),
            Token::Equal => f.write_str("="),
            Token::Eof => f.write_str("end of line"),
        }
    }
}

/// A lexical scanner that converts one command line into a sequence of [Token]s.
pub struct Tokenizer {
    /// The input string stored as a vector of characters for easy iteration.
    input: Vec<char>,
    /// The current position in the character vector.
    position: usize,
}

impl Tokenizer {
    /// Creates a new Tokenizer for the given input string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
        }
    }

    /// Processes the entire input and returns a vector of tokens ending with [Token::Eof].
    ///
    /// # Errors
    /// Returns [Error::Syntax] if a quoted literal is not terminated.
    ///
    /// # Example
    /// ```
    /// # use flatdb::tokenizer::{Tokenizer, Token};
    /// let tokens = Tokenizer::new("select from users").tokenize().unwrap();
    /// assert_eq!(tokens[2], Token::Word("users".into()));
    /// ```
    pub fn tokenize(&mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();

        while !self.is_at_end() {
            self.skip_whitespace();

            if self.is_at_end() {
                break;
            }

            let token = self.next_token()?;
            tokens.push(token);
        }

        tokens.push(Token::Eof);
        Ok(tokens)
    }

    /// Identifies the next token based on the character at the current position.
    fn next_token(&mut self) -> Result<Token> {
        let ch = self.current_char();

        match ch {
            '(' => {
                self.advance();
                Ok(Token::LeftParen)
            }
            ')' => {
                self.advance();
                Ok(Token::RightParen)
            }
            ',' => {
                self.advance();
                Ok(Token::Comma)
            }
            '=' => {
                self.advance();
                Ok(Token::Equal)
            }
            '\'' | '"' => self.read_quoted(ch),
            _ => Ok(self.read_word()),
        }
    }

    // --- Navigation Helpers ---

    fn current_char(&self) -> char {
        self.input[self.position]
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn skip_whitespace(&mut self) {
        while !self.is_at_end() && self.current_char().is_whitespace() {
            self.advance();
        }
    }

    // --- Extraction Logic ---

    fn is_word_char(ch: char) -> bool {
        !ch.is_whitespace() && !matches!(ch, '(' | ')' | ',' | '=' | '\'' | '"')
    }

    /// Reads everything up to the next whitespace, symbol or quote.
    fn read_word(&mut self) -> Token {
        let mut word = String::new();
        while !self.is_at_end() && Self::is_word_char(self.current_char()) {
            word.push(self.current_char());
            self.advance();
        }
        Token::Word(word)
    }

    /// Reads a literal enclosed in `quote`. The other quote character is
    /// ordinary text inside it.
    fn read_quoted(&mut self, quote: char) -> Result<Token> {
        self.advance(); // Skip the opening quote

        let mut text = String::new();
        while !self.is_at_end() && self.current_char() != quote {
            text.push(self.current_char());
            self.advance();
        }

        if self.is_at_end() {
            return Err(Error::Syntax("unterminated quoted value".into()));
        }

        // Skip the closing quote
        self.advance();

        Ok(Token::Quoted { quote, text })
    }
}
