use crate::ast::*;
use crate::coerce::infer;
use crate::error::{Error, Result};
use crate::row::Conditions;
use crate::tokenizer::{Token, Tokenizer};

/// Parses a command line into a [Command].
///
/// # Example
/// ```
/// # use flatdb::parser::parse;
/// # use flatdb::ast::Command;
/// let command = parse("drop_table users").unwrap();
/// assert_eq!(command, Command::DropTable { table: "users".into() });
/// ```
pub fn parse(line: &str) -> Result<Command> {
    let tokens = Tokenizer::new(line).tokenize()?;
    Parser::new(tokens).parse()
}

pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    pub fn parse(&mut self) -> Result<Command> {
        let head = self.current_token().clone();
        let command = match &head {
            Token::Word(word) => match word.to_lowercase().as_str() {
                "help" => self.parse_bare(Command::Help),
                "exit" => self.parse_bare(Command::Exit),
                "list_tables" => self.parse_bare(Command::ListTables),
                "create_table" => self.parse_create_table(),
                "drop_table" => self.parse_drop_table(),
                "info" => self.parse_info(),
                "insert" => self.parse_insert(),
                "select" => self.parse_select(),
                "update" => self.parse_update(),
                "delete" => self.parse_delete(),
                _ => Err(Error::UnknownCommand(word.clone())),
            },
            Token::Eof => Err(Error::Syntax("empty command".into())),
            other => Err(Error::UnknownCommand(other.to_string())),
        }?;

        // Check we are at the end of the line
        if !self.is_at_end() {
            return Err(Error::Syntax(format!(
                "unexpected {} after {} command",
                self.current_token(),
                command.name()
            )));
        }

        Ok(command)
    }

    //helpers
    fn current_token(&self) -> &Token {
        &self.tokens[self.position]
    }

    fn advance(&mut self) {
        if self.position < self.tokens.len() - 1 {
            self.position += 1;
        }
    }

    fn is_at_end(&self) -> bool {
        matches!(self.current_token(), Token::Eof)
    }

    fn consume(&mut self, expected: Token) -> Result<()> {
        if *self.current_token() == expected {
            self.advance();
            Ok(())
        } else {
            Err(Error::Syntax(format!(
                "expected {expected}, found {}",
                self.current_token()
            )))
        }
    }

    fn consume_keyword(&mut self, keyword: &str) -> Result<()> {
        if self.current_token().is_keyword(keyword) {
            self.advance();
            Ok(())
        } else {
            Err(Error::Syntax(format!(
                "expected '{keyword}', found {}",
                self.current_token()
            )))
        }
    }

    /// Consumes a table name.
    fn consume_table(&mut self) -> Result<String> {
        match self.current_token() {
            Token::Word(name) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            other => Err(Error::Syntax(format!(
                "expected a table name, found {other}"
            ))),
        }
    }

    fn parse_bare(&mut self, command: Command) -> Result<Command> {
        self.advance();
        Ok(command)
    }

    fn parse_create_table(&mut self) -> Result<Command> {
        self.advance(); // create_table
        let name = self.consume_table()?;
        let mut columns = vec![];
        while !self.is_at_end() {
            match self.current_token() {
                Token::Word(spec) => columns.push(spec.clone()),
                other => return Err(Error::InvalidColumnSpec(other.to_string())),
            }
            self.advance();
        }
        Ok(Command::CreateTable(CreateTable { name, columns }))
    }

    fn parse_drop_table(&mut self) -> Result<Command> {
        self.advance(); // drop_table
        let table = self.consume_table()?;
        Ok(Command::DropTable { table })
    }

    fn parse_info(&mut self) -> Result<Command> {
        self.advance(); // info
        let table = self.consume_table()?;
        Ok(Command::Info { table })
    }

    /// `insert into <table> values (<v1>, <v2>, ...)`
    fn parse_insert(&mut self) -> Result<Command> {
        self.advance(); // insert
        self.consume_keyword("into")?;
        let table = self.consume_table()?;
        self.consume_keyword("values")?;
        self.consume(Token::LeftParen)?;

        let mut values = vec![];
        if !matches!(self.current_token(), Token::RightParen) {
            loop {
                let literal = self.current_token().raw().ok_or_else(|| {
                    Error::Syntax(format!("expected a value, found {}", self.current_token()))
                })?;
                values.push(literal);
                self.advance();
                match self.current_token() {
                    Token::Comma => self.advance(),
                    Token::RightParen => break,
                    other => return Err(Error::Syntax(format!("expected ',' or ')', found {other}"))),
                }
            }
        }
        self.consume(Token::RightParen)?;

        Ok(Command::Insert(Insert { table, values }))
    }

    /// `select from <table> [where <col> = <value>]`
    fn parse_select(&mut self) -> Result<Command> {
        self.advance(); // select
        self.consume_keyword("from")?;
        let table = self.consume_table()?;

        let where_clause = if self.current_token().is_keyword("where") {
            self.advance();
            Some(self.parse_condition(None)?)
        } else {
            None
        };

        Ok(Command::Select(Select {
            table,
            where_clause,
        }))
    }

    /// `update <table> set <col> = <value> where <col> = <value>`
    fn parse_update(&mut self) -> Result<Command> {
        self.advance(); // update
        let table = self.consume_table()?;
        self.consume_keyword("set")?;
        let assignments = self.parse_condition(Some("where"))?;
        self.consume_keyword("where")?;
        let where_clause = self.parse_condition(None)?;

        Ok(Command::Update(Update {
            table,
            assignments,
            where_clause,
        }))
    }

    /// `delete from <table> where <col> = <value>`
    fn parse_delete(&mut self) -> Result<Command> {
        self.advance(); // delete
        self.consume_keyword("from")?;
        let table = self.consume_table()?;
        self.consume_keyword("where")?;
        let where_clause = self.parse_condition(None)?;

        Ok(Command::Delete(Delete {
            table,
            where_clause,
        }))
    }

    /// Parses exactly one `<col> = <value>` equality, ending at the end of the
    /// line or before `stop`. The value's type comes from its literal syntax.
    fn parse_condition(&mut self, stop: Option<&str>) -> Result<Conditions> {
        let mut clause = vec![];
        while !self.is_at_end() && !stop.is_some_and(|kw| self.current_token().is_keyword(kw)) {
            clause.push(self.current_token().clone());
            self.advance();
        }

        let malformed = || {
            let text: Vec<String> = clause.iter().map(ToString::to_string).collect();
            Error::MalformedCondition(text.join(" "))
        };

        match clause.as_slice() {
            [Token::Word(column), Token::Equal, literal] => {
                let raw = literal.raw().ok_or_else(malformed)?;
                let value = infer(&raw).map_err(|_| malformed())?;
                Ok(Conditions::from([(column.clone(), value)]))
            }
            _ => Err(malformed()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::conditions;
    use crate::value::Value;

    #[test]
    fn test_parse_bare_commands() {
        assert_eq!(parse("help").unwrap(), Command::Help);
        assert_eq!(parse("EXIT").unwrap(), Command::Exit);
        assert_eq!(parse("list_tables").unwrap(), Command::ListTables);
        assert!(matches!(parse("help me"), Err(Error::Syntax(_))));
    }

    #[test]
    fn test_parse_create_table() {
        let command = parse("create_table users name:str age:int").unwrap();

        assert_eq!(
            command,
            Command::CreateTable(CreateTable {
                name: "users".into(),
                columns: vec!["name:str".into(), "age:int".into()],
            })
        );
    }

    #[test]
    fn test_parse_create_table_requires_name() {
        assert!(matches!(parse("create_table"), Err(Error::Syntax(_))));
        assert!(matches!(parse("drop_table"), Err(Error::Syntax(_))));
    }

    #[test]
    fn test_parse_insert() {
        let command = parse(r#"insert into users values ("Sergei", 28, true, 'a, b')"#).unwrap();

        assert_eq!(
            command,
            Command::Insert(Insert {
                table: "users".into(),
                values: vec![
                    "\"Sergei\"".into(),
                    "28".into(),
                    "true".into(),
                    "'a, b'".into()
                ],
            })
        );
    }

    #[test]
    fn test_parse_insert_errors() {
        assert!(matches!(parse("insert into users (1)"), Err(Error::Syntax(_))));
        assert!(matches!(parse("insert into users values 1, 2"), Err(Error::Syntax(_))));
        assert!(matches!(parse("insert into users values (1 2)"), Err(Error::Syntax(_))));
        assert_eq!(
            parse("insert into users values ()").unwrap(),
            Command::Insert(Insert {
                table: "users".into(),
                values: vec![],
            })
        );
    }

    #[test]
    fn test_parse_select() {
        assert_eq!(
            parse("select from users").unwrap(),
            Command::Select(Select {
                table: "users".into(),
                where_clause: None,
            })
        );
        assert_eq!(
            parse("SELECT FROM users WHERE name = 'Alice'").unwrap(),
            Command::Select(Select {
                table: "users".into(),
                where_clause: Some(conditions([("name", "Alice")])),
            })
        );
    }

    #[test]
    fn test_condition_literal_types() {
        let Command::Select(select) = parse("select from t where age = 28").unwrap() else {
            panic!("Expected Select");
        };
        assert_eq!(select.where_clause, Some(conditions([("age", Value::Int(28))])));

        let Command::Select(select) = parse("select from t where age = \"28\"").unwrap() else {
            panic!("Expected Select");
        };
        assert_eq!(select.where_clause, Some(conditions([("age", "28")])));

        let Command::Select(select) = parse("select from t where ok=False").unwrap() else {
            panic!("Expected Select");
        };
        assert_eq!(select.where_clause, Some(conditions([("ok", false)])));
    }

    #[test]
    fn test_malformed_conditions() {
        for line in [
            "select from t where name = Alice",
            "select from t where name Alice",
            "select from t where a = 1 = 2",
            "select from t where = 1",
            "select from t where",
            "delete from t where age = 1.5",
        ] {
            assert!(
                matches!(parse(line), Err(Error::MalformedCondition(_))),
                "{line:?} should be malformed"
            );
        }
    }

    #[test]
    fn test_parse_update() {
        assert_eq!(
            parse("update users set age = 30 where ID = 1").unwrap(),
            Command::Update(Update {
                table: "users".into(),
                assignments: conditions([("age", Value::Int(30))]),
                where_clause: conditions([("ID", Value::Int(1))]),
            })
        );
        assert!(matches!(
            parse("update users set age = 30"),
            Err(Error::Syntax(_))
        ));
        assert!(matches!(
            parse("update users age = 30 where ID = 1"),
            Err(Error::Syntax(_))
        ));
    }

    #[test]
    fn test_parse_delete() {
        assert_eq!(
            parse("delete from users where ID = 2").unwrap(),
            Command::Delete(Delete {
                table: "users".into(),
                where_clause: conditions([("ID", Value::Int(2))]),
            })
        );
        assert!(matches!(parse("delete from users"), Err(Error::Syntax(_))));
    }

    #[test]
    fn test_unknown_command() {
        assert!(matches!(parse("frobnicate users"), Err(Error::UnknownCommand(_))));
        assert!(matches!(parse(""), Err(Error::Syntax(_))));
    }
}
