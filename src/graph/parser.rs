//! A parser for the subset of the DOT language
//! produced by graph exporters: node, edge and attribute statements.
use super::dot::{Attributes, DotGraph, DotNode};
use crate::error::{DatathonError, Result};


#[derive(Clone, Debug, PartialEq)]
enum Token {
    /// An unquoted identifier or numeral.
    Id(String),
    /// The raw text between double quotes.
    Quoted(String),
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Semi,
    Comma,
    Equals,
    Colon,
    /// `->` when `true`, `--` otherwise.
    EdgeOp(bool),
}


fn syntax_error<S: Into<String>>(offset: usize, message: S) -> DatathonError {
    DatathonError::DotSyntax { offset, message: message.into() }
}


fn is_id_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '.' || !c.is_ascii()
}


fn tokenize(src: &str) -> Result<Vec<(usize, Token)>> {
    let mut tokens = Vec::new();
    let mut chars = src.char_indices().peekable();
    let mut line_start = true;

    while let Some((offset, c)) = chars.next() {
        match c {
            '\n' => { line_start = true; continue; },
            c if c.is_whitespace() => continue,
            // Preprocessor output lines.
            '#' if line_start => {
                while chars.next_if(|&(_, c)| c != '\n').is_some() {}
                continue;
            },
            '/' => match chars.peek() {
                Some(&(_, '/')) => {
                    while chars.next_if(|&(_, c)| c != '\n').is_some() {}
                    continue;
                },
                Some(&(_, '*')) => {
                    chars.next();
                    let mut previous = ' ';
                    loop {
                        match chars.next() {
                            Some((_, '/')) if previous == '*' => break,
                            Some((_, c)) => { previous = c; },
                            None => {
                                return Err(syntax_error(offset, "unterminated comment"));
                            },
                        }
                    }
                    continue;
                },
                _ => return Err(syntax_error(offset, "unexpected `/`")),
            },
            _ => {},
        }
        line_start = false;

        let token = match c {
            '{' => Token::LBrace,
            '}' => Token::RBrace,
            '[' => Token::LBracket,
            ']' => Token::RBracket,
            ';' => Token::Semi,
            ',' => Token::Comma,
            '=' => Token::Equals,
            ':' => Token::Colon,
            '-' if chars.next_if(|&(_, c)| c == '>').is_some() => Token::EdgeOp(true),
            '-' if chars.next_if(|&(_, c)| c == '-').is_some() => Token::EdgeOp(false),
            '"' => {
                let mut raw = String::new();
                loop {
                    match chars.next() {
                        Some((_, '"')) => break,
                        Some((_, '\\')) => {
                            raw.push('\\');
                            if let Some((_, escaped)) = chars.next() {
                                raw.push(escaped);
                            }
                        },
                        Some((_, c)) => raw.push(c),
                        None => {
                            return Err(syntax_error(offset, "unterminated string"));
                        },
                    }
                }
                Token::Quoted(raw)
            },
            '<' => {
                return Err(syntax_error(offset, "HTML labels are not supported"));
            },
            c if is_id_char(c) || c == '-' => {
                let mut id = String::from(c);
                while let Some((_, c)) = chars.next_if(|&(_, c)| is_id_char(c)) {
                    id.push(c);
                }
                Token::Id(id)
            },
            c => {
                return Err(syntax_error(offset, format!("unexpected `{c}`")));
            },
        };
        tokens.push((offset, token));
    }
    Ok(tokens)
}


struct Parser {
    tokens: Vec<(usize, Token)>,
    pos: usize,
    end: usize,
}


/// Parse DOT text into a [`DotGraph`].
pub(super) fn parse(src: &str) -> Result<DotGraph> {
    let tokens = tokenize(src)?;
    let mut parser = Parser { tokens, pos: 0, end: src.len() };
    parser.graph()
}


impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(_, t)| t)
    }


    fn offset(&self) -> usize {
        self.tokens.get(self.pos)
            .map(|&(offset, _)| offset)
            .unwrap_or(self.end)
    }


    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).map(|(_, t)| t.clone());
        if token.is_some() { self.pos += 1; }
        token
    }


    fn peek_keyword(&self, keyword: &str) -> bool {
        matches!(self.peek(), Some(Token::Id(id)) if id.eq_ignore_ascii_case(keyword))
    }


    fn expect(&mut self, expected: Token, what: &str) -> Result<()> {
        let offset = self.offset();
        match self.advance() {
            Some(token) if token == expected => Ok(()),
            _ => Err(syntax_error(offset, format!("expected {what}"))),
        }
    }


    fn expect_id(&mut self) -> Result<String> {
        let offset = self.offset();
        match self.advance() {
            Some(Token::Id(id)) | Some(Token::Quoted(id)) => Ok(id),
            _ => Err(syntax_error(offset, "expected an identifier")),
        }
    }


    fn graph(&mut self) -> Result<DotGraph> {
        let strict = self.peek_keyword("strict");
        if strict { self.pos += 1; }

        let directed = if self.peek_keyword("digraph") {
            true
        } else if self.peek_keyword("graph") {
            false
        } else {
            return Err(syntax_error(self.offset(), "expected `graph` or `digraph`"));
        };
        self.pos += 1;

        let name = match self.peek() {
            Some(Token::Id(_)) | Some(Token::Quoted(_)) => Some(self.expect_id()?),
            _ => None,
        };
        self.expect(Token::LBrace, "`{`")?;

        let mut graph = DotGraph::new(name, directed);
        graph.strict = strict;
        self.statements(&mut graph)?;

        self.expect(Token::RBrace, "`}`")?;
        if self.pos < self.tokens.len() {
            return Err(syntax_error(self.offset(), "trailing input after the graph"));
        }
        Ok(graph)
    }


    fn statements(&mut self, graph: &mut DotGraph) -> Result<()> {
        loop {
            match self.peek() {
                None | Some(Token::RBrace) => return Ok(()),
                Some(Token::Semi) | Some(Token::Comma) => { self.pos += 1; },
                Some(_) => self.statement(graph)?,
            }
        }
    }


    fn statement(&mut self, graph: &mut DotGraph) -> Result<()> {
        let offset = self.offset();

        for keyword in ["graph", "node", "edge"] {
            if self.peek_keyword(keyword) {
                self.pos += 1;
                let attributes = self.attribute_lists()?;
                let target = match keyword {
                    "graph" => &mut graph.graph_attributes,
                    "node" => &mut graph.node_defaults,
                    _ => &mut graph.edge_defaults,
                };
                target.extend(attributes);
                return Ok(());
            }
        }
        if self.peek_keyword("subgraph") || self.peek() == Some(&Token::LBrace) {
            return Err(syntax_error(offset, "subgraphs are not supported"));
        }

        let id = self.expect_id()?;
        match self.peek() {
            Some(Token::Equals) => {
                self.pos += 1;
                let value = self.expect_id()?;
                graph.graph_attributes.set_raw(id, value);
            },
            Some(&Token::EdgeOp(_)) => {
                let mut ids = vec![id];
                while let Some(&Token::EdgeOp(directed)) = self.peek() {
                    if directed != graph.directed {
                        let op = if graph.directed { "->" } else { "--" };
                        return Err(syntax_error(self.offset(), format!("expected `{op}`")));
                    }
                    self.pos += 1;
                    ids.push(self.expect_id()?);
                }
                let attributes = self.attribute_lists()?;
                for pair in ids.windows(2) {
                    graph.add_edge(pair[0].clone(), pair[1].clone(), attributes.clone());
                }
            },
            Some(Token::Colon) => {
                return Err(syntax_error(self.offset(), "ports are not supported"));
            },
            _ => {
                let mut node = DotNode::new(id);
                node.attributes_mut().extend(self.attribute_lists()?);
                graph.add_node(node);
            },
        }
        Ok(())
    }


    fn attribute_lists(&mut self) -> Result<Attributes> {
        let mut attributes = Attributes::new();
        while self.peek() == Some(&Token::LBracket) {
            self.pos += 1;
            loop {
                match self.peek() {
                    Some(Token::RBracket) => { self.pos += 1; break; },
                    Some(Token::Semi) | Some(Token::Comma) => { self.pos += 1; },
                    _ => {
                        let key = self.expect_id()?;
                        self.expect(Token::Equals, "`=`")?;
                        let value = self.expect_id()?;
                        attributes.set_raw(key, value);
                    },
                }
            }
        }
        Ok(attributes)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    const TREE: &str = "digraph Tree {\n\
        node [shape=box, style=\"filled, rounded\", color=\"black\", fontname=\"helvetica\"] ;\n\
        edge [fontname=\"helvetica\"] ;\n\
        0 [label=\"X[0] <= 0.5\\ngini = 0.5\\nsamples = 4\\nvalue = [2, 2]\", fillcolor=\"#ffffff\"] ;\n\
        1 [label=\"gini = 0.0\\nsamples = 2\\nvalue = [2, 0]\", fillcolor=\"#e58139\"] ;\n\
        0 -> 1 [labeldistance=2.5, labelangle=45, headlabel=\"True\"] ;\n\
        }";

    #[test]
    fn parses_exported_tree() {
        let graph = parse(TREE).unwrap();
        assert!(graph.is_directed());
        assert_eq!(graph.name(), Some("Tree"));
        assert_eq!(graph.node_defaults().get("style"), Some("filled, rounded"));
        assert_eq!(graph.edge_defaults().get("fontname"), Some("helvetica"));
        assert_eq!(graph.nodes().len(), 2);
        assert_eq!(
            graph.node("0").unwrap().label(),
            Some("X[0] <= 0.5\\ngini = 0.5\\nsamples = 4\\nvalue = [2, 2]")
        );
        assert_eq!(graph.node("1").unwrap().fill_color(), Some("#e58139"));

        let edge = &graph.edges()[0];
        assert_eq!((edge.source(), edge.target()), ("0", "1"));
        assert_eq!(edge.attributes().get("labelangle"), Some("45"));
    }

    #[test]
    fn display_round_trips() {
        let graph = parse(TREE).unwrap();
        let again = parse(&graph.to_string()).unwrap();
        assert_eq!(graph, again);
    }

    #[test]
    fn comments_chains_and_graph_attributes() {
        let src = "/* header */ graph G {\n\
            # preprocessor line\n\
            rankdir = LR // trailing\n\
            a -- b -- c [color=red]\n\
            }";
        let graph = parse(src).unwrap();
        assert!(!graph.is_directed());
        assert_eq!(graph.graph_attributes().get("rankdir"), Some("LR"));
        assert_eq!(graph.edges().len(), 2);
        assert_eq!(graph.edges()[1].attributes().get("color"), Some("red"));
        assert!(graph.nodes().is_empty());
    }

    #[test]
    fn reports_syntax_errors() {
        assert!(parse("digraph { a -> }").is_err());
        assert!(parse("digraph { a -- b }").is_err());
        assert!(parse("digraph { a [label=\"x] }").is_err());
        assert!(parse("digraph { subgraph s { a } }").is_err());
        assert!(parse("digraph { a } extra").is_err());
        assert!(parse("tree { a }").is_err());
    }
}
