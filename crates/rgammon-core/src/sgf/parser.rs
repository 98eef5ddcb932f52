//! SGF の字句・構文解析
//!
//! 木構造のうち主系列（各分岐の最初の変化）だけをノード列として取り出す。
//! 値の `\` エスケープはここで解除する。

use super::SgfError;

/// プロパティ（識別子と1個以上の値）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub ident: String,
    pub values: Vec<String>,
}

/// ノード（`;` から次の `;` / `(` / `)` まで）
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Node {
    pub properties: Vec<Property>,
}

impl Node {
    pub fn get(&self, ident: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.ident == ident)
    }

    /// 最初の値
    pub fn value(&self, ident: &str) -> Option<&str> {
        self.get(ident)
            .and_then(|p| p.values.first())
            .map(String::as_str)
    }

    pub fn has(&self, ident: &str) -> bool {
        self.get(ident).is_some()
    }
}

/// 値に含まれる `]` と `\` をエスケープする
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if c == ']' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// 最初のゲーム木の主系列をノード列として返す
pub fn parse_main_line(text: &str) -> Result<Vec<Node>, SgfError> {
    let mut parser = Parser {
        bytes: text.as_bytes(),
        text,
        pos: 0,
    };
    parser.skip_ws();
    if parser.peek() != Some(b'(') {
        return Err(parser.error("expected '(' at start of game tree"));
    }
    let mut nodes = Vec::new();
    parser.game_tree(&mut nodes, true)?;
    if nodes.is_empty() {
        return Err(SgfError::Syntax {
            offset: 0,
            message: "game tree has no nodes".to_string(),
        });
    }
    Ok(nodes)
}

struct Parser<'a> {
    bytes: &'a [u8],
    text: &'a str,
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn error(&self, message: &str) -> SgfError {
        SgfError::Syntax {
            offset: self.pos,
            message: message.to_string(),
        }
    }

    /// `(` node+ tree* `)`。`collect` が false の木は構文だけ確認して読み捨てる。
    fn game_tree(&mut self, nodes: &mut Vec<Node>, collect: bool) -> Result<(), SgfError> {
        // '('
        self.pos += 1;
        self.skip_ws();
        let mut seen_node = false;
        while self.peek() == Some(b';') {
            let node = self.node()?;
            if collect {
                nodes.push(node);
            }
            seen_node = true;
            self.skip_ws();
        }
        if !seen_node {
            return Err(self.error("expected ';' after '('"));
        }

        let mut first_variation = true;
        loop {
            self.skip_ws();
            match self.peek() {
                Some(b'(') => {
                    self.game_tree(nodes, collect && first_variation)?;
                    first_variation = false;
                }
                Some(b')') => {
                    self.pos += 1;
                    return Ok(());
                }
                Some(_) => return Err(self.error("unexpected character in game tree")),
                None => return Err(self.error("unterminated game tree")),
            }
        }
    }

    fn node(&mut self) -> Result<Node, SgfError> {
        // ';'
        self.pos += 1;
        let mut node = Node::default();
        loop {
            self.skip_ws();
            match self.peek() {
                Some(b) if b.is_ascii_uppercase() => {
                    let property = self.property()?;
                    // 同じ識別子が繰り返された場合は値を連結する
                    match node
                        .properties
                        .iter_mut()
                        .find(|p| p.ident == property.ident)
                    {
                        Some(existing) => existing.values.extend(property.values),
                        None => node.properties.push(property),
                    }
                }
                Some(b) if b.is_ascii_lowercase() => {
                    return Err(self.error("property identifiers must be upper case"));
                }
                _ => return Ok(node),
            }
        }
    }

    fn property(&mut self) -> Result<Property, SgfError> {
        let start = self.pos;
        while self.peek().is_some_and(|b| b.is_ascii_uppercase()) {
            self.pos += 1;
        }
        let ident = self.text[start..self.pos].to_string();

        let mut values = Vec::new();
        loop {
            self.skip_ws();
            if self.peek() != Some(b'[') {
                break;
            }
            values.push(self.value()?);
        }
        if values.is_empty() {
            return Err(self.error("property without value"));
        }
        Ok(Property { ident, values })
    }

    fn value(&mut self) -> Result<String, SgfError> {
        // '['
        let open = self.pos;
        self.pos += 1;
        let mut out = String::new();
        let mut chars = self.text[self.pos..].char_indices();
        while let Some((i, c)) = chars.next() {
            match c {
                '\\' => match chars.next() {
                    Some((_, escaped)) => out.push(escaped),
                    None => break,
                },
                ']' => {
                    self.pos += i + 1;
                    return Ok(out);
                }
                _ => out.push(c),
            }
        }
        Err(SgfError::Syntax {
            offset: open,
            message: "unterminated property value".to_string(),
        })
    }
}
