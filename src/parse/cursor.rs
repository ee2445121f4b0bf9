/// Position into an immutable source buffer.
///
/// One cursor is threaded by `&mut` through every production, so the
/// position after a call is exactly where the callee stopped reading.
#[derive(Debug, Clone)]
pub struct Cursor {
    chars: Vec<char>,
    pos: usize,
}

fn is_space(c: char) -> bool {
    c == ' '
}

impl Cursor {
    pub fn new(source: &str) -> Self {
        Cursor {
            chars: source.chars().collect(),
            pos: 0,
        }
    }

    /// Index of the next unread character.
    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn peek_input(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    pub fn skip(&mut self) -> Option<char> {
        let c = self.peek_input()?;
        self.pos += 1;
        Some(c)
    }

    pub fn skip_whitespaces(&mut self) {
        while self.peek_input().is_some_and(is_space) {
            self.skip();
        }
    }

    /// Skip whitespaces and look at the first character of the next token.
    /// `None` means the end of input.
    pub fn peek_token(&mut self) -> Option<char> {
        self.skip_whitespaces();
        self.peek_input()
    }
}

#[test]
fn test_peek() {
    let mut cursor = Cursor::new("12 3");
    assert_eq!(cursor.peek_input(), Some('1'));
    cursor.skip();
    assert_eq!(cursor.peek_input(), Some('2'));
    assert_eq!(cursor.skip(), Some('2'));
    assert_eq!(cursor.pos(), 2);
    assert_eq!(cursor.peek_token(), Some('3'));
    assert_eq!(cursor.pos(), 3);
    assert_eq!(cursor.skip(), Some('3'));
    assert_eq!(cursor.peek_input(), None);
    assert_eq!(cursor.skip(), None);
    assert_eq!(cursor.pos(), 4);
}

#[test]
fn test_peek_token_at_trailing_spaces() {
    let mut cursor = Cursor::new("   ");
    assert_eq!(cursor.peek_token(), None);
    assert_eq!(cursor.pos(), 3);
}
