//! Best-effort synthesis of strings matching a schema `pattern`.
//!
//! Covers the regex subset that contract authors actually write: literals,
//! `.`, character classes, `\d`/`\w`/`\s` escapes, groups, alternation,
//! and the usual quantifiers. Anchors are ignored (output is matched
//! whole). Anything outside the subset (backreferences, lookarounds)
//! reports [`PatternError::Unsupported`] and the caller falls back to a
//! plain string.

use rand::rngs::StdRng;
use rand::Rng;
use std::fmt;

/// Repetition ceiling for open-ended quantifiers (`*`, `+`, `{n,}`).
const MAX_REPEAT: usize = 3;

#[derive(Debug, PartialEq, Eq)]
pub enum PatternError {
    Unsupported(&'static str),
    Malformed,
    /// No candidate character satisfies the pattern (e.g. a negated class
    /// covering all of printable ASCII).
    Unsatisfiable,
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternError::Unsupported(what) => write!(f, "unsupported pattern construct: {what}"),
            PatternError::Malformed => write!(f, "malformed pattern"),
            PatternError::Unsatisfiable => write!(f, "pattern admits no candidate character"),
        }
    }
}

impl std::error::Error for PatternError {}

/// Synthesize a string matching `pattern`, drawing randomness from `rng`.
pub fn synthesize(pattern: &str, rng: &mut StdRng) -> Result<String, PatternError> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut parser = Parser { chars, pos: 0 };
    let node = parser.alternation()?;
    if parser.pos != parser.chars.len() {
        return Err(PatternError::Malformed);
    }
    let mut out = String::new();
    render(&node, rng, &mut out)?;
    Ok(out)
}

enum Node {
    Empty,
    Literal(char),
    AnyChar,
    Class { negated: bool, items: Vec<ClassItem> },
    Sequence(Vec<Node>),
    Alternation(Vec<Node>),
    Repeat { node: Box<Node>, min: usize, max: usize },
}

enum ClassItem {
    Char(char),
    Range(char, char),
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn alternation(&mut self) -> Result<Node, PatternError> {
        let mut branches = vec![self.sequence()?];
        while self.peek() == Some('|') {
            self.bump();
            branches.push(self.sequence()?);
        }
        if branches.len() == 1 {
            Ok(branches.pop().unwrap_or(Node::Empty))
        } else {
            Ok(Node::Alternation(branches))
        }
    }

    fn sequence(&mut self) -> Result<Node, PatternError> {
        let mut nodes = Vec::new();
        while let Some(c) = self.peek() {
            if c == '|' || c == ')' {
                break;
            }
            let atom = self.atom()?;
            nodes.push(self.quantified(atom)?);
        }
        Ok(match nodes.len() {
            0 => Node::Empty,
            1 => nodes.pop().unwrap_or(Node::Empty),
            _ => Node::Sequence(nodes),
        })
    }

    fn atom(&mut self) -> Result<Node, PatternError> {
        match self.bump().ok_or(PatternError::Malformed)? {
            '^' | '$' => Ok(Node::Empty),
            '.' => Ok(Node::AnyChar),
            '(' => {
                // Swallow group modifiers; only non-capturing is supported.
                if self.peek() == Some('?') {
                    self.bump();
                    match self.bump() {
                        Some(':') => {}
                        Some('=') | Some('!') | Some('<') => {
                            return Err(PatternError::Unsupported("lookaround"))
                        }
                        _ => return Err(PatternError::Malformed),
                    }
                }
                let inner = self.alternation()?;
                if self.bump() != Some(')') {
                    return Err(PatternError::Malformed);
                }
                Ok(inner)
            }
            '[' => self.class(),
            '\\' => self.escape(),
            '*' | '+' | '?' => Err(PatternError::Malformed),
            c => Ok(Node::Literal(c)),
        }
    }

    fn escape(&mut self) -> Result<Node, PatternError> {
        let c = self.bump().ok_or(PatternError::Malformed)?;
        let class = |items| Node::Class {
            negated: false,
            items,
        };
        Ok(match c {
            'd' => class(vec![ClassItem::Range('0', '9')]),
            'w' => class(vec![
                ClassItem::Range('a', 'z'),
                ClassItem::Range('A', 'Z'),
                ClassItem::Range('0', '9'),
                ClassItem::Char('_'),
            ]),
            's' => Node::Literal(' '),
            'n' => Node::Literal('\n'),
            't' => Node::Literal('\t'),
            'D' | 'W' | 'S' | 'b' | 'B' => return Err(PatternError::Unsupported("class negation")),
            c if c.is_ascii_digit() => return Err(PatternError::Unsupported("backreference")),
            c => Node::Literal(c),
        })
    }

    fn class(&mut self) -> Result<Node, PatternError> {
        let negated = if self.peek() == Some('^') {
            self.bump();
            true
        } else {
            false
        };
        let mut items = Vec::new();
        loop {
            let c = self.bump().ok_or(PatternError::Malformed)?;
            match c {
                ']' if !items.is_empty() => break,
                '\\' => {
                    let e = self.bump().ok_or(PatternError::Malformed)?;
                    match e {
                        'd' => items.push(ClassItem::Range('0', '9')),
                        'w' => {
                            items.push(ClassItem::Range('a', 'z'));
                            items.push(ClassItem::Range('A', 'Z'));
                            items.push(ClassItem::Range('0', '9'));
                            items.push(ClassItem::Char('_'));
                        }
                        's' => items.push(ClassItem::Char(' ')),
                        other => items.push(ClassItem::Char(other)),
                    }
                }
                c => {
                    if self.peek() == Some('-')
                        && self.chars.get(self.pos + 1).copied() != Some(']')
                        && self.chars.get(self.pos + 1).is_some()
                    {
                        self.bump(); // '-'
                        let end = self.bump().ok_or(PatternError::Malformed)?;
                        items.push(ClassItem::Range(c, end));
                    } else {
                        items.push(ClassItem::Char(c));
                    }
                }
            }
        }
        Ok(Node::Class { negated, items })
    }

    fn quantified(&mut self, node: Node) -> Result<Node, PatternError> {
        let (min, max) = match self.peek() {
            Some('*') => (0, MAX_REPEAT),
            Some('+') => (1, MAX_REPEAT),
            Some('?') => (0, 1),
            Some('{') => {
                self.bump();
                let (min, max) = self.braced_bounds()?;
                return Ok(Node::Repeat {
                    node: Box::new(node),
                    min,
                    max,
                });
            }
            _ => return Ok(node),
        };
        self.bump();
        Ok(Node::Repeat {
            node: Box::new(node),
            min,
            max,
        })
    }

    fn braced_bounds(&mut self) -> Result<(usize, usize), PatternError> {
        let mut min_str = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                min_str.push(c);
                self.bump();
            } else {
                break;
            }
        }
        let min: usize = min_str.parse().map_err(|_| PatternError::Malformed)?;
        match self.bump() {
            Some('}') => Ok((min, min)),
            Some(',') => {
                let mut max_str = String::new();
                while let Some(c) = self.peek() {
                    if c.is_ascii_digit() {
                        max_str.push(c);
                        self.bump();
                    } else {
                        break;
                    }
                }
                if self.bump() != Some('}') {
                    return Err(PatternError::Malformed);
                }
                if max_str.is_empty() {
                    Ok((min, min + MAX_REPEAT))
                } else {
                    let max: usize = max_str.parse().map_err(|_| PatternError::Malformed)?;
                    if max < min {
                        return Err(PatternError::Malformed);
                    }
                    Ok((min, max))
                }
            }
            _ => Err(PatternError::Malformed),
        }
    }
}

fn render(node: &Node, rng: &mut StdRng, out: &mut String) -> Result<(), PatternError> {
    match node {
        Node::Empty => {}
        Node::Literal(c) => out.push(*c),
        Node::AnyChar => {
            let printable = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
            out.push(printable[rng.gen_range(0..printable.len())] as char);
        }
        Node::Class { negated, items } => {
            if *negated {
                // The complement over printable ASCII; empty means no output
                // could ever satisfy the class.
                let choices: Vec<char> = (b' '..=b'~')
                    .map(char::from)
                    .filter(|c| !class_contains(items, *c))
                    .collect();
                if choices.is_empty() {
                    return Err(PatternError::Unsatisfiable);
                }
                out.push(choices[rng.gen_range(0..choices.len())]);
            } else {
                let mut choices: Vec<char> = Vec::new();
                for item in items {
                    match item {
                        ClassItem::Char(c) => choices.push(*c),
                        ClassItem::Range(lo, hi) => {
                            choices.extend((*lo..=*hi).take(128));
                        }
                    }
                }
                if choices.is_empty() {
                    return Err(PatternError::Unsatisfiable);
                }
                out.push(choices[rng.gen_range(0..choices.len())]);
            }
        }
        Node::Sequence(nodes) => {
            for n in nodes {
                render(n, rng, out)?;
            }
        }
        Node::Alternation(branches) => {
            if !branches.is_empty() {
                render(&branches[rng.gen_range(0..branches.len())], rng, out)?;
            }
        }
        Node::Repeat { node, min, max } => {
            let n = if min >= max {
                *min
            } else {
                rng.gen_range(*min..=*max)
            };
            for _ in 0..n {
                render(node, rng, out)?;
            }
        }
    }
    Ok(())
}

fn class_contains(items: &[ClassItem], c: char) -> bool {
    items.iter().any(|item| match item {
        ClassItem::Char(ch) => *ch == c,
        ClassItem::Range(lo, hi) => (*lo..=*hi).contains(&c),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use regex::Regex;

    fn check(pattern: &str) {
        let re = Regex::new(&format!("^(?:{pattern})$")).expect("valid test pattern");
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let s = synthesize(pattern, &mut rng).expect("synthesizes");
            assert!(re.is_match(&s), "{s:?} does not match {pattern:?}");
        }
    }

    #[test]
    fn test_literals_and_digits() {
        check("ab-c");
        check(r"\d{3}");
        check(r"[A-Z]{2}\d{4}");
    }

    #[test]
    fn test_quantifiers() {
        check("a*b+c?");
        check(r"x{2,5}");
        check(r"y{3,}");
    }

    #[test]
    fn test_groups_and_alternation() {
        check("(foo|bar|baz)");
        check("(?:ab){1,2}(x|y)");
    }

    #[test]
    fn test_classes() {
        check("[abc]+");
        check("[a-f0-9]{8}");
        check("[^0-9]{4}");
    }

    #[test]
    fn test_anchors_ignored() {
        check("^done$");
    }

    #[test]
    fn test_real_world_shapes() {
        check(r"[A-Z]{2}-\d{4}");
        check(r"\d{4}-\d{2}-\d{2}");
        check(r"v\d+\.\d+\.\d+");
    }

    #[test]
    fn test_unsatisfiable_negated_class_reported() {
        // Covers all of printable ASCII; no character can satisfy it, so
        // the caller must get an error (and fall back), never a string
        // that fails its own pattern.
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..20 {
            assert_eq!(
                synthesize(r"[^ -~]", &mut rng),
                Err(PatternError::Unsatisfiable)
            );
        }
    }

    #[test]
    fn test_unsupported_reported() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            synthesize(r"(?=peek)x", &mut rng),
            Err(PatternError::Unsupported(_))
        ));
        assert!(matches!(
            synthesize("(unclosed", &mut rng),
            Err(PatternError::Malformed)
        ));
    }
}
