use std::io::BufRead;

use crate::error::{EngineError, EngineResult};

/// A 2D L-system grammar: initiator string, per-symbol production rules,
/// which symbols draw a step, heading angle, starting heading, and
/// recursion depth. Grammar file format inferred from the original
/// engine's call sites (see DESIGN.md): one `symbol -> replacement` rule
/// per line, plus `initiator`, `angle`, `starting_angle`, `iterations`,
/// and `draw` (space-separated drawable symbols) keys.
#[derive(Debug, Clone)]
pub struct LSystem2D {
    pub initiator: String,
    pub rules: Vec<(char, String)>,
    pub drawable: Vec<char>,
    pub angle: f32,
    pub starting_angle: f32,
    pub iterations: u32,
}

impl LSystem2D {
    pub fn rule(&self, symbol: char) -> Option<&str> {
        self.rules.iter().find(|(s, _)| *s == symbol).map(|(_, r)| r.as_str())
    }

    pub fn is_drawable(&self, symbol: char) -> bool {
        self.drawable.contains(&symbol)
    }

    pub fn parse(input: impl BufRead) -> EngineResult<Self> {
        let mut initiator = None;
        let mut rules = Vec::new();
        let mut drawable = Vec::new();
        let mut angle = None;
        let mut starting_angle = 0.0;
        let mut iterations = None;

        for line in input.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some((symbol, replacement)) = line.split_once("->") {
                let symbol = symbol.trim();
                let mut chars = symbol.chars();
                let c = chars.next().ok_or_else(|| EngineError::Parse(format!("empty rule symbol in '{line}'")))?;
                if chars.next().is_some() {
                    return Err(EngineError::Parse(format!("rule symbol must be one character in '{line}'")));
                }
                rules.push((c, replacement.trim().to_string()));
                continue;
            }

            let (key, value) = line.split_once('=').ok_or_else(|| EngineError::Parse(format!("malformed line '{line}'")))?;
            let (key, value) = (key.trim(), value.trim());
            match key {
                "initiator" => initiator = Some(value.to_string()),
                "angle" => angle = Some(parse_f32(value)?),
                "starting_angle" => starting_angle = parse_f32(value)?,
                "iterations" => iterations = Some(parse_u32(value)?),
                "draw" => drawable.extend(value.chars().filter(|c| !c.is_whitespace())),
                other => return Err(EngineError::Parse(format!("unknown L-system key '{other}'"))),
            }
        }

        Ok(Self {
            initiator: initiator.ok_or_else(|| EngineError::Parse("missing 'initiator'".into()))?,
            rules,
            drawable,
            angle: angle.ok_or_else(|| EngineError::Parse("missing 'angle'".into()))?,
            starting_angle,
            iterations: iterations.ok_or_else(|| EngineError::Parse("missing 'iterations'".into()))?,
        })
    }
}

fn parse_f32(s: &str) -> EngineResult<f32> {
    s.parse().map_err(|_| EngineError::Parse(format!("expected a number, got '{s}'")))
}

fn parse_u32(s: &str) -> EngineResult<u32> {
    s.parse().map_err(|_| EngineError::Parse(format!("expected an integer, got '{s}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parses_a_koch_grammar() {
        let text = "initiator = F\nangle = 60\niterations = 3\ndraw = F\nF -> F+F--F+F\n";
        let sys = LSystem2D::parse(Cursor::new(text)).unwrap();
        assert_eq!(sys.initiator, "F");
        assert_eq!(sys.angle, 60.);
        assert_eq!(sys.iterations, 3);
        assert_eq!(sys.rule('F'), Some("F+F--F+F"));
        assert!(sys.is_drawable('F'));
    }

    #[test]
    fn rejects_unknown_key() {
        let text = "bogus = 1\n";
        assert!(LSystem2D::parse(Cursor::new(text)).is_err());
    }
}
