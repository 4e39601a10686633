use std::collections::HashMap;
use std::io::BufRead;

use glam::Vec3;

use crate::error::{EngineError, EngineResult};
use crate::maths::Color;

/// One `key = value` entry, kept as its raw string until a typed accessor
/// is asked for it.
#[derive(Debug, Clone)]
pub struct Value(String);

impl Value {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_f32(&self) -> EngineResult<f32> {
        self.0.trim().parse().map_err(|_| EngineError::Config(format!("expected a number, got '{}'", self.0)))
    }

    pub fn as_u32(&self) -> EngineResult<u32> {
        self.0.trim().parse().map_err(|_| EngineError::Config(format!("expected an integer, got '{}'", self.0)))
    }

    pub fn as_bool(&self) -> EngineResult<bool> {
        match self.0.trim() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            other => Err(EngineError::Config(format!("expected a boolean, got '{other}'"))),
        }
    }

    /// Parses a bracketed triple such as `[1.0, 0.5, 0.0]` used throughout
    /// the original engine's config files for colors, points and vectors.
    pub fn as_vec3(&self) -> EngineResult<Vec3> {
        let inner = self.0.trim().trim_start_matches('[').trim_end_matches(']');
        let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
        if parts.len() != 3 {
            return Err(EngineError::Config(format!("expected '[x, y, z]', got '{}'", self.0)));
        }
        let parse = |s: &str| s.parse::<f32>().map_err(|_| EngineError::Config(format!("expected a number, got '{s}'")));
        Ok(Vec3::new(parse(parts[0])?, parse(parts[1])?, parse(parts[2])?))
    }

    pub fn as_color(&self) -> EngineResult<Color> {
        let v = self.as_vec3()?;
        Ok(Color::new(v.x, v.y, v.z))
    }

    /// Parses a bracketed pair of point indices, as used by `LineDrawing`
    /// figures' `lineN = [i, j]` entries.
    pub fn as_index_pair(&self) -> EngineResult<(u32, u32)> {
        let inner = self.0.trim().trim_start_matches('[').trim_end_matches(']');
        let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
        if parts.len() != 2 {
            return Err(EngineError::Config(format!("expected '[i, j]', got '{}'", self.0)));
        }
        let parse = |s: &str| s.parse::<u32>().map_err(|_| EngineError::Config(format!("expected an index, got '{s}'")));
        Ok((parse(parts[0])?, parse(parts[1])?))
    }
}

#[derive(Debug, Clone, Default)]
pub struct Section {
    entries: HashMap<String, Value>,
}

impl Section {
    pub fn get(&self, key: &str) -> EngineResult<&Value> {
        self.entries.get(key).ok_or_else(|| EngineError::Config(format!("missing key '{key}'")))
    }

    pub fn get_opt(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }
}

/// A parsed INI-style configuration file: `[Section]` headers followed by
/// `key = value` lines. `;` and `#` start a comment that runs to end of
/// line; blank lines are ignored.
#[derive(Debug, Clone, Default)]
pub struct Configuration {
    sections: HashMap<String, Section>,
}

impl Configuration {
    pub fn section(&self, name: &str) -> EngineResult<&Section> {
        self.sections.get(name).ok_or_else(|| EngineError::Config(format!("missing section '[{name}]'")))
    }

    pub fn has_section(&self, name: &str) -> bool {
        self.sections.contains_key(name)
    }

    pub fn parse(input: impl BufRead) -> EngineResult<Self> {
        let mut sections: HashMap<String, Section> = HashMap::new();
        let mut current: Option<String> = None;

        for line in input.lines() {
            let line = line?;
            let line = strip_comment(&line).trim();
            if line.is_empty() {
                continue;
            }

            if let Some(name) = line.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
                sections.entry(name.to_string()).or_default();
                current = Some(name.to_string());
                continue;
            }

            let (key, value) = line
                .split_once('=')
                .ok_or_else(|| EngineError::Config(format!("malformed line '{line}'")))?;
            let section_name = current.as_ref().ok_or_else(|| EngineError::Config(format!("key '{key}' outside any section")))?;
            sections
                .entry(section_name.clone())
                .or_default()
                .entries
                .insert(key.trim().to_string(), Value(value.trim().to_string()));
        }

        Ok(Self { sections })
    }
}

fn strip_comment(line: &str) -> &str {
    let cut = line.find(['#', ';']).unwrap_or(line.len());
    &line[..cut]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parses_sections_and_typed_values() {
        let text = "[General]\nsize = 500\nbackgroundcolor = [0.1, 0.2, 0.3]\n; a comment\nnrFigures = 1\n";
        let conf = Configuration::parse(Cursor::new(text)).unwrap();
        let general = conf.section("General").unwrap();
        assert_eq!(general.get("size").unwrap().as_u32().unwrap(), 500);
        assert_eq!(general.get("nrFigures").unwrap().as_u32().unwrap(), 1);
        let bg = general.get("backgroundcolor").unwrap().as_color().unwrap();
        assert!((bg.g - 0.2).abs() < 1e-6);
    }

    #[test]
    fn rejects_key_before_any_section() {
        let text = "size = 500\n";
        assert!(Configuration::parse(Cursor::new(text)).is_err());
    }
}
